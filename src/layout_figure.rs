use crate::base::Config;
use crate::StrError;
use plotpy::{Canvas, Plot};
use std::ffi::OsStr;

/// Returns the closed outlines of the regions: (name, face color, corner points)
///
/// The gas outline surrounds the whole channel; the probe is drawn on top of it.
pub fn layout_outlines(config: &Config) -> Vec<(&'static str, &'static str, Vec<Vec<f64>>)> {
    let (len, od, id) = (
        config.pipe.length,
        config.pipe.outer_diameter,
        config.pipe.inner_diameter,
    );
    let (h, t) = (config.probe.height, config.probe.thickness);
    let rectangle = |x: f64, y: f64, width: f64, height: f64| {
        vec![
            vec![x, y],
            vec![x + width, y],
            vec![x + width, y + height],
            vec![x, y + height],
        ]
    };
    let wall = config.pipe.wall_thickness();
    vec![
        ("pipe", "#a9a9a9", rectangle(-len / 2.0, id / 2.0, len, wall)),
        ("pipe", "#a9a9a9", rectangle(-len / 2.0, -od / 2.0, len, wall)),
        ("gas", "#cce5ff", rectangle(-len / 2.0, -id / 2.0, len, id)),
        ("pt100", "#ff9933", rectangle(-t / 2.0, -h / 2.0, t, h)),
    ]
}

/// Draws the layout of the flow meter and saves the figure
///
/// **Note:** plotpy calls Python/Matplotlib to generate the figure.
///
/// # Input
///
/// * `config` -- the case parameters
/// * `filepath` -- may be a String, &str, or Path; e.g., "/tmp/ofmsim/layout.svg"
pub fn draw_layout<P>(config: &Config, filepath: &P) -> Result<(), StrError>
where
    P: AsRef<OsStr> + ?Sized,
{
    let mut plot = Plot::new();
    for (_, color, points) in layout_outlines(config) {
        let mut canvas = Canvas::new();
        canvas.set_face_color(color).set_edge_color("black");
        canvas.draw_polyline(&points, true);
        plot.add(&canvas);
    }
    plot.set_equal_axes(true)
        .grid_and_labels("x [m]", "y [m]")
        .save(filepath)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
