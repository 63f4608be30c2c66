use ofmsim::base::{Config, FilePath};
use ofmsim::elmer;
use ofmsim::flow_meter::FlowMeter;
use ofmsim::layout_figure::draw_layout;
use ofmsim::StrError;
use std::path::Path;
use structopt::StructOpt;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "ofm_thermal",
    about = "Thermal simulation of the Open Flow Meter using gmsh and Elmer"
)]
struct Options {
    /// Directory where the simulation files are written
    #[structopt(long, default_value = "simdata")]
    sim_dir: String,

    /// JSON file overriding the reference case parameters
    #[structopt(long)]
    config: Option<String>,

    /// Only generate the mesh
    #[structopt(long)]
    mesh_only: bool,

    /// Only write the input files (runs no external program)
    #[structopt(long)]
    dry_run: bool,

    /// Open the gmsh viewer with the mesh (or the geometry)
    #[structopt(long)]
    show: bool,

    /// Save a figure with the layout (e.g., layout.svg)
    #[structopt(long)]
    figure: Option<String>,
}

fn main() -> Result<(), StrError> {
    env_logger::init();

    // parse options
    let options = Options::from_args();

    // case parameters
    let config = match &options.config {
        Some(path) => Config::read_json(path)?,
        None => Config::new(),
    };
    println!("{}", config);
    let ofm = FlowMeter::new(config)?;
    let sim_dir = Path::new(&options.sim_dir);

    // figure
    if let Some(path) = &options.figure {
        draw_layout(&ofm.config, path)?;
    }

    // write files and run the engines
    if options.dry_run {
        ofm.write_inputs(sim_dir)?;
    } else if options.mesh_only {
        ofm.mesh(sim_dir)?;
    } else {
        let log = ofm.run(sim_dir)?;
        println!("\n{}", log);
        if !log.success() {
            log::warn!("the solver did not finish successfully; see {}", FilePath::new(sim_dir).solver_log().display());
        }
    }
    if options.show {
        elmer::show_gmsh(&ofm.config.executables.gmsh, sim_dir)?;
    }

    // message
    let path = sim_dir.display().to_string();
    let thin_line = format!("{:─^1$}", "", path.len());
    println!("\n{}", thin_line);
    println!("simulation files written to:");
    println!("{}", path);
    println!("{}\n", thin_line);
    Ok(())
}
