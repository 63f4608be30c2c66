use serde::{Deserialize, Serialize};

/// Holds the dimensions of the pipe (Swagelok tube)
///
/// All lengths are in meters. The pipe axis is the x-axis and the 2D model is a
/// longitudinal cut through the axis.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ParamPipe {
    /// Outer diameter OD
    pub outer_diameter: f64,

    /// Inner diameter ID (the width of the gas channel)
    pub inner_diameter: f64,

    /// Length of the modelled section
    pub length: f64,
}

/// Holds the dimensions of the temperature probe (PT100) placed at the center of the gas channel
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ParamProbe {
    /// Extent across the channel (along y)
    pub height: f64,

    /// Extent along the channel (along x)
    pub thickness: f64,
}

/// Holds the thermal properties of a material
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ParamMaterial {
    /// Name of the material section in the solver input file
    pub name: String,

    /// Density in kg/m³
    pub density: f64,

    /// Heat capacity in J/(kg K)
    pub heat_capacity: f64,

    /// Heat conductivity in W/(m K)
    pub heat_conductivity: f64,
}

/// Holds the exponential mesh refinement around the probe
///
/// The element size at distance `d` from the probe boundary is `size + factor * d^exponent`.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ParamRefinement {
    /// Element size on the probe boundary
    pub size: f64,

    /// Exponent of the distance
    pub exponent: f64,

    /// Factor multiplying the distance term
    pub factor: f64,
}

/// Holds the mesh-size directives
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ParamMesh {
    /// Constant element size in the gas channel and the pipe wall
    pub size_bulk: f64,

    /// Constant element size in the probe
    pub size_probe: f64,

    /// Optional exponential refinement around the probe
    pub refinement: Option<ParamRefinement>,
}

/// Holds the initial and prescribed temperatures in K
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ParamTemperatures {
    /// Initial temperature of all bodies
    pub initial: f64,

    /// Temperature of the outer pipe surfaces (laboratory)
    pub lab: f64,

    /// Temperature of the probe surface
    pub probe: f64,

    /// Temperature of the incoming gas; None means an adiabatic inlet
    pub gas_inlet: Option<f64>,
}

/// Holds the names (or paths) of the external programs
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Executables {
    /// Mesh generator
    pub gmsh: String,

    /// Converter from gmsh meshes to the Elmer mesh database
    pub elmer_grid: String,

    /// Finite element solver
    pub elmer_solver: String,
}

impl ParamPipe {
    /// Returns the 6 mm OD / 4 mm ID Swagelok pipe, 100 mm long
    pub fn swagelok_6mm() -> Self {
        ParamPipe {
            outer_diameter: 6e-3,
            inner_diameter: 4e-3,
            length: 100e-3,
        }
    }

    /// Returns the wall thickness (OD - ID) / 2
    pub fn wall_thickness(&self) -> f64 {
        (self.outer_diameter - self.inner_diameter) / 2.0
    }
}

impl ParamProbe {
    /// Returns the dimensions of the PT100 element
    pub fn pt100() -> Self {
        ParamProbe {
            height: 2e-3,
            thickness: 1e-3,
        }
    }
}

impl ParamMaterial {
    /// Returns the properties of argon
    ///
    /// Reference: <https://www.chemie.de/lexikon/Argon.html>
    pub fn argon() -> Self {
        ParamMaterial {
            name: "gas".to_string(),
            density: 1.784,           // kg/m³
            heat_capacity: 520.0,     // J/(kg K)
            heat_conductivity: 0.01772, // W/(m K)
        }
    }

    /// Returns the properties of stainless steel V2A (1.4301)
    ///
    /// Reference: HSM Stahl data sheet 1.4301
    pub fn steel_v2a() -> Self {
        ParamMaterial {
            name: "steel_v2a".to_string(),
            density: 7900.0,        // kg/m³
            heat_capacity: 500.0,   // J/(kg K)
            heat_conductivity: 15.0, // W/(m K)
        }
    }
}

impl ParamMesh {
    /// Returns the mesh sizes of the reference case
    pub fn reference() -> Self {
        ParamMesh {
            size_bulk: 50e-6 * 10.0,
            size_probe: 25e-6 * 10.0,
            refinement: None,
        }
    }
}

impl ParamTemperatures {
    /// Returns the temperatures of the reference case
    pub fn reference() -> Self {
        ParamTemperatures {
            initial: 273.15,
            lab: 293.15,
            probe: 393.15,
            gas_inlet: None,
        }
    }
}

impl Executables {
    /// Returns the program names as found in the PATH
    pub fn from_path() -> Self {
        Executables {
            gmsh: "gmsh".to_string(),
            elmer_grid: "ElmerGrid".to_string(),
            elmer_solver: "ElmerSolver".to_string(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
