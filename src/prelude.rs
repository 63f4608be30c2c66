//! Makes available common structures needed to run the flow meter simulation
//!
//! You may write `use ofmsim::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::base::{Config, Executables, FilePath, DEFAULT_SIM_DIR, DEFAULT_TEST_DIR};
pub use crate::base::{ParamMaterial, ParamMesh, ParamPipe, ParamProbe, ParamRefinement, ParamTemperatures};
pub use crate::elmer::{Simulation, SolverLog, Value};
pub use crate::flow_meter::FlowMeter;
pub use crate::gmsh::{MeshControl, Model, Rectangle, Side};
pub use crate::StrError;
