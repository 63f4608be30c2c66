//! Implements the Elmer solver input file, the execution of the engines, and the log scanning

mod execute;
mod keywords;
mod simulation;
mod solver_log;
pub use crate::elmer::execute::*;
pub use crate::elmer::keywords::*;
pub use crate::elmer::simulation::*;
pub use crate::elmer::solver_log::*;
