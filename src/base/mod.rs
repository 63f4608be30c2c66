//! Implements the parameters, configuration, and file paths of the flow meter case

mod config;
mod constants;
mod filepath;
mod parameters;
pub use crate::base::config::*;
pub use crate::base::constants::*;
pub use crate::base::filepath::*;
pub use crate::base::parameters::*;
