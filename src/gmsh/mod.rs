//! Implements the geometry and mesh-size directives written as a gmsh script

mod geometry;
mod mesh_control;
mod model;
pub use crate::gmsh::geometry::*;
pub use crate::gmsh::mesh_control::*;
pub use crate::gmsh::model::*;
