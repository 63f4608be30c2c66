//! Thermal simulation driver for the Open Flow Meter
//!
//! The Open Flow Meter (OFM) is a small gas-flow sensor: a PT100 temperature probe
//! sitting in the gas channel of a stainless steel pipe. This crate writes the
//! geometry of that setup as a gmsh script, meshes it with gmsh, converts the mesh
//! with ElmerGrid, writes an Elmer solver input file, and runs ElmerSolver to obtain
//! the steady temperature field. All numerical work happens in those external tools.

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

pub mod base;
pub mod elmer;
pub mod flow_meter;
pub mod gmsh;
pub mod layout_figure;
pub mod prelude;
