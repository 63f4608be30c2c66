use crate::StrError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines mesh-size directives, written as gmsh fields
///
/// All controls of a model are combined by a `Min` background field.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub enum MeshControl {
    /// Constant element size inside the given shapes
    Constant {
        /// Element size
        size: f64,

        /// Names of the shapes (bodies or boundaries)
        shapes: Vec<String>,
    },

    /// Element size growing with the distance `d` from a boundary shape: `size + factor * d^exponent`
    Exponential {
        /// Name of the boundary shape
        shape: String,

        /// Element size on the boundary
        size: f64,

        /// Exponent of the distance
        exponent: f64,

        /// Factor multiplying the distance term
        factor: f64,
    },
}

impl MeshControl {
    /// Allocates a constant control over the given shapes
    pub fn constant(size: f64, shapes: &[&str]) -> Self {
        MeshControl::Constant {
            size,
            shapes: shapes.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Allocates an exponential control around a boundary shape
    pub fn exponential(shape: &str, size: f64, exponent: f64, factor: f64) -> Self {
        MeshControl::Exponential {
            shape: shape.to_string(),
            size,
            exponent,
            factor,
        }
    }

    /// Returns the names of the shapes referenced by this control
    pub fn shape_names(&self) -> Vec<&str> {
        match self {
            MeshControl::Constant { shapes, .. } => shapes.iter().map(|s| s.as_str()).collect(),
            MeshControl::Exponential { shape, .. } => vec![shape.as_str()],
        }
    }

    /// Checks the numeric values
    pub fn validate(&self) -> Result<(), StrError> {
        match self {
            MeshControl::Constant { size, shapes } => {
                if *size <= 0.0 {
                    return Err("mesh size must be > 0.0");
                }
                if shapes.is_empty() {
                    return Err("constant mesh control requires at least one shape");
                }
            }
            MeshControl::Exponential {
                size, exponent, factor, ..
            } => {
                if *size <= 0.0 {
                    return Err("mesh size must be > 0.0");
                }
                if *exponent <= 0.0 || *factor < 0.0 {
                    return Err("exponential mesh control requires exponent > 0 and factor ≥ 0");
                }
            }
        }
        Ok(())
    }

    /// Returns the number of gmsh fields used by this control
    pub(crate) fn n_field(&self) -> usize {
        match self {
            MeshControl::Constant { .. } => 1,
            MeshControl::Exponential { .. } => 2,
        }
    }
}

impl fmt::Display for MeshControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshControl::Constant { size, shapes } => write!(f, "Constant({:?}) on {}", size, shapes.join(", ")),
            MeshControl::Exponential {
                shape,
                size,
                exponent,
                factor,
            } => write!(
                f,
                "Exponential({:?} + {:?}·d^{:?}) around {}",
                size, factor, exponent, shape
            ),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
