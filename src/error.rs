//! Error types for cloth setup and parameter updates.

use core::fmt;

/// Errors that can occur while configuring a cloth simulation.
///
/// These surface from [`ClothSimulation::new`](crate::ClothSimulation::new),
/// [`ClothSimulation::initialize`](crate::ClothSimulation::initialize) and
/// [`ClothSimulation::set_parameters`](crate::ClothSimulation::set_parameters).
/// Numerical trouble during a step is never an error; it latches a
/// [`Divergence`](crate::Divergence) instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ClothError {
    /// Grid must have at least 2 particles per side.
    InvalidGridResolution { resolution: usize },
    /// Sphere radius must be positive and finite.
    InvalidSphereRadius,
    /// Global mass must be positive and finite.
    InvalidMass,
    /// Stiffness must be non-negative and finite.
    InvalidStiffness,
    /// Damping must be non-negative and finite.
    InvalidDamping,
    /// A scalar parameter is NaN or infinite.
    NonFiniteParameter { name: &'static str },
    /// Pinned particle index is out of bounds.
    PinOutOfBounds { index: usize, count: usize },
    /// At least one substep per frame is required.
    InvalidSubsteps,
}

impl fmt::Display for ClothError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClothError::InvalidGridResolution { resolution } => {
                write!(f, "grid resolution must be at least 2, got {}", resolution)
            }
            ClothError::InvalidSphereRadius => write!(f, "sphere radius must be positive and finite"),
            ClothError::InvalidMass => write!(f, "mass must be positive and finite"),
            ClothError::InvalidStiffness => write!(f, "stiffness must be non-negative and finite"),
            ClothError::InvalidDamping => write!(f, "damping must be non-negative and finite"),
            ClothError::NonFiniteParameter { name } => write!(f, "parameter `{}` is not finite", name),
            ClothError::PinOutOfBounds { index, count } => {
                write!(f, "pinned particle index {} out of bounds (count: {})", index, count)
            }
            ClothError::InvalidSubsteps => write!(f, "at least one substep per frame is required"),
        }
    }
}
