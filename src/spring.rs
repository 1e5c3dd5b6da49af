//! Implicit spring network over the particle grid.
//!
//! Springs are never stored. Each particle looks at a fixed stencil of grid
//! offsets and classifies every in-bounds neighbor as a structural, shear or
//! bending spring, which fixes the rest length of that edge.

use crate::float::Float;
use crate::vec::{Vec, Vec3};

/// Kind of spring connecting a particle to a stencil neighbor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpringKind {
    /// Horizontal or vertical neighbor, rest length `L0`.
    Structural,
    /// Diagonal neighbor, rest length `L0 * sqrt(2)`.
    Shear,
    /// Skip-one horizontal or vertical neighbor, rest length `2 * L0`.
    Bending,
}

/// Offsets `(di, dj)` of every spring leaving a particle.
pub const STENCIL: [(isize, isize, SpringKind); 12] = [
    (-1, 0, SpringKind::Structural),
    (1, 0, SpringKind::Structural),
    (0, -1, SpringKind::Structural),
    (0, 1, SpringKind::Structural),
    (-1, -1, SpringKind::Shear),
    (-1, 1, SpringKind::Shear),
    (1, -1, SpringKind::Shear),
    (1, 1, SpringKind::Shear),
    (-2, 0, SpringKind::Bending),
    (2, 0, SpringKind::Bending),
    (0, -2, SpringKind::Bending),
    (0, 2, SpringKind::Bending),
];

impl SpringKind {
    /// Classify a grid offset within the 5x5 neighborhood.
    ///
    /// Returns `None` for the center, for the knight moves `(±2,±1)` and
    /// `(±1,±2)`, for the far diagonals `(±2,±2)`, and for anything further
    /// than two cells away.
    pub fn classify(di: isize, dj: isize) -> Option<SpringKind> {
        match (di.abs(), dj.abs()) {
            (0, 1) | (1, 0) => Some(SpringKind::Structural),
            (1, 1) => Some(SpringKind::Shear),
            (0, 2) | (2, 0) => Some(SpringKind::Bending),
            _ => None,
        }
    }

    pub fn rest_length<F: Float>(self, l0: F) -> F {
        match self {
            SpringKind::Structural => l0,
            SpringKind::Shear => (F::two() * l0 * l0).sqrt(),
            SpringKind::Bending => F::two() * l0,
        }
    }
}

/// Force exerted on `particle` by a spring towards `neighbor`.
///
/// `K * (L - rest) * d / L` with `d = neighbor - particle`. Coincident
/// particles contribute nothing instead of dividing by zero.
pub fn spring_force<F: Float>(particle: Vec3<F>, neighbor: Vec3<F>, rest: F, stiffness: F) -> Vec3<F> {
    let d = neighbor - particle;
    let length = d.length();
    if length.is_near_zero(F::from_f32(1e-12)) {
        return Vec3::zero();
    }
    d.scale(stiffness * (length - rest) / length)
}
