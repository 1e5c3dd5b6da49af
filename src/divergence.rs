//! Detection of numerical divergence in the particle buffers.

use crate::float::Float;
use crate::particle::ParticleBuffers;
use crate::vec::Vec;
use core::fmt;

/// Force magnitude above which a particle is considered runaway.
pub const DEFAULT_FORCE_THRESHOLD: f32 = 1000.0;

/// What the monitor found, and where.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Divergence<F: Float> {
    /// The force magnitude of a particle is NaN or infinite.
    NonFiniteForce { index: usize },
    /// The force magnitude of a particle exceeds the threshold.
    ExcessiveForce { index: usize, magnitude: F },
    /// A position component of a particle is NaN or infinite.
    NonFinitePosition { index: usize },
}

impl<F: Float> Divergence<F> {
    pub fn index(&self) -> usize {
        match *self {
            Divergence::NonFiniteForce { index }
            | Divergence::ExcessiveForce { index, .. }
            | Divergence::NonFinitePosition { index } => index,
        }
    }
}

impl<F: Float> fmt::Display for Divergence<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Divergence::NonFiniteForce { index } => {
                write!(f, "NaN in forces at particle {}", index)
            }
            Divergence::ExcessiveForce { index, magnitude } => {
                write!(f, "strong force magnitude {} at particle {}", magnitude, index)
            }
            Divergence::NonFinitePosition { index } => {
                write!(f, "NaN in positions at particle {}", index)
            }
        }
    }
}

/// Scans force and position buffers after every substep.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DivergenceMonitor<F: Float> {
    pub force_threshold: F,
}

impl<F: Float> DivergenceMonitor<F> {
    pub fn new(force_threshold: F) -> Self {
        DivergenceMonitor { force_threshold }
    }

    /// First divergent particle in index order, if any.
    ///
    /// Only detects; correcting the state is left to the caller.
    pub fn scan(&self, buffers: &ParticleBuffers<F>) -> Option<Divergence<F>> {
        let found = buffers
            .forces
            .iter()
            .zip(buffers.positions.iter())
            .enumerate()
            .find_map(|(index, (force, position))| {
                let magnitude = force.length();
                if !magnitude.is_finite() {
                    Some(Divergence::NonFiniteForce { index })
                } else if magnitude > self.force_threshold {
                    Some(Divergence::ExcessiveForce { index, magnitude })
                } else if !position.is_finite() {
                    Some(Divergence::NonFinitePosition { index })
                } else {
                    None
                }
            });

        if let Some(divergence) = &found {
            log::error!("simulation diverged: {}", divergence);
        }
        found
    }
}

impl<F: Float> Default for DivergenceMonitor<F> {
    fn default() -> Self {
        Self::new(F::from_f32(DEFAULT_FORCE_THRESHOLD))
    }
}
