//! Grid-shaped particle state and explicit integration.

use crate::float::Float;
use crate::vec::{Vec, Vec3};
use alloc::vec;
use alloc::vec::Vec as AllocVec;

/// Per-particle state of the cloth, stored as parallel buffers.
///
/// All three buffers share the grid indexing `row * N + col` and always have
/// the same length. Positions and velocities persist across frames; forces
/// are overwritten every substep.
#[derive(Clone, Debug)]
pub struct ParticleBuffers<F: Float> {
    pub positions: AllocVec<Vec3<F>>,
    pub velocities: AllocVec<Vec3<F>>,
    pub forces: AllocVec<Vec3<F>>,
}

impl<F: Float> ParticleBuffers<F> {
    /// Particles at the given rest positions with zero velocity and force.
    pub fn at_rest(rest: &[Vec3<F>]) -> Self {
        ParticleBuffers {
            positions: rest.to_vec(),
            velocities: vec![Vec3::zero(); rest.len()],
            forces: vec![Vec3::zero(); rest.len()],
        }
    }

    /// Restore the rest state in place without reallocating.
    pub fn reset_to(&mut self, rest: &[Vec3<F>]) {
        self.positions.clear();
        self.positions.extend_from_slice(rest);
        self.velocities.clear();
        self.velocities.resize(rest.len(), Vec3::zero());
        self.forces.clear();
        self.forces.resize(rest.len(), Vec3::zero());
    }

    pub fn len(&self) -> usize { self.positions.len() }

    pub fn is_empty(&self) -> bool { self.positions.is_empty() }

    /// Semi-implicit Euler: `v += h * f / m`, then `p += h * v`.
    pub fn integrate(&mut self, h: F, mass_per_particle: F) {
        let inv_mass = F::one() / mass_per_particle;
        for ((p, v), f) in self
            .positions
            .iter_mut()
            .zip(self.velocities.iter_mut())
            .zip(self.forces.iter())
        {
            *v = *v + f.scale(h * inv_mass);
            *p = *p + v.scale(h);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_particles() -> ParticleBuffers<f32> {
        ParticleBuffers::at_rest(&[Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 0.0)])
    }

    #[test]
    fn starts_at_rest() {
        let buffers = two_particles();
        assert_eq!(buffers.len(), 2);
        assert!(buffers.velocities.iter().all(|v| *v == Vec3::zero()));
        assert!(buffers.forces.iter().all(|f| *f == Vec3::zero()));
    }

    #[test]
    fn velocity_updates_before_position() {
        let mut buffers = two_particles();
        buffers.forces[0] = Vec3::new(0.0, -2.0, 0.0);
        buffers.integrate(0.1, 0.5);
        // v = 0 + 0.1 * (-2 / 0.5) = -0.4, p = 1 + 0.1 * -0.4 = 0.96
        assert!((buffers.velocities[0].y + 0.4).abs() < 1e-6);
        assert!((buffers.positions[0].y - 0.96).abs() < 1e-6);
        assert_eq!(buffers.positions[1], Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn reset_clears_motion() {
        let mut buffers = two_particles();
        buffers.velocities[1] = Vec3::new(3.0, 0.0, 0.0);
        buffers.forces[1] = Vec3::new(1.0, 1.0, 1.0);
        buffers.positions[1] = Vec3::new(9.0, 9.0, 9.0);
        buffers.reset_to(&[Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 0.0)]);
        assert_eq!(buffers.positions[1], Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(buffers.velocities[1], Vec3::zero());
        assert_eq!(buffers.forces[1], Vec3::zero());
    }
}
