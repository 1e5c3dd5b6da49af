//! Force model: gravity, drag, wind and springs.
//!
//! Every substep overwrites the force buffer from scratch. Gravity assigns,
//! all other terms accumulate. No term attempts to recover from bad input;
//! non-finite values are left for the divergence monitor.

use crate::float::Float;
use crate::grid::GridTopology;
use crate::particle::ParticleBuffers;
use crate::spring::{spring_force, STENCIL};
use crate::vec::{Vec, Vec3};

/// Standard gravity along -Y.
pub const GRAVITY: f32 = -9.81;

/// Scale applied to the wind force after projecting onto the surface normal.
pub const WIND_COUPLING: f32 = 0.001;

/// Angular rate of the wind gust oscillation, in radians per second.
pub const WIND_GUST_RATE: f32 = 0.1;

/// Scalars consumed by [`compute_forces`] for one substep.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ForceParams<F: Float> {
    pub mass_per_particle: F,
    pub stiffness: F,
    pub damping: F,
    /// Current wind strength; the wind blows along -X.
    pub wind_magnitude: F,
}

/// Gusting wind strength for a frame of length `elapsed`:
/// `base + base / 2 * sin(0.1 * elapsed)`.
pub fn wind_magnitude<F: Float>(base: F, elapsed: F) -> F {
    base + base * F::half() * (F::from_f32(WIND_GUST_RATE) * elapsed).sin()
}

/// Overwrite `buffers.forces` for every particle.
pub fn compute_forces<F: Float>(
    topology: &GridTopology,
    buffers: &mut ParticleBuffers<F>,
    params: &ForceParams<F>,
) {
    let weight = Vec3::new(F::zero(), F::from_f32(GRAVITY), F::zero()).scale(params.mass_per_particle);
    for (f, v) in buffers.forces.iter_mut().zip(buffers.velocities.iter()) {
        *f = weight - v.scale(params.damping);
    }

    if params.wind_magnitude != F::zero() {
        apply_wind(topology, buffers, params.wind_magnitude);
    }

    apply_springs(topology, buffers, params.stiffness);
}

fn apply_wind<F: Float>(topology: &GridTopology, buffers: &mut ParticleBuffers<F>, magnitude: F) {
    let wind = Vec3::new(-magnitude, F::zero(), F::zero());
    let direction = wind.normalize();
    let coupling = F::from_f32(WIND_COUPLING);
    let n = topology.resolution();

    for row in 0..n {
        for col in 0..n {
            let Some(normal) = surface_normal_estimate(topology, &buffers.positions, row, col) else {
                continue;
            };
            let k = topology.index(row, col);
            buffers.forces[k] = buffers.forces[k] + wind.scale(coupling * direction.dot(normal));
        }
    }
}

/// Averaged surface normal at `(row, col)` used for wind coupling.
///
/// Each available (up|down, left|right) neighbor pair contributes the
/// normalized cross product of the two normalized edge vectors, flipped so
/// its X component is not positive. Returns `None` when no pair is on the
/// grid.
pub fn surface_normal_estimate<F: Float>(
    topology: &GridTopology,
    positions: &[Vec3<F>],
    row: usize,
    col: usize,
) -> Option<Vec3<F>> {
    let current = positions[topology.index(row, col)];
    let mut sum = Vec3::zero();
    let mut count = 0usize;

    for di in [-1isize, 1] {
        let Some(vertical) = topology.offset(row, col, di, 0) else {
            continue;
        };
        for dj in [-1isize, 1] {
            let Some(horizontal) = topology.offset(row, col, 0, dj) else {
                continue;
            };
            let a = (positions[vertical] - current).normalize();
            let b = (positions[horizontal] - current).normalize();
            let mut estimate = a.cross(b).normalize();
            if estimate.x > F::zero() {
                estimate = -estimate;
            }
            sum = sum + estimate;
            count += 1;
        }
    }

    if count == 0 {
        return None;
    }
    Some(sum.scale(F::one() / F::from_f32(count as f32)))
}

fn apply_springs<F: Float>(topology: &GridTopology, buffers: &mut ParticleBuffers<F>, stiffness: F) {
    let l0: F = topology.rest_length();
    let n = topology.resolution();

    for row in 0..n {
        for col in 0..n {
            let k = topology.index(row, col);
            let p = buffers.positions[k];
            let mut total = Vec3::zero();
            for &(di, dj, kind) in STENCIL.iter() {
                if let Some(neighbor) = topology.offset(row, col, di, dj) {
                    total = total + spring_force(p, buffers.positions[neighbor], kind.rest_length(l0), stiffness);
                }
            }
            buffers.forces[k] = buffers.forces[k] + total;
        }
    }
}
