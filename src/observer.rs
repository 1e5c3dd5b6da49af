//! Step observer trait: the renderer hand-off and simulation progress hooks.

use crate::divergence::Divergence;
use crate::float::Float;
use crate::vec::Vec3;

/// Trait for observing cloth simulation frames.
///
/// A renderer implements [`on_frame`](StepObserver::on_frame), which is
/// called exactly once per [`step`](crate::ClothSimulation::step) after all
/// substeps have finished, so it never sees a partially updated buffer.
/// All methods have default no-op implementations.
pub trait StepObserver<F: Float> {
    /// Called after each completed substep.
    fn on_substep(&mut self, _substep: usize) {}

    /// Called when the divergence monitor halts the simulation.
    fn on_divergence(&mut self, _divergence: &Divergence<F>) {}

    /// Called once per frame with the settled positions and normals.
    fn on_frame(&mut self, _positions: &[Vec3<F>], _normals: &[Vec3<F>]) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl<F: Float> StepObserver<F> for NoOpStepObserver {}
