//! Driving clock of the simulation.

use crate::float::Float;
use core::marker::PhantomData;

/// Start/stop switch that gates the frame time reaching the simulation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Clock<F: Float> {
    running: bool,
    _scalar: PhantomData<F>,
}

impl<F: Float> Clock<F> {
    pub fn new() -> Self {
        Clock { running: true, _scalar: PhantomData }
    }

    pub fn start(&mut self) {
        if !self.running {
            log::debug!("clock started");
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        if self.running {
            log::debug!("clock stopped");
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool { self.running }

    /// Elapsed time as seen by the simulation: zero while stopped.
    pub fn advance(&self, elapsed: F) -> F {
        if self.running { elapsed } else { F::zero() }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl<F: Float> Default for Clock<F> {
    fn default() -> Self {
        Self::new()
    }
}
