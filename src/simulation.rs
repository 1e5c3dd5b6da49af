//! Frame driver: fixed substeps, divergence halting and the renderer hand-off.

use crate::clock::Clock;
use crate::collision::CollisionShapes;
use crate::config::{ClothConfig, UserParameters};
use crate::constraint::PositionalConstraints;
use crate::divergence::{Divergence, DivergenceMonitor};
use crate::error::ClothError;
use crate::float::Float;
use crate::force::{compute_forces, wind_magnitude, ForceParams};
use crate::grid::GridTopology;
use crate::normal::vertex_normals;
use crate::observer::StepObserver;
use crate::particle::ParticleBuffers;
use crate::vec::{Vec, Vec3};
use alloc::vec;
use alloc::vec::Vec as AllocVec;

/// Whether the driver advances the cloth.
///
/// `Running --divergence--> Halted --force_continue--> Forced`.
/// Reinitialization returns to `Running` from anywhere.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SimulationState<F: Float> {
    Running,
    /// Stopped by the divergence monitor.
    Halted(Divergence<F>),
    /// Running again past a latched divergence at the user's request.
    Forced(Divergence<F>),
}

impl<F: Float> SimulationState<F> {
    pub fn diverged(&self) -> bool {
        !matches!(self, SimulationState::Running)
    }

    pub fn force_run(&self) -> bool {
        matches!(self, SimulationState::Forced(_))
    }

    pub fn divergence(&self) -> Option<&Divergence<F>> {
        match self {
            SimulationState::Running => None,
            SimulationState::Halted(d) | SimulationState::Forced(d) => Some(d),
        }
    }

    fn may_advance(&self) -> bool {
        !matches!(self, SimulationState::Halted(_))
    }
}

/// Discrete commands from the control surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start the clock; after a divergence this also forces the run.
    Start,
    /// Stop the clock.
    Stop,
    /// Return the sheet to its rest state.
    Restart,
}

/// Outcome of one [`ClothSimulation::step`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameReport<F: Float> {
    /// Substeps actually executed this frame.
    pub substeps_run: usize,
    /// Substep length used, zero when physics was skipped.
    pub h: F,
    pub diverged: bool,
}

/// Explicit mass-spring cloth over an `N x N` particle grid.
///
/// # Example
/// ```
/// use clothy::{ClothConfig, ClothSimulation, NoOpStepObserver};
///
/// let config: ClothConfig<f32> = ClothConfig::new().with_resolution(10);
/// let mut cloth = ClothSimulation::new(config).unwrap();
/// for _ in 0..10 {
///     cloth.step(1.0 / 60.0, 1.0, &mut NoOpStepObserver);
/// }
/// assert!(!cloth.diverged());
/// ```
pub struct ClothSimulation<F: Float> {
    config: ClothConfig<F>,
    topology: GridTopology,
    rest: AllocVec<Vec3<F>>,
    buffers: ParticleBuffers<F>,
    normals: AllocVec<Vec3<F>>,
    constraints: PositionalConstraints<F>,
    shapes: CollisionShapes<F>,
    monitor: DivergenceMonitor<F>,
    parameters: UserParameters<F>,
    mass_per_particle: F,
    state: SimulationState<F>,
    clock: Clock<F>,
}

impl<F: Float> ClothSimulation<F> {
    /// Build a flat rest sheet from `config`.
    pub fn new(config: ClothConfig<F>) -> Result<Self, ClothError> {
        config.validate()?;
        let topology = GridTopology::new(config.resolution)?;
        let rest = config.layout.rest_positions(&topology);
        let constraints = PositionalConstraints::from_rest(&config.pinned_indices(), &rest)?;
        let buffers = ParticleBuffers::at_rest(&rest);
        let mut normals = vec![Vec3::zero(); rest.len()];
        vertex_normals(&topology, &buffers.positions, &mut normals);

        let parameters = config.parameters;
        let mass_per_particle = parameters.mass / F::from_f32(topology.particle_count() as f32);
        let rest_length: F = topology.rest_length();
        log::info!(
            "cloth initialized: {} particles, {} pins, L0={}, m={}",
            topology.particle_count(),
            constraints.len(),
            rest_length,
            mass_per_particle,
        );

        Ok(ClothSimulation {
            shapes: config.collision_shapes(),
            monitor: DivergenceMonitor::new(config.force_threshold),
            config,
            topology,
            rest,
            buffers,
            normals,
            constraints,
            parameters,
            mass_per_particle,
            state: SimulationState::Running,
            clock: Clock::new(),
        })
    }

    /// Replace the whole setup and return to the rest state.
    ///
    /// On error the current simulation is left untouched.
    pub fn initialize(&mut self, config: ClothConfig<F>) -> Result<(), ClothError> {
        *self = Self::new(config)?;
        Ok(())
    }

    /// Return to the rest state keeping the setup and the live parameters.
    pub fn restart(&mut self) {
        self.buffers.reset_to(&self.rest);
        vertex_normals(&self.topology, &self.buffers.positions, &mut self.normals);
        self.state = SimulationState::Running;
        self.clock.reset();
        log::info!("cloth restarted");
    }

    /// Advance one displayed frame.
    ///
    /// Physics is skipped when the clock is stopped, when `elapsed` is not
    /// finite or below the minimum frame time, or while halted. Otherwise the
    /// configured number of substeps of length `time_scale * base_step` run
    /// in order forces, integration, collision, pins, normals, divergence
    /// check, stopping early if the check halts the simulation. The wind gust
    /// phase follows `elapsed`. The observer receives the final buffers once,
    /// at the end.
    pub fn step<O: StepObserver<F>>(&mut self, elapsed: F, time_scale: F, observer: &mut O) -> FrameReport<F> {
        let elapsed = self.clock.advance(elapsed);
        let h = if !elapsed.is_finite() || elapsed <= self.config.min_frame_time {
            F::zero()
        } else {
            time_scale * self.config.base_step
        };

        let mut substeps_run = 0;
        if h > F::zero() {
            for substep in 0..self.config.substeps {
                if !self.state.may_advance() {
                    break;
                }
                self.substep(h, elapsed);
                substeps_run += 1;
                if let Some(divergence) = self.check_divergence() {
                    observer.on_divergence(&divergence);
                }
                observer.on_substep(substep);
            }
        }

        observer.on_frame(&self.buffers.positions, &self.normals);
        FrameReport { substeps_run, h, diverged: self.diverged() }
    }

    fn substep(&mut self, h: F, elapsed: F) {
        let params = ForceParams {
            mass_per_particle: self.mass_per_particle,
            stiffness: self.parameters.stiffness,
            damping: self.parameters.damping,
            wind_magnitude: wind_magnitude(self.parameters.wind, elapsed),
        };
        compute_forces(&self.topology, &mut self.buffers, &params);
        self.buffers.integrate(h, self.mass_per_particle);
        self.shapes.resolve(
            &mut self.buffers.positions,
            &mut self.buffers.velocities,
            self.mass_per_particle,
        );
        self.constraints.enforce(&mut self.buffers.positions);
        vertex_normals(&self.topology, &self.buffers.positions, &mut self.normals);
    }

    /// Run the divergence monitor now and halt on a finding.
    ///
    /// Does nothing once a divergence is latched; the first finding is kept
    /// until a restart.
    pub fn check_divergence(&mut self) -> Option<Divergence<F>> {
        if self.state.diverged() {
            return None;
        }
        let divergence = self.monitor.scan(&self.buffers)?;
        self.state = SimulationState::Halted(divergence);
        self.clock.stop();
        log::warn!("simulation halted at particle {}; force or restart to continue", divergence.index());
        Some(divergence)
    }

    /// Resume after a divergence halt without resetting the sheet.
    pub fn force_continue(&mut self) {
        if let SimulationState::Halted(divergence) = self.state {
            log::debug!("forcing simulation past divergence: {}", divergence);
            self.state = SimulationState::Forced(divergence);
        }
        self.clock.start();
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Start => {
                if self.state.diverged() {
                    self.force_continue();
                }
                self.clock.start();
            }
            Command::Stop => self.clock.stop(),
            Command::Restart => self.restart(),
        }
    }

    /// Update the live parameters; the per-particle mass follows the new
    /// global mass immediately.
    pub fn set_parameters(&mut self, parameters: UserParameters<F>) -> Result<(), ClothError> {
        parameters.validate()?;
        self.parameters = parameters;
        self.mass_per_particle = parameters.mass / F::from_f32(self.topology.particle_count() as f32);
        Ok(())
    }

    pub fn positions(&self) -> &[Vec3<F>] { &self.buffers.positions }
    pub fn velocities(&self) -> &[Vec3<F>] { &self.buffers.velocities }
    pub fn forces(&self) -> &[Vec3<F>] { &self.buffers.forces }
    pub fn normals(&self) -> &[Vec3<F>] { &self.normals }
    pub fn rest_positions(&self) -> &[Vec3<F>] { &self.rest }

    /// Raw state access for tools that perturb the sheet between frames.
    pub fn buffers_mut(&mut self) -> &mut ParticleBuffers<F> { &mut self.buffers }

    pub fn diverged(&self) -> bool { self.state.diverged() }
    pub fn state(&self) -> &SimulationState<F> { &self.state }
    pub fn clock(&self) -> &Clock<F> { &self.clock }
    pub fn config(&self) -> &ClothConfig<F> { &self.config }
    pub fn topology(&self) -> &GridTopology { &self.topology }
    pub fn constraints(&self) -> &PositionalConstraints<F> { &self.constraints }
    pub fn shapes(&self) -> &CollisionShapes<F> { &self.shapes }
    pub fn parameters(&self) -> &UserParameters<F> { &self.parameters }
    pub fn mass_per_particle(&self) -> F { self.mass_per_particle }
    pub fn rest_length(&self) -> F { self.topology.rest_length() }
    pub fn particle_count(&self) -> usize { self.topology.particle_count() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoOpStepObserver;

    fn small() -> ClothSimulation<f32> {
        ClothSimulation::new(ClothConfig::new().with_resolution(5)).unwrap()
    }

    #[test]
    fn derived_parameters() {
        let cloth = small();
        assert!((cloth.mass_per_particle() - 5.0 / 25.0).abs() < 1e-6);
        assert!((cloth.rest_length() - 0.25).abs() < 1e-6);
        assert_eq!(cloth.constraints().len(), 2);
        assert!(cloth.constraints().get(0).is_some());
        assert!(cloth.constraints().get(20).is_some());
    }

    #[test]
    fn tiny_frame_skips_physics() {
        let mut cloth = small();
        let report = cloth.step(1e-7, 1.0, &mut NoOpStepObserver);
        assert_eq!(report.substeps_run, 0);
        assert_eq!(report.h, 0.0);
        assert_eq!(cloth.positions(), cloth.rest_positions());
    }

    #[test]
    fn non_finite_frame_skips_physics() {
        let mut cloth = small();
        for elapsed in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let report = cloth.step(elapsed, 1.0, &mut NoOpStepObserver);
            assert_eq!(report.substeps_run, 0);
            assert_eq!(report.h, 0.0);
        }
        assert_eq!(cloth.positions(), cloth.rest_positions());

        let mut windy = ClothSimulation::new(ClothConfig::new().with_resolution(5).with_wind(50.0)).unwrap();
        windy.step(f32::NAN, 1.0, &mut NoOpStepObserver);
        for _ in 0..10 {
            windy.step(0.016, 1.0, &mut NoOpStepObserver);
        }
        assert!(!windy.diverged());
        assert!(windy.positions().iter().all(|p| p.is_finite()));
    }

    #[test]
    fn substep_length_follows_time_scale() {
        let mut cloth = small();
        let report = cloth.step(0.016, 0.5, &mut NoOpStepObserver);
        assert_eq!(report.substeps_run, 4);
        assert!((report.h - 0.0005).abs() < 1e-9);
    }

    #[test]
    fn stopped_clock_freezes_the_sheet() {
        let mut cloth = small();
        cloth.apply(Command::Stop);
        let report = cloth.step(0.016, 1.0, &mut NoOpStepObserver);
        assert_eq!(report.substeps_run, 0);
        cloth.apply(Command::Start);
        assert_eq!(cloth.step(0.016, 1.0, &mut NoOpStepObserver).substeps_run, 4);
    }

    #[test]
    fn mass_change_updates_particle_mass() {
        let mut cloth = small();
        let mut parameters = *cloth.parameters();
        parameters.mass = 10.0;
        cloth.set_parameters(parameters).unwrap();
        assert!((cloth.mass_per_particle() - 0.4).abs() < 1e-6);

        parameters.mass = 0.0;
        assert_eq!(cloth.set_parameters(parameters), Err(ClothError::InvalidMass));
        assert!((cloth.mass_per_particle() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn failed_initialize_keeps_current_setup() {
        let mut cloth = small();
        let bad = ClothConfig::new().with_resolution(0);
        assert!(cloth.initialize(bad).is_err());
        assert_eq!(cloth.particle_count(), 25);
    }
}
