use clothy::{
    ClothConfig, ClothSimulation, Command, Divergence, NoOpStepObserver, SimulationState,
    StepObserver, Vec3,
};

const FRAME: f64 = 0.016;

fn cloth(resolution: usize) -> ClothSimulation<f64> {
    ClothSimulation::new(ClothConfig::new().with_resolution(resolution)).unwrap()
}

#[derive(Default)]
struct Recorder {
    frames: usize,
    substeps: usize,
    divergences: Vec<Divergence<f64>>,
    last_frame: Vec<Vec3<f64>>,
}

impl StepObserver<f64> for Recorder {
    fn on_substep(&mut self, _substep: usize) {
        self.substeps += 1;
    }

    fn on_divergence(&mut self, divergence: &Divergence<f64>) {
        self.divergences.push(*divergence);
    }

    fn on_frame(&mut self, positions: &[Vec3<f64>], _normals: &[Vec3<f64>]) {
        self.frames += 1;
        self.last_frame = positions.to_vec();
    }
}

#[test]
fn nan_force_halts_before_next_frame() {
    let mut cloth = cloth(6);
    cloth.buffers_mut().forces[4] = Vec3::new(f64::NAN, 0.0, 0.0);

    let found = cloth.check_divergence();
    assert_eq!(found, Some(Divergence::NonFiniteForce { index: 4 }));
    assert!(cloth.diverged());
    assert!(!cloth.clock().is_running());

    let positions = cloth.positions().to_vec();
    let report = cloth.step(FRAME, 1.0, &mut NoOpStepObserver);
    assert_eq!(report.substeps_run, 0);
    assert!(report.diverged);
    assert_eq!(cloth.positions(), &positions[..]);
}

#[test]
fn nan_velocity_halts_mid_frame() {
    let mut cloth = cloth(10);
    cloth.buffers_mut().velocities[7] = Vec3::new(0.0, f64::NAN, 0.0);

    let mut recorder = Recorder::default();
    let report = cloth.step(FRAME, 1.0, &mut recorder);

    assert_eq!(report.substeps_run, 1);
    assert!(report.diverged);
    assert_eq!(recorder.substeps, 1);
    assert_eq!(recorder.frames, 1);
    assert_eq!(recorder.divergences, vec![Divergence::NonFiniteForce { index: 7 }]);
    assert_eq!(cloth.state(), &SimulationState::Halted(Divergence::NonFiniteForce { index: 7 }));
}

#[test]
fn runaway_spring_force_is_detected() {
    let config = ClothConfig::new().with_resolution(10).with_stiffness(400.0);
    let mut cloth = ClothSimulation::<f64>::new(config).unwrap();
    cloth.buffers_mut().positions[33].y += 2.0;

    let report = cloth.step(FRAME, 1.0, &mut NoOpStepObserver);
    assert_eq!(report.substeps_run, 1);
    match cloth.state().divergence() {
        Some(Divergence::ExcessiveForce { index, magnitude }) => {
            assert_eq!(*index, 33);
            assert!(*magnitude > 1000.0);
        }
        other => panic!("expected an excessive force, got {:?}", other),
    }
}

#[test]
fn divergence_is_reported_once() {
    let mut cloth = cloth(6);
    cloth.buffers_mut().forces[2] = Vec3::new(f64::INFINITY, 0.0, 0.0);
    assert!(cloth.check_divergence().is_some());
    assert!(cloth.check_divergence().is_none());
    assert_eq!(cloth.state().divergence(), Some(&Divergence::NonFiniteForce { index: 2 }));
}

#[test]
fn force_continue_resumes_without_reset() {
    let mut cloth = cloth(6);
    cloth.step(FRAME, 1.0, &mut NoOpStepObserver);
    cloth.buffers_mut().forces[1] = Vec3::new(f64::NAN, 0.0, 0.0);
    cloth.check_divergence();
    let halted_at = cloth.positions().to_vec();

    cloth.force_continue();
    assert!(cloth.state().force_run());
    assert!(cloth.diverged());
    assert!(cloth.clock().is_running());

    let report = cloth.step(FRAME, 1.0, &mut NoOpStepObserver);
    assert_eq!(report.substeps_run, 4);
    assert_ne!(cloth.positions(), &halted_at[..]);
}

#[test]
fn start_command_forces_after_divergence() {
    let mut cloth = cloth(6);
    cloth.buffers_mut().forces[0] = Vec3::new(f64::NAN, 0.0, 0.0);
    cloth.check_divergence();

    cloth.apply(Command::Start);
    assert!(cloth.state().force_run());
    assert_eq!(cloth.step(FRAME, 1.0, &mut NoOpStepObserver).substeps_run, 4);
}

#[test]
fn restart_clears_divergence() {
    let mut cloth = cloth(6);
    for _ in 0..5 {
        cloth.step(FRAME, 1.0, &mut NoOpStepObserver);
    }
    cloth.buffers_mut().positions[3] = Vec3::new(f64::NAN, f64::NAN, f64::NAN);
    cloth.check_divergence();
    assert!(cloth.diverged());

    cloth.apply(Command::Restart);
    assert!(!cloth.diverged());
    assert!(!cloth.state().force_run());
    assert!(cloth.clock().is_running());
    assert_eq!(cloth.positions(), cloth.rest_positions());
    assert!(cloth.velocities().iter().all(|v| *v == Vec3::new(0.0, 0.0, 0.0)));
    assert_eq!(cloth.step(FRAME, 1.0, &mut NoOpStepObserver).substeps_run, 4);
}

#[test]
fn renderer_sees_one_frame_per_step() {
    let mut cloth = cloth(8);
    let mut recorder = Recorder::default();
    for _ in 0..12 {
        cloth.step(FRAME, 1.0, &mut recorder);
    }
    assert_eq!(recorder.frames, 12);
    assert_eq!(recorder.substeps, 48);
    assert!(recorder.divergences.is_empty());
    assert_eq!(recorder.last_frame, cloth.positions());
}
