//! Explicit mass-spring cloth simulation.
//!
//! `clothy` advances a square particle grid under gravity, drag, a gusting
//! wind and an implicit spring network (structural, shear and bending
//! springs), resolves collisions against a ground plane and a sphere, holds
//! pinned particles in place, and watches its own buffers for numerical
//! divergence so runaway values never reach the renderer.
//!
//! # Features
//!
//! - **Fixed substeps**: semi-implicit Euler, a fixed number of substeps per frame
//! - **Implicit springs**: neighbors classified on the fly from a 5x5 stencil
//! - **Collision**: ground clamp and an empirically tuned sphere response
//! - **Pins**: hard positional constraints enforced after collision
//! - **Divergence halting**: NaN and runaway forces stop the clock until forced or restarted
//! - **Observable**: single renderer hand-off per frame via the `StepObserver` trait
//! - **`no_std` compatible**: Works in embedded and WASM environments

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod grid;
pub mod particle;
pub mod spring;
pub mod force;
pub mod collision;
pub mod constraint;
pub mod normal;
pub mod divergence;
pub mod clock;
pub mod simulation;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::{Vec, Vec3};
pub use grid::{GridTopology, GridLayout};
pub use particle::ParticleBuffers;
pub use spring::{SpringKind, STENCIL};
pub use force::{ForceParams, compute_forces, surface_normal_estimate, wind_magnitude};
pub use collision::{CollisionShapes, Ground, Sphere};
pub use constraint::PositionalConstraints;
pub use normal::vertex_normals;
pub use divergence::{Divergence, DivergenceMonitor};
pub use clock::Clock;
pub use simulation::{ClothSimulation, Command, FrameReport, SimulationState};
pub use config::{ClothConfig, UserParameters};
pub use observer::{StepObserver, NoOpStepObserver};
pub use error::ClothError;
