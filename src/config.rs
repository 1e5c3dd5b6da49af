//! Configuration types for the cloth simulation.

use crate::collision::{CollisionShapes, Ground, Sphere};
use crate::divergence::DEFAULT_FORCE_THRESHOLD;
use crate::error::ClothError;
use crate::float::Float;
use crate::grid::GridLayout;
use crate::vec::Vec3;
use alloc::vec;
use alloc::vec::Vec as AllocVec;

/// The live knobs a parameter source may change every frame.
///
/// Interactive ranges: stiffness 1–400, mass 1–15, damping 0–0.1,
/// wind 0–400.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UserParameters<F: Float> {
    /// Spring stiffness `K`.
    pub stiffness: F,
    /// Total cloth mass `M`, spread evenly over the particles.
    pub mass: F,
    /// Drag coefficient `μ`.
    pub damping: F,
    /// Base wind strength before gusting.
    pub wind: F,
}

impl<F: Float> UserParameters<F> {
    pub fn validate(&self) -> Result<(), ClothError> {
        for (name, value) in [
            ("stiffness", self.stiffness),
            ("mass", self.mass),
            ("damping", self.damping),
            ("wind", self.wind),
        ] {
            if !value.is_finite() {
                return Err(ClothError::NonFiniteParameter { name });
            }
        }
        if self.mass <= F::zero() {
            return Err(ClothError::InvalidMass);
        }
        if self.stiffness < F::zero() {
            return Err(ClothError::InvalidStiffness);
        }
        if self.damping < F::zero() {
            return Err(ClothError::InvalidDamping);
        }
        Ok(())
    }
}

impl<F: Float> Default for UserParameters<F> {
    fn default() -> Self {
        UserParameters {
            stiffness: F::from_f32(100.0),
            mass: F::from_f32(5.0),
            damping: F::from_f32(0.02),
            wind: F::zero(),
        }
    }
}

/// Everything needed to (re)initialize a cloth simulation.
///
/// # Builder Pattern
/// ```
/// use clothy::config::ClothConfig;
/// use clothy::vec::Vec3;
///
/// let config: ClothConfig<f32> = ClothConfig::new()
///     .with_resolution(20)
///     .with_stiffness(150.0)
///     .with_sphere(Vec3::new(0.5, 0.3, 0.0), 0.2)
///     .with_ground_height(0.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ClothConfig<F: Float> {
    /// Particles per grid side. Default: 50.
    pub resolution: usize,
    /// Live parameters. Default: K = 100, M = 5, μ = 0.02, no wind.
    pub parameters: UserParameters<F>,
    /// Placement of the rest sheet. Default: unit sheet at y = 1.
    pub layout: GridLayout<F>,
    /// Ground plane height. Default: 0.1.
    pub ground_height: F,
    /// Sphere center. Default: (0, 0.1, 0).
    pub sphere_center: Vec3<F>,
    /// Sphere radius. Default: 0.1.
    pub sphere_radius: F,
    /// Contact tolerance around the sphere. Default: 0.01.
    pub contact_margin: F,
    /// Particles pinned at their rest position. `None` pins the two corners
    /// of the first column, `(0, 0)` and `(N-1, 0)`.
    pub pinned: Option<AllocVec<usize>>,
    /// Fixed substeps per frame. Default: 4.
    pub substeps: usize,
    /// Substep length at time scale 1. Default: 0.001.
    pub base_step: F,
    /// Frames shorter than this run no physics. Default: 1e-6.
    pub min_frame_time: F,
    /// Divergence force threshold. Default: 1000.
    pub force_threshold: F,
}

impl<F: Float> ClothConfig<F> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        ClothConfig {
            resolution: 50,
            parameters: UserParameters::default(),
            layout: GridLayout::default(),
            ground_height: F::from_f32(0.1),
            sphere_center: Vec3::new(F::zero(), F::from_f32(0.1), F::zero()),
            sphere_radius: F::from_f32(0.1),
            contact_margin: F::from_f32(0.01),
            pinned: None,
            substeps: 4,
            base_step: F::from_f32(0.001),
            min_frame_time: F::from_f32(1e-6),
            force_threshold: F::from_f32(DEFAULT_FORCE_THRESHOLD),
        }
    }

    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_parameters(mut self, parameters: UserParameters<F>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_stiffness(mut self, stiffness: F) -> Self {
        self.parameters.stiffness = stiffness;
        self
    }

    pub fn with_mass(mut self, mass: F) -> Self {
        self.parameters.mass = mass;
        self
    }

    pub fn with_damping(mut self, damping: F) -> Self {
        self.parameters.damping = damping;
        self
    }

    pub fn with_wind(mut self, wind: F) -> Self {
        self.parameters.wind = wind;
        self
    }

    pub fn with_layout(mut self, layout: GridLayout<F>) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_ground_height(mut self, height: F) -> Self {
        self.ground_height = height;
        self
    }

    pub fn with_sphere(mut self, center: Vec3<F>, radius: F) -> Self {
        self.sphere_center = center;
        self.sphere_radius = radius;
        self
    }

    pub fn with_pinned(mut self, pinned: AllocVec<usize>) -> Self {
        self.pinned = Some(pinned);
        self
    }

    pub fn with_substeps(mut self, substeps: usize) -> Self {
        self.substeps = substeps;
        self
    }

    pub fn with_base_step(mut self, base_step: F) -> Self {
        self.base_step = base_step;
        self
    }

    pub fn with_force_threshold(mut self, threshold: F) -> Self {
        self.force_threshold = threshold;
        self
    }

    /// Pinned indices after applying the default.
    pub fn pinned_indices(&self) -> AllocVec<usize> {
        match &self.pinned {
            Some(pinned) => pinned.clone(),
            None => {
                let n = self.resolution;
                vec![0, n * n.saturating_sub(1)]
            }
        }
    }

    pub fn collision_shapes(&self) -> CollisionShapes<F> {
        CollisionShapes {
            ground: Ground::new(self.ground_height),
            sphere: Sphere::new(self.sphere_center, self.sphere_radius),
            margin: self.contact_margin,
        }
    }

    /// Check everything that does not depend on the built grid.
    pub fn validate(&self) -> Result<(), ClothError> {
        if self.resolution < 2 {
            return Err(ClothError::InvalidGridResolution { resolution: self.resolution });
        }
        self.parameters.validate()?;
        if self.substeps == 0 {
            return Err(ClothError::InvalidSubsteps);
        }
        for (name, value) in [
            ("ground_height", self.ground_height),
            ("contact_margin", self.contact_margin),
            ("base_step", self.base_step),
            ("min_frame_time", self.min_frame_time),
            ("force_threshold", self.force_threshold),
        ] {
            if !value.is_finite() {
                return Err(ClothError::NonFiniteParameter { name });
            }
        }
        if !self.sphere_center.is_finite() {
            return Err(ClothError::NonFiniteParameter { name: "sphere_center" });
        }
        if !self.sphere_radius.is_finite() || self.sphere_radius <= F::zero() {
            return Err(ClothError::InvalidSphereRadius);
        }
        let count = self.resolution * self.resolution;
        if let Some(&index) = self.pinned_indices().iter().find(|&&i| i >= count) {
            return Err(ClothError::PinOutOfBounds { index, count });
        }
        Ok(())
    }
}

impl<F: Float> Default for ClothConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}
