//! Collision response against the static ground plane and sphere.

use crate::float::Float;
use crate::vec::{Vec, Vec3};

/// Mass assigned to both bodies in the sphere impulse formula.
pub const COLLISION_MASS: f32 = 0.01;

/// Fraction of the incoming velocity and of the impulse kept after contact.
pub const CONTACT_VELOCITY_SCALE: f32 = 0.1;

/// Horizontal ground plane with normal +Y.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ground<F: Float> {
    pub height: F,
}

impl<F: Float> Ground<F> {
    pub fn new(height: F) -> Self {
        Ground { height }
    }

    /// Clamp every particle to lie on or above the plane.
    ///
    /// Positional correction only; velocities are left untouched.
    pub fn resolve(&self, positions: &mut [Vec3<F>]) -> usize {
        let mut contacts = 0;
        for p in positions.iter_mut() {
            if p.y < self.height {
                p.y = self.height;
                contacts += 1;
            }
        }
        contacts
    }
}

/// Static sphere obstacle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sphere<F: Float> {
    pub center: Vec3<F>,
    pub radius: F,
}

impl<F: Float> Sphere<F> {
    pub fn new(center: Vec3<F>, radius: F) -> Self {
        Sphere { center, radius }
    }

    /// Resolve particles within `radius + margin` of the center.
    ///
    /// The velocity becomes `0.1 * v + 0.1 * j / m`, with the scalar term
    /// added to every component, where `j` is the equal-mass elastic impulse
    /// `2 * m1 * m2 / (m1 + m2) * dot(-v, u)` and `u` the outward normal. The
    /// particle is then pushed out along `u` by half the penetration depth. A
    /// particle exactly at the center is pushed along +Y.
    pub fn resolve(
        &self,
        positions: &mut [Vec3<F>],
        velocities: &mut [Vec3<F>],
        mass_per_particle: F,
        margin: F,
    ) -> usize {
        let m1 = F::from_f32(COLLISION_MASS);
        let m2 = F::from_f32(COLLISION_MASS);
        let reduced = F::two() * (m1 * m2) / (m1 + m2);
        let keep = F::from_f32(CONTACT_VELOCITY_SCALE);
        let reach = self.radius + margin;
        let mut contacts = 0;

        for (p, v) in positions.iter_mut().zip(velocities.iter_mut()) {
            let offset = *p - self.center;
            let distance = offset.length();
            if distance > reach {
                continue;
            }
            let u = if distance.is_near_zero(F::from_f32(1e-10)) {
                Vec3::unit_y()
            } else {
                offset.scale(F::one() / distance)
            };
            let j = reduced * (-*v).dot(u);
            let s = keep * j / mass_per_particle;
            *v = v.scale(keep) + Vec3::new(s, s, s);

            let depth = reach - distance;
            *p = *p + u.scale(depth * F::half());
            contacts += 1;
        }
        contacts
    }
}

/// The static obstacles of a scene.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CollisionShapes<F: Float> {
    pub ground: Ground<F>,
    pub sphere: Sphere<F>,
    /// Contact tolerance added to the sphere radius.
    pub margin: F,
}

impl<F: Float> CollisionShapes<F> {
    /// Ground pass, then sphere pass. Returns the number of contacts.
    pub fn resolve(
        &self,
        positions: &mut [Vec3<F>],
        velocities: &mut [Vec3<F>],
        mass_per_particle: F,
    ) -> usize {
        let ground = self.ground.resolve(positions);
        let sphere = self.sphere.resolve(positions, velocities, mass_per_particle, self.margin);
        ground + sphere
    }
}
