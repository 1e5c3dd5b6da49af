//! Hard positional constraints (pins).

use crate::error::ClothError;
use crate::float::Float;
use crate::vec::Vec3;
use alloc::collections::BTreeMap;

/// Particles held at fixed target positions.
///
/// Enforced after integration and collision every substep, so a pinned
/// particle ends each substep exactly at its target.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PositionalConstraints<F: Float> {
    pins: BTreeMap<usize, Vec3<F>>,
}

impl<F: Float> PositionalConstraints<F> {
    pub fn new() -> Self {
        PositionalConstraints { pins: BTreeMap::new() }
    }

    /// Pin each index at its rest position.
    pub fn from_rest(indices: &[usize], rest: &[Vec3<F>]) -> Result<Self, ClothError> {
        let mut constraints = Self::new();
        for &index in indices {
            let target = *rest
                .get(index)
                .ok_or(ClothError::PinOutOfBounds { index, count: rest.len() })?;
            constraints.pin(index, target);
        }
        Ok(constraints)
    }

    /// Pin `index` at `target`, replacing any previous target.
    pub fn pin(&mut self, index: usize, target: Vec3<F>) {
        self.pins.insert(index, target);
    }

    pub fn get(&self, index: usize) -> Option<Vec3<F>> {
        self.pins.get(&index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Vec3<F>)> + '_ {
        self.pins.iter().map(|(&i, &p)| (i, p))
    }

    pub fn len(&self) -> usize { self.pins.len() }

    pub fn is_empty(&self) -> bool { self.pins.is_empty() }

    /// Overwrite every pinned position with its target.
    pub fn enforce(&self, positions: &mut [Vec3<F>]) {
        for (&index, &target) in self.pins.iter() {
            positions[index] = target;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enforce_restores_targets() {
        let rest = [Vec3::new(0.0f32, 1.0, 0.0), Vec3::new(1.0, 1.0, 0.0), Vec3::new(2.0, 1.0, 0.0)];
        let pins = PositionalConstraints::from_rest(&[0, 2], &rest).unwrap();
        let mut positions = [Vec3::new(5.0f32, 5.0, 5.0); 3];
        pins.enforce(&mut positions);
        assert_eq!(positions[0], rest[0]);
        assert_eq!(positions[1], Vec3::new(5.0, 5.0, 5.0));
        assert_eq!(positions[2], rest[2]);
    }

    #[test]
    fn out_of_bounds_pin_is_rejected() {
        let rest = [Vec3::new(0.0f32, 0.0, 0.0)];
        assert_eq!(
            PositionalConstraints::from_rest(&[3], &rest),
            Err(ClothError::PinOutOfBounds { index: 3, count: 1 })
        );
    }

    #[test]
    fn empty_set_is_a_no_op() {
        let pins = PositionalConstraints::<f32>::new();
        let mut positions = [Vec3::new(1.0f32, 2.0, 3.0)];
        pins.enforce(&mut positions);
        assert_eq!(positions[0], Vec3::new(1.0, 2.0, 3.0));
        assert!(pins.is_empty());
    }
}
