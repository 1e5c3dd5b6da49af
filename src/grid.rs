//! Square particle grid: index mapping and rest layout.

use crate::error::ClothError;
use crate::float::Float;
use crate::vec::{Vec, Vec3};
use alloc::vec::Vec as AllocVec;

/// Index mapping for an `N x N` particle grid.
///
/// Particle at (row, col) has index `row * N + col`. The rest edge length
/// is `1 / (N - 1)`, so the undeformed sheet always spans one unit per side.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridTopology {
    resolution: usize,
}

impl GridTopology {
    pub fn new(resolution: usize) -> Result<Self, ClothError> {
        if resolution < 2 {
            return Err(ClothError::InvalidGridResolution { resolution });
        }
        Ok(GridTopology { resolution })
    }

    pub fn resolution(&self) -> usize { self.resolution }

    pub fn particle_count(&self) -> usize { self.resolution * self.resolution }

    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.resolution + col
    }

    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.resolution, index % self.resolution)
    }

    /// Index of the particle at `(row + di, col + dj)`, if it lies on the grid.
    pub fn offset(&self, row: usize, col: usize, di: isize, dj: isize) -> Option<usize> {
        let r = row as isize + di;
        let c = col as isize + dj;
        let n = self.resolution as isize;
        if r < 0 || r >= n || c < 0 || c >= n {
            return None;
        }
        Some(self.index(r as usize, c as usize))
    }

    /// Undeformed edge length `L0`.
    pub fn rest_length<F: Float>(&self) -> F {
        F::one() / F::from_f32((self.resolution - 1) as f32)
    }
}

/// Placement of the rest grid in world space.
///
/// Columns advance along `axis_u`, rows along `axis_v`, both scaled by the
/// rest length.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridLayout<F: Float> {
    pub origin: Vec3<F>,
    pub axis_u: Vec3<F>,
    pub axis_v: Vec3<F>,
}

impl<F: Float> GridLayout<F> {
    pub fn new(origin: Vec3<F>, axis_u: Vec3<F>, axis_v: Vec3<F>) -> Self {
        GridLayout { origin, axis_u, axis_v }
    }

    pub fn rest_position(&self, topology: &GridTopology, row: usize, col: usize) -> Vec3<F> {
        let l0: F = topology.rest_length();
        let u = F::from_f32(col as f32) * l0;
        let v = F::from_f32(row as f32) * l0;
        self.origin + self.axis_u.scale(u) + self.axis_v.scale(v)
    }

    /// Rest positions of every particle, in index order.
    pub fn rest_positions(&self, topology: &GridTopology) -> AllocVec<Vec3<F>> {
        let n = topology.resolution();
        let mut positions = AllocVec::with_capacity(topology.particle_count());
        for row in 0..n {
            for col in 0..n {
                positions.push(self.rest_position(topology, row, col));
            }
        }
        positions
    }
}

impl<F: Float> Default for GridLayout<F> {
    /// Horizontal unit sheet at height 1, spanning x in [0, 1] and z in [-0.5, 0.5].
    fn default() -> Self {
        GridLayout {
            origin: Vec3::new(F::zero(), F::one(), -F::half()),
            axis_u: Vec3::new(F::one(), F::zero(), F::zero()),
            axis_v: Vec3::new(F::zero(), F::zero(), F::one()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_resolution() {
        assert_eq!(
            GridTopology::new(1),
            Err(ClothError::InvalidGridResolution { resolution: 1 })
        );
        assert!(GridTopology::new(0).is_err());
        assert!(GridTopology::new(2).is_ok());
    }

    #[test]
    fn index_round_trips_through_coords() {
        let grid = GridTopology::new(7).unwrap();
        assert_eq!(grid.index(3, 5), 26);
        assert_eq!(grid.coords(26), (3, 5));
        assert_eq!(grid.particle_count(), 49);
    }

    #[test]
    fn offset_respects_bounds() {
        let grid = GridTopology::new(4).unwrap();
        assert_eq!(grid.offset(0, 0, -1, 0), None);
        assert_eq!(grid.offset(0, 0, 0, 2), Some(2));
        assert_eq!(grid.offset(3, 3, 1, 0), None);
        assert_eq!(grid.offset(2, 1, 1, -1), Some(12));
    }

    #[test]
    fn rest_length_spans_unit_side() {
        let grid = GridTopology::new(11).unwrap();
        let l0: f32 = grid.rest_length();
        assert!((l0 - 0.1).abs() < 1e-6);
    }

    #[test]
    fn default_layout_is_flat_at_unit_height() {
        let grid = GridTopology::new(5).unwrap();
        let layout = GridLayout::<f32>::default();
        let positions = layout.rest_positions(&grid);
        assert_eq!(positions.len(), 25);
        for p in &positions {
            assert!((p.y - 1.0).abs() < 1e-6);
        }
        let far = positions[grid.index(4, 4)];
        assert!((far.x - 1.0).abs() < 1e-6);
        assert!((far.z - 0.5).abs() < 1e-6);
    }
}
