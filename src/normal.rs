//! Per-vertex normals of the deformed sheet, for the renderer.

use crate::float::Float;
use crate::grid::GridTopology;
use crate::vec::{Vec, Vec3};

/// Recompute vertex normals into `normals`.
///
/// Each grid cell is split into two triangles. Every vertex sums the
/// unnormalized normals of its adjacent triangles, so larger triangles weigh
/// more, and the sum is normalized. A vertex whose triangles are all
/// degenerate gets the zero vector. For the default layout the rest sheet
/// faces +Y.
pub fn vertex_normals<F: Float>(topology: &GridTopology, positions: &[Vec3<F>], normals: &mut [Vec3<F>]) {
    for n in normals.iter_mut() {
        *n = Vec3::zero();
    }

    let n = topology.resolution();
    for row in 0..n - 1 {
        for col in 0..n - 1 {
            let a = topology.index(row, col);
            let b = topology.index(row, col + 1);
            let d = topology.index(row + 1, col);
            let e = topology.index(row + 1, col + 1);
            for [i, j, k] in [[a, d, b], [b, d, e]] {
                let face = (positions[j] - positions[i]).cross(positions[k] - positions[i]);
                normals[i] = normals[i] + face;
                normals[j] = normals[j] + face;
                normals[k] = normals[k] + face;
            }
        }
    }

    for n in normals.iter_mut() {
        *n = n.normalize();
    }
}
