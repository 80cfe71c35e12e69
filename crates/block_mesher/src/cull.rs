//! Face culling on the block grid.
//!
//! A cell face is exposed when the cell is occupied and its neighbour across
//! that face is empty (or outside the grid). For each face direction the
//! grid is swept slice by slice along the face axis, producing a 2D mask of
//! exposed faces tagged with the key that decides what may merge.

use crate::block::VoxelBlock;
use crate::core::{face_axis, face_is_positive, plane_axes, Rgba};
use crate::grid::BlockGrid;
use crate::material::MaterialTier;

/// What two exposed faces must share to merge into one quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceKey {
    pub color: Rgba,
    pub material: MaterialTier,
}

impl FaceKey {
    pub fn of(block: &VoxelBlock) -> Self {
        Self { color: block.color(), material: block.material() }
    }
}

/// Mask of exposed faces for one slice, row-major in `(v, u)`.
#[derive(Debug, Clone)]
pub struct SliceMask {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Option<FaceKey>>,
}

impl SliceMask {
    /// Empty mask sized for slices perpendicular to `face`'s axis.
    pub fn for_face(grid: &BlockGrid, face: usize) -> Self {
        let dims = grid.dims();
        let (u, v) = plane_axes(face_axis(face));
        Self {
            width: dims[u],
            height: dims[v],
            cells: vec![None; dims[u] * dims[v]],
        }
    }

    #[inline]
    pub fn get(&self, u: usize, v: usize) -> Option<FaceKey> {
        self.cells[v * self.width + u]
    }

    #[inline]
    pub fn clear_cell(&mut self, u: usize, v: usize) {
        self.cells[v * self.width + u] = None;
    }

    pub fn exposed_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

/// Fill `mask` with the exposed `face` faces of the slice at `depth` along
/// the face axis. Every entry of the mask is overwritten.
pub fn cull_slice(grid: &BlockGrid, blocks: &[VoxelBlock], face: usize, depth: usize, mask: &mut SliceMask) {
    let axis = face_axis(face);
    let (u_axis, v_axis) = plane_axes(axis);
    let step: i64 = if face_is_positive(face) { 1 } else { -1 };

    let mut pos = [0i64; 3];
    pos[axis] = depth as i64;

    for v in 0..mask.height {
        pos[v_axis] = v as i64;
        for u in 0..mask.width {
            pos[u_axis] = u as i64;

            let exposed = grid.block_at(pos).filter(|_| {
                let mut neighbour = pos;
                neighbour[axis] += step;
                !grid.is_occupied(neighbour)
            });

            mask.cells[v * mask.width + u] = exposed.map(|index| FaceKey::of(&blocks[index]));
        }
    }
}

/// Count exposed unit faces per face direction.
///
/// This is the quad count a mesher that never merges would produce.
pub fn count_exposed_faces(grid: &BlockGrid, blocks: &[VoxelBlock]) -> [usize; 6] {
    let mut counts = [0usize; 6];
    for (face, count) in counts.iter_mut().enumerate() {
        let mut mask = SliceMask::for_face(grid, face);
        for depth in 0..grid.dims()[face_axis(face)] {
            cull_slice(grid, blocks, face, depth, &mut mask);
            *count += mask.exposed_count();
        }
    }
    counts
}
