//! Greedy rectangle merge.
//!
//! One implementation serves every face direction: slices are indexed in the
//! face's `(u, v)` plane axes, so the sweep is always "extend along u, then
//! along v". Rows are scanned in order of increasing `v`, cells within a row
//! in order of increasing `u`.

use crate::block::VoxelBlock;
use crate::core::{face_axis, Rgba};
use crate::cull::{cull_slice, SliceMask};
use crate::grid::BlockGrid;

/// A merged rectangle of exposed faces, in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridQuad {
    pub face: usize,
    /// Slice index along the face axis.
    pub depth: usize,
    /// First cell along the u axis.
    pub u: usize,
    /// First cell along the v axis.
    pub v: usize,
    /// Extent along u, in cells.
    pub width: usize,
    /// Extent along v, in cells.
    pub height: usize,
    pub color: Rgba,
}

impl GridQuad {
    /// Number of unit faces this quad covers.
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

/// Greedily merge one slice mask into rectangles, consuming the mask.
///
/// Every exposed face ends up in exactly one quad and every quad covers only
/// faces with identical keys.
pub fn greedy_merge_slice(face: usize, depth: usize, mask: &mut SliceMask, output: &mut Vec<GridQuad>) {
    for start_v in 0..mask.height {
        let mut start_u = 0;
        while start_u < mask.width {
            let Some(key) = mask.get(start_u, start_v) else {
                start_u += 1;
                continue;
            };

            // Extend width along u
            let mut width = 1;
            while start_u + width < mask.width && mask.get(start_u + width, start_v) == Some(key) {
                width += 1;
            }

            // Extend height along v while the whole row matches
            let mut height = 1;
            'height: while start_v + height < mask.height {
                for u in start_u..start_u + width {
                    if mask.get(u, start_v + height) != Some(key) {
                        break 'height;
                    }
                }
                height += 1;
            }

            for v in start_v..start_v + height {
                for u in start_u..start_u + width {
                    mask.clear_cell(u, v);
                }
            }

            output.push(GridQuad {
                face,
                depth,
                u: start_u,
                v: start_v,
                width,
                height,
                color: key.color,
            });

            start_u += width;
        }
    }
}

/// Cull and merge every slice of one face direction.
pub fn greedy_merge_face(grid: &BlockGrid, blocks: &[VoxelBlock], face: usize, output: &mut Vec<GridQuad>) {
    let mut mask = SliceMask::for_face(grid, face);
    for depth in 0..grid.dims()[face_axis(face)] {
        cull_slice(grid, blocks, face, depth, &mut mask);
        greedy_merge_slice(face, depth, &mut mask, output);
    }
}
