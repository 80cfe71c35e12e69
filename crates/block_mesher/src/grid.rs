//! Dense unit-cell grid of block references.
//!
//! The greedy mesher quantizes the structure onto a grid of unit cells whose
//! centers sit on integer world coordinates. Each cell stores the index of
//! the block occupying it (+1), or [`CELL_EMPTY`].

use glam::{I64Vec3, Vec3};

use crate::block::VoxelBlock;
use crate::core::{CellRef, CELL_EMPTY};

/// How blocks are written into the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GridSampling {
    /// Each block fills `round(size)` cells per axis (at least one),
    /// centered on its rounded center.
    #[default]
    Rasterize,
    /// Each block fills only the cell its center rounds to, whatever its size.
    CenterPoint,
}

/// Inclusive cell span a block covers on each axis.
fn block_span(block: &VoxelBlock, sampling: GridSampling) -> (I64Vec3, I64Vec3) {
    let center = block.position();
    match sampling {
        GridSampling::CenterPoint => {
            let cell = round_cell(center);
            (cell, cell)
        }
        GridSampling::Rasterize => {
            let size = block.size();
            let counts = I64Vec3::new(
                cell_count(size.x),
                cell_count(size.y),
                cell_count(size.z),
            );
            let lo = round_cell(center - (counts - I64Vec3::ONE).as_vec3() * 0.5);
            let hi = I64Vec3::new(
                lo.x.saturating_add(counts.x - 1),
                lo.y.saturating_add(counts.y - 1),
                lo.z.saturating_add(counts.z - 1),
            );
            (lo, hi)
        }
    }
}

#[inline]
fn round_cell(p: Vec3) -> I64Vec3 {
    I64Vec3::new(p.x.round() as i64, p.y.round() as i64, p.z.round() as i64)
}

#[inline]
fn cell_count(extent: f32) -> i64 {
    (extent.round() as i64).max(1)
}

/// Inclusive cell bounds of the non-destroyed blocks of a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    pub min: I64Vec3,
    pub max: I64Vec3,
}

impl GridBounds {
    /// Measure the bounds, or `None` if no block is alive.
    pub fn measure(blocks: &[VoxelBlock], sampling: GridSampling) -> Option<Self> {
        let mut bounds: Option<Self> = None;
        for block in blocks.iter().filter(|b| !b.is_destroyed()) {
            let (lo, hi) = block_span(block, sampling);
            bounds = Some(match bounds {
                None => Self { min: lo, max: hi },
                Some(b) => Self { min: b.min.min(lo), max: b.max.max(hi) },
            });
        }
        bounds
    }

    /// Number of cells per axis, saturating at `u64::MAX`.
    pub fn dims(&self) -> [u64; 3] {
        let extent = |min: i64, max: i64| {
            let cells = max as i128 - min as i128 + 1;
            u64::try_from(cells).unwrap_or(u64::MAX)
        };
        [
            extent(self.min.x, self.max.x),
            extent(self.min.y, self.max.y),
            extent(self.min.z, self.max.z),
        ]
    }

    /// Whether every axis is at most `max_axis` cells long.
    pub fn fits(&self, max_axis: usize) -> bool {
        self.dims().iter().all(|&d| d <= max_axis as u64)
    }
}

/// Dense 3D array of cell references.
#[derive(Debug, Clone)]
pub struct BlockGrid {
    /// World cell coordinate of grid cell (0, 0, 0).
    origin: I64Vec3,
    dims: [usize; 3],
    cells: Vec<CellRef>,
}

impl BlockGrid {
    /// Allocate a grid covering `bounds` and write every non-destroyed block
    /// into it. Later blocks overwrite earlier ones in shared cells.
    ///
    /// Callers must check [`GridBounds::fits`] first.
    pub fn populate(bounds: GridBounds, blocks: &[VoxelBlock], sampling: GridSampling) -> Self {
        let [dx, dy, dz] = bounds.dims();
        let dims = [dx as usize, dy as usize, dz as usize];
        let mut grid = Self {
            origin: bounds.min,
            dims,
            cells: vec![CELL_EMPTY; dims[0] * dims[1] * dims[2]],
        };

        for (index, block) in blocks.iter().enumerate() {
            if block.is_destroyed() {
                continue;
            }
            debug_assert!(index < CellRef::MAX as usize, "too many blocks for CellRef");
            let cell_ref = (index + 1) as CellRef;
            let (lo, hi) = block_span(block, sampling);
            let lo = lo - grid.origin;
            let hi = hi - grid.origin;

            for z in lo.z..=hi.z {
                for y in lo.y..=hi.y {
                    for x in lo.x..=hi.x {
                        let i = grid.index(x as usize, y as usize, z as usize);
                        grid.cells[i] = cell_ref;
                    }
                }
            }
        }

        grid
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.dims[0] * (y + self.dims[1] * z)
    }

    /// Cell dimensions per axis.
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// World cell coordinate of grid cell (0, 0, 0).
    pub fn origin(&self) -> I64Vec3 {
        self.origin
    }

    /// Cell reference at grid coordinates; outside the grid is empty.
    #[inline]
    pub fn get(&self, pos: [i64; 3]) -> CellRef {
        let in_bounds = pos
            .iter()
            .zip(self.dims.iter())
            .all(|(&p, &d)| p >= 0 && (p as usize) < d);
        if !in_bounds {
            return CELL_EMPTY;
        }
        self.cells[self.index(pos[0] as usize, pos[1] as usize, pos[2] as usize)]
    }

    /// Index of the block occupying a cell.
    #[inline]
    pub fn block_at(&self, pos: [i64; 3]) -> Option<usize> {
        match self.get(pos) {
            CELL_EMPTY => None,
            cell => Some(cell as usize - 1),
        }
    }

    #[inline]
    pub fn is_occupied(&self, pos: [i64; 3]) -> bool {
        self.get(pos) != CELL_EMPTY
    }

    /// Count occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != CELL_EMPTY).count()
    }

    /// Total cell count.
    pub fn volume(&self) -> usize {
        self.cells.len()
    }
}
