//! Integer-keyed occupancy lookup for the simple mesher.

use std::collections::HashMap;

use glam::{IVec3, Vec3};

use crate::block::VoxelBlock;

/// Round a world position to its integer cell key.
#[inline]
pub fn cell_key(position: Vec3) -> IVec3 {
    position.round().as_ivec3()
}

/// Maps rounded block centers to indices into the block slice it was built from.
///
/// Destroyed blocks are never indexed. When two blocks round to the same
/// cell, the later one in the slice wins.
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    cells: HashMap<IVec3, usize>,
}

impl SpatialIndex {
    /// Build an index over the non-destroyed blocks of `blocks`.
    pub fn build(blocks: &[VoxelBlock]) -> Self {
        let mut cells = HashMap::with_capacity(blocks.len());
        for (index, block) in blocks.iter().enumerate() {
            if !block.is_destroyed() {
                cells.insert(cell_key(block.position()), index);
            }
        }
        Self { cells }
    }

    /// Block index occupying the cell that `position` rounds to.
    pub fn get(&self, position: Vec3) -> Option<usize> {
        self.cells.get(&cell_key(position)).copied()
    }

    /// Whether any block occupies the cell that `position` rounds to.
    pub fn is_occupied(&self, position: Vec3) -> bool {
        self.cells.contains_key(&cell_key(position))
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
