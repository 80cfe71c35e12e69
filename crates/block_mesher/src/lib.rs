//! Block-based structures with derived stats and greedy surface meshing.
//!
//! A structure is an ordered set of [`VoxelBlock`]s, each with a material
//! tier, role and shape from which mass, durability and functional output
//! are derived. The surface mesh is produced by a grid-based greedy mesher
//! that merges coplanar faces, with a per-face culling mesher as fallback
//! for layouts too sparse for a dense grid.
//!
//! # Example
//!
//! ```
//! use block_mesher::glam::Vec3;
//! use block_mesher::{mesh_greedy, mesh_simple, BlockSpec, MaterialTable, VoxelBlock};
//!
//! let table = MaterialTable::new();
//! let blocks = vec![
//!     VoxelBlock::from_spec(&table, &BlockSpec::new(Vec3::ZERO)),
//!     VoxelBlock::from_spec(&table, &BlockSpec::new(Vec3::X)),
//! ];
//!
//! let simple = mesh_simple(&blocks);
//! let greedy = mesh_greedy(&blocks).unwrap();
//! assert_eq!(simple.quad_count(), 10);
//! assert_eq!(greedy.quad_count(), 6); // same area, fewer quads
//! assert_eq!(greedy.surface_area(), simple.surface_area());
//! ```

pub mod block;
pub mod core;
pub mod cull;
pub mod error;
pub mod expand;
pub mod grid;
pub mod material;
pub mod merge;
pub mod mesh;
pub mod simple;
pub mod spatial;
pub mod structure;

pub use glam;

// Re-export primary types
pub use crate::block::{
    BlockId, BlockOrientation, BlockShape, BlockSpec, BlockType, DerivedStats, VoxelBlock,
};
pub use crate::core::{
    MeshOutput,
    Rgba,
    CellRef,
    // Constants
    CELL_EMPTY, MAX_GRID_AXIS,
    FACE_POS_X, FACE_NEG_X, FACE_POS_Y, FACE_NEG_Y, FACE_POS_Z, FACE_NEG_Z,
    FACE_NORMALS,
};
pub use crate::error::{BlockError, Result};
pub use crate::grid::GridSampling;
pub use crate::material::{MaterialProperties, MaterialTable, MaterialTier};
pub use crate::spatial::SpatialIndex;

// Re-export main entry points
pub use crate::mesh::{
    mesh_blocks, mesh_greedy, mesh_greedy_with_stats, GreedyMesher, MeshResult, MeshStats,
};
pub use crate::simple::{mesh_simple, SimpleMesher};
pub use crate::structure::{MeshSink, MesherConfig, MeshStrategy, VoxelStructure};
