//! Structure management: owned blocks, dirty tracking and mesh hand-off.
//!
//! - [`VoxelStructure`]: ordered block collection that owns its mesh
//! - [`MesherConfig`]: which mesher to use and the greedy grid cap
//! - [`RebuildStats`] / [`StructureStats`]: per-rebuild and aggregate numbers
//! - [`MeshSink`]: where rebuilt meshes go
//!
//! # Lifecycle
//!
//! ```text
//! ┌─────────┐  add / remove / clear / lethal damage  ┌─────────┐
//! │  Clean  │───────────────────────────────────────▶│  Dirty  │
//! └─────────┘                                        └─────────┘
//!      ▲                                                  │
//!      └──────────────── rebuild_if_dirty ────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use block_mesher::glam::Vec3;
//! use block_mesher::structure::{MeshStrategy, StructureMesh, VoxelStructure};
//! use block_mesher::{BlockSpec, BlockType, MaterialTable};
//!
//! let mut ship = VoxelStructure::new(MaterialTable::shared());
//! ship.place(&BlockSpec::new(Vec3::ZERO).material("Titanium"));
//! ship.place(&BlockSpec::new(Vec3::X).block_type(BlockType::Engine));
//!
//! let mut uploaded = 0;
//! let stats = ship.update(&mut |mesh: &StructureMesh| uploaded += mesh.output.vertex_count());
//!
//! let stats = stats.unwrap();
//! assert_eq!(stats.mesher, MeshStrategy::Greedy);
//! assert_eq!(uploaded, stats.vertex_count);
//! assert!(!ship.is_dirty());
//! ```

mod sink;
mod stats;
mod voxel_structure;

pub use sink::{MeshSink, StructureMesh};
pub use stats::{MeshStrategy, MesherConfig, RebuildStats, StructureStats};
pub use voxel_structure::VoxelStructure;
