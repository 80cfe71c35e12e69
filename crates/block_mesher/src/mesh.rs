//! Main meshing pipeline.
//!
//! Orchestrates the greedy meshing process:
//! 1. Grid population (quantize blocks onto unit cells)
//! 2. Face culling (one exposure mask per slice)
//! 3. Greedy merge (combine equal adjacent faces into rectangles)
//! 4. Quad expansion (convert rectangles to vertex arrays)
//!
//! [`mesh_blocks`] adds mesher selection on top, falling back to the
//! [`SimpleMesher`] when the grid would exceed the configured size.

use crate::block::VoxelBlock;
use crate::core::{MeshOutput, FACE_NORMALS, MAX_GRID_AXIS};
use crate::cull::count_exposed_faces;
use crate::expand::expand_quads;
use crate::grid::{BlockGrid, GridBounds, GridSampling};
use crate::merge::{greedy_merge_face, GridQuad};
use crate::simple::SimpleMesher;
use crate::structure::{MeshStrategy, MesherConfig};

/// Statistics about a mesh result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshStats {
    /// Total number of quads generated
    pub quad_count: usize,
    /// Quads per face direction
    pub quads_per_face: [usize; 6],
    /// Total vertices
    pub vertex_count: usize,
    /// Total triangles
    pub triangle_count: usize,
    /// Theoretical maximum quads (without merging)
    pub max_possible_quads: usize,
    /// Merge efficiency (1.0 = perfect merging, 0.0 = no merging)
    pub merge_efficiency: f32,
    /// Total area covered by the quads
    pub surface_area: f32,
}

impl MeshStats {
    fn from_quads(quads_per_face: [usize; 6], max_possible_quads: usize, mesh: &MeshOutput) -> Self {
        let quad_count: usize = quads_per_face.iter().sum();
        let merge_efficiency = if max_possible_quads > 0 {
            1.0 - (quad_count as f32 / max_possible_quads as f32)
        } else {
            0.0
        };

        Self {
            quad_count,
            quads_per_face,
            vertex_count: mesh.vertex_count(),
            triangle_count: mesh.triangle_count(),
            max_possible_quads,
            merge_efficiency,
            surface_area: mesh.surface_area(),
        }
    }

    /// Stats for an unmerged mesh, reading face directions off the normals.
    pub fn unmerged(mesh: &MeshOutput) -> Self {
        let mut quads_per_face = [0usize; 6];
        for q in 0..mesh.quad_count() {
            let n = mesh.normal(q * 4).to_array();
            if let Some(face) = FACE_NORMALS.iter().position(|f| *f == n) {
                quads_per_face[face] += 1;
            }
        }
        Self::from_quads(quads_per_face, mesh.quad_count(), mesh)
    }
}

/// Outcome of sizing the grid for a block set.
#[derive(Debug)]
pub enum GridPlan {
    /// Nothing alive to mesh.
    Empty,
    /// Some axis exceeds the cap; dimensions in cells.
    TooLarge([u64; 3]),
    Ready(BlockGrid),
}

/// Grid-based mesher that merges coplanar faces into larger quads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreedyMesher {
    pub sampling: GridSampling,
    /// Largest grid extent per axis, in cells.
    pub max_grid_axis: usize,
}

impl Default for GreedyMesher {
    fn default() -> Self {
        Self {
            sampling: GridSampling::default(),
            max_grid_axis: MAX_GRID_AXIS,
        }
    }
}

impl GreedyMesher {
    pub fn new(sampling: GridSampling, max_grid_axis: usize) -> Self {
        Self { sampling, max_grid_axis }
    }

    /// Measure the blocks and, if the grid fits, populate it.
    pub fn plan(&self, blocks: &[VoxelBlock]) -> GridPlan {
        let Some(bounds) = GridBounds::measure(blocks, self.sampling) else {
            return GridPlan::Empty;
        };
        if !bounds.fits(self.max_grid_axis) {
            return GridPlan::TooLarge(bounds.dims());
        }
        GridPlan::Ready(BlockGrid::populate(bounds, blocks, self.sampling))
    }

    /// Merged quads for all six directions, in face order +X, -X, +Y, -Y, +Z, -Z.
    fn merge_all(grid: &BlockGrid, blocks: &[VoxelBlock]) -> [Vec<GridQuad>; 6] {
        let mut quads: [Vec<GridQuad>; 6] = Default::default();
        for (face, out) in quads.iter_mut().enumerate() {
            greedy_merge_face(grid, blocks, face, out);
        }
        quads
    }

    fn mesh_grid(grid: &BlockGrid, blocks: &[VoxelBlock]) -> (MeshOutput, MeshStats) {
        let max_possible_quads = count_exposed_faces(grid, blocks).iter().sum();
        let quads = Self::merge_all(grid, blocks);
        let quads_per_face = std::array::from_fn(|face| quads[face].len());

        let mesh = expand_quads(&quads.concat(), grid.origin());
        let stats = MeshStats::from_quads(quads_per_face, max_possible_quads, &mesh);
        (mesh, stats)
    }

    /// Mesh the blocks, or `None` if the grid would be too large.
    ///
    /// # Example
    /// ```
    /// use block_mesher::{BlockSpec, GreedyMesher, MaterialTable, VoxelBlock};
    /// use block_mesher::glam::Vec3;
    ///
    /// let table = MaterialTable::new();
    /// let blocks: Vec<_> = [Vec3::ZERO, Vec3::X]
    ///     .into_iter()
    ///     .map(|p| VoxelBlock::from_spec(&table, &BlockSpec::new(p)))
    ///     .collect();
    ///
    /// let mesh = GreedyMesher::default().mesh(&blocks).unwrap();
    /// assert_eq!(mesh.quad_count(), 6);
    /// ```
    pub fn mesh(&self, blocks: &[VoxelBlock]) -> Option<MeshOutput> {
        match self.plan(blocks) {
            GridPlan::Empty => Some(MeshOutput::default()),
            GridPlan::TooLarge(_) => None,
            GridPlan::Ready(grid) => {
                let quads = Self::merge_all(&grid, blocks);
                Some(expand_quads(&quads.concat(), grid.origin()))
            }
        }
    }

    /// Mesh the blocks and return statistics along with the mesh.
    pub fn mesh_with_stats(&self, blocks: &[VoxelBlock]) -> Option<(MeshOutput, MeshStats)> {
        match self.plan(blocks) {
            GridPlan::Empty => Some((MeshOutput::default(), MeshStats::default())),
            GridPlan::TooLarge(_) => None,
            GridPlan::Ready(grid) => Some(Self::mesh_grid(&grid, blocks)),
        }
    }
}

/// Mesh with the default [`GreedyMesher`].
pub fn mesh_greedy(blocks: &[VoxelBlock]) -> Option<MeshOutput> {
    GreedyMesher::default().mesh(blocks)
}

/// Mesh with the default [`GreedyMesher`] and return statistics.
pub fn mesh_greedy_with_stats(blocks: &[VoxelBlock]) -> Option<(MeshOutput, MeshStats)> {
    GreedyMesher::default().mesh_with_stats(blocks)
}

/// Mesh, stats, and which mesher produced them.
#[derive(Debug, Clone)]
pub struct MeshResult {
    pub mesh: MeshOutput,
    pub stats: MeshStats,
    pub mesher: MeshStrategy,
    /// Greedy was requested but the grid was too large.
    pub fell_back: bool,
}

/// Mesh blocks with the mesher `config` selects.
///
/// A greedy request whose grid exceeds `config.max_grid_axis` on any axis
/// is served by the [`SimpleMesher`] instead. That is not an error.
pub fn mesh_blocks(blocks: &[VoxelBlock], config: &MesherConfig) -> MeshResult {
    if config.strategy == MeshStrategy::Greedy {
        let greedy = GreedyMesher::new(config.sampling, config.max_grid_axis);
        match greedy.plan(blocks) {
            GridPlan::Empty => {
                return MeshResult {
                    mesh: MeshOutput::default(),
                    stats: MeshStats::default(),
                    mesher: MeshStrategy::Greedy,
                    fell_back: false,
                };
            }
            GridPlan::Ready(grid) => {
                let (mesh, stats) = GreedyMesher::mesh_grid(&grid, blocks);
                return MeshResult { mesh, stats, mesher: MeshStrategy::Greedy, fell_back: false };
            }
            GridPlan::TooLarge(dims) => {
                log::info!(
                    "grid {}x{}x{} exceeds {} cells per axis, using simple mesher",
                    dims[0],
                    dims[1],
                    dims[2],
                    config.max_grid_axis
                );
            }
        }
    }

    let mesh = SimpleMesher.mesh(blocks);
    let stats = MeshStats::unmerged(&mesh);
    MeshResult {
        mesh,
        stats,
        mesher: MeshStrategy::Simple,
        fell_back: config.strategy == MeshStrategy::Greedy,
    }
}
