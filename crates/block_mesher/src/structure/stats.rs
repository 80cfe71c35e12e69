//! Statistics and configuration structs for structure rebuilds.

use crate::core::MAX_GRID_AXIS;
use crate::grid::GridSampling;

/// Which mesher a rebuild should use (or did use).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MeshStrategy {
    /// Merge coplanar faces on a dense grid, falling back to
    /// [`Simple`](MeshStrategy::Simple) when the grid is too large.
    #[default]
    Greedy,
    /// One quad per exposed block face.
    Simple,
}

/// Configuration for mesher selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MesherConfig {
    /// Preferred mesher.
    pub strategy: MeshStrategy,

    /// Largest grid extent (cells per axis) the greedy mesher may allocate.
    pub max_grid_axis: usize,

    /// How blocks are written into the greedy grid.
    pub sampling: GridSampling,
}

impl Default for MesherConfig {
    fn default() -> Self {
        Self {
            strategy: MeshStrategy::Greedy,
            max_grid_axis: MAX_GRID_AXIS,
            sampling: GridSampling::Rasterize,
        }
    }
}

impl MesherConfig {
    /// Never merge; always use the simple mesher.
    pub fn simple_only() -> Self {
        Self {
            strategy: MeshStrategy::Simple,
            ..Self::default()
        }
    }

    /// Greedy meshing that samples each block at its center cell only.
    pub fn point_sampled() -> Self {
        Self {
            sampling: GridSampling::CenterPoint,
            ..Self::default()
        }
    }
}

/// Statistics from a single rebuild.
#[derive(Clone, Debug, Default)]
pub struct RebuildStats {
    /// Mesher that produced the mesh.
    pub mesher: MeshStrategy,
    /// Greedy was configured but the grid exceeded the cap.
    pub fell_back: bool,
    /// Non-destroyed blocks fed to the mesher.
    pub blocks_meshed: usize,
    pub quad_count: usize,
    pub vertex_count: usize,
    pub triangle_count: usize,
    /// Version of block data the mesh was built from.
    pub data_version: u64,
    /// Total time spent rebuilding (milliseconds).
    pub elapsed_ms: f64,
}

impl RebuildStats {
    /// Check if the rebuild produced any geometry.
    pub fn has_geometry(&self) -> bool {
        self.triangle_count > 0
    }
}

/// Aggregate physical and functional totals of a structure.
///
/// Sums cover non-destroyed blocks only.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StructureStats {
    /// All blocks, destroyed ones included.
    pub block_count: usize,
    pub destroyed_count: usize,
    pub total_mass: f32,
    pub total_thrust: f32,
    pub total_power: f32,
    pub total_shield: f32,
    pub durability: f32,
    pub max_durability: f32,
}

impl StructureStats {
    /// Blocks still standing.
    pub fn live_count(&self) -> usize {
        self.block_count - self.destroyed_count
    }

    /// Remaining durability as a fraction of the live blocks' maximum.
    pub fn integrity(&self) -> f32 {
        if self.max_durability > 0.0 {
            self.durability / self.max_durability
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_prefers_greedy() {
        let config = MesherConfig::default();
        assert_eq!(config.strategy, MeshStrategy::Greedy);
        assert_eq!(config.max_grid_axis, 1000);
        assert_eq!(config.sampling, GridSampling::Rasterize);
    }

    #[test]
    fn presets_change_one_field() {
        let simple = MesherConfig::simple_only();
        assert_eq!(simple.strategy, MeshStrategy::Simple);
        assert_eq!(simple.max_grid_axis, MAX_GRID_AXIS);

        let point = MesherConfig::point_sampled();
        assert_eq!(point.strategy, MeshStrategy::Greedy);
        assert_eq!(point.sampling, GridSampling::CenterPoint);
    }

    #[test]
    fn rebuild_stats_default() {
        let stats = RebuildStats::default();
        assert!(!stats.has_geometry());
        assert!(!stats.fell_back);
        assert_eq!(stats.mesher, MeshStrategy::Greedy);
    }

    #[test]
    fn structure_stats_integrity() {
        let mut stats = StructureStats::default();
        assert_eq!(stats.integrity(), 0.0);

        stats.block_count = 3;
        stats.destroyed_count = 1;
        stats.durability = 150.0;
        stats.max_durability = 200.0;
        assert_eq!(stats.live_count(), 2);
        assert_eq!(stats.integrity(), 0.75);
    }
}
