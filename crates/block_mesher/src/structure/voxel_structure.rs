//! Block collection with dirty tracking and mesh rebuilds.

use std::sync::Arc;
use std::time::Instant;

use crate::block::{BlockId, BlockSpec, VoxelBlock};
use crate::error::Result;
use crate::material::MaterialTable;
use crate::mesh::mesh_blocks;

use super::sink::{MeshSink, StructureMesh};
use super::stats::{MesherConfig, RebuildStats, StructureStats};

/// An ordered collection of blocks that owns its surface mesh.
///
/// Every mutation that changes the mesh input marks the structure dirty and
/// bumps its data version. [`rebuild_if_dirty`](Self::rebuild_if_dirty)
/// meshes once per batch of mutations.
#[derive(Debug, Clone)]
pub struct VoxelStructure {
    materials: Arc<MaterialTable>,
    config: MesherConfig,
    blocks: Vec<VoxelBlock>,
    dirty: bool,
    /// Incremented on every change to the mesh input.
    data_version: u64,
    mesh: Option<StructureMesh>,
}

impl VoxelStructure {
    /// Create an empty structure with the default mesher config.
    pub fn new(materials: Arc<MaterialTable>) -> Self {
        Self::with_config(materials, MesherConfig::default())
    }

    /// Create an empty structure with a custom mesher config.
    pub fn with_config(materials: Arc<MaterialTable>, config: MesherConfig) -> Self {
        Self {
            materials,
            config,
            blocks: Vec::new(),
            dirty: false,
            data_version: 0,
            mesh: None,
        }
    }

    pub fn materials(&self) -> &Arc<MaterialTable> {
        &self.materials
    }

    pub fn config(&self) -> &MesherConfig {
        &self.config
    }

    /// Replace the mesher config. The next rebuild uses it.
    pub fn set_config(&mut self, config: MesherConfig) {
        if self.config != config {
            self.config = config;
            self.mark_dirty();
        }
    }

    // =========================================================================
    // Block access
    // =========================================================================

    /// Append a block.
    pub fn add_block(&mut self, block: VoxelBlock) -> BlockId {
        let id = block.id();
        self.blocks.push(block);
        self.mark_dirty();
        id
    }

    /// Build a block from `spec` (lenient material lookup) and append it.
    pub fn place(&mut self, spec: &BlockSpec) -> BlockId {
        let block = VoxelBlock::from_spec(&self.materials, spec);
        self.add_block(block)
    }

    /// Build a block from `spec` with strict validation and append it.
    ///
    /// On error the structure is left untouched.
    pub fn try_place(&mut self, spec: &BlockSpec) -> Result<BlockId> {
        let block = VoxelBlock::try_from_spec(&self.materials, spec)?;
        Ok(self.add_block(block))
    }

    /// Remove a block by id. Returns false if no such block exists.
    pub fn remove_block(&mut self, id: BlockId) -> bool {
        match self.blocks.iter().position(|b| b.id() == id) {
            Some(index) => {
                self.blocks.remove(index);
                self.mark_dirty();
                true
            }
            None => false,
        }
    }

    pub fn block(&self, id: BlockId) -> Option<&VoxelBlock> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    /// All blocks in insertion order, destroyed ones included.
    pub fn blocks(&self) -> &[VoxelBlock] {
        &self.blocks
    }

    /// Damage a block by id.
    ///
    /// Returns `None` if the block does not exist, otherwise whether this
    /// call destroyed it. Only a destroying hit changes the mesh.
    pub fn damage_block(&mut self, id: BlockId, amount: f32) -> Option<bool> {
        let block = self.blocks.iter_mut().find(|b| b.id() == id)?;
        let destroyed = block.take_damage(amount);
        if destroyed {
            self.mark_dirty();
        }
        Some(destroyed)
    }

    /// Remove every block.
    pub fn clear_blocks(&mut self) {
        self.blocks.clear();
        self.mark_dirty();
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Mass of all non-destroyed blocks.
    pub fn total_mass(&self) -> f32 {
        self.live_blocks().map(VoxelBlock::mass).sum()
    }

    fn live_blocks(&self) -> impl Iterator<Item = &VoxelBlock> {
        self.blocks.iter().filter(|b| !b.is_destroyed())
    }

    /// Aggregate totals over the structure.
    pub fn stats(&self) -> StructureStats {
        let mut stats = StructureStats {
            block_count: self.blocks.len(),
            ..StructureStats::default()
        };
        for block in &self.blocks {
            if block.is_destroyed() {
                stats.destroyed_count += 1;
                continue;
            }
            stats.total_mass += block.mass();
            stats.total_thrust += block.thrust_power();
            stats.total_power += block.power_generation();
            stats.total_shield += block.shield_capacity();
            stats.durability += block.durability();
            stats.max_durability += block.max_durability();
        }
        stats
    }

    // =========================================================================
    // Meshing
    // =========================================================================

    /// Flag the mesh as stale.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
        self.data_version += 1;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn data_version(&self) -> u64 {
        self.data_version
    }

    /// The last rebuilt mesh, if any rebuild has happened.
    pub fn mesh(&self) -> Option<&StructureMesh> {
        self.mesh.as_ref()
    }

    /// Rebuild the mesh if anything changed since the last rebuild.
    ///
    /// Returns `None` when the structure was clean and no work was done.
    pub fn rebuild_if_dirty(&mut self) -> Option<RebuildStats> {
        if !self.dirty {
            return None;
        }

        let start_time = Instant::now();
        let result = mesh_blocks(&self.blocks, &self.config);

        let stats = RebuildStats {
            mesher: result.mesher,
            fell_back: result.fell_back,
            blocks_meshed: self.live_blocks().count(),
            quad_count: result.stats.quad_count,
            vertex_count: result.stats.vertex_count,
            triangle_count: result.stats.triangle_count,
            data_version: self.data_version,
            elapsed_ms: start_time.elapsed().as_secs_f64() * 1000.0,
        };

        log::debug!(
            "rebuilt structure v{} with {:?} mesher: {} blocks, {} quads in {:.2}ms",
            stats.data_version,
            stats.mesher,
            stats.blocks_meshed,
            stats.quad_count,
            stats.elapsed_ms
        );

        self.mesh = Some(StructureMesh {
            output: result.mesh,
            stats: result.stats,
            mesher: result.mesher,
            data_version: self.data_version,
        });
        self.dirty = false;

        Some(stats)
    }

    /// Rebuild if dirty and submit the new mesh to `sink`.
    ///
    /// The sink only sees a mesh when a rebuild actually happened.
    pub fn update(&mut self, sink: &mut impl MeshSink) -> Option<RebuildStats> {
        let stats = self.rebuild_if_dirty()?;
        if let Some(mesh) = &self.mesh {
            sink.submit(mesh);
        }
        Some(stats)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::block::BlockType;
    use crate::error::BlockError;
    use crate::structure::MeshStrategy;

    fn structure() -> VoxelStructure {
        VoxelStructure::new(MaterialTable::shared())
    }

    #[test]
    fn new_structure_is_clean_and_empty() {
        let mut s = structure();
        assert!(s.is_empty());
        assert!(!s.is_dirty());
        assert!(s.rebuild_if_dirty().is_none());
        assert!(s.mesh().is_none());
    }

    #[test]
    fn add_marks_dirty_and_rebuild_clears() {
        let mut s = structure();
        let id = s.place(&BlockSpec::new(Vec3::ZERO));
        assert!(s.is_dirty());
        assert!(s.block(id).is_some());

        let stats = s.rebuild_if_dirty().unwrap();
        assert_eq!(stats.mesher, MeshStrategy::Greedy);
        assert_eq!(stats.quad_count, 6);
        assert_eq!(stats.blocks_meshed, 1);
        assert!(stats.has_geometry());
        assert!(!s.is_dirty());

        // Clean: nothing to do.
        assert!(s.rebuild_if_dirty().is_none());
    }

    #[test]
    fn batched_mutations_rebuild_once() {
        let mut s = structure();
        for x in 0..5 {
            s.place(&BlockSpec::new(Vec3::new(x as f32, 0.0, 0.0)));
        }
        assert_eq!(s.data_version(), 5);

        let stats = s.rebuild_if_dirty().unwrap();
        assert_eq!(stats.data_version, 5);
        assert_eq!(stats.quad_count, 6);
        assert_eq!(s.mesh().unwrap().data_version, 5);
        assert!(s.rebuild_if_dirty().is_none());
    }

    #[test]
    fn remove_absent_id_changes_nothing() {
        let mut s = structure();
        let id = s.place(&BlockSpec::new(Vec3::ZERO));
        s.rebuild_if_dirty();

        let other = VoxelBlock::from_spec(s.materials(), &BlockSpec::new(Vec3::X)).id();
        assert!(!s.remove_block(other));
        assert!(!s.is_dirty());

        assert!(s.remove_block(id));
        assert!(s.is_dirty());
        assert!(!s.remove_block(id));
        assert!(s.block(id).is_none());
    }

    #[test]
    fn removal_preserves_order() {
        let mut s = structure();
        let ids: Vec<_> = (0..4)
            .map(|x| s.place(&BlockSpec::new(Vec3::new(x as f32, 0.0, 0.0))))
            .collect();
        s.remove_block(ids[1]);

        let remaining: Vec<_> = s.blocks().iter().map(VoxelBlock::id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2], ids[3]]);
    }

    #[test]
    fn destroying_damage_removes_faces() {
        let mut s = structure();
        let a = s.place(&BlockSpec::new(Vec3::ZERO));
        let b = s.place(&BlockSpec::new(Vec3::X));
        s.rebuild_if_dirty();
        assert_eq!(s.mesh().unwrap().output.surface_area(), 10.0);

        // Non-lethal damage does not touch the mesh.
        assert_eq!(s.damage_block(b, 10.0), Some(false));
        assert!(!s.is_dirty());

        let max = s.block(b).unwrap().max_durability();
        assert_eq!(s.damage_block(b, max), Some(true));
        assert!(s.is_dirty());

        let stats = s.rebuild_if_dirty().unwrap();
        assert_eq!(stats.blocks_meshed, 1);
        assert_eq!(stats.quad_count, 6);
        let mesh = &s.mesh().unwrap().output;
        assert_eq!(mesh.surface_area(), 6.0);
        assert!(mesh.positions.chunks(3).all(|p| p[0] <= 0.5));

        // The tombstone stays until removed.
        assert!(s.block(b).unwrap().is_destroyed());
        assert_eq!(s.damage_block(b, 1.0), Some(false));
        assert!(s.block(a).is_some());
    }

    #[test]
    fn damage_unknown_block() {
        let mut s = structure();
        let ghost = VoxelBlock::from_spec(s.materials(), &BlockSpec::new(Vec3::ZERO)).id();
        assert_eq!(s.damage_block(ghost, 50.0), None);
        assert!(!s.is_dirty());
    }

    #[test]
    fn oversized_layout_falls_back_to_simple() {
        let mut s = structure();
        s.place(&BlockSpec::new(Vec3::ZERO));
        s.place(&BlockSpec::new(Vec3::new(1500.0, 0.0, 0.0)));

        let stats = s.rebuild_if_dirty().unwrap();
        assert_eq!(stats.mesher, MeshStrategy::Simple);
        assert!(stats.fell_back);
        assert_eq!(stats.quad_count, 12);
        assert_eq!(s.mesh().unwrap().output.surface_area(), 12.0);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let mut s = structure();
        for (x, y) in [(0, 0), (1, 0), (1, 1), (3, 2)] {
            s.place(&BlockSpec::new(Vec3::new(x as f32, y as f32, 0.0)).material("Naonite"));
        }
        s.rebuild_if_dirty();
        let first = s.mesh().unwrap().output.clone();

        s.mark_dirty();
        s.rebuild_if_dirty().unwrap();
        assert_eq!(s.mesh().unwrap().output, first);
    }

    #[test]
    fn total_mass_skips_destroyed() {
        let mut s = structure();
        s.place(&BlockSpec::new(Vec3::ZERO));
        let heavy = s.place(&BlockSpec::new(Vec3::X).size(Vec3::splat(2.0)));
        assert_eq!(s.total_mass(), 9.0);

        s.damage_block(heavy, f32::MAX);
        assert_eq!(s.total_mass(), 1.0);

        let stats = s.stats();
        assert_eq!(stats.block_count, 2);
        assert_eq!(stats.destroyed_count, 1);
        assert_eq!(stats.live_count(), 1);
        assert_eq!(stats.total_mass, 1.0);
        assert_eq!(stats.integrity(), 1.0);
    }

    #[test]
    fn stats_sum_functional_outputs() {
        let mut s = structure();
        s.place(&BlockSpec::new(Vec3::ZERO).block_type(BlockType::Engine));
        s.place(&BlockSpec::new(Vec3::X).block_type(BlockType::Generator).material("Trinium"));
        s.place(&BlockSpec::new(Vec3::Y).block_type(BlockType::ShieldGenerator).material("Naonite"));

        let stats = s.stats();
        assert_eq!(stats.total_thrust, 50.0);
        assert_eq!(stats.total_power, 150.0);
        assert_eq!(stats.total_shield, 200.0);
    }

    #[test]
    fn try_place_rejects_bad_specs() {
        let mut s = structure();
        let err = s.try_place(&BlockSpec::new(Vec3::ZERO).material("unobtainium"));
        assert_eq!(err, Err(BlockError::UnknownMaterial { name: "unobtainium".into() }));

        let err = s.try_place(&BlockSpec::new(Vec3::ZERO).size(Vec3::new(1.0, 0.0, 1.0)));
        assert!(matches!(err, Err(BlockError::InvalidSize { .. })));

        assert!(s.is_empty());
        assert!(!s.is_dirty());
        assert!(s.try_place(&BlockSpec::new(Vec3::ZERO).material("xanion")).is_ok());
    }

    #[test]
    fn clear_blocks_empties_mesh() {
        let mut s = structure();
        s.place(&BlockSpec::new(Vec3::ZERO));
        s.rebuild_if_dirty();
        s.clear_blocks();
        assert!(s.is_dirty());

        let stats = s.rebuild_if_dirty().unwrap();
        assert!(!stats.has_geometry());
        assert!(s.mesh().unwrap().is_empty());
    }

    #[test]
    fn config_change_marks_dirty() {
        let mut s = structure();
        s.place(&BlockSpec::new(Vec3::ZERO));
        s.place(&BlockSpec::new(Vec3::X));
        s.rebuild_if_dirty();

        s.set_config(MesherConfig::default());
        assert!(!s.is_dirty());

        s.set_config(MesherConfig::simple_only());
        let stats = s.rebuild_if_dirty().unwrap();
        assert_eq!(stats.mesher, MeshStrategy::Simple);
        assert!(!stats.fell_back);
        assert_eq!(stats.quad_count, 10);
    }

    #[test]
    fn update_submits_only_on_rebuild() {
        let mut s = structure();
        let mut received = Vec::new();
        let mut sink = |mesh: &StructureMesh| received.push((mesh.data_version, mesh.output.quad_count()));

        s.place(&BlockSpec::new(Vec3::ZERO));
        assert!(s.update(&mut sink).is_some());
        assert!(s.update(&mut sink).is_none());
        s.place(&BlockSpec::new(Vec3::Z));
        assert!(s.update(&mut sink).is_some());

        assert_eq!(received, vec![(1, 6), (2, 6)]);
    }
}
