//! Voxel blocks and their derived stats.
//!
//! Every stat that depends on geometry, shape, material and role is computed
//! once in the constructor. After that only durability changes, and only
//! downwards through [`VoxelBlock::take_damage`].

use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec3;

use crate::core::Rgba;
use crate::error::{BlockError, Result};
use crate::material::{MaterialProperties, MaterialTable, MaterialTier};

/// Base durability of one unit of volume before material scaling.
pub const BASE_DURABILITY: f32 = 100.0;

/// Source of [`BlockId`]s. Shared by every structure in the process.
static NEXT_BLOCK_ID: AtomicU64 = AtomicU64::new(1);

/// Block identifier, unique within the current process only.
///
/// Ids come from one process-wide counter, so blocks from different
/// structures never collide, but ids are not stable across runs and must
/// not be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(u64);

impl BlockId {
    fn next() -> Self {
        Self(NEXT_BLOCK_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Functional category of a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BlockType {
    // Structural
    #[default]
    Hull,
    Armor,
    // Functional
    Engine,
    Thruster,
    GyroArray,
    Generator,
    ShieldGenerator,
    // Weapons
    TurretMount,
    // Systems
    HyperdriveCore,
    Cargo,
    CrewQuarters,
    PodDocking,
    Computer,
    Battery,
    IntegrityField,
}

/// Geometric shape; scales the effective volume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BlockShape {
    #[default]
    Cube,
    Wedge,
    Corner,
    InnerCorner,
    Tetrahedron,
    HalfBlock,
}

impl BlockShape {
    /// Fraction of the bounding box the shape fills.
    pub const fn volume_factor(self) -> f32 {
        match self {
            BlockShape::Cube => 1.0,
            BlockShape::Wedge | BlockShape::HalfBlock => 0.5,
            BlockShape::Corner | BlockShape::Tetrahedron => 0.25,
            BlockShape::InnerCorner => 0.75,
        }
    }
}

/// Direction a shaped block faces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BlockOrientation {
    PosX,
    NegX,
    #[default]
    PosY,
    NegY,
    PosZ,
    NegZ,
}

/// Everything needed to construct a block.
///
/// # Example
/// ```
/// use block_mesher::{BlockSpec, BlockType, MaterialTable, VoxelBlock};
/// use glam::Vec3;
///
/// let table = MaterialTable::new();
/// let spec = BlockSpec::new(Vec3::ZERO)
///     .material("Trinium")
///     .block_type(BlockType::Generator);
/// let block = VoxelBlock::from_spec(&table, &spec);
/// assert_eq!(block.power_generation(), 100.0 * 1.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSpec {
    pub position: Vec3,
    pub size: Vec3,
    pub material: String,
    pub block_type: BlockType,
    pub shape: BlockShape,
    pub orientation: BlockOrientation,
}

impl BlockSpec {
    /// Unit Iron hull cube centered at `position`.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            size: Vec3::ONE,
            material: MaterialTier::Iron.name().to_string(),
            block_type: BlockType::Hull,
            shape: BlockShape::Cube,
            orientation: BlockOrientation::PosY,
        }
    }

    pub fn size(mut self, size: Vec3) -> Self {
        self.size = size;
        self
    }

    pub fn material(mut self, material: impl Into<String>) -> Self {
        self.material = material.into();
        self
    }

    pub fn block_type(mut self, block_type: BlockType) -> Self {
        self.block_type = block_type;
        self
    }

    pub fn shape(mut self, shape: BlockShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn orientation(mut self, orientation: BlockOrientation) -> Self {
        self.orientation = orientation;
        self
    }
}

/// Derived stats, a pure function of (size, shape, material, block type).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DerivedStats {
    pub volume: f32,
    pub mass: f32,
    pub max_durability: f32,
    pub thrust_power: f32,
    pub power_generation: f32,
    pub shield_capacity: f32,
}

impl DerivedStats {
    /// Compute the stats for a block description.
    pub fn compute(
        size: Vec3,
        shape: BlockShape,
        material: &MaterialProperties,
        block_type: BlockType,
    ) -> Self {
        let volume = (size.x * size.y * size.z).max(0.0) * shape.volume_factor();

        let mut stats = Self {
            volume,
            mass: volume * material.mass_multiplier,
            max_durability: BASE_DURABILITY * material.durability_multiplier * volume,
            ..Self::default()
        };

        let efficiency = material.energy_efficiency;
        match block_type {
            BlockType::Armor => {
                stats.max_durability *= 5.0;
                stats.mass *= 1.5;
            }
            BlockType::Engine => stats.thrust_power = 50.0 * volume * efficiency,
            BlockType::Thruster => stats.thrust_power = 30.0 * volume * efficiency,
            // Torque, reported through the thrust channel.
            BlockType::GyroArray => stats.thrust_power = 20.0 * volume * efficiency,
            BlockType::Generator => stats.power_generation = 100.0 * volume * efficiency,
            BlockType::ShieldGenerator => {
                stats.shield_capacity = 200.0 * volume * material.shield_multiplier
            }
            _ => {}
        }

        stats
    }
}

/// A single block of a structure.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelBlock {
    id: BlockId,
    position: Vec3,
    size: Vec3,
    material_name: String,
    material: MaterialTier,
    block_type: BlockType,
    shape: BlockShape,
    orientation: BlockOrientation,
    stats: DerivedStats,
    durability: f32,
    color: Rgba,
    destroyed: bool,
}

impl VoxelBlock {
    /// Construct a block, resolving the material name leniently.
    ///
    /// Unknown names fall back to Iron; see [`MaterialTable::resolve_name`].
    pub fn new(
        materials: &MaterialTable,
        position: Vec3,
        size: Vec3,
        material_name: &str,
        block_type: BlockType,
        shape: BlockShape,
        orientation: BlockOrientation,
    ) -> Self {
        let tier = materials.resolve_name(material_name);
        Self::build(
            materials.get(tier),
            position,
            size,
            material_name,
            block_type,
            shape,
            orientation,
        )
    }

    /// Construct a block, rejecting unknown materials and degenerate sizes.
    pub fn try_new(
        materials: &MaterialTable,
        position: Vec3,
        size: Vec3,
        material_name: &str,
        block_type: BlockType,
        shape: BlockShape,
        orientation: BlockOrientation,
    ) -> Result<Self> {
        if !size.is_finite() || size.min_element() <= 0.0 {
            return Err(BlockError::InvalidSize { size });
        }
        let material = materials.lookup_exact(material_name)?;
        Ok(Self::build(
            material,
            position,
            size,
            material_name,
            block_type,
            shape,
            orientation,
        ))
    }

    /// Lenient construction from a [`BlockSpec`].
    pub fn from_spec(materials: &MaterialTable, spec: &BlockSpec) -> Self {
        Self::new(
            materials,
            spec.position,
            spec.size,
            &spec.material,
            spec.block_type,
            spec.shape,
            spec.orientation,
        )
    }

    /// Strict construction from a [`BlockSpec`].
    pub fn try_from_spec(materials: &MaterialTable, spec: &BlockSpec) -> Result<Self> {
        Self::try_new(
            materials,
            spec.position,
            spec.size,
            &spec.material,
            spec.block_type,
            spec.shape,
            spec.orientation,
        )
    }

    fn build(
        material: &MaterialProperties,
        position: Vec3,
        size: Vec3,
        material_name: &str,
        block_type: BlockType,
        shape: BlockShape,
        orientation: BlockOrientation,
    ) -> Self {
        let stats = DerivedStats::compute(size, shape, material, block_type);
        // NaN never compares > 0, so a NaN-sized block starts destroyed too.
        let durability = if stats.max_durability > 0.0 { stats.max_durability } else { 0.0 };

        Self {
            id: BlockId::next(),
            position,
            size,
            material_name: material_name.to_string(),
            material: material.tier,
            block_type,
            shape,
            orientation,
            stats,
            durability,
            color: material.color,
            destroyed: durability == 0.0,
        }
    }

    /// Apply damage. Returns true if this call destroyed the block.
    ///
    /// Saturates at zero; negative and NaN amounts are ignored, so a destroyed
    /// block can never come back.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.destroyed || !(amount > 0.0) {
            return false;
        }
        self.durability = (self.durability - amount).max(0.0);
        if self.durability == 0.0 {
            self.destroyed = true;
            return true;
        }
        false
    }

    /// Axis-aligned box overlap test. Touching faces do not intersect.
    pub fn intersects(&self, other: &VoxelBlock) -> bool {
        let (a_min, a_max) = self.bounds();
        let (b_min, b_max) = other.bounds();
        a_min.cmplt(b_max).all() && a_max.cmpgt(b_min).all()
    }

    /// Min and max corners of the block's box.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let half = self.size * 0.5;
        (self.position - half, self.position + half)
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn size(&self) -> Vec3 {
        self.size
    }

    /// The material name as it was requested.
    pub fn material_name(&self) -> &str {
        &self.material_name
    }

    /// The tier the material name resolved to.
    pub fn material(&self) -> MaterialTier {
        self.material
    }

    pub fn block_type(&self) -> BlockType {
        self.block_type
    }

    pub fn shape(&self) -> BlockShape {
        self.shape
    }

    pub fn orientation(&self) -> BlockOrientation {
        self.orientation
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn durability(&self) -> f32 {
        self.durability
    }

    pub fn max_durability(&self) -> f32 {
        self.stats.max_durability
    }

    pub fn mass(&self) -> f32 {
        self.stats.mass
    }

    /// Effective volume after the shape factor.
    pub fn volume(&self) -> f32 {
        self.stats.volume
    }

    pub fn thrust_power(&self) -> f32 {
        self.stats.thrust_power
    }

    pub fn power_generation(&self) -> f32 {
        self.stats.power_generation
    }

    pub fn shield_capacity(&self) -> f32 {
        self.stats.shield_capacity
    }

    pub fn stats(&self) -> &DerivedStats {
        &self.stats
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Remaining durability as a fraction of the maximum (0 when destroyed).
    pub fn health_fraction(&self) -> f32 {
        if self.stats.max_durability > 0.0 {
            self.durability / self.stats.max_durability
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn block(table: &MaterialTable, material: &str, block_type: BlockType, shape: BlockShape) -> VoxelBlock {
        VoxelBlock::new(table, Vec3::ZERO, Vec3::ONE, material, block_type, shape, BlockOrientation::PosY)
    }

    #[test]
    fn unit_engine_stats() {
        let table = MaterialTable::new();
        for tier in MaterialTier::ALL {
            let props = table.get(tier);
            let engine = block(&table, tier.name(), BlockType::Engine, BlockShape::Cube);

            assert_eq!(engine.thrust_power(), 50.0 * props.energy_efficiency);
            assert_eq!(engine.max_durability(), 100.0 * props.durability_multiplier);
            assert_eq!(engine.durability(), engine.max_durability());
            assert_eq!(engine.power_generation(), 0.0);
            assert_eq!(engine.shield_capacity(), 0.0);
        }
    }

    #[test]
    fn shape_scales_volume() {
        let table = MaterialTable::new();
        let cases = [
            (BlockShape::Cube, 1.0),
            (BlockShape::Wedge, 0.5),
            (BlockShape::HalfBlock, 0.5),
            (BlockShape::Corner, 0.25),
            (BlockShape::Tetrahedron, 0.25),
            (BlockShape::InnerCorner, 0.75),
        ];
        for (shape, factor) in cases {
            let b = VoxelBlock::new(
                &table,
                Vec3::ZERO,
                Vec3::new(2.0, 1.0, 2.0),
                "Iron",
                BlockType::Hull,
                shape,
                BlockOrientation::PosY,
            );
            assert_eq!(b.volume(), 4.0 * factor, "{shape:?}");
            assert_eq!(b.mass(), 4.0 * factor);
            assert_eq!(b.max_durability(), 400.0 * factor);
        }
    }

    #[test]
    fn armor_is_tougher_and_heavier() {
        let table = MaterialTable::new();
        let hull = block(&table, "Titanium", BlockType::Hull, BlockShape::Cube);
        let armor = block(&table, "Titanium", BlockType::Armor, BlockShape::Cube);

        assert_eq!(armor.max_durability(), hull.max_durability() * 5.0);
        assert_eq!(armor.durability(), armor.max_durability());
        assert_eq!(armor.mass(), hull.mass() * 1.5);
    }

    #[test]
    fn functional_outputs_are_exclusive() {
        let table = MaterialTable::new();
        let cases = [
            (BlockType::Engine, 50.0 * 1.8, 0.0, 0.0),
            (BlockType::Thruster, 30.0 * 1.8, 0.0, 0.0),
            (BlockType::GyroArray, 20.0 * 1.8, 0.0, 0.0),
            (BlockType::Generator, 0.0, 100.0 * 1.8, 0.0),
            (BlockType::ShieldGenerator, 0.0, 0.0, 200.0 * 2.0),
            (BlockType::Cargo, 0.0, 0.0, 0.0),
            (BlockType::Hull, 0.0, 0.0, 0.0),
        ];
        for (block_type, thrust, power, shield) in cases {
            let b = block(&table, "Xanion", block_type, BlockShape::Cube);
            assert_eq!(b.thrust_power(), thrust, "{block_type:?}");
            assert_eq!(b.power_generation(), power, "{block_type:?}");
            assert_eq!(b.shield_capacity(), shield, "{block_type:?}");
        }
    }

    #[test]
    fn iron_shield_generator_has_no_capacity() {
        let table = MaterialTable::new();
        let b = block(&table, "Iron", BlockType::ShieldGenerator, BlockShape::Cube);
        assert_eq!(b.shield_capacity(), 0.0);
    }

    #[test]
    fn derived_stats_are_deterministic() {
        let table = MaterialTable::new();
        let spec = BlockSpec::new(Vec3::new(3.0, -2.0, 7.0))
            .size(Vec3::new(1.5, 0.7, 2.25))
            .material("Ogonite")
            .block_type(BlockType::Thruster)
            .shape(BlockShape::InnerCorner);

        let a = VoxelBlock::from_spec(&table, &spec);
        let b = VoxelBlock::from_spec(&table, &spec);

        assert_ne!(a.id(), b.id());
        assert_eq!(a.stats().mass.to_bits(), b.stats().mass.to_bits());
        assert_eq!(a.stats().max_durability.to_bits(), b.stats().max_durability.to_bits());
        assert_eq!(a.stats().thrust_power.to_bits(), b.stats().thrust_power.to_bits());
    }

    #[test]
    fn unknown_material_falls_back_to_iron() {
        let table = MaterialTable::new();
        let b = block(&table, "Balsa", BlockType::Hull, BlockShape::Cube);
        assert_eq!(b.material(), MaterialTier::Iron);
        assert_eq!(b.material_name(), "Balsa");
        assert_eq!(b.color(), table.get(MaterialTier::Iron).color);
    }

    #[test]
    fn try_new_validates() {
        let table = MaterialTable::new();
        let bad_material = VoxelBlock::try_from_spec(&table, &BlockSpec::new(Vec3::ZERO).material("Balsa"));
        assert!(matches!(bad_material, Err(BlockError::UnknownMaterial { .. })));

        let bad_size = VoxelBlock::try_from_spec(&table, &BlockSpec::new(Vec3::ZERO).size(Vec3::new(1.0, 0.0, 1.0)));
        assert!(matches!(bad_size, Err(BlockError::InvalidSize { .. })));

        let nan_size = VoxelBlock::try_from_spec(&table, &BlockSpec::new(Vec3::ZERO).size(Vec3::splat(f32::NAN)));
        assert!(matches!(nan_size, Err(BlockError::InvalidSize { .. })));

        let ok = VoxelBlock::try_from_spec(&table, &BlockSpec::new(Vec3::ZERO).material("avorion"));
        assert_eq!(ok.map(|b| b.material()), Ok(MaterialTier::Avorion));
    }

    #[test]
    fn zero_volume_block_starts_destroyed() {
        let table = MaterialTable::new();
        let b = VoxelBlock::from_spec(&table, &BlockSpec::new(Vec3::ZERO).size(Vec3::new(1.0, 0.0, 1.0)));
        assert_eq!(b.durability(), 0.0);
        assert!(b.is_destroyed());
    }

    #[test]
    fn damage_saturates_and_destroys() {
        let table = MaterialTable::new();
        let mut b = block(&table, "Iron", BlockType::Hull, BlockShape::Cube);

        assert!(!b.take_damage(40.0));
        assert_eq!(b.durability(), 60.0);
        assert!(!b.is_destroyed());
        assert!((b.health_fraction() - 0.6).abs() < 1e-6);

        assert!(b.take_damage(1000.0));
        assert_eq!(b.durability(), 0.0);
        assert!(b.is_destroyed());

        // Already destroyed: nothing further happens.
        assert!(!b.take_damage(10.0));
        assert_eq!(b.durability(), 0.0);
    }

    #[test]
    fn negative_damage_never_heals() {
        let table = MaterialTable::new();
        let mut b = block(&table, "Iron", BlockType::Hull, BlockShape::Cube);
        b.take_damage(50.0);
        b.take_damage(-500.0);
        b.take_damage(f32::NAN);
        assert_eq!(b.durability(), 50.0);
    }

    #[test]
    fn random_damage_sequences_keep_invariants() {
        let table = MaterialTable::new();
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..200 {
            let tier = MaterialTier::ALL[rng.gen_range(0..7)];
            let block_type = if rng.gen_bool(0.5) { BlockType::Armor } else { BlockType::Hull };
            let mut b = block(&table, tier.name(), block_type, BlockShape::Cube);

            for _ in 0..rng.gen_range(1..20) {
                b.take_damage(rng.gen_range(-50.0..400.0));
                assert!(b.durability() >= 0.0);
                assert!(b.durability() <= b.max_durability());
                assert_eq!(b.is_destroyed(), b.durability() == 0.0);
            }
        }
    }

    #[test]
    fn ids_are_unique_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0..250).map(|_| BlockId::next()).collect::<Vec<_>>()))
            .collect();

        let mut ids: Vec<BlockId> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
        assert!(ids.iter().all(|id| id.raw() > 0));
    }

    #[test]
    fn intersects_is_strict_box_overlap() {
        let table = MaterialTable::new();
        let at = |x: f32, y: f32, z: f32| VoxelBlock::from_spec(&table, &BlockSpec::new(Vec3::new(x, y, z)));

        let origin = at(0.0, 0.0, 0.0);
        assert!(origin.intersects(&at(0.5, 0.5, 0.5)));
        assert!(origin.intersects(&at(0.0, 0.0, 0.0)));
        // Face-adjacent blocks only touch.
        assert!(!origin.intersects(&at(1.0, 0.0, 0.0)));
        assert!(!origin.intersects(&at(0.0, 0.0, -3.0)));

        let big = VoxelBlock::from_spec(&table, &BlockSpec::new(Vec3::ZERO).size(Vec3::splat(4.0)));
        assert!(big.intersects(&at(1.5, -1.5, 1.5)));
        assert!(at(1.5, -1.5, 1.5).intersects(&big));
    }
}
