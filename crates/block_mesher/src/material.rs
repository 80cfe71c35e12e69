//! Material tiers and their numeric properties.
//!
//! A [`MaterialTable`] is built once by the host and shared by `Arc` with every
//! structure that constructs blocks. Lookups never mutate it.

use std::sync::Arc;

use crate::core::Rgba;
use crate::error::{BlockError, Result};

/// Material progression tier, from the galaxy rim (Iron) to the core (Avorion).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum MaterialTier {
    #[default]
    Iron = 0,
    Titanium = 1,
    Naonite = 2,
    Trinium = 3,
    Xanion = 4,
    Ogonite = 5,
    Avorion = 6,
}

impl MaterialTier {
    /// All tiers in ascending order.
    pub const ALL: [MaterialTier; 7] = [
        MaterialTier::Iron,
        MaterialTier::Titanium,
        MaterialTier::Naonite,
        MaterialTier::Trinium,
        MaterialTier::Xanion,
        MaterialTier::Ogonite,
        MaterialTier::Avorion,
    ];

    /// Tier ordinal (0 = Iron).
    #[inline]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Canonical display name.
    pub const fn name(self) -> &'static str {
        match self {
            MaterialTier::Iron => "Iron",
            MaterialTier::Titanium => "Titanium",
            MaterialTier::Naonite => "Naonite",
            MaterialTier::Trinium => "Trinium",
            MaterialTier::Xanion => "Xanion",
            MaterialTier::Ogonite => "Ogonite",
            MaterialTier::Avorion => "Avorion",
        }
    }
}

/// Numeric properties of one material tier.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialProperties {
    pub name: &'static str,
    pub tier: MaterialTier,
    /// Durability relative to Iron.
    pub durability_multiplier: f32,
    /// Mass relative to Iron.
    pub mass_multiplier: f32,
    /// Efficiency of engines, thrusters, gyros and generators.
    pub energy_efficiency: f32,
    /// Shield capacity multiplier (Iron has no shields).
    pub shield_multiplier: f32,
    pub tech_level: i32,
    pub color: Rgba,
    /// Distance from the galactic center at which the tier becomes available.
    pub unlock_distance: i32,
    pub stat_multiplier: f32,
    pub tech_points_multiplier: f32,
}

impl MaterialProperties {
    #[allow(clippy::too_many_arguments)]
    const fn tier(
        tier: MaterialTier,
        durability_multiplier: f32,
        mass_multiplier: f32,
        energy_efficiency: f32,
        shield_multiplier: f32,
        color: Rgba,
        unlock_distance: i32,
        stat_multiplier: f32,
        tech_points_multiplier: f32,
    ) -> Self {
        Self {
            name: tier.name(),
            tier,
            durability_multiplier,
            mass_multiplier,
            energy_efficiency,
            shield_multiplier,
            tech_level: tier as i32,
            color,
            unlock_distance,
            stat_multiplier,
            tech_points_multiplier,
        }
    }
}

/// Immutable lookup from tier or name to [`MaterialProperties`].
///
/// # Example
/// ```
/// use block_mesher::{MaterialTable, MaterialTier};
///
/// let table = MaterialTable::new();
/// assert_eq!(table.resolve_name("titanium plating"), MaterialTier::Titanium);
/// assert_eq!(table.resolve_name("cardboard"), MaterialTier::Iron);
/// assert!(table.lookup_exact("cardboard").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MaterialTable {
    /// One record per tier, indexed by ordinal.
    entries: [MaterialProperties; 7],
}

impl MaterialTable {
    /// Build the table of all seven tiers.
    pub fn new() -> Self {
        use MaterialTier::*;
        Self {
            entries: [
                MaterialProperties::tier(Iron, 1.0, 1.0, 1.0, 0.0, Rgba::opaque(127, 127, 127), i32::MAX, 1.0, 1.0),
                MaterialProperties::tier(Titanium, 1.5, 0.9, 1.1, 0.5, Rgba::opaque(179, 204, 230), 350, 1.3, 1.5),
                MaterialProperties::tier(Naonite, 2.0, 0.8, 1.3, 1.0, Rgba::opaque(51, 230, 77), 250, 1.6, 2.5),
                MaterialProperties::tier(Trinium, 2.5, 0.6, 1.5, 1.5, Rgba::opaque(77, 153, 255), 150, 2.0, 4.0),
                MaterialProperties::tier(Xanion, 3.0, 0.5, 1.8, 2.0, Rgba::opaque(255, 230, 51), 75, 2.5, 6.0),
                MaterialProperties::tier(Ogonite, 4.0, 0.4, 2.2, 2.5, Rgba::opaque(255, 102, 38), 50, 3.0, 9.0),
                MaterialProperties::tier(Avorion, 5.0, 0.3, 3.0, 3.5, Rgba::opaque(217, 51, 255), 25, 4.0, 15.0),
            ],
        }
    }

    /// Build the table behind an `Arc`, ready to hand to structures.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Properties of a tier.
    #[inline]
    pub fn get(&self, tier: MaterialTier) -> &MaterialProperties {
        &self.entries[tier.ordinal()]
    }

    /// Iterate over all tiers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &MaterialProperties> {
        self.entries.iter()
    }

    /// Resolve a free-form material name to a tier.
    ///
    /// Case-insensitive substring match, checked from the lowest tier up, so
    /// "Iron-Avorion alloy" resolves to Iron. Names that match nothing fall
    /// back to Iron.
    pub fn resolve_name(&self, name: &str) -> MaterialTier {
        let lower = name.to_lowercase();
        match MaterialTier::ALL
            .iter()
            .find(|tier| lower.contains(&tier.name().to_lowercase()))
        {
            Some(&tier) => tier,
            None => {
                log::debug!("unknown material `{name}`, using {}", MaterialTier::Iron.name());
                MaterialTier::Iron
            }
        }
    }

    /// Properties for a free-form name, see [`resolve_name`](Self::resolve_name).
    pub fn properties_by_name(&self, name: &str) -> &MaterialProperties {
        self.get(self.resolve_name(name))
    }

    /// Strict lookup: the name must equal a tier name, ignoring case.
    pub fn lookup_exact(&self, name: &str) -> Result<&MaterialProperties> {
        let trimmed = name.trim();
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| BlockError::UnknownMaterial { name: name.to_string() })
    }

    /// Short description of what a tier brings.
    pub fn description(&self, tier: MaterialTier) -> &'static str {
        match tier {
            MaterialTier::Iron => "Basic starting material. Available everywhere in the galaxy.",
            MaterialTier::Titanium => "Stronger than iron. Provides improved hull strength and weapon damage.",
            MaterialTier::Naonite => "Unlocks shields! Essential for survival in dangerous sectors.",
            MaterialTier::Trinium => "Lightweight and energy-efficient. Great for thrusters and power systems.",
            MaterialTier::Xanion => "Advanced material with excellent power generation capabilities.",
            MaterialTier::Ogonite => "Heavy and durable. Perfect for large capital ships and defensive structures.",
            MaterialTier::Avorion => "The ultimate material. Only found at the galactic core. Unlocks all capabilities.",
        }
    }

    /// Every feature available at `tier`, cumulative over lower tiers.
    pub fn unlocked_features(&self, tier: MaterialTier) -> Vec<&'static str> {
        const FEATURES: [&[&str]; 7] = [
            &["Basic Mining", "Basic Hull", "Basic Engines"],
            &["Improved Hull Strength", "Better Weapons"],
            &["Shield Generators", "Advanced Weapons", "Salvaging"],
            &["Energy Management", "Advanced Thrusters", "Jump Drives"],
            &["Improved Power Generation", "Advanced Mining", "Refining Stations"],
            &["Advanced Trading", "Fleet Management", "Captain Automation"],
            &["Barrier Access", "Boss Encounters", "Endgame Content", "Ultimate Upgrades"],
        ];

        FEATURES[..=tier.ordinal()]
            .iter()
            .flat_map(|features| features.iter().copied())
            .collect()
    }
}

impl Default for MaterialTable {
    fn default() -> Self {
        Self::new()
    }
}
