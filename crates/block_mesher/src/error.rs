//! Error types for the strict construction paths.
//!
//! The lenient entry points (`VoxelBlock::new`, `MaterialTable::resolve_name`,
//! `VoxelStructure::place`) never fail. Only the `try_*` variants surface these.

use glam::Vec3;
use thiserror::Error;

/// Errors raised when a block description is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BlockError {
    /// The material name does not exactly name a known tier.
    #[error("unknown material `{name}`")]
    UnknownMaterial { name: String },

    /// Block extents must be finite and strictly positive on every axis.
    #[error("invalid block size {size}: extents must be finite and > 0")]
    InvalidSize { size: Vec3 },
}

/// Convenience alias used by the fallible APIs of this crate.
pub type Result<T> = std::result::Result<T, BlockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_material_message() {
        let err = BlockError::UnknownMaterial { name: "unobtainium".into() };
        assert_eq!(err.to_string(), "unknown material `unobtainium`");
    }

    #[test]
    fn invalid_size_message_mentions_extents() {
        let err = BlockError::InvalidSize { size: Vec3::new(1.0, 0.0, 1.0) };
        assert!(err.to_string().contains("extents must be finite"));
    }
}
