//! Per-face neighbour culling without merging.
//!
//! Every exposed face of every live block becomes its own quad. Cost is
//! O(blocks x 6) regardless of how spread out the structure is, which makes
//! this the fallback when the greedy grid would be too large.

use glam::Vec3;

use crate::block::VoxelBlock;
use crate::core::{face_axis, face_is_positive, plane_axes, MeshOutput, FACE_NORMALS};
use crate::expand::emit_quad;
use crate::spatial::SpatialIndex;

/// Baseline mesher: one quad per exposed block face.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleMesher;

impl SimpleMesher {
    /// Mesh all non-destroyed blocks. Faces are emitted block by block, in
    /// face order +X, -X, +Y, -Y, +Z, -Z.
    ///
    /// A block whose cell is owned by a later block (see [`SpatialIndex`])
    /// is hidden.
    pub fn mesh(&self, blocks: &[VoxelBlock]) -> MeshOutput {
        let index = SpatialIndex::build(blocks);
        let mut output = MeshOutput::with_capacity(index.len() * 6);

        for (i, block) in blocks.iter().enumerate() {
            let position = block.position();
            if index.get(position) != Some(i) {
                continue;
            }
            let size = block.size();
            let half = size * 0.5;

            for (face, normal) in FACE_NORMALS.iter().enumerate() {
                let neighbour = position + Vec3::from_array(*normal) * size;
                if index.is_occupied(neighbour) {
                    continue;
                }

                let axis = face_axis(face);
                let (u, v) = plane_axes(axis);

                let mut corner = position - half;
                corner[axis] = if face_is_positive(face) {
                    position[axis] + half[axis]
                } else {
                    position[axis] - half[axis]
                };

                let du = Vec3::AXES[u] * size[u];
                let dv = Vec3::AXES[v] * size[v];
                emit_quad(face, corner, du, dv, block.color(), &mut output);
            }
        }

        output
    }
}

/// Mesh blocks with [`SimpleMesher`].
pub fn mesh_simple(blocks: &[VoxelBlock]) -> MeshOutput {
    SimpleMesher.mesh(blocks)
}
