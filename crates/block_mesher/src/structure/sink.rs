//! Hand-off of finished meshes to the host's mesh/collision builder.

use crate::core::MeshOutput;
use crate::mesh::MeshStats;

use super::stats::MeshStrategy;

/// Mesh data for a whole structure.
#[derive(Clone, Debug)]
pub struct StructureMesh {
    pub output: MeshOutput,
    pub stats: MeshStats,
    /// Mesher that produced the geometry.
    pub mesher: MeshStrategy,
    /// Version of block data this mesh was built from.
    pub data_version: u64,
}

impl StructureMesh {
    /// Check if the mesh is empty.
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Get approximate memory usage in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.output.positions.len() * 4
            + self.output.normals.len() * 4
            + self.output.indices.len() * 4
            + self.output.colors.len() * 4
    }
}

/// Receiver for rebuilt meshes.
///
/// Implemented by whatever turns vertex arrays into render and collision
/// geometry. Any `FnMut(&StructureMesh)` closure is a sink.
pub trait MeshSink {
    fn submit(&mut self, mesh: &StructureMesh);
}

impl<F> MeshSink for F
where
    F: FnMut(&StructureMesh),
{
    fn submit(&mut self, mesh: &StructureMesh) {
        self(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Rgba;

    #[test]
    fn memory_counts_every_stream() {
        let mut output = MeshOutput::default();
        output.positions.extend_from_slice(&[0.0; 12]);
        output.normals.extend_from_slice(&[0.0; 12]);
        output.colors.extend_from_slice(&[Rgba::WHITE; 4]);
        output.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);

        let mesh = StructureMesh {
            output,
            stats: MeshStats::default(),
            mesher: MeshStrategy::Simple,
            data_version: 1,
        };
        assert!(!mesh.is_empty());
        assert_eq!(mesh.memory_bytes(), 48 + 48 + 24 + 16);
    }

    #[test]
    fn closures_are_sinks() {
        let mut versions = Vec::new();
        let mut sink = |mesh: &StructureMesh| versions.push(mesh.data_version);

        let mesh = StructureMesh {
            output: MeshOutput::default(),
            stats: MeshStats::default(),
            mesher: MeshStrategy::Greedy,
            data_version: 7,
        };
        sink.submit(&mesh);
        sink.submit(&mesh);
        assert_eq!(versions, vec![7, 7]);
    }
}
