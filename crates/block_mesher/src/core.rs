//! Core type definitions shared by both meshers.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Reference from a grid cell to a block: block index + 1.
pub type CellRef = u32;

/// Reserved cell value for unoccupied cells.
pub const CELL_EMPTY: CellRef = 0;

/// Largest grid extent (in cells, per axis) the greedy mesher will allocate.
pub const MAX_GRID_AXIS: usize = 1000;

/// Face direction indices.
pub const FACE_POS_X: usize = 0;
pub const FACE_NEG_X: usize = 1;
pub const FACE_POS_Y: usize = 2;
pub const FACE_NEG_Y: usize = 3;
pub const FACE_POS_Z: usize = 4;
pub const FACE_NEG_Z: usize = 5;

/// Normal vectors for each face direction.
pub const FACE_NORMALS: [[f32; 3]; 6] = [
    [1.0, 0.0, 0.0],   // +X
    [-1.0, 0.0, 0.0],  // -X
    [0.0, 1.0, 0.0],   // +Y
    [0.0, -1.0, 0.0],  // -Y
    [0.0, 0.0, 1.0],   // +Z
    [0.0, 0.0, -1.0],  // -Z
];

/// Face index for an axis (0 = X, 1 = Y, 2 = Z) and direction.
#[inline]
pub const fn face_index(axis: usize, positive: bool) -> usize {
    axis * 2 + if positive { 0 } else { 1 }
}

/// Axis a face points along.
#[inline]
pub const fn face_axis(face: usize) -> usize {
    face / 2
}

/// Whether a face points along the positive axis.
#[inline]
pub const fn face_is_positive(face: usize) -> bool {
    face % 2 == 0
}

/// In-plane axes `(u, v)` for faces perpendicular to `axis`.
///
/// Cyclic order, so `e_u x e_v = e_axis` for every axis and one winding rule
/// serves all three.
#[inline]
pub const fn plane_axes(axis: usize) -> (usize, usize) {
    ((axis + 1) % 3, (axis + 2) % 3)
}

/// 8-bit RGBA vertex color.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Output mesh data handed to the mesh/collision builder.
///
/// Four parallel streams: every quad contributes 4 vertices (positions,
/// normals, colors) and 6 indices (two triangles).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MeshOutput {
    /// Vertex positions (3 floats per vertex).
    pub positions: Vec<f32>,
    /// Vertex normals (3 floats per vertex).
    pub normals: Vec<f32>,
    /// Triangle indices (3 indices per triangle).
    pub indices: Vec<u32>,
    /// Per-vertex colors.
    pub colors: Vec<Rgba>,
}

impl MeshOutput {
    /// Pre-allocate capacity for an estimated quad count.
    pub fn with_capacity(estimated_quads: usize) -> Self {
        let verts = estimated_quads * 4;
        Self {
            positions: Vec::with_capacity(verts * 3),
            normals: Vec::with_capacity(verts * 3),
            indices: Vec::with_capacity(estimated_quads * 6),
            colors: Vec::with_capacity(verts),
        }
    }

    /// Number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of quads in the mesh.
    pub fn quad_count(&self) -> usize {
        self.vertex_count() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Clear all mesh data, keeping allocations.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.indices.clear();
        self.colors.clear();
    }

    /// Position of vertex `i`.
    #[inline]
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[i * 3..i * 3 + 3])
    }

    /// Normal of vertex `i`.
    #[inline]
    pub fn normal(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.normals[i * 3..i * 3 + 3])
    }

    /// Area of quad `q` (vertices `4q..4q+4`, laid out around the rectangle).
    pub fn quad_area(&self, q: usize) -> f32 {
        let v0 = self.position(q * 4);
        let v1 = self.position(q * 4 + 1);
        let v3 = self.position(q * 4 + 3);
        (v1 - v0).cross(v3 - v0).length()
    }

    /// Total surface area covered by all quads.
    pub fn surface_area(&self) -> f32 {
        (0..self.quad_count()).map(|q| self.quad_area(q)).sum()
    }

    /// Surface area per face direction, keyed by the quad's normal.
    ///
    /// Quads whose normal is not one of [`FACE_NORMALS`] are not counted.
    pub fn surface_area_per_face(&self) -> [f32; 6] {
        let mut areas = [0.0f32; 6];
        for q in 0..self.quad_count() {
            let n = self.normal(q * 4);
            if let Some(face) = FACE_NORMALS.iter().position(|f| Vec3::from_array(*f) == n) {
                areas[face] += self.quad_area(q);
            }
        }
        areas
    }

    /// Raw bytes of the position stream, for buffer upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw bytes of the color stream, for buffer upload.
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }
}
