//! Quad expansion to vertex arrays.
//!
//! Both meshers describe every face as a corner plus two edge vectors spanning
//! the face plane. [`emit_quad`] turns that into 4 vertices and 6 indices with
//! counter-clockwise winding seen from outside the structure.

use glam::{I64Vec3, Vec3};

use crate::core::{face_axis, face_is_positive, plane_axes, MeshOutput, Rgba, FACE_NORMALS};
use crate::merge::GridQuad;

/// Emit one quad.
///
/// `corner` is the corner with the smallest in-plane coordinates, `du`/`dv`
/// run along the face's `(u, v)` plane axes (see [`plane_axes`]).
pub fn emit_quad(face: usize, corner: Vec3, du: Vec3, dv: Vec3, color: Rgba, output: &mut MeshOutput) {
    let base_vertex = output.vertex_count() as u32;

    // e_u x e_v points along +axis, so negative faces walk the rectangle the other way.
    let corners = if face_is_positive(face) {
        [corner, corner + du, corner + du + dv, corner + dv]
    } else {
        [corner, corner + dv, corner + du + dv, corner + du]
    };

    let normal = &FACE_NORMALS[face];
    for c in &corners {
        output.positions.extend_from_slice(&c.to_array());
        output.normals.extend_from_slice(normal);
        output.colors.push(color);
    }

    output.indices.extend_from_slice(&[
        base_vertex,
        base_vertex + 1,
        base_vertex + 2,
        base_vertex,
        base_vertex + 2,
        base_vertex + 3,
    ]);
}

/// Expand merged grid quads into world-space vertex arrays.
///
/// Grid cell `i` is centered on world coordinate `origin + i` and spans half
/// a unit either side.
pub fn expand_quads(quads: &[GridQuad], origin: I64Vec3) -> MeshOutput {
    let mut output = MeshOutput::with_capacity(quads.len());
    let origin = origin.as_vec3();

    for quad in quads {
        let axis = face_axis(quad.face);
        let (u, v) = plane_axes(axis);
        let offset = if face_is_positive(quad.face) { 0.5 } else { -0.5 };

        let mut corner = Vec3::ZERO;
        corner[axis] = origin[axis] + quad.depth as f32 + offset;
        corner[u] = origin[u] + quad.u as f32 - 0.5;
        corner[v] = origin[v] + quad.v as f32 - 0.5;

        let du = Vec3::AXES[u] * quad.width as f32;
        let dv = Vec3::AXES[v] * quad.height as f32;

        emit_quad(quad.face, corner, du, dv, quad.color, &mut output);
    }

    output
}
