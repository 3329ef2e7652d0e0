//! Procedural meshes for piece bodies and stickers.
//!
//! Both builders are pure functions of their parameters: the cube builds
//! one body mesh and one sticker mesh per generation and shares them by
//! reference across every piece.

mod rounded_box;
mod rounded_plate;

use glam::Vec3;
pub use rounded_box::{rounded_box, rounded_box_vertex_count};
pub use rounded_plate::rounded_plate;

// ==================== VERTEX FORMAT ====================

/// 24-byte interleaved vertex, ready for upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Unit outward normal.
    pub normal: [f32; 3],
}

// ==================== MESH DATA ====================

/// Indexed triangle mesh with per-vertex normals.
///
/// Triangles wind counter-clockwise when seen from outside.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex normals, same length as `positions`.
    pub normals: Vec<[f32; 3]>,
    /// Triangle list.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleave positions and normals.
    #[must_use]
    pub fn vertices(&self) -> Vec<MeshVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .map(|(&position, &normal)| MeshVertex { position, normal })
            .collect()
    }

    /// Axis-aligned bounds `(min, max)`, or `None` for an empty mesh.
    #[must_use]
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.positions.iter().map(|&p| Vec3::from(p));
        let first = points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }

    /// Append a vertex and return its index.
    fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        index
    }
}
