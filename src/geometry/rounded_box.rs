//! Cube with rounded edges and corners.
//!
//! One octant's corner patch is generated on a unit sphere, then mirrored
//! into all eight corners. Flat faces and edge strips are stitched between
//! the corner patches, so the mesh has no duplicated seam vertices apart
//! from those the corners already share.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use super::MeshData;

/// Sign of each corner, in patch order.
const CORNER_LAYOUT: [[f32; 3]; 8] = [
    [1.0, 1.0, 1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, 1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, -1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [-1.0, -1.0, 1.0],
];

/// Whether a corner's winding must be flipped (an even number of mirrors).
const CORNER_FLIPS: [bool; 8] = [true, false, true, false, false, true, false, true];

/// Vertex count of [`rounded_box`] for `radius_segments` (after clamping):
/// eight corner patches of `(segments + 1) * segments + 1` vertices each.
#[must_use]
pub fn rounded_box_vertex_count(radius_segments: u32) -> usize {
    let rs = radius_segments.max(1) as usize;
    8 * ((rs + 1) * rs + 1)
}

/// Build a cube of edge `size` whose edges are rounded with radius
/// `size * corner_radius_ratio`, tessellated with `radius_segments` steps
/// per quarter arc.
///
/// The radius is clamped to `[0, size / 2]` and the segment count to at
/// least 1.
#[must_use]
pub fn rounded_box(
    size: f32,
    corner_radius_ratio: f32,
    radius_segments: u32,
) -> MeshData {
    let rs = radius_segments.max(1);
    let half = size.abs() / 2.0;
    let radius = (size.abs() * corner_radius_ratio).max(0.0).min(half);
    let edge = half - radius;

    let mut builder = BoxBuilder::new(rs);
    builder.corners(radius, edge);
    builder.faces();
    builder.corner_patches();
    builder.height_edges();
    builder.width_edges();
    builder.depth_edges();
    builder.mesh
}

struct BoxBuilder {
    mesh: MeshData,
    /// Radius segments.
    rs: u32,
    /// Vertices per ring (`rs + 1`).
    ring: u32,
    /// Vertices per corner patch.
    cvn: u32,
    /// Index of the pole vertex within a patch.
    last: u32,
}

impl BoxBuilder {
    fn new(rs: u32) -> Self {
        let ring = rs + 1;
        let corner_count = rounded_box_vertex_count(rs);
        Self {
            mesh: MeshData {
                positions: Vec::with_capacity(corner_count),
                normals: Vec::with_capacity(corner_count),
                indices: Vec::with_capacity((48 * rs * rs + 48 * rs + 36) as usize),
            },
            rs,
            ring,
            cvn: ring * rs + 1,
            last: ring * rs,
        }
    }

    /// Unit-sphere patch for the +X+Y+Z octant, mirrored to all corners.
    fn corners(&mut self, radius: f32, edge: f32) {
        let step = FRAC_PI_2 / self.rs as f32;
        let mut patch = Vec::with_capacity(self.cvn as usize);
        for y in 0..self.rs {
            let (sin_v, cos_v) = (y as f32 * step).sin_cos();
            for x in 0..=self.rs {
                let (sin_h, cos_h) = (x as f32 * step).sin_cos();
                patch.push(Vec3::new(cos_v * cos_h, sin_v, cos_v * sin_h));
            }
        }
        patch.push(Vec3::Y);

        for sign in CORNER_LAYOUT.map(Vec3::from) {
            for &n in &patch {
                let normal = n * sign;
                let _ = self
                    .mesh
                    .push_vertex(normal * radius + sign * edge, normal);
            }
        }
    }

    fn quad(&mut self, [a, b, c, d]: [u32; 4], flip: bool) {
        let tris = if flip {
            [a, c, b, b, c, d]
        } else {
            [a, b, c, b, d, c]
        };
        self.mesh.indices.extend_from_slice(&tris);
    }

    fn faces(&mut self) {
        let (cvn, last, rs) = (self.cvn, self.last, self.rs);

        // Top and bottom: the four pole vertices.
        let [a, b, c, d] = [0, 1, 2, 3].map(|i| last + i * cvn);
        self.mesh.indices.extend_from_slice(&[a, b, c, a, c, d]);
        let [a, b, c, d] = [4, 5, 6, 7].map(|i| last + i * cvn);
        self.mesh.indices.extend_from_slice(&[a, c, b, a, d, c]);

        // Right and left: first vertex of each patch.
        self.quad([0, 1, 4, 5].map(|i| i * cvn), true);
        self.quad([2, 3, 6, 7].map(|i| i * cvn), true);

        // Front and back: end of each patch's first ring.
        self.quad([0, 3, 4, 7].map(|i| rs + i * cvn), false);
        self.quad([1, 2, 5, 6].map(|i| rs + i * cvn), true);
    }

    fn corner_patches(&mut self) {
        let (rs, ring, last) = (self.rs, self.ring, self.last);
        let last_ring = ring * (rs - 1);
        for (i, &flip) in CORNER_FLIPS.iter().enumerate() {
            let offset = self.cvn * i as u32;
            for v in 0..rs - 1 {
                let r1 = offset + v * ring;
                let r2 = offset + (v + 1) * ring;
                for u in 0..rs {
                    self.quad([r1 + u, r1 + u + 1, r2 + u, r2 + u + 1], flip);
                }
            }
            for u in 0..rs {
                let a = offset + last_ring + u;
                let (b, c) = (a + 1, offset + last);
                let tri = if flip { [a, c, b] } else { [a, b, c] };
                self.mesh.indices.extend_from_slice(&tri);
            }
        }
    }

    /// Vertical strips between upper and lower corners.
    fn height_edges(&mut self) {
        for i in 0..4 {
            let upper = i * self.cvn;
            let lower = upper + 4 * self.cvn;
            for u in 0..self.rs {
                self.quad(
                    [upper + u, upper + u + 1, lower + u, lower + u + 1],
                    i % 2 == 1,
                );
            }
        }
    }

    /// Strips along X, running through the ring ends up to the pole.
    fn width_edges(&mut self) {
        let (rs, ring, cvn) = (self.rs, self.ring, self.cvn);
        let end = rs - 1;
        let pairs = [(0, 3, false), (1, 2, true), (4, 7, true), (5, 6, false)];
        for (from, to, flip) in pairs {
            let (s, t) = (from * cvn, to * cvn);
            let next = |u: u32| {
                if u == end {
                    cvn - 1
                } else {
                    rs + (u + 1) * ring
                }
            };
            for u in 0..=end {
                self.quad(
                    [
                        s + rs + u * ring,
                        s + next(u),
                        t + rs + u * ring,
                        t + next(u),
                    ],
                    flip,
                );
            }
        }
    }

    /// Strips along Z, running through the ring starts.
    fn depth_edges(&mut self) {
        let (rs, ring, cvn) = (self.rs, self.ring, self.cvn);
        for (i, (from, to)) in [(0, 1), (2, 3), (4, 5), (6, 7)].into_iter().enumerate() {
            let (s, t) = (from * cvn, to * cvn);
            for u in 0..rs {
                self.quad(
                    [
                        s + u * ring,
                        s + (u + 1) * ring,
                        t + u * ring,
                        t + (u + 1) * ring,
                    ],
                    i <= 1,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::test_support::winding_report;

    #[test]
    fn test_counts_follow_segment_formula() {
        for rs in 1..=6 {
            let mesh = rounded_box(1.0 / 3.0, 0.12, rs);
            let rs_us = rs as usize;
            assert_eq!(mesh.vertex_count(), rounded_box_vertex_count(rs));
            assert_eq!(mesh.indices.len(), 48 * rs_us * rs_us + 48 * rs_us + 36);
            assert_eq!(mesh.normals.len(), mesh.positions.len());
            assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
        }
        let default = rounded_box(1.0 / 3.0, 0.12, 3);
        assert_eq!(default.vertex_count(), 104);
        assert_eq!(default.indices.len(), 612);
    }

    #[test]
    fn test_every_triangle_faces_outward() {
        for rs in [1, 2, 3, 5] {
            for ratio in [0.0, 0.12, 0.3, 0.5] {
                let mesh = rounded_box(1.0 / 3.0, ratio, rs);
                let (_, inward, _) = winding_report(&mesh);
                assert_eq!(inward, 0, "segments {rs}, ratio {ratio}");
            }
        }
    }

    #[test]
    fn test_normals_are_unit_and_outward() {
        let mesh = rounded_box(2.0, 0.2, 4);
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            let n = Vec3::from(*n);
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!(n.dot(Vec3::from(*p)) > 0.0);
        }
    }

    #[test]
    fn test_degenerate_parameters_are_clamped() {
        assert_eq!(rounded_box(1.0, 0.1, 0), rounded_box(1.0, 0.1, 1));

        // Radius larger than half the box collapses to a sphere.
        let sphere = rounded_box(1.0, 5.0, 3);
        for p in &sphere.positions {
            assert!((Vec3::from(*p).length() - 0.5).abs() < 1e-5);
        }

        let negative = rounded_box(1.0, -1.0, 2);
        let (lo, hi) = negative.bounds().unwrap();
        assert_eq!(lo, Vec3::splat(-0.5));
        assert_eq!(hi, Vec3::splat(0.5));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(rounded_box(0.3, 0.12, 3), rounded_box(0.3, 0.12, 3));
    }
}
