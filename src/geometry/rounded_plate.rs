//! Thin extruded rounded square, used for every sticker.

use glam::{Vec2, Vec3};

use super::MeshData;

/// Samples per quadratic corner curve.
const CURVE_SAMPLES: u32 = 3;

/// Points closer than this are merged when tracing the outline.
const MERGE_EPSILON: f32 = 1e-6;

/// Build a `size × size` plate in the XY plane, rounded by
/// `size * corner_radius_ratio` and extruded from `z = 0` to `z = depth`
/// (front face toward +Z).
///
/// Corners are quadratic curves through the square's corner point. Caps
/// are fans from the center; sides get flat normals. The radius is
/// clamped to `[0, size / 2]` and the depth to at least 0.
#[must_use]
pub fn rounded_plate(size: f32, corner_radius_ratio: f32, depth: f32) -> MeshData {
    let outline = outline(size.abs(), corner_radius_ratio);
    let depth = depth.max(0.0);
    let n = outline.len();

    let mut mesh = MeshData {
        positions: Vec::with_capacity(6 * n + 2),
        normals: Vec::with_capacity(6 * n + 2),
        indices: Vec::with_capacity(12 * n),
    };

    // Front cap.
    let center = mesh.push_vertex(Vec3::new(0.0, 0.0, depth), Vec3::Z);
    for p in &outline {
        let _ = mesh.push_vertex(p.extend(depth), Vec3::Z);
    }
    for i in 0..n {
        let a = center + 1 + i as u32;
        let b = center + 1 + ((i + 1) % n) as u32;
        mesh.indices.extend_from_slice(&[center, a, b]);
    }

    // Back cap, reversed.
    let center = mesh.push_vertex(Vec3::ZERO, Vec3::NEG_Z);
    for p in &outline {
        let _ = mesh.push_vertex(p.extend(0.0), Vec3::NEG_Z);
    }
    for i in 0..n {
        let a = center + 1 + i as u32;
        let b = center + 1 + ((i + 1) % n) as u32;
        mesh.indices.extend_from_slice(&[center, b, a]);
    }

    // Sides.
    for i in 0..n {
        let p0 = outline[i];
        let p1 = outline[(i + 1) % n];
        let edge = p1 - p0;
        let normal = Vec3::new(edge.y, -edge.x, 0.0).normalize_or_zero();
        let a = mesh.push_vertex(p0.extend(0.0), normal);
        let b = mesh.push_vertex(p1.extend(0.0), normal);
        let c = mesh.push_vertex(p1.extend(depth), normal);
        let d = mesh.push_vertex(p0.extend(depth), normal);
        mesh.indices.extend_from_slice(&[a, b, c, a, c, d]);
    }

    mesh
}

/// Counter-clockwise outline without a repeated closing point.
fn outline(size: f32, corner_radius_ratio: f32) -> Vec<Vec2> {
    let half = size / 2.0;
    let r = (size * corner_radius_ratio).max(0.0).min(half);
    let inner = half - r;

    // (line end, control point, curve end) for each corner, CCW from the
    // bottom edge.
    let corners = [
        (Vec2::new(inner, -half), Vec2::new(half, -half), Vec2::new(half, -inner)),
        (Vec2::new(half, inner), Vec2::new(half, half), Vec2::new(inner, half)),
        (Vec2::new(-inner, half), Vec2::new(-half, half), Vec2::new(-half, inner)),
        (Vec2::new(-half, -inner), Vec2::new(-half, -half), Vec2::new(-inner, -half)),
    ];

    let mut points = vec![Vec2::new(-inner, -half)];
    for (start, control, end) in corners {
        points.push(start);
        for k in 1..=CURVE_SAMPLES {
            let t = k as f32 / CURVE_SAMPLES as f32;
            points.push(quadratic(start, control, end, t));
        }
    }

    let mut deduped: Vec<Vec2> = Vec::with_capacity(points.len());
    for p in points {
        if deduped
            .last()
            .is_none_or(|&q| q.distance(p) > MERGE_EPSILON)
        {
            deduped.push(p);
        }
    }
    while deduped.len() > 1
        && deduped
            .first()
            .zip(deduped.last())
            .is_some_and(|(a, b)| a.distance(*b) <= MERGE_EPSILON)
    {
        let _ = deduped.pop();
    }
    deduped
}

fn quadratic(p0: Vec2, p1: Vec2, p2: Vec2, t: f32) -> Vec2 {
    let s = 1.0 - t;
    p0 * (s * s) + p1 * (2.0 * s * t) + p2 * (t * t)
}
