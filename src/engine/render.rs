//! Hand-off to an external renderer.
//!
//! The engine never draws. Once per rendered frame the [`RenderDriver`]
//! flattens the cube into [`MeshInstance`]s (one per piece body and one
//! per sticker, world transforms included) and passes them to the host's
//! [`RenderBackend`].

use std::sync::Arc;

use glam::Mat4;

use crate::animation::{Animatable, Tick};
use crate::cube::{Cube, Face};
use crate::geometry::MeshData;
use crate::util::frame_timing::FrameTiming;

/// Which shared mesh an instance draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceKind {
    /// Piece body.
    Body,
    /// Sticker with this color label.
    Sticker(Face),
}

/// One drawable: a shared mesh at a world transform with its own color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshInstance {
    /// Mesh to draw.
    pub kind: InstanceKind,
    /// Owning piece.
    pub piece: usize,
    /// Model-to-world transform.
    pub transform: Mat4,
    /// Linear RGB.
    pub color: [f32; 3],
}

impl MeshInstance {
    /// GPU layout of this instance.
    #[must_use]
    pub fn to_raw(&self) -> InstanceRaw {
        InstanceRaw {
            model: self.transform.to_cols_array_2d(),
            color: [self.color[0], self.color[1], self.color[2], 1.0],
        }
    }
}

/// 80-byte per-instance vertex data.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    /// Column-major model matrix.
    pub model: [[f32; 4]; 4],
    /// RGBA, alpha always 1.
    pub color: [f32; 4],
}

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Body mesh shared by every [`InstanceKind::Body`] instance.
    pub body_mesh: Arc<MeshData>,
    /// Sticker mesh shared by every [`InstanceKind::Sticker`] instance.
    pub sticker_mesh: Arc<MeshData>,
    /// Instances in piece order, body first.
    pub instances: Vec<MeshInstance>,
    /// Smoothed frames per second.
    pub fps: f32,
}

impl Frame {
    /// Snapshot `cube` as it should appear now, including any layer
    /// rotation in flight. `None` before the cube is generated.
    #[must_use]
    pub fn capture(cube: &Cube, fps: f32) -> Option<Self> {
        let meshes = cube.meshes()?;
        let world = cube.world_transform();
        let mut instances = Vec::with_capacity(cube.pieces().len() * 2);

        for (index, piece) in cube.pieces().iter().enumerate() {
            let Some(local) = cube.piece_transform(index) else {
                continue;
            };
            let model = world * local;
            instances.push(MeshInstance {
                kind: InstanceKind::Body,
                piece: index,
                transform: model,
                color: piece.material().color,
            });
            instances.extend(piece.facelets().iter().map(|facelet| MeshInstance {
                kind: InstanceKind::Sticker(facelet.label()),
                piece: index,
                transform: model * facelet.local_transform(),
                color: facelet.material().color,
            }));
        }

        Some(Self {
            body_mesh: Arc::clone(&meshes.body),
            sticker_mesh: Arc::clone(&meshes.sticker),
            instances,
            fps,
        })
    }

    /// All instances in GPU layout.
    #[must_use]
    pub fn raw_instances(&self) -> Vec<InstanceRaw> {
        self.instances.iter().map(MeshInstance::to_raw).collect()
    }
}

/// The host's renderer.
pub trait RenderBackend {
    /// Draw `frame`.
    fn render(&mut self, frame: &Frame);
}

/// Keeps the host's renderer fed from the scheduler.
///
/// Stays registered until removed, so the scheduler keeps running while a
/// renderer is attached.
pub struct RenderDriver {
    backend: Box<dyn RenderBackend>,
    timing: FrameTiming,
}

impl RenderDriver {
    /// Driver rendering at most `target_fps` frames per second (0 = every
    /// tick).
    #[must_use]
    pub fn new(backend: Box<dyn RenderBackend>, target_fps: u32) -> Self {
        Self {
            backend,
            timing: FrameTiming::new(target_fps),
        }
    }
}

impl std::fmt::Debug for RenderDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderDriver")
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

impl Animatable<Cube> for RenderDriver {
    fn update(&mut self, delta_ms: f64, cube: &mut Cube) -> Tick {
        self.timing.advance(delta_ms);
        if !self.timing.should_render() {
            return Tick::Continue;
        }
        if let Some(frame) = Frame::capture(cube, self.timing.fps()) {
            self.backend.render(&frame);
        }
        self.timing.end_frame();
        Tick::Continue
    }

    fn name(&self) -> &'static str {
        "render_driver"
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::f32::consts::FRAC_PI_2;
    use std::rc::Rc;

    use glam::Vec3;

    use super::*;
    use crate::cube::test_support::cube;
    use crate::cube::Axis;

    #[derive(Default)]
    struct Recorder {
        frames: Rc<RefCell<Vec<Frame>>>,
    }

    impl RenderBackend for Recorder {
        fn render(&mut self, frame: &Frame) {
            self.frames.borrow_mut().push(frame.clone());
        }
    }

    #[test]
    fn test_capture_counts_bodies_and_stickers() {
        let c = cube(3);
        let frame = Frame::capture(&c, 60.0).unwrap();
        assert_eq!(frame.instances.len(), 27 + 54);
        let raw = frame.raw_instances();
        assert_eq!(bytemuck::cast_slice::<InstanceRaw, u8>(&raw).len(), 81 * 80);
    }

    #[test]
    fn test_stickers_sit_on_the_outside() {
        let c = cube(3);
        let frame = Frame::capture(&c, 60.0).unwrap();
        for instance in &frame.instances {
            let InstanceKind::Sticker(label) = instance.kind else {
                continue;
            };
            let center = instance.transform.transform_point3(Vec3::ZERO);
            let normal = label.normal().as_vec3();
            // Outer piece faces lie at ±0.5 on a unit-scale 3×3×3.
            assert!((center.dot(normal) - 0.5).abs() < 1e-5, "{label}");
            let facing = instance.transform.transform_vector3(Vec3::Z).normalize();
            assert!(facing.dot(normal) > 0.999);
        }
    }

    #[test]
    fn test_capture_includes_rotation_in_flight() {
        let mut c = cube(3);
        let resting = Frame::capture(&c, 60.0).unwrap();
        let _ = c.begin_rotation(Axis::Y, 2).unwrap();
        let _ = c.set_rotation_angle(FRAC_PI_2 / 3.0);
        let turning = Frame::capture(&c, 60.0).unwrap();

        let changed = resting
            .instances
            .iter()
            .zip(&turning.instances)
            .filter(|(a, b)| a.transform != b.transform)
            .map(|(a, _)| a.piece)
            .collect::<std::collections::BTreeSet<_>>();
        assert_eq!(changed.len(), 9);
    }

    #[test]
    fn test_driver_respects_frame_cap() {
        let recorder = Recorder::default();
        let frames = Rc::clone(&recorder.frames);
        let mut driver = RenderDriver::new(Box::new(recorder), 30);
        let mut c = cube(2);

        for _ in 0..6 {
            assert_eq!(driver.update(16.0, &mut c), Tick::Continue);
        }
        // 96 ms at a 33.3 ms cap.
        assert_eq!(frames.borrow().len(), 2);
        assert_eq!(frames.borrow()[0].instances.len(), 8 + 24);
    }
}
