//! Eased re-orientation of the whole cube.

use glam::Quat;

use super::animatable::{Animatable, Tick};
use super::easing::Easing;
use crate::cube::Cube;

/// Turns the cube's outer orientation holder from one rotation to another.
///
/// Used for camera-style moves such as presenting a different face after a
/// load. Layer turns are unaffected: they live below the holder.
#[derive(Debug, Clone)]
pub struct OrientationTransition {
    from: Quat,
    to: Quat,
    duration_ms: f64,
    easing: Easing,
    elapsed_ms: f64,
}

impl OrientationTransition {
    /// Transition lasting `duration_ms`.
    #[must_use]
    pub fn new(from: Quat, to: Quat, duration_ms: f64, easing: Easing) -> Self {
        Self {
            from: from.normalize(),
            to: to.normalize(),
            duration_ms: duration_ms.max(0.0),
            easing,
            elapsed_ms: 0.0,
        }
    }

    /// Target orientation.
    #[must_use]
    pub fn target(&self) -> Quat {
        self.to
    }

    /// Orientation at normalized time `t`.
    #[must_use]
    pub fn sample(&self, t: f32) -> Quat {
        self.from.slerp(self.to, self.easing.evaluate(t))
    }
}

impl Animatable<Cube> for OrientationTransition {
    fn update(&mut self, delta_ms: f64, cube: &mut Cube) -> Tick {
        self.elapsed_ms += delta_ms.max(0.0);
        if self.duration_ms <= 0.0 || self.elapsed_ms >= self.duration_ms {
            cube.orientation_mut().holder = self.to;
            return Tick::Finished;
        }
        let t = (self.elapsed_ms / self.duration_ms) as f32;
        cube.orientation_mut().holder = self.sample(t);
        Tick::Continue
    }

    fn name(&self) -> &'static str {
        "orientation_transition"
    }
}
