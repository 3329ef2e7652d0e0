//! Frame pacing driven by scheduler deltas.

/// Frame timing with FPS calculation and optional frame limiting.
///
/// Time is fed in from the scheduler rather than read from a clock, so a
/// headless host with a simulated clock gets the same numbers as a browser.
#[derive(Debug, Clone)]
pub struct FrameTiming {
    /// Target FPS (0 = unlimited)
    target_fps: u32,
    /// Minimum frame duration based on target FPS
    min_frame_ms: f64,
    /// Time accumulated since the last rendered frame
    since_last_ms: f64,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
    /// Frames rendered so far
    frames: u64,
}

impl FrameTiming {
    /// Create a new frame timer with the given FPS target (0 = unlimited).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let min_frame_ms = if target_fps > 0 {
            1000.0 / f64::from(target_fps)
        } else {
            0.0
        };

        Self {
            target_fps,
            min_frame_ms,
            since_last_ms: 0.0,
            smoothed_fps: 60.0, // Start with reasonable default
            smoothing: 0.05,    // 5% new value, 95% old value
            frames: 0,
        }
    }

    /// Account for `delta_ms` of elapsed time.
    pub fn advance(&mut self, delta_ms: f64) {
        self.since_last_ms += delta_ms.max(0.0);
    }

    /// Whether enough time has passed to render.
    #[must_use]
    pub fn should_render(&self) -> bool {
        self.target_fps == 0 || self.since_last_ms >= self.min_frame_ms
    }

    /// Call after rendering to update timing.
    pub fn end_frame(&mut self) {
        let frame_ms = self.since_last_ms;
        self.since_last_ms = 0.0;
        self.frames += 1;

        if frame_ms > 0.0 {
            let instant_fps = (1000.0 / frame_ms) as f32;
            // Exponential moving average for smooth display
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
    }

    /// Current FPS (smoothed).
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Frames rendered so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
