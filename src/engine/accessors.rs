//! Read-only queries and option updates for [`CubeEngine`].

use super::CubeEngine;
use crate::animation::Scheduler;
use crate::cube::Cube;
use crate::moves::{MoveController, MoveState};
use crate::options::{AnimationOptions, FaceColors, Options};

// ── State access ──

impl CubeEngine {
    /// The puzzle model.
    #[must_use]
    pub fn cube(&self) -> &Cube {
        &self.cube
    }

    /// The frame loop.
    #[must_use]
    pub fn scheduler(&self) -> &Scheduler<Cube> {
        &self.scheduler
    }

    /// The move state machine.
    #[must_use]
    pub fn moves(&self) -> &MoveController {
        &self.moves
    }

    /// Current move state.
    #[must_use]
    pub fn move_state(&self) -> MoveState {
        self.moves.state()
    }

    /// Whether no layer is turning.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.moves.is_idle()
    }

    /// Moves waiting behind the one in flight.
    #[must_use]
    pub fn pending_moves(&self) -> usize {
        self.moves.pending()
    }

    /// Options the engine was built with, kept in sync with resizes.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }
}

// ── Theme ──

impl CubeEngine {
    /// Current face colors.
    #[must_use]
    pub fn colors(&self) -> &FaceColors {
        self.cube.colors()
    }

    /// Recolor every piece and sticker.
    pub fn update_colors(&mut self, colors: FaceColors) {
        self.options.colors = colors.clone();
        self.cube.update_colors(colors);
    }
}

// ── Timing ──

impl CubeEngine {
    /// Replace the animation options. Turn timing applies from the next
    /// move started; a renderer picks up a new frame cap when re-attached.
    pub fn set_animation_options(&mut self, animation: AnimationOptions) {
        self.moves
            .set_timing(animation.turn_duration_ms, animation.turn_easing);
        self.options.animation = animation;
    }
}

#[cfg(test)]
mod tests {
    use crate::animation::{Easing, ManualClock};
    use crate::cube::{Axis, Face};
    use crate::engine::CubeEngine;
    use crate::options::{hex_to_rgb, AnimationOptions, Options};

    #[test]
    fn test_update_colors_reaches_stickers() {
        let mut engine =
            CubeEngine::with_clock(Options::default(), ManualClock::new())
                .unwrap();
        let mut colors = engine.colors().clone();
        colors.set(Face::U, hex_to_rgb(0x12_34_56));
        engine.update_colors(colors);

        assert_eq!(engine.options().colors.get(Face::U), hex_to_rgb(0x12_34_56));
        let top = engine
            .cube()
            .pieces()
            .iter()
            .flat_map(|p| p.facelets())
            .filter(|f| f.label() == Face::U)
            .map(|f| f.material().color)
            .collect::<Vec<_>>();
        assert_eq!(top.len(), 9);
        assert!(top.iter().all(|&c| c == hex_to_rgb(0x12_34_56)));
    }

    #[test]
    fn test_new_timing_applies_to_next_move() {
        let clock = ManualClock::new();
        let mut engine =
            CubeEngine::with_clock(Options::default(), clock.clone()).unwrap();
        engine.set_animation_options(AnimationOptions {
            turn_duration_ms: 50.0,
            turn_easing: Easing::Linear,
            ..AnimationOptions::default()
        });

        engine.request_move(Axis::Z, 0, 1, true).unwrap();
        clock.advance_ms(25.0);
        assert!(engine.frame());
        let angle = engine.cube().rotation_group().unwrap().angle();
        assert!((angle - std::f32::consts::FRAC_PI_4).abs() < 1e-4);

        clock.advance_ms(25.0);
        assert!(!engine.frame());
        assert!(engine.is_idle());
    }
}
