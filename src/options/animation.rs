use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::animation::Easing;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Animation", inline)]
#[serde(default)]
/// Durations and curves for layer turns and cube re-orientation.
pub struct AnimationOptions {
    /// Length of one layer turn in milliseconds.
    #[schemars(title = "Turn Duration", range(min = 0.0, max = 1000.0), extend("step" = 10.0))]
    pub turn_duration_ms: f64,
    /// Length of a whole-cube re-orientation in milliseconds.
    #[schemars(title = "Orientation Duration", range(min = 0.0, max = 3000.0), extend("step" = 50.0))]
    pub orientation_duration_ms: f64,
    /// Render frame cap (0 = every tick).
    #[schemars(skip)]
    pub target_fps: u32,
    /// Progress curve of a layer turn.
    #[schemars(title = "Turn Easing")]
    pub turn_easing: Easing,
    /// Progress curve of a whole-cube re-orientation.
    #[schemars(title = "Orientation Easing")]
    pub orientation_easing: Easing,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            turn_duration_ms: 200.0,
            orientation_duration_ms: 800.0,
            target_fps: 0,
            turn_easing: Easing::power_out(3),
            orientation_easing: Easing::SineInOut,
        }
    }
}
