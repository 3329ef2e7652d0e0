//! Easing functions for animation interpolation.
//!
//! Each family maps normalized time `t ∈ [0, 1]` to eased progress with
//! `f(0) = 0` and `f(1) = 1`. `In` variants accelerate from rest, `Out`
//! variants decelerate to rest and `InOut` variants join both halves at
//! `t = 0.5`. The `Back` family overshoots: intermediate values leave
//! `[0, 1]` and must be applied as-is, never clamped.

use std::f32::consts::{FRAC_PI_2, PI};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Easing function variants for animation curves.
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema,
)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Easing {
    /// Linear interpolation (no easing).
    Linear,
    /// `t^power`.
    PowerIn {
        /// Integer exponent (at least 1).
        power: i32,
    },
    /// `1 - |(t - 1)^power|`.
    PowerOut {
        /// Integer exponent (at least 1).
        power: i32,
    },
    /// `PowerIn` for the first half, `PowerOut` for the second.
    PowerInOut {
        /// Integer exponent (at least 1).
        power: i32,
    },
    /// Quarter sine wave rising from rest.
    SineIn,
    /// Quarter sine wave settling to rest.
    SineOut,
    /// Half sine wave, slow at both ends.
    SineInOut,
    /// Pulls back below 0 before accelerating toward 1.
    BackIn {
        /// Overshoot amount; 1.70158 gives roughly a 10% pull.
        overshoot: f32,
    },
    /// Overshoots past 1 before settling.
    BackOut {
        /// Overshoot amount; 1.70158 gives roughly a 10% overshoot.
        overshoot: f32,
    },
    /// Pulls back at the start and overshoots at the end.
    BackInOut {
        /// Overshoot amount.
        overshoot: f32,
    },
}

impl Easing {
    /// Overshoot constant used when a `Back` curve is built without one.
    pub const BACK_OVERSHOOT: f32 = 1.701_58;

    /// Default curve for layer turns: `Power::Out(3)`.
    pub const DEFAULT: Easing = Easing::PowerOut { power: 3 };

    /// `t^power`. Powers below 1 are raised to 1.
    #[must_use]
    pub const fn power_in(power: i32) -> Self {
        Self::PowerIn {
            power: normalize_power(power),
        }
    }

    /// `1 - |(t - 1)^power|`. Powers below 1 are raised to 1.
    #[must_use]
    pub const fn power_out(power: i32) -> Self {
        Self::PowerOut {
            power: normalize_power(power),
        }
    }

    /// Power ease-in for `t < 0.5`, power ease-out afterwards.
    #[must_use]
    pub const fn power_in_out(power: i32) -> Self {
        Self::PowerInOut {
            power: normalize_power(power),
        }
    }

    /// Back ease-in; non-positive or non-finite overshoot falls back to
    /// [`Self::BACK_OVERSHOOT`].
    #[must_use]
    pub fn back_in(overshoot: f32) -> Self {
        Self::BackIn {
            overshoot: normalize_overshoot(overshoot),
        }
    }

    /// Back ease-out; non-positive or non-finite overshoot falls back to
    /// [`Self::BACK_OVERSHOOT`].
    #[must_use]
    pub fn back_out(overshoot: f32) -> Self {
        Self::BackOut {
            overshoot: normalize_overshoot(overshoot),
        }
    }

    /// Back ease-in-out; non-positive or non-finite overshoot falls back to
    /// [`Self::BACK_OVERSHOOT`].
    #[must_use]
    pub fn back_in_out(overshoot: f32) -> Self {
        Self::BackInOut {
            overshoot: normalize_overshoot(overshoot),
        }
    }

    /// Whether this curve may leave `[0, 1]` between its endpoints.
    #[must_use]
    pub const fn overshoots(&self) -> bool {
        matches!(
            self,
            Self::BackIn { .. } | Self::BackOut { .. } | Self::BackInOut { .. }
        )
    }

    /// Evaluate the easing function at time t.
    ///
    /// Input t is clamped to [0.0, 1.0]. The output is not: `Back` curves
    /// return values outside `[0, 1]` for interior `t`.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match *self {
            Self::Linear => t,
            Self::PowerIn { power } => t.powi(power),
            Self::PowerOut { power } => 1.0 - (t - 1.0).powi(power).abs(),
            Self::PowerInOut { power } => {
                if t < 0.5 {
                    (t * 2.0).powi(power) / 2.0
                } else {
                    (1.0 - (t * 2.0 - 2.0).powi(power).abs()) / 2.0 + 0.5
                }
            }
            Self::SineIn => 1.0 + (FRAC_PI_2 * t - FRAC_PI_2).sin(),
            Self::SineOut => (FRAC_PI_2 * t).sin(),
            Self::SineInOut => (1.0 + (PI * t - FRAC_PI_2).sin()) / 2.0,
            Self::BackIn { overshoot: s } => t * t * ((s + 1.0) * t - s),
            Self::BackOut { overshoot: s } => {
                let u = t - 1.0;
                u * u * ((s + 1.0) * u + s) + 1.0
            }
            Self::BackInOut { overshoot } => {
                let s = overshoot * 1.525;
                let t2 = t * 2.0;
                if t2 < 1.0 {
                    0.5 * (t2 * t2 * ((s + 1.0) * t2 - s))
                } else {
                    let u = t2 - 2.0;
                    0.5 * (u * u * ((s + 1.0) * u + s) + 2.0)
                }
            }
        }
    }
}

impl Default for Easing {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

const fn normalize_power(power: i32) -> i32 {
    if power < 1 {
        1
    } else {
        power
    }
}

fn normalize_overshoot(overshoot: f32) -> f32 {
    if overshoot.is_finite() && overshoot > 0.0 {
        overshoot
    } else {
        Easing::BACK_OVERSHOOT
    }
}
