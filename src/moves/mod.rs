//! Layer moves: notation, validation and the turn state machine.
//!
//! - [`Move`]: axis, layer and signed quarter turns (`y2+`, `x0-`, `z1+2`)
//! - [`RotationGroup`] / [`LayerRotation`]: one layer turning together
//! - [`MoveController`]: serializes requests, one layer in flight at a time

mod controller;
mod rotation;

use std::f32::consts::FRAC_PI_2;
use std::fmt;
use std::str::FromStr;

pub use controller::{Abort, CompletedMove, MoveController, MoveState};
pub use rotation::{LayerRotation, RotationGroup};
use thiserror::Error;

use crate::cube::Axis;
use crate::error::CubeError;

/// Malformed move notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid move notation {0:?}")]
pub struct ParseMoveError(
    /// The rejected text.
    pub String,
);

/// A turn of one layer.
///
/// Positive turns are right-handed about the positive axis: with the thumb
/// along +Y, `y2+` carries the front of the top layer to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    /// Rotation axis.
    pub axis: Axis,
    /// Layer index along the axis, `0..size`.
    pub layer: usize,
    /// Signed number of quarter turns.
    pub turns: i32,
}

impl Move {
    /// Move of `turns` quarter turns.
    #[must_use]
    pub const fn new(axis: Axis, layer: usize, turns: i32) -> Self {
        Self { axis, layer, turns }
    }

    /// The move that undoes this one.
    #[must_use]
    pub const fn inverse(self) -> Self {
        Self {
            turns: -self.turns,
            ..self
        }
    }

    /// Target angle in radians.
    #[must_use]
    pub fn angle(self) -> f32 {
        self.turns as f32 * FRAC_PI_2
    }

    /// Check the move against a cube of `size`.
    ///
    /// # Errors
    ///
    /// [`CubeError::ZeroTurns`] or [`CubeError::LayerOutOfRange`].
    pub fn validate(self, size: usize) -> Result<(), CubeError> {
        if self.turns == 0 {
            return Err(CubeError::ZeroTurns);
        }
        if self.layer >= size {
            return Err(CubeError::LayerOutOfRange {
                layer: self.layer,
                size,
            });
        }
        Ok(())
    }

    /// Parse a whitespace-separated sequence such as `"y2+ x0- z1+2"`.
    ///
    /// # Errors
    ///
    /// The first token that does not parse.
    pub fn parse_sequence(text: &str) -> Result<Vec<Self>, ParseMoveError> {
        text.split_whitespace().map(str::parse).collect()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.turns < 0 { '-' } else { '+' };
        write!(f, "{}{}{sign}", self.axis, self.layer)?;
        let count = self.turns.unsigned_abs();
        if count != 1 {
            write!(f, "{count}")?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    /// `<axis><layer><+|->[count]`, e.g. `y2+`, `x0-`, `z1+2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMoveError(s.to_owned());
        let mut chars = s.chars();
        let axis = chars.next().and_then(Axis::from_char).ok_or_else(err)?;

        let rest = chars.as_str();
        let sign_at = rest.find(['+', '-']).ok_or_else(err)?;
        let (layer, tail) = rest.split_at(sign_at);
        if layer.is_empty() || !layer.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let layer: usize = layer.parse().map_err(|_| err())?;

        let (sign, count) = tail.split_at(1);
        let count: i32 = if count.is_empty() {
            1
        } else if count.bytes().all(|b| b.is_ascii_digit()) {
            count.parse().map_err(|_| err())?
        } else {
            return Err(err());
        };
        if count == 0 {
            return Err(err());
        }

        let turns = if sign == "-" { -count } else { count };
        Ok(Self::new(axis, layer, turns))
    }
}

/// A move plus how it should be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    /// The move.
    pub mv: Move,
    /// Animate through the scheduler, or apply at once.
    pub animated: bool,
}

impl MoveRequest {
    /// Animated request.
    #[must_use]
    pub const fn animated(mv: Move) -> Self {
        Self { mv, animated: true }
    }

    /// Instantaneous request.
    #[must_use]
    pub const fn instant(mv: Move) -> Self {
        Self {
            mv,
            animated: false,
        }
    }
}
