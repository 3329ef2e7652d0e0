//! Crate-level error types.

use thiserror::Error;

use crate::cube::{Axis, Face};
use crate::moves::ParseMoveError;

/// Configuration errors: rejected synchronously, nothing is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CubeError {
    /// Cube size below the 2×2×2 minimum.
    #[error("cube size must be at least 2, got {0}")]
    InvalidSize(usize),
    /// Layer index outside `0..size`.
    #[error("layer {layer} is out of range for a size-{size} cube")]
    LayerOutOfRange {
        /// Requested layer.
        layer: usize,
        /// Current cube size.
        size: usize,
    },
    /// A move of zero quarter turns.
    #[error("a move must turn at least one quarter")]
    ZeroTurns,
    /// The layer selection came back empty.
    #[error("layer {layer} on axis {axis} selects no pieces")]
    EmptyLayer {
        /// Rotation axis.
        axis: Axis,
        /// Requested layer.
        layer: usize,
    },
    /// The model has not been generated yet.
    #[error("cube model has not been initialized")]
    NotReady,
    /// A second rotation group was requested while one is still alive.
    #[error("another layer rotation is already in progress")]
    RotationInProgress,
}

/// State-consistency errors raised by [`Cube::load_from_data`].
///
/// Every check runs before any piece is touched, so a failed load leaves
/// the previous puzzle intact.
///
/// [`Cube::load_from_data`]: crate::cube::Cube::load_from_data
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    /// The saved size is not a valid cube size.
    #[error(transparent)]
    Size(#[from] CubeError),
    /// `names`, `positions` and `rotations` disagree in length, or the
    /// piece count does not match `size³`.
    #[error(
        "saved state lists {names} names, {positions} positions and \
         {rotations} rotations, expected {expected} of each"
    )]
    LengthMismatch {
        /// Number of names.
        names: usize,
        /// Number of positions.
        positions: usize,
        /// Number of rotations.
        rotations: usize,
        /// `size³`.
        expected: usize,
    },
    /// A generated piece has no entry in the saved data.
    #[error("piece {0} is missing from the saved state")]
    MissingPiece(usize),
    /// A name appears more than once.
    #[error("piece {0} appears more than once in the saved state")]
    DuplicatePiece(usize),
    /// A name does not belong to any generated piece.
    #[error("piece {0} does not exist on this cube")]
    UnknownPiece(usize),
    /// A position does not sit on the grid lattice.
    #[error("piece {piece} position is off the grid")]
    OffGrid {
        /// Piece name.
        piece: usize,
    },
    /// A rotation is not a multiple of 90° about the principal axes.
    #[error("piece {piece} rotation is not aligned to a quarter turn")]
    Misaligned {
        /// Piece name.
        piece: usize,
    },
    /// Two pieces claim the same grid coordinate.
    #[error("pieces {first} and {second} share grid coordinate {coord:?}")]
    DuplicateCoordinate {
        /// Piece already at the coordinate.
        first: usize,
        /// Piece colliding with it.
        second: usize,
        /// Shared coordinate.
        coord: [i32; 3],
    },
    /// A sticker would face into the cube.
    #[error("piece {piece} would turn its {label} sticker inward")]
    InwardSticker {
        /// Piece name.
        piece: usize,
        /// Color label of the sticker.
        label: Face,
    },
}

/// Errors produced by the TOML configuration layer.
#[derive(Debug, Error)]
pub enum OptionsError {
    /// Generic I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing failure.
    #[error("options parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// TOML serialization failure.
    #[error("options serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Errors produced by the cubik crate.
#[derive(Debug, Error)]
pub enum CubikError {
    /// Invalid size, layer or move.
    #[error(transparent)]
    Cube(#[from] CubeError),
    /// Rejected saved state.
    #[error("state load error: {0}")]
    Load(#[from] LoadError),
    /// Options could not be read or written.
    #[error(transparent)]
    Options(#[from] OptionsError),
    /// Saved state JSON could not be encoded or decoded.
    #[error("state JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Generic I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed move notation.
    #[error(transparent)]
    Notation(#[from] ParseMoveError),
}
