use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Cube", inline)]
#[serde(default)]
/// Puzzle size and piece/sticker geometry.
pub struct CubeOptions {
    /// Pieces per edge.
    #[schemars(title = "Size", range(min = 2, max = 10))]
    pub size: usize,
    /// Piece corner radius as a fraction of the piece edge.
    #[schemars(title = "Piece Roundness", range(min = 0.0, max = 0.5), extend("step" = 0.01))]
    pub piece_corner_radius: f32,
    /// Segments per quarter arc of a rounded piece corner.
    #[schemars(skip)]
    pub radius_segments: u32,
    /// Sticker corner radius as a fraction of the sticker edge.
    #[schemars(title = "Sticker Roundness", range(min = 0.0, max = 0.5), extend("step" = 0.01))]
    pub sticker_corner_roundness: f32,
    /// Sticker edge as a fraction of the piece edge.
    #[schemars(title = "Sticker Scale", range(min = 0.5, max = 1.0), extend("step" = 0.01))]
    pub sticker_scale: f32,
    /// Sticker extrusion depth in piece units.
    #[schemars(skip)]
    pub sticker_depth: f32,
}

impl Default for CubeOptions {
    fn default() -> Self {
        Self {
            size: 3,
            piece_corner_radius: 0.12,
            radius_segments: 3,
            sticker_corner_roundness: 0.15,
            sticker_scale: 0.82,
            sticker_depth: 0.01,
        }
    }
}
