use serde::{Deserialize, Serialize};

use crate::cube::Face;

/// Face-label → color mapping, plus the shared piece-body color.
///
/// Keys follow the face letters; `P` is the body ("plastic").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FaceColors {
    /// Piece body.
    #[serde(rename = "P")]
    pub body: [f32; 3],
    /// Left face.
    #[serde(rename = "L")]
    pub left: [f32; 3],
    /// Right face.
    #[serde(rename = "R")]
    pub right: [f32; 3],
    /// Down face.
    #[serde(rename = "D")]
    pub down: [f32; 3],
    /// Up face.
    #[serde(rename = "U")]
    pub up: [f32; 3],
    /// Back face.
    #[serde(rename = "B")]
    pub back: [f32; 3],
    /// Front face.
    #[serde(rename = "F")]
    pub front: [f32; 3],
}

impl Default for FaceColors {
    fn default() -> Self {
        Self {
            body: hex_to_rgb(0x08_10_1a),
            left: hex_to_rgb(0x82_ca_38),
            right: hex_to_rgb(0x41_aa_c8),
            down: hex_to_rgb(0xff_ef_48),
            up: hex_to_rgb(0xff_f7_ff),
            back: hex_to_rgb(0xff_8c_0a),
            front: hex_to_rgb(0xef_39_23),
        }
    }
}

impl FaceColors {
    /// Color of stickers labelled `face`.
    #[must_use]
    pub fn get(&self, face: Face) -> [f32; 3] {
        match face {
            Face::L => self.left,
            Face::R => self.right,
            Face::D => self.down,
            Face::U => self.up,
            Face::B => self.back,
            Face::F => self.front,
        }
    }

    /// Replace the color of stickers labelled `face`.
    pub fn set(&mut self, face: Face, color: [f32; 3]) {
        let slot = match face {
            Face::L => &mut self.left,
            Face::R => &mut self.right,
            Face::D => &mut self.down,
            Face::U => &mut self.up,
            Face::B => &mut self.back,
            Face::F => &mut self.front,
        };
        *slot = color;
    }
}

/// `0xRRGGBB` → RGB in `[0, 1]`.
#[must_use]
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [16, 8, 0].map(|shift| ((hex >> shift) & 0xff) as f32 / 255.0)
}

/// RGB in `[0, 1]` → `0xRRGGBB`, clamping each channel.
#[must_use]
pub fn rgb_to_hex(rgb: [f32; 3]) -> u32 {
    rgb.iter().fold(0, |acc, &channel| {
        (acc << 8) | (channel.clamp(0.0, 1.0) * 255.0).round() as u32
    })
}
