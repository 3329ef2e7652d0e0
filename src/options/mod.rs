//! Cube, animation and color options with TOML preset support.
//!
//! Every tweakable setting lives here. Options serialize to/from TOML so a
//! host can keep named presets (`classic.toml`, `big-cube.toml`) in a
//! directory and list them with [`Options::list_presets`].

mod animation;
mod colors;
mod cube;

use std::path::Path;

pub use animation::AnimationOptions;
pub use colors::{hex_to_rgb, rgb_to_hex, FaceColors};
pub use cube::CubeOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::OptionsError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[animation]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Puzzle size and piece geometry.
    pub cube: CubeOptions,
    /// Turn and re-orientation timing.
    pub animation: AnimationOptions,
    /// Face color theme.
    #[schemars(skip)]
    pub colors: FaceColors,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`OptionsError::Io`] or [`OptionsError::Parse`].
    pub fn load(path: &Path) -> Result<Self, OptionsError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// [`OptionsError::Serialize`] or [`OptionsError::Io`].
    pub fn save(&self, path: &Path) -> Result<(), OptionsError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}
