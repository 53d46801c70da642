//! Wave presets stored as TOML.
//!
//! ```toml
//! variant = "raging"
//! segments = 256
//! side = "double"
//!
//! [uniforms]
//! large_waves_elevation = 0.35
//! large_waves_frequency = [4.0, 1.5]
//! depth_color = "#0b3d5c"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::waves::{names, Variant};
use crate::color::{Color, ColorParseError};
use crate::ocean::Side;
use crate::uniforms::{UniformError, UniformSet, UniformValue};

#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    #[error("failed to read preset {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write preset {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse preset: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize preset: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("preset color '{name}': {source}")]
    Color {
        name: String,
        source: ColorParseError,
    },
    #[error(transparent)]
    Uniform(#[from] UniformError),
}

/// One stored uniform value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PresetValue {
    Float(f64),
    Vec2([f64; 2]),
    Hex(String),
}

impl PresetValue {
    fn from_uniform(value: &UniformValue) -> Self {
        match value {
            UniformValue::Float(v) => PresetValue::Float(widen(*v)),
            UniformValue::Vec2(v) => PresetValue::Vec2([widen(v.x), widen(v.y)]),
            UniformValue::Color(c) => PresetValue::Hex(c.to_hex()),
        }
    }

    fn to_uniform(&self, name: &str) -> Result<UniformValue, PresetError> {
        Ok(match self {
            PresetValue::Float(v) => UniformValue::Float(*v as f32),
            PresetValue::Vec2([x, y]) => UniformValue::Vec2(Vec2::new(*x as f32, *y as f32)),
            PresetValue::Hex(hex) => {
                UniformValue::Color(Color::from_hex(hex).map_err(|source| PresetError::Color {
                    name: name.to_string(),
                    source,
                })?)
            }
        })
    }
}

/// Widen through the shortest decimal form so `0.2f32` is written as `0.2`
fn widen(v: f32) -> f64 {
    v.to_string().parse().unwrap_or(v as f64)
}

/// Stored overrides for the scene; absent fields keep their defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WavePreset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(default)]
    pub uniforms: BTreeMap<String, PresetValue>,
}

impl WavePreset {
    pub fn from_toml_str(text: &str) -> Result<Self, PresetError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, PresetError> {
        let text = fs::read_to_string(path).map_err(|source| PresetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, PresetError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), PresetError> {
        let text = self.to_toml_string()?;
        fs::write(path, text).map_err(|source| PresetError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Snapshot of the current scene state (the animated `time` is left out)
    pub fn capture(variant: Variant, segments: u32, side: Side, uniforms: &UniformSet) -> Self {
        Self {
            variant: Some(variant),
            segments: Some(segments),
            side: Some(side),
            uniforms: uniforms
                .iter()
                .filter(|(name, _)| *name != names::TIME)
                .map(|(name, value)| (name.to_string(), PresetValue::from_uniform(value)))
                .collect(),
        }
    }

    /// Write every stored value into `uniforms`, stopping at the first
    /// unknown or mistyped entry
    pub fn apply(&self, uniforms: &mut UniformSet) -> Result<(), PresetError> {
        for (name, value) in &self.uniforms {
            uniforms.set(name, value.to_uniform(name)?)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::WaveParams;

    #[test]
    fn test_parse_and_apply() {
        let preset = WavePreset::from_toml_str(
            r##"
            variant = "raging"
            side = "double"

            [uniforms]
            large_waves_elevation = 0.35
            large_waves_frequency = [2, 0.5]
            small_waves_iterations = 3
            depth_color = "#0b3d5c"
            "##,
        )
        .unwrap();

        assert_eq!(preset.variant, Some(Variant::Raging));
        assert_eq!(preset.side, Some(Side::Double));
        assert_eq!(preset.segments, None);

        let mut uniforms = WaveParams::for_variant(Variant::Raging).to_uniforms();
        preset.apply(&mut uniforms).unwrap();

        assert_eq!(uniforms.float(names::LARGE_WAVES_ELEVATION), Some(0.35));
        assert_eq!(uniforms.vec2(names::LARGE_WAVES_FREQUENCY), Some(Vec2::new(2.0, 0.5)));
        assert_eq!(uniforms.float(names::SMALL_WAVES_ITERATIONS), Some(3.0));
        assert_eq!(
            uniforms.color(names::DEPTH_COLOR).map(Color::to_hex).as_deref(),
            Some("#0b3d5c")
        );
    }

    #[test]
    fn test_apply_rejects_unknown_and_mistyped() {
        let mut uniforms = WaveParams::for_variant(Variant::Calm).to_uniforms();

        let unknown = WavePreset::from_toml_str("[uniforms]\ncolor_offset = 0.1\n").unwrap();
        assert!(matches!(
            unknown.apply(&mut uniforms),
            Err(PresetError::Uniform(UniformError::Unknown(_)))
        ));

        let mistyped =
            WavePreset::from_toml_str("[uniforms]\nlarge_waves_frequency = 3.0\n").unwrap();
        assert!(matches!(
            mistyped.apply(&mut uniforms),
            Err(PresetError::Uniform(UniformError::KindMismatch { .. }))
        ));

        let bad_color = WavePreset::from_toml_str("[uniforms]\ntime = \"#zzzzzz\"\n").unwrap();
        assert!(matches!(
            bad_color.apply(&mut uniforms),
            Err(PresetError::Color { .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waves.toml");

        let mut uniforms = WaveParams::for_variant(Variant::Raging).to_uniforms();
        uniforms.set_float(names::TIME, 42.0).unwrap();
        let preset = WavePreset::capture(Variant::Raging, 256, Side::Back, &uniforms);
        preset.save(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("large_waves_elevation = 0.2\n"));
        assert!(!text.contains("time"));

        let loaded = WavePreset::load(&path).unwrap();
        assert_eq!(loaded, preset);

        let mut restored = WaveParams::for_variant(Variant::Raging).to_uniforms();
        loaded.apply(&mut restored).unwrap();
        assert_eq!(restored.float(names::COLOR_MULTIPLIER), Some(5.0));
        assert_eq!(
            restored.color(names::SURFACE_COLOR).map(Color::to_hex).as_deref(),
            Some("#9bd8ff")
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            WavePreset::load(&dir.path().join("absent.toml")),
            Err(PresetError::Read { .. })
        ));
    }
}
