//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::params::{PresetError, Variant, WavePreset};
use crate::session::SceneConfig;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "seaswell")]
#[command(about = "Animated ocean-wave surface with a live tuning panel", long_about = None)]
pub struct Args {
    /// Wave variant [default: the preset's, else raging]
    #[arg(long, value_enum)]
    pub variant: Option<Variant>,

    /// Plane subdivisions per side (overrides the variant default and preset)
    #[arg(long, value_name = "N")]
    pub segments: Option<u32>,

    /// TOML preset to load at startup; "Save preset" writes back here
    #[arg(long, value_name = "PATH")]
    pub preset: Option<PathBuf>,

    /// Initial window width (logical pixels)
    #[arg(long, value_name = "PIXELS")]
    pub width: Option<u32>,

    /// Initial window height (logical pixels)
    #[arg(long, value_name = "PIXELS")]
    pub height: Option<u32>,
}

impl Args {
    /// Resolve the scene configuration, loading the preset if one exists
    ///
    /// A `--preset` path that does not exist yet is not an error: the scene
    /// starts from defaults and "Save preset" creates the file.
    pub fn scene_config(&self) -> Result<SceneConfig, PresetError> {
        let preset = match &self.preset {
            Some(path) if path.exists() => {
                log::info!("Loading preset {}", path.display());
                Some(WavePreset::load(path)?)
            }
            Some(path) => {
                log::info!("Preset {} not found, starting from defaults", path.display());
                None
            }
            None => None,
        };

        let variant = self
            .variant
            .or(preset.as_ref().and_then(|p| p.variant))
            .unwrap_or_default();

        let mut config = SceneConfig::new(variant);
        config.segments = self.segments;
        config.preset = preset;
        if let Some(path) = &self.preset {
            config.preset_path = path.clone();
        }
        if let Some(width) = self.width {
            config.width = width;
            config.render.window_width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
            config.render.window_height = height;
        }
        Ok(config)
    }
}
