//! Parameter definitions with units and documented semantics.
//!
//! All tunable defaults live here:
//! - Wave shader inputs per variant
//! - Camera placement and orbit tuning
//! - Window / render-target settings
//! - TOML presets that override the defaults

mod camera;
mod preset;
mod render;
mod waves;

pub use camera::{CameraConfig, OrbitConfig};
pub use preset::{PresetError, PresetValue, WavePreset};
pub use render::RenderConfig;
pub use waves::{names, LargeWaves, SmallWaves, Variant, WaveColors, WaveParams};
