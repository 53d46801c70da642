//! Wave surface variants and their default shader inputs.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::uniforms::{UniformSet, UniformValue};

/// WGSL member names of the wave uniform struct
pub mod names {
    pub const TIME: &str = "time";
    pub const LARGE_WAVES_ELEVATION: &str = "large_waves_elevation";
    pub const LARGE_WAVES_FREQUENCY: &str = "large_waves_frequency";
    pub const LARGE_WAVES_SPEED: &str = "large_waves_speed";
    pub const SMALL_WAVES_ELEVATION: &str = "small_waves_elevation";
    pub const SMALL_WAVES_FREQUENCY: &str = "small_waves_frequency";
    pub const SMALL_WAVES_SPEED: &str = "small_waves_speed";
    pub const SMALL_WAVES_ITERATIONS: &str = "small_waves_iterations";
    pub const DEPTH_COLOR: &str = "depth_color";
    pub const SURFACE_COLOR: &str = "surface_color";
    pub const COLOR_OFFSET: &str = "color_offset";
    pub const COLOR_MULTIPLIER: &str = "color_multiplier";
}

/// Which wave surface to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Large sine waves only, flat color, 128 segments
    Calm,
    /// Large waves + iterated noise ripples + depth/surface gradient, 512 segments
    #[default]
    Raging,
}

impl Variant {
    /// Plane subdivisions along each axis
    pub fn default_segments(self) -> u32 {
        match self {
            Variant::Calm => 128,
            Variant::Raging => 512,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Variant::Calm => "calm",
            Variant::Raging => "raging",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Large sine-product swell
#[derive(Debug, Clone)]
pub struct LargeWaves {
    /// Peak height in plane units (the plane is 2 units wide)
    pub elevation: f32,

    /// Spatial frequency along world X and Z (radians per unit)
    pub frequency: [f32; 2],

    /// Phase speed (radians per second)
    pub speed: f32,
}

impl Default for LargeWaves {
    fn default() -> Self {
        Self {
            elevation: 0.2,
            frequency: [4.0, 1.5],
            speed: 0.75,
        }
    }
}

/// Perlin-noise chop subtracted from the swell, one octave per iteration
#[derive(Debug, Clone)]
pub struct SmallWaves {
    pub elevation: f32,
    pub frequency: f32,
    pub speed: f32,

    /// Octave count; the shader loops while `i <= iterations`
    pub iterations: f32,
}

impl Default for SmallWaves {
    fn default() -> Self {
        Self {
            elevation: 0.15,
            frequency: 3.0,
            speed: 0.2,
            iterations: 4.0,
        }
    }
}

/// Depth-to-surface color gradient driven by vertex elevation
#[derive(Debug, Clone)]
pub struct WaveColors {
    pub depth: [u8; 3],
    pub surface: [u8; 3],

    /// Added to elevation before scaling
    pub offset: f32,

    /// Scales (elevation + offset) into the 0..1 mix factor
    pub multiplier: f32,
}

impl Default for WaveColors {
    fn default() -> Self {
        Self {
            depth: [0x18, 0x66, 0x91],
            surface: [0x9b, 0xd8, 0xff],
            offset: 0.08,
            multiplier: 5.0,
        }
    }
}

/// Complete default parameter set for one variant
#[derive(Debug, Clone)]
pub struct WaveParams {
    pub variant: Variant,
    pub large: LargeWaves,
    pub small: Option<SmallWaves>,
    pub colors: Option<WaveColors>,
}

impl WaveParams {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Calm => Self {
                variant,
                large: LargeWaves::default(),
                small: None,
                colors: None,
            },
            Variant::Raging => Self {
                variant,
                large: LargeWaves::default(),
                small: Some(SmallWaves::default()),
                colors: Some(WaveColors::default()),
            },
        }
    }

    /// Initial uniform set, `time` starting at zero
    pub fn to_uniforms(&self) -> UniformSet {
        let mut entries = vec![
            (names::TIME, UniformValue::Float(0.0)),
            (
                names::LARGE_WAVES_ELEVATION,
                UniformValue::Float(self.large.elevation),
            ),
            (
                names::LARGE_WAVES_FREQUENCY,
                UniformValue::Vec2(Vec2::from_array(self.large.frequency)),
            ),
            (names::LARGE_WAVES_SPEED, UniformValue::Float(self.large.speed)),
        ];

        if let Some(small) = &self.small {
            entries.extend([
                (names::SMALL_WAVES_ELEVATION, UniformValue::Float(small.elevation)),
                (names::SMALL_WAVES_FREQUENCY, UniformValue::Float(small.frequency)),
                (names::SMALL_WAVES_SPEED, UniformValue::Float(small.speed)),
                (names::SMALL_WAVES_ITERATIONS, UniformValue::Float(small.iterations)),
            ]);
        }

        if let Some(colors) = &self.colors {
            entries.extend([
                (
                    names::DEPTH_COLOR,
                    UniformValue::Color(Color::from_rgb8(colors.depth)),
                ),
                (
                    names::SURFACE_COLOR,
                    UniformValue::Color(Color::from_rgb8(colors.surface)),
                ),
                (names::COLOR_OFFSET, UniformValue::Float(colors.offset)),
                (names::COLOR_MULTIPLIER, UniformValue::Float(colors.multiplier)),
            ]);
        }

        UniformSet::from_entries(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calm_uniforms_are_a_subset() {
        let calm = WaveParams::for_variant(Variant::Calm).to_uniforms();
        let raging = WaveParams::for_variant(Variant::Raging).to_uniforms();

        assert_eq!(calm.len(), 4);
        assert_eq!(raging.len(), 12);
        for (name, value) in calm.iter() {
            assert_eq!(raging.get(name).map(|v| v.kind()), Some(value.kind()));
        }
    }

    #[test]
    fn test_raging_defaults() {
        let uniforms = WaveParams::for_variant(Variant::Raging).to_uniforms();
        assert_eq!(uniforms.float(names::LARGE_WAVES_ELEVATION), Some(0.2));
        assert_eq!(uniforms.float(names::SMALL_WAVES_ITERATIONS), Some(4.0));
        assert_eq!(
            uniforms.color(names::DEPTH_COLOR).map(Color::to_hex).as_deref(),
            Some("#186691")
        );
        assert_eq!(
            uniforms.color(names::SURFACE_COLOR).map(Color::to_hex).as_deref(),
            Some("#9bd8ff")
        );
    }

    #[test]
    fn test_segments_per_variant() {
        assert_eq!(Variant::Calm.default_segments(), 128);
        assert_eq!(Variant::Raging.default_segments(), 512);
        assert_eq!(Variant::default(), Variant::Raging);
    }
}
