//! Panel controls bound to material uniforms.
//!
//! Each control constrains what the user types or drags, then writes the
//! result into the uniform set the renderer uploads every frame.

use crate::color::{Color, ColorParseError};
use crate::ocean::{Side, WaveMaterial};
use crate::params::{names, Variant};
use crate::uniforms::{UniformError, UniformSet, UniformValue};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindingError {
    #[error("no control labelled '{0}'")]
    UnknownControl(String),
    #[error(transparent)]
    Uniform(#[from] UniformError),
    #[error(transparent)]
    Color(#[from] ColorParseError),
}

/// Part of a uniform a slider edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    /// The whole `f32`
    Value,
    /// `.x` of a `vec2<f32>`
    X,
    /// `.y` of a `vec2<f32>`
    Y,
}

/// Range slider over one scalar or vector component
#[derive(Debug, Clone, PartialEq)]
pub struct SliderBinding {
    pub label: &'static str,
    pub uniform: &'static str,
    pub component: Component,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl SliderBinding {
    const fn new(label: &'static str, uniform: &'static str, max: f32, step: f32) -> Self {
        Self {
            label,
            uniform,
            component: Component::Value,
            min: 0.0,
            max,
            step,
        }
    }

    const fn component(mut self, component: Component) -> Self {
        self.component = component;
        self
    }

    /// Snap to the step grid, then clamp into `[min, max]`
    pub fn constrain(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        let snapped = if self.step > 0.0 {
            let step = self.step as f64;
            ((value as f64 / step).round() * step) as f32
        } else {
            value
        };
        snapped.clamp(self.min, self.max)
    }

    pub fn read(&self, uniforms: &UniformSet) -> Option<f32> {
        match (self.component, uniforms.get(self.uniform)?) {
            (Component::Value, UniformValue::Float(v)) => Some(*v),
            (Component::X, UniformValue::Vec2(v)) => Some(v.x),
            (Component::Y, UniformValue::Vec2(v)) => Some(v.y),
            _ => None,
        }
    }

    fn write(&self, uniforms: &mut UniformSet, value: f32) -> Result<(), UniformError> {
        match self.component {
            Component::Value => uniforms.set_float(self.uniform, value),
            Component::X | Component::Y => {
                let mut vector = uniforms.vec2(self.uniform).ok_or_else(|| {
                    UniformError::Unknown(self.uniform.to_string())
                })?;
                if self.component == Component::X {
                    vector.x = value;
                } else {
                    vector.y = value;
                }
                uniforms.set(self.uniform, UniformValue::Vec2(vector))
            }
        }
    }
}

/// Color picker editing a `#rrggbb` string that is re-parsed into a uniform
#[derive(Debug, Clone, PartialEq)]
pub struct ColorBinding {
    pub label: &'static str,
    pub uniform: &'static str,
    hex: String,
}

impl ColorBinding {
    pub fn hex(&self) -> &str {
        &self.hex
    }
}

fn slider_table(variant: Variant) -> Vec<SliderBinding> {
    let speed_max = match variant {
        Variant::Calm => 1.0,
        Variant::Raging => 4.0,
    };
    vec![
        SliderBinding::new("largeWavesElevation", names::LARGE_WAVES_ELEVATION, 1.0, 0.001),
        SliderBinding::new("largeWavesFrequencyX", names::LARGE_WAVES_FREQUENCY, 10.0, 0.001)
            .component(Component::X),
        SliderBinding::new("largeWavesFrequencyY", names::LARGE_WAVES_FREQUENCY, 10.0, 0.001)
            .component(Component::Y),
        SliderBinding::new("largeWavesSpeed", names::LARGE_WAVES_SPEED, speed_max, 0.001),
        SliderBinding::new("smallWavesElevation", names::SMALL_WAVES_ELEVATION, 1.0, 0.001),
        SliderBinding::new("smallWavesFrequency", names::SMALL_WAVES_FREQUENCY, 30.0, 0.001),
        SliderBinding::new("smallWavesSpeed", names::SMALL_WAVES_SPEED, 4.0, 0.001),
        SliderBinding::new("smallWavesIterations", names::SMALL_WAVES_ITERATIONS, 5.0, 1.0),
        SliderBinding::new("colorOffset", names::COLOR_OFFSET, 1.0, 0.001),
        SliderBinding::new("colorMultiplier", names::COLOR_MULTIPLIER, 10.0, 0.001),
    ]
}

const COLOR_TABLE: [(&str, &str); 2] = [
    ("depthColor", names::DEPTH_COLOR),
    ("surfaceColor", names::SURFACE_COLOR),
];

/// Every control registered for the current material
#[derive(Debug, Clone)]
pub struct ParameterBindings {
    sliders: Vec<SliderBinding>,
    colors: Vec<ColorBinding>,
}

impl ParameterBindings {
    /// Register a control for each uniform the material actually has
    pub fn for_variant(variant: Variant, uniforms: &UniformSet) -> Self {
        let sliders = slider_table(variant)
            .into_iter()
            .filter(|slider| slider.read(uniforms).is_some())
            .collect();
        let colors = COLOR_TABLE
            .iter()
            .filter_map(|&(label, uniform)| {
                uniforms.color(uniform).map(|color| ColorBinding {
                    label,
                    uniform,
                    hex: color.to_hex(),
                })
            })
            .collect();

        Self { sliders, colors }
    }

    pub fn sliders(&self) -> &[SliderBinding] {
        &self.sliders
    }

    pub fn colors(&self) -> &[ColorBinding] {
        &self.colors
    }

    pub fn slider(&self, label: &str) -> Result<&SliderBinding, BindingError> {
        self.sliders
            .iter()
            .find(|slider| slider.label == label)
            .ok_or_else(|| BindingError::UnknownControl(label.to_string()))
    }

    /// Current value shown by a slider
    pub fn value(&self, label: &str, material: &WaveMaterial) -> Option<f32> {
        self.slider(label).ok()?.read(&material.uniforms)
    }

    /// Apply a slider edit; returns the value actually stored
    pub fn set_value(
        &self,
        label: &str,
        value: f32,
        material: &mut WaveMaterial,
    ) -> Result<f32, BindingError> {
        let slider = self.slider(label)?;
        let value = slider.constrain(value);
        slider.write(&mut material.uniforms, value)?;
        log::debug!("{} = {}", label, value);
        Ok(value)
    }

    pub fn color_hex(&self, label: &str) -> Option<&str> {
        self.colors
            .iter()
            .find(|color| color.label == label)
            .map(ColorBinding::hex)
    }

    /// Apply a color edit: parse `hex` and re-derive the uniform from it
    ///
    /// On a parse error nothing changes.
    pub fn set_color_hex(
        &mut self,
        label: &str,
        hex: &str,
        material: &mut WaveMaterial,
    ) -> Result<Color, BindingError> {
        let binding = self
            .colors
            .iter_mut()
            .find(|color| color.label == label)
            .ok_or_else(|| BindingError::UnknownControl(label.to_string()))?;
        let color = Color::from_hex(hex)?;
        material
            .uniforms
            .set(binding.uniform, UniformValue::Color(color))?;
        binding.hex = color.to_hex();
        log::debug!("{} = {}", label, binding.hex);
        Ok(color)
    }

    /// Change which faces are drawn
    pub fn set_side(&self, side: Side, material: &mut WaveMaterial) {
        if material.side != side {
            log::debug!("side = {}", side);
            material.side = side;
        }
    }
}
