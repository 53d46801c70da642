//! Named shader inputs with a closed set of value kinds.
//!
//! The set is fixed when it is built: later writes may change a value but
//! never add a key or change its kind.

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec2;

use crate::color::Color;

/// Kind of a uniform entry, matching the WGSL member type it binds to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformKind {
    /// `f32`
    Float,
    /// `vec2<f32>`
    Vec2,
    /// `vec3<f32>` holding RGB
    Color,
}

impl fmt::Display for UniformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UniformKind::Float => "f32",
            UniformKind::Vec2 => "vec2<f32>",
            UniformKind::Color => "vec3<f32>",
        })
    }
}

/// Current value of one uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2(Vec2),
    Color(Color),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Float(_) => UniformKind::Float,
            UniformValue::Vec2(_) => UniformKind::Vec2,
            UniformValue::Color(_) => UniformKind::Color,
        }
    }

    /// Raw bytes of the value as the shader reads them (no trailing padding)
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            UniformValue::Float(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::Vec2(v) => bytemuck::cast_slice(&v.to_array()).to_vec(),
            UniformValue::Color(c) => bytemuck::cast_slice(&c.to_array()).to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UniformError {
    #[error("unknown uniform '{0}'")]
    Unknown(String),
    #[error("uniform '{name}' is {expected}, not {found}")]
    KindMismatch {
        name: String,
        expected: UniformKind,
        found: UniformKind,
    },
}

/// The material's uniform inputs, keyed by the WGSL member name
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UniformSet {
    entries: BTreeMap<String, UniformValue>,
}

impl UniformSet {
    /// Build the set; later entries with a repeated name replace earlier ones
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, UniformValue)>,
        K: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Replace the value of an existing entry of the same kind
    pub fn set(&mut self, name: &str, value: UniformValue) -> Result<(), UniformError> {
        let slot = self
            .entries
            .get_mut(name)
            .ok_or_else(|| UniformError::Unknown(name.to_string()))?;
        if slot.kind() != value.kind() {
            return Err(UniformError::KindMismatch {
                name: name.to_string(),
                expected: slot.kind(),
                found: value.kind(),
            });
        }
        *slot = value;
        Ok(())
    }

    pub fn set_float(&mut self, name: &str, value: f32) -> Result<(), UniformError> {
        self.set(name, UniformValue::Float(value))
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.entries.get(name) {
            Some(UniformValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn vec2(&self, name: &str) -> Option<Vec2> {
        match self.entries.get(name) {
            Some(UniformValue::Vec2(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn color(&self, name: &str) -> Option<Color> {
        match self.entries.get(name) {
            Some(UniformValue::Color(c)) => Some(*c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> UniformSet {
        UniformSet::from_entries([
            ("time", UniformValue::Float(0.0)),
            ("large_waves_frequency", UniformValue::Vec2(Vec2::new(4.0, 1.5))),
            ("depth_color", UniformValue::Color(Color::new(0.1, 0.4, 0.6))),
        ])
    }

    #[test]
    fn test_set_existing_entry() {
        let mut uniforms = sample();
        uniforms.set_float("time", 12.5).unwrap();
        assert_eq!(uniforms.float("time"), Some(12.5));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let mut uniforms = sample();
        let err = uniforms.set_float("uTime", 1.0).unwrap_err();
        assert_eq!(err, UniformError::Unknown("uTime".to_string()));
        assert_eq!(uniforms.len(), 3);
    }

    #[test]
    fn test_kind_cannot_change() {
        let mut uniforms = sample();
        let err = uniforms.set_float("large_waves_frequency", 1.0).unwrap_err();
        assert!(matches!(
            err,
            UniformError::KindMismatch {
                expected: UniformKind::Vec2,
                found: UniformKind::Float,
                ..
            }
        ));
        assert_eq!(uniforms.vec2("large_waves_frequency"), Some(Vec2::new(4.0, 1.5)));
    }

    #[test]
    fn test_value_bytes() {
        assert_eq!(UniformValue::Float(1.0).to_bytes(), 1.0f32.to_ne_bytes().to_vec());
        assert_eq!(UniformValue::Vec2(Vec2::ONE).to_bytes().len(), 8);
        assert_eq!(UniformValue::Color(Color::default()).to_bytes().len(), 12);
    }
}
