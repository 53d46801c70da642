//! WGSL wave shaders and reflection of their uniform block.
//!
//! The wave uniform struct is read back out of the parsed module so the
//! uniform set can be checked against it before the first frame, and packed
//! using the member offsets the shader compiler will use.

use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{AddressSpace, Scalar, TypeInner, VectorSize};

use crate::params::Variant;
use crate::uniforms::{UniformKind, UniformSet};

/// Bind group holding the camera matrices
pub const CAMERA_GROUP: u32 = 0;

/// Bind group holding the wave uniform struct (binding 0)
pub const WAVES_GROUP: u32 = 1;

const CALM_SOURCE: &str = include_str!("shaders/waves_calm.wgsl");
const RAGING_SOURCE: &str = include_str!("shaders/waves_raging.wgsl");

/// WGSL source for a variant
pub fn source(variant: Variant) -> &'static str {
    match variant {
        Variant::Calm => CALM_SOURCE,
        Variant::Raging => RAGING_SOURCE,
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to parse shader:\n{0}")]
    Parse(String),
    #[error("shader failed validation: {0}")]
    Validation(String),
    #[error("shader declares no uniform struct at @group({WAVES_GROUP}) @binding(0)")]
    MissingBlock,
    #[error("shader member '{0}' has a type uniforms cannot carry")]
    UnsupportedMember(String),
    #[error("shader input '{0}' has no uniform entry")]
    MissingUniform(String),
    #[error("shader input '{name}' is {expected} but the uniform is {found}")]
    KindMismatch {
        name: String,
        expected: UniformKind,
        found: UniformKind,
    },
}

/// One member of the reflected wave struct
#[derive(Debug, Clone, PartialEq)]
pub struct UniformSlot {
    pub name: String,
    pub kind: UniformKind,
    /// Byte offset inside the uniform buffer
    pub offset: u32,
}

/// Layout of the wave uniform block as declared by the shader
#[derive(Debug, Clone)]
pub struct ShaderInterface {
    slots: Vec<UniformSlot>,
    span: u32,
}

impl ShaderInterface {
    /// Parse and validate `source`, then read the struct bound at
    /// `@group(WAVES_GROUP) @binding(0)`
    pub fn reflect(source: &str) -> Result<Self, ShaderError> {
        let module = naga::front::wgsl::parse_str(source)
            .map_err(|e| ShaderError::Parse(e.emit_to_string(source)))?;
        Validator::new(ValidationFlags::all(), Capabilities::empty())
            .validate(&module)
            .map_err(|e| ShaderError::Validation(e.to_string()))?;

        let block = module
            .global_variables
            .iter()
            .map(|(_, global)| global)
            .find(|global| {
                global.space == AddressSpace::Uniform
                    && global
                        .binding
                        .as_ref()
                        .is_some_and(|b| b.group == WAVES_GROUP && b.binding == 0)
            })
            .ok_or(ShaderError::MissingBlock)?;

        let TypeInner::Struct { members, span } = &module.types[block.ty].inner else {
            return Err(ShaderError::MissingBlock);
        };

        let slots = members
            .iter()
            .map(|member| {
                let name = member.name.clone().unwrap_or_default();
                let kind = match module.types[member.ty].inner {
                    TypeInner::Scalar(scalar) if scalar == Scalar::F32 => UniformKind::Float,
                    TypeInner::Vector {
                        size: VectorSize::Bi,
                        scalar,
                    } if scalar == Scalar::F32 => UniformKind::Vec2,
                    TypeInner::Vector {
                        size: VectorSize::Tri,
                        scalar,
                    } if scalar == Scalar::F32 => UniformKind::Color,
                    _ => return Err(ShaderError::UnsupportedMember(name)),
                };
                Ok(UniformSlot {
                    name,
                    kind,
                    offset: member.offset,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            slots,
            span: *span,
        })
    }

    pub fn slots(&self) -> &[UniformSlot] {
        &self.slots
    }

    /// Buffer size in bytes, rounded up to 16
    pub fn buffer_size(&self) -> u64 {
        u64::from(self.span.div_ceil(16) * 16)
    }

    /// Every shader input must have an entry of the same kind
    pub fn check(&self, uniforms: &UniformSet) -> Result<(), ShaderError> {
        for slot in &self.slots {
            let value = uniforms
                .get(&slot.name)
                .ok_or_else(|| ShaderError::MissingUniform(slot.name.clone()))?;
            if value.kind() != slot.kind {
                return Err(ShaderError::KindMismatch {
                    name: slot.name.clone(),
                    expected: slot.kind,
                    found: value.kind(),
                });
            }
        }
        Ok(())
    }

    /// Buffer contents for the current values; members without a matching
    /// entry stay zeroed
    pub fn pack(&self, uniforms: &UniformSet) -> Vec<u8> {
        let mut bytes = vec![0u8; self.buffer_size() as usize];
        for slot in &self.slots {
            let Some(value) = uniforms.get(&slot.name) else {
                continue;
            };
            if value.kind() != slot.kind {
                continue;
            }
            let data = value.to_bytes();
            let start = slot.offset as usize;
            bytes[start..start + data.len()].copy_from_slice(&data);
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{names, WaveParams};
    use crate::uniforms::UniformValue;

    fn raging() -> ShaderInterface {
        ShaderInterface::reflect(source(Variant::Raging)).unwrap()
    }

    fn read_f32(bytes: &[u8], offset: u32) -> f32 {
        let start = offset as usize;
        bytemuck::pod_read_unaligned(&bytes[start..start + 4])
    }

    #[test]
    fn test_both_variants_match_their_defaults() {
        for variant in [Variant::Calm, Variant::Raging] {
            let interface = ShaderInterface::reflect(source(variant)).unwrap();
            let uniforms = WaveParams::for_variant(variant).to_uniforms();

            assert_eq!(interface.slots().len(), uniforms.len());
            interface.check(&uniforms).unwrap();
        }
    }

    #[test]
    fn test_raging_layout() {
        let interface = raging();
        let slot = |name: &str| {
            interface
                .slots()
                .iter()
                .find(|s| s.name == name)
                .cloned()
                .unwrap()
        };

        assert_eq!(slot(names::DEPTH_COLOR).offset, 0);
        assert_eq!(slot(names::DEPTH_COLOR).kind, UniformKind::Color);
        assert_eq!(slot(names::TIME).offset, 12);
        assert_eq!(slot(names::LARGE_WAVES_FREQUENCY).offset, 32);
        assert_eq!(slot(names::LARGE_WAVES_FREQUENCY).kind, UniformKind::Vec2);
        assert_eq!(interface.buffer_size(), 80);
    }

    #[test]
    fn test_missing_and_mistyped_uniforms() {
        let interface = raging();
        let defaults = WaveParams::for_variant(Variant::Raging).to_uniforms();

        let without_colors = UniformSet::from_entries(
            defaults
                .iter()
                .filter(|(name, _)| *name != names::SURFACE_COLOR)
                .map(|(name, value)| (name.to_string(), *value)),
        );
        assert_eq!(
            interface.check(&without_colors),
            Err(ShaderError::MissingUniform(names::SURFACE_COLOR.to_string()))
        );

        let mistyped = UniformSet::from_entries(defaults.iter().map(|(name, value)| {
            let value = if name == names::COLOR_OFFSET {
                UniformValue::Vec2(glam::Vec2::ZERO)
            } else {
                *value
            };
            (name.to_string(), value)
        }));
        assert!(matches!(
            interface.check(&mistyped),
            Err(ShaderError::KindMismatch { .. })
        ));

        // The calm set lacks most of the raging inputs
        let calm = WaveParams::for_variant(Variant::Calm).to_uniforms();
        assert!(interface.check(&calm).is_err());
    }

    #[test]
    fn test_pack_places_values_at_offsets() {
        let interface = raging();
        let mut uniforms = WaveParams::for_variant(Variant::Raging).to_uniforms();
        uniforms.set_float(names::TIME, 12.5).unwrap();

        let bytes = interface.pack(&uniforms);
        assert_eq!(bytes.len(), 80);
        assert_eq!(read_f32(&bytes, 12), 12.5);
        assert_eq!(read_f32(&bytes, 32), 4.0);
        assert_eq!(read_f32(&bytes, 36), 1.5);
        assert!((read_f32(&bytes, 0) - 24.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_shader_without_block() {
        let wgsl = r#"
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return vec4<f32>(1.0, 0.0, 0.0, 1.0);
            }
        "#;
        assert_eq!(
            ShaderInterface::reflect(wgsl).unwrap_err(),
            ShaderError::MissingBlock
        );
        assert!(matches!(
            ShaderInterface::reflect("fn broken( {"),
            Err(ShaderError::Parse(_))
        ));
    }
}
