//! Scene setup and the state every handler works on.

use std::path::PathBuf;

use crate::bindings::{BindingError, ParameterBindings};
use crate::camera::{CameraUniforms, PerspectiveCamera};
use crate::color::Color;
use crate::ocean::{Side, WaveMaterial, WaveSurface, MAX_SEGMENTS};
use crate::orbit::OrbitControls;
use crate::params::{
    names, CameraConfig, OrbitConfig, PresetError, RenderConfig, Variant, WaveParams, WavePreset,
};
use crate::shader::{self, ShaderError, ShaderInterface};
use crate::viewport::Viewport;

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("surface needs at least one segment")]
    ZeroSegments,
    #[error("{segments} segments exceeds the maximum of {max}")]
    TooManySegments { segments: u32, max: u32 },
    #[error("preset is for the {preset} variant but the scene is {scene}")]
    VariantMismatch { preset: Variant, scene: Variant },
    #[error(transparent)]
    Preset(#[from] PresetError),
    #[error(transparent)]
    Shader(#[from] ShaderError),
}

/// Everything needed to build a session
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub variant: Variant,
    /// Overrides the variant's (and preset's) segment count
    pub segments: Option<u32>,
    pub preset: Option<WavePreset>,
    /// Where "Save preset" writes
    pub preset_path: PathBuf,
    /// Logical window size
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: f64,
    pub render: RenderConfig,
    pub camera: CameraConfig,
    pub orbit: OrbitConfig,
}

impl SceneConfig {
    pub fn new(variant: Variant) -> Self {
        let render = RenderConfig::default();
        Self {
            variant,
            segments: None,
            preset: None,
            preset_path: PathBuf::from("waves.toml"),
            width: render.window_width,
            height: render.window_height,
            device_pixel_ratio: 1.0,
            render,
            camera: CameraConfig::default(),
            orbit: OrbitConfig::default(),
        }
    }
}

/// Scene state shared by the viewport responder, the panel and the driver
pub struct Session {
    pub variant: Variant,
    pub surface: WaveSurface,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub viewport: Viewport,
    pub bindings: ParameterBindings,
    pub interface: ShaderInterface,
    pub preset_path: PathBuf,
    pub render: RenderConfig,
    camera_uniforms: CameraUniforms,
}

impl Session {
    /// Build the scene and check the uniforms against the shader before any
    /// frame is drawn
    pub fn new(config: &SceneConfig) -> Result<Self, SceneError> {
        let variant = config.variant;
        let preset = config.preset.as_ref();

        if let Some(preset_variant) = preset.and_then(|p| p.variant) {
            if preset_variant != variant {
                return Err(SceneError::VariantMismatch {
                    preset: preset_variant,
                    scene: variant,
                });
            }
        }

        let segments = config
            .segments
            .or(preset.and_then(|p| p.segments))
            .unwrap_or(variant.default_segments());
        if segments == 0 {
            return Err(SceneError::ZeroSegments);
        }
        if segments > MAX_SEGMENTS {
            return Err(SceneError::TooManySegments {
                segments,
                max: MAX_SEGMENTS,
            });
        }

        let mut material = WaveMaterial::new(WaveParams::for_variant(variant).to_uniforms());
        if let Some(preset) = preset {
            preset.apply(&mut material.uniforms)?;
            material.side = preset.side.unwrap_or_default();
        }

        let interface = ShaderInterface::reflect(shader::source(variant))?;
        interface.check(&material.uniforms)?;
        if !interface.slots().iter().any(|slot| slot.name == names::TIME) {
            return Err(ShaderError::MissingUniform(names::TIME.to_string()).into());
        }

        let viewport = Viewport::new(
            config.width,
            config.height,
            config.device_pixel_ratio,
            config.render.max_pixel_ratio,
        );
        let mut camera = PerspectiveCamera::new(&config.camera, viewport.aspect());
        let bindings = ParameterBindings::for_variant(variant, &material.uniforms);
        let surface = WaveSurface::new(segments, material);
        let camera_uniforms = camera.uniforms(surface.mesh.model_matrix());

        log::info!(
            "Scene ready: {} waves, {}x{} segments, {} controls",
            variant.label(),
            segments,
            segments,
            bindings.sliders().len() + bindings.colors().len() + 1
        );

        Ok(Self {
            variant,
            surface,
            camera,
            controls: OrbitControls::new(config.orbit.clone()),
            viewport,
            bindings,
            interface,
            preset_path: config.preset_path.clone(),
            render: config.render.clone(),
            camera_uniforms,
        })
    }

    pub fn material(&self) -> &WaveMaterial {
        &self.surface.material
    }

    /// Current value of the `time` uniform
    pub fn time(&self) -> f32 {
        self.surface
            .material
            .uniforms
            .float(names::TIME)
            .unwrap_or_default()
    }

    /// Write absolute elapsed seconds into `time`
    pub fn set_time(&mut self, secs: f32) {
        // `new` guarantees the entry exists and is a float
        if let Err(e) = self.surface.material.uniforms.set_float(names::TIME, secs) {
            log::warn!("Cannot advance time: {}", e);
        }
    }

    /// Step orbit damping and refresh the camera matrices for drawing
    pub fn update_camera(&mut self) {
        self.controls.update(&mut self.camera);
        self.camera_uniforms = self.camera.uniforms(self.surface.mesh.model_matrix());
    }

    /// Matrices as of the last `update_camera`
    pub fn camera_uniforms(&self) -> &CameraUniforms {
        &self.camera_uniforms
    }

    /// Wave uniform buffer contents laid out as the shader declares them
    pub fn uniform_bytes(&self) -> Vec<u8> {
        self.interface.pack(&self.surface.material.uniforms)
    }

    /// Window resized (logical size); `true` if the render target must follow
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f64) -> bool {
        let changed = self
            .viewport
            .resize(width, height, device_pixel_ratio, &mut self.camera);
        if changed {
            log::debug!(
                "Viewport {}x{} @{}",
                width,
                height,
                self.viewport.pixel_ratio()
            );
        }
        changed
    }

    /// Window resized (physical size plus scale factor)
    pub fn resize_native(&mut self, width: u32, height: u32, scale_factor: f64) -> bool {
        let changed =
            self.viewport
                .resize_native(width, height, scale_factor, &mut self.camera);
        if changed {
            log::debug!(
                "Viewport {:?} -> buffer {:?}",
                self.viewport.size(),
                self.viewport.drawing_buffer_size()
            );
        }
        changed
    }

    pub fn set_slider(&mut self, label: &str, value: f32) -> Result<f32, BindingError> {
        self.bindings
            .set_value(label, value, &mut self.surface.material)
    }

    pub fn set_color_hex(&mut self, label: &str, hex: &str) -> Result<Color, BindingError> {
        self.bindings
            .set_color_hex(label, hex, &mut self.surface.material)
    }

    pub fn set_side(&mut self, side: Side) {
        self.bindings.set_side(side, &mut self.surface.material);
    }

    /// Snapshot of the tunable state
    pub fn capture_preset(&self) -> WavePreset {
        WavePreset::capture(
            self.variant,
            self.surface.mesh.segments(),
            self.surface.material.side,
            &self.surface.material.uniforms,
        )
    }

    /// Write the current state to `preset_path`
    pub fn save_preset(&self) -> Result<(), PresetError> {
        self.capture_preset().save(&self.preset_path)?;
        log::info!("Saved preset to {}", self.preset_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::PresetValue;

    #[test]
    fn test_default_raging_scene() {
        let session = Session::new(&SceneConfig::new(Variant::Raging)).unwrap();

        assert_eq!(session.viewport.size(), (800, 600));
        assert!((session.camera.aspect() - 4.0 / 3.0).abs() < 1e-6);
        assert_eq!(
            session.bindings.value("largeWavesElevation", session.material()),
            Some(0.2)
        );
        assert_eq!(session.material().side, Side::Front);
        assert_eq!(session.surface.mesh.segments(), 512);
        assert_eq!(session.time(), 0.0);
        assert_eq!(session.uniform_bytes().len(), 80);
    }

    #[test]
    fn test_calm_scene() {
        let session = Session::new(&SceneConfig::new(Variant::Calm)).unwrap();

        assert_eq!(session.surface.mesh.segments(), 128);
        assert_eq!(session.material().uniforms.len(), 4);
        assert!(session.bindings.colors().is_empty());
    }

    #[test]
    fn test_segments_override() {
        let mut config = SceneConfig::new(Variant::Raging);
        config.segments = Some(16);
        let session = Session::new(&config).unwrap();
        assert_eq!(session.surface.mesh.segments(), 16);

        config.segments = Some(0);
        assert!(matches!(
            Session::new(&config),
            Err(SceneError::ZeroSegments)
        ));
    }

    #[test]
    fn test_oversized_segments_rejected() {
        let mut config = SceneConfig::new(Variant::Raging);

        for segments in [MAX_SEGMENTS + 1, 70_000, u32::MAX] {
            config.segments = Some(segments);
            assert!(matches!(
                Session::new(&config),
                Err(SceneError::TooManySegments { max: MAX_SEGMENTS, .. })
            ));
        }

        // A preset is bounded the same way
        config.segments = None;
        config.preset = Some(WavePreset {
            segments: Some(70_000),
            ..WavePreset::default()
        });
        assert!(matches!(
            Session::new(&config),
            Err(SceneError::TooManySegments { segments: 70_000, .. })
        ));
    }

    #[test]
    fn test_preset_applied_at_setup() {
        let mut preset = WavePreset::default();
        preset.side = Some(Side::Double);
        preset.segments = Some(64);
        preset
            .uniforms
            .insert(names::COLOR_OFFSET.to_string(), PresetValue::Float(0.25));

        let mut config = SceneConfig::new(Variant::Raging);
        config.preset = Some(preset);
        let session = Session::new(&config).unwrap();

        assert_eq!(session.material().side, Side::Double);
        assert_eq!(session.surface.mesh.segments(), 64);
        assert_eq!(
            session.material().uniforms.float(names::COLOR_OFFSET),
            Some(0.25)
        );
    }

    #[test]
    fn test_preset_for_other_variant_rejected() {
        let preset = WavePreset {
            variant: Some(Variant::Calm),
            ..WavePreset::default()
        };
        let mut config = SceneConfig::new(Variant::Raging);
        config.preset = Some(preset);

        assert!(matches!(
            Session::new(&config),
            Err(SceneError::VariantMismatch { .. })
        ));
    }

    #[test]
    fn test_preset_with_unknown_uniform_rejected() {
        let mut preset = WavePreset::default();
        preset
            .uniforms
            .insert(names::COLOR_OFFSET.to_string(), PresetValue::Float(0.5));

        let mut config = SceneConfig::new(Variant::Calm);
        config.preset = Some(preset);
        assert!(matches!(
            Session::new(&config),
            Err(SceneError::Preset(_))
        ));
    }

    #[test]
    fn test_resize_through_session() {
        let mut session = Session::new(&SceneConfig::new(Variant::Calm)).unwrap();

        assert!(session.resize(1280, 720, 1.0));
        assert!((session.camera.aspect() - 1280.0 / 720.0).abs() < 1e-6);
        assert!(!session.resize(1280, 720, 1.0));
    }

    #[test]
    fn test_panel_edits_reach_uniform_bytes() {
        let mut session = Session::new(&SceneConfig::new(Variant::Raging)).unwrap();

        session.set_slider("smallWavesIterations", 6.0).unwrap();
        session.set_time(3.0);
        let slot = session
            .interface
            .slots()
            .iter()
            .find(|slot| slot.name == names::SMALL_WAVES_ITERATIONS)
            .cloned()
            .unwrap();

        let bytes = session.uniform_bytes();
        let start = slot.offset as usize;
        let stored: f32 = bytemuck::pod_read_unaligned(&bytes[start..start + 4]);
        assert_eq!(stored, 5.0);
    }

    #[test]
    fn test_save_preset_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SceneConfig::new(Variant::Raging);
        config.segments = Some(32);
        config.preset_path = dir.path().join("waves.toml");

        let mut session = Session::new(&config).unwrap();
        session.set_color_hex("surfaceColor", "#112233").unwrap();
        session.set_side(Side::Back);
        session.save_preset().unwrap();

        config.preset = Some(WavePreset::load(&config.preset_path).unwrap());
        config.segments = None;
        let reloaded = Session::new(&config).unwrap();

        assert_eq!(reloaded.surface.mesh.segments(), 32);
        assert_eq!(reloaded.material().side, Side::Back);
        assert_eq!(
            reloaded.bindings.color_hex("surfaceColor"),
            Some("#112233")
        );
    }
}
