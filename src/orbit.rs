//! Orbit camera controller with damping.
//!
//! Pointer input accumulates pending rotation and pan; each `update` applies a
//! fraction (`damping_factor`) of what is pending and decays the rest, so the
//! camera eases toward the requested orientation over several frames.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::camera::PerspectiveCamera;
use crate::params::OrbitConfig;

const EPS: f32 = 1e-6;

/// Wheel notch dolly factor before `zoom_speed` is applied
const DOLLY_BASE: f32 = 0.95;

/// Spherical coordinates around the target (Y up)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Spherical {
    radius: f32,
    /// Polar angle from +Y
    phi: f32,
    /// Azimuth around Y, measured from +Z toward +X
    theta: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

/// Orbit controls driving a `PerspectiveCamera`
pub struct OrbitControls {
    config: OrbitConfig,
    pending_theta: f32,
    pending_phi: f32,
    pending_pan: Vec3,
    scale: f32,
}

impl OrbitControls {
    pub fn new(config: OrbitConfig) -> Self {
        Self {
            config,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_pan: Vec3::ZERO,
            scale: 1.0,
        }
    }

    /// Rotate from a pointer drag of `dx`,`dy` pixels; a drag of the full
    /// viewport height turns the camera once around the target
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        self.pending_theta -= TAU * dx / height * self.config.rotate_speed;
        self.pending_phi -= TAU * dy / height * self.config.rotate_speed;
    }

    /// Pan from a pointer drag so the scene under the cursor follows it
    pub fn pan(&mut self, dx: f32, dy: f32, viewport_height: f32, camera: &PerspectiveCamera) {
        let height = viewport_height.max(1.0);
        let offset = camera.position - camera.target;
        let target_distance =
            offset.length() * (camera.fov_degrees() / 2.0).to_radians().tan();

        let forward = (-offset).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();

        let speed = self.config.pan_speed;
        self.pending_pan -= right * (2.0 * dx * target_distance / height * speed);
        self.pending_pan += up * (2.0 * dy * target_distance / height * speed);
    }

    /// Dolly from a wheel movement; positive `notches` move toward the target
    pub fn dolly(&mut self, notches: f32) {
        let step = DOLLY_BASE.powf(self.config.zoom_speed);
        self.scale *= step.powf(notches);
    }

    /// Whether any rotation or pan is still pending
    pub fn is_settling(&self) -> bool {
        self.pending_theta.abs() > EPS
            || self.pending_phi.abs() > EPS
            || self.pending_pan.length_squared() > EPS * EPS
            || (self.scale - 1.0).abs() > EPS
    }

    /// Advance one step: move the camera by the damped share of pending input
    ///
    /// Returns `true` if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let previous_position = camera.position;
        let previous_target = camera.target;

        let mut spherical = Spherical::from_offset(camera.position - camera.target);
        let share = if self.config.enable_damping {
            self.config.damping_factor
        } else {
            1.0
        };

        spherical.theta += self.pending_theta * share;
        spherical.phi += self.pending_phi * share;
        spherical.phi = spherical.phi.clamp(EPS, PI - EPS);
        spherical.radius = (spherical.radius * self.scale)
            .clamp(self.config.min_distance, self.config.max_distance);

        camera.target += self.pending_pan * share;
        camera.position = camera.target + spherical.to_offset();

        if self.config.enable_damping {
            let decay = 1.0 - self.config.damping_factor;
            self.pending_theta *= decay;
            self.pending_phi *= decay;
            self.pending_pan *= decay;
        } else {
            self.pending_theta = 0.0;
            self.pending_phi = 0.0;
            self.pending_pan = Vec3::ZERO;
        }
        self.scale = 1.0;

        previous_position.distance_squared(camera.position) > EPS
            || previous_target.distance_squared(camera.target) > EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::CameraConfig;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(&CameraConfig::default(), 4.0 / 3.0)
    }

    #[test]
    fn test_spherical_round_trip() {
        let offset = Vec3::new(1.0, 1.0, 1.0);
        let back = Spherical::from_offset(offset).to_offset();
        assert!((back - offset).length() < 1e-5);
    }

    #[test]
    fn test_idle_update_keeps_camera_still() {
        let mut controls = OrbitControls::new(OrbitConfig::default());
        let mut camera = camera();
        let start = camera.position;

        for _ in 0..10 {
            assert!(!controls.update(&mut camera));
        }
        assert!((camera.position - start).length() < 1e-5);
        assert!(!controls.is_settling());
    }

    #[test]
    fn test_damped_rotation_converges() {
        let mut controls = OrbitControls::new(OrbitConfig::default());
        let mut camera = camera();
        let radius = camera.position.length();
        let start_theta = Spherical::from_offset(camera.position).theta;

        // A quarter-height drag requests a quarter turn
        controls.rotate(150.0, 0.0, 600.0);
        assert!(controls.update(&mut camera));

        let first = Spherical::from_offset(camera.position).theta - start_theta;
        assert!((first + TAU / 4.0 * 0.05).abs() < 1e-4);

        for _ in 0..500 {
            controls.update(&mut camera);
        }
        let total = Spherical::from_offset(camera.position).theta - start_theta;
        assert!((total + TAU / 4.0).abs() < 1e-3, "total rotation {}", total);
        assert!((camera.position.length() - radius).abs() < 1e-4);
        assert!(!controls.is_settling());
    }

    #[test]
    fn test_undamped_rotation_is_immediate() {
        let config = OrbitConfig {
            enable_damping: false,
            ..OrbitConfig::default()
        };
        let mut controls = OrbitControls::new(config);
        let mut camera = camera();
        let start_theta = Spherical::from_offset(camera.position).theta;

        controls.rotate(-150.0, 0.0, 600.0);
        controls.update(&mut camera);

        let turned = Spherical::from_offset(camera.position).theta - start_theta;
        assert!((turned - TAU / 4.0).abs() < 1e-4);
        assert!(!controls.is_settling());
    }

    #[test]
    fn test_polar_angle_is_clamped() {
        let config = OrbitConfig {
            enable_damping: false,
            ..OrbitConfig::default()
        };
        let mut controls = OrbitControls::new(config);
        let mut camera = camera();

        // Dragging far down would swing the eye past the pole
        controls.rotate(0.0, 10_000.0, 600.0);
        controls.update(&mut camera);

        assert!(camera.position.y > 0.0);
        assert!(camera.position.x.abs() + camera.position.z.abs() > 0.0);
    }

    #[test]
    fn test_dolly_scales_distance() {
        let config = OrbitConfig {
            enable_damping: false,
            min_distance: 0.5,
            ..OrbitConfig::default()
        };
        let mut controls = OrbitControls::new(config);
        let mut camera = camera();
        let radius = camera.position.length();

        controls.dolly(1.0);
        controls.update(&mut camera);
        assert!((camera.position.length() - radius * 0.95).abs() < 1e-5);

        controls.dolly(200.0);
        controls.update(&mut camera);
        assert!((camera.position.length() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_pan_moves_target_and_eye_together() {
        let config = OrbitConfig {
            enable_damping: false,
            ..OrbitConfig::default()
        };
        let mut controls = OrbitControls::new(config);
        let mut camera = camera();
        let offset = camera.position - camera.target;

        let pan_camera = PerspectiveCamera::new(&CameraConfig::default(), 1.0);
        controls.pan(100.0, 0.0, 600.0, &pan_camera);
        controls.update(&mut camera);

        assert!(camera.target.length() > 0.0);
        assert!(((camera.position - camera.target) - offset).length() < 1e-4);
    }
}
