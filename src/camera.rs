//! Perspective camera with a lazily rebuilt projection.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::params::CameraConfig;

/// Uniform buffer for the camera bind group (view-projection + model matrices)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
}

/// Perspective camera looking at a target point
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    fov_degrees: f32,
    aspect: f32,
    near: f32,
    far: f32,
    projection: Mat4,
    projection_dirty: bool,
}

impl PerspectiveCamera {
    /// Create a camera at the configured viewpoint
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            position: Vec3::from_array(config.position),
            target: Vec3::from_array(config.target),
            fov_degrees: config.fov_degrees,
            aspect,
            near: config.near_plane,
            far: config.far_plane,
            projection: Mat4::IDENTITY,
            projection_dirty: true,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    /// Change the aspect ratio; the projection is rebuilt on next use
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect != self.aspect {
            self.aspect = aspect;
            self.projection_dirty = true;
        }
    }

    /// Force the projection to be rebuilt on next use
    pub fn mark_projection_dirty(&mut self) {
        self.projection_dirty = true;
    }

    pub fn is_projection_dirty(&self) -> bool {
        self.projection_dirty
    }

    /// Projection matrix, rebuilding it first if any lens parameter changed
    pub fn projection_matrix(&mut self) -> Mat4 {
        if self.projection_dirty {
            self.projection = Mat4::perspective_rh(
                self.fov_degrees.to_radians(),
                self.aspect,
                self.near,
                self.far,
            );
            self.projection_dirty = false;
        }
        self.projection
    }

    /// World-to-view transform; Y is always up (the camera never rolls)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Create view-projection matrix for rendering
    pub fn view_proj(&mut self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Camera bind group contents for a mesh with the given model matrix
    pub fn uniforms(&mut self, model: Mat4) -> CameraUniforms {
        CameraUniforms {
            view_proj: self.view_proj().to_cols_array_2d(),
            model: model.to_cols_array_2d(),
        }
    }
}
