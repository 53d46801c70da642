//! Wave surface: subdivided plane mesh plus the material that animates it.

mod material;
mod mesh;

pub use material::{Side, WaveMaterial};
pub use mesh::{mesh_counts, SurfaceMesh, Vertex, MAX_SEGMENTS};

use std::f32::consts::FRAC_PI_2;

/// Plane edge length in world units
pub const PLANE_SIZE: f32 = 2.0;

/// The single animated mesh in the scene
pub struct WaveSurface {
    pub mesh: SurfaceMesh,
    pub material: WaveMaterial,
}

impl WaveSurface {
    /// Lay a `segments` x `segments` plane flat in XZ and attach the material
    pub fn new(segments: u32, material: WaveMaterial) -> Self {
        Self {
            mesh: SurfaceMesh::plane(PLANE_SIZE, PLANE_SIZE, segments, -FRAC_PI_2),
            material,
        }
    }
}
