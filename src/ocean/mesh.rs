//! Subdivided plane mesh for the wave surface.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Vertex data for the wave mesh (position + UV coordinates)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Largest subdivision count per side
///
/// Keeps every vertex index inside `u32` and both buffers under wgpu's default
/// 256 MiB `max_buffer_size`.
pub const MAX_SEGMENTS: u32 = 2048;

/// Vertex and index counts of a plane with `segments` subdivisions per side,
/// or `None` if they do not fit in `u32`
pub fn mesh_counts(segments: u32) -> Option<(u32, u32)> {
    let cols = segments.checked_add(1)?;
    let vertices = cols.checked_mul(cols)?;
    let indices = segments.checked_mul(segments)?.checked_mul(6)?;
    Some((vertices, indices))
}

/// Flat grid in the local XY plane, laid flat by a fixed rotation about X
///
/// Vertex data never changes after construction; all displacement happens in
/// the vertex shader.
pub struct SurfaceMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    segments: u32,
    rotation_x: f32,
}

impl SurfaceMesh {
    /// Plane of `width` x `height` units with `segments` subdivisions per side,
    /// rotated by `rotation_x` radians about X
    ///
    /// `segments` is clamped to `1..=MAX_SEGMENTS`.
    pub fn plane(width: f32, height: f32, segments: u32, rotation_x: f32) -> Self {
        let segments = segments.clamp(1, MAX_SEGMENTS);
        let (vertex_count, index_count) =
            mesh_counts(segments).unwrap_or_default();
        let half_width = width / 2.0;
        let half_height = height / 2.0;
        let cols = segments + 1;
        let segment_width = width / segments as f32;
        let segment_height = height / segments as f32;

        let mut vertices = Vec::with_capacity(vertex_count as usize);
        let mut indices = Vec::with_capacity(index_count as usize);

        // Rows run top (+Y) to bottom (-Y), columns left to right
        for iy in 0..cols {
            let y = iy as f32 * segment_height - half_height;
            for ix in 0..cols {
                let x = ix as f32 * segment_width - half_width;
                vertices.push(Vertex {
                    position: [x, -y, 0.0],
                    uv: [
                        ix as f32 / segments as f32,
                        1.0 - iy as f32 / segments as f32,
                    ],
                });
            }
        }

        // Counter-clockwise winding seen from +Z
        for iy in 0..segments {
            for ix in 0..segments {
                let a = ix + cols * iy;
                let b = ix + cols * (iy + 1);
                let c = (ix + 1) + cols * (iy + 1);
                let d = (ix + 1) + cols * iy;

                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self {
            vertices,
            indices,
            segments,
            rotation_x,
        }
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Object-to-world transform
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_x(self.rotation_x)
    }
}
