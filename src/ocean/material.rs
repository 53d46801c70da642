//! Wave material: uniform inputs plus render-state flags.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::uniforms::UniformSet;

/// Which faces of the surface are rasterized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

impl Side {
    pub const ALL: [Side; 3] = [Side::Front, Side::Back, Side::Double];

    /// Faces the pipeline must discard to show this side
    pub fn cull_mode(self) -> Option<wgpu::Face> {
        match self {
            Side::Front => Some(wgpu::Face::Back),
            Side::Back => Some(wgpu::Face::Front),
            Side::Double => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::Front => 0,
            Side::Back => 1,
            Side::Double => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Front => "front",
            Side::Back => "back",
            Side::Double => "double",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shader inputs and render state for the wave mesh
#[derive(Debug, Clone)]
pub struct WaveMaterial {
    pub uniforms: UniformSet,
    pub side: Side,
}

impl WaveMaterial {
    pub fn new(uniforms: UniformSet) -> Self {
        Self {
            uniforms,
            side: Side::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_cull_modes() {
        assert_eq!(Side::Front.cull_mode(), Some(wgpu::Face::Back));
        assert_eq!(Side::Back.cull_mode(), Some(wgpu::Face::Front));
        assert_eq!(Side::Double.cull_mode(), None);
    }

    #[test]
    fn test_side_indices_are_distinct() {
        let mut seen = [false; 3];
        for side in Side::ALL {
            assert!(!seen[side.index()]);
            seen[side.index()] = true;
        }
        assert_eq!(Side::default(), Side::Front);
    }
}
