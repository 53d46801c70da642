//! Camera placement and orbit-control tuning.

/// Perspective camera defaults
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (plane units)
    pub near_plane: f32,

    /// Far clipping plane (plane units)
    pub far_plane: f32,

    /// Starting eye position
    pub position: [f32; 3],

    /// Starting look-at target
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near_plane: 0.1,
            far_plane: 100.0,
            position: [1.0, 1.0, 1.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

/// Orbit controller tuning
#[derive(Debug, Clone)]
pub struct OrbitConfig {
    /// Smooth rotation/pan over several frames instead of applying input at once
    pub enable_damping: bool,

    /// Fraction of the pending motion applied per update (0..1)
    pub damping_factor: f32,

    /// Full turn per viewport height of drag, times this
    pub rotate_speed: f32,

    /// Exponent on the per-notch dolly scale
    pub zoom_speed: f32,

    pub pan_speed: f32,

    /// Closest allowed eye distance to target
    pub min_distance: f32,

    /// Farthest allowed eye distance to target
    pub max_distance: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
        }
    }
}
