//! Window and render-target configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Initial window width (logical pixels)
    pub window_width: u32,

    /// Initial window height (logical pixels)
    pub window_height: u32,

    /// Upper bound on the device pixel ratio used for the drawing buffer
    /// (bounds GPU memory on high-density displays)
    pub max_pixel_ratio: f64,

    /// Background clear color (linear RGB)
    pub clear_color: [f64; 3],

    /// Debug panel width (logical pixels)
    pub panel_width: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 600,
            max_pixel_ratio: 2.0,
            clear_color: [0.0, 0.0, 0.0],
            panel_width: 340.0,
        }
    }
}
