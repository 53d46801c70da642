//! Viewport state shared by the camera and the render target.

use crate::camera::PerspectiveCamera;

/// Current window size and the pixel density used for the drawing buffer
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    device_pixel_ratio: f64,
    pixel_ratio: f64,
    max_pixel_ratio: f64,
    native_size: Option<(u32, u32)>,
}

impl Viewport {
    /// `width`/`height` in logical pixels
    pub fn new(width: u32, height: u32, device_pixel_ratio: f64, max_pixel_ratio: f64) -> Self {
        let device_pixel_ratio = sanitize_ratio(device_pixel_ratio);
        Self {
            width: width.max(1),
            height: height.max(1),
            device_pixel_ratio,
            pixel_ratio: device_pixel_ratio.min(max_pixel_ratio),
            max_pixel_ratio,
            native_size: None,
        }
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Device pixel ratio after clamping to the configured maximum
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Width over height of the area actually drawn
    ///
    /// Taken from the physical size when one is known, so rounding the
    /// logical size cannot skew the projection.
    pub fn aspect(&self) -> f32 {
        let (width, height) = self.native_size.unwrap_or((self.width, self.height));
        width as f32 / height as f32
    }

    /// Respond to a resize: update camera aspect, mark its projection dirty
    /// and record the new size and clamped pixel ratio
    ///
    /// Returns `false` (and touches nothing) when the size and ratio are
    /// unchanged or either dimension is zero.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        device_pixel_ratio: f64,
        camera: &mut PerspectiveCamera,
    ) -> bool {
        self.update(width, height, device_pixel_ratio, None, camera)
    }

    /// Resize from a window's physical size and scale factor
    ///
    /// The physical size is remembered so the drawing buffer matches the
    /// window exactly whenever the ratio is not clamped.
    pub fn resize_native(
        &mut self,
        physical_width: u32,
        physical_height: u32,
        scale_factor: f64,
        camera: &mut PerspectiveCamera,
    ) -> bool {
        if physical_width == 0 || physical_height == 0 {
            return false;
        }
        let scale = sanitize_ratio(scale_factor);
        let width = ((physical_width as f64 / scale).round() as u32).max(1);
        let height = ((physical_height as f64 / scale).round() as u32).max(1);

        let native = Some((physical_width, physical_height));
        self.update(width, height, scale, native, camera)
    }

    fn update(
        &mut self,
        width: u32,
        height: u32,
        device_pixel_ratio: f64,
        native_size: Option<(u32, u32)>,
        camera: &mut PerspectiveCamera,
    ) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        let device_pixel_ratio = sanitize_ratio(device_pixel_ratio);
        if (width, height) == self.size()
            && device_pixel_ratio == self.device_pixel_ratio
            && native_size == self.native_size
        {
            return false;
        }

        self.width = width;
        self.height = height;
        self.device_pixel_ratio = device_pixel_ratio;
        self.pixel_ratio = device_pixel_ratio.min(self.max_pixel_ratio);
        self.native_size = native_size;

        camera.set_aspect(self.aspect());
        camera.mark_projection_dirty();
        true
    }

    /// Render-target size in physical pixels
    ///
    /// Above the ratio cap this is smaller than the window's physical size
    /// and the platform stretches the surface to fit. A swapchain whose
    /// extent is fixed to the window would clip instead; none of the
    /// desktop backends wgpu targets do that.
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        match self.native_size {
            Some(native) if self.pixel_ratio == self.device_pixel_ratio => native,
            _ => (
                ((self.width as f64 * self.pixel_ratio).round() as u32).max(1),
                ((self.height as f64 * self.pixel_ratio).round() as u32).max(1),
            ),
        }
    }
}

/// NaN and non-positive ratios fall back to 1; infinity is kept so the
/// clamp maps it to the cap
fn sanitize_ratio(ratio: f64) -> f64 {
    if ratio > 0.0 {
        ratio
    } else {
        1.0
    }
}
