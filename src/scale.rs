/// Coordinate and scale mapping between page space, the surface's logical
/// (CSS-like) units and the rasters' device pixels.

/// The on-screen bounding box of the playfield, in page units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Logical size of the playfield plus the device pixel density used to
/// size its rasters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_density: f64,
}

impl Viewport {
    /// A non-finite or non-positive density falls back to 1.
    pub fn new(width: f64, height: f64, pixel_density: f64) -> Self {
        let pixel_density = if pixel_density.is_finite() && pixel_density > 0.0 {
            pixel_density
        } else {
            1.0
        };
        Viewport {
            width: width.max(0.0),
            height: height.max(0.0),
            pixel_density,
        }
    }

    /// Raster size in device pixels: `floor(logical × density)` per axis.
    pub fn buffer_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_density).floor() as u32,
            (self.height * self.pixel_density).floor() as u32,
        )
    }

    /// Logical height as seen through the raster, i.e. the buffer height
    /// divided back by the density.  Entities bounce inside this.
    pub fn surface_height(&self) -> f64 {
        self.buffer_size().1 as f64 / self.pixel_density
    }

    pub fn surface_width(&self) -> f64 {
        self.buffer_size().0 as f64 / self.pixel_density
    }
}

/// Map a pointer position in page space to a pixel of the Collision Buffer.
///
/// Mouse and touch input go through this same function; for touch, callers
/// pass the first touch point.
pub fn to_surface_coordinates(
    pointer_x: f64,
    pointer_y: f64,
    surface: &BoundingBox,
    pixel_density: f64,
) -> (i64, i64) {
    let local_x = pointer_x - surface.left;
    let local_y = pointer_y - surface.top;
    (
        (local_x * pixel_density).floor() as i64,
        (local_y * pixel_density).floor() as i64,
    )
}

/// `clamp(min(vw / ref_w, vh / ref_h, 1), lower_bound, 1)`.
pub fn compute_global_scale(
    viewport_width: f64,
    viewport_height: f64,
    reference_width: f64,
    reference_height: f64,
    lower_bound: f64,
) -> f64 {
    let sx = viewport_width / reference_width;
    let sy = viewport_height / reference_height;
    let scale = sx.min(sy).min(1.0);
    if scale.is_nan() {
        return 1.0;
    }
    scale.max(lower_bound).min(1.0)
}
