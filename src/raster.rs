/// RGBA8888 software raster.
///
/// Both the visible surface and the Collision Buffer are rasters.  Drawing
/// calls take logical coordinates and multiply them by the raster's pixel
/// density, the way a HiDPI canvas with a scaling transform would.
/// Rectangles are never anti-aliased: every pixel is either fully painted
/// or untouched, which keeps identifying colours exact.
use crate::sprites::SpriteSheet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba { r: 0, g: 0, b: 0, a: 0 };

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 255 }
    }
}

/// Alpha blend a single colour channel.
#[inline]
fn blend_channel(src: u8, dst: u8, alpha: u16) -> u8 {
    let result = src as u16 * alpha + dst as u16 * (255 - alpha);
    ((result + 1 + (result >> 8)) >> 8) as u8
}

pub struct Raster {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    density: f64,
}

impl Raster {
    pub fn new(width: u32, height: u32, density: f64) -> Self {
        Raster {
            pixels: vec![0; width as usize * height as usize * 4],
            width,
            height,
            density,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    /// Reset every pixel to fully transparent.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Read one device pixel.  Out-of-bounds reads yield `None`.
    pub fn pixel(&self, px: i64, py: i64) -> Option<Rgba> {
        if px < 0 || py < 0 || px >= self.width as i64 || py >= self.height as i64 {
            return None;
        }
        let i = (py as usize * self.width as usize + px as usize) * 4;
        Some(Rgba {
            r: self.pixels[i],
            g: self.pixels[i + 1],
            b: self.pixels[i + 2],
            a: self.pixels[i + 3],
        })
    }

    fn put(&mut self, px: u32, py: u32, color: Rgba) {
        let i = (py as usize * self.width as usize + px as usize) * 4;
        self.pixels[i] = color.r;
        self.pixels[i + 1] = color.g;
        self.pixels[i + 2] = color.b;
        self.pixels[i + 3] = color.a;
    }

    fn blend(&mut self, px: u32, py: u32, color: Rgba) {
        match color.a {
            0 => {}
            255 => self.put(px, py, color),
            a => {
                let i = (py as usize * self.width as usize + px as usize) * 4;
                let alpha = a as u16;
                let dst_a = self.pixels[i + 3];
                self.pixels[i] = blend_channel(color.r, self.pixels[i], alpha);
                self.pixels[i + 1] = blend_channel(color.g, self.pixels[i + 1], alpha);
                self.pixels[i + 2] = blend_channel(color.b, self.pixels[i + 2], alpha);
                self.pixels[i + 3] = dst_a.max(a);
            }
        }
    }

    /// Device-pixel span `[start, end)` covered by the logical span
    /// `[pos, pos + len)`, clipped to `0..limit`.
    fn span(&self, pos: f64, len: f64, limit: u32) -> (u32, u32) {
        let start = (pos * self.density).round();
        let end = ((pos + len) * self.density).round();
        let clip = |v: f64| v.max(0.0).min(limit as f64) as u32;
        (clip(start), clip(end))
    }

    /// Device-pixel span `[floor, ceil)` touched by the logical span, clipped.
    fn covering_span(&self, pos: f64, len: f64, limit: u32) -> (u32, u32) {
        let start = (pos * self.density).floor();
        let end = ((pos + len) * self.density).ceil();
        let clip = |v: f64| v.max(0.0).min(limit as f64) as u32;
        (clip(start), clip(end))
    }

    /// Fill every device pixel the logical rectangle touches, so any point
    /// inside it maps (by flooring) onto a painted pixel.
    pub fn fill_rect_covering(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba) {
        let (x0, x1) = self.covering_span(x, w, self.width);
        let (y0, y1) = self.covering_span(y, h, self.height);
        for py in y0..y1 {
            for px in x0..x1 {
                self.put(px, py, color);
            }
        }
    }

    /// Fill an axis-aligned rectangle given in logical units.
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba) {
        let (x0, x1) = self.span(x, w, self.width);
        let (y0, y1) = self.span(y, h, self.height);
        for py in y0..y1 {
            for px in x0..x1 {
                self.put(px, py, color);
            }
        }
    }

    /// Fill a circle given by its logical centre and radius.
    pub fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgba) {
        let (x0, x1) = self.span(cx - radius, radius * 2.0, self.width);
        let (y0, y1) = self.span(cy - radius, radius * 2.0, self.height);
        let r = radius * self.density;
        let (dcx, dcy) = (cx * self.density, cy * self.density);
        for py in y0..y1 {
            for px in x0..x1 {
                let dx = px as f64 + 0.5 - dcx;
                let dy = py as f64 + 0.5 - dcy;
                if dx * dx + dy * dy <= r * r {
                    self.put(px, py, color);
                }
            }
        }
    }

    /// Draw frame `frame` of a horizontal-strip spritesheet stretched over the
    /// logical rectangle, nearest-neighbour sampled and alpha blended.
    /// Returns `false` (drawing nothing) when the sheet is not ready.
    pub fn draw_frame(
        &mut self,
        sheet: &SpriteSheet,
        frame: u32,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    ) -> bool {
        if !sheet.is_ready() {
            return false;
        }
        let (x0, x1) = self.span(x, w, self.width);
        let (y0, y1) = self.span(y, h, self.height);
        let (dest_x, dest_y) = (x * self.density, y * self.density);
        let (dest_w, dest_h) = (w * self.density, h * self.density);
        if dest_w <= 0.0 || dest_h <= 0.0 {
            return true;
        }
        let (fw, fh) = (sheet.frame_width() as f64, sheet.frame_height() as f64);
        for py in y0..y1 {
            let v = ((py as f64 + 0.5 - dest_y) / dest_h * fh).floor();
            for px in x0..x1 {
                let u = ((px as f64 + 0.5 - dest_x) / dest_w * fw).floor();
                if let Some(color) = sheet.sample(frame, u as i64, v as i64) {
                    self.blend(px, py, color);
                }
            }
        }
        true
    }
}
