/// Spritesheet resources: a horizontal strip of equally sized frames.
///
/// A sheet may be "not ready" (still loading, or failed to load); drawing
/// code checks `is_ready` and falls back to a primitive shape.
use std::path::Path;

use crate::error::Result;
use crate::raster::Rgba;

#[derive(Clone, Debug)]
pub struct SpriteSheet {
    frames: u32,
    frame_width: u32,
    frame_height: u32,
    strip_width: u32,
    /// RGBA8888, row-major over the whole strip.  `None` until loaded.
    pixels: Option<Vec<u8>>,
}

impl SpriteSheet {
    /// A sheet whose image has not arrived yet.
    pub fn pending(frames: u32) -> Self {
        SpriteSheet {
            frames,
            frame_width: 0,
            frame_height: 0,
            strip_width: 0,
            pixels: None,
        }
    }

    /// Build a sheet from raw RGBA bytes of the full `strip_width × height` strip.
    /// Returns a pending sheet if the buffer does not match the dimensions.
    pub fn from_rgba(frames: u32, strip_width: u32, height: u32, pixels: Vec<u8>) -> Self {
        let expected = strip_width as usize * height as usize * 4;
        if frames == 0 || strip_width < frames || height == 0 || pixels.len() != expected {
            tracing::warn!(
                frames,
                strip_width,
                height,
                bytes = pixels.len(),
                "spritesheet dimensions do not match pixel data"
            );
            return Self::pending(frames);
        }
        SpriteSheet {
            frames,
            frame_width: strip_width / frames,
            frame_height: height,
            strip_width,
            pixels: Some(pixels),
        }
    }

    /// Decode an image file into a sheet of `frames` frames.
    pub fn load(path: &Path, frames: u32) -> Result<Self> {
        let img = image::open(path)?.to_rgba8();
        let (w, h) = img.dimensions();
        tracing::debug!(path = %path.display(), w, h, frames, "loaded spritesheet");
        Ok(Self::from_rgba(frames, w, h, img.into_raw()))
    }

    pub fn is_ready(&self) -> bool {
        self.pixels.is_some()
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn frame_width(&self) -> u32 {
        self.frame_width
    }

    pub fn frame_height(&self) -> u32 {
        self.frame_height
    }

    /// Texel `(u, v)` of frame `frame`; `None` outside the frame or when not ready.
    pub fn sample(&self, frame: u32, u: i64, v: i64) -> Option<Rgba> {
        let pixels = self.pixels.as_ref()?;
        if frame >= self.frames
            || u < 0
            || v < 0
            || u >= self.frame_width as i64
            || v >= self.frame_height as i64
        {
            return None;
        }
        let strip_width = self.strip_width as usize;
        let x = frame as usize * self.frame_width as usize + u as usize;
        let i = (v as usize * strip_width + x) * 4;
        Some(Rgba {
            r: pixels[i],
            g: pixels[i + 1],
            b: pixels[i + 2],
            a: pixels[i + 3],
        })
    }
}
