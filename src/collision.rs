/// The Collision Buffer: an off-screen raster on which every live Flyer is
/// painted as a solid block in its own identifying colour.  A pointer hit is
/// resolved by reading back one pixel and matching its colour.
use std::collections::HashSet;

use rand::Rng;

use crate::entities::Flyer;
use crate::raster::{Raster, Rgba};
use crate::scale::Viewport;

/// Identifying colour of a Flyer.  Channels are drawn from `1..=254`, and the
/// buffer always paints it fully opaque, so it can never be mistaken for the
/// transparent background.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IdColor(pub [u8; 3]);

impl IdColor {
    pub fn rgba(&self) -> Rgba {
        let [r, g, b] = self.0;
        Rgba::opaque(r, g, b)
    }
}

/// Give up re-rolling after this many collisions and accept the last draw.
const MAX_REROLLS: usize = 64;

/// Draw a colour not already used by a live Flyer.
pub fn assign_unique_color(rng: &mut impl Rng, existing: &HashSet<IdColor>) -> IdColor {
    let mut color = random_color(rng);
    for _ in 0..MAX_REROLLS {
        if !existing.contains(&color) {
            return color;
        }
        tracing::trace!(?color, "identifying colour already live, re-rolling");
        color = random_color(rng);
    }
    color
}

fn random_color(rng: &mut impl Rng) -> IdColor {
    IdColor([
        rng.gen_range(1..=254),
        rng.gen_range(1..=254),
        rng.gen_range(1..=254),
    ])
}

pub struct CollisionBuffer {
    raster: Raster,
}

impl CollisionBuffer {
    pub fn new(viewport: &Viewport) -> Self {
        let (w, h) = viewport.buffer_size();
        CollisionBuffer {
            raster: Raster::new(w, h, viewport.pixel_density),
        }
    }

    pub fn clear(&mut self) {
        self.raster.clear();
    }

    /// Paint the Flyer's bounding rectangle in its identifying colour,
    /// covering partially touched edge pixels too.
    pub fn paint(&mut self, flyer: &Flyer) {
        self.raster
            .fill_rect_covering(flyer.x, flyer.y, flyer.width, flyer.height, flyer.color.rgba());
    }

    /// Index of the Flyer whose colour sits at device pixel `(px, py)`.
    ///
    /// Transparent and out-of-bounds pixels resolve to `None`.  Flyers
    /// already marked for removal are skipped so one Flyer is never hit twice.
    pub fn lookup(&self, px: i64, py: i64, flyers: &[Flyer]) -> Option<usize> {
        let pixel = self.raster.pixel(px, py)?;
        if pixel.a == 0 {
            return None;
        }
        let rgb = [pixel.r, pixel.g, pixel.b];
        flyers
            .iter()
            .position(|f| !f.removed && f.color.0 == rgb)
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }
}
