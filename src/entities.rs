/// Game entities: the Flyer (moving target) and the Impact (explosion at a
/// hit).  Both implement [`Entity`], the update/draw capability the
/// scheduler drives every frame.
use crate::collision::{CollisionBuffer, IdColor};
use crate::raster::{Raster, Rgba};
use crate::sprites::SpriteSheet;

const FLYER_FALLBACK: Rgba = Rgba::opaque(0x44, 0x44, 0x44);
const IMPACT_FALLBACK: Rgba = Rgba::opaque(0xff, 0xa5, 0x00);

/// Playfield limits an entity needs while updating.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Logical height of the surface.
    pub height: f64,
    /// A Flyer whose right edge drops below this x has escaped.
    pub escape_threshold: f64,
}

/// Everything an entity may draw on during one frame.
pub struct Layers<'a> {
    pub visible: &'a mut Raster,
    pub collision: &'a mut CollisionBuffer,
    pub flyer_sheet: &'a SpriteSheet,
    pub impact_sheet: &'a SpriteSheet,
}

pub trait Entity {
    /// Advance timers, animation and position by `delta_ms`.
    fn update(&mut self, delta_ms: f64, bounds: &Bounds);
    fn draw(&self, layers: &mut Layers<'_>);
    fn is_removable(&self) -> bool;
    /// Sort key for draw order; smaller entities are drawn first.
    fn draw_size(&self) -> f64;
}

// ── Flyer ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Flyer {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Units moved left per update.
    pub speed_x: f64,
    /// Units moved up per update; negated on bouncing off a vertical bound.
    pub speed_y: f64,
    pub frame: u32,
    pub max_frame: u32,
    pub since_flap_ms: f64,
    pub flap_interval_ms: f64,
    pub color: IdColor,
    /// Marked for removal (hit, or escaped).
    pub removed: bool,
    /// Left the field past the escape threshold; ends the game.
    pub escaped: bool,
}

impl Flyer {
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right_edge(&self) -> f64 {
        self.x + self.width
    }
}

impl Entity for Flyer {
    fn update(&mut self, delta_ms: f64, bounds: &Bounds) {
        self.x -= self.speed_x;

        let max_y = (bounds.height - self.height).max(0.0);
        let y = self.y - self.speed_y;
        if y < 0.0 {
            self.y = 0.0;
            self.speed_y = -self.speed_y;
        } else if y > max_y {
            self.y = max_y;
            self.speed_y = -self.speed_y;
        } else {
            self.y = y;
        }

        self.since_flap_ms += delta_ms;
        if self.since_flap_ms > self.flap_interval_ms {
            self.frame = (self.frame + 1) % (self.max_frame + 1);
            self.since_flap_ms = 0.0;
        }

        if !self.removed && self.right_edge() < bounds.escape_threshold {
            self.removed = true;
            self.escaped = true;
        }
    }

    fn draw(&self, layers: &mut Layers<'_>) {
        layers.collision.paint(self);
        let drawn = layers.visible.draw_frame(
            layers.flyer_sheet,
            self.frame,
            self.x,
            self.y,
            self.width,
            self.height,
        );
        if !drawn {
            layers
                .visible
                .fill_rect(self.x, self.y, self.width, self.height, FLYER_FALLBACK);
        }
    }

    fn is_removable(&self) -> bool {
        self.removed
    }

    fn draw_size(&self) -> f64 {
        self.width
    }
}

// ── Impact ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Impact {
    pub x: f64,
    pub y: f64,
    /// Side length of the square the explosion is drawn in.
    pub size: f64,
    pub frame: u32,
    /// Index of the final animation frame.
    pub last_frame: u32,
    pub since_frame_ms: f64,
    pub frame_interval_ms: f64,
    pub removed: bool,
}

impl Entity for Impact {
    fn update(&mut self, delta_ms: f64, _bounds: &Bounds) {
        self.since_frame_ms += delta_ms;
        if self.since_frame_ms >= self.frame_interval_ms {
            self.frame += 1;
            self.since_frame_ms = 0.0;
            if self.frame > self.last_frame {
                self.removed = true;
            }
        }
    }

    fn draw(&self, layers: &mut Layers<'_>) {
        let drawn = layers.visible.draw_frame(
            layers.impact_sheet,
            self.frame,
            self.x,
            self.y,
            self.size,
            self.size,
        );
        if !drawn {
            let r = self.size / 2.0;
            layers
                .visible
                .fill_circle(self.x + r, self.y + r, r, IMPACT_FALLBACK);
        }
    }

    fn is_removable(&self) -> bool {
        self.removed
    }

    fn draw_size(&self) -> f64 {
        self.size
    }
}
