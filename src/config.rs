/// Tunable game constants.
///
/// Every field defaults to the value the game was balanced with, so a TOML
/// file only needs to list what it overrides.
use std::ops::Range;
use std::path::Path;

use serde::Deserialize;

use crate::error::{GameError, Result};

/// A half-open `[min, max)` range sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Span { min, max }
    }

    pub fn range(&self) -> Range<f64> {
        self.min..self.max
    }

    fn check(&self, name: &str) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min >= self.max {
            return Err(GameError::InvalidConfig(format!(
                "{name}: range [{}, {}) is empty",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Dimensions of one frame of a horizontal-strip spritesheet plus its frame count.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct SpriteFrame {
    pub width: f64,
    pub height: f64,
    pub frames: u32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Viewport scaling ─────────────────────────────────────────────────────
    pub reference_width: f64,
    pub reference_height: f64,
    /// Lower clamp of the global scale so targets stay clickable on tiny screens.
    pub min_scale: f64,

    // ── Spawning ─────────────────────────────────────────────────────────────
    pub spawn_interval_ms: f64,
    /// Effective interval = base / (spawn_divisor_base + spawn_divisor_per_scale × scale).
    pub spawn_divisor_base: f64,
    pub spawn_divisor_per_scale: f64,
    /// Flyers appear up to this many units beyond the right edge.
    pub spawn_jitter: f64,

    // ── Flyer ────────────────────────────────────────────────────────────────
    pub flyer_sprite: SpriteFrame,
    pub flyer_size: Span,
    pub flyer_base_speed: Span,
    pub flyer_extra_speed: Span,
    pub flyer_vertical_speed: Span,
    pub flap_interval_ms: Span,
    /// Game over once a Flyer's right edge drops below this x.
    pub escape_threshold: f64,

    // ── Impact ───────────────────────────────────────────────────────────────
    pub impact_sprite: SpriteFrame,
    pub impact_frame_interval_ms: f64,
    pub impact_size_ratio: f64,
    pub impact_min_size: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            reference_width: 1200.0,
            reference_height: 800.0,
            min_scale: 0.48,
            spawn_interval_ms: 650.0,
            spawn_divisor_base: 0.9,
            spawn_divisor_per_scale: 0.6,
            spawn_jitter: 80.0,
            flyer_sprite: SpriteFrame { width: 271.0, height: 194.0, frames: 5 },
            flyer_size: Span::new(0.33, 0.73),
            flyer_base_speed: Span::new(2.5, 5.5),
            flyer_extra_speed: Span::new(0.0, 2.0),
            flyer_vertical_speed: Span::new(-1.0, 1.0),
            flap_interval_ms: Span::new(60.0, 180.0),
            escape_threshold: -50.0,
            impact_sprite: SpriteFrame { width: 200.0, height: 179.0, frames: 6 },
            impact_frame_interval_ms: 80.0,
            impact_size_ratio: 0.65,
            impact_min_size: 32.0,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("reference_width", self.reference_width),
            ("reference_height", self.reference_height),
            ("spawn_interval_ms", self.spawn_interval_ms),
            ("flyer_sprite.width", self.flyer_sprite.width),
            ("flyer_sprite.height", self.flyer_sprite.height),
            ("impact_sprite.width", self.impact_sprite.width),
            ("impact_sprite.height", self.impact_sprite.height),
            ("impact_frame_interval_ms", self.impact_frame_interval_ms),
            ("impact_size_ratio", self.impact_size_ratio),
            ("impact_min_size", self.impact_min_size),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(GameError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !(self.min_scale > 0.0 && self.min_scale <= 1.0) {
            return Err(GameError::InvalidConfig(format!(
                "min_scale must lie in (0, 1], got {}",
                self.min_scale
            )));
        }
        if self.flyer_sprite.frames == 0 || self.impact_sprite.frames == 0 {
            return Err(GameError::InvalidConfig(
                "sprite frame counts must be at least 1".to_string(),
            ));
        }
        if self.spawn_divisor_base + self.spawn_divisor_per_scale * self.min_scale <= 0.0 {
            return Err(GameError::InvalidConfig(
                "spawn divisor must stay positive".to_string(),
            ));
        }
        if self.flyer_size.min <= 0.0 {
            return Err(GameError::InvalidConfig(
                "flyer_size must be strictly positive".to_string(),
            ));
        }
        self.flyer_size.check("flyer_size")?;
        self.flyer_base_speed.check("flyer_base_speed")?;
        self.flyer_extra_speed.check("flyer_extra_speed")?;
        self.flyer_vertical_speed.check("flyer_vertical_speed")?;
        self.flap_interval_ms.check("flap_interval_ms")?;
        if self.spawn_jitter < 0.0 {
            return Err(GameError::InvalidConfig(
                "spawn_jitter must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
