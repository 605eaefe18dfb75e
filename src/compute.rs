/// Pure game-logic functions.
///
/// Entity construction and spawn pacing.  Nothing here touches the session;
/// all randomness comes through the injected RNG so callers control
/// determinism (tests use a seeded RNG).
use std::collections::HashSet;

use rand::Rng;

use crate::collision::{assign_unique_color, IdColor};
use crate::config::GameConfig;
use crate::entities::{Flyer, Impact};

// ── Spawn pacing ─────────────────────────────────────────────────────────────

/// Effective spawn interval in ms.  Smaller scales spawn slightly less often.
pub fn spawn_interval(config: &GameConfig, scale: f64) -> f64 {
    config.spawn_interval_ms / (config.spawn_divisor_base + config.spawn_divisor_per_scale * scale)
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Create a Flyer just past the right edge of a `surface_width × surface_height`
/// field, with a colour distinct from every colour in `live_colors`.
pub fn spawn_flyer(
    config: &GameConfig,
    rng: &mut impl Rng,
    scale: f64,
    surface_width: f64,
    surface_height: f64,
    live_colors: &HashSet<IdColor>,
) -> Flyer {
    let size_modifier = rng.gen_range(config.flyer_size.range()) * scale;
    let width = config.flyer_sprite.width * size_modifier;
    let height = config.flyer_sprite.height * size_modifier;

    let jitter = if config.spawn_jitter > 0.0 {
        rng.gen_range(0.0..config.spawn_jitter)
    } else {
        0.0
    };
    let x = surface_width + jitter;
    let y = rng.gen::<f64>() * (surface_height - height).max(0.0);

    // Smaller flyers move a bit faster.
    let base = rng.gen_range(config.flyer_base_speed.range());
    let extra = rng.gen_range(config.flyer_extra_speed.range());
    let speed_x = (base + extra) * (1.0 + (1.0 - size_modifier));
    let speed_y = rng.gen_range(config.flyer_vertical_speed.range());

    Flyer {
        x,
        y,
        width,
        height,
        speed_x,
        speed_y,
        frame: 0,
        max_frame: config.flyer_sprite.frames.saturating_sub(1),
        since_flap_ms: 0.0,
        flap_interval_ms: rng.gen_range(config.flap_interval_ms.range()),
        color: assign_unique_color(rng, live_colors),
        removed: false,
        escaped: false,
    }
}

/// Explosion centred on a hit Flyer, sized from its larger side and the
/// global scale at the moment of the hit.
pub fn impact_for_hit(config: &GameConfig, flyer: &Flyer, scale: f64) -> Impact {
    let basis = flyer.width.max(flyer.height);
    let size = (basis * config.impact_size_ratio * scale).max(config.impact_min_size);
    let (cx, cy) = flyer.center();
    Impact {
        x: cx - size / 2.0,
        y: cy - size / 2.0,
        size,
        frame: 0,
        last_frame: config.impact_sprite.frames.saturating_sub(1),
        since_frame_ms: 0.0,
        frame_interval_ms: config.impact_frame_interval_ms,
        removed: false,
    }
}
