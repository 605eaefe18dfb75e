/// The game loop and its lifecycle.
///
/// `Game` owns the whole session: entity lists, both rasters, the spawn
/// timer and the scoreboard.  The host drives it by calling [`Game::frame`]
/// once per display refresh; a frame only runs while the loop is in
/// [`LoopState::Running`], which is the cooperative stop condition.
/// Everything is single threaded: pointer input is handled between frames
/// through [`Game::handle_pointer`].
use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::collision::{CollisionBuffer, IdColor};
use crate::compute::{impact_for_hit, spawn_flyer, spawn_interval};
use crate::config::GameConfig;
use crate::entities::{Bounds, Entity, Flyer, Impact, Layers};
use crate::raster::Raster;
use crate::scale::{compute_global_scale, to_surface_coordinates, BoundingBox, Viewport};
use crate::score::Scoreboard;
use crate::sprites::SpriteSheet;

/// Notifications from the core to the surrounding UI.
pub trait Shell {
    fn on_score_changed(&mut self, score: u32);
    fn on_game_over(&mut self, final_score: u32);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Paused,
    /// Terminal until `reset`.
    Over,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Schedule the next frame.
    Continue,
    /// The loop is not running; nothing happened.
    Stopped,
    /// A Flyer escaped during this frame; do not schedule again.
    GameOver,
}

pub struct Game {
    config: GameConfig,
    rng: StdRng,
    viewport: Viewport,
    surface_box: BoundingBox,
    scale: f64,
    visible: Raster,
    collision: CollisionBuffer,
    flyer_sheet: SpriteSheet,
    impact_sheet: SpriteSheet,
    flyers: Vec<Flyer>,
    impacts: Vec<Impact>,
    scoreboard: Scoreboard,
    state: LoopState,
    spawn_timer_ms: f64,
    last_timestamp_ms: f64,
    last_delta_ms: f64,
}

impl Game {
    pub fn new(config: GameConfig, viewport: Viewport) -> Self {
        Self::with_rng(config, viewport, StdRng::from_entropy())
    }

    pub fn with_rng(config: GameConfig, viewport: Viewport, rng: StdRng) -> Self {
        let flyer_sheet = SpriteSheet::pending(config.flyer_sprite.frames);
        let impact_sheet = SpriteSheet::pending(config.impact_sprite.frames);
        let (w, h) = viewport.buffer_size();
        let mut game = Game {
            rng,
            viewport,
            surface_box: BoundingBox {
                left: 0.0,
                top: 0.0,
                width: viewport.width,
                height: viewport.height,
            },
            scale: 1.0,
            visible: Raster::new(w, h, viewport.pixel_density),
            collision: CollisionBuffer::new(&viewport),
            flyer_sheet,
            impact_sheet,
            flyers: Vec::new(),
            impacts: Vec::new(),
            scoreboard: Scoreboard::default(),
            state: LoopState::Idle,
            spawn_timer_ms: 0.0,
            last_timestamp_ms: 0.0,
            last_delta_ms: 0.0,
            config,
        };
        game.scale = game.compute_scale();
        game
    }

    /// Install spritesheets.  Sheets that are not ready render as fallback shapes.
    pub fn set_sprites(&mut self, flyer_sheet: SpriteSheet, impact_sheet: SpriteSheet) {
        self.flyer_sheet = flyer_sheet;
        self.impact_sheet = impact_sheet;
    }

    fn compute_scale(&self) -> f64 {
        compute_global_scale(
            self.viewport.width,
            self.viewport.height,
            self.config.reference_width,
            self.config.reference_height,
            self.config.min_scale,
        )
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Begin (or, when paused, resume) the loop at timestamp `now_ms`.
    pub fn start(&mut self, now_ms: f64) {
        match self.state {
            LoopState::Idle => {
                self.last_timestamp_ms = now_ms;
                self.state = LoopState::Running;
                tracing::info!(scale = self.scale, "game started");
            }
            LoopState::Paused => self.resume(now_ms),
            LoopState::Running => {}
            LoopState::Over => tracing::warn!("start ignored: game is over, reset first"),
        }
    }

    pub fn pause(&mut self) {
        if self.state == LoopState::Running {
            self.state = LoopState::Paused;
            tracing::info!(score = self.scoreboard.score(), "game paused");
        }
    }

    /// Resume a paused loop.  The frame clock restarts at `now_ms` so the
    /// pause itself is not counted as elapsed game time.
    pub fn resume(&mut self, now_ms: f64) {
        if self.state == LoopState::Paused {
            self.last_timestamp_ms = now_ms;
            self.state = LoopState::Running;
            tracing::info!("game resumed");
        }
    }

    /// Back to `Idle` with an empty field and a zero score.
    pub fn reset(&mut self, shell: &mut dyn Shell) {
        self.flyers.clear();
        self.impacts.clear();
        self.scoreboard.reset();
        self.spawn_timer_ms = 0.0;
        self.last_timestamp_ms = 0.0;
        self.last_delta_ms = 0.0;
        self.visible.clear();
        self.collision.clear();
        self.state = LoopState::Idle;
        tracing::info!("game reset");
        shell.on_score_changed(0);
    }

    /// Adopt a new viewport.  Both rasters are rebuilt and the global scale
    /// recomputed; entities already on the field keep their size.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.surface_box.width = viewport.width;
        self.surface_box.height = viewport.height;
        let (w, h) = viewport.buffer_size();
        self.visible = Raster::new(w, h, viewport.pixel_density);
        self.collision = CollisionBuffer::new(&viewport);
        self.scale = self.compute_scale();
        tracing::debug!(w, h, scale = self.scale, "surface resized");
        if self.state != LoopState::Running {
            self.redraw();
        }
    }

    /// Place the surface's top-left corner in page space.
    pub fn set_surface_origin(&mut self, left: f64, top: f64) {
        self.surface_box.left = left;
        self.surface_box.top = top;
    }

    // ── Frame ────────────────────────────────────────────────────────────────

    pub fn frame(&mut self, now_ms: f64, shell: &mut dyn Shell) -> FrameOutcome {
        if self.state != LoopState::Running {
            return FrameOutcome::Stopped;
        }

        let delta = (now_ms - self.last_timestamp_ms).max(0.0);
        self.last_timestamp_ms = now_ms;
        self.last_delta_ms = delta;

        self.spawn_timer_ms += delta;
        if self.spawn_timer_ms > spawn_interval(&self.config, self.scale) {
            self.spawn_flyer();
            self.spawn_timer_ms = 0.0;
        }

        let bounds = Bounds {
            height: self.viewport.surface_height(),
            escape_threshold: self.config.escape_threshold,
        };
        for flyer in &mut self.flyers {
            flyer.update(delta, &bounds);
        }
        for impact in &mut self.impacts {
            impact.update(delta, &bounds);
        }

        self.redraw();

        let escaped = self.flyers.iter().any(|f| f.escaped);
        self.flyers.retain(|f| !f.is_removable());
        self.impacts.retain(|i| !i.is_removable());
        tracing::trace!(
            delta,
            flyers = self.flyers.len(),
            impacts = self.impacts.len(),
            "frame"
        );

        if escaped {
            self.state = LoopState::Over;
            if let Some(final_score) = self.scoreboard.latch_game_over() {
                tracing::info!(final_score, "game over");
                shell.on_game_over(final_score);
            }
            return FrameOutcome::GameOver;
        }
        FrameOutcome::Continue
    }

    /// Drive frames at the given timestamps until the loop stops or the
    /// timestamps run out.  Returns the last outcome.
    pub fn run_frames(
        &mut self,
        timestamps: impl IntoIterator<Item = f64>,
        shell: &mut dyn Shell,
    ) -> FrameOutcome {
        let mut outcome = FrameOutcome::Stopped;
        for now in timestamps {
            outcome = self.frame(now, shell);
            if outcome != FrameOutcome::Continue {
                break;
            }
        }
        outcome
    }

    /// Clear both rasters and repaint every live entity, smallest first.
    fn redraw(&mut self) {
        self.visible.clear();
        self.collision.clear();

        let mut live: Vec<&dyn Entity> = self
            .flyers
            .iter()
            .filter(|f| !f.removed)
            .map(|f| f as &dyn Entity)
            .chain(
                self.impacts
                    .iter()
                    .filter(|i| !i.removed)
                    .map(|i| i as &dyn Entity),
            )
            .collect();
        live.sort_by(|a, b| a.draw_size().total_cmp(&b.draw_size()));

        let mut layers = Layers {
            visible: &mut self.visible,
            collision: &mut self.collision,
            flyer_sheet: &self.flyer_sheet,
            impact_sheet: &self.impact_sheet,
        };
        for entity in live {
            entity.draw(&mut layers);
        }
    }

    /// Spawn one Flyer now, regardless of the spawn timer.
    pub fn spawn_flyer(&mut self) {
        let live: HashSet<IdColor> = self.flyers.iter().map(|f| f.color).collect();
        let flyer = spawn_flyer(
            &self.config,
            &mut self.rng,
            self.scale,
            self.viewport.surface_width(),
            self.viewport.surface_height(),
            &live,
        );
        tracing::debug!(
            x = flyer.x,
            y = flyer.y,
            width = flyer.width,
            color = ?flyer.color,
            "flyer spawned"
        );
        self.flyers.push(flyer);
        self.flyers.sort_by(|a, b| a.width.total_cmp(&b.width));
    }

    // ── Input ────────────────────────────────────────────────────────────────

    /// Resolve a pointer press at page position `(page_x, page_y)`.
    /// Returns `true` when a Flyer was hit.
    pub fn handle_pointer(&mut self, page_x: f64, page_y: f64, shell: &mut dyn Shell) -> bool {
        if self.state != LoopState::Running || !(page_x.is_finite() && page_y.is_finite()) {
            return false;
        }
        let (px, py) = to_surface_coordinates(
            page_x,
            page_y,
            &self.surface_box,
            self.viewport.pixel_density,
        );
        let Some(index) = self.collision.lookup(px, py, &self.flyers) else {
            return false;
        };
        let Some(score) = self.scoreboard.record_hit() else {
            return false;
        };
        let flyer = &mut self.flyers[index];
        flyer.removed = true;
        let impact = impact_for_hit(&self.config, flyer, self.scale);
        tracing::debug!(px, py, score, color = ?flyer.color, "flyer hit");
        self.impacts.push(impact);
        shell.on_score_changed(score);
        true
    }

    /// Touch input: only the first touch point counts; no touch is a no-op.
    pub fn handle_touch(&mut self, touches: &[(f64, f64)], shell: &mut dyn Shell) -> bool {
        match touches.first() {
            Some(&(x, y)) => self.handle_pointer(x, y, shell),
            None => false,
        }
    }

    // ── Read access ──────────────────────────────────────────────────────────

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.scoreboard.score()
    }

    pub fn is_over(&self) -> bool {
        self.scoreboard.is_over()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn surface_box(&self) -> &BoundingBox {
        &self.surface_box
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn flyers(&self) -> &[Flyer] {
        &self.flyers
    }

    /// Direct access to the live Flyers, for debugging and scripted scenarios.
    #[doc(hidden)]
    pub fn flyers_mut(&mut self) -> &mut Vec<Flyer> {
        &mut self.flyers
    }

    pub fn impacts(&self) -> &[Impact] {
        &self.impacts
    }

    pub fn visible(&self) -> &Raster {
        &self.visible
    }

    pub fn collision(&self) -> &CollisionBuffer {
        &self.collision
    }

    pub fn spawn_timer_ms(&self) -> f64 {
        self.spawn_timer_ms
    }

    /// Elapsed time the most recent frame advanced the game by.
    pub fn last_delta_ms(&self) -> f64 {
        self.last_delta_ms
    }
}
