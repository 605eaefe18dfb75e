mod display;

use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use crow_shooter::config::GameConfig;
use crow_shooter::game::{FrameOutcome, Game, LoopState, Shell};
use crow_shooter::scale::Viewport;
use crow_shooter::sprites::SpriteSheet;

use display::{BOTTOM_ROWS, CELL_H, CELL_W, TOP_ROWS};

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

#[derive(Parser, Debug)]
#[command(name = "crow_shooter", about = "Shoot the crows before they escape")]
struct Args {
    /// TOML file overriding the default game constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Flyer spritesheet (PNG, horizontal strip)
    #[arg(long)]
    flyer_sprite: Option<PathBuf>,

    /// Impact spritesheet (PNG, horizontal strip)
    #[arg(long)]
    impact_sprite: Option<PathBuf>,

    /// Raster pixels per logical pixel
    #[arg(long, default_value_t = 1.0)]
    pixel_density: f64,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Write tracing output to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Shell side of the core interface ──────────────────────────────────────────

/// Receives score and game-over notifications; the HUD and the results
/// screen show exactly what was delivered here.
#[derive(Default)]
struct TerminalShell {
    score: u32,
    final_score: Option<u32>,
}

impl Shell for TerminalShell {
    fn on_score_changed(&mut self, score: u32) {
        tracing::debug!(score, "score changed");
        self.score = score;
        if score == 0 {
            self.final_score = None;
        }
    }

    fn on_game_over(&mut self, final_score: u32) {
        self.final_score = Some(final_score);
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

fn viewport_for(cols: u16, rows: u16, density: f64) -> Viewport {
    let field_rows = rows.saturating_sub(TOP_ROWS + BOTTOM_ROWS);
    Viewport::new(cols as f64 * CELL_W, field_rows as f64 * CELL_H, density)
}

/// Page position of a cell's centre.
fn cell_center(column: u16, row: u16) -> (f64, f64) {
    (
        column as f64 * CELL_W + CELL_W / 2.0,
        row as f64 * CELL_H + CELL_H / 2.0,
    )
}

fn load_sheet(path: Option<&Path>, frames: u32) -> SpriteSheet {
    match path {
        Some(path) => SpriteSheet::load(path, frames).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), %err, "spritesheet unavailable, using fallback shapes");
            SpriteSheet::pending(frames)
        }),
        None => SpriteSheet::pending(frames),
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuResult> {
    let (width, height) = terminal::size()?;
    display::draw_welcome(out, width, height)?;

    // Block until the user makes a choice
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent { code, modifiers, kind: KeyEventKind::Press, .. })) => {
                match code {
                    KeyCode::Enter | KeyCode::Char(' ') => return Ok(MenuResult::Start),
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        return Ok(MenuResult::Quit);
                    }
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(MenuResult::Quit);
                    }
                    _ => {}
                }
            }
            Ok(Event::Resize(w, h)) => display::draw_welcome(out, w, h)?,
            Ok(_) => {}
            Err(_) => return Ok(MenuResult::Quit),
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum PlayResult {
    Menu,
    Quit,
}

/// Drive the game until the player leaves.
///
/// Input is drained without blocking at the top of every frame; clicks are
/// resolved before the frame runs, so the collision buffer they read is the
/// one painted by the previous frame.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game,
    rx: &mpsc::Receiver<Event>,
    clock: Instant,
    density: f64,
) -> std::io::Result<PlayResult> {
    let now_ms = || clock.elapsed().as_secs_f64() * 1000.0;
    let mut shell = TerminalShell::default();
    let (mut width, mut height) = terminal::size()?;
    let mut focus_paused = false;

    game.reset(&mut shell);
    game.resize(viewport_for(width, height, density));
    game.start(now_ms());
    out.execute(terminal::Clear(terminal::ClearType::All))?;

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, modifiers, kind: KeyEventKind::Press, .. }) => {
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(PlayResult::Quit);
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(PlayResult::Quit);
                        }
                        KeyCode::Char('p') | KeyCode::Char('P') => match game.state() {
                            LoopState::Running => game.pause(),
                            LoopState::Paused => {
                                focus_paused = false;
                                game.resume(now_ms());
                            }
                            _ => {}
                        },
                        KeyCode::Char('r') | KeyCode::Char('R') if game.is_over() => {
                            game.reset(&mut shell);
                            game.start(now_ms());
                        }
                        KeyCode::Char('m') | KeyCode::Char('M') if game.is_over() => {
                            return Ok(PlayResult::Menu);
                        }
                        _ => {}
                    }
                }
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column,
                    row,
                    ..
                }) => {
                    let (x, y) = cell_center(column, row);
                    game.handle_pointer(x, y, &mut shell);
                }
                Event::Resize(w, h) => {
                    width = w;
                    height = h;
                    game.resize(viewport_for(w, h, density));
                    out.execute(terminal::Clear(terminal::ClearType::All))?;
                }
                Event::FocusLost if game.state() == LoopState::Running => {
                    focus_paused = true;
                    game.pause();
                }
                Event::FocusGained if focus_paused => {
                    focus_paused = false;
                    game.resume(now_ms());
                }
                _ => {}
            }
        }

        if game.frame(now_ms(), &mut shell) == FrameOutcome::GameOver {
            if let Some(score) = shell.final_score {
                tracing::info!(score, "results screen");
            }
        }

        display::render(out, game, shell.score, shell.final_score, width, height)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    let flyer_sheet = load_sheet(args.flyer_sprite.as_deref(), config.flyer_sprite.frames);
    let impact_sheet = load_sheet(args.impact_sprite.as_deref(), config.impact_sprite.frames);

    let (cols, rows) = terminal::size()?;
    let viewport = viewport_for(cols, rows, args.pixel_density);
    let mut game = match args.seed {
        Some(seed) => Game::with_rng(config, viewport, StdRng::seed_from_u64(seed)),
        None => Game::new(config, viewport),
    };
    game.set_surface_origin(0.0, TOP_ROWS as f64 * CELL_H);
    game.set_sprites(flyer_sheet, impact_sheet);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;
    let focus_reporting = out.execute(EnableFocusChange).is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &mut game, &rx, args.pixel_density);

    // Always restore the terminal
    if focus_reporting {
        let _ = out.execute(DisableFocusChange);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.map_err(Into::into)
}

fn run<W: Write>(
    out: &mut W,
    game: &mut Game,
    rx: &mpsc::Receiver<Event>,
    density: f64,
) -> std::io::Result<()> {
    let clock = Instant::now();
    loop {
        match show_menu(out, rx)? {
            MenuResult::Quit => break,
            MenuResult::Start => match game_loop(out, game, rx, clock, density)? {
                PlayResult::Quit => break,
                PlayResult::Menu => {}
            },
        }
    }
    Ok(())
}
