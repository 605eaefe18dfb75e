/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game.  No game logic is performed; this module only translates the
/// visible raster and the session counters into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use crow_shooter::game::{Game, LoopState};
use crow_shooter::raster::Raster;

// ── Cell geometry ─────────────────────────────────────────────────────────────

/// Logical pixels covered by one terminal cell.
pub const CELL_W: f64 = 10.0;
pub const CELL_H: f64 = 20.0;

/// Rows above the playfield (HUD) and below it (hint line).
pub const TOP_ROWS: u16 = 1;
pub const BOTTOM_ROWS: u16 = 1;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_SKY: Color = Color::Rgb { r: 24, g: 30, b: 54 };
const C_HUD_SCORE: Color = Color::Yellow;
const C_STATUS: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

/// Sample the raster at a logical point; transparent shows the sky.
fn sample(raster: &Raster, x: f64, y: f64) -> Color {
    let d = raster.density();
    match raster.pixel((x * d).floor() as i64, (y * d).floor() as i64) {
        Some(p) if p.a > 0 => Color::Rgb { r: p.r, g: p.g, b: p.b },
        _ => C_SKY,
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.  `score` and `final_score` are the values
/// last delivered to the shell; the overlay shows once a final score exists.
pub fn render<W: Write>(
    out: &mut W,
    game: &Game,
    score: u32,
    final_score: Option<u32>,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    draw_field(out, game, width, height)?;
    draw_hud(out, game.state(), score, width)?;
    draw_controls_hint(out, height)?;

    if let Some(final_score) = final_score {
        draw_game_over(out, final_score, width, height)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Playfield ─────────────────────────────────────────────────────────────────

/// Each cell shows two raster samples with an upper-half block:
/// foreground = top half, background = bottom half.
fn draw_field<W: Write>(out: &mut W, game: &Game, width: u16, height: u16) -> std::io::Result<()> {
    let raster = game.visible();
    let rows = height.saturating_sub(TOP_ROWS + BOTTOM_ROWS);
    for row in 0..rows {
        out.queue(cursor::MoveTo(0, row + TOP_ROWS))?;
        let y = row as f64 * CELL_H;
        let mut current: Option<(Color, Color)> = None;
        for col in 0..width {
            let x = col as f64 * CELL_W + CELL_W / 2.0;
            let top = sample(raster, x, y + CELL_H / 4.0);
            let bottom = sample(raster, x, y + CELL_H * 3.0 / 4.0);
            if current != Some((top, bottom)) {
                out.queue(style::SetForegroundColor(top))?;
                out.queue(style::SetBackgroundColor(bottom))?;
                current = Some((top, bottom));
            }
            out.queue(Print("▀"))?;
        }
    }
    out.queue(style::ResetColor)?;
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: LoopState, score: u32, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {}", score)))?;

    let status = match state {
        LoopState::Paused => "[ PAUSED ]",
        LoopState::Idle => "[ READY ]",
        _ => "",
    };
    if !status.is_empty() {
        let sx = (width / 2).saturating_sub(status.len() as u16 / 2);
        out.queue(cursor::MoveTo(sx, 0))?;
        out.queue(style::SetForegroundColor(C_STATUS))?;
        out.queue(Print(status))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("Click crows to shoot   P : Pause   Q : Quit"))?;
    Ok(())
}

// ── Welcome / instructions ────────────────────────────────────────────────────

pub fn draw_welcome<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let lines: &[(&str, Color)] = &[
        ("CROW SHOOTER", Color::Cyan),
        ("", Color::White),
        ("Click the crows to shoot them down.", Color::White),
        ("Don't let any crow escape off the left edge.", Color::White),
        ("Score displays top-left.", Color::DarkGrey),
        ("", Color::White),
        ("ENTER : Start   Q : Quit", Color::Yellow),
    ];
    draw_centered(out, lines, width, height)?;
    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, score: u32, width: u16, height: u16) -> std::io::Result<()> {
    let score_line = format!("Your Score: {}", score);
    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (score_line.as_str(), Color::Yellow),
        ("R - Play Again  M - Menu  Q - Quit", Color::White),
    ];
    draw_centered(out, lines, width, height)
}

fn draw_centered<W: Write>(
    out: &mut W,
    lines: &[(&str, Color)],
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}
