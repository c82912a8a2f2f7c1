//! Rendering layer — all terminal output lives here.
//!
//! Each function receives a mutable writer, an immutable view of the game
//! state and the viewport that scales world pixels onto terminal cells.  No
//! game logic is performed; this module only translates state into terminal
//! commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use alien_invasion::compute::{replay_button, GameState};
use alien_invasion::entities::{GameStatus, Rect};
use alien_invasion::settings::Rgb;
use alien_invasion::viewport::Viewport;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_SHIP: Color = Color::Rgb { r: 30, g: 60, b: 160 };
const C_ALIEN: Color = Color::Rgb { r: 40, g: 150, b: 40 };
const C_HUD: Color = Color::Rgb { r: 20, g: 20, b: 20 };
const C_HINT: Color = Color::DarkGrey;
const C_OVERLAY: Color = Color::Rgb { r: 0, g: 0, b: 0 };
const C_PANEL: Color = Color::Rgb { r: 255, g: 255, b: 255 };
const C_GAME_OVER: Color = Color::Rgb { r: 255, g: 9, b: 0 };
const C_BUTTON: Color = Color::Rgb { r: 0, g: 128, b: 255 };
const C_BUTTON_TEXT: Color = Color::Rgb { r: 255, g: 255, b: 255 };

fn rgb((r, g, b): Rgb) -> Color {
    Color::Rgb { r, g, b }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let bg = rgb(state.settings.bg_color);
    out.queue(style::SetBackgroundColor(bg))?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    match state.status {
        GameStatus::Playing => {
            draw_ship(out, state, view, bg)?;
            for bullet in &state.bullets {
                fill(out, view, &bullet.rect, '│', rgb(state.settings.bullet_color), bg)?;
            }
            for alien in &state.aliens {
                draw_alien(out, view, &alien.rect, bg)?;
            }
            draw_hud(out, state, view, bg)?;
        }
        GameStatus::GameOver => draw_game_over(out, state, view)?,
    }

    draw_controls_hint(out, state, view)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Primitives ────────────────────────────────────────────────────────────────

/// Paint every cell a world rectangle covers with `glyph`.
fn fill<W: Write>(
    out: &mut W,
    view: &Viewport,
    rect: &Rect,
    glyph: char,
    fg: Color,
    bg: Color,
) -> std::io::Result<()> {
    let Some(cells) = view.rect_to_cells(rect) else {
        return Ok(());
    };
    let line: String = std::iter::repeat(glyph).take(cells.width as usize).collect();

    out.queue(style::SetForegroundColor(fg))?;
    out.queue(style::SetBackgroundColor(bg))?;
    for row in cells.row..cells.row + cells.height {
        out.queue(cursor::MoveTo(cells.col, row))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

/// Print `text` horizontally centred on the world point (`cx`, `y`).
fn draw_text<W: Write>(
    out: &mut W,
    view: &Viewport,
    text: &str,
    (cx, y): (i32, i32),
    fg: Color,
    bg: Color,
) -> std::io::Result<()> {
    let (col, row) = view.point_to_cell(cx, y);
    let col = col.saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(fg))?;
    out.queue(style::SetBackgroundColor(bg))?;
    out.queue(Print(text))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_ship<W: Write>(
    out: &mut W,
    state: &GameState,
    view: &Viewport,
    bg: Color,
) -> std::io::Result<()> {
    let rect = &state.ship.rect;
    fill(out, view, rect, '█', C_SHIP, bg)?;

    // Nose cone on the top row, centred
    if let Some(cells) = view.rect_to_cells(rect) {
        if cells.height > 1 {
            out.queue(cursor::MoveTo(cells.col, cells.row))?;
            out.queue(style::SetForegroundColor(C_SHIP))?;
            out.queue(Print(" ".repeat(cells.width as usize)))?;
            out.queue(cursor::MoveTo(cells.col + cells.width / 2, cells.row))?;
            out.queue(Print("▲"))?;
        }
    }
    Ok(())
}

fn draw_alien<W: Write>(
    out: &mut W,
    view: &Viewport,
    rect: &Rect,
    bg: Color,
) -> std::io::Result<()> {
    let Some(cells) = view.rect_to_cells(rect) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(C_ALIEN))?;
    out.queue(style::SetBackgroundColor(bg))?;

    // Sprite:
    //   «▼»    ← head
    //   ╚═╝    ← legs (only when the alien spans two rows)
    let w = cells.width as usize;
    let head = sprite_row('«', '▼', '»', w);
    out.queue(cursor::MoveTo(cells.col, cells.row))?;
    out.queue(Print(head))?;
    for row in cells.row + 1..cells.row + cells.height {
        out.queue(cursor::MoveTo(cells.col, row))?;
        out.queue(Print(sprite_row('╚', '═', '╝', w)))?;
    }
    Ok(())
}

/// A `width`-wide row: `left`, then `mid` padding, then `right`.
fn sprite_row(left: char, mid: char, right: char, width: usize) -> String {
    match width {
        0 => String::new(),
        1 => mid.to_string(),
        _ => {
            let mut s = String::with_capacity(width * 3);
            s.push(left);
            s.extend(std::iter::repeat(mid).take(width - 2));
            s.push(right);
            s
        }
    }
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    state: &GameState,
    view: &Viewport,
    bg: Color,
) -> std::io::Result<()> {
    let cx = state.settings.screen_width / 2;
    let ships = format!("Ships: {}", state.stats.ships_left);
    let destroyed = format!("Aliens Destroyed: {}", state.stats.aliens_destroyed);
    draw_text(out, view, &ships, (cx, 10), C_HUD, bg)?;

    // Keep the second line on its own row even on very short terminals.
    let (_, ships_row) = view.point_to_cell(cx, 10);
    let (col, row) = view.point_to_cell(cx, 50);
    let row = row.max(ships_row + 1);
    out.queue(cursor::MoveTo(
        col.saturating_sub(destroyed.chars().count() as u16 / 2),
        row,
    ))?;
    out.queue(Print(&destroyed))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(
    out: &mut W,
    state: &GameState,
    view: &Viewport,
) -> std::io::Result<()> {
    let hint = match state.status {
        GameStatus::Playing => "← → / A D : Move   SPACE : Shoot   Q : Quit",
        GameStatus::GameOver => "Click Replay or press R   Q : Quit",
    };
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &GameState,
    view: &Viewport,
) -> std::io::Result<()> {
    let w = state.settings.screen_width;
    let h = state.settings.screen_height;

    fill(out, view, &Rect::new(0, 0, w, h), ' ', C_OVERLAY, C_OVERLAY)?;
    fill(out, view, &Rect::new(w / 4, h / 4, w / 2, h / 2), ' ', C_PANEL, C_PANEL)?;

    draw_text(out, view, "GAME  OVER", (w / 2, h / 2 - 50), C_GAME_OVER, C_PANEL)?;
    let destroyed = format!("Aliens Destroyed: {}", state.stats.aliens_destroyed);
    draw_text(out, view, &destroyed, (w / 2, h / 2 + 10), C_GAME_OVER, C_PANEL)?;

    let button = replay_button(&state.settings);
    fill(out, view, &button, ' ', C_BUTTON, C_BUTTON)?;
    let label_y = button.top() + button.height / 2;
    draw_text(out, view, "Replay", (button.center_x(), label_y), C_BUTTON_TEXT, C_BUTTON)?;
    Ok(())
}
