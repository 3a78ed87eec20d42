/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and a `Snapshot` of the game.
/// No game logic is performed; field coordinates are scaled onto whatever
/// terminal size is current.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use fruit_frenzy::entities::{Field, Fruit, FruitKind, GameStatus, Player};
use fruit_frenzy::session::Snapshot;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::White;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_BEST: Color = Color::Yellow;
const C_PLAYER: Color = Color::DarkYellow;
const C_TITLE: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

/// Play-area rectangle in terminal cells (inside the border).
struct Viewport {
    left: u16,
    top: u16,
    cols: u16,
    rows: u16,
}

impl Viewport {
    fn new(width: u16, height: u16) -> Self {
        Self {
            left: 1,
            top: 2,
            cols: width.saturating_sub(2).max(1),
            rows: height.saturating_sub(4).max(1),
        }
    }

    /// Terminal cell for a field position, or `None` when off the field.
    fn cell(&self, field: &Field, x: f32, y: f32) -> Option<(u16, u16)> {
        if x < 0.0 || y < 0.0 || x >= field.width || y >= field.height {
            return None;
        }
        let col = (x / field.width * self.cols as f32) as u16;
        let row = (y / field.height * self.rows as f32) as u16;
        Some((
            self.left + col.min(self.cols - 1),
            self.top + row.min(self.rows - 1),
        ))
    }

    fn scale_width(&self, field: &Field, width: f32) -> u16 {
        ((width / field.width * self.cols as f32).round() as u16).max(3)
    }
}

fn fruit_glyph(kind: FruitKind) -> &'static str {
    match kind {
        FruitKind::Apple => "🍎",
        FruitKind::Strawberry => "🍓",
        FruitKind::Orange => "🍊",
        FruitKind::Grapes => "🍇",
        FruitKind::Banana => "🍌",
        FruitKind::Cherries => "🍒",
        FruitKind::Peach => "🍑",
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, snap: &Snapshot<'_>) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let view = Viewport::new(width, height);

    out.queue(terminal::Clear(terminal::ClearType::All))?;
    draw_border(out, width, height)?;

    match snap.status {
        GameStatus::Intro => draw_intro(out, snap, width, height)?,
        GameStatus::Playing | GameStatus::GameOver => {
            draw_hud(out, snap, width)?;
            for fruit in snap.fruits {
                draw_fruit(out, &view, &snap.field, fruit)?;
            }
            if let Some(player) = snap.player {
                draw_player(out, &view, &snap.field, player)?;
            }
            if snap.status == GameStatus::GameOver {
                draw_game_over(out, snap, width, height)?;
            }
        }
    }
    draw_controls_hint(out, snap.status, height)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;
    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, snap: &Snapshot<'_>, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {}", snap.score)))?;

    let hearts = "♥".repeat(snap.lives as usize);
    let lx = (width / 2).saturating_sub(hearts.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&hearts))?;

    let best = format!("High Score: {}", snap.high_score);
    let rx = width.saturating_sub(best.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_BEST))?;
    out.queue(Print(&best))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_fruit<W: Write>(
    out: &mut W,
    view: &Viewport,
    field: &Field,
    fruit: &Fruit,
) -> std::io::Result<()> {
    // Still above the field after a respawn
    let Some((col, row)) = view.cell(field, fruit.x, fruit.y) else {
        return Ok(());
    };
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print(fruit_glyph(fruit.kind)))?;
    Ok(())
}

fn draw_player<W: Write>(
    out: &mut W,
    view: &Viewport,
    field: &Field,
    player: &Player,
) -> std::io::Result<()> {
    //   \___/   ← basket, as wide as the player box
    let Some((col, row)) = view.cell(field, player.x, player.y) else {
        return Ok(());
    };
    let cols = view.scale_width(field, player.width);
    let lx = col.saturating_sub(cols / 2).max(view.left);
    let basket = format!("\\{}/", "_".repeat(cols.saturating_sub(2) as usize));

    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(cursor::MoveTo(lx, row))?;
    out.queue(Print(basket))?;
    Ok(())
}

// ── Intro ─────────────────────────────────────────────────────────────────────

fn draw_intro<W: Write>(
    out: &mut W,
    snap: &Snapshot<'_>,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let cx = width / 2;
    let cy = height / 2;

    let title = "🍎  FRUITY  FRENZY  🍌";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(3),
    ))?;
    out.queue(style::SetForegroundColor(C_TITLE))?;
    out.queue(Print(title))?;

    if snap.high_score > 0 {
        let hs = format!("High Score: {}", snap.high_score);
        out.queue(cursor::MoveTo(
            cx.saturating_sub(hs.chars().count() as u16 / 2),
            cy.saturating_sub(1),
        ))?;
        out.queue(style::SetForegroundColor(C_HUD_BEST))?;
        out.queue(Print(&hs))?;
    }

    let prompt = "[ Enter ]  Start Game";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(prompt.chars().count() as u16 / 2),
        cy + 1,
    ))?;
    out.queue(style::SetForegroundColor(Color::Green))?;
    out.queue(Print(prompt))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(
    out: &mut W,
    status: GameStatus,
    height: u16,
) -> std::io::Result<()> {
    let hint = match status {
        GameStatus::Intro => "ENTER : Start   Q : Quit",
        GameStatus::Playing => "← → ↑ ↓ / W A S D : Move   Q : Quit",
        GameStatus::GameOver => "R : Restart   Q : Quit",
    };
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    snap: &Snapshot<'_>,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let score_line = format!("Final Score: {}", snap.score);
    let best_line = if snap.new_high_score {
        format!("★ NEW BEST: {} ★", snap.high_score)
    } else {
        format!("Best Score: {}", snap.high_score)
    };

    let lines: [(String, Color); 6] = [
        ("╔════════════════════╗".to_string(), Color::Red),
        ("║     GAME  OVER     ║".to_string(), Color::Red),
        ("╚════════════════════╝".to_string(), Color::Red),
        (snap.punchline.unwrap_or_default().to_string(), Color::White),
        (score_line, Color::Yellow),
        (
            best_line,
            if snap.new_high_score {
                Color::Yellow
            } else {
                Color::DarkGrey
            },
        ),
    ];

    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}
