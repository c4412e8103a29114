//! Terminal renderer
//!
//! The play area is stretched onto a character grid (one HUD row on top),
//! then written out with crossterm. Rasterizing is separate from I/O so it
//! can be tested without a terminal.

use std::io::Write;

use crossterm::{
    QueueableCommand, cursor,
    style::{self, Color, Print},
    terminal,
};
use glam::Vec2;

use crate::settings::Settings;
use crate::sim::{BossPhase, PowerUpKind, Tint};
use crate::view::{Snapshot, Sprite, SpriteKind};

/// Rows reserved above the play area
const HUD_ROWS: u16 = 1;

const C_BACKGROUND: Color = Color::Black;
const C_GROUND: Color = Color::DarkGrey;
const C_PIPE: Color = Color::Green;
const C_BIRD: Color = Color::Yellow;
const C_SHIELD: Color = Color::Cyan;
const C_BOSS: Color = Color::Magenta;
const C_HUD: Color = Color::White;
const C_BEST: Color = Color::Cyan;
const C_SLOW: Color = Color::Green;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
}

impl Cell {
    const EMPTY: Cell = Cell {
        ch: ' ',
        color: C_BACKGROUND,
    };
}

/// Character grid for the play area
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub cols: u16,
    pub rows: u16,
    cells: Vec<Cell>,
    scale: Vec2,
    /// Horizontal shake offset in cells
    offset: i32,
}

impl Frame {
    fn new(cols: u16, rows: u16, world: Vec2, offset: i32) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::EMPTY; cols as usize * rows as usize],
            scale: Vec2::new(f32::from(cols) / world.x, f32::from(rows) / world.y),
            offset,
        }
    }

    pub fn get(&self, col: u16, row: u16) -> Option<Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(self.cells[row as usize * self.cols as usize + col as usize])
    }

    pub fn row_text(&self, row: u16) -> String {
        (0..self.cols)
            .filter_map(|c| self.get(c, row))
            .map(|cell| cell.ch)
            .collect()
    }

    fn set(&mut self, col: i32, row: i32, cell: Cell) {
        let col = col + self.offset;
        if col < 0 || row < 0 || col >= i32::from(self.cols) || row >= i32::from(self.rows) {
            return;
        }
        let idx = row as usize * self.cols as usize + col as usize;
        self.cells[idx] = cell;
    }

    /// Fill every cell covered by a world-space box (at least one cell)
    fn fill(&mut self, pos: Vec2, size: Vec2, cell: Cell) {
        let min = pos * self.scale;
        let max = (pos + size) * self.scale;
        let (c0, r0) = (min.x.floor() as i32, min.y.floor() as i32);
        let c1 = (max.x.ceil() as i32 - 1).max(c0);
        let r1 = (max.y.ceil() as i32 - 1).max(r0);
        for row in r0..=r1 {
            for col in c0..=c1 {
                self.set(col, row, cell);
            }
        }
    }

    /// Mark a single cell at a world-space point
    fn dot(&mut self, at: Vec2, cell: Cell) {
        let p = at * self.scale;
        self.set(p.x.floor() as i32, p.y.floor() as i32, cell);
    }
}

fn tint_color(tint: Tint) -> Color {
    match tint {
        Tint::Red => Color::Red,
        Tint::Cyan => Color::Cyan,
    }
}

fn sprite_cell(sprite: &Sprite, shielded: bool) -> Cell {
    let (ch, color) = match sprite.kind {
        SpriteKind::Bird => ('@', if shielded { C_SHIELD } else { C_BIRD }),
        SpriteKind::PipeTop | SpriteKind::PipeBottom => ('█', C_PIPE),
        SpriteKind::Boss(BossPhase::Leaving) => ('▒', C_BOSS),
        SpriteKind::Boss(_) => ('▓', C_BOSS),
        SpriteKind::Bullet(tint) => ('*', tint_color(tint)),
        SpriteKind::PowerUp(PowerUpKind::Shield) => ('S', Color::Cyan),
        SpriteKind::PowerUp(PowerUpKind::Slow) => ('~', Color::Green),
        SpriteKind::Particle(tint) => (if sprite.alpha > 0.5 { '+' } else { '.' }, tint_color(tint)),
    };
    Cell { ch, color }
}

/// Rasterize the play area (without HUD) into `cols` x `rows` cells
pub fn rasterize(snapshot: &Snapshot, cols: u16, rows: u16, settings: &Settings) -> Frame {
    let shaking = settings.effective_screen_shake() && snapshot.hud.screen_shake > 0.0;
    // Alternate left/right as the shake timer runs down
    let offset = if shaking {
        if (snapshot.hud.screen_shake * 30.0) as i32 % 2 == 0 { 1 } else { -1 }
    } else {
        0
    };
    let world = Vec2::new(snapshot.width, snapshot.height);
    let mut frame = Frame::new(cols, rows, world, offset);

    let ground = Cell {
        ch: '▀',
        color: C_GROUND,
    };
    frame.fill(
        Vec2::new(0.0, snapshot.floor_y),
        Vec2::new(snapshot.width, snapshot.height - snapshot.floor_y),
        ground,
    );

    let shielded = snapshot.hud.shield > 0.0;
    for sprite in &snapshot.sprites {
        let cell = sprite_cell(sprite, shielded);
        match sprite.kind {
            SpriteKind::Particle(_) if !settings.particles => {}
            SpriteKind::Particle(_) | SpriteKind::Bullet(_) => {
                frame.dot(sprite.pos + sprite.size / 2.0, cell)
            }
            _ => frame.fill(sprite.pos, sprite.size, cell),
        }
    }
    frame
}

fn hud_line(snapshot: &Snapshot) -> Vec<(String, Color)> {
    let hud = &snapshot.hud;
    let mut parts = vec![
        (format!(" {} ", hud.score), C_HUD),
        (format!(" best: {} ", hud.best), C_BEST),
    ];
    if let Some(boss) = &hud.boss {
        parts.push((format!(" Boss L{} ", boss.level), C_HUD));
        parts.push((format!(" Survive {}s ", boss.survive_secs), C_BEST));
    }
    if hud.slowmo > 0.0 {
        parts.push((" SLOW-MO ".to_string(), C_SLOW));
    }
    if hud.shield > 0.0 {
        parts.push((" SHIELD ".to_string(), C_SHIELD));
    }
    parts
}

/// Draw one complete frame: HUD row, play area, centered overlay text
pub fn draw<W: Write>(out: &mut W, frame: &Frame, snapshot: &Snapshot) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    out.queue(cursor::MoveTo(0, 0))?;
    for (text, color) in hud_line(snapshot) {
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(text))?;
    }

    for row in 0..frame.rows {
        out.queue(cursor::MoveTo(0, row + HUD_ROWS))?;
        let mut current: Option<Color> = None;
        for col in 0..frame.cols {
            let Some(cell) = frame.get(col, row) else {
                continue;
            };
            if current != Some(cell.color) {
                out.queue(style::SetForegroundColor(cell.color))?;
                current = Some(cell.color);
            }
            out.queue(Print(cell.ch))?;
        }
    }

    if let Some(overlay) = &snapshot.overlay {
        let mid = frame.rows / 2 + HUD_ROWS;
        for (i, (text, color)) in [(&overlay.title, Color::White), (&overlay.subtitle, Color::Grey)]
            .into_iter()
            .enumerate()
        {
            let len = text.chars().count() as u16;
            out.queue(cursor::MoveTo(
                (frame.cols / 2).saturating_sub(len / 2),
                mid.saturating_sub(2) + i as u16 * 2,
            ))?;
            out.queue(style::SetForegroundColor(color))?;
            out.queue(Print(text))?;
        }
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, frame.rows + HUD_ROWS))?;
    out.flush()
}

/// Play-area size for a terminal of `cols` x `rows`
pub fn play_area(cols: u16, rows: u16) -> (u16, u16) {
    (cols.max(1), rows.saturating_sub(HUD_ROWS + 1).max(1))
}
