//! Rasterization of frames onto a character-cell canvas

use std::ops::Range;

use crossterm::style::Color;
use glam::Vec2;

use super::{Frame, HealthBar, Sprite, SpriteKind, TextLine};
use crate::sim::{ExplosionKind, PowerUpKind};

/// One character cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub color: Color,
}

impl Cell {
    pub const fn new(glyph: char, color: Color) -> Self {
        Self { glyph, color }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(' ', Color::Reset)
    }
}

/// Grid of cells covering the whole play field
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    cols: u16,
    rows: u16,
    /// World units per cell
    scale: Vec2,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16, world: Vec2) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            scale: world / Vec2::new(cols as f32, rows as f32),
            cells: vec![Cell::default(); cols as usize * rows as usize],
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn get(&self, col: u16, row: u16) -> Option<Cell> {
        if col < self.cols && row < self.rows {
            Some(self.cells[row as usize * self.cols as usize + col as usize])
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Write a cell; out-of-bounds writes are dropped
    pub fn put(&mut self, col: i32, row: i32, cell: Cell) {
        if col >= 0 && row >= 0 && col < self.cols as i32 && row < self.rows as i32 {
            self.cells[row as usize * self.cols as usize + col as usize] = cell;
        }
    }

    fn to_cell(&self, world: Vec2) -> Vec2 {
        world / self.scale
    }

    /// Cells touched by a world rectangle; never empty for a positive size
    fn cell_range(&self, pos: Vec2, size: Vec2) -> (Range<i32>, Range<i32>) {
        let lo = self.to_cell(pos).floor();
        let hi = self.to_cell(pos + size).ceil().max(lo + Vec2::ONE);
        (lo.x as i32..hi.x as i32, lo.y as i32..hi.y as i32)
    }

    pub fn fill_rect(&mut self, pos: Vec2, size: Vec2, cell: Cell) {
        let (cols, rows) = self.cell_range(pos, size);
        for row in rows {
            for col in cols.clone() {
                self.put(col, row, cell);
            }
        }
    }

    /// Cells whose centers fall inside the circle, or the center cell alone
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, cell: Cell) {
        let (cols, rows) = self.cell_range(center - Vec2::splat(radius), Vec2::splat(radius * 2.0));
        let mut any = false;
        for row in rows {
            for col in cols.clone() {
                let mid = (Vec2::new(col as f32, row as f32) + 0.5) * self.scale;
                if mid.distance_squared(center) <= radius * radius {
                    self.put(col, row, cell);
                    any = true;
                }
            }
        }
        if !any {
            let c = self.to_cell(center).floor();
            self.put(c.x as i32, c.y as i32, cell);
        }
    }

    /// Text centered on `center_x`, top row at `top`
    pub fn text(&mut self, center_x: f32, top: f32, text: &str, color: Color) {
        let width = text.chars().count() as i32;
        let at = self.to_cell(Vec2::new(center_x, top));
        let start = at.x.round() as i32 - width / 2;
        let row = at.y.floor() as i32;
        for (i, ch) in text.chars().enumerate() {
            self.put(start + i as i32, row, Cell::new(ch, color));
        }
    }

    /// Cells that differ from `prev`, as (col, row, cell)
    pub fn diff<'a>(&'a self, prev: &'a Canvas) -> impl Iterator<Item = (u16, u16, Cell)> + 'a {
        let same_shape = self.cols == prev.cols && self.rows == prev.rows;
        let cols = self.cols as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(move |(i, cell)| !same_shape || prev.cells[*i] != **cell)
            .map(move |(i, cell)| ((i % cols) as u16, (i / cols) as u16, *cell))
    }

    /// Glyphs of one row, for tests and debugging
    pub fn row_string(&self, row: u16) -> String {
        (0..self.cols)
            .filter_map(|col| self.get(col, row))
            .map(|c| c.glyph)
            .collect()
    }
}

const C_STARS: Color = Color::DarkGrey;
const C_PLAYER: Color = Color::White;
const C_PROJECTILE: Color = Color::Cyan;
const C_HEAL: Color = Color::Green;
const C_MULTI_SHOT: Color = Color::Yellow;
const C_BAR_FILL: Color = Color::Green;
const C_BAR_EMPTY: Color = Color::White;
const C_TEXT: Color = Color::White;
const C_TITLE: Color = Color::Yellow;

const ROCK_GLYPHS: [char; 4] = ['@', 'O', '0', 'o'];

/// Explosion color by animation progress: white hot fading to dark red
fn explosion_color(frame: usize, frame_count: usize) -> Color {
    let t = (frame as f32 / frame_count.max(1) as f32).clamp(0.0, 1.0);

    let (r, g, b) = if t < 0.25 {
        // White to yellow
        let u = t / 0.25;
        (1.0, 1.0, 1.0 - 0.8 * u)
    } else if t < 0.5 {
        // Yellow to orange
        let u = (t - 0.25) / 0.25;
        (1.0, 1.0 - 0.45 * u, 0.2)
    } else {
        // Orange to dark red
        let u = (t - 0.5) / 0.5;
        (1.0 - 0.45 * u, 0.55 - 0.45 * u, 0.2 - 0.2 * u)
    };

    Color::Rgb {
        r: (r * 255.0) as u8,
        g: (g * 255.0) as u8,
        b: (b * 255.0) as u8,
    }
}

fn paint_background(canvas: &mut Canvas) {
    for row in 0..canvas.rows as i32 {
        for col in 0..canvas.cols as i32 {
            if (col * 7 + row * 13) % 37 == 0 {
                canvas.put(col, row, Cell::new('.', C_STARS));
            }
        }
    }
}

fn paint_sprite(canvas: &mut Canvas, sprite: &Sprite) {
    let center = sprite.pos + sprite.size / 2.0;
    match sprite.kind {
        SpriteKind::Player => {
            canvas.fill_rect(sprite.pos, sprite.size, Cell::new('#', C_PLAYER));
            // Nose
            canvas.fill_rect(
                Vec2::new(center.x - 1.0, sprite.pos.y),
                Vec2::new(2.0, 1.0),
                Cell::new('^', C_PLAYER),
            );
        }
        SpriteKind::LivesIcon => canvas.fill_rect(sprite.pos, sprite.size, Cell::new('^', C_PLAYER)),
        SpriteKind::Rock { variant } => {
            let glyph = ROCK_GLYPHS[variant % ROCK_GLYPHS.len()];
            let color = if variant % 2 == 0 { Color::DarkYellow } else { Color::Grey };
            let radius = sprite.size.x.min(sprite.size.y) / 2.0;
            canvas.fill_circle(center, radius, Cell::new(glyph, color));
        }
        SpriteKind::Projectile => canvas.fill_rect(sprite.pos, sprite.size, Cell::new('|', C_PROJECTILE)),
        SpriteKind::PowerUp(PowerUpKind::Heal) => canvas.fill_rect(sprite.pos, sprite.size, Cell::new('+', C_HEAL)),
        SpriteKind::PowerUp(PowerUpKind::MultiShot) => {
            canvas.fill_rect(sprite.pos, sprite.size, Cell::new('=', C_MULTI_SHOT))
        }
        SpriteKind::Explosion {
            kind,
            frame,
            frame_count,
        } => {
            let glyph = match kind {
                ExplosionKind::Large => '*',
                ExplosionKind::Small => '+',
                ExplosionKind::PlayerDeath => '%',
            };
            let progress = frame as f32 / frame_count.max(1) as f32;
            let radius = sprite.size.x.min(sprite.size.y) / 2.0 * (0.5 + progress * 0.5);
            canvas.fill_circle(center, radius, Cell::new(glyph, explosion_color(frame, frame_count)));
        }
    }
}

fn paint_health_bar(canvas: &mut Canvas, bar: &HealthBar) {
    canvas.fill_rect(bar.pos, bar.size, Cell::new('-', C_BAR_EMPTY));
    if bar.fill > 0.0 {
        canvas.fill_rect(bar.pos, Vec2::new(bar.size.x * bar.fill, bar.size.y), Cell::new('=', C_BAR_FILL));
    }
}

fn paint_text(canvas: &mut Canvas, line: &TextLine) {
    let color = if line.size >= 40 { C_TITLE } else { C_TEXT };
    canvas.text(line.center_x, line.top, &line.text, color);
}

/// Paint a whole frame, replacing the canvas contents
pub fn paint(canvas: &mut Canvas, frame: &Frame) {
    canvas.clear();
    paint_background(canvas);
    for sprite in &frame.sprites {
        paint_sprite(canvas, sprite);
    }
    if let Some(bar) = &frame.health_bar {
        paint_health_bar(canvas, bar);
    }
    for line in &frame.texts {
        paint_text(canvas, line);
    }
}
