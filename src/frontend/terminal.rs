//! Terminal setup and the crossterm renderer

use std::io::Write;

use crossterm::event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags};
use crossterm::style::{self, Print};
use crossterm::{ExecutableCommand, QueueableCommand, cursor, terminal};
use glam::Vec2;

use crate::error::PlatformError;
use crate::platform::Renderer;
use crate::renderer::{Canvas, Frame, shapes};

/// World units covered by one terminal cell
pub const CELL_SIZE: Vec2 = Vec2::new(10.0, 20.0);

/// Grid size needed to show the whole play field
pub fn grid_size(screen: Vec2) -> (u16, u16) {
    let cells = (screen / CELL_SIZE).ceil();
    (cells.x as u16, cells.y as u16)
}

/// Raw mode + alternate screen for as long as it lives
pub struct TerminalGuard<W: Write> {
    out: W,
    keyboard_enhanced: bool,
}

impl<W: Write> TerminalGuard<W> {
    pub fn enter(mut out: W) -> Result<Self, PlatformError> {
        terminal::enable_raw_mode().map_err(PlatformError::InputUnavailable)?;
        out.execute(terminal::EnterAlternateScreen)
            .and_then(|o| o.execute(cursor::Hide))
            .map_err(PlatformError::DisplayUnavailable)?;

        // Key-release events where the terminal supports them
        let keyboard_enhanced = out
            .execute(PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))
            .is_ok()
            && terminal::supports_keyboard_enhancement().unwrap_or(false);
        log::info!("Terminal ready (key releases reported: {keyboard_enhanced})");

        Ok(Self { out, keyboard_enhanced })
    }

    pub fn keyboard_enhanced(&self) -> bool {
        self.keyboard_enhanced
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        // Always restore the terminal
        if self.keyboard_enhanced {
            let _ = self.out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = self.out.execute(style::ResetColor);
        let _ = self.out.execute(cursor::Show);
        let _ = self.out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Draws frames as colored characters, rewriting only changed cells
pub struct TerminalRenderer<W: Write> {
    out: W,
    canvas: Canvas,
    previous: Option<Canvas>,
}

impl<W: Write> TerminalRenderer<W> {
    /// Renderer for a terminal of `available` (cols, rows)
    pub fn new(out: W, screen: Vec2, available: (u16, u16)) -> Result<Self, PlatformError> {
        let (cols, rows) = grid_size(screen);
        if available.0 < cols || available.1 < rows {
            return Err(PlatformError::TerminalTooSmall {
                cols: available.0,
                rows: available.1,
                min_cols: cols,
                min_rows: rows,
            });
        }
        Ok(Self {
            out,
            canvas: Canvas::new(cols, rows, screen),
            previous: None,
        })
    }

    /// Renderer sized against the current terminal
    pub fn for_terminal(out: W, screen: Vec2) -> Result<Self, PlatformError> {
        let available = terminal::size().map_err(PlatformError::DisplayUnavailable)?;
        Self::new(out, screen, available)
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    fn flush_changes(&mut self) -> std::io::Result<()> {
        let blank = Canvas::new(self.canvas.cols(), self.canvas.rows(), Vec2::ONE);
        let prev = self.previous.as_ref().unwrap_or(&blank);
        if self.previous.is_none() {
            self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        }

        let mut color = None;
        for (col, row, cell) in self.canvas.diff(prev) {
            if color != Some(cell.color) {
                self.out.queue(style::SetForegroundColor(cell.color))?;
                color = Some(cell.color);
            }
            self.out.queue(cursor::MoveTo(col, row))?;
            self.out.queue(Print(cell.glyph))?;
        }

        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.canvas.rows()))?;
        self.out.flush()
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn draw_frame(&mut self, frame: &Frame) -> Result<(), PlatformError> {
        shapes::paint(&mut self.canvas, frame);
        self.flush_changes().map_err(PlatformError::DisplayUnavailable)?;
        self.previous = Some(self.canvas.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::HealthBar;
    use crate::sim::GamePhase;

    fn frame() -> Frame {
        Frame {
            screen: Vec2::new(500.0, 600.0),
            phase: GamePhase::Playing,
            sprites: Vec::new(),
            texts: Vec::new(),
            health_bar: Some(HealthBar {
                pos: Vec2::new(5.0, 10.0),
                size: Vec2::new(100.0, 10.0),
                fill: 1.0,
            }),
        }
    }

    #[test]
    fn test_grid_for_default_screen() {
        assert_eq!(grid_size(Vec2::new(500.0, 600.0)), (50, 30));
    }

    #[test]
    fn test_too_small_terminal_rejected() {
        let err = TerminalRenderer::new(Vec::new(), Vec2::new(500.0, 600.0), (40, 30)).err();
        assert!(matches!(err, Some(PlatformError::TerminalTooSmall { min_cols: 50, .. })));
    }

    #[test]
    fn test_second_identical_frame_writes_less() {
        let mut r = TerminalRenderer::new(Vec::new(), Vec2::new(500.0, 600.0), (80, 40)).unwrap();
        r.draw_frame(&frame()).unwrap();
        let first = r.out.len();
        r.draw_frame(&frame()).unwrap();
        let second = r.out.len() - first;
        assert!(second < first);
        assert!(r.canvas().row_string(0).contains("=========="));
    }
}
