//! Terminal composition buffer.
//!
//! Views project their canvases into a single `Screen` sized to the terminal.
//! The render loop copies the screen into the ratatui frame whenever it has
//! been touched since the last flush.

use std::sync::{Arc, Mutex};

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::canvas::{self, Canvas};

/// Size (rows, cols) assumed until the first resize event arrives.
pub const MIN_WINDOW_SIZE: (u16, u16) = (10, 20);

/// Inclusive rectangle of terminal cells: rows `top..=bottom`, columns
/// `left..=right`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub top: u16,
    pub left: u16,
    pub bottom: u16,
    pub right: u16,
}

pub struct Screen {
    buf: Buffer,
    dirty: bool,
}

pub type SharedScreen = Arc<Mutex<Screen>>;

impl Screen {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            buf: Buffer::empty(Rect::new(0, 0, cols, rows)),
            dirty: true,
        }
    }

    pub fn shared(rows: u16, cols: u16) -> SharedScreen {
        Arc::new(Mutex::new(Self::new(rows, cols)))
    }

    /// (rows, cols)
    pub fn size(&self) -> (u16, u16) {
        (self.buf.area.height, self.buf.area.width)
    }

    /// Resize to the new terminal size, keeping whatever content still fits.
    pub fn resize(&mut self, rows: u16, cols: u16) {
        let mut next = Buffer::empty(Rect::new(0, 0, cols, rows));
        let keep_rows = rows.min(self.buf.area.height);
        let keep_cols = cols.min(self.buf.area.width);
        for y in 0..keep_rows {
            for x in 0..keep_cols {
                if let (Some(src), Some(dst)) = (self.buf.cell((x, y)), next.cell_mut((x, y))) {
                    *dst = src.clone();
                }
            }
        }
        self.buf = next;
        self.dirty = true;
    }

    /// Copy canvas cells starting at (`src_row`, `src_col`) into `dst`.
    ///
    /// Only the overlap of the canvas, the region and the screen is copied,
    /// so a region hanging off a small terminal is clipped, never an error.
    pub fn project(&mut self, canvas: &Canvas, src_row: u16, src_col: u16, dst: Region) {
        if dst.bottom < dst.top || dst.right < dst.left {
            return;
        }
        let (rows, cols) = self.size();
        for dy in 0..=(dst.bottom - dst.top) {
            let sy = src_row as u32 + dy as u32;
            let y = dst.top as u32 + dy as u32;
            if sy >= canvas.rows() as u32 || y >= rows as u32 {
                break;
            }
            for dx in 0..=(dst.right - dst.left) {
                let sx = src_col as u32 + dx as u32;
                let x = dst.left as u32 + dx as u32;
                if sx >= canvas.cols() as u32 || x >= cols as u32 {
                    break;
                }
                let src = canvas.buffer().cell((sx as u16, sy as u16));
                let out = self.buf.cell_mut((x as u16, y as u16));
                if let (Some(src), Some(out)) = (src, out) {
                    *out = src.clone();
                }
            }
        }
        self.dirty = true;
    }

    /// Returns whether anything changed since the previous call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn row_text(&self, row: u16) -> String {
        canvas::row_text(&self.buf, row)
    }
}

/// Run `f` against the shared screen. A poisoned lock is recovered: the
/// buffer holds plain cells, so a panicking writer cannot break it.
pub fn with_screen<R>(screen: &SharedScreen, f: impl FnOnce(&mut Screen) -> R) -> R {
    let mut guard = screen.lock().unwrap_or_else(|e| e.into_inner());
    f(&mut guard)
}

impl Widget for &Screen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = area.height.min(self.buf.area.height);
        let width = area.width.min(self.buf.area.width);
        for y in 0..height {
            for x in 0..width {
                let src = self.buf.cell((x, y));
                let out = buf.cell_mut((area.x + x, area.y + y));
                if let (Some(src), Some(out)) = (src, out) {
                    *out = src.clone();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Style;

    fn canvas_with(lines: &[&str], cols: u16) -> Canvas {
        let mut c = Canvas::new(lines.len() as u16, cols);
        for (i, line) in lines.iter().enumerate() {
            c.put_str(i as u16, 0, line, Style::default());
        }
        c
    }

    #[test]
    fn test_project_places_canvas_at_region() {
        let mut s = Screen::new(6, 12);
        let c = canvas_with(&["abc", "def"], 3);
        s.project(&c, 0, 0, Region { top: 2, left: 4, bottom: 3, right: 6 });
        assert_eq!(s.row_text(2), "    abc");
        assert_eq!(s.row_text(3), "    def");
        assert_eq!(s.row_text(4), "");
    }

    #[test]
    fn test_project_clips_to_region_and_screen() {
        let mut s = Screen::new(3, 5);
        let c = canvas_with(&["0123456789", "abcdefghij", "ABCDEFGHIJ"], 10);
        // Region narrower than the canvas, and extending past the screen.
        s.project(&c, 1, 2, Region { top: 1, left: 1, bottom: 9, right: 3 });
        assert_eq!(s.row_text(0), "");
        assert_eq!(s.row_text(1), " cde");
        assert_eq!(s.row_text(2), " CDE");
    }

    #[test]
    fn test_inverted_region_is_ignored() {
        let mut s = Screen::new(3, 5);
        s.take_dirty();
        let c = canvas_with(&["x"], 1);
        s.project(&c, 0, 0, Region { top: 2, left: 0, bottom: 1, right: 0 });
        assert!(!s.take_dirty());
    }

    #[test]
    fn test_resize_keeps_overlap() {
        let mut s = Screen::new(2, 4);
        let c = canvas_with(&["wxyz", "abcd"], 4);
        s.project(&c, 0, 0, Region { top: 0, left: 0, bottom: 1, right: 3 });
        s.resize(4, 2);
        assert_eq!(s.size(), (4, 2));
        assert_eq!(s.row_text(0), "wx");
        assert_eq!(s.row_text(1), "ab");
        assert_eq!(s.row_text(2), "");
    }

    #[test]
    fn test_dirty_flag_round_trip() {
        let mut s = Screen::new(1, 1);
        assert!(s.take_dirty());
        assert!(!s.take_dirty());
        s.resize(2, 2);
        assert!(s.take_dirty());
    }
}
