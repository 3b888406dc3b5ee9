//! Off-screen drawing surface.
//!
//! A `Canvas` is a fixed-size grid of styled cells that a view owns
//! exclusively. Views write into it, then project a sub-rectangle of it onto
//! the [`Screen`](crate::screen::Screen).

use ratatui::{buffer::Buffer, layout::Rect, style::Style};

pub struct Canvas {
    buf: Buffer,
}

impl Canvas {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            buf: Buffer::empty(Rect::new(0, 0, cols, rows)),
        }
    }

    pub fn rows(&self) -> u16 {
        self.buf.area.height
    }

    pub fn cols(&self) -> u16 {
        self.buf.area.width
    }

    /// Write `text` at (row, col). Anything past the right edge is dropped,
    /// and writes that start outside the surface are ignored.
    pub fn put_str(&mut self, row: u16, col: u16, text: &str, style: Style) {
        if row >= self.rows() || col >= self.cols() {
            return;
        }
        self.buf.set_string(col, row, text, style);
    }

    pub fn clear(&mut self) {
        self.buf.reset();
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buf
    }

    /// Plain text of one row, trailing blanks trimmed.
    pub fn row_text(&self, row: u16) -> String {
        row_text(&self.buf, row)
    }

    pub fn style_at(&self, row: u16, col: u16) -> Option<Style> {
        self.buf.cell((col, row)).map(|c| c.style())
    }
}

pub(crate) fn row_text(buf: &Buffer, row: u16) -> String {
    if row >= buf.area.height {
        return String::new();
    }
    let mut out = String::with_capacity(buf.area.width as usize);
    for x in 0..buf.area.width {
        if let Some(cell) = buf.cell((buf.area.x + x, buf.area.y + row)) {
            out.push_str(cell.symbol());
        }
    }
    out.trim_end().to_string()
}
