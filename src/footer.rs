//! Footer: the mode bar and the clock.
//!
//! The footer owns the current mode. Every resolved mode change is redrawn
//! first and then announced to the registered [`ModeSubscriber`]s, one at a
//! time, in registration order.

use std::sync::Arc;

use async_trait::async_trait;

use crate::canvas::Canvas;
use crate::modes::Mode;
use crate::screen::{with_screen, Region, SharedScreen, MIN_WINDOW_SIZE};
use crate::theme::ColorScheme;
use crate::types::{ModeRequest, Timestamp};

pub const FOOTER_ROWS: u16 = 2;
/// Layout never uses more columns than this, however wide the terminal.
pub const MAX_COLS: u16 = 100;
const MIN_ROWS: u16 = 5;
const MIN_COLS: u16 = 3;
/// "YYYY-MM-DDTHH:MM:SS"
const CLOCK_WIDTH: u16 = 19;
/// Gap after each mode label.
const LABEL_PADDING: u16 = 3;

/// Receives every mode the footer resolves.
#[async_trait]
pub trait ModeSubscriber: Send + Sync {
    async fn on_mode_change(&self, mode: Mode);
}

pub struct FooterView {
    screen: SharedScreen,
    colors: ColorScheme,
    canvas: Option<Canvas>,

    mode: Option<Mode>,
    clock: Option<Timestamp>,
    window_size: (u16, u16),

    subscribers: Vec<Arc<dyn ModeSubscriber>>,
}

impl FooterView {
    pub fn new(screen: SharedScreen, colors: ColorScheme) -> Self {
        Self {
            screen,
            colors,
            canvas: None,
            mode: None,
            clock: None,
            window_size: MIN_WINDOW_SIZE,
            subscribers: Vec::new(),
        }
    }

    /// Register a subscriber. Registering the same instance twice is a no-op;
    /// returns whether it was added.
    pub fn add_subscriber(&mut self, subscriber: Arc<dyn ModeSubscriber>) -> bool {
        let ptr = Arc::as_ptr(&subscriber) as *const ();
        if self
            .subscribers
            .iter()
            .any(|s| Arc::as_ptr(s) as *const () == ptr)
        {
            return false;
        }
        self.subscribers.push(subscriber);
        true
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn clock(&self) -> Option<Timestamp> {
        self.clock
    }

    pub fn window_size(&self) -> (u16, u16) {
        self.window_size
    }

    pub async fn on_mode_change(&mut self, request: ModeRequest) {
        let mode = match request {
            ModeRequest::Set(mode) => mode,
            // Nothing to seek from yet.
            ModeRequest::Seek(delta) => match self.mode {
                Some(current) => current.seek(delta),
                None => return,
            },
        };

        self.mode = Some(mode);
        self.draw();

        for subscriber in &self.subscribers {
            subscriber.on_mode_change(mode).await;
        }
    }

    pub async fn on_tick(&mut self, now: Timestamp) {
        self.clock = Some(now);
        self.draw();
    }

    pub async fn on_window_resize(&mut self, rows: u16, cols: u16) {
        // Growing taller moves the footer down: blank the old rows first.
        if rows > self.window_size.0 {
            if let Some(canvas) = self.canvas.as_mut() {
                canvas.clear();
                self.project();
            }
        }
        self.window_size = (rows, cols);
        self.draw();
    }

    pub fn draw(&mut self) {
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.clear();
        }
        let canvas = self
            .canvas
            .get_or_insert_with(|| Canvas::new(FOOTER_ROWS, MAX_COLS));

        let mut x = 1u16;
        for mode in Mode::ALL {
            let active = self.mode == Some(mode);
            let label = mode.label();
            let (first, rest) = label.split_at(1);
            canvas.put_str(0, x, first, self.colors.mode_hotkey(active));
            canvas.put_str(0, x + 1, rest, self.colors.mode_entry(active));
            x += label.len() as u16 + LABEL_PADDING + 1;
        }

        if let Some(clock) = self.clock {
            let stamp = clock.format("%Y-%m-%dT%H:%M:%S").to_string();
            canvas.put_str(0, MAX_COLS - CLOCK_WIDTH, &stamp, self.colors.text());
        }

        self.project();
    }

    fn project(&self) {
        let (rows, cols) = self.window_size;
        if rows < MIN_ROWS || cols < MIN_COLS {
            return;
        }
        let Some(canvas) = self.canvas.as_ref() else {
            return;
        };
        let region = Region {
            top: rows - 2,
            left: 0,
            bottom: rows,
            right: (cols - 1).min(MAX_COLS),
        };
        with_screen(&self.screen, |s| s.project(canvas, 0, 0, region));
    }

    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }
}
