//! Terminal input: keys and resizes become [`AppEvent`]s.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::modes::Mode;
use crate::types::{AppEvent, ModeRequest};

const POLL_TIMEOUT: Duration = Duration::from_millis(100);

pub fn map_key(k: KeyEvent) -> Option<AppEvent> {
    if k.kind != KeyEventKind::Press && k.kind != KeyEventKind::Repeat {
        return None;
    }
    match (k.code, k.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppEvent::Quit),
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Some(AppEvent::Quit),
        (KeyCode::Left, _) => Some(AppEvent::ModeChange(ModeRequest::Seek(-1))),
        (KeyCode::Right, _) => Some(AppEvent::ModeChange(ModeRequest::Seek(1))),
        (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => {
            Mode::from_hotkey(c).map(|mode| AppEvent::ModeChange(ModeRequest::Set(mode)))
        }
        _ => None,
    }
}

pub fn map_event(ev: Event) -> Option<AppEvent> {
    match ev {
        Event::Key(k) => map_key(k),
        Event::Resize(cols, rows) => Some(AppEvent::WindowResize(rows, cols)),
        _ => None,
    }
}

/// Read terminal events on a blocking thread and forward them. The thread
/// exits once the receiving side of `tx` is gone.
pub fn spawn_input_reader(tx: UnboundedSender<AppEvent>) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || loop {
        if tx.is_closed() {
            break;
        }
        match event::poll(POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if let Some(app_ev) = map_event(ev) {
                        if tx.send(app_ev).is_err() {
                            break;
                        }
                    }
                }
                Err(e) => {
                    log::error!("terminal read failed: {e}");
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                log::error!("terminal poll failed: {e}");
                break;
            }
        }
    })
}
