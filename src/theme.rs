//! Color themes for the dashboard.
//!
//! Selected via `--theme`; both views take their styles from here.

use ratatui::style::{Color, Modifier, Style};
use std::fmt;

/// Available color themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Yellow hotkeys on the terminal's own colors (default)
    #[default]
    Classic,
    /// No colors at all, emphasis by modifiers only
    Mono,
    /// Amber CRT - orange text and hotkeys
    Amber,
}

impl Theme {
    /// Get the color scheme for this theme
    pub fn colors(&self) -> ColorScheme {
        match self {
            Theme::Classic => ColorScheme {
                text: Color::Reset,
                hotkey: Color::Yellow,
                label: Color::Reset,
                warn: Color::Yellow,
            },
            Theme::Mono => ColorScheme {
                text: Color::Reset,
                hotkey: Color::Reset,
                label: Color::Reset,
                warn: Color::Reset,
            },
            Theme::Amber => ColorScheme {
                text: Color::Rgb(255, 176, 0),
                hotkey: Color::Rgb(255, 220, 120),
                label: Color::Rgb(204, 122, 0),
                warn: Color::Rgb(255, 220, 120),
            },
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "default" => Ok(Theme::Classic),
            "mono" | "monochrome" => Ok(Theme::Mono),
            "amber" | "amber-crt" => Ok(Theme::Amber),
            _ => Err(anyhow::anyhow!(
                "Unknown theme '{s}'. Available: classic, mono, amber"
            )),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Classic => write!(f, "classic"),
            Theme::Mono => write!(f, "mono"),
            Theme::Amber => write!(f, "amber"),
        }
    }
}

/// Color scheme for a theme
#[derive(Debug, Clone, Copy)]
pub struct ColorScheme {
    /// Primary text color
    pub text: Color,
    /// Mode hotkey letter in the footer
    pub hotkey: Color,
    /// Field labels in the monitor panel
    pub label: Color,
    /// Highlighted notices ("syncing", "stamp in future")
    pub warn: Color,
}

impl ColorScheme {
    pub fn text(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn label(&self) -> Style {
        Style::default().fg(self.label)
    }

    pub fn warn(&self) -> Style {
        Style::default().fg(self.warn).add_modifier(Modifier::BOLD)
    }

    /// Style for a footer mode entry. The active mode is shown reversed.
    pub fn mode_entry(&self, active: bool) -> Style {
        let mut style = Style::default().fg(self.text).add_modifier(Modifier::BOLD);
        if active {
            style = style.add_modifier(Modifier::REVERSED);
        }
        style
    }

    pub fn mode_hotkey(&self, active: bool) -> Style {
        self.mode_entry(active).fg(self.hotkey)
    }
}
