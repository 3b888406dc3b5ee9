//! Dashboard modes.
//!
//! The mode list is fixed and ordered; the order drives cyclic seek navigation
//! (Left/Right in the footer) and the left-to-right layout of the mode bar.

use anyhow::{anyhow, Result};
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    Monitor,
    Peers,
    Wallet,
    Block,
    Transaction,
    Console,
    Net,
    Forks,
}

impl Mode {
    /// Every mode, in navigation order.
    pub const ALL: [Mode; 8] = [
        Mode::Monitor,
        Mode::Peers,
        Mode::Wallet,
        Mode::Block,
        Mode::Transaction,
        Mode::Console,
        Mode::Net,
        Mode::Forks,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Monitor => "monitor",
            Mode::Peers => "peers",
            Mode::Wallet => "wallet",
            Mode::Block => "block",
            Mode::Transaction => "transaction",
            Mode::Console => "console",
            Mode::Net => "net",
            Mode::Forks => "forks",
        }
    }

    /// Single-key shortcut: the first letter of the label.
    pub fn hotkey(self) -> char {
        self.label().chars().next().unwrap_or(' ')
    }

    pub fn index(self) -> usize {
        Mode::ALL.iter().position(|m| *m == self).unwrap_or(0)
    }

    /// Shift by `delta` positions, wrapping in both directions.
    pub fn seek(self, delta: isize) -> Mode {
        let len = Mode::ALL.len() as isize;
        let idx = (self.index() as isize + delta.rem_euclid(len)).rem_euclid(len);
        Mode::ALL[idx as usize]
    }

    pub fn from_hotkey(c: char) -> Option<Mode> {
        let c = c.to_ascii_lowercase();
        Mode::ALL.iter().copied().find(|m| m.hotkey() == c)
    }
}

impl std::str::FromStr for Mode {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Mode::ALL
            .iter()
            .copied()
            .find(|m| m.label() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Mode::ALL.iter().map(|m| m.label()).collect();
                anyhow!("Unknown mode '{s}'. Valid options: {}", names.join(", "))
            })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seek_wraps_both_directions() {
        assert_eq!(Mode::Monitor.seek(-1), Mode::Forks);
        assert_eq!(Mode::Forks.seek(1), Mode::Monitor);
        assert_eq!(Mode::Peers.seek(2), Mode::Block);
    }

    #[test]
    fn test_seek_by_list_length_is_identity() {
        let len = Mode::ALL.len() as isize;
        for mode in Mode::ALL {
            assert_eq!(mode.seek(len), mode);
            assert_eq!(mode.seek(-len), mode);
            assert_eq!(mode.seek(3 * len + 1), mode.seek(1));
        }
    }

    #[test]
    fn test_seek_extreme_deltas() {
        let len = Mode::ALL.len() as isize;
        for mode in Mode::ALL {
            assert_eq!(mode.seek(isize::MAX), mode.seek(isize::MAX.rem_euclid(len)));
            assert_eq!(mode.seek(isize::MIN), mode.seek(isize::MIN.rem_euclid(len)));
        }
        assert_eq!(Mode::Forks.seek(isize::MAX), Mode::Forks.seek(7));
    }

    #[test]
    fn test_hotkeys_are_unique() {
        for (i, a) in Mode::ALL.iter().enumerate() {
            for b in &Mode::ALL[i + 1..] {
                assert_ne!(a.hotkey(), b.hotkey(), "{a} and {b} share a hotkey");
            }
        }
        assert_eq!(Mode::from_hotkey('M'), Some(Mode::Monitor));
        assert_eq!(Mode::from_hotkey('z'), None);
    }

    #[test]
    fn test_parse_mode_names() {
        assert_eq!("monitor".parse::<Mode>().unwrap(), Mode::Monitor);
        assert_eq!(" Forks ".parse::<Mode>().unwrap(), Mode::Forks);
        assert!("mempool".parse::<Mode>().is_err());
    }
}
