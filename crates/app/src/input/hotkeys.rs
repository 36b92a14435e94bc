//! Terminal hotkeys for a running drawing
//!
//! - `p`: pause or resume
//! - `c`: cancel

use std::io::BufRead;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use painting::ControlSignals;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hotkey {
    PauseResume,
    Cancel,
}

impl Hotkey {
    /// Map one line of terminal input to a hotkey
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "p" | "pause" | "resume" => Some(Hotkey::PauseResume),
            "c" | "cancel" | "q" => Some(Hotkey::Cancel),
            _ => None,
        }
    }

    pub fn apply(self, signals: &ControlSignals) {
        match self {
            Hotkey::PauseResume => {
                signals.toggle_pause();
            }
            Hotkey::Cancel => {
                info!("Cancelling drawing");
                signals.cancel();
            }
        }
    }
}

/// Forward hotkeys read from `input` to `signals` until input ends or the run is cancelled
pub fn read_hotkeys<R: BufRead>(input: R, signals: &ControlSignals) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Stopped reading hotkeys: {}", e);
                return;
            }
        };
        match Hotkey::parse(&line) {
            Some(key) => key.apply(signals),
            None if line.trim().is_empty() => {}
            None => debug!("Ignoring input {:?}", line),
        }
        if signals.is_cancelled() {
            return;
        }
    }
}

/// Read hotkeys from stdin on a background thread
///
/// The thread blocks on stdin, so the host does not join it.
pub fn spawn_hotkey_reader(signals: Arc<ControlSignals>) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("hotkeys".into())
        .spawn(move || read_hotkeys(std::io::stdin().lock(), &signals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse() {
        assert_eq!(Hotkey::parse("p"), Some(Hotkey::PauseResume));
        assert_eq!(Hotkey::parse(" C \n"), Some(Hotkey::Cancel));
        assert_eq!(Hotkey::parse("x"), None);
    }

    #[test]
    fn test_read_hotkeys_toggles_and_cancels() {
        let signals = ControlSignals::new();
        read_hotkeys(Cursor::new("p\n\nhello\n"), &signals);
        assert!(signals.is_paused());

        read_hotkeys(Cursor::new("p\nc\np\n"), &signals);
        assert!(signals.is_cancelled());
        // Reading stops at cancel, so the trailing toggle is not applied
        assert!(!signals.is_paused());
    }
}
