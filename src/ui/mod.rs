//! Terminal UI: raw mode, transient overlays, and the status line.
//!
//! Rendering happens between frames and never blocks frame acquisition;
//! every overlay is built as a single ANSI string and written in one call.

mod overlay;
mod raw_mode;
mod status;

pub use overlay::{clear_banner, render_countdown, render_message};
pub use raw_mode::RawModeGuard;
pub use status::StatusLine;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use std::io;
use std::time::Duration;

/// Drain pending key events, returning true if a quit key was pressed.
///
/// Quit keys: `q`, `Esc`, `Ctrl+C`. Non-blocking; all other keys are
/// discarded.
pub fn poll_quit_key() -> io::Result<bool> {
    let mut quit = false;
    while crossterm::event::poll(Duration::ZERO)? {
        if let Event::Key(key) = crossterm::event::read()? {
            if is_quit_key(&key) {
                quit = true;
            }
        }
    }
    Ok(quit)
}

fn is_quit_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') | KeyCode::Char('C') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_keys() {
        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(is_quit_key(&q));

        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert!(is_quit_key(&esc));

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(is_quit_key(&ctrl_c));
    }

    #[test]
    fn test_non_quit_keys() {
        let plain_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert!(!is_quit_key(&plain_c));

        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert!(!is_quit_key(&enter));
    }
}
