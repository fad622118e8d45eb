//! Persistent status line at the bottom of the screen.

use std::io::Write;

use crate::controller::CaptureSession;

/// Status line showing session state, face count, and photo tally.
///
/// Format: " <state> | faces:N | photos:N | q:quit "
#[derive(Debug, Clone)]
pub struct StatusLine {
    /// Whether the status line is drawn
    pub visible: bool,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusLine {
    /// Create a visible status line.
    pub fn new() -> Self {
        Self { visible: true }
    }

    /// Create a status line with the given visibility.
    pub fn with_visibility(visible: bool) -> Self {
        Self { visible }
    }

    /// Format the status text from the current session state.
    pub fn format(&self, session: &CaptureSession, faces: usize, smiling: bool) -> String {
        let state = if session.is_counting() {
            format!("countdown:{}", session.countdown_stage())
        } else if session.message_remaining() > 0 {
            "captured!".to_string()
        } else if session.cooldown_remaining() > 0 {
            "cooldown".to_string()
        } else if smiling {
            "smile!".to_string()
        } else if faces > 0 {
            "smile to capture".to_string()
        } else {
            "looking for faces".to_string()
        };

        format!(
            " {} | faces:{} | photos:{} | q:quit ",
            state,
            faces,
            session.photo_count()
        )
    }

    /// Draw the status text on the bottom terminal row in reverse video.
    pub fn render(
        &self,
        stdout: &mut std::io::Stdout,
        text: &str,
        term_cols: u16,
        term_rows: u16,
    ) -> std::io::Result<()> {
        if !self.visible {
            return Ok(());
        }

        let mut line = text.to_string();
        line.truncate(term_cols as usize);

        let mut output = String::new();
        output.push_str("\x1b7");
        output.push_str("\x1b[?25l");
        output.push_str(&format!("\x1b[{};1H\x1b[7m{:<width$}\x1b[0m", term_rows, line, width = term_cols as usize));
        output.push_str("\x1b[?25h");
        output.push_str("\x1b8");

        stdout.write_all(output.as_bytes())?;
        stdout.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{Action, SessionOptions};

    #[test]
    fn test_format_idle() {
        let session = CaptureSession::new(SessionOptions::default());
        let status = StatusLine::new();
        assert_eq!(
            status.format(&session, 0, false),
            " looking for faces | faces:0 | photos:0 | q:quit "
        );
    }

    #[test]
    fn test_format_face_without_smile() {
        let session = CaptureSession::new(SessionOptions::default());
        let status = StatusLine::new();
        assert!(status
            .format(&session, 1, false)
            .starts_with(" smile to capture | faces:1"));
    }

    #[test]
    fn test_format_counting() {
        let mut session = CaptureSession::new(SessionOptions::default());
        assert_eq!(session.advance(true), Action::ShowCountdown(3));
        let status = StatusLine::new();
        assert!(status
            .format(&session, 1, true)
            .starts_with(" countdown:3 |"));
    }

    #[test]
    fn test_format_after_capture() {
        let mut session = CaptureSession::new(SessionOptions::default());
        for _ in 0..91 {
            session.advance(true);
        }
        session.record_save(true);
        let status = StatusLine::new();
        let text = status.format(&session, 1, true);
        assert!(text.starts_with(" captured! |"), "text was {:?}", text);
        assert!(text.contains("photos:1"));
    }
}
