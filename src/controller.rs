//! Capture controller state machine.
//!
//! Turns the raw per-frame "smile detected: yes/no" signal into a countdown,
//! a single photo capture, and a cooldown that suppresses re-triggering.
//! The controller is a pure state transducer: it performs no I/O and has no
//! failure modes. It is advanced exactly once per captured frame.

/// What the frame loop should do for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// No transient overlay this frame.
    None,
    /// Display the countdown number (3, 2, or 1) prominently.
    ShowCountdown(u8),
    /// Persist the current frame as a photo. Emitted at most once per
    /// completed countdown, on the frame *after* the countdown reached zero,
    /// so the saved image never contains the countdown overlay.
    CaptureNow,
    /// Display the "photo captured" acknowledgment.
    ShowMessage,
}

/// When to count a photo against the session total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitCountOn {
    /// Count every save attempt, even ones the sink reports as failed.
    Attempt,
    /// Count only saves the sink confirmed.
    #[default]
    Success,
}

/// Tunable timing for the capture sequence, in frame ticks.
///
/// All timing is frame-driven; the controller never sleeps. At 30 fps the
/// defaults give a one-second countdown stage, a three-second cooldown, and
/// a one-second acknowledgment banner.
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Run the 3-2-1 countdown before capturing. When disabled, a detected
    /// smile arms the capture directly (still captured on the next frame).
    pub enable_countdown: bool,
    /// Frames each countdown stage is displayed for.
    pub ticks_per_stage: u32,
    /// Frames after a capture during which no new countdown may start.
    pub cooldown_frames: u32,
    /// Frames the "photo captured" banner is displayed for.
    pub message_frames: u32,
    /// Photo counting policy.
    pub commit_count_on: CommitCountOn,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            enable_countdown: true,
            ticks_per_stage: 30,
            cooldown_frames: 90,
            message_frames: 30,
            commit_count_on: CommitCountOn::default(),
        }
    }
}

/// Per-session capture state, owned by the frame loop and mutated only
/// through [`advance`](CaptureSession::advance) and
/// [`record_save`](CaptureSession::record_save).
///
/// Invariants:
/// - `countdown_stage` is 0 (idle) or counting down 3 -> 2 -> 1
/// - `countdown_ticks` resets to 0 on every stage change
/// - a new countdown starts only when `countdown_stage == 0` and
///   `cooldown_remaining == 0`
/// - `capture_pending` is true for exactly one frame per completed countdown
#[derive(Debug)]
pub struct CaptureSession {
    opts: SessionOptions,
    countdown_stage: u8,
    countdown_ticks: u32,
    cooldown_remaining: u32,
    message_remaining: u32,
    capture_pending: bool,
    photo_count: u32,
}

impl CaptureSession {
    /// Create an idle session with the given options.
    pub fn new(opts: SessionOptions) -> Self {
        Self {
            opts,
            countdown_stage: 0,
            countdown_ticks: 0,
            cooldown_remaining: 0,
            message_remaining: 0,
            capture_pending: false,
            photo_count: 0,
        }
    }

    /// Advance the state machine by one frame.
    ///
    /// The transitions form a strict priority chain: an armed capture always
    /// wins over a new smile, so two countdown/capture cycles can never
    /// overlap. On the capture frame the cooldown and message timers are set
    /// but not yet decremented; the first post-capture frame observes the
    /// full `cooldown_frames`.
    pub fn advance(&mut self, smile_detected: bool) -> Action {
        // 1. Armed capture. Nothing else runs this frame.
        if self.capture_pending {
            self.capture_pending = false;
            self.cooldown_remaining = self.opts.cooldown_frames;
            self.message_remaining = self.opts.message_frames;
            return Action::CaptureNow;
        }

        // 2. New smile while idle and out of cooldown.
        if smile_detected && self.cooldown_remaining == 0 && self.countdown_stage == 0 {
            if self.opts.enable_countdown {
                self.countdown_stage = 3;
                self.countdown_ticks = 0;
            } else {
                self.capture_pending = true;
            }
        }

        let action = if self.countdown_stage > 0 {
            // 3. Countdown in progress (possibly started this frame, which
            // then counts as the stage's first displayed tick). The current
            // stage is displayed this frame and the tick advances afterwards,
            // so a stage that expires here still showed its number and the
            // capture lands on the next frame.
            let shown = self.countdown_stage;
            self.countdown_ticks += 1;
            if self.countdown_ticks >= self.opts.ticks_per_stage {
                self.countdown_ticks = 0;
                self.countdown_stage -= 1;
                if self.countdown_stage == 0 {
                    self.capture_pending = true;
                }
            }
            Action::ShowCountdown(shown)
        } else if self.message_remaining > 0 {
            // 4. Idle with the acknowledgment banner still up.
            Action::ShowMessage
        } else {
            Action::None
        };

        // Timer epilogue, independent of the branch taken above.
        if self.cooldown_remaining > 0 {
            self.cooldown_remaining -= 1;
        }
        if self.message_remaining > 0 {
            self.message_remaining -= 1;
        }

        action
    }

    /// Record the outcome of the photo save triggered by [`Action::CaptureNow`].
    ///
    /// Whether a failed save still counts is governed by
    /// [`SessionOptions::commit_count_on`].
    pub fn record_save(&mut self, saved: bool) {
        match self.opts.commit_count_on {
            CommitCountOn::Attempt => self.photo_count += 1,
            CommitCountOn::Success => {
                if saved {
                    self.photo_count += 1;
                }
            }
        }
    }

    /// Total photos counted this session.
    pub fn photo_count(&self) -> u32 {
        self.photo_count
    }

    /// Current countdown stage (0 when not counting down).
    pub fn countdown_stage(&self) -> u8 {
        self.countdown_stage
    }

    /// Whether a countdown is currently running.
    pub fn is_counting(&self) -> bool {
        self.countdown_stage > 0
    }

    /// Frames left before a new countdown may start.
    pub fn cooldown_remaining(&self) -> u32 {
        self.cooldown_remaining
    }

    /// Frames left on the acknowledgment banner.
    pub fn message_remaining(&self) -> u32 {
        self.message_remaining
    }

    /// Session options in effect.
    pub fn options(&self) -> &SessionOptions {
        &self.opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> CaptureSession {
        CaptureSession::new(SessionOptions::default())
    }

    #[test]
    fn test_idle_stays_idle_without_smiles() {
        let mut s = session();
        for _ in 0..500 {
            assert_eq!(s.advance(false), Action::None);
        }
        assert_eq!(s.photo_count(), 0);
        assert_eq!(s.countdown_stage(), 0);
        assert_eq!(s.cooldown_remaining(), 0);
        assert_eq!(s.message_remaining(), 0);
    }

    #[test]
    fn test_smile_starts_countdown_at_three() {
        let mut s = session();
        assert_eq!(s.advance(true), Action::ShowCountdown(3));
        assert_eq!(s.countdown_stage(), 3);
    }

    #[test]
    fn test_full_countdown_takes_ninety_frames() {
        let mut s = session();
        // A single smile starts the cycle; the countdown runs to completion
        // on its own even if the smile disappears.
        assert_eq!(s.advance(true), Action::ShowCountdown(3));
        let mut countdown_frames = 1;
        loop {
            match s.advance(false) {
                Action::ShowCountdown(_) => countdown_frames += 1,
                Action::CaptureNow => break,
                other => panic!("unexpected action during countdown: {:?}", other),
            }
        }
        assert_eq!(countdown_frames, 90);
    }

    #[test]
    fn test_stage_boundaries() {
        let mut s = session();
        for frame in 1..=90 {
            let expected = match frame {
                1..=30 => 3,
                31..=60 => 2,
                _ => 1,
            };
            assert_eq!(
                s.advance(true),
                Action::ShowCountdown(expected),
                "wrong stage at frame {}",
                frame
            );
        }
        assert_eq!(s.advance(true), Action::CaptureNow);
    }

    #[test]
    fn test_continuous_smiling_scenario() {
        // 95 frames of continuous smiling: one countdown, one capture, then
        // the acknowledgment banner while the cooldown holds.
        let mut s = session();
        let actions: Vec<Action> = (0..95).map(|_| s.advance(true)).collect();

        assert_eq!(actions[0], Action::ShowCountdown(3));
        assert_eq!(actions[29], Action::ShowCountdown(3));
        assert_eq!(actions[30], Action::ShowCountdown(2));
        assert_eq!(actions[59], Action::ShowCountdown(2));
        assert_eq!(actions[60], Action::ShowCountdown(1));
        assert_eq!(actions[89], Action::ShowCountdown(1));
        assert_eq!(actions[90], Action::CaptureNow);
        for (i, a) in actions[91..].iter().enumerate() {
            assert_eq!(*a, Action::ShowMessage, "frame {}", 91 + i);
        }

        let captures = actions.iter().filter(|a| **a == Action::CaptureNow).count();
        assert_eq!(captures, 1);
    }

    #[test]
    fn test_cooldown_set_after_capture_and_decrements_once_per_frame() {
        let mut s = session();
        s.advance(true);
        for _ in 0..89 {
            s.advance(false);
        }
        assert_eq!(s.advance(false), Action::CaptureNow);
        // The capture frame itself does not consume a cooldown tick.
        assert_eq!(s.cooldown_remaining(), 90);

        for expected in (0..90).rev() {
            s.advance(true);
            assert_eq!(s.cooldown_remaining(), expected);
        }
    }

    #[test]
    fn test_no_new_countdown_during_cooldown() {
        let mut s = session();
        // Run one full cycle.
        for _ in 0..91 {
            s.advance(true);
        }
        // Smile through the whole cooldown; no countdown may start.
        for _ in 0..90 {
            s.advance(true);
            assert_eq!(s.countdown_stage(), 0);
        }
        // Cooldown exhausted; the next smiling frame starts a new cycle.
        assert_eq!(s.advance(true), Action::ShowCountdown(3));
    }

    #[test]
    fn test_no_restart_mid_countdown() {
        let mut s = session();
        s.advance(true);
        for _ in 0..40 {
            s.advance(true);
        }
        // 41 frames in we are in stage 2; the continued smiling never reset
        // the countdown back to 3.
        assert_eq!(s.countdown_stage(), 2);
    }

    #[test]
    fn test_message_window_length() {
        let mut s = session();
        for _ in 0..91 {
            s.advance(true);
        }
        let mut message_frames = 0;
        loop {
            match s.advance(false) {
                Action::ShowMessage => message_frames += 1,
                Action::None => break,
                other => panic!("unexpected action after capture: {:?}", other),
            }
        }
        assert_eq!(message_frames, 30);
    }

    #[test]
    fn test_countdown_disabled_arms_capture_directly() {
        let mut s = CaptureSession::new(SessionOptions {
            enable_countdown: false,
            ..SessionOptions::default()
        });
        assert_eq!(s.advance(true), Action::None);
        // Capture still lands on the frame after detection, keeping overlays
        // out of the saved image.
        assert_eq!(s.advance(true), Action::CaptureNow);
        assert_eq!(s.cooldown_remaining(), 90);
    }

    #[test]
    fn test_countdown_disabled_still_cools_down() {
        let mut s = CaptureSession::new(SessionOptions {
            enable_countdown: false,
            ..SessionOptions::default()
        });
        s.advance(true);
        assert_eq!(s.advance(true), Action::CaptureNow);
        let mut captures = 0;
        for _ in 0..90 {
            if s.advance(true) == Action::CaptureNow {
                captures += 1;
            }
        }
        assert_eq!(captures, 0);
    }

    #[test]
    fn test_custom_ticks_per_stage() {
        let mut s = CaptureSession::new(SessionOptions {
            ticks_per_stage: 2,
            ..SessionOptions::default()
        });
        assert_eq!(s.advance(true), Action::ShowCountdown(3));
        assert_eq!(s.advance(false), Action::ShowCountdown(3));
        assert_eq!(s.advance(false), Action::ShowCountdown(2));
        assert_eq!(s.advance(false), Action::ShowCountdown(2));
        assert_eq!(s.advance(false), Action::ShowCountdown(1));
        assert_eq!(s.advance(false), Action::ShowCountdown(1));
        assert_eq!(s.advance(false), Action::CaptureNow);
    }

    #[test]
    fn test_record_save_success_policy() {
        let mut s = session();
        s.record_save(true);
        s.record_save(false);
        assert_eq!(s.photo_count(), 1);
    }

    #[test]
    fn test_record_save_attempt_policy() {
        let mut s = CaptureSession::new(SessionOptions {
            commit_count_on: CommitCountOn::Attempt,
            ..SessionOptions::default()
        });
        s.record_save(true);
        s.record_save(false);
        assert_eq!(s.photo_count(), 2);
    }
}
