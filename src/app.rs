//! The per-frame capture loop.
//!
//! One synchronous pass per captured frame: read the latest camera frame,
//! run detection, advance the capture controller, act on the result, draw
//! the overlay. The controller is only ticked when a *new* frame has
//! arrived, so all its timing stays in frame units regardless of how fast
//! this loop polls.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::camera::{CameraError, CameraSettings, CameraSource};
use crate::controller::{Action, CaptureSession, SessionOptions};
use crate::detector::{Detection, DetectorError, SeetaSmileDetector, SmileDetector, SmileParams};
use crate::photo::{FilenameScheme, PhotoSink};
use crate::ui::{self, RawModeGuard, StatusLine};

/// How long the loop tolerates no new frames before declaring the source
/// exhausted.
const STALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything the capture loop needs, already merged from CLI and config.
#[derive(Debug)]
pub struct AppSettings {
    pub camera: CameraSettings,
    pub session: SessionOptions,
    pub model_path: PathBuf,
    pub min_face_size: u32,
    pub smile_params: SmileParams,
    pub output_dir: PathBuf,
    pub filename: FilenameScheme,
    pub status_bar: bool,
}

/// Errors that can end a capture run.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Camera(#[from] CameraError),
    #[error("{0}")]
    Detector(#[from] DetectorError),
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
    #[error("Camera stopped producing frames")]
    SourceExhausted,
}

/// Outcome of a finished run.
#[derive(Debug)]
pub struct RunSummary {
    /// Photos counted this session
    pub photos: u32,
}

/// Flag set by the Ctrl+C handler; raw mode normally swallows the signal,
/// this covers shutdown requests arriving outside raw mode.
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Install the Ctrl+C handler. Safe to call once per process.
pub fn setup_shutdown_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);
    })
}

fn shutdown_requested() -> bool {
    SHUTDOWN.load(Ordering::SeqCst)
}

/// Run the capture loop until a quit key, Ctrl+C, or a fatal source error.
pub fn run(settings: AppSettings) -> Result<RunSummary, AppError> {
    let mut camera = CameraSource::open(settings.camera.clone())?;
    camera.start()?;

    let fps = camera.actual_fps().unwrap_or(settings.camera.fps).max(1);
    let frame_interval = Duration::from_secs(1) / fps;
    log::info!(
        "Camera started: {} at {} fps",
        camera
            .actual_resolution()
            .unwrap_or(settings.camera.resolution),
        fps
    );

    let mut detector = SeetaSmileDetector::from_model_path(
        &settings.model_path,
        settings.min_face_size,
        settings.smile_params,
    )?;

    let mut sink = PhotoSink::new(&settings.output_dir, settings.filename);
    let mut session = CaptureSession::new(settings.session);
    let status = StatusLine::with_visibility(settings.status_bar);

    let mut guard = RawModeGuard::enter()?;
    let result = frame_loop(
        &camera,
        &mut detector,
        &mut session,
        &mut sink,
        &status,
        frame_interval,
    );
    // Restore the terminal before stopping the camera; a loop error must not
    // be shadowed by a failure to leave raw mode.
    let _ = guard.exit();
    camera.stop();

    result.map(|()| RunSummary {
        photos: session.photo_count(),
    })
}

fn frame_loop(
    camera: &CameraSource,
    detector: &mut SeetaSmileDetector,
    session: &mut CaptureSession,
    sink: &mut PhotoSink,
    status: &StatusLine,
    frame_interval: Duration,
) -> Result<(), AppError> {
    let mut stdout = std::io::stdout();
    let mut last_frame_at: Option<Instant> = None;
    let mut stalled_since = Instant::now();
    let mut banner_shown = false;

    loop {
        if shutdown_requested() || ui::poll_quit_key()? {
            log::info!("Quit requested, stopping capture loop");
            return Ok(());
        }

        // Newest frame, if one has arrived since the last tick.
        let frame = match camera.latest_frame() {
            Some(frame) if last_frame_at != Some(frame.timestamp) => {
                last_frame_at = Some(frame.timestamp);
                stalled_since = Instant::now();
                frame
            }
            _ => {
                if !camera.is_running() || stalled_since.elapsed() > STALL_TIMEOUT {
                    return Err(AppError::SourceExhausted);
                }
                std::thread::sleep(Duration::from_millis(2));
                continue;
            }
        };

        let tick_started = Instant::now();

        // A detector failure only degrades this one frame to "no smile".
        let detection = match detector.detect(&frame) {
            Ok(detection) => detection,
            Err(e) => {
                log::warn!("Detection failed for this frame: {}", e);
                Detection::default()
            }
        };

        let action = session.advance(detection.smile_present);
        let (term_cols, term_rows) = crossterm::terminal::size().unwrap_or((80, 24));

        match action {
            Action::CaptureNow => {
                // The overlay was drawn on earlier frames, never into the
                // pixel data, so this frame is clean by construction.
                match sink.save(&frame) {
                    Ok(path) => {
                        log::info!("Photo saved: {}", path.display());
                        session.record_save(true);
                    }
                    Err(e) => {
                        log::error!("Photo save failed: {}", e);
                        session.record_save(false);
                    }
                }
                if banner_shown {
                    ui::clear_banner(&mut stdout, term_cols, term_rows)?;
                    banner_shown = false;
                }
            }
            Action::ShowCountdown(stage) => {
                ui::render_countdown(&mut stdout, stage, term_cols, term_rows)?;
                banner_shown = true;
            }
            Action::ShowMessage => {
                ui::render_message(&mut stdout, term_cols, term_rows)?;
                banner_shown = true;
            }
            Action::None => {
                if banner_shown {
                    ui::clear_banner(&mut stdout, term_cols, term_rows)?;
                    banner_shown = false;
                }
            }
        }

        let text = status.format(session, detection.faces.len(), detection.smile_present);
        status.render(&mut stdout, &text, term_cols, term_rows)?;

        // Pace to the camera's frame rate; the capture thread keeps its own
        // cadence, we just avoid spinning between frames.
        let elapsed = tick_started.elapsed();
        if elapsed < frame_interval {
            std::thread::sleep(frame_interval - elapsed);
        }
    }
}
