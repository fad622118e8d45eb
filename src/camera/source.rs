//! Camera handle and public capture API.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use super::types::{CameraError, CameraSettings, Frame, Resolution};
use super::worker::{run_worker, WorkerCommand};

/// Handle to a webcam capture session.
///
/// `open()` validates the device; `start()` spawns the background thread
/// that keeps the latest decoded frame available through `latest_frame()`.
/// The stream is opened inside the thread because the underlying camera
/// handle is not `Send` on every backend.
pub struct CameraSource {
    /// Latest captured frame (shared with the capture thread)
    latest: Arc<Mutex<Option<Frame>>>,
    /// Capture thread handle
    worker: Option<JoinHandle<()>>,
    /// Command channel to the capture thread
    command_tx: Option<Sender<WorkerCommand>>,
    /// Stop signal for the capture thread
    stop_signal: Arc<AtomicBool>,
    /// Settings the source was opened with
    settings: CameraSettings,
    /// Actual stream resolution, known once started
    actual_resolution: Option<Resolution>,
    /// Actual stream FPS, known once started
    actual_fps: Option<u32>,
}

impl std::fmt::Debug for CameraSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSource")
            .field("settings", &self.settings)
            .field("is_running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl CameraSource {
    /// Open a camera with the given settings.
    ///
    /// # Errors
    /// * `CameraError::DeviceNotFound` - no device at the requested index
    pub fn open(settings: CameraSettings) -> Result<Self, CameraError> {
        let devices = super::list_devices()?;
        if !devices.iter().any(|d| d.index == settings.device_index) {
            return Err(CameraError::DeviceNotFound(settings.device_index));
        }

        Ok(Self {
            latest: Arc::new(Mutex::new(None)),
            worker: None,
            command_tx: None,
            stop_signal: Arc::new(AtomicBool::new(false)),
            settings,
            actual_resolution: None,
            actual_fps: None,
        })
    }

    /// Settings the source was opened with.
    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Actual stream resolution. `None` before `start()`. May differ from
    /// the requested resolution if the device does not support it exactly.
    pub fn actual_resolution(&self) -> Option<Resolution> {
        self.actual_resolution
    }

    /// Actual stream frame rate. `None` before `start()`.
    pub fn actual_fps(&self) -> Option<u32> {
        self.actual_fps
    }

    /// Start the background capture thread.
    ///
    /// Blocks until the thread reports that the stream opened (or failed).
    ///
    /// # Errors
    /// * `CameraError::AlreadyRunning` - capture already started
    /// * `CameraError::PermissionDenied` - OS denied camera access
    /// * `CameraError::OpenFailed` / `CameraError::StreamFailed` - device
    ///   could not be opened or streamed
    pub fn start(&mut self) -> Result<(), CameraError> {
        if self.is_running() {
            return Err(CameraError::AlreadyRunning);
        }

        self.stop_signal.store(false, Ordering::SeqCst);

        let (tx, rx) = mpsc::channel();
        self.command_tx = Some(tx);

        let latest = Arc::clone(&self.latest);
        let stop = Arc::clone(&self.stop_signal);
        let settings = self.settings.clone();
        let (info_tx, info_rx) = mpsc::channel::<Result<(Resolution, u32), CameraError>>();

        let handle = std::thread::spawn(move || {
            run_worker(settings, latest, stop, rx, info_tx);
        });
        self.worker = Some(handle);

        match info_rx.recv() {
            Ok(Ok((res, fps))) => {
                self.actual_resolution = Some(res);
                self.actual_fps = Some(fps);
                Ok(())
            }
            Ok(Err(e)) => {
                self.join_worker();
                Err(e)
            }
            Err(_) => {
                self.join_worker();
                Err(CameraError::StreamFailed(
                    "capture thread terminated unexpectedly".to_string(),
                ))
            }
        }
    }

    /// Stop the capture thread and wait for it to finish.
    pub fn stop(&mut self) {
        if let Some(tx) = self.command_tx.take() {
            let _ = tx.send(WorkerCommand::Stop);
        }
        self.join_worker();
    }

    /// The most recent captured frame, if any has arrived yet.
    pub fn latest_frame(&self) -> Option<Frame> {
        let buffer = self.latest.lock().ok()?;
        buffer.clone()
    }

    /// Whether the capture thread is alive.
    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn join_worker(&mut self) {
        self.stop_signal.store(true, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        self.stop();
    }
}
