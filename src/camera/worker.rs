//! Background capture thread.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat as NokhwaFrameFormat, RequestedFormat,
    RequestedFormatType,
};
use nokhwa::Camera;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use super::types::{CameraError, CameraSettings, Frame, Resolution};

/// Commands sent to the capture thread.
pub enum WorkerCommand {
    Stop,
}

/// Run the capture loop until stopped.
///
/// Reports the actual stream resolution and frame rate (or the open error)
/// back through `info_tx` once, then keeps the newest decoded frame in
/// `latest`.
pub fn run_worker(
    settings: CameraSettings,
    latest: Arc<Mutex<Option<Frame>>>,
    stop: Arc<AtomicBool>,
    rx: Receiver<WorkerCommand>,
    info_tx: Sender<Result<(Resolution, u32), CameraError>>,
) {
    let mut camera = match open_with_fallback(&settings) {
        Ok(cam) => cam,
        Err(e) => {
            let _ = info_tx.send(Err(e));
            return;
        }
    };

    if let Err(e) = camera.open_stream() {
        let _ = info_tx.send(Err(CameraError::StreamFailed(e.to_string())));
        return;
    }

    let res = camera.resolution();
    let actual = Resolution {
        width: res.width(),
        height: res.height(),
    };
    let _ = info_tx.send(Ok((actual, camera.frame_rate())));

    while !stop.load(Ordering::Relaxed) {
        if let Ok(WorkerCommand::Stop) = rx.try_recv() {
            break;
        }

        if let Ok(raw) = camera.frame() {
            // decode_image handles MJPEG/YUYV/NV12 conversion to RGB.
            // A frame that fails to decode is dropped; the next one usually
            // decodes fine.
            if let Ok(decoded) = raw.decode_image::<RgbFormat>() {
                let resolution = raw.resolution();
                let mut frame = Frame {
                    data: decoded.into_raw(),
                    width: resolution.width(),
                    height: resolution.height(),
                    timestamp: Instant::now(),
                };
                if settings.mirror {
                    frame.mirror_horizontal();
                }
                if let Ok(mut buf) = latest.lock() {
                    *buf = Some(frame);
                }
            }
        }

        // Keep the stop flag responsive without spinning.
        thread::sleep(Duration::from_millis(1));
    }

    let _ = camera.stop_stream();
}

/// Open the camera, trying formats in order of preference.
fn open_with_fallback(settings: &CameraSettings) -> Result<Camera, CameraError> {
    let index = CameraIndex::Index(settings.device_index);
    let resolution =
        nokhwa::utils::Resolution::new(settings.resolution.width, settings.resolution.height);

    // MJPEG first (widely supported, cheap to stream), then YUYV (the
    // uncompressed staple on UVC webcams), then whatever the device offers.
    let attempts: Vec<RequestedFormat> = vec![
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            resolution,
            NokhwaFrameFormat::MJPEG,
            settings.fps,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            resolution,
            NokhwaFrameFormat::YUYV,
            settings.fps,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution),
    ];

    let mut last_error = None;
    for requested in attempts {
        match Camera::new(index.clone(), requested) {
            Ok(cam) => return Ok(cam),
            Err(e) => last_error = Some(e),
        }
    }

    let e = last_error.expect("format attempt list is non-empty");
    let msg = e.to_string().to_lowercase();
    if msg.contains("permission") || msg.contains("denied") || msg.contains("access") {
        Err(CameraError::PermissionDenied)
    } else {
        Err(CameraError::OpenFailed(e.to_string()))
    }
}
