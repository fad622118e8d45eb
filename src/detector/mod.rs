//! Face and smile detection.
//!
//! Detection is a pure function of the frame: no detector state survives
//! from one frame to the next, and the frame loop treats a per-frame
//! detection error as "no smile" rather than aborting. The controller only
//! consumes the boolean smile signal; the face regions feed the status
//! display.

mod seeta;
mod smile;

pub use seeta::SeetaSmileDetector;
pub use smile::{smile_ratio, SmileParams};

use std::fmt;

use crate::camera::Frame;

/// Bounding box of a detected face, in frame pixels.
///
/// Coordinates may be negative when a face is partially outside the frame;
/// consumers clamp to the frame bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Result of analyzing one frame.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    /// All detected face regions.
    pub faces: Vec<FaceRect>,
    /// Whether any detected face is smiling.
    pub smile_present: bool,
}

/// Pluggable per-frame detector.
///
/// Implementations must be pure with respect to the input frame: the same
/// frame always yields the same result.
pub trait SmileDetector {
    /// Detect faces in the frame and report whether any of them is smiling.
    fn detect(&mut self, frame: &Frame) -> Result<Detection, DetectorError>;
}

/// Errors that can occur while loading or running a detector.
#[derive(Debug)]
pub enum DetectorError {
    /// Failed to read the face detection model file
    ModelLoadFailed { path: String, message: String },
    /// Frame buffer does not match its declared dimensions
    InvalidFrame { expected: usize, actual: usize },
}

impl fmt::Display for DetectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectorError::ModelLoadFailed { path, message } => {
                write!(
                    f,
                    "Failed to load face detection model '{}': {}",
                    path, message
                )
            }
            DetectorError::InvalidFrame { expected, actual } => {
                write!(
                    f,
                    "Frame buffer size mismatch: expected {} bytes, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for DetectorError {}
