//! Camera types and errors.

use std::fmt;
use std::time::Instant;

/// Bytes per pixel for the RGB frames this crate works with.
pub const RGB_BYTES_PER_PIXEL: usize = 3;

/// Information about an available camera device.
#[derive(Debug, Clone)]
pub struct CameraInfo {
    /// Device index for selection
    pub index: u32,
    /// Human-readable device name
    pub name: String,
    /// Device description
    pub description: String,
}

impl fmt::Display for CameraInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.index, self.name, self.description)
    }
}

/// Capture resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// 320x240 - fast, low detection quality
    pub const LOW: Resolution = Resolution {
        width: 320,
        height: 240,
    };

    /// 640x480 - balanced, recommended for face detection
    pub const MEDIUM: Resolution = Resolution {
        width: 640,
        height: 480,
    };

    /// 1280x720 - best photo quality, slower detection
    pub const HIGH: Resolution = Resolution {
        width: 1280,
        height: 720,
    };
}

impl Default for Resolution {
    fn default() -> Self {
        Self::MEDIUM
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A captured camera frame in row-major RGB.
///
/// Dimensions are fixed for the lifetime of a capture session.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw pixel data, `width * height * 3` bytes
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// When the frame was captured
    pub timestamp: Instant,
}

impl Frame {
    /// Convert to a row-major grayscale buffer using integer BT.601 luminance.
    pub fn to_grayscale(&self) -> Vec<u8> {
        self.data
            .chunks_exact(RGB_BYTES_PER_PIXEL)
            .map(|px| {
                let r = u32::from(px[0]);
                let g = u32::from(px[1]);
                let b = u32::from(px[2]);
                ((299 * r + 587 * g + 114 * b) / 1000) as u8
            })
            .collect()
    }

    /// Mirror the frame horizontally (selfie view).
    pub fn mirror_horizontal(&mut self) {
        let width = self.width as usize;
        let bpp = RGB_BYTES_PER_PIXEL;
        for row in self.data.chunks_exact_mut(width * bpp) {
            for x in 0..width / 2 {
                let left = x * bpp;
                let right = (width - 1 - x) * bpp;
                for i in 0..bpp {
                    row.swap(left + i, right + i);
                }
            }
        }
    }
}

/// Settings for opening a camera.
#[derive(Debug, Clone)]
pub struct CameraSettings {
    /// Camera device index
    pub device_index: u32,
    /// Requested resolution (actual may vary)
    pub resolution: Resolution,
    /// Requested FPS (actual may vary)
    pub fps: u32,
    /// Mirror frames horizontally for display
    pub mirror: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device_index: 0,
            resolution: Resolution::default(),
            fps: 30,
            mirror: false,
        }
    }
}

/// Errors that can occur during camera operations.
#[derive(Debug)]
pub enum CameraError {
    /// Failed to query camera devices
    QueryFailed(String),
    /// Camera device not found at the given index
    DeviceNotFound(u32),
    /// Failed to open the camera
    OpenFailed(String),
    /// Camera permission denied by the OS
    PermissionDenied,
    /// Failed to start the video stream
    StreamFailed(String),
    /// Capture thread is already running
    AlreadyRunning,
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::QueryFailed(msg) => write!(f, "Failed to query cameras: {}", msg),
            CameraError::DeviceNotFound(index) => {
                write!(
                    f,
                    "Camera device {} not found. Run 'smilecam list-cameras' to see available devices",
                    index
                )
            }
            CameraError::OpenFailed(msg) => write!(f, "Failed to open camera: {}", msg),
            CameraError::PermissionDenied => {
                write!(
                    f,
                    "Camera permission denied. Grant camera access to your terminal in the system privacy settings"
                )
            }
            CameraError::StreamFailed(msg) => write!(f, "Failed to start camera stream: {}", msg),
            CameraError::AlreadyRunning => write!(f, "Capture thread is already running"),
        }
    }
}

impl std::error::Error for CameraError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(data: Vec<u8>, width: u32, height: u32) -> Frame {
        Frame {
            data,
            width,
            height,
            timestamp: Instant::now(),
        }
    }

    #[test]
    fn test_camera_info_display() {
        let info = CameraInfo {
            index: 0,
            name: "Test Camera".to_string(),
            description: "Built-in".to_string(),
        };
        assert_eq!(format!("{}", info), "[0] Test Camera (Built-in)");
    }

    #[test]
    fn test_resolution_display() {
        assert_eq!(format!("{}", Resolution::MEDIUM), "640x480");
    }

    #[test]
    fn test_settings_default() {
        let settings = CameraSettings::default();
        assert_eq!(settings.device_index, 0);
        assert_eq!(settings.resolution, Resolution::MEDIUM);
        assert_eq!(settings.fps, 30);
        assert!(!settings.mirror);
    }

    #[test]
    fn test_grayscale_primaries() {
        // BT.601 weights: R=0.299, G=0.587, B=0.114
        let f = frame(vec![255, 0, 0, 0, 255, 0, 0, 0, 255], 3, 1);
        assert_eq!(f.to_grayscale(), vec![76, 149, 29]);
    }

    #[test]
    fn test_grayscale_white_and_black() {
        let f = frame(vec![255, 255, 255, 0, 0, 0], 2, 1);
        assert_eq!(f.to_grayscale(), vec![255, 0]);
    }

    #[test]
    fn test_mirror_horizontal_2x1() {
        let mut f = frame(vec![1, 2, 3, 4, 5, 6], 2, 1);
        f.mirror_horizontal();
        assert_eq!(f.data, vec![4, 5, 6, 1, 2, 3]);
    }

    #[test]
    fn test_mirror_horizontal_3x2() {
        let mut f = frame(
            vec![
                1, 1, 1, 2, 2, 2, 3, 3, 3, //
                4, 4, 4, 5, 5, 5, 6, 6, 6,
            ],
            3,
            2,
        );
        f.mirror_horizontal();
        assert_eq!(
            f.data,
            vec![
                3, 3, 3, 2, 2, 2, 1, 1, 1, //
                6, 6, 6, 5, 5, 5, 4, 4, 4,
            ]
        );
    }

    #[test]
    fn test_mirror_horizontal_single_pixel() {
        let mut f = frame(vec![1, 2, 3], 1, 1);
        f.mirror_horizontal();
        assert_eq!(f.data, vec![1, 2, 3]);
    }

    #[test]
    fn test_camera_error_display() {
        assert!(format!("{}", CameraError::DeviceNotFound(5)).contains("5"));
        assert!(format!("{}", CameraError::PermissionDenied).contains("permission denied"));
        assert_eq!(
            format!("{}", CameraError::StreamFailed("test".to_string())),
            "Failed to start camera stream: test"
        );
    }
}
