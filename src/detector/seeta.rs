//! Face detection backed by the `rustface` crate (SeetaFace engine),
//! combined with the mouth-band smile heuristic.

use std::path::Path;

use crate::camera::Frame;

use super::smile::{is_smiling, SmileParams};
use super::{Detection, DetectorError, FaceRect, SmileDetector};

/// Detector that finds faces with SeetaFace and checks each one for a smile.
///
/// The SeetaFace model is loaded from disk once at construction. Detection
/// runs on a grayscale copy of the frame; internal detector scratch state
/// does not affect results across frames.
pub struct SeetaSmileDetector {
    detector: Box<dyn rustface::Detector>,
    params: SmileParams,
}

impl SeetaSmileDetector {
    /// Load the SeetaFace model from `path` and build a detector around it.
    ///
    /// # Errors
    /// * `DetectorError::ModelLoadFailed` - model file missing or malformed
    pub fn from_model_path(
        path: &Path,
        min_face_size: u32,
        params: SmileParams,
    ) -> Result<Self, DetectorError> {
        let bytes = std::fs::read(path).map_err(|e| DetectorError::ModelLoadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let model = rustface::read_model(std::io::Cursor::new(bytes)).map_err(|e| {
            DetectorError::ModelLoadFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            }
        })?;

        let mut detector = rustface::create_detector_with_model(model);
        detector.set_min_face_size(min_face_size);
        detector.set_score_thresh(2.0);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        Ok(Self { detector, params })
    }
}

impl SmileDetector for SeetaSmileDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Detection, DetectorError> {
        let expected = frame.width as usize * frame.height as usize * 3;
        if frame.data.len() != expected {
            return Err(DetectorError::InvalidFrame {
                expected,
                actual: frame.data.len(),
            });
        }

        let gray = frame.to_grayscale();
        let image = rustface::ImageData::new(&gray, frame.width, frame.height);
        let faces: Vec<FaceRect> = self
            .detector
            .detect(&image)
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceRect {
                    x: bbox.x(),
                    y: bbox.y(),
                    width: bbox.width(),
                    height: bbox.height(),
                }
            })
            .collect();

        let smile_present = faces
            .iter()
            .any(|face| is_smiling(&gray, frame.width, frame.height, face, &self.params));

        Ok(Detection {
            faces,
            smile_present,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_file_errors() {
        let result = SeetaSmileDetector::from_model_path(
            Path::new("/nonexistent/seeta_model.bin"),
            40,
            SmileParams::default(),
        );
        match result {
            Err(DetectorError::ModelLoadFailed { path, .. }) => {
                assert!(path.contains("seeta_model.bin"));
            }
            other => panic!("expected ModelLoadFailed, got {:?}", other.err()),
        }
    }
}
