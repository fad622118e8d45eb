//! Mouth-region smile heuristic.
//!
//! A smile widens the dark band between the lips. The heuristic scans the
//! mouth band of a face region in a grayscale frame, finds the widest
//! contiguous run of dark pixels per row, and relates the best run to the
//! face width. Wide run, smile; narrow run, neutral face. This is a crude
//! stand-in for a trained smile classifier, but it is deterministic and a
//! pure function of the pixels, which is all the capture sequence needs.

use super::FaceRect;

/// Tuning for the smile heuristic.
#[derive(Debug, Clone, Copy)]
pub struct SmileParams {
    /// Minimum dark-run width relative to face width to call a smile.
    pub ratio_threshold: f32,
    /// A pixel counts as dark below `mean * darkness` of the mouth band.
    pub darkness: f32,
}

impl Default for SmileParams {
    fn default() -> Self {
        Self {
            ratio_threshold: 0.28,
            darkness: 0.66,
        }
    }
}

/// Widest dark-band width in the face's mouth region, relative to face width.
///
/// Returns 0.0 for degenerate regions (face outside the frame, zero-sized
/// face, empty mouth band).
pub fn smile_ratio(
    gray: &[u8],
    frame_width: u32,
    frame_height: u32,
    face: &FaceRect,
    params: &SmileParams,
) -> f32 {
    if face.width == 0 || face.height == 0 {
        return 0.0;
    }

    // Mouth band: lower third of the face, middle two thirds horizontally.
    // Clamped to the frame so partially visible faces degrade gracefully.
    let band_top = face.y + (face.height * 2 / 3) as i32;
    let band_bottom = face.y + face.height as i32;
    let band_left = face.x + (face.width / 6) as i32;
    let band_right = face.x + (face.width * 5 / 6) as i32;

    let x0 = band_left.max(0) as u32;
    let x1 = (band_right.max(0) as u32).min(frame_width);
    let y0 = band_top.max(0) as u32;
    let y1 = (band_bottom.max(0) as u32).min(frame_height);
    if x0 >= x1 || y0 >= y1 {
        return 0.0;
    }

    // Mean brightness of the band sets the darkness cutoff, so lighting
    // changes shift the cutoff with them.
    let mut sum: u64 = 0;
    for y in y0..y1 {
        let row = (y * frame_width) as usize;
        for x in x0..x1 {
            sum += u64::from(gray[row + x as usize]);
        }
    }
    let pixels = u64::from(x1 - x0) * u64::from(y1 - y0);
    let mean = (sum / pixels) as f32;
    let cutoff = (mean * params.darkness) as u8;

    let mut best_run: u32 = 0;
    for y in y0..y1 {
        let row = (y * frame_width) as usize;
        let mut run: u32 = 0;
        for x in x0..x1 {
            if gray[row + x as usize] <= cutoff {
                run += 1;
                best_run = best_run.max(run);
            } else {
                run = 0;
            }
        }
    }

    best_run as f32 / face.width as f32
}

/// Whether the mouth band of `face` reads as a smile.
pub fn is_smiling(
    gray: &[u8],
    frame_width: u32,
    frame_height: u32,
    face: &FaceRect,
    params: &SmileParams,
) -> bool {
    smile_ratio(gray, frame_width, frame_height, face, params) >= params.ratio_threshold
}
