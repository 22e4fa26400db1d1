use crate::detection::domain::face_detector::{DetectionError, FaceDetector};
use crate::detection::domain::observation::Observation;
use crate::shared::frame::Frame;

/// Minimum peak brightness for a frame to contain a blob at all.
const MIN_PEAK_LUMA: f64 = 64.0;
/// Pixels at or above this fraction of the peak belong to the blob.
const PEAK_FRACTION: f64 = 0.8;

/// Toy brightest-region detector: finds the bounding box of the brightest
/// pixels in the frame and reports it as a single observation.
///
/// Not a face algorithm. It exists so the demo pipeline runs end-to-end on
/// synthetic frames while honoring the real detector contract, including
/// genuinely empty results on dark frames.
pub struct BlobDetector;

impl BlobDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BlobDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FaceDetector for BlobDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Observation>, DetectionError> {
        if frame.data().is_empty() {
            return Err(DetectionError::MalformedFrame(
                "empty pixel buffer".to_string(),
            ));
        }
        let view = frame.as_ndarray();
        let (rows, cols, channels) = view.dim();

        let luma = |row: usize, col: usize| -> f64 {
            let mut sum = 0.0;
            for c in 0..channels {
                sum += view[[row, col, c]] as f64;
            }
            sum / channels as f64
        };

        let mut peak = 0.0_f64;
        for row in 0..rows {
            for col in 0..cols {
                peak = peak.max(luma(row, col));
            }
        }
        if peak < MIN_PEAK_LUMA {
            return Ok(Vec::new());
        }

        let threshold = peak * PEAK_FRACTION;
        let (mut min_row, mut min_col) = (rows, cols);
        let (mut max_row, mut max_col) = (0_usize, 0_usize);
        for row in 0..rows {
            for col in 0..cols {
                if luma(row, col) >= threshold {
                    min_row = min_row.min(row);
                    min_col = min_col.min(col);
                    max_row = max_row.max(row);
                    max_col = max_col.max(col);
                }
            }
        }

        let (w, h) = (cols as f64, rows as f64);
        Ok(vec![Observation::new(
            min_col as f64 / w,
            min_row as f64 / h,
            (max_col + 1) as f64 / w,
            (max_row + 1) as f64 / h,
        )])
    }
}
