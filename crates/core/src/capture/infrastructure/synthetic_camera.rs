use std::f64::consts::TAU;
use std::time::Instant;

use crate::capture::domain::frame_source::{CaptureError, CaptureFormat, FrameSource};
use crate::shared::frame::Frame;

const BACKGROUND_LUMA: u8 = 16;
const BLOB_LUMA: u8 = 235;

/// Deterministic in-memory frame source for demos and tests.
///
/// Paints a bright square blob over a dark background, orbiting the frame
/// center on an elliptical path, so downstream detectors always have
/// something to find and its true position is known exactly.
pub struct SyntheticCamera {
    format: CaptureFormat,
    blob_half: u32,
    orbit_frames: u64,
    next_index: u64,
    opened: bool,
}

impl SyntheticCamera {
    pub fn new(width: u32, height: u32, fps: f64) -> Self {
        Self {
            format: CaptureFormat {
                width,
                height,
                fps: fps.max(1.0),
            },
            blob_half: (width.min(height) / 10).max(2),
            orbit_frames: 120,
            next_index: 0,
            opened: false,
        }
    }

    /// Frames per full revolution of the blob.
    pub fn with_orbit_frames(mut self, frames: u64) -> Self {
        self.orbit_frames = frames.max(1);
        self
    }

    /// True blob center for a given capture index, in pixel coordinates.
    ///
    /// Exposed so demos and tests can compare detector output against
    /// ground truth.
    pub fn blob_center(&self, index: u64) -> (f64, f64) {
        let theta = TAU * (index % self.orbit_frames) as f64 / self.orbit_frames as f64;
        let (w, h) = (self.format.width as f64, self.format.height as f64);
        let margin = self.blob_half as f64 + 1.0;
        let rx = w / 2.0 - margin;
        let ry = h / 2.0 - margin;
        (w / 2.0 + rx * theta.cos(), h / 2.0 + ry * theta.sin())
    }

    fn paint(&self, index: u64) -> Vec<u8> {
        let (w, h) = (self.format.width as usize, self.format.height as usize);
        let mut data = vec![BACKGROUND_LUMA; w * h * 3];

        let (cx, cy) = self.blob_center(index);
        let half = self.blob_half as i64;
        let (cx, cy) = (cx.round() as i64, cy.round() as i64);

        for row in (cy - half).max(0)..(cy + half + 1).min(h as i64) {
            for col in (cx - half).max(0)..(cx + half + 1).min(w as i64) {
                let base = (row as usize * w + col as usize) * 3;
                data[base] = BLOB_LUMA;
                data[base + 1] = BLOB_LUMA;
                data[base + 2] = BLOB_LUMA;
            }
        }
        data
    }
}

impl FrameSource for SyntheticCamera {
    fn open(&mut self) -> Result<CaptureFormat, CaptureError> {
        if self.format.width == 0 || self.format.height == 0 {
            return Err(CaptureError::DeviceUnavailable(
                "synthetic camera requires a non-empty frame size".to_string(),
            ));
        }
        self.opened = true;
        Ok(self.format)
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
        if !self.opened {
            return Err(CaptureError::Failed("capture session not open".to_string()));
        }
        let index = self.next_index;
        self.next_index += 1;
        let frame = Frame::new(
            self.paint(index),
            self.format.width,
            self.format.height,
            3,
            index,
            Instant::now(),
        );
        Ok(Some(frame))
    }

    fn close(&mut self) {
        self.opened = false;
    }
}
