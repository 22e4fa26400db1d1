use std::time::Duration;

use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum CaptureError {
    /// No capture device could be acquired. Fatal at startup; the embedding
    /// application reports it and does not start the pipeline.
    #[error("capture device unavailable: {0}")]
    DeviceUnavailable(String),
    /// A single capture attempt failed. Transient; the capture loop logs it
    /// and retries on the next cadence tick.
    #[error("frame capture failed: {0}")]
    Failed(String),
}

/// Fixed format negotiated when a source opens.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptureFormat {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

impl CaptureFormat {
    /// Interval between consecutive frames at the negotiated rate.
    pub fn frame_interval(&self) -> Duration {
        debug_assert!(self.fps > 0.0, "capture rate must be positive");
        Duration::from_secs_f64(1.0 / self.fps)
    }
}

/// Produces the live frame stream.
///
/// Implementations own the device session (camera, file, synthetic
/// generator); the pipeline owns pacing and calls `next_frame` once per
/// cadence tick. `Ok(None)` signals a clean end of stream.
pub trait FrameSource: Send {
    /// Acquires the device and returns the negotiated format.
    fn open(&mut self) -> Result<CaptureFormat, CaptureError>;

    /// Produces the next frame, or `None` when the stream has ended.
    fn next_frame(&mut self) -> Result<Option<Frame>, CaptureError>;

    /// Releases the device session.
    fn close(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_frame_interval_at_30fps() {
        let format = CaptureFormat {
            width: 640,
            height: 480,
            fps: 30.0,
        };
        assert_relative_eq!(format.frame_interval().as_secs_f64(), 1.0 / 30.0);
    }

    #[test]
    fn test_device_unavailable_message() {
        let err = CaptureError::DeviceUnavailable("no front camera".to_string());
        assert_eq!(
            err.to_string(),
            "capture device unavailable: no front camera"
        );
    }
}
