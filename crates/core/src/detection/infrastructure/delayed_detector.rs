use std::thread;
use std::time::Duration;

use crate::detection::domain::face_detector::{DetectionError, FaceDetector};
use crate::detection::domain::observation::Observation;
use crate::shared::frame::Frame;

/// Decorator that adds fixed latency to every detection call.
///
/// Stands in for a slow real detector so the gate's drop-under-load
/// behavior can be exercised deterministically in demos and tests.
pub struct DelayedDetector {
    inner: Box<dyn FaceDetector>,
    delay: Duration,
}

impl DelayedDetector {
    pub fn new(inner: Box<dyn FaceDetector>, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

impl FaceDetector for DelayedDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Observation>, DetectionError> {
        thread::sleep(self.delay);
        self.inner.detect(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    struct FixedDetector {
        result: Vec<Observation>,
    }

    impl FaceDetector for FixedDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Observation>, DetectionError> {
            Ok(self.result.clone())
        }
    }

    struct BrokenDetector;

    impl FaceDetector for BrokenDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Observation>, DetectionError> {
            Err(DetectionError::Failed("broken".to_string()))
        }
    }

    fn frame() -> Frame {
        Frame::new(vec![0u8; 4 * 4 * 3], 4, 4, 3, 0, Instant::now())
    }

    #[test]
    fn test_delays_then_delegates() {
        let obs = Observation::new(0.1, 0.1, 0.5, 0.5);
        let inner = FixedDetector {
            result: vec![obs],
        };
        let mut detector = DelayedDetector::new(Box::new(inner), Duration::from_millis(20));

        let start = Instant::now();
        let result = detector.detect(&frame()).unwrap();
        assert!(start.elapsed() >= Duration::from_millis(20));
        assert_eq!(result, vec![obs]);
    }

    #[test]
    fn test_inner_errors_pass_through() {
        let mut detector = DelayedDetector::new(Box::new(BrokenDetector), Duration::from_millis(1));
        assert!(detector.detect(&frame()).is_err());
    }
}
