use thiserror::Error;

use crate::detection::domain::observation::Observation;
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum DetectionError {
    /// The frame could not be interpreted by the detector.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),
    /// The detector itself failed on an otherwise valid frame.
    #[error("detection failed: {0}")]
    Failed(String),
}

/// Domain interface for face detection.
///
/// Implementations may be stateful (e.g., tracking across frames),
/// hence `&mut self`. The pipeline treats a detector as a black box and
/// relies only on the observation list it returns; list order is the
/// detector's own, and index 0 is taken as the primary face.
///
/// A failed detection is recovered upstream as "no observations this
/// cycle"; it never halts the pipeline.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Observation>, DetectionError>;
}
