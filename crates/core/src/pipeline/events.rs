use std::time::Duration;

use crate::detection::domain::observation::Observation;

/// One detection completion, marshaled as a discrete message onto the
/// serialized update context.
///
/// Detector errors are collapsed to an empty observation list before the
/// event is posted, so every completed cycle produces exactly one event.
#[derive(Clone, Debug)]
pub struct DetectionEvent {
    /// Detection sequence number assigned when the frame passed the gate.
    pub seq: u64,
    pub observations: Vec<Observation>,
    /// Wall time the detector spent on this frame.
    pub elapsed: Duration,
}
