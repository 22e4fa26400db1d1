use crate::detection::domain::face_detector::{DetectionError, FaceDetector};
use crate::detection::domain::observation::Observation;
use crate::shared::frame::Frame;

/// Plays back a canned sequence of observation lists, one list per call,
/// cycling when the script runs out.
///
/// Lets demos and tests drive the pipeline through exact detection
/// outcomes, including empty cycles, without a real detector.
pub struct ScriptedDetector {
    script: Vec<Vec<Observation>>,
    calls: usize,
}

impl ScriptedDetector {
    pub fn new(script: Vec<Vec<Observation>>) -> Result<Self, &'static str> {
        if script.is_empty() {
            return Err("script must contain at least one step");
        }
        Ok(Self { script, calls: 0 })
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl FaceDetector for ScriptedDetector {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<Observation>, DetectionError> {
        let step = self.script[self.calls % self.script.len()].clone();
        self.calls += 1;
        Ok(step)
    }
}
