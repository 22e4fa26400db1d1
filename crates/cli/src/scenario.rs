use std::fs;
use std::path::Path;

use serde::Deserialize;

use facefollow_core::detection::domain::observation::Observation;

/// One detection cycle's worth of scripted face boxes.
///
/// `faces` may be empty or absent to script a cycle where nothing is seen.
/// Coordinates are normalized to [0, 1] in sensor orientation, the same
/// convention the detectors report in.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioFrame {
    #[serde(default)]
    pub faces: Vec<FaceBox>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FaceBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub frames: Vec<ScenarioFrame>,
}

/// Reads a scenario file into the script the scripted detector replays.
pub fn load(path: &Path) -> Result<Vec<Vec<Observation>>, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read scenario file {}: {e}", path.display()))?;
    let scenario: Scenario = serde_json::from_str(&json)
        .map_err(|e| format!("Malformed scenario file {}: {e}", path.display()))?;
    if scenario.frames.is_empty() {
        return Err(format!("Scenario file {} contains no frames", path.display()).into());
    }

    Ok(scenario
        .frames
        .into_iter()
        .map(|frame| {
            frame
                .faces
                .into_iter()
                .map(|b| Observation::new(b.min_x, b.min_y, b.max_x, b.max_y))
                .collect()
        })
        .collect())
}
