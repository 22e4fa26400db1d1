use crate::detection::domain::observation::Observation;
use crate::shared::geometry::{Point, ScreenRect, Viewport};
use crate::targeting::overlay::OverlaySink;
use crate::targeting::target::Target;

/// Turns one detection completion into at most one authoritative target.
///
/// The first observation in the list is the primary face; no score-based
/// re-ranking. Its normalized region maps to screen space with the axes
/// swapped: the Y-extent midpoint becomes screen X and the X-extent
/// midpoint becomes screen Y, each scaled by the matching view dimension.
/// The swap corrects the sensor-to-display rotation of a portrait-mounted
/// front camera feed and must stay exactly as written.
pub struct TargetAggregator {
    viewport: Viewport,
    overlay: Box<dyn OverlaySink>,
}

impl TargetAggregator {
    pub fn new(viewport: Viewport, overlay: Box<dyn OverlaySink>) -> Self {
        Self { viewport, overlay }
    }

    /// Host layout changed; future targets scale to the new size.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Processes the observations of detection cycle `seq`.
    ///
    /// Every cycle clears the overlay first. An empty list yields no
    /// target and leaves any in-progress convergence untouched upstream;
    /// a non-empty list yields the primary face's screen point and one
    /// overlay rectangle per observation.
    pub fn ingest(&mut self, seq: u64, observations: &[Observation]) -> Option<Target> {
        self.overlay.clear();
        let primary = observations.first()?;

        let rects: Vec<ScreenRect> = observations.iter().map(|o| self.to_screen_rect(o)).collect();
        self.overlay.present(&rects);

        Some(Target {
            point: Point::new(
                primary.mid_y() * self.viewport.width,
                primary.mid_x() * self.viewport.height,
            ),
            seq,
        })
    }

    fn to_screen_rect(&self, observation: &Observation) -> ScreenRect {
        ScreenRect {
            x: observation.min_y() * self.viewport.width,
            y: observation.min_x() * self.viewport.height,
            width: observation.height() * self.viewport.width,
            height: observation.width() * self.viewport.height,
        }
    }
}
