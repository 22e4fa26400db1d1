use std::time::Instant;

use crate::animation::convergence::ConvergenceAnimator;
use crate::shared::geometry::Point;
use crate::targeting::target::Target;

/// Handles the external trigger: reset the indicator to the launch anchor
/// and restart convergence toward the current target.
///
/// Firing is idempotent; mid-flight re-fires simply restart the cycle from
/// the anchor toward the latest known target.
pub struct TriggerController {
    anchor: Point,
}

impl TriggerController {
    pub fn new(anchor: Point) -> Self {
        Self { anchor }
    }

    /// Host layout changed; future launches start from the new anchor.
    pub fn set_anchor(&mut self, anchor: Point) {
        self.anchor = anchor;
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Snap the indicator to the anchor, then converge toward `target` if
    /// one has ever been observed. With no target yet, the indicator stays
    /// at the anchor until the first detection lands.
    pub fn fire(&self, animator: &mut ConvergenceAnimator, target: Option<Target>, now: Instant) {
        animator.launch(self.anchor, now);
        if let Some(target) = target {
            animator.retarget(target.point, now);
        }
    }
}
