use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;

use crate::animation::convergence::{ConvergenceAnimator, DEFAULT_CONVERGENCE};
use crate::animation::easing;
use crate::animation::indicator::IndicatorState;
use crate::animation::trigger::TriggerController;
use crate::pipeline::events::DetectionEvent;
use crate::shared::geometry::{Point, Viewport};
use crate::targeting::aggregator::TargetAggregator;
use crate::targeting::overlay::OverlaySink;
use crate::targeting::target::{Target, TargetCell};

/// Configuration for a follower session.
pub struct FollowConfig {
    pub viewport: Viewport,
    pub anchor: Point,
    pub convergence: Duration,
    pub curve: fn(f64) -> f64,
}

impl FollowConfig {
    pub fn new(viewport: Viewport, anchor: Point) -> Self {
        Self {
            viewport,
            anchor,
            convergence: DEFAULT_CONVERGENCE,
            curve: easing::ease_in_out,
        }
    }
}

/// The serialized-context session: drains detection completions, maintains
/// the current target, and drives the indicator.
///
/// Every method runs on whichever single context owns the session; the
/// capture and detection threads never touch this state directly, they
/// only feed the event receiver.
pub struct FaceFollower {
    aggregator: TargetAggregator,
    animator: ConvergenceAnimator,
    trigger: TriggerController,
    target: TargetCell,
    events: Receiver<DetectionEvent>,
}

impl FaceFollower {
    pub fn new(
        config: FollowConfig,
        overlay: Box<dyn OverlaySink>,
        events: Receiver<DetectionEvent>,
    ) -> Self {
        Self {
            aggregator: TargetAggregator::new(config.viewport, overlay),
            animator: ConvergenceAnimator::new(config.convergence, config.curve),
            trigger: TriggerController::new(config.anchor),
            target: TargetCell::new(),
            events,
        }
    }

    /// Drain all pending completions and apply them in arrival order.
    /// Returns the number of events applied.
    pub fn process_events(&mut self, now: Instant) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.apply(event, now);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, event: DetectionEvent, now: Instant) {
        log::trace!(
            "detection cycle {} done in {:.1}ms, {} face(s)",
            event.seq,
            event.elapsed.as_secs_f64() * 1000.0,
            event.observations.len()
        );
        // An empty cycle clears the overlay inside the aggregator and
        // nothing else: the current target and any in-progress convergence
        // stay untouched.
        if let Some(target) = self.aggregator.ingest(event.seq, &event.observations) {
            self.target.replace(target);
            self.animator.retarget(target.point, now);
        }
    }

    /// External trigger: reset to the anchor and converge toward the
    /// latest known target.
    pub fn fire(&mut self, now: Instant) {
        self.trigger.fire(&mut self.animator, self.target.load(), now);
    }

    /// Advance the indicator animation and return its render snapshot.
    pub fn tick(&mut self, now: Instant) -> IndicatorState {
        self.animator.tick(now)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.aggregator.set_viewport(viewport);
    }

    pub fn set_anchor(&mut self, anchor: Point) {
        self.trigger.set_anchor(anchor);
    }

    pub fn current_target(&self) -> Option<Target> {
        self.target.load()
    }

    /// Shared handle onto the target cell, for readers on other contexts.
    pub fn target_cell(&self) -> TargetCell {
        self.target.clone()
    }

    pub fn indicator(&self) -> IndicatorState {
        self.animator.state()
    }
}
