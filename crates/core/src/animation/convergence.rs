use std::time::{Duration, Instant};

use crate::animation::easing;
use crate::animation::indicator::{AnimationPhase, IndicatorState};
use crate::shared::geometry::Point;

/// Fixed length of one convergence, matching the feel of the original
/// indicator animation.
pub const DEFAULT_CONVERGENCE: Duration = Duration::from_secs(3);

struct Motion {
    from: Point,
    to: Point,
    started: Instant,
}

/// Drives the indicator toward the current target with a single eased,
/// fixed-duration motion.
///
/// At most one motion is active at a time: `retarget` and `launch` cancel
/// whatever is in flight and start fresh, bumping the cycle identity.
/// Time is injected, so the animator is deterministic under test.
pub struct ConvergenceAnimator {
    duration: Duration,
    curve: fn(f64) -> f64,
    position: Point,
    opacity: f64,
    cycle: u64,
    phase: AnimationPhase,
    motion: Option<Motion>,
}

impl ConvergenceAnimator {
    pub fn new(duration: Duration, curve: fn(f64) -> f64) -> Self {
        Self {
            duration,
            curve,
            position: Point::new(0.0, 0.0),
            opacity: 0.0,
            cycle: 0,
            phase: AnimationPhase::IdleHidden,
            motion: None,
        }
    }

    /// Trigger entry: cancel any motion and snap to `from`, fully visible.
    pub fn launch(&mut self, from: Point, _now: Instant) {
        self.motion = None;
        self.position = from;
        self.opacity = 1.0;
        self.cycle += 1;
        self.phase = AnimationPhase::Launched;
    }

    /// Start or redirect convergence toward `to`.
    ///
    /// A motion already in flight is sampled at `now` and replaced, so the
    /// indicator continues from where it visibly is. Ignored while the
    /// indicator has never been launched; the target itself is recorded
    /// elsewhere and the next launch picks it up.
    pub fn retarget(&mut self, to: Point, now: Instant) {
        if self.phase == AnimationPhase::IdleHidden {
            return;
        }
        self.position = self.sample(now);
        self.motion = Some(Motion {
            from: self.position,
            to,
            started: now,
        });
        self.cycle += 1;
        self.phase = AnimationPhase::Converging;
    }

    /// Advance to `now` and return the render snapshot.
    pub fn tick(&mut self, now: Instant) -> IndicatorState {
        if let Some(motion) = &self.motion {
            let t = self.progress(motion, now);
            self.position = motion.from.lerp(motion.to, (self.curve)(t));
            if t >= 1.0 {
                self.motion = None;
                self.phase = AnimationPhase::Arrived;
            }
        }
        self.state()
    }

    pub fn state(&self) -> IndicatorState {
        IndicatorState {
            position: self.position,
            opacity: self.opacity,
            cycle: self.cycle,
            phase: self.phase,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.motion.is_some()
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    fn sample(&self, now: Instant) -> Point {
        match &self.motion {
            None => self.position,
            Some(motion) => {
                let t = self.progress(motion, now);
                motion.from.lerp(motion.to, (self.curve)(t))
            }
        }
    }

    fn progress(&self, motion: &Motion, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(motion.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}

impl Default for ConvergenceAnimator {
    fn default() -> Self {
        Self::new(DEFAULT_CONVERGENCE, easing::ease_in_out)
    }
}
