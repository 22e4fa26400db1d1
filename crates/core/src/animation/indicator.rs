use crate::shared::geometry::Point;

/// Where the indicator is in its trigger-to-arrival life.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationPhase {
    /// Never launched; nothing is rendered.
    IdleHidden,
    /// Snapped to the launch anchor, fully visible, no motion yet.
    Launched,
    /// Easing toward the current target.
    Converging,
    /// Convergence finished; position holds until a new target or trigger.
    Arrived,
}

/// Render snapshot of the indicator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndicatorState {
    pub position: Point,
    pub opacity: f64,
    /// Identity of the motion driving the position. Bumps whenever a new
    /// motion supersedes the previous one, so renderers never blend two
    /// animations of the same indicator.
    pub cycle: u64,
    pub phase: AnimationPhase,
}
