pub mod convergence;
pub mod easing;
pub mod indicator;
pub mod trigger;
