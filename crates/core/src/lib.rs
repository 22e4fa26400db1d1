//! Core library for live face following: frame capture, gated async
//! detection, target aggregation, and indicator convergence.

pub mod animation;
pub mod capture;
pub mod detection;
pub mod pipeline;
pub mod shared;
pub mod targeting;
