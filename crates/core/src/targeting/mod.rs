pub mod aggregator;
pub mod overlay;
pub mod target;
