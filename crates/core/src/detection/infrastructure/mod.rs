pub mod blob_detector;
pub mod delayed_detector;
pub mod scripted_detector;
