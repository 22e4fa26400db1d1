pub mod face_detector;
pub mod observation;
