pub mod events;
pub mod face_follower;
pub mod frame_gate;
pub mod infrastructure;
