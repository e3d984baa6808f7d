// Data models for hand observations, gestures, and volume output

pub mod gesture;
pub mod hand;
pub mod volume;
