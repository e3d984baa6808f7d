pub mod core;
pub mod models;
pub mod platform;

pub use crate::core::config::Config;
pub use crate::core::controller::{FrameOutput, GestureController};
pub use crate::core::performance_monitor::{PerformanceMonitor, PerformanceSummary};
pub use crate::models::gesture::{GestureError, GestureResult, GestureType};
pub use crate::models::hand::HandObservation;
