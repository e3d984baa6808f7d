// Data models for volume levels and actuator errors

use serde::{Deserialize, Serialize};

/// A smoothed output level in [0, 100], tagged with the mapper update that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeLevel {
    pub percent: f32,
    pub frame: u64,
}

impl VolumeLevel {
    /// Whole percent the actuators apply
    pub fn rounded(&self) -> u8 {
        to_percent(self.percent)
    }
}

/// Clamp to [0, 100] and round to a whole percent
pub fn to_percent(level: f32) -> u8 {
    if !level.is_finite() {
        return 0;
    }
    level.clamp(0.0, 100.0).round() as u8
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum VolumeError {
    #[error("Volume command failed: {0}")]
    CommandFailed(String),

    #[error("Audio endpoint error: {0}")]
    EndpointError(String),

    #[error("Volume control not supported on this platform")]
    NotSupported,
}

pub type VolumeResult<T> = Result<T, VolumeError>;
