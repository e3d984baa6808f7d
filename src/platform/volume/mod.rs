// System volume control
// One actuator per target OS, selected once at startup

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
mod linux;

use crate::models::volume::{to_percent, VolumeResult};
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
use crate::models::volume::VolumeError;

/// Sets the system output level.
///
/// Implementations clamp to [0, 100], round to a whole percent and skip the
/// OS call when that percent is already applied.
pub trait VolumeActuator: Send {
    fn name(&self) -> &'static str;

    fn set_volume(&mut self, percent: f32) -> VolumeResult<()>;
}

/// Actuator that only remembers what it was asked to apply
#[derive(Debug, Default)]
pub struct NullVolume {
    last_applied: Option<u8>,
    calls: u64,
}

impl NullVolume {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_applied(&self) -> Option<u8> {
        self.last_applied
    }

    /// Number of distinct levels applied
    pub fn applied_count(&self) -> u64 {
        self.calls
    }
}

impl VolumeActuator for NullVolume {
    fn name(&self) -> &'static str {
        "null"
    }

    fn set_volume(&mut self, percent: f32) -> VolumeResult<()> {
        let level = to_percent(percent);
        if self.last_applied != Some(level) {
            self.last_applied = Some(level);
            self.calls += 1;
        }
        Ok(())
    }
}

/// Get the actuator for the current OS
pub fn get_volume_actuator() -> VolumeResult<Box<dyn VolumeActuator>> {
    #[cfg(target_os = "macos")]
    {
        Ok(Box::new(macos::MacOSVolume::new()))
    }

    #[cfg(target_os = "windows")]
    {
        Ok(Box::new(windows::WindowsVolume::new()?))
    }

    #[cfg(target_os = "linux")]
    {
        Ok(Box::new(linux::LinuxVolume::new()))
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        Err(VolumeError::NotSupported)
    }
}
