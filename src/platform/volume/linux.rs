// Linux volume control through ALSA's amixer against the PulseAudio device

use super::VolumeActuator;
use crate::models::volume::{to_percent, VolumeError, VolumeResult};
use std::process::Command;
use tracing::debug;

pub struct LinuxVolume {
    last_applied: Option<u8>,
}

impl LinuxVolume {
    pub fn new() -> Self {
        Self { last_applied: None }
    }
}

impl VolumeActuator for LinuxVolume {
    fn name(&self) -> &'static str {
        "amixer"
    }

    fn set_volume(&mut self, percent: f32) -> VolumeResult<()> {
        let level = to_percent(percent);
        if self.last_applied == Some(level) {
            return Ok(());
        }

        let output = Command::new("amixer")
            .args(["-D", "pulse", "sset", "Master", &format!("{}%", level)])
            .output()
            .map_err(|e| VolumeError::CommandFailed(format!("amixer: {}", e)))?;

        if !output.status.success() {
            return Err(VolumeError::CommandFailed(format!(
                "amixer exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        debug!("amixer set Master to {}%", level);
        self.last_applied = Some(level);
        Ok(())
    }
}
