// macOS volume control through AppleScript

use super::VolumeActuator;
use crate::models::volume::{to_percent, VolumeError, VolumeResult};
use std::process::Command;
use tracing::debug;

pub struct MacOSVolume {
    last_applied: Option<u8>,
}

impl MacOSVolume {
    pub fn new() -> Self {
        Self { last_applied: None }
    }
}

impl VolumeActuator for MacOSVolume {
    fn name(&self) -> &'static str {
        "osascript"
    }

    fn set_volume(&mut self, percent: f32) -> VolumeResult<()> {
        let level = to_percent(percent);
        if self.last_applied == Some(level) {
            return Ok(());
        }

        let script = format!("set volume output volume {}", level);
        let output = Command::new("osascript")
            .args(["-e", &script])
            .output()
            .map_err(|e| VolumeError::CommandFailed(format!("osascript: {}", e)))?;

        if !output.status.success() {
            return Err(VolumeError::CommandFailed(format!(
                "osascript exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        debug!("Output volume set to {}", level);
        self.last_applied = Some(level);
        Ok(())
    }
}
