// Windows volume control through the Core Audio endpoint volume interface

use super::VolumeActuator;
use crate::models::volume::{to_percent, VolumeError, VolumeResult};
use tracing::debug;
use windows::Win32::Media::Audio::Endpoints::IAudioEndpointVolume;
use windows::Win32::Media::Audio::{eConsole, eRender, IMMDeviceEnumerator, MMDeviceEnumerator};
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CLSCTX_ALL, COINIT_MULTITHREADED,
};

pub struct WindowsVolume {
    endpoint: IAudioEndpointVolume,
    last_applied: Option<u8>,
}

// The endpoint is only touched from the thread that owns the actuator, and
// COM is initialized multithreaded.
unsafe impl Send for WindowsVolume {}

impl WindowsVolume {
    pub fn new() -> VolumeResult<Self> {
        unsafe {
            // S_FALSE (already initialized) is fine
            let _ = CoInitializeEx(None, COINIT_MULTITHREADED);

            let enumerator: IMMDeviceEnumerator =
                CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL).map_err(endpoint_error)?;
            let device = enumerator
                .GetDefaultAudioEndpoint(eRender, eConsole)
                .map_err(endpoint_error)?;
            let endpoint: IAudioEndpointVolume =
                device.Activate(CLSCTX_ALL, None).map_err(endpoint_error)?;

            Ok(Self {
                endpoint,
                last_applied: None,
            })
        }
    }
}

fn endpoint_error(e: windows::core::Error) -> VolumeError {
    VolumeError::EndpointError(e.to_string())
}

impl VolumeActuator for WindowsVolume {
    fn name(&self) -> &'static str {
        "core-audio"
    }

    fn set_volume(&mut self, percent: f32) -> VolumeResult<()> {
        let level = to_percent(percent);
        if self.last_applied == Some(level) {
            return Ok(());
        }

        unsafe {
            self.endpoint
                .SetMasterVolumeLevelScalar(f32::from(level) / 100.0, std::ptr::null())
                .map_err(endpoint_error)?;
        }

        debug!("Master volume set to {}%", level);
        self.last_applied = Some(level);
        Ok(())
    }
}
