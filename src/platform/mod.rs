// Platform layer - OS volume control and per-user data location

use std::io;
use std::path::PathBuf;

pub mod volume;

pub use volume::{get_volume_actuator, NullVolume, VolumeActuator};

/// Directory holding config.json and session reports
pub fn get_data_directory() -> io::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| io::Error::new(io::ErrorKind::NotFound, "Could not determine home directory"))?;

    let mut path = PathBuf::from(home);
    path.push(".hand_gesture_volume");
    Ok(path)
}
