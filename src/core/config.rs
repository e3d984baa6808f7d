use crate::models::gesture::{GestureError, GestureResult, GestureType};
use crate::platform;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub volume: VolumeConfig,
    pub gesture: GestureConfig,
    pub frame: FrameConfig,
    /// Save a session report when the run ends
    pub enable_statistics: bool,
    /// Debug-level logging
    pub debug_mode: bool,
}

/// Distance-to-volume mapping
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VolumeConfig {
    /// Control distance mapped to 0%
    pub min_distance: f32,
    /// Control distance mapped to 100%
    pub max_distance: f32,
    /// Number of distance samples averaged
    pub smoothing_window: usize,
    /// Multiplier on the normalized distance (0.1-2.0)
    pub sensitivity: f32,
    /// Minimum change, in percentage points, before a new level is emitted
    pub min_change_threshold: f32,
}

/// Gesture recognition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GestureConfig {
    pub enabled_gestures: Vec<GestureType>,
    /// Label agreement needed for a gesture to count as stable (0.0-1.0)
    pub confidence_threshold: f32,
    /// Frames of hand-center and label history
    pub history_length: usize,
    /// Displacement, as a fraction of the frame, that counts as a swipe
    pub swipe_threshold: f32,
    /// History samples needed before swipes are considered
    pub min_gesture_frames: usize,
    /// Thumb-index distance below which the hand is pinched
    pub pinch_threshold: f32,
    /// Thumb-index distance above which the hand is open
    pub open_threshold: f32,
    pub swipe_normalization: SwipeNormalization,
}

/// How swipe displacement is made resolution independent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeNormalization {
    /// Both axes divided by the frame width
    FrameWidth,
    /// x by width, y by height
    PerAxis,
}

/// Frame dimensions used to place the hand center in pixel space
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FrameConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            volume: VolumeConfig::default(),
            gesture: GestureConfig::default(),
            frame: FrameConfig::default(),
            enable_statistics: true,
            debug_mode: false,
        }
    }
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            min_distance: 0.02,
            max_distance: 0.3,
            smoothing_window: 5,
            sensitivity: 1.0,
            min_change_threshold: 2.0,
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            enabled_gestures: GestureType::ALL.to_vec(),
            confidence_threshold: 0.7,
            history_length: 5,
            swipe_threshold: 0.1,
            min_gesture_frames: 3,
            pinch_threshold: 0.05,
            open_threshold: 0.15,
            swipe_normalization: SwipeNormalization::FrameWidth,
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

fn invalid(msg: String) -> GestureError {
    GestureError::InvalidConfig(msg)
}

fn check_non_negative(name: &str, value: f32) -> GestureResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(format!(
            "Invalid {}: {}. Must be a finite value >= 0",
            name, value
        )));
    }
    Ok(())
}

impl VolumeConfig {
    pub fn validate(&self) -> GestureResult<()> {
        check_non_negative("min_distance", self.min_distance)?;
        check_non_negative("max_distance", self.max_distance)?;

        if self.max_distance <= self.min_distance {
            return Err(invalid(format!(
                "Invalid distance range: {} - {}. max_distance must exceed min_distance",
                self.min_distance, self.max_distance
            )));
        }

        if self.smoothing_window == 0 {
            return Err(invalid("Smoothing window must be at least 1".to_string()));
        }

        if !(0.1..=2.0).contains(&self.sensitivity) {
            return Err(invalid(format!(
                "Invalid sensitivity: {}. Must be between 0.1 and 2.0",
                self.sensitivity
            )));
        }

        check_non_negative("min_change_threshold", self.min_change_threshold)
    }
}

impl GestureConfig {
    pub fn validate(&self) -> GestureResult<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(invalid(format!(
                "Invalid confidence threshold: {}. Must be between 0.0 and 1.0",
                self.confidence_threshold
            )));
        }

        if self.history_length == 0 {
            return Err(invalid("History length must be at least 1".to_string()));
        }

        if self.min_gesture_frames == 0 || self.min_gesture_frames > self.history_length {
            return Err(invalid(format!(
                "Invalid min gesture frames: {}. Must be between 1 and history length ({})",
                self.min_gesture_frames, self.history_length
            )));
        }

        check_non_negative("swipe_threshold", self.swipe_threshold)?;
        check_non_negative("pinch_threshold", self.pinch_threshold)?;
        check_non_negative("open_threshold", self.open_threshold)?;

        if self.open_threshold <= self.pinch_threshold {
            return Err(invalid(format!(
                "Invalid pinch/open thresholds: {} / {}. Open must exceed pinch",
                self.pinch_threshold, self.open_threshold
            )));
        }

        Ok(())
    }
}

impl FrameConfig {
    pub fn validate(&self) -> GestureResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(invalid(format!(
                "Invalid frame size: {}x{}. Both dimensions must be positive",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from the default location, creating it with defaults if missing
    pub fn load() -> GestureResult<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load configuration from `path`, creating it with defaults if missing
    pub fn load_from(path: &Path) -> GestureResult<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&contents)?;
            config.validate()?;
            info!("Loaded configuration from {}", path.display());
            Ok(config)
        } else {
            warn!(
                "No configuration at {}, writing defaults",
                path.display()
            );
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> GestureResult<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> GestureResult<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    pub fn validate(&self) -> GestureResult<()> {
        self.volume.validate()?;
        self.gesture.validate()?;
        self.frame.validate()
    }

    /// Reset to default configuration
    pub fn reset() -> GestureResult<Self> {
        let config = Self::default();
        config.save()?;
        Ok(config)
    }

    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.volume.sensitivity = sensitivity.clamp(0.1, 2.0);
    }

    pub fn set_confidence_threshold(&mut self, threshold: f32) {
        self.gesture.confidence_threshold = threshold.clamp(0.0, 1.0);
    }

    fn get_config_path() -> GestureResult<PathBuf> {
        let mut path = platform::get_data_directory()?;
        path.push("config.json");
        Ok(path)
    }
}
