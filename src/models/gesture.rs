// Data models for gesture recognition results and errors

use serde::{Deserialize, Serialize};
use std::fmt;

// ==============================================================================
// Gesture Type
// ==============================================================================

/// Every label the engine can produce. Exactly one per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureType {
    Pinch,
    OpenHand,
    Peace,
    ThumbsUp,
    Rock,
    OkSign,
    Palm,
    SwipeLeft,
    SwipeRight,
    SwipeUp,
    SwipeDown,
    Point,
    Fist,
    Unknown,
}

impl GestureType {
    pub const ALL: [GestureType; 14] = [
        GestureType::Pinch,
        GestureType::OpenHand,
        GestureType::Peace,
        GestureType::ThumbsUp,
        GestureType::Rock,
        GestureType::OkSign,
        GestureType::Palm,
        GestureType::SwipeLeft,
        GestureType::SwipeRight,
        GestureType::SwipeUp,
        GestureType::SwipeDown,
        GestureType::Point,
        GestureType::Fist,
        GestureType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GestureType::Pinch => "pinch",
            GestureType::OpenHand => "open_hand",
            GestureType::Peace => "peace",
            GestureType::ThumbsUp => "thumbs_up",
            GestureType::Rock => "rock",
            GestureType::OkSign => "ok_sign",
            GestureType::Palm => "palm",
            GestureType::SwipeLeft => "swipe_left",
            GestureType::SwipeRight => "swipe_right",
            GestureType::SwipeUp => "swipe_up",
            GestureType::SwipeDown => "swipe_down",
            GestureType::Point => "point",
            GestureType::Fist => "fist",
            GestureType::Unknown => "unknown",
        }
    }

    pub fn is_swipe(&self) -> bool {
        matches!(
            self,
            GestureType::SwipeLeft
                | GestureType::SwipeRight
                | GestureType::SwipeUp
                | GestureType::SwipeDown
        )
    }
}

impl fmt::Display for GestureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==============================================================================
// Recognition (per-frame engine output)
// ==============================================================================

/// A frame's label plus how consistently it has been seen recently
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recognition {
    pub gesture: GestureType,
    /// Share of the recent label window that agrees with `gesture`, in (0, 1]
    pub confidence: f32,
}

impl Recognition {
    pub fn is_confident(&self, threshold: f32) -> bool {
        self.confidence >= threshold
    }
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GestureError {
    #[error("Expected {expected} landmarks, got {actual}")]
    InvalidLandmarkCount { expected: usize, actual: usize },

    #[error("Landmark {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    #[error("Invalid frame size: {width}x{height}")]
    InvalidFrameSize { width: f32, height: f32 },

    #[error("Invalid control distance: {0}")]
    InvalidDistance(f32),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type GestureResult<T> = Result<T, GestureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gesture_serializes_snake_case() {
        let json = serde_json::to_string(&GestureType::ThumbsUp).unwrap();
        assert_eq!(json, "\"thumbs_up\"");
        let back: GestureType = serde_json::from_str("\"swipe_left\"").unwrap();
        assert_eq!(back, GestureType::SwipeLeft);
    }

    #[test]
    fn test_as_str_matches_serde() {
        for gesture in GestureType::ALL {
            let json = serde_json::to_string(&gesture).unwrap();
            assert_eq!(json.trim_matches('"'), gesture.as_str());
            assert_eq!(gesture.to_string(), gesture.as_str());
        }
    }

    #[test]
    fn test_is_swipe() {
        let swipes: Vec<_> = GestureType::ALL.iter().filter(|g| g.is_swipe()).collect();
        assert_eq!(swipes.len(), 4);
        assert!(!GestureType::Palm.is_swipe());
    }

    #[test]
    fn test_recognition_confidence_threshold() {
        let r = Recognition {
            gesture: GestureType::Fist,
            confidence: 0.8,
        };
        assert!(r.is_confident(0.7));
        assert!(r.is_confident(0.8));
        assert!(!r.is_confident(0.9));
    }
}
