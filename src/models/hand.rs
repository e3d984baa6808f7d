// Data models for hand observations delivered by the perception service

use crate::models::gesture::{GestureError, GestureResult};
use serde::{Deserialize, Serialize};

/// Number of landmarks in every hand observation
pub const LANDMARK_COUNT: usize = 21;

// ==============================================================================
// Landmarks
// ==============================================================================

/// A normalized hand keypoint. `x` and `y` are in [0, 1] relative to the frame,
/// `y` grows downward. Depth is carried through but never used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// MediaPipe Hand Landmark indices (21 total)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexFingerMcp = 5,
    IndexFingerPip = 6,
    IndexFingerDip = 7,
    IndexFingerTip = 8,
    MiddleFingerMcp = 9,
    MiddleFingerPip = 10,
    MiddleFingerDip = 11,
    MiddleFingerTip = 12,
    RingFingerMcp = 13,
    RingFingerPip = 14,
    RingFingerDip = 15,
    RingFingerTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmark {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// The five digits, each with the tip and reference joint used for the
/// raised test. The thumb has no pip, so its IP joint stands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const NON_THUMB: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    pub fn tip(self) -> HandLandmark {
        match self {
            Finger::Thumb => HandLandmark::ThumbTip,
            Finger::Index => HandLandmark::IndexFingerTip,
            Finger::Middle => HandLandmark::MiddleFingerTip,
            Finger::Ring => HandLandmark::RingFingerTip,
            Finger::Pinky => HandLandmark::PinkyTip,
        }
    }

    pub fn pip(self) -> HandLandmark {
        match self {
            Finger::Thumb => HandLandmark::ThumbIp,
            Finger::Index => HandLandmark::IndexFingerPip,
            Finger::Middle => HandLandmark::MiddleFingerPip,
            Finger::Ring => HandLandmark::RingFingerPip,
            Finger::Pinky => HandLandmark::PinkyPip,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    // MediaPipe labels hands "Left" / "Right"
    #[serde(alias = "Left")]
    Left,
    #[serde(alias = "Right")]
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Handedness::Left => "left",
            Handedness::Right => "right",
        }
    }
}

// ==============================================================================
// Hand Observation (one per frame)
// ==============================================================================

/// One frame's landmarks for a single detected hand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandObservation {
    pub landmarks: Vec<Landmark>,
    pub handedness: Handedness,
}

impl HandObservation {
    pub fn new(landmarks: Vec<Landmark>, handedness: Handedness) -> GestureResult<Self> {
        let observation = Self {
            landmarks,
            handedness,
        };
        observation.validate()?;
        Ok(observation)
    }

    /// Check cardinality and finiteness. Deserialized observations bypass
    /// `new`, so the controller calls this on every frame.
    pub fn validate(&self) -> GestureResult<()> {
        if self.landmarks.len() != LANDMARK_COUNT {
            return Err(GestureError::InvalidLandmarkCount {
                expected: LANDMARK_COUNT,
                actual: self.landmarks.len(),
            });
        }

        if let Some(index) = self.landmarks.iter().position(|l| !l.is_finite()) {
            return Err(GestureError::NonFiniteCoordinate { index });
        }

        Ok(())
    }

    /// Landmark lookup. Callers must have validated the observation.
    pub fn landmark(&self, which: HandLandmark) -> Landmark {
        self.landmarks[which.index()]
    }

    /// Mean position of all landmarks, in normalized coordinates
    pub fn centroid(&self) -> (f32, f32) {
        let n = self.landmarks.len().max(1) as f32;
        let (sx, sy) = self
            .landmarks
            .iter()
            .fold((0.0f32, 0.0f32), |(sx, sy), l| (sx + l.x, sy + l.y));
        (sx / n, sy / n)
    }
}

// ==============================================================================
// Frame geometry
// ==============================================================================

/// A hand-center position in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Frame dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: f32,
    pub height: f32,
}

impl FrameSize {
    pub fn new(width: f32, height: f32) -> GestureResult<Self> {
        let frame = Self { width, height };
        frame.validate()?;
        Ok(frame)
    }

    pub fn validate(&self) -> GestureResult<()> {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        if !ok(self.width) || !ok(self.height) {
            return Err(GestureError::InvalidFrameSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Scale a normalized position into pixel space
    pub fn to_pixels(&self, (x, y): (f32, f32)) -> Point2 {
        Point2::new(x * self.width, y * self.height)
    }
}

// ==============================================================================
// Test fixtures
// ==============================================================================


#[cfg(test)]
mod tests {
    use super::fixtures::HandBuilder;
    use super::*;

    #[test]
    fn test_fixture_is_well_formed() {
        let hand = HandBuilder::new().build();
        assert!(hand.validate().is_ok());
        assert_eq!(hand.landmarks.len(), LANDMARK_COUNT);
        assert_eq!(hand.landmark(HandLandmark::IndexFingerMcp).x, 0.45);
        assert_eq!(hand.landmark(HandLandmark::PinkyPip).x, 0.60);
    }

    #[test]
    fn test_wrong_landmark_count_rejected() {
        let err = HandObservation::new(vec![Landmark::new(0.5, 0.5); 20], Handedness::Left)
            .unwrap_err();
        assert!(matches!(
            err,
            GestureError::InvalidLandmarkCount {
                expected: 21,
                actual: 20
            }
        ));
    }

    #[test]
    fn test_non_finite_coordinate_rejected() {
        let mut landmarks = vec![Landmark::new(0.5, 0.5); LANDMARK_COUNT];
        landmarks[7].y = f32::NAN;
        let err = HandObservation::new(landmarks, Handedness::Right).unwrap_err();
        assert!(matches!(err, GestureError::NonFiniteCoordinate { index: 7 }));
    }

    #[test]
    fn test_deserialize_without_depth() {
        let mut json = String::from("{\"handedness\":\"left\",\"landmarks\":[");
        let points: Vec<String> = (0..LANDMARK_COUNT)
            .map(|_| "{\"x\":0.5,\"y\":0.25}".to_string())
            .collect();
        json.push_str(&points.join(","));
        json.push_str("]}");

        let hand: HandObservation = serde_json::from_str(&json).unwrap();
        assert!(hand.validate().is_ok());
        assert_eq!(hand.handedness, Handedness::Left);
        assert_eq!(hand.landmarks[3].z, 0.0);
    }

    #[test]
    fn test_deserialize_mediapipe_handedness() {
        assert_eq!(serde_json::from_str::<Handedness>("\"Right\"").unwrap(), Handedness::Right);
        assert_eq!(serde_json::from_str::<Handedness>("\"Left\"").unwrap(), Handedness::Left);
        assert_eq!(serde_json::from_str::<Handedness>("\"right\"").unwrap(), Handedness::Right);
        assert!(serde_json::from_str::<Handedness>("\"RIGHT\"").is_err());

        // Serialized form stays lowercase
        assert_eq!(serde_json::to_string(&Handedness::Right).unwrap(), "\"right\"");
        assert_eq!(Handedness::Left.as_str(), "left");

        let mut hand = HandBuilder::new().build();
        hand.handedness = Handedness::Left;
        let json = serde_json::to_string(&hand).unwrap().replace("\"left\"", "\"Left\"");
        let back: HandObservation = serde_json::from_str(&json).unwrap();
        assert_eq!(back.handedness, Handedness::Left);
    }

    #[test]
    fn test_centroid_and_pixels() {
        let hand =
            HandObservation::new(vec![Landmark::new(0.25, 0.5); LANDMARK_COUNT], Handedness::Right)
                .unwrap();
        let frame = FrameSize::new(640.0, 480.0).unwrap();
        let center = frame.to_pixels(hand.centroid());
        assert!((center.x - 160.0).abs() < 1e-3);
        assert!((center.y - 240.0).abs() < 1e-3);
    }

    #[test]
    fn test_frame_size_validation() {
        assert!(FrameSize::new(0.0, 480.0).is_err());
        assert!(FrameSize::new(640.0, f32::INFINITY).is_err());
        assert!(FrameSize::new(1.0, 1.0).is_ok());
    }
}
