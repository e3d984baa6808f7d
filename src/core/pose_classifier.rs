// Static hand-pose classification - an ordered cascade of landmark predicates
//
// Raw predicates overlap (a peace sign also has a fist-like ring and pinky),
// so rules are evaluated in a fixed order and the first match wins.

use crate::core::config::GestureConfig;
use crate::core::geometry::distance;
use crate::models::gesture::{GestureResult, GestureType};
use crate::models::hand::{Finger, HandLandmark, HandObservation, Handedness};

/// Thumb tip must be at least this far from its IP joint for a thumbs-up
const THUMB_EXTENSION_MIN: f32 = 0.05;

/// Distance thresholds shared by the rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseThresholds {
    pub pinch: f32,
    pub open: f32,
}

impl Default for PoseThresholds {
    fn default() -> Self {
        Self {
            pinch: 0.05,
            open: 0.15,
        }
    }
}

type PosePredicate = fn(&HandObservation, &PoseThresholds) -> bool;

/// Static rules in precedence order. The pinch/open fallback is not listed
/// here because the fusion engine runs the swipe check before it.
const CASCADE: [(GestureType, PosePredicate); 7] = [
    (GestureType::ThumbsUp, is_thumbs_up),
    (GestureType::Peace, is_peace),
    (GestureType::Rock, is_rock),
    (GestureType::OkSign, is_ok_sign),
    (GestureType::Point, is_pointing),
    (GestureType::Palm, is_palm),
    (GestureType::Fist, is_fist),
];

/// Stateless classifier over a single observation
#[derive(Debug, Clone)]
pub struct PoseClassifier {
    thresholds: PoseThresholds,
    enabled: Vec<GestureType>,
}

impl Default for PoseClassifier {
    fn default() -> Self {
        Self {
            thresholds: PoseThresholds::default(),
            enabled: GestureType::ALL.to_vec(),
        }
    }
}

impl PoseClassifier {
    pub fn new(config: &GestureConfig) -> GestureResult<Self> {
        config.validate()?;
        Ok(Self {
            thresholds: PoseThresholds {
                pinch: config.pinch_threshold,
                open: config.open_threshold,
            },
            enabled: config.enabled_gestures.clone(),
        })
    }

    /// Full cascade: static rules, then the pinch/open fallback
    pub fn classify_pose(&self, observation: &HandObservation) -> GestureResult<GestureType> {
        observation.validate()?;
        Ok(self
            .match_static_pose(observation)
            .unwrap_or_else(|| self.classify_fallback(observation)))
    }

    /// First enabled static rule that matches. Assumes a validated observation.
    pub fn match_static_pose(&self, observation: &HandObservation) -> Option<GestureType> {
        CASCADE
            .iter()
            .filter(|(gesture, _)| self.enabled.contains(gesture))
            .find(|(_, predicate)| predicate(observation, &self.thresholds))
            .map(|(gesture, _)| *gesture)
    }

    /// Thumb-index distance decides between pinch, open hand and unknown
    pub fn classify_fallback(&self, observation: &HandObservation) -> GestureType {
        let d = thumb_index_distance(observation);
        let gesture = if d < self.thresholds.pinch {
            GestureType::Pinch
        } else if d > self.thresholds.open {
            GestureType::OpenHand
        } else {
            GestureType::Unknown
        };

        if self.enabled.contains(&gesture) {
            gesture
        } else {
            GestureType::Unknown
        }
    }
}

// ==============================================================================
// Finger state
// ==============================================================================

/// Non-thumb fingers are raised when the tip is above the pip (smaller y).
/// The thumb folds sideways, so it is tested on x, mirrored by handedness.
pub fn is_finger_raised(observation: &HandObservation, finger: Finger) -> bool {
    let tip = observation.landmark(finger.tip());
    let pip = observation.landmark(finger.pip());

    match finger {
        Finger::Thumb => match observation.handedness {
            Handedness::Right => tip.x < pip.x,
            Handedness::Left => tip.x > pip.x,
        },
        _ => tip.y < pip.y,
    }
}

/// Raised digits, thumb included (0-5)
pub fn count_raised_fingers(observation: &HandObservation) -> u8 {
    let thumb = is_finger_raised(observation, Finger::Thumb) as u8;
    thumb + raised_non_thumb(observation, &Finger::NON_THUMB)
}

/// Thumb tip to index tip, the pinch measure and the volume control distance
pub fn thumb_index_distance(observation: &HandObservation) -> f32 {
    distance(
        observation.landmark(HandLandmark::ThumbTip),
        observation.landmark(HandLandmark::IndexFingerTip),
    )
}

fn raised_non_thumb(observation: &HandObservation, fingers: &[Finger]) -> u8 {
    fingers
        .iter()
        .filter(|f| is_finger_raised(observation, **f))
        .count() as u8
}

/// Exactly `up` raised and every other non-thumb finger lowered
fn only_raised(observation: &HandObservation, up: &[Finger]) -> bool {
    Finger::NON_THUMB
        .iter()
        .all(|f| is_finger_raised(observation, *f) == up.contains(f))
}

// ==============================================================================
// Rules
// ==============================================================================

fn is_thumbs_up(observation: &HandObservation, _: &PoseThresholds) -> bool {
    let tip = observation.landmark(HandLandmark::ThumbTip);
    let ip = observation.landmark(HandLandmark::ThumbIp);
    let middle_mcp = observation.landmark(HandLandmark::MiddleFingerMcp);

    tip.y < ip.y && tip.y < middle_mcp.y && distance(tip, ip) > THUMB_EXTENSION_MIN
}

fn is_peace(observation: &HandObservation, _: &PoseThresholds) -> bool {
    only_raised(observation, &[Finger::Index, Finger::Middle])
}

fn is_rock(observation: &HandObservation, _: &PoseThresholds) -> bool {
    only_raised(observation, &[Finger::Index, Finger::Pinky])
}

fn is_ok_sign(observation: &HandObservation, thresholds: &PoseThresholds) -> bool {
    let others = raised_non_thumb(observation, &[Finger::Middle, Finger::Ring, Finger::Pinky]);
    thumb_index_distance(observation) < thresholds.pinch && others >= 2
}

fn is_pointing(observation: &HandObservation, _: &PoseThresholds) -> bool {
    only_raised(observation, &[Finger::Index])
}

fn is_palm(observation: &HandObservation, _: &PoseThresholds) -> bool {
    count_raised_fingers(observation) >= 4
}

fn is_fist(observation: &HandObservation, _: &PoseThresholds) -> bool {
    raised_non_thumb(observation, &Finger::NON_THUMB) == 0
}
