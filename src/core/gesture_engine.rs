// Gesture fusion - combines static pose and motion into one label per frame

use crate::core::config::GestureConfig;
use crate::core::motion_classifier::MotionClassifier;
use crate::core::pose_classifier::PoseClassifier;
use crate::core::ring_buffer::RingBuffer;
use crate::models::gesture::{GestureResult, GestureType, Recognition};
use crate::models::hand::{FrameSize, HandObservation, Point2};
use tracing::trace;

/// Precedence, highest first: static pose cascade, swipe, pinch/open fallback.
///
/// A held pose is never overridden by drift in the position history.
pub struct GestureEngine {
    pose: PoseClassifier,
    motion: MotionClassifier,
    labels: RingBuffer<GestureType>,
    confidence_threshold: f32,
}

impl GestureEngine {
    pub fn new(config: &GestureConfig) -> GestureResult<Self> {
        Ok(Self {
            pose: PoseClassifier::new(config)?,
            motion: MotionClassifier::new(config)?,
            labels: RingBuffer::new(config.history_length),
            confidence_threshold: config.confidence_threshold,
        })
    }

    /// Produce this frame's label, then record the hand center and the label.
    ///
    /// Invalid input fails before any history is touched. On success the
    /// position history is updated whichever branch produced the label.
    pub fn recognize(
        &mut self,
        observation: &HandObservation,
        hand_center: Point2,
        frame: FrameSize,
    ) -> GestureResult<Recognition> {
        observation.validate()?;
        frame.validate()?;

        let gesture = match self.pose.match_static_pose(observation) {
            Some(pose) => pose,
            None => self
                .motion
                .classify_swipe(hand_center, frame)
                .unwrap_or_else(|| self.pose.classify_fallback(observation)),
        };

        self.motion.record(hand_center);
        self.labels.push(gesture);

        let agreeing = self.labels.iter().filter(|g| *g == gesture).count();
        let confidence = agreeing as f32 / self.labels.len() as f32;

        trace!(
            "Recognized {} (confidence {:.2}) at ({:.1}, {:.1})",
            gesture,
            confidence,
            hand_center.x,
            hand_center.y
        );

        Ok(Recognition {
            gesture,
            confidence,
        })
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    pub fn motion_classifier(&self) -> &MotionClassifier {
        &self.motion
    }

    /// Drop position and label history
    pub fn reset(&mut self) {
        self.motion.reset();
        self.labels.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::hand::fixtures::{neutral_hand, HandBuilder};
    use crate::models::hand::{Finger, Landmark};

    fn engine() -> GestureEngine {
        GestureEngine::new(&GestureConfig::default()).unwrap()
    }

    fn unit_frame() -> FrameSize {
        FrameSize::new(1.0, 1.0).unwrap()
    }

    #[test]
    fn test_swipe_left_sequence() {
        let mut engine = engine();
        let hand = neutral_hand();

        let labels: Vec<GestureType> = (0..5)
            .map(|i| {
                let center = Point2::new(0.8 - 0.15 * i as f32, 0.5);
                engine.recognize(&hand, center, unit_frame()).unwrap().gesture
            })
            .collect();

        // Frames 0-2 lack the three history samples a swipe needs
        assert_eq!(&labels[..3], &[GestureType::Unknown; 3]);
        assert_eq!(labels[3], GestureType::SwipeLeft);
        assert_eq!(labels[4], GestureType::SwipeLeft);
    }

    #[test]
    fn test_static_pose_preempts_swipe() {
        let mut engine = engine();
        let fist = HandBuilder::new().build();

        for i in 0..5 {
            let center = Point2::new(0.9 - 0.2 * i as f32, 0.5);
            let r = engine.recognize(&fist, center, unit_frame()).unwrap();
            assert_eq!(r.gesture, GestureType::Fist);
        }
        // History still advanced on every frame
        assert_eq!(engine.motion_classifier().history().len(), 5);
    }

    #[test]
    fn test_swipe_preempts_fallback() {
        let mut engine = engine();
        let open = HandBuilder::new().raise(Finger::Middle).build();

        for _ in 0..3 {
            let r = engine.recognize(&open, Point2::new(0.5, 0.5), unit_frame()).unwrap();
            assert_eq!(r.gesture, GestureType::OpenHand);
        }
        let r = engine.recognize(&open, Point2::new(0.5, 0.8), unit_frame()).unwrap();
        assert_eq!(r.gesture, GestureType::SwipeDown);
    }

    #[test]
    fn test_confidence_tracks_label_agreement() {
        let mut engine = engine();
        let fist = HandBuilder::new().build();
        let point = HandBuilder::new().raise(Finger::Index).build();
        let center = Point2::new(0.5, 0.5);

        let r = engine.recognize(&fist, center, unit_frame()).unwrap();
        assert_eq!(r.confidence, 1.0);

        for _ in 0..3 {
            engine.recognize(&fist, center, unit_frame()).unwrap();
        }
        let r = engine.recognize(&point, center, unit_frame()).unwrap();
        assert_eq!(r.gesture, GestureType::Point);
        assert!((r.confidence - 0.2).abs() < 1e-6);
        assert!(!r.is_confident(engine.confidence_threshold()));

        let r = engine.recognize(&fist, center, unit_frame()).unwrap();
        assert!((r.confidence - 0.8).abs() < 1e-6);
        assert!(r.is_confident(engine.confidence_threshold()));
    }

    #[test]
    fn test_invalid_input_leaves_history_untouched() {
        let mut engine = engine();
        let bad = HandObservation {
            landmarks: vec![Landmark::new(0.5, 0.5); 3],
            handedness: crate::models::hand::Handedness::Right,
        };
        assert!(engine.recognize(&bad, Point2::new(0.5, 0.5), unit_frame()).is_err());

        let bad_frame = FrameSize {
            width: 0.0,
            height: 1.0,
        };
        assert!(engine
            .recognize(&neutral_hand(), Point2::new(0.5, 0.5), bad_frame)
            .is_err());

        assert!(engine.motion_classifier().history().is_empty());
    }

    #[test]
    fn test_reset_forgets_motion() {
        let mut engine = engine();
        let hand = neutral_hand();
        for _ in 0..3 {
            engine.recognize(&hand, Point2::new(0.9, 0.5), unit_frame()).unwrap();
        }
        engine.reset();
        let r = engine.recognize(&hand, Point2::new(0.1, 0.5), unit_frame()).unwrap();
        assert_eq!(r.gesture, GestureType::Unknown);
    }
}
