// Motion classification - detects directional swipes from hand-center history

use crate::core::config::{GestureConfig, SwipeNormalization};
use crate::core::ring_buffer::RingBuffer;
use crate::models::gesture::{GestureResult, GestureType};
use crate::models::hand::{FrameSize, Point2};

/// Swipe detector that owns the rolling hand-center history
#[derive(Debug, Clone)]
pub struct MotionClassifier {
    history: RingBuffer<Point2>,
    swipe_threshold: f32,
    min_samples: usize,
    normalization: SwipeNormalization,
    enabled: Vec<GestureType>,
}

impl MotionClassifier {
    pub fn new(config: &GestureConfig) -> GestureResult<Self> {
        config.validate()?;
        Ok(Self {
            history: RingBuffer::new(config.history_length),
            swipe_threshold: config.swipe_threshold,
            min_samples: config.min_gesture_frames,
            normalization: config.swipe_normalization,
            enabled: config
                .enabled_gestures
                .iter()
                .copied()
                .filter(GestureType::is_swipe)
                .collect(),
        })
    }

    /// Swipe implied by moving from the oldest retained center to `current`.
    /// Does not modify the history.
    pub fn classify_swipe(&self, current: Point2, frame: FrameSize) -> Option<GestureType> {
        let oldest = self.history.oldest()?;
        detect_swipe(
            current,
            oldest,
            self.history.len(),
            frame,
            self.swipe_threshold,
            self.min_samples,
            self.normalization,
        )
        .filter(|swipe| self.enabled.contains(swipe))
    }

    /// Append a center, evicting the oldest when full
    pub fn record(&mut self, center: Point2) {
        self.history.push(center);
    }

    pub fn history(&self) -> &RingBuffer<Point2> {
        &self.history
    }

    /// Forget all positions (e.g. when the hand leaves the frame)
    pub fn reset(&mut self) {
        self.history.clear();
    }
}

/// Classify the displacement `oldest -> current`.
///
/// Returns `None` when fewer than `min_samples` history entries exist, or
/// when neither axis clears `threshold` while strictly dominating the other.
/// A diagonal with |dx| == |dy| is therefore never a swipe.
pub fn detect_swipe(
    current: Point2,
    oldest: Point2,
    history_len: usize,
    frame: FrameSize,
    threshold: f32,
    min_samples: usize,
    normalization: SwipeNormalization,
) -> Option<GestureType> {
    if history_len < min_samples {
        return None;
    }

    let dx = (current.x - oldest.x) / frame.width;
    let dy = match normalization {
        SwipeNormalization::FrameWidth => (current.y - oldest.y) / frame.width,
        SwipeNormalization::PerAxis => (current.y - oldest.y) / frame.height,
    };

    if dx.abs() > threshold && dx.abs() > dy.abs() {
        return Some(if dx > 0.0 {
            GestureType::SwipeRight
        } else {
            GestureType::SwipeLeft
        });
    }

    // y grows downward
    if dy.abs() > threshold && dy.abs() > dx.abs() {
        return Some(if dy < 0.0 {
            GestureType::SwipeUp
        } else {
            GestureType::SwipeDown
        });
    }

    None
}
