// Per-frame pipeline - observation in, gesture and volume out

use crate::core::config::Config;
use crate::core::gesture_engine::GestureEngine;
use crate::core::performance_monitor::PerformanceMonitor;
use crate::core::pose_classifier::{count_raised_fingers, thumb_index_distance};
use crate::core::session_report::SessionReport;
use crate::core::volume_mapper::VolumeMapper;
use crate::models::gesture::{GestureResult, GestureType};
use crate::models::hand::{FrameSize, HandObservation};
use crate::models::volume::VolumeLevel;
use crate::platform::volume::VolumeActuator;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What one frame produced. All optional fields are `None` on a frame with no hand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameOutput {
    pub frame: u64,
    pub gesture: Option<GestureType>,
    pub confidence: Option<f32>,
    pub fingers_raised: Option<u8>,
    /// Level emitted by the mapper this frame, if it cleared the gate
    pub volume: Option<VolumeLevel>,
}

pub struct GestureController {
    engine: GestureEngine,
    mapper: VolumeMapper,
    actuator: Box<dyn VolumeActuator>,
    monitor: Arc<PerformanceMonitor>,
    frame_size: FrameSize,
    session_id: Uuid,
    started_at: DateTime<Utc>,
    frames: u64,
    stable_gesture: Option<GestureType>,
    gesture_counts: BTreeMap<GestureType, u64>,
    volume_changes: u64,
    actuator_failures: u64,
}

impl GestureController {
    pub fn new(
        config: &Config,
        actuator: Box<dyn VolumeActuator>,
        monitor: Arc<PerformanceMonitor>,
    ) -> GestureResult<Self> {
        config.validate()?;

        let frame_size = FrameSize::new(config.frame.width as f32, config.frame.height as f32)?;
        info!(
            "Gesture controller ready: {}x{} frame, actuator {}",
            config.frame.width,
            config.frame.height,
            actuator.name()
        );

        Ok(Self {
            engine: GestureEngine::new(&config.gesture)?,
            mapper: VolumeMapper::new(&config.volume)?,
            actuator,
            monitor,
            frame_size,
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            frames: 0,
            stable_gesture: None,
            gesture_counts: BTreeMap::new(),
            volume_changes: 0,
            actuator_failures: 0,
        })
    }

    /// Run one frame through recognition, mapping and actuation.
    ///
    /// `None` means no hand was detected: nothing is emitted and the motion
    /// history is dropped so a swipe never spans the gap. Malformed input is an
    /// error and leaves every history untouched. A failing actuator is logged
    /// and counted but does not fail the frame.
    pub fn process_frame(
        &mut self,
        observation: Option<&HandObservation>,
    ) -> GestureResult<FrameOutput> {
        let frame_start = Instant::now();
        let frame = self.frames;

        let Some(observation) = observation else {
            self.engine.reset();
            self.stable_gesture = None;
            self.frames += 1;
            self.monitor.record_frame(frame_start.elapsed());
            return Ok(FrameOutput {
                frame,
                gesture: None,
                confidence: None,
                fingers_raised: None,
                volume: None,
            });
        };

        observation.validate()?;

        let gesture_start = Instant::now();
        let center = self.frame_size.to_pixels(observation.centroid());
        let recognition = self.engine.recognize(observation, center, self.frame_size)?;
        let fingers_raised = count_raised_fingers(observation);
        self.monitor.record_gesture(gesture_start.elapsed());

        let volume_start = Instant::now();
        let volume = self.mapper.update(thumb_index_distance(observation))?;
        if let Some(level) = volume {
            self.volume_changes += 1;
            if let Err(e) = self.actuator.set_volume(level.percent) {
                self.actuator_failures += 1;
                warn!("Error setting volume to {}%: {}", level.rounded(), e);
            }
        }
        self.monitor.record_volume_control(volume_start.elapsed());

        if recognition.is_confident(self.engine.confidence_threshold())
            && recognition.gesture != GestureType::Unknown
        {
            *self.gesture_counts.entry(recognition.gesture).or_insert(0) += 1;
            if self.stable_gesture != Some(recognition.gesture) {
                info!(
                    "Gesture detected: {} (confidence: {:.2})",
                    recognition.gesture, recognition.confidence
                );
                self.stable_gesture = Some(recognition.gesture);
            }
        }

        debug!(
            "Frame {}: {} hand, {} fingers, distance level {:?}",
            frame,
            observation.handedness.as_str(),
            fingers_raised,
            self.mapper.current_level()
        );

        self.frames += 1;
        self.monitor.record_frame(frame_start.elapsed());

        Ok(FrameOutput {
            frame,
            gesture: Some(recognition.gesture),
            confidence: Some(recognition.confidence),
            fingers_raised: Some(fingers_raised),
            volume,
        })
    }

    pub fn monitor(&self) -> &Arc<PerformanceMonitor> {
        &self.monitor
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames
    }

    pub fn gesture_counts(&self) -> &BTreeMap<GestureType, u64> {
        &self.gesture_counts
    }

    pub fn volume_changes(&self) -> u64 {
        self.volume_changes
    }

    pub fn actuator_failures(&self) -> u64 {
        self.actuator_failures
    }

    /// Snapshot of the session so far
    pub fn session_report(&self) -> SessionReport {
        SessionReport {
            session_id: self.session_id,
            started_at: self.started_at,
            finished_at: Utc::now(),
            performance: self.monitor.summary(),
            metrics: self.monitor.metric_stats(),
            gesture_counts: self.gesture_counts.clone(),
            volume_changes: self.volume_changes,
            actuator_failures: self.actuator_failures,
        }
    }
}
