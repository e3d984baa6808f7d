// Volume mapping - smooths the control distance and gates small changes

use crate::core::config::VolumeConfig;
use crate::core::ring_buffer::RingBuffer;
use crate::models::gesture::{GestureError, GestureResult};
use crate::models::volume::VolumeLevel;
use tracing::debug;

/// Rolling-mean distance mapper with a minimum-change gate.
///
/// The gate compares against the last *emitted* level, not the last computed
/// one, so a slow drift still gets through once it accumulates.
pub struct VolumeMapper {
    history: RingBuffer<f32>,
    min_distance: f32,
    max_distance: f32,
    sensitivity: f32,
    min_change: f32,
    last_emitted: Option<VolumeLevel>,
    current_level: Option<f32>,
    updates: u64,
}

impl VolumeMapper {
    pub fn new(config: &VolumeConfig) -> GestureResult<Self> {
        config.validate()?;
        Ok(Self {
            history: RingBuffer::new(config.smoothing_window),
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            sensitivity: config.sensitivity,
            min_change: config.min_change_threshold,
            last_emitted: None,
            current_level: None,
            updates: 0,
        })
    }

    /// Feed one control-distance sample.
    ///
    /// Returns the new level when it moved at least `min_change_threshold`
    /// points from the last emitted level (the first update always emits).
    pub fn update(&mut self, control_distance: f32) -> GestureResult<Option<VolumeLevel>> {
        if !control_distance.is_finite() || control_distance < 0.0 {
            return Err(GestureError::InvalidDistance(control_distance));
        }

        self.history.push(control_distance);
        let frame = self.updates;
        self.updates += 1;

        let smoothed = self.history.mean().unwrap_or(control_distance);
        let level = self.map_distance(smoothed);
        self.current_level = Some(level);

        if let Some(last) = self.last_emitted {
            if (level - last.percent).abs() < self.min_change {
                return Ok(None);
            }
            debug!("Volume changed: {:.1}% -> {:.1}%", last.percent, level);
        } else {
            debug!("Initial volume: {:.1}%", level);
        }

        let emitted = VolumeLevel {
            percent: level,
            frame,
        };
        self.last_emitted = Some(emitted);
        Ok(Some(emitted))
    }

    /// Linear map of a distance onto [0, 100], clamped at both ends
    pub fn map_distance(&self, distance: f32) -> f32 {
        let ratio = (distance - self.min_distance) / (self.max_distance - self.min_distance);
        (ratio * self.sensitivity * 100.0).clamp(0.0, 100.0)
    }

    pub fn smoothed_distance(&self) -> Option<f32> {
        self.history.mean()
    }

    /// Level computed by the latest update, emitted or not
    pub fn current_level(&self) -> Option<f32> {
        self.current_level
    }

    pub fn last_emitted(&self) -> Option<VolumeLevel> {
        self.last_emitted
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.last_emitted = None;
        self.current_level = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper(window: usize) -> VolumeMapper {
        let config = VolumeConfig {
            smoothing_window: window,
            ..VolumeConfig::default()
        };
        VolumeMapper::new(&config).unwrap()
    }

    /// Distance that maps to `level` under the default range
    fn distance_for(level: f32) -> f32 {
        0.02 + level / 100.0 * 0.28
    }

    #[test]
    fn test_min_distance_window_maps_to_zero() {
        let mut m = mapper(5);
        let first = m.update(0.02).unwrap().unwrap();
        assert_eq!(first.percent, 0.0);
        for _ in 0..4 {
            assert_eq!(m.update(0.02).unwrap(), None);
        }
        assert_eq!(m.current_level(), Some(0.0));
    }

    #[test]
    fn test_max_distance_window_maps_to_hundred() {
        let mut m = mapper(5);
        for _ in 0..5 {
            m.update(0.3).unwrap();
        }
        assert!((m.current_level().unwrap() - 100.0).abs() < 1e-3);
        assert!((m.last_emitted().unwrap().percent - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_clamps_outside_range() {
        let m = mapper(1);
        assert_eq!(m.map_distance(0.0), 0.0);
        assert_eq!(m.map_distance(0.9), 100.0);
    }

    #[test]
    fn test_gate_suppresses_small_change() {
        let mut m = mapper(1);
        let base = m.update(distance_for(50.0)).unwrap().unwrap();
        assert_eq!(base.frame, 0);

        // Just under the 2.0 gate
        assert_eq!(m.update(distance_for(51.95)).unwrap(), None);
        assert!((m.last_emitted().unwrap().percent - base.percent).abs() < 1e-6);

        // Just over it
        let next = m.update(distance_for(52.05)).unwrap().unwrap();
        assert!((next.percent - 52.05).abs() < 0.01);
        assert_eq!(next.frame, 2);
    }

    #[test]
    fn test_gate_measures_from_last_emitted() {
        let mut m = mapper(1);
        m.update(distance_for(50.0)).unwrap();
        assert_eq!(m.update(distance_for(51.0)).unwrap(), None);
        assert_eq!(m.update(distance_for(51.9)).unwrap(), None);
        // 2.5 from the emitted 50, only 0.6 from the previous sample
        assert!(m.update(distance_for(52.5)).unwrap().is_some());
    }

    #[test]
    fn test_smoothing_averages_window() {
        let mut m = mapper(2);
        m.update(0.1).unwrap();
        m.update(0.2).unwrap();
        assert!((m.smoothed_distance().unwrap() - 0.15).abs() < 1e-6);
        m.update(0.3).unwrap();
        assert!((m.smoothed_distance().unwrap() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_sensitivity_scales_level() {
        let config = VolumeConfig {
            smoothing_window: 1,
            sensitivity: 2.0,
            ..VolumeConfig::default()
        };
        let m = VolumeMapper::new(&config).unwrap();
        assert!((m.map_distance(distance_for(25.0)) - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_bad_distance() {
        let mut m = mapper(3);
        assert!(m.update(f32::NAN).is_err());
        assert!(m.update(-0.1).is_err());
        assert_eq!(m.smoothed_distance(), None);
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = VolumeConfig {
            min_distance: 0.3,
            max_distance: 0.02,
            ..VolumeConfig::default()
        };
        assert!(VolumeMapper::new(&config).is_err());
    }

    #[test]
    fn test_reset_emits_again() {
        let mut m = mapper(1);
        m.update(0.1).unwrap();
        m.reset();
        assert!(m.update(0.1).unwrap().is_some());
    }
}
