// Performance metrics - rolling per-stage timings shared between the frame
// loop (writer) and the reporting task (reader)

use crate::core::ring_buffer::RingBuffer;
use crate::models::gesture::{GestureError, GestureResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Samples kept per window
pub const PERFORMANCE_WINDOW: usize = 30;

/// Snapshot of the rolling windows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub fps: f64,
    pub frame_time_ms: f64,
    pub gesture_time_ms: f64,
    pub volume_time_ms: f64,
    pub total_frames: u64,
    pub uptime_seconds: f64,
}

/// Spread of one timing window, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub latest_ms: f64,
}

impl MetricStats {
    fn from_window(window: &RingBuffer<f64>) -> Option<Self> {
        let avg = window.mean()?;
        let latest = window.iter().last()?;
        let (min, max) = window
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(Self {
            avg_ms: avg * 1000.0,
            min_ms: min * 1000.0,
            max_ms: max * 1000.0,
            latest_ms: latest * 1000.0,
        })
    }
}

struct Windows {
    frame_times: RingBuffer<f64>,
    gesture_times: RingBuffer<f64>,
    volume_times: RingBuffer<f64>,
    frame_count: u64,
}

impl Windows {
    fn fps(&self) -> f64 {
        match self.frame_times.mean() {
            Some(avg) if avg > 0.0 => 1.0 / avg,
            _ => 0.0,
        }
    }
}

/// All state sits behind one lock, held only for an append or a summary.
pub struct PerformanceMonitor {
    windows: Mutex<Windows>,
    started: Instant,
}

impl PerformanceMonitor {
    pub fn new(window_size: usize) -> GestureResult<Self> {
        if window_size == 0 {
            return Err(GestureError::InvalidConfig(
                "Performance window must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            windows: Mutex::new(Windows {
                frame_times: RingBuffer::new(window_size),
                gesture_times: RingBuffer::new(window_size),
                volume_times: RingBuffer::new(window_size),
                frame_count: 0,
            }),
            started: Instant::now(),
        })
    }

    // A panic elsewhere must not take metrics down with it
    fn lock(&self) -> MutexGuard<'_, Windows> {
        self.windows.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record total processing time for one frame
    pub fn record_frame(&self, duration: Duration) {
        let mut w = self.lock();
        w.frame_times.push(duration.as_secs_f64());
        w.frame_count += 1;
    }

    pub fn record_gesture(&self, duration: Duration) {
        self.lock().gesture_times.push(duration.as_secs_f64());
    }

    pub fn record_volume_control(&self, duration: Duration) {
        self.lock().volume_times.push(duration.as_secs_f64());
    }

    /// Frames per second implied by the average frame time
    pub fn fps(&self) -> f64 {
        self.lock().fps()
    }

    pub fn avg_frame_time(&self) -> f64 {
        self.lock().frame_times.mean().unwrap_or(0.0)
    }

    pub fn avg_gesture_time(&self) -> f64 {
        self.lock().gesture_times.mean().unwrap_or(0.0)
    }

    pub fn avg_volume_time(&self) -> f64 {
        self.lock().volume_times.mean().unwrap_or(0.0)
    }

    pub fn total_frames(&self) -> u64 {
        self.lock().frame_count
    }

    /// Per-stage spread keyed by metric name. Stages with no samples yet are left out.
    pub fn metric_stats(&self) -> BTreeMap<String, MetricStats> {
        let w = self.lock();
        [
            ("frame_time", &w.frame_times),
            ("gesture_time", &w.gesture_times),
            ("volume_time", &w.volume_times),
        ]
        .into_iter()
        .filter_map(|(name, window)| {
            MetricStats::from_window(window).map(|stats| (name.to_string(), stats))
        })
        .collect()
    }

    /// Consistent snapshot taken under a single lock acquisition
    pub fn summary(&self) -> PerformanceSummary {
        let w = self.lock();
        PerformanceSummary {
            fps: w.fps(),
            frame_time_ms: w.frame_times.mean().unwrap_or(0.0) * 1000.0,
            gesture_time_ms: w.gesture_times.mean().unwrap_or(0.0) * 1000.0,
            volume_time_ms: w.volume_times.mean().unwrap_or(0.0) * 1000.0,
            total_frames: w.frame_count,
            uptime_seconds: self.started.elapsed().as_secs_f64(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_empty_monitor() {
        let monitor = PerformanceMonitor::new(30).unwrap();
        assert_eq!(monitor.fps(), 0.0);
        assert_eq!(monitor.avg_frame_time(), 0.0);
        let summary = monitor.summary();
        assert_eq!(summary.total_frames, 0);
        assert_eq!(summary.gesture_time_ms, 0.0);
    }

    #[test]
    fn test_fps_from_frame_times() {
        let monitor = PerformanceMonitor::new(4).unwrap();
        for _ in 0..4 {
            monitor.record_frame(Duration::from_millis(20));
        }
        assert!((monitor.fps() - 50.0).abs() < 1e-6);
        assert!((monitor.avg_frame_time() - 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_window_rolls_but_count_does_not() {
        let monitor = PerformanceMonitor::new(2).unwrap();
        monitor.record_frame(Duration::from_millis(100));
        monitor.record_frame(Duration::from_millis(10));
        monitor.record_frame(Duration::from_millis(10));
        assert!((monitor.avg_frame_time() - 0.01).abs() < 1e-9);
        assert_eq!(monitor.total_frames(), 3);
    }

    #[test]
    fn test_summary_in_milliseconds() {
        let monitor = PerformanceMonitor::new(8).unwrap();
        monitor.record_gesture(Duration::from_micros(1500));
        monitor.record_volume_control(Duration::from_micros(500));
        let summary = monitor.summary();
        assert!((summary.gesture_time_ms - 1.5).abs() < 1e-9);
        assert!((summary.volume_time_ms - 0.5).abs() < 1e-9);
        assert!(summary.uptime_seconds >= 0.0);
    }

    #[test]
    fn test_metric_stats_spread() {
        let monitor = PerformanceMonitor::new(3).unwrap();
        assert!(monitor.metric_stats().is_empty());

        for ms in [40, 10, 30, 20] {
            monitor.record_frame(Duration::from_millis(ms));
        }
        monitor.record_gesture(Duration::from_millis(2));

        let stats = monitor.metric_stats();
        assert_eq!(stats.len(), 2);
        assert!(!stats.contains_key("volume_time"));

        // Window of 3 has dropped the 40 ms frame
        let frame = stats["frame_time"];
        assert!((frame.avg_ms - 20.0).abs() < 1e-6);
        assert!((frame.min_ms - 10.0).abs() < 1e-6);
        assert!((frame.max_ms - 30.0).abs() < 1e-6);
        assert!((frame.latest_ms - 20.0).abs() < 1e-6);
        assert!((stats["gesture_time"].latest_ms - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_concurrent_writer_and_reader() {
        let monitor = Arc::new(PerformanceMonitor::new(16).unwrap());

        let writer = {
            let monitor = monitor.clone();
            thread::spawn(move || {
                for _ in 0..1000 {
                    monitor.record_frame(Duration::from_millis(5));
                }
            })
        };
        let reader = {
            let monitor = monitor.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    let s = monitor.summary();
                    assert!(s.total_frames <= 1000);
                }
            })
        };

        writer.join().unwrap();
        reader.join().unwrap();
        assert_eq!(monitor.total_frames(), 1000);
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(PerformanceMonitor::new(0).is_err());
    }
}
