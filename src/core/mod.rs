pub mod config;
pub mod geometry;
pub mod ring_buffer;

// Recognition
pub mod pose_classifier;
pub mod motion_classifier;
pub mod gesture_engine;

// Volume mapping and the per-frame pipeline
pub mod volume_mapper;
pub mod controller;

// Metrics and reporting
pub mod performance_monitor;
pub mod session_report;
