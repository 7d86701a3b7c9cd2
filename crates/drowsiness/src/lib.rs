//! Drowsiness evaluation core
//!
//! Classifies a real-time stream of per-frame eye-closure measurements into a
//! graded alert signal:
//! - Exponential smoothing of raw closedness values
//! - Per-session calibration of open/close thresholds
//! - Hysteresis-based open/closed eye-state tracking
//! - Sliding-window PERCLOS (percentage of eye closure) estimation
//! - Priority-based alert decision (continuous closure, PERCLOS, face lost)
//!
//! The core is in-process, single-threaded, and synchronous: every call is a
//! pure function of the session context plus its argument. Camera capture,
//! landmark extraction, and audio/UI alerting live outside this crate.

pub mod calibration;
pub mod config;
pub mod evaluator;
pub mod state;
pub mod window;

pub use config::{ConfigError, EvaluatorConfig};
pub use evaluator::DrowsinessEvaluator;
pub use state::{AlertLevel, EvaluationState, Measurement};
