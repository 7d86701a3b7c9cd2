//! Evaluator configuration

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Tuning constants for the drowsiness evaluator.
///
/// Defaults reproduce the canonical fast-recovery evaluator. All thresholds
/// apply to smoothed closedness values (0 = open, 1 = closed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// EMA smoothing factor for raw closedness (0-1, higher = less smoothing)
    pub smoothing_alpha: f32,

    /// Length of the calibration phase (seconds)
    pub calibration_secs: f64,
    /// Minimum clean samples required to learn thresholds; fewer keeps defaults
    pub calibration_min_samples: usize,
    /// Samples with mean closedness at/above this are excluded from calibration
    pub calibration_sample_ceiling: f32,

    /// Open threshold used before calibration (or as fallback)
    pub default_open_threshold: f32,
    /// Close threshold used before calibration (or as fallback)
    pub default_close_threshold: f32,

    /// Offset added to the calibrated resting median for the open threshold
    pub open_offset: f32,
    /// Offset added to the calibrated resting median for the close threshold
    pub close_offset: f32,
    /// (min, max) clamp range for the learned open threshold
    pub open_clamp: (f32, f32),
    /// (min, max) clamp range for the learned close threshold
    pub close_clamp: (f32, f32),

    /// PERCLOS trailing window length (seconds)
    pub perclos_window_secs: f64,
    /// PERCLOS at/above this raises a warning
    pub perclos_warning: f64,
    /// PERCLOS at/above this raises an alarm
    pub perclos_alarm: f64,

    /// Continuous eye closure at/above this duration raises an alarm (seconds)
    pub closure_alarm_secs: f64,

    /// Heartbeats this long after the last measurement mark the face lost (seconds)
    pub face_lost_timeout_secs: f64,

    /// Evict stale closed samples on open measurements instead of waiting for
    /// the window to age out
    pub fast_recovery: bool,
    /// Maximum closed samples evicted per open measurement
    pub recovery_evictions: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: 0.25,
            calibration_secs: 6.0,
            calibration_min_samples: 30,
            calibration_sample_ceiling: 0.35,
            default_open_threshold: 0.55,
            default_close_threshold: 0.80,
            open_offset: 0.25,
            close_offset: 0.60,
            open_clamp: (0.35, 0.70),
            close_clamp: (0.70, 0.92),
            perclos_window_secs: 60.0,
            perclos_warning: 0.22,
            perclos_alarm: 0.35,
            closure_alarm_secs: 1.2,
            face_lost_timeout_secs: 1.0,
            fast_recovery: true,
            recovery_evictions: 5,
        }
    }
}

impl EvaluatorConfig {
    /// Create strict config (lower cutoffs, faster alarms)
    pub fn strict() -> Self {
        Self {
            perclos_warning: 0.15,
            perclos_alarm: 0.28,
            closure_alarm_secs: 0.9,
            face_lost_timeout_secs: 0.7,
            ..Default::default()
        }
    }

    /// Create lenient config (higher cutoffs, slower alarms)
    pub fn lenient() -> Self {
        Self {
            perclos_warning: 0.30,
            perclos_alarm: 0.45,
            closure_alarm_secs: 1.8,
            face_lost_timeout_secs: 1.5,
            ..Default::default()
        }
    }

    /// Load configuration from a TOML or JSON file, merged over defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let defaults = config::Config::try_from(&Self::default())?;
        let loaded: Self = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Check internal consistency of the thresholds and durations
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "smoothing_alpha must be in (0, 1], got {}",
                self.smoothing_alpha
            )));
        }
        if self.default_open_threshold >= self.default_close_threshold {
            return Err(ConfigError::Invalid(format!(
                "open threshold {} must be below close threshold {}",
                self.default_open_threshold, self.default_close_threshold
            )));
        }
        for (name, (lo, hi)) in [("open_clamp", self.open_clamp), ("close_clamp", self.close_clamp)]
        {
            if !(lo <= hi) {
                return Err(ConfigError::Invalid(format!(
                    "{name} range ({lo}, {hi}) is inverted"
                )));
            }
        }
        if self.open_clamp.1 > self.close_clamp.0 {
            return Err(ConfigError::Invalid(format!(
                "open clamp range {:?} must sit at/below close clamp range {:?}",
                self.open_clamp, self.close_clamp
            )));
        }
        if self.perclos_warning >= self.perclos_alarm {
            return Err(ConfigError::Invalid(format!(
                "perclos_warning {} must be below perclos_alarm {}",
                self.perclos_warning, self.perclos_alarm
            )));
        }
        for (name, value) in [
            ("calibration_secs", self.calibration_secs),
            ("perclos_window_secs", self.perclos_window_secs),
            ("closure_alarm_secs", self.closure_alarm_secs),
            ("face_lost_timeout_secs", self.face_lost_timeout_secs),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}
