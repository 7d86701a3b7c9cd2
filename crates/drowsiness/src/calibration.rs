//! Per-session baseline calibration
//!
//! Eye-closedness values vary materially across subjects and lighting, so the
//! first seconds of a session are used to learn subject-specific open/close
//! thresholds from the median resting closedness. Calibration is one-shot:
//! once finalized it never reruns within a session.

use tracing::{debug, info};

use crate::config::EvaluatorConfig;

/// Calibration sub-state: collects clean samples during the calibration
/// window, then derives thresholds (or falls back to defaults).
#[derive(Debug, Clone)]
pub struct Calibration {
    start: Option<f64>,
    samples: Vec<f32>,
    open_threshold: f32,
    close_threshold: f32,
    calibrated: bool,
}

impl Calibration {
    pub fn new(config: &EvaluatorConfig) -> Self {
        Self {
            start: None,
            samples: Vec::new(),
            open_threshold: config.default_open_threshold,
            close_threshold: config.default_close_threshold,
            calibrated: false,
        }
    }

    /// Clear all calibration state back to defaults
    pub fn reset(&mut self, config: &EvaluatorConfig) {
        *self = Self::new(config);
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    pub fn open_threshold(&self) -> f32 {
        self.open_threshold
    }

    pub fn close_threshold(&self) -> f32 {
        self.close_threshold
    }

    /// Feed one smoothed mean-closedness sample at `now`.
    ///
    /// Starts the calibration clock on the first call after a reset. Samples
    /// at/above the ceiling are discarded so blinks and already-closing eyes
    /// do not skew the resting baseline. Finalizes once the calibration
    /// window has elapsed.
    pub fn observe(&mut self, now: f64, smoothed_avg: f32, config: &EvaluatorConfig) {
        let start = *self.start.get_or_insert(now);
        if self.calibrated {
            return;
        }

        let elapsed = now - start;
        if elapsed <= config.calibration_secs {
            if smoothed_avg < config.calibration_sample_ceiling {
                self.samples.push(smoothed_avg);
            }
        } else {
            self.finalize(config);
        }
    }

    /// Calibration phase progress in [0, 1]; 1.0 once calibrated, 0.0 before
    /// the first measurement of the session.
    pub fn progress(&self, now: f64, config: &EvaluatorConfig) -> f64 {
        if self.calibrated {
            return 1.0;
        }
        match self.start {
            Some(start) => ((now - start) / config.calibration_secs).clamp(0.0, 1.0),
            None => 0.0,
        }
    }

    fn finalize(&mut self, config: &EvaluatorConfig) {
        self.calibrated = true;

        if self.samples.len() < config.calibration_min_samples {
            debug!(
                samples = self.samples.len(),
                required = config.calibration_min_samples,
                "Too few clean calibration samples, keeping default thresholds"
            );
            return;
        }

        let resting = median(&mut self.samples);
        self.open_threshold =
            (resting + config.open_offset).clamp(config.open_clamp.0, config.open_clamp.1);
        self.close_threshold =
            (resting + config.close_offset).clamp(config.close_clamp.0, config.close_clamp.1);

        info!(
            resting,
            open = self.open_threshold,
            close = self.close_threshold,
            "Calibration finalized"
        );
    }
}

/// Median of a sample buffer (sorts in place)
fn median(values: &mut [f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EvaluatorConfig {
        EvaluatorConfig::default()
    }

    #[test]
    fn test_median_odd_even() {
        assert_eq!(median(&mut [0.3, 0.1, 0.2]), 0.2);
        assert!((median(&mut [0.1, 0.2, 0.3, 0.4]) - 0.25).abs() < 1e-6);
        assert_eq!(median(&mut []), 0.0);
    }

    #[test]
    fn test_learns_thresholds_from_clean_samples() {
        let cfg = config();
        let mut cal = Calibration::new(&cfg);

        // 40 resting samples at 0.05 over the calibration window
        for i in 0..40 {
            cal.observe(i as f64 * 0.15, 0.05, &cfg);
        }
        assert!(!cal.is_calibrated());

        // first sample past the window triggers finalization
        cal.observe(6.1, 0.05, &cfg);
        assert!(cal.is_calibrated());
        // 0.05 + 0.25 = 0.30 clamps up to 0.35; 0.05 + 0.60 = 0.65 clamps to 0.70
        assert!((cal.open_threshold() - 0.35).abs() < 1e-6);
        assert!((cal.close_threshold() - 0.70).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_ranges_come_from_config() {
        let cfg = EvaluatorConfig {
            open_clamp: (0.45, 0.60),
            close_clamp: (0.75, 0.85),
            ..EvaluatorConfig::default()
        };
        let mut cal = Calibration::new(&cfg);
        for i in 0..45 {
            cal.observe(i as f64 * 0.15, 0.05, &cfg);
        }
        assert!(cal.is_calibrated());
        // 0.05 + 0.25 = 0.30 clamps up to 0.45; 0.05 + 0.60 = 0.65 clamps to 0.75
        assert!((cal.open_threshold() - 0.45).abs() < 1e-6);
        assert!((cal.close_threshold() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_falls_back_to_defaults_with_few_samples() {
        let cfg = config();
        let mut cal = Calibration::new(&cfg);

        // eyes closing the whole time: samples filtered out by the ceiling
        for i in 0..50 {
            cal.observe(i as f64 * 0.15, 0.6, &cfg);
        }
        assert!(cal.is_calibrated());
        assert_eq!(cal.open_threshold(), cfg.default_open_threshold);
        assert_eq!(cal.close_threshold(), cfg.default_close_threshold);
    }

    #[test]
    fn test_one_shot_never_recomputes() {
        let cfg = config();
        let mut cal = Calibration::new(&cfg);
        for i in 0..45 {
            cal.observe(i as f64 * 0.15, 0.05, &cfg);
        }
        let open = cal.open_threshold();

        // further observations after finalization change nothing
        for i in 0..100 {
            cal.observe(10.0 + i as f64 * 0.15, 0.30, &cfg);
        }
        assert_eq!(cal.open_threshold(), open);
    }

    #[test]
    fn test_progress_monotonic_and_bounded() {
        let cfg = config();
        let mut cal = Calibration::new(&cfg);
        assert_eq!(cal.progress(0.0, &cfg), 0.0);

        cal.observe(0.0, 0.05, &cfg);
        let mut last = 0.0;
        for i in 1..80 {
            let now = i as f64 * 0.1;
            cal.observe(now, 0.05, &cfg);
            let p = cal.progress(now, &cfg);
            assert!(p >= last && p <= 1.0);
            last = p;
        }
        assert!(cal.is_calibrated());
        assert_eq!(cal.progress(100.0, &cfg), 1.0);
    }
}
