//! Session evaluator
//!
//! Owns the mutable session context and wires the pieces together: EMA
//! smoothing of raw closedness, calibration, two-threshold eye-state
//! hysteresis, the PERCLOS window, the continuous-closure timer, and the
//! priority-based alert decision. Single-threaded and synchronous; the caller
//! serializes all calls and supplies non-decreasing timestamps.

use tracing::{debug, info, warn};

use crate::calibration::Calibration;
use crate::config::{ConfigError, EvaluatorConfig};
use crate::state::{AlertLevel, EvaluationState, Measurement};
use crate::window::PerclosWindow;

/// Discrete eye state produced by the hysteresis tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EyeState {
    Open,
    Closed,
}

/// Mutable per-session state, owned exclusively by the evaluator
#[derive(Debug)]
struct SessionContext {
    smoothed_left: f32,
    smoothed_right: f32,
    eye_state: EyeState,
    /// Time of the most recent Open -> Closed transition
    closed_since: Option<f64>,
    calibration: Calibration,
    window: PerclosWindow,
    last_face_seen: f64,
    face_lost: bool,
    /// Most recent timestamp observed, for regression clamping
    last_timestamp: f64,
}

/// Drowsiness evaluator for one monitoring session.
///
/// Construct once, call [`reset`](Self::reset) at session start, then feed
/// every analyzed frame through [`ingest`](Self::ingest) and every empty
/// tracking tick through [`ingest_face_lost`](Self::ingest_face_lost). Every
/// call returns a complete [`EvaluationState`] snapshot.
pub struct DrowsinessEvaluator {
    config: EvaluatorConfig,
    ctx: SessionContext,
}

impl DrowsinessEvaluator {
    /// Create an evaluator with a validated configuration
    pub fn new(config: EvaluatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let ctx = SessionContext {
            smoothed_left: 0.0,
            smoothed_right: 0.0,
            eye_state: EyeState::Open,
            closed_since: None,
            calibration: Calibration::new(&config),
            window: PerclosWindow::new(),
            last_face_seen: 0.0,
            face_lost: true,
            last_timestamp: 0.0,
        };
        Ok(Self { config, ctx })
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Clear all session state and start a new monitoring session at `now`.
    ///
    /// Must be called once before any `ingest`/`ingest_face_lost` call of a
    /// session. The face is considered lost until the first measurement.
    pub fn reset(&mut self, now: f64) {
        self.ctx.smoothed_left = 0.0;
        self.ctx.smoothed_right = 0.0;
        self.ctx.eye_state = EyeState::Open;
        self.ctx.closed_since = None;
        self.ctx.calibration.reset(&self.config);
        self.ctx.window.clear();
        self.ctx.last_face_seen = now;
        self.ctx.face_lost = true;
        self.ctx.last_timestamp = now;
        info!(now, "Session reset");
    }

    /// Process one eye-closure measurement and return the updated snapshot
    pub fn ingest(&mut self, measurement: Measurement) -> EvaluationState {
        let now = self.clamp_timestamp(measurement.timestamp);
        let ctx = &mut self.ctx;

        ctx.last_face_seen = now;
        if ctx.face_lost {
            debug!(now, "Face reacquired");
            ctx.face_lost = false;
        }

        // Smoothing; inputs sanitized so a glitched frame cannot escape [0, 1]
        let alpha = self.config.smoothing_alpha;
        ctx.smoothed_left = smooth(sanitize(measurement.left_closedness), ctx.smoothed_left, alpha);
        ctx.smoothed_right =
            smooth(sanitize(measurement.right_closedness), ctx.smoothed_right, alpha);

        // Calibration
        let avg = (ctx.smoothed_left + ctx.smoothed_right) / 2.0;
        ctx.calibration.observe(now, avg, &self.config);

        // Eye state with hysteresis; values inside the dead zone change nothing
        let open_threshold = ctx.calibration.open_threshold();
        let close_threshold = ctx.calibration.close_threshold();
        let both_closed =
            ctx.smoothed_left > close_threshold && ctx.smoothed_right > close_threshold;
        let both_open = ctx.smoothed_left < open_threshold && ctx.smoothed_right < open_threshold;

        match ctx.eye_state {
            EyeState::Open if both_closed => {
                ctx.eye_state = EyeState::Closed;
                ctx.closed_since = Some(now);
                debug!(now, "Eyes closed");
            }
            EyeState::Closed if both_open => {
                ctx.eye_state = EyeState::Open;
                ctx.closed_since = None;
                debug!(now, "Eyes open");
            }
            _ => {}
        }

        // PERCLOS window
        let closed = ctx.eye_state == EyeState::Closed;
        ctx.window.push(now, closed, both_open, &self.config);
        let perclos = ctx.window.perclos();

        // Alert decision, strict priority order
        let closure_alarm = self.continuous_closure(now) >= self.config.closure_alarm_secs;
        let alert = if self.ctx.face_lost {
            AlertLevel::NoFace
        } else if !self.ctx.calibration.is_calibrated() {
            // calibration-phase safety net: no PERCLOS decisions on
            // untrusted thresholds
            if closure_alarm {
                AlertLevel::Alarm
            } else {
                AlertLevel::None
            }
        } else if closure_alarm {
            AlertLevel::Alarm
        } else if perclos >= self.config.perclos_alarm {
            AlertLevel::Alarm
        } else if perclos >= self.config.perclos_warning {
            AlertLevel::Warning
        } else {
            AlertLevel::None
        };

        EvaluationState {
            alert,
            perclos,
            is_calibrated: self.ctx.calibration.is_calibrated(),
            calibration_progress: self.ctx.calibration.progress(now, &self.config),
            continuous_closure_progress: (self.continuous_closure(now)
                / self.config.closure_alarm_secs)
                .clamp(0.0, 1.0),
        }
    }

    /// Heartbeat from the tracking collaborator when no face was found.
    ///
    /// Marks the session face-lost once the timeout since the last
    /// measurement elapses and returns a degraded snapshot. This path never
    /// feeds calibration, hysteresis, or the PERCLOS window.
    pub fn ingest_face_lost(&mut self, timestamp: f64) -> EvaluationState {
        let now = self.clamp_timestamp(timestamp);

        let alert = if now - self.ctx.last_face_seen > self.config.face_lost_timeout_secs {
            if !self.ctx.face_lost {
                warn!(now, last_seen = self.ctx.last_face_seen, "Face lost");
            }
            self.ctx.face_lost = true;
            AlertLevel::NoFace
        } else {
            // informational branch, typically ignored by callers
            AlertLevel::None
        };

        EvaluationState {
            alert,
            perclos: self.ctx.window.perclos(),
            is_calibrated: self.ctx.calibration.is_calibrated(),
            calibration_progress: self.ctx.calibration.progress(now, &self.config),
            continuous_closure_progress: 0.0,
        }
    }

    /// Seconds the eyes have been continuously closed (0 while open)
    fn continuous_closure(&self, now: f64) -> f64 {
        match (self.ctx.eye_state, self.ctx.closed_since) {
            (EyeState::Closed, Some(since)) => now - since,
            _ => 0.0,
        }
    }

    /// Clamp a regressed timestamp to the last observed time.
    ///
    /// Non-decreasing timestamps are a caller precondition; a regression is
    /// tolerated as "no time has passed" rather than corrupting the window.
    fn clamp_timestamp(&mut self, timestamp: f64) -> f64 {
        let now = if timestamp < self.ctx.last_timestamp {
            warn!(
                timestamp,
                last = self.ctx.last_timestamp,
                "Timestamp regression, clamping"
            );
            self.ctx.last_timestamp
        } else {
            timestamp
        };
        self.ctx.last_timestamp = now;
        now
    }
}

impl Default for DrowsinessEvaluator {
    fn default() -> Self {
        // default config always validates
        Self::new(EvaluatorConfig::default()).expect("default config is valid")
    }
}

/// Exponential moving average step
fn smooth(new: f32, old: f32, alpha: f32) -> f32 {
    alpha * new + (1.0 - alpha) * old
}

/// Clamp closedness into [0, 1]; non-finite values count as fully open so a
/// sensor glitch cannot manufacture an alarm
fn sanitize(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
