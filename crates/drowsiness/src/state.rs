//! Input measurements and emitted evaluation snapshots

use serde::{Deserialize, Serialize};

/// One eye-closure measurement for a successfully analyzed frame.
///
/// Closedness is normalized: 0.0 = fully open, 1.0 = fully closed. Timestamps
/// are caller-supplied monotonic seconds; they must be non-decreasing within
/// a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Monotonic timestamp in seconds
    pub timestamp: f64,
    /// Left eye closedness (0-1)
    pub left_closedness: f32,
    /// Right eye closedness (0-1)
    pub right_closedness: f32,
}

impl Measurement {
    pub fn new(timestamp: f64, left_closedness: f32, right_closedness: f32) -> Self {
        Self {
            timestamp,
            left_closedness,
            right_closedness,
        }
    }

    /// Mean closedness across both eyes
    pub fn closedness_avg(&self) -> f32 {
        (self.left_closedness + self.right_closedness) / 2.0
    }
}

/// Graded alert level.
///
/// `Ord` reflects severity for comparisons in tests and consumers; the
/// decision policy itself is priority-based, not ordering-based.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum AlertLevel {
    /// No signs of drowsiness
    #[default]
    None,
    /// Elevated PERCLOS, below the alarm cutoff
    Warning,
    /// Sustained closure or PERCLOS at/above the alarm cutoff
    Alarm,
    /// No face seen within the face-lost timeout
    NoFace,
}

/// Immutable snapshot emitted on every `ingest`/`ingest_face_lost` call.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EvaluationState {
    /// Current alert level
    pub alert: AlertLevel,
    /// Fraction of the trailing window spent with eyes closed (0-1)
    pub perclos: f64,
    /// Whether per-session threshold calibration has finalized
    pub is_calibrated: bool,
    /// Calibration phase progress (0-1, 1.0 once calibrated)
    pub calibration_progress: f64,
    /// Progress toward the continuous-closure alarm (0-1, 0 while eyes open)
    pub continuous_closure_progress: f64,
}
