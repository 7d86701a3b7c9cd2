//! Trailing PERCLOS window
//!
//! Keeps the last `perclos_window_secs` of discrete eye-state samples and
//! reports the closed fraction. Two eviction passes run on every push: a
//! fast-recovery pass that drops stale closed samples as soon as the eyes are
//! observed open again, then the ordinary time-based prefix trim.

use std::collections::VecDeque;

use tracing::debug;

use crate::config::EvaluatorConfig;

#[derive(Debug, Clone, Copy)]
struct WindowSample {
    time: f64,
    closed: bool,
}

/// Time-ordered sliding window of eye-state samples
#[derive(Debug, Clone, Default)]
pub struct PerclosWindow {
    samples: VecDeque<WindowSample>,
}

impl PerclosWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Append one sample and evict per configuration.
    ///
    /// `eyes_open` is the hysteresis tracker's both-open observation for this
    /// measurement; when set (and fast recovery is enabled) up to
    /// `recovery_evictions` of the oldest closed samples are dropped before
    /// the time trim, so the ratio recovers faster than window aging alone
    /// would allow.
    pub fn push(&mut self, now: f64, closed: bool, eyes_open: bool, config: &EvaluatorConfig) {
        self.samples.push_back(WindowSample { time: now, closed });

        if config.fast_recovery && eyes_open {
            self.evict_closed_prefix(config.recovery_evictions);
        }

        let cutoff = now - config.perclos_window_secs;
        while self.samples.front().is_some_and(|s| s.time < cutoff) {
            self.samples.pop_front();
        }
    }

    /// Closed fraction over the current window (0 when empty)
    pub fn perclos(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let closed = self.samples.iter().filter(|s| s.closed).count();
        closed as f64 / self.samples.len() as f64
    }

    /// Remove up to `max` closed samples scanning from the oldest end
    fn evict_closed_prefix(&mut self, max: usize) {
        let mut removed = 0;
        let mut idx = 0;
        while removed < max && idx < self.samples.len() {
            if self.samples[idx].closed {
                self.samples.remove(idx);
                removed += 1;
            } else {
                idx += 1;
            }
        }
        if removed > 0 {
            debug!(removed, remaining = self.samples.len(), "Fast-recovery eviction");
        }
    }
}
