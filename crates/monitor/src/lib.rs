//! Monitoring session orchestration
//!
//! Sits between the tracking producer and the consumers: feeds measurements
//! and face-lost heartbeats to the evaluator, drives the edge-triggered alert
//! sink, and keeps the latest snapshot for polling consumers (UI, telemetry).
//! All calls must come from one logical thread; nothing here locks.

use alerting::{AlertDispatcher, AlertSink};
use drowsiness::{
    AlertLevel, ConfigError, DrowsinessEvaluator, EvaluationState, EvaluatorConfig, Measurement,
};
use tracing::info;

/// One drowsiness-monitoring session
pub struct DrowsinessMonitor<S: AlertSink> {
    evaluator: DrowsinessEvaluator,
    alerts: AlertDispatcher<S>,
    state: EvaluationState,
}

impl<S: AlertSink> DrowsinessMonitor<S> {
    pub fn new(config: EvaluatorConfig, sink: S) -> Result<Self, ConfigError> {
        Ok(Self {
            evaluator: DrowsinessEvaluator::new(config)?,
            alerts: AlertDispatcher::new(sink),
            state: EvaluationState::default(),
        })
    }

    /// Begin a session at `now`: resets the evaluator and seeds the snapshot
    /// with `NoFace` until the first measurement arrives
    pub fn start(&mut self, now: f64) {
        info!(now, "Monitoring session started");
        self.evaluator.reset(now);
        self.alerts.silence();
        self.state = EvaluationState {
            alert: AlertLevel::NoFace,
            ..EvaluationState::default()
        };
    }

    /// Feed one analyzed frame; returns the updated snapshot
    pub fn handle_measurement(&mut self, measurement: Measurement) -> &EvaluationState {
        let state = self.evaluator.ingest(measurement);
        self.alerts.dispatch(state.alert);
        self.state = state;
        &self.state
    }

    /// Feed one empty tracking tick.
    ///
    /// The snapshot (and sink) only change on the `NoFace` branch; the
    /// informational pre-timeout branch is dropped, per the upstream
    /// heartbeat contract.
    pub fn handle_face_lost(&mut self, timestamp: f64) -> Option<&EvaluationState> {
        let state = self.evaluator.ingest_face_lost(timestamp);
        if state.alert != AlertLevel::NoFace {
            return None;
        }
        self.alerts.dispatch(state.alert);
        self.state = state;
        Some(&self.state)
    }

    /// End the session, silencing the sink
    pub fn stop(&mut self) {
        info!("Monitoring session stopped");
        self.alerts.silence();
    }

    /// Latest emitted snapshot, for polling consumers
    pub fn state(&self) -> &EvaluationState {
        &self.state
    }
}
