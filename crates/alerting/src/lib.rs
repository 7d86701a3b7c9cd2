//! Alerting boundary
//!
//! Maps the evaluator's per-call alert levels onto an audio/haptic sink,
//! edge-triggered: the sink is invoked only when the level changes, so a
//! steady alarm plays once instead of thirty times a second.

mod dispatcher;

pub use dispatcher::{AlertDispatcher, AlertSink};
