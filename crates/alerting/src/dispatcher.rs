//! Edge-triggered alert dispatcher

use drowsiness::AlertLevel;
use tracing::info;

/// Audio/haptic alerting collaborator.
///
/// Implementations own the actual playback; the dispatcher guarantees each
/// method is called only on alert-level edges. `None` and `NoFace` both map
/// to [`stop`](Self::stop).
pub trait AlertSink {
    fn play_warning(&mut self);
    fn play_alarm(&mut self);
    fn stop(&mut self);
}

/// De-duplicates alert levels and drives an [`AlertSink`].
///
/// Starts from `AlertLevel::None`, i.e. a silent sink.
pub struct AlertDispatcher<S: AlertSink> {
    sink: S,
    last: AlertLevel,
}

impl<S: AlertSink> AlertDispatcher<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            last: AlertLevel::None,
        }
    }

    /// Last level dispatched to the sink
    pub fn current(&self) -> AlertLevel {
        self.last
    }

    /// Forward `alert` to the sink iff it differs from the previous level
    pub fn dispatch(&mut self, alert: AlertLevel) {
        if alert == self.last {
            return;
        }
        info!(from = ?self.last, to = ?alert, "Alert level changed");
        self.last = alert;

        match alert {
            AlertLevel::None | AlertLevel::NoFace => self.sink.stop(),
            AlertLevel::Warning => self.sink.play_warning(),
            AlertLevel::Alarm => self.sink.play_alarm(),
        }
    }

    /// Stop playback unconditionally and forget the current level, e.g. when
    /// the session ends
    pub fn silence(&mut self) {
        self.last = AlertLevel::None;
        self.sink.stop();
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
