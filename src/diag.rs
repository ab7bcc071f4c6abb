use std::sync::{Arc, RwLock};

/// Receiver for recoverable structural problems. The engine reports and
/// keeps going with a best-effort result; nothing here ever aborts an
/// operation.
pub trait DiagnosticSink: Send + Sync {
    fn report_error(&self, message: &str);
}

/// Default sink: forwards every report to the `log` facade at error level.
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report_error(&self, message: &str) {
        log::error!("{message}");
    }
}

static SINK: RwLock<Option<Arc<dyn DiagnosticSink>>> = RwLock::new(None);

/// Installs the process-wide sink, replacing any previous one. Reports
/// issued before the first call go to [`LogSink`].
pub fn set_sink(sink: Arc<dyn DiagnosticSink>) {
    if let Ok(mut slot) = SINK.write() {
        *slot = Some(sink);
    }
}

/// Routes one report through the installed sink.
pub fn report_error(message: &str) {
    if let Ok(slot) = SINK.read() {
        match slot.as_deref() {
            Some(sink) => sink.report_error(message),
            None => LogSink.report_error(message),
        }
    }
}
