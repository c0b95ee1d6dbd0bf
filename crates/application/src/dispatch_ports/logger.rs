use serde_json::Value;

/// Leveled logging sink injected into the dispatch client.
pub trait DispatchLogger: Send + Sync {
    /// Records a diagnostic message.
    fn debug(&self, message: &str, context: &Value);

    /// Records a recoverable problem.
    fn warning(&self, message: &str, context: &Value);

    /// Records a failed operation.
    fn error(&self, message: &str, context: &Value);
}

/// Sink that discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDispatchLogger;

impl DispatchLogger for NoopDispatchLogger {
    fn debug(&self, _message: &str, _context: &Value) {}

    fn warning(&self, _message: &str, _context: &Value) {}

    fn error(&self, _message: &str, _context: &Value) {}
}
