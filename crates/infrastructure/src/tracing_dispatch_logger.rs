use serde_json::Value;
use service_dispatch_application::DispatchLogger;
use tracing::{debug, error, warn};

/// Logging sink forwarding client messages to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDispatchLogger;

impl DispatchLogger for TracingDispatchLogger {
    fn debug(&self, message: &str, context: &Value) {
        debug!(context = %context, "{message}");
    }

    fn warning(&self, message: &str, context: &Value) {
        warn!(context = %context, "{message}");
    }

    fn error(&self, message: &str, context: &Value) {
        error!(context = %context, "{message}");
    }
}
