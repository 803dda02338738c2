//! Internal diagnostic channel
//!
//! Problems found while reloading rules are reported here instead of being
//! returned to the caller or logged through the pipeline itself.

use super::error::LoggerError;
use std::sync::Arc;

/// Callback receiving internal diagnostics
pub type DiagnosticCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// Default channel: one `[LOGGER WARNING]` line on stderr per diagnostic
pub fn stderr_diagnostics() -> DiagnosticCallback {
    Arc::new(|err| eprintln!("[LOGGER WARNING] {}", err))
}

/// Channel that drops every diagnostic
pub fn silent_diagnostics() -> DiagnosticCallback {
    Arc::new(|_| {})
}
