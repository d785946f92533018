//! services/app/src/analytics.rs
//!
//! Thin observability helpers. Every generation call, successful or not,
//! reports its timing through here; the sink is just structured logging.

use std::time::Instant;

use tracing::{error, info};

/// Records a named application event.
pub fn track_event(event: &str, detail: &str) {
    info!(target: "analytics", event, detail, "event");
}

/// Records the duration and outcome of one external call.
pub fn measure(label: &str, started: Instant, ok: bool) {
    let elapsed_ms = started.elapsed().as_millis();
    info!(target: "analytics", label, elapsed_ms, ok, "timing");
}

/// Records a recovered error with its context.
pub fn log_error(context: &str, err: &dyn std::fmt::Display) {
    error!(target: "analytics", context, %err, "recovered error");
}
