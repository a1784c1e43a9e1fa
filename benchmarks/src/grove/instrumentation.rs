//! Optional side-channel instrumentation for trial phases.
//!
//! When enabled, each phase runs inside a named tracing span that nests
//! exactly with the phase boundaries. Disabled, the decorator is a plain
//! pass-through; either way the wrapped operation's result is returned
//! unchanged and control flow is untouched.

use std::future::Future;

use tracing::Instrument;

/// Span-wrapping decorator handed to the runner. Scoped to one batch
/// invocation rather than held in process-wide state.
#[derive(Debug, Clone, Copy)]
pub struct Instrumentation {
    enabled: bool,
}

impl Instrumentation {
    pub fn enabled() -> Self { Self { enabled: true } }

    pub fn disabled() -> Self { Self { enabled: false } }

    pub fn is_enabled(&self) -> bool { self.enabled }

    /// Runs `op` inside a span named after the phase, or bare when disabled.
    pub async fn phase<T, F>(&self, name: &'static str, size_label: &str, op: F) -> T
    where F: Future<Output = T> {
        if !self.enabled {
            return op.await;
        }
        let span = tracing::info_span!("trial_phase", phase = name, size = size_label);
        op.instrument(span).await
    }
}
