//! Logging interceptor for dispatch observation.

use std::fmt::Debug;
use taphook_core::{BoxError, Interceptor, Tap};

/// An interceptor that logs registrations and dispatches.
///
/// Emits `tracing` events when the `tracing` feature is enabled and does
/// nothing otherwise.
#[derive(Debug, Clone, Default)]
pub struct LoggingInterceptor {
    hook: Option<String>,
}

impl LoggingInterceptor {
    /// Label log lines with `hook`.
    pub fn named(hook: impl Into<String>) -> Self {
        Self {
            hook: Some(hook.into()),
        }
    }

    #[cfg(feature = "tracing")]
    fn label(&self) -> &str {
        self.hook.as_deref().unwrap_or("<anonymous>")
    }
}

impl<A, R> Interceptor<A, R> for LoggingInterceptor
where
    A: Debug + 'static,
    R: Debug + 'static,
{
    fn register(&self, tap: &Tap<A, R>) -> Option<Tap<A, R>> {
        #[cfg(feature = "tracing")]
        {
            tracing::debug!(hook = self.label(), tap = %tap.name, kind = %tap.kind(), stage = tap.stage, "Registering tap");
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = tap;
        }
        None
    }

    fn call(&self, args: &A) {
        #[cfg(feature = "tracing")]
        {
            tracing::debug!(hook = self.label(), ?args, "Dispatching");
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = args;
        }
    }

    fn tap(&self, tap: &Tap<A, R>) {
        #[cfg(feature = "tracing")]
        {
            tracing::trace!(hook = self.label(), tap = %tap.name, "Running tap");
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = tap;
        }
    }

    fn on_loop(&self, args: &A) {
        #[cfg(feature = "tracing")]
        {
            tracing::trace!(hook = self.label(), ?args, "Starting loop pass");
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = args;
        }
    }

    fn result(&self, result: &R) {
        #[cfg(feature = "tracing")]
        {
            tracing::debug!(hook = self.label(), ?result, "Dispatch produced a value");
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = result;
        }
    }

    fn error(&self, error: &BoxError) {
        #[cfg(feature = "tracing")]
        {
            tracing::warn!(hook = self.label(), %error, "Dispatch failed");
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = error;
        }
    }

    fn done(&self) {
        #[cfg(feature = "tracing")]
        {
            tracing::debug!(hook = self.label(), "Dispatch done");
        }
    }
}
