//! Interceptors: observers and rewriters attached to a hook.

use crate::{error::BoxError, tap::Tap};
use std::sync::Arc;

/// An observer/rewriter attached to a hook.
///
/// Only [`register`](Interceptor::register) is consulted by the hook itself.
/// The remaining methods are observation points that compiled dispatchers
/// call while running taps; the standard flavors call all of them.
pub trait Interceptor<A, R>: Send + Sync + 'static {
    /// Rewrite a tap at registration time. `None` leaves it as-is.
    ///
    /// Called for every future registration and, when the interceptor is
    /// attached, for every tap already registered.
    fn register(&self, tap: &Tap<A, R>) -> Option<Tap<A, R>> {
        let _ = tap;
        None
    }

    /// A dispatch is starting.
    fn call(&self, args: &A) {
        let _ = args;
    }

    /// A tap is about to run.
    fn tap(&self, tap: &Tap<A, R>) {
        let _ = tap;
    }

    /// A loop flavor is restarting from its first tap.
    fn on_loop(&self, args: &A) {
        let _ = args;
    }

    /// A dispatch finished with a value.
    fn result(&self, result: &R) {
        let _ = result;
    }

    /// A dispatch failed.
    fn error(&self, error: &BoxError) {
        let _ = error;
    }

    /// A dispatch finished without a value.
    fn done(&self) {}
}

/// Shared interceptor handle as stored on a hook.
pub type DynInterceptor<A, R> = Arc<dyn Interceptor<A, R>>;

/// An interceptor that only rewrites registrations.
pub struct RegisterFn<F>(pub F);

impl<A, R, F> Interceptor<A, R> for RegisterFn<F>
where
    A: 'static,
    R: 'static,
    F: Fn(&Tap<A, R>) -> Option<Tap<A, R>> + Send + Sync + 'static,
{
    fn register(&self, tap: &Tap<A, R>) -> Option<Tap<A, R>> {
        (self.0)(tap)
    }
}

/// Run `tap` through every interceptor in attachment order.
pub fn run_register<A: 'static, R: 'static>(interceptors: &[DynInterceptor<A, R>], tap: Tap<A, R>) -> Tap<A, R> {
    interceptors
        .iter()
        .fold(tap, |tap, interceptor| interceptor.register(&tap).unwrap_or(tap))
}
