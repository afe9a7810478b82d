//! The interceptor chain of one hook.

use crate::registry::TapRegistry;
use taphook_core::{DynInterceptor, Tap, run_register};

/// Interceptors in attachment order. Append-only.
pub struct InterceptorChain<A, R> {
    interceptors: Vec<DynInterceptor<A, R>>,
}

impl<A, R> Default for InterceptorChain<A, R> {
    fn default() -> Self {
        Self {
            interceptors: Vec::new(),
        }
    }
}

impl<A: 'static, R: 'static> InterceptorChain<A, R> {
    /// Interceptors in attachment order.
    pub fn as_slice(&self) -> &[DynInterceptor<A, R>] {
        &self.interceptors
    }

    /// Number of attached interceptors.
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Whether nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Pass a new tap through every interceptor's `register`.
    pub fn apply(&self, tap: Tap<A, R>) -> Tap<A, R> {
        run_register(&self.interceptors, tap)
    }

    /// Append `interceptor` and let it rewrite the taps already registered.
    pub fn attach(&mut self, interceptor: DynInterceptor<A, R>, registry: &mut TapRegistry<A, R>) {
        registry.rewrite(|tap| interceptor.register(tap));
        self.interceptors.push(interceptor);
    }
}
