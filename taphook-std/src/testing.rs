//! Testing utilities for taphook.
//!
//! # Features
//!
//! - [`CountingCompiler`]: wraps a compiler and counts `compile` calls
//! - [`RecordingInterceptor`]: records every interceptor callback it sees
//! - [`OrderLog`]: a shared log plus ready-made taps that append to it

use parking_lot::Mutex;
use std::sync::Arc;
use taphook_core::{
    BoxError, CompileSpec, CompiledCall, Compiler, HookError, Interceptor, Tap, TapFn, TapKind,
    TapKinds,
};

// ============================================================================
// Counting Compiler
// ============================================================================

/// A compiler that counts how often it is asked to compile.
///
/// # Example
///
/// ```rust,ignore
/// let compiler = CountingCompiler::new(SeriesCompiler);
/// let hook = Hook::builder().compiler(compiler.clone()).build()?;
///
/// hook.call(())?;
/// hook.call(())?;
/// assert_eq!(compiler.count(), 1);
/// ```
pub struct CountingCompiler<C> {
    inner: Arc<C>,
    compiles: Arc<Mutex<Vec<TapKind>>>,
}

impl<C> CountingCompiler<C> {
    /// Wrap `inner`.
    pub fn new(inner: C) -> Self {
        Self {
            inner: Arc::new(inner),
            compiles: Arc::default(),
        }
    }

    /// Total number of compilations.
    pub fn count(&self) -> usize {
        self.compiles.lock().len()
    }

    /// Number of compilations for one convention.
    pub fn count_for(&self, kind: TapKind) -> usize {
        self.compiles.lock().iter().filter(|k| **k == kind).count()
    }
}

impl<C> Clone for CountingCompiler<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            compiles: Arc::clone(&self.compiles),
        }
    }
}

impl<A, R, C: Compiler<A, R>> Compiler<A, R> for CountingCompiler<C> {
    fn compile(&self, spec: CompileSpec<'_, A, R>) -> Result<CompiledCall<A, R>, HookError> {
        self.compiles.lock().push(spec.kind);
        self.inner.compile(spec)
    }

    fn accepts(&self) -> TapKinds {
        self.inner.accepts()
    }
}

// ============================================================================
// Recording Interceptor
// ============================================================================

/// An interceptor that records the callbacks it receives, in order.
///
/// Entries look like `register:<tap>`, `call`, `tap:<tap>`, `loop`,
/// `result`, `error:<message>` and `done`.
#[derive(Clone, Default)]
pub struct RecordingInterceptor {
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingInterceptor {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded entries so far.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    /// Forget everything recorded.
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    fn push(&self, event: String) {
        self.events.lock().push(event);
    }
}

impl<A: 'static, R: 'static> Interceptor<A, R> for RecordingInterceptor {
    fn register(&self, tap: &Tap<A, R>) -> Option<Tap<A, R>> {
        self.push(format!("register:{}", tap.name));
        None
    }

    fn call(&self, _args: &A) {
        self.push("call".into());
    }

    fn tap(&self, tap: &Tap<A, R>) {
        self.push(format!("tap:{}", tap.name));
    }

    fn on_loop(&self, _args: &A) {
        self.push("loop".into());
    }

    fn result(&self, _result: &R) {
        self.push("result".into());
    }

    fn error(&self, error: &BoxError) {
        self.push(format!("error:{error}"));
    }

    fn done(&self) {
        self.push("done".into());
    }
}

// ============================================================================
// Order Log
// ============================================================================

/// A shared, append-only log of names.
///
/// Useful for asserting the order in which taps ran.
#[derive(Clone, Default)]
pub struct OrderLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl OrderLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    /// Snapshot of the entries.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing was logged.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// A direct tap that logs `name` and returns `value`.
    pub fn recorder<A, R>(&self, name: &str, value: Option<R>) -> TapFn<A, R>
    where
        A: 'static,
        R: Clone + Send + Sync + 'static,
    {
        let log = self.clone();
        let name = name.to_owned();
        TapFn::sync(move |_: &A| {
            log.push(name.clone());
            Ok(value.clone())
        })
    }

    /// A completion-callback tap that logs `name` and completes inline.
    pub fn callback_recorder<A, R>(&self, name: &str, value: Option<R>) -> TapFn<A, R>
    where
        A: 'static,
        R: Clone + Send + Sync + 'static,
    {
        let log = self.clone();
        let name = name.to_owned();
        TapFn::callback(move |_: &A, done| {
            log.push(name.clone());
            done(Ok(value.clone()));
        })
    }

    /// A deferred tap that logs `name` when polled and returns `value`.
    pub fn promise_recorder<A, R>(&self, name: &str, value: Option<R>) -> TapFn<A, R>
    where
        A: 'static,
        R: Clone + Send + Sync + 'static,
    {
        let log = self.clone();
        let name = name.to_owned();
        TapFn::promise(move |_: A| {
            let log = log.clone();
            let name = name.clone();
            let value = value.clone();
            async move {
                log.push(name);
                Ok::<_, BoxError>(value)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compilers::SeriesCompiler;

    #[test]
    fn counting_compiler_counts_per_kind() {
        let compiler = CountingCompiler::new(SeriesCompiler);
        for kind in [TapKind::Sync, TapKind::Promise, TapKind::Sync] {
            let spec = CompileSpec::<(), ()> {
                taps: &[],
                interceptors: &[],
                args: &[],
                name: None,
                kind,
            };
            compiler.compile(spec).unwrap();
        }
        assert_eq!(compiler.count(), 3);
        assert_eq!(compiler.count_for(TapKind::Sync), 2);
        assert_eq!(compiler.count_for(TapKind::Async), 0);
    }
}
