//! Taps: registered callbacks and their scheduling metadata.

use crate::error::BoxError;
use bitflags::bitflags;
use std::{fmt, future::Future, pin::Pin, sync::Arc};

/// A pinned, boxed, `Send` future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a single tap produces. `None` means "no value".
pub type TapResult<R> = Result<Option<R>, BoxError>;

/// Completion callback handed to completion-callback taps and dispatchers.
pub type Done<R> = Box<dyn FnOnce(TapResult<R>) + Send + 'static>;

/// Direct-style callback.
pub type SyncFn<A, R> = Arc<dyn Fn(&A) -> TapResult<R> + Send + Sync + 'static>;

/// Completion-callback-style callback.
pub type AsyncFn<A, R> = Arc<dyn Fn(&A, Done<R>) + Send + Sync + 'static>;

/// Deferred-result-style callback.
pub type PromiseFn<A, R> = Arc<dyn Fn(A) -> BoxFuture<'static, TapResult<R>> + Send + Sync + 'static>;

/// Calling convention of a tap or of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TapKind {
    /// The caller blocks until the callable returns.
    Sync,
    /// The callable reports through a completion callback.
    Async,
    /// The callable returns a future.
    Promise,
}

impl TapKind {
    /// All conventions, in declaration order.
    pub const ALL: [TapKind; 3] = [TapKind::Sync, TapKind::Async, TapKind::Promise];

    /// The single-member set for this kind.
    pub fn as_set(self) -> TapKinds {
        match self {
            TapKind::Sync => TapKinds::SYNC,
            TapKind::Async => TapKinds::ASYNC,
            TapKind::Promise => TapKinds::PROMISE,
        }
    }
}

impl fmt::Display for TapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TapKind::Sync => "sync",
            TapKind::Async => "async",
            TapKind::Promise => "promise",
        })
    }
}

bitflags! {
    /// A set of [`TapKind`]s.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TapKinds: u8 {
        /// Direct-style.
        const SYNC = 1;
        /// Completion-callback-style.
        const ASYNC = 1 << 1;
        /// Deferred-result-style.
        const PROMISE = 1 << 2;
    }
}

impl TapKinds {
    /// Whether `kind` is a member.
    pub fn allows(self, kind: TapKind) -> bool {
        self.contains(kind.as_set())
    }
}

/// The callback of a tap, tagged with its calling convention.
pub enum TapFn<A, R> {
    /// See [`SyncFn`].
    Sync(SyncFn<A, R>),
    /// See [`AsyncFn`].
    Async(AsyncFn<A, R>),
    /// See [`PromiseFn`].
    Promise(PromiseFn<A, R>),
}

impl<A, R> TapFn<A, R> {
    /// Wrap a direct-style closure.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&A) -> TapResult<R> + Send + Sync + 'static,
    {
        TapFn::Sync(Arc::new(f))
    }

    /// Wrap a completion-callback-style closure.
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&A, Done<R>) + Send + Sync + 'static,
    {
        TapFn::Async(Arc::new(f))
    }

    /// Wrap a closure returning a future.
    pub fn promise<F, Fut>(f: F) -> Self
    where
        A: 'static,
        R: 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TapResult<R>> + Send + 'static,
    {
        TapFn::Promise(Arc::new(move |args| -> BoxFuture<'static, TapResult<R>> {
            Box::pin(f(args))
        }))
    }

    /// The calling convention of this callback.
    pub fn kind(&self) -> TapKind {
        match self {
            TapFn::Sync(_) => TapKind::Sync,
            TapFn::Async(_) => TapKind::Async,
            TapFn::Promise(_) => TapKind::Promise,
        }
    }
}

impl<A, R> Clone for TapFn<A, R> {
    fn clone(&self) -> Self {
        match self {
            TapFn::Sync(f) => TapFn::Sync(Arc::clone(f)),
            TapFn::Async(f) => TapFn::Async(Arc::clone(f)),
            TapFn::Promise(f) => TapFn::Promise(Arc::clone(f)),
        }
    }
}

impl<A, R> fmt::Debug for TapFn<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TapFn::{:?}", self.kind())
    }
}

/// A registered callback plus its scheduling metadata.
///
/// Taps are plain values: interceptors rewrite them by returning a modified
/// clone, never by mutating one in place.
pub struct Tap<A, R> {
    /// Identifying name, never empty. Duplicates are allowed.
    pub name: String,
    /// Priority, lower runs earlier. Any finite number.
    pub stage: f64,
    /// Names of taps this one must precede.
    pub before: Vec<String>,
    /// Extra registration fields, passed through untouched.
    pub meta: serde_json::Map<String, serde_json::Value>,
    /// The callback.
    pub callback: TapFn<A, R>,
}

impl<A, R> Tap<A, R> {
    /// A stage-0 tap with no constraints.
    pub fn new(name: impl Into<String>, callback: TapFn<A, R>) -> Self {
        Self {
            name: name.into(),
            stage: 0.0,
            before: Vec::new(),
            meta: serde_json::Map::new(),
            callback,
        }
    }

    /// Calling convention of the callback.
    pub fn kind(&self) -> TapKind {
        self.callback.kind()
    }

    /// Set the stage.
    pub fn with_stage(mut self, stage: impl Into<f64>) -> Self {
        self.stage = stage.into();
        self
    }

    /// Add a name this tap must precede.
    pub fn with_before(mut self, name: impl Into<String>) -> Self {
        self.before.push(name.into());
        self
    }

    /// Set a metadata field.
    pub fn with_meta(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.meta.insert(key.into(), value);
        self
    }
}

impl<A, R> Clone for Tap<A, R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            stage: self.stage,
            before: self.before.clone(),
            meta: self.meta.clone(),
            callback: self.callback.clone(),
        }
    }
}

impl<A, R> fmt::Debug for Tap<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tap")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("stage", &self.stage)
            .field("before", &self.before)
            .field("meta", &self.meta)
            .finish()
    }
}
