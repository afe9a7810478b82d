//! The compiler seam: turning a tap set into an executable dispatcher.

use crate::{
    error::HookError,
    interceptor::DynInterceptor,
    tap::{AsyncFn, PromiseFn, SyncFn, Tap, TapKind, TapKinds},
};
use std::{fmt, sync::Arc};

/// Everything a compiler gets to see.
pub struct CompileSpec<'a, A, R> {
    /// Taps in execution order.
    pub taps: &'a [Tap<A, R>],
    /// Interceptors in attachment order.
    pub interceptors: &'a [DynInterceptor<A, R>],
    /// Declared argument names, descriptive only.
    pub args: &'a [String],
    /// Display name of the hook, if any.
    pub name: Option<&'a str>,
    /// The convention being compiled.
    pub kind: TapKind,
}

/// A compiled dispatcher for one calling convention.
///
/// The same callback shapes as [`TapFn`](crate::TapFn): a compiled
/// dispatcher looks like one big tap.
pub enum CompiledCall<A, R> {
    /// Direct.
    Sync(SyncFn<A, R>),
    /// Completion-callback.
    Async(AsyncFn<A, R>),
    /// Deferred-result.
    Promise(PromiseFn<A, R>),
}

impl<A, R> CompiledCall<A, R> {
    /// Convention of this dispatcher.
    pub fn kind(&self) -> TapKind {
        match self {
            CompiledCall::Sync(_) => TapKind::Sync,
            CompiledCall::Async(_) => TapKind::Async,
            CompiledCall::Promise(_) => TapKind::Promise,
        }
    }
}

impl<A, R> Clone for CompiledCall<A, R> {
    fn clone(&self) -> Self {
        match self {
            CompiledCall::Sync(f) => CompiledCall::Sync(Arc::clone(f)),
            CompiledCall::Async(f) => CompiledCall::Async(Arc::clone(f)),
            CompiledCall::Promise(f) => CompiledCall::Promise(Arc::clone(f)),
        }
    }
}

impl<A, R> fmt::Debug for CompiledCall<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompiledCall::{:?}", self.kind())
    }
}

/// Supplies the execution semantics of a hook flavor.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot compile hooks over `{A}` -> `{R}`",
    label = "missing `Compiler` implementation",
    note = "Implement `compile` to turn a tap set into a dispatcher."
)]
pub trait Compiler<A, R>: Send + Sync + 'static {
    /// Build a dispatcher for `spec.kind` over `spec.taps`.
    fn compile(&self, spec: CompileSpec<'_, A, R>) -> Result<CompiledCall<A, R>, HookError>;

    /// Tap kinds this flavor accepts at registration.
    fn accepts(&self) -> TapKinds {
        TapKinds::all()
    }
}

impl<A, R, C> Compiler<A, R> for Arc<C>
where
    C: Compiler<A, R> + ?Sized,
{
    fn compile(&self, spec: CompileSpec<'_, A, R>) -> Result<CompiledCall<A, R>, HookError> {
        (**self).compile(spec)
    }

    fn accepts(&self) -> TapKinds {
        (**self).accepts()
    }
}
