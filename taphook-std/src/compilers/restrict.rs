//! Wrappers narrowing what a flavor allows.

use taphook_core::{CompileSpec, CompiledCall, Compiler, HookError, TapKind, TapKinds};

/// Accepts only direct taps at registration.
///
/// The synchronous hook family: `tap_async` and `tap_promise` are refused,
/// every calling convention stays available.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyncOnly<C>(pub C);

impl<A, R, C: Compiler<A, R>> Compiler<A, R> for SyncOnly<C> {
    fn compile(&self, spec: CompileSpec<'_, A, R>) -> Result<CompiledCall<A, R>, HookError> {
        self.0.compile(spec)
    }

    fn accepts(&self) -> TapKinds {
        TapKinds::SYNC
    }
}

/// Refuses direct calls.
///
/// The asynchronous hook family: taps may be of any kind, but dispatch
/// must go through the completion-callback or deferred-result convention.
#[derive(Debug, Default, Clone, Copy)]
pub struct AsyncOnly<C>(pub C);

impl<A, R, C: Compiler<A, R>> Compiler<A, R> for AsyncOnly<C> {
    fn compile(&self, spec: CompileSpec<'_, A, R>) -> Result<CompiledCall<A, R>, HookError> {
        if spec.kind == TapKind::Sync {
            return Err(HookError::UnsupportedCall(TapKind::Sync));
        }
        self.0.compile(spec)
    }

    fn accepts(&self) -> TapKinds {
        self.0.accepts()
    }
}
