//! Value-threading flavor.

use crate::run::{Plan, into_call, invoke, runner};
use std::sync::Arc;
use taphook_core::{CompileSpec, CompiledCall, Compiler, HookArgs, HookError, TapResult};

/// Threads a value through every tap.
///
/// The hook's argument type doubles as its result type. A tap returning
/// `Some(v)` replaces the value seen by later taps; `None` passes it on
/// unchanged. The dispatch yields the final value, even with no taps.
#[derive(Debug, Default, Clone, Copy)]
pub struct WaterfallCompiler;

async fn waterfall<A: HookArgs>(plan: Arc<Plan<A, A>>, args: A) -> TapResult<A> {
    let mut current = args;
    for tap in &plan.taps {
        plan.before_tap(tap);
        if let Some(next) = invoke(tap, current.clone()).await? {
            current = next;
        }
    }
    Ok(Some(current))
}

impl<A: HookArgs> Compiler<A, A> for WaterfallCompiler {
    fn compile(&self, spec: CompileSpec<'_, A, A>) -> Result<CompiledCall<A, A>, HookError> {
        Ok(into_call(spec.kind, runner(Plan::from_spec(&spec), waterfall)))
    }
}
