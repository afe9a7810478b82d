//! Re-run-until-stable flavor.

use crate::run::{Plan, into_call, invoke, runner};
use std::sync::Arc;
use taphook_core::{
    CompileSpec, CompiledCall, Compiler, HookArgs, HookError, HookOutput, TapResult,
};

/// Restarts from the first tap whenever a tap returns a value.
///
/// The dispatch ends after a pass in which every tap returned `None`.
/// Interceptors see `on_loop` at the start of every pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoopCompiler;

async fn looping<A: HookArgs, R: HookOutput>(plan: Arc<Plan<A, R>>, args: A) -> TapResult<R> {
    'pass: loop {
        plan.on_loop(&args);
        for tap in &plan.taps {
            plan.before_tap(tap);
            if invoke(tap, args.clone()).await?.is_some() {
                continue 'pass;
            }
        }
        return Ok(None);
    }
}

impl<A: HookArgs, R: HookOutput> Compiler<A, R> for LoopCompiler {
    fn compile(&self, spec: CompileSpec<'_, A, R>) -> Result<CompiledCall<A, R>, HookError> {
        Ok(into_call(spec.kind, runner(Plan::from_spec(&spec), looping)))
    }
}
