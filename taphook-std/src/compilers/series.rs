//! Sequential flavors.

use crate::run::{Plan, into_call, invoke, runner};
use std::sync::Arc;
use taphook_core::{
    CompileSpec, CompiledCall, Compiler, HookArgs, HookError, HookOutput, TapResult,
};

/// Runs every tap in order; the first error aborts the dispatch.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeriesCompiler;

async fn series<A: HookArgs, R: HookOutput>(plan: Arc<Plan<A, R>>, args: A) -> TapResult<R> {
    for tap in &plan.taps {
        plan.before_tap(tap);
        invoke(tap, args.clone()).await?;
    }
    Ok(None)
}

impl<A: HookArgs, R: HookOutput> Compiler<A, R> for SeriesCompiler {
    fn compile(&self, spec: CompileSpec<'_, A, R>) -> Result<CompiledCall<A, R>, HookError> {
        Ok(into_call(spec.kind, runner(Plan::from_spec(&spec), series)))
    }
}

/// Runs taps in order until one returns a value.
#[derive(Debug, Default, Clone, Copy)]
pub struct BailCompiler;

async fn bail<A: HookArgs, R: HookOutput>(plan: Arc<Plan<A, R>>, args: A) -> TapResult<R> {
    for tap in &plan.taps {
        plan.before_tap(tap);
        if let Some(value) = invoke(tap, args.clone()).await? {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

impl<A: HookArgs, R: HookOutput> Compiler<A, R> for BailCompiler {
    fn compile(&self, spec: CompileSpec<'_, A, R>) -> Result<CompiledCall<A, R>, HookError> {
        Ok(into_call(spec.kind, runner(Plan::from_spec(&spec), bail)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::OrderLog;
    use taphook_core::{Tap, TapFn, TapKind};

    fn compile<C: Compiler<(), u8>>(
        compiler: &C,
        taps: &[Tap<(), u8>],
    ) -> taphook_core::SyncFn<(), u8> {
        let spec = CompileSpec {
            taps,
            interceptors: &[],
            args: &[],
            name: None,
            kind: TapKind::Sync,
        };
        match compiler.compile(spec).unwrap() {
            CompiledCall::Sync(f) => f,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn series_runs_everything() {
        let log = OrderLog::new();
        let taps = vec![
            Tap::new("a", log.recorder("a", Some(1))),
            Tap::new("b", log.recorder("b", None)),
        ];
        let call = compile(&SeriesCompiler, &taps);
        assert_eq!(call(&()).unwrap(), None);
        assert_eq!(log.entries(), ["a", "b"]);
    }

    #[test]
    fn series_stops_on_error() {
        let log = OrderLog::new();
        let taps = vec![
            Tap::new("a", TapFn::sync(|_: &()| Err("nope".into()))),
            Tap::new("b", log.recorder("b", None)),
        ];
        let call = compile(&SeriesCompiler, &taps);
        assert_eq!(call(&()).unwrap_err().to_string(), "nope");
        assert!(log.entries().is_empty());
    }

    #[test]
    fn bail_stops_at_first_value() {
        let log = OrderLog::new();
        let taps = vec![
            Tap::new("a", log.recorder("a", None)),
            Tap::new("b", log.recorder("b", Some(2))),
            Tap::new("c", log.recorder("c", Some(3))),
        ];
        let call = compile(&BailCompiler, &taps);
        assert_eq!(call(&()).unwrap(), Some(2));
        assert_eq!(log.entries(), ["a", "b"]);
    }
}
