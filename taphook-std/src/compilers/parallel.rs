//! Concurrent flavors.
//!
//! Both start every tap before awaiting any of them. Neither can serve a
//! direct call. Once the outcome is known the dispatch returns; taps still
//! in flight keep running to completion on their own.

use crate::{
    drive::drive,
    run::{Plan, into_call, invoke, runner},
};
use futures::{FutureExt, StreamExt, stream::FuturesUnordered};
use std::sync::Arc;
use taphook_core::{
    BoxError, CompileSpec, CompiledCall, Compiler, HookArgs, HookError, HookOutput, TapKind,
    TapResult,
};

/// Runs all taps concurrently and waits for all of them.
///
/// The first error to arrive fails the dispatch.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParallelCompiler;

async fn parallel<A: HookArgs, R: HookOutput>(plan: Arc<Plan<A, R>>, args: A) -> TapResult<R> {
    let mut pending: FuturesUnordered<_> = plan
        .taps
        .iter()
        .map(|tap| {
            plan.before_tap(tap);
            invoke(tap, args.clone())
        })
        .collect();
    while let Some(outcome) = pending.next().await {
        if let Err(err) = outcome {
            detach(pending);
            return Err(err);
        }
    }
    Ok(None)
}

impl<A: HookArgs, R: HookOutput> Compiler<A, R> for ParallelCompiler {
    fn compile(&self, spec: CompileSpec<'_, A, R>) -> Result<CompiledCall<A, R>, HookError> {
        if spec.kind == TapKind::Sync {
            return Err(HookError::UnsupportedCall(TapKind::Sync));
        }
        Ok(into_call(spec.kind, runner(Plan::from_spec(&spec), parallel)))
    }
}

/// Runs all taps concurrently; the earliest tap in registry order that
/// produced a value or an error decides the outcome.
///
/// The dispatch settles as soon as that tap and every tap registered before
/// it have finished. Later taps do not hold it up.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParallelBailCompiler;

async fn parallel_bail<A: HookArgs, R: HookOutput>(
    plan: Arc<Plan<A, R>>,
    args: A,
) -> TapResult<R> {
    let mut pending: FuturesUnordered<_> = plan
        .taps
        .iter()
        .enumerate()
        .map(|(index, tap)| {
            plan.before_tap(tap);
            invoke(tap, args.clone()).map(move |outcome| (index, outcome))
        })
        .collect();
    let mut settled: Vec<Option<TapResult<R>>> = plan.taps.iter().map(|_| None).collect();
    // Taps before `next` all finished with `None`.
    let mut next = 0;
    while let Some((index, outcome)) = pending.next().await {
        settled[index] = Some(outcome);
        while let Some(slot) = settled.get_mut(next) {
            match slot.take() {
                None => break,
                Some(Ok(None)) => next += 1,
                Some(decided) => {
                    detach(pending);
                    return decided;
                }
            }
        }
    }
    Ok(None)
}

impl<A: HookArgs, R: HookOutput> Compiler<A, R> for ParallelBailCompiler {
    fn compile(&self, spec: CompileSpec<'_, A, R>) -> Result<CompiledCall<A, R>, HookError> {
        if spec.kind == TapKind::Sync {
            return Err(HookError::UnsupportedCall(TapKind::Sync));
        }
        Ok(into_call(spec.kind, runner(Plan::from_spec(&spec), parallel_bail)))
    }
}

/// Keep polling taps whose outcome no longer matters.
fn detach<F>(mut rest: FuturesUnordered<F>)
where
    F: Future + Send + 'static,
{
    if rest.is_empty() {
        return;
    }
    drive(
        Box::pin(async move {
            while rest.next().await.is_some() {}
            Ok::<_, BoxError>(None::<()>)
        }),
        Box::new(|_: TapResult<()>| {}),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::OrderLog;
    use std::time::Duration;
    use taphook_core::{Tap, TapFn};

    fn delayed(ms: u64, value: Option<u8>) -> TapFn<(), u8> {
        TapFn::promise(move |_: ()| async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok::<_, BoxError>(value)
        })
    }

    fn promise_call<C: Compiler<(), u8>>(
        compiler: C,
        taps: &[Tap<(), u8>],
    ) -> taphook_core::PromiseFn<(), u8> {
        let spec = CompileSpec {
            taps,
            interceptors: &[],
            args: &[],
            name: None,
            kind: TapKind::Promise,
        };
        match compiler.compile(spec).unwrap() {
            CompiledCall::Promise(f) => f,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn direct_calls_are_refused() {
        let spec = CompileSpec::<(), u8> {
            taps: &[],
            interceptors: &[],
            args: &[],
            name: None,
            kind: TapKind::Sync,
        };
        assert!(matches!(
            ParallelCompiler.compile(spec),
            Err(HookError::UnsupportedCall(TapKind::Sync))
        ));
    }

    #[tokio::test]
    async fn taps_overlap() {
        let taps: Vec<_> = (0..4)
            .map(|i| Tap::new(format!("t{i}"), delayed(40, None)))
            .collect();
        let call = promise_call(ParallelCompiler, &taps);
        let started = tokio::time::Instant::now();
        assert_eq!(call(()).await.unwrap(), None);
        assert!(started.elapsed() < Duration::from_millis(150));
    }

    #[tokio::test]
    async fn first_error_fails_the_dispatch() {
        let taps = vec![
            Tap::new("slow", delayed(20, None)),
            Tap::new(
                "broken",
                TapFn::promise(|_: ()| async { Err::<Option<u8>, BoxError>("broken".into()) }),
            ),
        ];
        let call = promise_call(ParallelCompiler, &taps);
        assert_eq!(call(()).await.unwrap_err().to_string(), "broken");
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn siblings_finish_after_an_error() {
        let log = OrderLog::new();
        let slow = {
            let log = log.clone();
            TapFn::promise(move |_: ()| {
                let log = log.clone();
                async move {
                    tokio::time::sleep(Duration::from_millis(30)).await;
                    log.push("slow");
                    Ok::<_, BoxError>(None)
                }
            })
        };
        let taps = vec![
            Tap::new("slow", slow),
            Tap::new(
                "broken",
                TapFn::promise(|_: ()| async { Err::<Option<u8>, BoxError>("boom".into()) }),
            ),
        ];
        let call = promise_call(ParallelCompiler, &taps);
        assert_eq!(call(()).await.unwrap_err().to_string(), "boom");
        assert!(log.is_empty());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(log.entries(), ["slow"]);
    }

    #[tokio::test]
    async fn bail_does_not_wait_for_later_taps() {
        let taps = vec![
            Tap::new("fast", delayed(0, Some(1))),
            Tap::new("slow", delayed(200, Some(2))),
        ];
        let call = promise_call(ParallelBailCompiler, &taps);
        let started = tokio::time::Instant::now();
        assert_eq!(call(()).await.unwrap(), Some(1));
        assert!(started.elapsed() < Duration::from_millis(100));

        // Let the detached tap finish before the runtime goes away.
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    #[tokio::test]
    async fn bail_waits_for_earlier_undecided_taps() {
        let taps = vec![
            Tap::new("quiet", delayed(30, None)),
            Tap::new("answer", delayed(0, Some(2))),
            Tap::new("late", delayed(200, Some(3))),
        ];
        let call = promise_call(ParallelBailCompiler, &taps);
        let started = tokio::time::Instant::now();
        assert_eq!(call(()).await.unwrap(), Some(2));
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(30));
        assert!(elapsed < Duration::from_millis(150));

        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    #[tokio::test]
    async fn bail_reports_an_earlier_error() {
        let taps = vec![
            Tap::new(
                "broken",
                TapFn::promise(|_: ()| async { Err::<Option<u8>, BoxError>("broken".into()) }),
            ),
            Tap::new("value", delayed(0, Some(2))),
        ];
        let call = promise_call(ParallelBailCompiler, &taps);
        assert_eq!(call(()).await.unwrap_err().to_string(), "broken");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    #[tokio::test]
    async fn bail_without_values_is_none() {
        let taps = vec![Tap::new("a", delayed(5, None)), Tap::new("b", delayed(0, None))];
        let call = promise_call(ParallelBailCompiler, &taps);
        assert_eq!(call(()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn bail_prefers_registry_order() {
        let taps = vec![
            Tap::new("slow", delayed(30, Some(1))),
            Tap::new("fast", delayed(0, Some(2))),
        ];
        let call = promise_call(ParallelBailCompiler, &taps);
        assert_eq!(call(()).await.unwrap(), Some(1));
    }
}
