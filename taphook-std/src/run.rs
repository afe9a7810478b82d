//! Shared machinery for the standard flavors.
//!
//! Every flavor is written once as an async flow over a [`Plan`]. The flow is
//! then adapted to whichever calling convention was requested.

use crate::drive::drive;
use futures::{
    channel::oneshot,
    future,
    task::{Context, Poll, noop_waker_ref},
};
use std::{future::Future, sync::Arc};
use taphook_core::{
    BoxError, BoxFuture, CompileSpec, CompiledCall, Done, DynInterceptor, HookArgs, HookError,
    HookOutput, PromiseFn, Tap, TapFn, TapKind, TapResult,
};

/// Snapshot of a tap set taken at compile time.
pub struct Plan<A, R> {
    pub(crate) taps: Vec<Tap<A, R>>,
    pub(crate) interceptors: Vec<DynInterceptor<A, R>>,
}

impl<A: 'static, R: 'static> Plan<A, R> {
    /// Copy what the flow needs out of a compile request.
    pub fn from_spec(spec: &CompileSpec<'_, A, R>) -> Self {
        Self {
            taps: spec.taps.to_vec(),
            interceptors: spec.interceptors.to_vec(),
        }
    }

    pub(crate) fn before_tap(&self, tap: &Tap<A, R>) {
        for interceptor in &self.interceptors {
            interceptor.tap(tap);
        }
    }

    pub(crate) fn on_loop(&self, args: &A) {
        for interceptor in &self.interceptors {
            interceptor.on_loop(args);
        }
    }

    fn on_call(&self, args: &A) {
        for interceptor in &self.interceptors {
            interceptor.call(args);
        }
    }

    fn finish(&self, outcome: &TapResult<R>) {
        for interceptor in &self.interceptors {
            match outcome {
                Ok(Some(value)) => interceptor.result(value),
                Ok(None) => interceptor.done(),
                Err(err) => interceptor.error(err),
            }
        }
    }
}

/// Start one tap and get its outcome as a future.
///
/// Direct taps run right away. Completion-callback taps are bridged through
/// a oneshot channel; a dropped callback fails the tap.
pub fn invoke<A: HookArgs, R: HookOutput>(
    tap: &Tap<A, R>,
    args: A,
) -> BoxFuture<'static, TapResult<R>> {
    match &tap.callback {
        TapFn::Sync(f) => Box::pin(future::ready(f(&args))),
        TapFn::Async(f) => {
            let (tx, rx) = oneshot::channel();
            f(
                &args,
                Box::new(move |outcome: TapResult<R>| {
                    let _ = tx.send(outcome);
                }),
            );
            let name = tap.name.clone();
            Box::pin(async move {
                match rx.await {
                    Ok(outcome) => outcome,
                    Err(oneshot::Canceled) => {
                        Err(Box::new(HookError::CallbackDropped(name)) as BoxError)
                    }
                }
            })
        }
        TapFn::Promise(f) => f(args),
    }
}

/// Wrap a flow into a deferred-result callable that notifies interceptors.
pub fn runner<A, R, F, Fut>(plan: Plan<A, R>, flow: F) -> PromiseFn<A, R>
where
    A: HookArgs,
    R: HookOutput,
    F: Fn(Arc<Plan<A, R>>, A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = TapResult<R>> + Send + 'static,
{
    let plan = Arc::new(plan);
    Arc::new(move |args: A| -> BoxFuture<'static, TapResult<R>> {
        plan.on_call(&args);
        let plan = Arc::clone(&plan);
        let outcome = flow(Arc::clone(&plan), args);
        Box::pin(async move {
            let outcome = outcome.await;
            plan.finish(&outcome);
            outcome
        })
    })
}

/// Adapt a deferred-result callable to the requested convention.
pub fn into_call<A: HookArgs, R: HookOutput>(
    kind: TapKind,
    runner: PromiseFn<A, R>,
) -> CompiledCall<A, R> {
    match kind {
        TapKind::Sync => CompiledCall::Sync(Arc::new(move |args: &A| run_now(runner(args.clone())))),
        TapKind::Async => CompiledCall::Async(Arc::new(move |args: &A, done: Done<R>| {
            drive(runner(args.clone()), done);
        })),
        TapKind::Promise => CompiledCall::Promise(runner),
    }
}

/// Poll once; anything still pending cannot serve a direct call.
pub fn run_now<R>(mut outcome: BoxFuture<'static, TapResult<R>>) -> TapResult<R> {
    let mut cx = Context::from_waker(noop_waker_ref());
    match outcome.as_mut().poll(&mut cx) {
        Poll::Ready(outcome) => outcome,
        Poll::Pending => Err(Box::new(HookError::NotSynchronous)),
    }
}
