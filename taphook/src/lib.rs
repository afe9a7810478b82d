//! # taphook - Ordered Extension Points
//!
//! `taphook` lets independent plugins attach named callbacks ("taps") to a
//! [`Hook`] and lets the host invoke them in a deterministic order. Ordering
//! is controlled per tap with a numeric `stage` and `before` constraints.
//! Interceptors can rewrite taps as they are registered and observe every
//! dispatch.
//!
//! Dispatch is compiled lazily, once per calling convention, and cached
//! until the next registration or interception.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use taphook::{sync_bail_hook, Hook};
//!
//! let resolve: Hook<(String,), String> = sync_bail_hook(["request"]);
//! resolve.tap("alias", |(req,): &(String,)| {
//!     Ok(req.strip_prefix("@/").map(|rest| format!("src/{rest}")))
//! })?;
//! resolve.tap(serde_json::json!({ "name": "fallback", "stage": 100 }), |(req,)| {
//!     Ok(Some(req.clone()))
//! })?;
//!
//! assert_eq!(resolve.call(("@/main".into(),))?, Some("src/main".into()));
//! ```
//!
//! ## Calling conventions
//!
//! | Registration | Invocation | Shape |
//! |---|---|---|
//! | [`Hook::tap`] | [`Hook::call`] | direct return |
//! | [`Hook::tap_async`] | [`Hook::call_async`] | completion callback |
//! | [`Hook::tap_promise`] | [`Hook::promise`] | future |
//!
//! Which tap kinds a hook accepts and which conventions it can be invoked
//! with depends on its flavor; see [`flavors`].

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod dispatch;
pub mod flavors;
mod hook;
mod hook_map;
mod interceptors;
mod registry;
mod scoped;

pub use dispatch::DispatchCache;
pub use flavors::{
    async_parallel_bail_hook, async_parallel_hook, async_series_bail_hook, async_series_hook,
    async_series_loop_hook, async_series_waterfall_hook, sync_bail_hook, sync_hook,
    sync_loop_hook, sync_waterfall_hook,
};
pub use hook::{Hook, HookBuilder};
pub use hook_map::{HookMap, HookMapInterceptor};
pub use interceptors::InterceptorChain;
pub use registry::TapRegistry;
pub use scoped::ScopedHook;

pub use taphook_core::{
    // Errors
    BoxError,
    // Callbacks
    BoxFuture,
    // Compilation
    CompileSpec,
    CompiledCall,
    Compiler,
    Done,
    DynInterceptor,
    // Marker traits
    HookArgs,
    HookError,
    HookOutput,
    // Interception
    Interceptor,
    IntoTapOptions,
    RegisterFn,
    // Taps
    Tap,
    TapFn,
    TapKind,
    TapKinds,
    TapOptions,
    TapResult,
};

// Standard flavors
pub use taphook_std::{
    AsyncOnly, BailCompiler, LoggingInterceptor, LoopCompiler, ParallelBailCompiler,
    ParallelCompiler, SeriesCompiler, SyncOnly, WaterfallCompiler,
};

/// Building blocks for custom flavors.
pub mod run {
    pub use taphook_std::{
        drive::drive,
        run::{Plan, into_call, invoke, run_now, runner},
    };
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use taphook_std::testing::*;
}
