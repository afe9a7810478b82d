//! # taphook-core
//!
//! Core types for the taphook extension-point dispatcher.
//!
//! This crate has minimal dependencies and is meant to be imported by code
//! that writes its own hook flavors or interceptors without pulling in the
//! standard implementations.
//!
//! # Pieces
//!
//! - [`Tap`]: a registered callback plus its scheduling metadata (name,
//!   stage, `before` constraints, opaque metadata). The callback is a
//!   [`TapFn`] tagged with its calling convention ([`TapKind`]).
//! - [`TapOptions`]: the registration options a tap is built from, with the
//!   normalization rules for bare names and option objects.
//! - [`Interceptor`]: rewrites taps at registration time and observes
//!   dispatches.
//! - [`Compiler`]: turns `{ taps, interceptors, args, kind }` into a
//!   [`CompiledCall`]. This is where the semantics of a hook flavor live;
//!   the core never interprets tap results.
//!
//! # Error Types
//!
//! - [`HookError`] - every failure the core reports
//! - [`BoxError`] - failures raised by tap callbacks

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod args;
mod compiler;
mod error;
mod interceptor;
mod options;
mod tap;

// Re-exports
pub use args::{HookArgs, HookOutput};
pub use compiler::{CompileSpec, CompiledCall, Compiler};
pub use error::{BoxError, HookError};
pub use interceptor::{DynInterceptor, Interceptor, RegisterFn, run_register};
pub use options::{IntoTapOptions, TapOptions, merge_defaults};
pub use tap::{
    AsyncFn, BoxFuture, Done, PromiseFn, SyncFn, Tap, TapFn, TapKind, TapKinds, TapResult,
};
