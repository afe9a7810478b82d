//! # taphook-std
//!
//! Standard implementations for the taphook extension-point dispatcher.
//!
//! This crate provides:
//! - **Hook flavors**: [`SeriesCompiler`], [`BailCompiler`],
//!   [`WaterfallCompiler`], [`LoopCompiler`], [`ParallelCompiler`],
//!   [`ParallelBailCompiler`], and the [`SyncOnly`] / [`AsyncOnly`] wrappers
//! - **Standard interceptors**: [`LoggingInterceptor`]
//! - **Convention adapters**: [`run`] turns one async flow into a direct,
//!   completion-callback or deferred-result dispatcher
//! - **Testing utilities**: [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use taphook_core;

// Modules
pub mod compilers;
pub mod drive;
pub mod interceptors;
pub mod run;
pub mod testing;

pub use compilers::{
    AsyncOnly, BailCompiler, LoopCompiler, ParallelBailCompiler, ParallelCompiler,
    SeriesCompiler, SyncOnly, WaterfallCompiler,
};
pub use interceptors::LoggingInterceptor;
