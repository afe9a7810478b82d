//! Constructors for the classic hook classes.
//!
//! | Constructor | Taps | Conventions | Result |
//! |---|---|---|---|
//! | [`sync_hook`] | direct | all | `None` |
//! | [`sync_bail_hook`] | direct | all | first `Some` |
//! | [`sync_waterfall_hook`] | direct | all | threaded value |
//! | [`sync_loop_hook`] | direct | all | `None` |
//! | [`async_series_hook`] | any | callback, deferred | `None` |
//! | [`async_series_bail_hook`] | any | callback, deferred | first `Some` |
//! | [`async_series_waterfall_hook`] | any | callback, deferred | threaded value |
//! | [`async_series_loop_hook`] | any | callback, deferred | `None` |
//! | [`async_parallel_hook`] | any | callback, deferred | `None` |
//! | [`async_parallel_bail_hook`] | any | callback, deferred | earliest `Some` |

use crate::hook::Hook;
use taphook_core::{HookArgs, HookOutput};
use taphook_std::{
    AsyncOnly, BailCompiler, LoopCompiler, ParallelBailCompiler, ParallelCompiler,
    SeriesCompiler, SyncOnly, WaterfallCompiler,
};

/// Runs every tap in order.
pub fn sync_hook<A, R, I, S>(args: I) -> Hook<A, R>
where
    A: HookArgs,
    R: HookOutput,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Hook::new(args, SyncOnly(SeriesCompiler))
}

/// Stops at the first tap returning a value.
pub fn sync_bail_hook<A, R, I, S>(args: I) -> Hook<A, R>
where
    A: HookArgs,
    R: HookOutput,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Hook::new(args, SyncOnly(BailCompiler))
}

/// Threads the argument through every tap.
pub fn sync_waterfall_hook<A, I, S>(args: I) -> Hook<A, A>
where
    A: HookArgs,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Hook::new(args, SyncOnly(WaterfallCompiler))
}

/// Restarts from the first tap until a full pass returns nothing.
pub fn sync_loop_hook<A, R, I, S>(args: I) -> Hook<A, R>
where
    A: HookArgs,
    R: HookOutput,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Hook::new(args, SyncOnly(LoopCompiler))
}

/// Runs every tap in order, waiting on each.
pub fn async_series_hook<A, R, I, S>(args: I) -> Hook<A, R>
where
    A: HookArgs,
    R: HookOutput,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Hook::new(args, AsyncOnly(SeriesCompiler))
}

/// Waits on each tap in order and stops at the first value.
pub fn async_series_bail_hook<A, R, I, S>(args: I) -> Hook<A, R>
where
    A: HookArgs,
    R: HookOutput,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Hook::new(args, AsyncOnly(BailCompiler))
}

/// Waits on each tap in order, threading the argument through.
pub fn async_series_waterfall_hook<A, I, S>(args: I) -> Hook<A, A>
where
    A: HookArgs,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Hook::new(args, AsyncOnly(WaterfallCompiler))
}

/// Waits on each tap in order, restarting whenever one returns a value.
pub fn async_series_loop_hook<A, R, I, S>(args: I) -> Hook<A, R>
where
    A: HookArgs,
    R: HookOutput,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Hook::new(args, AsyncOnly(LoopCompiler))
}

/// Starts every tap at once and waits for all of them.
pub fn async_parallel_hook<A, R, I, S>(args: I) -> Hook<A, R>
where
    A: HookArgs,
    R: HookOutput,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Hook::new(args, ParallelCompiler)
}

/// Starts every tap at once; the earliest registered tap with an outcome wins.
pub fn async_parallel_bail_hook<A, R, I, S>(args: I) -> Hook<A, R>
where
    A: HookArgs,
    R: HookOutput,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Hook::new(args, ParallelBailCompiler)
}
