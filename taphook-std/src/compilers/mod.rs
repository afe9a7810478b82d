//! Standard hook flavors.
//!
//! Each flavor is a [`Compiler`](taphook_core::Compiler). All of them run
//! taps in registry order and accept every tap kind; wrap them in
//! [`SyncOnly`] or [`AsyncOnly`] to narrow what a hook allows.
//!
//! | Flavor | Result |
//! |---|---|
//! | [`SeriesCompiler`] | always `None` |
//! | [`BailCompiler`] | first `Some` returned by a tap |
//! | [`WaterfallCompiler`] | the value threaded through every tap |
//! | [`LoopCompiler`] | `None`, after a full pass where no tap returned `Some` |
//! | [`ParallelCompiler`] | `None`, after every tap finished |
//! | [`ParallelBailCompiler`] | the earliest tap's `Some`, in registry order |

mod looping;
mod parallel;
mod restrict;
mod series;
mod waterfall;

pub use looping::LoopCompiler;
pub use parallel::{ParallelBailCompiler, ParallelCompiler};
pub use restrict::{AsyncOnly, SyncOnly};
pub use series::{BailCompiler, SeriesCompiler};
pub use waterfall::WaterfallCompiler;
