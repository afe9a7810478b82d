#![allow(dead_code)]

use std::{fmt, time::Duration};
use taphook::{BoxError, Done, TapFn, testing::OrderLog};

// ============================================================================
// Test Argument Types
// ============================================================================

/// Bundle passed to taps in the integration tests.
#[derive(Clone, Debug, PartialEq)]
pub struct Build {
    pub target: String,
    pub optimize: bool,
}

impl Build {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_owned(),
            optimize: false,
        }
    }
}

// ============================================================================
// Test Errors
// ============================================================================

#[derive(Debug)]
pub struct PluginFailure(pub &'static str);

impl fmt::Display for PluginFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plugin failed: {}", self.0)
    }
}

impl std::error::Error for PluginFailure {}

// ============================================================================
// Test Taps
// ============================================================================

/// A direct tap that always fails.
pub fn failing<A: 'static, R: 'static>(reason: &'static str) -> TapFn<A, R> {
    TapFn::sync(move |_: &A| Err(Box::new(PluginFailure(reason)) as BoxError))
}

/// A deferred tap that sleeps, logs `name`, then returns `value`.
pub fn sleepy<A, R>(log: &OrderLog, name: &'static str, ms: u64, value: Option<R>) -> TapFn<A, R>
where
    A: Send + 'static,
    R: Clone + Send + Sync + 'static,
{
    let log = log.clone();
    TapFn::promise(move |_: A| {
        let log = log.clone();
        let value = value.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            log.push(name);
            Ok::<_, BoxError>(value)
        }
    })
}

/// A completion-callback tap that completes from another thread.
pub fn threaded<A, R>(log: &OrderLog, name: &'static str, value: Option<R>) -> TapFn<A, R>
where
    A: 'static,
    R: Clone + Send + Sync + 'static,
{
    let log = log.clone();
    TapFn::callback(move |_: &A, done: Done<R>| {
        let log = log.clone();
        let value = value.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(5));
            log.push(name);
            done(Ok(value));
        });
    })
}
