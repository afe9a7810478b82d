//! Error types for taphook.
//!
//! Everything the core can fail with is a [`HookError`]. Failures raised by
//! tap callbacks travel as [`BoxError`] through compiled dispatchers and are
//! wrapped into [`HookError::Tap`] at the hook surface.

use crate::tap::TapKind;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by hook registration, compilation and dispatch.
#[derive(Error, Debug)]
pub enum HookError {
    /// Tap options were malformed or the tap name was missing.
    #[error("invalid tap registration: {0}")]
    InvalidRegistration(String),

    /// The hook was built without a compiler.
    #[error("hook has no compiler; a concrete flavor must be supplied")]
    Unimplemented,

    /// The compiler refuses to produce a dispatcher for this convention.
    #[error("{0} calls are not supported by this hook")]
    UnsupportedCall(TapKind),

    /// The compiler produced a dispatcher for the wrong convention.
    #[error("compiler returned a {found} dispatcher for a {expected} call")]
    ConventionMismatch {
        /// The convention the caller asked for.
        expected: TapKind,
        /// The convention the compiler delivered.
        found: TapKind,
    },

    /// A direct call could not finish without yielding.
    #[error("dispatch did not complete synchronously")]
    NotSynchronous,

    /// A completion callback was dropped without being invoked.
    #[error("tap `{0}` dropped its completion callback")]
    CallbackDropped(String),

    /// A tap failed.
    #[error(transparent)]
    Tap(BoxError),
}

impl HookError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        HookError::InvalidRegistration(reason.into())
    }
}

impl From<BoxError> for HookError {
    fn from(err: BoxError) -> Self {
        // Core errors boxed by a dispatcher come back out unchanged.
        match err.downcast::<HookError>() {
            Ok(hook) => *hook,
            Err(other) => HookError::Tap(other),
        }
    }
}
