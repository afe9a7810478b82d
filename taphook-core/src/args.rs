//! Marker traits for what flows through a hook.

/// The argument bundle passed to every tap.
///
/// Usually a tuple of the positional arguments. Compiled dispatchers clone it
/// once per tap, so cheap clones (`Arc`, small tuples) are preferable.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as hook arguments",
    label = "must be `Clone + Send + Sync + 'static`",
    note = "Wrap large or non-cloneable arguments in an `Arc`."
)]
pub trait HookArgs: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> HookArgs for T {}

/// The value a tap or dispatch may produce.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be produced by a hook",
    label = "must be `Send + 'static`"
)]
pub trait HookOutput: Send + 'static {}

impl<T: Send + 'static> HookOutput for T {}
