//! Registration views with pre-filled options.

use crate::hook::Hook;
use serde_json::{Map, Value};
use std::future::Future;
use taphook_core::{
    Done, DynInterceptor, HookError, Interceptor, IntoTapOptions, TapFn, TapResult, merge_defaults,
};

/// A view of a [`Hook`] that merges default options into every registration.
///
/// Per-call options win over the defaults. The view holds no taps of its
/// own: everything it registers lands on the underlying hook.
///
/// # Example
///
/// ```rust,ignore
/// let plugin = hook.with_options(json!({ "plugin": "minifier", "stage": 10 }));
/// plugin.tap("compress", |_| Ok(None))?;
/// assert_eq!(hook.taps()[0].stage, 10.0);
/// ```
pub struct ScopedHook<'h, A, R> {
    hook: &'h Hook<A, R>,
    defaults: Map<String, Value>,
}

impl<'h, A: 'static, R: 'static> ScopedHook<'h, A, R> {
    pub(crate) fn new(hook: &'h Hook<A, R>, defaults: Value) -> Self {
        let defaults = match defaults {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self { hook, defaults }
    }

    /// The hook this view registers on.
    pub fn hook(&self) -> &'h Hook<A, R> {
        self.hook
    }

    /// The merged defaults of this view.
    pub fn defaults(&self) -> &Map<String, Value> {
        &self.defaults
    }

    /// Display name of the underlying hook.
    pub fn name(&self) -> Option<&str> {
        self.hook.name()
    }

    /// Whether the underlying hook has any tap or interceptor.
    pub fn is_used(&self) -> bool {
        self.hook.is_used()
    }

    /// A nested view; `defaults` are layered over this view's defaults.
    pub fn with_options(&self, defaults: Value) -> ScopedHook<'h, A, R> {
        let mut merged = self.defaults.clone();
        if let Value::Object(map) = defaults {
            merged.extend(map);
        }
        ScopedHook {
            hook: self.hook,
            defaults: merged,
        }
    }

    /// Register `callback` with the merged options.
    pub fn register(&self, options: impl IntoTapOptions, callback: TapFn<A, R>) -> Result<(), HookError> {
        let options = merge_defaults(&self.defaults, options.into_options_value());
        self.hook.register(options, callback)
    }

    /// Register a direct-style tap.
    pub fn tap<F>(&self, options: impl IntoTapOptions, callback: F) -> Result<(), HookError>
    where
        F: Fn(&A) -> TapResult<R> + Send + Sync + 'static,
    {
        self.register(options, TapFn::sync(callback))
    }

    /// Register a completion-callback-style tap.
    pub fn tap_async<F>(&self, options: impl IntoTapOptions, callback: F) -> Result<(), HookError>
    where
        F: Fn(&A, Done<R>) + Send + Sync + 'static,
    {
        self.register(options, TapFn::callback(callback))
    }

    /// Register a tap returning a future.
    pub fn tap_promise<F, Fut>(&self, options: impl IntoTapOptions, callback: F) -> Result<(), HookError>
    where
        A: 'static,
        R: 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TapResult<R>> + Send + 'static,
    {
        self.register(options, TapFn::promise(callback))
    }

    /// Attach an interceptor to the underlying hook. Defaults do not apply.
    pub fn intercept(&self, interceptor: impl Interceptor<A, R>) {
        self.hook.intercept(interceptor);
    }

    /// Attach a shared interceptor to the underlying hook.
    pub fn intercept_shared(&self, interceptor: DynInterceptor<A, R>) {
        self.hook.intercept_shared(interceptor);
    }
}

#[cfg(test)]
mod tests {
    use crate::hook::Hook;
    use serde_json::json;
    use taphook_std::SeriesCompiler;

    fn hook() -> Hook<(), ()> {
        Hook::new(["x"], SeriesCompiler)
    }

    #[test]
    fn call_options_win_over_defaults() {
        let hook = hook();
        let view = hook.with_options(json!({ "stage": 5, "plugin": "p" }));
        view.tap("plain", |_: &()| Ok(None)).unwrap();
        view.tap(json!({ "name": "early", "stage": -1 }), |_: &()| Ok(None))
            .unwrap();

        let taps = hook.taps();
        assert_eq!(hook.tap_names(), ["early", "plain"]);
        assert_eq!(taps[0].stage, -1.0);
        assert_eq!(taps[1].stage, 5.0);
        assert_eq!(taps[1].meta.get("plugin"), Some(&json!("p")));
    }

    #[test]
    fn views_nest() {
        let hook = hook();
        let outer = hook.with_options(json!({ "plugin": "outer", "stage": 1 }));
        let inner = outer.with_options(json!({ "plugin": "inner" }));
        inner.tap("t", |_: &()| Ok(None)).unwrap();

        let taps = hook.taps();
        let tap = &taps[0];
        assert_eq!(tap.stage, 1.0);
        assert_eq!(tap.meta.get("plugin"), Some(&json!("inner")));
        assert_eq!(outer.defaults().get("plugin"), Some(&json!("outer")));
    }

    #[test]
    fn non_object_defaults_are_ignored() {
        let hook = hook();
        let view = hook.with_options(json!("nonsense"));
        assert!(view.defaults().is_empty());
        view.tap("t", |_: &()| Ok(None)).unwrap();
        assert!(view.is_used());
    }

    #[test]
    fn defaults_can_supply_the_name() {
        let hook = hook();
        let view = hook.with_options(json!({ "name": "from-defaults" }));
        view.tap(json!({ "stage": 1 }), |_: &()| Ok(None)).unwrap();
        assert_eq!(hook.tap_names(), ["from-defaults"]);
    }
}
