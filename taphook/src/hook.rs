//! The hook surface.
//!
//! A [`Hook`] combines a [`TapRegistry`], an [`InterceptorChain`] and a
//! [`DispatchCache`] behind one mutex, and forwards compilation to the
//! [`Compiler`] it was built with.
//!
//! Registration and interception take the lock. Invocation takes it only
//! long enough to fetch (or build) the dispatcher, then runs it unlocked,
//! so a tap may register further taps; those join from the next dispatch.
//! Interceptor `register` callbacks run under the lock and must not touch
//! the hook they are attached to.

use crate::{
    dispatch::DispatchCache, interceptors::InterceptorChain, registry::TapRegistry,
    scoped::ScopedHook,
};
use futures::future;
use parking_lot::Mutex;
use serde_json::Value;
use std::{
    fmt,
    future::Future,
    sync::{Arc, Once},
};
use taphook_core::{
    BoxFuture, CompileSpec, CompiledCall, Compiler, Done, DynInterceptor, HookArgs, HookError,
    HookOutput, Interceptor, IntoTapOptions, Tap, TapFn, TapKind, TapOptions, TapResult,
};

static CONTEXT_DEPRECATION: Once = Once::new();

struct HookState<A, R> {
    registry: TapRegistry<A, R>,
    interceptors: InterceptorChain<A, R>,
    cache: DispatchCache<A, R>,
}

/// One extension point.
///
/// `A` is the argument bundle every tap receives, `R` the value taps and
/// dispatches may produce.
///
/// # Example
///
/// ```rust,ignore
/// let hook: Hook<(String,)> = sync_hook(["name"]);
/// hook.tap("greet", |(name,): &(String,)| {
///     println!("hello {name}");
///     Ok(None)
/// })?;
/// hook.call(("andy".into(),))?;
/// ```
pub struct Hook<A, R = ()> {
    args: Vec<String>,
    name: Option<String>,
    compiler: Arc<dyn Compiler<A, R>>,
    state: Mutex<HookState<A, R>>,
}

impl<A: 'static, R: 'static> Hook<A, R> {
    /// Start building a hook.
    pub fn builder() -> HookBuilder<A, R> {
        HookBuilder::new()
    }

    /// An unnamed hook over `args` using `compiler`.
    pub fn new<I, S, C>(args: I, compiler: C) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        C: Compiler<A, R>,
    {
        Self::from_parts(
            args.into_iter().map(Into::into).collect(),
            None,
            Arc::new(compiler),
        )
    }

    fn from_parts(args: Vec<String>, name: Option<String>, compiler: Arc<dyn Compiler<A, R>>) -> Self {
        Self {
            args,
            name,
            compiler,
            state: Mutex::new(HookState {
                registry: TapRegistry::new(),
                interceptors: InterceptorChain::default(),
                cache: DispatchCache::default(),
            }),
        }
    }

    /// Display name, if one was given.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Declared argument names.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Whether any tap or interceptor is registered.
    pub fn is_used(&self) -> bool {
        let state = self.state.lock();
        !state.registry.is_empty() || !state.interceptors.is_empty()
    }

    /// Snapshot of the taps in execution order.
    pub fn taps(&self) -> Vec<Tap<A, R>> {
        self.state.lock().registry.taps().to_vec()
    }

    /// Names of the taps in execution order.
    pub fn tap_names(&self) -> Vec<String> {
        self.state
            .lock()
            .registry
            .taps()
            .iter()
            .map(|tap| tap.name.clone())
            .collect()
    }

    /// Whether a dispatcher for `kind` is currently cached.
    pub fn is_compiled(&self, kind: TapKind) -> bool {
        self.state.lock().cache.is_compiled(kind)
    }

    /// Register a tap built from `options` and `callback`.
    ///
    /// The options are validated, passed through every interceptor, and the
    /// resulting tap is inserted at its ordered position. Fails with
    /// [`HookError::InvalidRegistration`] on malformed options or when the
    /// hook's flavor does not accept the callback's kind.
    pub fn register(&self, options: impl IntoTapOptions, callback: TapFn<A, R>) -> Result<(), HookError> {
        let kind = callback.kind();
        if !self.compiler.accepts().allows(kind) {
            return Err(HookError::InvalidRegistration(format!(
                "{kind} taps are not supported by hook `{}`",
                self.label()
            )));
        }
        let options = TapOptions::parse(options.into_options_value())?;
        if options.uses_context() {
            CONTEXT_DEPRECATION.call_once(|| {
                tracing::warn!("Tap option `context` is deprecated and will be removed");
            });
        }
        let tap = options.into_tap(callback);

        let mut state = self.state.lock();
        state.cache.reset();
        let tap = state.interceptors.apply(tap);
        tracing::debug!(
            hook = self.label(),
            tap = %tap.name,
            kind = %kind,
            stage = tap.stage,
            "Registering tap"
        );
        state.registry.insert(tap);
        Ok(())
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

    /// Attach an interceptor.
    ///
    /// Its `register` is applied right away to every registered tap, and to
    /// every tap registered from now on.
    pub fn intercept(&self, interceptor: impl Interceptor<A, R>) {
        self.intercept_shared(Arc::new(interceptor));
    }

    /// Attach an interceptor that is shared with other hooks.
    pub fn intercept_shared(&self, interceptor: DynInterceptor<A, R>) {
        let mut state = self.state.lock();
        state.cache.reset();
        let HookState {
            registry,
            interceptors,
            ..
        } = &mut *state;
        interceptors.attach(interceptor, registry);
        tracing::debug!(
            hook = self.label(),
            interceptors = interceptors.len(),
            "Attached interceptor"
        );
    }

    /// A view that merges `defaults` into every registration it makes.
    ///
    /// `defaults` should be an object; anything else counts as no defaults.
    pub fn with_options(&self, defaults: Value) -> ScopedHook<'_, A, R> {
        ScopedHook::new(self, defaults)
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }

    fn compiled(&self, kind: TapKind) -> Result<CompiledCall<A, R>, HookError> {
        let mut state = self.state.lock();
        let HookState {
            registry,
            interceptors,
            cache,
        } = &mut *state;
        cache.get_or_compile(kind, || {
            tracing::trace!(
                hook = self.label(),
                kind = %kind,
                taps = registry.len(),
                "Compiling dispatcher"
            );
            let call = self.compiler.compile(CompileSpec {
                taps: registry.taps(),
                interceptors: interceptors.as_slice(),
                args: &self.args,
                name: self.name.as_deref(),
                kind,
            })?;
            if call.kind() != kind {
                return Err(HookError::ConventionMismatch {
                    expected: kind,
                    found: call.kind(),
                });
            }
            Ok(call)
        })
    }
}

impl<A: HookArgs, R: HookOutput> Hook<A, R> {
    /// Dispatch with the direct convention.
    pub fn call(&self, args: A) -> Result<Option<R>, HookError> {
        match self.compiled(TapKind::Sync)? {
            CompiledCall::Sync(dispatch) => dispatch(&args).map_err(HookError::from),
            other => Err(mismatch(TapKind::Sync, &other)),
        }
    }

    /// Dispatch with the completion-callback convention.
    ///
    /// `done` receives the outcome exactly once, including compile-time
    /// failures. When it runs is up to the hook's flavor.
    pub fn call_async<F>(&self, args: A, done: F)
    where
        F: FnOnce(Result<Option<R>, HookError>) + Send + 'static,
    {
        match self.compiled(TapKind::Async) {
            Ok(CompiledCall::Async(dispatch)) => dispatch(
                &args,
                Box::new(move |outcome: TapResult<R>| done(outcome.map_err(HookError::from))),
            ),
            Ok(other) => done(Err(mismatch(TapKind::Async, &other))),
            Err(err) => done(Err(err)),
        }
    }

    /// Dispatch with the deferred-result convention.
    ///
    /// The dispatcher is fetched (and compiled if needed) right away; the
    /// returned future only runs the taps.
    pub fn promise(&self, args: A) -> BoxFuture<'static, Result<Option<R>, HookError>> {
        match self.compiled(TapKind::Promise) {
            Ok(CompiledCall::Promise(dispatch)) => {
                let outcome = dispatch(args);
                Box::pin(async move { outcome.await.map_err(HookError::from) })
            }
            Ok(other) => Box::pin(future::ready(Err(mismatch(TapKind::Promise, &other)))),
            Err(err) => Box::pin(future::ready(Err(err))),
        }
    }
}

fn mismatch<A, R>(expected: TapKind, found: &CompiledCall<A, R>) -> HookError {
    HookError::ConventionMismatch {
        expected,
        found: found.kind(),
    }
}

impl<A: 'static, R: 'static> fmt::Debug for Hook<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Hook")
            .field("name", &self.name)
            .field("args", &self.args)
            .field("taps", &state.registry.taps())
            .field("interceptors", &state.interceptors.len())
            .finish()
    }
}

/// Builder for [`Hook`].
///
/// A compiler is mandatory; building without one fails with
/// [`HookError::Unimplemented`].
pub struct HookBuilder<A, R> {
    args: Vec<String>,
    name: Option<String>,
    compiler: Option<Arc<dyn Compiler<A, R>>>,
}

impl<A: 'static, R: 'static> Default for HookBuilder<A, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static, R: 'static> HookBuilder<A, R> {
    /// An empty builder.
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            name: None,
            compiler: None,
        }
    }

    /// Declare argument names.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the flavor.
    pub fn compiler(mut self, compiler: impl Compiler<A, R>) -> Self {
        self.compiler = Some(Arc::new(compiler));
        self
    }

    /// Set a flavor that is shared with other hooks.
    pub fn shared_compiler(mut self, compiler: Arc<dyn Compiler<A, R>>) -> Self {
        self.compiler = Some(compiler);
        self
    }

    /// Build the hook.
    pub fn build(self) -> Result<Hook<A, R>, HookError> {
        let Some(compiler) = self.compiler else {
            return Err(HookError::Unimplemented);
        };
        Ok(Hook::from_parts(self.args, self.name, compiler))
    }
}
