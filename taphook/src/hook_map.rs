//! Keyed families of hooks.

use crate::hook::Hook;
use parking_lot::Mutex;
use std::{collections::HashMap, fmt, hash::Hash, sync::Arc};

/// Observes hook creation inside a [`HookMap`].
///
/// Closures of the shape `Fn(&K, Hook<A, R>) -> Hook<A, R>` implement this
/// trait directly.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot intercept a `HookMap<{K}, {A}, {R}>`",
    label = "expected a `HookMapInterceptor`",
    note = "closures of the form `Fn(&K, Hook<A, R>) -> Hook<A, R>` implement this trait"
)]
pub trait HookMapInterceptor<K, A, R>: Send + Sync + 'static {
    /// Called with every freshly created hook; the returned hook is stored.
    fn factory(&self, key: &K, hook: Hook<A, R>) -> Hook<A, R>;
}

impl<K, A, R, F> HookMapInterceptor<K, A, R> for F
where
    F: Fn(&K, Hook<A, R>) -> Hook<A, R> + Send + Sync + 'static,
{
    fn factory(&self, key: &K, hook: Hook<A, R>) -> Hook<A, R> {
        self(key, hook)
    }
}

type Factory<K, A, R> = Box<dyn Fn(&K) -> Hook<A, R> + Send + Sync>;

/// Lazily creates one [`Hook`] per key.
///
/// # Example
///
/// ```rust,ignore
/// let map = HookMap::new(|_: &String| sync_hook::<(), ()>(["compilation"]));
/// map.for_key("javascript".to_owned()).tap("parser", |_| Ok(None))?;
/// assert!(map.get(&"css".to_owned()).is_none());
/// ```
pub struct HookMap<K, A, R = ()> {
    factory: Factory<K, A, R>,
    hooks: Mutex<HashMap<K, Arc<Hook<A, R>>>>,
    interceptors: Mutex<Vec<Arc<dyn HookMapInterceptor<K, A, R>>>>,
}

impl<K, A: 'static, R: 'static> HookMap<K, A, R>
where
    K: Eq + Hash + Clone + 'static,
{
    /// A map whose hooks are built by `factory`.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&K) -> Hook<A, R> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            hooks: Mutex::new(HashMap::new()),
            interceptors: Mutex::new(Vec::new()),
        }
    }

    /// The hook for `key`, if one was created.
    pub fn get(&self, key: &K) -> Option<Arc<Hook<A, R>>> {
        self.hooks.lock().get(key).cloned()
    }

    /// The hook for `key`, created on first use.
    ///
    /// The factory and the map interceptors run without the map locked, so
    /// they may use the map themselves. If two callers race on a new key,
    /// the first hook stored wins.
    pub fn for_key(&self, key: K) -> Arc<Hook<A, R>> {
        if let Some(hook) = self.get(&key) {
            return hook;
        }
        let mut hook = (self.factory)(&key);
        let interceptors = self.interceptors.lock().clone();
        for interceptor in &interceptors {
            hook = interceptor.factory(&key, hook);
        }
        tracing::debug!(hook = hook.name(), "Created keyed hook");
        Arc::clone(self.hooks.lock().entry(key).or_insert_with(|| Arc::new(hook)))
    }

    /// Keys with a created hook, in no particular order.
    pub fn keys(&self) -> Vec<K> {
        self.hooks.lock().keys().cloned().collect()
    }

    /// Number of created hooks.
    pub fn len(&self) -> usize {
        self.hooks.lock().len()
    }

    /// Whether no hook was created yet.
    pub fn is_empty(&self) -> bool {
        self.hooks.lock().is_empty()
    }

    /// Attach an interceptor that sees every hook created from now on.
    pub fn intercept(&self, interceptor: impl HookMapInterceptor<K, A, R>) {
        self.interceptors.lock().push(Arc::new(interceptor));
    }
}

impl<K: fmt::Debug, A, R> fmt::Debug for HookMap<K, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookMap")
            .field("keys", &self.hooks.lock().keys().collect::<Vec<_>>())
            .field("interceptors", &self.interceptors.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use taphook_std::SeriesCompiler;

    fn map() -> HookMap<&'static str, (), ()> {
        HookMap::new(|key: &&'static str| {
            Hook::builder()
                .name(*key)
                .compiler(SeriesCompiler)
                .build()
                .unwrap()
        })
    }

    #[test]
    fn hooks_are_created_once_per_key() {
        let map = map();
        assert!(map.get(&"a").is_none());
        let first = map.for_key("a");
        let second = map.for_key("a");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.name(), Some("a"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn keys_lists_created_hooks() {
        let map = map();
        map.for_key("a");
        map.for_key("b");
        let mut keys = map.keys();
        keys.sort();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn interceptors_see_new_hooks_only() {
        let map = map();
        map.for_key("early");
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        map.intercept(move |_: &&'static str, hook: Hook<(), ()>| {
            counter.fetch_add(1, Ordering::SeqCst);
            hook
        });
        map.for_key("early");
        map.for_key("late");
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn taps_on_keyed_hooks_persist() {
        let map = map();
        map.for_key("k").tap("t", |_: &()| Ok(None)).unwrap();
        assert!(map.get(&"k").unwrap().is_used());
    }
}
