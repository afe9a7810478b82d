//! The dispatch cache.
//!
//! One slot per calling convention, each either uncompiled or holding the
//! compiled dispatcher. Any mutation of the hook resets every slot; there
//! is no partial patching.

use taphook_core::{CompiledCall, HookError, TapKind};

enum Slot<A, R> {
    Uncompiled,
    Compiled(CompiledCall<A, R>),
}

/// Lazily compiled dispatchers, one per convention.
pub struct DispatchCache<A, R> {
    slots: [Slot<A, R>; 3],
}

impl<A, R> Default for DispatchCache<A, R> {
    fn default() -> Self {
        Self {
            slots: [Slot::Uncompiled, Slot::Uncompiled, Slot::Uncompiled],
        }
    }
}

fn index(kind: TapKind) -> usize {
    match kind {
        TapKind::Sync => 0,
        TapKind::Async => 1,
        TapKind::Promise => 2,
    }
}

impl<A, R> DispatchCache<A, R> {
    /// Return the cached dispatcher for `kind`, compiling it first if needed.
    ///
    /// A failed compilation leaves the slot uncompiled.
    pub fn get_or_compile<F>(&mut self, kind: TapKind, compile: F) -> Result<CompiledCall<A, R>, HookError>
    where
        F: FnOnce() -> Result<CompiledCall<A, R>, HookError>,
    {
        let slot = &mut self.slots[index(kind)];
        if let Slot::Compiled(call) = slot {
            return Ok(call.clone());
        }
        let call = compile()?;
        *slot = Slot::Compiled(call.clone());
        Ok(call)
    }

    /// Whether a dispatcher for `kind` is cached.
    pub fn is_compiled(&self, kind: TapKind) -> bool {
        matches!(self.slots[index(kind)], Slot::Compiled(_))
    }

    /// Drop every cached dispatcher.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::Uncompiled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn dispatcher() -> CompiledCall<(), ()> {
        CompiledCall::Sync(Arc::new(|_: &()| Ok(None)))
    }

    #[test]
    fn compiles_once_until_reset() {
        let mut cache = DispatchCache::default();
        let mut compiles = 0;
        for _ in 0..3 {
            cache
                .get_or_compile(TapKind::Sync, || {
                    compiles += 1;
                    Ok(dispatcher())
                })
                .unwrap();
        }
        assert_eq!(compiles, 1);
        assert!(cache.is_compiled(TapKind::Sync));
        assert!(!cache.is_compiled(TapKind::Promise));

        cache.reset();
        assert!(!cache.is_compiled(TapKind::Sync));
        cache
            .get_or_compile(TapKind::Sync, || {
                compiles += 1;
                Ok(dispatcher())
            })
            .unwrap();
        assert_eq!(compiles, 2);
    }

    #[test]
    fn failures_are_not_cached() {
        let mut cache: DispatchCache<(), ()> = DispatchCache::default();
        let err = cache.get_or_compile(TapKind::Async, || Err(HookError::UnsupportedCall(TapKind::Async)));
        assert!(err.is_err());
        assert!(!cache.is_compiled(TapKind::Async));
    }

    #[test]
    fn cached_dispatchers_are_the_same_callable() {
        let mut cache = DispatchCache::default();
        let first = cache.get_or_compile(TapKind::Sync, || Ok(dispatcher())).unwrap();
        let second = cache.get_or_compile(TapKind::Sync, || Ok(dispatcher())).unwrap();
        let (CompiledCall::Sync(a), CompiledCall::Sync(b)) = (first, second) else {
            panic!("expected sync dispatchers");
        };
        assert!(Arc::ptr_eq(&a, &b));
    }
}
