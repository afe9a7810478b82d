//! Driving a future to a completion callback without an executor.
//!
//! The completion-callback convention has no runtime to lean on: whoever
//! wakes the future polls it, on their own thread, and the callback fires
//! from whichever poll completes it.

use futures::task::{ArcWake, Context, Poll, waker_ref};
use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use taphook_core::{BoxFuture, Done, TapResult};

struct Task<R> {
    future: Mutex<Option<BoxFuture<'static, TapResult<R>>>>,
    done: Mutex<Option<Done<R>>>,
    // Set by a wake that found the future checked out by another poller.
    woken: AtomicBool,
}

impl<R: Send + 'static> Task<R> {
    fn run(self: &Arc<Self>) {
        loop {
            let Some(mut future) = self.future.lock().take() else {
                self.woken.store(true, Ordering::Release);
                return;
            };
            self.woken.store(false, Ordering::Release);

            let waker = waker_ref(self);
            let mut cx = Context::from_waker(&waker);
            match future.as_mut().poll(&mut cx) {
                Poll::Ready(outcome) => {
                    let done = self.done.lock().take();
                    if let Some(done) = done {
                        done(outcome);
                    }
                    return;
                }
                Poll::Pending => {
                    *self.future.lock() = Some(future);
                    if !self.woken.swap(false, Ordering::AcqRel) {
                        return;
                    }
                }
            }
        }
    }
}

impl<R: Send + 'static> ArcWake for Task<R> {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.run();
    }
}

/// Poll `future` until it completes, then hand its outcome to `done`.
///
/// The first poll happens inline. `done` is called exactly once, unless the
/// future never completes.
pub fn drive<R: Send + 'static>(future: BoxFuture<'static, TapResult<R>>, done: Done<R>) {
    let task = Arc::new(Task {
        future: Mutex::new(Some(future)),
        done: Mutex::new(Some(done)),
        woken: AtomicBool::new(false),
    });
    task.run();
}
