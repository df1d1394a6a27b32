//! Cancellable pacing for the sampling loop and the reload task.
//!
//! Both long-running loops sleep through a [`Pacer`]. The production pacer
//! is [`ShutdownSignal`]: a flag plus condvar, so raising the signal wakes
//! every sleeper immediately instead of letting it run out its interval.

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Sleeps between loop iterations.
pub trait Pacer {
    /// Block for up to `timeout`.
    ///
    /// Returns `true` if the loop must stop.
    fn wait(&self, timeout: Duration) -> bool;
}

#[derive(Debug, Default)]
struct Inner {
    requested: Mutex<bool>,
    wake: Condvar,
}

/// Process-wide shutdown flag.
///
/// Cheap to clone; all clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    inner: Arc<Inner>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown and wake every waiter.
    pub fn trigger(&self) {
        let mut requested = self.inner.requested.lock();
        *requested = true;
        self.inner.wake.notify_all();
    }

    /// True once [`trigger`](Self::trigger) has been called.
    pub fn is_triggered(&self) -> bool {
        *self.inner.requested.lock()
    }
}

impl Pacer for ShutdownSignal {
    fn wait(&self, timeout: Duration) -> bool {
        let mut requested = self.inner.requested.lock();
        match Instant::now().checked_add(timeout) {
            Some(deadline) => {
                while !*requested {
                    if self.inner.wake.wait_until(&mut requested, deadline).timed_out() {
                        break;
                    }
                }
            }
            // Interval too large to represent: sleep until shutdown.
            None => {
                while !*requested {
                    self.inner.wake.wait(&mut requested);
                }
            }
        }
        *requested
    }
}
