//! Session termination signal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::Duration;

/// One-shot termination flag that sleeping threads can wait on.
#[derive(Debug, Default)]
pub struct ShutdownSignal {
    flag: AtomicBool,
    lock: Mutex<()>,
    cond: Condvar,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag and wake every waiter. Returns `true` on the first call.
    pub fn trigger(&self) -> bool {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let first = !self.flag.swap(true, Ordering::SeqCst);
        self.cond.notify_all();
        first
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Sleep for up to `timeout`. Returns `true` if shutdown was requested.
    pub fn wait(&self, timeout: Duration) -> bool {
        let guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        if self.is_shutdown() {
            return true;
        }
        let (_guard, _) = self
            .cond
            .wait_timeout_while(guard, timeout, |_| !self.is_shutdown())
            .unwrap_or_else(|e| e.into_inner());
        self.is_shutdown()
    }
}
