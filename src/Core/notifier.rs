// Data-available handshake between producers and blocked readers.
// The condition variable is always paired with the queue mutex, so a woken
// reader re-checks the queue under the same lock the producer inserted under.

use parking_lot::{Condvar, MutexGuard};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Blocking "data may be available" signal.
///
/// `signal` may be called with or without the queue lock held. Waiters only
/// go to sleep while holding the queue lock and re-check emptiness on every
/// wake-up, so a signal issued after unlocking cannot be lost.
#[derive(Default)]
pub struct Notifier {
    cond: Condvar,
    signals: AtomicU64,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wake one blocked reader. Returns true if a reader was woken.
    pub fn signal(&self) -> bool {
        self.signals.fetch_add(1, Ordering::Relaxed);
        self.cond.notify_one()
    }

    /// Wake every blocked reader, returning how many were woken.
    pub fn broadcast(&self) -> usize {
        self.signals.fetch_add(1, Ordering::Relaxed);
        self.cond.notify_all()
    }

    /// Release the guard's lock and sleep until signaled.
    /// Spurious wake-ups are possible; callers loop on their own condition.
    pub fn wait<T>(&self, guard: &mut MutexGuard<'_, T>) {
        self.cond.wait(guard);
    }

    /// Like [`wait`](Self::wait) but gives up at `deadline`.
    /// Returns true if the deadline passed without a signal.
    pub fn wait_until<T>(&self, guard: &mut MutexGuard<'_, T>, deadline: Instant) -> bool {
        self.cond.wait_until(guard, deadline).timed_out()
    }

    /// Total number of signals issued so far (monitoring only).
    pub fn signal_count(&self) -> u64 {
        self.signals.load(Ordering::Relaxed)
    }
}
