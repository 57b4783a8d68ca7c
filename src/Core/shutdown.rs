use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// Stop request shared between a pool and its worker threads.
///
/// Workers use [`StopSignal::sleep`] in place of `thread::sleep`, so a stop
/// request interrupts the period instead of waiting it out.
#[derive(Default)]
pub struct StopSignal {
    requested: Mutex<bool>,
    cond: Condvar,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop and wake every sleeping worker.
    pub fn request(&self) {
        let mut requested = self.requested.lock();
        *requested = true;
        self.cond.notify_all();
    }

    pub fn is_requested(&self) -> bool {
        *self.requested.lock()
    }

    /// Sleep for `period` unless a stop is requested first.
    /// Returns true if the stop was requested.
    pub fn sleep(&self, period: Duration) -> bool {
        let deadline = Instant::now().checked_add(period);
        let mut requested = self.requested.lock();
        while !*requested {
            match deadline {
                Some(deadline) => {
                    if self.cond.wait_until(&mut requested, deadline).timed_out() {
                        break;
                    }
                }
                // Too far out to represent: sleep until stopped.
                None => self.cond.wait(&mut requested),
            }
        }
        *requested
    }
}
