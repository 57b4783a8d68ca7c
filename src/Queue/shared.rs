// The FIFO of pending records, the sequence counter and the notifier,
// all behind one mutex.

use std::collections::VecDeque;
#[cfg(test)]
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::{debug, trace, warn};
use parking_lot::Mutex;

use crate::Core::error::{QueueError, QueueResult};
use crate::Core::notifier::Notifier;
use crate::Queue::Record::Record;
use crate::Queue::Structs::{OverflowPolicy, QueueStats};

/// Everything guarded by the queue lock.
pub(crate) struct QueueState {
    pub(crate) records: VecDeque<Record>,
    /// Sequence value the next worker record will carry.
    pub(crate) next_sequence: u64,
    pub(crate) enqueued: u64,
    pub(crate) dequeued: u64,
    pub(crate) dropped: u64,
    pub(crate) closed: bool,
}

/// A multi-producer, multi-consumer record queue.
///
/// ### Concurrency Design:
/// - **Lock**: a single mutex covers the records, the sequence counter and
///   the counters. Every mutation happens with it held.
/// - **Producers**: insert under the lock, release it, then signal the
///   [`Notifier`]. Every insertion path signals.
/// - **Consumers**: blocking readers wait on the notifier while holding the
///   lock, which the wait releases. A woken reader re-checks the queue before
///   taking the head, so an empty queue after a wake-up just means waiting
///   again.
pub struct SharedQueue {
    pub(crate) state: Mutex<QueueState>,
    pub(crate) notifier: Notifier,
    max_depth: Option<usize>,
    overflow: OverflowPolicy,
    /// Makes every insertion fail as if the storage could not grow.
    #[cfg(test)]
    pub(crate) fail_alloc: AtomicBool,
}

impl Default for SharedQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedQueue {
    /// An unbounded queue.
    pub fn new() -> Self {
        Self::bounded(None, OverflowPolicy::default())
    }

    /// A queue holding at most `max_depth` records (`None` = unbounded).
    pub fn bounded(max_depth: Option<usize>, overflow: OverflowPolicy) -> Self {
        Self {
            state: Mutex::new(QueueState {
                records: VecDeque::new(),
                next_sequence: 0,
                enqueued: 0,
                dequeued: 0,
                dropped: 0,
                closed: false,
            }),
            notifier: Notifier::new(),
            max_depth,
            overflow,
            #[cfg(test)]
            fail_alloc: AtomicBool::new(false),
        }
    }

    /// Append a record to the tail.
    ///
    /// # Returns
    /// * `Ok(())` if the record was queued
    /// * `Err(AllocationFailure)` if the queue storage could not grow
    /// * `Err(QueueFull)` if a bounded queue rejects the record
    /// * `Err(Closed)` once the queue has been closed
    ///
    /// On error the record is dropped and the queue is left as it was.
    pub fn enqueue(&self, record: Record) -> QueueResult<()> {
        {
            let mut state = self.state.lock();
            self.insert_locked(&mut state, record)?;
        }
        self.notifier.signal();
        Ok(())
    }

    /// The worker insertion path: assign the next sequence value, build the
    /// worker record and queue it, all under one lock hold.
    ///
    /// The counter only advances when the record is actually queued, so
    /// worker sequences in the queue have no gaps.
    pub fn produce(&self, worker_id: u32) -> QueueResult<u64> {
        let sequence = {
            let mut state = self.state.lock();
            let sequence = state.next_sequence;
            self.insert_locked(&mut state, Record::from_worker(worker_id, sequence))?;
            state.next_sequence += 1;
            sequence
        };
        self.notifier.signal();
        trace!("worker {} queued activation {}", worker_id, sequence);
        Ok(sequence)
    }

    fn insert_locked(&self, state: &mut QueueState, record: Record) -> QueueResult<()> {
        if state.closed {
            return Err(QueueError::Closed);
        }

        // Reserve before evicting so a failed allocation leaves the queue as it was.
        self.reserve_one(state)?;

        if let Some(max_depth) = self.max_depth {
            if state.records.len() >= max_depth {
                match self.overflow {
                    OverflowPolicy::Reject => {
                        return Err(QueueError::QueueFull { max_depth });
                    }
                    OverflowPolicy::DropOldest => {
                        // A zero-depth queue has nothing to evict and holds nothing.
                        if state.records.pop_front().is_none() {
                            return Err(QueueError::QueueFull { max_depth });
                        }
                        state.dropped += 1;
                        debug!("queue at max depth {}, dropped oldest record", max_depth);
                    }
                }
            }
        }

        state.records.push_back(record);
        state.enqueued += 1;
        Ok(())
    }

    fn reserve_one(&self, state: &mut QueueState) -> QueueResult<()> {
        #[cfg(test)]
        if self.fail_alloc.load(Ordering::Acquire) {
            return Err(QueueError::AllocationFailure);
        }
        state
            .records
            .try_reserve(1)
            .map_err(|_| QueueError::AllocationFailure)
    }

    /// Remove and return the head, or `None` if the queue is empty.
    /// Never blocks beyond acquiring the lock.
    pub fn dequeue(&self) -> Option<Record> {
        let mut state = self.state.lock();
        Self::take_head(&mut state)
    }

    /// Remove and return the head, waiting for one to arrive.
    ///
    /// # Returns
    /// * `Ok(record)` as soon as a record is available
    /// * `Err(Closed)` if the queue is closed and drained
    /// * `Err(TimedOut)` if `timeout` elapses first
    pub fn dequeue_blocking(&self, timeout: Option<Duration>) -> QueueResult<Record> {
        // A timeout too large to represent as an instant never expires.
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t).map(|d| (d, t)));
        let mut state = self.state.lock();

        loop {
            if let Some(record) = Self::take_head(&mut state) {
                return Ok(record);
            }
            if state.closed {
                return Err(QueueError::Closed);
            }

            match deadline {
                Some((deadline, timeout)) => {
                    let timed_out = self.notifier.wait_until(&mut state, deadline);
                    if timed_out && state.records.is_empty() && !state.closed {
                        return Err(QueueError::TimedOut(timeout));
                    }
                }
                None => self.notifier.wait(&mut state),
            }
        }
    }

    fn take_head(state: &mut QueueState) -> Option<Record> {
        let record = state.records.pop_front()?;
        state.dequeued += 1;
        Some(record)
    }

    /// Close the queue: later insertions fail with `Closed` and every blocked
    /// reader is woken. Pending records stay readable.
    pub fn close(&self) {
        let was_closed = {
            let mut state = self.state.lock();
            std::mem::replace(&mut state.closed, true)
        };
        if !was_closed {
            let woken = self.notifier.broadcast();
            debug!("queue closed, woke {} waiting reader(s)", woken);
        }
    }

    /// Remove every pending record.
    pub fn drain(&self) -> Vec<Record> {
        let mut state = self.state.lock();
        let drained: Vec<Record> = state.records.drain(..).collect();
        if !drained.is_empty() {
            warn!("discarding {} pending record(s)", drained.len());
        }
        drained
    }

    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().records.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.overflow
    }

    pub fn stats(&self) -> QueueStats {
        let state = self.state.lock();
        QueueStats {
            depth: state.records.len(),
            enqueued: state.enqueued,
            dequeued: state.dequeued,
            dropped: state.dropped,
            next_sequence: state.next_sequence,
            closed: state.closed,
        }
    }

    /// Notifier signals issued so far (monitoring only).
    pub fn signal_count(&self) -> u64 {
        self.notifier.signal_count()
    }
}

impl std::fmt::Debug for SharedQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::Debug::StructDebug::debug_shared_queue(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_failure_leaves_the_queue_untouched() {
        let queue = SharedQueue::bounded(Some(2), OverflowPolicy::DropOldest);
        queue.enqueue(Record::from_bytes(b"a").unwrap()).unwrap();
        queue.produce(0).unwrap();
        let before = queue.stats();

        queue.fail_alloc.store(true, Ordering::Release);
        assert!(matches!(
            queue.enqueue(Record::from_bytes(b"b").unwrap()),
            Err(QueueError::AllocationFailure)
        ));
        assert!(matches!(queue.produce(1), Err(QueueError::AllocationFailure)));

        // No eviction, no sequence consumed
        assert_eq!(queue.stats(), before);
        assert_eq!(queue.dequeue().unwrap().payload(), b"a");

        queue.fail_alloc.store(false, Ordering::Release);
        assert_eq!(queue.produce(1).unwrap(), 1);
    }
}
