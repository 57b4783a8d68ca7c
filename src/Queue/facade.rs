// The read/write boundary a hosting endpoint calls into.

use std::io::{Read, Write};
use std::sync::Arc;
use std::time::Duration;

use log::trace;

use crate::Core::error::{QueueError, QueueResult};
use crate::Queue::shared::SharedQueue;
use crate::Queue::Record::{Record, RECORD_CAPACITY};

/// Byte-stream view of a [`SharedQueue`].
///
/// `read` drains the oldest record and blocks while the queue is empty;
/// `write` injects a caller record and never blocks beyond the queue lock.
/// Facades are cheap to clone and every clone talks to the same queue.
#[derive(Clone)]
pub struct QueueFacade {
    queue: Arc<SharedQueue>,
    read_timeout: Option<Duration>,
}

impl QueueFacade {
    pub fn new(queue: Arc<SharedQueue>) -> Self {
        Self {
            queue,
            read_timeout: None,
        }
    }

    /// Apply `timeout` to every blocking read made through this facade.
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Receives the oldest record's payload, blocking until one is available.
    ///
    /// # Returns
    /// * `Ok(n)` with `n = min(dst.len(), payload length) <= RECORD_CAPACITY`
    /// * `Err(Closed)` if the queue was closed and is drained
    /// * `Err(TimedOut)` if a read timeout is configured and elapses
    pub fn read(&self, dst: &mut [u8]) -> QueueResult<usize> {
        let record = self.queue.dequeue_blocking(self.read_timeout)?;
        let n = record.copy_to_slice(dst);
        trace!("read {} byte(s) from {:?}", n, record.origin());
        Ok(n)
    }

    /// Blocking read with an explicit timeout, overriding the facade default.
    pub fn read_timeout(&self, dst: &mut [u8], timeout: Duration) -> QueueResult<usize> {
        let record = self.queue.dequeue_blocking(Some(timeout))?;
        Ok(record.copy_to_slice(dst))
    }

    /// Non-blocking read. Returns `Err(Empty)` instead of waiting.
    pub fn try_read(&self, dst: &mut [u8]) -> QueueResult<usize> {
        let record = self.queue.dequeue().ok_or(QueueError::Empty)?;
        Ok(record.copy_to_slice(dst))
    }

    /// Blocking read into a fallible destination.
    ///
    /// The record is removed from the queue before the copy, so a failing
    /// destination yields `Err(CopyFailure)` and the record is gone.
    pub fn read_into<W: Write>(&self, dst: W, max_len: usize) -> QueueResult<usize> {
        let record = self.queue.dequeue_blocking(self.read_timeout)?;
        record.copy_to(dst, max_len.min(RECORD_CAPACITY))
    }

    /// Blocking read returning the whole record, tags included.
    pub fn read_record(&self) -> QueueResult<Record> {
        self.queue.dequeue_blocking(self.read_timeout)
    }

    /// Injects `src` as a new record.
    ///
    /// # Returns
    /// * `Ok(src.len())` once the record is queued and a reader signaled
    /// * `Err(OversizedWrite)` if `src` is longer than `RECORD_CAPACITY`
    /// * any insertion error from [`SharedQueue::enqueue`]
    pub fn write(&self, src: &[u8]) -> QueueResult<usize> {
        self.write_from(src, src.len())
    }

    /// Injects exactly `len` bytes read from a fallible source.
    ///
    /// The size check and the copy both happen before the queue is touched,
    /// so neither `OversizedWrite` nor `CopyFailure` mutates it.
    pub fn write_from<R: Read>(&self, src: R, len: usize) -> QueueResult<usize> {
        let record = Record::from_reader(src, len)?;
        self.queue.enqueue(record)?;
        trace!("wrote {} byte(s)", len);
        Ok(len)
    }

    /// Records currently waiting to be read.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn queue(&self) -> &Arc<SharedQueue> {
        &self.queue
    }
}
