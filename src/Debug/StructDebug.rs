use std::fmt;

use crate::Queue::Record::Record;
use crate::Queue::{QueueSystem, SharedQueue, WorkerPool};

/// Debug function for Record
///
/// Shows the producer tag and the payload as lossy text rather than the raw
/// fixed-size array.
pub fn debug_record(record: &Record, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Record")
        .field("origin", &record.origin())
        .field("sequence", &record.sequence())
        .field("len", &record.len())
        .field("text", &record.text())
        .finish()
}

/// Debug function for SharedQueue
///
/// Uses `try_lock` so formatting never blocks behind a producer; a contended
/// queue prints as `<locked>`.
pub fn debug_shared_queue(queue: &SharedQueue, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut s = f.debug_struct("SharedQueue");
    match queue.state.try_lock() {
        Some(state) => s
            .field("depth", &state.records.len())
            .field("next_sequence", &state.next_sequence)
            .field("closed", &state.closed),
        None => s.field("state", &"<locked>"),
    };
    s.field("max_depth", &queue.max_depth())
        .field("overflow", &queue.overflow_policy())
        .finish()
}

pub fn debug_worker_pool(pool: &WorkerPool, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WorkerPool")
        .field("threads", &pool.len())
        .field("live", &pool.live_workers())
        .field("period", &pool.period())
        .field("stopping", &pool.is_stopping())
        .finish()
}

pub fn debug_queue_system(system: &QueueSystem, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("QueueSystem")
        .field("config", system.config())
        .field("queue", system.queue())
        .field("workers", &system.workers())
        .finish()
}
