// Plain data types shared across the queue, the workers and the facade.

/// Producer identity embedded in every record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Produced by the worker with this 0-based identity.
    Worker(u32),
    /// Injected through `write`.
    External,
}

impl Origin {
    pub fn worker_id(&self) -> Option<u32> {
        match self {
            Origin::Worker(id) => Some(*id),
            Origin::External => None,
        }
    }
}

/// What an insertion does when a bounded queue is already at its max depth.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Fail the insertion with `QueueFull`, leaving the queue unchanged.
    #[default]
    Reject,
    /// Discard the oldest record to make room.
    DropOldest,
}

/// Point-in-time counters, all read under the queue lock.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub depth: usize,
    pub enqueued: u64,
    pub dequeued: u64,
    pub dropped: u64,
    pub next_sequence: u64,
    pub closed: bool,
}

/// Outcome of stopping a running system.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Worker threads joined by this stop.
    pub workers_joined: usize,
    /// Records still pending when the queue was torn down.
    pub records_discarded: usize,
    /// Counters captured once the queue was drained, so
    /// `enqueued == dequeued + dropped + records_discarded`.
    pub stats: QueueStats,
}
