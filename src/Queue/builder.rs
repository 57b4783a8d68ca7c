use std::sync::Arc;
use std::time::Duration;

use log::warn;

use super::{QueueSystem, SharedQueue};
use crate::Core::error::QueueResult;
use crate::Queue::Structs::OverflowPolicy;

/// Startup parameters of a [`QueueSystem`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueConfig {
    /// Number of worker threads, at least 1.
    pub worker_count: usize,
    /// Pause between two activations of the same worker.
    pub period: Duration,
    /// Maximum number of pending records, `None` for unbounded.
    pub max_depth: Option<usize>,
    pub overflow: OverflowPolicy,
    /// Default timeout for blocking reads, `None` to wait forever.
    pub read_timeout: Option<Duration>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            worker_count: 2,
            period: Duration::from_millis(2000),
            max_depth: None,
            overflow: OverflowPolicy::Reject,
            read_timeout: None,
        }
    }
}

pub struct SystemBuilder {
    config: QueueConfig,
}

impl Default for SystemBuilder {
    fn default() -> Self {
        Self {
            config: QueueConfig::default(),
        }
    }
}

impl SystemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Worker thread count. Values below 1 are raised to 1.
    pub fn with_worker_count(mut self, count: i64) -> Self {
        if count < 1 {
            warn!("worker count {} is not positive, using 1", count);
        }
        self.config.worker_count = count.max(1) as usize;
        self
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.config.period = period;
        self
    }

    pub fn with_period_ms(self, period_ms: u64) -> Self {
        self.with_period(Duration::from_millis(period_ms))
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = Some(max_depth);
        self
    }

    pub fn with_overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.config.overflow = policy;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = Some(timeout);
        self
    }

    pub fn build_config(self) -> QueueConfig {
        self.config
    }

    /// A queue configured like the system would get, without any workers.
    pub fn build_queue(&self) -> Arc<SharedQueue> {
        Arc::new(SharedQueue::bounded(
            self.config.max_depth,
            self.config.overflow,
        ))
    }

    /// Create the queue and spawn the workers.
    pub fn start(self) -> QueueResult<QueueSystem> {
        QueueSystem::start(self.config)
    }
}
