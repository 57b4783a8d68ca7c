// The owned context behind the start()/stop() lifecycle hooks.

use std::sync::Arc;

use log::info;

use super::{QueueConfig, QueueFacade, SharedQueue, WorkerPool};
use crate::Core::error::QueueResult;
use crate::Queue::Structs::{QueueStats, ShutdownReport};

/// A running queue together with the workers feeding it.
///
/// Each system owns its own queue, sequence counter and notifier, so several
/// can run side by side in one process.
pub struct QueueSystem {
    config: QueueConfig,
    queue: Arc<SharedQueue>,
    workers: Option<WorkerPool>,
}

impl QueueSystem {
    /// Initialize the queue and spawn the worker pool.
    pub fn start(config: QueueConfig) -> QueueResult<Self> {
        let queue = Arc::new(SharedQueue::bounded(config.max_depth, config.overflow));
        let workers = WorkerPool::spawn(Arc::clone(&queue), config.worker_count, config.period)?;

        Ok(Self {
            config,
            queue,
            workers: Some(workers),
        })
    }

    /// A read/write handle on this system's queue.
    pub fn facade(&self) -> QueueFacade {
        QueueFacade::new(Arc::clone(&self.queue)).with_read_timeout(self.config.read_timeout)
    }

    /// Stop and join every worker, close the queue and discard what is left.
    ///
    /// Blocked readers are released with `Closed`. Calling `stop` again
    /// returns an empty report.
    pub fn stop(&mut self) -> ShutdownReport {
        let Some(mut workers) = self.workers.take() else {
            return ShutdownReport {
                stats: self.queue.stats(),
                ..ShutdownReport::default()
            };
        };

        let workers_joined = workers.stop();
        self.queue.close();
        let records_discarded = self.queue.drain().len();
        let stats = self.queue.stats();

        info!(
            "stopped: {} worker(s) joined, {} record(s) delivered, {} discarded",
            workers_joined, stats.dequeued, records_discarded
        );

        ShutdownReport {
            workers_joined,
            records_discarded,
            stats,
        }
    }

    pub fn is_running(&self) -> bool {
        self.workers.is_some()
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    pub fn queue(&self) -> &Arc<SharedQueue> {
        &self.queue
    }

    pub fn workers(&self) -> Option<&WorkerPool> {
        self.workers.as_ref()
    }

    pub fn stats(&self) -> QueueStats {
        self.queue.stats()
    }
}

impl Drop for QueueSystem {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for QueueSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::Debug::StructDebug::debug_queue_system(self, f)
    }
}
