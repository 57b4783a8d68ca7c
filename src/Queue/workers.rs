// Background producers: each worker periodically queues one activation record.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_utils::sync::WaitGroup;
use crossbeam_utils::CachePadded;
use log::{debug, error, info, warn};

use crate::Core::error::{QueueError, QueueResult};
use crate::Core::shutdown::StopSignal;
use crate::Queue::shared::SharedQueue;

/// State shared between the pool and every worker thread.
struct PoolShared {
    queue: Arc<SharedQueue>,
    stop: StopSignal,
    /// Next identity handed out on a worker's first execution.
    next_id: AtomicU32,
    /// Worker threads currently inside their loop.
    live: CachePadded<AtomicUsize>,
    period: Duration,
}

/// A fixed set of worker threads feeding a [`SharedQueue`].
pub struct WorkerPool {
    shared: Arc<PoolShared>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `worker_count` workers producing into `queue` every `period`.
    ///
    /// Returns once every worker has claimed its identity. If a thread cannot
    /// be spawned, the workers already running are stopped and joined before
    /// the error is returned.
    pub fn spawn(
        queue: Arc<SharedQueue>,
        worker_count: usize,
        period: Duration,
    ) -> QueueResult<Self> {
        let worker_count = worker_count.max(1);
        let shared = Arc::new(PoolShared {
            queue,
            stop: StopSignal::new(),
            next_id: AtomicU32::new(0),
            live: CachePadded::new(AtomicUsize::new(0)),
            period,
        });

        let mut pool = Self {
            shared,
            handles: Vec::with_capacity(worker_count),
        };
        let started = WaitGroup::new();

        for index in 0..worker_count {
            let shared = Arc::clone(&pool.shared);
            let started = started.clone();
            let spawned = thread::Builder::new()
                .name(format!("thout-worker-{index}"))
                .spawn(move || run_worker(shared, started));

            match spawned {
                Ok(handle) => pool.handles.push(handle),
                Err(e) => {
                    error!("Error creating worker thread {}: {}", index, e);
                    pool.stop();
                    return Err(QueueError::Spawn(e));
                }
            }
        }

        started.wait();
        info!(
            "started {} worker(s) with a period of {:?}",
            pool.handles.len(),
            period
        );
        Ok(pool)
    }

    /// Ask every worker to stop and wait for all of them to exit.
    /// Returns the number of threads joined. Calling it again is a no-op.
    pub fn stop(&mut self) -> usize {
        if self.handles.is_empty() {
            return 0;
        }

        self.shared.stop.request();
        let mut joined = 0;
        for handle in self.handles.drain(..) {
            let name = handle.thread().name().unwrap_or("worker").to_string();
            if handle.join().is_err() {
                warn!("{} panicked", name);
            }
            joined += 1;
        }
        debug!("joined {} worker thread(s)", joined);
        joined
    }

    /// Number of worker threads this pool owns and has not joined yet.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Worker threads still running their production loop.
    pub fn live_workers(&self) -> usize {
        self.shared.live.load(Ordering::Acquire)
    }

    /// Identities handed out so far.
    pub fn assigned_ids(&self) -> u32 {
        self.shared.next_id.load(Ordering::Acquire)
    }

    pub fn period(&self) -> Duration {
        self.shared.period
    }

    pub fn is_stopping(&self) -> bool {
        self.shared.stop.is_requested()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::Debug::StructDebug::debug_worker_pool(self, f)
    }
}

/// Decrements the live counter however the loop ends.
struct LiveGuard<'a>(&'a AtomicUsize);

impl Drop for LiveGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

fn run_worker(shared: Arc<PoolShared>, started: WaitGroup) {
    // Identity is taken on first execution, not at spawn time.
    let worker_id = shared.next_id.fetch_add(1, Ordering::AcqRel);
    shared.live.fetch_add(1, Ordering::AcqRel);
    let _live = LiveGuard(&shared.live);
    drop(started);
    debug!("worker {} running", worker_id);

    while !shared.stop.is_requested() {
        match shared.queue.produce(worker_id) {
            Ok(_) => {}
            Err(QueueError::QueueFull { max_depth }) => {
                warn!(
                    "worker {}: queue full (max depth {}), skipping activation",
                    worker_id, max_depth
                );
            }
            Err(QueueError::Closed) => {
                debug!("worker {}: queue closed, exiting", worker_id);
                return;
            }
            Err(e) => {
                error!("worker {}: {}, exiting", worker_id, e);
                return;
            }
        }

        if shared.stop.sleep(shared.period) {
            break;
        }
    }

    debug!("worker {} stopped", worker_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn allocation_failure_ends_the_worker() {
        let queue = Arc::new(SharedQueue::new());
        queue.fail_alloc.store(true, Ordering::Release);
        let mut pool = WorkerPool::spawn(Arc::clone(&queue), 2, Duration::from_millis(1)).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while pool.live_workers() > 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(2));
        }
        assert_eq!(pool.live_workers(), 0);
        assert!(queue.is_empty());
        assert_eq!(queue.stats().next_sequence, 0);
        assert_eq!(pool.stop(), 2);
    }
}
