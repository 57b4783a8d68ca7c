//! Queue error types

use std::io;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// Storage for a new record could not be obtained. The queue is unchanged.
    #[error("Failed to allocate storage for a new record")]
    AllocationFailure,

    /// Moving bytes across the caller boundary failed.
    #[error("Failed to copy {len} bytes across the caller boundary: {source}")]
    CopyFailure {
        len: usize,
        #[source]
        source: io::Error,
    },

    #[error("Write of {len} bytes exceeds record capacity ({capacity})")]
    OversizedWrite { len: usize, capacity: usize },

    #[error("Queue is full (max depth: {max_depth})")]
    QueueFull { max_depth: usize },

    #[error("Queue is empty")]
    Empty,

    #[error("Queue has been closed")]
    Closed,

    #[error("Timed out after {0:?} waiting for a record")]
    TimedOut(Duration),

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[source] io::Error),
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

impl QueueError {
    /// Positive errno value matching this error, as a character device would report it.
    pub fn errno(&self) -> i32 {
        match self {
            QueueError::AllocationFailure => libc::ENOMEM,
            QueueError::CopyFailure { .. } => libc::EFAULT,
            QueueError::OversizedWrite { .. } => libc::EINVAL,
            QueueError::QueueFull { .. } | QueueError::Empty => libc::EAGAIN,
            QueueError::Closed => libc::EPIPE,
            QueueError::TimedOut(_) => libc::ETIMEDOUT,
            QueueError::Spawn(e) => e.raw_os_error().unwrap_or(libc::EAGAIN),
        }
    }

    /// Whether retrying the same call later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            QueueError::QueueFull { .. } | QueueError::Empty | QueueError::TimedOut(_)
        )
    }
}

impl From<QueueError> for io::Error {
    fn from(err: QueueError) -> Self {
        let kind = match &err {
            QueueError::AllocationFailure => io::ErrorKind::OutOfMemory,
            QueueError::CopyFailure { source, .. } => source.kind(),
            QueueError::OversizedWrite { .. } => io::ErrorKind::InvalidInput,
            QueueError::QueueFull { .. } | QueueError::Empty => io::ErrorKind::WouldBlock,
            QueueError::Closed => io::ErrorKind::BrokenPipe,
            QueueError::TimedOut(_) => io::ErrorKind::TimedOut,
            QueueError::Spawn(e) => e.kind(),
        };
        io::Error::new(kind, err)
    }
}
