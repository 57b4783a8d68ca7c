// Module naming follows project convention (Queue = the record queue, Core = shared plumbing)
#[allow(non_snake_case)]
pub mod Queue;
#[allow(non_snake_case)]
pub mod Core;
#[allow(non_snake_case)]
mod Debug;

pub mod ffi;

pub use Core::error::{QueueError, QueueResult};
pub use Queue::Record::{Record, RECORD_CAPACITY};
pub use Queue::Structs::{Origin, OverflowPolicy, QueueStats, ShutdownReport};
pub use Queue::{QueueConfig, QueueFacade, QueueSystem, SharedQueue, SystemBuilder, WorkerPool};
