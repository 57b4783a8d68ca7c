pub mod error;
pub mod logging;
pub mod notifier;
pub mod shutdown;

pub use error::{QueueError, QueueResult};
