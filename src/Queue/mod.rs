mod builder;
mod facade;
mod shared;
mod system;
mod workers;

pub use builder::{QueueConfig, SystemBuilder};
pub use facade::QueueFacade;
pub use shared::SharedQueue;
pub use system::QueueSystem;
pub use workers::WorkerPool;

pub mod Record {
    pub mod Record_impl;
    pub mod layout;
    pub use layout::{Record, RECORD_CAPACITY}; // re-export for stable path
}

pub mod Structs {
    pub mod Queue_Structs;
    pub use Queue_Structs::{Origin, OverflowPolicy, QueueStats, ShutdownReport}; // re-export for stable path
}
