pub mod counters;
pub mod scheduler;
pub mod verify;
pub mod worker;

pub use counters::RunCounters;
pub use scheduler::{RunReport, Scheduler};
pub use worker::{transfer_one, WorkItem};
