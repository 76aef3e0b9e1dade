//! Copy pinned objects between two IPFS RPC endpoints and verify that the
//! destination reproduces every CID.

pub mod config;
pub mod engine;
pub mod error;
pub mod listing;
pub mod models;
pub mod store;

pub use config::{FailureAccounting, SchedulingMode, SyncConfig, DEFAULT_BATCH_SIZE};
pub use engine::{RunCounters, RunReport, Scheduler};
pub use error::{ConfigError, StoreError, SyncError, VerifyError};
pub use models::{Cid, CidVersion, TransferOutcome, TransferStatus};
pub use store::{ContentStore, IpfsHttpStore};
