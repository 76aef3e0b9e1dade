pub mod cid;
pub mod outcome;

pub use cid::{Cid, CidVersion};
pub use outcome::{TransferOutcome, TransferStatus};
