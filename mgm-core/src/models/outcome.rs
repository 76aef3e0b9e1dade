use super::Cid;

/// Terminal result of syncing a single CID.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferOutcome {
    pub cid: Cid,
    pub status: TransferStatus,
    pub error: Option<String>,
    /// Identifier the destination assigned to the upload. Empty when the
    /// upload never produced a decodable response.
    pub dest_hash: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    Synced,
    Failed,
}

impl TransferOutcome {
    pub fn synced(cid: Cid, dest_hash: String) -> Self {
        TransferOutcome {
            cid,
            status: TransferStatus::Synced,
            error: None,
            dest_hash,
        }
    }

    pub fn failed(cid: Cid, error: impl Into<String>, dest_hash: String) -> Self {
        TransferOutcome {
            cid,
            status: TransferStatus::Failed,
            error: Some(error.into()),
            dest_hash,
        }
    }

    pub fn is_synced(&self) -> bool {
        self.status == TransferStatus::Synced
    }
}
