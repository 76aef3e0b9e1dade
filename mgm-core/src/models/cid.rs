use std::fmt;

use serde::Deserialize;

/// Length of a base58btc-encoded sha2-256 multihash, the only CIDv0 form.
const CID_V0_LEN: usize = 46;
const CID_V0_PREFIX: &str = "Qm";

/// A content identifier as handed out by the source store.
/// Opaque to us: we never decode it, only compare and forward it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct Cid(String);

impl Cid {
    pub fn new(cid: impl Into<String>) -> Self {
        Cid(cid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn version(&self) -> CidVersion {
        CidVersion::of(&self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Cid {
    fn from(value: &str) -> Self {
        Cid(value.to_string())
    }
}

impl From<String> for Cid {
    fn from(value: String) -> Self {
        Cid(value)
    }
}

/// CID version, which selects how the destination must encode the
/// re-uploaded object for the resulting hash to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CidVersion {
    V0,
    V1,
}

impl CidVersion {
    /// Derive the version from the string form.
    /// CIDv0 is always a 46 character base58 string starting with "Qm";
    /// anything else is treated as v1.
    pub fn of(cid: &str) -> Self {
        if cid.len() == CID_V0_LEN && cid.starts_with(CID_V0_PREFIX) {
            CidVersion::V0
        } else {
            CidVersion::V1
        }
    }

    /// Value for the `cid-version` query parameter of the add call.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            CidVersion::V0 => "0",
            CidVersion::V1 => "1",
        }
    }
}
