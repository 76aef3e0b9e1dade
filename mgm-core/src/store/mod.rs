pub mod http;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
	error::StoreError,
	models::{Cid, CidVersion},
};

pub use http::IpfsHttpStore;

/// A content-addressed store reachable over its RPC API.
#[async_trait]
pub trait ContentStore: Send + Sync {
	/// Base address, for log lines.
	fn endpoint(&self) -> &str;

	/// Fetch the raw bytes of an object.
	async fn cat(&self, cid: &Cid) -> Result<Vec<u8>, StoreError>;

	/// Upload an object and return the undecoded response body.
	/// Decoding is left to the caller so a malformed answer can be told
	/// apart from a failed request.
	async fn add(&self, body: &[u8], version: CidVersion) -> Result<Vec<u8>, StoreError>;

	/// Raw newline-delimited JSON listing of every pinned CID.
	async fn list_pins(&self) -> Result<Vec<u8>, StoreError>;
}

/// Response of the add call. Only `Hash` matters for verification.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AddResponse {
	#[serde(rename = "Name", default)]
	pub name: String,
	#[serde(rename = "Hash", default)]
	pub hash: String,
	#[serde(rename = "Size", default)]
	pub size: String,
}

/// Decode an add response. The endpoint may stream several JSON objects;
/// the last one describes the root of the upload.
pub fn decode_add_response(body: &[u8]) -> Result<AddResponse, serde_json::Error> {
	let text = String::from_utf8_lossy(body);
	let last = text.lines().rev().find(|line| !line.trim().is_empty()).unwrap_or("");
	serde_json::from_str(last)
}
