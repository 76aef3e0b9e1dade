//! Acquisition of the CID list, either from a file or from the source's
//! pin listing. Both are consumed once into memory before a run starts.

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::{error::SyncError, models::Cid, store::ContentStore};

/// One line of the streamed pin listing.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PinRecord {
	#[serde(rename = "Cid")]
	pub cid: Cid,
	#[serde(rename = "Type", default)]
	pub kind: String,
}

/// Read a file with one CID per line. Blank lines and surrounding
/// whitespace are ignored.
pub async fn read_cids_from_file(path: &Path) -> Result<Vec<Cid>, SyncError> {
	let text = tokio::fs::read_to_string(path)
		.await
		.map_err(|source| SyncError::ReadCidFile { path: path.to_path_buf(), source })?;

	Ok(parse_cid_lines(&text))
}

pub fn parse_cid_lines(text: &str) -> Vec<Cid> {
	text.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.map(Cid::from)
		.collect()
}

/// List every pin on `store`. A failed request aborts the run; a line
/// that does not decode is logged and skipped.
pub async fn list_source_pins(store: &dyn ContentStore) -> Result<Vec<Cid>, SyncError> {
	let body = store.list_pins().await.map_err(|source| SyncError::ListPins {
		endpoint: store.endpoint().to_string(),
		source,
	})?;

	let cids = parse_pin_listing(&body);
	info!("Found {} pinned objects on {}", cids.len(), store.endpoint());
	Ok(cids)
}

pub fn parse_pin_listing(body: &[u8]) -> Vec<Cid> {
	let text = String::from_utf8_lossy(body);
	let mut cids = Vec::new();

	for line in text.lines().filter(|l| !l.trim().is_empty()) {
		match serde_json::from_str::<PinRecord>(line) {
			Ok(record) if !record.cid.is_empty() => cids.push(record.cid),
			Ok(_) => warn!("Skipping pin record without a CID: {line}"),
			Err(err) => warn!("Error unmarshaling the response: {err}"),
		}
	}

	cids
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{error::StoreError, store::fake::FakeStore};

	#[test]
	fn parses_streamed_pins() {
		let body = b"{\"Cid\":\"bafyone\",\"Type\":\"recursive\"}\n{\"Cid\":\"QmTwo\",\"Type\":\"direct\"}\n";
		let cids = parse_pin_listing(body);
		assert_eq!(cids, vec![Cid::from("bafyone"), Cid::from("QmTwo")]);
	}

	#[test]
	fn malformed_lines_skipped() {
		let body = b"{\"Cid\":\"bafyone\"}\nnot json\n{\"Type\":\"recursive\"}\n{\"Cid\":\"\"}\n\n{\"Cid\":\"bafytwo\"}";
		let cids = parse_pin_listing(body);
		assert_eq!(cids, vec![Cid::from("bafyone"), Cid::from("bafytwo")]);
	}

	#[test]
	fn cid_lines_trimmed_and_blank_lines_dropped() {
		let cids = parse_cid_lines("bafyone\n\n  bafytwo  \r\n\t\n");
		assert_eq!(cids, vec![Cid::from("bafyone"), Cid::from("bafytwo")]);
	}

	#[tokio::test]
	async fn lists_pins_through_store() {
		let store = FakeStore::new().pins("{\"Cid\":\"bafyone\",\"Type\":\"recursive\"}\n");
		let cids = list_source_pins(&store).await.unwrap();
		assert_eq!(cids, vec![Cid::from("bafyone")]);
	}

	#[tokio::test]
	async fn unreachable_lister_is_fatal() {
		let store = crate::store::IpfsHttpStore::with_client(reqwest::Client::new(), "http://127.0.0.1:9");
		let err = list_source_pins(&store).await.unwrap_err();
		match err {
			SyncError::ListPins { endpoint, source } => {
				assert_eq!(endpoint, "http://127.0.0.1:9");
				assert!(matches!(source, StoreError::Transport { .. }));
			}
			other => panic!("unexpected error: {other}"),
		}
	}
}
