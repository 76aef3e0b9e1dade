use std::future::Future;

use tracing::{info, warn};

use super::{counters::RunCounters, verify};
use crate::{
	config::{FailureAccounting, SyncConfig},
	error::StoreError,
	models::{Cid, TransferOutcome},
	store::{decode_add_response, ContentStore},
};

/// One CID plus its 1-based position in the run, for progress lines.
#[derive(Debug, Clone)]
pub struct WorkItem {
	pub cid: Cid,
	pub seq: usize,
	pub total: usize,
}

/// Sync a single CID: fetch from source, upload to destination, verify the
/// destination hash. Every path records exactly one outcome in `counters`
/// (two for a failed upload under `CountUploadFailureTwice`).
///
/// Errors never escape: they are logged, counted and carried in the
/// returned outcome.
pub async fn transfer_one(
	source: &dyn ContentStore,
	destination: &dyn ContentStore,
	item: &WorkItem,
	counters: &RunCounters,
	config: &SyncConfig,
) -> TransferOutcome {
	let WorkItem { cid, seq, total } = item;
	info!("{seq}/{total}: Syncing the CID: {cid}");

	// 1. Fetch
	let body = match with_retry(config, item, "fetch", || source.cat(cid)).await {
		Ok(body) => body,
		Err(err) => {
			warn!("{seq}/{total}: {err}; CID: {cid}");
			counters.record_failed();
			return TransferOutcome::failed(cid.clone(), err.to_string(), String::new());
		}
	};

	// 2. Version selects the upload encoding
	let version = cid.version();

	// 3. Upload, 4. decode
	let mut upload_error = None;
	let dest_hash = match with_retry(config, item, "upload", || destination.add(&body, version)).await {
		Ok(response) => match decode_add_response(&response) {
			Ok(parsed) => parsed.hash,
			Err(err) => {
				// Not a failure by itself; verification decides.
				warn!("{seq}/{total}: failed to decode add response: {err}");
				String::new()
			}
		},
		Err(err) => {
			warn!("{seq}/{total}: {err}");
			counters.record_failed();
			match config.failure_accounting {
				FailureAccounting::OncePerItem => {
					return TransferOutcome::failed(cid.clone(), err.to_string(), String::new());
				}
				FailureAccounting::CountUploadFailureTwice => {
					upload_error = Some(err.to_string());
					String::new()
				}
			}
		}
	};

	// 5. Verify
	match verify::verify(cid, &dest_hash) {
		Ok(()) => {
			info!("{seq}/{total}: {cid} synced and verified");
			counters.record_synced();
			TransferOutcome::synced(cid.clone(), dest_hash)
		}
		Err(err) => {
			warn!("{seq}/{total}: {err}");
			counters.record_failed();
			let detail = upload_error.unwrap_or_else(|| err.to_string());
			TransferOutcome::failed(cid.clone(), detail, dest_hash)
		}
	}
}

/// Run `op` up to `max_attempts` times, sleeping `retry_delay` between
/// attempts. Only retryable errors are retried.
async fn with_retry<T, F, Fut>(
	config: &SyncConfig,
	item: &WorkItem,
	step: &str,
	mut op: F,
) -> Result<T, StoreError>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<T, StoreError>>,
{
	let mut attempt = 1;
	loop {
		match op().await {
			Ok(value) => return Ok(value),
			Err(err) if err.is_retryable() && attempt < config.max_attempts => {
				warn!(
					"{}/{}: {step} attempt {attempt}/{} failed, retrying: {err}",
					item.seq, item.total, config.max_attempts
				);
				tokio::time::sleep(config.retry_delay()).await;
				attempt += 1;
			}
			Err(err) => return Err(err),
		}
	}
}
