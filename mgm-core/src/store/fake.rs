//! In-memory store for engine tests.
//!
//! Content addressing is the identity function: the body of an object is
//! the bytes of its CID, and `add` answers with the body as the hash.

use std::{
	collections::HashSet,
	sync::{
		atomic::{AtomicU32, AtomicUsize, Ordering},
		Mutex,
	},
	time::Duration,
};

use async_trait::async_trait;

use super::ContentStore;
use crate::{
	error::StoreError,
	models::{Cid, CidVersion},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
	CatStart(String),
	AddDone(String),
}

#[derive(Default)]
pub(crate) struct FakeStore {
	missing: HashSet<String>,
	fixed_hash: Option<String>,
	add_status: Option<u16>,
	garbage_response: bool,
	delay: Duration,
	transient_cat_failures: AtomicU32,
	transient_add_failures: AtomicU32,
	pins: Vec<u8>,

	pub(crate) cat_calls: Mutex<Vec<String>>,
	pub(crate) add_calls: Mutex<Vec<(String, CidVersion)>>,
	pub(crate) events: Mutex<Vec<Event>>,
	in_flight: AtomicUsize,
	pub(crate) max_in_flight: AtomicUsize,
	/// Highest count of live runtime tasks seen from inside `cat`.
	pub(crate) max_alive_tasks: AtomicUsize,
}

impl FakeStore {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	/// `cat` answers 404 for this CID.
	pub(crate) fn missing(mut self, cid: &str) -> Self {
		self.missing.insert(cid.to_string());
		self
	}

	/// `add` answers with this hash regardless of content.
	pub(crate) fn fixed_hash(mut self, hash: &str) -> Self {
		self.fixed_hash = Some(hash.to_string());
		self
	}

	pub(crate) fn add_status(mut self, status: u16) -> Self {
		self.add_status = Some(status);
		self
	}

	pub(crate) fn garbage_response(mut self) -> Self {
		self.garbage_response = true;
		self
	}

	pub(crate) fn delay(mut self, delay: Duration) -> Self {
		self.delay = delay;
		self
	}

	/// The first `n` `cat` calls fail with a transport error.
	pub(crate) fn transient_cat_failures(self, n: u32) -> Self {
		self.transient_cat_failures.store(n, Ordering::SeqCst);
		self
	}

	/// The first `n` `add` calls fail with a 503.
	pub(crate) fn transient_add_failures(self, n: u32) -> Self {
		self.transient_add_failures.store(n, Ordering::SeqCst);
		self
	}

	pub(crate) fn pins(mut self, listing: &str) -> Self {
		self.pins = listing.as_bytes().to_vec();
		self
	}

	pub(crate) fn cat_count(&self) -> usize {
		self.cat_calls.lock().unwrap().len()
	}

	pub(crate) fn add_count(&self) -> usize {
		self.add_calls.lock().unwrap().len()
	}

	pub(crate) fn events(&self) -> Vec<Event> {
		self.events.lock().unwrap().clone()
	}
}

#[async_trait]
impl ContentStore for FakeStore {
	fn endpoint(&self) -> &str {
		"memory://fake"
	}

	async fn cat(&self, cid: &Cid) -> Result<Vec<u8>, StoreError> {
		self.cat_calls.lock().unwrap().push(cid.to_string());
		self.events.lock().unwrap().push(Event::CatStart(cid.to_string()));

		let alive = tokio::runtime::Handle::current().metrics().num_alive_tasks();
		self.max_alive_tasks.fetch_max(alive, Ordering::SeqCst);

		let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
		self.max_in_flight.fetch_max(now, Ordering::SeqCst);
		if !self.delay.is_zero() {
			tokio::time::sleep(self.delay).await;
		}
		self.in_flight.fetch_sub(1, Ordering::SeqCst);

		let remaining = self.transient_cat_failures.load(Ordering::SeqCst);
		if remaining > 0 {
			self.transient_cat_failures.store(remaining - 1, Ordering::SeqCst);
			return Err(StoreError::Transport {
				url: format!("memory://fake/{cid}"),
				message: "connection reset".into(),
			});
		}

		if self.missing.contains(cid.as_str()) {
			return Err(StoreError::Status {
				url: format!("memory://fake/{cid}"),
				status: 404,
				body: "not found".into(),
			});
		}

		Ok(cid.as_str().as_bytes().to_vec())
	}

	async fn add(&self, body: &[u8], version: CidVersion) -> Result<Vec<u8>, StoreError> {
		let content = String::from_utf8_lossy(body).to_string();
		self.add_calls.lock().unwrap().push((content.clone(), version));

		let remaining = self.transient_add_failures.load(Ordering::SeqCst);
		let result = if remaining > 0 {
			self.transient_add_failures.store(remaining - 1, Ordering::SeqCst);
			Err(StoreError::Status {
				url: "memory://fake/add".into(),
				status: 503,
				body: "busy".into(),
			})
		} else if let Some(status) = self.add_status {
			Err(StoreError::Status {
				url: "memory://fake/add".into(),
				status,
				body: "rejected".into(),
			})
		} else if self.garbage_response {
			Ok(b"<html>502 Bad Gateway</html>".to_vec())
		} else {
			let hash = self.fixed_hash.clone().unwrap_or_else(|| content.clone());
			Ok(serde_json::json!({ "Name": "file", "Hash": hash, "Size": body.len().to_string() })
				.to_string()
				.into_bytes())
		};

		self.events.lock().unwrap().push(Event::AddDone(content));
		result
	}

	async fn list_pins(&self) -> Result<Vec<u8>, StoreError> {
		Ok(self.pins.clone())
	}
}
