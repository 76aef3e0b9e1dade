use std::sync::atomic::{AtomicU64, Ordering};

/// Success/failure tallies shared by every worker of a run.
///
/// Workers only increment. The scheduler reads the totals after joining
/// every task, and the join orders all increments before the read, so
/// relaxed ordering is enough.
#[derive(Debug, Default)]
pub struct RunCounters {
	synced: AtomicU64,
	failed: AtomicU64,
}

impl RunCounters {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn record_synced(&self) {
		self.synced.fetch_add(1, Ordering::Relaxed);
	}

	pub fn record_failed(&self) {
		self.failed.fetch_add(1, Ordering::Relaxed);
	}

	pub fn synced(&self) -> u64 {
		self.synced.load(Ordering::Relaxed)
	}

	pub fn failed(&self) -> u64 {
		self.failed.load(Ordering::Relaxed)
	}
}
