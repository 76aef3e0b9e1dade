use std::{
	fmt,
	sync::{
		atomic::{AtomicUsize, Ordering},
		Arc,
	},
	time::{Duration, Instant},
};

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::{
	counters::RunCounters,
	worker::{self, WorkItem},
};
use crate::{
	config::{SchedulingMode, SyncConfig},
	error::ConfigError,
	models::{Cid, TransferOutcome},
	store::ContentStore,
};

/// Aggregate result of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
	pub total: usize,
	pub synced: u64,
	pub failed: u64,
	pub elapsed: Duration,
}

impl RunReport {
	pub fn summary_line(&self) -> String {
		format!(
			"Total number of objects: {}; Synced: {}; Failed: {}",
			self.total, self.synced, self.failed
		)
	}

	pub fn time_line(&self) -> String {
		format!("Total time: {:?}", self.elapsed)
	}
}

impl fmt::Display for RunReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}\n{}", self.summary_line(), self.time_line())
	}
}

/// Drives workers over a CID list with bounded concurrency.
///
/// Per-item failures are counted, never returned: `run` always processes
/// every CID and reports.
#[derive(Debug, Clone)]
pub struct Scheduler {
	config: Arc<SyncConfig>,
}

impl Scheduler {
	pub fn new(config: SyncConfig) -> Result<Self, ConfigError> {
		config.validate()?;
		Ok(Scheduler { config: Arc::new(config) })
	}

	pub fn config(&self) -> &SyncConfig {
		&self.config
	}

	pub async fn run(
		&self,
		source: Arc<dyn ContentStore>,
		destination: Arc<dyn ContentStore>,
		cids: &[Cid],
	) -> RunReport {
		let started = Instant::now();
		let counters = Arc::new(RunCounters::new());
		let total = cids.len();

		if total > 0 {
			match self.config.mode {
				SchedulingMode::Windowed => {
					self.run_windowed(&source, &destination, cids, &counters).await
				}
				SchedulingMode::Pool => self.run_pool(&source, &destination, cids, &counters).await,
			}
		}

		let report = RunReport {
			total,
			synced: counters.synced(),
			failed: counters.failed(),
			elapsed: started.elapsed(),
		};

		info!("{}", report.summary_line());
		info!("{}", report.time_line());

		report
	}

	/// Consecutive windows of the effective batch size. Window N+1 starts
	/// only once every worker of window N has returned.
	async fn run_windowed(
		&self,
		source: &Arc<dyn ContentStore>,
		destination: &Arc<dyn ContentStore>,
		cids: &[Cid],
		counters: &Arc<RunCounters>,
	) {
		let total = cids.len();
		let batch_size = self.config.effective_batch_size(total);
		let windows = total.div_ceil(batch_size);

		for (window, chunk) in cids.chunks(batch_size).enumerate() {
			debug!(window = window + 1, windows, size = chunk.len(), "starting window");

			let offset = window * batch_size;
			let mut handles = Vec::with_capacity(chunk.len());

			for (i, cid) in chunk.iter().enumerate() {
				let item = WorkItem { cid: cid.clone(), seq: offset + i + 1, total };
				handles.push(self.spawn_worker(source, destination, counters, item));
			}

			// Barrier: wait for all tasks in this window
			join_all(handles, counters).await;
		}
	}

	/// `batch_size` long-lived workers draining a shared cursor over the
	/// list; a worker that finishes a CID takes the next one immediately.
	async fn run_pool(
		&self,
		source: &Arc<dyn ContentStore>,
		destination: &Arc<dyn ContentStore>,
		cids: &[Cid],
		counters: &Arc<RunCounters>,
	) {
		let total = cids.len();
		let workers = self.config.effective_batch_size(total);
		let queue: Arc<[Cid]> = cids.into();
		let next = Arc::new(AtomicUsize::new(0));

		debug!(workers, total, "starting pool");

		let handles: Vec<_> = (0..workers)
			.map(|_| {
				let source = source.clone();
				let destination = destination.clone();
				let counters = counters.clone();
				let config = self.config.clone();
				let queue = queue.clone();
				let next = next.clone();

				tokio::spawn(async move {
					loop {
						let i = next.fetch_add(1, Ordering::Relaxed);
						let Some(cid) = queue.get(i) else { break };
						let item = WorkItem { cid: cid.clone(), seq: i + 1, total };
						worker::transfer_one(&*source, &*destination, &item, &counters, &config).await;
					}
				})
			})
			.collect();

		// The other workers keep draining if one panics; only its current
		// CID goes unrecorded, and join_all counts that one.
		join_all(handles, counters).await;
	}

	fn spawn_worker(
		&self,
		source: &Arc<dyn ContentStore>,
		destination: &Arc<dyn ContentStore>,
		counters: &Arc<RunCounters>,
		item: WorkItem,
	) -> JoinHandle<TransferOutcome> {
		let source = source.clone();
		let destination = destination.clone();
		let counters = counters.clone();
		let config = self.config.clone();

		tokio::spawn(async move {
			worker::transfer_one(&*source, &*destination, &item, &counters, &config).await
		})
	}
}

async fn join_all<T>(handles: Vec<JoinHandle<T>>, counters: &RunCounters) {
	for handle in handles {
		if let Err(err) = handle.await {
			// A panicking worker never reached its counter update.
			error!("sync task failed: {err}");
			counters.record_failed();
		}
	}
}
