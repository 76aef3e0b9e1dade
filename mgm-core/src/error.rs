use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single request against a content store.
#[derive(Debug, Error)]
pub enum StoreError {
	#[error("request to {url} failed: {message}")]
	Transport { url: String, message: String },

	#[error("request to {url} timed out")]
	Timeout { url: String },

	#[error("{url} returned status {status}: {body}")]
	Status { url: String, status: u16, body: String },

	#[error("failed to read response from {url}: {message}")]
	Body { url: String, message: String },

	#[error("failed to build HTTP client: {0}")]
	Client(String),
}

impl StoreError {
	/// Whether retrying the same request could plausibly succeed.
	/// 4xx answers (unknown CID, rejected upload) are final.
	pub fn is_retryable(&self) -> bool {
		match self {
			StoreError::Transport { .. } | StoreError::Timeout { .. } | StoreError::Body { .. } => true,
			StoreError::Status { status, .. } => *status >= 500,
			StoreError::Client(_) => false,
		}
	}
}

/// The destination did not reproduce the source object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
	#[error("hash mismatch: expected={expected}, got={actual}")]
	HashMismatch { expected: String, actual: String },

	#[error("destination returned no hash for {0}")]
	MissingHash(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read config {path}: {source}")]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse config: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("invalid config: {0}")]
	Invalid(String),
}

/// Errors that abort a run before any transfer starts.
#[derive(Debug, Error)]
pub enum SyncError {
	#[error("failed to read CIDs from {path}: {source}")]
	ReadCidFile {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to list pins from {endpoint}: {source}")]
	ListPins {
		endpoint: String,
		#[source]
		source: StoreError,
	},
}
