use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_BATCH_SIZE: usize = 50;
const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// Settings for one sync run. Built once and handed to the scheduler;
/// nothing mutates it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SyncConfig {
    /// Maximum number of CIDs in flight at once.
    pub batch_size: usize,
    pub mode: SchedulingMode,
    pub failure_accounting: FailureAccounting,
    /// Attempts per fetch and per upload. 1 disables retrying.
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    /// Per-request timeout. `None` waits forever.
    pub request_timeout_secs: Option<u64>,
}

/// How the scheduler bounds concurrency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingMode {
    /// Fixed windows of `batch_size` CIDs with a full barrier between them.
    #[default]
    Windowed,
    /// `batch_size` permits draining the whole list, no barrier.
    Pool,
}

/// How a failed upload is counted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailureAccounting {
    /// A failed upload skips verification: one `failed` per CID.
    #[default]
    OncePerItem,
    /// A failed upload is counted, then verification runs against the
    /// empty hash and counts it again. `synced + failed` can exceed the
    /// number of CIDs in this mode.
    CountUploadFailureTwice,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            batch_size: DEFAULT_BATCH_SIZE,
            mode: SchedulingMode::default(),
            failure_accounting: FailureAccounting::default(),
            max_attempts: 1,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            request_timeout_secs: None,
        }
    }
}

impl SyncConfig {
    /// Load from a TOML file. Missing keys fall back to defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SyncConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid("batch_size must be at least 1".into()));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid("max_attempts must be at least 1".into()));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be at least 1; omit it to wait forever".into(),
            ));
        }
        Ok(())
    }

    /// Never more workers than items.
    pub fn effective_batch_size(&self, len: usize) -> usize {
        self.batch_size.min(len)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
