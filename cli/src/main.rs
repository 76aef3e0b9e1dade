mod logging;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use mgm_core::{listing, FailureAccounting, IpfsHttpStore, SchedulingMode, Scheduler, SyncConfig};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "ipfs-mgm", version, about = "Manage objects across IPFS endpoints")]
struct Cli {
    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sync objects between two different IPFS endpoints
    Sync(SyncArgs),
}

#[derive(Debug, Args)]
struct SyncArgs {
    /// IPFS source endpoint
    #[arg(short, long)]
    source: String,

    /// IPFS destination endpoint
    #[arg(short, long)]
    destination: String,

    /// Sync CIDs listed in this file instead of the source's pins
    #[arg(short = 'f', long)]
    from_file: Option<PathBuf>,

    /// TOML file with sync settings; flags below take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of objects in flight
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Drain the list through a fixed pool instead of barrier-separated batches
    #[arg(long)]
    pool: bool,

    /// Count a failed upload in both the upload and verification steps
    #[arg(long)]
    count_upload_failures_twice: bool,

    /// Attempts per fetch and per upload
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl SyncArgs {
    /// Config file (or defaults) with command-line overrides applied.
    fn resolve_config(&self) -> anyhow::Result<SyncConfig> {
        let mut config = match &self.config {
            Some(path) => SyncConfig::from_toml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => SyncConfig::default(),
        };

        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if self.pool {
            config.mode = SchedulingMode::Pool;
        }
        if self.count_upload_failures_twice {
            config.failure_accounting = FailureAccounting::CountUploadFailureTwice;
        }
        if let Some(max_attempts) = self.max_attempts {
            config.max_attempts = max_attempts;
        }
        if let Some(timeout) = self.timeout_secs {
            config.request_timeout_secs = Some(timeout);
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;

    match cli.command {
        Command::Sync(args) => sync(args).await,
    }
}

async fn sync(args: SyncArgs) -> anyhow::Result<()> {
    let config = args.resolve_config()?;
    let timeout = config.request_timeout();

    let source = Arc::new(IpfsHttpStore::new(&args.source, timeout)?);
    let destination = Arc::new(IpfsHttpStore::new(&args.destination, timeout)?);

    // Acquisition errors abort before any transfer starts.
    let cids = match &args.from_file {
        Some(path) => {
            info!(
                "Syncing from {} to {} using the file <{}> as input",
                args.source,
                args.destination,
                path.display()
            );
            listing::read_cids_from_file(path).await?
        }
        None => {
            info!("Syncing from {} to {}", args.source, args.destination);
            listing::list_source_pins(source.as_ref()).await?
        }
    };

    let scheduler = Scheduler::new(config)?;
    scheduler.run(source, destination, &cids).await;

    Ok(())
}
