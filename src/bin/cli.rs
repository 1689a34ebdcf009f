//! LedgerKV CLI
//!
//! Read-only queries against a ledger mirrored into a local directory.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use ledgerkv::{Config, DirLedger, LedgerError, LedgerStore, VersionedKey};
use tracing_subscriber::{fmt, EnvFilter};

/// LedgerKV CLI
#[derive(Parser, Debug)]
#[command(name = "ledgerkv-cli")]
#[command(about = "Query a key-value store published to an immutable ledger")]
#[command(version)]
struct Args {
    /// Ledger mirror directory
    #[arg(short, long, default_value = "./ledgerkv_data")]
    data_dir: String,

    /// Index key prefix width
    #[arg(short, long, default_value = "32")]
    prefix_len: usize,

    /// Parallel batch fetches
    #[arg(short, long, default_value = "8")]
    workers: usize,

    /// Fetch deadline in milliseconds (0 = none)
    #[arg(short, long, default_value = "30000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// Version to read
        #[arg(long)]
        version: u64,

        /// The key to get
        key: String,
    },

    /// Check whether a key exists
    Has {
        #[arg(long)]
        version: u64,

        key: String,
    },

    /// List keys in [start, end) ascending
    Scan {
        #[arg(long)]
        version: u64,

        /// Inclusive start key
        #[arg(default_value = "")]
        start: String,

        /// Exclusive end key (empty = unbounded)
        #[arg(default_value = "")]
        end: String,
    },

    /// List keys in [start, end) descending
    Rscan {
        #[arg(long)]
        version: u64,

        #[arg(default_value = "")]
        start: String,

        #[arg(default_value = "")]
        end: String,
    },
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ledgerkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(LedgerError::KeyNotFound(key)) => {
            eprintln!("(not found) {}", String::from_utf8_lossy(&key));
            ExitCode::from(1)
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> ledgerkv::Result<()> {
    tracing::info!("LedgerKV CLI v{}", ledgerkv::VERSION);
    tracing::info!("Data directory: {}", args.data_dir);

    let config = Config::builder()
        .prefix_len(args.prefix_len)
        .fetch_workers(args.workers)
        .fetch_timeout_ms(args.timeout_ms)
        .build();

    let ledger = Arc::new(DirLedger::open(&args.data_dir)?);
    let store = LedgerStore::open(config, ledger)?;

    let result = match args.command {
        Commands::Get { version, key } => store
            .get(&VersionedKey::encode(version, key.as_bytes()))
            .map(|value| println!("{}", String::from_utf8_lossy(&value))),
        Commands::Has { version, key } => store
            .has(&VersionedKey::encode(version, key.as_bytes()))
            .map(|exists| println!("{}", exists)),
        Commands::Scan {
            version,
            start,
            end,
        } => store
            .iterator(
                &VersionedKey::encode(version, start.as_bytes()),
                &VersionedKey::encode(version, end.as_bytes()),
            )
            .map(print_all),
        Commands::Rscan {
            version,
            start,
            end,
        } => store
            .reverse_iterator(
                &VersionedKey::encode(version, start.as_bytes()),
                &VersionedKey::encode(version, end.as_bytes()),
            )
            .map(print_all),
    };

    store.close()?;
    result
}

fn print_all(mut iter: ledgerkv::LedgerIterator) {
    while let (Some(key), Some(value)) = (iter.key(), iter.value()) {
        println!(
            "{}\t{}",
            String::from_utf8_lossy(key),
            String::from_utf8_lossy(value)
        );
        iter.advance();
    }
}
