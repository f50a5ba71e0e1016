//! kvlog CLI
//!
//! Command-line interface for a kvlog data directory.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use kvlog::log::LogRecovery;
use kvlog::{Config, KvlogError, LogStore, RecoveryMode, SyncStrategy};
use tracing_subscriber::{fmt, EnvFilter};

/// kvlog CLI
#[derive(Parser, Debug)]
#[command(name = "kvlog-cli")]
#[command(about = "CLI for the kvlog log-structured key-value store")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./kvlog_data")]
    data_dir: PathBuf,

    /// Drop a truncated tail record instead of refusing to open
    #[arg(long)]
    lenient: bool,

    /// When to fsync after writes
    #[arg(long, value_enum, default_value_t = SyncArg::Never)]
    sync: SyncArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Put {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// List all keys
    Keys,

    /// Show key, record and size counters
    Stats,

    /// Check the log for damage without opening the store
    Verify,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SyncArg {
    Never,
    EveryWrite,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kvlog=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> kvlog::Result<ExitCode> {
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .recovery_mode(if args.lenient {
            RecoveryMode::Lenient
        } else {
            RecoveryMode::Strict
        })
        .sync_strategy(match args.sync {
            SyncArg::Never => SyncStrategy::Never,
            SyncArg::EveryWrite => SyncStrategy::EveryWrite,
        })
        .build();

    match args.command {
        Commands::Verify => verify(&config),
        command => execute(config, command),
    }
}

/// Scan the log read-only and report what a recovery would find
fn verify(config: &Config) -> kvlog::Result<ExitCode> {
    let log_path = config.data_dir.join(LogStore::LOG_FILENAME);
    let result = LogRecovery::verify(&log_path)?;

    println!("records:   {}", result.records_recovered);
    println!("keys:      {}", result.keys_indexed);
    println!("valid_len: {}", result.valid_len);

    if result.was_truncated {
        println!("truncated tail: {} bytes", result.truncated_bytes);
        return Ok(ExitCode::FAILURE);
    }
    println!("ok");
    Ok(ExitCode::SUCCESS)
}

/// Run a command against an opened store
fn execute(config: Config, command: Commands) -> kvlog::Result<ExitCode> {
    let store = LogStore::open(config)?;

    let code = match command {
        Commands::Get { key } => match store.get(key.as_bytes()) {
            Ok(value) => {
                println!("{}", String::from_utf8_lossy(&value));
                ExitCode::SUCCESS
            }
            Err(KvlogError::NotFound) => {
                eprintln!("(not found)");
                ExitCode::FAILURE
            }
            Err(e) => return Err(e),
        },
        Commands::Put { key, value } => {
            store.put(key.as_bytes(), value.as_bytes())?;
            ExitCode::SUCCESS
        }
        Commands::Keys => {
            for key in store.keys() {
                println!("{}", String::from_utf8_lossy(&key));
            }
            ExitCode::SUCCESS
        }
        Commands::Stats => {
            let stats = store.stats();
            println!("keys:     {}", stats.keys);
            println!("records:  {}", stats.records);
            println!("log_size: {}", stats.log_size);
            ExitCode::SUCCESS
        }
        Commands::Verify => verify(store.config())?,
    };

    store.close()?;
    Ok(code)
}
