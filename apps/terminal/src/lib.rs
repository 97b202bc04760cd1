//! # Tally Terminal Library
//!
//! Host application for the Tally cart: configuration, logging, storage
//! selection and the interactive prompt loop.
//!
//! ## Module Organization
//! ```text
//! tally_terminal/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── config.rs       ◄─── AppConfig: TOML file + TALLY_* environment
//! ├── shell.rs        ◄─── Prompt loop over a CartStore
//! ├── command.rs      ◄─── `>` prompt command parsing
//! ├── render.rs       ◄─── Text views of cart, totals, errors
//! └── error.rs        ◄─── AppError for fatal failures
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod render;
pub mod shell;

use std::io;

use tally_store::{FileStore, KeyValueStore, MemoryStore, PersistenceGateway};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::{AppConfig, StorageBackend, DEFAULT_LOG_FILTER};
use error::AppResult;
use shell::{Shell, ShellExit};

/// Runs the terminal app on stdin/stdout.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Load Configuration ───────────────────────────────────────────────► │
/// │     • tally.toml, then TALLY_* overrides                                │
/// │                                                                         │
/// │  2. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, to stderr                     │
/// │     • Default: warn,tally=info                                          │
/// │                                                                         │
/// │  3. Open Snapshot Store ──────────────────────────────────────────────► │
/// │     • File: <data dir>/tally.cart.session                               │
/// │     • Memory: nothing survives the process                              │
/// │                                                                         │
/// │  4. Run Shell ────────────────────────────────────────────────────────► │
/// │     • Restore stored cart, then prompt until quit/finalize/EOF          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> AppResult<ShellExit> {
    let config = AppConfig::load()?;
    init_tracing(&config.log);

    info!("Starting Tally");

    let persistence = open_persistence(&config)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(stdin.lock(), stdout.lock(), persistence, config);
    let exit = shell.run()?;

    info!(?exit, "Tally finished");
    Ok(exit)
}

/// Builds the snapshot gateway for the configured backend.
///
/// The storage key is checked up front so a bad `TALLY_STORAGE_KEY` stops
/// startup instead of failing every save.
pub fn open_persistence(
    config: &AppConfig,
) -> AppResult<PersistenceGateway<Box<dyn KeyValueStore>>> {
    let store: Box<dyn KeyValueStore> = match config.storage {
        StorageBackend::File => {
            let dir = config.resolve_data_dir()?;
            let store = FileStore::new(dir);
            store.path_for(&config.storage_key)?;
            info!(dir = %store.dir().display(), "Using file store");
            Box::new(store)
        }
        StorageBackend::Memory => {
            info!("Using memory store; the cart will not survive a restart");
            Box::new(MemoryStore::new())
        }
    };

    Ok(PersistenceGateway::with_key(store, config.storage_key.clone()))
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `TALLY_LOG=debug` - Show debug messages
/// - `TALLY_LOG=tally_core=trace` - Trace the cart only
/// - Default: `warn,tally=info`
///
/// Logs go to stderr so they never interleave with prompts on stdout.
fn init_tracing(directives: &str) {
    let (filter, rejected) = match EnvFilter::try_new(directives) {
        Ok(filter) => (filter, None),
        Err(err) => (EnvFilter::new(DEFAULT_LOG_FILTER), Some(err)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Some(err) = rejected {
        warn!(directives, error = %err, "Invalid log filter, using default");
    }
}
