//! `finquest-kv` — inspect and edit a FinQuest key-value database.
//!
//! Usage:
//!   finquest-kv [--db=PATH] [--data-dir=PATH] [--prefix=PREFIX] <command>
//!
//! Store flags must come before the command.

use std::env;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use finquest_kv::{NamespacedStore, RedbStorage, StoreConfig};

const STORE_FLAGS: &str = "\
STORE OPTIONS (before the command):
    --db=PATH           redb database path
    --data-dir=PATH     Data directory (database defaults to PATH/finquest.redb)
    --prefix=PREFIX     Namespace prefix (default: finquest_)";

#[derive(Parser, Debug)]
#[command(name = "finquest-kv", about = "FinQuest key-value store tool", after_help = STORE_FLAGS)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the value stored under a logical key.
    Get { key: String },
    /// Store a string value under a logical key.
    Set { key: String, value: String },
    /// Remove a logical key.
    Remove { key: String },
    /// Remove every key in the namespace.
    Clear,
    /// List physical keys in the namespace.
    Keys,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let split = args
        .iter()
        .position(|a| !StoreConfig::is_config_flag(a))
        .unwrap_or(args.len());
    let config = StoreConfig::from_args(&args[..split]);
    let cli = Cli::parse_from(
        std::iter::once("finquest-kv".to_string()).chain(args[split..].iter().cloned()),
    );

    let db_path = config.resolve_db_path();
    info!("Opening {}", db_path.display());
    let backend = RedbStorage::open(&db_path)
        .map_err(|e| anyhow::anyhow!("failed to open KV store: {}", e))?;
    let store = NamespacedStore::from_config(Arc::new(backend), &config);

    match cli.command {
        Command::Get { key } => match store.get_item(&key).await {
            Some(value) => println!("{}", value),
            None => info!("{} is not set", store.get_key_with_prefix(&key)),
        },
        Command::Set { key, value } => store.set_item(&key, value).await,
        Command::Remove { key } => store.remove_item(&key).await,
        Command::Clear => store.clear().await,
        Command::Keys => {
            for key in store.keys().await {
                println!("{}", key);
            }
        }
    }

    // The store swallows failures; surface them here so the exit code is honest.
    if let Some(failure) = store.take_last_error() {
        anyhow::bail!("{:?} failed: {}", failure.op, failure.error);
    }
    Ok(())
}
