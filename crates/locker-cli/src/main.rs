mod cli;
mod config;
mod storage;

use crate::cli::{Command, ConfigCommand};
use clap::Parser;
use color_eyre::Result;
use locker_core::{cipher::CipherProvider, kv::KeyValueStore, SecureStore, Strategy};
use locker_storage::AesGcmCipher;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = cli::Cli::parse();
    let config = config::load()?;
    match cli.command {
        Command::Put { key, value } => run_put(&config, &key, &value).await?,
        Command::Get { key } => run_get(&config, &key).await?,
        Command::Remove { key } => run_remove(&config, &key).await?,
        Command::Health => run_health_check(&config).await?,
        Command::Keygen => print_keygen()?,
        Command::Version => print_version(),
        Command::Config(ConfigCommand::Init) => init_config(&config)?,
    }

    Ok(())
}

fn init_tracing() {
    // Respect user-provided filters; logs go to stderr so `get` output stays clean.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn print_version() {
    println!("locker {}", env!("CARGO_PKG_VERSION"));
}

fn print_keygen() -> Result<()> {
    let key = AesGcmCipher::generate_key().map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;
    println!("{}", key.as_base64());
    Ok(())
}

async fn run_put(config: &config::Config, key: &str, raw: &str) -> Result<()> {
    let store = storage::store_from_config(config)?;
    let strategy = store.save(key, &parse_value(raw)).await?;
    println!("Stored {key} ({strategy})");
    Ok(())
}

async fn run_get(config: &config::Config, key: &str) -> Result<()> {
    let store = storage::store_from_config(config)?;
    match store.load::<Value>(key).await? {
        Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        None => println!("No entry for {key}."),
    }
    Ok(())
}

async fn run_remove(config: &config::Config, key: &str) -> Result<()> {
    let store = storage::store_from_config(config)?;
    store.remove(key).await?;
    println!("Removed {key}");
    Ok(())
}

/// Accept JSON input as-is; anything else is stored as a JSON string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Runs a quick health check of the encrypted storage path.
async fn run_health_check(config: &config::Config) -> Result<()> {
    let store = storage::store_from_config(config)?;
    let strategy = run_store_health(&store).await?;
    println!("Storage: ok ({strategy})");
    Ok(())
}

async fn run_store_health<S: KeyValueStore, C: CipherProvider>(
    store: &SecureStore<S, C>,
) -> Result<Strategy> {
    let check_key = "health/check";
    let payload = serde_json::json!({ "status": "ok" });

    let strategy = store.save(check_key, &payload).await?;
    // The check entry is removed even when reading it back fails.
    let round_trip: Result<Option<Value>, _> = store.load(check_key).await;
    store.remove(check_key).await?;
    let round_trip = round_trip?;

    if round_trip.as_ref() != Some(&payload) {
        color_eyre::eyre::bail!("storage round-trip failed");
    }
    if !strategy.is_authenticated() {
        color_eyre::eyre::bail!("storage is not authenticated-encrypted ({strategy})");
    }
    Ok(strategy)
}

fn init_config(config: &config::Config) -> Result<()> {
    let mut seeded = config.clone();
    if seeded.resolve_key().is_none() {
        let key =
            AesGcmCipher::generate_key().map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;
        seeded.key = Some(key.as_base64().to_string());
        info!("generated a new encryption key for the config file");
    }
    let path = config::write_default_if_missing(&seeded)?;
    println!("Config initialized at {}", path.display());
    Ok(())
}
