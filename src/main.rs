//! ShardKV - A Sharded In-Memory Key-Value Store
//!
//! This is the main entry point for the ShardKV server.
//! It parses configuration, builds the store and serves the HTTP API.

use anyhow::Context;
use clap::Parser;
use shardkv::http::{serve, AppState};
use shardkv::storage::Store;
use shardkv::Config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn print_banner(config: &Config) {
    println!(
        r#"
ShardKV v{} - Sharded In-Memory Key-Value Store
──────────────────────────────────────────────────
Server started on http://{}
Shards: {}   Replicas: {}   TTL: {}s

Use Ctrl+C to shutdown gracefully.
"#,
        shardkv::VERSION,
        config.bind_address(),
        config.shards,
        config.replicas,
        config.ttl_secs,
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let config = Config::parse();

    // Set up logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    // Create the store (shared across all requests)
    let store = Arc::new(
        Store::with_config(config.store_config()).context("invalid store configuration")?,
    );
    info!(
        shards = store.shard_count(),
        replicas = store.replicas(),
        key_locks = !config.no_key_locks,
        "Store initialized"
    );

    // Bind the TCP listener
    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address()))?;
    info!("Listening on {}", config.bind_address());

    print_banner(&config);

    let state = AppState::new(Arc::clone(&store), config.ttl());
    serve(listener, state, shutdown_signal())
        .await
        .context("HTTP server failed")?;

    let stats = store.stats();
    info!(
        keys = stats.keys,
        get_ops = stats.get_ops,
        set_ops = stats.set_ops,
        expired = stats.expired,
        "Server shutdown complete"
    );
    Ok(())
}

/// Resolves once Ctrl+C is received.
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, stopping server..."),
        Err(e) => {
            error!("Failed to install Ctrl+C handler: {}", e);
            // Without a handler, run until the process is killed
            std::future::pending::<()>().await;
        }
    }
}
