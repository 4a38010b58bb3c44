//! Server configuration, parsed from the command line.

use crate::storage::StoreConfig;
use crate::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_REPLICAS, DEFAULT_SHARDS, DEFAULT_TTL};
use clap::Parser;
use std::time::Duration;

/// ShardKV - a sharded, in-memory Key-Value store served over HTTP
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "shardkv",
    version,
    about,
    after_help = "EXAMPLES:\n    \
        shardkv                         # Start on 127.0.0.1:8080\n    \
        shardkv --port 9000 --shards 16 # More shards, different port\n\n\
        CONNECTING:\n    \
        $ curl -X POST localhost:8080/set -d '{\"key\":\"name\",\"value\":\"Ariz\"}'\n    \
        $ curl 'localhost:8080/get?key=name'\n    \
        {\"key\":\"name\",\"value\":\"Ariz\"}"
)]
pub struct Config {
    /// Host to bind to
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Number of shards (must be at least 1)
    #[arg(short, long, default_value_t = DEFAULT_SHARDS)]
    pub shards: usize,

    /// Replica count (reserved, no replication is performed)
    #[arg(short, long, default_value_t = DEFAULT_REPLICAS)]
    pub replicas: usize,

    /// TTL in seconds applied to every key written through POST /set
    #[arg(long = "ttl-secs", default_value_t = DEFAULT_TTL.as_secs())]
    pub ttl_secs: u64,

    /// Rely on shard locks only and skip the per-key lock registry
    #[arg(long)]
    pub no_key_locks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            shards: DEFAULT_SHARDS,
            replicas: DEFAULT_REPLICAS,
            ttl_secs: DEFAULT_TTL.as_secs(),
            no_key_locks: false,
        }
    }
}

impl Config {
    /// Returns the bind address as a string
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.shards, self.replicas).with_key_locks(!self.no_key_locks)
    }
}
