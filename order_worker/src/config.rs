use std::{env, time::Duration};

use log::*;
use order_engine::sqlite::db::db_url;

const DEFAULT_PROMOTE_INTERVAL_SECS: u64 = 300;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Debug)]
pub struct WorkerConfig {
    pub database_url: String,
    /// How often the promotion sweep runs.
    pub promote_interval: Duration,
    pub max_connections: u32,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            database_url: String::default(),
            promote_interval: Duration::from_secs(DEFAULT_PROMOTE_INTERVAL_SECS),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl WorkerConfig {
    pub fn from_env_or_default() -> Self {
        let database_url = db_url();
        let promote_interval = env::var("OME_PROMOTE_INTERVAL_SECS")
            .map(|s| {
                s.parse::<u64>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid value for OME_PROMOTE_INTERVAL_SECS. {e} Using the default, \
                         {DEFAULT_PROMOTE_INTERVAL_SECS}, instead."
                    );
                    DEFAULT_PROMOTE_INTERVAL_SECS
                })
            })
            .ok()
            .unwrap_or(DEFAULT_PROMOTE_INTERVAL_SECS);
        let max_connections = env::var("OME_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        Self {
            database_url,
            promote_interval: Duration::from_secs(promote_interval),
            max_connections,
        }
    }
}
