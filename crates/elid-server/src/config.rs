use clap::Parser;
use elid_storage::DatabaseConfig;
use elid_workers::WorkerConfig;
use std::time::Duration;

/// Runs a worker for every active ELID device until interrupted
#[derive(Debug, Clone, Parser)]
#[command(name = "elid-server", version, about)]
pub struct ServerConfig {
    /// SQLite database file
    #[arg(long, env = "ELID_DATABASE_PATH", default_value = "elid.db")]
    pub database_path: String,

    /// Maximum pooled database connections
    #[arg(long, env = "ELID_MAX_CONNECTIONS", default_value_t = 10)]
    pub max_connections: u32,

    /// Shortest pause between two events of one device, in seconds
    #[arg(long, env = "ELID_MIN_INTERVAL_SECS", default_value_t = 2)]
    pub min_interval_secs: u64,

    /// Longest pause between two events of one device, in seconds
    #[arg(long, env = "ELID_MAX_INTERVAL_SECS", default_value_t = 10)]
    pub max_interval_secs: u64,

    /// How long to wait for a stopping worker before aborting it, in seconds
    #[arg(long, env = "ELID_STOP_TIMEOUT_SECS", default_value_t = 5)]
    pub stop_timeout_secs: u64,

    /// How often to log the running worker count, in seconds
    #[arg(
        long,
        env = "ELID_STATUS_INTERVAL_SECS",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub status_interval_secs: u64,

    /// Emit logs as JSON lines
    #[arg(long, env = "ELID_LOG_JSON")]
    pub log_json: bool,
}

impl ServerConfig {
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(&self.database_path).max_connections(self.max_connections)
    }

    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig::new()
            .interval(
                Duration::from_secs(self.min_interval_secs),
                Duration::from_secs(self.max_interval_secs),
            )
            .stop_timeout(Duration::from_secs(self.stop_timeout_secs))
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status_interval_secs)
    }
}
