//! Server configuration.

use std::net::SocketAddr;

use crowdbalance_db::DbConfig;
use tracing::warn;

/// Configuration for the CrowdBalance server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,
    /// SurrealDB connection settings.
    pub db: DbConfig,
    /// Activity entries older than this are pruned by the retention
    /// sweeper (default: 3600 = 1 hour).
    pub retention_horizon_secs: u64,
    /// How often a sweep cycle runs (default: 300 = 5 minutes).
    pub sweep_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: ([0, 0, 0, 0], 3000).into(),
            db: DbConfig::default(),
            retention_horizon_secs: 3600,
            sweep_interval_secs: 300,
        }
    }
}

impl ServerConfig {
    /// Build the configuration from environment variables, falling back
    /// to defaults for anything unset. Unparseable values are reported
    /// and replaced by the default rather than aborting startup.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(addr) = parsed_env("CROWDBALANCE_BIND", config.bind_addr) {
            config.bind_addr = addr;
        }
        if let Ok(url) = std::env::var("SURREALDB_URL") {
            config.db.url = url;
        }
        if let Ok(ns) = std::env::var("SURREALDB_NAMESPACE") {
            config.db.namespace = ns;
        }
        if let Ok(database) = std::env::var("SURREALDB_DATABASE") {
            config.db.database = database;
        }
        if let Ok(user) = std::env::var("SURREALDB_USERNAME") {
            config.db.username = user;
        }
        if let Ok(pass) = std::env::var("SURREALDB_PASSWORD") {
            config.db.password = pass;
        }
        if let Some(secs) = parsed_env(
            "CROWDBALANCE_RETENTION_HORIZON_SECS",
            config.retention_horizon_secs,
        ) {
            config.retention_horizon_secs = secs;
        }
        if let Some(secs) = parsed_env(
            "CROWDBALANCE_SWEEP_INTERVAL_SECS",
            config.sweep_interval_secs,
        ) {
            config.sweep_interval_secs = secs;
        }

        config
    }
}

fn parsed_env<T: std::str::FromStr + std::fmt::Debug>(name: &str, default: T) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = name, value = %raw, default = ?default, "Unparseable env var, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_retention_policy() {
        let config = ServerConfig::default();
        assert_eq!(config.retention_horizon_secs, 3600);
        assert_eq!(config.sweep_interval_secs, 300);
    }
}
