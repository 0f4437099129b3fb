use serde::{Deserialize, Serialize};

/// Settings for the PostgreSQL connection pool
#[derive(Debug, Clone, PartialEq, Eq, clap::Args, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSettings {
    /// maximum number of pool connections
    #[arg(long, env = "USERAPP_MAX_CONNECTIONS", default_value_t = 50)]
    #[serde(default = "max_connection_default")]
    pub max_connections: u32,
    /// timeout for acquiring a connection from the pool (seconds)
    #[arg(long, env = "USERAPP_POOL_TIMEOUT", default_value_t = 600)]
    #[serde(default = "pool_timeout_default")]
    pub pool_timeout: u64,
    /// idle timeout for releasing a connection from the pool (seconds)
    #[arg(long, env = "USERAPP_IDLE_TIMEOUT", default_value_t = 180)]
    #[serde(default = "idle_timeout_default")]
    pub idle_timeout: u64,
    /// maximum lifetime for an individual connection (seconds)
    #[arg(long, env = "USERAPP_CONNECTION_LIFETIME", default_value_t = 600)]
    #[serde(default = "connection_lifetime_default")]
    pub connection_lifetime: u64,
}

impl PoolSettings {
    pub fn is_default(&self) -> bool {
        *self == PoolSettings::default()
    }
}

impl Default for PoolSettings {
    fn default() -> PoolSettings {
        PoolSettings {
            max_connections: 50,
            pool_timeout: 600,
            idle_timeout: 180,
            connection_lifetime: 600,
        }
    }
}

// for serde default //
fn max_connection_default() -> u32 {
    PoolSettings::default().max_connections
}
fn pool_timeout_default() -> u64 {
    PoolSettings::default().pool_timeout
}
fn idle_timeout_default() -> u64 {
    PoolSettings::default().idle_timeout
}
fn connection_lifetime_default() -> u64 {
    PoolSettings::default().connection_lifetime
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_their_defaults() {
        let settings: PoolSettings = serde_json::from_str(r#"{"maxConnections": 5}"#).unwrap();
        assert_eq!(
            settings,
            PoolSettings {
                max_connections: 5,
                ..PoolSettings::default()
            }
        );
        assert!(!settings.is_default());

        let settings: PoolSettings = serde_json::from_str("{}").unwrap();
        assert!(settings.is_default());
    }
}
