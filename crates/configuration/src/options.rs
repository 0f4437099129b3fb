//! Command-line flags for the server, each with an environment variable fallback.

use std::net::{IpAddr, SocketAddr};

use crate::values::{ConnectionUri, PoolSettings};

#[derive(Debug, Clone, clap::Parser)]
#[command(name = "userapp-api", about = "REST backend for administering users, groups and projects")]
pub struct ServerOptions {
    /// Connection string for the PostgreSQL database
    #[arg(long, env = "USERAPP_DATABASE_URL", hide_env_values = true)]
    pub database_url: ConnectionUri,

    /// Address to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    #[command(flatten)]
    pub pool_settings: PoolSettings,
}

impl ServerOptions {
    pub fn address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn flags_override_everything() {
        let options = ServerOptions::try_parse_from([
            "userapp-api",
            "--database-url",
            "postgres://localhost/userapp",
            "--host",
            "127.0.0.1",
            "--port",
            "3000",
            "--max-connections",
            "8",
            "--pool-timeout",
            "30",
            "--idle-timeout",
            "60",
            "--connection-lifetime",
            "120",
        ])
        .unwrap();

        assert_eq!(options.database_url.expose(), "postgres://localhost/userapp");
        assert_eq!(options.address(), "127.0.0.1:3000".parse().unwrap());
        assert_eq!(
            options.pool_settings,
            PoolSettings {
                max_connections: 8,
                pool_timeout: 30,
                idle_timeout: 60,
                connection_lifetime: 120,
            }
        );
    }

    #[test]
    fn host_must_be_an_address() {
        assert!(ServerOptions::try_parse_from([
            "userapp-api",
            "--database-url",
            "postgres://localhost/userapp",
            "--host",
            "not an address",
        ])
        .is_err());
    }
}
