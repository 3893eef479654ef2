use std::fmt::Display;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// Settings for the marketplace API process.
///
/// Defaults target a local setup with the web frontend on port 3000; only
/// the JWT secret has no default.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Browser origins allowed to call the API (`CORS_ORIGINS`, comma separated).
    pub cors_origins: Vec<String>,
    /// Upper bound on handling a single request. Booking inserts hold a
    /// transaction for their whole duration, so keep this short.
    pub request_timeout_secs: u64,
    /// Pool size handed to `harbor_db::create_pool`.
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Read the configuration from the process environment.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `4000`                  |
    /// | `CORS_ORIGINS`         | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS` | `15`                    |
    /// | `DB_MAX_CONNECTIONS`   | `20`                    |
    ///
    /// # Panics
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("PORT", 4000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 15),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 20),
            jwt: JwtConfig::from_env(),
        }
    }

    /// Socket address to listen on.
    ///
    /// # Panics
    ///
    /// Panics if `host` is not an IP address.
    pub fn bind_addr(&self) -> SocketAddr {
        let ip: IpAddr = self
            .host
            .parse()
            .unwrap_or_else(|e| panic!("HOST '{}' is not an IP address: {e}", self.host));
        SocketAddr::new(ip, self.port)
    }
}

/// Parse `key` from the environment, falling back to `default` when unset.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(host: &str) -> ServerConfig {
        ServerConfig {
            host: host.to_string(),
            port: 4000,
            cors_origins: vec![],
            request_timeout_secs: 15,
            db_max_connections: 5,
            jwt: JwtConfig {
                secret: "secret".into(),
                access_token_expiry_mins: 60,
            },
        }
    }

    #[test]
    fn bind_addr_combines_host_and_port() {
        assert_eq!(config("127.0.0.1").bind_addr().to_string(), "127.0.0.1:4000");
    }

    #[test]
    #[should_panic(expected = "not an IP address")]
    fn bind_addr_rejects_hostnames() {
        config("localhost").bind_addr();
    }
}
