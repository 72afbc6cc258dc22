//! Server configuration

use crate::console::{Banner, CommandTable};
use crate::session::{SessionConfig, MAX_PAYLOAD_SIZE};
use crate::{Error, Result};
use std::net::SocketAddr;
use std::str::FromStr;

/// Default listen address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:5432";

/// Environment variable: listen address
pub const ENV_LISTEN: &str = "PG_FORTUNE_LISTEN";

/// Environment variable: SSLRequests refused per connection
pub const ENV_MAX_SSL_REQUESTS: &str = "PG_FORTUNE_MAX_SSL_REQUESTS";

/// Environment variable: largest accepted message in bytes
pub const ENV_MAX_MESSAGE_SIZE: &str = "PG_FORTUNE_MAX_MESSAGE_SIZE";

/// Environment variable: suppress the startup banner
pub const ENV_QUIET: &str = "PG_FORTUNE_QUIET";

/// Server configuration
///
/// Use `ServerConfig::builder()` for a fluent setup or
/// `ServerConfig::from_env()` to read `PG_FORTUNE_*` variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the listener binds to
    pub listen_addr: SocketAddr,
    /// Settings handed to every session
    pub session: SessionConfig,
}

impl ServerConfig {
    /// Create a builder with defaults
    ///
    /// # Examples
    ///
    /// ```
    /// use pg_fortune::console::Banner;
    /// use pg_fortune::server::ServerConfig;
    ///
    /// let config = ServerConfig::builder()
    ///     .listen_addr("127.0.0.1:0".parse().unwrap())
    ///     .max_ssl_requests(2)
    ///     .banner(Banner::empty())
    ///     .build();
    ///
    /// assert_eq!(config.session.max_ssl_requests, 2);
    /// ```
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder {
            config: ServerConfig::default(),
        }
    }

    /// Read configuration from the process environment
    ///
    /// Unset variables keep their defaults. Malformed values are a
    /// configuration error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(addr) = lookup(ENV_LISTEN) {
            builder = builder.listen_addr(parse_var(ENV_LISTEN, &addr)?);
        }
        if let Some(n) = lookup(ENV_MAX_SSL_REQUESTS) {
            builder = builder.max_ssl_requests(parse_var(ENV_MAX_SSL_REQUESTS, &n)?);
        }
        if let Some(n) = lookup(ENV_MAX_MESSAGE_SIZE) {
            let size: usize = parse_var(ENV_MAX_MESSAGE_SIZE, &n)?;
            if size < 5 {
                return Err(Error::Config(format!(
                    "{} must be at least 5, got {}",
                    ENV_MAX_MESSAGE_SIZE, size
                )));
            }
            builder = builder.max_message_size(size);
        }
        if let Some(flag) = lookup(ENV_QUIET) {
            if parse_flag(ENV_QUIET, &flag)? {
                builder = builder.banner(Banner::empty());
            }
        }

        Ok(builder.build())
    }

    /// Per-session part of the configuration
    pub fn session_config(&self) -> &SessionConfig {
        &self.session
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 5432)),
            session: SessionConfig::default(),
        }
    }
}

/// Builder for creating `ServerConfig`
#[derive(Debug, Clone)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    /// Set the listen address
    ///
    /// Default: 127.0.0.1:5432
    pub fn listen_addr(mut self, addr: SocketAddr) -> Self {
        self.config.listen_addr = addr;
        self
    }

    /// Set how many SSLRequests a client may send before startup
    ///
    /// Default: 8
    pub fn max_ssl_requests(mut self, n: usize) -> Self {
        self.config.session.max_ssl_requests = n;
        self
    }

    /// Set the largest accepted frontend message
    ///
    /// Default: 16 MB
    pub fn max_message_size(mut self, bytes: usize) -> Self {
        self.config.session.max_message_size = bytes;
        self
    }

    /// Set the largest answer a responder may return
    ///
    /// Default: the largest value a `DataRow` can carry
    pub fn max_payload_size(mut self, bytes: usize) -> Self {
        self.config.session.max_payload_size = bytes.min(MAX_PAYLOAD_SIZE);
        self
    }

    /// Set the startup banner
    pub fn banner(mut self, banner: Banner) -> Self {
        self.config.session.banner = banner;
        self
    }

    /// Set the built-in command table
    pub fn commands(mut self, commands: CommandTable) -> Self {
        self.config.session.commands = commands;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ServerConfig {
        self.config
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("invalid {} '{}': {}", key, value, e)))
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(Error::Config(format!(
            "invalid {} '{}': expected a boolean",
            key, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::constants::DEFAULT_MAX_MESSAGE_SIZE;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.listen_addr.to_string(), DEFAULT_LISTEN_ADDR);
        assert_eq!(config.session.max_ssl_requests, 8);
        assert_eq!(config.session.max_message_size, 16 * 1024 * 1024);
        assert_eq!(config.session.max_payload_size, MAX_PAYLOAD_SIZE);
        assert_eq!(config.session.banner, Banner::default());
    }

    #[test]
    fn test_builder_fluent() {
        let config = ServerConfig::builder()
            .listen_addr("0.0.0.0:6875".parse().unwrap())
            .max_ssl_requests(1)
            .max_message_size(4096)
            .max_payload_size(100)
            .banner(Banner::new(["hello"]))
            .commands(CommandTable::builder().hidden("ping;", "pong").build())
            .build();

        assert_eq!(config.listen_addr.port(), 6875);
        assert_eq!(config.session.max_ssl_requests, 1);
        assert_eq!(config.session.max_message_size, 4096);
        assert_eq!(config.session.max_payload_size, 100);
        assert_eq!(config.session.banner.lines(), &["hello".to_string()]);
        assert!(config.session.commands.lookup("ping;").is_some());
        assert!(config.session.commands.lookup("show docs;").is_none());
    }

    #[test]
    fn test_session_config_carries_settings() {
        let config = ServerConfig::builder().max_ssl_requests(3).build();
        let session = config.session_config();
        assert_eq!(session.max_ssl_requests, 3);
        assert_eq!(session.max_message_size, DEFAULT_MAX_MESSAGE_SIZE);
        assert_eq!(session.banner, Banner::default());
    }

    #[test]
    fn test_payload_limit_is_capped() {
        let config = ServerConfig::builder().max_payload_size(usize::MAX).build();
        assert_eq!(config.session.max_payload_size, MAX_PAYLOAD_SIZE);
    }

    #[test]
    fn test_from_lookup_empty_uses_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.listen_addr.to_string(), DEFAULT_LISTEN_ADDR);
        assert!(!config.session.banner.is_empty());
    }

    #[test]
    fn test_from_lookup_reads_all_variables() {
        let config = ServerConfig::from_lookup(lookup(&[
            (ENV_LISTEN, "0.0.0.0:6543"),
            (ENV_MAX_SSL_REQUESTS, " 2 "),
            (ENV_MAX_MESSAGE_SIZE, "1024"),
            (ENV_QUIET, "yes"),
        ]))
        .unwrap();

        assert_eq!(config.listen_addr.to_string(), "0.0.0.0:6543");
        assert_eq!(config.session.max_ssl_requests, 2);
        assert_eq!(config.session.max_message_size, 1024);
        assert!(config.session.banner.is_empty());
    }

    #[test]
    fn test_from_lookup_quiet_off_keeps_banner() {
        let config = ServerConfig::from_lookup(lookup(&[(ENV_QUIET, "off")])).unwrap();
        assert!(!config.session.banner.is_empty());
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        for (key, value) in [
            (ENV_LISTEN, "localhost"),
            (ENV_MAX_SSL_REQUESTS, "-1"),
            (ENV_MAX_MESSAGE_SIZE, "3"),
            (ENV_QUIET, "maybe"),
        ] {
            let err = ServerConfig::from_lookup(lookup(&[(key, value)])).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{} = {}", key, value);
            assert!(err.to_string().contains(key), "{}", err);
        }
    }
}
