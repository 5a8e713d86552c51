//! Server configuration.
//!
//! The listening port comes from the `PORT` environment variable unless it is
//! given on the command line. Unset, non-numeric or zero values fall back to
//! [`DEFAULT_PORT`].

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const PORT_ENV: &str = "PORT";

/// Where the server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Build the config, reading `PORT` when no explicit port is given.
    pub fn from_env(host: String, port: Option<u16>) -> Self {
        let port = port.unwrap_or_else(|| parse_port(std::env::var(PORT_ENV).ok().as_deref()));
        Self { host, port }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Parse a raw `PORT` value.
pub fn parse_port(value: Option<&str>) -> u16 {
    let Some(raw) = value else {
        return DEFAULT_PORT;
    };
    match raw.trim().parse::<u16>() {
        Ok(port) if port != 0 => port,
        _ => {
            tracing::warn!(
                "Invalid {} value '{}', using default port {}",
                PORT_ENV,
                raw,
                DEFAULT_PORT
            );
            DEFAULT_PORT
        }
    }
}
