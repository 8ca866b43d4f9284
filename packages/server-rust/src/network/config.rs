//! Network configuration for the `ReqShape` server.

use std::time::Duration;

/// Listener and HTTP-stack configuration.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Bind address for the server.
    pub host: String,
    /// Port to listen on. 0 means OS-assigned.
    pub port: u16,
    /// Allowed CORS origins. A `"*"` anywhere in the list allows any origin.
    pub cors_origins: Vec<String>,
    /// Maximum time a request may take before the stack answers 408.
    pub request_timeout: Duration,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_wildcard_cors_and_ephemeral_port() {
        let config = NetworkConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 0);
        assert_eq!(config.cors_origins, vec!["*".to_string()]);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }
}
