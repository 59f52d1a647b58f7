//! Connection configuration for the Blender addon

use std::time::Duration;
use tracing::warn;

/// Configuration for the Blender addon connection
#[derive(Debug, Clone)]
pub struct BlenderConfig {
    /// Host the addon listens on (default: localhost)
    pub host: String,
    /// Addon socket server port (default: 9876)
    pub port: u16,
    /// Round-trip timeout, matching the addon's own execution timeout
    pub timeout: Duration,
}

impl Default for BlenderConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 9876,
            timeout: Duration::from_secs(180),
        }
    }
}

impl BlenderConfig {
    /// Build from the environment, honoring BLENDER_HOST and BLENDER_PORT
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(host) = std::env::var("BLENDER_HOST") {
            config.host = host;
        }
        if let Ok(port) = std::env::var("BLENDER_PORT") {
            match port.parse() {
                Ok(port) => config.port = port,
                Err(_) => warn!(
                    "Invalid BLENDER_PORT {:?}, using default port {}",
                    port, config.port
                ),
            }
        }
        config
    }

    /// Address in host:port form
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_addon() {
        let config = BlenderConfig::default();

        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 9876);
        assert_eq!(config.timeout, Duration::from_secs(180));
    }

    #[test]
    fn test_addr_format() {
        let config = BlenderConfig {
            host: "10.0.0.5".into(),
            port: 9999,
            ..Default::default()
        };

        assert_eq!(config.addr(), "10.0.0.5:9999");
    }
}
