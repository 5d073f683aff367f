//! Configuration for the relaymsg CLI.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use relaymsg_core::{ConfigError, TlsSettings};

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Where messages go.
    pub destination: DestinationConfig,
    /// Trust settings.
    pub tls: TlsConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Destination of every message.
///
/// Both fields stay strings: validation belongs to the sender, which
/// treats an empty host or port as "nothing to send".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DestinationConfig {
    pub host: String,
    pub port: String,
}

/// Trust roots for the TLS handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Use the operating system's trust store.
    pub native_roots: bool,
    /// Optional PEM bundle with extra roots. Empty means none.
    pub ca_file: String,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            native_roots: true,
            ca_file: String::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl RelayConfig {
    /// Load configuration from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::debug!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write the default configuration to a file (for bootstrapping).
    pub fn write_default(path: &Path) -> std::io::Result<()> {
        let text = toml::to_string_pretty(&Self::default()).map_err(std::io::Error::other)?;
        std::fs::write(path, text)
    }

    /// Convert trust settings into the sender's `TlsSettings`.
    pub fn to_tls_settings(&self) -> Result<TlsSettings, ConfigError> {
        let settings = TlsSettings {
            native_roots: self.tls.native_roots,
            extra_roots: Vec::new(),
        };
        if self.tls.ca_file.is_empty() {
            Ok(settings)
        } else {
            settings.load_ca_file(&PathBuf::from(&self.tls.ca_file))
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let text = toml::to_string_pretty(&RelayConfig::default()).unwrap();
        assert!(text.contains("[destination]"));
        assert!(text.contains("native_roots = true"));
        assert!(text.contains("level = \"info\""));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: RelayConfig = toml::from_str(
            r#"
            [destination]
            host = "relay.example.com"
            port = "8443"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.destination.host, "relay.example.com");
        assert_eq!(cfg.destination.port, "8443");
        assert!(cfg.tls.native_roots);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn missing_file_uses_defaults() {
        let cfg = RelayConfig::load(Path::new("/nonexistent/relaymsg.toml"));
        assert!(cfg.destination.host.is_empty());
    }

    #[test]
    fn write_then_load() {
        let path = std::env::temp_dir().join(format!("relaymsg-{}.toml", std::process::id()));
        RelayConfig::write_default(&path).unwrap();
        let cfg = RelayConfig::load(&path);
        assert_eq!(cfg.logging.level, "info");
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_ca_file_is_a_config_error() {
        let mut cfg = RelayConfig::default();
        cfg.tls.ca_file = "/nonexistent/relaymsg/ca.pem".into();
        assert!(matches!(
            cfg.to_tls_settings(),
            Err(ConfigError::CaFile { .. })
        ));
    }
}
