//! Optional TOML configuration file.
//!
//! Every field is optional: values present in the file override the built-in
//! defaults, and command-line flags override the file (see `main.rs`).
//!
//! ```toml
//! [server]
//! bind_address = "0.0.0.0"
//! port = 3001
//! static_dir = "public"
//!
//! [backend]
//! strategy = "local"
//! url = "http://localhost:8081"
//! lp_command = "lp"
//! lpstat_command = "lpstat"
//! spool_dir = "/var/spool/print-bridge"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::BackendStrategy;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub backend: BackendSection,
}

/// `[server]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// IP address to bind.  `"0.0.0.0"` binds all interfaces.
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    /// Directory served for paths no API route matches.
    pub static_dir: Option<PathBuf>,
}

/// `[backend]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendSection {
    pub strategy: Option<BackendStrategy>,
    /// Base URL of the remote backend.
    pub url: Option<String>,
    pub lp_command: Option<String>,
    pub lpstat_command: Option<String>,
    pub spool_dir: Option<PathBuf>,
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Reads and parses the file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if it is not valid TOML for this schema.
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text)
}

/// Parses TOML text into a [`FileConfig`].
pub fn parse_config(text: &str) -> Result<FileConfig, ConfigError> {
    Ok(toml::from_str(text)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_file_yields_all_none() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg, FileConfig::default());
    }

    #[test]
    fn test_parse_full_file() {
        // Arrange
        let text = r#"
            [server]
            bind_address = "127.0.0.1"
            port = 8080
            static_dir = "public"

            [backend]
            strategy = "local"
            url = "http://printhost:8081"
            lp_command = "/usr/bin/lp"
            lpstat_command = "/usr/bin/lpstat"
            spool_dir = "/var/spool/print-bridge"
        "#;

        // Act
        let cfg = parse_config(text).unwrap();

        // Assert
        assert_eq!(cfg.server.bind_address.as_deref(), Some("127.0.0.1"));
        assert_eq!(cfg.server.port, Some(8080));
        assert_eq!(cfg.server.static_dir, Some(PathBuf::from("public")));
        assert_eq!(cfg.backend.strategy, Some(BackendStrategy::Local));
        assert_eq!(cfg.backend.url.as_deref(), Some("http://printhost:8081"));
        assert_eq!(cfg.backend.lp_command.as_deref(), Some("/usr/bin/lp"));
        assert_eq!(cfg.backend.lpstat_command.as_deref(), Some("/usr/bin/lpstat"));
        assert_eq!(
            cfg.backend.spool_dir,
            Some(PathBuf::from("/var/spool/print-bridge"))
        );
    }

    #[test]
    fn test_parse_partial_file_keeps_missing_fields_none() {
        let cfg = parse_config("[server]\nport = 4000\n").unwrap();
        assert_eq!(cfg.server.port, Some(4000));
        assert_eq!(cfg.server.bind_address, None);
        assert_eq!(cfg.backend, BackendSection::default());
    }

    #[test]
    fn test_parse_unknown_strategy_is_error() {
        let err = parse_config("[backend]\nstrategy = \"cloud\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_parse_unknown_key_is_error() {
        let err = parse_config("[server]\nprot = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let path = Path::new("/definitely/not/here/print-bridge.toml");
        let err = load_config(path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("print-bridge.toml"));
    }

    #[test]
    fn test_load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge.toml");
        std::fs::write(&path, "[backend]\nstrategy = \"remote\"\n").unwrap();

        let cfg = load_config(&path).unwrap();

        assert_eq!(cfg.backend.strategy, Some(BackendStrategy::Remote));
    }
}
