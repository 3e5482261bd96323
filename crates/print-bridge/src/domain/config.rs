//! Bridge configuration types.
//!
//! [`BridgeConfig`] is the single source of truth for all runtime settings.
//! It is assembled once at startup from defaults, an optional TOML file, and
//! CLI arguments (see `main.rs`), then shared read-only with the server.
//!
//! The backend strategy is part of the configuration: exactly one of the
//! [`BackendConfig`] variants is active for the lifetime of the process.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default HTTP/WebSocket listening port.
pub const DEFAULT_PORT: u16 = 3001;

/// Default base URL of the remote print backend process.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8081";

/// All runtime configuration for the print bridge.
///
/// # Example
///
/// ```rust
/// use print_bridge::domain::BridgeConfig;
///
/// let cfg = BridgeConfig::default();
/// assert_eq!(cfg.bind_addr.port(), 3001);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    /// Address the combined HTTP + WebSocket listener binds to.
    pub bind_addr: SocketAddr,

    /// Which backend executes print jobs.
    pub backend: BackendConfig,

    /// Directory served as static files for paths no API route matches.
    pub static_dir: Option<PathBuf>,
}

impl Default for BridgeConfig {
    /// | Field        | Default                          |
    /// |--------------|----------------------------------|
    /// | bind_addr    | `0.0.0.0:3001`                   |
    /// | backend      | remote, `http://localhost:8081`  |
    /// | static_dir   | none                             |
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            backend: BackendConfig::Remote {
                base_url: DEFAULT_BACKEND_URL.to_string(),
            },
            static_dir: None,
        }
    }
}

/// Settings of the active backend strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// Forward every operation to a separate HTTP backend process.
    Remote {
        /// Base URL without a trailing slash, e.g. `http://localhost:8081`.
        base_url: String,
    },

    /// Drive the host's print spooler through its command-line tools.
    Local(LocalBackendConfig),

    /// Canned printers, no printing.  For demos and client development.
    Mock,
}

impl BackendConfig {
    pub fn strategy(&self) -> BackendStrategy {
        match self {
            Self::Remote { .. } => BackendStrategy::Remote,
            Self::Local(_) => BackendStrategy::Local,
            Self::Mock => BackendStrategy::Mock,
        }
    }
}

/// Command names and spool location for the local strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalBackendConfig {
    /// Program that submits a file to a queue (`lp`).
    pub lp_command: String,

    /// Program that reports queues and the default destination (`lpstat`).
    pub lpstat_command: String,

    /// Directory for temporary spool files; the OS temp dir when `None`.
    pub spool_dir: Option<PathBuf>,
}

impl Default for LocalBackendConfig {
    fn default() -> Self {
        Self {
            lp_command: "lp".to_string(),
            lpstat_command: "lpstat".to_string(),
            spool_dir: None,
        }
    }
}

/// Name of a backend strategy, as written on the command line and in the
/// config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendStrategy {
    #[default]
    Remote,
    Local,
    Mock,
}

impl BackendStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
            Self::Mock => "mock",
        }
    }
}

impl fmt::Display for BackendStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "remote" => Ok(Self::Remote),
            "local" => Ok(Self::Local),
            "mock" => Ok(Self::Mock),
            other => Err(format!(
                "unknown backend strategy '{other}' (expected 'remote', 'local' or 'mock')"
            )),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
