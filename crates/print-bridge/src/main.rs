//! Print bridge: entry point.
//!
//! Serves a WebSocket channel and a small HTTP API on one port so that
//! browser clients can list printers, print a test page, and print text.
//! Printing is delegated to a remote HTTP print service or to the host's
//! `lp` / `lpstat` tools.
//!
//! # Usage
//!
//! ```text
//! print-bridge [OPTIONS]
//!
//! Options:
//!   --port           <PORT>  Listening port [default: 3001]
//!   --bind           <IP>    Bind address [default: 0.0.0.0]
//!   --backend        <NAME>  remote | local | mock [default: remote]
//!   --backend-url    <URL>   Remote print service [default: http://localhost:8081]
//!   --lp-command     <CMD>   Submit command for the local backend [default: lp]
//!   --lpstat-command <CMD>   Status command for the local backend [default: lpstat]
//!   --spool-dir      <DIR>   Spool directory for the local backend [default: OS temp dir]
//!   --static-dir     <DIR>   Serve the web client from this directory
//!   --config         <FILE>  Optional TOML configuration file
//! ```
//!
//! # Precedence
//!
//! Command-line flags (or their environment variables) override the config
//! file, which overrides the built-in defaults.
//!
//! | Variable                  | Flag               |
//! |---------------------------|--------------------|
//! | `PORT`                    | `--port`           |
//! | `PRINT_BRIDGE_BIND`       | `--bind`           |
//! | `PRINT_BRIDGE_BACKEND`    | `--backend`        |
//! | `PRINT_BACKEND_URL`       | `--backend-url`    |
//! | `PRINT_BRIDGE_LP`         | `--lp-command`     |
//! | `PRINT_BRIDGE_LPSTAT`     | `--lpstat-command` |
//! | `PRINT_BRIDGE_SPOOL_DIR`  | `--spool-dir`      |
//! | `PRINT_BRIDGE_STATIC_DIR` | `--static-dir`     |
//! | `PRINT_BRIDGE_CONFIG`     | `--config`         |
//!
//! The process stops accepting connections and exits with status 0 on Ctrl+C
//! or SIGTERM.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use print_bridge::domain::config::{DEFAULT_BACKEND_URL, DEFAULT_PORT};
use print_bridge::domain::{BackendConfig, BackendStrategy, BridgeConfig, LocalBackendConfig};
use print_bridge::infrastructure::config_file::{load_config, FileConfig};
use print_bridge::infrastructure::run_server;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Print bridge.
///
/// Exposes printer listing and printing to browser clients over WebSocket
/// and HTTP.
///
/// Every option is optional so that unset flags fall through to the config
/// file and then to the defaults.
#[derive(Debug, Parser)]
#[command(
    name = "print-bridge",
    about = "WebSocket and HTTP bridge to a remote or local print backend",
    version
)]
struct Cli {
    /// TCP port for HTTP and WebSocket clients.
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// IP address to bind to.
    ///
    /// Use `0.0.0.0` to accept connections from any interface, or
    /// `127.0.0.1` to accept only local connections.
    #[arg(long, env = "PRINT_BRIDGE_BIND")]
    bind: Option<String>,

    /// Backend strategy: `remote`, `local` or `mock`.
    #[arg(long, env = "PRINT_BRIDGE_BACKEND")]
    backend: Option<BackendStrategy>,

    /// Base URL of the remote print service.
    #[arg(long, env = "PRINT_BACKEND_URL")]
    backend_url: Option<String>,

    /// Command used by the local backend to submit jobs.
    #[arg(long, env = "PRINT_BRIDGE_LP")]
    lp_command: Option<String>,

    /// Command used by the local backend to query printers.
    #[arg(long, env = "PRINT_BRIDGE_LPSTAT")]
    lpstat_command: Option<String>,

    /// Directory for the local backend's temporary spool files.
    #[arg(long, env = "PRINT_BRIDGE_SPOOL_DIR")]
    spool_dir: Option<PathBuf>,

    /// Directory of static files served for unmatched paths.
    #[arg(long, env = "PRINT_BRIDGE_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long, env = "PRINT_BRIDGE_CONFIG")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Loads the config file (if any) and layers the CLI on top of it.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, or if
    /// the bind address is not a valid IP address.
    fn into_bridge_config(self) -> anyhow::Result<BridgeConfig> {
        let file = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("failed to load config file {}", path.display()))?,
            None => FileConfig::default(),
        };
        self.merge(file)
    }

    /// Layers CLI values over `file` over the defaults.
    fn merge(self, file: FileConfig) -> anyhow::Result<BridgeConfig> {
        let bind = self
            .bind
            .or(file.server.bind_address)
            .unwrap_or_else(|| BridgeConfig::default().bind_addr.ip().to_string());
        let ip: IpAddr = bind
            .parse()
            .with_context(|| format!("invalid bind address: '{bind}'"))?;
        let port = self.port.or(file.server.port).unwrap_or(DEFAULT_PORT);

        let strategy = self.backend.or(file.backend.strategy).unwrap_or_default();
        let backend = match strategy {
            BackendStrategy::Remote => BackendConfig::Remote {
                base_url: self
                    .backend_url
                    .or(file.backend.url)
                    .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
            },
            BackendStrategy::Local => {
                let defaults = LocalBackendConfig::default();
                BackendConfig::Local(LocalBackendConfig {
                    lp_command: self
                        .lp_command
                        .or(file.backend.lp_command)
                        .unwrap_or(defaults.lp_command),
                    lpstat_command: self
                        .lpstat_command
                        .or(file.backend.lpstat_command)
                        .unwrap_or(defaults.lpstat_command),
                    spool_dir: self.spool_dir.or(file.backend.spool_dir),
                })
            }
            BackendStrategy::Mock => BackendConfig::Mock,
        };

        Ok(BridgeConfig {
            bind_addr: SocketAddr::new(ip, port),
            backend,
            static_dir: self.static_dir.or(file.server.static_dir),
        })
    }
}

// ── Shutdown ──────────────────────────────────────────────────────────────────

/// Resolves on Ctrl+C, or on SIGTERM where supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl+C signal: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `RUST_LOG` controls verbosity; `info` when absent or invalid.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_bridge_config()?;

    info!(
        "print bridge starting: listen={}, backend={}",
        config.bind_addr,
        config.backend.strategy()
    );

    run_server(config, shutdown_signal()).await?;

    info!("print bridge stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use print_bridge::infrastructure::config_file::parse_config;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("print-bridge").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_port_override() {
        let cli = cli(&["--port", "9999"]);
        assert_eq!(cli.port, Some(9999));
    }

    #[test]
    fn test_cli_backend_parses_strategy_name() {
        let cli = cli(&["--backend", "local"]);
        assert_eq!(cli.backend, Some(BackendStrategy::Local));
    }

    #[test]
    fn test_cli_rejects_unknown_backend() {
        let result = Cli::try_parse_from(["print-bridge", "--backend", "cloud"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_explicit_flags_without_file() {
        // Arrange
        let cli = cli(&[
            "--bind",
            "127.0.0.1",
            "--port",
            "8080",
            "--backend",
            "remote",
            "--backend-url",
            "http://printhost:9000",
        ]);

        // Act
        let config = cli.merge(FileConfig::default()).unwrap();

        // Assert
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(
            config.backend,
            BackendConfig::Remote {
                base_url: "http://printhost:9000".into()
            }
        );
    }

    #[test]
    fn test_merge_file_fills_unset_flags() {
        // Arrange
        let file = parse_config(
            r#"
            [server]
            port = 4000
            static_dir = "public"

            [backend]
            strategy = "local"
            lp_command = "/opt/cups/bin/lp"
            spool_dir = "/var/spool/print-bridge"
            "#,
        )
        .unwrap();
        let cli = cli(&["--bind", "0.0.0.0", "--backend", "local"]);

        // Act
        let config = cli.merge(file).unwrap();

        // Assert
        assert_eq!(config.bind_addr.port(), 4000);
        assert_eq!(config.static_dir, Some(PathBuf::from("public")));
        assert_eq!(
            config.backend,
            BackendConfig::Local(LocalBackendConfig {
                lp_command: "/opt/cups/bin/lp".into(),
                lpstat_command: "lpstat".into(),
                spool_dir: Some(PathBuf::from("/var/spool/print-bridge")),
            })
        );
    }

    #[test]
    fn test_merge_mock_strategy_from_file() {
        let file = parse_config("[backend]\nstrategy = \"mock\"\n").unwrap();
        let cli = cli(&["--bind", "127.0.0.1"]);

        let config = cli.merge(file).unwrap();

        assert_eq!(config.backend, BackendConfig::Mock);
    }

    #[test]
    fn test_merge_flag_overrides_file() {
        let file = parse_config("[server]\nport = 4000\n").unwrap();
        let cli = cli(&["--bind", "0.0.0.0", "--port", "5000"]);

        let config = cli.merge(file).unwrap();

        assert_eq!(config.bind_addr.port(), 5000);
    }

    #[test]
    fn test_merge_accepts_ipv6_bind() {
        let cli = cli(&["--bind", "::1", "--port", "3001"]);
        let config = cli.merge(FileConfig::default()).unwrap();
        assert_eq!(config.bind_addr.to_string(), "[::1]:3001");
    }

    #[test]
    fn test_merge_invalid_bind_returns_error() {
        // Arrange: an invalid IP address string
        let cli = cli(&["--bind", "not.an.ip"]);

        // Act
        let result = cli.merge(FileConfig::default());

        // Assert: must return an error, not panic
        assert!(result.is_err());
    }

    #[test]
    fn test_into_bridge_config_missing_file_is_error() {
        let cli = cli(&["--config", "/definitely/not/here/print-bridge.toml"]);
        let err = cli.into_bridge_config().unwrap_err();
        assert!(format!("{err:#}").contains("print-bridge.toml"));
    }
}
