//! Local backend strategy: drive the host spooler through the CUPS tools.
//!
//! | Operation          | Command                 |
//! |--------------------|-------------------------|
//! | list printers      | `lpstat -p`             |
//! | default printer    | `lpstat -d`             |
//! | print text         | `lp [-d PRINTER] FILE`  |
//!
//! Text is written to a uniquely named spool file (`print-bridge-XXXX.txt`)
//! which is removed once `lp` returns, whatever the outcome.  Command names
//! are configurable so that wrappers or stand-ins can be used.
//!
//! Commands run with `LC_ALL=C` so their output can be parsed.

use std::ffi::OsStr;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Output, Stdio};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use print_bridge_core::{BridgeError, PrintJob, PrintResult, PrinterDescriptor, PrinterStatus};

use crate::application::backend::{BackendInfo, PrintBackend};
use crate::domain::{BackendStrategy, LocalBackendConfig};

const SPOOL_PREFIX: &str = "print-bridge-";
const SPOOL_SUFFIX: &str = ".txt";
const NO_DESTINATIONS: &str = "No destinations added";
const DEFAULT_DESTINATION_PREFIX: &str = "system default destination:";

/// [`PrintBackend`] backed by the host's `lp` / `lpstat` commands.
pub struct LocalBackend {
    config: LocalBackendConfig,
}

impl LocalBackend {
    pub fn new(config: LocalBackendConfig) -> Self {
        Self { config }
    }

    /// Directory spool files are created in.
    pub fn spool_dir(&self) -> PathBuf {
        self.config
            .spool_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    async fn run<I, S>(&self, program: &str, args: I) -> Result<Output, BridgeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Command::new(program)
            .args(args)
            .env("LC_ALL", "C")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| BridgeError::BackendUnavailable(format!("failed to run {program}: {e}")))
    }
}

#[async_trait]
impl PrintBackend for LocalBackend {
    fn describe(&self) -> BackendInfo {
        BackendInfo {
            strategy: BackendStrategy::Local,
            url: None,
        }
    }

    async fn list_printers(&self) -> Result<Vec<PrinterDescriptor>, BridgeError> {
        let (listing, default) = tokio::join!(
            self.run(&self.config.lpstat_command, ["-p"]),
            self.default_printer()
        );
        let output = listing?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if stdout.contains(NO_DESTINATIONS) || stderr.contains(NO_DESTINATIONS) {
            return Ok(Vec::new());
        }
        if !output.status.success() {
            return Err(BridgeError::BackendUnavailable(failure_text(
                &self.config.lpstat_command,
                &output,
            )));
        }

        let printers: Vec<PrinterDescriptor> = parse_lpstat_printers(&stdout)
            .into_iter()
            .map(|p| {
                let is_default = default.as_deref() == Some(p.name.as_str());
                p.with_default(is_default)
            })
            .collect();

        debug!("local backend listed {} printers", printers.len());
        Ok(printers)
    }

    async fn default_printer(&self) -> Option<String> {
        match self.run(&self.config.lpstat_command, ["-d"]).await {
            Ok(output) if output.status.success() => {
                parse_default_destination(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(output) => {
                warn!(
                    "could not query default printer: {}",
                    failure_text(&self.config.lpstat_command, &output)
                );
                None
            }
            Err(e) => {
                warn!("could not query default printer: {e}");
                None
            }
        }
    }

    async fn print_text(&self, job: &PrintJob) -> Result<PrintResult, BridgeError> {
        let label = job.printer_label();
        let spool_dir = self.spool_dir();

        let mut spool = tempfile::Builder::new()
            .prefix(SPOOL_PREFIX)
            .suffix(SPOOL_SUFFIX)
            .tempfile_in(&spool_dir)
            .map_err(|e| {
                BridgeError::BackendUnavailable(format!(
                    "cannot create spool file in {}: {e}",
                    spool_dir.display()
                ))
            })?;
        spool
            .write_all(job.content.as_bytes())
            .and_then(|()| spool.flush())
            .map_err(|e| BridgeError::BackendUnavailable(format!("cannot write spool file: {e}")))?;

        let mut args: Vec<&OsStr> = Vec::with_capacity(3);
        if let Some(printer) = job.printer.as_deref() {
            args.push(OsStr::new("-d"));
            args.push(OsStr::new(printer));
        }
        args.push(spool.path().as_os_str());

        let outcome = self.run(&self.config.lp_command, args).await;

        let spool_path = spool.path().to_path_buf();
        if let Err(e) = spool.close() {
            warn!("failed to remove spool file {}: {e}", spool_path.display());
        }

        let output = outcome?;
        if output.status.success() {
            debug!(
                "lp accepted job for {label}: {}",
                String::from_utf8_lossy(&output.stdout).trim()
            );
            Ok(PrintResult::succeeded(label, format!("Content sent to {label}")))
        } else {
            let message = failure_text(&self.config.lp_command, &output);
            warn!("lp rejected job for {label}: {message}");
            Ok(PrintResult::failed(label, message))
        }
    }
}

// ── Output parsing ────────────────────────────────────────────────────────────

/// Parses `lpstat -p` output.
///
/// Only lines starting with `printer ` describe a queue; indented
/// continuation lines (alerts, reasons) are ignored.
pub fn parse_lpstat_printers(output: &str) -> Vec<PrinterDescriptor> {
    output
        .lines()
        .filter_map(|line| line.strip_prefix("printer "))
        .filter_map(|rest| {
            let (name, tail) = rest.split_once(' ').unwrap_or((rest, ""));
            if name.is_empty() {
                return None;
            }
            let status = if tail.starts_with("is idle") {
                PrinterStatus::Idle
            } else {
                PrinterStatus::Busy
            };
            Some(PrinterDescriptor::new(name, status))
        })
        .collect()
}

/// Parses `lpstat -d` output; `None` when no default is set.
pub fn parse_default_destination(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        line.strip_prefix(DEFAULT_DESTINATION_PREFIX)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    })
}

/// Human-readable reason a command failed: its stderr, else its exit status.
fn failure_text(program: &str, output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("{program} exited with {}", output.status)
    } else {
        stderr.to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const LPSTAT_P: &str = "\
printer HP_LaserJet is idle.  enabled since Thu 15 Oct 2026 09:12:01 AM UTC
printer Canon_PIXMA now printing Canon_PIXMA-42.  enabled since Thu 15 Oct 2026 09:20:44 AM UTC
\tDocument is printing
printer Old_Dot_Matrix disabled since Wed 14 Oct 2026 17:03:10 PM UTC -
\treason unknown
";

    #[test]
    fn test_parse_lpstat_printers_reads_each_queue() {
        // Act
        let printers = parse_lpstat_printers(LPSTAT_P);

        // Assert
        assert_eq!(
            printers,
            vec![
                PrinterDescriptor::new("HP_LaserJet", PrinterStatus::Idle),
                PrinterDescriptor::new("Canon_PIXMA", PrinterStatus::Busy),
                PrinterDescriptor::new("Old_Dot_Matrix", PrinterStatus::Busy),
            ]
        );
    }

    #[test]
    fn test_parse_lpstat_printers_empty_output() {
        assert!(parse_lpstat_printers("").is_empty());
    }

    #[test]
    fn test_parse_default_destination() {
        assert_eq!(
            parse_default_destination("system default destination: HP_LaserJet\n").as_deref(),
            Some("HP_LaserJet")
        );
    }

    #[test]
    fn test_parse_default_destination_none_set() {
        assert_eq!(parse_default_destination("no system default destination\n"), None);
        assert_eq!(parse_default_destination(""), None);
    }

    #[test]
    fn test_describe_reports_local_without_url() {
        let backend = LocalBackend::new(LocalBackendConfig::default());
        assert_eq!(
            backend.describe(),
            BackendInfo {
                strategy: BackendStrategy::Local,
                url: None
            }
        );
    }

    #[test]
    fn test_spool_dir_defaults_to_os_temp_dir() {
        let backend = LocalBackend::new(LocalBackendConfig::default());
        assert_eq!(backend.spool_dir(), std::env::temp_dir());
    }

    #[cfg(unix)]
    mod commands {
        use super::*;
        use std::path::Path;

        fn backend(lp: &str, lpstat: &str, spool: &Path) -> LocalBackend {
            LocalBackend::new(LocalBackendConfig {
                lp_command: lp.to_string(),
                lpstat_command: lpstat.to_string(),
                spool_dir: Some(spool.to_path_buf()),
            })
        }

        fn spool_is_empty(dir: &Path) -> bool {
            std::fs::read_dir(dir).unwrap().next().is_none()
        }

        fn job(printer: Option<&str>) -> PrintJob {
            PrintJob::from_parts(printer.map(str::to_string), Some("hello".into())).unwrap()
        }

        #[tokio::test]
        async fn test_print_text_success_removes_spool_file() {
            // Arrange
            let dir = tempfile::tempdir().unwrap();
            let backend = backend("true", "true", dir.path());

            // Act
            let result = backend.print_text(&job(Some("LaserJet"))).await.unwrap();

            // Assert
            assert!(result.success);
            assert_eq!(result.printer, "LaserJet");
            assert_eq!(result.message, "Content sent to LaserJet");
            assert!(spool_is_empty(dir.path()));
        }

        #[tokio::test]
        async fn test_print_text_rejected_job_removes_spool_file() {
            let dir = tempfile::tempdir().unwrap();
            let backend = backend("false", "true", dir.path());

            let result = backend.print_text(&job(None)).await.unwrap();

            assert!(!result.success);
            assert_eq!(result.printer, "Default");
            assert!(result.message.contains("false exited with"));
            assert!(spool_is_empty(dir.path()));
        }

        #[tokio::test]
        async fn test_print_text_missing_command_is_backend_unavailable() {
            let dir = tempfile::tempdir().unwrap();
            let backend = backend("/nonexistent/print-bridge-lp", "true", dir.path());

            let err = backend.print_text(&job(None)).await.unwrap_err();

            assert!(matches!(err, BridgeError::BackendUnavailable(_)));
            assert!(spool_is_empty(dir.path()));
        }

        #[tokio::test]
        async fn test_print_text_unwritable_spool_dir_is_backend_unavailable() {
            let dir = tempfile::tempdir().unwrap();
            let missing = dir.path().join("missing");
            let backend = backend("true", "true", &missing);

            let err = backend.print_text(&job(None)).await.unwrap_err();

            assert!(matches!(err, BridgeError::BackendUnavailable(_)));
        }

        #[tokio::test]
        async fn test_list_printers_with_no_output_is_empty() {
            let dir = tempfile::tempdir().unwrap();
            let backend = backend("true", "true", dir.path());

            assert!(backend.list_printers().await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_list_printers_failing_lpstat_is_backend_unavailable() {
            let dir = tempfile::tempdir().unwrap();
            let backend = backend("true", "false", dir.path());

            let err = backend.list_printers().await.unwrap_err();

            assert!(matches!(err, BridgeError::BackendUnavailable(_)));
        }

        #[tokio::test]
        async fn test_default_printer_failure_is_none() {
            let dir = tempfile::tempdir().unwrap();
            let backend = backend("true", "false", dir.path());

            assert_eq!(backend.default_printer().await, None);
        }

        /// Writes an executable `lpstat` stand-in running `body` under `sh`.
        fn lpstat_stub(dir: &Path, body: &str) -> String {
            use std::os::unix::fs::PermissionsExt;

            let path = dir.join("lpstat");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

            // A child forked concurrently by another test may briefly hold the
            // write descriptor open; exec fails with ETXTBSY until it is gone.
            for _ in 0..100 {
                match std::process::Command::new(&path).arg("-d").output() {
                    Err(e) if e.raw_os_error() == Some(26) => {
                        std::thread::sleep(std::time::Duration::from_millis(10));
                    }
                    _ => break,
                }
            }
            path.to_string_lossy().into_owned()
        }

        #[tokio::test]
        async fn test_list_printers_flags_the_default_destination() {
            // Arrange
            let dir = tempfile::tempdir().unwrap();
            let lpstat = lpstat_stub(
                dir.path(),
                r#"case "$1" in
  -p)
    echo "printer A is idle.  enabled since Thu 15 Oct 2026 09:12:01 AM UTC"
    echo "printer B now printing B-7.  enabled since Thu 15 Oct 2026 09:20:44 AM UTC"
    ;;
  -d)
    echo "system default destination: B"
    ;;
esac"#,
            );
            let backend = backend("true", &lpstat, dir.path());

            // Act
            let printers = backend.list_printers().await.unwrap();

            // Assert
            assert_eq!(
                printers,
                vec![
                    PrinterDescriptor::new("A", PrinterStatus::Idle),
                    PrinterDescriptor::new("B", PrinterStatus::Busy).with_default(true),
                ]
            );
            assert_eq!(backend.default_printer().await.as_deref(), Some("B"));
        }

        #[tokio::test]
        async fn test_list_printers_no_destinations_is_empty_ok() {
            // Arrange: lpstat reports no queues on stderr and exits 1
            let dir = tempfile::tempdir().unwrap();
            let lpstat = lpstat_stub(
                dir.path(),
                r#"case "$1" in
  -p)
    echo "lpstat: No destinations added." >&2
    exit 1
    ;;
  -d)
    echo "no system default destination"
    ;;
esac"#,
            );
            let backend = backend("true", &lpstat, dir.path());

            // Act
            let printers = backend.list_printers().await;

            // Assert
            assert_eq!(printers, Ok(Vec::new()));
        }
    }
}
