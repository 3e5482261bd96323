//! Print results.

use serde::{Deserialize, Serialize};

/// Outcome of a print submission, as returned to the caller.
///
/// `printer` echoes the requested queue name, or `"Default"` when none was
/// given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintResult {
    pub success: bool,
    pub message: String,
    pub printer: String,
}

impl PrintResult {
    pub fn succeeded(printer: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            printer: printer.into(),
        }
    }

    pub fn failed(printer: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            printer: printer.into(),
        }
    }
}
