//! Error taxonomy shared by the real-time channel and the HTTP façade.
//!
//! Every request handled by the bridge ends either in a result or in exactly
//! one of these four conditions.  Handlers never let them escape: the router
//! turns them into `{"type":"error"}` notifications and the HTTP layer turns
//! them into error envelopes with a matching status code.

use thiserror::Error;

/// A failure while handling one inbound request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The inbound payload was not valid JSON, or a known message had
    /// ill-typed fields.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// The payload parsed, but its `type` tag names no known operation.
    ///
    /// Carries the offending tag (empty when the tag was missing).
    #[error("unknown message type: {0:?}")]
    UnknownMessageType(String),

    /// A required field was missing or empty.
    ///
    /// This is a client error: the backend is never contacted.
    #[error("validation error: {0}")]
    Validation(String),

    /// The print backend could not be reached or the OS command failed.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl BridgeError {
    /// Returns `true` when the caller sent a bad request, as opposed to the
    /// bridge or its backend failing.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidMessage(_) | Self::UnknownMessageType(_) | Self::Validation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_classified() {
        assert!(BridgeError::InvalidMessage("x".into()).is_client_error());
        assert!(BridgeError::UnknownMessageType("x".into()).is_client_error());
        assert!(BridgeError::Validation("x".into()).is_client_error());
    }

    #[test]
    fn test_backend_unavailable_is_not_a_client_error() {
        assert!(!BridgeError::BackendUnavailable("down".into()).is_client_error());
    }

    #[test]
    fn test_display_includes_detail() {
        let err = BridgeError::BackendUnavailable("connection refused".into());
        assert_eq!(err.to_string(), "backend unavailable: connection refused");
    }
}
