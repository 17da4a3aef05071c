//! Error types for the cairn boot orchestrator.
//!
//! Errors are grouped the way the boot stages fail:
//! - resource resolution: [`CairnError::NetworkUnavailable`], [`CairnError::NotFound`],
//!   [`CairnError::Http`], [`CairnError::Transport`]
//! - filesystem: [`CairnError::Storage`], [`CairnError::Io`]
//! - process control: [`CairnError::Engine`]
//! - pipeline: [`CairnError::Step`]

use thiserror::Error;

/// Result alias used across all cairn crates.
pub type CairnResult<T> = Result<T, CairnError>;

#[derive(Debug, Error)]
pub enum CairnError {
    /// A remote location was requested while networking is disabled.
    #[error("networking not available to load resource")]
    NetworkUnavailable,

    /// No source could resolve the location.
    #[error("failed to find resource: {0}")]
    NotFound(String),

    /// Remote fetch answered with a non-success status.
    #[error("non-success http response from {url}: {status}")]
    Http { url: String, status: u16 },

    /// Connection or protocol failure while fetching a remote resource.
    #[error("transport error: {0}")]
    Transport(String),

    /// Filesystem operation failed (carries the path in the message).
    #[error("storage error: {0}")]
    Storage(String),

    /// Container engine launch, signal or wait failure.
    #[error("engine error: {0}")]
    Engine(String),

    /// Opaque failure reported by a pipeline step or external collaborator.
    #[error("step failed: {0}")]
    Step(String),

    /// Malformed configuration document.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CairnError {
    /// True for errors that mean "nothing there", as opposed to a failure
    /// reading something that exists.
    pub fn is_not_found(&self) -> bool {
        match self {
            CairnError::NotFound(_) => true,
            CairnError::Http { status, .. } => *status == 404,
            CairnError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_context() {
        let err = CairnError::Http {
            url: "http://example.com/index.yml".into(),
            status: 503,
        };
        assert_eq!(
            err.to_string(),
            "non-success http response from http://example.com/index.yml: 503"
        );

        let err = CairnError::Storage("failed to read /state/foo: denied".into());
        assert!(err.to_string().contains("/state/foo"));
    }

    #[test]
    fn test_is_not_found() {
        assert!(CairnError::NotFound("x".into()).is_not_found());
        assert!(
            CairnError::Http {
                url: "u".into(),
                status: 404
            }
            .is_not_found()
        );
        assert!(
            CairnError::Io(std::io::Error::from(std::io::ErrorKind::NotFound)).is_not_found()
        );
        assert!(!CairnError::NetworkUnavailable.is_not_found());
        assert!(
            !CairnError::Http {
                url: "u".into(),
                status: 500
            }
            .is_not_found()
        );
    }
}
