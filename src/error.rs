//! Error types and the per-unit outcome used by every pipeline stage.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while talking to the portal or writing exports.
#[derive(Debug, Error)]
pub enum PortalError {
    /// The portal answered with a non-200 status.
    #[error("request failed with status code: {status}")]
    Http { status: u16 },

    /// The request never produced a response.
    #[error("failed to send request: {0}")]
    Transport(#[from] wreq::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl PortalError {
    /// Returns the HTTP status code if this is a status failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            PortalError::Http { status } => Some(*status),
            _ => None,
        }
    }
}

/// Why a single unit of work was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("unexpected status code: {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("response is not JSON: {0}")]
    NotJson(String),

    #[error("JSON payload is not an object")]
    NotAnObject,

    #[error("province select element not found")]
    SelectNotFound,

    #[error("no table in response")]
    TableNotFound,

    #[error("table has no non-empty cells")]
    EmptyTable,

    #[error("could not write output: {0}")]
    Write(String),
}

/// Result of one unit of work: done, skipped (log and continue), or fatal.
#[derive(Debug)]
pub enum Outcome<T> {
    Done(T),
    Skipped(SkipReason),
    Fatal(PortalError),
}

impl<T> Outcome<T> {
    /// Returns the skip reason, if any.
    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            Outcome::Skipped(reason) => Some(reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_carries_status() {
        let err = PortalError::Http { status: 503 };
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_io_error_display() {
        let err = PortalError::Io {
            path: PathBuf::from("out/apbd.csv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("out/apbd.csv"));
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::Status(404).to_string(), "unexpected status code: 404");
        assert_eq!(SkipReason::TableNotFound.to_string(), "no table in response");
    }

    #[test]
    fn test_skip_reason_only_for_skips() {
        let skipped: Outcome<u32> = Outcome::Skipped(SkipReason::EmptyTable);
        assert_eq!(skipped.skip_reason(), Some(&SkipReason::EmptyTable));

        let done: Outcome<u32> = Outcome::Done(2);
        assert_eq!(done.skip_reason(), None);

        let fatal: Outcome<u32> = Outcome::Fatal(PortalError::Http { status: 500 });
        assert_eq!(fatal.skip_reason(), None);
    }
}
