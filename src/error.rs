//! Error types.
//!
//! Two families live here and they never mix:
//!
//! - [`ServiceError`] is what a route operation can fail with. Every variant
//!   maps to exactly one HTTP status, so handlers return
//!   `Result<_, ServiceError>` and the response layer does the rest.
//! - [`Error`] covers infrastructure failures: resolving the bind address,
//!   binding the port, building a backend client.

use std::net::AddrParseError;

use thiserror::Error;

use crate::status::Status;

/// Failure of a single service operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The requested key is not in the store.
    #[error("key not found: {0}")]
    NotFound(String),

    /// The request body or a path segment failed validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The external counter store could not be reached in time.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl ServiceError {
    pub fn status(&self) -> Status {
        match self {
            Self::NotFound(_) => Status::NotFound,
            Self::Validation(_) => Status::BadRequest,
            Self::BackendUnavailable(_) => Status::ServiceUnavailable,
        }
    }
}

/// Infrastructure error returned by startup and the server loop.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid bind address `{addr}`: {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    #[error("counter backend: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_service_error_has_its_own_status() {
        assert_eq!(ServiceError::NotFound("a".into()).status(), Status::NotFound);
        assert_eq!(ServiceError::Validation("b".into()).status(), Status::BadRequest);
        assert_eq!(
            ServiceError::BackendUnavailable("c".into()).status(),
            Status::ServiceUnavailable
        );
    }

    #[test]
    fn not_found_message_names_the_key() {
        assert_eq!(ServiceError::NotFound("k9".into()).to_string(), "key not found: k9");
    }
}
