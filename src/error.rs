//! Error types.
//!
//! Client errors come from the REST facade, search errors from the
//! paginated aggregator, and application errors are what command
//! handlers return to `main`.

use thiserror::Error;

/// Errors raised by the Flavortown and Hackatime HTTP clients.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid API key or unauthorized access.")]
    Unauthorized,

    #[error("{0} not found.")]
    NotFound(String),

    #[error("Server error ({0}). Try again later.")]
    Server(u16),

    #[error("Request failed with HTTP status {0}")]
    Http(u16),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Cannot connect to {0}")]
    Connect(String),

    #[error("Failed to send request: {0}")]
    Transport(String),

    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Map a non-success HTTP status to a client error.
    ///
    /// `what` names the resource for 404 messages (e.g. "User with ID 7").
    pub fn from_status(status: u16, what: &str) -> Self {
        match status {
            401 => ClientError::Unauthorized,
            404 => ClientError::NotFound(what.to_string()),
            500..=599 => ClientError::Server(status),
            _ => ClientError::Http(status),
        }
    }
}

/// Errors raised by the paginated search aggregator.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search query must not be empty")]
    InvalidQuery,

    /// The first page could not be fetched; there is no partial result.
    #[error("Search failed: {0}")]
    FirstPage(#[source] ClientError),
}

/// Errors surfaced by command handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required setting is absent from the configuration store.
    #[error("{message}")]
    MissingSetting { key: String, message: String },

    #[error(transparent)]
    Fetch(#[from] ClientError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("{0}")]
    Input(String),

    #[error("Failed to access local data: {0}")]
    Store(String),
}

impl AppError {
    pub fn missing(key: &str, message: impl Into<String>) -> Self {
        AppError::MissingSetting {
            key: key.to_string(),
            message: message.into(),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        AppError::Input(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ClientError::from_status(401, "User"),
            ClientError::Unauthorized
        ));
        assert!(matches!(
            ClientError::from_status(404, "User with ID 3"),
            ClientError::NotFound(ref what) if what == "User with ID 3"
        ));
        assert!(matches!(
            ClientError::from_status(503, "User"),
            ClientError::Server(503)
        ));
        assert!(matches!(
            ClientError::from_status(422, "User"),
            ClientError::Http(422)
        ));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ClientError::NotFound("Project 9".to_string()).to_string(),
            "Project 9 not found."
        );
        let err = AppError::missing("api_key", "Not logged in.");
        assert_eq!(err.to_string(), "Not logged in.");
        let err: AppError = SearchError::InvalidQuery.into();
        assert_eq!(err.to_string(), "Search query must not be empty");
    }
}
