//! Agent error types

use thiserror::Error;

/// Errors that can occur while running the chatbot
#[derive(Error, Debug)]
pub enum AgentError {
    /// A required environment value is absent
    #[error("Missing {0}. Add it to your .env file.")]
    MissingConfig(String),

    /// A configuration value is present but unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The turn executor failed while producing a pass
    #[error("Executor error: {0}")]
    Executor(String),

    /// Transport failure talking to a remote service
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A remote service answered with a non-success status
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body as returned by the service
        body: String,
    },

    /// Waiting for an external authorization failed
    #[error("Authorization failed: {0}")]
    Authorization(String),

    /// IO error (console)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AgentError {
    /// Create an executor error
    pub fn executor(msg: impl Into<String>) -> Self {
        AgentError::Executor(msg.into())
    }

    /// Create an authorization error
    pub fn authorization(msg: impl Into<String>) -> Self {
        AgentError::Authorization(msg.into())
    }

    /// Whether this error must stop the process before the session starts
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AgentError::MissingConfig(_) | AgentError::InvalidConfig(_)
        )
    }
}

/// Result type alias for agent operations
pub type AgentResult<T> = Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AgentError::MissingConfig("ARCADE_USER_ID".into());
        assert_eq!(
            err.to_string(),
            "Missing ARCADE_USER_ID. Add it to your .env file."
        );

        let err = AgentError::Api {
            status: 401,
            body: "unauthorized".into(),
        };
        assert_eq!(err.to_string(), "API error (401): unauthorized");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stdin closed");
        let agent_err: AgentError = io_err.into();
        assert!(matches!(agent_err, AgentError::Io(_)));
        assert!(!agent_err.is_fatal());
    }

    #[test]
    fn test_config_errors_are_fatal() {
        assert!(AgentError::MissingConfig("OPENAI_MODEL".into()).is_fatal());
        assert!(AgentError::InvalidConfig("bad".into()).is_fatal());
        assert!(!AgentError::executor("stream broke").is_fatal());
    }
}
