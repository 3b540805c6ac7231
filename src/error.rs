//! Error types for the operator command pipeline

use thiserror::Error;

/// Errors surfaced by the locate, resolve and execute stages
#[derive(Debug, Error)]
pub enum OperatorError {
    /// The cluster client could not be built or the API server could not be reached
    #[error("connection error: {0}")]
    Connection(String),

    /// A framework version object could not be re-decoded into its typed shape
    #[error("failed to decode framework version '{name}': {source}")]
    Decode {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// A lookup call itself failed (as opposed to returning zero items)
    #[error("lookup of {resource} failed: {message}")]
    NotFound { resource: String, message: String },

    /// The remote exec session failed or the remote command exited with an error
    #[error("exec stream error: {0}")]
    Stream(String),

    /// Configuration could not be assembled
    #[error("configuration error: {0}")]
    Config(String),
}

impl OperatorError {
    pub fn connection(message: impl std::fmt::Display) -> Self {
        Self::Connection(message.to_string())
    }

    pub fn not_found(resource: &str, err: impl std::fmt::Display) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            message: err.to_string(),
        }
    }

    pub fn stream(message: impl std::fmt::Display) -> Self {
        Self::Stream(message.to_string())
    }
}

impl From<config::ConfigError> for OperatorError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

pub type OperatorResult<T> = Result<T, OperatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_display() {
        let err = OperatorError::connection("kubeconfig missing");
        assert_eq!(err.to_string(), "connection error: kubeconfig missing");
    }

    #[test]
    fn test_not_found_display() {
        let err = OperatorError::not_found("pods", "forbidden");
        assert_eq!(err.to_string(), "lookup of pods failed: forbidden");
    }

    #[test]
    fn test_decode_keeps_source() {
        let source = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let err = OperatorError::Decode {
            name: "zk-1.0".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("failed to decode framework version 'zk-1.0'"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
