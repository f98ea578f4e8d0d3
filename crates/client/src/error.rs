//! Error types for CLI adapter operations.

/// Errors produced while invoking the client or notifier binaries.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no URL in output of `{command}`")]
    NoUrl { command: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
