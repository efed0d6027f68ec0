//! Player backend errors.

/// Errors that can occur while driving a player.
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    #[error("Player is not ready")]
    NotReady,

    #[error("Failed to launch '{program}': {source}. Is it installed and on PATH?")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Timed out connecting to the player IPC socket")]
    ConnectTimeout,

    #[error("Player exited unexpectedly")]
    Exited,

    #[error("Player rejected '{command}': {message}")]
    Rejected { command: String, message: String },

    #[error("No response from player for '{command}'")]
    NoResponse { command: String },

    #[error("Player IPC error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed player message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("The mpv backend is only supported on Unix platforms")]
    UnsupportedPlatform,
}
