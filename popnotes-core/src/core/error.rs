//! Error types for the Popnotes core library.

use thiserror::Error;

/// All errors that can occur within the Popnotes core library.
///
/// Every variant is contained at the boundary where it occurs: callers log it
/// or show [`user_message`](Self::user_message) inline, and carry on.
#[derive(Debug, Error)]
pub enum PopnotesError {
    /// The note database could not be created or opened.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A read against an open store failed.
    #[error("Query failed: {0}")]
    QueryFailed(#[source] rusqlite::Error),

    /// A write against an open store failed.
    #[error("Write failed: {0}")]
    WriteFailed(#[source] rusqlite::Error),

    /// The host could not allocate the auxiliary window.
    #[error("Window creation failed: {0}")]
    WindowCreationFailed(String),

    /// The host could not focus or destroy an existing window.
    #[error("Window operation failed: {0}")]
    WindowUnavailable(String),

    /// A named command could not be carried across the command bridge.
    #[error("Command '{command}' failed: {reason}")]
    IpcInvocationFailed { command: String, reason: String },

    /// User input was rejected before it reached the store.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

/// Convenience alias that pins the error type to [`PopnotesError`].
pub type Result<T> = std::result::Result<T, PopnotesError>;

impl PopnotesError {
    /// Returns a short, human-readable message suitable for an inline,
    /// dismissable notice next to the action that failed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::StoreUnavailable(_) => "Notes are unavailable right now".to_string(),
            Self::QueryFailed(_) => "Failed to fetch notes".to_string(),
            Self::WriteFailed(e) => format!("Failed to save: {e}"),
            Self::WindowCreationFailed(_) => "Could not open the notes popup".to_string(),
            Self::WindowUnavailable(_) => "The notes popup is not responding".to_string(),
            Self::IpcInvocationFailed { command, .. } => format!("Command {command} failed"),
            Self::ValidationFailed(msg) => msg.clone(),
        }
    }
}
