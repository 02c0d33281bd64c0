use std::path::PathBuf;

use tracing::error;

/// Failures reported by an [`AudioBackend`](crate::AudioBackend).
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("failed to initialize audio backend: {0}")]
    InitFailed(String),

    #[error("failed to load '{0}': {1}")]
    LoadFailed(PathBuf, String),

    #[error("malformed bank '{0}': {1}")]
    BankFormat(PathBuf, String),

    #[error("audio playback failed: {0}")]
    PlaybackFailed(String),

    #[error("invalid or released handle")]
    InvalidHandle,

    #[error("parameter '{0}' not found")]
    ParameterNotFound(String),

    #[error("instance limit of {0} reached")]
    InstanceLimit(usize),
}

/// Errors returned by the audio facade.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("no event registered under '{0}'")]
    NotFound(String),

    #[error("an event named '{0}' already exists")]
    AlreadyExists(String),

    #[error("no loaded bank contains event '{0}'")]
    EventDescriptionNotFound(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Log a failed backend call and lift it into an [`AudioError`].
pub(crate) fn check<T>(operation: &str, result: Result<T, BackendError>) -> Result<T, AudioError> {
    result.map_err(|e| {
        error!("audio backend error during {operation}: {e}");
        AudioError::Backend(e)
    })
}
