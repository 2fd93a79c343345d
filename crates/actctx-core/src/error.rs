use std::path::PathBuf;

use crate::backend::BackendError;

#[derive(Debug, thiserror::Error)]
pub enum ActivationError {
    #[error("Activation context has not been initialized (during {operation})")]
    InvalidState { operation: &'static str },

    #[error("Invalid context descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Failed to create activation context from {}: {source}", .path.display())]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: BackendError,
    },

    #[error("Failed to activate context: {0}")]
    ActivateFailed(#[source] BackendError),

    #[error("Failed to deactivate context (cookie {cookie}): {source}")]
    DeactivateFailed {
        cookie: usize,
        #[source]
        source: BackendError,
    },

    #[error("Activation contexts are not supported on this platform")]
    Unsupported,
}

impl ActivationError {
    /// Underlying OS status code, when the failure came from the backend
    pub fn os_code(&self) -> Option<u32> {
        match self {
            Self::CreateFailed { source, .. }
            | Self::ActivateFailed(source)
            | Self::DeactivateFailed { source, .. } => Some(source.code),
            _ => None,
        }
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }
}
