use thiserror::Error;

use crate::logging::LoggingError;

/// Unified result type for the widget slots crate.
pub type Result<T> = std::result::Result<T, SlotError>;

/// Failure reported by the widget runtime while producing markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RenderError {
    message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors surfaced to the host by the reconciler and runtime.
#[derive(Debug, Error)]
pub enum SlotError {
    #[error("widget `{widget}` failed to render slot `{slot}`: {source}")]
    Render {
        slot: String,
        widget: String,
        #[source]
        source: RenderError,
    },
    #[error("slot `{0}` is not mounted")]
    SlotNotMounted(String),
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Logging(#[from] LoggingError),
}
