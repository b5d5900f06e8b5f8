use thiserror::Error;

/// Errors surfaced by the editor to its host.
///
/// Conditions with a safe default (undo at the start of history, paste with
/// an empty clipboard, a missing workspace during a style change) are
/// handled in place and never reach this type.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("invalid document json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("document has no workspace object")]
    MissingWorkspace,

    #[error("unknown object handle {0}")]
    UnknownObject(u64),

    #[error("history batch already open")]
    BatchReentered,

    #[error("failed to load image {src}: {reason}")]
    ImageLoad { src: String, reason: String },

    #[error("image load for {0} was cancelled")]
    ImageLoadCancelled(String),

    #[error("drawing mode is not enabled")]
    DrawingDisabled,

    #[error("export failed: {0}")]
    Export(String),

    #[error("invalid config: {0}")]
    Config(String),
}

impl From<image::ImageError> for EditorError {
    fn from(err: image::ImageError) -> Self {
        EditorError::Export(err.to_string())
    }
}

pub type Result<T, E = EditorError> = std::result::Result<T, E>;
