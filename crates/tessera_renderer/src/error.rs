//! Error types for scene setup and rendering.

use thiserror::Error;

/// Errors that abort a render before or while workers run.
///
/// Degenerate scatter directions are not errors: they are absorbed
/// rays and simply contribute black.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Unable to determine the number of CPU cores: {0}")]
    ParallelismUnavailable(#[source] std::io::Error),

    #[error("Unable to allocate a {width}x{height} frame buffer")]
    FrameBufferAlloc { width: u32, height: u32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Material id {0} is not in the scene's material table")]
    UnknownMaterial(usize),

    #[error("Failed to spawn render worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    #[error("Render worker for tile {tile} panicked")]
    WorkerPanicked { tile: usize },
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

impl RenderError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
