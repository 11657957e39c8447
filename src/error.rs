/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Everything that can go wrong between reading a mesh and writing an image.
///
/// Only `DegenerateGeometry` is recoverable: the pipeline skips the offending
/// face and keeps going. Every other variant aborts the render.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OBJ parse error: {0}")]
    Obj(#[from] obj::ObjError),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Worker error: {0}")]
    Worker(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl From<ron::error::SpannedError> for RenderError {
    fn from(e: ron::error::SpannedError) -> Self {
        return RenderError::InvalidConfig(e.to_string());
    }
}

impl RenderError {
    /// True for errors the pipeline skips past instead of aborting on.
    pub fn is_recoverable(&self) -> bool {
        return matches!(self, RenderError::DegenerateGeometry(_));
    }
}
