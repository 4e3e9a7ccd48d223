// Error taxonomy for the resampling engine.

/// Convenience result type used across the engine.
pub type ResizeResult<T> = Result<T, ResizeError>;

/// Everything that can make a resize call fail.
///
/// All failures are deterministic given the same inputs, so none of them
/// are retried internally.
#[derive(thiserror::Error, Debug)]
pub enum ResizeError {
    /// A computed source index or buffer extent does not fit the backing
    /// storage. Indicates a malformed buffer or a caller defect.
    #[error("invalid bounds: offset {offset} exceeds pix length {len}")]
    InvalidBounds { offset: i64, len: usize },

    /// The pixel layout cannot be processed by any pipeline.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Blur must be finite and strictly positive.
    #[error("invalid blur factor {0}")]
    InvalidBlur(f64),

    /// The worker pool could not be started.
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ResizeError {
    pub(crate) fn bounds(offset: i64, len: usize) -> Self {
        Self::InvalidBounds { offset, len }
    }

    pub(crate) fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }
}
