/// Result alias used across the crate.
pub type FramepaceResult<T> = Result<T, FramepaceError>;

/// Top-level error type.
///
/// Per-tick rendering never surfaces these to the operator; they reach callers of the
/// configuration, snapshot and CLI entry points.
#[derive(thiserror::Error, Debug)]
pub enum FramepaceError {
    /// Input rejected before any work started.
    #[error("validation error: {0}")]
    Validation(String),

    /// Rasterization or surface problem.
    #[error("render error: {0}")]
    Render(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("config error: {0}")]
    Config(String),

    /// Filesystem failure while reading config or writing snapshots.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else, with context preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FramepaceError {
    /// Build a [`FramepaceError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FramepaceError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`FramepaceError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
