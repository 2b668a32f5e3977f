//! Generation error types.

use tecton_mesh::CombineError;

/// Errors that abort a generation run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The element factory has no template geometry to instantiate.
    #[error("element factory has no template geometry")]
    MissingTemplate,

    /// The post-pass mesh combine failed.
    #[error("mesh combine failed: {0}")]
    Combine(#[from] CombineError),
}
