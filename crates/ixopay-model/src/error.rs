//! Error types for the IxoPay model crate.

/// Errors raised when converting wire strings into model values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// The string is not one of the known `returnType` values.
    #[error("unknown return type: {0}")]
    UnknownReturnType(String),
}
