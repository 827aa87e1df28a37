//! Error types for IxoPay XML deserialization.
//!
//! Two kinds are produced by the parser itself: [`XmlError::Structure`] when the
//! document does not have the expected shape, and [`XmlError::InvalidValue`] when a
//! known element carries text outside its allowed set. The remaining variants wrap
//! lower-level failures (malformed XML, undecodable text).

/// Errors that can occur while reading an IxoPay XML document.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// The document is not well-formed XML.
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    /// An attribute could not be read.
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// Text, a name or an entity reference could not be decoded.
    #[error("failed to decode XML text: {0}")]
    Encoding(String),

    /// A required element or attribute is missing, or an element appears where
    /// it is not allowed.
    #[error("{0}")]
    Structure(String),

    /// A known element carries a value outside its allowed set.
    #[error("Value \"{value}\" is not allowed for \"{field}\"")]
    InvalidValue {
        /// Element whose content was rejected.
        field: &'static str,
        /// The rejected text.
        value: String,
    },
}

impl XmlError {
    pub(crate) fn structure(msg: impl Into<String>) -> Self {
        Self::Structure(msg.into())
    }

    /// Whether the document has the wrong shape.
    #[must_use]
    pub fn is_structure(&self) -> bool {
        matches!(self, Self::Structure(_))
    }

    /// Whether an element carried a disallowed value.
    #[must_use]
    pub fn is_invalid_value(&self) -> bool {
        matches!(self, Self::InvalidValue { .. })
    }
}

/// Convenience result type for XML parsing.
pub type XmlResult<T> = Result<T, XmlError>;
