//! Parser configuration.
//!
//! Defaults match the IxoPay V2 wire format. Every field can be overridden from the
//! environment, which is mostly useful when pointing a client at a gateway that
//! speaks a newer namespace revision.

/// Namespace of synchronous result documents.
pub const RESULT_NAMESPACE: &str = "http://www.ixolit.com/IxoPay/V2/Result";

/// Namespace of postback documents.
pub const POSTBACK_NAMESPACE: &str = "http://www.ixolit.com/IxoPay/V2/Postback";

/// Configuration for [`XmlResultParser`](crate::XmlResultParser).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserConfig {
    /// Namespace the `result` root element must be bound to.
    pub result_namespace: String,
    /// Namespace the `postback` root element must be bound to.
    pub postback_namespace: String,
    /// Skip the legacy `exception` element in result documents instead of
    /// rejecting it.
    pub allow_legacy_exception: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            result_namespace: RESULT_NAMESPACE.to_owned(),
            postback_namespace: POSTBACK_NAMESPACE.to_owned(),
            allow_legacy_exception: true,
        }
    }
}

impl ParserConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `IXOPAY_RESULT_NAMESPACE` | [`RESULT_NAMESPACE`] |
    /// | `IXOPAY_POSTBACK_NAMESPACE` | [`POSTBACK_NAMESPACE`] |
    /// | `IXOPAY_ALLOW_LEGACY_EXCEPTION` | `true` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("IXOPAY_RESULT_NAMESPACE") {
            config.result_namespace = v;
        }
        if let Some(v) = lookup("IXOPAY_POSTBACK_NAMESPACE") {
            config.postback_namespace = v;
        }
        if let Some(v) = lookup("IXOPAY_ALLOW_LEGACY_EXCEPTION") {
            config.allow_legacy_exception = v == "1" || v.eq_ignore_ascii_case("true");
        }

        config
    }
}
