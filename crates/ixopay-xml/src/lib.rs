//! IxoPay XML deserialization.
//!
//! This crate is the deserialization boundary of an IxoPay gateway client. It turns
//! the XML documents the gateway produces into the typed values of `ixopay-model`
//! and validates their shape on the way.
//!
//! # Key components
//!
//! - [`parse_result`] for synchronous transaction results
//!   (`{http://www.ixolit.com/IxoPay/V2/Result}result`)
//! - [`parse_callback`] for asynchronous postbacks
//!   (`{http://www.ixolit.com/IxoPay/V2/Postback}postback`)
//! - [`XmlResultParser`] when namespaces or the legacy `exception` handling need to
//!   be configured through [`ParserConfig`]
//!
//! The crate performs no I/O: input is an already-retrieved document, output is a
//! value or an [`XmlError`].
//!
//! ```
//! let xml = r#"<result xmlns="http://www.ixolit.com/IxoPay/V2/Result">
//!     <success>true</success>
//!     <returnType>FINISHED</returnType>
//! </result>"#;
//!
//! let result = ixopay_xml::parse_result(xml)?;
//! assert!(result.success);
//! # Ok::<(), ixopay_xml::XmlError>(())
//! ```

pub mod config;
pub mod deserialize;
pub mod error;

pub use config::{POSTBACK_NAMESPACE, ParserConfig, RESULT_NAMESPACE};
pub use deserialize::{XmlResultParser, parse_callback, parse_result};
pub use error::{XmlError, XmlResult};
