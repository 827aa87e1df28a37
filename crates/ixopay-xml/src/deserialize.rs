//! IxoPay XML deserialization: result and postback documents into typed values.
//!
//! Documents are read with a streaming, namespace-aware reader. The root element is
//! located by namespace and local name anywhere in the document (the first match
//! wins); its children are then dispatched on their local name only, so nested
//! elements may or may not carry a prefix.
//!
//! Text content follows DOM `nodeValue` semantics: all descendant text and CDATA
//! concatenated, entities resolved, whitespace preserved and line endings
//! normalized to `\n`. Element nesting is capped at [`MAX_DEPTH`].

use std::str::FromStr;

use ixopay_model::{
    CallbackResult, CreditcardData, GatewayError, ReturnData, ReturnType, TransactionResult,
};
use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};

use crate::config::ParserConfig;
use crate::error::{XmlError, XmlResult};

type Reader<'i> = NsReader<&'i [u8]>;

/// Parses IxoPay result and postback documents.
///
/// The parser holds only its configuration; every call builds a fresh reader over
/// the borrowed input, so one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct XmlResultParser {
    config: ParserConfig,
}

impl XmlResultParser {
    /// Create a parser with the given configuration.
    #[must_use]
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// The configuration this parser was built with.
    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a synchronous transaction result document.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::Structure`] if the `result` root element is missing or an
    /// element appears where it is not allowed, [`XmlError::InvalidValue`] for an
    /// unknown `returnType`, and the low-level variants for malformed XML.
    pub fn parse_result(&self, xml: &str) -> XmlResult<TransactionResult> {
        self.parse_result_bytes(xml.as_bytes())
    }

    /// Same as [`parse_result`](Self::parse_result) for UTF-8 encoded bytes.
    pub fn parse_result_bytes(&self, xml: &[u8]) -> XmlResult<TransactionResult> {
        let mut reader = new_reader(xml);
        let open = find_root(&mut reader, &self.config.result_namespace, "result")?;
        let result = self.read_result(&mut reader)?;
        drain(&mut reader, open)?;
        Ok(result)
    }

    /// Parse a postback document.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::Structure`] if the `postback` root element is missing or
    /// an element appears where it is not allowed, and the low-level variants for
    /// malformed XML.
    pub fn parse_callback(&self, xml: &str) -> XmlResult<CallbackResult> {
        self.parse_callback_bytes(xml.as_bytes())
    }

    /// Same as [`parse_callback`](Self::parse_callback) for UTF-8 encoded bytes.
    pub fn parse_callback_bytes(&self, xml: &[u8]) -> XmlResult<CallbackResult> {
        let mut reader = new_reader(xml);
        let open = find_root(&mut reader, &self.config.postback_namespace, "postback")?;
        let callback = read_callback(&mut reader)?;
        drain(&mut reader, open)?;
        Ok(callback)
    }

    fn read_result(&self, reader: &mut Reader<'_>) -> XmlResult<TransactionResult> {
        let mut result = TransactionResult::default();

        while let Some(child) = next_child(reader, "result")? {
            let local = child.local_name();
            match utf8(local.as_ref())? {
                "success" => result.success = is_truthy(&read_text_content(reader)?),
                "referenceId" => result.reference_id = Some(read_text_content(reader)?),
                "registrationId" => result.registration_id = Some(read_text_content(reader)?),
                "redirectUrl" => result.redirect_url = Some(read_text_content(reader)?),
                "htmlContent" => result.html_content = Some(read_text_content(reader)?),
                "paymentDescriptor" => {
                    result.payment_descriptor = Some(read_text_content(reader)?);
                }
                "returnType" => result.return_type = Some(parse_return_type(reader)?),
                "returnData" => result.return_data = parse_return_data(reader, &child)?,
                "errors" => result.errors = parse_errors(reader)?,
                "extraData" => {
                    let (key, value) = parse_extra_data(reader, &child)?;
                    result.extra_data.push(key, value);
                }
                "exception" if self.config.allow_legacy_exception => {
                    tracing::debug!("skipping legacy exception element in result document");
                    skip_element(reader)?;
                }
                _ => return Err(unexpected_element(&child)),
            }
        }

        Ok(result)
    }
}

/// Parse a result document with the default configuration.
///
/// # Errors
///
/// See [`XmlResultParser::parse_result`].
pub fn parse_result(xml: &str) -> XmlResult<TransactionResult> {
    XmlResultParser::default().parse_result(xml)
}

/// Parse a postback document with the default configuration.
///
/// # Errors
///
/// See [`XmlResultParser::parse_callback`].
pub fn parse_callback(xml: &str) -> XmlResult<CallbackResult> {
    XmlResultParser::default().parse_callback(xml)
}

fn read_callback(reader: &mut Reader<'_>) -> XmlResult<CallbackResult> {
    let mut callback = CallbackResult::default();

    while let Some(child) = next_child(reader, "postback")? {
        let local = child.local_name();
        match utf8(local.as_ref())? {
            "result" => callback.result = Some(read_text_content(reader)?),
            "referenceId" => callback.reference_id = Some(read_text_content(reader)?),
            "transactionId" => callback.transaction_id = Some(read_text_content(reader)?),
            "errors" => callback.errors = parse_errors(reader)?,
            "extraData" => {
                let (key, value) = parse_extra_data(reader, &child)?;
                callback.extra_data.push(key, value);
            }
            _ => return Err(unexpected_element(&child)),
        }
    }

    Ok(callback)
}

// ---------------------------------------------------------------------------
// Sub-structures
// ---------------------------------------------------------------------------

/// Trait for types read from the children of an already-opened element.
///
/// The reader is positioned just after the opening tag; implementations consume
/// everything up to and including the matching end tag.
trait XmlDeserialize: Sized {
    fn deserialize_xml(reader: &mut Reader<'_>) -> XmlResult<Self>;
}

impl XmlDeserialize for GatewayError {
    fn deserialize_xml(reader: &mut Reader<'_>) -> XmlResult<Self> {
        let mut message = None;
        let mut code = None;
        let mut adapter_message = None;
        let mut adapter_code = None;

        while let Some(child) = next_child(reader, "error")? {
            let local = child.local_name();
            match utf8(local.as_ref())? {
                "message" => message = Some(read_text_content(reader)?),
                "code" => code = Some(read_text_content(reader)?),
                "adapterMessage" => adapter_message = Some(read_text_content(reader)?),
                "adapterCode" => adapter_code = Some(read_text_content(reader)?),
                _ => skip_element(reader)?,
            }
        }

        Ok(GatewayError::new(
            message,
            code,
            adapter_message,
            adapter_code,
        ))
    }
}

impl XmlDeserialize for CreditcardData {
    fn deserialize_xml(reader: &mut Reader<'_>) -> XmlResult<Self> {
        let mut cc = CreditcardData::default();

        while let Some(child) = next_child(reader, "creditcardData")? {
            let local = child.local_name();
            match utf8(local.as_ref())? {
                "type" => cc.card_type = Some(read_text_content(reader)?),
                "firstName" => cc.first_name = Some(read_text_content(reader)?),
                "lastName" => cc.last_name = Some(read_text_content(reader)?),
                "country" => cc.country = Some(read_text_content(reader)?),
                "cardHolder" => cc.card_holder = Some(read_text_content(reader)?),
                "firstSixDigits" => cc.first_six_digits = Some(read_text_content(reader)?),
                "lastFourDigits" => cc.last_four_digits = Some(read_text_content(reader)?),
                "expiryMonth" => {
                    let text = read_text_content(reader)?;
                    cc.expiry_month = Some(parse_lenient_int("expiryMonth", &text));
                }
                "expiryYear" => {
                    let text = read_text_content(reader)?;
                    cc.expiry_year = Some(parse_lenient_int("expiryYear", &text));
                }
                other => {
                    tracing::trace!(element = other, "ignoring unknown creditcardData element");
                    skip_element(reader)?;
                }
            }
        }

        Ok(cc)
    }
}

/// Map the text of a `returnType` element onto [`ReturnType`].
fn parse_return_type(reader: &mut Reader<'_>) -> XmlResult<ReturnType> {
    let text = read_text_content(reader)?;
    match ReturnType::from_str(&text) {
        Ok(return_type) => Ok(return_type),
        Err(_) => Err(XmlError::InvalidValue {
            field: "returnType",
            value: text,
        }),
    }
}

/// Read the payload selected by `returnData/@type`.
///
/// A missing `type` attribute and payload types this crate does not model both
/// yield `None`; the element is consumed either way.
fn parse_return_data(
    reader: &mut Reader<'_>,
    start: &BytesStart<'_>,
) -> XmlResult<Option<ReturnData>> {
    let Some(kind) = attribute_value(start, b"type")? else {
        skip_element(reader)?;
        return Ok(None);
    };

    if kind != CreditcardData::TYPE_NAME {
        tracing::debug!(return_data_type = %kind, "ignoring unsupported return data type");
        skip_element(reader)?;
        return Ok(None);
    }

    let payload = match next_child(reader, "returnData")? {
        Some(child) if child.local_name().as_ref() == CreditcardData::TYPE_NAME.as_bytes() => {
            CreditcardData::deserialize_xml(reader)?
        }
        _ => {
            return Err(XmlError::structure(
                "Expecting element named \"creditcardData\"",
            ));
        }
    };

    // Only the first payload element counts.
    while next_child(reader, "returnData")?.is_some() {
        skip_element(reader)?;
    }

    Ok(Some(ReturnData::Creditcard(payload)))
}

/// Read an `errors` container; every child must be an `error` element.
fn parse_errors(reader: &mut Reader<'_>) -> XmlResult<Vec<GatewayError>> {
    let mut errors = Vec::new();

    while let Some(child) = next_child(reader, "errors")? {
        if child.local_name().as_ref() != b"error" {
            return Err(XmlError::structure("Expecting element named \"error\""));
        }
        errors.push(GatewayError::deserialize_xml(reader)?);
    }

    Ok(errors)
}

/// Read one `extraData` element as a `(key, value)` pair.
fn parse_extra_data(
    reader: &mut Reader<'_>,
    start: &BytesStart<'_>,
) -> XmlResult<(String, String)> {
    let key = attribute_value(start, b"key")?.ok_or_else(|| {
        XmlError::structure("Missing required attribute \"key\" on element \"extraData\"")
    })?;
    let value = read_text_content(reader)?;
    Ok((key, value))
}

// ---------------------------------------------------------------------------
// Helper functions for reading common XML patterns
// ---------------------------------------------------------------------------

fn new_reader(xml: &[u8]) -> Reader<'_> {
    let mut reader = NsReader::from_reader(xml);
    // `<a/>` is reported as `<a></a>` so every element has a matching end event.
    reader.config_mut().expand_empty_elements = true;
    reader
}

/// Deepest element nesting accepted anywhere in a document.
pub const MAX_DEPTH: u32 = 256;

/// Advance past the opening tag of the first element named `local` in `namespace`.
///
/// Returns the number of ancestors of the root that are still open.
fn find_root(reader: &mut Reader<'_>, namespace: &str, local: &str) -> XmlResult<u32> {
    let mut depth: u32 = 0;
    loop {
        let (ns, event) = reader.read_resolved_event()?;
        match event {
            Event::Start(e) => {
                let bound = matches!(ns, ResolveResult::Bound(Namespace(n)) if n == namespace.as_bytes());
                if bound && e.local_name().as_ref() == local.as_bytes() {
                    tracing::trace!(root = local, namespace, depth, "found root element");
                    return Ok(depth);
                }
                depth = descend(depth)?;
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => {
                return Err(XmlError::structure(format!(
                    "XML does not contain a root \"{local}\" element"
                )));
            }
            _ => {}
        }
    }
}

/// Read to the end of the document, failing if any element is left unclosed.
///
/// `depth` is the number of elements still open when draining starts.
fn drain(reader: &mut Reader<'_>, mut depth: u32) -> XmlResult<()> {
    loop {
        match reader.read_event()? {
            Event::Start(_) => depth = descend(depth)?,
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof if depth == 0 => return Ok(()),
            Event::Eof => return Err(unexpected_eof("document")),
            _ => {}
        }
    }
}

/// Return the next child element of the current element, or `None` once its end
/// tag has been consumed. Text, comments and processing instructions are skipped.
fn next_child<'i>(reader: &mut Reader<'i>, parent: &str) -> XmlResult<Option<BytesStart<'i>>> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => return Ok(Some(e)),
            Event::End(_) => return Ok(None),
            Event::Eof => return Err(unexpected_eof(parent)),
            _ => {}
        }
    }
}

/// Read the text content of the current element and consume its end tag.
///
/// Text of nested elements is included, as in a DOM `nodeValue`. Line endings in
/// text are normalized to `\n`.
fn read_text_content(reader: &mut Reader<'_>) -> XmlResult<String> {
    let mut text = String::new();
    let mut depth: u32 = 1;
    loop {
        match reader.read_event()? {
            Event::Text(e) => {
                let content = e
                    .xml10_content()
                    .map_err(|err| XmlError::Encoding(err.to_string()))?;
                text.push_str(&content);
            }
            Event::CData(e) => {
                let content = e
                    .xml10_content()
                    .map_err(|err| XmlError::Encoding(err.to_string()))?;
                text.push_str(&content);
            }
            Event::GeneralRef(e) => {
                let name = e
                    .decode()
                    .map_err(|err| XmlError::Encoding(err.to_string()))?;
                let reference = format!("&{name};");
                let resolved = quick_xml::escape::unescape(&reference)
                    .map_err(|err| XmlError::Encoding(err.to_string()))?;
                text.push_str(&resolved);
            }
            Event::Start(_) => depth = descend(depth)?,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(text);
                }
            }
            Event::Eof => return Err(unexpected_eof("text content")),
            _ => {}
        }
    }
}

/// Skip over an element and all its children.
fn skip_element(reader: &mut Reader<'_>) -> XmlResult<()> {
    let mut depth: u32 = 1;
    loop {
        match reader.read_event()? {
            Event::Start(_) => depth = descend(depth)?,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => return Err(unexpected_eof("skipped element")),
            _ => {}
        }
    }
}

fn descend(depth: u32) -> XmlResult<u32> {
    if depth >= MAX_DEPTH {
        return Err(XmlError::structure("maximum nesting depth exceeded"));
    }
    Ok(depth + 1)
}

/// Unescaped value of the attribute with the given qualified name.
fn attribute_value(start: &BytesStart<'_>, name: &[u8]) -> XmlResult<Option<String>> {
    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn utf8(bytes: &[u8]) -> XmlResult<&str> {
    std::str::from_utf8(bytes).map_err(|err| XmlError::Encoding(err.to_string()))
}

fn unexpected_element(e: &BytesStart<'_>) -> XmlError {
    let name = e.name();
    XmlError::structure(format!(
        "Unexpected element \"{}\"",
        String::from_utf8_lossy(name.as_ref())
    ))
}

fn unexpected_eof(context: &str) -> XmlError {
    XmlError::structure(format!("unexpected EOF in {context}"))
}

/// Truthiness of a text value: empty and `"0"` are false.
fn is_truthy(text: &str) -> bool {
    !(text.is_empty() || text == "0")
}

/// Integer conversion that never fails, following PHP's `(int)` cast of a
/// numeric-leading string: leading whitespace is skipped, the longest decimal or
/// exponent prefix is read and truncated toward zero, and no prefix yields 0.
/// Out-of-range values saturate.
#[allow(clippy::cast_possible_truncation)]
fn parse_lenient_int(field: &'static str, text: &str) -> i32 {
    if let Ok(value) = text.trim().parse::<i32>() {
        return value;
    }

    let prefix = numeric_prefix(text.trim_start());
    let value = prefix.parse::<f64>().map_or(0, |n| n.trunc() as i32);

    tracing::debug!(field, raw = text, value, "coerced malformed integer value");
    value
}

/// Longest prefix of `s` shaped like `[+-]digits[.digits][(e|E)[+-]digits]`.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let skip_digits =
        |from: usize| from + bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = skip_digits(sign);
    let mut end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = skip_digits(end + 1);
        if frac_end > end + 1 || int_end > sign {
            end = frac_end;
        }
    }
    if end == sign {
        return "";
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exp_start = end + 1 + usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = skip_digits(exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }
    &s[..end]
}
