//! The `OPS_envelope` wrapper around encoded request and response data.
//!
//! ```xml
//! <OPS_envelope>
//!   <header><version>0.9</version></header>
//!   <body><data_block>...encoded value...</data_block></body>
//! </OPS_envelope>
//! ```

use crate::codec::{encode, Decoder, ScalarPolicy};
use crate::element::{parse_document, Element};
use crate::errors::XcpError;
use crate::redaction::redact;
use crate::value::Value;

pub const ENVELOPE: &str = "OPS_envelope";
pub const PROTOCOL_VERSION: &str = "0.9";

/// Path from the envelope root to the element holding the encoded data.
const DATA_BLOCK_PATH: [&str; 2] = ["body", "data_block"];

// ---------------------------------------------------------------------------
// Request rendering
// ---------------------------------------------------------------------------

/// A built request: the text to transmit and a credential-free copy of it
/// for logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestXml {
    raw: String,
    redacted: String,
}

impl RequestXml {
    pub fn new(raw: impl Into<String>, redacted: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            redacted: redacted.into(),
        }
    }

    /// The exact bytes to send and sign.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The rendering with credential values replaced.
    pub fn redacted(&self) -> &str {
        &self.redacted
    }

    /// The rendering to show in logs and responses: redacted when `sanitize`
    /// is set, raw otherwise.
    pub fn rendered(&self, sanitize: bool) -> &str {
        if sanitize {
            &self.redacted
        } else {
            &self.raw
        }
    }
}

// ---------------------------------------------------------------------------
// Build / parse
// ---------------------------------------------------------------------------

/// Wraps `data` in an envelope and serialises it, together with its redacted
/// rendering.
pub fn build(data: &Value) -> Result<RequestXml, XcpError> {
    let document = envelope(encode(data));
    let raw = document.to_xml()?;
    let redacted = redact(&document).to_xml()?;
    Ok(RequestXml { raw, redacted })
}

fn envelope(data: Element) -> Element {
    Element::new(ENVELOPE)
        .with_child(
            Element::new("header").with_child(Element::new("version").with_text(PROTOCOL_VERSION)),
        )
        .with_child(Element::new("body").with_child(Element::new("data_block").with_child(data)))
}

/// Parses a response document with the default [`ScalarPolicy`].
pub fn parse(response: &str) -> Result<Value, XcpError> {
    parse_with(response, ScalarPolicy::default())
}

/// Parses a response document and decodes the content of its `data_block`.
///
/// Fails with [`XcpError::MalformedDocument`] if the text is not XML, and with
/// [`XcpError::NoData`] if the root is not `OPS_envelope` or the
/// `body/data_block` element is missing or has no decodable child element.
/// Text directly inside `data_block` is not data.
pub fn parse_with(response: &str, policy: ScalarPolicy) -> Result<Value, XcpError> {
    let root = parse_document(response)?;
    if root.name != ENVELOPE {
        return Err(XcpError::NoData);
    }
    let data_block = root.find_path(&DATA_BLOCK_PATH).ok_or(XcpError::NoData)?;
    Decoder::new(policy).decode_children(data_block)
}
