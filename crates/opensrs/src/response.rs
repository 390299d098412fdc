//! Outcome of a completed registrar call.

use crate::scalar::render_scalar;
use crate::value::Value;

/// Sentinel returned by [`Response::errors`] when the registrar reports a
/// failure without both a text and a code.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// A decoded registrar reply together with the documents exchanged.
///
/// A response is produced whenever the registrar answered with a parseable
/// envelope, including application failures; check [`Response::is_success`].
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// The decoded `data_block` content.
    pub response: Value,
    /// The request as shown to logs: redacted or raw, per configuration.
    pub request_xml: String,
    /// The response body exactly as received.
    pub response_xml: String,
    success: bool,
}

impl Response {
    pub fn new(
        response: Value,
        request_xml: impl Into<String>,
        response_xml: impl Into<String>,
    ) -> Self {
        let success = is_success(&response);
        Self {
            response,
            request_xml: request_xml.into(),
            response_xml: response_xml.into(),
            success,
        }
    }

    /// `true` only if the reply carries `is_success` equal to `"1"`.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// The error message for a failed call, `None` if it succeeded.
    ///
    /// Formats as `"<response_text> (Code <response_code>)"` when both fields
    /// are present, [`UNKNOWN_ERROR`] otherwise.
    pub fn errors(&self) -> Option<String> {
        if self.success {
            return None;
        }
        let text = self.field_text("response_text");
        let code = self.field_text("response_code");
        Some(match (text, code) {
            (Some(text), Some(code)) => format!("{text} (Code {code})"),
            _ => UNKNOWN_ERROR.to_owned(),
        })
    }

    fn field_text(&self, key: &str) -> Option<String> {
        self.response
            .get(key)
            .and_then(Value::as_scalar)
            .map(render_scalar)
    }
}

fn is_success(response: &Value) -> bool {
    response
        .get("is_success")
        .and_then(Value::as_scalar)
        .is_some_and(|flag| render_scalar(flag) == "1")
}
