//! Request signing and header construction.
//!
//! The registrar authenticates each request by an `X-Signature` header:
//! `md5_hex(md5_hex(body + key) + key)`, lowercase hex.

use md5::{Digest, Md5};
use opensrs::TransportError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};

pub const X_USERNAME: &str = "x-username";
pub const X_SIGNATURE: &str = "x-signature";
pub const XML_CONTENT_TYPE: &str = "text/xml";

/// Signs `body` with the shared `key`.
pub fn signature(body: &str, key: &str) -> String {
    let inner = md5_hex(&[body, key]);
    md5_hex(&[&inner, key])
}

fn md5_hex(parts: &[&str]) -> String {
    let mut hasher = Md5::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Headers for one signed request.
///
/// Fails with [`TransportError::Configuration`] if `username` cannot be sent
/// as a header value.
pub fn request_headers(body: &str, username: &str, key: &str) -> Result<HeaderMap, TransportError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(XML_CONTENT_TYPE));
    headers.insert(
        HeaderName::from_static(X_USERNAME),
        HeaderValue::from_str(username).map_err(|_| TransportError::Configuration {
            message: "username is not a valid header value".to_owned(),
        })?,
    );
    headers.insert(
        HeaderName::from_static(X_SIGNATURE),
        HeaderValue::from_str(&signature(body, key)).map_err(|_| {
            TransportError::Configuration {
                message: "signature is not a valid header value".to_owned(),
            }
        })?,
    );
    Ok(headers)
}
