//! Error types for the OpenSRS XCP domain.
//!
//! [`XcpError`] covers every fault the codec and client can surface to a
//! caller. Application-level failures (the registrar answered, but with
//! `is_success` other than `"1"`) are **not** errors; they are reported
//! through [`crate::Response::is_success`] and [`crate::Response::errors`].
//!
//! [`TransportError`] is the classification a [`crate::Transport`]
//! implementation hands back when the remote call itself failed.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Transport-level errors
// ---------------------------------------------------------------------------

/// Failure reported by a [`crate::Transport`] implementation.
///
/// The core never retries; every variant is re-surfaced to the caller wrapped
/// in [`XcpError::Transport`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The server answered, but not with a usable response body
    /// (non-success HTTP status, truncated body, protocol violation).
    #[error("Bad response: {message}")]
    BadResponse {
        /// Human-readable description of the failure.
        message: String,
    },

    /// The connection was refused or reset before a response was received.
    #[error("Connection error: {message}")]
    Connection {
        /// Human-readable description of the failure.
        message: String,
    },

    /// The connect or read deadline elapsed.
    #[error("Timeout: {message}")]
    Timeout {
        /// Human-readable description of the failure.
        message: String,
    },

    /// The transport could not be constructed from the supplied settings
    /// (invalid server URL, header value that cannot be encoded, ...).
    #[error("Transport configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Codec and client errors
// ---------------------------------------------------------------------------

/// Errors produced while building a request, parsing a response, or making a
/// call through [`crate::Client`].
#[derive(Debug, Error)]
pub enum XcpError {
    /// The response document has no element where one is required, e.g. an
    /// absent or empty `data_block`.
    #[error("No data found in document")]
    NoData,

    /// The response text is not a well-formed XML document.
    #[error("Malformed XML document: {message}")]
    MalformedDocument {
        /// Message from the underlying XML reader.
        message: String,
    },

    /// The request tree could not be written out as XML text.
    #[error("Could not serialise request: {message}")]
    Serialization {
        /// Message from the underlying XML writer.
        message: String,
    },

    /// The transport failed to deliver the request or receive a response.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl XcpError {
    pub(crate) fn malformed(err: impl std::fmt::Display) -> Self {
        Self::MalformedDocument {
            message: err.to_string(),
        }
    }

    pub(crate) fn serialization(err: impl std::fmt::Display) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}
