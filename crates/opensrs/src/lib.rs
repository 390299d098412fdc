//! Client core for the OpenSRS XCP registrar protocol.
//!
//! XCP requests and responses are nested data (maps, lists, scalars) carried
//! in a fixed XML envelope. This crate owns that mapping and the request
//! cycle around it; the bytes themselves travel through a [`Transport`]
//! supplied by the caller (see the `opensrs-transport` crate for HTTPS).
//!
//! ## Architectural Layer
//!
//! **Domain + port definitions.** This crate performs no network or file I/O.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`value`] | [`Value`] tree and its JSON bridge |
//! | [`scalar`] | [`Scalar`] leaves, [`render_scalar`], [`infer_scalar`] |
//! | [`element`] | XML element tree, reading and writing via `quick-xml` |
//! | [`codec`] | `dt_assoc` / `dt_array` / `dt_scalar` encode and decode |
//! | [`envelope`] | `OPS_envelope` build and parse, [`RequestXml`] |
//! | [`redaction`] | Credential scrubbing for logged requests |
//! | [`response`] | [`Response`] with success flag and error message |
//! | [`client`] | [`Client::call`], the full request cycle |
//! | [`transport`] | The [`Transport`] port |
//! | [`config`] | [`ServerConfig`], [`ClientConfig`] |
//! | [`errors`] | [`XcpError`], [`TransportError`] |
//!
//! ## Example
//!
//! ```
//! use opensrs::{build, parse, Value};
//!
//! let data: Value = [("action", "GET_BALANCE"), ("object", "BALANCE")]
//!     .into_iter()
//!     .collect();
//! let request = build(&data).unwrap();
//! assert!(request.raw().contains(r#"<item key="action">GET_BALANCE</item>"#));
//! assert_eq!(parse(request.raw()).unwrap(), data);
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod element;
pub mod envelope;
pub mod errors;
pub mod identifiers;
pub mod redaction;
pub mod response;
pub mod scalar;
pub mod transport;
pub mod value;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use client::Client;
pub use codec::{decode, encode, Decoder, ScalarPolicy};
pub use config::{ClientConfig, ServerConfig, DEFAULT_SERVER};
pub use element::{parse_document, Element, Node};
pub use envelope::{build, parse, parse_with, RequestXml};
pub use errors::{TransportError, XcpError};
pub use identifiers::CallId;
pub use redaction::redact;
pub use response::Response;
pub use scalar::{infer_scalar, render_scalar, Scalar};
pub use transport::Transport;
pub use value::{Map, Value};
