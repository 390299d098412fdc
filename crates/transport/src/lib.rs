//! OpenSRS HTTPS transport adapter.
//!
//! Implements [`opensrs::Transport`] over `reqwest`: each request envelope is
//! posted to the configured server with `X-Username` and an `X-Signature`
//! computed from the body and the reseller's private key.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** TLS, timeouts, signing and HTTP error classification
//! live here. The [`opensrs`] crate sees only [`opensrs::Transport`] and
//! [`opensrs::TransportError`].
//!
//! ## Error classification
//!
//! | reqwest failure | [`opensrs::TransportError`] |
//! |-----------------|-----------------------------|
//! | connect or read deadline elapsed | `Timeout` |
//! | connection refused / reset | `Connection` |
//! | non-success HTTP status, unreadable body | `BadResponse` |
//! | invalid URL or client settings | `Configuration` |

pub mod http;
pub mod signature;

pub use http::{parse_endpoint, HttpTransport, BAD_RESPONSE_MESSAGE};
pub use signature::{request_headers, signature};
