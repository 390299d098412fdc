//! Connection and client settings.
//!
//! [`ServerConfig`] is the full set of settings a caller supplies (typically
//! deserialised from a file). [`ClientConfig`] is the part the codec itself
//! reads; the rest is handed to the transport.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::codec::ScalarPolicy;

/// Registrar endpoint used when none is configured.
pub const DEFAULT_SERVER: &str = "https://rr-n1-tor.opensrs.net:55443/";

/// Everything needed to talk to one registrar account.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Endpoint URL. An empty path means `/`.
    #[serde(default = "default_server")]
    pub server: String,

    /// Reseller username, sent as `X-Username`.
    pub username: String,

    /// Reseller password. Not used for signing; kept for callers that need it
    /// in request data.
    #[serde(default)]
    pub password: Option<String>,

    /// Shared private key used to sign request bodies.
    pub key: String,

    /// Overall request deadline in seconds; also the connect deadline unless
    /// `open_timeout_secs` is set. `None` keeps the HTTP client's default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Connect deadline in seconds.
    #[serde(default)]
    pub open_timeout_secs: Option<u64>,

    /// Show the redacted request rendering in logs and responses.
    #[serde(default)]
    pub sanitize_request: bool,

    /// Skip TLS certificate verification.
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_server() -> String {
    DEFAULT_SERVER.to_owned()
}

impl ServerConfig {
    /// Creates a configuration for the default server with no timeouts.
    pub fn new(username: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            server: default_server(),
            username: username.into(),
            password: None,
            key: key.into(),
            timeout_secs: None,
            open_timeout_secs: None,
            sanitize_request: false,
            accept_invalid_certs: false,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// The connect deadline: `open_timeout_secs` if set, else `timeout_secs`.
    pub fn open_timeout(&self) -> Option<Duration> {
        self.open_timeout_secs
            .or(self.timeout_secs)
            .map(Duration::from_secs)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            sanitize_request: self.sanitize_request,
            ..ClientConfig::default()
        }
    }
}

// Credentials stay out of debug output.
impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("open_timeout_secs", &self.open_timeout_secs)
            .field("sanitize_request", &self.sanitize_request)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

/// Settings read by [`crate::Client`] on every call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Use the redacted request rendering wherever the request is shown.
    pub sanitize_request: bool,
    /// How response scalars are interpreted.
    pub scalar_policy: ScalarPolicy,
}

impl From<&ServerConfig> for ClientConfig {
    fn from(config: &ServerConfig) -> Self {
        config.client_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_json_uses_defaults() {
        let config: ServerConfig =
            serde_json::from_str(r#"{"username": "reseller", "key": "abc"}"#).expect("parse");

        assert_eq!(config.server, DEFAULT_SERVER);
        assert_eq!(config.timeout(), None);
        assert_eq!(config.open_timeout(), None);
        assert!(!config.sanitize_request);
        assert!(!config.accept_invalid_certs);
    }

    #[test]
    fn timeout_applies_to_connect_unless_overridden() {
        let mut config = ServerConfig::new("reseller", "abc");
        config.timeout_secs = Some(90);

        assert_eq!(config.timeout(), Some(Duration::from_secs(90)));
        assert_eq!(config.open_timeout(), Some(Duration::from_secs(90)));

        config.open_timeout_secs = Some(10);
        assert_eq!(config.timeout(), Some(Duration::from_secs(90)));
        assert_eq!(config.open_timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn sanitize_flag_flows_into_client_config() {
        let mut config = ServerConfig::new("reseller", "abc");
        config.sanitize_request = true;

        assert!(ClientConfig::from(&config).sanitize_request);
    }

    #[test]
    fn debug_output_hides_credentials() {
        let mut config = ServerConfig::new("reseller", "very-secret-key");
        config.password = Some("hunter2".to_owned());

        let debug = format!("{config:?}");
        assert!(!debug.contains("very-secret-key"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("reseller"));
    }
}
