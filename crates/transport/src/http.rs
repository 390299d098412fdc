//! HTTPS transport: signed `POST` of the request envelope to the registrar.

use async_trait::async_trait;
use opensrs::{ServerConfig, Transport, TransportError};
use reqwest::{Client, RequestBuilder, Url};
use tracing::{debug, warn};

use crate::signature::request_headers;

/// Message attached to [`TransportError::BadResponse`]. The registrar answers
/// unknown source addresses with an error page rather than an envelope.
pub const BAD_RESPONSE_MESSAGE: &str = "Received a bad response from OpenSRS. Please check that \
     your IP address is added to the whitelist, and try again.";

/// [`Transport`] that posts each request to the configured server.
#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
    endpoint: Url,
    username: String,
    key: String,
}

impl HttpTransport {
    /// Builds the HTTP client from `config`.
    ///
    /// `timeout_secs` bounds the whole request and, unless
    /// `open_timeout_secs` is set, the connect phase; unset values keep
    /// reqwest's defaults.
    pub fn new(config: &ServerConfig) -> Result<Self, TransportError> {
        let endpoint = parse_endpoint(&config.server)?;

        let mut builder = Client::builder().danger_accept_invalid_certs(config.accept_invalid_certs);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(open_timeout) = config.open_timeout() {
            builder = builder.connect_timeout(open_timeout);
        }
        let http = builder.build().map_err(|error| TransportError::Configuration {
            message: error.to_string(),
        })?;

        Ok(Self {
            http,
            endpoint,
            username: config.username.clone(),
            key: config.key.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Prepares the signed `POST` for `body` without sending it.
    pub fn build_request(&self, body: &str) -> Result<RequestBuilder, TransportError> {
        let headers = request_headers(body, &self.username, &self.key)?;
        Ok(self
            .http
            .post(self.endpoint.clone())
            .headers(headers)
            .body(body.to_owned()))
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint.as_str())
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, body: &str) -> Result<String, TransportError> {
        let response = self.build_request(body)?.send().await.map_err(classify)?;

        let status = response.status();
        debug!(%status, endpoint = %self.endpoint, "registrar responded");
        if !status.is_success() {
            warn!(%status, "registrar returned a non-success status");
            return Err(TransportError::BadResponse {
                message: format!("{BAD_RESPONSE_MESSAGE} (HTTP {status})"),
            });
        }

        response.text().await.map_err(classify)
    }
}

/// Parses the server URL. Only `http` and `https` are accepted; a URL
/// without a path posts to `/`.
pub fn parse_endpoint(server: &str) -> Result<Url, TransportError> {
    let endpoint = Url::parse(server).map_err(|error| TransportError::Configuration {
        message: format!("invalid server URL {server:?}: {error}"),
    })?;
    match endpoint.scheme() {
        "http" | "https" => Ok(endpoint),
        scheme => Err(TransportError::Configuration {
            message: format!("unsupported server URL scheme {scheme:?}"),
        }),
    }
}

fn classify(error: reqwest::Error) -> TransportError {
    let message = error.to_string();
    if error.is_timeout() {
        TransportError::Timeout { message }
    } else if error.is_connect() || error.is_request() {
        TransportError::Connection { message }
    } else if error.is_builder() {
        TransportError::Configuration { message }
    } else {
        TransportError::BadResponse {
            message: format!("{BAD_RESPONSE_MESSAGE} ({message})"),
        }
    }
}
