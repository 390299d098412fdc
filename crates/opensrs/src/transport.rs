//! Port through which the client reaches the registrar.
//!
//! The core only knows how to turn values into request text and response text
//! back into values. Moving bytes (signing, HTTPS, timeouts) is delegated to
//! a [`Transport`] implementation; `opensrs-transport` provides the HTTPS one.

use async_trait::async_trait;

use crate::errors::TransportError;

/// Sends one request body and returns the complete response body.
///
/// Implementations must either return the whole body or a
/// [`TransportError`]; partial bodies are not supported.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, body: &str) -> Result<String, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, body: &str) -> Result<String, TransportError> {
        (**self).send(body).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn send(&self, body: &str) -> Result<String, TransportError> {
        (**self).send(body).await
    }
}
