//! One-call-at-a-time registrar client.
//!
//! [`Client::call`] is the whole request cycle: add the protocol marker,
//! build the envelope, log it, hand it to the [`Transport`], log the reply,
//! decode it, and wrap it in a [`Response`]. Nothing is retried.

use tracing::{info, instrument, warn};

use crate::config::ClientConfig;
use crate::envelope::{build, parse_with};
use crate::errors::XcpError;
use crate::identifiers::CallId;
use crate::response::Response;
use crate::transport::Transport;
use crate::value::{Map, Value};

pub const PROTOCOL_KEY: &str = "protocol";
pub const PROTOCOL: &str = "XCP";

/// Sends XCP commands through a [`Transport`].
#[derive(Debug, Clone)]
pub struct Client<T> {
    config: ClientConfig,
    transport: T,
}

impl<T: Transport> Client<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Performs one registrar call with `options` as the command data.
    ///
    /// `protocol = "XCP"` is placed first in the data unless `options`
    /// provides its own `protocol`, which then takes that first slot.
    ///
    /// A reply reporting an application failure is still `Ok`; inspect
    /// [`Response::is_success`]. Transport failures, malformed replies and
    /// replies without data are `Err`.
    #[instrument(name = "opensrs_call", skip_all, fields(call_id = %CallId::new_random()))]
    pub async fn call(&self, options: Map) -> Result<Response, XcpError> {
        let request = build(&with_protocol(options))?;
        let shown = request.rendered(self.config.sanitize_request);
        info!("[OpenSRS] Request XML:\n{shown}");

        let body = self.transport.send(request.raw()).await.map_err(|error| {
            warn!(%error, "registrar call failed");
            error
        })?;
        info!("[OpenSRS] Response XML:\n{body}");

        let data = parse_with(&body, self.config.scalar_policy)?;
        Ok(Response::new(data, shown, body))
    }
}

fn with_protocol(options: Map) -> Value {
    let mut data = Map::with_capacity(options.len() + 1);
    data.insert(PROTOCOL_KEY.to_owned(), Value::from(PROTOCOL));
    data.extend(options);
    Value::Map(data)
}
