//! `opensrs-call`: performs one registrar call from the command line.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Load configuration**: read a JSON [`ServerConfig`] file, letting
//!    `OPENSRS_USERNAME` / `OPENSRS_KEY` override the credentials it holds.
//! 2. **Wire observability**: install `tracing-subscriber` with an
//!    `EnvFilter` (`RUST_LOG`, default `info`) writing to stderr, as JSON
//!    when `OPENSRS_LOG_FORMAT=json`.
//! 3. **Construct infrastructure**: build an [`HttpTransport`] and inject it
//!    into a [`Client`].
//! 4. **Call**: read the request options from a JSON object, send them, and
//!    print the decoded reply to stdout as JSON.
//!
//! ```text
//! opensrs-call <config.json> <request.json>
//! ```
//!
//! `-` as the request path reads the request from stdin.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use opensrs::{Client, Map, Response, ServerConfig, Value};
use opensrs_transport::HttpTransport;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const USERNAME_VAR: &str = "OPENSRS_USERNAME";
const KEY_VAR: &str = "OPENSRS_KEY";
const LOG_FORMAT_VAR: &str = "OPENSRS_LOG_FORMAT";

const USAGE: &str = "usage: opensrs-call <config.json> <request.json | ->";

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
struct Args {
    config: PathBuf,
    request: RequestSource,
}

#[derive(Debug, PartialEq, Eq)]
enum RequestSource {
    Stdin,
    File(PathBuf),
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut args = args.into_iter();
    let (Some(config), Some(request), None) = (args.next(), args.next(), args.next()) else {
        bail!(USAGE);
    };
    let request = match request.as_str() {
        "-" => RequestSource::Stdin,
        _ => RequestSource::File(PathBuf::from(request)),
    };
    Ok(Args {
        config: PathBuf::from(config),
        request,
    })
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

fn load_config(path: &Path) -> Result<ServerConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading configuration {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing configuration {}", path.display()))?;
    config_from_json(json, |name| std::env::var(name).ok())
}

/// Applies credential overrides, then deserialises. Overrides are applied to
/// the raw JSON so a file may omit credentials supplied by the environment.
fn config_from_json(
    mut json: serde_json::Value,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ServerConfig> {
    let Some(object) = json.as_object_mut() else {
        bail!("configuration must be a JSON object");
    };
    for (var, field) in [(USERNAME_VAR, "username"), (KEY_VAR, "key")] {
        if let Some(value) = env(var) {
            debug!(variable = var, "credential overridden from environment");
            object.insert(field.to_owned(), serde_json::Value::String(value));
        }
    }
    serde_json::from_value(json).context("invalid configuration")
}

// ---------------------------------------------------------------------------
// Request and output
// ---------------------------------------------------------------------------

fn read_request(source: &RequestSource) -> Result<Map> {
    let text = match source {
        RequestSource::Stdin => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading request from stdin")?;
            text
        }
        RequestSource::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading request {}", path.display()))?,
    };
    let json: serde_json::Value = serde_json::from_str(&text).context("parsing request JSON")?;
    request_options(json)
}

fn request_options(json: serde_json::Value) -> Result<Map> {
    match Value::from_json(json) {
        Value::Map(options) => Ok(options),
        _ => bail!("request must be a JSON object of call options"),
    }
}

fn report(response: &Response) -> serde_json::Value {
    serde_json::json!({
        "is_success": response.is_success(),
        "errors": response.errors(),
        "response": response.response.to_json(),
    })
}

// ---------------------------------------------------------------------------
// Observability
// ---------------------------------------------------------------------------

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match std::env::var(LOG_FORMAT_VAR).as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = parse_args(std::env::args().skip(1))?;
    let config = load_config(&args.config)?;
    let options = read_request(&args.request)?;

    let transport = HttpTransport::new(&config).context("building HTTP transport")?;
    let client = Client::new(config.client_config(), transport);

    let response = client.call(options).await?;
    println!("{}", serde_json::to_string_pretty(&report(&response))?);

    if !response.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
