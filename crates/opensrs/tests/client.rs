use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use opensrs::{
    Client, ClientConfig, Map, ScalarPolicy, Scalar, Transport, TransportError, Value, XcpError,
};

const BALANCE_REPLY: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='no' ?>
<!DOCTYPE OPS_envelope SYSTEM 'ops.dtd'>
<OPS_envelope>
  <header><version>0.9</version></header>
  <body>
    <data_block>
      <dt_assoc>
        <item key="protocol">XCP</item>
        <item key="action">REPLY</item>
        <item key="is_success">1</item>
        <item key="response_code">200</item>
        <item key="response_text">Command successful</item>
        <item key="attributes">
          <dt_assoc>
            <item key="balance">8549.18</item>
            <item key="expiredate">2027-01-31 23:59:59</item>
          </dt_assoc>
        </item>
      </dt_assoc>
    </data_block>
  </body>
</OPS_envelope>"#;

const FAILURE_REPLY: &str = r#"<OPS_envelope><body><data_block><dt_assoc>
  <item key="is_success">0</item>
  <item key="response_code">415</item>
  <item key="response_text">Authentication Error.</item>
</dt_assoc></data_block></body></OPS_envelope>"#;

/// Records every body it is asked to send and answers with a canned reply.
struct FakeTransport {
    reply: Result<String, TransportError>,
    sent: Mutex<Vec<String>>,
}

impl FakeTransport {
    fn replying(body: &str) -> Self {
        Self {
            reply: Ok(body.to_owned()),
            sent: Mutex::default(),
        }
    }

    fn failing(error: TransportError) -> Self {
        Self {
            reply: Err(error),
            sent: Mutex::default(),
        }
    }

    fn sent(&self) -> Vec<String> {
        self.sent.lock().expect("lock").clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, body: &str) -> Result<String, TransportError> {
        self.sent.lock().expect("lock").push(body.to_owned());
        self.reply.clone()
    }
}

fn options(entries: &[(&str, Value)]) -> Map {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_owned(), v.clone()))
        .collect()
}

fn credential_options() -> Map {
    let attributes: Value = [
        ("domain", "example.com"),
        ("reg_username", "donaldduck"),
        ("reg_password", "secret123"),
    ]
    .into_iter()
    .collect();
    options(&[
        ("action", Value::from("SW_REGISTER")),
        ("object", Value::from("DOMAIN")),
        ("attributes", attributes),
    ])
}

#[tokio::test]
async fn call_sends_envelope_and_decodes_reply() {
    let transport = Arc::new(FakeTransport::replying(BALANCE_REPLY));
    let client = Client::new(ClientConfig::default(), transport.clone());

    let response = client
        .call(options(&[
            ("action", Value::from("GET_BALANCE")),
            ("object", Value::from("BALANCE")),
        ]))
        .await
        .expect("call");

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains(
        r#"<data_block><dt_assoc><item key="protocol">XCP</item><item key="action">GET_BALANCE</item>"#
    ));

    assert!(response.is_success());
    assert_eq!(response.errors(), None);
    assert_eq!(response.request_xml, sent[0]);
    assert_eq!(response.response_xml, BALANCE_REPLY);

    let attributes = response.response.get("attributes").expect("attributes");
    assert_eq!(attributes.get("balance").and_then(Value::as_str), Some("8549.18"));
    assert!(matches!(
        attributes.get("expiredate").and_then(Value::as_scalar),
        Some(Scalar::DateTime(_))
    ));
}

#[tokio::test]
async fn plain_text_policy_keeps_dates_as_text() {
    let config = ClientConfig {
        scalar_policy: ScalarPolicy::PlainText,
        ..ClientConfig::default()
    };
    let client = Client::new(config, FakeTransport::replying(BALANCE_REPLY));

    let response = client.call(Map::new()).await.expect("call");

    let attributes = response.response.get("attributes").expect("attributes");
    assert_eq!(
        attributes.get("expiredate").and_then(Value::as_str),
        Some("2027-01-31 23:59:59")
    );
}

#[tokio::test]
async fn application_failure_is_a_normal_response() {
    let client = Client::new(ClientConfig::default(), FakeTransport::replying(FAILURE_REPLY));

    let response = client.call(Map::new()).await.expect("call");

    assert!(!response.is_success());
    assert_eq!(
        response.errors().as_deref(),
        Some("Authentication Error. (Code 415)")
    );
}

#[tokio::test]
async fn sanitized_client_reports_redacted_request_but_sends_raw() {
    let config = ClientConfig {
        sanitize_request: true,
        ..ClientConfig::default()
    };
    let transport = Arc::new(FakeTransport::replying(BALANCE_REPLY));
    let client = Client::new(config, transport.clone());

    let response = client.call(credential_options()).await.expect("call");

    let sent = transport.sent();
    assert!(sent[0].contains(r#"<item key="reg_password">secret123</item>"#));
    assert!(sent[0].contains(r#"<item key="reg_username">donaldduck</item>"#));
    assert!(response.request_xml.contains(r#"<item key="reg_password">FILTERED</item>"#));
    assert!(response.request_xml.contains(r#"<item key="reg_username">FILTERED</item>"#));
    assert!(!response.request_xml.contains("secret123"));
}

#[tokio::test]
async fn unsanitized_client_reports_raw_request() {
    let transport = Arc::new(FakeTransport::replying(BALANCE_REPLY));
    let client = Client::new(ClientConfig::default(), transport.clone());

    let response = client.call(credential_options()).await.expect("call");

    assert_eq!(response.request_xml, transport.sent()[0]);
    assert!(response.request_xml.contains("secret123"));
}

#[tokio::test]
async fn transport_errors_are_resurfaced() {
    for error in [
        TransportError::Timeout {
            message: "read timed out".to_owned(),
        },
        TransportError::Connection {
            message: "connection reset".to_owned(),
        },
        TransportError::BadResponse {
            message: "HTTP 502".to_owned(),
        },
    ] {
        let client = Client::new(ClientConfig::default(), FakeTransport::failing(error.clone()));

        match client.call(Map::new()).await {
            Err(XcpError::Transport(actual)) => assert_eq!(actual, error),
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn truncated_reply_fails_to_parse() {
    let truncated = &BALANCE_REPLY[..BALANCE_REPLY.len() / 2];
    let client = Client::new(ClientConfig::default(), FakeTransport::replying(truncated));

    let result = client.call(Map::new()).await;

    assert!(matches!(result, Err(XcpError::MalformedDocument { .. })));
}

#[tokio::test]
async fn reply_without_data_is_structural_error() {
    let client = Client::new(
        ClientConfig::default(),
        FakeTransport::replying("<OPS_envelope><body><data_block/></body></OPS_envelope>"),
    );

    let result = client.call(Map::new()).await;

    assert!(matches!(result, Err(XcpError::NoData)));
}

#[tokio::test]
async fn boxed_transports_are_accepted() {
    let transport: Box<dyn Transport> = Box::new(FakeTransport::replying(BALANCE_REPLY));
    let client = Client::new(ClientConfig::default(), transport);

    assert!(client.call(Map::new()).await.expect("call").is_success());
}
