use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::Result;

/// Unauthenticated credential-type endpoint. Replies disclose whether the
/// username has an account without a login attempt being recorded.
const GET_CREDENTIAL_TYPE_URL: &str =
    "https://login.microsoftonline.com/common/GetCredentialType";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const MARKER_INVALID: &str = r#""IfExistsResult":1"#;
const MARKER_VALID: &str = r#""IfExistsResult":0"#;

/// Outcome of one validation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Classification {
    Valid,
    Invalid,
    Unknown,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Valid => write!(f, "VALID"),
            Classification::Invalid => write!(f, "INVALID"),
            Classification::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

#[derive(Serialize)]
struct CredentialTypeRequest<'a> {
    #[serde(rename = "Username")]
    username: &'a str,
}

#[derive(Deserialize)]
struct CredentialTypeResponse {
    #[serde(rename = "IfExistsResult")]
    if_exists_result: Option<i64>,
}

/// Client for checking account existence against the credential-type endpoint
#[derive(Debug, Clone)]
pub struct Validator {
    http: Client,
    endpoint: String,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a new Validator pointed at the live endpoint
    pub fn new() -> Self {
        Self {
            http: build_client(DEFAULT_TIMEOUT),
            endpoint: GET_CREDENTIAL_TYPE_URL.to_string(),
        }
    }

    /// Override the endpoint URL (tests point this at a mock server)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the HTTP request timeout (rebuilds the underlying client)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = build_client(timeout);
        self
    }

    /// Submit one candidate address and classify the response.
    ///
    /// The candidate is sent exactly as supplied: no format validation, no
    /// escaping beyond JSON serialization. Non-2xx statuses are not treated
    /// as errors; their bodies go through the same classification and come
    /// out UNKNOWN unless a marker happens to be present. A transport-level
    /// failure (connect, timeout) surfaces as `Err` for the caller to handle.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn check(&self, email: &str) -> Result<Classification> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&CredentialTypeRequest { username: email })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = %status, bytes = body.len(), "Received credential-type response");

        Ok(classify_body(&body))
    }
}

fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("creeper/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to build HTTP client")
}

/// Classify a response body by its `IfExistsResult` field.
///
/// The primary path is a structured decode: 1 means the account does not
/// exist, 0 means it does, anything else is inconclusive. Bodies that are
/// not JSON (error pages, throttle responses) fall back to a literal
/// substring scan, with the INVALID marker checked first so a body carrying
/// both markers still classifies INVALID.
pub fn classify_body(body: &str) -> Classification {
    if let Ok(CredentialTypeResponse {
        if_exists_result: Some(value),
    }) = serde_json::from_str::<CredentialTypeResponse>(body)
    {
        return match value {
            1 => Classification::Invalid,
            0 => Classification::Valid,
            _ => Classification::Unknown,
        };
    }

    if body.contains(MARKER_INVALID) {
        Classification::Invalid
    } else if body.contains(MARKER_VALID) {
        Classification::Valid
    } else {
        Classification::Unknown
    }
}
