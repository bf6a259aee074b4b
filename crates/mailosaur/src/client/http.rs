//! Authenticated HTTP transport shared by all operation groups
//!
//! Uses synchronous HTTP (ureq) to be executor-agnostic. Every request
//! carries the Basic auth header and is bounded by the configured timeout.

use base64::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use ureq::Agent;
use ureq::http::Response;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Largest raw email or attachment we are willing to buffer
const MAX_DOWNLOAD_BYTES: u64 = 64 * 1024 * 1024;

/// Error details are truncated to this many characters
const MAX_ERROR_DETAIL: usize = 500;

pub(crate) type Query<'a> = &'a [(&'a str, &'a str)];

/// Error body shape used by the service
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(rename = "type")]
    kind: Option<String>,
    message: Option<String>,
    messages: Option<serde_json::Map<String, serde_json::Value>>,
}

impl ApiErrorBody {
    fn describe(self) -> Option<String> {
        let mut parts: Vec<String> = Vec::new();
        if let Some(message) = self.message {
            parts.push(message);
        }
        if let Some(messages) = self.messages {
            for (field, value) in messages {
                match value {
                    serde_json::Value::String(s) => parts.push(format!("{}: {}", field, s)),
                    other => parts.push(format!("{}: {}", field, other)),
                }
            }
        }
        match (self.kind, parts.is_empty()) {
            (Some(kind), true) => Some(kind),
            (Some(kind), false) => Some(format!("{} ({})", kind, parts.join("; "))),
            (None, false) => Some(parts.join("; ")),
            (None, true) => None,
        }
    }
}

pub(crate) struct HttpTransport {
    agent: Agent,
    base_url: Url,
    auth_header: String,
}

impl HttpTransport {
    pub(crate) fn new(config: &ClientConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(config.request_timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: config.base_url.clone(),
            auth_header: basic_auth(&config.api_key),
        }
    }

    fn url(&self, path: &str, query: Query<'_>) -> Result<Url> {
        let mut url = self.base_url.join(path).map_err(|e| Error::Transport {
            message: format!("Invalid request path {}: {}", path, e),
        })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }

    pub(crate) fn get_json<T: DeserializeOwned>(&self, path: &str, query: Query<'_>) -> Result<T> {
        let url = self.url(path, query)?;
        log::debug!("GET {}", url.path());

        let response = self
            .agent
            .get(url.as_str())
            .header("Authorization", self.auth_header.as_str())
            .header("Accept", "application/json")
            .call()?;

        read_json(check(response, path)?)
    }

    pub(crate) fn post_json<B, T>(&self, path: &str, query: Query<'_>, body: &B) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = self.url(path, query)?;
        log::debug!("POST {}", url.path());

        let response = self
            .agent
            .post(url.as_str())
            .header("Authorization", self.auth_header.as_str())
            .header("Accept", "application/json")
            .send_json(body)?;

        read_json(check(response, path)?)
    }

    pub(crate) fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.url(path, &[])?;
        log::debug!("GET {}", url.path());

        let response = self
            .agent
            .get(url.as_str())
            .header("Authorization", self.auth_header.as_str())
            .call()?;

        let mut response = check(response, path)?;
        let bytes = response
            .body_mut()
            .with_config()
            .limit(MAX_DOWNLOAD_BYTES)
            .read_to_vec()?;
        Ok(bytes)
    }

    pub(crate) fn delete(&self, path: &str, query: Query<'_>) -> Result<()> {
        let url = self.url(path, query)?;
        log::debug!("DELETE {}", url.path());

        let response = self
            .agent
            .delete(url.as_str())
            .header("Authorization", self.auth_header.as_str())
            .call()?;

        check(response, path)?;
        Ok(())
    }
}

/// Turn a non-success status into a typed error, keeping the service's detail
fn check(mut response: Response<ureq::Body>, path: &str) -> Result<Response<ureq::Body>> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = response
        .body_mut()
        .read_to_string()
        .ok()
        .and_then(|body| error_detail(&body));

    log::warn!("{} returned HTTP {}", path, status.as_u16());
    Err(Error::from_status(status.as_u16(), path, detail))
}

fn read_json<T: DeserializeOwned>(mut response: Response<ureq::Body>) -> Result<T> {
    let body = response.body_mut().read_to_string()?;
    Ok(serde_json::from_str(&body)?)
}

/// Extract a readable message from an error response body
fn error_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    let detail = match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.describe()?,
        Err(_) => body.to_string(),
    };
    Some(detail.chars().take(MAX_ERROR_DETAIL).collect())
}

/// Basic auth header with the API key as username and an empty password
fn basic_auth(api_key: &str) -> String {
    format!("Basic {}", BASE64_STANDARD.encode(format!("{}:", api_key)))
}
