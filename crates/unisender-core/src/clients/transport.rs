//! HTTP transport seam
//!
//! The client never talks to `reqwest` directly; it hands a URL and a flat
//! parameter set to a [`Transport`]. Tests swap in an in-memory transport.

use crate::encoding::RequestParameters;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::Value;
use std::time::Duration;

/// Raw API response
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// URL of the originating request
    pub url: String,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            url: url.into(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// The `result` payload, if the body is JSON and carries one
    pub fn result(&self) -> Option<Value> {
        self.json().ok()
            .and_then(|mut body| body.get_mut("result").map(Value::take))
            .filter(|result| !result.is_null())
    }

    /// The embedded `error` text, if any
    pub fn error(&self) -> Option<String> {
        let body = self.json().ok()?;
        match body.get("error")? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// 2xx and no embedded error
    pub fn is_ok(&self) -> bool {
        self.is_success() && self.error().is_none()
    }
}

/// Performs exactly one POST per call. Retries, if any, belong here and not
/// in the client.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_form(&self, url: &str, params: &RequestParameters) -> Result<ApiResponse>;
}

/// `reqwest`-backed transport sending `application/x-www-form-urlencoded`
pub struct HttpTransport {
    http_client: HttpClient,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_form(&self, url: &str, params: &RequestParameters) -> Result<ApiResponse> {
        let response = self.http_client
            .post(url)
            .form(&params.to_form_pairs())
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        log::debug!("POST {} -> {} ({} bytes)", url, status, body.len());

        Ok(ApiResponse::new(status, url, body))
    }
}
