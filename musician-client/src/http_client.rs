//! HTTP transport
//!
//! [`Transport`] is the single seam between the client and the network. The
//! production implementation, [`HttpTransport`], wraps one `reqwest::Client`
//! (its connection pool is the "session") with redirects disabled and the
//! configured timeouts. Tests swap in a scripted transport.
//!
//! The transport never interprets status codes; that is left to
//! [`ApiResponse`](crate::ApiResponse) so callers decide between raising and
//! inspecting.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use url::Url;

use crate::config::OrchestraConfig;
use crate::error::{OrchestraError, Result};
use crate::utils::log_sanitizer::{describe_bytes, mask_secret, truncate_for_log};

/// HTTP verbs the backend API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Head,
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Head => "HEAD",
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Head => reqwest::Method::HEAD,
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Patch => reqwest::Method::PATCH,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = OrchestraError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "HEAD" => Ok(Self::Head),
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PATCH" => Ok(Self::Patch),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            _ => Err(OrchestraError::UnsupportedMethod {
                method: s.to_string(),
            }),
        }
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// `application/json`.
    Json(Value),
    /// `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
}

/// A fully resolved request handed to a [`Transport`].
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    /// Sent as `Authorization: Token <token>` when present.
    pub token: Option<String>,
    pub body: Option<RequestBody>,
}

/// Raw response returned by a [`Transport`].
#[derive(Debug, Clone, Default)]
pub struct TransportResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Whether the body is declared (or looks) textual, for logging.
    fn is_textual(&self) -> bool {
        self.content_type.as_deref().is_none_or(|ct| {
            ct.starts_with("application/json") || ct.starts_with("text/")
        })
    }
}

/// Executes requests against the backend.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse>;
}

/// reqwest-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build the HTTP client: no redirects, configured timeouts.
    pub fn new(config: &OrchestraConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| OrchestraError::InvalidConfig {
                detail: format!("failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse> {
        let TransportRequest {
            method,
            url,
            token,
            body,
        } = request;

        log::debug!(
            "{method} {url} (token: {})",
            token.as_deref().map_or_else(|| "none".to_string(), mask_secret)
        );

        let mut builder = self.client.request(method.to_reqwest(), url.clone());
        if let Some(token) = &token {
            builder = builder.header(AUTHORIZATION, format!("Token {token}"));
        }
        builder = match body {
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Form(fields)) => builder.form(&fields),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                OrchestraError::Timeout {
                    detail: e.to_string(),
                }
            } else {
                OrchestraError::NetworkError {
                    detail: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        log::debug!("Response Status: {status}");

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| OrchestraError::NetworkError {
                detail: format!("Failed to read response body: {e}"),
            })?
            .to_vec();

        let response = TransportResponse {
            status,
            content_type,
            body,
        };
        if response.is_textual() {
            log::debug!(
                "Response Body: {}",
                truncate_for_log(&String::from_utf8_lossy(&response.body))
            );
        } else {
            log::debug!("Response Body: {}", describe_bytes(&response.body));
        }

        Ok(response)
    }
}
