//! Request description and uniform response type.

use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::{OrchestraError, Result};
use crate::http_client::{Method, RequestBody, TransportResponse};
use crate::utils::log_sanitizer::truncate_for_log;

/// Where a request goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A logical route name from the registry.
    Resource(String),
    /// A logical route with its `{pk}` placeholder filled in.
    Detail { resource: String, pk: String },
    /// A fully qualified URL (e.g. a `url` field returned by the backend).
    Url(String),
}

/// How the response body should be rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Rendering {
    /// Parse as JSON. Empty bodies (204, HEAD) become [`ResponseBody::Empty`].
    #[default]
    Json,
    /// Keep the raw bytes (documents, PDFs).
    Raw,
}

/// A request to the backend, built step by step.
///
/// ```
/// use musician_client::{ApiRequest, Method};
///
/// let request = ApiRequest::new(Method::Get)
///     .resource("address-list")
///     .querystring("domain=3");
/// ```
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub target: Option<Target>,
    pub querystring: Option<String>,
    pub rendering: Rendering,
    pub body: Option<RequestBody>,
}

impl ApiRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            target: None,
            querystring: None,
            rendering: Rendering::Json,
            body: None,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::Get)
    }

    /// Target a logical route. Replaces any previous target.
    #[must_use]
    pub fn resource(mut self, name: impl Into<String>) -> Self {
        self.target = Some(Target::Resource(name.into()));
        self
    }

    /// Target a templated route with its identifier.
    #[must_use]
    pub fn detail(mut self, name: impl Into<String>, pk: impl ToString) -> Self {
        self.target = Some(Target::Detail {
            resource: name.into(),
            pk: pk.to_string(),
        });
        self
    }

    /// Target a fully qualified URL. Replaces any previous target.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.target = Some(Target::Url(url.into()));
        self
    }

    #[must_use]
    pub fn querystring(mut self, querystring: impl Into<String>) -> Self {
        self.querystring = Some(querystring.into());
        self
    }

    #[must_use]
    pub fn raw(mut self) -> Self {
        self.rendering = Rendering::Raw;
        self
    }

    #[must_use]
    pub fn json_body(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    #[must_use]
    pub fn form_body(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = Some(RequestBody::Form(fields));
        self
    }
}

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Raw(Vec<u8>),
    Empty,
}

/// Response of any request: the status is always available, callers choose
/// between [`error_for_status`](Self::error_for_status) and inspecting it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub url: Url,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: ResponseBody,
}

impl ApiResponse {
    /// Decode a transport response according to `rendering`.
    ///
    /// Error responses (>= 400) that are not JSON are kept raw instead of
    /// failing, so the status can still be inspected.
    pub(crate) fn decode(url: Url, raw: TransportResponse, rendering: Rendering) -> Result<Self> {
        let body = if raw.body.is_empty() {
            ResponseBody::Empty
        } else {
            match rendering {
                Rendering::Raw => ResponseBody::Raw(raw.body),
                Rendering::Json => match serde_json::from_slice::<Value>(&raw.body) {
                    Ok(value) => ResponseBody::Json(value),
                    Err(_) if raw.status >= 400 => ResponseBody::Raw(raw.body),
                    Err(e) => {
                        log::error!("JSON parse failed for {url}: {e}");
                        log::error!(
                            "Raw response: {}",
                            truncate_for_log(&String::from_utf8_lossy(&raw.body))
                        );
                        return Err(OrchestraError::ParseError {
                            detail: e.to_string(),
                        });
                    }
                },
            }
        };

        Ok(Self {
            url,
            status: raw.status,
            content_type: raw.content_type,
            body,
        })
    }

    pub fn is_success(&self) -> bool {
        self.status < 400
    }

    /// Turn a >= 400 status into [`OrchestraError::Http`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(OrchestraError::Http {
                status: self.status,
                url: self.url.to_string(),
                body: self.body_text(),
            })
        }
    }

    /// Body as text, for error messages.
    pub fn body_text(&self) -> String {
        match &self.body {
            ResponseBody::Json(value) => value.to_string(),
            ResponseBody::Raw(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            ResponseBody::Empty => String::new(),
        }
    }

    /// JSON payload; `Null` for empty bodies.
    pub fn into_json(self) -> Result<Value> {
        match self.body {
            ResponseBody::Json(value) => Ok(value),
            ResponseBody::Empty => Ok(Value::Null),
            ResponseBody::Raw(_) => Err(OrchestraError::ParseError {
                detail: format!("response from {} is not JSON", self.url),
            }),
        }
    }

    /// Deserialize the JSON payload into `T`.
    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        let value = self.into_json()?;
        serde_json::from_value(value).map_err(|e| OrchestraError::ParseError {
            detail: e.to_string(),
        })
    }

    /// Raw bytes of the body (JSON bodies are re-serialized).
    pub fn into_bytes(self) -> Vec<u8> {
        match self.body {
            ResponseBody::Raw(bytes) => bytes,
            ResponseBody::Json(value) => value.to_string().into_bytes(),
            ResponseBody::Empty => Vec::new(),
        }
    }
}
