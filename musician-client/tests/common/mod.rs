//! Shared test helpers: an in-memory transport and assertion macros.

#![allow(dead_code)]

use std::collections::HashMap;
use std::env;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use musician_client::{
    Method, Orchestra, OrchestraConfig, Result, Transport, TransportRequest, TransportResponse,
};
use serde_json::Value;

pub const BASE_URL: &str = "https://panel.example.org/api/";
pub const TOKEN: &str = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b";

/// Skip a test when any of the given environment variables is missing.
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("Skipping test: environment variable {} is not set", $var);
                return;
            }
        )+
    };
}

/// Assert a `Result` is `Ok` and unwrap it (fails the test otherwise).
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Transport answering from a table of scripted responses.
///
/// Responses are keyed by method and full URL (query string included).
/// Unscripted requests get a 404 with a JSON `detail`, like the backend.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<(Method, String), TransportResponse>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Script a JSON response for `method` on `path` (relative to [`BASE_URL`]
    /// unless absolute).
    pub fn on_json(&self, method: Method, path: &str, status: u16, body: Value) {
        self.on_raw(
            method,
            path,
            status,
            Some("application/json"),
            body.to_string().into_bytes(),
        );
    }

    pub fn on_raw(
        &self,
        method: Method,
        path: &str,
        status: u16,
        content_type: Option<&str>,
        body: Vec<u8>,
    ) {
        let response = TransportResponse {
            status,
            content_type: content_type.map(str::to_string),
            body,
        };
        self.responses
            .lock()
            .unwrap()
            .insert((method, absolute(path)), response);
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// URLs requested so far, in order.
    pub fn urls(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r.url.to_string())
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse> {
        let key = (request.method, request.url.to_string());
        self.requests.lock().unwrap().push(request);
        let scripted = self.responses.lock().unwrap().get(&key).cloned();
        Ok(scripted.unwrap_or_else(|| TransportResponse {
            status: 404,
            content_type: Some("application/json".to_string()),
            body: br#"{"detail":"Not found."}"#.to_vec(),
        }))
    }
}

pub fn absolute(path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else if let Some(rooted) = path.strip_prefix('/') {
        format!("https://panel.example.org/{rooted}")
    } else {
        format!("{BASE_URL}{path}")
    }
}

pub fn config() -> OrchestraConfig {
    OrchestraConfig::new(BASE_URL).unwrap()
}

/// Client holding [`TOKEN`] over the given mock.
pub fn client(mock: &Arc<MockTransport>) -> Orchestra {
    client_with(config(), mock)
}

pub fn client_with(config: OrchestraConfig, mock: &Arc<MockTransport>) -> Orchestra {
    let transport: Arc<dyn Transport> = mock.clone();
    Orchestra::with_transport(config, transport, None, Some(TOKEN.to_string()))
}

/// Settings for tests against a real backend.
pub fn live_client_settings() -> Option<(String, String, String)> {
    Some((
        env::var("MUSICIAN_API_BASE_URL").ok()?,
        env::var("MUSICIAN_USERNAME").ok()?,
        env::var("MUSICIAN_PASSWORD").ok()?,
    ))
}
