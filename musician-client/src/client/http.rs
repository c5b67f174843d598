//! Request execution.

use serde_json::Value;
use url::Url;

use super::Orchestra;
use crate::error::{OrchestraError, Result};
use crate::http_client::{Method, TransportRequest};
use crate::request::{ApiRequest, ApiResponse, Target};
use crate::routes;

impl Orchestra {
    /// Absolute URL a request points at, query string included.
    pub fn resolve_url(&self, request: &ApiRequest) -> Result<Url> {
        let base = &self.config.base_url;
        let url = match &request.target {
            Some(Target::Resource(name)) => routes::build_absolute_uri(base, name, None)?,
            Some(Target::Detail { resource, pk }) => {
                routes::build_absolute_uri(base, resource, Some(pk))?
            }
            Some(Target::Url(raw)) => Url::parse(raw).map_err(|e| OrchestraError::InvalidUrl {
                url: raw.clone(),
                detail: e.to_string(),
            })?,
            None => return Err(OrchestraError::MissingTarget),
        };
        Ok(routes::with_querystring(url, request.querystring.as_deref()))
    }

    /// Execute a request and return the response whatever its status.
    ///
    /// Routing, transport and decoding failures are still errors; a >= 400
    /// status is not. Use [`request`](Self::request) to fail on it.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.resolve_url(&request)?;
        let raw = self
            .transport
            .execute(TransportRequest {
                method: request.method,
                url: url.clone(),
                token: self.auth_token().map(str::to_string),
                body: request.body,
            })
            .await?;
        ApiResponse::decode(url, raw, request.rendering)
    }

    /// Execute a request, turning a >= 400 status into [`OrchestraError::Http`].
    pub async fn request(&self, request: ApiRequest) -> Result<ApiResponse> {
        let method = request.method;
        self.send(request)
            .await?
            .error_for_status()
            .inspect_err(|e| log_failure(method, e))
    }

    /// Like [`request`](Self::request), but a 404 becomes
    /// [`OrchestraError::NotFound`] for `resource` / `pk`.
    pub(super) async fn request_existing(
        &self,
        request: ApiRequest,
        resource: &str,
        pk: &str,
    ) -> Result<ApiResponse> {
        let method = request.method;
        let response = self.send(request).await?;
        if response.status == 404 {
            let error = OrchestraError::NotFound {
                resource: resource.to_string(),
                id: pk.to_string(),
            };
            log_failure(method, &error);
            return Err(error);
        }
        response
            .error_for_status()
            .inspect_err(|e| log_failure(method, e))
    }

    /// Fail fast when there is no token to send.
    pub(super) fn require_token(&self) -> Result<()> {
        if self.auth_token().is_none() {
            return Err(OrchestraError::NotAuthenticated);
        }
        Ok(())
    }

    /// Exchange username and password for a token.
    ///
    /// Returns `None` when the backend rejects the credentials or answers
    /// without a `token` field.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<String>> {
        let request = ApiRequest::new(Method::Post)
            .resource("token-auth")
            .form_body(vec![
                ("username".to_string(), username.to_string()),
                ("password".to_string(), password.to_string()),
            ]);
        let response = self.send(request).await?;
        if !response.is_success() {
            log::warn!(
                "Token request for '{username}' rejected with status {}",
                response.status
            );
            return Ok(None);
        }

        let token = match response.into_json()? {
            Value::Object(mut fields) => match fields.remove("token") {
                Some(Value::String(token)) if !token.is_empty() => Some(token),
                _ => None,
            },
            _ => None,
        };
        Ok(token)
    }
}

/// Log a failed call at a level matching how surprising it is.
pub(super) fn log_failure(method: Method, error: &OrchestraError) {
    if error.is_expected() {
        log::warn!("{method} failed: {error}");
    } else {
        log::error!("{method} failed: {error}");
    }
}
