use serde::Serialize;
use thiserror::Error;

/// Unified error type for all orchestra client operations.
///
/// Variants are serializable (tagged by `code`) so callers can forward them as
/// structured error reports.
///
/// # Soft failures
///
/// Two conditions are deliberately *not* errors:
/// - a login that yields no token leaves
///   [`Orchestra::auth_token`](crate::Orchestra::auth_token) unset;
/// - an invalid or expired token makes
///   [`Orchestra::verify_credentials`](crate::Orchestra::verify_credentials) return
///   [`CredentialStatus::Invalid`](crate::CredentialStatus::Invalid).
#[derive(Error, Debug, Clone, Serialize)]
#[serde(tag = "code")]
pub enum OrchestraError {
    /// The logical route name is not registered.
    #[error("Not found API path name '{name}'")]
    NoReverseMatch {
        /// Requested route name.
        name: String,
    },

    /// A request was built without a resource name or URL.
    #[error("Provide `resource` or `url` params")]
    MissingTarget,

    /// The HTTP verb is outside HEAD/GET/POST/PATCH/PUT/DELETE.
    #[error("Unsupported HTTP method: {method}")]
    UnsupportedMethod {
        /// The rejected verb.
        method: String,
    },

    /// A URL could not be built or parsed.
    #[error("Invalid URL '{url}': {detail}")]
    InvalidUrl {
        /// The offending URL or path.
        url: String,
        /// Parser message.
        detail: String,
    },

    /// The backend answered with a status code >= 400.
    #[error("HTTP {status} for {url}")]
    Http {
        /// Response status code.
        status: u16,
        /// Requested URL.
        url: String,
        /// Response body, lossily decoded.
        body: String,
    },

    /// The caller is anonymous or its token lacks access.
    #[error("Permission denied: {detail}")]
    PermissionDenied {
        /// Human-readable explanation.
        detail: String,
    },

    /// A detail resource does not exist (HTTP 404).
    #[error("No {resource} found matching the query (id '{id}')")]
    NotFound {
        /// Kind of resource (`domain`, `bill`, ...).
        resource: String,
        /// Requested identifier.
        id: String,
    },

    /// No `<service>-list` route is registered for this service.
    #[error("Unknown service {service}")]
    UnknownService {
        /// Requested service name.
        service: String,
    },

    /// Network-level failure (DNS, connection refused, reset, ...).
    #[error("Network error: {detail}")]
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The request timed out.
    #[error("Request timeout: {detail}")]
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("Parse error: {detail}")]
    ParseError {
        /// Details about the parse failure.
        detail: String,
    },

    /// A payload is missing a field the strict schema policy requires.
    #[error("{model} payload is missing required field '{field}'")]
    SchemaViolation {
        /// Model being decoded.
        model: String,
        /// Missing field name.
        field: String,
    },

    /// A value passed to a mutation call is invalid.
    #[error("Invalid parameter '{param}': {detail}")]
    InvalidParameter {
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// An operation needing a token was called on a client without one.
    #[error("Client has no auth token")]
    NotAuthenticated,

    /// Configuration value rejected at construction time.
    #[error("Invalid configuration: {detail}")]
    InvalidConfig {
        /// What was wrong.
        detail: String,
    },
}

impl OrchestraError {
    /// Whether the error is expected behaviour (user input, missing resource,
    /// expired session), used to pick the log level.
    ///
    /// `true` should be logged at `warn`, `false` at `error`.
    /// **Keep this in sync when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied { .. }
                | Self::NotFound { .. }
                | Self::NotAuthenticated
                | Self::InvalidParameter { .. }
                | Self::Http {
                    status: 400..=499,
                    ..
                }
        )
    }

    /// HTTP status carried by the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}

/// Convenience type alias for `Result<T, OrchestraError>`.
pub type Result<T> = std::result::Result<T, OrchestraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_no_reverse_match() {
        let e = OrchestraError::NoReverseMatch {
            name: "foo-list".to_string(),
        };
        assert_eq!(e.to_string(), "Not found API path name 'foo-list'");
    }

    #[test]
    fn display_not_found() {
        let e = OrchestraError::NotFound {
            resource: "domain".to_string(),
            id: "3".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "No domain found matching the query (id '3')"
        );
    }

    #[test]
    fn display_http() {
        let e = OrchestraError::Http {
            status: 500,
            url: "https://panel.example.org/api/domains/".to_string(),
            body: "boom".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "HTTP 500 for https://panel.example.org/api/domains/"
        );
    }

    #[test]
    fn display_unknown_service() {
        let e = OrchestraError::UnknownService {
            service: "ftp".to_string(),
        };
        assert_eq!(e.to_string(), "Unknown service ftp");
    }

    #[test]
    fn serialize_is_tagged_by_code() {
        let e = OrchestraError::NotFound {
            resource: "bill".to_string(),
            id: "42".to_string(),
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"code\":\"NotFound\""));
        assert!(json.contains("\"id\":\"42\""));
    }

    #[test]
    fn expected_errors() {
        assert!(OrchestraError::NotAuthenticated.is_expected());
        assert!(
            OrchestraError::PermissionDenied {
                detail: "anonymous".into()
            }
            .is_expected()
        );
        assert!(
            OrchestraError::Http {
                status: 403,
                url: String::new(),
                body: String::new(),
            }
            .is_expected()
        );
        assert!(
            !OrchestraError::Http {
                status: 502,
                url: String::new(),
                body: String::new(),
            }
            .is_expected()
        );
        assert!(!OrchestraError::MissingTarget.is_expected());
        assert!(
            !OrchestraError::ParseError {
                detail: "bad".into()
            }
            .is_expected()
        );
    }

    #[test]
    fn status_of_errors() {
        let not_found = OrchestraError::NotFound {
            resource: "domain".into(),
            id: "1".into(),
        };
        assert_eq!(not_found.status(), Some(404));
        assert_eq!(OrchestraError::MissingTarget.status(), None);
    }
}
