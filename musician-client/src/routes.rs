//! Logical route registry.
//!
//! Call sites name backend resources (`"domain-list"`, `"bill-document"`)
//! instead of hard-coding paths. Paths are relative to the configured API
//! root except the token endpoint, which is rooted at the host.

use url::Url;

use crate::error::{OrchestraError, Result};

/// Placeholder substituted with a resource identifier.
const PK_PLACEHOLDER: &str = "{pk}";

/// Logical name → relative path template.
pub const API_PATHS: &[(&str, &str)] = &[
    // auth
    ("token-auth", "/api-token-auth/"),
    ("my-account", "accounts/"),
    // services
    ("database-list", "databases/"),
    ("domain-list", "domains/"),
    ("domain-detail", "domains/{pk}/"),
    ("address-list", "addresses/"),
    ("address-detail", "addresses/{pk}/"),
    ("mailbox-list", "mailboxes/"),
    ("mailbox-detail", "mailboxes/{pk}/"),
    ("mailbox-password", "mailboxes/{pk}/set_password/"),
    ("mailinglist-list", "lists/"),
    ("saas-list", "saas/"),
    ("website-list", "websites/"),
    // other
    ("bill-list", "bills/"),
    ("bill-document", "bills/{pk}/document/"),
    ("payment-source-list", "payment-sources/"),
];

/// Look up the path template registered for `name`.
pub fn resolve(name: &str) -> Result<&'static str> {
    API_PATHS
        .iter()
        .find(|(route, _)| *route == name)
        .map(|(_, path)| *path)
        .ok_or_else(|| OrchestraError::NoReverseMatch {
            name: name.to_string(),
        })
}

/// Whether a route with this name exists.
pub fn is_registered(name: &str) -> bool {
    API_PATHS.iter().any(|(route, _)| *route == name)
}

/// Resolve `name` and join it onto `base`, substituting `pk` when given.
///
/// The identifier is percent-encoded as a single path segment.
pub fn build_absolute_uri(base: &Url, name: &str, pk: Option<&str>) -> Result<Url> {
    let template = resolve(name)?;
    let path = match pk {
        Some(pk) => template.replace(PK_PLACEHOLDER, &urlencoding::encode(pk)),
        None if template.contains(PK_PLACEHOLDER) => {
            return Err(OrchestraError::InvalidUrl {
                url: template.to_string(),
                detail: format!("route '{name}' needs an identifier"),
            });
        }
        None => template.to_string(),
    };
    base.join(&path).map_err(|e| OrchestraError::InvalidUrl {
        url: path,
        detail: e.to_string(),
    })
}

/// Append a raw query string (`domain=3`) to `url`, replacing any existing one.
pub fn with_querystring(mut url: Url, querystring: Option<&str>) -> Url {
    if let Some(qs) = querystring.map(|q| q.trim_start_matches('?'))
        && !qs.is_empty()
    {
        url.set_query(Some(qs));
    }
    url
}
