use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ApiModel, DomainRef, default_true, null_as_default};

/// A mailing list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MailinglistService {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Local part of the list address, empty when the list has none.
    #[serde(default, deserialize_with = "null_as_default")]
    pub address_name: String,
    #[serde(default)]
    pub address_domain: Option<DomainRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub admin_email: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl ApiModel for MailinglistService {
    const SERVICE: &'static str = "mailinglist";
}

impl MailinglistService {
    /// `name@domain` of the list, if it has a posting address.
    pub fn address(&self) -> Option<String> {
        let domain = self.address_domain.as_ref()?;
        if self.address_name.is_empty() {
            return None;
        }
        Some(format!("{}@{}", self.address_name, domain.name))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseUser {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
}

/// A database and the users granted on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseService {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Engine (`mysql`, `postgresql`).
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub db_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: Vec<DatabaseUser>,
}

impl ApiModel for DatabaseService {
    const SERVICE: &'static str = "database";
    const REQUIRED_FIELDS: &'static [&'static str] = &["id", "name"];
}

/// A hosted SaaS instance (wordpress, moodle, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaasService {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub service: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Service-specific settings, kept opaque.
    #[serde(default)]
    pub data: Value,
}

impl ApiModel for SaasService {
    const SERVICE: &'static str = "saas";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebApp {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub app_type: String,
}

/// A web app mounted under a path of a website.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSiteContent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub webapp: WebApp,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSite {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub protocol: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub domains: Vec<DomainRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contents: Vec<WebSiteContent>,
}

impl ApiModel for WebSite {
    const SERVICE: &'static str = "website";
}

impl WebSite {
    pub fn serves_domain(&self, domain_id: i64) -> bool {
        self.domains.iter().any(|d| d.id == domain_id)
    }
}
