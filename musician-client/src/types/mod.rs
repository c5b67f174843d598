//! Resource models.
//!
//! Every model is a typed snapshot of one backend payload. Unknown fields are
//! dropped; missing fields take the default declared on the field. How strict
//! decoding is depends on the configured [`SchemaPolicy`].

mod account;
mod billing;
mod domain;
mod mail;
mod service;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::config::SchemaPolicy;
use crate::error::{OrchestraError, Result};

pub use account::{BillingContact, UserAccount};
pub use billing::{Bill, BillDocument, PaymentSource};
pub use domain::{Domain, DomainRecord};
pub use mail::{
    AddressRecord, GroupKey, MailService, MailServiceType, MailTypeDetail, Mailbox,
    MailboxAddress, NewMailAddress, group_addresses,
};
pub use service::{
    DatabaseService, DatabaseUser, MailinglistService, SaasService, WebApp, WebSite,
    WebSiteContent,
};

/// A model decoded from backend JSON.
pub trait ApiModel: DeserializeOwned {
    /// Service name; the list route is `<SERVICE>-list` when one exists.
    const SERVICE: &'static str;

    /// Fields that must be present (and non-null) under [`SchemaPolicy::Strict`].
    const REQUIRED_FIELDS: &'static [&'static str] = &["id"];
}

/// Reference to a domain embedded in other payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRef {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// Reference to a mailbox embedded in address payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailboxRef {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// Decode one model from a JSON object.
pub fn parse_one<T: ApiModel>(value: Value, policy: SchemaPolicy) -> Result<T> {
    if !value.is_object() {
        return Err(OrchestraError::ParseError {
            detail: format!("expected a {} object, got {}", T::SERVICE, kind_of(&value)),
        });
    }
    if policy == SchemaPolicy::Strict {
        check_required::<T>(&value)?;
    }
    serde_json::from_value(value).map_err(|e| {
        log::error!("Failed to decode {} payload: {e}", T::SERVICE);
        OrchestraError::ParseError {
            detail: format!("{}: {e}", T::SERVICE),
        }
    })
}

/// Decode a JSON array of models.
///
/// Under the lenient policy a `null` payload is an empty list.
pub fn parse_list<T: ApiModel>(value: Value, policy: SchemaPolicy) -> Result<Vec<T>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| parse_one(item, policy))
            .collect(),
        Value::Null if policy == SchemaPolicy::Lenient => Ok(Vec::new()),
        other => Err(OrchestraError::ParseError {
            detail: format!("expected a {} list, got {}", T::SERVICE, kind_of(&other)),
        }),
    }
}

fn check_required<T: ApiModel>(value: &Value) -> Result<()> {
    for field in T::REQUIRED_FIELDS {
        if value.get(field).is_none_or(Value::is_null) {
            return Err(OrchestraError::SchemaViolation {
                model: T::SERVICE.to_string(),
                field: (*field).to_string(),
            });
        }
    }
    Ok(())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Treat an explicit `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn lenient_fills_missing_fields() {
        let domain: Domain = parse_one(json!({}), SchemaPolicy::Lenient).unwrap();
        assert_eq!(domain.id, 0);
        assert!(domain.name.is_empty());
        assert!(domain.records.is_empty());
    }

    #[test]
    fn strict_requires_id() {
        let err = parse_one::<Domain>(json!({"name": "example.org"}), SchemaPolicy::Strict)
            .unwrap_err();
        assert!(matches!(
            err,
            OrchestraError::SchemaViolation { ref model, ref field }
                if model == "domain" && field == "id"
        ));
    }

    #[test]
    fn strict_rejects_null_required_field() {
        let err = parse_one::<Domain>(json!({"id": null, "name": "x"}), SchemaPolicy::Strict)
            .unwrap_err();
        assert!(matches!(err, OrchestraError::SchemaViolation { .. }));
    }

    #[test]
    fn strict_accepts_complete_payload() {
        let domain: Domain = parse_one(
            json!({"id": 3, "name": "example.org", "records": []}),
            SchemaPolicy::Strict,
        )
        .unwrap();
        assert_eq!(domain.id, 3);
    }

    #[test]
    fn unknown_fields_are_dropped() {
        let domain: Domain = parse_one(
            json!({"id": 1, "name": "a.org", "shiny_new_field": {"x": 1}}),
            SchemaPolicy::Lenient,
        )
        .unwrap();
        assert_eq!(domain.name, "a.org");
    }

    #[test]
    fn wrong_type_is_parse_error() {
        let err = parse_one::<Domain>(json!({"id": "one"}), SchemaPolicy::Lenient).unwrap_err();
        assert!(matches!(err, OrchestraError::ParseError { .. }));
    }

    #[test]
    fn non_object_is_parse_error() {
        let err = parse_one::<Domain>(json!([1, 2]), SchemaPolicy::Lenient).unwrap_err();
        assert!(matches!(
            err,
            OrchestraError::ParseError { ref detail } if detail.contains("an array")
        ));
    }

    #[test]
    fn null_list_depends_on_policy() {
        let empty: Vec<Domain> = parse_list(Value::Null, SchemaPolicy::Lenient).unwrap();
        assert!(empty.is_empty());
        assert!(parse_list::<Domain>(Value::Null, SchemaPolicy::Strict).is_err());
    }

    #[test]
    fn null_fields_become_defaults() {
        let reference: DomainRef =
            serde_json::from_value(json!({"id": 2, "url": null, "name": null})).unwrap();
        assert_eq!(reference.id, 2);
        assert!(reference.url.is_empty());
    }
}
