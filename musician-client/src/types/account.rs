use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiModel, default_true, null_as_default};

/// Billing contact attached to an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingContact {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub zipcode: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vat: String,
}

/// The caller's own account (first element of `accounts/`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    /// `INDIVIDUAL`, `ASSOCIATION`, ...; keys the quota table.
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub account_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub language: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, with = "crate::utils::datetime")]
    pub date_joined: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::utils::datetime")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub billcontact: BillingContact,
}

impl ApiModel for UserAccount {
    const SERVICE: &'static str = "account";
    const REQUIRED_FIELDS: &'static [&'static str] = &["id", "username"];
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_last_login_is_none() {
        let account: UserAccount = serde_json::from_value(json!({
            "id": 1,
            "username": "ana",
            "type": "INDIVIDUAL"
        }))
        .unwrap();
        assert_eq!(account.last_login, None);
        assert_eq!(account.date_joined, None);
        assert_eq!(account.account_type, "INDIVIDUAL");
        assert!(account.is_active);
    }

    #[test]
    fn parses_full_profile() {
        let account: UserAccount = serde_json::from_value(json!({
            "url": "https://panel.example.org/api/accounts/1/",
            "id": 1,
            "username": "ana",
            "type": "ASSOCIATION",
            "language": "ca",
            "short_name": "Ana",
            "full_name": "Ana Garcia",
            "is_active": true,
            "date_joined": "2019-03-04T10:00:00Z",
            "last_login": "2020-01-15T08:30:00+01:00",
            "billcontact": {
                "name": "Ana Garcia",
                "address": "Carrer Major 1",
                "city": "Barcelona",
                "zipcode": "08001",
                "country": "ES",
                "vat": "12345678Z"
            }
        }))
        .unwrap();
        assert_eq!(account.date_joined.map(|d| d.year()), Some(2019));
        assert_eq!(account.billcontact.city, "Barcelona");
        assert!(account.last_login.is_some());
    }

    #[test]
    fn null_billcontact_is_default() {
        let account: UserAccount =
            serde_json::from_value(json!({"id": 1, "billcontact": null})).unwrap();
        assert_eq!(account.billcontact, BillingContact::default());
    }
}
