use serde::{Deserialize, Serialize};

use super::{ApiModel, MailService, WebSite, null_as_default};
use crate::usage::UsageQuota;

/// One DNS record of a domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub record_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

/// A hosted domain.
///
/// `mails`, `websites` and `usage` are never read from the payload; they are
/// filled in by [`Orchestra::retrieve_domain_list`](crate::Orchestra::retrieve_domain_list).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Domain {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// In backend order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub records: Vec<DomainRecord>,
    #[serde(skip_deserializing)]
    pub mails: Vec<MailService>,
    #[serde(skip_deserializing)]
    pub websites: Vec<WebSite>,
    #[serde(skip_deserializing)]
    pub usage: UsageQuota,
}

impl ApiModel for Domain {
    const SERVICE: &'static str = "domain";
    const REQUIRED_FIELDS: &'static [&'static str] = &["id", "name"];
}

impl Domain {
    /// Records of one type (`A`, `MX`, ...), case-insensitive.
    pub fn records_of_type<'a>(
        &'a self,
        record_type: &'a str,
    ) -> impl Iterator<Item = &'a DomainRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| r.record_type.eq_ignore_ascii_case(record_type))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_records_in_order() {
        let domain: Domain = serde_json::from_value(json!({
            "url": "https://panel.example.org/api/domains/1/",
            "id": 1,
            "name": "example.org",
            "records": [
                {"type": "MX", "value": "10 mx1.example.org."},
                {"type": "A", "value": "192.0.2.10"},
                {"type": "MX", "value": "20 mx2.example.org."}
            ]
        }))
        .unwrap();
        assert_eq!(domain.records.len(), 3);
        assert_eq!(domain.records[1].record_type, "A");
        let mx: Vec<_> = domain.records_of_type("mx").map(|r| r.value.as_str()).collect();
        assert_eq!(mx, ["10 mx1.example.org.", "20 mx2.example.org."]);
    }

    #[test]
    fn enrichment_fields_are_not_read_from_payload() {
        let domain: Domain = serde_json::from_value(json!({
            "id": 1,
            "name": "example.org",
            "mails": [{"name": "x"}],
            "usage": {"usage": 1, "total": 1, "unit": "MB", "percent": 100}
        }))
        .unwrap();
        assert!(domain.mails.is_empty());
        assert_eq!(domain.usage, UsageQuota::default());
    }

    #[test]
    fn null_records_are_empty() {
        let domain: Domain = serde_json::from_value(json!({"id": 1, "records": null})).unwrap();
        assert!(domain.records.is_empty());
    }
}
