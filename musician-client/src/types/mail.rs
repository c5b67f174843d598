//! Mail addresses, mailboxes and the address → mail service grouping.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{ApiModel, DomainRef, MailboxRef, default_true, null_as_default};
use crate::config::AddressGrouping;
use crate::error::{OrchestraError, Result};
use crate::usage::UsageQuota;

/// One raw row of `addresses/`: a single alias name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub domain: DomainRef,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mailboxes: Vec<MailboxRef>,
    /// Forward target; empty when the address only delivers to mailboxes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub forward: String,
}

impl ApiModel for AddressRecord {
    const SERVICE: &'static str = "address";
    const REQUIRED_FIELDS: &'static [&'static str] = &["id", "name", "domain"];
}

/// Key rows are grouped by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// Rows delivering to the same (first) mailbox.
    Mailbox(i64),
    /// A forward-only row stands alone, identified by its own address.
    Forward { name: String, domain_id: i64 },
}

impl AddressRecord {
    pub fn group_key(&self) -> GroupKey {
        match self.mailboxes.first() {
            Some(mailbox) => GroupKey::Mailbox(mailbox.id),
            None => GroupKey::Forward {
                name: self.name.clone(),
                domain_id: self.domain.id,
            },
        }
    }
}

/// Whether a mail service delivers to a mailbox or forwards elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailServiceType {
    Mailbox,
    Forward,
}

/// Type-specific detail shown next to a mail service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MailTypeDetail {
    /// Forward target.
    Forward(String),
    /// Mailbox disk usage.
    Mailbox(UsageQuota),
}

/// Mailbox-grouped address: every alias name sharing one mailbox, or one
/// forward-only address.
///
/// `id`, `url`, `domain`, `mailboxes` and `forward` come from the last row of
/// the group. Serialized output also carries the derived `mail_address`,
/// `aliases`, `type` and `type_detail`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MailService {
    pub id: i64,
    pub url: String,
    /// Alias names in backend order; the first is the primary address.
    pub names: Vec<String>,
    pub domain: DomainRef,
    pub mailboxes: Vec<MailboxRef>,
    pub forward: String,
}

impl From<AddressRecord> for MailService {
    fn from(record: AddressRecord) -> Self {
        Self {
            id: record.id,
            url: record.url,
            names: vec![record.name],
            domain: record.domain,
            mailboxes: record.mailboxes,
            forward: record.forward,
        }
    }
}

impl MailService {
    /// Primary address, `first-name@domain`.
    pub fn mail_address(&self) -> String {
        let name = self.names.first().map_or("", String::as_str);
        format!("{name}@{}", self.domain.name)
    }

    /// Remaining names as full addresses.
    pub fn aliases(&self) -> Vec<String> {
        self.names
            .iter()
            .skip(1)
            .map(|name| format!("{name}@{}", self.domain.name))
            .collect()
    }

    pub fn service_type(&self) -> MailServiceType {
        if self.forward.is_empty() {
            MailServiceType::Mailbox
        } else {
            MailServiceType::Forward
        }
    }

    pub fn type_detail(&self) -> MailTypeDetail {
        match self.service_type() {
            MailServiceType::Forward => MailTypeDetail::Forward(self.forward.clone()),
            // TODO: use the real figure once mailbox disk usage is exposed by the API.
            MailServiceType::Mailbox => {
                MailTypeDetail::Mailbox(UsageQuota::mailbox_disk_placeholder())
            }
        }
    }

    fn absorb(&mut self, record: AddressRecord) {
        self.names.push(record.name);
        self.id = record.id;
        self.url = record.url;
        self.domain = record.domain;
        self.mailboxes = record.mailboxes;
        self.forward = record.forward;
    }
}

#[derive(Serialize)]
struct MailServiceView<'a> {
    id: i64,
    url: &'a str,
    names: &'a [String],
    domain: &'a DomainRef,
    mailboxes: &'a [MailboxRef],
    forward: &'a str,
    mail_address: String,
    aliases: Vec<String>,
    #[serde(rename = "type")]
    service_type: MailServiceType,
    type_detail: MailTypeDetail,
}

impl Serialize for MailService {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        MailServiceView {
            id: self.id,
            url: &self.url,
            names: &self.names,
            domain: &self.domain,
            mailboxes: &self.mailboxes,
            forward: &self.forward,
            mail_address: self.mail_address(),
            aliases: self.aliases(),
            service_type: self.service_type(),
            type_detail: self.type_detail(),
        }
        .serialize(serializer)
    }
}

/// Fold raw address rows into mail services.
///
/// With [`AddressGrouping::ContiguousRuns`] only neighbouring rows with equal
/// keys are merged, so the backend ordering decides the result. With
/// [`AddressGrouping::ByKey`] all rows with equal keys are merged and groups
/// keep the order of their first row.
pub fn group_addresses(records: Vec<AddressRecord>, grouping: AddressGrouping) -> Vec<MailService> {
    match grouping {
        AddressGrouping::ContiguousRuns => group_runs(records),
        AddressGrouping::ByKey => group_by_key(records),
    }
}

fn group_runs(records: Vec<AddressRecord>) -> Vec<MailService> {
    let mut groups: Vec<MailService> = Vec::new();
    let mut current_key: Option<GroupKey> = None;

    for record in records {
        let key = record.group_key();
        match groups.last_mut() {
            Some(group) if current_key.as_ref() == Some(&key) => group.absorb(record),
            _ => {
                groups.push(MailService::from(record));
                current_key = Some(key);
            }
        }
    }
    groups
}

fn group_by_key(records: Vec<AddressRecord>) -> Vec<MailService> {
    let mut groups: Vec<MailService> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for record in records {
        let key = record.group_key();
        if let Some(&position) = index.get(&key) {
            groups[position].absorb(record);
        } else {
            index.insert(key, groups.len());
            groups.push(MailService::from(record));
        }
    }
    groups
}

/// An address owned by a mailbox.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailboxAddress {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub domain: DomainRef,
}

impl MailboxAddress {
    pub fn full_address(&self) -> String {
        format!("{}@{}", self.name, self.domain.name)
    }
}

/// A physical mailbox.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mailbox {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Spam filtering mode (`REDIRECT`, `DISABLE`, ...).
    #[serde(default, deserialize_with = "null_as_default")]
    pub filtering: String,
    /// Default `true`.
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub addresses: Vec<MailboxAddress>,
}

impl ApiModel for Mailbox {
    const SERVICE: &'static str = "mailbox";
    const REQUIRED_FIELDS: &'static [&'static str] = &["id", "name"];
}

/// Body of an address create/update call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewMailAddress {
    pub name: String,
    /// `url` of the target domain.
    pub domain_url: String,
    /// `url`s of the mailboxes the address delivers to.
    pub mailbox_urls: Vec<String>,
    /// Forward target, empty for none.
    pub forward: String,
}

impl NewMailAddress {
    /// An address needs a name, a domain, and a mailbox or a forward.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(invalid("name", "must not be empty"));
        }
        if self.name.contains('@') {
            return Err(invalid("name", "must be the local part only"));
        }
        if self.domain_url.trim().is_empty() {
            return Err(invalid("domain", "must not be empty"));
        }
        if self.mailbox_urls.is_empty() && self.forward.trim().is_empty() {
            return Err(invalid(
                "mailboxes",
                "a mailbox or forward address should be provided",
            ));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "domain": {"url": self.domain_url},
            "mailboxes": self
                .mailbox_urls
                .iter()
                .map(|url| json!({"url": url}))
                .collect::<Vec<_>>(),
            "forward": self.forward,
        })
    }
}

fn invalid(param: &str, detail: &str) -> OrchestraError {
    OrchestraError::InvalidParameter {
        param: param.to_string(),
        detail: detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn domain(id: i64, name: &str) -> DomainRef {
        DomainRef {
            id,
            url: format!("https://panel.example.org/api/domains/{id}/"),
            name: name.to_string(),
        }
    }

    fn mailbox(id: i64) -> MailboxRef {
        MailboxRef {
            id,
            url: format!("https://panel.example.org/api/mailboxes/{id}/"),
            name: format!("box{id}"),
        }
    }

    fn row(id: i64, name: &str, mailboxes: Vec<MailboxRef>, forward: &str) -> AddressRecord {
        AddressRecord {
            id,
            url: format!("https://panel.example.org/api/addresses/{id}/"),
            name: name.to_string(),
            domain: domain(1, "example.org"),
            mailboxes,
            forward: forward.to_string(),
        }
    }

    #[test]
    fn forward_type_and_detail() {
        let service = MailService::from(row(1, "info", vec![], "ana@elsewhere.net"));
        assert_eq!(service.service_type(), MailServiceType::Forward);
        assert_eq!(
            service.type_detail(),
            MailTypeDetail::Forward("ana@elsewhere.net".into())
        );
    }

    #[test]
    fn mailbox_type() {
        let service = MailService::from(row(1, "ana", vec![mailbox(5)], ""));
        assert_eq!(service.service_type(), MailServiceType::Mailbox);
        assert!(matches!(service.type_detail(), MailTypeDetail::Mailbox(_)));
    }

    #[test]
    fn addresses_and_aliases() {
        let mut service = MailService::from(row(1, "ana", vec![mailbox(5)], ""));
        service.names.push("a.garcia".into());
        service.names.push("contact".into());
        assert_eq!(service.mail_address(), "ana@example.org");
        assert_eq!(
            service.aliases(),
            ["a.garcia@example.org", "contact@example.org"]
        );
    }

    #[test]
    fn serialized_service_carries_derived_fields() {
        let mut service = MailService::from(row(1, "ana", vec![mailbox(5)], ""));
        service.names.push("contact".into());
        let value = serde_json::to_value(&service).unwrap();
        assert_eq!(value["mail_address"], "ana@example.org");
        assert_eq!(value["aliases"], json!(["contact@example.org"]));
        assert_eq!(value["type"], "mailbox");
        assert_eq!(value["type_detail"]["percent"], 0);
        assert_eq!(value["names"], json!(["ana", "contact"]));

        let forward = MailService::from(row(2, "info", vec![], "ana@elsewhere.net"));
        let value = serde_json::to_value(&forward).unwrap();
        assert_eq!(value["type"], "forward");
        assert_eq!(value["type_detail"], "ana@elsewhere.net");
        assert_eq!(value["aliases"], json!([]));
    }

    #[test]
    fn serialized_service_reads_back() {
        let service = MailService::from(row(1, "ana", vec![mailbox(5)], ""));
        let value = serde_json::to_value(&service).unwrap();
        let back: MailService = serde_json::from_value(value).unwrap();
        assert_eq!(back, service);
    }

    #[test]
    fn contiguous_run_of_three_is_one_group() {
        let rows = vec![
            row(1, "ana", vec![mailbox(5)], ""),
            row(2, "a.garcia", vec![mailbox(5)], ""),
            row(3, "contact", vec![mailbox(5)], ""),
        ];
        for grouping in [AddressGrouping::ContiguousRuns, AddressGrouping::ByKey] {
            let groups = group_addresses(rows.clone(), grouping);
            assert_eq!(groups.len(), 1, "{grouping:?}");
            assert_eq!(groups[0].names, ["ana", "a.garcia", "contact"]);
            assert_eq!(groups[0].id, 3);
        }
    }

    #[test]
    fn representative_fields_come_from_last_row() {
        let rows = vec![
            row(1, "ana", vec![mailbox(5)], ""),
            row(2, "ana2", vec![mailbox(5), mailbox(6)], "copy@elsewhere.net"),
        ];
        let groups = group_addresses(rows, AddressGrouping::ContiguousRuns);
        assert_eq!(groups[0].mailboxes.len(), 2);
        assert_eq!(groups[0].forward, "copy@elsewhere.net");
        assert_eq!(groups[0].url, "https://panel.example.org/api/addresses/2/");
    }

    #[test]
    fn pure_forwards_never_collapse() {
        let rows = vec![
            row(1, "info", vec![], "a@elsewhere.net"),
            row(2, "sales", vec![], "a@elsewhere.net"),
        ];
        for grouping in [AddressGrouping::ContiguousRuns, AddressGrouping::ByKey] {
            assert_eq!(group_addresses(rows.clone(), grouping).len(), 2);
        }
    }

    #[test]
    fn same_forward_name_on_other_domain_stays_apart() {
        let mut other = row(2, "info", vec![], "b@elsewhere.net");
        other.domain = domain(2, "example.net");
        let rows = vec![row(1, "info", vec![], "a@elsewhere.net"), other];
        assert_eq!(group_addresses(rows, AddressGrouping::ByKey).len(), 2);
    }

    #[test]
    fn non_contiguous_rows_depend_on_grouping() {
        let rows = vec![
            row(1, "ana", vec![mailbox(5)], ""),
            row(2, "bob", vec![mailbox(7)], ""),
            row(3, "a.garcia", vec![mailbox(5)], ""),
        ];

        let runs = group_addresses(rows.clone(), AddressGrouping::ContiguousRuns);
        assert_eq!(runs.len(), 3);

        let by_key = group_addresses(rows, AddressGrouping::ByKey);
        assert_eq!(by_key.len(), 2);
        assert_eq!(by_key[0].names, ["ana", "a.garcia"]);
        assert_eq!(by_key[1].names, ["bob"]);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(group_addresses(Vec::new(), AddressGrouping::ByKey).is_empty());
        assert!(group_addresses(Vec::new(), AddressGrouping::ContiguousRuns).is_empty());
    }

    #[test]
    fn decodes_address_row() {
        let record: AddressRecord = serde_json::from_value(json!({
            "url": "https://panel.example.org/api/addresses/4/",
            "id": 4,
            "name": "info",
            "domain": {
                "url": "https://panel.example.org/api/domains/1/",
                "id": 1,
                "name": "example.org"
            },
            "mailboxes": [],
            "forward": null
        }))
        .unwrap();
        assert!(record.forward.is_empty());
        assert_eq!(record.domain.name, "example.org");
        assert_eq!(
            record.group_key(),
            GroupKey::Forward {
                name: "info".into(),
                domain_id: 1
            }
        );
    }

    #[test]
    fn decodes_mailbox() {
        let mailbox: Mailbox = serde_json::from_value(json!({
            "id": 5,
            "name": "ana",
            "addresses": [{"id": 1, "name": "ana", "domain": {"id": 1, "name": "example.org"}}]
        }))
        .unwrap();
        assert!(mailbox.is_active);
        assert_eq!(mailbox.addresses[0].full_address(), "ana@example.org");
    }

    #[test]
    fn new_address_requires_target() {
        let address = NewMailAddress {
            name: "info".into(),
            domain_url: "https://panel.example.org/api/domains/1/".into(),
            ..NewMailAddress::default()
        };
        assert!(matches!(
            address.validate(),
            Err(OrchestraError::InvalidParameter { ref param, .. }) if param == "mailboxes"
        ));
    }

    #[test]
    fn new_address_rejects_full_address_as_name() {
        let address = NewMailAddress {
            name: "info@example.org".into(),
            domain_url: "https://panel.example.org/api/domains/1/".into(),
            forward: "a@b.c".into(),
            ..NewMailAddress::default()
        };
        assert!(address.validate().is_err());
    }

    #[test]
    fn new_address_body_shape() {
        let address = NewMailAddress {
            name: "info".into(),
            domain_url: "https://panel.example.org/api/domains/1/".into(),
            mailbox_urls: vec!["https://panel.example.org/api/mailboxes/5/".into()],
            forward: String::new(),
        };
        assert!(address.validate().is_ok());
        assert_eq!(
            address.to_json(),
            json!({
                "name": "info",
                "domain": {"url": "https://panel.example.org/api/domains/1/"},
                "mailboxes": [{"url": "https://panel.example.org/api/mailboxes/5/"}],
                "forward": ""
            })
        );
    }
}
