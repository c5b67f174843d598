use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ApiModel, default_true, null_as_default};

/// An issued bill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub number: String,
    /// `INVOICE`, `AMENDMENTINVOICE`, `FEE`, ...
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub bill_type: String,
    /// Exact decimal text as sent by the backend, e.g. `"35.40"`.
    #[serde(
        default = "crate::utils::decimal::zero",
        deserialize_with = "crate::utils::decimal::deserialize"
    )]
    pub total: String,
    #[serde(default)]
    pub is_sent: bool,
    #[serde(default, with = "crate::utils::datetime::date")]
    pub created_on: Option<NaiveDate>,
    #[serde(default, with = "crate::utils::datetime::date")]
    pub due_on: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: String,
}

impl ApiModel for Bill {
    const SERVICE: &'static str = "bill";
    const REQUIRED_FIELDS: &'static [&'static str] = &["id", "number"];
}

impl Bill {
    /// `total` as a float, for display and sorting only.
    pub fn total_amount(&self) -> Option<f64> {
        self.total.parse().ok()
    }
}

/// A payment method registered on the account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentSource {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    /// `SEPADirectDebit`, `CreditCard`, ...
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: String,
    /// Method-specific details (IBAN, holder name), kept opaque.
    #[serde(default)]
    pub data: Value,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl ApiModel for PaymentSource {
    const SERVICE: &'static str = "payment-source";
}

/// Downloaded bill document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillDocument {
    /// Bill id the document belongs to.
    pub id: String,
    /// `Content-Type` reported by the backend, usually `application/pdf`.
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl BillDocument {
    pub fn is_pdf(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/pdf"))
            || self.data.starts_with(b"%PDF")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn bill_total_as_string() {
        let bill: Bill = serde_json::from_value(json!({
            "id": 12,
            "number": "F2020-0012",
            "type": "INVOICE",
            "total": "35.40",
            "is_sent": true,
            "created_on": "2020-01-31",
            "due_on": "2020-02-29"
        }))
        .unwrap();
        assert_eq!(bill.total, "35.40");
        assert!((bill.total_amount().unwrap() - 35.4).abs() < f64::EPSILON);
        assert_eq!(bill.due_on, NaiveDate::from_ymd_opt(2020, 2, 29));
    }

    #[test]
    fn bill_total_as_number_and_missing_dates() {
        let bill: Bill = serde_json::from_value(json!({"id": 1, "total": 10})).unwrap();
        assert_eq!(bill.total, "10");
        assert!(bill.created_on.is_none());
        assert!(bill.number.is_empty());
    }

    #[test]
    fn bill_total_missing_is_zero() {
        let bill: Bill = serde_json::from_value(json!({"id": 1, "number": "F-1"})).unwrap();
        assert_eq!(bill.total, "0");
        assert_eq!(bill.total_amount(), Some(0.0));
    }

    #[test]
    fn bill_total_serializes_as_text() {
        let bill: Bill = serde_json::from_value(json!({"id": 1, "total": "0.10"})).unwrap();
        assert_eq!(serde_json::to_value(&bill).unwrap()["total"], "0.10");
    }

    #[test]
    fn payment_source() {
        let source: PaymentSource = serde_json::from_value(json!({
            "id": 2,
            "method": "SEPADirectDebit",
            "data": {"iban": "ES0000000000000000000000", "name": "Ana"}
        }))
        .unwrap();
        assert!(source.is_active);
        assert_eq!(source.data["name"], "Ana");
    }

    #[test]
    fn pdf_detection() {
        let document = BillDocument {
            id: "12".into(),
            content_type: None,
            data: b"%PDF-1.4 ...".to_vec(),
        };
        assert!(document.is_pdf());
        let document = BillDocument {
            id: "12".into(),
            content_type: Some("text/html".into()),
            data: b"<html>".to_vec(),
        };
        assert!(!document.is_pdf());
    }
}
