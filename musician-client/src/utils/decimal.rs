//! Amount deserialization.
//!
//! Money fields come back either as decimal strings (`"12.50"`) or as JSON
//! numbers. They are kept as decimal text so no precision is lost; absent,
//! `null` and empty values become `"0"`.

use serde::{Deserialize, Deserializer};

pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Integer(i64),
        Float(f64),
        String(String),
    }

    match Option::<Amount>::deserialize(deserializer)? {
        Some(Amount::Integer(n)) => Ok(n.to_string()),
        Some(Amount::Float(n)) => Ok(n.to_string()),
        Some(Amount::String(s)) if s.trim().is_empty() => Ok(zero()),
        Some(Amount::String(s)) if is_decimal(s.trim()) => Ok(s.trim().to_string()),
        Some(Amount::String(s)) => Err(Error::custom(format!("Invalid amount '{s}'"))),
        None => Ok(zero()),
    }
}

/// Value used for missing amounts.
pub fn zero() -> String {
    "0".to_string()
}

/// Plain decimal notation: optional sign, digits, optional fraction.
pub fn is_decimal(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    !(whole.is_empty() && fraction.is_empty())
        && all_digits(whole)
        && all_digits(fraction)
}
