//! Log sanitization utilities
//!
//! Keeps auth tokens, passwords and large payloads (bill PDFs, long account
//! listings) out of debug/error logs.

/// Maximum number of bytes of a body included in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Number of leading characters of a secret that stay visible.
const SECRET_VISIBLE_PREFIX: usize = 4;

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a string for safe logging.
///
/// Returns the original string if it's within the limit, otherwise the first
/// `TRUNCATE_LIMIT` bytes with a suffix giving the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Describe a binary body without dumping it.
pub fn describe_bytes(data: &[u8]) -> String {
    format!("<{} bytes>", data.len())
}

/// Mask a secret (token, password) keeping a short prefix for correlation.
pub fn mask_secret(secret: &str) -> String {
    let visible = floor_char_boundary(secret, SECRET_VISIBLE_PREFIX);
    if secret.len() <= SECRET_VISIBLE_PREFIX * 2 {
        "****".to_string()
    } else {
        format!("{}****", &secret[..visible])
    }
}
