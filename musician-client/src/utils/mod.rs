//! Utility modules.

/// Date/time serde helpers for backend timestamps and calendar dates.
pub mod datetime;

/// Amount deserialization (number or decimal string).
pub mod decimal;

/// Log sanitization utilities to keep tokens and large bodies out of logs.
pub mod log_sanitizer;
