//! Resource usage annotations and percent bucketing.

use serde::{Deserialize, Serialize};

/// Display steps a usage percent is snapped to.
pub const PERCENT_STEPS: [u8; 5] = [0, 25, 50, 75, 100];

/// Snap `numerator / denominator` to one of [`PERCENT_STEPS`].
///
/// The ratio is scaled to a percent, clamped to `[0, 100]` and rounded to the
/// nearest quarter (ties go to the even quarter, so 12.5% → 0 and 37.5% → 50).
/// A zero denominator or a NaN input yields `0`; ratios that overflow to
/// infinity are clamped like any other out-of-range value.
///
/// ```
/// use musician_client::bucket;
///
/// assert_eq!(bucket(26.0, 100.0), 25);
/// assert_eq!(bucket(48.0, 100.0), 50);
/// assert_eq!(bucket(200.0, 100.0), 100);
/// assert_eq!(bucket(5.0, 0.0), 0);
/// ```
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::float_cmp
)]
pub fn bucket(numerator: f64, denominator: f64) -> u8 {
    if denominator == 0.0 {
        return 0;
    }
    let percent = 100.0 * numerator / denominator;
    if percent.is_nan() {
        return 0;
    }
    let quarters = (percent.clamp(0.0, 100.0) / 25.0).round_ties_even();
    // quarters is within 0.0..=4.0 here
    let index = quarters as usize;
    PERCENT_STEPS[index.min(PERCENT_STEPS.len() - 1)]
}

/// Usage-vs-quota annotation attached to domains, mailboxes and accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageQuota {
    /// Amount in use.
    pub usage: f64,
    /// Allowed amount.
    pub total: f64,
    /// Unit label (`MB`, `mailboxes`, ...).
    pub unit: String,
    /// Bucketed percent, see [`bucket`].
    pub percent: u8,
}

impl UsageQuota {
    /// Build an annotation, computing the bucketed percent.
    pub fn new(usage: f64, total: f64, unit: impl Into<String>) -> Self {
        Self {
            usage,
            total,
            unit: unit.into(),
            percent: bucket(usage, total),
        }
    }

    /// Disk usage shown for a domain.
    ///
    /// The backend exposes no disk accounting yet, so every domain carries the
    /// same fixed figure.
    // TODO: replace once the backend reports per-domain disk usage.
    pub fn domain_disk_placeholder() -> Self {
        Self::new(300.0, 650.0, "MB")
    }

    /// Disk usage shown for a mailbox until the backend reports it.
    pub fn mailbox_disk_placeholder() -> Self {
        Self::new(0.0, 213.0, "MB")
    }
}

impl Default for UsageQuota {
    fn default() -> Self {
        Self::new(0.0, 0.0, "")
    }
}
