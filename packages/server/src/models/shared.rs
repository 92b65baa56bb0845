use serde::{Deserialize, Deserializer};

use crate::config::PaginationConfig;

/// A normalized, 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    /// Apply defaults and bounds to raw query values.
    ///
    /// * `page` absent or `< 1`    => 1
    /// * `per_page` absent or `< 1` => `config.default_per_page`
    /// * `per_page` above the max   => `config.max_per_page`
    pub fn from_query(page: Option<u64>, per_page: Option<u64>, config: &PaginationConfig) -> Self {
        let max_per_page = config.max_per_page.max(1);
        let per_page = match per_page {
            Some(n) if n >= 1 => n,
            _ => config.default_per_page,
        }
        .clamp(1, max_per_page);

        Self {
            page: page.unwrap_or(1).max(1),
            per_page,
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Serde helper for numeric query parameters that falls back to `None` on
/// anything that does not parse, instead of rejecting the request.
///
/// * parameter absent  => `None`
/// * `?page=3`         => `Some(3)`
/// * `?page=abc`       => `None`
/// * `?page=-2`        => `None`
pub fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}
