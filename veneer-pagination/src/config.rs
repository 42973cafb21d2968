//! Pagination configuration.

use serde::{Deserialize, Serialize};

use crate::{PaginationError, PaginationResult};

/// Smallest allowed pager count.
pub const MIN_PAGER_COUNT: u32 = 5;
/// Largest allowed pager count.
pub const MAX_PAGER_COUNT: u32 = 21;
/// Page size used when the configured one is unusable.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Caller-supplied pagination settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Items per page. Non-finite or non-positive values fall back to 10.
    #[serde(default = "PaginationConfig::default_page_size")]
    pub page_size: f64,
    /// Total item count, if known.
    #[serde(default)]
    pub total: Option<u64>,
    /// Explicit page count; takes precedence over `total`.
    #[serde(default)]
    pub page_count: Option<u64>,
    /// Number of page buttons shown, ellipses included.
    #[serde(default = "PaginationConfig::default_pager_count")]
    pub pager_count: u32,
    /// Initially selected page, 1-based.
    #[serde(default = "PaginationConfig::default_current_page")]
    pub current_page: u64,
    /// Comma-separated control layout.
    #[serde(default = "PaginationConfig::default_layout")]
    pub layout: String,
    /// Choices offered by the page-size selector.
    #[serde(default = "PaginationConfig::default_page_sizes")]
    pub page_sizes: Vec<u64>,
    /// Render nothing when there is at most one page.
    #[serde(default)]
    pub hide_on_single_page: bool,
    /// Ignore all navigation.
    #[serde(default)]
    pub disabled: bool,
}

impl PaginationConfig {
    #[allow(clippy::cast_precision_loss)]
    fn default_page_size() -> f64 {
        DEFAULT_PAGE_SIZE as f64
    }

    const fn default_pager_count() -> u32 {
        7
    }

    const fn default_current_page() -> u64 {
        1
    }

    fn default_layout() -> String {
        "prev, pager, next, jumper, ->, total".to_string()
    }

    fn default_page_sizes() -> Vec<u64> {
        vec![10, 20, 30, 40, 50, 100]
    }

    /// Parse a configuration from JSON, filling defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> PaginationResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the settings that cannot be repaired.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidPagerCount`] unless the pager count
    /// is odd and within `[5, 21]`.
    pub fn validate(&self) -> PaginationResult<()> {
        let count = self.pager_count;
        if (MIN_PAGER_COUNT..=MAX_PAGER_COUNT).contains(&count) && count % 2 == 1 {
            Ok(())
        } else {
            Err(PaginationError::InvalidPagerCount(count))
        }
    }

    /// Set the total item count.
    #[must_use]
    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    /// Set an explicit page count.
    #[must_use]
    pub fn with_page_count(mut self, page_count: u64) -> Self {
        self.page_count = Some(page_count);
        self
    }

    /// Set the page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: f64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the pager count.
    #[must_use]
    pub fn with_pager_count(mut self, pager_count: u32) -> Self {
        self.pager_count = pager_count;
        self
    }

    /// Set the initial page.
    #[must_use]
    pub fn with_current_page(mut self, current_page: u64) -> Self {
        self.current_page = current_page;
        self
    }

    /// Set the layout string.
    #[must_use]
    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = layout.into();
        self
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: Self::default_page_size(),
            total: None,
            page_count: None,
            pager_count: Self::default_pager_count(),
            current_page: Self::default_current_page(),
            layout: Self::default_layout(),
            page_sizes: Self::default_page_sizes(),
            hide_on_single_page: false,
            disabled: false,
        }
    }
}

/// Usable page size for a caller-supplied value.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn sanitize_page_size(page_size: f64) -> u64 {
    if page_size.is_finite() && page_size >= 1.0 {
        page_size.floor() as u64
    } else {
        DEFAULT_PAGE_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config = PaginationConfig::from_json("{}").expect("valid config");
        assert_eq!(config, PaginationConfig::default());
        assert_eq!(config.pager_count, 7);
        assert_eq!(config.layout, "prev, pager, next, jumper, ->, total");
        assert_eq!(config.page_sizes, vec![10, 20, 30, 40, 50, 100]);
    }

    #[test]
    fn test_pager_count_validation() {
        for valid in [5, 7, 9, 21] {
            assert!(PaginationConfig::default()
                .with_pager_count(valid)
                .validate()
                .is_ok());
        }
        for invalid in [0, 3, 4, 6, 20, 22, 23] {
            let err = PaginationConfig::default()
                .with_pager_count(invalid)
                .validate()
                .expect_err("invalid pager count");
            assert!(matches!(err, PaginationError::InvalidPagerCount(n) if n == invalid));
        }
    }

    #[test]
    fn test_page_size_sanitation() {
        assert_eq!(sanitize_page_size(20.0), 20);
        assert_eq!(sanitize_page_size(f64::NAN), 10);
        assert_eq!(sanitize_page_size(f64::INFINITY), 10);
        assert_eq!(sanitize_page_size(0.0), 10);
        assert_eq!(sanitize_page_size(-5.0), 10);
        assert_eq!(sanitize_page_size(12.7), 12);
    }
}
