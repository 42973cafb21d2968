//! Pagination state.

use serde::{Deserialize, Serialize};

use crate::config::sanitize_page_size;
use crate::{pager_items, Layout, PagerItem, PaginationConfig, PaginationResult};

/// Change notifications for the view layer, drained with
/// [`Pagination::drain_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "value", rename_all = "kebab-case")]
pub enum PaginationEvent {
    /// The current page changed.
    CurrentChange(u64),
    /// The page size changed.
    SizeChange(u64),
    /// The previous-page button moved to this page.
    PrevClick(u64),
    /// The next-page button moved to this page.
    NextClick(u64),
}

/// Headless pagination model.
#[derive(Debug, Clone)]
pub struct Pagination {
    current_page: u64,
    page_size: u64,
    total: Option<u64>,
    explicit_page_count: Option<u64>,
    pager_count: u32,
    page_sizes: Vec<u64>,
    layout: Layout,
    hide_on_single_page: bool,
    disabled: bool,
    events: Vec<PaginationEvent>,
}

impl Pagination {
    /// Create a model from `config`.
    ///
    /// The initial page is clamped into range without emitting events.
    ///
    /// # Errors
    ///
    /// Returns an error if the pager count is invalid.
    pub fn new(config: PaginationConfig) -> PaginationResult<Self> {
        config.validate()?;
        let mut pagination = Self {
            current_page: 1,
            page_size: sanitize_page_size(config.page_size),
            total: config.total,
            explicit_page_count: config.page_count,
            pager_count: config.pager_count,
            page_sizes: config.page_sizes,
            layout: Layout::parse(&config.layout),
            hide_on_single_page: config.hide_on_single_page,
            disabled: config.disabled,
            events: Vec::new(),
        };
        pagination.current_page = pagination.valid_page(config.current_page);
        Ok(pagination)
    }

    /// Create a model from JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the pager count invalid.
    pub fn from_json(json: &str) -> PaginationResult<Self> {
        Self::new(PaginationConfig::from_json(json)?)
    }

    /// Current page, 1-based.
    #[must_use]
    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    /// Items per page.
    #[must_use]
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Choices for the page-size selector.
    #[must_use]
    pub fn page_sizes(&self) -> &[u64] {
        &self.page_sizes
    }

    /// Total item count, if known.
    #[must_use]
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Number of page buttons shown.
    #[must_use]
    pub fn pager_count(&self) -> u32 {
        self.pager_count
    }

    /// Parsed layout.
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Whether navigation is ignored.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Number of pages: the explicit count if given, else derived from the
    /// total. At least 1 when either is known.
    #[must_use]
    pub fn page_count(&self) -> Option<u64> {
        self.explicit_page_count
            .or_else(|| self.total.map(|total| total.div_ceil(self.page_size)))
            .map(|count| count.max(1))
    }

    /// Whether the control renders nothing.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.layout.is_empty()
            || (self.hide_on_single_page && !matches!(self.page_count(), Some(count) if count > 1))
    }

    /// Whether the previous-page button is inert.
    #[must_use]
    pub fn prev_disabled(&self) -> bool {
        self.disabled || self.current_page <= 1
    }

    /// Whether the next-page button is inert.
    #[must_use]
    pub fn next_disabled(&self) -> bool {
        self.disabled
            || match self.page_count() {
                Some(count) => self.current_page >= count,
                None => true,
            }
    }

    /// Pager buttons for the current state.
    #[must_use]
    pub fn pagers(&self) -> Vec<PagerItem> {
        self.page_count()
            .map(|count| pager_items(self.current_page, count, self.pager_count))
            .unwrap_or_default()
    }

    /// Take all events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<PaginationEvent> {
        std::mem::take(&mut self.events)
    }

    /// Sync the current page from the owner. Out-of-range pages are clamped.
    pub fn set_current_page(&mut self, page: u64) {
        let page = self.valid_page(page);
        self.move_to(page);
    }

    /// User selected a page, from the pager or the jumper.
    pub fn jump_to(&mut self, page: u64) {
        if self.disabled {
            return;
        }
        self.set_current_page(page);
    }

    /// Go to the previous page.
    pub fn prev(&mut self) {
        if self.prev_disabled() {
            return;
        }
        let page = self.valid_page(self.current_page - 1);
        self.events.push(PaginationEvent::PrevClick(page));
        self.move_to(page);
    }

    /// Go to the next page.
    pub fn next(&mut self) {
        if self.next_disabled() {
            return;
        }
        let page = self.valid_page(self.current_page + 1);
        self.events.push(PaginationEvent::NextClick(page));
        self.move_to(page);
    }

    /// Jump back by the pager's collapsed width (the leading ellipsis).
    pub fn quick_prev(&mut self) {
        let step = u64::from(self.pager_count) - 2;
        self.jump_to(self.current_page.saturating_sub(step));
    }

    /// Jump forward by the pager's collapsed width (the trailing ellipsis).
    pub fn quick_next(&mut self) {
        let step = u64::from(self.pager_count) - 2;
        self.jump_to(self.current_page.saturating_add(step));
    }

    /// Change the page size. Unusable sizes fall back to 10.
    ///
    /// Emits `SizeChange`, then `CurrentChange` if the current page no
    /// longer exists.
    pub fn set_page_size(&mut self, page_size: f64) {
        let page_size = sanitize_page_size(page_size);
        if page_size == self.page_size {
            return;
        }
        self.page_size = page_size;
        tracing::debug!(page_size, "Page size changed");
        self.events.push(PaginationEvent::SizeChange(page_size));
        self.reconcile();
    }

    /// Update the total item count.
    pub fn set_total(&mut self, total: Option<u64>) {
        self.total = total;
        self.reconcile();
    }

    /// Update the explicit page count.
    pub fn set_page_count(&mut self, page_count: Option<u64>) {
        self.explicit_page_count = page_count;
        self.reconcile();
    }

    /// Set the disabled flag.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    fn valid_page(&self, page: u64) -> u64 {
        let page = page.max(1);
        match self.page_count() {
            Some(count) => page.min(count),
            None => page,
        }
    }

    /// Pull the current page back into range after the page count changed.
    fn reconcile(&mut self) {
        let page = self.valid_page(self.current_page);
        self.move_to(page);
    }

    fn move_to(&mut self, page: u64) {
        if page == self.current_page {
            return;
        }
        tracing::debug!(from = self.current_page, to = page, "Current page changed");
        self.current_page = page;
        self.events.push(PaginationEvent::CurrentChange(page));
    }
}
