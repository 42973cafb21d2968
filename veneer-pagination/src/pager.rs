//! Pager button computation.
//!
//! The first and last pages are always shown. Between them sit up to
//! `pager_count - 2` buttons around the current page; when pages are hidden
//! on either side an ellipsis takes the place of one button and jumps
//! `pager_count - 2` pages in its direction.

use serde::{Deserialize, Serialize};

/// One button in the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PagerItem {
    /// A page number.
    Page {
        /// 1-based page number.
        number: u64,
        /// Whether this is the current page.
        active: bool,
    },
    /// Ellipsis jumping backwards.
    QuickPrev,
    /// Ellipsis jumping forwards.
    QuickNext,
}

/// Which sides of the pager collapse into an ellipsis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Collapse {
    prev: bool,
    next: bool,
}

fn collapse(current: u64, page_count: u64, pager_count: u64) -> Collapse {
    let half = (pager_count - 1) / 2;
    if page_count <= pager_count {
        return Collapse {
            prev: false,
            next: false,
        };
    }
    Collapse {
        prev: current > pager_count - half,
        next: current + half < page_count,
    }
}

/// Pager buttons for `current` out of `page_count` pages.
///
/// `pager_count` is assumed valid (odd, at least 5).
#[must_use]
pub fn pager_items(current: u64, page_count: u64, pager_count: u32) -> Vec<PagerItem> {
    if page_count == 0 {
        return Vec::new();
    }
    let pager_count = u64::from(pager_count);
    let Collapse { prev, next } = collapse(current, page_count, pager_count);

    let middle: Vec<u64> = match (prev, next) {
        (true, false) => (page_count - (pager_count - 2)..page_count).collect(),
        (false, true) => (2..pager_count).collect(),
        (true, true) => {
            let offset = pager_count / 2 - 1;
            (current - offset..=current + offset).collect()
        }
        (false, false) => (2..page_count).collect(),
    };

    let page = |number: u64| PagerItem::Page {
        number,
        active: number == current,
    };

    let mut items = Vec::with_capacity(middle.len() + 4);
    items.push(page(1));
    if prev {
        items.push(PagerItem::QuickPrev);
    }
    items.extend(middle.into_iter().map(page));
    if next {
        items.push(PagerItem::QuickNext);
    }
    if page_count > 1 {
        items.push(page(page_count));
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(items: &[PagerItem]) -> String {
        items
            .iter()
            .map(|item| match item {
                PagerItem::Page { number, active: true } => format!("[{number}]"),
                PagerItem::Page { number, .. } => number.to_string(),
                PagerItem::QuickPrev => "<<".to_string(),
                PagerItem::QuickNext => ">>".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_few_pages_show_all() {
        assert_eq!(render(&pager_items(2, 5, 7)), "1 [2] 3 4 5");
        assert_eq!(render(&pager_items(1, 1, 7)), "[1]");
        assert!(pager_items(1, 0, 7).is_empty());
    }

    #[test]
    fn test_ellipsis_after() {
        assert_eq!(render(&pager_items(1, 20, 7)), "[1] 2 3 4 5 6 >> 20");
        assert_eq!(render(&pager_items(4, 20, 7)), "1 2 3 [4] 5 6 >> 20");
    }

    #[test]
    fn test_ellipsis_both_sides() {
        assert_eq!(render(&pager_items(5, 20, 7)), "1 << 3 4 [5] 6 7 >> 20");
        assert_eq!(render(&pager_items(10, 20, 7)), "1 << 8 9 [10] 11 12 >> 20");
    }

    #[test]
    fn test_ellipsis_before() {
        assert_eq!(render(&pager_items(17, 20, 7)), "1 << 15 16 [17] 18 19 20");
        assert_eq!(render(&pager_items(20, 20, 7)), "1 << 15 16 17 18 19 [20]");
    }

    #[test]
    fn test_exactly_pager_count_pages() {
        assert_eq!(render(&pager_items(4, 7, 7)), "1 2 3 [4] 5 6 7");
    }
}
