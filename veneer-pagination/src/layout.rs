//! Layout string parsing.
//!
//! A layout lists the controls to render, separated by commas. The `->`
//! token moves every following control into a right-aligned wrapper.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Token that starts the right-aligned wrapper.
pub const RIGHT_WRAPPER: &str = "->";

/// One control in the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutItem {
    /// Previous-page button.
    Prev,
    /// Page number buttons.
    Pager,
    /// Next-page button.
    Next,
    /// Go-to-page input.
    Jumper,
    /// Total item count.
    Total,
    /// Page-size selector.
    Sizes,
    /// Caller-provided content.
    Slot,
}

impl LayoutItem {
    /// Layout token of this control.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prev => "prev",
            Self::Pager => "pager",
            Self::Next => "next",
            Self::Jumper => "jumper",
            Self::Total => "total",
            Self::Sizes => "sizes",
            Self::Slot => "slot",
        }
    }
}

impl FromStr for LayoutItem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prev" => Ok(Self::Prev),
            "pager" => Ok(Self::Pager),
            "next" => Ok(Self::Next),
            "jumper" => Ok(Self::Jumper),
            "total" => Ok(Self::Total),
            "sizes" => Ok(Self::Sizes),
            "slot" => Ok(Self::Slot),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for LayoutItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Controls before `->`, in order.
    pub left: Vec<LayoutItem>,
    /// Controls after `->`, in order. `None` when there is no wrapper.
    pub right: Option<Vec<LayoutItem>>,
}

impl Layout {
    /// Parse a layout string. Unknown tokens are skipped.
    #[must_use]
    pub fn parse(layout: &str) -> Self {
        let mut parsed = Self::default();
        for token in layout.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if token == RIGHT_WRAPPER {
                parsed.right.get_or_insert_with(Vec::new);
                continue;
            }
            let Ok(item) = token.parse::<LayoutItem>() else {
                tracing::warn!("Unknown pagination layout item {:?}", token);
                continue;
            };
            match parsed.right.as_mut() {
                Some(right) => right.push(item),
                None => parsed.left.push(item),
            }
        }
        parsed
    }

    /// Whether the layout renders anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && !self.right.as_ref().is_some_and(|r| !r.is_empty())
    }

    /// Whether `item` appears anywhere in the layout.
    #[must_use]
    pub fn contains(&self, item: LayoutItem) -> bool {
        self.left.contains(&item) || self.right.as_ref().is_some_and(|r| r.contains(&item))
    }
}
