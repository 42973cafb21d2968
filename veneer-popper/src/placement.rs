//! The 12 canonical overlay placements.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::PopperError;

/// Side of the reference element the overlay sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Above the reference.
    Top,
    /// Below the reference.
    Bottom,
    /// Left of the reference.
    Left,
    /// Right of the reference.
    Right,
}

impl Side {
    /// The side across the reference element.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Whether the main axis of this side is vertical.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// CSS keyword for this side.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Alignment along the cross axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Aligned to the start edge (`-start`).
    Start,
    /// Centered (no suffix).
    #[default]
    Center,
    /// Aligned to the end edge (`-end`).
    End,
}

/// A validated placement: one side plus an alignment.
///
/// Parses only strings matching `^(top|bottom|left|right)(-start|-end)?$`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Placement {
    side: Side,
    alignment: Alignment,
}

impl Placement {
    /// Every canonical placement.
    pub const ALL: [Self; 12] = [
        Self::new(Side::Top, Alignment::Start),
        Self::new(Side::Top, Alignment::Center),
        Self::new(Side::Top, Alignment::End),
        Self::new(Side::Bottom, Alignment::Start),
        Self::new(Side::Bottom, Alignment::Center),
        Self::new(Side::Bottom, Alignment::End),
        Self::new(Side::Left, Alignment::Start),
        Self::new(Side::Left, Alignment::Center),
        Self::new(Side::Left, Alignment::End),
        Self::new(Side::Right, Alignment::Start),
        Self::new(Side::Right, Alignment::Center),
        Self::new(Side::Right, Alignment::End),
    ];

    /// Create a placement from its parts.
    #[must_use]
    pub const fn new(side: Side, alignment: Alignment) -> Self {
        Self { side, alignment }
    }

    /// The primary side, ignoring alignment.
    #[must_use]
    pub const fn side(self) -> Side {
        self.side
    }

    /// The cross-axis alignment.
    #[must_use]
    pub const fn alignment(self) -> Alignment {
        self.alignment
    }

    /// Canonical string form, e.g. `"bottom-start"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match (self.side, self.alignment) {
            (Side::Top, Alignment::Start) => "top-start",
            (Side::Top, Alignment::Center) => "top",
            (Side::Top, Alignment::End) => "top-end",
            (Side::Bottom, Alignment::Start) => "bottom-start",
            (Side::Bottom, Alignment::Center) => "bottom",
            (Side::Bottom, Alignment::End) => "bottom-end",
            (Side::Left, Alignment::Start) => "left-start",
            (Side::Left, Alignment::Center) => "left",
            (Side::Left, Alignment::End) => "left-end",
            (Side::Right, Alignment::Start) => "right-start",
            (Side::Right, Alignment::Center) => "right",
            (Side::Right, Alignment::End) => "right-end",
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::new(Side::Bottom, Alignment::Center)
    }
}

impl FromStr for Placement {
    type Err = PopperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (side, suffix) = match s.split_once('-') {
            Some((side, suffix)) => (side, Some(suffix)),
            None => (s, None),
        };

        let side = match side {
            "top" => Side::Top,
            "bottom" => Side::Bottom,
            "left" => Side::Left,
            "right" => Side::Right,
            _ => return Err(PopperError::InvalidPlacement(s.to_string())),
        };

        let alignment = match suffix {
            None => Alignment::Center,
            Some("start") => Alignment::Start,
            Some("end") => Alignment::End,
            Some(_) => return Err(PopperError::InvalidPlacement(s.to_string())),
        };

        Ok(Self::new(side, alignment))
    }
}

impl TryFrom<String> for Placement {
    type Error = PopperError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Placement> for String {
    fn from(placement: Placement) -> Self {
        placement.as_str().to_string()
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
