//! Conversion between the stored 0–10 rating and the 1–5 display scale.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::FinderError;

/// Maps a raw 0–10 rating onto the 1–5 display scale.
///
/// `max((raw + 1) / 2, 1)`, so 0 and 1 both display as 1 and 9 and 10 as 5.
pub fn display_rating(raw: u8) -> u8 {
    ((raw as u16 + 1) / 2).max(1) as u8
}

/// Minimum display rating a record needs to pass the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DisplayRating(u8);

impl DisplayRating {
    pub const MIN: DisplayRating = DisplayRating(1);
    pub const MAX: DisplayRating = DisplayRating(5);

    pub fn new(value: u8) -> Option<Self> {
        (1..=5).contains(&value).then_some(DisplayRating(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// The next threshold, wrapping 5 back to 1.
    pub fn next(self) -> Self {
        DisplayRating(self.0 % 5 + 1)
    }

    /// Whether a record with raw rating `raw` meets this threshold.
    pub fn admits(self, raw: u8) -> bool {
        display_rating(raw) >= self.0
    }
}

impl Default for DisplayRating {
    fn default() -> Self {
        DisplayRating::MIN
    }
}

impl TryFrom<u8> for DisplayRating {
    type Error = FinderError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DisplayRating::new(value).ok_or_else(|| {
            FinderError::InvalidConfig(format!("Display rating {} outside 1..=5", value))
        })
    }
}

impl From<DisplayRating> for u8 {
    fn from(rating: DisplayRating) -> u8 {
        rating.0
    }
}

impl fmt::Display for DisplayRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
