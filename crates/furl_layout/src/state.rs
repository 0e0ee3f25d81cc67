//! Resting states of a collapsing offset
//!
//! ```text
//! Expanded (0) <-> Transitioning (-R < offset < 0) <-> Collapsed (-R)
//! ```
//!
//! The state is derived from the offset and the range, never set directly.

use serde::Serialize;

/// Where a collapsing offset currently sits within its range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderState {
    /// Offset 0, fully visible
    #[default]
    Expanded,
    /// Somewhere between the two resting states
    Transitioning,
    /// Offset at `-range`, only the pinned row visible
    Collapsed,
}

impl HeaderState {
    /// Classify an offset against a collapsible range
    ///
    /// A zero range has nothing to collapse and is always `Expanded`.
    pub fn classify(offset: i32, range: i32) -> Self {
        if range <= 0 || offset >= 0 {
            HeaderState::Expanded
        } else if offset <= -range {
            HeaderState::Collapsed
        } else {
            HeaderState::Transitioning
        }
    }

    /// Returns true for the two resting states
    pub fn is_settled(&self) -> bool {
        !matches!(self, HeaderState::Transitioning)
    }
}
