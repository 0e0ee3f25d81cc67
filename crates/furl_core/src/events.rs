//! Nested-scroll protocol vocabulary
//!
//! Deltas and velocities arrive pre-decoded from the input layer. These
//! types describe what kind of scroll is being dispatched, not how it was
//! recognised.

use serde::{Deserialize, Serialize};

/// Event type identifier
pub type EventType = u32;

/// Nested-scroll event types, used for tracing and replay frames
pub mod event_types {
    use super::EventType;

    pub const NESTED_SCROLL_START: EventType = 1;
    pub const NESTED_PRE_SCROLL: EventType = 2;
    /// Residual delta applied to the scrolling target itself
    pub const NESTED_SCROLL: EventType = 3;
    pub const NESTED_SCROLL_STOP: EventType = 4;
    pub const NESTED_PRE_FLING: EventType = 5;
    /// An offset animation reached its target
    pub const OFFSET_SETTLED: EventType = 10;
    /// Layout pass re-derived dependent positions
    pub const LAYOUT: EventType = 20;
}

/// Set of scroll axes a nested scroll was started on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScrollAxes(u8);

impl ScrollAxes {
    pub const NONE: ScrollAxes = ScrollAxes(0);
    pub const HORIZONTAL: ScrollAxes = ScrollAxes(1 << 0);
    pub const VERTICAL: ScrollAxes = ScrollAxes(1 << 1);
    pub const BOTH: ScrollAxes = ScrollAxes((1 << 0) | (1 << 1));

    pub fn contains(&self, other: ScrollAxes) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub fn contains_vertical(&self) -> bool {
        self.contains(ScrollAxes::VERTICAL)
    }
}

impl std::ops::BitOr for ScrollAxes {
    type Output = ScrollAxes;

    fn bitor(self, rhs: Self) -> Self::Output {
        ScrollAxes(self.0 | rhs.0)
    }
}

/// Source of a nested scroll
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollType {
    /// Finger on the surface, driving the scroll directly
    #[default]
    Touch,
    /// Inertial or programmatic scroll after the finger lifted
    NonTouch,
}

/// Vertical scroll direction, in the sign convention of scroll deltas
///
/// `Up` asks whether earlier content can still be revealed (negative dy),
/// `Down` whether later content can (positive dy).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalDirection {
    Up,
    Down,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes() {
        assert!(ScrollAxes::VERTICAL.contains_vertical());
        assert!(ScrollAxes::BOTH.contains_vertical());
        assert!(!ScrollAxes::HORIZONTAL.contains_vertical());
        assert!(!ScrollAxes::NONE.contains_vertical());
        assert_eq!(
            ScrollAxes::HORIZONTAL | ScrollAxes::VERTICAL,
            ScrollAxes::BOTH
        );
    }
}
