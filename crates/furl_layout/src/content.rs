//! Scrollable content view
//!
//! Stands in for the nested scrolling child: a viewport onto a list that can
//! scroll by itself between `0` and `scroll_range`. The coordinator hands it
//! whatever delta the behaviors leave unconsumed.

use furl_core::{Gravity, Insets, VerticalDirection};
use serde::{Deserialize, Serialize};

/// The nested scrolling child laid out beneath a header
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentView {
    /// Fixed height; fills the container when unset
    #[serde(default)]
    pub height: Option<i32>,
    /// Fixed width; fills the container when unset
    #[serde(default)]
    pub width: Option<i32>,
    /// How far the inner list can scroll
    #[serde(default)]
    pub scroll_range: i32,
    /// Current inner scroll position, `0..=scroll_range`
    #[serde(default)]
    pub scroll_y: i32,
    #[serde(default)]
    pub gravity: Gravity,
    #[serde(default)]
    pub margins: Insets,
}

impl ContentView {
    /// Content filling the container with the given inner scroll range
    pub fn with_scroll_range(scroll_range: i32) -> Self {
        Self {
            scroll_range: scroll_range.max(0),
            ..Default::default()
        }
    }

    /// Whether the inner list can scroll further in `direction`
    pub fn can_scroll_vertically(&self, direction: VerticalDirection) -> bool {
        match direction {
            VerticalDirection::Up => self.scroll_y > 0,
            VerticalDirection::Down => self.scroll_y < self.scroll_range,
        }
    }

    /// Scroll the inner list, returning the part of `dy` it absorbed
    pub fn scroll_by(&mut self, dy: i32) -> i32 {
        let old = self.scroll_y;
        self.scroll_y = (old.saturating_add(dy)).clamp(0, self.scroll_range.max(0));
        self.scroll_y - old
    }

    /// Size this view takes inside a container of the given size
    pub fn measure(&self, available_width: i32, available_height: i32) -> (i32, i32) {
        let width = self
            .width
            .unwrap_or(available_width - self.margins.left - self.margins.right);
        let height = self
            .height
            .unwrap_or(available_height - self.margins.top - self.margins.bottom);
        (width.max(0), height.max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_by_clamps_to_range() {
        let mut content = ContentView::with_scroll_range(300);
        assert_eq!(content.scroll_by(120), 120);
        assert_eq!(content.scroll_by(500), 180);
        assert_eq!(content.scroll_y, 300);
        assert_eq!(content.scroll_by(-400), -300);
        assert_eq!(content.scroll_y, 0);
    }

    #[test]
    fn test_can_scroll_vertically() {
        let mut content = ContentView::with_scroll_range(100);
        assert!(!content.can_scroll_vertically(VerticalDirection::Up));
        assert!(content.can_scroll_vertically(VerticalDirection::Down));

        content.scroll_by(100);
        assert!(content.can_scroll_vertically(VerticalDirection::Up));
        assert!(!content.can_scroll_vertically(VerticalDirection::Down));
    }

    #[test]
    fn test_measure_respects_margins() {
        let content = ContentView {
            margins: Insets::uniform(10),
            ..Default::default()
        };
        assert_eq!(content.measure(400, 800), (380, 780));

        let fixed = ContentView {
            height: Some(500),
            ..Default::default()
        };
        assert_eq!(fixed.measure(400, 800), (400, 500));
    }
}
