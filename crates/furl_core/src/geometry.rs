//! Integer pixel geometry
//!
//! Layout in Furl happens on whole pixels, so rectangles use `i32` edges
//! rather than the float geometry a renderer would use.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle described by its four edges
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a rectangle from its top-left corner and size
    pub const fn from_origin_size(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Move the rectangle vertically, keeping its size
    pub fn offset_vertical(&self, dy: i32) -> Rect {
        Rect::new(self.left, self.top + dy, self.right, self.bottom + dy)
    }

    /// Shrink the rectangle by the given insets
    pub fn inset(&self, insets: Insets) -> Rect {
        Rect::new(
            self.left + insets.left,
            self.top + insets.top,
            self.right - insets.right,
            self.bottom - insets.bottom,
        )
    }
}

/// Edge insets used for container padding and child margins
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Insets {
    #[serde(default)]
    pub left: i32,
    #[serde(default)]
    pub top: i32,
    #[serde(default)]
    pub right: i32,
    #[serde(default)]
    pub bottom: i32,
}

impl Insets {
    pub const ZERO: Insets = Insets {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub const fn uniform(value: i32) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }
}

/// Horizontal placement inside a container
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalGravity {
    Start,
    Center,
    End,
}

/// Vertical placement inside a container
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalGravity {
    Top,
    Center,
    Bottom,
}

/// Placement of a child within an available rectangle
///
/// Unset axes resolve to start/top.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gravity {
    #[serde(default)]
    pub horizontal: Option<HorizontalGravity>,
    #[serde(default)]
    pub vertical: Option<VerticalGravity>,
}

impl Gravity {
    /// No gravity requested on either axis
    pub const NONE: Gravity = Gravity {
        horizontal: None,
        vertical: None,
    };

    pub const fn new(horizontal: HorizontalGravity, vertical: VerticalGravity) -> Self {
        Self {
            horizontal: Some(horizontal),
            vertical: Some(vertical),
        }
    }

    /// Fill unset axes with start/top
    pub fn resolve(&self) -> (HorizontalGravity, VerticalGravity) {
        (
            self.horizontal.unwrap_or(HorizontalGravity::Start),
            self.vertical.unwrap_or(VerticalGravity::Top),
        )
    }

    /// Place a `width` x `height` child inside `container`
    pub fn apply(&self, width: i32, height: i32, container: Rect) -> Rect {
        let (horizontal, vertical) = self.resolve();

        let left = match horizontal {
            HorizontalGravity::Start => container.left,
            HorizontalGravity::Center => container.left + (container.width() - width) / 2,
            HorizontalGravity::End => container.right - width,
        };

        let top = match vertical {
            VerticalGravity::Top => container.top,
            VerticalGravity::Center => container.top + (container.height() - height) / 2,
            VerticalGravity::Bottom => container.bottom - height,
        };

        Rect::from_origin_size(left, top, width, height)
    }
}
