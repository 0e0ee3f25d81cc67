//! Collapsing header view
//!
//! A header is a fixed, ordered stack of equal-height rows. Its only job in
//! the scroll coordination is to report its geometry: the natural height of
//! the stack, the height of the row that must stay visible when collapsed,
//! and how many pixels of itself may be hidden.
//!
//! The anchor row biases where the stack sits when the header is clipped
//! shorter than its natural height, and how much of the header collapses:
//! rows above the anchor scroll away first.

use furl_animation::Easing;
use furl_core::{FurlError, Rect, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Configuration for a header's rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderConfig {
    /// Number of rows in the stack
    #[serde(default = "default_row_count")]
    pub row_count: usize,
    /// Height of every row in pixels
    #[serde(default = "default_row_height")]
    pub row_height: i32,
    /// Row the header is anchored on (0-based)
    #[serde(default = "default_anchor_row")]
    pub anchor_row: usize,
    /// Fixed row width; rows fill the header width when unset
    #[serde(default)]
    pub row_width: Option<i32>,
    /// Easing for snap and fling-settle animations
    #[serde(default)]
    pub snap_easing: Easing,
}

fn default_row_count() -> usize {
    5
}

fn default_row_height() -> i32 {
    50
}

fn default_anchor_row() -> usize {
    1
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            row_count: default_row_count(),
            row_height: default_row_height(),
            anchor_row: default_anchor_row(),
            row_width: None,
            snap_easing: Easing::default(),
        }
    }
}

impl HeaderConfig {
    /// Check the configuration describes a usable header
    pub fn validate(&self) -> Result<()> {
        if self.row_count == 0 {
            return Err(FurlError::InvalidConfig(
                "header needs at least one row".to_string(),
            ));
        }
        if self.row_height <= 0 {
            return Err(FurlError::InvalidConfig(format!(
                "row height must be positive, got {}",
                self.row_height
            )));
        }
        if self.anchor_row >= self.row_count {
            return Err(FurlError::InvalidConfig(format!(
                "anchor row {} is outside 0..{}",
                self.anchor_row, self.row_count
            )));
        }
        let natural = self.row_count as i64 * self.row_height as i64;
        if natural > i32::MAX as i64 {
            return Err(FurlError::InvalidConfig(format!(
                "{} rows of {} px exceed the maximum header height",
                self.row_count, self.row_height
            )));
        }
        if let Some(width) = self.row_width {
            if width < 0 {
                return Err(FurlError::InvalidConfig(format!(
                    "row width must not be negative, got {width}"
                )));
            }
        }
        Ok(())
    }
}

/// A vertical stack of fixed-height rows
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderView {
    config: HeaderConfig,
    /// Sum of all row heights
    total_length: i32,
    measured_width: i32,
    measured_height: i32,
    /// Bounds assigned by the last layout pass, before any scroll offset
    frame: Rect,
    /// Row bounds relative to the header's own top-left corner
    rows: SmallVec<[Rect; 8]>,
}

impl HeaderView {
    pub fn new(config: HeaderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            total_length: 0,
            measured_width: 0,
            measured_height: 0,
            frame: Rect::ZERO,
            rows: SmallVec::new(),
        })
    }

    pub fn config(&self) -> &HeaderConfig {
        &self.config
    }

    pub fn row_count(&self) -> usize {
        self.config.row_count
    }

    pub fn anchor_row(&self) -> usize {
        self.config.anchor_row
    }

    /// Move the anchor to another row
    ///
    /// Takes effect on the next layout pass.
    pub fn set_anchor_row(&mut self, row: usize) -> Result<()> {
        if row >= self.config.row_count {
            return Err(FurlError::InvalidConfig(format!(
                "anchor row {row} is outside 0..{}",
                self.config.row_count
            )));
        }
        self.config.anchor_row = row;
        Ok(())
    }

    /// Measure the stack against the space the container offers
    ///
    /// The header takes the full available width and the smaller of its
    /// natural height and the available height.
    pub fn measure(&mut self, available_width: i32, available_height: i32) -> (i32, i32) {
        self.total_length = self.config.row_height * self.config.row_count as i32;
        self.measured_width = available_width.max(0);
        self.measured_height = self.total_length.min(available_height).max(0);
        (self.measured_width, self.measured_height)
    }

    pub fn measured_width(&self) -> i32 {
        self.measured_width
    }

    pub fn measured_height(&self) -> i32 {
        self.measured_height
    }

    /// Place the header and its rows
    ///
    /// Rows are stacked top to bottom and centered horizontally. When the
    /// header is shorter than its natural height the stack is shifted so the
    /// anchor row keeps its share of the visible space.
    pub fn layout(&mut self, frame: Rect) {
        self.frame = frame;

        let parent_width = frame.width();
        let parent_height = frame.height();
        let count = self.config.row_count as i32;

        let mut child_top = if count > 1 {
            let slack = parent_height as i64 - self.total_length as i64;
            (self.config.anchor_row as i64 * slack / (count as i64 - 1)) as i32
        } else {
            0
        };

        let width = self.config.row_width.unwrap_or(parent_width);
        let left = (parent_width - width) / 2;

        self.rows.clear();
        for _ in 0..count {
            self.rows.push(Rect::from_origin_size(
                left,
                child_top,
                width,
                self.config.row_height,
            ));
            child_top += self.config.row_height;
        }

        tracing::trace!(
            "Header laid out at {:?}, {} rows, first row top {}",
            frame,
            count,
            self.rows.first().map(|r| r.top).unwrap_or(0)
        );
    }

    /// Bounds from the last layout pass, without the scroll offset
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Row bounds relative to the header's top-left corner
    pub fn row_frames(&self) -> &[Rect] {
        &self.rows
    }

    /// Natural height of the row stack
    pub fn natural_height(&self) -> i32 {
        self.config.row_height * self.config.row_count as i32
    }

    /// Laid-out height of the header
    pub fn total_header_height(&self) -> i32 {
        self.frame.height()
    }

    /// Height of the row that stays visible when fully collapsed
    pub fn pinned_row_height(&self) -> i32 {
        self.config.row_height
    }

    /// Content scroll distance that drives the header from expanded to collapsed
    pub fn collapse_scroll_distance(&self) -> i32 {
        (self.total_header_height() - self.pinned_row_height()).max(0)
    }

    /// Pixels of the header that may be hidden
    ///
    /// The share above the anchor row, never more than everything but the
    /// pinned row.
    pub fn collapsible_range(&self) -> i32 {
        let height = self.total_header_height();
        let anchored =
            height as i64 * self.config.anchor_row as i64 / self.config.row_count as i64;
        (anchored as i32)
            .min(height - self.pinned_row_height())
            .max(0)
    }

    /// Header pixels moved per content pixel scrolled
    ///
    /// `None` when nothing collapses; no rate mapping applies then.
    pub fn scroll_rate(&self) -> Option<f32> {
        let range = self.collapsible_range();
        let distance = self.collapse_scroll_distance();
        if range == 0 || distance == 0 {
            return None;
        }
        Some(range as f32 / distance as f32)
    }

    /// Convert a content scroll delta into a header offset delta
    ///
    /// Truncates toward zero. Returns 0 when nothing collapses.
    pub fn header_delta_for(&self, content_delta: i32) -> i32 {
        let range = self.collapsible_range() as i64;
        let distance = self.collapse_scroll_distance() as i64;
        if range == 0 || distance == 0 {
            return 0;
        }
        (content_delta as i64 * range / distance) as i32
    }

    /// Convert a header offset delta back into content scroll pixels
    ///
    /// Truncates toward zero. Returns 0 when nothing collapses.
    pub fn content_delta_for(&self, header_delta: i32) -> i32 {
        let range = self.collapsible_range() as i64;
        let distance = self.collapse_scroll_distance() as i64;
        if range == 0 {
            return 0;
        }
        (header_delta as i64 * distance / range) as i32
    }
}
