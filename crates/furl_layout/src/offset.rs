//! Vertical offset applied on top of a view's laid-out position
//!
//! Layout places a view; scrolling only translates it. Keeping the two apart
//! lets the offset survive layout passes: each pass records the new layout
//! top and the offset is re-applied on top of it.

/// Layout top plus a persistent vertical translation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewOffset {
    layout_top: i32,
    offset: i32,
}

impl ViewOffset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the top assigned by a layout pass
    pub fn on_layout(&mut self, layout_top: i32) {
        self.layout_top = layout_top;
    }

    /// Current top edge, including the offset
    pub fn top(&self) -> i32 {
        self.layout_top + self.offset
    }

    pub fn top_and_bottom_offset(&self) -> i32 {
        self.offset
    }

    /// Set the offset, returning whether it changed
    pub fn set_top_and_bottom_offset(&mut self, offset: i32) -> bool {
        if self.offset == offset {
            return false;
        }
        self.offset = offset;
        true
    }

    /// Drop the offset back to zero, keeping the layout top
    pub fn reset(&mut self) {
        self.offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_survives_layout() {
        let mut offset = ViewOffset::new();
        offset.on_layout(250);
        assert!(offset.set_top_and_bottom_offset(-40));
        assert_eq!(offset.top(), 210);

        offset.on_layout(300);
        assert_eq!(offset.top_and_bottom_offset(), -40);
        assert_eq!(offset.top(), 260);
    }

    #[test]
    fn test_set_reports_change() {
        let mut offset = ViewOffset::new();
        assert!(!offset.set_top_and_bottom_offset(0));
        assert!(offset.set_top_and_bottom_offset(5));
        assert!(!offset.set_top_and_bottom_offset(5));
        offset.reset();
        assert_eq!(offset.top_and_bottom_offset(), 0);
    }
}
