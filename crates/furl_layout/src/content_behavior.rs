//! Content offset controller
//!
//! Keeps the content flush with the header's visible bottom edge. The header
//! collapses over a shorter distance than the content scrolls, so the
//! content position is re-derived from the live header offset at the header's
//! scroll rate rather than simply following the header's bottom.
//!
//! When the header has nothing to collapse it forwards nested scrolls here
//! and the content slides up over the header by itself, down to the point
//! where only the pinned row remains visible.

use furl_animation::{offset_animation_duration, Easing, OffsetTween};
use furl_core::{Insets, Rect, ScrollAxes, ScrollType};

use crate::behavior::{DispatchOrigin, HeaderLink, NestedScrollBehavior, ScrollCx};
use crate::content::ContentView;
use crate::coordinator::ChildKind;
use crate::header::HeaderView;
use crate::offset::ViewOffset;

/// Nested-scroll behavior attached to the content beneath a header
#[derive(Debug, Clone)]
pub struct ContentOffsetController {
    offset: ViewOffset,
    animation: Option<OffsetTween>,
    easing: Easing,
}

impl Default for ContentOffsetController {
    fn default() -> Self {
        Self::new(Easing::default())
    }
}

impl ContentOffsetController {
    pub fn new(easing: Easing) -> Self {
        Self {
            offset: ViewOffset::new(),
            animation: None,
            easing,
        }
    }

    /// Offset from the laid-out position
    pub fn offset(&self) -> i32 {
        self.offset.top_and_bottom_offset()
    }

    /// Content top including the offset
    pub fn top(&self) -> i32 {
        self.offset.top()
    }

    pub fn animation(&self) -> Option<&OffsetTween> {
        self.animation.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// The content depends on any header
    pub fn layout_depends_on(&self, candidate: &ChildKind) -> bool {
        matches!(candidate, ChildKind::Header(_))
    }

    /// Lowest offset the content may reach: only the pinned row stays visible
    pub fn pinned_floor(header: &HeaderView) -> i32 {
        (header.pinned_row_height() - header.total_header_height()).min(0)
    }

    /// Place the content directly beneath the header's current bottom edge
    ///
    /// Without a header the content fills the container. Returns the frame
    /// before the offset is applied; the offset itself is kept.
    pub fn layout_child(
        &mut self,
        parent: Rect,
        padding: Insets,
        content: &ContentView,
        header: Option<HeaderLink<'_>>,
    ) -> Rect {
        let inner = parent.inset(padding);
        let (width, height) = content.measure(inner.width(), inner.height());
        let margins = content.margins;

        let available = match header {
            Some(header) => Rect::new(
                inner.left + margins.left,
                header.bottom() + margins.top,
                inner.right - margins.right,
                parent.height() + header.bottom() - padding.bottom - margins.bottom,
            ),
            None => inner.inset(margins),
        };

        let frame = content.gravity.apply(width, height, available);
        self.offset.on_layout(frame.top);
        frame
    }

    /// Re-derive the content position from the header it depends on
    ///
    /// Returns true if the content moved.
    pub fn on_dependent_view_changed(&mut self, header: HeaderLink<'_>) -> bool {
        let view = header.view;
        let child_top = self.offset.top();
        let offset = self.offset();

        let extra = if view.collapsible_range() == 0 {
            let dy = child_top - header.bottom();
            let min = Self::pinned_floor(view);
            let new_offset = (offset - dy).clamp(min, 0);
            if new_offset != offset {
                new_offset
            } else {
                0
            }
        } else {
            // Header offset converted to content pixels, minus what the
            // header's own movement already accounts for
            view.content_delta_for(header.offset) - header.offset
        };

        let moved = self
            .offset
            .set_top_and_bottom_offset(offset + (header.bottom() - child_top + extra));
        if moved {
            tracing::trace!(
                "Content top {} -> {} (header bottom {}, offset {})",
                child_top,
                self.offset.top(),
                header.bottom(),
                header.offset
            );
        }
        moved
    }

    /// Settle the content on the pinned floor or back under the header
    pub fn snap_to_nearest_state(&mut self, header: &HeaderView, velocity: f32, height: i32) {
        let min = Self::pinned_floor(header);
        let max = 0;
        let offset = self.offset();

        if offset <= min {
            return;
        }

        let target = if offset < (min + max) / 2 { min } else { max };
        self.animate_offset_to(target.clamp(min, max), velocity, height);
    }

    /// Animate toward `target`, timing the tween from the fling velocity
    pub fn animate_offset_to(&mut self, target: i32, velocity: f32, height: i32) {
        let current = self.offset();
        let duration = offset_animation_duration((current - target).abs(), velocity, height);

        if current == target {
            if self.animation.take().is_some() {
                tracing::debug!("Content already at {}, animation cancelled", target);
            }
            return;
        }

        tracing::debug!("Content animation {} -> {} over {}ms", current, target, duration);
        self.animation = Some(OffsetTween::new(current, target, duration, self.easing));
    }

    pub fn cancel_animation(&mut self) -> bool {
        self.animation.take().is_some()
    }

    /// Advance the running animation by `dt_ms`
    ///
    /// Returns true if the content moved.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        let Some(tween) = self.animation.as_mut() else {
            return false;
        };

        let value = tween.advance(dt_ms);
        if tween.is_finished() {
            self.animation = None;
            tracing::debug!("Content animation settled at {}", value);
        }

        self.offset.set_top_and_bottom_offset(value)
    }
}

impl NestedScrollBehavior for ContentOffsetController {
    fn on_start_nested_scroll(
        &mut self,
        _cx: &mut ScrollCx<'_>,
        _axes: ScrollAxes,
        _kind: ScrollType,
    ) -> bool {
        if self.cancel_animation() {
            tracing::debug!("Nested scroll start cancelled content animation");
        }
        false
    }

    fn on_nested_pre_scroll(
        &mut self,
        cx: &mut ScrollCx<'_>,
        _dx: i32,
        dy: i32,
        consumed: &mut [i32; 2],
        _kind: ScrollType,
    ) {
        // Only a header with nothing to collapse hands scrolls to the content
        if cx.origin != DispatchOrigin::Header {
            return;
        }
        let Some(header) = cx.header else {
            return;
        };

        let min = Self::pinned_floor(header.view);
        let current = self.offset();
        let new_offset = current.saturating_sub(dy).clamp(min, 0);
        if new_offset != current {
            self.offset.set_top_and_bottom_offset(new_offset);
            consumed[1] = current - new_offset;
            tracing::trace!("Content slid {} -> {} over header", current, new_offset);
        }
    }

    fn on_stop_nested_scroll(&mut self, cx: &mut ScrollCx<'_>, kind: ScrollType) {
        // A fling-settle already running is not overridden by the release
        if kind != ScrollType::Touch || self.is_animating() {
            return;
        }
        if let Some(header) = cx.header {
            self.snap_to_nearest_state(header.view, 0.0, cx.target.height);
        }
    }

    fn on_nested_pre_fling(
        &mut self,
        cx: &mut ScrollCx<'_>,
        _velocity_x: f32,
        velocity_y: f32,
    ) -> bool {
        let Some(header) = cx.header else {
            return false;
        };

        if self.offset() > Self::pinned_floor(header.view) {
            self.snap_to_nearest_state(header.view, velocity_y, cx.target.height);
            return true;
        }
        false
    }
}
