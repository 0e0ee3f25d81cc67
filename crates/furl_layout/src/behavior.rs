//! Nested-scroll capability interface
//!
//! Behaviors are attached to the children of a [`Coordinator`](crate::Coordinator).
//! The coordinator routes nested-scroll events to every interested behavior
//! before the scrolling target consumes what is left. Each call carries a
//! [`ScrollCx`] describing the world the behavior reacts to: the header it
//! depends on, the scrolling target, and the behavior attached to that target
//! for pass-through forwarding.

use furl_core::{Rect, ScrollAxes, ScrollType, VerticalDirection};

use crate::coordinator::ViewId;
use crate::header::HeaderView;

/// Handlers for the nested-scroll protocol
pub trait NestedScrollBehavior {
    /// A nested scroll is starting; return whether this behavior wants it
    fn on_start_nested_scroll(
        &mut self,
        cx: &mut ScrollCx<'_>,
        axes: ScrollAxes,
        kind: ScrollType,
    ) -> bool;

    /// React to a scroll delta before the target consumes it
    ///
    /// `consumed` holds what this behavior used of `(dx, dy)` on return.
    fn on_nested_pre_scroll(
        &mut self,
        cx: &mut ScrollCx<'_>,
        dx: i32,
        dy: i32,
        consumed: &mut [i32; 2],
        kind: ScrollType,
    );

    /// The nested scroll ended
    fn on_stop_nested_scroll(&mut self, cx: &mut ScrollCx<'_>, kind: ScrollType);

    /// A fling is about to start; return true to consume it
    fn on_nested_pre_fling(&mut self, cx: &mut ScrollCx<'_>, velocity_x: f32, velocity_y: f32)
        -> bool;
}

/// Read-only view of a header and its current offset
#[derive(Debug, Clone, Copy)]
pub struct HeaderLink<'a> {
    pub view: &'a HeaderView,
    pub offset: i32,
}

impl<'a> HeaderLink<'a> {
    pub fn new(view: &'a HeaderView, offset: i32) -> Self {
        Self { view, offset }
    }

    /// Header bounds with the offset applied
    pub fn bounds(&self) -> Rect {
        self.view.frame().offset_vertical(self.offset)
    }

    pub fn top(&self) -> i32 {
        self.bounds().top
    }

    pub fn bottom(&self) -> i32 {
        self.bounds().bottom
    }

    pub fn collapsible_range(&self) -> i32 {
        self.view.collapsible_range()
    }
}

/// Snapshot of the view the user is scrolling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetScroll {
    pub id: ViewId,
    /// Whether earlier content can still be revealed
    pub can_scroll_up: bool,
    /// Whether later content can still be revealed
    pub can_scroll_down: bool,
    /// Height of the target view
    pub height: i32,
}

impl TargetScroll {
    pub fn can_scroll_vertically(&self, direction: VerticalDirection) -> bool {
        match direction {
            VerticalDirection::Up => self.can_scroll_up,
            VerticalDirection::Down => self.can_scroll_down,
        }
    }
}

/// Who delivered the current call to a behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchOrigin {
    /// The coordinator's own dispatch
    #[default]
    Container,
    /// Forwarded by a header with nothing to collapse
    Header,
}

/// Context for a single nested-scroll call
pub struct ScrollCx<'a> {
    /// Header this behavior depends on (its own view for a header behavior)
    pub header: Option<HeaderLink<'a>>,
    pub target: TargetScroll,
    pub origin: DispatchOrigin,
    target_behavior: Option<&'a mut dyn NestedScrollBehavior>,
}

impl<'a> ScrollCx<'a> {
    pub fn new(
        header: Option<HeaderLink<'a>>,
        target: TargetScroll,
        target_behavior: Option<&'a mut dyn NestedScrollBehavior>,
    ) -> Self {
        Self {
            header,
            target,
            origin: DispatchOrigin::Container,
            target_behavior,
        }
    }

    /// Forward a call to the behavior attached to the scrolling target
    ///
    /// The forwarded call sees the same header and target, with
    /// [`DispatchOrigin::Header`] as its origin. Returns `None` when the
    /// target has no behavior.
    pub fn forward_to_target<R>(
        &mut self,
        f: impl FnOnce(&mut dyn NestedScrollBehavior, &mut ScrollCx<'_>) -> R,
    ) -> Option<R> {
        let behavior = self.target_behavior.take()?;
        let origin = std::mem::replace(&mut self.origin, DispatchOrigin::Header);
        let result = f(&mut *behavior, self);
        self.origin = origin;
        self.target_behavior = Some(behavior);
        Some(result)
    }
}
