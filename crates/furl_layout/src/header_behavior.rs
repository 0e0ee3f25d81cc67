//! Header offset controller
//!
//! Owns the header's vertical offset, the single source of truth for how far
//! the header has collapsed. Content scroll deltas are mapped onto the header
//! at the header's scroll rate; whatever the header applies is reported back
//! in content pixels so the remainder flows on to the content.
//!
//! A header with a zero collapsible range has nothing to contribute. In that
//! case the controller becomes transparent and forwards every call to the
//! behavior attached to the scrolling target.

use furl_animation::{offset_animation_duration, Easing, OffsetTween};
use furl_core::{ScrollAxes, ScrollType, VerticalDirection};

use crate::behavior::{NestedScrollBehavior, ScrollCx};
use crate::coordinator::ViewId;
use crate::header::HeaderView;
use crate::offset::ViewOffset;
use crate::state::HeaderState;

/// Nested-scroll behavior attached to a [`HeaderView`]
#[derive(Debug, Clone)]
pub struct HeaderOffsetController {
    offset: ViewOffset,
    /// At most one tween in flight; replaced, never queued
    animation: Option<OffsetTween>,
    easing: Easing,
    /// Collapsible range seen on the last call
    range: i32,
    state: HeaderState,
    last_nested_scrolling_target: Option<ViewId>,
}

impl Default for HeaderOffsetController {
    fn default() -> Self {
        Self::new(Easing::default())
    }
}

impl HeaderOffsetController {
    pub fn new(easing: Easing) -> Self {
        Self {
            offset: ViewOffset::new(),
            animation: None,
            easing,
            range: 0,
            state: HeaderState::Expanded,
            last_nested_scrolling_target: None,
        }
    }

    /// Current header offset, in `[-range, 0]`
    pub fn offset(&self) -> i32 {
        self.offset.top_and_bottom_offset()
    }

    /// Header top including the offset
    pub fn top(&self) -> i32 {
        self.offset.top()
    }

    pub fn state(&self) -> HeaderState {
        self.state
    }

    pub fn collapsible_range(&self) -> i32 {
        self.range
    }

    pub fn animation(&self) -> Option<&OffsetTween> {
        self.animation.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Target of the most recently finished nested scroll
    pub fn last_nested_scrolling_target(&self) -> Option<ViewId> {
        self.last_nested_scrolling_target
    }

    /// Record the header's new layout position; the offset is kept
    pub fn on_layout_child(&mut self, header: &HeaderView) {
        self.offset.on_layout(header.frame().top);
        self.sync_range(header.collapsible_range());
    }

    /// Re-attach: back to fully expanded with no animation
    pub fn reset(&mut self) {
        self.cancel_animation();
        self.offset.reset();
        self.last_nested_scrolling_target = None;
        self.update_state();
    }

    /// Set the offset without bounds, as an animation tick does
    ///
    /// Returns the applied delta (`old - new`).
    pub fn set_offset(&mut self, new_offset: i32) -> i32 {
        self.set_offset_within(new_offset, i32::MIN, i32::MAX)
    }

    /// Set the offset clamped into `[min, max]`
    ///
    /// Nothing changes unless the current offset already lies within
    /// `[min, max]` and `min` is non-zero; an offset outside the working
    /// range is left alone rather than yanked back. Returns the applied
    /// delta (`old - new`), which is 0 when nothing changed.
    pub fn set_offset_within(&mut self, new_offset: i32, min: i32, max: i32) -> i32 {
        let current = self.offset();
        let mut consumed = 0;

        if min != 0 && current >= min && current <= max {
            let new_offset = new_offset.clamp(min, max);
            if current != new_offset {
                self.offset.set_top_and_bottom_offset(new_offset);
                consumed = current - new_offset;
                tracing::trace!(
                    "Header offset {} -> {} (bounds {}..={})",
                    current,
                    new_offset,
                    min,
                    max
                );
                self.update_state();
            }
        }

        consumed
    }

    /// Settle on whichever resting state is nearer
    ///
    /// Already fully collapsed is left as is. Otherwise an offset past half
    /// the range collapses and anything else expands.
    pub fn snap_to_nearest_state(&mut self, header: &HeaderView) {
        let range = self.sync_range(header.collapsible_range());
        let offset = self.offset();

        if offset <= -range {
            return;
        }

        let target = if offset < -range / 2 { -range } else { 0 };
        self.animate_offset_to(target.clamp(-range, 0), 0.0, header.total_header_height());
    }

    /// Animate toward `target`, timing the tween from the fling velocity
    pub fn animate_offset_to(&mut self, target: i32, velocity: f32, header_height: i32) {
        let distance = (self.offset() - target).abs();
        let duration = offset_animation_duration(distance, velocity, header_height);
        self.animate_offset_with_duration(target, duration);
    }

    fn animate_offset_with_duration(&mut self, target: i32, duration_ms: u32) {
        let current = self.offset();
        if current == target {
            if self.cancel_animation() {
                tracing::debug!("Header already at {}, animation cancelled", target);
            }
            return;
        }

        if self.animation.is_some() {
            tracing::debug!("Retargeting header animation to {}", target);
        }
        let tween = OffsetTween::new(current, target, duration_ms, self.easing);
        tracing::debug!(
            "Header animation {} -> {} over {}ms",
            current,
            target,
            tween.duration_ms()
        );
        self.animation = Some(tween);
    }

    /// Drop any running animation, returning whether one was running
    pub fn cancel_animation(&mut self) -> bool {
        self.animation.take().is_some()
    }

    /// Advance the running animation by `dt_ms`
    ///
    /// Returns true if the offset moved.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        let Some(tween) = self.animation.as_mut() else {
            return false;
        };

        let value = tween.advance(dt_ms);
        if tween.is_finished() {
            self.animation = None;
            tracing::debug!("Header animation settled at {}", value);
        }

        self.set_offset(value) != 0
    }

    fn sync_range(&mut self, range: i32) -> i32 {
        if self.range != range {
            self.range = range;
            self.update_state();
        }
        range
    }

    fn sync_range_from(&mut self, cx: &ScrollCx<'_>) -> i32 {
        let range = cx.header.map_or(0, |link| link.collapsible_range());
        self.sync_range(range)
    }

    fn update_state(&mut self) {
        let state = HeaderState::classify(self.offset(), self.range);
        if state != self.state {
            tracing::debug!("Header state {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }
}

impl NestedScrollBehavior for HeaderOffsetController {
    fn on_start_nested_scroll(
        &mut self,
        cx: &mut ScrollCx<'_>,
        axes: ScrollAxes,
        kind: ScrollType,
    ) -> bool {
        let range = self.sync_range_from(cx);
        let started = axes.contains_vertical();

        if started && self.cancel_animation() {
            tracing::debug!("Nested scroll start cancelled header animation");
        }

        if range == 0 {
            tracing::debug!("Header has no collapsible range, forwarding scroll start");
            cx.forward_to_target(|behavior, cx| behavior.on_start_nested_scroll(cx, axes, kind));
        }

        self.last_nested_scrolling_target = None;
        started
    }

    fn on_nested_pre_scroll(
        &mut self,
        cx: &mut ScrollCx<'_>,
        dx: i32,
        dy: i32,
        consumed: &mut [i32; 2],
        kind: ScrollType,
    ) {
        // Revealing earlier content is the target's job while it still can
        if dy < 0 && cx.target.can_scroll_vertically(VerticalDirection::Up) {
            return;
        }
        if dy == 0 {
            return;
        }

        let range = self.sync_range_from(cx);
        let header = cx.header;
        match header {
            Some(link) if range > 0 => {
                let header = link.view;
                let header_dy = header.header_delta_for(dy);
                let target = self.offset().saturating_sub(header_dy);
                let applied = self.set_offset_within(target, -range, 0);
                consumed[1] = header.content_delta_for(applied);
            }
            _ => {
                cx.forward_to_target(|behavior, cx| {
                    behavior.on_nested_pre_scroll(cx, dx, dy, consumed, kind)
                });
            }
        }
    }

    fn on_stop_nested_scroll(&mut self, cx: &mut ScrollCx<'_>, kind: ScrollType) {
        let range = self.sync_range_from(cx);

        if range == 0 {
            cx.forward_to_target(|behavior, cx| behavior.on_stop_nested_scroll(cx, kind));
        } else if kind == ScrollType::Touch && !self.is_animating() {
            // A fling-settle already running is not overridden by the release
            if let Some(link) = cx.header {
                self.snap_to_nearest_state(link.view);
            }
        }

        self.last_nested_scrolling_target = Some(cx.target.id);
    }

    fn on_nested_pre_fling(
        &mut self,
        cx: &mut ScrollCx<'_>,
        velocity_x: f32,
        velocity_y: f32,
    ) -> bool {
        let range = self.sync_range_from(cx);
        let offset = self.offset();

        if offset == 0 {
            return cx
                .forward_to_target(|behavior, cx| {
                    behavior.on_nested_pre_fling(cx, velocity_x, velocity_y)
                })
                .unwrap_or(false);
        }

        if offset > -range {
            let height = cx.header.map_or(0, |link| link.view.total_header_height());
            self.animate_offset_to(-range, velocity_y, height);
            return true;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{DispatchOrigin, HeaderLink, TargetScroll};
    use crate::header::HeaderConfig;
    use furl_core::Rect;

    /// Records what a header forwards in pass-through mode
    #[derive(Default)]
    struct RecordingBehavior {
        starts: u32,
        stops: u32,
        pre_scrolls: Vec<i32>,
        flings: u32,
        consume_fling: bool,
        origins: Vec<DispatchOrigin>,
    }

    impl NestedScrollBehavior for RecordingBehavior {
        fn on_start_nested_scroll(
            &mut self,
            cx: &mut ScrollCx<'_>,
            _axes: ScrollAxes,
            _kind: ScrollType,
        ) -> bool {
            self.starts += 1;
            self.origins.push(cx.origin);
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
            self.pre_scrolls.push(dy);
            self.origins.push(cx.origin);
            consumed[1] = dy / 2;
        }

        fn on_stop_nested_scroll(&mut self, _cx: &mut ScrollCx<'_>, _kind: ScrollType) {
            self.stops += 1;
        }

        fn on_nested_pre_fling(&mut self, _cx: &mut ScrollCx<'_>, _vx: f32, _vy: f32) -> bool {
            self.flings += 1;
            self.consume_fling
        }
    }

    fn header(anchor_row: usize) -> HeaderView {
        let mut header = HeaderView::new(HeaderConfig {
            anchor_row,
            ..Default::default()
        })
        .unwrap();
        let (w, h) = header.measure(400, 800);
        header.layout(Rect::from_origin_size(0, 0, w, h));
        header
    }

    fn target(can_scroll_up: bool) -> TargetScroll {
        TargetScroll {
            id: ViewId::default(),
            can_scroll_up,
            can_scroll_down: true,
            height: 800,
        }
    }

    fn pre_scroll(controller: &mut HeaderOffsetController, view: &HeaderView, dy: i32) -> i32 {
        let mut cx = ScrollCx::new(
            Some(HeaderLink::new(view, controller.offset())),
            target(false),
            None,
        );
        let mut consumed = [0, 0];
        controller.on_nested_pre_scroll(&mut cx, 0, dy, &mut consumed, ScrollType::Touch);
        consumed[1]
    }

    fn stop(controller: &mut HeaderOffsetController, view: &HeaderView) {
        let mut cx = ScrollCx::new(
            Some(HeaderLink::new(view, controller.offset())),
            target(false),
            None,
        );
        controller.on_stop_nested_scroll(&mut cx, ScrollType::Touch);
    }

    fn settle(controller: &mut HeaderOffsetController) {
        while controller.is_animating() {
            controller.tick(16.0);
        }
    }

    #[test]
    fn test_scroll_maps_through_rate() {
        let view = header(2); // R = 100, rate = 0.5
        let mut controller = HeaderOffsetController::default();
        controller.on_layout_child(&view);

        let consumed = pre_scroll(&mut controller, &view, 80);
        assert_eq!(controller.offset(), -40);
        assert_eq!(consumed, 80);
        assert_eq!(controller.state(), HeaderState::Transitioning);
    }

    #[test]
    fn test_offset_stays_clamped() {
        let view = header(2);
        let mut controller = HeaderOffsetController::default();
        controller.on_layout_child(&view);

        for dy in [500, 37, -9, 1_000, -2_000, 3, -7, 250] {
            pre_scroll(&mut controller, &view, dy);
            assert!((-100..=0).contains(&controller.offset()), "dy={dy}");
        }
    }

    #[test]
    fn test_consumed_matches_applied_offset() {
        let view = header(1); // R = 50, rate = 0.25
        let mut controller = HeaderOffsetController::default();
        controller.on_layout_child(&view);
        let rate = view.scroll_rate().unwrap();

        for dy in [7, 13, 40, -5, 90, 300, -11] {
            let before = controller.offset();
            let consumed = pre_scroll(&mut controller, &view, dy);
            let applied = before - controller.offset();
            assert!(
                (consumed as f32 * rate - applied as f32).abs() < 1.0,
                "dy={dy} consumed={consumed} applied={applied}"
            );
        }
    }

    #[test]
    fn test_partial_consumption_at_limit() {
        let view = header(2);
        let mut controller = HeaderOffsetController::default();
        controller.on_layout_child(&view);

        pre_scroll(&mut controller, &view, 160); // -80
        let consumed = pre_scroll(&mut controller, &view, 100);
        assert_eq!(controller.offset(), -100);
        // Only 20 header px were left: 40 content px
        assert_eq!(consumed, 40);
        assert_eq!(controller.state(), HeaderState::Collapsed);

        assert_eq!(pre_scroll(&mut controller, &view, 50), 0);
    }

    #[test]
    fn test_round_trip_returns_to_expanded() {
        let view = header(2);
        let mut controller = HeaderOffsetController::default();
        controller.on_layout_child(&view);

        // R / rate = 200 content px drives a full collapse
        pre_scroll(&mut controller, &view, 200);
        assert_eq!(controller.offset(), -100);
        pre_scroll(&mut controller, &view, -200);
        assert_eq!(controller.offset(), 0);
        assert_eq!(controller.state(), HeaderState::Expanded);
    }

    #[test]
    fn test_reveal_ignored_while_target_can_scroll_up() {
        let view = header(2);
        let mut controller = HeaderOffsetController::default();
        controller.on_layout_child(&view);
        pre_scroll(&mut controller, &view, 200);

        let mut cx = ScrollCx::new(Some(HeaderLink::new(&view, -100)), target(true), None);
        let mut consumed = [0, 0];
        controller.on_nested_pre_scroll(&mut cx, 0, -60, &mut consumed, ScrollType::Touch);
        assert_eq!(consumed, [0, 0]);
        assert_eq!(controller.offset(), -100);
    }

    #[test]
    fn test_snap_boundary() {
        let view = header(2);

        let mut controller = HeaderOffsetController::default();
        controller.on_layout_child(&view);
        pre_scroll(&mut controller, &view, 80); // -40
        stop(&mut controller, &view);
        assert_eq!(controller.animation().map(|a| a.to()), Some(0));
        settle(&mut controller);
        assert_eq!(controller.offset(), 0);

        let mut controller = HeaderOffsetController::default();
        controller.on_layout_child(&view);
        pre_scroll(&mut controller, &view, 120); // -60
        stop(&mut controller, &view);
        assert_eq!(controller.animation().map(|a| a.to()), Some(-100));
        settle(&mut controller);
        assert_eq!(controller.offset(), -100);
        assert_eq!(controller.state(), HeaderState::Collapsed);
    }

    #[test]
    fn test_snap_when_collapsed_is_noop() {
        let view = header(2);
        let mut controller = HeaderOffsetController::default();
        controller.on_layout_child(&view);
        pre_scroll(&mut controller, &view, 400);

        controller.snap_to_nearest_state(&view);
        assert!(!controller.is_animating());
    }

    #[test]
    fn test_non_touch_stop_does_not_snap() {
        let view = header(2);
        let mut controller = HeaderOffsetController::default();
        controller.on_layout_child(&view);
        pre_scroll(&mut controller, &view, 80);

        let mut cx = ScrollCx::new(Some(HeaderLink::new(&view, -40)), target(false), None);
        controller.on_stop_nested_scroll(&mut cx, ScrollType::NonTouch);
        assert!(!controller.is_animating());
        assert_eq!(
            controller.last_nested_scrolling_target(),
            Some(ViewId::default())
        );
    }

    #[test]
    fn test_fling_while_partially_collapsed() {
        let view = header(2);
        let mut controller = HeaderOffsetController::default();
        controller.on_layout_child(&view);
        pre_scroll(&mut controller, &view, 60); // -30

        let mut cx = ScrollCx::new(Some(HeaderLink::new(&view, -30)), target(false), None);
        assert!(controller.on_nested_pre_fling(&mut cx, 0.0, 2_000.0));
        let tween = controller.animation().unwrap();
        assert_eq!(tween.to(), -100);
        // 3 * round(1000 * 70 / 2000)
        assert_eq!(tween.duration_ms(), 105);

        // Lifting the finger after the fling keeps the fling-settle
        stop(&mut controller, &view);
        assert_eq!(controller.animation().map(|a| a.to()), Some(-100));

        settle(&mut controller);
        assert_eq!(controller.offset(), -100);
    }

    #[test]
    fn test_fling_when_expanded_goes_to_target() {
        let view = header(2);
        let mut controller = HeaderOffsetController::default();
        controller.on_layout_child(&view);

        let mut recorder = RecordingBehavior {
            consume_fling: true,
            ..Default::default()
        };
        let mut cx = ScrollCx::new(
            Some(HeaderLink::new(&view, 0)),
            target(false),
            Some(&mut recorder as &mut dyn NestedScrollBehavior),
        );
        assert!(controller.on_nested_pre_fling(&mut cx, 0.0, 1_500.0));
        drop(cx);
        assert_eq!(recorder.flings, 1);
        assert!(!controller.is_animating());

        // No target behavior: nothing consumes the fling
        let mut cx = ScrollCx::new(Some(HeaderLink::new(&view, 0)), target(false), None);
        assert!(!controller.on_nested_pre_fling(&mut cx, 0.0, 1_500.0));
    }

    #[test]
    fn test_fling_when_collapsed_is_not_consumed() {
        let view = header(2);
        let mut controller = HeaderOffsetController::default();
        controller.on_layout_child(&view);
        pre_scroll(&mut controller, &view, 400);

        let mut cx = ScrollCx::new(Some(HeaderLink::new(&view, -100)), target(false), None);
        assert!(!controller.on_nested_pre_fling(&mut cx, 0.0, 1_500.0));
        assert!(!controller.is_animating());
    }

    #[test]
    fn test_animate_to_current_is_idempotent() {
        let view = header(2);
        let mut controller = HeaderOffsetController::default();
        controller.on_layout_child(&view);
        pre_scroll(&mut controller, &view, 80); // -40

        controller.animate_offset_to(0, 0.0, 250);
        assert!(controller.is_animating());
        settle(&mut controller);

        controller.animate_offset_to(0, 0.0, 250);
        assert!(!controller.is_animating());
        controller.animate_offset_to(0, 0.0, 250);
        assert!(!controller.is_animating());
        assert_eq!(controller.offset(), 0);
    }

    #[test]
    fn test_retarget_replaces_animation() {
        let view = header(2);
        let mut controller = HeaderOffsetController::default();
        controller.on_layout_child(&view);
        pre_scroll(&mut controller, &view, 80); // -40

        controller.animate_offset_to(0, 0.0, 250);
        controller.tick(16.0);
        let midway = controller.offset();
        controller.animate_offset_to(-100, 0.0, 250);

        let tween = controller.animation().unwrap();
        assert_eq!(tween.from(), midway);
        assert_eq!(tween.to(), -100);
        assert_eq!(tween.elapsed_ms(), 0.0);
    }

    #[test]
    fn test_scroll_start_cancels_animation() {
        let view = header(2);
        let mut controller = HeaderOffsetController::default();
        controller.on_layout_child(&view);
        pre_scroll(&mut controller, &view, 80);
        stop(&mut controller, &view);
        assert!(controller.is_animating());

        let mut cx = ScrollCx::new(Some(HeaderLink::new(&view, -40)), target(false), None);
        assert!(controller.on_start_nested_scroll(
            &mut cx,
            ScrollAxes::VERTICAL,
            ScrollType::Touch
        ));
        assert!(!controller.is_animating());
        assert_eq!(controller.last_nested_scrolling_target(), None);
    }

    #[test]
    fn test_horizontal_scroll_is_rejected() {
        let view = header(2);
        let mut controller = HeaderOffsetController::default();
        controller.on_layout_child(&view);

        let mut cx = ScrollCx::new(Some(HeaderLink::new(&view, 0)), target(false), None);
        assert!(!controller.on_start_nested_scroll(
            &mut cx,
            ScrollAxes::HORIZONTAL,
            ScrollType::Touch
        ));
    }

    #[test]
    fn test_zero_range_passes_through() {
        let view = header(0);
        assert_eq!(view.collapsible_range(), 0);
        let mut controller = HeaderOffsetController::default();
        controller.on_layout_child(&view);
        let mut recorder = RecordingBehavior::default();

        {
            let mut cx = ScrollCx::new(
                Some(HeaderLink::new(&view, 0)),
                target(false),
                Some(&mut recorder as &mut dyn NestedScrollBehavior),
            );
            assert!(controller.on_start_nested_scroll(
                &mut cx,
                ScrollAxes::VERTICAL,
                ScrollType::Touch
            ));

            for dy in [30, -12, 500] {
                let mut consumed = [0, 0];
                controller.on_nested_pre_scroll(&mut cx, 0, dy, &mut consumed, ScrollType::Touch);
                assert_eq!(consumed[1], dy / 2);
                assert_eq!(controller.offset(), 0);
            }

            controller.on_stop_nested_scroll(&mut cx, ScrollType::Touch);
            assert_eq!(cx.origin, DispatchOrigin::Container);
        }

        assert_eq!(recorder.starts, 1);
        assert_eq!(recorder.pre_scrolls, vec![30, -12, 500]);
        assert_eq!(recorder.stops, 1);
        assert!(recorder
            .origins
            .iter()
            .all(|origin| *origin == DispatchOrigin::Header));
        assert!(!controller.is_animating());
    }

    #[test]
    fn test_zero_range_never_mutates_offset() {
        let view = header(0);
        let mut controller = HeaderOffsetController::default();
        controller.on_layout_child(&view);

        assert_eq!(controller.set_offset_within(-30, 0, 0), 0);
        assert_eq!(pre_scroll(&mut controller, &view, 120), 0);
        assert_eq!(controller.offset(), 0);
        assert_eq!(controller.state(), HeaderState::Expanded);
    }

    #[test]
    fn test_set_offset_leaves_out_of_range_offset_alone() {
        let mut controller = HeaderOffsetController::default();
        controller.set_offset(-150);
        assert_eq!(controller.offset(), -150);

        assert_eq!(controller.set_offset_within(-20, -100, 0), 0);
        assert_eq!(controller.offset(), -150);
    }

    #[test]
    fn test_reset_reattaches_expanded() {
        let view = header(2);
        let mut controller = HeaderOffsetController::default();
        controller.on_layout_child(&view);
        pre_scroll(&mut controller, &view, 120);
        stop(&mut controller, &view);

        controller.reset();
        assert_eq!(controller.offset(), 0);
        assert!(!controller.is_animating());
        assert_eq!(controller.state(), HeaderState::Expanded);
    }
}
