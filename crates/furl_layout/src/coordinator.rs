//! Scroll coordination container
//!
//! The [`Coordinator`] owns a header, the content beneath it and the offset
//! controllers attached to each. It resolves which children depend on which,
//! lays them out in dependency order and routes nested-scroll events from the
//! scrolling target to every behavior that accepted the scroll. Whatever the
//! behaviors leave unconsumed goes to the target itself.
//!
//! Dependents are notified whenever a header's visible bounds change, after
//! scroll dispatch and animation ticks alike.

use rustc_hash::FxHashMap;
use serde::Serialize;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use furl_core::{
    FurlError, Gravity, Insets, Rect, Result, ScrollAxes, ScrollType, VerticalDirection,
};

use crate::behavior::{HeaderLink, NestedScrollBehavior, ScrollCx, TargetScroll};
use crate::content::ContentView;
use crate::content_behavior::ContentOffsetController;
use crate::header::{HeaderConfig, HeaderView};
use crate::header_behavior::HeaderOffsetController;
use crate::state::HeaderState;

new_key_type! {
    pub struct ViewId;
}

/// The view a child of the coordinator holds
#[derive(Debug, Clone)]
pub enum ChildKind {
    Header(HeaderView),
    Content(ContentView),
}

impl ChildKind {
    pub fn is_header(&self) -> bool {
        matches!(self, ChildKind::Header(_))
    }
}

#[derive(Debug, Clone)]
enum Behavior {
    Header(HeaderOffsetController),
    Content(ContentOffsetController),
}

impl Behavior {
    fn as_nested_mut(&mut self) -> &mut dyn NestedScrollBehavior {
        match self {
            Behavior::Header(controller) => controller,
            Behavior::Content(controller) => controller,
        }
    }

    fn layout_depends_on(&self, candidate: &ChildKind) -> bool {
        match self {
            Behavior::Header(_) => false,
            Behavior::Content(controller) => controller.layout_depends_on(candidate),
        }
    }

    fn offset(&self) -> i32 {
        match self {
            Behavior::Header(controller) => controller.offset(),
            Behavior::Content(controller) => controller.offset(),
        }
    }

    fn is_animating(&self) -> bool {
        match self {
            Behavior::Header(controller) => controller.is_animating(),
            Behavior::Content(controller) => controller.is_animating(),
        }
    }
}

#[derive(Debug, Clone)]
struct Child {
    kind: ChildKind,
    /// Taken out while the behavior is being called
    behavior: Option<Behavior>,
    /// Laid-out frame before the behavior offset
    frame: Rect,
    nested_scroll_accepted: bool,
}

/// Where one scroll delta went
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScrollOutcome {
    pub dy: i32,
    /// Used by the behaviors before the target saw it
    pub consumed_by_behaviors: i32,
    /// Used by the target's own inner scroll
    pub consumed_by_target: i32,
    pub unconsumed: i32,
}

/// Container coordinating a collapsing header and its scrolling content
#[derive(Debug, Clone, Default)]
pub struct Coordinator {
    children: SlotMap<ViewId, Child>,
    /// Layout and dispatch order; dependencies come first once resolved
    order: Vec<ViewId>,
    dependencies: FxHashMap<ViewId, SmallVec<[ViewId; 2]>>,
    last_header_bounds: FxHashMap<ViewId, Rect>,
    bounds: Rect,
    padding: Insets,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_padding(padding: Insets) -> Self {
        Self {
            padding,
            ..Self::default()
        }
    }

    /// Container bounds from the last layout pass
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Add a header with its offset controller
    pub fn add_header(&mut self, config: HeaderConfig) -> Result<ViewId> {
        let easing = config.snap_easing;
        let view = HeaderView::new(config)?;
        let id = self.insert(
            ChildKind::Header(view),
            Behavior::Header(HeaderOffsetController::new(easing)),
        );
        tracing::debug!("Added header {:?}", id);
        Ok(id)
    }

    /// Add a content view that follows the header above it
    pub fn add_content(&mut self, view: ContentView) -> ViewId {
        let id = self.insert(
            ChildKind::Content(view),
            Behavior::Content(ContentOffsetController::default()),
        );
        tracing::debug!("Added content {:?}", id);
        id
    }

    fn insert(&mut self, kind: ChildKind, behavior: Behavior) -> ViewId {
        let id = self.children.insert(Child {
            kind,
            behavior: Some(behavior),
            frame: Rect::ZERO,
            nested_scroll_accepted: false,
        });
        self.order.push(id);
        id
    }

    /// Remove a child; views depending on it stop doing so
    pub fn remove(&mut self, id: ViewId) -> Result<()> {
        self.children.remove(id).ok_or(FurlError::UnknownView)?;
        self.order.retain(|other| *other != id);
        self.dependencies.remove(&id);
        for deps in self.dependencies.values_mut() {
            deps.retain(|dep| *dep != id);
        }
        self.dependencies.retain(|_, deps| !deps.is_empty());
        self.last_header_bounds.remove(&id);
        tracing::debug!("Removed {:?}", id);
        Ok(())
    }

    /// Children in layout order
    pub fn children(&self) -> impl Iterator<Item = ViewId> + '_ {
        self.order.iter().copied()
    }

    /// Children `id` depends on, as resolved by the last layout pass
    pub fn dependencies_of(&self, id: ViewId) -> &[ViewId] {
        self.dependencies.get(&id).map_or(&[], |deps| deps.as_slice())
    }

    pub fn header(&self, id: ViewId) -> Result<&HeaderView> {
        match &self.child(id)?.kind {
            ChildKind::Header(view) => Ok(view),
            ChildKind::Content(_) => Err(FurlError::NotAHeader),
        }
    }

    pub fn content(&self, id: ViewId) -> Result<&ContentView> {
        match &self.child(id)?.kind {
            ChildKind::Content(view) => Ok(view),
            ChildKind::Header(_) => Err(FurlError::NotContent),
        }
    }

    pub fn header_controller(&self, id: ViewId) -> Result<&HeaderOffsetController> {
        match self.child(id)?.behavior.as_ref() {
            Some(Behavior::Header(controller)) => Ok(controller),
            _ => Err(FurlError::NotAHeader),
        }
    }

    pub fn content_controller(&self, id: ViewId) -> Result<&ContentOffsetController> {
        match self.child(id)?.behavior.as_ref() {
            Some(Behavior::Content(controller)) => Ok(controller),
            _ => Err(FurlError::NotContent),
        }
    }

    /// Current header offset, in `[-range, 0]`
    pub fn header_offset(&self, id: ViewId) -> Result<i32> {
        self.header_controller(id).map(HeaderOffsetController::offset)
    }

    pub fn header_state(&self, id: ViewId) -> Result<HeaderState> {
        self.header_controller(id).map(HeaderOffsetController::state)
    }

    /// Visible bounds of a child: its laid-out frame moved by its offset
    pub fn bounds_of(&self, id: ViewId) -> Result<Rect> {
        let child = self.child(id)?;
        let offset = child.behavior.as_ref().map_or(0, Behavior::offset);
        Ok(child.frame.offset_vertical(offset))
    }

    /// Change which header row stays pinned when collapsed
    ///
    /// The header controller is re-attached, so the header returns to fully
    /// expanded. Takes effect on the next [`layout`](Self::layout).
    pub fn set_anchor_row(&mut self, id: ViewId, row: usize) -> Result<()> {
        let child = self.children.get_mut(id).ok_or(FurlError::UnknownView)?;
        let ChildKind::Header(view) = &mut child.kind else {
            return Err(FurlError::NotAHeader);
        };
        view.set_anchor_row(row)?;
        if let Some(Behavior::Header(controller)) = child.behavior.as_mut() {
            controller.reset();
        }
        tracing::debug!("Header {:?} anchor row set to {}", id, row);
        Ok(())
    }

    pub fn is_animating(&self) -> bool {
        self.children
            .values()
            .filter_map(|child| child.behavior.as_ref())
            .any(Behavior::is_animating)
    }

    /// Measure and place every child inside a `width` x `height` container
    pub fn layout(&mut self, width: i32, height: i32) {
        self.bounds = Rect::from_origin_size(0, 0, width, height);
        self.resolve_dependencies();

        let parent = self.bounds;
        let padding = self.padding;
        let inner = parent.inset(padding);

        for id in self.order.clone() {
            let header_id = self.header_for(id).filter(|header| *header != id);
            let header_offset = header_id.and_then(|header| self.header_offset(header).ok());

            let Some(child) = self.children.get_mut(id) else {
                continue;
            };

            if let (ChildKind::Header(view), Some(Behavior::Header(controller))) =
                (&mut child.kind, child.behavior.as_mut())
            {
                let (w, h) = view.measure(inner.width(), inner.height());
                let frame = Gravity::NONE.apply(w, h, inner);
                view.layout(frame);
                controller.on_layout_child(view);
                child.frame = frame;
                continue;
            }

            let frame = self.with_behavior(id, |behavior, this| {
                let Behavior::Content(controller) = behavior else {
                    return None;
                };
                let ChildKind::Content(view) = &this.children.get(id)?.kind else {
                    return None;
                };
                let header = header_id
                    .zip(header_offset)
                    .and_then(|(header, offset)| this.header_link(header, offset));
                Some(controller.layout_child(parent, padding, view, header))
            });

            if let (Some(Some(frame)), Some(child)) = (frame, self.children.get_mut(id)) {
                child.frame = frame;
            }
        }

        tracing::debug!(
            "Laid out {} children in {}x{}",
            self.order.len(),
            width,
            height
        );
        self.notify_dependents(true);
    }

    /// Offer a nested scroll from `target` to every behavior
    ///
    /// Returns whether any behavior accepted it.
    pub fn start_nested_scroll(
        &mut self,
        target: ViewId,
        axes: ScrollAxes,
        kind: ScrollType,
    ) -> Result<bool> {
        let snapshot = self.target_scroll(target)?;
        let mut accepted_any = false;

        for id in self.order.clone() {
            let accepted = self
                .dispatch(id, snapshot, |behavior, cx| {
                    behavior.on_start_nested_scroll(cx, axes, kind)
                })
                .unwrap_or(false);
            if let Some(child) = self.children.get_mut(id) {
                child.nested_scroll_accepted = accepted;
            }
            accepted_any |= accepted;
        }

        tracing::debug!(
            "Nested scroll start from {:?} ({:?}): accepted = {}",
            target,
            kind,
            accepted_any
        );
        Ok(accepted_any)
    }

    /// Let the accepting behaviors react to `(dx, dy)` before the target
    ///
    /// Returns the combined consumption: for each axis, the largest amount
    /// used in the direction of travel.
    pub fn nested_pre_scroll(
        &mut self,
        target: ViewId,
        dx: i32,
        dy: i32,
        kind: ScrollType,
    ) -> Result<[i32; 2]> {
        let snapshot = self.target_scroll(target)?;
        let mut x_consumed = 0;
        let mut y_consumed = 0;
        let mut dispatched = false;

        for id in self.accepted_children() {
            let mut consumed = [0, 0];
            self.dispatch(id, snapshot, |behavior, cx| {
                behavior.on_nested_pre_scroll(cx, dx, dy, &mut consumed, kind)
            });

            x_consumed = if dx > 0 {
                x_consumed.max(consumed[0])
            } else {
                x_consumed.min(consumed[0])
            };
            y_consumed = if dy > 0 {
                y_consumed.max(consumed[1])
            } else {
                y_consumed.min(consumed[1])
            };
            dispatched = true;
        }

        if dispatched {
            self.notify_dependents(false);
        }
        Ok([x_consumed, y_consumed])
    }

    /// Hand the residual of a scroll step to the target's own inner scroll
    ///
    /// Returns what the target absorbed; a header target absorbs nothing.
    pub fn nested_scroll(&mut self, id: ViewId, dy: i32) -> Result<i32> {
        let child = self.children.get_mut(id).ok_or(FurlError::UnknownView)?;
        match &mut child.kind {
            ChildKind::Content(view) => Ok(view.scroll_by(dy)),
            ChildKind::Header(_) => Ok(0),
        }
    }

    /// One vertical scroll step: behaviors first, then the target's own scroll
    pub fn scroll(&mut self, target: ViewId, dy: i32, kind: ScrollType) -> Result<ScrollOutcome> {
        let consumed = self.nested_pre_scroll(target, 0, dy, kind)?;
        let residual = dy - consumed[1];
        let by_target = self.nested_scroll(target, residual)?;

        let outcome = ScrollOutcome {
            dy,
            consumed_by_behaviors: consumed[1],
            consumed_by_target: by_target,
            unconsumed: residual - by_target,
        };
        tracing::trace!("Scroll {:?}: {:?}", target, outcome);
        Ok(outcome)
    }

    /// End the nested scroll for every accepting behavior
    pub fn stop_nested_scroll(&mut self, target: ViewId, kind: ScrollType) -> Result<()> {
        let snapshot = self.target_scroll(target)?;

        for id in self.accepted_children() {
            self.dispatch(id, snapshot, |behavior, cx| {
                behavior.on_stop_nested_scroll(cx, kind)
            });
            if let Some(child) = self.children.get_mut(id) {
                child.nested_scroll_accepted = false;
            }
        }

        tracing::debug!("Nested scroll stop from {:?} ({:?})", target, kind);
        Ok(())
    }

    /// Offer a fling to the accepting behaviors; true if any consumed it
    pub fn nested_pre_fling(
        &mut self,
        target: ViewId,
        velocity_x: f32,
        velocity_y: f32,
    ) -> Result<bool> {
        let snapshot = self.target_scroll(target)?;
        let mut handled = false;

        for id in self.accepted_children() {
            handled |= self
                .dispatch(id, snapshot, |behavior, cx| {
                    behavior.on_nested_pre_fling(cx, velocity_x, velocity_y)
                })
                .unwrap_or(false);
        }

        tracing::debug!(
            "Fling from {:?} at {}: consumed = {}",
            target,
            velocity_y,
            handled
        );
        Ok(handled)
    }

    /// Advance every running animation by `dt_ms`
    ///
    /// Returns whether any animation is still running.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        let mut moved = false;
        for child in self.children.values_mut() {
            moved |= match child.behavior.as_mut() {
                Some(Behavior::Header(controller)) => controller.tick(dt_ms),
                Some(Behavior::Content(controller)) => controller.tick(dt_ms),
                None => false,
            };
        }

        if moved {
            self.notify_dependents(false);
        }
        self.is_animating()
    }

    fn child(&self, id: ViewId) -> Result<&Child> {
        self.children.get(id).ok_or(FurlError::UnknownView)
    }

    fn accepted_children(&self) -> SmallVec<[ViewId; 4]> {
        self.order
            .iter()
            .copied()
            .filter(|id| {
                self.children
                    .get(*id)
                    .is_some_and(|child| child.nested_scroll_accepted)
            })
            .collect()
    }

    fn header_link(&self, id: ViewId, offset: i32) -> Option<HeaderLink<'_>> {
        match &self.children.get(id)?.kind {
            ChildKind::Header(view) => Some(HeaderLink::new(view, offset)),
            ChildKind::Content(_) => None,
        }
    }

    /// The header a child works against: itself, or the first header it
    /// depends on
    fn header_for(&self, id: ViewId) -> Option<ViewId> {
        if self.children.get(id)?.kind.is_header() {
            return Some(id);
        }
        self.dependencies_of(id).iter().copied().find(|dep| {
            self.children
                .get(*dep)
                .is_some_and(|child| child.kind.is_header())
        })
    }

    fn target_scroll(&self, id: ViewId) -> Result<TargetScroll> {
        let child = self.child(id)?;
        let (can_scroll_up, can_scroll_down) = match &child.kind {
            ChildKind::Content(view) => (
                view.can_scroll_vertically(VerticalDirection::Up),
                view.can_scroll_vertically(VerticalDirection::Down),
            ),
            ChildKind::Header(_) => (false, false),
        };
        Ok(TargetScroll {
            id,
            can_scroll_up,
            can_scroll_down,
            height: child.frame.height(),
        })
    }

    fn resolve_dependencies(&mut self) {
        let mut resolved = Vec::new();
        for &id in &self.order {
            let Some(behavior) = self.children.get(id).and_then(|c| c.behavior.as_ref()) else {
                continue;
            };
            let deps: SmallVec<[ViewId; 2]> = self
                .order
                .iter()
                .copied()
                .filter(|other| *other != id)
                .filter(|other| {
                    self.children
                        .get(*other)
                        .is_some_and(|child| behavior.layout_depends_on(&child.kind))
                })
                .collect();
            if !deps.is_empty() {
                resolved.push((id, deps));
            }
        }

        self.dependencies = resolved.into_iter().collect();

        // Dependencies lay out before their dependents
        let dependencies = &self.dependencies;
        self.order.sort_by_key(|id| dependencies.contains_key(id));
    }

    /// Run `f` with the behavior of `id` taken out of its slot
    fn with_behavior<R>(
        &mut self,
        id: ViewId,
        f: impl FnOnce(&mut Behavior, &Self) -> R,
    ) -> Option<R> {
        let mut behavior = self.children.get_mut(id)?.behavior.take()?;
        let result = f(&mut behavior, self);
        if let Some(child) = self.children.get_mut(id) {
            child.behavior = Some(behavior);
        }
        Some(result)
    }

    /// Call one behavior with a context built around `target`
    fn dispatch<R>(
        &mut self,
        receiver: ViewId,
        target: TargetScroll,
        f: impl FnOnce(&mut dyn NestedScrollBehavior, &mut ScrollCx<'_>) -> R,
    ) -> Option<R> {
        let header_id = self.header_for(receiver);
        let header_offset = header_id.and_then(|header| self.header_offset(header).ok());

        let mut target_behavior = if target.id != receiver {
            self.children
                .get_mut(target.id)
                .and_then(|child| child.behavior.take())
        } else {
            None
        };

        let result = self.with_behavior(receiver, |behavior, this| {
            let header = header_id
                .zip(header_offset)
                .and_then(|(header, offset)| this.header_link(header, offset));
            let mut cx = ScrollCx::new(
                header,
                target,
                target_behavior.as_mut().map(Behavior::as_nested_mut),
            );
            f(behavior.as_nested_mut(), &mut cx)
        });

        if let Some(behavior) = target_behavior {
            if let Some(child) = self.children.get_mut(target.id) {
                child.behavior = Some(behavior);
            }
        }
        result
    }

    /// Re-derive dependents of every header whose visible bounds moved
    ///
    /// After a layout pass, dependents of a collapsible header are re-derived
    /// even when its bounds are unchanged, since their frames were just reset.
    fn notify_dependents(&mut self, after_layout: bool) {
        let headers: SmallVec<[ViewId; 2]> = self
            .order
            .iter()
            .copied()
            .filter(|id| {
                self.children
                    .get(*id)
                    .is_some_and(|child| child.kind.is_header())
            })
            .collect();

        for header_id in headers {
            let (Ok(bounds), Ok(offset), Ok(view)) = (
                self.bounds_of(header_id),
                self.header_offset(header_id),
                self.header(header_id),
            ) else {
                continue;
            };
            let collapsible = view.collapsible_range() > 0;

            let changed = self.last_header_bounds.insert(header_id, bounds) != Some(bounds);
            if !changed && !(after_layout && collapsible) {
                continue;
            }

            let dependents: SmallVec<[ViewId; 2]> = self
                .order
                .iter()
                .copied()
                .filter(|id| self.dependencies_of(*id).contains(&header_id))
                .collect();

            for dependent in dependents {
                self.with_behavior(dependent, |behavior, this| {
                    if let (Behavior::Content(controller), Some(header)) =
                        (behavior, this.header_link(header_id, offset))
                    {
                        controller.on_dependent_view_changed(header);
                    }
                });
            }
        }
    }
}
