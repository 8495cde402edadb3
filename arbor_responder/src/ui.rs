// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The top-level driver that owns a tree and turns input into element hooks.

use std::sync::Arc;

use arbor_event_state::press::{ClickResult, ClickThresholds, PressState};
use arbor_focus::{FocusError, FocusTransfer, Navigation};
use arbor_tree::{
    Container, Context, Element, ElementFlags, ElementId, ElementRef, Hit, Key, ParentError,
    RetryPolicy, Surface, pass,
};
use kurbo::{Point, Rect, Size};
use tracing::{debug, trace};

use crate::{DispatchError, ResponderPath, responder_path};

/// Configuration for a [`Ui`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UiConfig {
    /// Size of the root container.
    pub size: Size,
    /// Restart budget for draw and hit-test passes.
    pub retry: RetryPolicy,
    /// Tolerances for click recognition.
    pub click: ClickThresholds,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            size: Size::new(800.0, 600.0),
            retry: RetryPolicy::default(),
            click: ClickThresholds::default(),
        }
    }
}

#[derive(Debug)]
struct ActivePress {
    element: ElementRef,
    down_point: Point,
    down_local: Point,
}

/// Owns a root [`Container`] and the [`Context`] for its tree, and dispatches
/// pointer and key input to elements.
///
/// - Pointer coordinates are in the root's coordinate space.
/// - Presses on [`ElementFlags::FOCUSABLE`] elements move focus first. While a
///   modal element holds the focus trap, presses on focusable elements outside
///   it are dropped.
/// - Keys go to the focus holder and bubble through parents. An unconsumed
///   [`Key::Tab`] or [`Key::BackTab`] moves focus along the focus chain.
#[derive(Debug)]
pub struct Ui {
    root: Arc<Container>,
    cx: Context,
    press: PressState<ElementId>,
    active: Option<ActivePress>,
    config: UiConfig,
}

impl Default for Ui {
    fn default() -> Self {
        Self::new(UiConfig::default())
    }
}

impl Ui {
    /// A UI with an empty root container of `config.size`.
    pub fn new(config: UiConfig) -> Self {
        let root = Container::new(Rect::from_origin_size(Point::ORIGIN, config.size));
        Self::with_root(root, config)
    }

    /// A UI around an existing root container.
    pub fn with_root(root: Arc<Container>, config: UiConfig) -> Self {
        let mut cx = Context::new();
        let root_ref: ElementRef = root.clone();
        cx.register_root(&root_ref);
        Self {
            root,
            cx,
            press: PressState::with_thresholds(config.click),
            active: None,
            config,
        }
    }

    /// The root container.
    pub fn root(&self) -> &Arc<Container> {
        &self.root
    }

    /// The configuration.
    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    /// The registry and focus state.
    pub fn cx(&self) -> &Context {
        &self.cx
    }

    /// Mutable access to the context, for building and editing the tree.
    pub fn cx_mut(&mut self) -> &mut Context {
        &mut self.cx
    }

    /// Attach `element` to the root container.
    pub fn add(&mut self, element: ElementRef) -> Result<(), ParentError> {
        self.root.add(element, &mut self.cx)
    }

    /// Detach the root's child `id`.
    pub fn remove(&mut self, id: ElementId) -> Option<ElementRef> {
        let removed = self.root.remove(id, &mut self.cx);
        self.cancel_detached_press();
        removed
    }

    /// Attach `child` under `parent`.
    pub fn add_to(&mut self, parent: &Container, child: ElementRef) -> Result<(), ParentError> {
        parent.add(child, &mut self.cx)
    }

    /// Detach `child` from `parent`.
    pub fn remove_from(&mut self, parent: &Container, child: ElementId) -> Option<ElementRef> {
        let removed = parent.remove(child, &mut self.cx);
        self.cancel_detached_press();
        removed
    }

    fn is_attached(&self, id: ElementId) -> bool {
        self.cx.is_descendant(id, self.root.id())
    }

    /// Drop the active press if its element has left the tree, by any route.
    ///
    /// Returns `true` if a press was cancelled.
    fn cancel_detached_press(&mut self) -> bool {
        let Some(active) = &self.active else {
            return false;
        };
        let id = active.element.id();
        if self.is_attached(id) {
            return false;
        }
        debug!(?id, "pressed element left the tree; press cancelled");
        active.element.core().set_pressed(false);
        self.active = None;
        self.press.cancel();
        true
    }

    /// Draw the whole tree onto `surface`.
    ///
    /// Restarts when the tree changes mid-pass; `surface` only receives a
    /// completed frame.
    pub fn draw(&self, surface: &mut dyn Surface) -> Result<(), DispatchError> {
        pass::draw(&*self.root, surface, &self.config.retry)?;
        Ok(())
    }

    /// The deepest element under `point`, if the point is inside the root.
    pub fn hit_test(&self, point: Point) -> Result<Option<Hit>, DispatchError> {
        let root: ElementRef = self.root.clone();
        let local = point - self.root.position().to_vec2();
        Ok(pass::hit_test(&root, local, &self.config.retry)?)
    }

    /// The element currently holding focus.
    pub fn focused(&self) -> Option<ElementRef> {
        self.cx.focused()
    }

    /// Move focus to `id`, honoring the modal trap.
    pub fn focus(
        &mut self,
        id: ElementId,
    ) -> Result<FocusTransfer<ElementId>, FocusError<ElementId>> {
        self.cx.request_focus(id)
    }

    /// Clear focus and any modal trap.
    pub fn clear_focus(&mut self) -> FocusTransfer<ElementId> {
        self.cx.clear_focus()
    }

    /// The path a key typed at `id` bubbles along, target first.
    pub fn responder_path(&self, id: ElementId) -> ResponderPath {
        responder_path(&self.cx, id)
    }

    /// Pointer pressed at `point`.
    ///
    /// Returns the pressed element, or `None` if nothing was hit or the press
    /// was refused by a modal trap.
    pub fn pointer_down(&mut self, point: Point) -> Result<Option<ElementId>, DispatchError> {
        self.cx.prune();
        let Some(hit) = self.hit_test(point)? else {
            return Ok(None);
        };
        let target = hit.element;
        let id = target.id();

        if target.flags().contains(ElementFlags::FOCUSABLE) {
            match self.cx.request_focus(id) {
                Ok(_) => {}
                Err(FocusError::Trapped { modal, node }) => {
                    debug!(?modal, ?node, "press outside the active modal dropped");
                    return Ok(None);
                }
                // Not reachable through the registry; press without focusing.
                Err(FocusError::Unknown(node)) => {
                    trace!(?node, "pressed element has no focus entry");
                }
            }
        }

        self.press.on_down(id, point);
        if let Some(stale) = self.active.take() {
            stale.element.core().set_pressed(false);
        }
        trace!(?id, local = ?hit.local, "pointer down");
        target.core().set_pressed(true);
        target.pressed(hit.local, &mut self.cx);
        self.active = Some(ActivePress {
            element: target,
            down_point: point,
            down_local: hit.local,
        });
        Ok(Some(id))
    }

    /// Pointer moved to `point`. Delivers a drag to the pressed element, if any.
    ///
    /// Returns the dragged element.
    pub fn pointer_move(&mut self, point: Point) -> Option<ElementId> {
        if self.cancel_detached_press() {
            return None;
        }
        let drag = self.press.on_move(point)?;
        let element = self.active.as_ref()?.element.clone();
        trace!(id = ?drag.target, delta = ?drag.delta, "drag");
        element.dragged(drag.delta, &mut self.cx);
        Some(drag.target)
    }

    /// Pointer released at `point`.
    ///
    /// The pressed element is released, then clicked if the press counts as a
    /// click and the element is still in the tree. A press whose element was
    /// detached meanwhile ends without either. Returns the clicked element.
    pub fn pointer_up(&mut self, point: Point) -> Result<Option<ElementId>, DispatchError> {
        self.cancel_detached_press();
        let Some(active) = self.active.take() else {
            self.press.cancel();
            return Ok(None);
        };
        let id = active.element.id();
        // Release even if resolving the point fails.
        let hit = self.hit_test(point);
        let over = match &hit {
            Ok(Some(h)) => Some((h.element.id(), h.local)),
            _ => None,
        };
        let local = match over {
            Some((over_id, local)) if over_id == id => local,
            _ => active.down_local + (point - active.down_point),
        };

        active.element.core().set_pressed(false);
        active.element.released(local, &mut self.cx);

        let current = over.map(|(over_id, _)| over_id);
        let result = self.press.on_up(current.as_ref(), point);
        hit?;
        match result {
            // `released` may have detached it.
            ClickResult::Click(clicked) if !self.is_attached(clicked) => {
                debug!(id = ?clicked, "released element left the tree; click dropped");
                Ok(None)
            }
            ClickResult::Click(clicked) => {
                trace!(id = ?clicked, ?local, "click");
                active.element.clicked(local, &mut self.cx);
                Ok(Some(clicked))
            }
            ClickResult::Suppressed(_) => Ok(None),
        }
    }

    /// Press and release at `point`. Returns the clicked element.
    pub fn click(&mut self, point: Point) -> Result<Option<ElementId>, DispatchError> {
        if self.pointer_down(point)?.is_none() {
            return Ok(None);
        }
        self.pointer_up(point)
    }

    /// Press at `from`, move to `to`, and release. Returns the dragged element.
    pub fn drag(&mut self, from: Point, to: Point) -> Result<Option<ElementId>, DispatchError> {
        let Some(id) = self.pointer_down(from)? else {
            return Ok(None);
        };
        self.pointer_move(to);
        self.pointer_up(to)?;
        Ok(Some(id))
    }

    /// Deliver `key` to the focus holder and let it bubble.
    ///
    /// Returns `true` if an element consumed the key or it moved focus.
    pub fn key(&mut self, key: Key) -> bool {
        self.cx.prune();
        let consumed = match self.cx.focused() {
            Some(holder) => {
                trace!(id = ?holder.id(), ?key, "key");
                holder.key_typed(key, &mut self.cx)
            }
            None => false,
        };
        if consumed {
            return true;
        }
        let navigation = match key {
            Key::Tab => Navigation::Next,
            Key::BackTab => Navigation::Prev,
            _ => return false,
        };
        match self.cx.traverse(navigation) {
            Ok(transfer) => !transfer.is_empty(),
            Err(err) => {
                debug!(%err, "focus traversal refused");
                false
            }
        }
    }
}
