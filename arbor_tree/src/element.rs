// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The element contract and the state every element carries.

use std::fmt;
use std::sync::{Arc, Weak};

use kurbo::{Point, Rect, Size, Vec2};
use parking_lot::RwLock;

use crate::{
    ConcurrentModification, Context, ElementFlags, ElementId, ElementList, Key, ParentError,
    Surface,
};

/// Shared handle to any element.
pub type ElementRef = Arc<dyn Element>;

/// Conversion from a concrete `Arc<T>` to an [`ElementRef`].
///
/// Implemented for every sized [`Element`]; it lets default methods on the
/// trait hand out a reference to `self` when `Self` may be unsized.
pub trait IntoElementRef {
    /// Erase the concrete type.
    fn into_element_ref(self: Arc<Self>) -> ElementRef;
}

impl<T: Element> IntoElementRef for T {
    fn into_element_ref(self: Arc<Self>) -> ElementRef {
        self
    }
}

/// The result of a successful hit test.
#[derive(Clone, Debug)]
pub struct Hit {
    /// The deepest element containing the point, after decorator retargeting.
    pub element: ElementRef,
    /// The point in `element`'s local coordinates.
    pub local: Point,
}

impl Hit {
    /// A hit on `element` at `local`.
    pub fn new(element: ElementRef, local: Point) -> Self {
        Self { element, local }
    }
}

/// A rectangular, interactive node of the tree.
///
/// Positions are relative to the parent's origin. Geometry and flags live in an
/// [`ElementCore`]; everything else has a default, so a leaf only has to supply
/// [`Element::core`] and usually [`Element::draw`].
///
/// Event hooks receive the [`Context`] so they can move focus or edit the tree.
/// The hooks are invoked on the dispatching thread; an element must not assume
/// it is the only reader of its own state.
pub trait Element: IntoElementRef + Send + Sync + 'static {
    /// Shared geometry, flags, and parent link.
    fn core(&self) -> &ElementCore;

    /// Identity. Decorators forward to the element they wrap.
    fn id(&self) -> ElementId {
        self.core().id()
    }

    /// Top-left corner in the parent's coordinates.
    fn position(&self) -> Point {
        self.core().position()
    }

    /// Width and height.
    fn size(&self) -> Size {
        self.core().size()
    }

    /// The rectangle this element occupies in its parent's coordinates.
    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position(), self.size())
    }

    /// Stacking priority; higher draws on top and is hit first.
    fn z_priority(&self) -> i32 {
        self.core().z_priority()
    }

    /// Visibility, picking, focus, and modality flags.
    fn flags(&self) -> ElementFlags {
        self.core().flags()
    }

    /// The child collection, for elements that own children.
    fn child_list(&self) -> Option<&ElementList> {
        None
    }

    /// Paint into `surface` with the top-left corner at `origin`.
    ///
    /// Containers propagate [`ConcurrentModification`] from their child
    /// iteration so the whole pass can restart.
    fn draw(&self, surface: &mut dyn Surface, origin: Point) -> Result<(), ConcurrentModification> {
        let _ = (surface, origin);
        Ok(())
    }

    /// Resolve `point` (local coordinates, already known to be inside) to the
    /// deepest element that contains it.
    fn hit_test(self: Arc<Self>, point: Point) -> Result<Hit, ConcurrentModification> {
        Ok(Hit::new(self.into_element_ref(), point))
    }

    /// The pointer went down on this element.
    fn pressed(&self, point: Point, cx: &mut Context) {
        let _ = (point, cx);
    }

    /// The pointer that went down on this element was lifted.
    fn released(&self, point: Point, cx: &mut Context) {
        let _ = (point, cx);
    }

    /// A press and release both landed on this element.
    fn clicked(&self, point: Point, cx: &mut Context) {
        let _ = (point, cx);
    }

    /// The pointer moved by `delta` while pressed on this element.
    fn dragged(&self, delta: Vec2, cx: &mut Context) {
        let _ = (delta, cx);
    }

    /// Handle a key typed while this element holds focus.
    ///
    /// Returns `true` when consumed. The default offers the key to the parent.
    fn key_typed(&self, key: Key, cx: &mut Context) -> bool {
        self.core().bubble_key(key, cx)
    }

    /// This element became the focus holder.
    fn focus_gained(&self, cx: &mut Context) {
        let _ = cx;
    }

    /// This element stopped being the focus holder.
    fn focus_lost(&self, cx: &mut Context) {
        let _ = cx;
    }
}

impl fmt::Debug for dyn Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id())
            .field("bounds", &self.bounds())
            .field("z_priority", &self.z_priority())
            .finish_non_exhaustive()
    }
}

/// Elements compare by identity, so a decorator equals the element it wraps.
impl PartialEq for dyn Element {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for dyn Element {}

/// What a child can ask of its parent.
pub trait ParentHandle: Send + Sync {
    /// The parent's id.
    fn parent_id(&self) -> ElementId;

    /// Offer a key a child did not consume.
    fn key_typed(&self, key: Key, cx: &mut Context) -> bool;

    /// Attach `child`.
    fn add_child(&self, child: ElementRef, cx: &mut Context) -> Result<(), ParentError> {
        let _ = (child, cx);
        Err(ParentError::Unsupported)
    }

    /// Detach the child with id `child`; `Ok(false)` if it was not a child.
    fn remove_child(&self, child: ElementId, cx: &mut Context) -> Result<bool, ParentError> {
        let _ = (child, cx);
        Err(ParentError::Unsupported)
    }
}

/// Non-owning link from a child to its parent.
#[derive(Clone)]
pub struct ParentRef {
    id: ElementId,
    handle: Weak<dyn ParentHandle>,
}

impl fmt::Debug for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParentRef")
            .field("id", &self.id)
            .field("alive", &(self.handle.strong_count() > 0))
            .finish()
    }
}

impl ParentRef {
    /// Link to `handle`, which belongs to the element `id`.
    pub fn new(id: ElementId, handle: Weak<dyn ParentHandle>) -> Self {
        Self { id, handle }
    }

    /// The parent's id.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// The parent, if it is still alive.
    pub fn upgrade(&self) -> Option<Arc<dyn ParentHandle>> {
        self.handle.upgrade()
    }

    /// Offer `key` to the parent; `false` if the parent is gone or declines.
    pub fn key_typed(&self, key: Key, cx: &mut Context) -> bool {
        self.upgrade().is_some_and(|parent| parent.key_typed(key, cx))
    }
}

#[derive(Clone, Debug)]
struct CoreState {
    position: Point,
    size: Size,
    z_priority: i32,
    flags: ElementFlags,
    pressed: bool,
    parent: Option<ParentRef>,
}

/// Geometry, flags, and parent link shared by every element.
///
/// All accessors take `&self`; the state sits behind a lock so elements can be
/// read from a drawing thread while an input thread updates them.
#[derive(Debug)]
pub struct ElementCore {
    id: ElementId,
    state: RwLock<CoreState>,
}

impl ElementCore {
    /// A core occupying `bounds` with default flags and z-priority 0.
    ///
    /// Negative extents are clamped to zero.
    pub fn new(bounds: Rect) -> Self {
        let bounds = bounds.abs();
        Self {
            id: ElementId::next(),
            state: RwLock::new(CoreState {
                position: bounds.origin(),
                size: bounds.size(),
                z_priority: 0,
                flags: ElementFlags::default(),
                pressed: false,
                parent: None,
            }),
        }
    }

    /// Builder: set the z-priority.
    pub fn with_z_priority(self, z: i32) -> Self {
        self.state.write().z_priority = z;
        self
    }

    /// Builder: replace the flags, including [`ElementFlags::MODAL`].
    pub fn with_flags(self, flags: ElementFlags) -> Self {
        self.state.write().flags = flags;
        self
    }

    /// Builder: mark the element modal.
    pub fn modal(self) -> Self {
        self.state.write().flags.insert(ElementFlags::MODAL);
        self
    }

    /// The element's id.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Position relative to the parent.
    pub fn position(&self) -> Point {
        self.state.read().position
    }

    /// Move the element. Ordering among siblings is unaffected.
    pub fn set_position(&self, position: Point) {
        self.state.write().position = position;
    }

    /// Current size.
    pub fn size(&self) -> Size {
        self.state.read().size
    }

    /// Resize; negative components are clamped to zero.
    pub fn set_size(&self, size: Size) {
        self.state.write().size = Size::new(size.width.max(0.0), size.height.max(0.0));
    }

    /// Stacking priority.
    pub fn z_priority(&self) -> i32 {
        self.state.read().z_priority
    }

    /// Change the stacking priority.
    ///
    /// Takes effect the next time the element is inserted into a collection;
    /// an existing position is not re-sorted.
    ///
    /// # Panics
    ///
    /// Modal elements have a fixed priority.
    pub fn set_z_priority(&self, z: i32) {
        let mut state = self.state.write();
        assert!(
            !state.flags.contains(ElementFlags::MODAL),
            "the z-priority of a modal element cannot change"
        );
        state.z_priority = z;
    }

    /// Current flags.
    pub fn flags(&self) -> ElementFlags {
        self.state.read().flags
    }

    /// Replace the flags.
    ///
    /// # Panics
    ///
    /// Modality is fixed at construction; `flags` must keep
    /// [`ElementFlags::MODAL`] as it is.
    pub fn set_flags(&self, flags: ElementFlags) {
        let mut state = self.state.write();
        assert_eq!(
            state.flags.contains(ElementFlags::MODAL),
            flags.contains(ElementFlags::MODAL),
            "modality is fixed at construction"
        );
        state.flags = flags;
    }

    /// Whether a pointer is currently pressed on the element.
    pub fn is_pressed(&self) -> bool {
        self.state.read().pressed
    }

    /// Record pointer press state; maintained by the dispatcher.
    pub fn set_pressed(&self, pressed: bool) {
        self.state.write().pressed = pressed;
    }

    /// The parent link, if attached.
    pub fn parent(&self) -> Option<ParentRef> {
        self.state.read().parent.clone()
    }

    pub(crate) fn set_parent(&self, parent: Option<ParentRef>) {
        self.state.write().parent = parent;
    }

    /// Offer `key` to the parent; `false` at the root.
    pub fn bubble_key(&self, key: Key, cx: &mut Context) -> bool {
        // Clone out so the lock is not held across the callback.
        let parent = self.parent();
        parent.is_some_and(|parent| parent.key_typed(key, cx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Leaf(ElementCore);

    impl Element for Leaf {
        fn core(&self) -> &ElementCore {
            &self.0
        }
    }

    #[test]
    fn negative_sizes_clamp_to_zero() {
        let core = ElementCore::new(Rect::new(10.0, 10.0, 0.0, 5.0));
        assert_eq!(core.position(), Point::new(0.0, 5.0));
        assert_eq!(core.size(), Size::new(10.0, 5.0));
        core.set_size(Size::new(-3.0, 4.0));
        assert_eq!(core.size(), Size::new(0.0, 4.0));
    }

    #[test]
    fn default_hit_test_returns_self() {
        let leaf: ElementRef = Arc::new(Leaf(ElementCore::new(Rect::new(0.0, 0.0, 4.0, 4.0))));
        let hit = leaf.clone().hit_test(Point::new(1.0, 2.0)).unwrap();
        assert_eq!(*hit.element, *leaf);
        assert_eq!(hit.local, Point::new(1.0, 2.0));
    }

    #[test]
    fn unattached_elements_do_not_consume_keys() {
        let leaf = Leaf(ElementCore::new(Rect::ZERO));
        let mut cx = Context::new();
        assert!(!leaf.key_typed(Key::Enter, &mut cx));
    }

    #[test]
    #[should_panic(expected = "modal element")]
    fn modal_priority_is_fixed() {
        let core = ElementCore::new(Rect::ZERO).modal();
        core.set_z_priority(3);
    }

    #[test]
    #[should_panic(expected = "modality is fixed")]
    fn modality_cannot_be_toggled() {
        let core = ElementCore::new(Rect::ZERO);
        core.set_flags(ElementFlags::default() | ElementFlags::MODAL);
    }
}
