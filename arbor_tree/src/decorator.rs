// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decorators: elements that wrap another element and forward to it.

use std::sync::Arc;

use kurbo::{Point, Size, Vec2};

use crate::{
    ConcurrentModification, Context, Element, ElementCore, ElementId, ElementList, ElementRef,
    Hit, Key, Surface,
};

/// An element that wraps another and forwards every operation by default.
///
/// Every type implementing `Decorator` is an [`Element`] through a blanket
/// impl. A decorator shares the wrapped element's core, so it has the same
/// [`ElementId`], parent link, and z-priority, and compares equal to it.
/// Override only the hooks the decoration changes.
///
/// When a hit test lands on the wrapped element itself, the hit is retargeted
/// to the decorator so the outermost wrapper receives pointer events. Hits on
/// the wrapped element's descendants are left alone.
pub trait Decorator: Sized + Send + Sync + 'static {
    /// The wrapped element.
    fn inner(&self) -> &ElementRef;

    /// Position in the parent's coordinates.
    fn position(&self) -> Point {
        self.inner().position()
    }

    /// Size of the decorated element.
    fn size(&self) -> Size {
        self.inner().size()
    }

    /// See [`Element::draw`].
    fn draw(&self, surface: &mut dyn Surface, origin: Point) -> Result<(), ConcurrentModification> {
        self.inner().draw(surface, origin)
    }

    /// See [`Element::hit_test`].
    fn hit_test(self: Arc<Self>, point: Point) -> Result<Hit, ConcurrentModification> {
        let hit = self.inner().clone().hit_test(point)?;
        Ok(retarget(self, hit))
    }

    /// See [`Element::pressed`].
    fn pressed(&self, point: Point, cx: &mut Context) {
        self.inner().pressed(point, cx);
    }

    /// See [`Element::released`].
    fn released(&self, point: Point, cx: &mut Context) {
        self.inner().released(point, cx);
    }

    /// See [`Element::clicked`].
    fn clicked(&self, point: Point, cx: &mut Context) {
        self.inner().clicked(point, cx);
    }

    /// See [`Element::dragged`].
    fn dragged(&self, delta: Vec2, cx: &mut Context) {
        self.inner().dragged(delta, cx);
    }

    /// See [`Element::key_typed`].
    fn key_typed(&self, key: Key, cx: &mut Context) -> bool {
        self.inner().key_typed(key, cx)
    }

    /// See [`Element::focus_gained`].
    fn focus_gained(&self, cx: &mut Context) {
        self.inner().focus_gained(cx);
    }

    /// See [`Element::focus_lost`].
    fn focus_lost(&self, cx: &mut Context) {
        self.inner().focus_lost(cx);
    }
}

/// Replace a hit on `decorator`'s wrapped element with a hit on `decorator`.
pub fn retarget<D: Decorator>(decorator: Arc<D>, hit: Hit) -> Hit {
    if hit.element.id() == decorator.inner().id() {
        Hit::new(decorator, hit.local)
    } else {
        hit
    }
}

impl<D: Decorator> Element for D {
    fn core(&self) -> &ElementCore {
        self.inner().core()
    }

    fn id(&self) -> ElementId {
        self.inner().id()
    }

    fn position(&self) -> Point {
        Decorator::position(self)
    }

    fn size(&self) -> Size {
        Decorator::size(self)
    }

    fn child_list(&self) -> Option<&ElementList> {
        self.inner().child_list()
    }

    fn draw(&self, surface: &mut dyn Surface, origin: Point) -> Result<(), ConcurrentModification> {
        Decorator::draw(self, surface, origin)
    }

    fn hit_test(self: Arc<Self>, point: Point) -> Result<Hit, ConcurrentModification> {
        Decorator::hit_test(self, point)
    }

    fn pressed(&self, point: Point, cx: &mut Context) {
        Decorator::pressed(self, point, cx);
    }

    fn released(&self, point: Point, cx: &mut Context) {
        Decorator::released(self, point, cx);
    }

    fn clicked(&self, point: Point, cx: &mut Context) {
        Decorator::clicked(self, point, cx);
    }

    fn dragged(&self, delta: Vec2, cx: &mut Context) {
        Decorator::dragged(self, delta, cx);
    }

    fn key_typed(&self, key: Key, cx: &mut Context) -> bool {
        Decorator::key_typed(self, key, cx)
    }

    fn focus_gained(&self, cx: &mut Context) {
        Decorator::focus_gained(self, cx);
    }

    fn focus_lost(&self, cx: &mut Context) {
        Decorator::focus_lost(self, cx);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use kurbo::Rect;

    use super::*;
    use crate::Container;

    #[derive(Default)]
    struct Counter(AtomicUsize);

    struct Leaf(ElementCore);

    impl Element for Leaf {
        fn core(&self) -> &ElementCore {
            &self.0
        }
    }

    struct Counting {
        inner: ElementRef,
        clicks: Arc<Counter>,
    }

    impl Decorator for Counting {
        fn inner(&self) -> &ElementRef {
            &self.inner
        }

        fn clicked(&self, point: Point, cx: &mut Context) {
            self.clicks.0.fetch_add(1, Ordering::Relaxed);
            self.inner.clicked(point, cx);
        }
    }

    #[test]
    fn decorators_share_identity_with_the_wrapped_element() {
        let leaf: ElementRef = Arc::new(Leaf(ElementCore::new(Rect::new(1.0, 2.0, 5.0, 6.0))));
        let wrapped: ElementRef = Arc::new(Counting {
            inner: leaf.clone(),
            clicks: Arc::default(),
        });
        assert_eq!(*wrapped, *leaf);
        assert_eq!(wrapped.bounds(), leaf.bounds());
        let twice: ElementRef = Arc::new(Counting {
            inner: wrapped.clone(),
            clicks: Arc::default(),
        });
        assert_eq!(*twice, *leaf);
    }

    #[test]
    fn hits_on_the_wrapped_element_are_retargeted() {
        let clicks = Arc::new(Counter::default());
        let leaf: ElementRef = Arc::new(Leaf(ElementCore::new(Rect::new(0.0, 0.0, 5.0, 5.0))));
        let wrapped: ElementRef = Arc::new(Counting {
            inner: leaf,
            clicks: clicks.clone(),
        });
        let hit = wrapped.clone().hit_test(Point::new(1.0, 1.0)).unwrap();
        let mut cx = Context::new();
        hit.element.clicked(hit.local, &mut cx);
        assert_eq!(clicks.0.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn hits_on_descendants_are_not_retargeted() {
        let mut cx = Context::new();
        let panel = Container::new(Rect::new(0.0, 0.0, 50.0, 50.0));
        let child: ElementRef = Arc::new(Leaf(ElementCore::new(Rect::new(10.0, 10.0, 20.0, 20.0))));
        panel.add(child.clone(), &mut cx).unwrap();
        let wrapped: ElementRef = Arc::new(Counting {
            inner: panel.clone(),
            clicks: Arc::default(),
        });
        let hit = wrapped.clone().hit_test(Point::new(15.0, 15.0)).unwrap();
        assert_eq!(*hit.element, *child);
        assert_eq!(hit.local, Point::new(5.0, 5.0));
        let hit = wrapped.hit_test(Point::new(40.0, 40.0)).unwrap();
        assert_eq!(hit.element.id(), panel.id());
        assert!(
            hit.element.child_list().is_some(),
            "decorated container keeps its children"
        );
    }
}
