// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The element that owns children.

use std::sync::{Arc, Weak};

use kurbo::{Point, Rect};
use parking_lot::RwLock;

use crate::{
    Color, ConcurrentModification, Context, Element, ElementCore, ElementFlags, ElementId,
    ElementList, ElementRef, Hit, Key, ParentError, ParentHandle, ParentRef, Surface,
};

/// An element with an ordered set of children.
///
/// Children are drawn in ascending z-order at `origin + child.position()`, so
/// later children appear on top, and hit-tested in descending order, so the
/// topmost child containing a point wins. A point inside the container but in
/// no pickable child hits the container itself.
///
/// Containers are always held in an [`Arc`]; construct them with
/// [`Container::new`] or [`Container::with_core`].
#[derive(Debug)]
pub struct Container {
    core: ElementCore,
    children: ElementList,
    background: RwLock<Option<Color>>,
    this: Weak<Self>,
}

impl Container {
    /// A container occupying `bounds` with default flags.
    pub fn new(bounds: Rect) -> Arc<Self> {
        Self::with_core(ElementCore::new(bounds))
    }

    /// A container built around an existing core (for custom flags, priority, or modality).
    pub fn with_core(core: ElementCore) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            core,
            children: ElementList::new(),
            background: RwLock::new(None),
            this: this.clone(),
        })
    }

    /// The children, ascending by z-priority.
    ///
    /// Editing this list directly skips the parent link, the registry and the
    /// focus chain: the element is drawn and hit but cannot take focus or
    /// bubble keys, and focus held inside a removed element is not released.
    /// Use [`Container::add`] and [`Container::remove`] to edit the tree.
    pub fn children(&self) -> &ElementList {
        &self.children
    }

    /// Fill color painted beneath the children.
    pub fn background(&self) -> Option<Color> {
        *self.background.read()
    }

    /// Set or clear the background fill.
    pub fn set_background(&self, color: Option<Color>) {
        *self.background.write() = color;
    }

    fn parent_ref(&self) -> ParentRef {
        let handle: Weak<dyn ParentHandle> = self.this.clone();
        ParentRef::new(self.core.id(), handle)
    }

    /// Attach `child` at the position its z-priority dictates.
    ///
    /// The child is registered with `cx` and its focus-chain segment is spliced
    /// in after this container's existing children.
    pub fn add(&self, child: ElementRef, cx: &mut Context) -> Result<(), ParentError> {
        let id = self.core.id();
        if child.core().parent().is_some() {
            return Err(ParentError::AlreadyAttached(child.id()));
        }
        if child.id() == id || cx.is_descendant(id, child.id()) {
            return Err(ParentError::WouldCycle {
                parent: id,
                child: child.id(),
            });
        }
        child.core().set_parent(Some(self.parent_ref()));
        self.children.add(child.clone());
        cx.attach(self, &child);
        Ok(())
    }

    /// Detach the child with id `child`, returning it.
    ///
    /// If focus was anywhere inside the removed subtree it is released first.
    pub fn remove(&self, child: ElementId, cx: &mut Context) -> Option<ElementRef> {
        let removed = self.children.remove(child)?;
        removed.core().set_parent(None);
        cx.detach(self.core.id(), &removed);
        Some(removed)
    }

    /// Detach every child, returning them in z-order.
    pub fn remove_all(&self, cx: &mut Context) -> Vec<ElementRef> {
        let removed = self.children.remove_all();
        if removed.is_empty() {
            return removed;
        }
        for child in &removed {
            child.core().set_parent(None);
        }
        cx.detach_all(self.core.id(), &removed);
        removed
    }
}

impl Element for Container {
    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn child_list(&self) -> Option<&ElementList> {
        Some(&self.children)
    }

    fn draw(&self, surface: &mut dyn Surface, origin: Point) -> Result<(), ConcurrentModification> {
        if let Some(color) = self.background() {
            surface.fill_rect(Rect::from_origin_size(origin, self.size()), color);
        }
        for child in self.children.iter() {
            let child = child?;
            if child.flags().contains(ElementFlags::VISIBLE) {
                child.draw(surface, origin + child.position().to_vec2())?;
            }
        }
        Ok(())
    }

    fn hit_test(self: Arc<Self>, point: Point) -> Result<Hit, ConcurrentModification> {
        for child in self.children.iter_rev() {
            let child = child?;
            let flags = child.flags();
            if !flags.contains(ElementFlags::PICKABLE | ElementFlags::VISIBLE) {
                continue;
            }
            if child.bounds().contains(point) {
                let local = point - child.position().to_vec2();
                return child.hit_test(local);
            }
        }
        Ok(Hit::new(self, point))
    }
}

impl ParentHandle for Container {
    fn parent_id(&self) -> ElementId {
        self.core.id()
    }

    fn key_typed(&self, key: Key, cx: &mut Context) -> bool {
        // Route through the registry so a decorator around this container sees the key.
        match cx.element(self.core.id()) {
            Some(outer) => outer.key_typed(key, cx),
            None => Element::key_typed(self, key, cx),
        }
    }

    fn add_child(&self, child: ElementRef, cx: &mut Context) -> Result<(), ParentError> {
        self.add(child, cx)
    }

    fn remove_child(&self, child: ElementId, cx: &mut Context) -> Result<bool, ParentError> {
        Ok(self.remove(child, cx).is_some())
    }
}

#[cfg(test)]
mod tests {
    use arbor_focus::FocusError;

    use super::*;
    use crate::{DisplayList, DrawCommand};

    struct Leaf(ElementCore);

    impl Element for Leaf {
        fn core(&self) -> &ElementCore {
            &self.0
        }

        fn draw(
            &self,
            surface: &mut dyn Surface,
            origin: Point,
        ) -> Result<(), ConcurrentModification> {
            surface.fill_rect(Rect::from_origin_size(origin, self.size()), Color::WHITE);
            Ok(())
        }
    }

    fn leaf(rect: Rect, z: i32) -> ElementRef {
        Arc::new(Leaf(ElementCore::new(rect).with_z_priority(z)))
    }

    #[test]
    fn overlapping_children_hit_and_draw_by_priority() {
        let mut cx = Context::new();
        let root = Container::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let a = leaf(Rect::new(0.0, 0.0, 50.0, 50.0), 1);
        let b = leaf(Rect::new(10.0, 10.0, 60.0, 60.0), 5);
        let d = leaf(Rect::new(20.0, 20.0, 70.0, 70.0), 1);
        root.add(a.clone(), &mut cx).unwrap();
        root.add(b.clone(), &mut cx).unwrap();
        root.add(d.clone(), &mut cx).unwrap();

        let order: Vec<_> = root.children().snapshot();
        assert_eq!(order, [a.clone(), d.clone(), b.clone()]);

        let hit = root.clone().hit_test(Point::new(30.0, 30.0)).unwrap();
        assert_eq!(*hit.element, *b);
        assert_eq!(hit.local, Point::new(20.0, 20.0));

        // Re-inserted at priority 1, B lands after every existing priority-1
        // element and so stays on top.
        root.remove(b.id(), &mut cx).unwrap();
        b.core().set_z_priority(1);
        root.add(b.clone(), &mut cx).unwrap();
        assert_eq!(root.children().snapshot(), [a.clone(), d.clone(), b.clone()]);
        let hit = root.clone().hit_test(Point::new(30.0, 30.0)).unwrap();
        assert_eq!(*hit.element, *b);
        let hit = root.clone().hit_test(Point::new(12.0, 12.0)).unwrap();
        assert_eq!(*hit.element, *b, "B covers A");

        let mut list = DisplayList::new();
        root.draw(&mut list, Point::new(5.0, 5.0)).unwrap();
        let rects: Vec<_> = list
            .commands()
            .iter()
            .map(|c| match c {
                DrawCommand::FillRect { rect, .. } => *rect,
                other => panic!("unexpected command {other:?}"),
            })
            .collect();
        assert_eq!(
            rects,
            [
                Rect::new(5.0, 5.0, 55.0, 55.0),
                Rect::new(25.0, 25.0, 75.0, 75.0),
                Rect::new(15.0, 15.0, 65.0, 65.0),
            ]
        );
    }

    #[test]
    fn empty_area_hits_the_container() {
        let root = Container::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let hit = root.clone().hit_test(Point::new(90.0, 90.0)).unwrap();
        assert_eq!(hit.element.id(), root.id());
    }

    #[test]
    fn unpickable_children_are_skipped() {
        let mut cx = Context::new();
        let root = Container::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let under = leaf(Rect::new(0.0, 0.0, 50.0, 50.0), 0);
        let over = leaf(Rect::new(0.0, 0.0, 50.0, 50.0), 1);
        over.core().set_flags(ElementFlags::VISIBLE);
        root.add(under.clone(), &mut cx).unwrap();
        root.add(over, &mut cx).unwrap();
        let hit = root.hit_test(Point::new(5.0, 5.0)).unwrap();
        assert_eq!(*hit.element, *under);
    }

    #[test]
    fn children_cannot_have_two_parents_or_contain_their_parent() {
        let mut cx = Context::new();
        let a = Container::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = Container::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let c = leaf(Rect::ZERO, 0);
        a.add(c.clone(), &mut cx).unwrap();
        assert_eq!(
            b.add(c.clone(), &mut cx),
            Err(ParentError::AlreadyAttached(c.id()))
        );

        a.add(b.clone(), &mut cx).unwrap();
        assert!(matches!(
            b.add(a.clone(), &mut cx),
            Err(ParentError::WouldCycle { .. })
        ));
        assert!(matches!(
            a.add(a.clone(), &mut cx),
            Err(ParentError::WouldCycle { .. })
        ));
    }

    #[test]
    fn removal_splices_the_focus_chain_and_releases_focus() {
        let mut cx = Context::new();
        let root = Container::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let root_ref: ElementRef = root.clone();
        cx.register_root(&root_ref);
        let panel = Container::new(Rect::new(0.0, 0.0, 50.0, 50.0));
        let inner = leaf(Rect::ZERO, 0);
        let after = leaf(Rect::ZERO, 0);
        panel.add(inner.clone(), &mut cx).unwrap();
        root.add(panel.clone(), &mut cx).unwrap();
        root.add(after.clone(), &mut cx).unwrap();

        let chain = cx.focus().chain();
        assert_eq!(chain.next(root.id()), Some(panel.id()));
        assert_eq!(chain.next(panel.id()), Some(inner.id()));
        assert_eq!(chain.next(inner.id()), Some(after.id()));

        cx.request_focus(inner.id()).unwrap();
        let removed = root.remove(panel.id(), &mut cx).unwrap();
        assert_eq!(removed.id(), panel.id());
        assert_eq!(cx.focus().holder(), None);
        assert_eq!(cx.focus().chain().next(root.id()), Some(after.id()));
        assert_eq!(cx.focus().chain().previous(after.id()), Some(root.id()));
        assert!(cx.focus().chain().validate().is_ok());
        assert!(panel.core().parent().is_none());

        // The removed subtree can be attached again.
        root.add(panel.clone(), &mut cx).unwrap();
        assert_eq!(cx.focus().chain().next(after.id()), Some(panel.id()));
    }

    #[test]
    fn direct_list_edits_bypass_the_tree() {
        let mut cx = Context::new();
        let root = Container::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let root_ref: ElementRef = root.clone();
        cx.register_root(&root_ref);
        let stray = leaf(Rect::new(0.0, 0.0, 10.0, 10.0), 0);
        root.children().add(stray.clone());

        let hit = root.clone().hit_test(Point::new(5.0, 5.0)).unwrap();
        assert_eq!(hit.element.id(), stray.id());
        assert!(stray.core().parent().is_none());
        assert!(cx.element(stray.id()).is_none());
        assert_eq!(cx.request_focus(stray.id()), Err(FocusError::Unknown(stray.id())));
    }

    #[test]
    fn refused_chain_splice_is_reported() {
        let mut cx = Context::new();
        let first = Container::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let second = Container::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let child = leaf(Rect::new(0.0, 0.0, 10.0, 10.0), 0);
        first.add(child.clone(), &mut cx).unwrap();

        // Still chained under `first`, so a second splice is refused.
        assert!(!cx.attach(&*second, &child));
        assert_eq!(cx.focus().chain().parent_of(child.id()), Some(first.id()));
        assert!(cx.is_descendant(child.id(), first.id()));
        assert!(!cx.is_descendant(child.id(), second.id()));
    }

    #[test]
    fn remove_all_detaches_everything() {
        let mut cx = Context::new();
        let root = Container::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let a = leaf(Rect::ZERO, 0);
        let b = leaf(Rect::ZERO, 0);
        root.add(a.clone(), &mut cx).unwrap();
        root.add(b.clone(), &mut cx).unwrap();
        cx.request_focus(b.id()).unwrap();
        let removed = root.remove_all(&mut cx);
        assert_eq!(removed, [a.clone(), b.clone()]);
        assert!(root.children().is_empty());
        assert_eq!(cx.focus().holder(), None);
        assert_eq!(cx.focus().chain().next(root.id()), None);
        assert!(a.core().parent().is_none());
    }

    #[test]
    fn dropped_children_are_pruned() {
        let mut cx = Context::new();
        let root = Container::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let a = leaf(Rect::ZERO, 0);
        let id = a.id();
        root.add(a, &mut cx).unwrap();
        drop(root.remove(id, &mut cx));
        assert!(cx.focus().chain().contains(id));
        cx.prune();
        assert!(!cx.focus().chain().contains(id));
        assert!(cx.element(id).is_none());
    }
}
