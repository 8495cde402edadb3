// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The focus chain: per-node focus handlers linked into one doubly-linked sequence.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;

/// Whether a focus node is a plain node or bridges into an inner child range.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FocusKind {
    /// A simple focus handler with previous/next links only.
    Leaf,
    /// A container focus handler that also tracks its first and last direct children.
    Container,
}

/// Focus state and links for one node.
#[derive(Clone, Debug)]
struct FocusNode<K> {
    has_focus: bool,
    previous: Option<K>,
    next: Option<K>,
    kind: FocusKind,
    first_child: Option<K>,
    last_child: Option<K>,
    parent: Option<K>,
    modal: bool,
}

impl<K> FocusNode<K> {
    fn new(kind: FocusKind, modal: bool) -> Self {
        Self {
            has_focus: false,
            previous: None,
            next: None,
            kind,
            first_child: None,
            last_child: None,
            parent: None,
            modal,
        }
    }
}

/// A broken chain invariant reported by [`FocusChain::validate`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChainViolation<K: core::fmt::Debug> {
    /// A link points at a key that has no entry.
    #[error("{from:?} links to unknown node {to:?}")]
    Dangling {
        /// Node holding the link.
        from: K,
        /// Missing target.
        to: K,
    },
    /// `a.next == b` but `b.previous != a` (or the mirror case).
    #[error("{from:?} -> {to:?} is not mirrored by a back link")]
    Asymmetric {
        /// Node holding the forward link.
        from: K,
        /// Node whose back link disagrees.
        to: K,
    },
    /// Following `next` from a node revisits it.
    #[error("cycle through {0:?}")]
    Cycle(K),
    /// A container's first/last child does not name it as parent.
    #[error("{child:?} is listed as a child of {parent:?} but is not parented there")]
    Orphan {
        /// The container.
        parent: K,
        /// The listed child.
        child: K,
    },
}

/// Arena of focus handlers keyed by a small copyable node key.
///
/// The chain is a doubly-linked list threaded through every attached node. A
/// container's subtree always occupies one contiguous segment
/// `[container, child₁ subtree, …, childₙ subtree]`, so the container's `next`
/// link is its first child while it has one. Children are chained in the order
/// they were attached.
///
/// Modal nodes are never spliced into an outer segment: their own previous/next
/// links stay empty and their children form a standalone segment reachable
/// through the modal's first/last child links.
///
/// ## Example
///
/// ```rust
/// use arbor_focus::{FocusChain, FocusKind};
///
/// let mut chain = FocusChain::new();
/// chain.insert(1_u32, FocusKind::Container, false);
/// chain.insert(2, FocusKind::Leaf, false);
/// chain.insert(3, FocusKind::Leaf, false);
/// chain.attach_child(1, 2);
/// chain.attach_child(1, 3);
///
/// assert_eq!(chain.next(1), Some(2));
/// assert_eq!(chain.next(2), Some(3));
/// assert_eq!(chain.last_child(1), Some(3));
/// assert!(chain.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct FocusChain<K> {
    nodes: HashMap<K, FocusNode<K>>,
}

impl<K: Copy + Eq + Hash> Default for FocusChain<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash> FocusChain<K> {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    /// Add a detached focus handler for `key`.
    ///
    /// Returns `false` (and changes nothing) if the key already has an entry.
    pub fn insert(&mut self, key: K, kind: FocusKind, modal: bool) -> bool {
        if self.nodes.contains_key(&key) {
            return false;
        }
        self.nodes.insert(key, FocusNode::new(kind, modal));
        true
    }

    /// Drop the entry for `key`, detaching it from its parent first.
    ///
    /// Any remaining links that still name `key` are cleared, so the rest of the
    /// chain never dangles.
    pub fn forget(&mut self, key: K) -> bool {
        let Some(parent) = self.parent_of(key) else {
            return self.drop_entry(key);
        };
        self.detach_child(parent, key);
        self.drop_entry(key)
    }

    fn drop_entry(&mut self, key: K) -> bool {
        if self.nodes.remove(&key).is_none() {
            return false;
        }
        for node in self.nodes.values_mut() {
            for link in [
                &mut node.previous,
                &mut node.next,
                &mut node.first_child,
                &mut node.last_child,
                &mut node.parent,
            ] {
                if *link == Some(key) {
                    *link = None;
                }
            }
        }
        true
    }

    /// Returns `true` if `key` has an entry.
    pub fn contains(&self, key: K) -> bool {
        self.nodes.contains_key(&key)
    }

    /// Number of entries, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `key` currently holds focus. Unknown keys never do.
    pub fn has_focus(&self, key: K) -> bool {
        self.nodes.get(&key).is_some_and(|n| n.has_focus)
    }

    /// The previous link of `key`.
    pub fn previous(&self, key: K) -> Option<K> {
        self.nodes.get(&key)?.previous
    }

    /// The next link of `key`.
    pub fn next(&self, key: K) -> Option<K> {
        self.nodes.get(&key)?.next
    }

    /// First direct child of a container node.
    pub fn first_child(&self, key: K) -> Option<K> {
        self.nodes.get(&key)?.first_child
    }

    /// Last direct child of a container node.
    pub fn last_child(&self, key: K) -> Option<K> {
        self.nodes.get(&key)?.last_child
    }

    /// The node `key` is attached under, if any.
    pub fn parent_of(&self, key: K) -> Option<K> {
        self.nodes.get(&key)?.parent
    }

    /// The handler kind of `key`.
    pub fn kind(&self, key: K) -> Option<FocusKind> {
        self.nodes.get(&key).map(|n| n.kind)
    }

    /// Whether `key` is a modal node.
    pub fn is_modal(&self, key: K) -> bool {
        self.nodes.get(&key).is_some_and(|n| n.modal)
    }

    /// Returns `true` if `node` is `ancestor` or lies somewhere beneath it.
    pub fn is_descendant(&self, node: K, ancestor: K) -> bool {
        let mut cur = Some(node);
        while let Some(k) = cur {
            if k == ancestor {
                return true;
            }
            cur = self.parent_of(k);
        }
        false
    }

    /// Set `a.next = b` and `b.previous = a`.
    ///
    /// Unknown keys are ignored.
    ///
    /// # Panics
    ///
    /// Panics if either node is modal; a modal node's links are fixed.
    pub fn link(&mut self, a: K, b: K) {
        assert!(
            !self.is_modal(a) && !self.is_modal(b),
            "modal focus nodes cannot be relinked"
        );
        self.set_next(a, Some(b));
        self.set_previous(b, Some(a));
    }

    /// Remove `node` from the chain, reconnecting its neighbours directly.
    ///
    /// Afterwards `node` has neither a previous nor a next link. Either
    /// neighbour may be absent. Unknown keys are ignored.
    ///
    /// # Panics
    ///
    /// Panics if `node` is modal.
    pub fn unlink(&mut self, node: K) {
        assert!(!self.is_modal(node), "modal focus nodes cannot be unlinked");
        let Some(n) = self.nodes.get(&node) else {
            return;
        };
        let (previous, next) = (n.previous, n.next);
        self.connect(previous, next);
        self.set_previous(node, None);
        self.set_next(node, None);
    }

    /// The last node of the segment rooted at `key` (the node itself when it has
    /// no children).
    pub fn subtree_end(&self, key: K) -> K {
        let mut end = key;
        while let Some(last) = self.last_child(end) {
            end = last;
        }
        end
    }

    /// Attach `child` (and its whole segment) as the last child of `parent`.
    ///
    /// The segment is spliced directly after the parent's current subtree end
    /// and the parent's first/last pointers are updated. Returns `false` if
    /// either key is unknown, `child` is already attached somewhere, or `child`
    /// is an ancestor of `parent`.
    pub fn attach_child(&mut self, parent: K, child: K) -> bool {
        if !self.contains(parent)
            || self.parent_of(child).is_some()
            || self.is_descendant(parent, child)
        {
            return false;
        }
        let Some(c) = self.nodes.get_mut(&child) else {
            return false;
        };
        c.parent = Some(parent);
        if c.modal {
            return true;
        }

        let anchor = match self.last_child(parent) {
            Some(last) => Some(self.subtree_end(last)),
            None if self.is_modal(parent) => None,
            None => Some(parent),
        };
        let end = self.subtree_end(child);
        if let Some(anchor) = anchor {
            let after = self.next(anchor);
            self.set_next(anchor, Some(child));
            self.set_previous(child, Some(anchor));
            self.connect(Some(end), after);
        }

        let p = self.node_mut(parent);
        if p.first_child.is_none() {
            p.first_child = Some(child);
        }
        p.last_child = Some(child);
        true
    }

    /// Detach `child` (and its whole segment) from `parent`.
    ///
    /// The segment's internal links survive so it can be attached again later.
    /// Returns `false` if `child` is not attached under `parent`.
    pub fn detach_child(&mut self, parent: K, child: K) -> bool {
        if self.parent_of(child) != Some(parent) {
            return false;
        }
        if self.is_modal(child) {
            self.node_mut(child).parent = None;
            return true;
        }

        let previous_sibling = self.previous_sibling(parent, child);
        let next_sibling = self.next_sibling(parent, child);
        let end = self.subtree_end(child);
        let before = self.previous(child);
        let after = self.next(end);
        self.connect(before, after);
        self.set_previous(child, None);
        self.set_next(end, None);
        self.node_mut(child).parent = None;

        let p = self.node_mut(parent);
        if p.first_child == Some(child) {
            p.first_child = next_sibling;
        }
        if p.last_child == Some(child) {
            p.last_child = previous_sibling;
        }
        true
    }

    /// Detach every child of `parent`, repairing the chain around the whole
    /// range in one step. Returns the detached children in chain order
    /// (modal children last).
    pub fn detach_all(&mut self, parent: K) -> Vec<K> {
        let mut detached = Vec::new();
        if let (Some(first), Some(last)) = (self.first_child(parent), self.last_child(parent)) {
            let mut cur = first;
            loop {
                detached.push(cur);
                if cur == last {
                    break;
                }
                match self.next(self.subtree_end(cur)) {
                    Some(next) => cur = next,
                    None => break,
                }
            }
            let end = self.subtree_end(last);
            let before = self.previous(first);
            let after = self.next(end);
            self.connect(before, after);
            self.set_previous(first, None);
            self.set_next(end, None);
        }
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.first_child = None;
            p.last_child = None;
        }
        for &child in &detached {
            self.node_mut(child).parent = None;
        }
        for (&key, node) in self.nodes.iter_mut() {
            if node.parent == Some(parent) && node.modal {
                node.parent = None;
                detached.push(key);
            }
        }
        detached
    }

    /// Where forward traversal from `key` lands.
    ///
    /// A container with children enters its first child; otherwise the node's
    /// own next link is used.
    pub fn next_target(&self, key: K) -> Option<K> {
        let node = self.nodes.get(&key)?;
        match (node.kind, node.first_child) {
            (FocusKind::Container, Some(first)) => Some(first),
            _ => node.next,
        }
    }

    /// Where backward traversal from `key` lands.
    ///
    /// Containers always exit through their own previous link, never into a child.
    pub fn previous_target(&self, key: K) -> Option<K> {
        self.previous(key)
    }

    /// Walk the chain forward starting at (and including) `start`.
    pub fn iter_from(&self, start: K) -> impl Iterator<Item = K> + '_ {
        let limit = self.nodes.len();
        core::iter::successors(self.contains(start).then_some(start), move |&k| self.next(k))
            .take(limit)
    }

    /// Check the chain invariants: links are mirrored, nothing dangles, no
    /// cycles, and first/last children are parented correctly.
    pub fn validate(&self) -> Result<(), ChainViolation<K>>
    where
        K: core::fmt::Debug,
    {
        for (&key, node) in &self.nodes {
            if let Some(next) = node.next {
                let Some(n) = self.nodes.get(&next) else {
                    return Err(ChainViolation::Dangling { from: key, to: next });
                };
                if n.previous != Some(key) {
                    return Err(ChainViolation::Asymmetric { from: key, to: next });
                }
            }
            if let Some(previous) = node.previous {
                let Some(p) = self.nodes.get(&previous) else {
                    return Err(ChainViolation::Dangling {
                        from: key,
                        to: previous,
                    });
                };
                if p.next != Some(key) {
                    return Err(ChainViolation::Asymmetric {
                        from: previous,
                        to: key,
                    });
                }
            }
            for child in [node.first_child, node.last_child].into_iter().flatten() {
                if self.parent_of(child) != Some(key) {
                    return Err(ChainViolation::Orphan { parent: key, child });
                }
            }
        }
        // With mirrored links every walk from a head is a simple path unless it
        // loops back, so one bounded walk per node is enough.
        for &key in self.nodes.keys() {
            let mut steps = 0;
            let mut cur = self.next(key);
            while let Some(k) = cur {
                if k == key || steps > self.nodes.len() {
                    return Err(ChainViolation::Cycle(key));
                }
                steps += 1;
                cur = self.next(k);
            }
        }
        Ok(())
    }

    pub(crate) fn set_focused(&mut self, key: K, focused: bool) {
        if let Some(n) = self.nodes.get_mut(&key) {
            n.has_focus = focused;
        }
    }

    fn previous_sibling(&self, parent: K, child: K) -> Option<K> {
        if self.first_child(parent) == Some(child) {
            return None;
        }
        // The node before `child` ends the previous sibling's segment.
        let mut cur = self.previous(child)?;
        loop {
            let up = self.parent_of(cur)?;
            if up == parent {
                return Some(cur);
            }
            cur = up;
        }
    }

    fn next_sibling(&self, parent: K, child: K) -> Option<K> {
        if self.last_child(parent) == Some(child) {
            return None;
        }
        let next = self.next(self.subtree_end(child))?;
        (self.parent_of(next) == Some(parent)).then_some(next)
    }

    fn connect(&mut self, before: Option<K>, after: Option<K>) {
        if let Some(b) = before {
            self.set_next(b, after);
        }
        if let Some(a) = after {
            self.set_previous(a, before);
        }
    }

    fn set_next(&mut self, key: K, next: Option<K>) {
        if let Some(n) = self.nodes.get_mut(&key) {
            n.next = next;
        }
    }

    fn set_previous(&mut self, key: K, previous: Option<K>) {
        if let Some(n) = self.nodes.get_mut(&key) {
            n.previous = previous;
        }
    }

    /// Access an entry the caller has already proven exists.
    fn node_mut(&mut self, key: K) -> &mut FocusNode<K> {
        self.nodes.get_mut(&key).expect("focus node checked by caller")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn chain_with(containers: &[u32], leaves: &[u32]) -> FocusChain<u32> {
        let mut chain = FocusChain::new();
        for &c in containers {
            chain.insert(c, FocusKind::Container, false);
        }
        for &l in leaves {
            chain.insert(l, FocusKind::Leaf, false);
        }
        chain
    }

    fn order(chain: &FocusChain<u32>, start: u32) -> Vec<u32> {
        chain.iter_from(start).collect()
    }

    #[test]
    fn link_sets_both_directions() {
        let mut chain = chain_with(&[], &[1, 2]);
        chain.link(1, 2);
        assert_eq!(chain.next(1), Some(2));
        assert_eq!(chain.previous(2), Some(1));
        assert!(chain.validate().is_ok());
    }

    #[test]
    fn unlink_reconnects_neighbours() {
        let mut chain = chain_with(&[], &[1, 2, 3]);
        chain.link(1, 2);
        chain.link(2, 3);
        chain.unlink(2);
        assert_eq!(chain.next(1), Some(3));
        assert_eq!(chain.previous(3), Some(1));
        assert_eq!(chain.previous(2), None);
        assert_eq!(chain.next(2), None);
        assert!(chain.validate().is_ok());
    }

    #[test]
    fn unlink_at_either_end() {
        let mut chain = chain_with(&[], &[1, 2, 3]);
        chain.link(1, 2);
        chain.link(2, 3);
        chain.unlink(1);
        assert_eq!(chain.previous(2), None);
        chain.unlink(3);
        assert_eq!(chain.next(2), None);
        assert!(chain.validate().is_ok());
    }

    #[test]
    fn nested_containers_form_one_segment() {
        // 1 { 2, 4 { 5, 6 }, 3 }
        let mut chain = chain_with(&[1, 4], &[2, 3, 5, 6]);
        chain.attach_child(1, 2);
        chain.attach_child(4, 5);
        chain.attach_child(4, 6);
        chain.attach_child(1, 4);
        chain.attach_child(1, 3);
        assert_eq!(order(&chain, 1), vec![1, 2, 4, 5, 6, 3]);
        assert_eq!(chain.first_child(1), Some(2));
        assert_eq!(chain.last_child(1), Some(3));
        assert_eq!(chain.subtree_end(1), 3);
        assert!(chain.validate().is_ok());
    }

    #[test]
    fn attaching_into_inner_container_keeps_outer_tail() {
        let mut chain = chain_with(&[1, 4], &[2, 3, 5]);
        chain.attach_child(1, 4);
        chain.attach_child(1, 3);
        // 4 is empty and sits between 1 and 3; filling it must keep 3 after it.
        chain.attach_child(4, 5);
        chain.attach_child(4, 2);
        assert_eq!(order(&chain, 1), vec![1, 4, 5, 2, 3]);
        assert!(chain.validate().is_ok());
    }

    #[test]
    fn detach_middle_child_keeps_segment_intact() {
        let mut chain = chain_with(&[1, 4], &[2, 3, 5]);
        chain.attach_child(1, 2);
        chain.attach_child(4, 5);
        chain.attach_child(1, 4);
        chain.attach_child(1, 3);
        assert!(chain.detach_child(1, 4));
        assert_eq!(order(&chain, 1), vec![1, 2, 3]);
        assert_eq!(order(&chain, 4), vec![4, 5]);
        assert_eq!(chain.parent_of(4), None);
        assert!(chain.validate().is_ok());

        // Re-attaching brings the whole segment back at the end.
        chain.attach_child(1, 4);
        assert_eq!(order(&chain, 1), vec![1, 2, 3, 4, 5]);
        assert!(chain.validate().is_ok());
    }

    #[test]
    fn detach_first_and_last_update_pointers() {
        let mut chain = chain_with(&[1], &[2, 3, 4]);
        for c in [2, 3, 4] {
            chain.attach_child(1, c);
        }
        chain.detach_child(1, 2);
        assert_eq!(chain.first_child(1), Some(3));
        chain.detach_child(1, 4);
        assert_eq!(chain.last_child(1), Some(3));
        chain.detach_child(1, 3);
        assert_eq!(chain.first_child(1), None);
        assert_eq!(chain.last_child(1), None);
        assert_eq!(chain.next(1), None);
        assert!(chain.validate().is_ok());
    }

    #[test]
    fn detach_all_skips_the_range_in_one_step() {
        // 0 { 1 { 2, 3 }, 9 }
        let mut chain = chain_with(&[0, 1], &[2, 3, 9]);
        chain.attach_child(0, 1);
        chain.attach_child(0, 9);
        chain.attach_child(1, 2);
        chain.attach_child(1, 3);
        let removed = chain.detach_all(1);
        assert_eq!(removed, vec![2, 3]);
        assert_eq!(order(&chain, 0), vec![0, 1, 9]);
        assert_eq!(chain.first_child(1), None);
        assert_eq!(chain.parent_of(2), None);
        assert!(chain.validate().is_ok());
    }

    #[test]
    fn traversal_targets() {
        let mut chain = chain_with(&[1, 4], &[2, 3]);
        chain.attach_child(1, 2);
        chain.attach_child(1, 4);
        chain.attach_child(1, 3);
        // Empty container falls through to its outward next.
        assert_eq!(chain.next_target(4), Some(3));
        assert_eq!(chain.next_target(1), Some(2));
        // Backward traversal out of a container never enters a child.
        assert_eq!(chain.previous_target(4), Some(2));
        assert_eq!(chain.previous_target(2), Some(1));
    }

    #[test]
    fn modal_children_form_standalone_segment() {
        let mut chain = chain_with(&[0], &[1, 8, 9]);
        chain.insert(5, FocusKind::Container, true);
        chain.attach_child(0, 1);
        chain.attach_child(0, 5);
        chain.attach_child(5, 8);
        chain.attach_child(5, 9);
        assert_eq!(order(&chain, 0), vec![0, 1]);
        assert_eq!(chain.previous(5), None);
        assert_eq!(chain.next(5), None);
        assert_eq!(chain.next_target(5), Some(8));
        assert_eq!(order(&chain, 8), vec![8, 9]);
        assert_eq!(chain.previous(8), None);
        assert!(chain.is_descendant(9, 5));
        assert!(chain.validate().is_ok());
    }

    #[test]
    #[should_panic(expected = "modal focus nodes cannot be relinked")]
    fn relinking_a_modal_node_panics() {
        let mut chain = chain_with(&[], &[1]);
        chain.insert(2, FocusKind::Leaf, true);
        chain.link(1, 2);
    }

    #[test]
    fn forget_clears_references() {
        let mut chain = chain_with(&[1], &[2, 3]);
        chain.attach_child(1, 2);
        chain.attach_child(1, 3);
        assert!(chain.forget(2));
        assert!(!chain.contains(2));
        assert_eq!(order(&chain, 1), vec![1, 3]);
        assert!(chain.validate().is_ok());
    }

    #[test]
    fn attach_twice_is_rejected() {
        let mut chain = chain_with(&[1, 2], &[3]);
        assert!(chain.attach_child(1, 3));
        assert!(!chain.attach_child(2, 3));
        assert_eq!(chain.parent_of(3), Some(1));
    }
}
