// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-UI state passed explicitly to event hooks: the element registry and focus.

use std::sync::{Arc, Weak};

use arbor_focus::{FocusContext, FocusError, FocusKind, FocusTransfer, Navigation};
use hashbrown::HashMap;
use tracing::{debug, trace};

use crate::{Element, ElementFlags, ElementId, ElementRef};

/// Focus state plus a registry from [`ElementId`] to the outermost element
/// registered under it.
///
/// Containers keep the registry and focus chain in step with the tree as
/// children are attached and removed. Focus changes made through the context
/// run the affected elements' `focus_lost` and `focus_gained` hooks, in that
/// order.
#[derive(Debug, Default)]
pub struct Context {
    focus: FocusContext<ElementId>,
    registry: HashMap<ElementId, Weak<dyn Element>>,
    needs_prune: bool,
}

impl Context {
    /// A context with nothing registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to focus state.
    pub fn focus(&self) -> &FocusContext<ElementId> {
        &self.focus
    }

    /// The element registered under `id`, if it is still alive.
    ///
    /// When `id` names a decorated element this is the outermost decorator.
    pub fn element(&self, id: ElementId) -> Option<ElementRef> {
        self.registry.get(&id).and_then(Weak::upgrade)
    }

    /// The current focus holder.
    pub fn focused(&self) -> Option<ElementRef> {
        self.focus.holder().and_then(|id| self.element(id))
    }

    /// Register a tree root so it participates in focus and key bubbling.
    pub fn register_root(&mut self, root: &ElementRef) {
        self.register(root);
    }

    /// Record `element` in the registry and give it a focus-chain entry.
    ///
    /// Re-registering an id replaces the registry entry, so the most recently
    /// attached wrapper wins.
    pub fn register(&mut self, element: &ElementRef) {
        self.registry.insert(element.id(), Arc::downgrade(element));
        self.ensure_entry(&**element);
    }

    pub(crate) fn ensure_entry(&mut self, element: &dyn Element) {
        let kind = if element.child_list().is_some() {
            FocusKind::Container
        } else {
            FocusKind::Leaf
        };
        let modal = element.flags().contains(ElementFlags::MODAL);
        self.focus.chain_mut().insert(element.id(), kind, modal);
    }

    /// Whether `node` is `ancestor` or lies beneath it.
    pub fn is_descendant(&self, node: ElementId, ancestor: ElementId) -> bool {
        self.focus.chain().is_descendant(node, ancestor)
    }

    /// Returns `false` if the focus chain refused the splice; the child is
    /// registered either way.
    pub(crate) fn attach(&mut self, parent: &dyn Element, child: &ElementRef) -> bool {
        self.ensure_entry(parent);
        self.register(child);
        let (parent, child) = (parent.id(), child.id());
        if !self.focus.chain_mut().attach_child(parent, child) {
            debug!(
                ?parent,
                ?child,
                chain_parent = ?self.focus.chain().parent_of(child),
                "focus chain refused the attach; tree and chain disagree"
            );
            return false;
        }
        trace!(?parent, ?child, "attached element");
        true
    }

    pub(crate) fn detach(&mut self, parent: ElementId, child: &ElementRef) {
        let transfer = self.focus.release_subtree(child.id());
        self.apply(transfer);
        self.focus.chain_mut().detach_child(parent, child.id());
        self.needs_prune = true;
        trace!(?parent, child = ?child.id(), "detached element");
    }

    pub(crate) fn detach_all(&mut self, parent: ElementId, children: &[ElementRef]) {
        for child in children {
            let transfer = self.focus.release_subtree(child.id());
            self.apply(transfer);
        }
        self.focus.chain_mut().detach_all(parent);
        self.needs_prune = true;
        trace!(?parent, count = children.len(), "detached all children");
    }

    /// Move focus to `id`, running focus hooks.
    ///
    /// Fails with [`FocusError::Trapped`] when a modal element holds the trap
    /// and `id` is outside it.
    pub fn request_focus(
        &mut self,
        id: ElementId,
    ) -> Result<FocusTransfer<ElementId>, FocusError<ElementId>> {
        let transfer = self.focus.register(id)?;
        self.apply(transfer);
        Ok(transfer)
    }

    /// Clear focus and any modal trap, running focus hooks.
    pub fn clear_focus(&mut self) -> FocusTransfer<ElementId> {
        let transfer = self.focus.deregister();
        self.apply(transfer);
        transfer
    }

    /// Move focus along the chain, running focus hooks.
    pub fn traverse(
        &mut self,
        navigation: Navigation,
    ) -> Result<FocusTransfer<ElementId>, FocusError<ElementId>> {
        let transfer = self.focus.traverse(navigation)?;
        self.apply(transfer);
        Ok(transfer)
    }

    fn apply(&mut self, transfer: FocusTransfer<ElementId>) {
        if transfer.is_empty() {
            return;
        }
        debug!(lost = ?transfer.lost, gained = ?transfer.gained, "focus moved");
        if let Some(element) = transfer.lost.and_then(|id| self.element(id)) {
            element.focus_lost(self);
        }
        if let Some(element) = transfer.gained.and_then(|id| self.element(id)) {
            element.focus_gained(self);
        }
    }

    /// Forget registry and focus entries whose elements have been dropped.
    ///
    /// Cheap when nothing was detached since the last call.
    pub fn prune(&mut self) {
        if !self.needs_prune {
            return;
        }
        self.needs_prune = false;
        let dead: Vec<ElementId> = self
            .registry
            .iter()
            .filter(|(_, weak)| weak.strong_count() == 0)
            .map(|(id, _)| *id)
            .collect();
        for id in &dead {
            self.registry.remove(id);
            self.focus.chain_mut().forget(*id);
        }
        if !dead.is_empty() {
            debug!(count = dead.len(), "pruned dropped elements");
        }
    }
}
