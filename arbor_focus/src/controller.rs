// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The focus controller: arbitrates which single node holds focus.

use core::hash::Hash;

use crate::Navigation;
use crate::chain::FocusChain;

/// Why a focus registration was refused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FocusError<K: core::fmt::Debug> {
    /// A modal node is active and the requested node lies outside it.
    #[error("focus is trapped inside modal {modal:?}; {node:?} is outside it")]
    Trapped {
        /// The active modal node.
        modal: K,
        /// The rejected node.
        node: K,
    },
    /// The node has no entry in the focus chain.
    #[error("unknown focus node {0:?}")]
    Unknown(K),
}

/// The focus change produced by a controller operation.
///
/// Callers run the `focus_lost` callback for [`FocusTransfer::lost`] before the
/// `focus_gained` callback for [`FocusTransfer::gained`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FocusTransfer<K> {
    /// The node that went from focused to unfocused.
    pub lost: Option<K>,
    /// The node that went from unfocused to focused.
    pub gained: Option<K>,
}

impl<K> FocusTransfer<K> {
    /// A transfer in which nothing changed.
    pub const fn none() -> Self {
        Self {
            lost: None,
            gained: None,
        }
    }

    /// Returns `true` if focus did not change.
    pub const fn is_empty(&self) -> bool {
        self.lost.is_none() && self.gained.is_none()
    }
}

/// Holds at most one focused node and at most one active modal trap.
///
/// Focus flags on [`FocusChain`] entries change only through
/// [`FocusController::register`] and [`FocusController::deregister`], which keeps
/// exactly zero or one node focused at any time.
#[derive(Clone, Debug)]
pub struct FocusController<K> {
    holder: Option<K>,
    modal: Option<K>,
}

impl<K: Copy + Eq + Hash + core::fmt::Debug> Default for FocusController<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash + core::fmt::Debug> FocusController<K> {
    /// Create a controller with no holder and no modal trap.
    pub const fn new() -> Self {
        Self {
            holder: None,
            modal: None,
        }
    }

    /// The node currently holding focus.
    pub fn holder(&self) -> Option<K> {
        self.holder
    }

    /// The active modal trap, if any.
    pub fn modal(&self) -> Option<K> {
        self.modal
    }

    /// Move focus to `node`.
    ///
    /// Fails without changing anything if a modal trap is active and `node` is
    /// neither the modal node nor one of its descendants. Registering a modal
    /// node, or any node beneath one, makes the nearest enclosing modal node
    /// the active trap.
    pub fn register(
        &mut self,
        chain: &mut FocusChain<K>,
        node: K,
    ) -> Result<FocusTransfer<K>, FocusError<K>> {
        if !chain.contains(node) {
            return Err(FocusError::Unknown(node));
        }
        if let Some(modal) = self.modal
            && !chain.is_descendant(node, modal)
        {
            return Err(FocusError::Trapped { modal, node });
        }
        if self.holder == Some(node) {
            return Ok(FocusTransfer::none());
        }

        let lost = self.holder.take();
        if let Some(previous) = lost {
            chain.set_focused(previous, false);
        }
        chain.set_focused(node, true);
        self.holder = Some(node);
        if let Some(modal) = nearest_modal(chain, node) {
            self.modal = Some(modal);
        }
        Ok(FocusTransfer {
            lost,
            gained: Some(node),
        })
    }

    /// Clear the holder and any modal trap, unconditionally.
    pub fn deregister(&mut self, chain: &mut FocusChain<K>) -> FocusTransfer<K> {
        self.modal = None;
        let lost = self.holder.take();
        if let Some(previous) = lost {
            chain.set_focused(previous, false);
        }
        FocusTransfer { lost, gained: None }
    }

    /// Deregister if the holder or the modal trap lives inside the subtree rooted
    /// at `root`. Used before a subtree leaves the tree.
    pub fn release_subtree(&mut self, chain: &mut FocusChain<K>, root: K) -> FocusTransfer<K> {
        let holder_inside = self.holder.is_some_and(|h| chain.is_descendant(h, root));
        let modal_inside = self.modal.is_some_and(|m| chain.is_descendant(m, root));
        if holder_inside || modal_inside {
            self.deregister(chain)
        } else {
            FocusTransfer::none()
        }
    }

    /// Move focus along the chain from the current holder.
    ///
    /// - [`Navigation::Next`]: enter a container's first child, else follow the next link.
    /// - [`Navigation::Prev`]: follow the previous link.
    /// - [`Navigation::EnterScope`]: move to the holder's first child.
    /// - [`Navigation::ExitScope`]: move to the holder's parent.
    ///
    /// With no holder, or no node in the requested direction, nothing changes.
    pub fn traverse(
        &mut self,
        chain: &mut FocusChain<K>,
        navigation: Navigation,
    ) -> Result<FocusTransfer<K>, FocusError<K>> {
        let Some(current) = self.holder else {
            return Ok(FocusTransfer::none());
        };
        let target = match navigation {
            Navigation::Next => chain.next_target(current),
            Navigation::Prev => chain.previous_target(current),
            Navigation::EnterScope => chain.first_child(current),
            Navigation::ExitScope => chain.parent_of(current),
        };
        match target {
            Some(target) => self.register(chain, target),
            None => Ok(FocusTransfer::none()),
        }
    }
}

/// `node` itself if it is modal, else its closest modal ancestor.
fn nearest_modal<K: Copy + Eq + Hash>(chain: &FocusChain<K>, node: K) -> Option<K> {
    let mut cur = Some(node);
    while let Some(k) = cur {
        if chain.is_modal(k) {
            return Some(k);
        }
        cur = chain.parent_of(k);
    }
    None
}
