// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Focus: keyboard-focus state, a cross-container focus chain, and a
//! single-holder focus controller.
//!
//! This crate models focus as:
//! - A **focus chain** ([`FocusChain`]): one focus handler per node, threaded into a single
//!   doubly-linked sequence. Container handlers ([`FocusKind::Container`]) additionally track
//!   their first and last direct children, so a container's whole subtree is always one
//!   contiguous segment that can be spliced in and out as children are added or removed.
//! - A **controller** ([`FocusController`]) that owns the "who has focus" decision. Nodes never
//!   set their own focus flag; every change goes through [`FocusController::register`] or
//!   [`FocusController::deregister`] and comes back as a [`FocusTransfer`] the host uses to run
//!   its `focus_lost` / `focus_gained` callbacks.
//! - **Modal trapping**: registering a node marked modal makes it the active trap, and further
//!   registrations outside its subtree fail with [`FocusError::Trapped`] until the controller is
//!   deregistered.
//! - **Navigation intents** ([`Navigation`]) interpreted by [`FocusController::traverse`].
//!
//! There is no global focus state: a [`FocusContext`] bundles a chain and its controller and is
//! passed explicitly to whatever needs it.
//!
//! ## Minimal example
//!
//! A container with two buttons; Tab walks into the container and across its children:
//!
//! ```rust
//! use arbor_focus::{FocusContext, FocusKind, Navigation};
//!
//! let mut focus = FocusContext::new();
//! focus.chain_mut().insert(1_u32, FocusKind::Container, false);
//! focus.chain_mut().insert(2, FocusKind::Leaf, false);
//! focus.chain_mut().insert(3, FocusKind::Leaf, false);
//! focus.chain_mut().attach_child(1, 2);
//! focus.chain_mut().attach_child(1, 3);
//!
//! focus.register(1).unwrap();
//! focus.traverse(Navigation::Next).unwrap();
//! assert_eq!(focus.holder(), Some(2));
//! focus.traverse(Navigation::Next).unwrap();
//! assert!(focus.has_focus(3));
//! assert!(!focus.has_focus(2));
//! ```
//!
//! The types are generic over the node key `K`, so callers can use any small, copyable
//! handle (for example an element id from `arbor_tree`).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod chain;
mod controller;

use core::hash::Hash;

pub use chain::{ChainViolation, FocusChain, FocusKind};
pub use controller::{FocusController, FocusError, FocusTransfer};

/// Direction of focus navigation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Move forward along the chain (for example, Tab).
    Next,
    /// Move backward along the chain (for example, Shift+Tab).
    Prev,
    /// Move into the focused container's first child.
    EnterScope,
    /// Move out to the focused node's parent.
    ExitScope,
}

/// A focus chain together with the controller that arbitrates it.
///
/// This is the explicit, per-UI replacement for process-wide focus state.
#[derive(Clone, Debug)]
pub struct FocusContext<K> {
    chain: FocusChain<K>,
    controller: FocusController<K>,
}

impl<K: Copy + Eq + Hash + core::fmt::Debug> Default for FocusContext<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash + core::fmt::Debug> FocusContext<K> {
    /// Create an empty context.
    pub fn new() -> Self {
        Self {
            chain: FocusChain::new(),
            controller: FocusController::new(),
        }
    }

    /// The focus chain.
    pub fn chain(&self) -> &FocusChain<K> {
        &self.chain
    }

    /// Mutable access to the focus chain for structural edits.
    pub fn chain_mut(&mut self) -> &mut FocusChain<K> {
        &mut self.chain
    }

    /// The node currently holding focus.
    pub fn holder(&self) -> Option<K> {
        self.controller.holder()
    }

    /// The active modal trap, if any.
    pub fn modal(&self) -> Option<K> {
        self.controller.modal()
    }

    /// Whether `node` holds focus.
    pub fn has_focus(&self, node: K) -> bool {
        self.chain.has_focus(node)
    }

    /// See [`FocusController::register`].
    pub fn register(&mut self, node: K) -> Result<FocusTransfer<K>, FocusError<K>> {
        self.controller.register(&mut self.chain, node)
    }

    /// See [`FocusController::deregister`].
    pub fn deregister(&mut self) -> FocusTransfer<K> {
        self.controller.deregister(&mut self.chain)
    }

    /// See [`FocusController::release_subtree`].
    pub fn release_subtree(&mut self, root: K) -> FocusTransfer<K> {
        self.controller.release_subtree(&mut self.chain, root)
    }

    /// See [`FocusController::traverse`].
    pub fn traverse(&mut self, navigation: Navigation) -> Result<FocusTransfer<K>, FocusError<K>> {
        self.controller.traverse(&mut self.chain, navigation)
    }
}
