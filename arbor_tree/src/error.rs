// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types shared across the tree.

use crate::ElementId;

/// An element collection changed while it was being iterated.
///
/// Raised by [`ElementList`](crate::ElementList) iterators at the first step after
/// a structural change. Whole-tree passes catch it and restart; see
/// [`RetryPolicy`](crate::RetryPolicy).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, thiserror::Error)]
#[error("element collection was modified during iteration")]
pub struct ConcurrentModification;

/// A whole-tree pass could not complete.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PassError {
    /// Every attempt allowed by the retry policy saw a concurrent modification.
    #[error("{pass} pass gave up after {attempts} attempts; the tree kept changing")]
    RetriesExhausted {
        /// Which pass gave up (for example `"draw"` or `"hit-test"`).
        pass: &'static str,
        /// Number of attempts made.
        attempts: u32,
    },
}

/// Why a structural edit on a parent was refused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParentError {
    /// The parent does not accept children through this handle.
    #[error("parent does not support adding or removing children")]
    Unsupported,
    /// The element already has a parent; remove it there first.
    #[error("element {0:?} is already attached to a parent")]
    AlreadyAttached(ElementId),
    /// Attaching would make an element its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCycle {
        /// The would-be parent.
        parent: ElementId,
        /// The element being attached.
        child: ElementId,
    },
}
