// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the element tree: identifiers, flags, and keys.

use core::sync::atomic::{AtomicU64, Ordering};

/// Stable identity of an element.
///
/// Decorators report the id of the element they wrap, so an id always names
/// the underlying (unwrapped) element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl ElementId {
    /// Allocate a fresh, process-unique id.
    pub fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

bitflags::bitflags! {
    /// Element flags controlling visibility, picking, focus, and modality.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element is drawn.
        const VISIBLE   = 0b0000_0001;
        /// Element participates in hit testing.
        const PICKABLE  = 0b0000_0010;
        /// Pressing the element moves keyboard focus to it.
        const FOCUSABLE = 0b0000_0100;
        /// Focusing the element traps focus inside its subtree.
        ///
        /// Fixed at construction; see [`ElementCore::set_flags`](crate::ElementCore::set_flags).
        const MODAL     = 0b0000_1000;
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE | Self::FOCUSABLE
    }
}

/// A typed key delivered to the focused element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// Return / Enter.
    Enter,
    /// Escape.
    Escape,
    /// Backspace.
    Backspace,
    /// Tab: move focus forward when no element consumes it.
    Tab,
    /// Shift+Tab: move focus backward when no element consumes it.
    BackTab,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let a = ElementId::next();
        let b = ElementId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }

    #[test]
    fn default_flags_are_interactive_but_not_modal() {
        let flags = ElementFlags::default();
        assert!(flags.contains(ElementFlags::VISIBLE | ElementFlags::PICKABLE));
        assert!(flags.contains(ElementFlags::FOCUSABLE));
        assert!(!flags.contains(ElementFlags::MODAL));
    }
}
