// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Responder paths: the route a bubbling key takes.

use arbor_tree::{Context, ElementId};
use smallvec::SmallVec;

/// Inline capacity of a [`ResponderPath`]; deeper trees spill to the heap.
pub const INLINE_DEPTH: usize = 8;

/// Element ids from a target outward to its root, target first.
pub type ResponderPath = SmallVec<[ElementId; INLINE_DEPTH]>;

/// The bubble path from `target` to the root of its tree, following parent links.
///
/// Empty if `target` is not registered with `cx` or has been dropped. The walk
/// stops early at a parent that is no longer alive.
pub fn responder_path(cx: &Context, target: ElementId) -> ResponderPath {
    let mut path = ResponderPath::new();
    let Some(mut current) = cx.element(target) else {
        return path;
    };
    loop {
        path.push(current.id());
        let Some(parent) = current.core().parent() else {
            break;
        };
        match cx.element(parent.id()) {
            Some(next) => current = next,
            None => {
                if parent.upgrade().is_some() {
                    path.push(parent.id());
                }
                break;
            }
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arbor_tree::{Container, Element, ElementRef, Label};
    use kurbo::Rect;

    use super::*;

    #[test]
    fn path_runs_target_to_root() {
        let mut cx = Context::new();
        let root = Container::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let root_ref: ElementRef = root.clone();
        cx.register_root(&root_ref);
        let panel = Container::new(Rect::new(0.0, 0.0, 50.0, 50.0));
        let label: ElementRef = Arc::new(Label::new(Rect::new(0.0, 0.0, 10.0, 10.0), "x"));
        root.add(panel.clone(), &mut cx).unwrap();
        panel.add(label.clone(), &mut cx).unwrap();

        let path = responder_path(&cx, label.id());
        assert_eq!(path.as_slice(), [label.id(), panel.id(), root.id()]);
        assert!(responder_path(&cx, ElementId::next()).is_empty());
    }
}
