// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A decorator that moves its element with the pointer.

use kurbo::{Point, Rect, Size, Vec2};

use crate::{Context, Decorator, ElementRef};

/// Where a [`Draggable`] element may be moved.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum DragBounds {
    /// Anywhere.
    #[default]
    Unbounded,
    /// Keep the element's rectangle inside this area of the parent's
    /// coordinate space. An element larger than the area is pinned to its
    /// top-left corner along that axis.
    Within(Rect),
}

impl DragBounds {
    /// Clamp a proposed top-left corner for an element of `size`.
    pub fn clamp(&self, origin: Point, size: Size) -> Point {
        match *self {
            Self::Unbounded => origin,
            Self::Within(area) => {
                let area = area.abs();
                let max_x = (area.x1 - size.width).max(area.x0);
                let max_y = (area.y1 - size.height).max(area.y0);
                Point::new(origin.x.clamp(area.x0, max_x), origin.y.clamp(area.y0, max_y))
            }
        }
    }
}

/// Moves the wrapped element by each drag delta, then forwards the drag.
#[derive(Debug)]
pub struct Draggable {
    inner: ElementRef,
    bounds: DragBounds,
}

impl Draggable {
    /// Make `inner` draggable within `bounds`.
    pub fn new(inner: ElementRef, bounds: DragBounds) -> Self {
        Self { inner, bounds }
    }

    /// The movement constraint.
    pub fn drag_bounds(&self) -> DragBounds {
        self.bounds
    }
}

impl Decorator for Draggable {
    fn inner(&self) -> &ElementRef {
        &self.inner
    }

    fn dragged(&self, delta: Vec2, cx: &mut Context) {
        let proposed = self.inner.position() + delta;
        let target = self.bounds.clamp(proposed, self.inner.size());
        self.inner.core().set_position(target);
        self.inner.dragged(delta, cx);
    }
}
