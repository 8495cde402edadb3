// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A decorator that shows a scrollable window onto its element.

use std::sync::Arc;

use kurbo::{Point, Rect, Size, Vec2};
use parking_lot::RwLock;

use crate::{
    ConcurrentModification, Context, Decorator, ElementRef, Hit, Key, Surface, decorator,
};

/// Viewport configuration for [`Scrolled`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollStyle {
    /// Visible area; becomes the decorated element's size.
    pub viewport: Size,
    /// Distance moved per arrow key.
    pub step: f64,
}

impl Default for ScrollStyle {
    fn default() -> Self {
        Self {
            viewport: Size::new(100.0, 100.0),
            step: 16.0,
        }
    }
}

/// Clips the wrapped element to a viewport and scrolls it with the arrow keys.
///
/// The scroll offset is clamped so the viewport never leaves the content.
/// Arrow keys are consumed while focus is inside the wrapped element; other
/// keys are forwarded.
#[derive(Debug)]
pub struct Scrolled {
    inner: ElementRef,
    style: ScrollStyle,
    offset: RwLock<Vec2>,
}

impl Scrolled {
    /// Show `inner` through a viewport described by `style`.
    pub fn new(inner: ElementRef, style: ScrollStyle) -> Self {
        let style = ScrollStyle {
            viewport: Size::new(style.viewport.width.max(0.0), style.viewport.height.max(0.0)),
            step: style.step.abs(),
        };
        Self {
            inner,
            style,
            offset: RwLock::new(Vec2::ZERO),
        }
    }

    /// The current scroll offset: how far the content is shifted up and left.
    pub fn offset(&self) -> Vec2 {
        *self.offset.read()
    }

    /// Scroll to `offset`, clamped to the content. Returns the applied offset.
    pub fn scroll_to(&self, offset: Vec2) -> Vec2 {
        let max = self.max_offset();
        let clamped = Vec2::new(offset.x.clamp(0.0, max.x), offset.y.clamp(0.0, max.y));
        *self.offset.write() = clamped;
        clamped
    }

    /// Scroll by `delta`, clamped to the content. Returns the applied offset.
    pub fn scroll_by(&self, delta: Vec2) -> Vec2 {
        self.scroll_to(self.offset() + delta)
    }

    fn max_offset(&self) -> Vec2 {
        let content = self.inner.size();
        Vec2::new(
            (content.width - self.style.viewport.width).max(0.0),
            (content.height - self.style.viewport.height).max(0.0),
        )
    }
}

impl Decorator for Scrolled {
    fn inner(&self) -> &ElementRef {
        &self.inner
    }

    fn size(&self) -> Size {
        self.style.viewport
    }

    fn draw(&self, surface: &mut dyn Surface, origin: Point) -> Result<(), ConcurrentModification> {
        surface.push_clip(Rect::from_origin_size(origin, self.style.viewport));
        let result = self.inner.draw(surface, origin - self.offset());
        surface.pop_clip();
        result
    }

    fn hit_test(self: Arc<Self>, point: Point) -> Result<Hit, ConcurrentModification> {
        let local = point + self.offset();
        let content = Rect::from_origin_size(Point::ORIGIN, self.inner.size());
        if content.contains(local) {
            let hit = self.inner.clone().hit_test(local)?;
            Ok(decorator::retarget(self, hit))
        } else {
            Ok(Hit::new(self, point))
        }
    }

    fn key_typed(&self, key: Key, cx: &mut Context) -> bool {
        let step = self.style.step;
        let delta = match key {
            Key::Up => Vec2::new(0.0, -step),
            Key::Down => Vec2::new(0.0, step),
            Key::Left => Vec2::new(-step, 0.0),
            Key::Right => Vec2::new(step, 0.0),
            _ => return self.inner.key_typed(key, cx),
        };
        self.scroll_by(delta);
        true
    }
}
