// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A decorator that draws a border around its element.

use std::sync::Arc;

use kurbo::{Point, Rect, Size, Vec2};

use crate::{Color, ConcurrentModification, Decorator, ElementRef, Hit, Surface, decorator};

/// Border appearance for [`Framed`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameStyle {
    /// Border thickness on every side.
    pub width: f64,
    /// Border color.
    pub color: Color,
    /// Optional fill behind the wrapped element.
    pub fill: Option<Color>,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            color: Color::BLACK,
            fill: None,
        }
    }
}

/// Draws a border of [`FrameStyle::width`] around the wrapped element.
///
/// The frame grows the element by the border width on every side: the
/// element's position is the frame's outer corner and its content starts
/// `width` further in. Points on the border hit the frame itself.
#[derive(Debug)]
pub struct Framed {
    inner: ElementRef,
    style: FrameStyle,
}

impl Framed {
    /// Frame `inner` with `style`. Negative widths are treated as zero.
    pub fn new(inner: ElementRef, style: FrameStyle) -> Self {
        let style = FrameStyle {
            width: style.width.max(0.0),
            ..style
        };
        Self { inner, style }
    }

    /// The frame style.
    pub fn style(&self) -> &FrameStyle {
        &self.style
    }

    fn inset(&self) -> Vec2 {
        Vec2::new(self.style.width, self.style.width)
    }
}

impl Decorator for Framed {
    fn inner(&self) -> &ElementRef {
        &self.inner
    }

    fn size(&self) -> Size {
        let inner = self.inner.size();
        let w = 2.0 * self.style.width;
        Size::new(inner.width + w, inner.height + w)
    }

    fn draw(&self, surface: &mut dyn Surface, origin: Point) -> Result<(), ConcurrentModification> {
        let outer = Rect::from_origin_size(origin, Decorator::size(self));
        if let Some(fill) = self.style.fill {
            surface.fill_rect(outer, fill);
        }
        if self.style.width > 0.0 {
            // Stroke centered on the border band.
            let half = self.style.width / 2.0;
            surface.stroke_rect(outer.inset(-half), self.style.color, self.style.width);
        }
        self.inner.draw(surface, origin + self.inset())
    }

    fn hit_test(self: Arc<Self>, point: Point) -> Result<Hit, ConcurrentModification> {
        let local = point - self.inset();
        let content = Rect::from_origin_size(Point::ORIGIN, self.inner.size());
        if content.contains(local) {
            let hit = self.inner.clone().hit_test(local)?;
            Ok(decorator::retarget(self, hit))
        } else {
            Ok(Hit::new(self, point))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Container, Context, DisplayList, DrawCommand, Element, ElementCore};

    struct Leaf(ElementCore);

    impl Element for Leaf {
        fn core(&self) -> &ElementCore {
            &self.0
        }
    }

    fn framed(width: f64) -> (ElementRef, ElementRef) {
        let leaf: ElementRef = Arc::new(Leaf(ElementCore::new(Rect::new(10.0, 10.0, 30.0, 20.0))));
        let style = FrameStyle {
            width,
            color: Color::BLACK,
            fill: Some(Color::WHITE),
        };
        let frame: ElementRef = Arc::new(Framed::new(leaf.clone(), style));
        (leaf, frame)
    }

    #[test]
    fn frame_grows_the_element() {
        let (leaf, frame) = framed(2.0);
        assert_eq!(frame.position(), leaf.position());
        assert_eq!(frame.size(), Size::new(24.0, 14.0));
        assert_eq!(frame.bounds(), Rect::new(10.0, 10.0, 34.0, 24.0));
    }

    #[test]
    fn border_hits_the_frame_and_content_is_offset() {
        let (leaf, frame) = framed(2.0);
        let hit = frame.clone().hit_test(Point::new(1.0, 1.0)).unwrap();
        assert_eq!(*hit.element, *leaf, "frames share identity with their content");
        assert_eq!(hit.local, Point::new(1.0, 1.0));
        let hit = frame.hit_test(Point::new(5.0, 5.0)).unwrap();
        assert_eq!(hit.local, Point::new(3.0, 3.0));
    }

    #[test]
    fn framed_children_are_found_through_the_border() {
        let mut cx = Context::new();
        let panel = Container::new(Rect::new(0.0, 0.0, 40.0, 40.0));
        let child: ElementRef = Arc::new(Leaf(ElementCore::new(Rect::new(5.0, 5.0, 10.0, 10.0))));
        panel.add(child.clone(), &mut cx).unwrap();
        let frame: ElementRef = Arc::new(Framed::new(panel, FrameStyle::default()));
        let hit = frame.hit_test(Point::new(7.0, 7.0)).unwrap();
        assert_eq!(*hit.element, *child);
        assert_eq!(hit.local, Point::new(1.0, 1.0));
    }

    #[test]
    fn draw_paints_fill_then_border_then_content() {
        let (_, frame) = framed(2.0);
        let mut list = DisplayList::new();
        frame.draw(&mut list, Point::new(10.0, 10.0)).unwrap();
        assert_eq!(
            list.commands(),
            [
                DrawCommand::FillRect {
                    rect: Rect::new(10.0, 10.0, 34.0, 24.0),
                    color: Color::WHITE,
                },
                DrawCommand::StrokeRect {
                    rect: Rect::new(11.0, 11.0, 33.0, 23.0),
                    color: Color::BLACK,
                    width: 2.0,
                },
            ]
        );
    }
}
