// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawing surface abstraction and a recording implementation.

use kurbo::{Point, Rect};

/// An 8-bit RGBA color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Mid gray.
    pub const GRAY: Self = Self::rgb(128, 128, 128);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// A color with explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// This color with each channel scaled by `factor` (alpha unchanged).
    #[expect(
        clippy::cast_possible_truncation,
        reason = "channels are clamped to the u8 range before the cast"
    )]
    pub fn scale(self, factor: f64) -> Self {
        let f = |c: u8| (f64::from(c) * factor).round().clamp(0.0, 255.0) as u8;
        Self::rgba(f(self.r), f(self.g), f(self.b), self.a)
    }
}

/// Opaque handle to an image owned by the embedding application.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u64);

/// The drawing sink elements paint into.
///
/// Coordinates are in surface space; containers pass each child the absolute
/// origin it should draw at. Clips nest: every [`Surface::push_clip`] is paired
/// with a [`Surface::pop_clip`].
pub trait Surface {
    /// Fill `rect` with `color`.
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// Outline `rect` with a stroke of `width`.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64);
    /// Draw `text` with its top-left corner at `origin`.
    fn draw_text(&mut self, origin: Point, text: &str, color: Color);
    /// Draw an application image scaled into `rect`.
    fn draw_image(&mut self, rect: Rect, image: ImageHandle);
    /// Intersect the current clip with `rect`.
    fn push_clip(&mut self, rect: Rect);
    /// Restore the clip in effect before the matching [`Surface::push_clip`].
    fn pop_clip(&mut self);
}

/// One recorded drawing command.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// See [`Surface::fill_rect`].
    FillRect {
        /// Target rectangle.
        rect: Rect,
        /// Fill color.
        color: Color,
    },
    /// See [`Surface::stroke_rect`].
    StrokeRect {
        /// Target rectangle.
        rect: Rect,
        /// Stroke color.
        color: Color,
        /// Stroke width.
        width: f64,
    },
    /// See [`Surface::draw_text`].
    Text {
        /// Top-left corner.
        origin: Point,
        /// The text.
        text: String,
        /// Text color.
        color: Color,
    },
    /// See [`Surface::draw_image`].
    Image {
        /// Target rectangle.
        rect: Rect,
        /// The image.
        image: ImageHandle,
    },
    /// See [`Surface::push_clip`].
    PushClip(Rect),
    /// See [`Surface::pop_clip`].
    PopClip,
}

/// A [`Surface`] that records commands for later replay.
///
/// Draw passes render into a fresh list on every attempt and replay only the
/// attempt that completed, so a surface never sees a partially drawn frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded commands, in order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Forget every recorded command.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Issue every recorded command against `surface`.
    pub fn replay(&self, surface: &mut dyn Surface) {
        for command in &self.commands {
            match command {
                DrawCommand::FillRect { rect, color } => surface.fill_rect(*rect, *color),
                DrawCommand::StrokeRect { rect, color, width } => {
                    surface.stroke_rect(*rect, *color, *width);
                }
                DrawCommand::Text {
                    origin,
                    text,
                    color,
                } => surface.draw_text(*origin, text, *color),
                DrawCommand::Image { rect, image } => surface.draw_image(*rect, *image),
                DrawCommand::PushClip(rect) => surface.push_clip(*rect),
                DrawCommand::PopClip => surface.pop_clip(),
            }
        }
    }
}

impl Surface for DisplayList {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.commands
            .push(DrawCommand::StrokeRect { rect, color, width });
    }

    fn draw_text(&mut self, origin: Point, text: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            origin,
            text: text.into(),
            color,
        });
    }

    fn draw_image(&mut self, rect: Rect, image: ImageHandle) {
        self.commands.push(DrawCommand::Image { rect, image });
    }

    fn push_clip(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::PushClip(rect));
    }

    fn pop_clip(&mut self) {
        self.commands.push(DrawCommand::PopClip);
    }
}
