// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic leaf elements: a text label and a push button.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use kurbo::{Point, Rect, Vec2};
use parking_lot::RwLock;
use tracing::debug;

use crate::{Color, ConcurrentModification, Context, Element, ElementCore, ElementFlags, Key, Surface};

const TEXT_INSET: Vec2 = Vec2::new(4.0, 4.0);

/// Non-interactive text.
#[derive(Debug)]
pub struct Label {
    core: ElementCore,
    text: RwLock<String>,
    color: Color,
}

impl Label {
    /// A label occupying `bounds`. Labels are visible but neither pickable nor focusable.
    pub fn new(bounds: Rect, text: impl Into<String>) -> Self {
        Self {
            core: ElementCore::new(bounds).with_flags(ElementFlags::VISIBLE),
            text: RwLock::new(text.into()),
            color: Color::BLACK,
        }
    }

    /// The current text.
    pub fn text(&self) -> String {
        self.text.read().clone()
    }

    /// Replace the text.
    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.write() = text.into();
    }
}

impl Element for Label {
    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn draw(&self, surface: &mut dyn Surface, origin: Point) -> Result<(), ConcurrentModification> {
        surface.draw_text(origin + TEXT_INSET, &self.text.read(), self.color);
        Ok(())
    }
}

/// Callback run when a [`Button`] is activated.
///
/// Callbacks run on the dispatching thread with the [`Context`], so they may
/// move focus or edit the tree. A panicking callback unwinds through the
/// dispatcher; that is not supported.
pub type ActivateCallback = Arc<dyn Fn(&Button, &mut Context) + Send + Sync>;

/// A focusable push button.
///
/// Activated by a click, or by Enter or Space while focused.
pub struct Button {
    core: ElementCore,
    label: RwLock<String>,
    focused: AtomicBool,
    on_activate: RwLock<Option<ActivateCallback>>,
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("core", &self.core)
            .field("label", &*self.label.read())
            .field("focused", &self.focused.load(Ordering::Relaxed))
            .field("on_activate", &self.on_activate.read().is_some())
            .finish()
    }
}

impl Button {
    /// Fill color at rest.
    pub const FILL: Color = Color::rgb(0xdd, 0xdd, 0xdd);
    /// Outline color while focused.
    pub const FOCUS_RING: Color = Color::rgb(0x1e, 0x64, 0xc8);

    /// A button occupying `bounds` with the given label.
    pub fn new(bounds: Rect, label: impl Into<String>) -> Self {
        Self::with_core(ElementCore::new(bounds), label)
    }

    /// A button around an existing core.
    pub fn with_core(core: ElementCore, label: impl Into<String>) -> Self {
        Self {
            core,
            label: RwLock::new(label.into()),
            focused: AtomicBool::new(false),
            on_activate: RwLock::new(None),
        }
    }

    /// Builder: set the activation callback.
    pub fn on_activate(
        self,
        callback: impl Fn(&Self, &mut Context) + Send + Sync + 'static,
    ) -> Self {
        *self.on_activate.write() = Some(Arc::new(callback));
        self
    }

    /// Replace the activation callback.
    pub fn set_on_activate(&self, callback: Option<ActivateCallback>) {
        *self.on_activate.write() = callback;
    }

    /// The label text.
    pub fn label(&self) -> String {
        self.label.read().clone()
    }

    /// Replace the label text.
    pub fn set_label(&self, label: impl Into<String>) {
        *self.label.write() = label.into();
    }

    /// Whether the button currently holds focus.
    pub fn is_focused(&self) -> bool {
        self.focused.load(Ordering::Relaxed)
    }

    /// Run the activation callback, if any.
    pub fn activate(&self, cx: &mut Context) {
        // Clone out so the callback may replace itself.
        let callback = self.on_activate.read().clone();
        debug!(id = ?self.core.id(), label = %self.label.read(), "button activated");
        if let Some(callback) = callback {
            callback(self, cx);
        }
    }
}

impl Element for Button {
    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn draw(&self, surface: &mut dyn Surface, origin: Point) -> Result<(), ConcurrentModification> {
        let rect = Rect::from_origin_size(origin, self.size());
        let fill = if self.core.is_pressed() {
            Self::FILL.scale(0.8)
        } else {
            Self::FILL
        };
        surface.fill_rect(rect, fill);
        if self.is_focused() {
            surface.stroke_rect(rect, Self::FOCUS_RING, 2.0);
        }
        surface.draw_text(origin + TEXT_INSET, &self.label.read(), Color::BLACK);
        Ok(())
    }

    fn clicked(&self, _point: Point, cx: &mut Context) {
        self.activate(cx);
    }

    fn key_typed(&self, key: Key, cx: &mut Context) -> bool {
        match key {
            Key::Enter | Key::Char(' ') => {
                self.activate(cx);
                true
            }
            _ => self.core.bubble_key(key, cx),
        }
    }

    fn focus_gained(&self, _cx: &mut Context) {
        self.focused.store(true, Ordering::Relaxed);
    }

    fn focus_lost(&self, _cx: &mut Context) {
        self.focused.store(false, Ordering::Relaxed);
    }
}
