// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Tree: a retained tree of rectangular, interactive elements.
//!
//! - [`Element`]: the contract every node implements. Geometry, flags, and the
//!   parent link live in an [`ElementCore`]; drawing, hit testing, pointer, key,
//!   and focus hooks all have defaults.
//! - [`Container`]: owns children in an [`ElementList`], ordered by ascending
//!   z-priority with insertion order among equals. Drawing walks the list
//!   forward; hit testing walks it backward so the topmost child wins.
//! - [`Decorator`]: wraps an element and forwards to it. Decorators share the
//!   wrapped element's identity. [`Draggable`], [`Framed`], and [`Scrolled`]
//!   are provided.
//! - [`Context`]: the per-UI registry and focus state handed to every hook.
//!   Containers keep it in step as children come and go.
//!
//! ## Concurrency
//!
//! Elements are `Send + Sync` and every accessor takes `&self`. Element lists
//! may change while another thread draws or hit-tests: iteration is fail-fast
//! and reports [`ConcurrentModification`] at its next step, and the passes in
//! [`pass`] restart under a [`RetryPolicy`]. A draw only reaches its surface
//! once an attempt completes.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use arbor_tree::{Button, Container, Context, Element, ElementRef, RetryPolicy, pass};
//! use kurbo::{Point, Rect};
//!
//! let mut cx = Context::new();
//! let root = Container::new(Rect::new(0.0, 0.0, 200.0, 100.0));
//! let ok: ElementRef = Arc::new(Button::new(Rect::new(10.0, 10.0, 90.0, 40.0), "OK"));
//! root.add(ok.clone(), &mut cx).unwrap();
//!
//! let root: ElementRef = root;
//! let hit = pass::hit_test(&root, Point::new(20.0, 20.0), &RetryPolicy::default())
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(*hit.element, *ok);
//! assert_eq!(hit.local, Point::new(10.0, 10.0));
//!
//! let frame = pass::record(&*root, &RetryPolicy::default()).unwrap();
//! assert!(!frame.is_empty());
//! ```

mod container;
mod context;
mod decorator;
mod drag;
mod element;
mod error;
mod frame;
mod list;
pub mod pass;
mod scroll;
mod surface;
mod types;
mod widgets;

pub use container::Container;
pub use context::Context;
pub use decorator::{Decorator, retarget};
pub use drag::{DragBounds, Draggable};
pub use element::{Element, ElementCore, ElementRef, Hit, IntoElementRef, ParentHandle, ParentRef};
pub use error::{ConcurrentModification, ParentError, PassError};
pub use frame::{FrameStyle, Framed};
pub use list::{ElementList, Iter};
pub use pass::RetryPolicy;
pub use scroll::{ScrollStyle, Scrolled};
pub use surface::{Color, DisplayList, DrawCommand, ImageHandle, Surface};
pub use types::{ElementFlags, ElementId, Key};
pub use widgets::{ActivateCallback, Button, Label};

pub use arbor_focus;
