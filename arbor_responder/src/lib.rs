// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Responder: turns raw input into element hooks.
//!
//! ## Overview
//!
//! [`Ui`] owns a root [`Container`](arbor_tree::Container) and the
//! [`Context`](arbor_tree::Context) for its tree, and is the single entry point
//! for input:
//!
//! - **Pointer**: [`Ui::pointer_down`] hit-tests the tree, moves focus to a
//!   focusable target (subject to the modal trap), and calls `pressed`.
//!   [`Ui::pointer_move`] delivers `dragged` deltas to the pressed element.
//!   [`Ui::pointer_up`] calls `released`, then `clicked` when the press state
//!   machine in `arbor_event_state` recognizes a click.
//! - **Keys**: [`Ui::key`] hands a key to the focus holder; unconsumed keys
//!   bubble through parents. Unconsumed Tab and Shift+Tab move focus along the
//!   focus chain.
//! - **Frames**: [`Ui::draw`] draws the tree, restarting when it changes
//!   mid-pass, and only hands a completed frame to the surface.
//!
//! Hit testing and drawing restart under the configured
//! [`RetryPolicy`](arbor_tree::RetryPolicy) and fail with
//! [`DispatchError::Pass`] once the budget is spent.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use arbor_responder::{Ui, UiConfig};
//! use arbor_tree::{Button, Element, Key};
//! use kurbo::{Point, Rect};
//!
//! let mut ui = Ui::new(UiConfig::default());
//! let ok = Arc::new(Button::new(Rect::new(10.0, 10.0, 90.0, 40.0), "OK"));
//! let cancel = Arc::new(Button::new(Rect::new(100.0, 10.0, 180.0, 40.0), "Cancel"));
//! ui.add(ok.clone()).unwrap();
//! ui.add(cancel.clone()).unwrap();
//!
//! assert_eq!(ui.click(Point::new(20.0, 20.0)).unwrap(), Some(ok.id()));
//! assert!(ok.is_focused());
//!
//! ui.key(Key::Tab);
//! assert!(cancel.is_focused());
//! ```

mod error;
mod path;
mod ui;

pub use error::DispatchError;
pub use path::{INLINE_DEPTH, ResponderPath, responder_path};
pub use ui::{Ui, UiConfig};
