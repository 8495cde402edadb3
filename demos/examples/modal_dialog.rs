// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small window with a scrolled list and a modal confirmation dialog.
//!
//! This example shows:
//! - building a tree of containers, buttons, and decorators,
//! - clicks moving focus and activating buttons,
//! - keys bubbling from a focused list into its scroll decorator,
//! - a modal dialog trapping focus until a button inside it closes it,
//! - drawing into a [`DisplayList`] and printing the commands.
//!
//! Run:
//! - `cargo run -p arbor_demos --example modal_dialog`
//! - `RUST_LOG=arbor_tree=trace,arbor_responder=trace cargo run -p arbor_demos --example modal_dialog`

use std::sync::Arc;

use arbor_responder::{Ui, UiConfig};
use arbor_tree::{
    Button, Color, Container, DisplayList, Element, ElementCore, ElementRef, FrameStyle, Framed,
    Key, Label, ScrollStyle, Scrolled,
};
use kurbo::{Point, Rect, Size, Vec2};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut ui = Ui::new(UiConfig {
        size: Size::new(320.0, 240.0),
        ..UiConfig::default()
    });
    let window = ui.root().clone();
    window.set_background(Some(Color::WHITE));

    // A list of twenty rows, shown through a 200x100 viewport with a border.
    let list = Container::new(Rect::new(0.0, 0.0, 200.0, 400.0));
    for row in 0..20_u32 {
        let y = f64::from(row) * 20.0;
        let label: ElementRef = Arc::new(Label::new(
            Rect::new(0.0, y, 200.0, y + 20.0),
            format!("Row {row}"),
        ));
        ui.add_to(&list, label).expect("fresh label");
    }
    let scrolled = Arc::new(Scrolled::new(
        list.clone(),
        ScrollStyle {
            viewport: Size::new(200.0, 100.0),
            step: 20.0,
        },
    ));
    let viewport: ElementRef = Arc::new(Framed::new(scrolled.clone(), FrameStyle::default()));
    viewport.core().set_position(Point::new(10.0, 40.0));
    ui.add(viewport).expect("fresh viewport");

    // The dialog sits above everything and traps focus while attached.
    let dialog = Container::with_core(
        ElementCore::new(Rect::new(60.0, 60.0, 260.0, 160.0))
            .with_z_priority(100)
            .modal(),
    );
    dialog.set_background(Some(Color::GRAY));
    let message: ElementRef = Arc::new(Label::new(
        Rect::new(10.0, 10.0, 190.0, 30.0),
        "Discard changes?",
    ));
    let close_window = Arc::downgrade(&window);
    let close_dialog = Arc::downgrade(&dialog);
    let discard = Arc::new(
        Button::new(Rect::new(10.0, 60.0, 90.0, 85.0), "Discard").on_activate(move |_, cx| {
            if let (Some(window), Some(dialog)) = (close_window.upgrade(), close_dialog.upgrade()) {
                window.remove(dialog.id(), cx);
                info!("dialog closed");
            }
        }),
    );
    ui.add_to(&dialog, message).expect("fresh label");
    ui.add_to(&dialog, discard.clone()).expect("fresh button");

    let open_window = Arc::downgrade(&window);
    let open_dialog = dialog.clone();
    let quit = Arc::new(
        Button::new(Rect::new(10.0, 10.0, 90.0, 30.0), "Quit").on_activate(move |_, cx| {
            let Some(window) = open_window.upgrade() else {
                return;
            };
            if window.add(open_dialog.clone(), cx).is_ok() {
                let _ = cx.request_focus(open_dialog.id());
                info!("dialog opened");
            }
        }),
    );
    ui.add(quit).expect("fresh button");

    // Focus the list by clicking a row, then scroll it with the keyboard.
    let row = ui.click(Point::new(50.0, 50.0)).expect("pass completed");
    info!(?row, focused = ?ui.focused().map(|e| e.id()), "clicked list");
    ui.key(Key::Down);
    ui.key(Key::Down);
    info!(offset = ?scrolled.offset(), "scrolled list");

    // Open the dialog; presses outside it are dropped while it is up.
    ui.click(Point::new(20.0, 20.0)).expect("pass completed");
    info!(modal = ?ui.cx().focus().modal(), "after quit");
    let refused = ui.click(Point::new(20.0, 20.0)).expect("pass completed");
    info!(?refused, "quit pressed again behind the dialog");
    print_frame(&ui);

    // Tab stays inside the dialog: past the message, onto the button.
    ui.key(Key::Tab);
    ui.key(Key::Tab);
    info!(focused = ?ui.focused().map(|e| e.id()), discard = ?discard.id(), "tabbed");
    ui.key(Key::Enter);
    info!(modal = ?ui.cx().focus().modal(), "after discard");

    // The list scrolls by whole steps and clamps at the end.
    scrolled.scroll_by(Vec2::new(0.0, 10_000.0));
    info!(offset = ?scrolled.offset(), "scrolled to end");
    print_frame(&ui);
}

fn print_frame(ui: &Ui) {
    let mut frame = DisplayList::new();
    ui.draw(&mut frame).expect("pass completed");
    println!("frame with {} commands:", frame.len());
    for command in frame.commands() {
        println!("  {command:?}");
    }
}
