// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Event State: small state machines that turn raw pointer input into
//! interaction intents.
//!
//! - [`press`]: tracks one pointer from down to up, reporting drags while
//!   pressed and deciding on release whether the press was a click.
//!
//! The machines are generic over the target key, hold no references into a
//! tree, and never call back: the caller feeds events in and dispatches what
//! comes out.
//!
//! This crate is `no_std`.

#![no_std]

pub mod press;
