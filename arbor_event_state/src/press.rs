// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Press, drag, and click recognition for a single pointer.
//!
//! ## Usage
//!
//! ```
//! use arbor_event_state::press::{ClickResult, PressState};
//! use kurbo::{Point, Vec2};
//!
//! let mut state: PressState<u32> = PressState::new();
//! state.on_down(42, Point::new(10.0, 20.0));
//!
//! let drag = state.on_move(Point::new(13.0, 24.0)).unwrap();
//! assert_eq!(drag.target, 42);
//! assert_eq!(drag.delta, Vec2::new(3.0, 4.0));
//!
//! // Same target: always a click, however far the pointer travelled.
//! assert_eq!(state.on_up(Some(&42), Point::new(90.0, 90.0)), ClickResult::Click(42));
//! ```
//!
//! ## Click rules
//!
//! 1. **Same target**: if the press and release targets match, a click is generated.
//! 2. **Different targets**: a click on the *press* target is generated only if a
//!    [`ClickThresholds::distance`] is configured, the pointer never strayed beyond it
//!    while pressed, and the release point is within it. This keeps clicks on
//!    elements that shift slightly under the pointer as they are pressed.
//! 3. **No active press**: no click.

use kurbo::{Point, Vec2};

/// Tolerances for recognizing a click when the release target differs from the
/// press target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClickThresholds {
    /// Maximum pointer travel from the press point, or `None` to only accept
    /// same-target clicks.
    pub distance: Option<f64>,
}

impl Default for ClickThresholds {
    /// A 5-pixel tolerance.
    fn default() -> Self {
        Self {
            distance: Some(5.0),
        }
    }
}

/// An active press.
#[derive(Clone, Debug, PartialEq)]
pub struct Press<K> {
    /// The element the pointer went down on.
    pub target: K,
    /// Where the pointer went down.
    pub down_position: Point,
    /// Where the pointer was last seen.
    pub last_position: Point,
    /// Whether the pointer has strayed beyond the click distance threshold.
    pub distance_exceeded: bool,
}

/// Pointer motion while pressed.
#[derive(Clone, Debug, PartialEq)]
pub struct Drag<K> {
    /// The press target.
    pub target: K,
    /// Motion since the previous down or move.
    pub delta: Vec2,
    /// Motion since the press began.
    pub total: Vec2,
}

/// Result of releasing the pointer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickResult<K> {
    /// Deliver a click to this (press) target.
    Click(K),
    /// No click. Carries the press target, if a press was active.
    Suppressed(Option<K>),
}

/// Press state machine for one pointer.
#[derive(Clone, Debug)]
pub struct PressState<K> {
    press: Option<Press<K>>,
    thresholds: ClickThresholds,
    last_click: Option<K>,
}

impl<K: PartialEq + Clone> Default for PressState<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialEq + Clone> PressState<K> {
    /// A state machine with [`ClickThresholds::default`].
    pub fn new() -> Self {
        Self::with_thresholds(ClickThresholds::default())
    }

    /// A state machine with custom thresholds.
    pub fn with_thresholds(thresholds: ClickThresholds) -> Self {
        Self {
            press: None,
            thresholds,
            last_click: None,
        }
    }

    /// The configured thresholds.
    pub fn thresholds(&self) -> ClickThresholds {
        self.thresholds
    }

    /// Begin a press on `target`.
    ///
    /// Returns the target of a press that was still active and is now
    /// abandoned, so the caller can release it.
    pub fn on_down(&mut self, target: K, position: Point) -> Option<K> {
        let previous = self.press.take().map(|p| p.target);
        self.press = Some(Press {
            target,
            down_position: position,
            last_position: position,
            distance_exceeded: false,
        });
        previous
    }

    /// Track pointer motion. Returns the drag to deliver, or `None` when no
    /// press is active or the pointer did not move.
    pub fn on_move(&mut self, position: Point) -> Option<Drag<K>> {
        let threshold = self.thresholds.distance;
        let press = self.press.as_mut()?;
        let delta = position - press.last_position;
        if delta == Vec2::ZERO {
            return None;
        }
        press.last_position = position;
        let total = position - press.down_position;
        if let Some(threshold) = threshold
            && total.hypot2() > threshold * threshold
        {
            press.distance_exceeded = true;
        }
        Some(Drag {
            target: press.target.clone(),
            delta,
            total,
        })
    }

    /// End the press at `position` over `current_target` (if anything is there)
    /// and decide whether it was a click.
    pub fn on_up(&mut self, current_target: Option<&K>, position: Point) -> ClickResult<K> {
        let Some(press) = self.press.take() else {
            return ClickResult::Suppressed(None);
        };

        if current_target == Some(&press.target) {
            self.last_click = Some(press.target.clone());
            return ClickResult::Click(press.target);
        }

        let Some(threshold) = self.thresholds.distance else {
            return ClickResult::Suppressed(Some(press.target));
        };
        let within = (position - press.down_position).hypot2() <= threshold * threshold;
        if press.distance_exceeded || !within {
            return ClickResult::Suppressed(Some(press.target));
        }
        self.last_click = Some(press.target.clone());
        ClickResult::Click(press.target)
    }

    /// Abandon the active press. Returns its target.
    pub fn cancel(&mut self) -> Option<K> {
        self.press.take().map(|p| p.target)
    }

    /// Whether a press is active.
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// The active press.
    pub fn press(&self) -> Option<&Press<K>> {
        self.press.as_ref()
    }

    /// The active press target.
    pub fn target(&self) -> Option<&K> {
        self.press.as_ref().map(|p| &p.target)
    }

    /// The target of the most recent click.
    pub fn last_click(&self) -> Option<&K> {
        self.last_click.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_target_generates_click() {
        let mut state: PressState<u32> = PressState::new();
        state.on_down(42, Point::new(10.0, 20.0));
        let result = state.on_up(Some(&42), Point::new(12.0, 22.0));
        assert_eq!(result, ClickResult::Click(42));
        assert!(!state.is_pressed());
        assert_eq!(state.last_click(), Some(&42));
    }

    #[test]
    fn no_active_press_no_click() {
        let mut state: PressState<u32> = PressState::new();
        assert_eq!(
            state.on_up(Some(&42), Point::new(10.0, 20.0)),
            ClickResult::Suppressed(None)
        );
    }

    #[test]
    fn different_targets_without_threshold_no_click() {
        let mut state = PressState::with_thresholds(ClickThresholds { distance: None });
        state.on_down(42_u32, Point::new(10.0, 20.0));
        assert_eq!(
            state.on_up(Some(&99), Point::new(10.0, 20.0)),
            ClickResult::Suppressed(Some(42))
        );
    }

    #[test]
    fn different_targets_within_threshold_click_the_press_target() {
        let mut state: PressState<u32> = PressState::new();
        state.on_down(42, Point::new(10.0, 20.0));
        // Exactly on the 5px threshold.
        assert_eq!(
            state.on_up(Some(&99), Point::new(13.0, 24.0)),
            ClickResult::Click(42)
        );
        state.on_down(42, Point::new(10.0, 20.0));
        assert_eq!(
            state.on_up(None, Point::new(20.0, 30.0)),
            ClickResult::Suppressed(Some(42))
        );
    }

    #[test]
    fn straying_suppresses_a_different_target_click() {
        let mut state: PressState<u32> = PressState::new();
        state.on_down(42, Point::new(10.0, 20.0));
        state.on_move(Point::new(40.0, 20.0));
        state.on_move(Point::new(11.0, 20.0));
        assert_eq!(
            state.on_up(Some(&99), Point::new(11.0, 20.0)),
            ClickResult::Suppressed(Some(42))
        );
    }

    #[test]
    fn moves_report_incremental_and_total_deltas() {
        let mut state: PressState<u32> = PressState::new();
        assert!(state.on_move(Point::new(1.0, 1.0)).is_none());
        state.on_down(7, Point::new(0.0, 0.0));
        let first = state.on_move(Point::new(2.0, 1.0)).unwrap();
        assert_eq!(first.delta, Vec2::new(2.0, 1.0));
        let second = state.on_move(Point::new(5.0, 5.0)).unwrap();
        assert_eq!(second.delta, Vec2::new(3.0, 4.0));
        assert_eq!(second.total, Vec2::new(5.0, 5.0));
        assert!(state.on_move(Point::new(5.0, 5.0)).is_none());
    }

    #[test]
    fn a_new_press_abandons_the_old_one() {
        let mut state: PressState<u32> = PressState::new();
        assert_eq!(state.on_down(1, Point::ZERO), None);
        assert_eq!(state.on_down(2, Point::ZERO), Some(1));
        assert_eq!(state.target(), Some(&2));
        assert_eq!(state.cancel(), Some(2));
        assert!(!state.is_pressed());
    }
}
