// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Whole-tree passes that restart when the tree changes underneath them.

use core::num::NonZeroU32;

use kurbo::{Point, Rect};
use tracing::{debug, trace, warn};

use crate::{ConcurrentModification, DisplayList, Element, ElementRef, Hit, PassError, Surface};

/// How many times a pass may restart after a [`ConcurrentModification`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: Option<NonZeroU32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::bounded(Self::DEFAULT_ATTEMPTS)
    }
}

impl RetryPolicy {
    /// Attempts allowed by [`RetryPolicy::default`].
    pub const DEFAULT_ATTEMPTS: NonZeroU32 = NonZeroU32::new(64).unwrap();

    /// Give up with [`PassError::RetriesExhausted`] after `attempts` attempts.
    pub const fn bounded(attempts: NonZeroU32) -> Self {
        Self {
            max_attempts: Some(attempts),
        }
    }

    /// Retry until a pass completes.
    pub const fn unbounded() -> Self {
        Self { max_attempts: None }
    }

    /// The attempt limit, or `None` when unbounded.
    pub const fn max_attempts(&self) -> Option<NonZeroU32> {
        self.max_attempts
    }
}

/// Run `attempt` until it completes or `policy` gives up.
///
/// `attempt` restarts from the top whenever it reports
/// [`ConcurrentModification`]. `pass` names the pass in logs and errors.
pub fn run_pass<T>(
    policy: &RetryPolicy,
    pass: &'static str,
    mut attempt: impl FnMut() -> Result<T, ConcurrentModification>,
) -> Result<T, PassError> {
    let mut attempts: u32 = 0;
    loop {
        attempts = attempts.saturating_add(1);
        match attempt() {
            Ok(value) => {
                if attempts > 1 {
                    debug!(pass, attempts, "pass completed after restarts");
                }
                return Ok(value);
            }
            Err(ConcurrentModification) => {
                if let Some(max) = policy.max_attempts
                    && attempts >= max.get()
                {
                    warn!(pass, attempts, "giving up; the tree kept changing");
                    return Err(PassError::RetriesExhausted { pass, attempts });
                }
                trace!(pass, attempts, "tree changed mid-pass; restarting");
            }
        }
    }
}

/// Draw `root` into a fresh [`DisplayList`], restarting on concurrent change.
///
/// `root` is drawn at its own position.
pub fn record(root: &dyn Element, policy: &RetryPolicy) -> Result<DisplayList, PassError> {
    run_pass(policy, "draw", || {
        let mut list = DisplayList::new();
        root.draw(&mut list, root.position())?;
        Ok(list)
    })
}

/// Draw `root` onto `surface`.
///
/// Only a completed attempt reaches `surface`; partial output from restarted
/// attempts is discarded.
pub fn draw(
    root: &dyn Element,
    surface: &mut dyn Surface,
    policy: &RetryPolicy,
) -> Result<(), PassError> {
    let list = record(root, policy)?;
    list.replay(surface);
    Ok(())
}

/// Find the element under `point`, given in `root`'s local coordinates.
///
/// Returns `None` when the point is outside `root`.
pub fn hit_test(
    root: &ElementRef,
    point: Point,
    policy: &RetryPolicy,
) -> Result<Option<Hit>, PassError> {
    if !Rect::from_origin_size(Point::ORIGIN, root.size()).contains(point) {
        return Ok(None);
    }
    run_pass(policy, "hit-test", || root.clone().hit_test(point)).map(Some)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{Color, Container, Context, DrawCommand, ElementCore};

    /// Adds a sibling to its container the first `remaining` times it is drawn.
    struct Meddler {
        core: ElementCore,
        target: Arc<Container>,
        remaining: AtomicUsize,
    }

    impl Element for Meddler {
        fn core(&self) -> &ElementCore {
            &self.core
        }

        fn draw(&self, surface: &mut dyn Surface, origin: Point) -> Result<(), ConcurrentModification> {
            surface.fill_rect(Rect::from_origin_size(origin, self.size()), Color::GRAY);
            let left = self.remaining.load(Ordering::Relaxed);
            if left > 0 {
                self.remaining.store(left - 1, Ordering::Relaxed);
                // Raw list access: a structural change without a context.
                self.target.children().add(Arc::new(Quiet(ElementCore::new(Rect::ZERO))));
            }
            Ok(())
        }
    }

    struct Quiet(ElementCore);

    impl Element for Quiet {
        fn core(&self) -> &ElementCore {
            &self.0
        }
    }

    fn meddling_scene(times: usize) -> Arc<Container> {
        let mut cx = Context::new();
        let root = Container::new(Rect::new(0.0, 0.0, 50.0, 50.0));
        let meddler = Arc::new(Meddler {
            core: ElementCore::new(Rect::new(0.0, 0.0, 10.0, 10.0)),
            target: root.clone(),
            remaining: AtomicUsize::new(times),
        });
        root.add(meddler, &mut cx).unwrap();
        root
    }

    #[test]
    fn draw_restarts_and_replays_only_the_final_attempt() {
        let root = meddling_scene(2);
        let mut out = DisplayList::new();
        draw(&*root, &mut out, &RetryPolicy::default()).unwrap();
        let fills = out
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect { .. }))
            .count();
        assert_eq!(fills, 1, "aborted attempts must not reach the surface");
        assert_eq!(root.children().len(), 3);
    }

    #[test]
    fn bounded_policy_gives_up() {
        let root = meddling_scene(usize::MAX);
        let policy = RetryPolicy::bounded(NonZeroU32::new(3).unwrap());
        let err = record(&*root, &policy).unwrap_err();
        assert_eq!(
            err,
            PassError::RetriesExhausted {
                pass: "draw",
                attempts: 3
            }
        );
    }

    #[test]
    fn hit_test_outside_the_root_is_none() {
        let root: ElementRef = Container::new(Rect::new(20.0, 20.0, 40.0, 40.0));
        let policy = RetryPolicy::unbounded();
        assert!(hit_test(&root, Point::new(25.0, 5.0), &policy).unwrap().is_none());
        let hit = hit_test(&root, Point::new(5.0, 5.0), &policy).unwrap().unwrap();
        assert_eq!(*hit.element, *root);
    }

    #[test]
    fn run_counts_attempts() {
        let mut calls = 0;
        let value = run_pass(&RetryPolicy::unbounded(), "test", || {
            calls += 1;
            if calls < 5 {
                Err(ConcurrentModification)
            } else {
                Ok(calls)
            }
        })
        .unwrap();
        assert_eq!(value, 5);
    }
}
