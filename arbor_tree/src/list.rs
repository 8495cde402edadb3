// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A z-ordered element collection with fail-fast iteration.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::{ConcurrentModification, ElementId, ElementRef};

#[derive(Clone, Debug)]
struct Entry {
    // Priority at insertion time; later changes apply on re-insertion only.
    priority: i32,
    element: ElementRef,
}

/// An ordered collection of elements, ascending by z-priority.
///
/// Equal priorities keep insertion order: a new element goes after every
/// existing element of the same priority. Structural changes bump a version
/// counter; iterators compare it on every step and yield
/// [`ConcurrentModification`] once it moves.
///
/// Every method takes `&self` and is safe to call from any thread.
#[derive(Debug, Default)]
pub struct ElementList {
    entries: RwLock<Vec<Entry>>,
    version: AtomicU64,
}

impl ElementList {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `element` after the last element whose priority is less than or
    /// equal to its own.
    pub fn add(&self, element: ElementRef) {
        let priority = element.z_priority();
        let mut entries = self.entries.write();
        let at = entries.partition_point(|e| e.priority <= priority);
        entries.insert(at, Entry { priority, element });
        self.version.fetch_add(1, Ordering::Release);
    }

    /// Remove the element with id `id`, returning it.
    pub fn remove(&self, id: ElementId) -> Option<ElementRef> {
        let mut entries = self.entries.write();
        let at = entries.iter().position(|e| e.element.id() == id)?;
        let entry = entries.remove(at);
        self.version.fetch_add(1, Ordering::Release);
        Some(entry.element)
    }

    /// Remove every element, returning them in order.
    pub fn remove_all(&self) -> Vec<ElementRef> {
        let mut entries = self.entries.write();
        if entries.is_empty() {
            return Vec::new();
        }
        let removed = entries.drain(..).map(|e| e.element).collect();
        self.version.fetch_add(1, Ordering::Release);
        removed
    }

    /// Whether an element with id `id` is present.
    pub fn contains(&self, id: ElementId) -> bool {
        self.entries.read().iter().any(|e| e.element.id() == id)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Structural version; changes on every add or remove.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// A copy of the current contents in ascending order.
    pub fn snapshot(&self) -> Vec<ElementRef> {
        self.entries.read().iter().map(|e| e.element.clone()).collect()
    }

    /// Call `f` for each element of a snapshot, in ascending order.
    ///
    /// Never fails: concurrent changes are simply not observed.
    pub fn for_each(&self, mut f: impl FnMut(&ElementRef)) {
        for element in &self.snapshot() {
            f(element);
        }
    }

    /// Fail-fast iterator in ascending z-order.
    ///
    /// Each step yields `Ok` while the list is unchanged since the iterator was
    /// created, and a single `Err` otherwise.
    pub fn iter(&self) -> Iter<'_> {
        let entries = self.entries.read();
        Iter {
            list: self,
            expected: self.version.load(Ordering::Acquire),
            front: 0,
            back: entries.len(),
            failed: false,
        }
    }

    /// Fail-fast iterator in descending z-order; the exact reverse of [`ElementList::iter`].
    pub fn iter_rev(&self) -> std::iter::Rev<Iter<'_>> {
        self.iter().rev()
    }

    fn step(&self, expected: u64, index: usize) -> Result<ElementRef, ConcurrentModification> {
        let entries = self.entries.read();
        if self.version.load(Ordering::Acquire) != expected {
            return Err(ConcurrentModification);
        }
        entries
            .get(index)
            .map(|e| e.element.clone())
            .ok_or(ConcurrentModification)
    }
}

/// Iterator returned by [`ElementList::iter`].
#[derive(Debug)]
pub struct Iter<'a> {
    list: &'a ElementList,
    expected: u64,
    front: usize,
    back: usize,
    failed: bool,
}

impl Iter<'_> {
    fn finish(&mut self, index: usize) -> Option<Result<ElementRef, ConcurrentModification>> {
        let item = self.list.step(self.expected, index);
        if item.is_err() {
            self.failed = true;
        }
        Some(item)
    }

    fn changed(&self) -> bool {
        self.list.version() != self.expected
    }
}

impl Iterator for Iter<'_> {
    type Item = Result<ElementRef, ConcurrentModification>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        // A change is reported even when the iterator would otherwise be done.
        if self.front >= self.back {
            if self.changed() {
                self.failed = true;
                return Some(Err(ConcurrentModification));
            }
            return None;
        }
        let index = self.front;
        self.front += 1;
        self.finish(index)
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if self.front >= self.back {
            if self.changed() {
                self.failed = true;
                return Some(Err(ConcurrentModification));
            }
            return None;
        }
        self.back -= 1;
        let index = self.back;
        self.finish(index)
    }
}

impl std::iter::FusedIterator for Iter<'_> {}
