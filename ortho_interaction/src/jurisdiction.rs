// Copyright 2025 the Ortho Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Jurisdiction ranking with a resumable cursor.
//!
//! ## Overview
//!
//! When no selected interactor takes an event, the
//! [`Dispatcher`](crate::dispatcher::Dispatcher) asks every registered interactor how
//! relevant the event is to it and walks the candidates from most to least relevant.
//! [`JurisdictionMap`] holds that ranking together with the walk position.
//!
//! ## Ordering
//!
//! - Only scores strictly greater than the threshold are kept; `NaN` never is.
//! - Higher scores come first.
//! - Equal scores keep their input order (stable sort), so the ranking is
//!   deterministic for a given registration order.
//!
//! ## Cursor
//!
//! The cursor is an index into the ranking; `len()` is the end sentinel.
//! [`rebuild`](JurisdictionMap::rebuild) and [`clear`](JurisdictionMap::clear) reset
//! entries and cursor together so the two never disagree.

/// A ranked candidate.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate<T> {
    /// Relevance reported by the candidate.
    pub score: f32,
    /// The candidate itself.
    pub item: T,
}

/// Ranked candidates plus the position of the next one to ask.
#[derive(Clone, Debug)]
pub struct JurisdictionMap<T> {
    entries: Vec<Candidate<T>>,
    cursor: usize,
}

impl<T> Default for JurisdictionMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> JurisdictionMap<T> {
    /// Create an empty map with the cursor at the end sentinel.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
        }
    }

    /// Replace the ranking with `scored` candidates above `threshold` and rewind.
    pub fn rebuild(&mut self, scored: impl IntoIterator<Item = (f32, T)>, threshold: f32) {
        self.entries.clear();
        self.entries.extend(
            scored
                .into_iter()
                .filter(|(score, _)| *score > threshold)
                .map(|(score, item)| Candidate { score, item }),
        );
        // Stable: equal scores stay in input order.
        self.entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        self.cursor = 0;
    }

    /// Drop every candidate.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no candidates.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Candidates in ranking order.
    pub fn entries(&self) -> &[Candidate<T>] {
        &self.entries
    }

    /// Index of the next candidate to ask; equals [`len`](Self::len) at the end.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the cursor sits on the end sentinel.
    pub fn is_at_end(&self) -> bool {
        self.cursor >= self.entries.len()
    }

    /// The candidate under the cursor.
    pub fn current(&self) -> Option<&Candidate<T>> {
        self.entries.get(self.cursor)
    }

    /// Move the cursor one step towards the end sentinel.
    pub fn advance(&mut self) {
        if self.cursor < self.entries.len() {
            self.cursor += 1;
        }
    }

    /// Move the cursor back to the first candidate.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Remove the first candidate matching `pred`.
    ///
    /// Entries before the cursor shift it so it keeps pointing at the same candidate.
    /// Removing the candidate under the cursor moves the cursor to the end sentinel.
    pub fn remove_first(&mut self, mut pred: impl FnMut(&T) -> bool) -> bool {
        let Some(i) = self.entries.iter().position(|c| pred(&c.item)) else {
            return false;
        };
        self.entries.remove(i);
        if i == self.cursor {
            self.cursor = self.entries.len();
        } else if i < self.cursor {
            self.cursor -= 1;
        }
        true
    }
}
