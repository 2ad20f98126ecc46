// Copyright 2025 the Ortho Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus registry: which single element currently has input focus.
//!
//! ## Usage
//!
//! 1) Register focus-capable elements with [`FocusManager::add_element`].
//! 2) Move focus with [`FocusManager::set_focused`] or cycle with
//!    [`FocusManager::focus_next`] / [`FocusManager::focus_previous`].
//! 3) Query [`FocusManager::focused`] from interactors that only react in the focused view.
//!
//! ## Minimal example
//!
//! ```
//! use ortho_interaction::focus::FocusManager;
//! let mut f: FocusManager<u32> = FocusManager::new();
//! assert!(f.add_element(1));
//! assert!(f.add_element(2));
//! assert!(!f.set_focused(3));
//! assert!(f.set_focused(2));
//! assert_eq!(f.focused(), Some(2));
//! assert!(f.remove_element(2));
//! assert_eq!(f.focused(), None);
//! ```

/// Registry of focus-capable elements with at most one focused element.
///
/// Adding or removing elements never moves focus, except that removing the focused
/// element clears it. Elements keep their insertion order, which is the order used by
/// [`focus_next`](Self::focus_next) and [`focus_previous`](Self::focus_previous).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusManager<K: Copy + Eq> {
    elements: Vec<K>,
    focused: Option<K>,
    loop_focus: bool,
}

impl<K: Copy + Eq> FocusManager<K> {
    /// Create an empty registry. Cycling does not wrap around by default.
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
            focused: None,
            loop_focus: false,
        }
    }

    /// Whether cycling wraps from the last element to the first (and back).
    pub const fn loops(&self) -> bool {
        self.loop_focus
    }

    /// Enable or disable wrap-around cycling.
    pub fn set_loop(&mut self, loop_focus: bool) {
        self.loop_focus = loop_focus;
    }

    /// Register an element. Returns `false` if it was already present.
    pub fn add_element(&mut self, element: K) -> bool {
        if self.elements.contains(&element) {
            return false;
        }
        self.elements.push(element);
        true
    }

    /// Unregister an element. Returns `false` if it was not present.
    pub fn remove_element(&mut self, element: K) -> bool {
        let Some(i) = self.elements.iter().position(|&e| e == element) else {
            return false;
        };
        self.elements.remove(i);
        if self.focused == Some(element) {
            self.focused = None;
        }
        true
    }

    /// Give `element` the focus. Returns `false` if it is not registered.
    pub fn set_focused(&mut self, element: K) -> bool {
        if !self.elements.contains(&element) {
            return false;
        }
        self.focused = Some(element);
        true
    }

    /// The focused element, if any.
    pub const fn focused(&self) -> Option<K> {
        self.focused
    }

    /// Drop the focus, returning the element that had it.
    pub fn clear_focus(&mut self) -> Option<K> {
        self.focused.take()
    }

    /// Registered elements in insertion order.
    pub fn elements(&self) -> &[K] {
        &self.elements
    }

    /// Whether `element` is registered.
    pub fn contains(&self, element: K) -> bool {
        self.elements.contains(&element)
    }

    /// Whether no element is registered.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Move focus to the next element and return it.
    ///
    /// Without focus, the first element receives it. At the last element, focus wraps
    /// to the first if looping is enabled; otherwise nothing changes and `None` is returned.
    pub fn focus_next(&mut self) -> Option<K> {
        let next = match self.focused_index() {
            None => 0,
            Some(i) if i + 1 < self.elements.len() => i + 1,
            Some(_) if self.loop_focus => 0,
            Some(_) => return None,
        };
        self.focus_at(next)
    }

    /// Move focus to the previous element and return it.
    ///
    /// Without focus, the last element receives it. At the first element, focus wraps
    /// to the last if looping is enabled; otherwise nothing changes and `None` is returned.
    pub fn focus_previous(&mut self) -> Option<K> {
        let last = self.elements.len().checked_sub(1)?;
        let prev = match self.focused_index() {
            None => last,
            Some(0) if self.loop_focus => last,
            Some(0) => return None,
            Some(i) => i - 1,
        };
        self.focus_at(prev)
    }

    fn focused_index(&self) -> Option<usize> {
        let f = self.focused?;
        self.elements.iter().position(|&e| e == f)
    }

    fn focus_at(&mut self, i: usize) -> Option<K> {
        let e = *self.elements.get(i)?;
        self.focused = Some(e);
        Some(e)
    }
}
