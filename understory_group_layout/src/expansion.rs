// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expanded/contracted state of groups.

use alloc::vec::Vec;

use hashbrown::HashSet;

/// Receives "display needs refresh" notifications.
///
/// Any `FnMut()` closure is a sink.
pub trait DisplaySink {
    /// Called when visible layout changed and the host should redraw.
    fn display_did_change(&mut self);
}

impl<F: FnMut()> DisplaySink for F {
    fn display_did_change(&mut self) {
        self();
    }
}

/// Tracks which groups are contracted, by group index.
///
/// Groups are expanded unless marked otherwise.
#[derive(Debug, Clone, Default)]
pub struct ExpansionTracker {
    contracted: HashSet<usize>,
}

impl ExpansionTracker {
    /// Creates a tracker with every group expanded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` unless the group at `index` is contracted.
    #[must_use]
    pub fn is_expanded(&self, index: usize) -> bool {
        !self.contracted.contains(&index)
    }

    /// Sets the state of the group at `index`.
    ///
    /// Returns `true` if the state actually changed.
    pub fn set_expanded(&mut self, index: usize, expanded: bool) -> bool {
        if expanded {
            self.contracted.remove(&index)
        } else {
            self.contracted.insert(index)
        }
    }

    /// Contracted group indices in ascending order.
    #[must_use]
    pub fn contracted(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.contracted.iter().copied().collect();
        indices.sort_unstable();
        indices
    }

    /// Expands every group.
    pub fn clear(&mut self) {
        self.contracted.clear();
    }
}
