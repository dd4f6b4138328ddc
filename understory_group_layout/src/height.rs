// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-group height resolution and memoization.

use alloc::vec::Vec;

use crate::GroupedContent;

/// What a [`HeightDelegate`] is asked about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupQuery {
    /// Position of the group in the content.
    pub index: usize,
    /// Whether the group currently shows its body.
    pub expanded: bool,
    /// The configured uniform group height.
    pub fallback: f64,
}

/// Supplies the height of a group when heights are not uniform.
///
/// Results are memoized per group until the engine invalidates them, so a
/// delegate must report the same value for the same group until then.
/// `None`, NaN, and negative values are treated as `0.0`.
pub trait HeightDelegate<C: GroupedContent + ?Sized> {
    /// Returns the height of the group described by `query`.
    fn height_for_group(&mut self, content: &C, query: GroupQuery) -> Option<f64>;
}

impl<C, F> HeightDelegate<C> for F
where
    C: GroupedContent + ?Sized,
    F: FnMut(&C, GroupQuery) -> Option<f64>,
{
    fn height_for_group(&mut self, content: &C, query: GroupQuery) -> Option<f64> {
        self(content, query)
    }
}

/// The delegate used when none is supplied.
///
/// Expanded groups use [`GroupedContent::group_height`] when the content
/// stores one. Contracted groups, and groups without a stored height, use the
/// configured fallback, so a contracted group keeps only its header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultGroupHeight;

impl<C: GroupedContent + ?Sized> HeightDelegate<C> for DefaultGroupHeight {
    fn height_for_group(&mut self, content: &C, query: GroupQuery) -> Option<f64> {
        let stored = if query.expanded {
            content.group_height(query.index)
        } else {
            None
        };
        Some(stored.unwrap_or(query.fallback))
    }
}

/// Sparse memo of resolved group heights, indexed by group position.
#[derive(Debug, Clone, Default)]
pub(crate) struct GroupHeights {
    heights: Vec<Option<f64>>,
}

impl GroupHeights {
    /// Returns the memoized height for `index`, computing it on a miss.
    pub(crate) fn resolve(&mut self, index: usize, compute: impl FnOnce() -> Option<f64>) -> f64 {
        if let Some(Some(height)) = self.heights.get(index) {
            return *height;
        }
        let height = coerce_height(compute());
        if self.heights.len() <= index {
            self.heights.resize(index + 1, None);
        }
        self.heights[index] = Some(height);
        height
    }

    /// Drops the memoized height for `index`.
    pub(crate) fn forget(&mut self, index: usize) {
        if let Some(slot) = self.heights.get_mut(index) {
            *slot = None;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.heights.clear();
    }
}

fn coerce_height(height: Option<f64>) -> f64 {
    match height {
        Some(h) if h.is_finite() && h > 0.0 => h,
        _ => 0.0,
    }
}
