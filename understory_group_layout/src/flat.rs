// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ungrouped row layout that group offsets are added on top of.

/// Row positions for the flat item sequence, ignoring groups.
///
/// Implementations must return non-negative values, and `row_offset` must be
/// non-decreasing in `index`. Indices past the last item are valid and are
/// laid out as if the sequence continued.
pub trait FlatLayout {
    /// Offset of the row for `index` from the start of the list.
    fn row_offset(&mut self, index: usize) -> f64;

    /// Height of the row for `index`.
    fn row_extent(&mut self, index: usize) -> f64;
}

/// A [`FlatLayout`] where every row shares the same height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRowLayout {
    row_height: f64,
}

impl FixedRowLayout {
    /// Creates a layout with uniform `row_height`.
    #[must_use]
    pub fn new(row_height: f64) -> Self {
        Self {
            row_height: clamp_extent(row_height),
        }
    }

    /// Sets the uniform row height.
    pub fn set_row_height(&mut self, row_height: f64) {
        self.row_height = clamp_extent(row_height);
    }

    /// Returns the uniform row height.
    #[must_use]
    pub const fn row_height(&self) -> f64 {
        self.row_height
    }
}

impl Default for FixedRowLayout {
    fn default() -> Self {
        Self::new(32.0)
    }
}

impl FlatLayout for FixedRowLayout {
    #[allow(
        clippy::cast_precision_loss,
        reason = "Row indices stay far below 2^52"
    )]
    fn row_offset(&mut self, index: usize) -> f64 {
        index as f64 * self.row_height
    }

    fn row_extent(&mut self, _index: usize) -> f64 {
        self.row_height
    }
}

/// Clamps an extent to a finite, non-negative value.
pub(crate) fn clamp_extent(extent: f64) -> f64 {
    // Catch NaNs (and infinities) in debug builds so misuse does not go unnoticed.
    debug_assert!(extent.is_finite(), "extents must be finite; got {extent:?}");
    if extent.is_finite() && extent > 0.0 {
        extent
    } else {
        0.0
    }
}
