// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Forward-extendable prefix sums over group heights.

use alloc::vec::Vec;

/// Cumulative group offsets, built lazily from the front.
///
/// `offsets[i]` is the total height of groups `0..i`. Only the prefix
/// `offsets[..offsets.len()]` is valid; everything past it is unknown and is
/// computed on demand by walking forward from the last valid entry. Entries
/// are never recomputed until the cache is truncated or cleared.
#[derive(Debug, Clone, Default)]
pub(crate) struct OffsetCache {
    offsets: Vec<f64>,
}

impl OffsetCache {
    /// Returns the total height of groups `0..group`.
    ///
    /// `height_of` is only called for groups whose offsets are not yet cached,
    /// in ascending order.
    pub(crate) fn offset_before(
        &mut self,
        group: usize,
        mut height_of: impl FnMut(usize) -> f64,
    ) -> f64 {
        if let Some(offset) = self.offsets.get(group) {
            return *offset;
        }
        if self.offsets.is_empty() {
            self.offsets.push(0.0);
        }

        let mut cur = self.offsets.len() - 1;
        let mut pos = self.offsets[cur];
        tracing::trace!(from = cur, to = group, "extending group offset cache");

        self.offsets.reserve(group - cur);
        while cur < group {
            pos += height_of(cur);
            cur += 1;
            self.offsets.push(pos);
        }
        pos
    }

    /// Drops every offset that depends on the height of `group`.
    ///
    /// The offset *before* `group` stays valid.
    pub(crate) fn invalidate_from(&mut self, group: usize) {
        let keep = group.saturating_add(1);
        if self.offsets.len() > keep {
            tracing::trace!(group, "truncating group offset cache");
            self.offsets.truncate(keep);
        }
    }

    pub(crate) fn clear(&mut self) {
        tracing::trace!("clearing group offset cache");
        self.offsets.clear();
    }

    /// Number of valid entries.
    #[cfg(test)]
    fn valid_len(&self) -> usize {
        self.offsets.len()
    }
}
