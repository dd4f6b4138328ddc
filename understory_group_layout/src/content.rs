// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouped content providers and group lookup.

use alloc::vec::Vec;
use core::ops::Range;

/// A flat sequence of items partitioned into contiguous groups.
///
/// The host owns the groups; the layout engine only reads them. Groups are
/// addressed by their position `0..group_count()` and identified across
/// notifications by [`GroupedContent::GroupId`].
pub trait GroupedContent {
    /// Opaque handle identifying a group.
    type GroupId: Copy + Eq;

    /// Number of groups.
    fn group_count(&self) -> usize;

    /// Handle of the group at `index`.
    fn group_id(&self, index: usize) -> Self::GroupId;

    /// Items covered by the group at `index`, as a half-open range.
    fn item_range(&self, index: usize) -> Range<usize>;

    /// Height stored on the group itself, if any.
    ///
    /// This is consulted by [`DefaultGroupHeight`](crate::DefaultGroupHeight)
    /// for expanded groups. The default returns `None`.
    fn group_height(&self, index: usize) -> Option<f64> {
        let _ = index;
        None
    }

    /// Total number of items, i.e. the end of the last group's range.
    fn item_count(&self) -> usize {
        match self.group_count() {
            0 => 0,
            n => self.item_range(n - 1).end,
        }
    }
}

/// A simple group description: `len` items starting at `start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupSpan<K> {
    /// Handle identifying the group.
    pub id: K,
    /// First item of the group.
    pub start: usize,
    /// Number of items in the group.
    pub len: usize,
    /// Optional per-group height.
    pub height: Option<f64>,
}

impl<K> GroupSpan<K> {
    /// Creates a span without a stored height.
    #[must_use]
    pub const fn new(id: K, start: usize, len: usize) -> Self {
        Self {
            id,
            start,
            len,
            height: None,
        }
    }

    /// Returns this span with a stored height.
    #[must_use]
    pub const fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }
}

impl<K: Copy + Eq> GroupedContent for [GroupSpan<K>] {
    type GroupId = K;

    fn group_count(&self) -> usize {
        self.len()
    }

    fn group_id(&self, index: usize) -> K {
        self[index].id
    }

    fn item_range(&self, index: usize) -> Range<usize> {
        let span = &self[index];
        span.start..span.start + span.len
    }

    fn group_height(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(|span| span.height)
    }
}

impl<K: Copy + Eq> GroupedContent for Vec<GroupSpan<K>> {
    type GroupId = K;

    fn group_count(&self) -> usize {
        self.as_slice().group_count()
    }

    fn group_id(&self, index: usize) -> K {
        self.as_slice().group_id(index)
    }

    fn item_range(&self, index: usize) -> Range<usize> {
        self.as_slice().item_range(index)
    }

    fn group_height(&self, index: usize) -> Option<f64> {
        self.as_slice().group_height(index)
    }
}

/// Where an item index falls relative to the groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSlot {
    /// The item belongs to the group at this index.
    Within(usize),
    /// The item lies past every group; carries the group count.
    PastEnd(usize),
}

impl GroupSlot {
    /// Group index, or the group count for [`GroupSlot::PastEnd`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Within(i) | Self::PastEnd(i) => i,
        }
    }

    /// Returns the containing group, if any.
    #[must_use]
    pub const fn group(self) -> Option<usize> {
        match self {
            Self::Within(i) => Some(i),
            Self::PastEnd(_) => None,
        }
    }
}

/// Finds the group containing `item`.
///
/// This scans groups in order and the first match wins, so a call costs
/// `O(group_count)`. Group counts are expected to be small relative to item
/// counts; hosts with thousands of groups should keep their own index.
pub fn group_containing_item<C>(content: &C, item: usize) -> GroupSlot
where
    C: GroupedContent + ?Sized,
{
    let count = content.group_count();
    (0..count)
        .find(|&i| content.item_range(i).contains(&item))
        .map_or(GroupSlot::PastEnd(count), GroupSlot::Within)
}

/// Finds the position of the group identified by `id`.
pub fn index_of_group<C>(content: &C, id: C::GroupId) -> Option<usize>
where
    C: GroupedContent + ?Sized,
{
    (0..content.group_count()).find(|&i| content.group_id(i) == id)
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{GroupSlot, GroupSpan, GroupedContent, group_containing_item, index_of_group};

    fn abc() -> Vec<GroupSpan<char>> {
        vec![
            GroupSpan::new('a', 0, 5),
            GroupSpan::new('b', 5, 3),
            GroupSpan::new('c', 8, 2),
        ]
    }

    #[test]
    fn locates_items_within_ranges() {
        let groups = abc();
        assert_eq!(group_containing_item(&groups, 0), GroupSlot::Within(0));
        assert_eq!(group_containing_item(&groups, 4), GroupSlot::Within(0));
        assert_eq!(group_containing_item(&groups, 5), GroupSlot::Within(1));
        assert_eq!(group_containing_item(&groups, 9), GroupSlot::Within(2));
    }

    #[test]
    fn past_end_reports_group_count() {
        let groups = abc();
        let slot = group_containing_item(&groups, 10);
        assert_eq!(slot, GroupSlot::PastEnd(3));
        assert_eq!(slot.index(), 3);
        assert_eq!(slot.group(), None);
        assert_eq!(groups.item_count(), 10);
    }

    #[test]
    fn empty_groups_never_match() {
        let groups = vec![GroupSpan::new(1_u8, 0, 0), GroupSpan::new(2, 0, 2)];
        assert_eq!(group_containing_item(&groups, 0), GroupSlot::Within(1));
        let empty: Vec<GroupSpan<u8>> = Vec::new();
        assert_eq!(group_containing_item(&empty, 0), GroupSlot::PastEnd(0));
        assert_eq!(empty.item_count(), 0);
    }

    #[test]
    fn finds_groups_by_id() {
        let groups = abc();
        assert_eq!(index_of_group(&groups, 'b'), Some(1));
        assert_eq!(index_of_group(&groups, 'z'), None);
    }

    #[test]
    fn spans_expose_stored_heights() {
        let groups = vec![GroupSpan::new(0_u8, 0, 1).with_height(12.0)];
        assert_eq!(groups.group_height(0), Some(12.0));
        assert_eq!(groups.group_height(1), None);
    }
}
