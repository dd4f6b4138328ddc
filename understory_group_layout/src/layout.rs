// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The grouped list layout engine.

use alloc::vec::Vec;
use core::ops::Range;

use kurbo::Rect;

use crate::content::{group_containing_item, index_of_group};
use crate::flat::clamp_extent;
use crate::height::GroupHeights;
use crate::offsets::OffsetCache;
use crate::{
    DefaultGroupHeight, DisplaySink, ExpansionTracker, FixedRowLayout, FlatLayout, GroupQuery,
    GroupSlot, GroupedContent, HeightDelegate,
};

/// Group height configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupLayoutConfig {
    /// Every group has [`GroupLayoutConfig::group_height`], and the delegate
    /// is never consulted.
    pub uniform_group_heights: bool,
    /// Uniform group height, and the fallback handed to delegates.
    pub group_height: f64,
}

impl Default for GroupLayoutConfig {
    fn default() -> Self {
        Self {
            uniform_group_heights: true,
            group_height: 32.0,
        }
    }
}

/// Computes item and group header offsets for grouped list content.
///
/// Each group contributes a height (its header, plus whatever body height
/// the delegate reports) on top of the ungrouped row positions from a
/// [`FlatLayout`]. An item sits below the heights of its own group and every
/// group before it.
///
/// With uniform group heights this is closed-form arithmetic. Otherwise group
/// heights are resolved through a [`HeightDelegate`], memoized, and summed into
/// a prefix cache that is extended lazily, so scanning items in increasing
/// order costs amortized `O(1)` per query beyond the group lookup.
///
/// Caches are invalidated explicitly: [`GroupedListLayout::content_did_change`]
/// after structural edits, [`GroupedListLayout::group_height_did_change`] after
/// a single group's height changes, and automatically on expansion changes.
#[derive(Debug)]
pub struct GroupedListLayout<C, D = DefaultGroupHeight, F = FixedRowLayout> {
    content: C,
    delegate: D,
    flat: F,
    config: GroupLayoutConfig,

    heights: GroupHeights,
    offsets: OffsetCache,
    expansion: ExpansionTracker,
}

impl<C: GroupedContent> GroupedListLayout<C> {
    /// Creates a uniform-height layout over `content` with default settings.
    #[must_use]
    pub fn new(content: C) -> Self {
        Self::with_parts(
            content,
            DefaultGroupHeight,
            FixedRowLayout::default(),
            GroupLayoutConfig::default(),
        )
    }
}

impl<C: GroupedContent, D: HeightDelegate<C>> GroupedListLayout<C, D> {
    /// Creates a variable-height layout whose group heights come from `delegate`.
    #[must_use]
    pub fn with_delegate(content: C, delegate: D) -> Self {
        let config = GroupLayoutConfig {
            uniform_group_heights: false,
            ..GroupLayoutConfig::default()
        };
        Self::with_parts(content, delegate, FixedRowLayout::default(), config)
    }
}

impl<C, D, F> GroupedListLayout<C, D, F>
where
    C: GroupedContent,
    D: HeightDelegate<C>,
    F: FlatLayout,
{
    /// Creates a layout from all of its collaborators.
    #[must_use]
    pub fn with_parts(content: C, delegate: D, flat: F, config: GroupLayoutConfig) -> Self {
        Self {
            content,
            delegate,
            flat,
            config: GroupLayoutConfig {
                group_height: clamp_extent(config.group_height),
                ..config
            },
            heights: GroupHeights::default(),
            offsets: OffsetCache::default(),
            expansion: ExpansionTracker::new(),
        }
    }

    /// Returns a shared reference to the content.
    #[must_use]
    pub fn content(&self) -> &C {
        &self.content
    }

    /// Replaces the content and discards every cache.
    pub fn set_content(&mut self, content: C) {
        self.content = content;
        self.content_did_change();
    }

    /// Returns the current configuration.
    #[must_use]
    pub const fn config(&self) -> GroupLayoutConfig {
        self.config
    }

    /// Switches between the uniform and variable height paths.
    pub fn set_uniform_group_heights(&mut self, uniform: bool) {
        self.config.uniform_group_heights = uniform;
    }

    /// Sets the uniform group height.
    ///
    /// Delegates receive this value as their fallback, so memoized heights and
    /// offsets are discarded.
    pub fn set_group_height(&mut self, height: f64) {
        let height = clamp_extent(height);
        if height != self.config.group_height {
            self.config.group_height = height;
            self.heights.clear();
            self.offsets.clear();
        }
    }

    /// Returns a mutable reference to the flat row layout.
    ///
    /// Group offsets do not depend on it, so no cache is touched.
    pub fn flat_mut(&mut self) -> &mut F {
        &mut self.flat
    }

    /// Discards every cache after a structural change to the content.
    ///
    /// Use this when items were added, removed, or moved across group
    /// boundaries. Expansion state is indexed by group position and is reset
    /// as well.
    pub fn content_did_change(&mut self) {
        self.heights.clear();
        self.offsets.clear();
        self.expansion.clear();
    }

    /// Discards the memoized height of one group and every offset after it.
    pub fn group_height_did_change(&mut self, group: usize) {
        self.heights.forget(group);
        self.offsets.invalidate_from(group);
    }

    /// Returns the height of the group at `group`.
    ///
    /// With variable heights, indices past the last group have height `0.0`
    /// and never reach the delegate.
    pub fn height_for_group(&mut self, group: usize) -> f64 {
        if self.config.uniform_group_heights {
            return self.config.group_height;
        }
        self.resolve_height(group)
    }

    fn resolve_height(&mut self, group: usize) -> f64 {
        if group >= self.content.group_count() {
            return 0.0;
        }
        let Self {
            content,
            delegate,
            config,
            heights,
            expansion,
            ..
        } = self;
        resolve(heights, delegate, content, expansion, config.group_height, group)
    }

    /// Returns the total height of the groups before `group`.
    ///
    /// `group` is clamped to the group count, which yields the height of all
    /// groups.
    pub fn cumulative_offset_before_group(&mut self, group: usize) -> f64 {
        let group = group.min(self.content.group_count());
        if self.config.uniform_group_heights {
            return group_multiple(self.config.group_height, group);
        }
        let Self {
            content,
            delegate,
            config,
            heights,
            offsets,
            expansion,
            ..
        } = self;
        let fallback = config.group_height;
        offsets.offset_before(group, |i| {
            resolve(heights, delegate, content, expansion, fallback, i)
        })
    }

    /// Returns where `item` begins in the list.
    ///
    /// Items past the end are laid out after every group, so querying
    /// `item_count()` yields the total extent.
    pub fn offset_for_item(&mut self, item: usize) -> f64 {
        let base = self.flat.row_offset(item);
        let slot = group_containing_item(&self.content, item);
        if self.config.uniform_group_heights {
            let headers = match slot {
                GroupSlot::Within(i) => i + 1,
                GroupSlot::PastEnd(n) => n,
            };
            return base + group_multiple(self.config.group_height, headers);
        }

        let mut offset = base + self.cumulative_offset_before_group(slot.index());
        if let Some(group) = slot.group() {
            offset += self.resolve_height(group);
        }
        offset
    }

    /// Returns the offset one past the last item.
    pub fn total_extent(&mut self) -> f64 {
        let len = self.content.item_count();
        self.offset_for_item(len)
    }

    /// Returns the item range of the group containing `item`.
    #[must_use]
    pub fn group_range_for_item(&self, item: usize) -> Option<Range<usize>> {
        group_containing_item(&self.content, item)
            .group()
            .map(|i| self.content.item_range(i))
    }

    /// Returns the frame of the header of the group at `group`.
    ///
    /// The header sits directly above the group's first row and is as tall as
    /// the group's height. `group` must be less than the group count.
    pub fn header_frame(&mut self, group: usize, width: f64) -> Rect {
        let first = self.content.item_range(group).start;
        let y = self.flat.row_offset(first) + self.cumulative_offset_before_group(group);
        Rect::new(0.0, y, width, y + self.height_for_group(group))
    }

    /// Returns the frame of the row for `item`.
    pub fn item_frame(&mut self, item: usize, width: f64) -> Rect {
        let y = self.offset_for_item(item);
        Rect::new(0.0, y, width, y + self.flat.row_extent(item))
    }

    /// Returns `true` unless the group at `group` is contracted.
    #[must_use]
    pub fn is_expanded(&self, group: usize) -> bool {
        self.expansion.is_expanded(group)
    }

    /// Contracted group indices in ascending order.
    #[must_use]
    pub fn contracted_groups(&self) -> Vec<usize> {
        self.expansion.contracted()
    }

    /// Handles a group's expand/collapse notification.
    ///
    /// Groups that are no longer in the content are ignored. When the state
    /// actually changes, the group's height and every later offset are
    /// invalidated and `sink` is told to redraw. Returns whether anything
    /// changed.
    pub fn set_expansion(
        &mut self,
        group: C::GroupId,
        expanded: bool,
        sink: &mut impl DisplaySink,
    ) -> bool {
        let Some(index) = index_of_group(&self.content, group) else {
            return false;
        };
        if !self.expansion.set_expanded(index, expanded) {
            return false;
        }
        tracing::debug!(group = index, expanded, "group expansion changed");
        self.group_height_did_change(index);
        sink.display_did_change();
        true
    }
}

fn resolve<C, D>(
    heights: &mut GroupHeights,
    delegate: &mut D,
    content: &C,
    expansion: &ExpansionTracker,
    fallback: f64,
    index: usize,
) -> f64
where
    C: GroupedContent,
    D: HeightDelegate<C>,
{
    heights.resolve(index, || {
        let query = GroupQuery {
            index,
            expanded: expansion.is_expanded(index),
            fallback,
        };
        delegate.height_for_group(content, query)
    })
}

#[allow(
    clippy::cast_precision_loss,
    reason = "Group counts stay far below 2^52"
)]
fn group_multiple(height: f64, groups: usize) -> f64 {
    height * groups as f64
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use kurbo::Rect;

    use super::{GroupLayoutConfig, GroupedListLayout};
    use crate::{DefaultGroupHeight, FixedRowLayout, GroupQuery, GroupSpan};

    /// Groups A (items 0..5), B (5..8), C (8..10).
    fn abc() -> Vec<GroupSpan<char>> {
        vec![
            GroupSpan::new('a', 0, 5).with_height(20.0),
            GroupSpan::new('b', 5, 3).with_height(15.0),
            GroupSpan::new('c', 8, 2).with_height(10.0),
        ]
    }

    fn variable(groups: Vec<GroupSpan<char>>) -> GroupedListLayout<Vec<GroupSpan<char>>> {
        let config = GroupLayoutConfig {
            uniform_group_heights: false,
            group_height: 0.0,
        };
        GroupedListLayout::with_parts(groups, DefaultGroupHeight, FixedRowLayout::new(10.0), config)
    }

    #[test]
    fn cumulative_offsets_follow_group_heights() {
        let mut layout = variable(abc());
        assert_eq!(layout.cumulative_offset_before_group(0), 0.0);
        assert_eq!(layout.cumulative_offset_before_group(1), 20.0);
        assert_eq!(layout.cumulative_offset_before_group(2), 35.0);
        assert_eq!(layout.cumulative_offset_before_group(3), 45.0);
    }

    #[test]
    fn item_offsets_include_their_own_group() {
        let mut layout = variable(abc());
        // Row 0 sits below header A.
        assert_eq!(layout.offset_for_item(0), 20.0);
        // Row 5 sits below A and B.
        assert_eq!(layout.offset_for_item(5), 50.0 + 35.0);
        assert_eq!(layout.offset_for_item(9), 90.0 + 45.0);
        // One past the end counts every group.
        assert_eq!(layout.offset_for_item(10), 100.0 + 45.0);
        assert_eq!(layout.total_extent(), 145.0);
        assert_eq!(layout.offset_for_item(50), 500.0 + 45.0);
    }

    #[test]
    fn uniform_heights_use_closed_form() {
        let mut layout = GroupedListLayout::new(abc());
        layout.flat_mut().set_row_height(10.0);
        layout.set_group_height(8.0);
        assert_eq!(layout.height_for_group(1), 8.0);
        assert_eq!(layout.offset_for_item(0), 8.0);
        assert_eq!(layout.offset_for_item(5), 50.0 + 16.0);
        assert_eq!(layout.offset_for_item(10), 100.0 + 24.0);
        assert_eq!(layout.cumulative_offset_before_group(2), 16.0);
    }

    #[test]
    fn collapsing_shifts_only_later_groups() {
        // Contracted groups collapse to nothing.
        let delegate = |groups: &Vec<GroupSpan<char>>, q: GroupQuery| {
            if q.expanded { groups[q.index].height } else { None }
        };
        let mut layout = GroupedListLayout::with_delegate(abc(), delegate);
        layout.flat_mut().set_row_height(10.0);
        let before: Vec<f64> = (0..=10).map(|i| layout.offset_for_item(i)).collect();

        let mut redraws = 0;
        assert!(layout.set_expansion('b', false, &mut || redraws += 1));
        assert_eq!(layout.contracted_groups(), [1]);
        assert!(!layout.is_expanded(1));
        assert_eq!(layout.cumulative_offset_before_group(2), 20.0);

        for i in 0..5 {
            assert_eq!(layout.offset_for_item(i), before[i]);
        }
        for i in 8..=10 {
            assert_eq!(layout.offset_for_item(i), before[i] - 15.0);
        }

        assert!(layout.set_expansion('b', true, &mut || redraws += 1));
        for i in 0..=10 {
            assert_eq!(layout.offset_for_item(i), before[i]);
        }
        assert_eq!(redraws, 2);
    }

    #[test]
    fn redundant_and_stale_notifications_are_ignored() {
        let mut layout = variable(abc());
        let mut redraws = 0;
        assert!(!layout.set_expansion('a', true, &mut || redraws += 1));
        assert!(!layout.set_expansion('z', false, &mut || redraws += 1));
        assert!(layout.set_expansion('c', false, &mut || redraws += 1));
        assert!(!layout.set_expansion('c', false, &mut || redraws += 1));
        assert_eq!(redraws, 1);
    }

    #[test]
    fn default_delegate_contracts_to_fallback_height() {
        let mut layout = variable(abc());
        layout.set_group_height(4.0);
        let mut sink = || {};
        layout.set_expansion('a', false, &mut sink);
        assert_eq!(layout.height_for_group(0), 4.0);
        assert_eq!(layout.cumulative_offset_before_group(1), 4.0);
        assert_eq!(layout.cumulative_offset_before_group(3), 29.0);
    }

    #[test]
    fn content_change_discards_caches() {
        let mut layout = variable(abc());
        let mut sink = || {};
        layout.set_expansion('a', false, &mut sink);
        assert_eq!(layout.cumulative_offset_before_group(3), 25.0);

        layout.set_content(vec![GroupSpan::new('x', 0, 1).with_height(7.0)]);
        assert!(layout.is_expanded(0));
        assert_eq!(layout.cumulative_offset_before_group(1), 7.0);
        assert_eq!(layout.total_extent(), 17.0);
    }

    #[test]
    fn memoized_heights_survive_until_invalidated() {
        let mut calls = Vec::new();
        {
            let delegate = |_: &Vec<GroupSpan<char>>, q: GroupQuery| {
                calls.push(q.index);
                Some(1.0)
            };
            let mut layout = GroupedListLayout::with_delegate(abc(), delegate);
            layout.offset_for_item(9);
            layout.offset_for_item(9);
            layout.group_height_did_change(1);
            layout.offset_for_item(9);
        }
        assert_eq!(calls, [0, 1, 2, 1]);
    }

    #[test]
    fn out_of_range_groups_add_nothing() {
        // Indexing delegates would panic on groups that do not exist.
        let delegate = |groups: &Vec<GroupSpan<char>>, q: GroupQuery| groups[q.index].height;
        let mut layout = GroupedListLayout::with_delegate(abc(), delegate);
        assert_eq!(layout.cumulative_offset_before_group(4), 45.0);
        assert_eq!(layout.cumulative_offset_before_group(usize::MAX), 45.0);
        assert_eq!(layout.height_for_group(3), 0.0);
        assert_eq!(layout.height_for_group(usize::MAX), 0.0);
        layout.group_height_did_change(usize::MAX);

        let mut fallback = variable(abc());
        fallback.set_group_height(32.0);
        assert_eq!(fallback.cumulative_offset_before_group(3), 45.0);
        assert_eq!(fallback.cumulative_offset_before_group(5), 45.0);

        let mut uniform = GroupedListLayout::new(abc());
        uniform.set_group_height(8.0);
        assert_eq!(uniform.cumulative_offset_before_group(usize::MAX), 24.0);
    }

    #[test]
    fn uniform_heights_never_consult_the_delegate() {
        let mut calls = 0;
        {
            let delegate = |_: &Vec<GroupSpan<char>>, _: GroupQuery| {
                calls += 1;
                Some(1.0)
            };
            let mut layout = GroupedListLayout::with_delegate(abc(), delegate);
            layout.set_uniform_group_heights(true);
            layout.set_group_height(8.0);
            assert_eq!(layout.height_for_group(1), 8.0);
            assert_eq!(layout.cumulative_offset_before_group(3), 24.0);
            assert_eq!(layout.offset_for_item(9), 32.0 * 9.0 + 24.0);
            assert_eq!(layout.total_extent(), 32.0 * 10.0 + 24.0);
        }
        assert_eq!(calls, 0);
    }

    #[test]
    fn group_ranges_and_frames() {
        let mut layout = variable(abc());
        assert_eq!(layout.group_range_for_item(6), Some(5..8));
        assert_eq!(layout.group_range_for_item(10), None);

        assert_eq!(layout.header_frame(1, 100.0), Rect::new(0.0, 70.0, 100.0, 85.0));
        assert_eq!(layout.item_frame(5, 100.0), Rect::new(0.0, 85.0, 100.0, 95.0));
    }
}
