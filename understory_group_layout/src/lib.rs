// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Group Layout: offsets for grouped, collapsible lists.
//!
//! This crate positions items of a flat sequence that is partitioned into
//! contiguous groups, where every group contributes a header (and optionally
//! a body) height on top of the ungrouped row positions.
//!
//! The core concepts are:
//!
//! - [`GroupedContent`]: the host's view of its groups (item ranges, handles,
//!   and optional stored heights). [`GroupSpan`] slices and vectors implement it.
//! - [`FlatLayout`]: ungrouped row positions; [`FixedRowLayout`] is the
//!   uniform-row implementation.
//! - [`HeightDelegate`]: supplies per-group heights when they are not uniform.
//!   Any `FnMut(&C, GroupQuery) -> Option<f64>` closure is a delegate.
//! - [`GroupedListLayout`]: owns the above plus the caches, and answers offset
//!   queries via [`GroupedListLayout::offset_for_item`].
//!
//! Group lookup ([`group_containing_item`]) is a linear scan over groups, which
//! is appropriate for tens of groups over thousands of items.
//!
//! ## Uniform group heights
//!
//! ```rust
//! use understory_group_layout::{GroupSpan, GroupedListLayout};
//!
//! let groups = vec![GroupSpan::new("fruit", 0, 3), GroupSpan::new("veg", 3, 2)];
//! let mut layout = GroupedListLayout::new(groups);
//! layout.set_group_height(24.0);
//! layout.flat_mut().set_row_height(20.0);
//!
//! // Item 3 is the first vegetable: three rows and two headers above it.
//! assert_eq!(layout.offset_for_item(3), 3.0 * 20.0 + 2.0 * 24.0);
//! ```
//!
//! ## Variable heights and collapsing
//!
//! ```rust
//! use understory_group_layout::{GroupQuery, GroupSpan, GroupedListLayout};
//!
//! let groups = vec![
//!     GroupSpan::new('a', 0, 5).with_height(20.0),
//!     GroupSpan::new('b', 5, 3).with_height(15.0),
//!     GroupSpan::new('c', 8, 2).with_height(10.0),
//! ];
//! let delegate = |groups: &Vec<GroupSpan<char>>, q: GroupQuery| {
//!     if q.expanded { groups[q.index].height } else { None }
//! };
//! let mut layout = GroupedListLayout::with_delegate(groups, delegate);
//! assert_eq!(layout.cumulative_offset_before_group(2), 35.0);
//!
//! let mut needs_redraw = false;
//! layout.set_expansion('b', false, &mut || needs_redraw = true);
//! assert!(needs_redraw);
//! assert_eq!(layout.cumulative_offset_before_group(2), 20.0);
//! ```
//!
//! Group heights are memoized until [`GroupedListLayout::group_height_did_change`],
//! [`GroupedListLayout::content_did_change`], or an expansion change invalidates
//! them. Hosts must call these when their data changes underneath the layout.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod content;
mod expansion;
mod flat;
mod height;
mod layout;
mod offsets;

pub use content::{GroupSlot, GroupSpan, GroupedContent, group_containing_item, index_of_group};
pub use expansion::{DisplaySink, ExpansionTracker};
pub use flat::{FixedRowLayout, FlatLayout};
pub use height::{DefaultGroupHeight, GroupQuery, HeightDelegate};
pub use layout::{GroupLayoutConfig, GroupedListLayout};
