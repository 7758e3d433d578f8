// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-element and per-group tables, and the two-pass offset accumulator.
//!
//! Both tables are owned by one coordinator and rebuilt on every full refresh.
//! Offsets follow a running prefix sum per group and edge: the leading edges
//! (`top`, `left`) accumulate in document order, the trailing edges
//! (`bottom`, `right`) in reverse document order.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;
use kurbo::Size;
use smallvec::SmallVec;

use crate::types::{Edge, EdgeOffsets, Edges, LayoutInstruction, PinState};

/// One tracked sticky element.
#[derive(Debug)]
pub struct StickyElement<E, H> {
    /// The element.
    pub element: E,
    /// Key of its [`ContainingBlock`] in the [`GroupTable`].
    pub container: E,
    /// Edges it sticks to; never empty.
    pub sticks_to: Edges,
    /// Accumulated inset per edge.
    ///
    /// Every edge is filled with the group's running total at this element's
    /// position, including edges it does not stick to; only sticking edges
    /// are written out and add to the total.
    pub offset: EdgeOffsets,
    /// Currently assigned z-index.
    pub z_index: i32,
    /// Last state reported by its boundary observer.
    pub pin_state: PinState,
    pub(crate) intersection: Option<H>,
}

impl<E: Copy, H> StickyElement<E, H> {
    /// A new record with zero offsets and no observer.
    pub fn new(element: E, container: E, sticks_to: Edges, z_index: i32) -> Self {
        debug_assert!(!sticks_to.is_empty(), "sticky elements stick to an edge");
        Self {
            element,
            container,
            sticks_to,
            offset: EdgeOffsets::ZERO,
            z_index,
            pin_state: PinState::Unpinned,
            intersection: None,
        }
    }

    /// Whether an intersection observer is attached.
    pub const fn is_observed(&self) -> bool {
        self.intersection.is_some()
    }

    /// The inset part of this element's style, for sticking edges only.
    pub fn inset_instruction(&self) -> LayoutInstruction<E> {
        LayoutInstruction::new(self.element).with_insets(self.sticks_to, &self.offset)
    }
}

/// One group of sticky elements sharing a containing block.
#[derive(Clone, Debug)]
pub struct ContainingBlock<E> {
    /// The positioning context.
    pub element: E,
    /// Running sum of same-edge extents processed so far in the current pass.
    /// After a pass, this is the total extent reserved on each edge.
    pub total_offset: EdgeOffsets,
    /// Origin of the z-index tiers for this group's elements.
    pub assigned_base_z_index: i32,
    members: SmallVec<[usize; 8]>,
}

impl<E> ContainingBlock<E> {
    /// A new group with zero totals.
    pub fn new(element: E, assigned_base_z_index: i32) -> Self {
        Self {
            element,
            total_offset: EdgeOffsets::ZERO,
            assigned_base_z_index,
            members: SmallVec::new(),
        }
    }

    /// Positions of this group's elements in the [`StickyTable`], in document order.
    pub fn members(&self) -> &[usize] {
        &self.members
    }
}

/// Tracked sticky elements in document order, indexed by element.
#[derive(Debug)]
pub struct StickyTable<E, H> {
    order: Vec<StickyElement<E, H>>,
    index: HashMap<E, usize>,
}

impl<E, H> Default for StickyTable<E, H> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<E: Copy + Eq + Hash, H> StickyTable<E, H> {
    /// Append a record. Records must be pushed in document order.
    ///
    /// Returns its position, or `None` if the element is already tracked.
    pub fn push(&mut self, record: StickyElement<E, H>) -> Option<usize> {
        if self.index.contains_key(&record.element) {
            return None;
        }
        let pos = self.order.len();
        self.index.insert(record.element, pos);
        self.order.push(record);
        Some(pos)
    }

    /// Look up a record.
    pub fn get(&self, element: E) -> Option<&StickyElement<E, H>> {
        self.index.get(&element).map(|&i| &self.order[i])
    }

    /// Look up a record mutably.
    pub fn get_mut(&mut self, element: E) -> Option<&mut StickyElement<E, H>> {
        self.index.get(&element).map(|&i| &mut self.order[i])
    }

    /// Whether `element` is tracked.
    pub fn contains(&self, element: E) -> bool {
        self.index.contains_key(&element)
    }

    /// Records in document order.
    pub fn iter(
        &self,
    ) -> impl ExactSizeIterator<Item = &StickyElement<E, H>> + DoubleEndedIterator {
        self.order.iter()
    }

    /// Records in document order, mutably.
    pub fn iter_mut(
        &mut self,
    ) -> impl ExactSizeIterator<Item = &mut StickyElement<E, H>> + DoubleEndedIterator {
        self.order.iter_mut()
    }

    /// Number of tracked elements.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Remove every record, yielding the observer handles that were still attached.
    pub fn drain_handles(&mut self) -> impl Iterator<Item = H> + '_ {
        self.index.clear();
        self.order.drain(..).filter_map(|r| r.intersection)
    }

    /// Whether the tracked set equals `current` exactly (same elements, same
    /// edges, same order).
    pub fn matches(&self, current: &[(E, Edges)]) -> bool {
        self.order.len() == current.len()
            && self
                .order
                .iter()
                .zip(current)
                .all(|(r, (e, edges))| r.element == *e && r.sticks_to == *edges)
    }
}

/// Containing blocks keyed by element.
#[derive(Clone, Debug)]
pub struct GroupTable<E> {
    groups: HashMap<E, ContainingBlock<E>>,
}

impl<E> Default for GroupTable<E> {
    fn default() -> Self {
        Self {
            groups: HashMap::new(),
        }
    }
}

impl<E: Copy + Eq + Hash> GroupTable<E> {
    /// Register `element` as a group, returning `true` if it was new.
    pub fn ensure(&mut self, element: E, base_z_index: i32) -> bool {
        if self.groups.contains_key(&element) {
            return false;
        }
        self.groups
            .insert(element, ContainingBlock::new(element, base_z_index));
        true
    }

    /// Look up a group.
    pub fn get(&self, element: E) -> Option<&ContainingBlock<E>> {
        self.groups.get(&element)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if there are no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Remove every group.
    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// Zero every group's running totals.
    pub fn reset_totals(&mut self) {
        for group in self.groups.values_mut() {
            group.total_offset = EdgeOffsets::ZERO;
        }
    }

    /// Rebuild every group's member list from `elements`.
    pub fn link_members<H>(&mut self, elements: &StickyTable<E, H>) {
        for group in self.groups.values_mut() {
            group.members.clear();
        }
        for (pos, record) in elements.iter().enumerate() {
            if let Some(group) = self.groups.get_mut(&record.container) {
                group.members.push(pos);
            }
        }
    }
}

/// Run both accumulation passes.
///
/// `measure` returns an element's border-box size, or `None` if it cannot be
/// measured (treated as zero extent). Every element is measured once before
/// any offset is written, so no pass observes another pass's output.
pub fn accumulate<E, H>(
    elements: &mut StickyTable<E, H>,
    groups: &mut GroupTable<E>,
    mut measure: impl FnMut(E) -> Option<Size>,
) where
    E: Copy + Eq + Hash + core::fmt::Debug,
{
    let sizes: Vec<Size> = elements
        .iter()
        .map(|r| measure(r.element).unwrap_or(Size::ZERO))
        .collect();

    groups.reset_totals();

    for (record, size) in elements.iter_mut().zip(&sizes) {
        step(record, *size, groups, [Edge::Top, Edge::Left]);
    }
    for (record, size) in elements.iter_mut().zip(&sizes).rev() {
        step(record, *size, groups, [Edge::Bottom, Edge::Right]);
    }

    tracing::trace!(
        elements = elements.len(),
        groups = groups.len(),
        "accumulated sticky offsets"
    );
}

fn step<E, H>(
    record: &mut StickyElement<E, H>,
    size: Size,
    groups: &mut GroupTable<E>,
    edges: [Edge; 2],
) where
    E: Copy + Eq + Hash + core::fmt::Debug,
{
    let Some(group) = groups.groups.get_mut(&record.container) else {
        tracing::trace!(element = ?record.element, "no containing block record");
        return;
    };
    for edge in edges {
        let running = group.total_offset.get_mut(edge);
        *record.offset.get_mut(edge) = *running;
        if record.sticks_to.sticks_to(edge) {
            *running += if edge.is_vertical() {
                size.height
            } else {
                size.width
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn table(specs: &[(u32, u32, Edges)]) -> (StickyTable<u32, ()>, GroupTable<u32>) {
        let mut elements = StickyTable::default();
        let mut groups = GroupTable::default();
        for &(el, container, edges) in specs {
            groups.ensure(container, 1000);
            elements.push(StickyElement::new(el, container, edges, 0));
        }
        groups.link_members(&elements);
        (elements, groups)
    }

    fn heights(map: &[(u32, f64)]) -> impl FnMut(u32) -> Option<Size> + '_ {
        move |el| {
            map.iter()
                .find(|(e, _)| *e == el)
                .map(|(_, h)| Size::new(h * 2.0, *h))
        }
    }

    #[test]
    fn top_and_bottom_stack_in_opposite_orders() {
        let (mut elements, mut groups) = table(&[
            (1, 0, Edges::TOP),
            (2, 0, Edges::TOP),
            (3, 0, Edges::BOTTOM),
            (4, 0, Edges::BOTTOM),
        ]);
        let sizes = [(1, 40.0), (2, 30.0), (3, 25.0), (4, 20.0)];
        accumulate(&mut elements, &mut groups, heights(&sizes));

        assert_eq!(elements.get(1).unwrap().offset.top, 0.0);
        assert_eq!(elements.get(2).unwrap().offset.top, 40.0);
        assert_eq!(elements.get(4).unwrap().offset.bottom, 0.0);
        assert_eq!(elements.get(3).unwrap().offset.bottom, 20.0);

        let group = groups.get(0).unwrap();
        assert_eq!(group.total_offset.top, 70.0);
        assert_eq!(group.total_offset.bottom, 45.0);
        assert_eq!(group.members(), &[0, 1, 2, 3]);
    }

    #[test]
    fn non_sticking_edges_see_running_total_without_adding() {
        let (mut elements, mut groups) = table(&[
            (1, 0, Edges::TOP),
            (2, 0, Edges::BOTTOM),
            (3, 0, Edges::TOP),
        ]);
        accumulate(
            &mut elements,
            &mut groups,
            heights(&[(1, 10.0), (2, 15.0), (3, 12.0)]),
        );
        // Element 1 is above the bottom-sticky element, so its reserved bottom zone is 15.
        assert_eq!(elements.get(1).unwrap().offset.bottom, 15.0);
        assert_eq!(elements.get(3).unwrap().offset.bottom, 0.0);
        assert_eq!(elements.get(3).unwrap().offset.top, 10.0);
        assert_eq!(groups.get(0).unwrap().total_offset.top, 22.0);
    }

    #[test]
    fn groups_accumulate_independently() {
        let (mut elements, mut groups) = table(&[
            (1, 100, Edges::TOP),
            (2, 200, Edges::TOP),
            (3, 100, Edges::TOP),
        ]);
        accumulate(
            &mut elements,
            &mut groups,
            heights(&[(1, 10.0), (2, 50.0), (3, 5.0)]),
        );
        assert_eq!(elements.get(2).unwrap().offset.top, 0.0);
        assert_eq!(elements.get(3).unwrap().offset.top, 10.0);
        assert_eq!(groups.get(100).unwrap().members(), &[0, 2]);
    }

    #[test]
    fn horizontal_edges_use_width() {
        let (mut elements, mut groups) = table(&[
            (1, 0, Edges::LEFT),
            (2, 0, Edges::LEFT | Edges::RIGHT),
            (3, 0, Edges::RIGHT),
        ]);
        // Width is twice the height in `heights`.
        accumulate(
            &mut elements,
            &mut groups,
            heights(&[(1, 10.0), (2, 20.0), (3, 30.0)]),
        );
        assert_eq!(elements.get(2).unwrap().offset.left, 20.0);
        assert_eq!(elements.get(2).unwrap().offset.right, 60.0);
        assert_eq!(elements.get(1).unwrap().offset.right, 100.0);
        assert_eq!(elements.get(3).unwrap().offset.right, 0.0);
    }

    #[test]
    fn accumulation_is_idempotent() {
        let (mut elements, mut groups) = table(&[(1, 0, Edges::TOP), (2, 0, Edges::TOP)]);
        let sizes = [(1, 40.0), (2, 30.0)];
        accumulate(&mut elements, &mut groups, heights(&sizes));
        let first: Vec<EdgeOffsets> = elements.iter().map(|r| r.offset).collect();
        accumulate(&mut elements, &mut groups, heights(&sizes));
        let second: Vec<EdgeOffsets> = elements.iter().map(|r| r.offset).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn bottom_extent_never_moves_top_offsets() {
        let (mut elements, mut groups) = table(&[
            (1, 0, Edges::TOP),
            (2, 0, Edges::BOTTOM),
            (3, 0, Edges::TOP | Edges::LEFT),
        ]);
        accumulate(
            &mut elements,
            &mut groups,
            heights(&[(1, 10.0), (2, 15.0), (3, 12.0)]),
        );
        let before: Vec<(f64, f64)> = elements
            .iter()
            .map(|r| (r.offset.top, r.offset.left))
            .collect();
        accumulate(
            &mut elements,
            &mut groups,
            heights(&[(1, 10.0), (2, 90.0), (3, 12.0)]),
        );
        let after: Vec<(f64, f64)> = elements
            .iter()
            .map(|r| (r.offset.top, r.offset.left))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn unmeasurable_elements_count_as_zero() {
        let (mut elements, mut groups) = table(&[(1, 0, Edges::TOP), (2, 0, Edges::TOP)]);
        accumulate(&mut elements, &mut groups, |_| None);
        assert_eq!(elements.get(2).unwrap().offset.top, 0.0);
    }

    #[test]
    fn table_rejects_duplicates_and_drains_handles() {
        let mut elements: StickyTable<u32, u8> = StickyTable::default();
        let mut a = StickyElement::new(1, 0, Edges::TOP, 0);
        a.intersection = Some(7);
        assert_eq!(elements.push(a), Some(0));
        assert_eq!(elements.push(StickyElement::new(1, 0, Edges::TOP, 0)), None);
        elements.push(StickyElement::new(2, 0, Edges::BOTTOM, 0));
        assert!(elements.matches(&[(1, Edges::TOP), (2, Edges::BOTTOM)]));
        assert!(!elements.matches(&[(1, Edges::TOP)]));
        assert!(!elements.matches(&[(1, Edges::TOP), (2, Edges::TOP)]));

        let handles: Vec<u8> = elements.drain_handles().collect();
        assert_eq!(handles, vec![7]);
        assert!(elements.is_empty());
        assert!(!elements.contains(1));
    }
}
