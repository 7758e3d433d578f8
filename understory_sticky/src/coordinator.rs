// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The reactive scheduler: observer lifecycle and message processing.

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;
use core::hash::Hash;

use kurbo::Insets;

use crate::config::StickyConfig;
use crate::containing_block::{establish_stacking_context, resolve_containing_block};
use crate::host::{Document, IntersectionEntry, IntersectionOptions, Observers};
use crate::registry::{ContainingBlock, GroupTable, StickyElement, StickyTable, accumulate};
use crate::types::{Edge, EdgeOffsets, Edges, LayoutInstruction, PinState, ZTiers};
use crate::z_index::{decide_tier, initial_tier, measure, pin_state};

/// Visibility ratio at which boundary observers report.
pub const FULL_THRESHOLD: f64 = 1.0;

/// Extra shrink applied past each sticky offset, so an element held exactly
/// at its inset reads below [`FULL_THRESHOLD`] and one in flow reads at it.
pub const BOUNDARY_MARGIN: f64 = 1.0;

/// Work items for the coordinator.
///
/// Hosts forward observer callbacks as messages. Multiple messages may be
/// posted before a [`StickyCoordinator::flush`]; consecutive resizes are
/// coalesced and a pending refresh supersedes resizes queued alongside it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Message<E> {
    /// Rebuild everything from the document.
    Refresh,
    /// A tracked element's border box changed size.
    Resized(E),
    /// A boundary observer reported a visibility change.
    Intersection(IntersectionEntry<E>),
}

/// Owns the per-element and per-group tables for one document and keeps
/// offsets, z-indexes, and observers in sync with it.
///
/// `E` is the host's element handle and `H` its intersection-observer handle.
#[derive(Debug)]
pub struct StickyCoordinator<E, H> {
    config: StickyConfig,
    edge_classes: [String; 4],
    elements: StickyTable<E, H>,
    groups: GroupTable<E>,
    resize_attached: bool,
    queue: VecDeque<Message<E>>,
    busy: bool,
}

impl<E, H> StickyCoordinator<E, H>
where
    E: Copy + Eq + Hash + core::fmt::Debug,
    H: core::fmt::Debug,
{
    /// Create an idle coordinator. Nothing is tracked until the first refresh.
    pub fn new(config: StickyConfig) -> Self {
        let edge_classes = Edge::ALL.map(|e| config.edge_class(e));
        Self {
            config,
            edge_classes,
            elements: StickyTable::default(),
            groups: GroupTable::default(),
            resize_attached: false,
            queue: VecDeque::new(),
            busy: false,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &StickyConfig {
        &self.config
    }

    /// The z-index tiers in use.
    pub const fn tiers(&self) -> ZTiers {
        self.config.tiers()
    }

    /// Queue a message without processing it.
    pub fn post(&mut self, message: Message<E>) {
        self.queue.push_back(message);
    }

    /// Whether a flush is in progress.
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// Number of messages waiting for [`StickyCoordinator::flush`].
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Process queued messages in order until the queue is empty.
    ///
    /// A flush that finds another flush in progress returns immediately and
    /// leaves its messages to the running one.
    pub fn flush<D, O>(&mut self, doc: &mut D, observers: &mut O)
    where
        D: Document<Element = E>,
        O: Observers<E, Handle = H>,
    {
        if self.busy {
            return;
        }
        self.busy = true;
        while let Some(message) = self.queue.pop_front() {
            match message {
                Message::Refresh => {
                    self.queue.retain(|m| !matches!(m, Message::Resized(_)));
                    self.full_refresh(doc, observers);
                }
                Message::Resized(_) => {
                    if self.queue.iter().any(|m| matches!(m, Message::Refresh)) {
                        continue;
                    }
                    while matches!(self.queue.front(), Some(Message::Resized(_))) {
                        self.queue.pop_front();
                    }
                    self.update_offsets(doc, observers);
                }
                Message::Intersection(entry) => self.arbitrate(doc, entry),
            }
        }
        self.busy = false;
    }

    /// Rebuild all state from the document and reattach observers.
    pub fn refresh<D, O>(&mut self, doc: &mut D, observers: &mut O)
    where
        D: Document<Element = E>,
        O: Observers<E, Handle = H>,
    {
        self.post(Message::Refresh);
        self.flush(doc, observers);
    }

    /// Handle a batch of resize notifications.
    pub fn on_resize<D, O>(&mut self, doc: &mut D, observers: &mut O, targets: &[E])
    where
        D: Document<Element = E>,
        O: Observers<E, Handle = H>,
    {
        self.queue
            .extend(targets.iter().map(|t| Message::Resized(*t)));
        self.flush(doc, observers);
    }

    /// Handle a batch of boundary-intersection reports.
    pub fn on_intersection<D, O>(
        &mut self,
        doc: &mut D,
        observers: &mut O,
        entries: &[IntersectionEntry<E>],
    ) where
        D: Document<Element = E>,
        O: Observers<E, Handle = H>,
    {
        self.queue
            .extend(entries.iter().map(|e| Message::Intersection(*e)));
        self.flush(doc, observers);
    }

    /// Tracked records in document order.
    pub fn tracked(&self) -> impl DoubleEndedIterator<Item = &StickyElement<E, H>> {
        self.elements.iter()
    }

    /// Number of tracked elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Current offsets of a tracked element.
    pub fn offsets_of(&self, element: E) -> Option<EdgeOffsets> {
        self.elements.get(element).map(|r| r.offset)
    }

    /// Current z-index of a tracked element.
    pub fn z_index_of(&self, element: E) -> Option<i32> {
        self.elements.get(element).map(|r| r.z_index)
    }

    /// Last reported pin state of a tracked element.
    pub fn pin_state_of(&self, element: E) -> Option<PinState> {
        self.elements.get(element).map(|r| r.pin_state)
    }

    /// Resolved containing block of a tracked element.
    pub fn container_of(&self, element: E) -> Option<E> {
        self.elements.get(element).map(|r| r.container)
    }

    /// The group record for a containing block.
    pub fn group(&self, container: E) -> Option<&ContainingBlock<E>> {
        self.groups.get(container)
    }

    /// Total extent reserved on `edge` within the group of `container`.
    pub fn group_total(&self, container: E, edge: Edge) -> Option<f64> {
        self.groups.get(container).map(|g| g.total_offset.get(edge))
    }

    /// Disconnect every observer and forget all state, including queued messages.
    pub fn disconnect<O>(&mut self, observers: &mut O)
    where
        O: Observers<E, Handle = H>,
    {
        self.teardown(observers);
        self.queue.clear();
    }

    fn teardown<O>(&mut self, observers: &mut O)
    where
        O: Observers<E, Handle = H>,
    {
        if self.resize_attached {
            observers.disconnect_resize();
            self.resize_attached = false;
        }
        for handle in self.elements.drain_handles() {
            observers.disconnect_intersection(handle);
        }
        self.groups.clear();
    }

    fn sticky_edges<D: Document<Element = E>>(&self, doc: &D, element: E) -> Edges {
        Edge::ALL
            .into_iter()
            .zip(&self.edge_classes)
            .filter(|(_, class)| doc.has_class(element, class))
            .fold(Edges::empty(), |acc, (edge, _)| acc | edge.flag())
    }

    fn query<D: Document<Element = E>>(&self, doc: &D) -> Vec<(E, Edges)> {
        doc.elements()
            .filter_map(|el| {
                let edges = self.sticky_edges(doc, el);
                (!edges.is_empty()).then_some((el, edges))
            })
            .collect()
    }

    fn full_refresh<D, O>(&mut self, doc: &mut D, observers: &mut O)
    where
        D: Document<Element = E>,
        O: Observers<E, Handle = H>,
    {
        self.teardown(observers);

        let tiers = self.tiers();
        let base = self.config.base_z_index;
        for (element, edges) in self.query(doc) {
            let container = resolve_containing_block(doc, element, edges);
            if self.groups.ensure(container, base) && container != doc.root() {
                establish_stacking_context(doc, container);
            }
            let z = tiers.value(initial_tier(edges));
            self.elements
                .push(StickyElement::new(element, container, edges, z));
        }
        self.groups.link_members(&self.elements);

        accumulate(&mut self.elements, &mut self.groups, |el| {
            doc.border_box(el).map(|r| r.size())
        });

        for record in self.elements.iter() {
            doc.apply(&record.inset_instruction().with_z_index(record.z_index));
        }

        for record in self.elements.iter_mut() {
            record.intersection = Some(observers.observe_intersection(
                record.element,
                intersection_options(record.container, &record.offset),
            ));
            observers.observe_resize(record.element);
        }
        self.resize_attached = !self.elements.is_empty();

        tracing::debug!(
            elements = self.elements.len(),
            groups = self.groups.len(),
            "refreshed sticky elements"
        );
    }

    fn update_offsets<D, O>(&mut self, doc: &mut D, observers: &mut O)
    where
        D: Document<Element = E>,
        O: Observers<E, Handle = H>,
    {
        let current = self.query(doc);
        if !self.elements.matches(&current) {
            tracing::debug!(
                tracked = self.elements.len(),
                found = current.len(),
                "sticky set changed; refreshing"
            );
            self.full_refresh(doc, observers);
            return;
        }

        let before: Vec<EdgeOffsets> = self.elements.iter().map(|r| r.offset).collect();
        accumulate(&mut self.elements, &mut self.groups, |el| {
            doc.border_box(el).map(|r| r.size())
        });

        for (record, old) in self.elements.iter_mut().zip(before) {
            doc.apply(&record.inset_instruction());
            if record.offset.top == old.top && record.offset.bottom == old.bottom {
                continue;
            }
            if let Some(handle) = record.intersection.take() {
                observers.disconnect_intersection(handle);
            }
            record.intersection = Some(observers.observe_intersection(
                record.element,
                intersection_options(record.container, &record.offset),
            ));
        }
    }

    fn arbitrate<D: Document<Element = E>>(&mut self, doc: &mut D, entry: IntersectionEntry<E>) {
        let Some(record) = self.elements.get_mut(entry.target) else {
            tracing::trace!(element = ?entry.target, "intersection for untracked element");
            return;
        };
        let Some(group) = self.groups.get(record.container) else {
            return;
        };
        let Some(geometry) = measure(doc, record.element, record.container) else {
            tracing::trace!(element = ?entry.target, "no geometry; skipping z-index update");
            return;
        };
        record.pin_state = pin_state(record.sticks_to, &record.offset, &geometry);
        let tier = decide_tier(record.sticks_to, &record.offset, &geometry);
        let z = ZTiers::from_base(group.assigned_base_z_index).value(tier);
        tracing::trace!(
            element = ?entry.target,
            ratio = entry.ratio,
            ?tier,
            z,
            pin = ?record.pin_state,
            "arbitrated"
        );
        if z != record.z_index {
            record.z_index = z;
            doc.apply(&LayoutInstruction::new(record.element).with_z_index(z));
        }
    }
}

fn intersection_options<E>(root: E, offset: &EdgeOffsets) -> IntersectionOptions<E> {
    IntersectionOptions {
        root,
        threshold: FULL_THRESHOLD,
        root_inset: Insets::new(
            0.0,
            offset.top + BOUNDARY_MARGIN,
            0.0,
            offset.bottom + BOUNDARY_MARGIN,
        ),
    }
}
