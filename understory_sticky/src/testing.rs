// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal in-crate host doubles for unit tests.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::host::{Document, IntersectionOptions, Observers};
use crate::style::StyleSnapshot;
use crate::types::LayoutInstruction;

#[derive(Clone, Debug)]
pub(crate) struct MockNode {
    pub(crate) parent: Option<usize>,
    pub(crate) classes: Vec<String>,
    pub(crate) style: StyleSnapshot,
    pub(crate) rect: Option<Rect>,
    pub(crate) inline: LayoutInstruction<usize>,
}

/// Flat document: elements are indices, document order is insertion order.
#[derive(Clone, Debug)]
pub(crate) struct MockDocument {
    pub(crate) nodes: Vec<MockNode>,
    pub(crate) writes: usize,
}

impl MockDocument {
    pub(crate) fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            writes: 0,
        };
        doc.push(None, StyleSnapshot::default(), &[]);
        doc
    }

    pub(crate) fn push(
        &mut self,
        parent: Option<usize>,
        style: StyleSnapshot,
        classes: &[&str],
    ) -> usize {
        let id = self.nodes.len();
        self.nodes.push(MockNode {
            parent,
            classes: classes.iter().map(|c| String::from(*c)).collect(),
            style,
            rect: None,
            inline: LayoutInstruction::new(id),
        });
        id
    }

    pub(crate) fn set_rect(&mut self, id: usize, rect: Rect) {
        self.nodes[id].rect = Some(rect);
    }

    pub(crate) fn detach(&mut self, id: usize) {
        self.nodes[id].parent = None;
        self.nodes[id].rect = None;
    }

    pub(crate) fn set_classes(&mut self, id: usize, classes: &[&str]) {
        self.nodes[id].classes = classes.iter().map(|c| String::from(*c)).collect();
    }

    pub(crate) fn inline(&self, id: usize) -> &LayoutInstruction<usize> {
        &self.nodes[id].inline
    }

    fn attached(&self, id: usize) -> bool {
        let mut current = id;
        while let Some(p) = self.nodes[current].parent {
            current = p;
        }
        current == 0
    }
}

impl Document for MockDocument {
    type Element = usize;

    fn root(&self) -> usize {
        0
    }

    fn parent(&self, element: usize) -> Option<usize> {
        self.nodes.get(element)?.parent
    }

    fn elements(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.nodes.len()).filter(|id| self.attached(*id))
    }

    fn has_class(&self, element: usize, class: &str) -> bool {
        self.nodes[element].classes.iter().any(|c| c == class)
    }

    fn computed_style(&self, element: usize) -> StyleSnapshot {
        let node = &self.nodes[element];
        StyleSnapshot {
            z_index: node.inline.z_index.or(node.style.z_index),
            ..node.style
        }
    }

    fn border_box(&self, element: usize) -> Option<Rect> {
        self.nodes.get(element)?.rect
    }

    fn apply(&mut self, instruction: &LayoutInstruction<usize>) {
        self.writes += 1;
        let inline = &mut self.nodes[instruction.element].inline;
        inline.top = instruction.top.or(inline.top);
        inline.right = instruction.right.or(inline.right);
        inline.bottom = instruction.bottom.or(inline.bottom);
        inline.left = instruction.left.or(inline.left);
        inline.z_index = instruction.z_index.or(inline.z_index);
    }
}

/// Records observer calls; handles are sequence numbers.
#[derive(Clone, Debug, Default)]
pub(crate) struct MockObservers {
    next: u32,
    pub(crate) live: Vec<(u32, usize, IntersectionOptions<usize>)>,
    pub(crate) resized: Vec<usize>,
    pub(crate) resize_disconnects: usize,
}

impl MockObservers {
    pub(crate) fn live_for(&self, target: usize) -> Vec<&IntersectionOptions<usize>> {
        self.live
            .iter()
            .filter(|(_, t, _)| *t == target)
            .map(|(_, _, o)| o)
            .collect()
    }
}

impl Observers<usize> for MockObservers {
    type Handle = u32;

    fn observe_intersection(&mut self, target: usize, options: IntersectionOptions<usize>) -> u32 {
        self.next += 1;
        self.live.push((self.next, target, options));
        self.next
    }

    fn disconnect_intersection(&mut self, handle: u32) {
        let before = self.live.len();
        self.live.retain(|(h, _, _)| *h != handle);
        assert_eq!(before, self.live.len() + 1, "handle {handle} disconnected twice");
    }

    fn observe_resize(&mut self, target: usize) {
        self.resized.push(target);
    }

    fn disconnect_resize(&mut self) {
        self.resized.clear();
        self.resize_disconnects += 1;
    }
}
