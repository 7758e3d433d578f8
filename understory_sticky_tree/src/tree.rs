// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, updates, layout commit, and the
//! [`Document`] view used by the coordinator.

use alloc::string::String;
use alloc::{vec, vec::Vec};

use kurbo::{Insets, Point, Rect, Vec2};
use understory_sticky::{Document, Edges, LayoutInstruction, Position, StyleSnapshot};

use crate::types::{ElementData, ElementId, InlineStyle};

/// A retained element tree with one document root.
///
/// Geometry changes do **not** take effect immediately. World-space boxes,
/// including scroll offsets and sticky shifts, are recomputed by
/// [`Tree::commit`], and [`Document::border_box`] answers with the boxes of the
/// last commit.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Rect, Vec2};
/// use understory_sticky::StyleSnapshot;
/// use understory_sticky_tree::{ElementData, Tree};
///
/// let mut tree = Tree::new();
/// tree.set_local_bounds(tree.root(), Rect::new(0.0, 0.0, 800.0, 600.0));
/// let scroller = tree.insert(
///     Some(tree.root()),
///     ElementData::new(Rect::new(0.0, 100.0, 300.0, 400.0))
///         .with_style(StyleSnapshot::scroll_container()),
/// );
/// let item = tree.insert(Some(scroller), ElementData::new(Rect::new(0.0, 50.0, 300.0, 80.0)));
///
/// tree.set_scroll_offset(scroller, Vec2::new(0.0, 20.0));
/// tree.commit();
/// assert_eq!(tree.world_bounds(item), Some(Rect::new(0.0, 130.0, 300.0, 160.0)));
/// ```
pub struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: ElementId,
    stylesheets: Vec<String>,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Tree")
            .field("nodes_total", &self.nodes.len())
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("root", &self.root)
            .field("stylesheets", &self.stylesheets.len())
            .finish_non_exhaustive()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    data: ElementData,
    inline: InlineStyle,
    scroll: Vec2,
    world: Option<Rect>,
}

impl Node {
    fn new(generation: u32, data: ElementData) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            data,
            inline: InlineStyle::default(),
            scroll: Vec2::ZERO,
            world: None,
        }
    }
}

/// Placement context handed from a parent to its children during commit.
#[derive(Copy, Clone, Debug)]
struct Frame {
    /// World position of the parent's border-box origin, minus its scroll offset.
    origin: Point,
    /// Padding box of the nearest scrolling ancestor.
    scrollport: Rect,
    /// Content box of the parent; sticky shifts never leave it.
    bound: Rect,
}

impl Tree {
    /// Create a tree holding only an empty root element.
    pub fn new() -> Self {
        Self::with_root(ElementData::default())
    }

    /// Create a tree whose root element carries `data`.
    pub fn with_root(data: ElementData) -> Self {
        Self {
            nodes: vec![Some(Node::new(1, data))],
            generations: vec![1],
            free_list: Vec::new(),
            root: ElementId::new(0, 1),
            stylesheets: Vec::new(),
        }
    }

    /// Insert a new element as the last child of `parent`.
    ///
    /// With `None` (or a stale parent) the element starts detached: it has no
    /// world box and is not part of the document until reparented.
    pub fn insert(&mut self, parent: Option<ElementId>, data: ElementData) -> ElementId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, data));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, data)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ElementId uses 32-bit indices by design."
        )]
        let id = ElementId::new(idx as u32, generation);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove an element and its subtree. The root cannot be removed.
    pub fn remove(&mut self, id: ElementId) {
        if !self.is_alive(id) || id == self.root {
            return;
        }
        if let Some(parent) = self.parent_of(id) {
            self.unlink_parent(id, parent);
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes[current.idx()].take() {
                stack.extend(node.children);
                self.free_list.push(current.idx());
            }
        }
    }

    /// Move `id` to the end of `new_parent`'s children, or detach it with `None`.
    ///
    /// Moving the root, or moving an element below itself, is ignored.
    pub fn reparent(&mut self, id: ElementId, new_parent: Option<ElementId>) {
        if !self.is_alive(id) || id == self.root {
            return;
        }
        if let Some(p) = new_parent
            && (!self.is_alive(p) || self.is_ancestor_or_self(id, p))
        {
            return;
        }
        if let Some(parent) = self.parent_of(id) {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent {
            self.link_parent(id, p);
        }
    }

    /// The document root.
    pub const fn root(&self) -> ElementId {
        self.root
    }

    /// Returns true if `id` refers to a live element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Returns the parent of an element, or `None` for the root, detached
    /// elements, and stale ids.
    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.node_opt(id)?.parent
    }

    /// Children of an element, or an empty slice if it is stale.
    pub fn children_of(&self, id: ElementId) -> &[ElementId] {
        match self.node_opt(id) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    /// `id` and its descendants in document (depth-first pre-) order.
    pub fn descendants(&self, id: ElementId) -> Descendants<'_> {
        let stack = if self.is_alive(id) { vec![id] } else { Vec::new() };
        Descendants { tree: self, stack }
    }

    /// Class list of an element.
    pub fn classes(&self, id: ElementId) -> &[String] {
        match self.node_opt(id) {
            Some(n) => &n.data.classes,
            None => &[],
        }
    }

    /// Add a class if not already present.
    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(n) = self.node_opt_mut(id)
            && !n.data.classes.iter().any(|c| c == class)
        {
            n.data.classes.push(String::from(class));
        }
    }

    /// Remove a class.
    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(n) = self.node_opt_mut(id) {
            n.data.classes.retain(|c| c != class);
        }
    }

    /// Value of attribute `name`.
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.node_opt(id)?
            .data
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set attribute `name`, replacing any previous value.
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: impl Into<String>) {
        let Some(n) = self.node_opt_mut(id) else {
            return;
        };
        let value = value.into();
        if let Some(slot) = n.data.attributes.iter_mut().find(|(k, _)| k == name) {
            slot.1 = value;
        } else {
            n.data.attributes.push((String::from(name), value));
        }
    }

    /// Authored style of an element, without inline overrides.
    pub fn style(&self, id: ElementId) -> Option<&StyleSnapshot> {
        self.node_opt(id).map(|n| &n.data.style)
    }

    /// Replace the authored style.
    pub fn set_style(&mut self, id: ElementId, style: StyleSnapshot) {
        if let Some(n) = self.node_opt_mut(id) {
            n.data.style = style;
        }
    }

    /// Update the border box relative to the parent.
    pub fn set_local_bounds(&mut self, id: ElementId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.data.local_bounds = bounds;
        }
    }

    /// Update border widths.
    pub fn set_border(&mut self, id: ElementId, border: Insets) {
        if let Some(n) = self.node_opt_mut(id) {
            n.data.border = border;
        }
    }

    /// Update padding widths.
    pub fn set_padding(&mut self, id: ElementId, padding: Insets) {
        if let Some(n) = self.node_opt_mut(id) {
            n.data.padding = padding;
        }
    }

    /// Scroll position of an element's content.
    pub fn scroll_offset(&self, id: ElementId) -> Option<Vec2> {
        self.node_opt(id).map(|n| n.scroll)
    }

    /// Scroll an element's content. Children move up and left by `offset`.
    pub fn set_scroll_offset(&mut self, id: ElementId, offset: Vec2) {
        if let Some(n) = self.node_opt_mut(id) {
            n.scroll = offset;
        }
    }

    /// Values written through [`Document::apply`].
    pub fn inline_style(&self, id: ElementId) -> Option<InlineStyle> {
        self.node_opt(id).map(|n| n.inline)
    }

    /// World-space border box as of the last [`Tree::commit`].
    ///
    /// Returns `None` for stale ids and for elements that were detached at
    /// that commit.
    pub fn world_bounds(&self, id: ElementId) -> Option<Rect> {
        self.node_opt(id)?.world
    }

    /// Register a stylesheet. Identical text is only kept once.
    pub fn inject_stylesheet(&mut self, rules: impl IntoIterator<Item = String>) {
        for rule in rules {
            if !self.stylesheets.contains(&rule) {
                self.stylesheets.push(rule);
            }
        }
    }

    /// Registered stylesheet rules, in registration order.
    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }

    /// Recompute world boxes for everything reachable from the root.
    ///
    /// Children are placed relative to their parent's world box minus its
    /// scroll offset. Elements with `position: sticky` and an inline inset are
    /// then shifted to stay that far inside the nearest scrolling ancestor's
    /// padding box, without leaving their parent's content box.
    ///
    /// Returns how many elements changed world box.
    pub fn commit(&mut self) -> usize {
        let mut world: Vec<Option<Rect>> = vec![None; self.nodes.len()];
        let root_box = self
            .node_opt(self.root)
            .map_or(Rect::ZERO, |n| n.data.local_bounds);
        let mut stack = vec![(
            self.root,
            Frame {
                origin: Point::ORIGIN,
                scrollport: root_box,
                bound: root_box,
            },
        )];

        while let Some((id, frame)) = stack.pop() {
            let Some(node) = self.node_opt(id) else {
                continue;
            };
            let flow = node.data.local_bounds + frame.origin.to_vec2();
            let placed = if id != self.root && node.data.style.position == Position::Sticky {
                flow + sticky_shift(flow, &node.inline, frame.scrollport, frame.bound)
            } else {
                flow
            };
            world[id.idx()] = Some(placed);

            let padding_box = shrink(placed, node.data.border);
            let child_frame = Frame {
                origin: placed.origin() - node.scroll,
                scrollport: if id == self.root || node.data.style.clips_for(Edges::empty()) {
                    padding_box
                } else {
                    frame.scrollport
                },
                bound: shrink(padding_box, node.data.padding),
            };
            for &child in node.children.iter().rev() {
                stack.push((child, child_frame));
            }
        }

        let mut moved = 0;
        for (slot, next) in self.nodes.iter_mut().zip(world) {
            if let Some(node) = slot
                && node.world != next
            {
                node.world = next;
                moved += 1;
            }
        }
        moved
    }

    // --- internals ---

    fn node_opt(&self, id: ElementId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        (n.generation == id.1).then_some(n)
    }

    fn is_ancestor_or_self(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent_of(c);
        }
        false
    }

    fn link_parent(&mut self, id: ElementId, parent: ElementId) {
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.push(id);
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.parent = Some(parent);
        }
    }

    fn unlink_parent(&mut self, id: ElementId, parent: ElementId) {
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.parent = None;
        }
    }
}

/// Depth-first iterator returned by [`Tree::descendants`].
#[derive(Clone, Debug)]
pub struct Descendants<'a> {
    tree: &'a Tree,
    stack: Vec<ElementId>,
}

impl Iterator for Descendants<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children_of(id).iter().rev().copied());
        Some(id)
    }
}

fn shrink(rect: Rect, by: Insets) -> Rect {
    let x0 = rect.x0 + by.x0;
    let y0 = rect.y0 + by.y0;
    Rect::new(x0, y0, (rect.x1 - by.x1).max(x0), (rect.y1 - by.y1).max(y0))
}

fn sticky_shift(flow: Rect, inline: &InlineStyle, scrollport: Rect, bound: Rect) -> Vec2 {
    Vec2::new(
        axis_shift(
            (flow.x0, flow.x1),
            (inline.left, inline.right),
            (scrollport.x0, scrollport.x1),
            (bound.x0, bound.x1),
        ),
        axis_shift(
            (flow.y0, flow.y1),
            (inline.top, inline.bottom),
            (scrollport.y0, scrollport.y1),
            (bound.y0, bound.y1),
        ),
    )
}

/// Shift along one axis. The leading inset wins when both apply.
fn axis_shift(
    (start, end): (f64, f64),
    (leading, trailing): (Option<f64>, Option<f64>),
    (port_start, port_end): (f64, f64),
    (bound_start, bound_end): (f64, f64),
) -> f64 {
    let mut shift = 0.0;
    if let Some(inset) = trailing {
        let limit = port_end - inset;
        if end > limit {
            shift = -(end - limit).min((start - bound_start).max(0.0));
        }
    }
    if let Some(inset) = leading {
        let limit = port_start + inset;
        if start + shift < limit {
            shift = (limit - start).min((bound_end - end).max(0.0));
        }
    }
    shift
}

impl Document for Tree {
    type Element = ElementId;

    fn root(&self) -> ElementId {
        self.root
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.parent_of(element)
    }

    fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.descendants(self.root)
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.classes(element).iter().any(|c| c == class)
    }

    fn computed_style(&self, element: ElementId) -> StyleSnapshot {
        self.node_opt(element)
            .map(|n| StyleSnapshot {
                z_index: n.inline.z_index.or(n.data.style.z_index),
                ..n.data.style
            })
            .unwrap_or_default()
    }

    fn border_box(&self, element: ElementId) -> Option<Rect> {
        self.world_bounds(element)
    }

    fn border_widths(&self, element: ElementId) -> Insets {
        self.node_opt(element).map_or(Insets::ZERO, |n| n.data.border)
    }

    fn padding_widths(&self, element: ElementId) -> Insets {
        self.node_opt(element).map_or(Insets::ZERO, |n| n.data.padding)
    }

    fn apply(&mut self, instruction: &LayoutInstruction<ElementId>) {
        if let Some(n) = self.node_opt_mut(instruction.element) {
            n.inline.merge(instruction);
        }
    }
}
