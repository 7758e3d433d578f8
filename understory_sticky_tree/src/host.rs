// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A tree, its observers, and a coordinator wired together.

use kurbo::Vec2;
use understory_sticky::config::Z_INDEX_ATTRIBUTE;
use understory_sticky::{StickyConfig, StickyCoordinator};

use crate::observers::{ObserverHandle, ObserverSet};
use crate::tree::Tree;
use crate::types::ElementId;

/// Upper bound on commit/poll/flush rounds per [`StickyHost::settle`].
pub const MAX_SETTLE_ROUNDS: usize = 16;

/// Coordinator specialized to the tree host.
pub type TreeCoordinator = StickyCoordinator<ElementId, ObserverHandle>;

/// Owns a [`Tree`], an [`ObserverSet`], and the coordinator driving them.
///
/// The tree is public so callers can edit it directly; call
/// [`StickyHost::settle`] afterwards to let the coordinator react, or
/// [`StickyHost::refresh`] after structural edits.
#[derive(Debug)]
pub struct StickyHost {
    /// The document.
    pub tree: Tree,
    /// Observer subscriptions created by the coordinator.
    pub observers: ObserverSet,
    /// The coordinator.
    pub coordinator: TreeCoordinator,
}

impl StickyHost {
    /// Wrap `tree`, reading the base z-index from the root's
    /// `data-sticky-z-index` attribute and installing the base stylesheet.
    pub fn new(tree: Tree) -> Self {
        let config =
            StickyConfig::from_root_attribute(tree.attribute(tree.root(), Z_INDEX_ATTRIBUTE));
        Self::with_config(tree, config)
    }

    /// Wrap `tree` with an explicit configuration.
    pub fn with_config(mut tree: Tree, config: StickyConfig) -> Self {
        tree.inject_stylesheet(config.base_rules());
        Self {
            tree,
            observers: ObserverSet::new(),
            coordinator: StickyCoordinator::new(config),
        }
    }

    /// Rebuild coordinator state from the tree, then settle.
    ///
    /// Returns the number of rounds [`StickyHost::settle`] took.
    pub fn refresh(&mut self) -> usize {
        self.tree.commit();
        self.coordinator.refresh(&mut self.tree, &mut self.observers);
        self.settle()
    }

    /// Scroll `element`'s content to `offset`, then settle.
    pub fn scroll_to(&mut self, element: ElementId, offset: Vec2) -> usize {
        self.tree.set_scroll_offset(element, offset);
        self.settle()
    }

    /// Commit the tree and deliver observer reports until nothing changes.
    ///
    /// Resize reports are delivered before intersection reports within a
    /// round. Gives up after [`MAX_SETTLE_ROUNDS`].
    pub fn settle(&mut self) -> usize {
        for round in 0..MAX_SETTLE_ROUNDS {
            self.tree.commit();
            let notes = self.observers.poll(&self.tree);
            if notes.is_empty() {
                return round;
            }
            tracing::trace!(
                round,
                resized = notes.resized.len(),
                intersections = notes.intersections.len(),
                "delivering observer reports"
            );
            if !notes.resized.is_empty() {
                self.coordinator
                    .on_resize(&mut self.tree, &mut self.observers, &notes.resized);
            }
            if !notes.intersections.is_empty() {
                self.coordinator.on_intersection(
                    &mut self.tree,
                    &mut self.observers,
                    &notes.intersections,
                );
            }
        }
        tracing::debug!(rounds = MAX_SETTLE_ROUNDS, "observer reports did not settle");
        MAX_SETTLE_ROUNDS
    }
}
