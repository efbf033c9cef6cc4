// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element tree data model.
//!
//! The tree mirrors the host document's light DOM for the elements the
//! synchronization engine cares about. Each element has:
//!
//! - An identity ([`ElementId`]), a generational handle that becomes stale
//!   when the element is destroyed.
//! - Topology: parent, first-child, and sibling links forming an ordered tree.
//! - A `slot` attribute choosing which of the parent's slots it is projected
//!   into.
//! - A connected flag, true while the element's root is mounted.
//! - A payload (the component state) that the document can temporarily take
//!   out while it reconciles the element.
//!
//! # Dirty tracking
//!
//! Two channels are tracked per element (see [`dirty`](crate::dirty)):
//!
//! - **PROPERTIES**: the payload was handed out mutably and may carry
//!   pending property changes.
//! - **SLOTS**: the element's child list or a child's `slot` attribute
//!   changed, so its slot assignments must be recomputed.

mod id;
mod store;

pub use id::{ElementId, INVALID};
pub use store::{ElementTree, Lifecycle};

/// A slot an element projects its children into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotName {
    /// The unnamed slot; receives children without a `slot` attribute.
    Default,
    /// A named slot; receives children whose `slot` attribute matches.
    Named(&'static str),
}

impl SlotName {
    /// Returns whether a child with the given `slot` attribute is projected
    /// into this slot.
    #[must_use]
    pub fn accepts(self, slot_attr: Option<&str>) -> bool {
        match (self, slot_attr) {
            (Self::Default, None) => true,
            (Self::Named(name), Some(attr)) => name == attr,
            _ => false,
        }
    }
}

/// Iterator over the direct children of an element, in order.
#[derive(Debug)]
pub struct Children<'a, T> {
    tree: &'a ElementTree<T>,
    next: u32,
}

impl<'a, T> Children<'a, T> {
    pub(crate) fn new(tree: &'a ElementTree<T>, first: u32) -> Self {
        Self { tree, next: first }
    }
}

impl<T> Iterator for Children<'_, T> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        if self.next == INVALID {
            return None;
        }
        let idx = self.next;
        self.next = self.tree.next_sibling[idx as usize];
        Some(self.tree.id_at(idx))
    }
}
