// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays element storage with allocation, topology, slots and
//! connection tracking.

use alloc::string::String;
use alloc::vec::Vec;

use understory_dirty::{Channel, CycleHandling, DirtyTracker};

use super::id::{ElementId, INVALID};
use super::{Children, SlotName};
use crate::dirty;

/// A connection-state transition, queued in the order it happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// The element became part of a mounted tree.
    Connected(ElementId),
    /// The element left a mounted tree.
    Disconnected(ElementId),
}

/// Struct-of-arrays storage for all elements.
///
/// Elements are addressed by [`ElementId`] handles. Internally, each element
/// occupies a slot in parallel arrays. Destroyed elements are recycled via a
/// free list, and generation counters prevent stale handle access.
#[derive(Debug)]
pub struct ElementTree<T> {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Attributes and state --
    slot: Vec<Option<String>>,
    mounted: Vec<bool>,
    connected: Vec<bool>,
    payload: Vec<Option<T>>,

    // -- Last reported slot assignments, per host --
    assigned: Vec<Vec<(SlotName, Vec<ElementId>)>>,

    // -- Allocation --
    generation: Vec<u32>,
    free_list: Vec<u32>,
    len: u32,

    // -- Dirty tracking --
    dirty: DirtyTracker<u32>,

    // -- Lifecycle tracking --
    lifecycle: Vec<Lifecycle>,
}

impl<T> Default for ElementTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ElementTree<T> {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            slot: Vec::new(),
            mounted: Vec::new(),
            connected: Vec::new(),
            payload: Vec::new(),
            assigned: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            lifecycle: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Creates a detached, disconnected element and returns its handle.
    pub fn create(&mut self, payload: T) -> ElementId {
        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.generation[i] += 1;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.slot[i] = None;
            self.mounted[i] = false;
            self.connected[i] = false;
            self.assigned[i].clear();
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.slot.push(None);
            self.mounted.push(false);
            self.connected.push(false);
            self.payload.push(None);
            self.assigned.push(Vec::new());
            self.generation.push(0);
            idx
        };
        self.payload[idx as usize] = Some(payload);
        self.id_at(idx)
    }

    /// Destroys an element, freeing its slot for reuse, and returns its
    /// payload (`None` if the payload is currently taken).
    ///
    /// An attached element is removed from its parent first, which queues a
    /// [`Lifecycle::Disconnected`] if it was connected. That entry refers to a
    /// stale handle once this returns.
    ///
    /// # Panics
    ///
    /// Panics if the element has children (destroy them first) or if the
    /// handle is stale.
    pub fn destroy(&mut self, id: ElementId) -> Option<T> {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy element with children"
        );

        if self.parent[idx as usize] != INVALID {
            self.remove_from_parent(id);
        }
        if self.mounted[idx as usize] {
            self.unmount(id);
        }

        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;
        self.free_list.push(idx);
        self.slot[idx as usize] = None;
        self.assigned[idx as usize].clear();
        self.payload[idx as usize].take()
    }

    /// Returns whether the given handle refers to a live element.
    #[must_use]
    pub fn is_alive(&self, id: ElementId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    // -- Topology API --

    /// Adds `child` as the last child of `parent`.
    ///
    /// Marks `parent` for slot reassignment. If `parent` is connected, the
    /// child's subtree becomes connected.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, if `child` already has a parent, or
    /// if `child` is `parent` or one of its ancestors.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        assert!(!self.is_ancestor_or_self(c, p), "insertion would form a cycle");
        assert!(!self.mounted[c as usize], "cannot attach a mounted root");

        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }

        self.dirty.mark(p, dirty::SLOTS);
        if self.connected[p as usize] {
            self.set_subtree_connected(c, true);
        }
    }

    /// Inserts `child` before `sibling` in the sibling list.
    ///
    /// `child` must not already have a parent. `sibling` must have a parent.
    ///
    /// # Panics
    ///
    /// Panics if handles are stale, `child` already has a parent, `sibling`
    /// has no parent, or the insertion would form a cycle.
    pub fn insert_before(&mut self, child: ElementId, sibling: ElementId) {
        self.validate(child);
        self.validate(sibling);
        let c = child.idx;
        let s = sibling.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        let p = self.parent[s as usize];
        assert!(p != INVALID, "sibling has no parent");
        assert!(!self.is_ancestor_or_self(c, p), "insertion would form a cycle");
        assert!(!self.mounted[c as usize], "cannot attach a mounted root");

        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = s;
        self.prev_sibling[c as usize] = self.prev_sibling[s as usize];

        if self.prev_sibling[s as usize] != INVALID {
            self.next_sibling[self.prev_sibling[s as usize] as usize] = c;
        } else {
            // `sibling` was the first child.
            self.first_child[p as usize] = c;
        }
        self.prev_sibling[s as usize] = c;

        self.dirty.mark(p, dirty::SLOTS);
        if self.connected[p as usize] {
            self.set_subtree_connected(c, true);
        }
    }

    /// Removes `child` from its current parent.
    ///
    /// Marks the old parent for slot reassignment. If the child was
    /// connected, its subtree becomes disconnected.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the element has no parent.
    pub fn remove_from_parent(&mut self, child: ElementId) {
        self.validate(child);
        let c = child.idx;
        let p = self.parent[c as usize];
        assert!(p != INVALID, "element has no parent");

        self.unlink_from_parent(c);
        self.dirty.mark(p, dirty::SLOTS);
        if self.connected[c as usize] {
            self.set_subtree_connected(c, false);
        }
    }

    /// Removes `child` from its parent without reporting a slot change or a
    /// lifecycle transition.
    ///
    /// Used when a component relocates its own light-DOM children into an
    /// engine-owned container. The parent's last reported slot assignment is
    /// updated in place so the move does not resurface as a slot change.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the element has no parent.
    pub fn detach_quietly(&mut self, child: ElementId) {
        self.validate(child);
        let c = child.idx;
        let p = self.parent[c as usize];
        assert!(p != INVALID, "element has no parent");

        self.unlink_from_parent(c);
        for (_, members) in &mut self.assigned[p as usize] {
            members.retain(|&m| m != child);
        }

        let mut stack = Vec::from([c]);
        while let Some(idx) = stack.pop() {
            self.connected[idx as usize] = false;
            let mut next = self.first_child[idx as usize];
            while next != INVALID {
                stack.push(next);
                next = self.next_sibling[next as usize];
            }
        }
    }

    /// Returns the parent of an element, if any.
    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        (p != INVALID).then(|| self.id_at(p))
    }

    /// Returns an iterator over the direct children of an element.
    #[must_use]
    pub fn children(&self, id: ElementId) -> Children<'_, T> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns whether the element has any children.
    #[must_use]
    pub fn has_children(&self, id: ElementId) -> bool {
        self.validate(id);
        self.first_child[id.idx as usize] != INVALID
    }

    // -- Connection API --

    /// Attaches a root element to the document, connecting its subtree.
    ///
    /// Mounting an already-mounted root is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the element has a parent.
    pub fn mount(&mut self, root: ElementId) {
        self.validate(root);
        let r = root.idx;
        assert!(
            self.parent[r as usize] == INVALID,
            "only root elements can be mounted"
        );
        if !self.mounted[r as usize] {
            self.mounted[r as usize] = true;
            self.set_subtree_connected(r, true);
        }
    }

    /// Detaches a mounted root from the document, disconnecting its subtree.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn unmount(&mut self, root: ElementId) {
        self.validate(root);
        let r = root.idx;
        if self.mounted[r as usize] {
            self.mounted[r as usize] = false;
            self.set_subtree_connected(r, false);
        }
    }

    /// Returns whether the element is part of a mounted tree.
    #[must_use]
    pub fn is_connected(&self, id: ElementId) -> bool {
        self.validate(id);
        self.connected[id.idx as usize]
    }

    /// Moves every queued connection transition out, oldest first.
    pub fn take_lifecycle(&mut self) -> Vec<Lifecycle> {
        core::mem::take(&mut self.lifecycle)
    }

    // -- Slot API --

    /// Sets the element's `slot` attribute.
    ///
    /// Returns whether the value changed. A change marks the parent for slot
    /// reassignment.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_slot(&mut self, id: ElementId, slot: Option<String>) -> bool {
        self.validate(id);
        let i = id.idx as usize;
        if self.slot[i] == slot {
            return false;
        }
        self.slot[i] = slot;
        let p = self.parent[i];
        if p != INVALID {
            self.dirty.mark(p, dirty::SLOTS);
        }
        true
    }

    /// Returns the element's `slot` attribute.
    #[must_use]
    pub fn slot(&self, id: ElementId) -> Option<&str> {
        self.validate(id);
        self.slot[id.idx as usize].as_deref()
    }

    /// Computes the children currently projected into `slot` of `host`, in
    /// child order.
    #[must_use]
    pub fn assigned_now(&self, host: ElementId, slot: SlotName) -> Vec<ElementId> {
        self.children(host)
            .filter(|&child| slot.accepts(self.slot[child.idx as usize].as_deref()))
            .collect()
    }

    /// Recomputes the assignment of each of `slots` on `host` and returns the
    /// slots whose assignment differs from the last one reported.
    ///
    /// A slot that has never been reported counts as changed only when it is
    /// non-empty.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn refresh_slots(&mut self, host: ElementId, slots: &[SlotName]) -> Vec<SlotName> {
        let mut changed = Vec::new();
        for &slot in slots {
            let now = self.assigned_now(host, slot);
            let cache = &mut self.assigned[host.idx as usize];
            match cache.iter_mut().find(|(s, _)| *s == slot) {
                Some((_, prev)) if *prev == now => {}
                Some((_, prev)) => {
                    *prev = now;
                    changed.push(slot);
                }
                None => {
                    if !now.is_empty() {
                        changed.push(slot);
                    }
                    cache.push((slot, now));
                }
            }
        }
        changed
    }

    /// Returns the last reported assignment of `slot` on `host`.
    #[must_use]
    pub fn assignment(&self, host: ElementId, slot: SlotName) -> &[ElementId] {
        self.validate(host);
        self.assigned[host.idx as usize]
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, members)| members.as_slice())
            .unwrap_or(&[])
    }

    // -- Payload API --

    /// Returns the element's payload, or `None` if the handle is stale or the
    /// payload is currently taken.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&T> {
        if !self.is_alive(id) {
            return None;
        }
        self.payload[id.idx as usize].as_ref()
    }

    /// Returns the element's payload mutably, without marking it dirty.
    #[must_use]
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut T> {
        if !self.is_alive(id) {
            return None;
        }
        self.payload[id.idx as usize].as_mut()
    }

    /// Takes the payload out so it can be used alongside `&mut self`.
    ///
    /// Must be paired with [`put`](Self::put).
    pub fn take(&mut self, id: ElementId) -> Option<T> {
        if !self.is_alive(id) {
            return None;
        }
        self.payload[id.idx as usize].take()
    }

    /// Returns a payload previously removed with [`take`](Self::take).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the payload is present.
    pub fn put(&mut self, id: ElementId, payload: T) {
        self.validate(id);
        let slot = &mut self.payload[id.idx as usize];
        assert!(slot.is_none(), "payload already present for {id:?}");
        *slot = Some(payload);
    }

    // -- Dirty API --

    /// Marks the element for reconciliation.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn mark_properties(&mut self, id: ElementId) {
        self.validate(id);
        self.dirty.mark(id.idx, dirty::PROPERTIES);
    }

    /// Marks the element for slot reassignment.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn mark_slots(&mut self, id: ElementId) {
        self.validate(id);
        self.dirty.mark(id.idx, dirty::SLOTS);
    }

    /// Drains the elements marked for reconciliation.
    pub fn drain_properties(&mut self) -> Vec<ElementId> {
        self.drain(dirty::PROPERTIES)
    }

    /// Drains the elements marked for slot reassignment.
    pub fn drain_slots(&mut self) -> Vec<ElementId> {
        self.drain(dirty::SLOTS)
    }

    // -- Internal helpers --

    pub(crate) fn id_at(&self, idx: u32) -> ElementId {
        ElementId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    fn drain(&mut self, channel: Channel) -> Vec<ElementId> {
        let indices: Vec<u32> = self.dirty.drain(channel).deterministic().run().collect();
        indices
            .into_iter()
            .filter(|idx| *idx < self.len && !self.free_list.contains(idx))
            .map(|idx| self.id_at(idx))
            .collect()
    }

    /// Panics if the handle is stale.
    fn validate(&self, id: ElementId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale ElementId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    fn is_ancestor_or_self(&self, candidate: u32, mut idx: u32) -> bool {
        while idx != INVALID {
            if idx == candidate {
                return true;
            }
            idx = self.parent[idx as usize];
        }
        false
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }

    /// Sets the connected flag on the subtree rooted at `root` in pre-order,
    /// queueing a transition for every element whose flag flips.
    fn set_subtree_connected(&mut self, root: u32, connected: bool) {
        let mut stack = Vec::from([root]);
        while let Some(idx) = stack.pop() {
            if self.connected[idx as usize] != connected {
                self.connected[idx as usize] = connected;
                let id = self.id_at(idx);
                self.lifecycle.push(if connected {
                    Lifecycle::Connected(id)
                } else {
                    Lifecycle::Disconnected(id)
                });
            }
            // Push children in reverse so they pop in document order.
            let mut last = self.first_child[idx as usize];
            if last == INVALID {
                continue;
            }
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            while last != INVALID {
                stack.push(last);
                last = self.prev_sibling[last as usize];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;

    #[test]
    fn create_and_destroy() {
        let mut tree = ElementTree::new();
        let id = tree.create("a");
        assert!(tree.is_alive(id));
        assert_eq!(tree.destroy(id), Some("a"));
        assert!(!tree.is_alive(id));
        assert_eq!(tree.get(id), None);
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut tree = ElementTree::new();
        let id1 = tree.create(1);
        tree.destroy(id1);
        let id2 = tree.create(2);
        // id2 reuses the same slot but has a different generation.
        assert!(!tree.is_alive(id1));
        assert!(tree.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
        assert_eq!(tree.get(id1), None);
        assert_eq!(tree.get(id2), Some(&2));
    }

    #[test]
    fn append_insert_and_remove() {
        let mut tree = ElementTree::new();
        let parent = tree.create(());
        let a = tree.create(());
        let b = tree.create(());
        let c = tree.create(());

        tree.append_child(parent, a);
        tree.append_child(parent, c);
        tree.insert_before(b, c);
        assert_eq!(tree.children(parent).collect::<Vec<_>>(), vec![a, b, c]);
        assert_eq!(tree.parent(b), Some(parent));

        tree.remove_from_parent(b);
        assert_eq!(tree.children(parent).collect::<Vec<_>>(), vec![a, c]);
        assert_eq!(tree.parent(b), None);
    }

    #[test]
    fn mounting_connects_subtree_in_document_order() {
        let mut tree = ElementTree::new();
        let root = tree.create(());
        let a = tree.create(());
        let a1 = tree.create(());
        let b = tree.create(());
        tree.append_child(root, a);
        tree.append_child(a, a1);
        tree.append_child(root, b);
        assert!(tree.take_lifecycle().is_empty(), "detached trees never connect");

        tree.mount(root);
        assert!(tree.is_connected(a1));
        assert_eq!(
            tree.take_lifecycle(),
            vec![
                Lifecycle::Connected(root),
                Lifecycle::Connected(a),
                Lifecycle::Connected(a1),
                Lifecycle::Connected(b),
            ]
        );

        tree.remove_from_parent(a);
        assert!(!tree.is_connected(a1));
        assert_eq!(
            tree.take_lifecycle(),
            vec![Lifecycle::Disconnected(a), Lifecycle::Disconnected(a1)]
        );
    }

    #[test]
    fn attaching_to_connected_parent_connects_child() {
        let mut tree = ElementTree::new();
        let root = tree.create(());
        tree.mount(root);
        tree.take_lifecycle();

        let child = tree.create(());
        tree.append_child(root, child);
        assert_eq!(tree.take_lifecycle(), vec![Lifecycle::Connected(child)]);
    }

    #[test]
    fn refresh_slots_reports_only_real_changes() {
        let mut tree = ElementTree::new();
        let host = tree.create(());
        let marker = tree.create(());
        let object = tree.create(());
        let slots = [SlotName::Named("markers"), SlotName::Default];

        assert!(tree.refresh_slots(host, &slots).is_empty(), "empty slots stay quiet");

        tree.append_child(host, marker);
        tree.set_slot(marker, Some("markers".to_string()));
        assert_eq!(tree.refresh_slots(host, &slots), vec![SlotName::Named("markers")]);
        assert_eq!(tree.assignment(host, SlotName::Named("markers")), &[marker]);

        tree.append_child(host, object);
        assert_eq!(tree.refresh_slots(host, &slots), vec![SlotName::Default]);
        assert!(tree.refresh_slots(host, &slots).is_empty());

        tree.set_slot(marker, Some("elsewhere".to_string()));
        assert_eq!(tree.refresh_slots(host, &slots), vec![SlotName::Named("markers")]);
        assert!(tree.assignment(host, SlotName::Named("markers")).is_empty());
    }

    #[test]
    fn slot_and_child_changes_mark_the_host() {
        let mut tree = ElementTree::new();
        let host = tree.create(());
        let child = tree.create(());
        tree.append_child(host, child);
        assert_eq!(tree.drain_slots(), vec![host]);
        assert!(tree.drain_slots().is_empty());

        assert!(tree.set_slot(child, Some("markers".to_string())));
        assert!(!tree.set_slot(child, Some("markers".to_string())));
        assert_eq!(tree.drain_slots(), vec![host]);
    }

    #[test]
    fn detach_quietly_leaves_no_trace() {
        let mut tree = ElementTree::new();
        let host = tree.create(());
        let child = tree.create(());
        tree.mount(host);
        tree.append_child(host, child);
        tree.refresh_slots(host, &[SlotName::Default]);
        tree.drain_slots();
        tree.take_lifecycle();

        tree.detach_quietly(child);
        assert!(tree.drain_slots().is_empty());
        assert!(tree.take_lifecycle().is_empty());
        assert!(!tree.is_connected(child));
        assert!(tree.assignment(host, SlotName::Default).is_empty());
        assert!(tree.refresh_slots(host, &[SlotName::Default]).is_empty());
    }

    #[test]
    fn take_and_put_round_trip() {
        let mut tree = ElementTree::new();
        let id = tree.create(7);
        let value = tree.take(id).unwrap();
        assert_eq!(tree.get(id), None, "taken payload is invisible");
        tree.put(id, value + 1);
        assert_eq!(tree.get(id), Some(&8));
    }

    #[test]
    fn mark_properties_drains_once() {
        let mut tree = ElementTree::new();
        let a = tree.create(());
        let b = tree.create(());
        tree.mark_properties(b);
        tree.mark_properties(a);
        tree.mark_properties(b);
        let mut drained = tree.drain_properties();
        drained.sort();
        assert_eq!(drained, vec![a, b]);
        assert!(tree.drain_properties().is_empty());
    }

    #[test]
    #[should_panic(expected = "cannot destroy element with children")]
    fn destroy_with_children_panics() {
        let mut tree = ElementTree::new();
        let parent = tree.create(());
        let child = tree.create(());
        tree.append_child(parent, child);
        tree.destroy(parent);
    }

    #[test]
    #[should_panic(expected = "insertion would form a cycle")]
    fn appending_ancestor_panics() {
        let mut tree = ElementTree::new();
        let parent = tree.create(());
        let child = tree.create(());
        tree.append_child(parent, child);
        tree.append_child(child, parent);
    }

    #[test]
    #[should_panic(expected = "stale ElementId")]
    fn destroyed_handle_panics_on_parent() {
        let mut tree = ElementTree::new();
        let id = tree.create(());
        tree.destroy(id);
        let _ = tree.parent(id);
    }
}
