// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-component listener tables and event-group forwarding.
//!
//! A component that forwards engine events keeps a [`ListenerTable`] mapping
//! each forwarded event name to its single live subscription. Turning a group
//! on registers every name in the group that is not registered yet; turning it
//! off removes exactly the recorded subscriptions. When the engine object is
//! rebuilt, the table is [forgotten](ListenerTable::forget) wholesale after the
//! object's subscriptions were cleared in the engine, so no entry ever refers
//! to a destroyed object.

use alloc::collections::BTreeMap;

use crate::handle::{ListenerId, Target};

/// What the document does with a delivery for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteKind {
    /// Re-emit as `<tag>-<name>` with the payload as detail.
    Forward(&'static str),
    /// Map center moved; read it back into `latitude`/`longitude`.
    CenterChanged,
    /// Map zoom changed; read it back into `zoom`.
    ZoomChanged,
    /// Map type changed; read it back into `map-type`.
    MapTypeChanged,
    /// Marker drag ended; copy the position into `latitude`/`longitude`.
    MarkerDragEnd,
    /// Marker clicked; open the info window.
    OpenInfo,
    /// Info window close button clicked.
    CloseInfo,
    /// A vertex was inserted into a poly's path.
    PathInsert,
    /// A vertex of a poly's path was replaced.
    PathSet,
    /// The map was clicked while a poly was being edited.
    EndEditing,
}

/// Registers and removes engine subscriptions on behalf of one element.
pub(crate) trait Subscriptions {
    /// Adds a subscription routed to the current element.
    fn subscribe(&mut self, target: Target, name: &'static str, route: RouteKind) -> ListenerId;

    /// Removes a subscription.
    fn unsubscribe(&mut self, listener: ListenerId);
}

/// Where a group of events is forwarded from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Surface {
    /// A map canvas.
    Map,
    /// A marker or poly.
    Overlay,
}

/// A set of engine events toggled together by one boolean property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventGroup {
    /// `click-events`.
    Click,
    /// `drag-events`.
    Drag,
    /// `mouse-events`.
    Mouse,
}

impl EventGroup {
    /// All groups, in registration order.
    pub const ALL: [Self; 3] = [Self::Click, Self::Drag, Self::Mouse];

    /// Returns the engine event names in this group for `surface`.
    #[must_use]
    pub const fn names(self, surface: Surface) -> &'static [&'static str] {
        match (self, surface) {
            (Self::Click, _) => &["click", "dblclick", "rightclick"],
            (Self::Drag, _) => &["drag", "dragend", "dragstart"],
            (Self::Mouse, Surface::Map) => &["mousemove", "mouseout", "mouseover"],
            (Self::Mouse, Surface::Overlay) => {
                &["mousedown", "mousemove", "mouseout", "mouseover", "mouseup"]
            }
        }
    }
}

/// Event name to live subscription, at most one per name.
#[derive(Clone, Debug, Default)]
pub(crate) struct ListenerTable {
    entries: BTreeMap<&'static str, ListenerId>,
}

impl ListenerTable {
    /// Forwards `name` from `target` unless it is already forwarded.
    pub(crate) fn forward(
        &mut self,
        subs: &mut impl Subscriptions,
        target: Target,
        name: &'static str,
    ) {
        if self.entries.contains_key(name) {
            return;
        }
        let id = subs.subscribe(target, name, RouteKind::Forward(name));
        self.entries.insert(name, id);
    }

    /// Stops forwarding `name`, if it is forwarded.
    pub(crate) fn clear(&mut self, subs: &mut impl Subscriptions, name: &'static str) {
        if let Some(id) = self.entries.remove(name) {
            subs.unsubscribe(id);
        }
    }

    /// Turns every event of `group` on or off.
    pub(crate) fn set_group(
        &mut self,
        subs: &mut impl Subscriptions,
        target: Target,
        group: EventGroup,
        surface: Surface,
        enabled: bool,
    ) {
        for &name in group.names(surface) {
            if enabled {
                self.forward(subs, target, name);
            } else {
                self.clear(subs, name);
            }
        }
    }

    /// Removes every recorded subscription.
    pub(crate) fn clear_all(&mut self, subs: &mut impl Subscriptions) {
        for (_, id) in core::mem::take(&mut self.entries) {
            subs.unsubscribe(id);
        }
    }

    /// Drops every entry without unsubscribing.
    ///
    /// Only valid once the engine has already cleared the subscriptions (for
    /// example with `clear_instance_listeners` on the object being rebuilt).
    pub(crate) fn forget(&mut self) {
        self.entries.clear();
    }

    /// Returns whether `name` is currently forwarded.
    #[cfg(test)]
    pub(crate) fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns the number of live subscriptions.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::handle::MapHandle;

    #[derive(Default)]
    struct Live {
        next: u32,
        live: Vec<(ListenerId, &'static str)>,
    }

    impl Subscriptions for Live {
        fn subscribe(
            &mut self,
            _target: Target,
            name: &'static str,
            _route: RouteKind,
        ) -> ListenerId {
            self.next += 1;
            let id = ListenerId(self.next);
            self.live.push((id, name));
            id
        }

        fn unsubscribe(&mut self, listener: ListenerId) {
            self.live.retain(|(id, _)| *id != listener);
        }
    }

    impl Live {
        fn count(&self, name: &str) -> usize {
            self.live.iter().filter(|(_, n)| *n == name).count()
        }
    }

    const MAP: Target = Target::Map(MapHandle(1));

    #[test]
    fn toggling_a_group_never_duplicates() {
        let mut subs = Live::default();
        let mut table = ListenerTable::default();

        table.set_group(&mut subs, MAP, EventGroup::Click, Surface::Map, true);
        table.set_group(&mut subs, MAP, EventGroup::Click, Surface::Map, true);
        assert_eq!(subs.count("click"), 1, "re-enabling is idempotent");

        table.set_group(&mut subs, MAP, EventGroup::Click, Surface::Map, false);
        assert!(subs.live.is_empty());
        assert!(!table.contains("click"));

        table.set_group(&mut subs, MAP, EventGroup::Click, Surface::Map, true);
        assert_eq!(subs.count("click"), 1);
        assert_eq!(subs.count("dblclick"), 1);
        assert_eq!(subs.count("rightclick"), 1);
    }

    #[test]
    fn reenabling_produces_fresh_handles() {
        let mut subs = Live::default();
        let mut table = ListenerTable::default();
        table.forward(&mut subs, MAP, "idle");
        let first = subs.live[0].0;
        table.clear(&mut subs, "idle");
        table.forward(&mut subs, MAP, "idle");
        assert_ne!(subs.live[0].0, first);
    }

    #[test]
    fn clear_all_removes_only_recorded_handles() {
        let mut subs = Live::default();
        let foreign = subs.subscribe(MAP, "center_changed", RouteKind::CenterChanged);
        let mut table = ListenerTable::default();
        table.set_group(&mut subs, MAP, EventGroup::Mouse, Surface::Overlay, true);
        assert_eq!(table.len(), 5);

        table.clear_all(&mut subs);
        assert_eq!(table.len(), 0);
        assert_eq!(subs.live, [(foreign, "center_changed")]);
    }

    #[test]
    fn mouse_group_differs_by_surface() {
        assert_eq!(EventGroup::Mouse.names(Surface::Map).len(), 3);
        assert_eq!(EventGroup::Mouse.names(Surface::Overlay).len(), 5);
        assert_eq!(
            EventGroup::Drag.names(Surface::Map),
            EventGroup::Drag.names(Surface::Overlay)
        );
    }
}
