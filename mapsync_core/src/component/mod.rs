// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The six map components.
//!
//! Each component is plain state plus a set of reactions. Setters record
//! which properties changed; the [`Document`](crate::document::Document)
//! later hands the component a context ([`Cx`]) and calls the hooks below in
//! a fixed pass order. Reactions that need an engine handle are no-ops until
//! the handle exists, because constructing the handle re-applies every facet.

mod directions;
mod map;
mod marker;
mod point;
mod poly;
mod search;

pub use directions::DirectionsElement;
pub use map::MapElement;
pub use marker::MarkerElement;
pub use point::PointElement;
pub use poly::{PathPhase, PolyElement};
pub use search::{DetailsResult, SearchElement};

use crate::document::Cx;
use crate::engine::{Delivery, EventPayload, MapEngine};
use crate::error::Error;
use crate::listeners::RouteKind;
use crate::tree::SlotName;

/// Work deferred to the next [`tick`](crate::document::Document::tick).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Task {
    /// Move the map to its `latitude`/`longitude`.
    UpdateCenter,
}

/// Reconciliation hooks, called by the document.
pub(crate) trait Component<E: MapEngine> {
    /// Returns whether properties changed since the last reconciliation.
    fn has_changes(&self) -> bool;

    /// The element joined a mounted tree.
    fn connected(&mut self, cx: &mut Cx<'_, '_, E>) -> Result<(), Error> {
        _ = cx;
        Ok(())
    }

    /// The element left a mounted tree.
    fn disconnected(&mut self, cx: &mut Cx<'_, '_, E>) {
        _ = cx;
    }

    /// The engine script this element waited for finished loading.
    fn api_loaded(&mut self, cx: &mut Cx<'_, '_, E>) -> Result<(), Error> {
        _ = cx;
        Ok(())
    }

    /// The assignment of `slot` changed.
    fn slot_changed(&mut self, cx: &mut Cx<'_, '_, E>, slot: SlotName) -> Result<(), Error> {
        _ = (cx, slot);
        Ok(())
    }

    /// Reacts to every property changed since the last call.
    fn reconcile(&mut self, cx: &mut Cx<'_, '_, E>) -> Result<(), Error>;

    /// A subscription routed to this element fired.
    fn route(
        &mut self,
        cx: &mut Cx<'_, '_, E>,
        kind: RouteKind,
        payload: EventPayload,
    ) -> Result<(), Error> {
        _ = (cx, kind, payload);
        Ok(())
    }

    /// A service request issued by this element completed.
    fn completed(&mut self, cx: &mut Cx<'_, '_, E>, delivery: Delivery) {
        _ = (cx, delivery);
    }

    /// A deferred task came due.
    fn run_task(&mut self, cx: &mut Cx<'_, '_, E>, task: Task) -> Result<(), Error> {
        _ = (cx, task);
        Ok(())
    }
}
