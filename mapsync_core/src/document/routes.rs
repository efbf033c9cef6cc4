// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Where engine deliveries go.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::handle::{ListenerId, RequestId, Target};
use crate::listeners::RouteKind;
use crate::trace::RequestKind;
use crate::tree::ElementId;

/// One live subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Route {
    pub(crate) element: ElementId,
    pub(crate) target: Target,
    pub(crate) name: &'static str,
    pub(crate) kind: RouteKind,
    pub(crate) once: bool,
}

/// One in-flight service request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PendingRequest {
    pub(crate) element: ElementId,
    pub(crate) kind: RequestKind,
}

/// Subscriptions and requests, keyed by their engine ids.
#[derive(Debug, Default)]
pub(crate) struct Routes {
    listeners: BTreeMap<ListenerId, Route>,
    requests: BTreeMap<RequestId, PendingRequest>,
}

impl Routes {
    pub(crate) fn add_listener(&mut self, id: ListenerId, route: Route) {
        self.listeners.insert(id, route);
    }

    pub(crate) fn listener(&self, id: ListenerId) -> Option<&Route> {
        self.listeners.get(&id)
    }

    pub(crate) fn remove_listener(&mut self, id: ListenerId) -> Option<Route> {
        self.listeners.remove(&id)
    }

    /// Removes every subscription on `target` and returns them.
    pub(crate) fn remove_target(&mut self, target: Target) -> Vec<(ListenerId, Route)> {
        let ids: Vec<ListenerId> = self
            .listeners
            .iter()
            .filter(|(_, r)| r.target == target)
            .map(|(id, _)| *id)
            .collect();
        ids.into_iter()
            .filter_map(|id| self.listeners.remove(&id).map(|r| (id, r)))
            .collect()
    }

    /// Removes every subscription owned by `element` and returns their ids.
    pub(crate) fn remove_element(&mut self, element: ElementId) -> Vec<ListenerId> {
        let ids: Vec<ListenerId> = self
            .listeners
            .iter()
            .filter(|(_, r)| r.element == element)
            .map(|(id, _)| *id)
            .collect();
        for id in &ids {
            self.listeners.remove(id);
        }
        self.requests.retain(|_, r| r.element != element);
        ids
    }

    pub(crate) fn add_request(&mut self, id: RequestId, request: PendingRequest) {
        self.requests.insert(id, request);
    }

    pub(crate) fn take_request(&mut self, id: RequestId) -> Option<PendingRequest> {
        self.requests.remove(&id)
    }

    /// Number of live subscriptions owned by `element`.
    pub(crate) fn listeners_of(&self, element: ElementId) -> usize {
        self.listeners
            .values()
            .filter(|r| r.element == element)
            .count()
    }
}
