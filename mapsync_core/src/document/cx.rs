// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The context a component reacts in.

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use super::routes::{PendingRequest, Route, Routes};
use crate::component::Task;
use crate::element::{Element, ElementEvent, EventDetail};
use crate::engine::{Delivery, MapEngine};
use crate::handle::{ListenerId, RequestId, Target};
use crate::listeners::{RouteKind, Subscriptions};
use crate::loader::{LoadOutcome, Loader, LoaderConfig, ScriptHost};
use crate::trace::{
    EmitEvent, HandleEvent, HandleKind, ListenerEvent, RequestEvent, RequestKind, Tracer,
};
use crate::tree::{ElementId, ElementTree};

/// A deferred task for one element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Deferred {
    pub(crate) element: ElementId,
    pub(crate) task: Task,
}

/// Disjoint borrows of the document, scoped to one element.
///
/// The element's own payload is taken out of `tree` while it reacts, so the
/// component can read and write other elements (its children) freely.
pub(crate) struct Cx<'a, 't, E: MapEngine> {
    pub(crate) engine: &'a mut E,
    pub(crate) tree: &'a mut ElementTree<Element<E::Node>>,
    pub(crate) routes: &'a mut Routes,
    pub(crate) outbox: &'a mut Vec<ElementEvent>,
    pub(crate) inbox: &'a mut VecDeque<Delivery>,
    pub(crate) deferred: &'a mut Vec<Deferred>,
    pub(crate) loader: &'a mut Loader,
    pub(crate) scripts: &'a mut dyn ScriptHost,
    pub(crate) tracer: &'a mut Tracer<'t>,
    pub(crate) element: ElementId,
}

impl<E: MapEngine> Cx<'_, '_, E> {
    /// The element being reconciled.
    pub(crate) fn id(&self) -> ElementId {
        self.element
    }

    /// Queues a component event.
    pub(crate) fn emit(&mut self, name: impl Into<String>, detail: EventDetail) {
        let name = name.into();
        self.tracer.emit(&EmitEvent {
            element: self.element,
            name: &name,
        });
        self.outbox.push(ElementEvent {
            target: self.element,
            name,
            detail,
        });
    }

    /// Subscribes to the next firing of `name` only.
    pub(crate) fn listen_once(
        &mut self,
        target: Target,
        name: &'static str,
        kind: RouteKind,
    ) -> ListenerId {
        let id = self.engine.add_listener_once(target, name);
        self.add_route(id, target, name, kind, true);
        id
    }

    /// Clears every subscription on `target`, including ones owned by other
    /// elements.
    pub(crate) fn clear_instance(&mut self, target: Target) {
        self.engine.clear_instance_listeners(target);
        for (listener, route) in self.routes.remove_target(target) {
            self.tracer.listener_removed(&ListenerEvent {
                element: route.element,
                listener,
                name: route.name,
                once: route.once,
            });
        }
    }

    /// Records a service request so its completion reaches this element.
    pub(crate) fn track_request(&mut self, request: RequestId, kind: RequestKind) {
        self.tracer.request(&RequestEvent {
            element: self.element,
            request,
            kind,
        });
        self.routes.add_request(
            request,
            PendingRequest {
                element: self.element,
                kind,
            },
        );
    }

    /// Schedules `task` for the next tick, replacing a pending one.
    pub(crate) fn defer(&mut self, task: Task) {
        let entry = Deferred {
            element: self.element,
            task,
        };
        if !self.deferred.contains(&entry) {
            self.deferred.push(entry);
        }
    }

    /// Moves buffered engine deliveries into the inbox.
    pub(crate) fn pump(&mut self) {
        let mut buf = Vec::new();
        self.engine.take_deliveries(&mut buf);
        self.inbox.extend(buf);
    }

    /// Moves buffered engine deliveries into the inbox, discarding firings of
    /// this element's `kind` routes.
    ///
    /// Used right after the element wrote to the engine itself, when those
    /// firings can only be echoes of its own writes.
    pub(crate) fn pump_discarding(&mut self, kind: RouteKind) {
        let mut buf = Vec::new();
        self.engine.take_deliveries(&mut buf);
        for delivery in buf {
            if let Delivery::Event { listener, .. } = &delivery
                && self
                    .routes
                    .listener(*listener)
                    .is_some_and(|r| r.element == self.element && r.kind == kind)
            {
                self.tracer.suppressed_insert(self.element, *listener);
                continue;
            }
            self.inbox.push_back(delivery);
        }
    }

    /// Resolves engine readiness through the shared loader.
    pub(crate) fn load(&mut self, config: &LoaderConfig) -> LoadOutcome {
        let loaded = self.engine.is_loaded();
        self.loader
            .load(config, self.element, loaded, self.scripts, self.tracer)
    }

    /// Traces creation of an engine object.
    pub(crate) fn created(&mut self, kind: HandleKind) {
        self.tracer.handle(&HandleEvent {
            element: self.element,
            kind,
            created: true,
        });
    }

    /// Traces release of an engine object.
    pub(crate) fn released(&mut self, kind: HandleKind) {
        self.tracer.handle(&HandleEvent {
            element: self.element,
            kind,
            created: false,
        });
    }

    fn add_route(
        &mut self,
        id: ListenerId,
        target: Target,
        name: &'static str,
        kind: RouteKind,
        once: bool,
    ) {
        self.tracer.listener_added(&ListenerEvent {
            element: self.element,
            listener: id,
            name,
            once,
        });
        self.routes.add_listener(
            id,
            Route {
                element: self.element,
                target,
                name,
                kind,
                once,
            },
        );
    }
}

impl<E: MapEngine> Subscriptions for Cx<'_, '_, E> {
    fn subscribe(&mut self, target: Target, name: &'static str, route: RouteKind) -> ListenerId {
        let id = self.engine.add_listener(target, name);
        self.add_route(id, target, name, route, false);
        id
    }

    fn unsubscribe(&mut self, listener: ListenerId) {
        self.engine.remove_listener(listener);
        if let Some(route) = self.routes.remove_listener(listener) {
            self.tracer.listener_removed(&ListenerEvent {
                element: route.element,
                listener,
                name: route.name,
                once: route.once,
            });
        }
    }
}
