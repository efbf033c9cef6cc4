// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The reconciliation driver.
//!
//! A [`Document`] owns everything one page of map components needs: the
//! engine, the script host, the element tree, the shared script loader, the
//! routing tables that map engine subscriptions and requests back to
//! elements, a queue of deferred tasks, and the outbox of component events.
//!
//! Hosts mutate the tree and element properties freely, then call
//! [`flush`](Document::flush). A flush runs passes until one does no work.
//! Each pass, in order:
//!
//! 1. collects finished script loads and wakes their waiters,
//! 2. moves buffered engine deliveries into the inbox,
//! 3. runs connect and disconnect callbacks,
//! 4. dispatches every delivery in the inbox,
//! 5. fires slot-change handlers for hosts whose children changed,
//! 6. reconciles every element with changed properties.
//!
//! Passes are bounded by [`MAX_PASSES`]. [`tick`](Document::tick) runs the
//! deferred tasks (debounced map centering) and then flushes.

mod cx;
mod routes;

pub(crate) use cx::{Cx, Deferred};

use alloc::collections::VecDeque;
use alloc::format;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::fmt;

use crate::component::{
    Component, DetailsResult, DirectionsElement, MapElement, MarkerElement, PointElement,
    PolyElement, SearchElement,
};
use crate::element::{Element, ElementEvent, ElementKind, EventDetail};
use crate::engine::{Delivery, MapEngine};
use crate::error::Error;
use crate::handle::Target;
use crate::listeners::RouteKind;
use crate::loader::{Loader, ScriptHost};
use crate::options::MarkerOption;
use crate::pending::Pending;
use crate::service::{DirectionsStatus, PlacesStatus};
use crate::trace::{CompletionEvent, EmitEvent, PassEvent, Tracer};
use crate::tree::{ElementId, ElementTree, Lifecycle};

use routes::Routes;

/// Upper bound on reconciliation passes per flush.
///
/// Map readiness propagates to children one pass at a time, so a handful of
/// passes is normal. Hitting the bound means two elements keep re-dirtying
/// each other.
pub const MAX_PASSES: u32 = 16;

/// Owns the engine, the element tree and all reconciliation state.
pub struct Document<E: MapEngine, S: ScriptHost> {
    engine: E,
    scripts: S,
    tree: ElementTree<Element<E::Node>>,
    loader: Loader,
    routes: Routes,
    inbox: VecDeque<Delivery>,
    deferred: Vec<Deferred>,
    outbox: Vec<ElementEvent>,
}

impl<E: MapEngine + fmt::Debug, S: ScriptHost + fmt::Debug> fmt::Debug for Document<E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("engine", &self.engine)
            .field("scripts", &self.scripts)
            .field("loader", &self.loader)
            .field("routes", &self.routes)
            .field("inbox", &self.inbox.len())
            .field("deferred", &self.deferred.len())
            .field("outbox", &self.outbox.len())
            .finish_non_exhaustive()
    }
}

macro_rules! accessors {
    ($($get:ident, $get_mut:ident => $variant:ident($ty:ty);)*) => {
        $(
            #[doc = concat!("Returns the `", stringify!($variant), "` element `id`.")]
            ///
            /// # Errors
            ///
            /// [`Error::StaleElement`] or [`Error::WrongKind`].
            pub fn $get(&self, id: ElementId) -> Result<&$ty, Error> {
                match self.tree.get(id) {
                    Some(Element::$variant(c)) => Ok(c),
                    Some(_) => Err(Error::WrongKind {
                        id,
                        expected: ElementKind::$variant,
                    }),
                    None => Err(Error::StaleElement(id)),
                }
            }

            #[doc = concat!("Returns the `", stringify!($variant), "` element `id` for writing.")]
            ///
            /// The element is marked for reconciliation.
            ///
            /// # Errors
            ///
            /// [`Error::StaleElement`] or [`Error::WrongKind`].
            pub fn $get_mut(&mut self, id: ElementId) -> Result<&mut $ty, Error> {
                self.$get(id)?;
                self.tree.mark_properties(id);
                match self.tree.get_mut(id) {
                    Some(Element::$variant(c)) => Ok(c),
                    _ => Err(Error::StaleElement(id)),
                }
            }
        )*
    };
}

impl<E: MapEngine, S: ScriptHost> Document<E, S> {
    /// Creates an empty document.
    pub fn new(engine: E, scripts: S) -> Self {
        Self {
            engine,
            scripts,
            tree: ElementTree::new(),
            loader: Loader::new(),
            routes: Routes::default(),
            inbox: VecDeque::new(),
            deferred: Vec::new(),
            outbox: Vec::new(),
        }
    }

    // -- Parts --

    /// The engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The engine, for hosts that drive it directly (tests, event injection).
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// The script host.
    pub fn scripts(&self) -> &S {
        &self.scripts
    }

    /// The script host, for delivering load completions.
    pub fn scripts_mut(&mut self) -> &mut S {
        &mut self.scripts
    }

    /// The element tree, read-only.
    pub fn tree(&self) -> &ElementTree<Element<E::Node>> {
        &self.tree
    }

    // -- Elements --

    /// Creates a detached `<google-map>`.
    pub fn create_map(&mut self) -> ElementId {
        self.tree.create(Element::Map(MapElement::new()))
    }

    /// Creates a detached `<google-map-marker>`.
    pub fn create_marker(&mut self) -> ElementId {
        self.tree.create(Element::Marker(MarkerElement::new()))
    }

    /// Creates a detached `<google-map-poly>`.
    pub fn create_poly(&mut self) -> ElementId {
        self.tree.create(Element::Poly(PolyElement::new()))
    }

    /// Creates a detached `<google-map-point>`.
    pub fn create_point(&mut self) -> ElementId {
        self.tree.create(Element::Point(PointElement::new()))
    }

    /// Creates a detached `<google-map-directions>`.
    pub fn create_directions(&mut self) -> ElementId {
        self.tree
            .create(Element::Directions(DirectionsElement::new()))
    }

    /// Creates a detached `<google-map-search>`.
    pub fn create_search(&mut self) -> ElementId {
        self.tree.create(Element::Search(SearchElement::new()))
    }

    /// Creates a detached plain host node.
    pub fn create_host(&mut self, node: E::Node) -> ElementId {
        self.tree.create(Element::Host(node))
    }

    /// Returns the kind of `id`, or `None` if it is stale.
    pub fn kind(&self, id: ElementId) -> Option<ElementKind> {
        self.tree.get(id).map(Element::kind)
    }

    /// Attaches a root to the page.
    pub fn mount(&mut self, root: ElementId) {
        self.tree.mount(root);
    }

    /// Detaches a root from the page.
    pub fn unmount(&mut self, root: ElementId) {
        self.tree.unmount(root);
    }

    /// Appends `child` to `parent`, moving it if it has a parent already.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        self.detach(child);
        self.tree.append_child(parent, child);
    }

    /// Inserts `child` before `sibling`, moving it if it has a parent already.
    ///
    /// Inserting an element before itself does nothing.
    pub fn insert_before(&mut self, child: ElementId, sibling: ElementId) {
        if child == sibling {
            return;
        }
        self.detach(child);
        self.tree.insert_before(child, sibling);
    }

    /// Removes `child` from its parent, if it has one.
    ///
    /// The old parent is marked for slot reassignment like an explicit
    /// [`remove`](Self::remove).
    fn detach(&mut self, child: ElementId) {
        if self.tree.parent(child).is_some() {
            self.tree.remove_from_parent(child);
        }
    }

    /// Removes `child` from its parent.
    pub fn remove(&mut self, child: ElementId) {
        self.tree.remove_from_parent(child);
    }

    /// Sets or clears the `slot` attribute of `id`.
    pub fn set_slot(&mut self, id: ElementId, slot: Option<&str>) {
        self.tree.set_slot(id, slot.map(ToString::to_string));
    }

    /// Applies a string attribute with the host runtime's conversions.
    ///
    /// # Errors
    ///
    /// [`Error::StaleElement`] for a dead element, otherwise whatever the
    /// attribute's setter rejects.
    pub fn set_attribute(
        &mut self,
        id: ElementId,
        name: &str,
        value: Option<&str>,
    ) -> Result<(), Error> {
        let element = self.tree.get_mut(id).ok_or(Error::StaleElement(id))?;
        let result = element.set_attribute(name, value);
        self.tree.mark_properties(id);
        result
    }

    /// Disconnects and destroys `id` and its subtree.
    ///
    /// Disconnect callbacks run immediately, and every subscription the
    /// subtree still owns is removed from the engine. Content a marker moved
    /// into its info window is destroyed with it unless the host has
    /// re-attached it elsewhere.
    ///
    /// # Errors
    ///
    /// The first error from callbacks that ran as part of the teardown.
    pub fn destroy(&mut self, id: ElementId) -> Result<(), Error> {
        self.detach(id);
        self.tree.unmount(id);
        let mut errors = None;
        self.run_lifecycle(&mut Tracer::none(), &mut errors);

        let mut order = Vec::new();
        let mut stack = Vec::from([id]);
        while let Some(next) = stack.pop() {
            order.push(next);
            stack.extend(self.tree.children(next));
            if let Some(element) = self.tree.get(next) {
                stack.extend(
                    element
                        .relocated()
                        .iter()
                        .copied()
                        .filter(|&c| self.tree.is_alive(c) && self.tree.parent(c).is_none()),
                );
            }
        }
        // Reverse pre-order visits children before their parent.
        for element in order.into_iter().rev() {
            for listener in self.routes.remove_element(element) {
                self.engine.remove_listener(listener);
            }
            self.deferred.retain(|d| d.element != element);
            self.tree.destroy(element);
        }
        errors.map_or(Ok(()), Err)
    }

    accessors! {
        map, map_mut => Map(MapElement<E::Node>);
        marker, marker_mut => Marker(MarkerElement);
        poly, poly_mut => Poly(PolyElement);
        point, point_mut => Point(PointElement);
        directions, directions_mut => Directions(DirectionsElement);
        search, search_mut => Search(SearchElement);
    }

    // -- Operations --

    /// Provides the node a map renders into.
    ///
    /// # Errors
    ///
    /// [`Error::StaleElement`] or [`Error::WrongKind`].
    pub fn attach_container(&mut self, map: ElementId, container: E::Node) -> Result<(), Error> {
        self.map_mut(map)?.set_container(container);
        Ok(())
    }

    /// Triggers an engine resize on a map, keeping its declared center.
    ///
    /// The engine may move the center while resizing; the pre-resize
    /// `latitude`/`longitude` are written back afterwards, and the viewport
    /// is refit to the markers when `fit-to-markers` is set.
    ///
    /// # Errors
    ///
    /// [`Error::StaleElement`] or [`Error::WrongKind`], or the first error of
    /// a handler the resize fired.
    pub fn resize(&mut self, map: ElementId) -> Result<(), Error> {
        self.resize_traced(map, &mut Tracer::none())
    }

    /// [`resize`](Self::resize) with tracing.
    ///
    /// # Errors
    ///
    /// See [`resize`](Self::resize).
    pub fn resize_traced(&mut self, map: ElementId, tracer: &mut Tracer<'_>) -> Result<(), Error> {
        let element = self.map(map)?;
        let Some(handle) = element.handle() else {
            return Ok(());
        };
        let (lat, lng) = (element.latitude(), element.longitude());

        self.engine.trigger(Target::Map(handle), "resize");
        let mut errors = None;
        self.pump();
        while let Some(delivery) = self.inbox.pop_front() {
            note(&mut errors, self.dispatch(delivery, tracer));
        }
        self.map_mut(map)?.restore_center(lat, lng);
        self.with_element(map, tracer, |element, cx| {
            if let Element::Map(m) = element {
                m.fit_to_markers(cx);
            }
        });
        errors.map_or(Ok(()), Err)
    }

    /// Removes every slotted marker of a map from the engine map.
    ///
    /// The marker elements stay in the tree; their handles are detached.
    ///
    /// # Errors
    ///
    /// [`Error::StaleElement`] or [`Error::WrongKind`].
    pub fn clear_markers(&mut self, map: ElementId) -> Result<(), Error> {
        let markers = self.map(map)?.markers().to_vec();
        for marker in markers {
            if let Some(Element::Marker(m)) = self.tree.get(marker)
                && let Some(handle) = m.handle()
            {
                self.engine.set_marker(handle, MarkerOption::Map(None));
            }
        }
        Ok(())
    }

    /// Looks up one place through a search element's map.
    ///
    /// The returned value resolves during a later flush.
    ///
    /// # Errors
    ///
    /// [`Error::StaleElement`] or [`Error::WrongKind`], or
    /// [`Error::Unready`] when the search has no map yet.
    pub fn get_details(
        &mut self,
        search: ElementId,
        place_id: &str,
    ) -> Result<Pending<DetailsResult>, Error> {
        self.search(search)?;
        self.with_element(search, &mut Tracer::none(), |element, cx| match element {
            Element::Search(s) => s.get_details(cx, place_id),
            _ => Err(Error::WrongKind {
                id: search,
                expected: ElementKind::Search,
            }),
        })
        .unwrap_or(Err(Error::StaleElement(search)))
    }

    /// Moves out every component event emitted so far, oldest first.
    pub fn take_events(&mut self) -> Vec<ElementEvent> {
        core::mem::take(&mut self.outbox)
    }

    /// Number of live engine subscriptions owned by `id`.
    pub fn listener_count(&self, id: ElementId) -> usize {
        self.routes.listeners_of(id)
    }

    /// Returns whether deferred tasks are waiting for [`tick`](Self::tick).
    pub fn has_deferred(&self) -> bool {
        !self.deferred.is_empty()
    }

    /// Returns whether a script load is still outstanding.
    pub fn is_loading(&self) -> bool {
        self.loader.is_pending()
    }

    // -- Reconciliation --

    /// Runs reconciliation passes until nothing changes.
    ///
    /// # Errors
    ///
    /// The first error any hook returned. Later work in the flush still runs.
    pub fn flush(&mut self) -> Result<(), Error> {
        self.flush_traced(&mut Tracer::none())
    }

    /// [`flush`](Self::flush) with tracing.
    ///
    /// # Errors
    ///
    /// See [`flush`](Self::flush).
    pub fn flush_traced(&mut self, tracer: &mut Tracer<'_>) -> Result<(), Error> {
        let mut errors = None;
        for pass in 0..MAX_PASSES {
            let summary = self.run_pass(pass, tracer, &mut errors);
            tracer.pass(&summary);
            if summary.is_idle() {
                return errors.map_or(Ok(()), Err);
            }
        }
        tracer.pass_overflow(MAX_PASSES);
        errors.map_or(Ok(()), Err)
    }

    /// Runs due deferred tasks, then flushes.
    ///
    /// # Errors
    ///
    /// The first error a task or the flush returned.
    pub fn tick(&mut self) -> Result<(), Error> {
        self.tick_traced(&mut Tracer::none())
    }

    /// [`tick`](Self::tick) with tracing.
    ///
    /// # Errors
    ///
    /// See [`tick`](Self::tick).
    pub fn tick_traced(&mut self, tracer: &mut Tracer<'_>) -> Result<(), Error> {
        let mut errors = None;
        for Deferred { element, task } in core::mem::take(&mut self.deferred) {
            note(
                &mut errors,
                self.call(element, tracer, |c, cx| c.run_task(cx, task)),
            );
        }
        note(&mut errors, self.flush_traced(tracer));
        errors.map_or(Ok(()), Err)
    }

    fn run_pass(
        &mut self,
        pass: u32,
        tracer: &mut Tracer<'_>,
        errors: &mut Option<Error>,
    ) -> PassEvent {
        let mut summary = PassEvent {
            pass,
            ..PassEvent::default()
        };

        let mut tokens = Vec::new();
        self.scripts.take_completed(&mut tokens);
        for token in tokens {
            summary.scripts_loaded += 1;
            for waiter in self.loader.complete(&token, tracer) {
                note(errors, self.call(waiter, tracer, |c, cx| c.api_loaded(cx)));
            }
        }

        self.pump();
        summary.lifecycle = self.run_lifecycle(tracer, errors);

        while let Some(delivery) = self.inbox.pop_front() {
            summary.deliveries += 1;
            note(errors, self.dispatch(delivery, tracer));
        }

        for host in self.tree.drain_slots() {
            if !self.tree.is_connected(host) {
                continue;
            }
            let Some(kind) = self.kind(host) else {
                continue;
            };
            for slot in self.tree.refresh_slots(host, kind.slots()) {
                summary.slot_changes += 1;
                note(
                    errors,
                    self.call(host, tracer, |c, cx| c.slot_changed(cx, slot)),
                );
            }
        }

        for id in self.tree.drain_properties() {
            summary.reconciled += 1;
            note(errors, self.call(id, tracer, |c, cx| c.reconcile(cx)));
        }
        summary
    }

    /// Runs queued connect and disconnect callbacks.
    ///
    /// A transition is skipped when a later one in the same batch undid it.
    fn run_lifecycle(&mut self, tracer: &mut Tracer<'_>, errors: &mut Option<Error>) -> usize {
        let events = self.tree.take_lifecycle();
        let count = events.len();
        for event in events {
            match event {
                Lifecycle::Connected(id) => {
                    if !self.tree.is_alive(id) || !self.tree.is_connected(id) {
                        continue;
                    }
                    self.tree.mark_slots(id);
                    self.tree.mark_properties(id);
                    note(errors, self.call(id, tracer, |c, cx| c.connected(cx)));
                }
                Lifecycle::Disconnected(id) => {
                    if !self.tree.is_alive(id) || self.tree.is_connected(id) {
                        continue;
                    }
                    self.with_element(id, tracer, |element, cx| {
                        if let Some(c) = element.component::<E>() {
                            c.disconnected(cx);
                        }
                    });
                }
            }
        }
        count
    }

    fn dispatch(&mut self, delivery: Delivery, tracer: &mut Tracer<'_>) -> Result<(), Error> {
        if let Delivery::Event { listener, payload } = delivery {
            let Some(route) = self.routes.listener(listener).copied() else {
                tracer.delivery_dropped(&delivery);
                return Ok(());
            };
            if route.once {
                self.routes.remove_listener(listener);
            }
            let Some(kind) = self.kind(route.element) else {
                tracer.delivery_dropped(&delivery);
                return Ok(());
            };
            return match route.kind {
                RouteKind::Forward(name) => {
                    let name = format!("{}-{name}", kind.tag());
                    tracer.emit(&EmitEvent {
                        element: route.element,
                        name: &name,
                    });
                    self.outbox.push(ElementEvent {
                        target: route.element,
                        name,
                        detail: EventDetail::Engine(payload),
                    });
                    Ok(())
                }
                other => self.call(route.element, tracer, |c, cx| c.route(cx, other, payload)),
            };
        }

        let (request, ok) = match &delivery {
            Delivery::Route {
                request, status, ..
            } => (*request, *status == DirectionsStatus::Ok),
            Delivery::Search {
                request, status, ..
            }
            | Delivery::Details {
                request, status, ..
            } => (*request, *status == PlacesStatus::Ok),
            Delivery::Event { .. } => return Ok(()),
        };
        let Some(pending) = self.routes.take_request(request) else {
            tracer.delivery_dropped(&delivery);
            return Ok(());
        };
        tracer.completion(&CompletionEvent {
            element: pending.element,
            request,
            kind: pending.kind,
            ok,
        });
        self.call(pending.element, tracer, |c, cx| {
            c.completed(cx, delivery);
            Ok(())
        })
    }

    /// Moves buffered engine deliveries into the inbox.
    fn pump(&mut self) {
        let mut buf = Vec::new();
        self.engine.take_deliveries(&mut buf);
        self.inbox.extend(buf);
    }

    /// Runs a component hook on `id`. Host nodes and dead elements are
    /// skipped.
    fn call(
        &mut self,
        id: ElementId,
        tracer: &mut Tracer<'_>,
        f: impl FnOnce(&mut dyn Component<E>, &mut Cx<'_, '_, E>) -> Result<(), Error>,
    ) -> Result<(), Error> {
        self.with_element(id, tracer, |element, cx| match element.component::<E>() {
            Some(c) => f(c, cx),
            None => Ok(()),
        })
        .unwrap_or(Ok(()))
    }

    /// Takes `id`'s payload out of the tree and hands it to `f` together with
    /// a context over the rest of the document.
    ///
    /// If the component has unreconciled changes afterwards, it is marked for
    /// the next pass.
    fn with_element<R>(
        &mut self,
        id: ElementId,
        tracer: &mut Tracer<'_>,
        f: impl FnOnce(&mut Element<E::Node>, &mut Cx<'_, '_, E>) -> R,
    ) -> Option<R> {
        let mut element = self.tree.take(id)?;
        let mut cx = Cx {
            engine: &mut self.engine,
            tree: &mut self.tree,
            routes: &mut self.routes,
            outbox: &mut self.outbox,
            inbox: &mut self.inbox,
            deferred: &mut self.deferred,
            loader: &mut self.loader,
            scripts: &mut self.scripts,
            tracer,
            element: id,
        };
        let result = f(&mut element, &mut cx);
        let dirty = element
            .component::<E>()
            .is_some_and(|c| c.has_changes());
        self.tree.put(id, element);
        if dirty {
            self.tree.mark_properties(id);
        }
        Some(result)
    }
}

/// Keeps the first error.
fn note(slot: &mut Option<Error>, result: Result<(), Error>) {
    if let Err(e) = result
        && slot.is_none()
    {
        *slot = Some(e);
    }
}
