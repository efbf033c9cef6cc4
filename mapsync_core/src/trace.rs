// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for reconciliation.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`Document`](crate::document::Document) and the components call at each
//! interesting step: engine handles created and released, listeners added and
//! removed, path phase transitions, service requests, script loads, component
//! events, and one summary per reconciliation pass. All method bodies default
//! to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use crate::component::PathPhase;
use crate::engine::Delivery;
use crate::handle::{ListenerId, RequestId};
use crate::tree::ElementId;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which kind of engine object a handle event refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// Map canvas.
    Map,
    /// Marker.
    Marker,
    /// Info-window overlay.
    InfoWindow,
    /// Polyline or polygon.
    Poly,
    /// Path buffer.
    Path,
    /// Directions renderer.
    Renderer,
    /// KML layer.
    Kml,
}

/// Which service a request event refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Directions routing.
    Route,
    /// Places text search.
    TextSearch,
    /// Places detail lookup.
    PlaceDetails,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a component creates or lets go of an engine object.
#[derive(Clone, Copy, Debug)]
pub struct HandleEvent {
    /// Owning element.
    pub element: ElementId,
    /// Object kind.
    pub kind: HandleKind,
    /// `true` on creation, `false` on release.
    pub created: bool,
}

/// Emitted when a subscription is added or removed.
#[derive(Clone, Copy, Debug)]
pub struct ListenerEvent {
    /// Owning element.
    pub element: ElementId,
    /// The subscription.
    pub listener: ListenerId,
    /// Engine event name.
    pub name: &'static str,
    /// Whether the subscription is one-shot.
    pub once: bool,
}

/// Summary of one reconciliation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassEvent {
    /// Zero-based pass index within the flush.
    pub pass: u32,
    /// Script loads that completed.
    pub scripts_loaded: usize,
    /// Connect/disconnect callbacks run.
    pub lifecycle: usize,
    /// Engine deliveries dispatched (including dropped ones).
    pub deliveries: usize,
    /// Slot-change handlers run.
    pub slot_changes: usize,
    /// Elements reconciled.
    pub reconciled: usize,
}

impl PassEvent {
    /// Returns whether the pass did any work.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.scripts_loaded == 0
            && self.lifecycle == 0
            && self.deliveries == 0
            && self.slot_changes == 0
            && self.reconciled == 0
    }
}

/// Emitted when a poly's path state machine changes phase.
#[derive(Clone, Copy, Debug)]
pub struct PathPhaseEvent {
    /// The poly element.
    pub element: ElementId,
    /// Previous phase.
    pub from: PathPhase,
    /// New phase.
    pub to: PathPhase,
}

/// Emitted when a service request is issued.
#[derive(Clone, Copy, Debug)]
pub struct RequestEvent {
    /// Requesting element.
    pub element: ElementId,
    /// Engine request id.
    pub request: RequestId,
    /// Service kind.
    pub kind: RequestKind,
}

/// Emitted when a service request completes.
#[derive(Clone, Copy, Debug)]
pub struct CompletionEvent {
    /// Requesting element.
    pub element: ElementId,
    /// Engine request id.
    pub request: RequestId,
    /// Service kind.
    pub kind: RequestKind,
    /// Whether the status was OK. Non-OK completions change no state.
    pub ok: bool,
}

/// Emitted when a script load is requested from the host.
#[derive(Clone, Copy, Debug)]
pub struct ScriptRequestEvent<'a> {
    /// Full request URL.
    pub url: &'a str,
    /// Completion token.
    pub token: &'a str,
}

/// Emitted when a script load completes.
#[derive(Clone, Copy, Debug)]
pub struct ScriptLoadedEvent<'a> {
    /// Completion token.
    pub token: &'a str,
    /// Number of elements that were waiting on it.
    pub waiters: usize,
}

/// Emitted for every component event placed in the outbox.
#[derive(Clone, Copy, Debug)]
pub struct EmitEvent<'a> {
    /// Emitting element.
    pub element: ElementId,
    /// Event name.
    pub name: &'a str,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from reconciliation.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when an engine object is created or released.
    fn on_handle(&mut self, e: &HandleEvent) {
        _ = e;
    }

    /// Called when a subscription is added.
    fn on_listener_added(&mut self, e: &ListenerEvent) {
        _ = e;
    }

    /// Called when a subscription is removed.
    fn on_listener_removed(&mut self, e: &ListenerEvent) {
        _ = e;
    }

    /// Called at the end of every reconciliation pass.
    fn on_pass(&mut self, e: &PassEvent) {
        _ = e;
    }

    /// Called when a flush stops at the pass limit with work still pending.
    fn on_pass_overflow(&mut self, max_passes: u32) {
        _ = max_passes;
    }

    /// Called when a poly changes path phase.
    fn on_path_phase(&mut self, e: &PathPhaseEvent) {
        _ = e;
    }

    /// Called when a vertex insertion caused by path repopulation is
    /// discarded instead of entering edit mode.
    fn on_suppressed_insert(&mut self, element: ElementId, listener: ListenerId) {
        _ = (element, listener);
    }

    /// Called when a service request is issued.
    fn on_request(&mut self, e: &RequestEvent) {
        _ = e;
    }

    /// Called when a service request completes.
    fn on_completion(&mut self, e: &CompletionEvent) {
        _ = e;
    }

    /// Called when a script load is requested.
    fn on_script_request(&mut self, e: &ScriptRequestEvent<'_>) {
        _ = e;
    }

    /// Called when a script load completes.
    fn on_script_loaded(&mut self, e: &ScriptLoadedEvent<'_>) {
        _ = e;
    }

    /// Called when a component emits an event.
    fn on_emit(&mut self, e: &EmitEvent<'_>) {
        _ = e;
    }

    /// Called when an engine delivery has no live recipient.
    fn on_delivery_dropped(&mut self, delivery: &Delivery) {
        _ = delivery;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`HandleEvent`].
    #[inline]
    pub fn handle(&mut self, e: &HandleEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_handle(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ListenerEvent`] for an added subscription.
    #[inline]
    pub fn listener_added(&mut self, e: &ListenerEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_listener_added(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ListenerEvent`] for a removed subscription.
    #[inline]
    pub fn listener_removed(&mut self, e: &ListenerEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_listener_removed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassEvent`].
    #[inline]
    pub fn pass(&mut self, e: &PassEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Reports that a flush hit its pass limit.
    #[inline]
    pub fn pass_overflow(&mut self, max_passes: u32) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_overflow(max_passes);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = max_passes;
        }
    }

    /// Emits a [`PathPhaseEvent`].
    #[inline]
    pub fn path_phase(&mut self, e: &PathPhaseEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_path_phase(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Reports a suppressed vertex insertion.
    #[inline]
    pub fn suppressed_insert(&mut self, element: ElementId, listener: ListenerId) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_suppressed_insert(element, listener);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = (element, listener);
        }
    }

    /// Emits a [`RequestEvent`].
    #[inline]
    pub fn request(&mut self, e: &RequestEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_request(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CompletionEvent`].
    #[inline]
    pub fn completion(&mut self, e: &CompletionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_completion(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ScriptRequestEvent`].
    #[inline]
    pub fn script_request(&mut self, e: &ScriptRequestEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_script_request(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ScriptLoadedEvent`].
    #[inline]
    pub fn script_loaded(&mut self, e: &ScriptLoadedEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_script_loaded(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`EmitEvent`].
    #[inline]
    pub fn emit(&mut self, e: &EmitEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_emit(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Reports a delivery without a live recipient.
    #[inline]
    pub fn delivery_dropped(&mut self, delivery: &Delivery) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_delivery_dropped(delivery);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = delivery;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ElementTree;

    fn sample_element() -> ElementId {
        ElementTree::new().create(())
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        let element = sample_element();
        sink.on_handle(&HandleEvent {
            element,
            kind: HandleKind::Map,
            created: true,
        });
        sink.on_pass(&PassEvent::default());
        sink.on_pass_overflow(16);
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.pass(&PassEvent::default());
        tracer.emit(&EmitEvent {
            element: sample_element(),
            name: "google-map-ready",
        });
    }

    #[test]
    fn idle_pass_reports_idle() {
        assert!(PassEvent::default().is_idle());
        let busy = PassEvent {
            reconciled: 1,
            ..PassEvent::default()
        };
        assert!(!busy.is_idle());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::string::{String, ToString};
        use alloc::vec::Vec;

        struct RecordingSink {
            names: Vec<String>,
        }
        impl TraceSink for RecordingSink {
            fn on_emit(&mut self, e: &EmitEvent<'_>) {
                self.names.push(e.name.to_string());
            }
        }

        let mut sink = RecordingSink { names: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.emit(&EmitEvent {
            element: sample_element(),
            name: "google-map-marker-open",
        });
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.names, &["google-map-marker-open"]);
    }
}
