// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use mapsync_core::engine::Delivery;
use mapsync_core::handle::ListenerId;
use mapsync_core::trace::{
    CompletionEvent, EmitEvent, HandleEvent, ListenerEvent, PassEvent, PathPhaseEvent,
    RequestEvent, ScriptLoadedEvent, ScriptRequestEvent, TraceSink,
};
use mapsync_core::tree::ElementId;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    idle_passes: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("idle_passes", &self.idle_passes)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            idle_passes: false,
        }
    }

    /// Also prints passes that did no work. Off by default.
    #[must_use]
    pub fn with_idle_passes(mut self, idle_passes: bool) -> Self {
        self.idle_passes = idle_passes;
        self
    }

    /// Consumes the sink and returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn el(id: ElementId) -> String {
    format!("{}@{}", id.index(), id.generation())
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_handle(&mut self, e: &HandleEvent) {
        let verb = if e.created { "create" } else { "release" };
        let _ = writeln!(
            self.writer,
            "[handle:{verb}] element={} kind={:?}",
            el(e.element),
            e.kind,
        );
    }

    fn on_listener_added(&mut self, e: &ListenerEvent) {
        let once = if e.once { " once" } else { "" };
        let _ = writeln!(
            self.writer,
            "[listen:add] element={} id={} {}{once}",
            el(e.element),
            e.listener.0,
            e.name,
        );
    }

    fn on_listener_removed(&mut self, e: &ListenerEvent) {
        let _ = writeln!(
            self.writer,
            "[listen:remove] element={} id={} {}",
            el(e.element),
            e.listener.0,
            e.name,
        );
    }

    fn on_pass(&mut self, e: &PassEvent) {
        if e.is_idle() && !self.idle_passes {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[pass] #{} scripts={} lifecycle={} deliveries={} slots={} reconciled={}",
            e.pass, e.scripts_loaded, e.lifecycle, e.deliveries, e.slot_changes, e.reconciled,
        );
    }

    fn on_pass_overflow(&mut self, max_passes: u32) {
        let _ = writeln!(self.writer, "[pass] OVERFLOW after {max_passes} passes");
    }

    fn on_path_phase(&mut self, e: &PathPhaseEvent) {
        let _ = writeln!(
            self.writer,
            "[path] element={} {:?} -> {:?}",
            el(e.element),
            e.from,
            e.to,
        );
    }

    fn on_suppressed_insert(&mut self, element: ElementId, listener: ListenerId) {
        let _ = writeln!(
            self.writer,
            "[path] element={} suppressed insert_at via id={}",
            el(element),
            listener.0,
        );
    }

    fn on_request(&mut self, e: &RequestEvent) {
        let _ = writeln!(
            self.writer,
            "[request] element={} id={} {:?}",
            el(e.element),
            e.request.0,
            e.kind,
        );
    }

    fn on_completion(&mut self, e: &CompletionEvent) {
        let status = if e.ok { "ok" } else { "FAILED" };
        let _ = writeln!(
            self.writer,
            "[complete] element={} id={} {:?} {status}",
            el(e.element),
            e.request.0,
            e.kind,
        );
    }

    fn on_script_request(&mut self, e: &ScriptRequestEvent<'_>) {
        let _ = writeln!(self.writer, "[script:request] {} token={}", e.url, e.token);
    }

    fn on_script_loaded(&mut self, e: &ScriptLoadedEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[script:loaded] token={} waiters={}",
            e.token, e.waiters,
        );
    }

    fn on_emit(&mut self, e: &EmitEvent<'_>) {
        let _ = writeln!(self.writer, "[emit] element={} {}", el(e.element), e.name);
    }

    fn on_delivery_dropped(&mut self, delivery: &Delivery) {
        let what = match delivery {
            Delivery::Event { listener, .. } => format!("event id={}", listener.0),
            Delivery::Route { request, .. } => format!("route id={}", request.0),
            Delivery::Search { request, .. } => format!("search id={}", request.0),
            Delivery::Details { request, .. } => format!("details id={}", request.0),
        };
        let _ = writeln!(self.writer, "[drop] {what}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapsync_core::trace::{HandleKind, RequestKind};
    use mapsync_core::tree::ElementTree;

    #[test]
    fn pretty_print_handle_and_completion() {
        let element = ElementTree::new().create(());
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_handle(&HandleEvent {
            element,
            kind: HandleKind::Marker,
            created: true,
        });
        sink.on_completion(&CompletionEvent {
            element,
            request: mapsync_core::handle::RequestId(4),
            kind: RequestKind::Route,
            ok: false,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("[handle:create]"), "got: {output}");
        assert!(output.contains("kind=Marker"), "got: {output}");
        assert!(output.contains("id=4 Route FAILED"), "got: {output}");
    }

    #[test]
    fn idle_passes_are_skipped_by_default() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_pass(&PassEvent::default());
        assert!(sink.writer.is_empty());

        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new()).with_idle_passes(true);
        sink.on_pass(&PassEvent::default());
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.starts_with("[pass] #0"), "got: {output}");
    }
}
