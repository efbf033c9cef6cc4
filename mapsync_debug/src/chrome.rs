// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Trace events carry no clock, so timestamps are sequence numbers: event
//! `n` is placed at `n` microseconds. Element-scoped events use the element's
//! slot index as the thread id, which gives one lane per element.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Passes become counter tracks; everything else is an instant event.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for (ts, recorded) in decode(bytes).enumerate() {
        let event = match recorded {
            RecordedEvent::Handle {
                element,
                kind,
                created,
            } => json!({
                "ph": "i",
                "name": if created { "CreateHandle" } else { "ReleaseHandle" },
                "cat": "Engine",
                "ts": ts,
                "pid": 0,
                "tid": element.index,
                "s": "t",
                "args": {
                    "kind": format!("{kind:?}"),
                    "generation": element.generation,
                }
            }),
            RecordedEvent::Listener {
                element,
                listener,
                name,
                once,
                added,
            } => json!({
                "ph": "i",
                "name": if added { "Listen" } else { "Unlisten" },
                "cat": "Listeners",
                "ts": ts,
                "pid": 0,
                "tid": element.index,
                "s": "t",
                "args": {
                    "event": name,
                    "listener": listener.0,
                    "once": once,
                }
            }),
            RecordedEvent::Pass(p) => json!({
                "ph": "C",
                "name": "Pass",
                "cat": "Document",
                "ts": ts,
                "pid": 0,
                "args": {
                    "scripts_loaded": p.scripts_loaded,
                    "lifecycle": p.lifecycle,
                    "deliveries": p.deliveries,
                    "slot_changes": p.slot_changes,
                    "reconciled": p.reconciled,
                }
            }),
            RecordedEvent::PassOverflow { max_passes } => json!({
                "ph": "i",
                "name": "PassOverflow",
                "cat": "Document",
                "ts": ts,
                "pid": 0,
                "tid": 0,
                "s": "g",
                "args": { "max_passes": max_passes }
            }),
            RecordedEvent::PathPhase { element, from, to } => json!({
                "ph": "i",
                "name": format!("{to:?}"),
                "cat": "Path",
                "ts": ts,
                "pid": 0,
                "tid": element.index,
                "s": "t",
                "args": { "from": format!("{from:?}") }
            }),
            RecordedEvent::SuppressedInsert { element, listener } => json!({
                "ph": "i",
                "name": "SuppressedInsert",
                "cat": "Path",
                "ts": ts,
                "pid": 0,
                "tid": element.index,
                "s": "t",
                "args": { "listener": listener.0 }
            }),
            RecordedEvent::Request {
                element,
                request,
                kind,
            } => json!({
                "ph": "i",
                "name": format!("{kind:?}"),
                "cat": "Request",
                "ts": ts,
                "pid": 0,
                "tid": element.index,
                "s": "t",
                "args": { "request": request.0 }
            }),
            RecordedEvent::Completion {
                element,
                request,
                kind,
                ok,
            } => json!({
                "ph": "i",
                "name": format!("{kind:?}Complete"),
                "cat": "Request",
                "ts": ts,
                "pid": 0,
                "tid": element.index,
                "s": "t",
                "args": { "request": request.0, "ok": ok }
            }),
            RecordedEvent::ScriptRequest { url, token } => json!({
                "ph": "i",
                "name": "ScriptRequest",
                "cat": "Loader",
                "ts": ts,
                "pid": 0,
                "tid": 0,
                "s": "g",
                "args": { "url": url, "token": token }
            }),
            RecordedEvent::ScriptLoaded { token, waiters } => json!({
                "ph": "i",
                "name": "ScriptLoaded",
                "cat": "Loader",
                "ts": ts,
                "pid": 0,
                "tid": 0,
                "s": "g",
                "args": { "token": token, "waiters": waiters }
            }),
            RecordedEvent::Emit { element, name } => json!({
                "ph": "i",
                "name": name,
                "cat": "Emit",
                "ts": ts,
                "pid": 0,
                "tid": element.index,
                "s": "t",
            }),
            RecordedEvent::DeliveryDropped { kind, id } => json!({
                "ph": "i",
                "name": "DeliveryDropped",
                "cat": "Document",
                "ts": ts,
                "pid": 0,
                "tid": 0,
                "s": "p",
                "args": { "kind": format!("{kind:?}"), "id": id }
            }),
        };
        events.push(event);
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use mapsync_core::handle::RequestId;
    use mapsync_core::trace::{
        CompletionEvent, HandleEvent, HandleKind, PassEvent, RequestKind, TraceSink,
    };
    use mapsync_core::tree::ElementTree;

    #[test]
    fn export_produces_valid_json() {
        let element = ElementTree::new().create(());
        let mut rec = RecorderSink::new();
        rec.on_handle(&HandleEvent {
            element,
            kind: HandleKind::Renderer,
            created: true,
        });
        rec.on_completion(&CompletionEvent {
            element,
            request: RequestId(3),
            kind: RequestKind::Route,
            ok: true,
        });
        rec.on_pass(&PassEvent {
            deliveries: 1,
            ..PassEvent::default()
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["ph"], "i");
        assert_eq!(parsed[0]["name"], "CreateHandle");
        assert_eq!(parsed[0]["args"]["kind"], "Renderer");

        assert_eq!(parsed[1]["name"], "RouteComplete");
        assert_eq!(parsed[1]["ts"], 1);

        assert_eq!(parsed[2]["ph"], "C");
        assert_eq!(parsed[2]["args"]["deliveries"], 1);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
