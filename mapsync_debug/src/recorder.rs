// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as little-endian records, strings prefixed with a `u32` length.
//! [`decode`] reads them back as an iterator of [`RecordedEvent`].
//!
//! Dropped deliveries store only their kind and id.

use mapsync_core::component::PathPhase;
use mapsync_core::engine::Delivery;
use mapsync_core::handle::{ListenerId, RequestId};
use mapsync_core::trace::{
    CompletionEvent, EmitEvent, HandleEvent, HandleKind, ListenerEvent, PassEvent,
    PathPhaseEvent, RequestEvent, RequestKind, ScriptLoadedEvent, ScriptRequestEvent, TraceSink,
};
use mapsync_core::tree::ElementId;

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_HANDLE: u8 = 1;
const TAG_LISTENER_ADDED: u8 = 2;
const TAG_LISTENER_REMOVED: u8 = 3;
const TAG_PASS: u8 = 4;
const TAG_PASS_OVERFLOW: u8 = 5;
const TAG_PATH_PHASE: u8 = 6;
const TAG_SUPPRESSED_INSERT: u8 = 7;
const TAG_REQUEST: u8 = 8;
const TAG_COMPLETION: u8 = 9;
const TAG_SCRIPT_REQUEST: u8 = 10;
const TAG_SCRIPT_LOADED: u8 = 11;
const TAG_EMIT: u8 = 12;
const TAG_DELIVERY_DROPPED: u8 = 13;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_count(&mut self, v: usize) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "per-pass counts capped at u32::MAX for recording"
        )]
        self.write_u32(v.min(u32::MAX as usize) as u32);
    }

    fn write_str(&mut self, s: &str) {
        self.write_count(s.len());
        self.buf.extend_from_slice(s.as_bytes());
    }

    fn write_element(&mut self, id: ElementId) {
        self.write_u32(id.index());
        self.write_u32(id.generation());
    }

    fn write_handle_kind(&mut self, kind: HandleKind) {
        self.write_u8(match kind {
            HandleKind::Map => 0,
            HandleKind::Marker => 1,
            HandleKind::InfoWindow => 2,
            HandleKind::Poly => 3,
            HandleKind::Path => 4,
            HandleKind::Renderer => 5,
            HandleKind::Kml => 6,
        });
    }

    fn write_request_kind(&mut self, kind: RequestKind) {
        self.write_u8(match kind {
            RequestKind::Route => 0,
            RequestKind::TextSearch => 1,
            RequestKind::PlaceDetails => 2,
        });
    }

    fn write_phase(&mut self, phase: PathPhase) {
        self.write_u8(match phase {
            PathPhase::Idle => 0,
            PathPhase::Building => 1,
            PathPhase::Editing => 2,
        });
    }

    fn write_listener(&mut self, tag: u8, e: &ListenerEvent) {
        self.write_u8(tag);
        self.write_element(e.element);
        self.write_u32(e.listener.0);
        self.write_str(e.name);
        self.write_u8(u8::from(e.once));
    }
}

impl TraceSink for RecorderSink {
    fn on_handle(&mut self, e: &HandleEvent) {
        self.write_u8(TAG_HANDLE);
        self.write_element(e.element);
        self.write_handle_kind(e.kind);
        self.write_u8(u8::from(e.created));
    }

    fn on_listener_added(&mut self, e: &ListenerEvent) {
        self.write_listener(TAG_LISTENER_ADDED, e);
    }

    fn on_listener_removed(&mut self, e: &ListenerEvent) {
        self.write_listener(TAG_LISTENER_REMOVED, e);
    }

    fn on_pass(&mut self, e: &PassEvent) {
        self.write_u8(TAG_PASS);
        self.write_u32(e.pass);
        self.write_count(e.scripts_loaded);
        self.write_count(e.lifecycle);
        self.write_count(e.deliveries);
        self.write_count(e.slot_changes);
        self.write_count(e.reconciled);
    }

    fn on_pass_overflow(&mut self, max_passes: u32) {
        self.write_u8(TAG_PASS_OVERFLOW);
        self.write_u32(max_passes);
    }

    fn on_path_phase(&mut self, e: &PathPhaseEvent) {
        self.write_u8(TAG_PATH_PHASE);
        self.write_element(e.element);
        self.write_phase(e.from);
        self.write_phase(e.to);
    }

    fn on_suppressed_insert(&mut self, element: ElementId, listener: ListenerId) {
        self.write_u8(TAG_SUPPRESSED_INSERT);
        self.write_element(element);
        self.write_u32(listener.0);
    }

    fn on_request(&mut self, e: &RequestEvent) {
        self.write_u8(TAG_REQUEST);
        self.write_element(e.element);
        self.write_u32(e.request.0);
        self.write_request_kind(e.kind);
    }

    fn on_completion(&mut self, e: &CompletionEvent) {
        self.write_u8(TAG_COMPLETION);
        self.write_element(e.element);
        self.write_u32(e.request.0);
        self.write_request_kind(e.kind);
        self.write_u8(u8::from(e.ok));
    }

    fn on_script_request(&mut self, e: &ScriptRequestEvent<'_>) {
        self.write_u8(TAG_SCRIPT_REQUEST);
        self.write_str(e.url);
        self.write_str(e.token);
    }

    fn on_script_loaded(&mut self, e: &ScriptLoadedEvent<'_>) {
        self.write_u8(TAG_SCRIPT_LOADED);
        self.write_str(e.token);
        self.write_count(e.waiters);
    }

    fn on_emit(&mut self, e: &EmitEvent<'_>) {
        self.write_u8(TAG_EMIT);
        self.write_element(e.element);
        self.write_str(e.name);
    }

    fn on_delivery_dropped(&mut self, delivery: &Delivery) {
        let (kind, id) = match delivery {
            Delivery::Event { listener, .. } => (DroppedKind::Event, listener.0),
            Delivery::Route { request, .. } => (DroppedKind::Route, request.0),
            Delivery::Search { request, .. } => (DroppedKind::Search, request.0),
            Delivery::Details { request, .. } => (DroppedKind::Details, request.0),
        };
        self.write_u8(TAG_DELIVERY_DROPPED);
        self.write_u8(kind as u8);
        self.write_u32(id);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// An element identity as recorded.
///
/// [`ElementId`] cannot be rebuilt outside its tree, so recordings keep the
/// raw index and generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecordedElement {
    /// Slot index.
    pub index: u32,
    /// Generation counter.
    pub generation: u32,
}

/// Which kind of delivery was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum DroppedKind {
    /// An event for a removed subscription.
    Event = 0,
    /// A routing completion.
    Route = 1,
    /// A text-search completion.
    Search = 2,
    /// A place-detail completion.
    Details = 3,
}

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`HandleEvent`].
    Handle {
        /// Owning element.
        element: RecordedElement,
        /// Object kind.
        kind: HandleKind,
        /// Creation or release.
        created: bool,
    },
    /// A [`ListenerEvent`] from `on_listener_added` or `on_listener_removed`.
    Listener {
        /// Owning element.
        element: RecordedElement,
        /// The subscription.
        listener: ListenerId,
        /// Engine event name.
        name: String,
        /// One-shot subscription.
        once: bool,
        /// `true` when added, `false` when removed.
        added: bool,
    },
    /// A [`PassEvent`].
    Pass(PassEvent),
    /// A flush stopped at its pass limit.
    PassOverflow {
        /// The limit.
        max_passes: u32,
    },
    /// A [`PathPhaseEvent`].
    PathPhase {
        /// The poly element.
        element: RecordedElement,
        /// Previous phase.
        from: PathPhase,
        /// New phase.
        to: PathPhase,
    },
    /// A vertex insertion discarded during path repopulation.
    SuppressedInsert {
        /// The poly element.
        element: RecordedElement,
        /// The `insert_at` subscription.
        listener: ListenerId,
    },
    /// A [`RequestEvent`].
    Request {
        /// Requesting element.
        element: RecordedElement,
        /// Engine request id.
        request: RequestId,
        /// Service kind.
        kind: RequestKind,
    },
    /// A [`CompletionEvent`].
    Completion {
        /// Requesting element.
        element: RecordedElement,
        /// Engine request id.
        request: RequestId,
        /// Service kind.
        kind: RequestKind,
        /// Whether the status was OK.
        ok: bool,
    },
    /// A [`ScriptRequestEvent`].
    ScriptRequest {
        /// Full request URL.
        url: String,
        /// Completion token.
        token: String,
    },
    /// A [`ScriptLoadedEvent`].
    ScriptLoaded {
        /// Completion token.
        token: String,
        /// Number of waiting elements.
        waiters: u32,
    },
    /// An [`EmitEvent`].
    Emit {
        /// Emitting element.
        element: RecordedElement,
        /// Event name.
        name: String,
    },
    /// A delivery with no live recipient.
    DeliveryDropped {
        /// Delivery kind.
        kind: DroppedKind,
        /// Listener or request id.
        id: u32,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        let v = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn read_count(&mut self) -> Option<usize> {
        usize::try_from(self.read_u32()?).ok()
    }

    fn read_str(&mut self) -> Option<String> {
        let len = self.read_count()?;
        if self.remaining() < len {
            return None;
        }
        let s = core::str::from_utf8(&self.data[self.pos..self.pos + len]).ok()?;
        self.pos += len;
        Some(s.to_owned())
    }

    fn read_element(&mut self) -> Option<RecordedElement> {
        Some(RecordedElement {
            index: self.read_u32()?,
            generation: self.read_u32()?,
        })
    }

    fn read_handle_kind(&mut self) -> Option<HandleKind> {
        Some(match self.read_u8()? {
            0 => HandleKind::Map,
            1 => HandleKind::Marker,
            2 => HandleKind::InfoWindow,
            3 => HandleKind::Poly,
            4 => HandleKind::Path,
            5 => HandleKind::Renderer,
            _ => HandleKind::Kml,
        })
    }

    fn read_request_kind(&mut self) -> Option<RequestKind> {
        Some(match self.read_u8()? {
            0 => RequestKind::Route,
            1 => RequestKind::TextSearch,
            _ => RequestKind::PlaceDetails,
        })
    }

    fn read_phase(&mut self) -> Option<PathPhase> {
        Some(match self.read_u8()? {
            0 => PathPhase::Idle,
            1 => PathPhase::Building,
            _ => PathPhase::Editing,
        })
    }

    fn read_dropped_kind(&mut self) -> Option<DroppedKind> {
        Some(match self.read_u8()? {
            0 => DroppedKind::Event,
            1 => DroppedKind::Route,
            2 => DroppedKind::Search,
            _ => DroppedKind::Details,
        })
    }

    fn decode_listener(&mut self, added: bool) -> Option<RecordedEvent> {
        Some(RecordedEvent::Listener {
            element: self.read_element()?,
            listener: ListenerId(self.read_u32()?),
            name: self.read_str()?,
            once: self.read_bool()?,
            added,
        })
    }

    fn decode_pass(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Pass(PassEvent {
            pass: self.read_u32()?,
            scripts_loaded: self.read_count()?,
            lifecycle: self.read_count()?,
            deliveries: self.read_count()?,
            slot_changes: self.read_count()?,
            reconciled: self.read_count()?,
        }))
    }

    fn decode_next(&mut self, tag: u8) -> Option<RecordedEvent> {
        Some(match tag {
            TAG_HANDLE => RecordedEvent::Handle {
                element: self.read_element()?,
                kind: self.read_handle_kind()?,
                created: self.read_bool()?,
            },
            TAG_LISTENER_ADDED => return self.decode_listener(true),
            TAG_LISTENER_REMOVED => return self.decode_listener(false),
            TAG_PASS => return self.decode_pass(),
            TAG_PASS_OVERFLOW => RecordedEvent::PassOverflow {
                max_passes: self.read_u32()?,
            },
            TAG_PATH_PHASE => RecordedEvent::PathPhase {
                element: self.read_element()?,
                from: self.read_phase()?,
                to: self.read_phase()?,
            },
            TAG_SUPPRESSED_INSERT => RecordedEvent::SuppressedInsert {
                element: self.read_element()?,
                listener: ListenerId(self.read_u32()?),
            },
            TAG_REQUEST => RecordedEvent::Request {
                element: self.read_element()?,
                request: RequestId(self.read_u32()?),
                kind: self.read_request_kind()?,
            },
            TAG_COMPLETION => RecordedEvent::Completion {
                element: self.read_element()?,
                request: RequestId(self.read_u32()?),
                kind: self.read_request_kind()?,
                ok: self.read_bool()?,
            },
            TAG_SCRIPT_REQUEST => RecordedEvent::ScriptRequest {
                url: self.read_str()?,
                token: self.read_str()?,
            },
            TAG_SCRIPT_LOADED => RecordedEvent::ScriptLoaded {
                token: self.read_str()?,
                waiters: self.read_u32()?,
            },
            TAG_EMIT => RecordedEvent::Emit {
                element: self.read_element()?,
                name: self.read_str()?,
            },
            TAG_DELIVERY_DROPPED => RecordedEvent::DeliveryDropped {
                kind: self.read_dropped_kind()?,
                id: self.read_u32()?,
            },
            _ => return None, // unknown tag → stop iteration
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        self.decode_next(tag)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use mapsync_core::tree::ElementTree;

    fn element() -> (ElementId, RecordedElement) {
        let mut tree = ElementTree::new();
        tree.create(());
        let id = tree.create(());
        (
            id,
            RecordedElement {
                index: 1,
                generation: id.generation(),
            },
        )
    }

    #[test]
    fn listener_names_survive_recording() {
        let (id, recorded) = element();
        let mut rec = RecorderSink::new();
        rec.on_listener_added(&ListenerEvent {
            element: id,
            listener: ListenerId(12),
            name: "insert_at",
            once: false,
        });
        rec.on_listener_removed(&ListenerEvent {
            element: id,
            listener: ListenerId(12),
            name: "insert_at",
            once: false,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(
            events,
            [
                RecordedEvent::Listener {
                    element: recorded,
                    listener: ListenerId(12),
                    name: "insert_at".into(),
                    once: false,
                    added: true,
                },
                RecordedEvent::Listener {
                    element: recorded,
                    listener: ListenerId(12),
                    name: "insert_at".into(),
                    once: false,
                    added: false,
                },
            ]
        );
    }

    #[test]
    fn mixed_stream_decodes_in_order() {
        let (id, recorded) = element();
        let mut rec = RecorderSink::new();
        rec.on_script_request(&ScriptRequestEvent {
            url: "https://maps.googleapis.com/maps/api/js?callback=__mapsync_loaded_0",
            token: "__mapsync_loaded_0",
        });
        rec.on_path_phase(&PathPhaseEvent {
            element: id,
            from: PathPhase::Idle,
            to: PathPhase::Building,
        });
        rec.on_pass(&PassEvent {
            pass: 2,
            reconciled: 3,
            ..PassEvent::default()
        });
        rec.on_delivery_dropped(&Delivery::Search {
            request: RequestId(9),
            status: mapsync_core::service::PlacesStatus::ZeroResults,
            results: Vec::new(),
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(
            &events[0],
            RecordedEvent::ScriptRequest { token, .. } if token == "__mapsync_loaded_0"
        ));
        assert_eq!(
            events[1],
            RecordedEvent::PathPhase {
                element: recorded,
                from: PathPhase::Idle,
                to: PathPhase::Building,
            }
        );
        match &events[2] {
            RecordedEvent::Pass(p) => {
                assert_eq!(p.pass, 2);
                assert_eq!(p.reconciled, 3);
            }
            other => panic!("expected Pass, got {other:?}"),
        }
        assert_eq!(
            events[3],
            RecordedEvent::DeliveryDropped {
                kind: DroppedKind::Search,
                id: 9,
            }
        );
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let (id, _) = element();
        let mut rec = RecorderSink::new();
        rec.on_emit(&EmitEvent {
            element: id,
            name: "google-map-ready",
        });
        let bytes = rec.into_bytes();
        assert_eq!(decode(&bytes[..bytes.len() - 3]).count(), 0);
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }
}
