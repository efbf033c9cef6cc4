// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![expect(dead_code, reason = "each test binary uses a subset of the helpers")]

use mapsync_core::geo::GeoPoint;
use mapsync_core::handle::MapHandle;
use mapsync_core::tree::ElementId;
use mapsync_harness::{FakeDocument, loaded_document};

/// A loaded document with one mounted, created map. The call log and event
/// queue start empty.
pub(crate) fn map_document() -> (FakeDocument, ElementId, MapHandle) {
    let mut doc = loaded_document();
    let map = doc.create_map();
    doc.attach_container(map, "canvas").unwrap();
    doc.mount(map);
    doc.flush().unwrap();
    let handle = doc
        .map(map)
        .unwrap()
        .handle()
        .expect("a loaded map with a container is created on flush");
    doc.engine_mut().take_calls();
    doc.take_events();
    (doc, map, handle)
}

pub(crate) fn point(lat: f64, lng: f64) -> GeoPoint {
    GeoPoint::new(lat, lng).unwrap()
}

/// Names of the events emitted since the last call.
pub(crate) fn event_names(doc: &mut FakeDocument) -> Vec<String> {
    doc.take_events().into_iter().map(|e| e.name).collect()
}

/// Creates a point element at `at` and appends it to `parent`.
pub(crate) fn add_point(doc: &mut FakeDocument, parent: ElementId, at: (f64, f64)) -> ElementId {
    let p = doc.create_point();
    let point = doc.point_mut(p).unwrap();
    point.set_latitude(Some(at.0));
    point.set_longitude(Some(at.1));
    doc.append_child(parent, p);
    p
}

/// Creates a marker at `at` in the `markers` slot of `map`.
pub(crate) fn add_marker(doc: &mut FakeDocument, map: ElementId, at: (f64, f64)) -> ElementId {
    let m = doc.create_marker();
    doc.set_slot(m, Some("markers"));
    let marker = doc.marker_mut(m).unwrap();
    marker.set_latitude(Some(at.0));
    marker.set_longitude(Some(at.1));
    doc.append_child(map, m);
    m
}
