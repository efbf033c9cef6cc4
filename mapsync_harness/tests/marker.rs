// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod common;

use common::{add_marker, event_names, map_document, point};
use mapsync_core::engine::EventPayload;
use mapsync_core::handle::{MarkerHandle, Target};
use mapsync_core::options::MarkerOption;
use mapsync_core::tree::ElementId;
use mapsync_harness::{Call, FakeDocument};

/// A map holding one created marker at (10, 20).
fn marker_document() -> (FakeDocument, ElementId, ElementId, MarkerHandle) {
    let (mut doc, map, _) = map_document();
    let marker = add_marker(&mut doc, map, (10.0, 20.0));
    doc.flush().unwrap();
    let handle = doc.marker(marker).unwrap().handle().unwrap();
    doc.engine_mut().take_calls();
    doc.take_events();
    (doc, map, marker, handle)
}

#[test]
fn marker_is_created_on_the_map_at_its_position() {
    let (doc, map, _, handle) = marker_document();
    let options = &doc.engine().marker(handle).unwrap().options;
    assert_eq!(options.map, doc.map(map).unwrap().handle());
    assert_eq!(options.position, Some(point(10.0, 20.0)));
}

#[test]
fn moving_a_marker_updates_the_engine_marker() {
    let (mut doc, _, marker, handle) = marker_document();
    doc.marker_mut(marker).unwrap().set_latitude(Some(11.0));
    doc.flush().unwrap();
    assert_eq!(
        doc.engine().calls(),
        [Call::SetMarker(handle, MarkerOption::Position(point(11.0, 20.0)))]
    );
}

#[test]
fn content_moves_into_the_info_window() {
    let (mut doc, _, marker, _) = marker_document();
    let bubble = doc.create_host("bubble");
    doc.append_child(marker, bubble);
    doc.flush().unwrap();

    let info = doc.marker(marker).unwrap().info_window().unwrap();
    assert_eq!(doc.engine().info_window(info).unwrap().content, ["bubble"]);
    assert_eq!(doc.tree().children(marker).count(), 0);
}

#[test]
fn click_opens_and_closeclick_closes() {
    let (mut doc, map, _, _) = map_document();
    let marker = add_marker(&mut doc, map, (1.0, 2.0));
    let bubble = doc.create_host("bubble");
    doc.append_child(marker, bubble);
    doc.flush().unwrap();
    let handle = doc.marker(marker).unwrap().handle().unwrap();
    let info = doc.marker(marker).unwrap().info_window().unwrap();
    // A created window starts closed.
    assert_eq!(event_names(&mut doc), ["google-map-marker-close"]);

    assert_eq!(doc.engine_mut().user_click(Target::Marker(handle), None), 1);
    doc.flush().unwrap();
    assert!(doc.marker(marker).unwrap().is_open());
    assert_eq!(doc.engine().info_window(info).unwrap().anchor, Some(handle));
    assert_eq!(event_names(&mut doc), ["google-map-marker-open"]);

    let fired = doc
        .engine_mut()
        .fire(Target::InfoWindow(info), "closeclick", EventPayload::None);
    assert_eq!(fired, 1);
    doc.flush().unwrap();
    assert!(!doc.marker(marker).unwrap().is_open());
    assert_eq!(doc.engine().info_window(info).unwrap().anchor, None);
    assert_eq!(event_names(&mut doc), ["google-map-marker-close"]);
}

#[test]
fn drag_end_writes_the_position_back() {
    let (mut doc, _, marker, handle) = marker_document();
    let target = Target::Marker(handle);
    doc.marker_mut(marker).unwrap().set_draggable(true);
    doc.flush().unwrap();
    assert_eq!(doc.engine().live_listeners(target, "dragend"), 1);

    doc.engine_mut().user_drag_marker(handle, point(12.5, 21.5));
    doc.flush().unwrap();
    let element = doc.marker(marker).unwrap();
    assert_eq!(element.latitude(), Some(12.5));
    assert_eq!(element.longitude(), Some(21.5));

    doc.marker_mut(marker).unwrap().set_draggable(false);
    doc.flush().unwrap();
    assert_eq!(doc.engine().live_listeners(target, "dragend"), 0);
}

#[test]
fn reconnected_marker_listens_exactly_once() {
    let (mut doc, map, marker, handle) = marker_document();
    let target = Target::Marker(handle);
    doc.marker_mut(marker).unwrap().set_click_events(true);
    doc.flush().unwrap();
    assert_eq!(doc.engine().live_listeners(target, "click"), 1);

    doc.remove(marker);
    doc.flush().unwrap();
    assert_eq!(doc.engine().live_listeners(target, "click"), 0);
    assert_eq!(doc.engine().marker(handle).unwrap().options.map, None);

    doc.append_child(map, marker);
    doc.flush().unwrap();
    assert_eq!(doc.marker(marker).unwrap().handle(), Some(handle));
    assert_eq!(doc.engine().live_listeners(target, "click"), 1);
    assert_eq!(
        doc.engine().marker(handle).unwrap().options.map,
        doc.map(map).unwrap().handle()
    );

    assert_eq!(doc.engine_mut().user_click(target, None), 1);
    doc.flush().unwrap();
    assert_eq!(event_names(&mut doc), ["google-map-marker-click"]);
}

#[test]
fn destroy_removes_every_subscription() {
    let (mut doc, _, marker, handle) = marker_document();
    let bubble = doc.create_host("bubble");
    doc.append_child(marker, bubble);
    let element = doc.marker_mut(marker).unwrap();
    element.set_click_events(true);
    element.set_draggable(true);
    doc.flush().unwrap();
    let info = doc.marker(marker).unwrap().info_window().unwrap();

    let owned = doc.listener_count(marker);
    assert!(owned > 0);
    let before = doc.engine().listener_total();

    doc.destroy(marker).unwrap();
    assert_eq!(doc.engine().listener_total(), before - owned);
    assert_eq!(doc.engine().live_listeners(Target::Marker(handle), "click"), 0);
    assert_eq!(
        doc.engine()
            .live_listeners(Target::InfoWindow(info), "closeclick"),
        0
    );
}

#[test]
fn destroy_releases_relocated_content() {
    let (mut doc, _, marker, _) = marker_document();
    let bubble = doc.create_host("bubble");
    let caption = doc.create_host("caption");
    doc.append_child(bubble, caption);
    doc.append_child(marker, bubble);
    let note = doc.create_host("note");
    doc.append_child(marker, note);
    doc.flush().unwrap();
    assert_eq!(doc.tree().children(marker).count(), 0);

    // The host takes `note` back before the marker goes away.
    let panel = doc.create_host("panel");
    doc.append_child(panel, note);

    doc.destroy(marker).unwrap();
    assert_eq!(doc.kind(marker), None);
    assert_eq!(doc.kind(bubble), None);
    assert_eq!(doc.kind(caption), None);
    assert!(doc.tree().is_alive(note));
    assert_eq!(doc.tree().parent(note), Some(panel));
}
