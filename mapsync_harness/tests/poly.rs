// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod common;

use common::{add_point, event_names, map_document, point};
use mapsync_core::component::PathPhase;
use mapsync_core::element::EventDetail;
use mapsync_core::error::Error;
use mapsync_core::handle::{MapHandle, PathHandle, Target};
use mapsync_core::options::PolyOption;
use mapsync_core::trace::Tracer;
use mapsync_core::tree::ElementId;
use mapsync_debug::recorder::{RecordedEvent, RecorderSink, decode};
use mapsync_harness::{Call, FakeDocument};

const ROUTE: [(f64, f64); 3] = [(37.0, -122.0), (37.5, -122.5), (38.0, -121.0)];

/// A map holding one poly built from `points`.
fn poly_document(points: &[(f64, f64)]) -> (FakeDocument, MapHandle, ElementId, PathHandle) {
    let (mut doc, map, handle) = map_document();
    let poly = doc.create_poly();
    for &at in points {
        add_point(&mut doc, poly, at);
    }
    doc.append_child(map, poly);
    doc.flush().unwrap();
    let path = doc.poly(poly).unwrap().path().expect("path is created with the shape");
    (doc, handle, poly, path)
}

#[test]
fn path_follows_points_in_slot_order() {
    let (mut doc, _, poly, path) = poly_document(&ROUTE);
    let expected: Vec<_> = ROUTE.iter().map(|&(lat, lng)| point(lat, lng)).collect();
    assert_eq!(doc.engine().path(path), expected);

    let events = doc.take_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "google-map-poly-path-built");
    assert_eq!(events[0].target, poly);
    assert_eq!(events[0].detail, EventDetail::Path(expected));
}

#[test]
fn inserted_point_rebuilds_in_the_new_order() {
    let (mut doc, _, poly, path) = poly_document(&ROUTE[1..]);
    let first = doc.poly(poly).unwrap();
    assert_eq!(first.phase(), PathPhase::Idle);

    let p = doc.create_point();
    let element = doc.point_mut(p).unwrap();
    element.set_latitude(Some(ROUTE[0].0));
    element.set_longitude(Some(ROUTE[0].1));
    let head = doc.tree().children(poly).next().unwrap();
    doc.insert_before(p, head);
    doc.flush().unwrap();

    let expected: Vec<_> = ROUTE.iter().map(|&(lat, lng)| point(lat, lng)).collect();
    assert_eq!(doc.engine().path(path), expected);
}

#[test]
fn point_without_a_position_fails_the_flush() {
    let (mut doc, _, poly, path) = poly_document(&ROUTE[..1]);
    doc.take_events();
    doc.engine_mut().take_calls();

    let p = doc.create_point();
    doc.point_mut(p).unwrap().set_latitude(Some(1.0));
    doc.append_child(poly, p);
    assert_eq!(
        doc.flush(),
        Err(Error::TypeViolation { field: "longitude" })
    );

    assert_eq!(doc.engine().path(path), [point(ROUTE[0].0, ROUTE[0].1)]);
    assert_eq!(
        doc.engine()
            .count(|c| matches!(c, Call::PathClear(_) | Call::PathPush(..))),
        0
    );
    assert!(doc.take_events().is_empty());
}

#[test]
fn moving_a_point_rebuilds_both_paths() {
    let (mut doc, map, _) = map_document();
    let a = doc.create_poly();
    add_point(&mut doc, a, ROUTE[0]);
    let moved = add_point(&mut doc, a, ROUTE[1]);
    let b = doc.create_poly();
    add_point(&mut doc, b, ROUTE[2]);
    doc.append_child(map, a);
    doc.append_child(map, b);
    doc.flush().unwrap();
    let path_a = doc.poly(a).unwrap().path().unwrap();
    let path_b = doc.poly(b).unwrap().path().unwrap();
    doc.take_events();

    doc.append_child(b, moved);
    doc.flush().unwrap();

    assert_eq!(doc.tree().parent(moved), Some(b));
    assert_eq!(doc.engine().path(path_a), [point(ROUTE[0].0, ROUTE[0].1)]);
    assert_eq!(
        doc.engine().path(path_b),
        [point(ROUTE[2].0, ROUTE[2].1), point(ROUTE[1].0, ROUTE[1].1)]
    );
    let mut built: Vec<_> = doc
        .take_events()
        .into_iter()
        .filter(|e| e.name == "google-map-poly-path-built")
        .map(|e| e.target)
        .collect();
    built.sort();
    let mut expected = vec![a, b];
    expected.sort();
    assert_eq!(built, expected);
}

#[test]
fn reordering_a_point_rebuilds_in_place() {
    let (mut doc, _, poly, path) = poly_document(&ROUTE);
    let children: Vec<_> = doc.tree().children(poly).collect();
    doc.insert_before(children[2], children[0]);
    doc.flush().unwrap();

    let expected: Vec<_> = [ROUTE[2], ROUTE[0], ROUTE[1]]
        .iter()
        .map(|&(lat, lng)| point(lat, lng))
        .collect();
    assert_eq!(doc.engine().path(path), expected);
}

#[test]
fn rebuilding_never_enters_edit_mode() {
    let (mut doc, _, poly, path) = poly_document(&ROUTE[..2]);
    doc.take_events();

    let mut recorder = RecorderSink::new();
    {
        add_point(&mut doc, poly, ROUTE[2]);
        let mut tracer = Tracer::new(&mut recorder);
        doc.flush_traced(&mut tracer).unwrap();
    }

    let mut phases = Vec::new();
    let mut suppressed = 0;
    for event in decode(recorder.as_bytes()) {
        match event {
            RecordedEvent::PathPhase { from, to, .. } => phases.push((from, to)),
            RecordedEvent::SuppressedInsert { .. } => suppressed += 1,
            _ => {}
        }
    }
    assert_eq!(
        phases,
        [
            (PathPhase::Idle, PathPhase::Building),
            (PathPhase::Building, PathPhase::Idle),
        ]
    );
    assert_eq!(suppressed, ROUTE.len());
    assert_eq!(event_names(&mut doc), ["google-map-poly-path-built"]);
    assert!(!doc.poly(poly).unwrap().is_editing());
    assert_eq!(doc.engine().path(path).len(), ROUTE.len());
}

#[test]
fn one_map_click_ends_an_edit() {
    let (mut doc, map, poly, path) = poly_document(&ROUTE[..2]);
    doc.take_events();

    doc.engine_mut().user_insert_vertex(path, 1, point(1.0, 1.0));
    doc.flush().unwrap();
    assert!(doc.poly(poly).unwrap().is_editing());
    doc.engine_mut().user_insert_vertex(path, 1, point(2.0, 2.0));
    doc.flush().unwrap();
    assert!(doc.take_events().is_empty());

    assert_eq!(doc.engine_mut().user_click(Target::Map(map), None), 1);
    doc.flush().unwrap();
    let events = doc.take_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "google-map-poly-path-updated");
    let EventDetail::Path(vertices) = &events[0].detail else {
        panic!("path-updated carries the path, got {:?}", events[0].detail);
    };
    assert_eq!(vertices.len(), 4);
    assert_eq!(doc.poly(poly).unwrap().phase(), PathPhase::Idle);

    // The one-shot subscription is gone.
    assert_eq!(doc.engine_mut().user_click(Target::Map(map), None), 0);
    doc.flush().unwrap();
    assert!(doc.take_events().is_empty());
}

#[test]
fn moved_vertex_writes_back_to_its_point() {
    let (mut doc, _, poly, path) = poly_document(&ROUTE);
    let second = doc.tree().children(poly).nth(1).unwrap();

    doc.engine_mut().user_move_vertex(path, 1, point(40.0, -100.0));
    doc.flush().unwrap();

    assert_eq!(doc.point(second).unwrap().position(), Ok(point(40.0, -100.0)));
    assert!(!doc.poly(poly).unwrap().is_editing());
}

#[test]
fn closing_recreates_the_shape_on_the_same_path() {
    let (mut doc, _, poly, path) = poly_document(&ROUTE);
    let old = doc.poly(poly).unwrap().handle().unwrap();
    doc.engine_mut().take_calls();

    doc.poly_mut(poly).unwrap().set_closed(true);
    doc.flush().unwrap();

    let new = doc.poly(poly).unwrap().handle().unwrap();
    assert_ne!(old, new);
    assert_eq!(doc.poly(poly).unwrap().path(), Some(path));
    let engine = doc.engine();
    assert!(engine.calls().contains(&Call::SetPoly(old, PolyOption::Map(None))));
    assert_eq!(engine.count(|c| matches!(c, Call::CreatePath(_))), 0);
    assert!(engine.poly(new).unwrap().shape.is_closed());
    assert_eq!(engine.path(path).len(), ROUTE.len());
}

#[test]
fn removed_poly_stops_listening() {
    let (mut doc, _, poly, path) = poly_document(&ROUTE);
    let handle = doc.poly(poly).unwrap().handle().unwrap();
    doc.poly_mut(poly).unwrap().set_click_events(true);
    doc.flush().unwrap();
    assert_eq!(doc.engine().live_listeners(Target::Poly(handle), "click"), 1);

    doc.remove(poly);
    doc.flush().unwrap();
    assert_eq!(doc.engine().live_listeners(Target::Poly(handle), "click"), 0);
    assert_eq!(
        doc.engine().calls().last(),
        Some(&Call::SetPoly(handle, PolyOption::Map(None)))
    );
    // The path keeps its edit subscriptions for a later reconnect.
    assert_eq!(doc.engine().live_listeners(Target::Path(path), "insert_at"), 1);
}

#[test]
fn closing_mid_edit_drops_the_armed_click() {
    let (mut doc, map, poly, path) = poly_document(&ROUTE[..2]);
    doc.take_events();

    doc.engine_mut().user_insert_vertex(path, 1, point(1.0, 1.0));
    doc.flush().unwrap();
    assert!(doc.poly(poly).unwrap().is_editing());
    assert_eq!(doc.engine().live_listeners(Target::Map(map), "click"), 1);

    doc.poly_mut(poly).unwrap().set_closed(true);
    doc.flush().unwrap();
    assert_eq!(doc.poly(poly).unwrap().phase(), PathPhase::Idle);
    assert_eq!(doc.engine().live_listeners(Target::Map(map), "click"), 0);
    assert_eq!(doc.engine().path(path).len(), 3, "edited vertices stay");

    assert_eq!(doc.engine_mut().user_click(Target::Map(map), None), 0);
    doc.flush().unwrap();
    assert!(doc.take_events().is_empty());

    // A later edit arms a fresh click.
    doc.engine_mut().user_insert_vertex(path, 0, point(2.0, 2.0));
    doc.flush().unwrap();
    assert!(doc.poly(poly).unwrap().is_editing());
    assert_eq!(doc.engine().live_listeners(Target::Map(map), "click"), 1);
}
