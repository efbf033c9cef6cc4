// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod common;

use common::{add_marker, event_names, map_document, point};
use mapsync_core::error::Error;
use mapsync_core::geo::GeoBounds;
use mapsync_core::handle::Target;
use mapsync_harness::{Call, FakeDocument, FakeEngine, FakeScripts, loaded_document};

#[test]
fn map_is_created_centered_and_announces_readiness() {
    let mut doc = loaded_document();
    let map = doc.create_map();
    doc.attach_container(map, "canvas").unwrap();
    doc.mount(map);
    doc.flush().unwrap();

    let element = doc.map(map).unwrap();
    let handle = element.handle().unwrap();
    let declared = point(element.latitude(), element.longitude());
    let created = doc.engine().map(handle).unwrap();
    assert_eq!(created.container, "canvas");
    assert_eq!(created.center, Some(declared));

    let events = doc.take_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "google-map-ready");
    assert_eq!(events[0].target, map);
}

#[test]
fn map_without_a_container_waits() {
    let mut doc = loaded_document();
    let map = doc.create_map();
    doc.mount(map);
    doc.flush().unwrap();
    assert_eq!(doc.map(map).unwrap().handle(), None);

    doc.attach_container(map, "late").unwrap();
    doc.flush().unwrap();
    assert!(doc.map(map).unwrap().handle().is_some());
    assert_eq!(event_names(&mut doc), ["google-map-ready"]);
}

#[test]
fn maps_sharing_a_script_wait_for_one_load() {
    let mut doc = FakeDocument::new(FakeEngine::new(), FakeScripts::new());
    let first = doc.create_map();
    let second = doc.create_map();
    for (map, node) in [(first, "a"), (second, "b")] {
        doc.map_mut(map).unwrap().set_api_key("k");
        doc.attach_container(map, node).unwrap();
        doc.mount(map);
    }
    doc.flush().unwrap();

    assert_eq!(doc.scripts().requests().len(), 1);
    assert!(doc.is_loading());
    assert_eq!(doc.engine().count(|c| matches!(c, Call::CreateMap(_))), 0);

    let request = doc.scripts().requests()[0].clone();
    assert!(request.url.contains("key=k"), "got {}", request.url);
    assert!(request.url.contains(&request.token), "got {}", request.url);

    doc.scripts_mut().complete(&request.token);
    doc.flush().unwrap();
    assert!(!doc.is_loading());
    assert_eq!(doc.engine().count(|c| matches!(c, Call::CreateMap(_))), 2);
    assert_eq!(
        event_names(&mut doc),
        ["google-map-ready", "google-map-ready"]
    );

    // A second completion of the same token does nothing.
    doc.scripts_mut().complete(&request.token);
    doc.flush().unwrap();
    assert_eq!(doc.engine().count(|c| matches!(c, Call::CreateMap(_))), 2);
    assert!(doc.take_events().is_empty());
}

#[test]
fn different_script_parameters_load_separately() {
    let mut doc = FakeDocument::new(FakeEngine::new(), FakeScripts::new());
    let map = doc.create_map();
    doc.map_mut(map).unwrap().set_api_key("one");
    doc.attach_container(map, "canvas").unwrap();
    doc.mount(map);
    let directions = doc.create_directions();
    doc.directions_mut(directions).unwrap().set_api_key("two");
    doc.mount(directions);
    doc.flush().unwrap();

    let requests = doc.scripts().requests();
    assert_eq!(requests.len(), 2);
    assert_ne!(requests[0].token, requests[1].token);
}

#[test]
fn non_finite_center_is_rejected_before_any_engine_call() {
    let (mut doc, map, _) = map_document();
    let before = doc.map(map).unwrap().latitude();

    assert_eq!(
        doc.map_mut(map).unwrap().set_latitude(f64::NAN),
        Err(Error::TypeViolation { field: "latitude" })
    );
    assert_eq!(
        doc.set_attribute(map, "longitude", Some("west")),
        Err(Error::TypeViolation { field: "longitude" })
    );
    doc.flush().unwrap();
    doc.tick().unwrap();

    assert!(doc.engine().calls().is_empty(), "{:?}", doc.engine().calls());
    assert_eq!(doc.map(map).unwrap().latitude(), before);
}

#[test]
fn declared_center_is_panned_on_tick() {
    let (mut doc, map, handle) = map_document();
    let lng = doc.map(map).unwrap().longitude();

    doc.map_mut(map).unwrap().set_latitude(10.0).unwrap();
    doc.flush().unwrap();
    assert!(doc.has_deferred());
    assert!(doc.engine().calls().is_empty());

    doc.tick().unwrap();
    assert!(!doc.has_deferred());
    assert_eq!(
        doc.engine().calls(),
        [Call::PanTo(handle, point(10.0, lng))]
    );
}

#[test]
fn user_pan_and_zoom_flow_back_without_echo() {
    let (mut doc, map, handle) = map_document();

    doc.engine_mut().user_pan(handle, point(48.85, 2.35));
    doc.engine_mut().user_zoom(handle, 14.0);
    doc.flush().unwrap();
    doc.tick().unwrap();

    let element = doc.map(map).unwrap();
    assert_eq!((element.latitude(), element.longitude()), (48.85, 2.35));
    assert_eq!(element.zoom(), 14.0);
    // The engine already shows the new center.
    assert_eq!(doc.engine().count(|c| matches!(c, Call::PanTo(..))), 0);
    assert_eq!(doc.engine().map(handle).unwrap().zoom, 14.0);
}

#[test]
fn resize_keeps_the_declared_center() {
    let (mut doc, map, handle) = map_document();
    let element = doc.map(map).unwrap();
    let declared = (element.latitude(), element.longitude());

    doc.engine_mut().set_resize_drift(Some(point(0.0, 0.0)));
    doc.resize(map).unwrap();
    let element = doc.map(map).unwrap();
    assert_eq!((element.latitude(), element.longitude()), declared);

    doc.flush().unwrap();
    doc.tick().unwrap();
    assert_eq!(
        doc.engine().map(handle).unwrap().center,
        Some(point(declared.0, declared.1))
    );
}

#[test]
fn fit_to_markers_with_no_markers_does_nothing() {
    let (mut doc, map, _) = map_document();
    doc.map_mut(map).unwrap().set_fit_to_markers(true);
    doc.flush().unwrap();
    assert!(doc.engine().calls().is_empty());
}

#[test]
fn fit_to_a_single_marker_only_centers() {
    let (mut doc, map, handle) = map_document();
    doc.map_mut(map).unwrap().set_fit_to_markers(true);
    doc.flush().unwrap();
    add_marker(&mut doc, map, (10.0, 20.0));
    doc.flush().unwrap();

    assert_eq!(doc.engine().count(|c| matches!(c, Call::FitBounds(..))), 0);
    assert!(
        doc.engine()
            .calls()
            .contains(&Call::SetCenter(handle, point(10.0, 20.0)))
    );
}

#[test]
fn fit_to_several_markers_fits_then_centers() {
    let (mut doc, map, handle) = map_document();
    doc.map_mut(map).unwrap().set_fit_to_markers(true);
    doc.flush().unwrap();
    add_marker(&mut doc, map, (0.0, 0.0));
    add_marker(&mut doc, map, (10.0, 20.0));
    doc.flush().unwrap();

    let viewport: Vec<Call> = doc
        .engine()
        .calls()
        .iter()
        .filter(|c| matches!(c, Call::FitBounds(..) | Call::SetCenter(..)))
        .cloned()
        .collect();
    let bounds = GeoBounds::from_corners(point(0.0, 0.0), point(10.0, 20.0));
    assert_eq!(
        viewport,
        [
            Call::FitBounds(handle, bounds),
            Call::SetCenter(handle, point(5.0, 10.0)),
        ]
    );
    // The new center flows back into the declared properties.
    let element = doc.map(map).unwrap();
    assert_eq!((element.latitude(), element.longitude()), (5.0, 10.0));
}

#[test]
fn event_group_toggles_never_duplicate() {
    let (mut doc, map, handle) = map_document();
    let target = Target::Map(handle);

    for enabled in [true, false, true] {
        doc.map_mut(map).unwrap().set_click_events(enabled);
        doc.flush().unwrap();
    }
    assert_eq!(doc.engine().live_listeners(target, "click"), 1);

    assert_eq!(doc.engine_mut().user_click(target, Some(point(1.0, 2.0))), 1);
    doc.flush().unwrap();
    assert_eq!(event_names(&mut doc), ["google-map-click"]);

    doc.map_mut(map).unwrap().set_click_events(false);
    doc.flush().unwrap();
    assert_eq!(doc.engine().live_listeners(target, "click"), 0);
    assert_eq!(doc.engine_mut().user_click(target, None), 0);
}

#[test]
fn kml_layer_is_replaced_not_stacked() {
    let (mut doc, map, _) = map_document();
    doc.map_mut(map).unwrap().set_kml(Some("a.kml".into()));
    doc.flush().unwrap();
    doc.map_mut(map).unwrap().set_kml(Some("b.kml".into()));
    doc.flush().unwrap();
    assert_eq!(doc.engine().kml_layer_count(), 1);
    assert_eq!(doc.engine().count(|c| matches!(c, Call::RemoveKml(_))), 1);

    doc.map_mut(map).unwrap().set_kml(None);
    doc.flush().unwrap();
    assert_eq!(doc.engine().kml_layer_count(), 0);
}

#[test]
fn clear_markers_detaches_engine_markers() {
    let (mut doc, map, _) = map_document();
    let marker = add_marker(&mut doc, map, (1.0, 1.0));
    doc.flush().unwrap();
    let handle = doc.marker(marker).unwrap().handle().unwrap();
    assert!(doc.engine().marker(handle).unwrap().options.map.is_some());

    doc.clear_markers(map).unwrap();
    assert_eq!(doc.engine().marker(handle).unwrap().options.map, None);
    assert_eq!(doc.map(map).unwrap().markers(), [marker]);
}

#[test]
fn accessors_check_the_element_kind() {
    let mut doc = loaded_document();
    let marker = doc.create_marker();
    assert!(matches!(doc.map(marker), Err(Error::WrongKind { .. })));
    doc.destroy(marker).unwrap();
    assert_eq!(doc.marker(marker).err(), Some(Error::StaleElement(marker)));
}
