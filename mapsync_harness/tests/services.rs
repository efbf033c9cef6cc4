// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod common;

use common::{event_names, map_document, point};
use mapsync_core::element::EventDetail;
use mapsync_core::error::Error;
use mapsync_core::geo::GeoBounds;
use mapsync_core::handle::{MapHandle, RequestId};
use mapsync_core::service::{
    DirectionsResult, DirectionsRoute, DirectionsStatus, PlaceGeometry, PlaceResult,
    PlacesStatus, SearchScope, TravelMode, Waypoint,
};
use mapsync_core::tree::ElementId;
use mapsync_harness::{Call, FakeDocument, FakeEngine, FakeScripts};

fn route(summary: &str) -> DirectionsResult {
    DirectionsResult {
        routes: vec![DirectionsRoute {
            summary: summary.into(),
            legs: Vec::new(),
            overview_path: vec![point(37.8, -122.27), point(37.33, -121.89)],
        }],
    }
}

fn place(id: &str, at: (f64, f64)) -> PlaceResult {
    PlaceResult {
        place_id: Some(id.into()),
        name: Some(format!("Place {id}")),
        geometry: Some(PlaceGeometry {
            location: Some(point(at.0, at.1)),
            viewport: None,
        }),
        ..PlaceResult::default()
    }
}

/// A map holding one directions element with both addresses set.
fn directions_document() -> (FakeDocument, MapHandle, ElementId) {
    let (mut doc, map, handle) = map_document();
    let directions = doc.create_directions();
    let element = doc.directions_mut(directions).unwrap();
    element.set_start_address(Some("Oakland".into()));
    element.set_end_address(Some("San Jose".into()));
    element.set_travel_mode(TravelMode::Bicycling);
    doc.append_child(map, directions);
    doc.flush().unwrap();
    (doc, handle, directions)
}

/// A map holding one search element without a query.
fn search_document() -> (FakeDocument, MapHandle, ElementId) {
    let (mut doc, map, handle) = map_document();
    let search = doc.create_search();
    doc.append_child(map, search);
    doc.flush().unwrap();
    (doc, handle, search)
}

fn last_scope(doc: &FakeDocument) -> SearchScope {
    let requests = doc.engine().search_requests();
    requests.last().expect("a search was issued").1.scope.clone()
}

fn details_request(doc: &FakeDocument) -> RequestId {
    doc.engine()
        .calls()
        .iter()
        .rev()
        .find_map(|c| match c {
            Call::PlaceDetails(id, _) => Some(*id),
            _ => None,
        })
        .expect("a lookup was issued")
}

// -- Directions --

#[test]
fn one_route_per_batch() {
    let (mut doc, handle, directions) = directions_document();
    let requests = doc.engine().route_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].1.origin, "Oakland");
    assert_eq!(requests[0].1.travel_mode, TravelMode::Bicycling);

    let renderer = doc.directions(directions).unwrap().renderer().unwrap();
    assert_eq!(doc.engine().renderer_map(renderer), Some(handle));

    let element = doc.directions_mut(directions).unwrap();
    element.set_start_address(Some("Berkeley".into()));
    element.set_waypoints(vec![Waypoint {
        location: "Fremont".into(),
        stopover: true,
    }]);
    doc.flush().unwrap();

    let requests = doc.engine().route_requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].1.origin, "Berkeley");
    assert_eq!(requests[1].1.waypoints.len(), 1);
}

#[test]
fn failed_route_keeps_the_previous_response() {
    let (mut doc, _, directions) = directions_document();
    doc.directions_mut(directions)
        .unwrap()
        .set_end_address(Some("Palo Alto".into()));
    doc.flush().unwrap();
    let requests = doc.engine().route_requests();
    let renderer = doc.directions(directions).unwrap().renderer().unwrap();

    doc.engine_mut()
        .complete_route(requests[0].0, DirectionsStatus::Ok, Some(route("I-880")));
    doc.flush().unwrap();
    assert_eq!(
        doc.directions(directions).unwrap().response(),
        Some(&route("I-880"))
    );
    assert_eq!(event_names(&mut doc), ["google-map-response"]);
    assert!(
        doc.engine()
            .calls()
            .contains(&Call::SetRendererDirections(renderer, route("I-880")))
    );

    let rendered = doc
        .engine()
        .count(|c| matches!(c, Call::SetRendererDirections(..)));
    doc.engine_mut()
        .complete_route(requests[1].0, DirectionsStatus::NotFound, None);
    doc.flush().unwrap();
    assert_eq!(
        doc.directions(directions).unwrap().response(),
        Some(&route("I-880"))
    );
    assert!(doc.take_events().is_empty());
    assert_eq!(
        doc.engine()
            .count(|c| matches!(c, Call::SetRendererDirections(..))),
        rendered
    );
}

#[test]
fn routing_waits_for_the_script() {
    let mut doc = FakeDocument::new(FakeEngine::new(), FakeScripts::new());
    let directions = doc.create_directions();
    let element = doc.directions_mut(directions).unwrap();
    element.set_start_address(Some("Oakland".into()));
    element.set_end_address(Some("San Jose".into()));
    doc.mount(directions);
    doc.flush().unwrap();
    assert!(doc.engine().route_requests().is_empty());

    doc.scripts_mut().complete_all();
    doc.flush().unwrap();
    assert_eq!(doc.engine().route_requests().len(), 1);
    // Without a map there is nothing to render into.
    assert_eq!(doc.directions(directions).unwrap().renderer(), None);
}

// -- Search --

#[test]
fn search_scope_follows_radius_then_global_then_bounds() {
    let (mut doc, handle, search) = search_document();
    let bounds = GeoBounds::from_corners(point(37.7, -122.5), point(37.8, -122.4));
    doc.engine_mut().set_bounds(handle, bounds);

    doc.search_mut(search)
        .unwrap()
        .set_query(Some("pizza".into()));
    doc.flush().unwrap();
    assert_eq!(last_scope(&doc), SearchScope::Bounds(Some(bounds)));

    doc.search_mut(search).unwrap().set_global_search(true);
    doc.flush().unwrap();
    assert_eq!(last_scope(&doc), SearchScope::Global);

    let element = doc.search_mut(search).unwrap();
    element.set_latitude(Some(37.75)).unwrap();
    element.set_longitude(Some(-122.45)).unwrap();
    element.set_radius(Some(500.0));
    doc.flush().unwrap();
    assert_eq!(
        last_scope(&doc),
        SearchScope::Radius {
            location: Some(point(37.75, -122.45)),
            radius: 500.0,
        }
    );
    assert_eq!(doc.engine().search_requests().len(), 3);
}

#[test]
fn radius_without_a_location_uses_the_map_center() {
    let (mut doc, handle, search) = search_document();
    let center = doc.engine().map(handle).unwrap().center;
    let element = doc.search_mut(search).unwrap();
    element.set_query(Some("coffee".into()));
    element.set_radius(Some(250.0));
    element.set_types(Some("cafe bakery".into()));
    doc.flush().unwrap();

    let requests = doc.engine().search_requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0].1;
    assert_eq!(request.place_type.as_deref(), Some("cafe"));
    assert_eq!(
        request.scope,
        SearchScope::Radius {
            location: center,
            radius: 250.0,
        }
    );
}

#[test]
fn non_finite_search_coordinates_are_rejected() {
    let (mut doc, _, search) = search_document();
    doc.search_mut(search)
        .unwrap()
        .set_query(Some("tea".into()));
    doc.flush().unwrap();
    let issued = doc.engine().search_requests().len();

    assert_eq!(
        doc.search_mut(search).unwrap().set_latitude(Some(f64::NAN)),
        Err(Error::TypeViolation { field: "latitude" })
    );
    doc.flush().unwrap();
    assert_eq!(doc.engine().search_requests().len(), issued);
}

#[test]
fn results_are_flattened_and_failures_absorbed() {
    let (mut doc, _, search) = search_document();
    doc.search_mut(search)
        .unwrap()
        .set_query(Some("pizza".into()));
    doc.flush().unwrap();
    let first = doc.engine().search_requests()[0].0;

    doc.engine_mut().complete_search(
        first,
        PlacesStatus::Ok,
        vec![place("a", (37.76, -122.42))],
    );
    doc.flush().unwrap();
    let results = doc.search(search).unwrap().results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].latitude, Some(37.76));
    assert_eq!(results[0].longitude, Some(-122.42));
    assert_eq!(results[0].place.place_id.as_deref(), Some("a"));
    let events = doc.take_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "google-map-search-results");
    assert!(matches!(&events[0].detail, EventDetail::Results(r) if r.len() == 1));

    doc.search_mut(search)
        .unwrap()
        .set_query(Some("tacos".into()));
    doc.flush().unwrap();
    let second = doc.engine().search_requests()[1].0;
    doc.engine_mut()
        .complete_search(second, PlacesStatus::ZeroResults, Vec::new());
    doc.flush().unwrap();
    assert_eq!(doc.search(search).unwrap().results().len(), 1);
    assert!(doc.take_events().is_empty());
}

#[test]
fn details_resolve_on_a_later_flush() {
    let (mut doc, _, search) = search_document();
    let mut found = doc.get_details(search, "abc").unwrap();
    assert!(
        doc.engine()
            .calls()
            .contains(&Call::PlaceDetails(details_request(&doc), "abc".into()))
    );
    assert!(!found.is_ready());

    let id = details_request(&doc);
    doc.engine_mut()
        .complete_details(id, PlacesStatus::Ok, Some(place("abc", (1.0, 2.0))));
    doc.flush().unwrap();
    assert_eq!(found.try_take(), Some(Ok(place("abc", (1.0, 2.0)))));
    assert_eq!(event_names(&mut doc), ["google-map-search-place-detail"]);

    let mut missing = doc.get_details(search, "nope").unwrap();
    let id = details_request(&doc);
    doc.engine_mut()
        .complete_details(id, PlacesStatus::NotFound, None);
    doc.flush().unwrap();
    assert_eq!(missing.try_take(), Some(Err(PlacesStatus::NotFound)));
    assert!(doc.take_events().is_empty());
}

#[test]
fn details_need_a_map() {
    let mut doc = FakeDocument::new(FakeEngine::loaded(), FakeScripts::new());
    let search = doc.create_search();
    doc.mount(search);
    doc.flush().unwrap();
    assert!(matches!(
        doc.get_details(search, "abc"),
        Err(Error::Unready(id)) if id == search
    ));
}
