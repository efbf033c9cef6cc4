// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversions between core value types and Maps API literals.

use alloc::string::ToString;
use alloc::vec::Vec;

use mapsync_core::engine::{EventPayload, MouseEvent};
use mapsync_core::geo::{GeoBounds, GeoPoint};
use mapsync_core::options::{
    Animation, Icon, IconSequence, MapOption, MapOptions, MapTypeStyle, OptionValue,
    RendererOptions, StrokePosition,
};
use mapsync_core::service::{
    DirectionsRequest, DirectionsResult, DirectionsRoute, DirectionsStatus, PlaceGeometry,
    PlaceResult, PlacesStatus, RouteLeg, SearchScope, TextSearchRequest,
};
use wasm_bindgen::JsValue;

use crate::js::{
    array, call, construct, elements, get, index, maps_member, number, object, set, set_opt,
    string,
};

// -- Outgoing ---------------------------------------------------------------

/// A `google.maps.LatLng`.
pub(crate) fn lat_lng(p: GeoPoint) -> JsValue {
    construct(&["LatLng"], &[p.lat().into(), p.lng().into()])
}

/// A `LatLngBoundsLiteral`.
pub(crate) fn bounds_literal(b: GeoBounds) -> JsValue {
    let (sw, ne) = (b.south_west(), b.north_east());
    let o = object();
    set(&o, "south", sw.lat());
    set(&o, "west", sw.lng());
    set(&o, "north", ne.lat());
    set(&o, "east", ne.lng());
    o
}

fn option_value(value: &OptionValue) -> JsValue {
    match value {
        OptionValue::Bool(b) => (*b).into(),
        OptionValue::Number(n) => (*n).into(),
        OptionValue::Text(s) => s.as_str().into(),
    }
}

fn styles(styles: &[MapTypeStyle]) -> JsValue {
    array(styles.iter().map(|style| {
        let o = object();
        set_opt(&o, "featureType", style.feature_type.as_deref());
        set_opt(&o, "elementType", style.element_type.as_deref());
        let stylers = array(style.stylers.iter().map(|(name, value)| {
            let s = object();
            set(&s, name, value.as_str());
            s
        }));
        set(&o, "stylers", stylers);
        o
    }))
}

/// A `MapOptions` literal, without `center`.
pub(crate) fn map_options(options: &MapOptions) -> JsValue {
    let o = object();
    set(&o, "zoom", options.zoom);
    set(&o, "tilt", options.tilt);
    set(&o, "mapTypeId", options.map_type.as_str());
    set(&o, "disableDefaultUI", options.disable_default_ui);
    set(&o, "mapTypeControl", options.map_type_control);
    set(&o, "streetViewControl", options.street_view_control);
    set(&o, "disableDoubleClickZoom", options.disable_double_click_zoom);
    set(&o, "scrollwheel", options.scrollwheel);
    set(&o, "styles", styles(&options.styles));
    set_opt(&o, "maxZoom", options.max_zoom);
    set_opt(&o, "minZoom", options.min_zoom);
    set(&o, "draggable", options.draggable);
    for (name, value) in &options.additional {
        set(&o, name, option_value(value));
    }
    o
}

/// A partial `MapOptions` literal for `setOptions`.
pub(crate) fn map_option_patch(options: &[MapOption]) -> JsValue {
    let o = object();
    for option in options {
        match option {
            MapOption::DisableDefaultUi(v) => set(&o, "disableDefaultUI", *v),
            MapOption::MapTypeControl(v) => set(&o, "mapTypeControl", *v),
            MapOption::StreetViewControl(v) => set(&o, "streetViewControl", *v),
            MapOption::DisableDoubleClickZoom(v) => set(&o, "disableDoubleClickZoom", *v),
            MapOption::Scrollwheel(v) => set(&o, "scrollwheel", *v),
            MapOption::MaxZoom(v) => set(&o, "maxZoom", *v),
            MapOption::MinZoom(v) => set(&o, "minZoom", *v),
            MapOption::Draggable(v) => set(&o, "draggable", *v),
            MapOption::Styles(v) => set(&o, "styles", styles(v)),
        }
    }
    o
}

pub(crate) fn animation(animation: Animation) -> JsValue {
    let name = match animation {
        Animation::Drop => "DROP",
        Animation::Bounce => "BOUNCE",
    };
    maps_member(&["Animation", name])
}

pub(crate) fn icon(icon: &Icon) -> JsValue {
    match icon {
        Icon::Url(url) => url.as_str().into(),
        Icon::Symbol {
            path,
            scale,
            fill_color,
        } => {
            let o = object();
            set(&o, "path", path.as_str());
            set(&o, "scale", *scale);
            if let Some(color) = fill_color {
                set(&o, "fillColor", color.as_str());
                set(&o, "fillOpacity", 1.0);
            }
            o
        }
    }
}

pub(crate) fn icon_sequences(icons: &[IconSequence]) -> JsValue {
    array(icons.iter().map(|seq| {
        let o = object();
        set(&o, "icon", icon(&seq.icon));
        set_opt(&o, "offset", seq.offset.as_deref());
        set_opt(&o, "repeat", seq.repeat.as_deref());
        o
    }))
}

pub(crate) fn stroke_position(position: StrokePosition) -> JsValue {
    let name = match position {
        StrokePosition::Center => "CENTER",
        StrokePosition::Inside => "INSIDE",
        StrokePosition::Outside => "OUTSIDE",
    };
    maps_member(&["StrokePosition", name])
}

pub(crate) fn renderer_options(options: &RendererOptions) -> JsValue {
    let o = object();
    set(&o, "draggable", options.draggable);
    set(&o, "preserveViewport", options.preserve_viewport);
    set(&o, "suppressMarkers", options.suppress_markers);
    set(&o, "suppressPolylines", options.suppress_polylines);
    set(&o, "suppressInfoWindows", options.suppress_info_windows);
    o
}

pub(crate) fn directions_request(request: &DirectionsRequest) -> JsValue {
    let o = object();
    set(&o, "origin", request.origin.as_str());
    set(&o, "destination", request.destination.as_str());
    set(&o, "travelMode", request.travel_mode.as_str());
    let waypoints = array(request.waypoints.iter().map(|w| {
        let wp = object();
        set(&wp, "location", w.location.as_str());
        set(&wp, "stopover", w.stopover);
        wp
    }));
    set(&o, "waypoints", waypoints);
    o
}

pub(crate) fn text_search_request(request: &TextSearchRequest) -> JsValue {
    let o = object();
    set(&o, "query", request.query.as_str());
    set_opt(&o, "type", request.place_type.as_deref());
    match &request.scope {
        SearchScope::Radius { location, radius } => {
            if let Some(location) = location {
                set(&o, "location", lat_lng(*location));
            }
            set(&o, "radius", *radius);
        }
        SearchScope::Bounds(Some(bounds)) => set(&o, "bounds", bounds_literal(*bounds)),
        SearchScope::Bounds(None) | SearchScope::Global => {}
    }
    o
}

// -- Incoming ---------------------------------------------------------------

/// Reads a `LatLng` object or a `LatLngLiteral`.
pub(crate) fn read_lat_lng(value: &JsValue) -> Option<GeoPoint> {
    let lat = number(value, "lat")?;
    let lng = number(value, "lng")?;
    GeoPoint::new(lat, lng).ok()
}

/// Reads a `LatLngBounds` object.
pub(crate) fn read_bounds(value: &JsValue) -> Option<GeoBounds> {
    let south_west = read_lat_lng(&call(value, "getSouthWest", &[]))?;
    let north_east = read_lat_lng(&call(value, "getNorthEast", &[]))?;
    Some(GeoBounds::from_corners(south_west, north_east))
}

/// Reads the first argument of an overlay event handler.
pub(crate) fn event_payload(event: &JsValue) -> EventPayload {
    if !event.is_object() {
        return EventPayload::None;
    }
    EventPayload::Mouse(MouseEvent {
        lat_lng: read_lat_lng(&get(event, "latLng")),
        vertex: index(&get(event, "vertex")),
        edge: index(&get(event, "edge")),
    })
}

pub(crate) fn directions_status(status: &str) -> DirectionsStatus {
    match status {
        "OK" => DirectionsStatus::Ok,
        "NOT_FOUND" => DirectionsStatus::NotFound,
        "ZERO_RESULTS" => DirectionsStatus::ZeroResults,
        "MAX_WAYPOINTS_EXCEEDED" => DirectionsStatus::MaxWaypointsExceeded,
        "INVALID_REQUEST" => DirectionsStatus::InvalidRequest,
        "OVER_QUERY_LIMIT" => DirectionsStatus::OverQueryLimit,
        "REQUEST_DENIED" => DirectionsStatus::RequestDenied,
        _ => DirectionsStatus::UnknownError,
    }
}

pub(crate) fn places_status(status: &str) -> PlacesStatus {
    match status {
        "OK" => PlacesStatus::Ok,
        "ZERO_RESULTS" => PlacesStatus::ZeroResults,
        "NOT_FOUND" => PlacesStatus::NotFound,
        "INVALID_REQUEST" => PlacesStatus::InvalidRequest,
        "OVER_QUERY_LIMIT" => PlacesStatus::OverQueryLimit,
        "REQUEST_DENIED" => PlacesStatus::RequestDenied,
        _ => PlacesStatus::UnknownError,
    }
}

pub(crate) fn read_directions(value: &JsValue) -> DirectionsResult {
    let routes = elements(&get(value, "routes"))
        .iter()
        .map(|route| DirectionsRoute {
            summary: string(route, "summary").unwrap_or_default(),
            legs: elements(&get(route, "legs"))
                .iter()
                .map(|leg| RouteLeg {
                    start_address: string(leg, "start_address").unwrap_or_default(),
                    end_address: string(leg, "end_address").unwrap_or_default(),
                    distance_meters: number(&get(leg, "distance"), "value"),
                    duration_seconds: number(&get(leg, "duration"), "value"),
                })
                .collect(),
            overview_path: elements(&get(route, "overview_path"))
                .iter()
                .filter_map(read_lat_lng)
                .collect(),
        })
        .collect();
    DirectionsResult { routes }
}

pub(crate) fn read_place(value: &JsValue) -> PlaceResult {
    let geometry = get(value, "geometry");
    PlaceResult {
        place_id: string(value, "place_id"),
        name: string(value, "name"),
        formatted_address: string(value, "formatted_address"),
        geometry: geometry.is_object().then(|| PlaceGeometry {
            location: read_lat_lng(&get(&geometry, "location")),
            viewport: read_bounds(&get(&geometry, "viewport")),
        }),
        types: elements(&get(value, "types"))
            .iter()
            .filter_map(JsValue::as_string)
            .collect(),
        rating: number(value, "rating"),
    }
}

pub(crate) fn read_places(value: &JsValue) -> Vec<PlaceResult> {
    elements(value).iter().map(read_place).collect()
}

/// Reads a status argument, which the API passes as a string constant.
pub(crate) fn status_text(value: &JsValue) -> alloc::string::String {
    value.as_string().unwrap_or_else(|| "UNKNOWN_ERROR".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_statuses_are_unknown_errors() {
        assert_eq!(directions_status("OK"), DirectionsStatus::Ok);
        assert_eq!(
            directions_status("MAX_WAYPOINTS_EXCEEDED"),
            DirectionsStatus::MaxWaypointsExceeded
        );
        assert_eq!(directions_status("NEW_STATUS"), DirectionsStatus::UnknownError);
        assert_eq!(places_status("ZERO_RESULTS"), PlacesStatus::ZeroResults);
        assert_eq!(places_status(""), PlacesStatus::UnknownError);
    }
}
