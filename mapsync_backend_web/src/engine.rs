// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`MapEngine`] over the `google.maps` namespace.
//!
//! Every engine object lives in one table keyed by the handle's number; all
//! handle kinds share a single counter so a [`Target`] resolves without
//! knowing its kind. Event handlers and service callbacks never touch the
//! document. They push [`Delivery`] values into a shared inbox which
//! [`take_deliveries`](MapEngine::take_deliveries) drains.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use mapsync_core::engine::{Delivery, EventPayload, MapEngine};
use mapsync_core::geo::{GeoBounds, GeoPoint};
use mapsync_core::handle::{
    InfoWindowHandle, KmlHandle, ListenerId, MapHandle, MarkerHandle, PathHandle, PolyHandle,
    RendererHandle, RequestId, Target,
};
use mapsync_core::options::{
    MapOption, MapOptions, MapType, MarkerOption, MarkerOptions, PolyOption, PolyOptions,
    PolyShape, RendererOptions,
};
use mapsync_core::service::{
    DirectionsRequest, DirectionsResult, DirectionsStatus, PlacesStatus, TextSearchRequest,
};
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;

use crate::convert;
use crate::js::{call, construct, elements, index, maps, maps_member, object, set};

/// Raw routing responses kept for rendering.
///
/// A renderer only accepts the object the service produced, not a literal
/// rebuilt from [`DirectionsResult`].
const ROUTE_CACHE: usize = 8;

type Handler = Closure<dyn FnMut(JsValue, JsValue)>;

struct Listener {
    target: Target,
    handle: JsValue,
    _handler: Handler,
}

#[derive(Default)]
struct Shared {
    inbox: Vec<Delivery>,
    /// Once-listeners that have fired and can be released.
    spent: Vec<ListenerId>,
    routes: Vec<(DirectionsResult, JsValue)>,
}

/// A [`MapEngine`] backed by the Google Maps JavaScript API.
///
/// Construct it once the page is able to load the API script; objects are
/// only created after [`is_loaded`](MapEngine::is_loaded) reports `true`,
/// which the document checks before creating anything.
pub struct GoogleMapsEngine {
    next_id: u32,
    objects: BTreeMap<u32, JsValue>,
    listeners: BTreeMap<ListenerId, Listener>,
    shared: Rc<RefCell<Shared>>,
    directions: Option<JsValue>,
    places: BTreeMap<MapHandle, JsValue>,
}

impl core::fmt::Debug for GoogleMapsEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let shared = self.shared.borrow();
        f.debug_struct("GoogleMapsEngine")
            .field("next_id", &self.next_id)
            .field("objects", &self.objects.len())
            .field("listeners", &self.listeners.len())
            .field("queued", &shared.inbox.len())
            .field("cached_routes", &shared.routes.len())
            .finish_non_exhaustive()
    }
}

impl Default for GoogleMapsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleMapsEngine {
    /// Creates an engine with no objects.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            objects: BTreeMap::new(),
            listeners: BTreeMap::new(),
            shared: Rc::new(RefCell::new(Shared::default())),
            directions: None,
            places: BTreeMap::new(),
        }
    }

    /// Returns the JavaScript object behind `target`, if it is still alive.
    ///
    /// Useful for host code that needs to reach API surface the engine does
    /// not model.
    #[must_use]
    pub fn object(&self, target: Target) -> Option<&JsValue> {
        self.objects.get(&target_id(target))
    }

    fn insert(&mut self, value: JsValue) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.objects.insert(id, value);
        id
    }

    fn reserve(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn get(&self, id: u32) -> JsValue {
        self.objects.get(&id).cloned().unwrap_or(JsValue::UNDEFINED)
    }

    fn map_or_null(&self, map: Option<MapHandle>) -> JsValue {
        map.map_or(JsValue::NULL, |m| self.get(m.0))
    }

    fn listen(&mut self, target: Target, name: &str, once: bool) -> ListenerId {
        let id = ListenerId(self.reserve());
        let instance = self.get(target_id(target));
        let shared = Rc::clone(&self.shared);
        let path = matches!(target, Target::Path(_)).then(|| instance.clone());
        let handler = Closure::wrap(Box::new(move |first: JsValue, _second: JsValue| {
            let payload = match &path {
                Some(path) => vertex_payload(path, &first),
                None => convert::event_payload(&first),
            };
            let mut shared = shared.borrow_mut();
            shared.inbox.push(Delivery::Event {
                listener: id,
                payload,
            });
            if once {
                shared.spent.push(id);
            }
        }) as Box<dyn FnMut(JsValue, JsValue)>);
        let method = if once { "addListenerOnce" } else { "addListener" };
        let handle = call(
            &maps_member(&["event"]),
            method,
            &[instance, name.into(), handler.as_ref().clone()],
        );
        self.listeners.insert(
            id,
            Listener {
                target,
                handle,
                _handler: handler,
            },
        );
        id
    }

    fn places_service(&mut self, map: MapHandle) -> JsValue {
        if let Some(service) = self.places.get(&map) {
            return service.clone();
        }
        let service = construct(&["places", "PlacesService"], &[self.get(map.0)]);
        self.places.insert(map, service.clone());
        service
    }
}

fn target_id(target: Target) -> u32 {
    match target {
        Target::Map(h) => h.0,
        Target::Marker(h) => h.0,
        Target::InfoWindow(h) => h.0,
        Target::Poly(h) => h.0,
        Target::Path(h) => h.0,
    }
}

/// Path events pass the vertex index; the value is read back from the array.
fn vertex_payload(path: &JsValue, first: &JsValue) -> EventPayload {
    let Some(at) = index(first) else {
        return EventPayload::None;
    };
    match convert::read_lat_lng(&call(path, "getAt", &[first.clone()])) {
        Some(position) => EventPayload::Vertex {
            index: at,
            position,
        },
        None => EventPayload::None,
    }
}

fn poly_option(option: &PolyOption) -> JsValue {
    let o = object();
    match option {
        PolyOption::Map(_) => {}
        PolyOption::Clickable(v) => set(&o, "clickable", *v),
        PolyOption::Draggable(v) => set(&o, "draggable", *v),
        PolyOption::Editable(v) => set(&o, "editable", *v),
        PolyOption::FillColor(v) => set(&o, "fillColor", v.as_str()),
        PolyOption::FillOpacity(v) => set(&o, "fillOpacity", *v),
        PolyOption::Geodesic(v) => set(&o, "geodesic", *v),
        PolyOption::Icons(Some(icons)) => set(&o, "icons", convert::icon_sequences(icons)),
        PolyOption::Icons(None) => set(&o, "icons", JsValue::NULL),
        PolyOption::StrokeColor(v) => set(&o, "strokeColor", v.as_str()),
        PolyOption::StrokeOpacity(v) => set(&o, "strokeOpacity", *v),
        PolyOption::StrokePosition(v) => set(&o, "strokePosition", convert::stroke_position(*v)),
        PolyOption::StrokeWeight(v) => set(&o, "strokeWeight", *v),
        PolyOption::ZIndex(v) => set(&o, "zIndex", *v),
    }
    o
}

impl MapEngine for GoogleMapsEngine {
    type Node = web_sys::Element;

    fn is_loaded(&self) -> bool {
        maps().is_object()
    }

    fn create_map(&mut self, container: &web_sys::Element, options: &MapOptions) -> MapHandle {
        let map = construct(
            &["Map"],
            &[container.clone().into(), convert::map_options(options)],
        );
        MapHandle(self.insert(map))
    }

    fn map_center(&self, map: MapHandle) -> Option<GeoPoint> {
        convert::read_lat_lng(&call(&self.get(map.0), "getCenter", &[]))
    }

    fn map_zoom(&self, map: MapHandle) -> f64 {
        call(&self.get(map.0), "getZoom", &[])
            .as_f64()
            .unwrap_or_default()
    }

    fn map_type(&self, map: MapHandle) -> MapType {
        call(&self.get(map.0), "getMapTypeId", &[])
            .as_string()
            .and_then(|id| MapType::parse(&id))
            .unwrap_or_default()
    }

    fn map_bounds(&self, map: MapHandle) -> Option<GeoBounds> {
        convert::read_bounds(&call(&self.get(map.0), "getBounds", &[]))
    }

    fn set_center(&mut self, map: MapHandle, center: GeoPoint) {
        call(&self.get(map.0), "setCenter", &[convert::lat_lng(center)]);
    }

    fn pan_to(&mut self, map: MapHandle, center: GeoPoint) {
        call(&self.get(map.0), "panTo", &[convert::lat_lng(center)]);
    }

    fn set_zoom(&mut self, map: MapHandle, zoom: f64) {
        call(&self.get(map.0), "setZoom", &[zoom.into()]);
    }

    fn set_map_type(&mut self, map: MapHandle, map_type: MapType) {
        call(&self.get(map.0), "setMapTypeId", &[map_type.as_str().into()]);
    }

    fn set_map_options(&mut self, map: MapHandle, options: &[MapOption]) {
        call(
            &self.get(map.0),
            "setOptions",
            &[convert::map_option_patch(options)],
        );
    }

    fn fit_bounds(&mut self, map: MapHandle, bounds: GeoBounds) {
        call(
            &self.get(map.0),
            "fitBounds",
            &[convert::bounds_literal(bounds)],
        );
    }

    fn add_kml_layer(&mut self, map: MapHandle, url: &str) -> KmlHandle {
        let options = object();
        set(&options, "url", url);
        set(&options, "map", self.get(map.0));
        KmlHandle(self.insert(construct(&["KmlLayer"], &[options])))
    }

    fn remove_kml_layer(&mut self, layer: KmlHandle) {
        if let Some(layer) = self.objects.remove(&layer.0) {
            call(&layer, "setMap", &[JsValue::NULL]);
        }
    }

    fn create_marker(&mut self, options: &MarkerOptions) -> MarkerHandle {
        let o = object();
        set(&o, "map", self.map_or_null(options.map));
        if let Some(position) = options.position {
            set(&o, "position", convert::lat_lng(position));
        }
        set(&o, "title", options.title.as_str());
        if let Some(animation) = options.animation {
            set(&o, "animation", convert::animation(animation));
        }
        set(&o, "draggable", options.draggable);
        set(&o, "visible", options.visible);
        if let Some(icon) = &options.icon {
            set(&o, "icon", convert::icon(icon));
        }
        if let Some(label) = &options.label {
            set(&o, "label", label.as_str());
        }
        set(&o, "zIndex", options.z_index);
        MarkerHandle(self.insert(construct(&["Marker"], &[o])))
    }

    fn set_marker(&mut self, marker: MarkerHandle, option: MarkerOption) {
        let (method, value) = match option {
            MarkerOption::Map(map) => ("setMap", self.map_or_null(map)),
            MarkerOption::Position(p) => ("setPosition", convert::lat_lng(p)),
            MarkerOption::Icon(icon) => (
                "setIcon",
                icon.as_ref().map_or(JsValue::NULL, convert::icon),
            ),
            MarkerOption::Label(label) => (
                "setLabel",
                label.as_deref().map_or(JsValue::NULL, JsValue::from_str),
            ),
            MarkerOption::ZIndex(z) => ("setZIndex", z.into()),
            MarkerOption::Animation(a) => ("setAnimation", convert::animation(a)),
            MarkerOption::Draggable(d) => ("setDraggable", d.into()),
            MarkerOption::Title(t) => ("setTitle", t.as_str().into()),
        };
        call(&self.get(marker.0), method, &[value]);
    }

    fn create_info_window(&mut self) -> InfoWindowHandle {
        InfoWindowHandle(self.insert(construct(&["InfoWindow"], &[])))
    }

    fn set_info_content(&mut self, info: InfoWindowHandle, nodes: &[web_sys::Element]) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Ok(content) = document.create_element("div") else {
            return;
        };
        for node in nodes {
            let _ = content.append_child(node);
        }
        call(&self.get(info.0), "setContent", &[content.into()]);
    }

    fn open_info_window(&mut self, info: InfoWindowHandle, map: MapHandle, anchor: MarkerHandle) {
        call(
            &self.get(info.0),
            "open",
            &[self.get(map.0), self.get(anchor.0)],
        );
    }

    fn close_info_window(&mut self, info: InfoWindowHandle) {
        call(&self.get(info.0), "close", &[]);
    }

    fn create_path(&mut self) -> PathHandle {
        PathHandle(self.insert(construct(&["MVCArray"], &[])))
    }

    fn path_clear(&mut self, path: PathHandle) {
        call(&self.get(path.0), "clear", &[]);
    }

    fn path_push(&mut self, path: PathHandle, vertex: GeoPoint) {
        call(&self.get(path.0), "push", &[convert::lat_lng(vertex)]);
    }

    fn path_points(&self, path: PathHandle) -> Vec<GeoPoint> {
        elements(&call(&self.get(path.0), "getArray", &[]))
            .iter()
            .filter_map(convert::read_lat_lng)
            .collect()
    }

    fn create_poly(&mut self, options: &PolyOptions) -> PolyHandle {
        let o = object();
        set(&o, "map", self.map_or_null(options.map));
        set(&o, "path", self.get(options.path.0));
        set(&o, "clickable", options.clickable);
        set(&o, "draggable", options.draggable);
        set(&o, "editable", options.editable);
        set(&o, "geodesic", options.geodesic);
        set(&o, "strokeColor", options.stroke_color.as_str());
        set(&o, "strokeOpacity", options.stroke_opacity);
        set(
            &o,
            "strokePosition",
            convert::stroke_position(options.stroke_position),
        );
        set(&o, "strokeWeight", options.stroke_weight);
        set(&o, "visible", options.visible);
        set(&o, "zIndex", options.z_index);
        let class = match &options.shape {
            PolyShape::Polyline { icons } => {
                if let Some(icons) = icons {
                    set(&o, "icons", convert::icon_sequences(icons));
                }
                "Polyline"
            }
            PolyShape::Polygon {
                fill_color,
                fill_opacity,
            } => {
                set(&o, "fillColor", fill_color.as_str());
                set(&o, "fillOpacity", *fill_opacity);
                "Polygon"
            }
        };
        PolyHandle(self.insert(construct(&[class], &[o])))
    }

    fn set_poly(&mut self, poly: PolyHandle, option: PolyOption) {
        let poly = self.get(poly.0);
        match option {
            PolyOption::Map(map) => {
                call(&poly, "setMap", &[self.map_or_null(map)]);
            }
            other => {
                call(&poly, "setOptions", &[poly_option(&other)]);
            }
        }
    }

    fn create_renderer(&mut self, options: &RendererOptions) -> RendererHandle {
        let renderer = construct(
            &["DirectionsRenderer"],
            &[convert::renderer_options(options)],
        );
        RendererHandle(self.insert(renderer))
    }

    fn set_renderer_map(&mut self, renderer: RendererHandle, map: Option<MapHandle>) {
        call(&self.get(renderer.0), "setMap", &[self.map_or_null(map)]);
    }

    fn set_renderer_directions(&mut self, renderer: RendererHandle, result: &DirectionsResult) {
        let raw = {
            let shared = self.shared.borrow();
            shared
                .routes
                .iter()
                .rev()
                .find(|(seen, _)| seen == result)
                .map(|(_, raw)| raw.clone())
        };
        // Only responses this engine produced can be drawn.
        if let Some(raw) = raw {
            call(&self.get(renderer.0), "setDirections", &[raw]);
        }
    }

    fn route(&mut self, request: &DirectionsRequest) -> RequestId {
        let id = RequestId(self.reserve());
        let service = self
            .directions
            .get_or_insert_with(|| construct(&["DirectionsService"], &[]))
            .clone();
        let shared = Rc::clone(&self.shared);
        let callback = Closure::once_into_js(move |raw: JsValue, status: JsValue| {
            let status = convert::directions_status(&convert::status_text(&status));
            let result = (status == DirectionsStatus::Ok).then(|| convert::read_directions(&raw));
            let mut shared = shared.borrow_mut();
            if let Some(result) = &result {
                if shared.routes.len() == ROUTE_CACHE {
                    shared.routes.remove(0);
                }
                shared.routes.push((result.clone(), raw));
            }
            shared.inbox.push(Delivery::Route {
                request: id,
                status,
                result,
            });
        });
        call(
            &service,
            "route",
            &[convert::directions_request(request), callback],
        );
        id
    }

    fn text_search(&mut self, map: MapHandle, request: &TextSearchRequest) -> RequestId {
        let id = RequestId(self.reserve());
        let service = self.places_service(map);
        let shared = Rc::clone(&self.shared);
        let callback = Closure::once_into_js(move |results: JsValue, status: JsValue| {
            let status = convert::places_status(&convert::status_text(&status));
            let results = if status == PlacesStatus::Ok {
                convert::read_places(&results)
            } else {
                Vec::new()
            };
            shared.borrow_mut().inbox.push(Delivery::Search {
                request: id,
                status,
                results,
            });
        });
        call(
            &service,
            "textSearch",
            &[convert::text_search_request(request), callback],
        );
        id
    }

    fn place_details(&mut self, map: MapHandle, place_id: &str) -> RequestId {
        let id = RequestId(self.reserve());
        let service = self.places_service(map);
        let shared = Rc::clone(&self.shared);
        let callback = Closure::once_into_js(move |place: JsValue, status: JsValue| {
            let status = convert::places_status(&convert::status_text(&status));
            let place = (status == PlacesStatus::Ok).then(|| convert::read_place(&place));
            shared.borrow_mut().inbox.push(Delivery::Details {
                request: id,
                status,
                place,
            });
        });
        let request = object();
        set(&request, "placeId", place_id);
        call(&service, "getDetails", &[request, callback]);
        id
    }

    fn add_listener(&mut self, target: Target, name: &str) -> ListenerId {
        self.listen(target, name, false)
    }

    fn add_listener_once(&mut self, target: Target, name: &str) -> ListenerId {
        self.listen(target, name, true)
    }

    fn remove_listener(&mut self, listener: ListenerId) {
        if let Some(listener) = self.listeners.remove(&listener) {
            call(&listener.handle, "remove", &[]);
        }
    }

    fn clear_instance_listeners(&mut self, target: Target) {
        call(
            &maps_member(&["event"]),
            "clearInstanceListeners",
            &[self.get(target_id(target))],
        );
        self.listeners.retain(|_, l| l.target != target);
    }

    fn trigger(&mut self, target: Target, name: &str) {
        call(
            &maps_member(&["event"]),
            "trigger",
            &[self.get(target_id(target)), name.into()],
        );
    }

    fn take_deliveries(&mut self, out: &mut Vec<Delivery>) {
        let spent = {
            let mut shared = self.shared.borrow_mut();
            out.append(&mut shared.inbox);
            core::mem::take(&mut shared.spent)
        };
        for id in spent {
            self.listeners.remove(&id);
        }
    }
}
