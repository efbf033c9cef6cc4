// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory [`MapEngine`] that records every imperative call.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use mapsync_core::engine::{Delivery, EventPayload, MapEngine, MouseEvent};
use mapsync_core::geo::{GeoBounds, GeoPoint};
use mapsync_core::handle::{
    InfoWindowHandle, KmlHandle, ListenerId, MapHandle, MarkerHandle, PathHandle, PolyHandle,
    RendererHandle, RequestId, Target,
};
use mapsync_core::options::{
    MapOption, MapOptions, MapType, MarkerOption, MarkerOptions, PolyOption, PolyOptions,
    RendererOptions,
};
use mapsync_core::service::{
    DirectionsRequest, DirectionsResult, DirectionsStatus, PlaceResult, PlacesStatus,
    TextSearchRequest,
};

/// Host node type of the fake engine: a label.
pub type Node = &'static str;

/// One imperative call made on a [`FakeEngine`].
///
/// Reads, listener bookkeeping and delivery draining are not recorded.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    /// `create_map`.
    CreateMap(MapHandle),
    /// `set_center`.
    SetCenter(MapHandle, GeoPoint),
    /// `pan_to`.
    PanTo(MapHandle, GeoPoint),
    /// `set_zoom`.
    SetZoom(MapHandle, f64),
    /// `set_map_type`.
    SetMapType(MapHandle, MapType),
    /// `set_map_options`.
    SetMapOptions(MapHandle, Vec<MapOption>),
    /// `fit_bounds`.
    FitBounds(MapHandle, GeoBounds),
    /// `add_kml_layer`.
    AddKml(KmlHandle, String),
    /// `remove_kml_layer`.
    RemoveKml(KmlHandle),
    /// `create_marker`.
    CreateMarker(MarkerHandle),
    /// `set_marker`.
    SetMarker(MarkerHandle, MarkerOption),
    /// `create_info_window`.
    CreateInfoWindow(InfoWindowHandle),
    /// `set_info_content`.
    SetInfoContent(InfoWindowHandle, Vec<Node>),
    /// `open_info_window`.
    OpenInfoWindow(InfoWindowHandle, MarkerHandle),
    /// `close_info_window`.
    CloseInfoWindow(InfoWindowHandle),
    /// `create_path`.
    CreatePath(PathHandle),
    /// `path_clear`.
    PathClear(PathHandle),
    /// `path_push`.
    PathPush(PathHandle, GeoPoint),
    /// `create_poly`.
    CreatePoly(PolyHandle),
    /// `set_poly`.
    SetPoly(PolyHandle, PolyOption),
    /// `create_renderer`.
    CreateRenderer(RendererHandle),
    /// `set_renderer_map`.
    SetRendererMap(RendererHandle, Option<MapHandle>),
    /// `set_renderer_directions`.
    SetRendererDirections(RendererHandle, DirectionsResult),
    /// `route`.
    Route(RequestId, DirectionsRequest),
    /// `text_search`.
    TextSearch(RequestId, TextSearchRequest),
    /// `place_details`.
    PlaceDetails(RequestId, String),
    /// `trigger`.
    Trigger(Target, String),
}

/// Engine-side state of one map canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct FakeMap {
    /// Container node.
    pub container: Node,
    /// Creation options.
    pub options: MapOptions,
    /// Current center.
    pub center: Option<GeoPoint>,
    /// Current zoom.
    pub zoom: f64,
    /// Current map type.
    pub map_type: MapType,
    /// Visible region.
    pub bounds: Option<GeoBounds>,
}

/// Engine-side state of one marker.
#[derive(Clone, Debug, PartialEq)]
pub struct FakeMarker {
    /// Options, with every update folded in.
    pub options: MarkerOptions,
}

/// Engine-side state of one info window.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FakeInfoWindow {
    /// Current content.
    pub content: Vec<Node>,
    /// Anchor while open.
    pub anchor: Option<MarkerHandle>,
}

#[derive(Clone, Debug)]
struct Subscription {
    target: Target,
    name: String,
    once: bool,
}

/// A [`MapEngine`] double.
///
/// Objects live in maps keyed by handle; handles come from one shared
/// counter so no two objects of any kind share an id. Writes fire the events
/// the real engine fires for them (`center_changed` on centering,
/// `insert_at` on `path_push`, and so on), and the `user_*` methods simulate
/// interaction. Service requests stay pending until completed explicitly.
#[derive(Debug, Default)]
pub struct FakeEngine {
    loaded: bool,
    next_id: u32,
    calls: Vec<Call>,
    deliveries: Vec<Delivery>,
    listeners: BTreeMap<ListenerId, Subscription>,

    maps: BTreeMap<MapHandle, FakeMap>,
    markers: BTreeMap<MarkerHandle, FakeMarker>,
    info_windows: BTreeMap<InfoWindowHandle, FakeInfoWindow>,
    paths: BTreeMap<PathHandle, Vec<GeoPoint>>,
    polys: BTreeMap<PolyHandle, PolyOptions>,
    renderers: BTreeMap<RendererHandle, Option<MapHandle>>,
    kml_layers: BTreeMap<KmlHandle, MapHandle>,

    resize_drift: Option<GeoPoint>,
}

impl FakeEngine {
    /// Creates an engine whose code is not loaded yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine that reports itself loaded.
    #[must_use]
    pub fn loaded() -> Self {
        Self {
            loaded: true,
            ..Self::default()
        }
    }

    /// Marks the engine's code as present.
    pub fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }

    // -- Inspection --

    /// Every recorded call, oldest first.
    #[must_use]
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Moves out the recorded calls.
    pub fn take_calls(&mut self) -> Vec<Call> {
        core::mem::take(&mut self.calls)
    }

    /// Number of recorded calls matching `f`.
    pub fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| f(c)).count()
    }

    /// A map's state.
    #[must_use]
    pub fn map(&self, map: MapHandle) -> Option<&FakeMap> {
        self.maps.get(&map)
    }

    /// A marker's state.
    #[must_use]
    pub fn marker(&self, marker: MarkerHandle) -> Option<&FakeMarker> {
        self.markers.get(&marker)
    }

    /// An info window's state.
    #[must_use]
    pub fn info_window(&self, info: InfoWindowHandle) -> Option<&FakeInfoWindow> {
        self.info_windows.get(&info)
    }

    /// A path buffer's vertices.
    #[must_use]
    pub fn path(&self, path: PathHandle) -> &[GeoPoint] {
        self.paths.get(&path).map_or(&[], Vec::as_slice)
    }

    /// A poly's options, with every update folded in.
    #[must_use]
    pub fn poly(&self, poly: PolyHandle) -> Option<&PolyOptions> {
        self.polys.get(&poly)
    }

    /// The map a renderer is attached to.
    #[must_use]
    pub fn renderer_map(&self, renderer: RendererHandle) -> Option<MapHandle> {
        self.renderers.get(&renderer).copied().flatten()
    }

    /// Number of KML layers currently shown.
    #[must_use]
    pub fn kml_layer_count(&self) -> usize {
        self.kml_layers.len()
    }

    /// Number of live subscriptions to `name` on `target`.
    #[must_use]
    pub fn live_listeners(&self, target: Target, name: &str) -> usize {
        self.listeners
            .values()
            .filter(|s| s.target == target && s.name == name)
            .count()
    }

    /// Total number of live subscriptions.
    #[must_use]
    pub fn listener_total(&self) -> usize {
        self.listeners.len()
    }

    /// Issued routing requests, oldest first.
    #[must_use]
    pub fn route_requests(&self) -> Vec<(RequestId, DirectionsRequest)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Route(id, r) => Some((*id, r.clone())),
                _ => None,
            })
            .collect()
    }

    /// Issued text searches, oldest first.
    #[must_use]
    pub fn search_requests(&self) -> Vec<(RequestId, TextSearchRequest)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::TextSearch(id, r) => Some((*id, r.clone())),
                _ => None,
            })
            .collect()
    }

    // -- Simulation --

    /// Fires `name` on `target`, once per matching subscription.
    ///
    /// One-shot subscriptions are dropped as they fire. Returns the number of
    /// deliveries produced.
    pub fn fire(&mut self, target: Target, name: &str, payload: EventPayload) -> usize {
        let hits: Vec<(ListenerId, bool)> = self
            .listeners
            .iter()
            .filter(|(_, s)| s.target == target && s.name == name)
            .map(|(id, s)| (*id, s.once))
            .collect();
        for &(listener, once) in &hits {
            if once {
                self.listeners.remove(&listener);
            }
            self.deliveries.push(Delivery::Event { listener, payload });
        }
        hits.len()
    }

    /// Simulates a click on `target`.
    pub fn user_click(&mut self, target: Target, at: Option<GeoPoint>) -> usize {
        self.fire(
            target,
            "click",
            EventPayload::Mouse(MouseEvent {
                lat_lng: at,
                ..MouseEvent::default()
            }),
        )
    }

    /// Simulates the user dragging a marker to `to`.
    pub fn user_drag_marker(&mut self, marker: MarkerHandle, to: GeoPoint) {
        if let Some(m) = self.markers.get_mut(&marker) {
            m.options.position = Some(to);
        }
        self.fire(
            Target::Marker(marker),
            "dragend",
            EventPayload::Mouse(MouseEvent {
                lat_lng: Some(to),
                ..MouseEvent::default()
            }),
        );
    }

    /// Simulates the user panning a map.
    pub fn user_pan(&mut self, map: MapHandle, to: GeoPoint) {
        if let Some(m) = self.maps.get_mut(&map) {
            m.center = Some(to);
        }
        self.fire(Target::Map(map), "center_changed", EventPayload::None);
    }

    /// Simulates the user zooming a map.
    pub fn user_zoom(&mut self, map: MapHandle, zoom: f64) {
        if let Some(m) = self.maps.get_mut(&map) {
            m.zoom = zoom;
        }
        self.fire(Target::Map(map), "zoom_changed", EventPayload::None);
    }

    /// Simulates the user inserting a vertex while editing a path.
    pub fn user_insert_vertex(&mut self, path: PathHandle, index: usize, position: GeoPoint) {
        let vertices = self.paths.entry(path).or_default();
        let index = index.min(vertices.len());
        vertices.insert(index, position);
        self.fire(
            Target::Path(path),
            "insert_at",
            EventPayload::Vertex { index, position },
        );
    }

    /// Simulates the user dragging an existing vertex.
    pub fn user_move_vertex(&mut self, path: PathHandle, index: usize, position: GeoPoint) {
        if let Some(v) = self
            .paths
            .get_mut(&path)
            .and_then(|vertices| vertices.get_mut(index))
        {
            *v = position;
        }
        self.fire(
            Target::Path(path),
            "set_at",
            EventPayload::Vertex { index, position },
        );
    }

    /// Sets the visible region a map reports.
    pub fn set_bounds(&mut self, map: MapHandle, bounds: GeoBounds) {
        if let Some(m) = self.maps.get_mut(&map) {
            m.bounds = Some(bounds);
        }
    }

    /// Makes `resize` move every map's center to `to`, as the real engine
    /// may.
    pub fn set_resize_drift(&mut self, to: Option<GeoPoint>) {
        self.resize_drift = to;
    }

    /// Completes a routing request.
    pub fn complete_route(
        &mut self,
        request: RequestId,
        status: DirectionsStatus,
        result: Option<DirectionsResult>,
    ) {
        self.deliveries.push(Delivery::Route {
            request,
            status,
            result,
        });
    }

    /// Completes a text search.
    pub fn complete_search(
        &mut self,
        request: RequestId,
        status: PlacesStatus,
        results: Vec<PlaceResult>,
    ) {
        self.deliveries.push(Delivery::Search {
            request,
            status,
            results,
        });
    }

    /// Completes a place-detail lookup.
    pub fn complete_details(
        &mut self,
        request: RequestId,
        status: PlacesStatus,
        place: Option<PlaceResult>,
    ) {
        self.deliveries.push(Delivery::Details {
            request,
            status,
            place,
        });
    }

    // -- Internals --

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn listen(&mut self, target: Target, name: &str, once: bool) -> ListenerId {
        let id = ListenerId(self.next());
        self.listeners.insert(
            id,
            Subscription {
                target,
                name: name.to_string(),
                once,
            },
        );
        id
    }

    fn move_center(&mut self, map: MapHandle, center: GeoPoint) {
        let Some(m) = self.maps.get_mut(&map) else {
            return;
        };
        if m.center == Some(center) {
            return;
        }
        m.center = Some(center);
        self.fire(Target::Map(map), "center_changed", EventPayload::None);
    }
}

impl MapEngine for FakeEngine {
    type Node = Node;

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn create_map(&mut self, container: &Node, options: &MapOptions) -> MapHandle {
        let map = MapHandle(self.next());
        self.maps.insert(
            map,
            FakeMap {
                container: *container,
                options: options.clone(),
                center: None,
                zoom: options.zoom,
                map_type: options.map_type,
                bounds: None,
            },
        );
        self.calls.push(Call::CreateMap(map));
        map
    }

    fn map_center(&self, map: MapHandle) -> Option<GeoPoint> {
        self.maps.get(&map).and_then(|m| m.center)
    }

    fn map_zoom(&self, map: MapHandle) -> f64 {
        self.maps.get(&map).map_or(0.0, |m| m.zoom)
    }

    fn map_type(&self, map: MapHandle) -> MapType {
        self.maps.get(&map).map_or_else(MapType::default, |m| m.map_type)
    }

    fn map_bounds(&self, map: MapHandle) -> Option<GeoBounds> {
        self.maps.get(&map).and_then(|m| m.bounds)
    }

    fn set_center(&mut self, map: MapHandle, center: GeoPoint) {
        self.calls.push(Call::SetCenter(map, center));
        self.move_center(map, center);
    }

    fn pan_to(&mut self, map: MapHandle, center: GeoPoint) {
        self.calls.push(Call::PanTo(map, center));
        self.move_center(map, center);
    }

    fn set_zoom(&mut self, map: MapHandle, zoom: f64) {
        self.calls.push(Call::SetZoom(map, zoom));
        if let Some(m) = self.maps.get_mut(&map)
            && m.zoom != zoom
        {
            m.zoom = zoom;
            self.fire(Target::Map(map), "zoom_changed", EventPayload::None);
        }
    }

    fn set_map_type(&mut self, map: MapHandle, map_type: MapType) {
        self.calls.push(Call::SetMapType(map, map_type));
        if let Some(m) = self.maps.get_mut(&map)
            && m.map_type != map_type
        {
            m.map_type = map_type;
            self.fire(Target::Map(map), "maptypeid_changed", EventPayload::None);
        }
    }

    fn set_map_options(&mut self, map: MapHandle, options: &[MapOption]) {
        self.calls.push(Call::SetMapOptions(map, options.to_vec()));
    }

    fn fit_bounds(&mut self, map: MapHandle, bounds: GeoBounds) {
        self.calls.push(Call::FitBounds(map, bounds));
        if let Some(m) = self.maps.get_mut(&map) {
            m.bounds = Some(bounds);
        }
    }

    fn add_kml_layer(&mut self, map: MapHandle, url: &str) -> KmlHandle {
        let layer = KmlHandle(self.next());
        self.kml_layers.insert(layer, map);
        self.calls.push(Call::AddKml(layer, url.to_string()));
        layer
    }

    fn remove_kml_layer(&mut self, layer: KmlHandle) {
        self.kml_layers.remove(&layer);
        self.calls.push(Call::RemoveKml(layer));
    }

    fn create_marker(&mut self, options: &MarkerOptions) -> MarkerHandle {
        let marker = MarkerHandle(self.next());
        self.markers.insert(
            marker,
            FakeMarker {
                options: options.clone(),
            },
        );
        self.calls.push(Call::CreateMarker(marker));
        marker
    }

    fn set_marker(&mut self, marker: MarkerHandle, option: MarkerOption) {
        if let Some(m) = self.markers.get_mut(&marker) {
            let o = &mut m.options;
            match &option {
                MarkerOption::Map(map) => o.map = *map,
                MarkerOption::Position(p) => o.position = Some(*p),
                MarkerOption::Title(t) => o.title.clone_from(t),
                MarkerOption::Animation(a) => o.animation = Some(*a),
                MarkerOption::Draggable(d) => o.draggable = *d,
                MarkerOption::Icon(i) => o.icon.clone_from(i),
                MarkerOption::Label(l) => o.label.clone_from(l),
                MarkerOption::ZIndex(z) => o.z_index = *z,
            }
        }
        self.calls.push(Call::SetMarker(marker, option));
    }

    fn create_info_window(&mut self) -> InfoWindowHandle {
        let info = InfoWindowHandle(self.next());
        self.info_windows.insert(info, FakeInfoWindow::default());
        self.calls.push(Call::CreateInfoWindow(info));
        info
    }

    fn set_info_content(&mut self, info: InfoWindowHandle, nodes: &[Node]) {
        if let Some(w) = self.info_windows.get_mut(&info) {
            w.content = nodes.to_vec();
        }
        self.calls.push(Call::SetInfoContent(info, nodes.to_vec()));
    }

    fn open_info_window(&mut self, info: InfoWindowHandle, _map: MapHandle, anchor: MarkerHandle) {
        if let Some(w) = self.info_windows.get_mut(&info) {
            w.anchor = Some(anchor);
        }
        self.calls.push(Call::OpenInfoWindow(info, anchor));
    }

    fn close_info_window(&mut self, info: InfoWindowHandle) {
        if let Some(w) = self.info_windows.get_mut(&info) {
            w.anchor = None;
        }
        self.calls.push(Call::CloseInfoWindow(info));
    }

    fn create_path(&mut self) -> PathHandle {
        let path = PathHandle(self.next());
        self.paths.insert(path, Vec::new());
        self.calls.push(Call::CreatePath(path));
        path
    }

    fn path_clear(&mut self, path: PathHandle) {
        if let Some(vertices) = self.paths.get_mut(&path) {
            vertices.clear();
        }
        self.calls.push(Call::PathClear(path));
    }

    fn path_push(&mut self, path: PathHandle, vertex: GeoPoint) {
        let vertices = self.paths.entry(path).or_default();
        vertices.push(vertex);
        let index = vertices.len() - 1;
        self.calls.push(Call::PathPush(path, vertex));
        self.fire(
            Target::Path(path),
            "insert_at",
            EventPayload::Vertex {
                index,
                position: vertex,
            },
        );
    }

    fn path_points(&self, path: PathHandle) -> Vec<GeoPoint> {
        self.path(path).to_vec()
    }

    fn create_poly(&mut self, options: &PolyOptions) -> PolyHandle {
        let poly = PolyHandle(self.next());
        self.polys.insert(poly, options.clone());
        self.calls.push(Call::CreatePoly(poly));
        poly
    }

    fn set_poly(&mut self, poly: PolyHandle, option: PolyOption) {
        if let Some(o) = self.polys.get_mut(&poly) {
            match &option {
                PolyOption::Map(map) => o.map = *map,
                PolyOption::Clickable(v) => o.clickable = *v,
                PolyOption::Draggable(v) => o.draggable = *v,
                PolyOption::Editable(v) => o.editable = *v,
                PolyOption::Geodesic(v) => o.geodesic = *v,
                PolyOption::StrokeColor(v) => o.stroke_color.clone_from(v),
                PolyOption::StrokeOpacity(v) => o.stroke_opacity = *v,
                PolyOption::StrokePosition(v) => o.stroke_position = *v,
                PolyOption::StrokeWeight(v) => o.stroke_weight = *v,
                PolyOption::ZIndex(v) => o.z_index = *v,
                PolyOption::FillColor(_) | PolyOption::FillOpacity(_) | PolyOption::Icons(_) => {}
            }
        }
        self.calls.push(Call::SetPoly(poly, option));
    }

    fn create_renderer(&mut self, _options: &RendererOptions) -> RendererHandle {
        let renderer = RendererHandle(self.next());
        self.renderers.insert(renderer, None);
        self.calls.push(Call::CreateRenderer(renderer));
        renderer
    }

    fn set_renderer_map(&mut self, renderer: RendererHandle, map: Option<MapHandle>) {
        self.renderers.insert(renderer, map);
        self.calls.push(Call::SetRendererMap(renderer, map));
    }

    fn set_renderer_directions(&mut self, renderer: RendererHandle, result: &DirectionsResult) {
        self.calls
            .push(Call::SetRendererDirections(renderer, result.clone()));
    }

    fn route(&mut self, request: &DirectionsRequest) -> RequestId {
        let id = RequestId(self.next());
        self.calls.push(Call::Route(id, request.clone()));
        id
    }

    fn text_search(&mut self, _map: MapHandle, request: &TextSearchRequest) -> RequestId {
        let id = RequestId(self.next());
        self.calls.push(Call::TextSearch(id, request.clone()));
        id
    }

    fn place_details(&mut self, _map: MapHandle, place_id: &str) -> RequestId {
        let id = RequestId(self.next());
        self.calls.push(Call::PlaceDetails(id, place_id.to_string()));
        id
    }

    fn add_listener(&mut self, target: Target, name: &str) -> ListenerId {
        self.listen(target, name, false)
    }

    fn add_listener_once(&mut self, target: Target, name: &str) -> ListenerId {
        self.listen(target, name, true)
    }

    fn remove_listener(&mut self, listener: ListenerId) {
        self.listeners.remove(&listener);
    }

    fn clear_instance_listeners(&mut self, target: Target) {
        self.listeners.retain(|_, s| s.target != target);
    }

    fn trigger(&mut self, target: Target, name: &str) {
        self.calls.push(Call::Trigger(target, name.to_string()));
        if name == "resize"
            && let Target::Map(map) = target
            && let Some(to) = self.resize_drift
        {
            self.move_center(map, to);
        }
        self.fire(target, name, EventPayload::None);
    }

    fn take_deliveries(&mut self, out: &mut Vec<Delivery>) {
        out.append(&mut self.deliveries);
    }
}
