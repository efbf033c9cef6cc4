// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `<google-map>`: the map canvas and the root of every overlay.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::document::Cx;
use crate::element::{Element, EventDetail};
use crate::engine::{EventPayload, MapEngine};
use crate::error::Error;
use crate::geo::{GeoBounds, GeoPoint, check_finite};
use crate::handle::{KmlHandle, MapHandle, Target};
use crate::listeners::{EventGroup, ListenerTable, RouteKind, Subscriptions, Surface};
use crate::loader::{LoadOutcome, LoaderConfig};
use crate::options::{MapOption, MapOptions, MapType, MapTypeStyle, OptionValue};
use crate::props::{
    Changed, assign, attr_bool, attr_number, attr_opt_number, attr_string, props,
};
use crate::trace::HandleKind;
use crate::tree::{ElementId, SlotName};

use super::{Component, Task};

/// Default center latitude.
pub const DEFAULT_LATITUDE: f64 = 37.77493;
/// Default center longitude.
pub const DEFAULT_LONGITUDE: f64 = -122.41942;
/// Default zoom level.
pub const DEFAULT_ZOOM: f64 = 10.0;
/// Default engine version requested from the loader.
pub const DEFAULT_VERSION: &str = "3.exp";

const MARKERS: SlotName = SlotName::Named("markers");
const OBJECTS: SlotName = SlotName::Default;

props! {
    enum MapProp {
        Latitude,
        Longitude,
        Zoom,
        MapType,
        DisableDefaultUi,
        DisableMapTypeControl,
        DisableStreetViewControl,
        DisableZoom,
        MaxZoom,
        MinZoom,
        ClickEvents,
        DragEvents,
        MouseEvents,
        FitToMarkers,
        Kml,
        Draggable,
        Styles,
        Container,
    }
}

/// Map canvas state.
///
/// The map handle is created once the engine is loaded and a container is
/// attached. It then pushes itself onto every child in its `markers` and
/// default slots, and reads engine-driven center, zoom and type changes back
/// into its own properties.
#[derive(Debug)]
pub struct MapElement<N> {
    // -- Loader configuration --
    api_key: String,
    maps_url: String,
    client_id: String,
    language: String,
    version: String,

    // -- Properties --
    latitude: f64,
    longitude: f64,
    zoom: f64,
    kml: Option<String>,
    no_auto_tilt: bool,
    map_type: MapType,
    disable_default_ui: bool,
    disable_map_type_control: bool,
    disable_street_view_control: bool,
    fit_to_markers: bool,
    disable_zoom: bool,
    styles: Vec<MapTypeStyle>,
    max_zoom: Option<f64>,
    min_zoom: Option<f64>,
    click_events: bool,
    drag_events: bool,
    mouse_events: bool,
    additional_map_options: Vec<(String, OptionValue)>,
    draggable: bool,
    container: Option<N>,

    // -- Engine state --
    map: Option<MapHandle>,
    kml_layer: Option<KmlHandle>,
    api_loaded: bool,
    listeners: ListenerTable,
    markers: Vec<ElementId>,
    objects: Vec<ElementId>,

    changed: Changed<MapProp>,
}

impl<N> Default for MapElement<N> {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            maps_url: String::new(),
            client_id: String::new(),
            language: String::new(),
            version: DEFAULT_VERSION.to_string(),
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            zoom: DEFAULT_ZOOM,
            kml: None,
            no_auto_tilt: false,
            map_type: MapType::Roadmap,
            disable_default_ui: false,
            disable_map_type_control: false,
            disable_street_view_control: false,
            fit_to_markers: false,
            disable_zoom: false,
            styles: Vec::new(),
            max_zoom: None,
            min_zoom: None,
            click_events: false,
            drag_events: false,
            mouse_events: false,
            additional_map_options: Vec::new(),
            draggable: true,
            container: None,
            map: None,
            kml_layer: None,
            api_loaded: false,
            listeners: ListenerTable::default(),
            markers: Vec::new(),
            objects: Vec::new(),
            changed: Changed::default(),
        }
    }
}

impl<N> MapElement<N> {
    /// Creates a map with default properties.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Read access --

    /// The engine map, once created.
    #[must_use]
    pub fn handle(&self) -> Option<MapHandle> {
        self.map
    }

    /// Center latitude.
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Center longitude.
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Zoom level.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Map type.
    #[must_use]
    pub fn map_type(&self) -> MapType {
        self.map_type
    }

    /// Elements currently assigned to the `markers` slot.
    #[must_use]
    pub fn markers(&self) -> &[ElementId] {
        &self.markers
    }

    /// Elements currently assigned to the default slot.
    #[must_use]
    pub fn objects(&self) -> &[ElementId] {
        &self.objects
    }

    /// Script loader parameters derived from the loader properties.
    #[must_use]
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            maps_url: self.maps_url.clone(),
            api_key: self.api_key.clone(),
            client_id: self.client_id.clone(),
            language: self.language.clone(),
            version: self.version.clone(),
        }
    }

    // -- Setters --

    /// Sets the center latitude.
    ///
    /// # Errors
    ///
    /// [`Error::TypeViolation`] if the map handle exists and `latitude` is
    /// not finite. Nothing is stored in that case.
    pub fn set_latitude(&mut self, latitude: f64) -> Result<(), Error> {
        if self.map.is_some() {
            check_finite("latitude", latitude)?;
        }
        assign(
            &mut self.latitude,
            latitude,
            &mut self.changed,
            MapProp::Latitude,
        );
        Ok(())
    }

    /// Sets the center longitude.
    ///
    /// # Errors
    ///
    /// [`Error::TypeViolation`] if the map handle exists and `longitude` is
    /// not finite. Nothing is stored in that case.
    pub fn set_longitude(&mut self, longitude: f64) -> Result<(), Error> {
        if self.map.is_some() {
            check_finite("longitude", longitude)?;
        }
        assign(
            &mut self.longitude,
            longitude,
            &mut self.changed,
            MapProp::Longitude,
        );
        Ok(())
    }

    /// Sets the zoom level.
    pub fn set_zoom(&mut self, zoom: f64) {
        assign(&mut self.zoom, zoom, &mut self.changed, MapProp::Zoom);
    }

    /// Sets the map type.
    pub fn set_map_type(&mut self, map_type: MapType) {
        assign(
            &mut self.map_type,
            map_type,
            &mut self.changed,
            MapProp::MapType,
        );
    }

    /// Sets the KML layer URL.
    pub fn set_kml(&mut self, kml: Option<String>) {
        assign(&mut self.kml, kml, &mut self.changed, MapProp::Kml);
    }

    /// Disables 45° imagery at creation.
    pub fn set_no_auto_tilt(&mut self, no_auto_tilt: bool) {
        self.no_auto_tilt = no_auto_tilt;
    }

    /// Hides all default controls.
    pub fn set_disable_default_ui(&mut self, disable: bool) {
        assign(
            &mut self.disable_default_ui,
            disable,
            &mut self.changed,
            MapProp::DisableDefaultUi,
        );
    }

    /// Hides the map type control.
    pub fn set_disable_map_type_control(&mut self, disable: bool) {
        assign(
            &mut self.disable_map_type_control,
            disable,
            &mut self.changed,
            MapProp::DisableMapTypeControl,
        );
    }

    /// Hides the street view control.
    pub fn set_disable_street_view_control(&mut self, disable: bool) {
        assign(
            &mut self.disable_street_view_control,
            disable,
            &mut self.changed,
            MapProp::DisableStreetViewControl,
        );
    }

    /// Fits the viewport to the slotted markers whenever they change.
    pub fn set_fit_to_markers(&mut self, fit: bool) {
        assign(
            &mut self.fit_to_markers,
            fit,
            &mut self.changed,
            MapProp::FitToMarkers,
        );
    }

    /// Disables scroll-wheel and double-click zooming.
    pub fn set_disable_zoom(&mut self, disable: bool) {
        assign(
            &mut self.disable_zoom,
            disable,
            &mut self.changed,
            MapProp::DisableZoom,
        );
    }

    /// Sets the style list.
    pub fn set_styles(&mut self, styles: Vec<MapTypeStyle>) {
        assign(&mut self.styles, styles, &mut self.changed, MapProp::Styles);
    }

    /// Sets the maximum zoom level.
    pub fn set_max_zoom(&mut self, max_zoom: Option<f64>) {
        assign(
            &mut self.max_zoom,
            max_zoom,
            &mut self.changed,
            MapProp::MaxZoom,
        );
    }

    /// Sets the minimum zoom level.
    pub fn set_min_zoom(&mut self, min_zoom: Option<f64>) {
        assign(
            &mut self.min_zoom,
            min_zoom,
            &mut self.changed,
            MapProp::MinZoom,
        );
    }

    /// Forwards `click`, `dblclick` and `rightclick`.
    pub fn set_click_events(&mut self, enabled: bool) {
        assign(
            &mut self.click_events,
            enabled,
            &mut self.changed,
            MapProp::ClickEvents,
        );
    }

    /// Forwards `drag`, `dragend` and `dragstart`.
    pub fn set_drag_events(&mut self, enabled: bool) {
        assign(
            &mut self.drag_events,
            enabled,
            &mut self.changed,
            MapProp::DragEvents,
        );
    }

    /// Forwards `mousemove`, `mouseout` and `mouseover`.
    pub fn set_mouse_events(&mut self, enabled: bool) {
        assign(
            &mut self.mouse_events,
            enabled,
            &mut self.changed,
            MapProp::MouseEvents,
        );
    }

    /// Extra creation options, appended after the derived ones.
    pub fn set_additional_map_options(&mut self, options: Vec<(String, OptionValue)>) {
        self.additional_map_options = options;
    }

    /// Allows dragging the map.
    pub fn set_draggable(&mut self, draggable: bool) {
        assign(
            &mut self.draggable,
            draggable,
            &mut self.changed,
            MapProp::Draggable,
        );
    }

    /// Sets the API key requested from the loader.
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.api_key = api_key.into();
    }

    /// Sets the script location.
    pub fn set_maps_url(&mut self, maps_url: impl Into<String>) {
        self.maps_url = maps_url.into();
    }

    /// Sets the client id requested from the loader.
    pub fn set_client_id(&mut self, client_id: impl Into<String>) {
        self.client_id = client_id.into();
    }

    /// Sets the language requested from the loader.
    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    /// Sets the engine version requested from the loader.
    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    /// Provides the node the canvas is rendered into.
    pub fn set_container(&mut self, container: N) {
        self.container = Some(container);
        self.changed.insert(MapProp::Container);
    }

    pub(crate) fn set_attribute(&mut self, name: &str, value: Option<&str>) -> Result<(), Error> {
        match name {
            "api-key" => self.set_api_key(value.unwrap_or_default()),
            "maps-url" => self.set_maps_url(value.unwrap_or_default()),
            "client-id" => self.set_client_id(value.unwrap_or_default()),
            "language" => self.set_language(value.unwrap_or_default()),
            "version" => self.set_version(value.unwrap_or_default()),
            "latitude" => self.set_latitude(attr_number(value))?,
            "longitude" => self.set_longitude(attr_number(value))?,
            "zoom" => self.set_zoom(attr_number(value)),
            "kml" => self.set_kml(attr_string(value)),
            "no-auto-tilt" => self.set_no_auto_tilt(attr_bool(value)),
            "map-type" => {
                let map_type = match value {
                    None => MapType::default(),
                    Some(v) => MapType::parse(v).ok_or_else(|| invalid(name, v))?,
                };
                self.set_map_type(map_type);
            }
            "disable-default-ui" => self.set_disable_default_ui(attr_bool(value)),
            "disable-map-type-control" => self.set_disable_map_type_control(attr_bool(value)),
            "disable-street-view-control" => {
                self.set_disable_street_view_control(attr_bool(value));
            }
            "fit-to-markers" => self.set_fit_to_markers(attr_bool(value)),
            "disable-zoom" => self.set_disable_zoom(attr_bool(value)),
            "max-zoom" => self.set_max_zoom(attr_opt_number(value)),
            "min-zoom" => self.set_min_zoom(attr_opt_number(value)),
            "click-events" => self.set_click_events(attr_bool(value)),
            "drag-events" => self.set_drag_events(attr_bool(value)),
            "mouse-events" => self.set_mouse_events(attr_bool(value)),
            "draggable" => self.set_draggable(attr_bool(value)),
            _ => {}
        }
        Ok(())
    }

    /// Writes the center back without validation or engine calls.
    pub(crate) fn restore_center(&mut self, latitude: f64, longitude: f64) {
        assign(
            &mut self.latitude,
            latitude,
            &mut self.changed,
            MapProp::Latitude,
        );
        assign(
            &mut self.longitude,
            longitude,
            &mut self.changed,
            MapProp::Longitude,
        );
    }

    /// Creation options derived from the current properties.
    fn options(&self) -> MapOptions {
        MapOptions {
            zoom: self.zoom,
            tilt: if self.no_auto_tilt { 0.0 } else { 45.0 },
            map_type: self.map_type,
            disable_default_ui: self.disable_default_ui,
            map_type_control: !self.disable_default_ui && !self.disable_map_type_control,
            street_view_control: !self.disable_default_ui && !self.disable_street_view_control,
            disable_double_click_zoom: self.disable_zoom,
            scrollwheel: !self.disable_zoom,
            styles: self.styles.clone(),
            max_zoom: self.max_zoom,
            min_zoom: self.min_zoom,
            draggable: self.draggable,
            additional: self.additional_map_options.clone(),
        }
    }
}

impl<N> MapElement<N> {
    fn try_init<E: MapEngine<Node = N>>(&mut self, cx: &mut Cx<'_, '_, E>) -> Result<(), Error> {
        if self.map.is_some() || !self.api_loaded {
            return Ok(());
        }
        let Some(container) = &self.container else {
            return Ok(());
        };
        let map = cx.engine.create_map(container, &self.options());
        cx.created(HandleKind::Map);
        self.map = Some(map);
        self.listeners.forget();

        let centered = self.update_center(cx);
        self.load_kml(cx);
        self.update_markers(cx);
        self.update_objects(cx);
        self.add_map_listeners(cx, map);
        cx.emit("google-map-ready", EventDetail::None);
        centered
    }

    /// Centers on `latitude`/`longitude`: set when the map has no center
    /// yet, panned otherwise.
    fn update_center<E: MapEngine<Node = N>>(&self, cx: &mut Cx<'_, '_, E>) -> Result<(), Error> {
        let Some(map) = self.map else {
            return Ok(());
        };
        let center = GeoPoint::new(self.latitude, self.longitude)?;
        match cx.engine.map_center(map) {
            None => cx.engine.set_center(map, center),
            Some(old) if old != center => cx.engine.pan_to(map, center),
            Some(_) => {}
        }
        Ok(())
    }

    fn load_kml<E: MapEngine<Node = N>>(&mut self, cx: &mut Cx<'_, '_, E>) {
        let Some(map) = self.map else {
            return;
        };
        if let Some(layer) = self.kml_layer.take() {
            cx.engine.remove_kml_layer(layer);
            cx.released(HandleKind::Kml);
        }
        if let Some(url) = self.kml.as_deref().filter(|u| !u.is_empty()) {
            self.kml_layer = Some(cx.engine.add_kml_layer(map, url));
            cx.created(HandleKind::Kml);
        }
    }

    fn update_markers<E: MapEngine<Node = N>>(&mut self, cx: &mut Cx<'_, '_, E>) {
        self.markers = cx.tree.assignment(cx.id(), MARKERS).to_vec();
        self.attach_children(cx, MARKERS);
        self.fit_to_markers(cx);
    }

    fn update_objects<E: MapEngine<Node = N>>(&mut self, cx: &mut Cx<'_, '_, E>) {
        self.objects = cx.tree.assignment(cx.id(), OBJECTS).to_vec();
        self.attach_children(cx, OBJECTS);
    }

    /// Pushes the map handle onto every member of `slot` that accepts one.
    fn attach_children<E: MapEngine<Node = N>>(&self, cx: &mut Cx<'_, '_, E>, slot: SlotName) {
        let Some(map) = self.map else {
            return;
        };
        let members = if slot == MARKERS {
            &self.markers
        } else {
            &self.objects
        };
        for &child in members {
            let Some(receiver) = cx.tree.get_mut(child).and_then(Element::accepts_map_mut) else {
                continue;
            };
            if receiver.map() != Some(map) {
                receiver.set_map(Some(map));
                cx.tree.mark_properties(child);
            }
        }
    }

    /// Fits the viewport to the slotted markers' declared positions.
    ///
    /// No markers is a no-op, one marker only centers, more fit the covering
    /// bounds and then center on them explicitly.
    pub(crate) fn fit_to_markers<E: MapEngine<Node = N>>(&self, cx: &mut Cx<'_, '_, E>) {
        let Some(map) = self.map else {
            return;
        };
        if !self.fit_to_markers {
            return;
        }
        let positions: Vec<GeoPoint> = self
            .markers
            .iter()
            .filter_map(|&m| match cx.tree.get(m) {
                Some(Element::Marker(marker)) => marker.position(),
                _ => None,
            })
            .collect();
        let Some(bounds) = GeoBounds::covering(positions.iter().copied()) else {
            return;
        };
        if positions.len() > 1 {
            cx.engine.fit_bounds(map, bounds);
        }
        cx.engine.set_center(map, bounds.center());
    }

    fn add_map_listeners<E: MapEngine<Node = N>>(&mut self, cx: &mut Cx<'_, '_, E>, map: MapHandle) {
        let target = Target::Map(map);
        cx.subscribe(target, "center_changed", RouteKind::CenterChanged);
        cx.subscribe(target, "zoom_changed", RouteKind::ZoomChanged);
        cx.subscribe(target, "maptypeid_changed", RouteKind::MapTypeChanged);
        for group in EventGroup::ALL {
            let enabled = self.group_enabled(group);
            self.listeners
                .set_group(cx, target, group, Surface::Map, enabled);
        }
        self.listeners.forward(cx, target, "idle");
    }

    fn group_enabled(&self, group: EventGroup) -> bool {
        match group {
            EventGroup::Click => self.click_events,
            EventGroup::Drag => self.drag_events,
            EventGroup::Mouse => self.mouse_events,
        }
    }
}

impl<N, E: MapEngine<Node = N>> Component<E> for MapElement<N> {
    fn has_changes(&self) -> bool {
        !self.changed.is_empty()
    }

    fn connected(&mut self, cx: &mut Cx<'_, '_, E>) -> Result<(), Error> {
        if cx.load(&self.loader_config()) == LoadOutcome::Ready {
            self.api_loaded = true;
        }
        Ok(())
    }

    fn api_loaded(&mut self, cx: &mut Cx<'_, '_, E>) -> Result<(), Error> {
        self.api_loaded = true;
        self.try_init(cx)
    }

    fn slot_changed(&mut self, cx: &mut Cx<'_, '_, E>, slot: SlotName) -> Result<(), Error> {
        if slot == MARKERS {
            self.update_markers(cx);
        } else {
            self.update_objects(cx);
        }
        Ok(())
    }

    fn reconcile(&mut self, cx: &mut Cx<'_, '_, E>) -> Result<(), Error> {
        use MapProp as P;

        let changed = self.changed.take();
        if changed.any(&[P::Latitude, P::Longitude]) {
            cx.defer(Task::UpdateCenter);
        }
        if let Some(map) = self.map {
            if changed.has(P::Zoom) {
                cx.engine.set_zoom(map, self.zoom);
            }
            if changed.has(P::MapType) {
                cx.engine.set_map_type(map, self.map_type);
            }
            if changed.has(P::DisableDefaultUi) {
                cx.engine
                    .set_map_options(map, &[MapOption::DisableDefaultUi(self.disable_default_ui)]);
            }
            if changed.has(P::DisableMapTypeControl) {
                cx.engine.set_map_options(
                    map,
                    &[MapOption::MapTypeControl(!self.disable_map_type_control)],
                );
            }
            if changed.has(P::DisableStreetViewControl) {
                cx.engine.set_map_options(
                    map,
                    &[MapOption::StreetViewControl(
                        !self.disable_street_view_control,
                    )],
                );
            }
            if changed.has(P::DisableZoom) {
                cx.engine.set_map_options(
                    map,
                    &[
                        MapOption::DisableDoubleClickZoom(self.disable_zoom),
                        MapOption::Scrollwheel(!self.disable_zoom),
                    ],
                );
            }
            if changed.has(P::MaxZoom)
                && let Some(max) = self.max_zoom
            {
                cx.engine.set_map_options(map, &[MapOption::MaxZoom(max)]);
            }
            if changed.has(P::MinZoom)
                && let Some(min) = self.min_zoom
            {
                cx.engine.set_map_options(map, &[MapOption::MinZoom(min)]);
            }
            for (group, prop) in [
                (EventGroup::Click, P::ClickEvents),
                (EventGroup::Drag, P::DragEvents),
                (EventGroup::Mouse, P::MouseEvents),
            ] {
                if changed.has(prop) {
                    let enabled = self.group_enabled(group);
                    self.listeners
                        .set_group(cx, Target::Map(map), group, Surface::Map, enabled);
                }
            }
            if changed.has(P::FitToMarkers) {
                self.fit_to_markers(cx);
            }
            if changed.has(P::Kml) {
                self.load_kml(cx);
            }
            if changed.has(P::Draggable) {
                cx.engine
                    .set_map_options(map, &[MapOption::Draggable(self.draggable)]);
            }
            if changed.has(P::Styles) {
                cx.engine
                    .set_map_options(map, &[MapOption::Styles(self.styles.clone())]);
            }
        }
        self.try_init(cx)
    }

    fn route(
        &mut self,
        cx: &mut Cx<'_, '_, E>,
        kind: RouteKind,
        _payload: EventPayload,
    ) -> Result<(), Error> {
        let Some(map) = self.map else {
            return Ok(());
        };
        match kind {
            RouteKind::CenterChanged => {
                if let Some(center) = cx.engine.map_center(map) {
                    self.restore_center(center.lat(), center.lng());
                }
            }
            RouteKind::ZoomChanged => self.set_zoom(cx.engine.map_zoom(map)),
            RouteKind::MapTypeChanged => self.set_map_type(cx.engine.map_type(map)),
            _ => {}
        }
        Ok(())
    }

    fn run_task(&mut self, cx: &mut Cx<'_, '_, E>, task: Task) -> Result<(), Error> {
        match task {
            Task::UpdateCenter => self.update_center(cx),
        }
    }
}

fn invalid(name: &str, value: &str) -> Error {
    Error::InvalidAttribute {
        name: name.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creation_options_follow_ui_flags() {
        let mut map = MapElement::<()>::new();
        map.set_disable_map_type_control(true);
        map.set_disable_zoom(true);
        map.set_no_auto_tilt(true);
        let options = map.options();
        assert!(!options.map_type_control);
        assert!(options.street_view_control);
        assert!(options.disable_double_click_zoom);
        assert!(!options.scrollwheel);
        assert_eq!(options.tilt, 0.0);
        assert_eq!(options.zoom, DEFAULT_ZOOM);

        map.set_disable_default_ui(true);
        assert!(!map.options().street_view_control);
    }

    #[test]
    fn coordinates_are_only_validated_once_the_map_exists() {
        let mut map = MapElement::<()>::new();
        assert_eq!(map.set_latitude(f64::NAN), Ok(()));
        map.map = Some(MapHandle(1));
        assert_eq!(
            map.set_longitude(f64::INFINITY),
            Err(Error::TypeViolation { field: "longitude" })
        );
        assert_eq!(map.longitude(), DEFAULT_LONGITUDE, "rejected value is not stored");
    }

    #[test]
    fn map_type_attribute_rejects_unknown_names() {
        let mut map = MapElement::<()>::new();
        map.set_attribute("map-type", Some("satellite")).unwrap();
        assert_eq!(map.map_type(), MapType::Satellite);
        assert!(matches!(
            map.set_attribute("map-type", Some("moon")),
            Err(Error::InvalidAttribute { .. })
        ));
        map.set_attribute("map-type", None).unwrap();
        assert_eq!(map.map_type(), MapType::Roadmap);
    }

    #[test]
    fn loader_config_carries_defaults() {
        let mut map = MapElement::<()>::new();
        map.set_attribute("api-key", Some("k")).unwrap();
        let config = map.loader_config();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.version, DEFAULT_VERSION);
    }
}
