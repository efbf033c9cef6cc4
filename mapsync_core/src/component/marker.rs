// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `<google-map-marker>`: one marker and its optional info window.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::document::Cx;
use crate::element::{AcceptsMap, Element, EventDetail};
use crate::engine::{EventPayload, MapEngine};
use crate::error::Error;
use crate::geo::GeoPoint;
use crate::handle::{InfoWindowHandle, ListenerId, MapHandle, MarkerHandle, Target};
use crate::listeners::{EventGroup, ListenerTable, RouteKind, Subscriptions, Surface};
use crate::options::{Animation, Icon, MarkerOption, MarkerOptions};
use crate::props::{Changed, assign, attr_bool, attr_int, attr_opt_number, attr_string, props};
use crate::trace::HandleKind;
use crate::tree::{ElementId, SlotName};

use super::Component;

props! {
    enum MarkerProp {
        Map,
        Position,
        ClickEvents,
        DragEvents,
        MouseEvents,
        Animation,
        Label,
        Icon,
        ZIndex,
        Open,
        Draggable,
        Title,
    }
}

/// A marker placed on its parent map.
///
/// The marker's host-node children become the content of an info window,
/// relocated rather than copied, which opens on click and whenever `open` is
/// set.
#[derive(Clone, Debug, Default)]
pub struct MarkerElement {
    map: Option<MapHandle>,
    click_events: bool,
    drag_events: bool,
    mouse_events: bool,
    icon: Option<Icon>,
    z_index: i32,
    latitude: Option<f64>,
    longitude: Option<f64>,
    label: Option<String>,
    animation: Option<Animation>,
    open: bool,
    draggable: bool,
    title: String,
    hidden: bool,

    marker: Option<MarkerHandle>,
    info: Option<InfoWindowHandle>,
    listeners: ListenerTable,
    drag_handler: Option<ListenerId>,
    open_handler: Option<ListenerId>,
    close_handler: Option<ListenerId>,
    /// Host children moved into the info window. They live outside the tree
    /// and are destroyed with the marker.
    content: Vec<ElementId>,

    changed: Changed<MarkerProp>,
}

impl MarkerElement {
    /// Creates an unplaced marker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The engine marker, once created.
    #[must_use]
    pub fn handle(&self) -> Option<MarkerHandle> {
        self.marker
    }

    /// The info window, while the marker has content for one.
    #[must_use]
    pub fn info_window(&self) -> Option<InfoWindowHandle> {
        self.info
    }

    /// Latitude in degrees.
    #[must_use]
    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    /// Declared position, if both coordinates are set and finite.
    #[must_use]
    pub fn position(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.latitude, self.longitude)
            .ok()
            .flatten()
    }

    /// Host elements relocated into the info window and still detached.
    pub(crate) fn relocated(&self) -> &[ElementId] {
        &self.content
    }

    /// Whether the info window is requested open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Sets the latitude.
    pub fn set_latitude(&mut self, latitude: Option<f64>) {
        assign(
            &mut self.latitude,
            latitude,
            &mut self.changed,
            MarkerProp::Position,
        );
    }

    /// Sets the longitude.
    pub fn set_longitude(&mut self, longitude: Option<f64>) {
        assign(
            &mut self.longitude,
            longitude,
            &mut self.changed,
            MarkerProp::Position,
        );
    }

    /// Forwards `click`, `dblclick` and `rightclick`.
    pub fn set_click_events(&mut self, enabled: bool) {
        assign(
            &mut self.click_events,
            enabled,
            &mut self.changed,
            MarkerProp::ClickEvents,
        );
    }

    /// Forwards `drag`, `dragend` and `dragstart`.
    pub fn set_drag_events(&mut self, enabled: bool) {
        assign(
            &mut self.drag_events,
            enabled,
            &mut self.changed,
            MarkerProp::DragEvents,
        );
    }

    /// Forwards the five mouse button and hover events.
    pub fn set_mouse_events(&mut self, enabled: bool) {
        assign(
            &mut self.mouse_events,
            enabled,
            &mut self.changed,
            MarkerProp::MouseEvents,
        );
    }

    /// Sets the icon.
    pub fn set_icon(&mut self, icon: Option<Icon>) {
        assign(&mut self.icon, icon, &mut self.changed, MarkerProp::Icon);
    }

    /// Sets the stacking order.
    pub fn set_z_index(&mut self, z_index: i32) {
        assign(
            &mut self.z_index,
            z_index,
            &mut self.changed,
            MarkerProp::ZIndex,
        );
    }

    /// Sets the label text.
    pub fn set_label(&mut self, label: Option<String>) {
        assign(&mut self.label, label, &mut self.changed, MarkerProp::Label);
    }

    /// Sets the animation. Clearing it leaves a running animation alone.
    pub fn set_animation(&mut self, animation: Option<Animation>) {
        assign(
            &mut self.animation,
            animation,
            &mut self.changed,
            MarkerProp::Animation,
        );
    }

    /// Opens or closes the info window.
    pub fn set_open(&mut self, open: bool) {
        assign(&mut self.open, open, &mut self.changed, MarkerProp::Open);
    }

    /// Lets the user drag the marker; drags write back the position.
    pub fn set_draggable(&mut self, draggable: bool) {
        assign(
            &mut self.draggable,
            draggable,
            &mut self.changed,
            MarkerProp::Draggable,
        );
    }

    /// Sets the tooltip.
    pub fn set_title(&mut self, title: impl Into<String>) {
        assign(
            &mut self.title,
            title.into(),
            &mut self.changed,
            MarkerProp::Title,
        );
    }

    /// Hides the marker. Only read when the marker is created.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub(crate) fn set_attribute(&mut self, name: &str, value: Option<&str>) -> Result<(), Error> {
        match name {
            "latitude" => self.set_latitude(attr_opt_number(value)),
            "longitude" => self.set_longitude(attr_opt_number(value)),
            "click-events" => self.set_click_events(attr_bool(value)),
            "drag-events" => self.set_drag_events(attr_bool(value)),
            "mouse-events" => self.set_mouse_events(attr_bool(value)),
            "icon" => self.set_icon(value.map(|url| Icon::Url(url.to_string()))),
            "z-index" => self.set_z_index(attr_int(value)),
            "label" => self.set_label(attr_string(value)),
            "animation" => {
                let animation = match value {
                    None => None,
                    Some(v) => Some(Animation::parse(v).ok_or_else(|| Error::InvalidAttribute {
                        name: name.to_string(),
                        value: v.to_string(),
                    })?),
                };
                self.set_animation(animation);
            }
            "open" => self.set_open(attr_bool(value)),
            "draggable" => self.set_draggable(attr_bool(value)),
            "title" => self.set_title(value.unwrap_or_default()),
            "hidden" => self.set_hidden(attr_bool(value)),
            _ => {}
        }
        Ok(())
    }

    fn group_enabled(&self, group: EventGroup) -> bool {
        match group {
            EventGroup::Click => self.click_events,
            EventGroup::Drag => self.drag_events,
            EventGroup::Mouse => self.mouse_events,
        }
    }
}

impl MarkerElement {
    /// Detaches and forgets the current marker.
    fn teardown<E: MapEngine>(&mut self, cx: &mut Cx<'_, '_, E>) {
        let Some(marker) = self.marker.take() else {
            return;
        };
        cx.engine.set_marker(marker, MarkerOption::Map(None));
        cx.clear_instance(Target::Marker(marker));
        cx.released(HandleKind::Marker);
        self.listeners.forget();
        self.drag_handler = None;
        self.open_handler = None;
    }

    fn map_ready<E: MapEngine>(&mut self, cx: &mut Cx<'_, '_, E>, map: MapHandle) {
        let marker = cx.engine.create_marker(&MarkerOptions {
            map: Some(map),
            position: self.position(),
            title: self.title.clone(),
            animation: self.animation,
            draggable: self.draggable,
            visible: !self.hidden,
            icon: self.icon.clone(),
            label: self.label.clone(),
            z_index: self.z_index,
        });
        cx.created(HandleKind::Marker);
        self.marker = Some(marker);
        self.listeners.forget();

        self.relocate_content(cx);
        for group in EventGroup::ALL {
            self.apply_group(cx, group);
        }
        self.apply_open(cx);
        self.setup_drag_handler(cx);
    }

    /// Moves host-node children into the info window.
    ///
    /// With no children and a closed window, the window and its open/close
    /// subscriptions are dropped.
    fn relocate_content<E: MapEngine>(&mut self, cx: &mut Cx<'_, '_, E>) {
        let Some(marker) = self.marker else {
            return;
        };
        let id = cx.id();
        let moved: Vec<ElementId> = cx
            .tree
            .children(id)
            .filter(|&c| matches!(cx.tree.get(c), Some(Element::Host(_))))
            .collect();
        let nodes: Vec<E::Node> = moved
            .iter()
            .filter_map(|&c| match cx.tree.get(c) {
                Some(Element::Host(node)) => Some(node.clone()),
                _ => None,
            })
            .collect();
        for &child in &moved {
            cx.tree.detach_quietly(child);
        }
        self.content
            .retain(|&c| cx.tree.is_alive(c) && cx.tree.parent(c).is_none());
        self.content.extend(moved);

        if nodes.is_empty() {
            if self.info.is_some() && !self.open {
                if let Some(h) = self.open_handler.take() {
                    cx.unsubscribe(h);
                }
                if let Some(h) = self.close_handler.take() {
                    cx.unsubscribe(h);
                }
                self.info = None;
                cx.released(HandleKind::InfoWindow);
            }
        } else {
            let info = match self.info {
                Some(info) => info,
                None => {
                    let info = cx.engine.create_info_window();
                    cx.created(HandleKind::InfoWindow);
                    self.close_handler = Some(cx.subscribe(
                        Target::InfoWindow(info),
                        "closeclick",
                        RouteKind::CloseInfo,
                    ));
                    self.info = Some(info);
                    info
                }
            };
            cx.engine.set_info_content(info, &nodes);
        }

        if self.info.is_some() && self.open_handler.is_none() {
            self.open_handler =
                Some(cx.subscribe(Target::Marker(marker), "click", RouteKind::OpenInfo));
        }
    }

    fn apply_group<E: MapEngine>(&mut self, cx: &mut Cx<'_, '_, E>, group: EventGroup) {
        let Some(marker) = self.marker else {
            return;
        };
        let enabled = self.group_enabled(group);
        self.listeners
            .set_group(cx, Target::Marker(marker), group, Surface::Overlay, enabled);
    }

    fn apply_open<E: MapEngine>(&self, cx: &mut Cx<'_, '_, E>) {
        let (Some(info), Some(marker), Some(map)) = (self.info, self.marker, self.map) else {
            return;
        };
        if self.open {
            cx.engine.open_info_window(info, map, marker);
            cx.emit("google-map-marker-open", EventDetail::None);
        } else {
            cx.engine.close_info_window(info);
            cx.emit("google-map-marker-close", EventDetail::None);
        }
    }

    /// Keeps at most one `dragend` write-back subscription, present exactly
    /// while the marker is draggable.
    fn setup_drag_handler<E: MapEngine>(&mut self, cx: &mut Cx<'_, '_, E>) {
        let Some(marker) = self.marker else {
            return;
        };
        if self.draggable {
            if self.drag_handler.is_none() {
                self.drag_handler = Some(cx.subscribe(
                    Target::Marker(marker),
                    "dragend",
                    RouteKind::MarkerDragEnd,
                ));
            }
        } else if let Some(h) = self.drag_handler.take() {
            cx.unsubscribe(h);
        }
    }
}

impl AcceptsMap for MarkerElement {
    fn map(&self) -> Option<MapHandle> {
        self.map
    }

    fn set_map(&mut self, map: Option<MapHandle>) {
        assign(&mut self.map, map, &mut self.changed, MarkerProp::Map);
    }
}

impl<E: MapEngine> Component<E> for MarkerElement {
    fn has_changes(&self) -> bool {
        !self.changed.is_empty()
    }

    fn connected(&mut self, cx: &mut Cx<'_, '_, E>) -> Result<(), Error> {
        let Some(marker) = self.marker else {
            return Ok(());
        };
        cx.engine.set_marker(marker, MarkerOption::Map(self.map));
        if self.info.is_some() && self.open_handler.is_none() {
            self.open_handler =
                Some(cx.subscribe(Target::Marker(marker), "click", RouteKind::OpenInfo));
        }
        for group in EventGroup::ALL {
            self.apply_group(cx, group);
        }
        self.setup_drag_handler(cx);
        Ok(())
    }

    fn disconnected(&mut self, cx: &mut Cx<'_, '_, E>) {
        let Some(marker) = self.marker else {
            return;
        };
        cx.clear_instance(Target::Marker(marker));
        cx.engine.set_marker(marker, MarkerOption::Map(None));
        self.listeners.forget();
        self.drag_handler = None;
        self.open_handler = None;
    }

    fn slot_changed(&mut self, cx: &mut Cx<'_, '_, E>, _slot: SlotName) -> Result<(), Error> {
        self.relocate_content(cx);
        Ok(())
    }

    fn reconcile(&mut self, cx: &mut Cx<'_, '_, E>) -> Result<(), Error> {
        use MarkerProp as P;

        let changed = self.changed.take();
        if changed.has(P::Map) {
            if self.open
                && let Some(info) = self.info
            {
                cx.engine.close_info_window(info);
            }
            self.teardown(cx);
            if let Some(map) = self.map {
                self.map_ready(cx, map);
            }
            return Ok(());
        }
        let Some(marker) = self.marker else {
            return Ok(());
        };

        if changed.has(P::Position)
            && let Some(position) = self.position()
        {
            cx.engine.set_marker(marker, MarkerOption::Position(position));
        }
        for (group, prop) in [
            (EventGroup::Click, P::ClickEvents),
            (EventGroup::Drag, P::DragEvents),
            (EventGroup::Mouse, P::MouseEvents),
        ] {
            if changed.has(prop) {
                self.apply_group(cx, group);
            }
        }
        if changed.has(P::Animation)
            && let Some(animation) = self.animation
        {
            cx.engine
                .set_marker(marker, MarkerOption::Animation(animation));
        }
        if changed.has(P::Label) {
            cx.engine
                .set_marker(marker, MarkerOption::Label(self.label.clone()));
        }
        if changed.has(P::Icon) {
            cx.engine
                .set_marker(marker, MarkerOption::Icon(self.icon.clone()));
        }
        if changed.has(P::ZIndex) {
            cx.engine
                .set_marker(marker, MarkerOption::ZIndex(self.z_index));
        }
        if changed.has(P::Open) {
            self.apply_open(cx);
        }
        if changed.has(P::Draggable) {
            cx.engine
                .set_marker(marker, MarkerOption::Draggable(self.draggable));
            self.setup_drag_handler(cx);
        }
        if changed.has(P::Title) {
            cx.engine
                .set_marker(marker, MarkerOption::Title(self.title.clone()));
        }
        Ok(())
    }

    fn route(
        &mut self,
        _cx: &mut Cx<'_, '_, E>,
        kind: RouteKind,
        payload: EventPayload,
    ) -> Result<(), Error> {
        match kind {
            RouteKind::MarkerDragEnd => {
                if let EventPayload::Mouse(e) = payload
                    && let Some(at) = e.lat_lng
                {
                    self.set_latitude(Some(at.lat()));
                    self.set_longitude(Some(at.lng()));
                }
            }
            RouteKind::OpenInfo => self.set_open(true),
            RouteKind::CloseInfo => self.set_open(false),
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_needs_both_finite_coordinates() {
        let mut marker = MarkerElement::new();
        assert_eq!(marker.position(), None);
        marker.set_latitude(Some(10.0));
        assert_eq!(marker.position(), None);
        marker.set_longitude(Some(f64::NAN));
        assert_eq!(marker.position(), None);
        marker.set_longitude(Some(20.0));
        assert_eq!(marker.position(), GeoPoint::new(10.0, 20.0).ok());
    }

    #[test]
    fn attributes_convert_like_the_host() {
        let mut marker = MarkerElement::new();
        marker.set_attribute("z-index", Some("7")).unwrap();
        marker.set_attribute("animation", Some("BOUNCE")).unwrap();
        marker.set_attribute("icon", Some("pin.png")).unwrap();
        marker.set_attribute("draggable", Some("")).unwrap();
        assert_eq!(marker.z_index, 7);
        assert_eq!(marker.animation, Some(Animation::Bounce));
        assert_eq!(marker.icon, Some(Icon::Url("pin.png".into())));
        assert!(marker.draggable);
        assert!(
            marker
                .set_attribute("animation", Some("SPIN"))
                .is_err()
        );
    }
}
