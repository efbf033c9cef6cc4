// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `<google-map-poly>`: a polyline or polygon drawn through its child points.
//!
//! The poly owns a live path buffer in the engine. Two writers touch it: the
//! poly itself, when its slotted points change, and the engine, when the user
//! edits vertices. Both show up as the same `insert_at` events on the buffer,
//! so the poly tracks a [`PathPhase`]:
//!
//! - `Idle → Building` when the point list changes. The buffer is cleared and
//!   refilled in slot order, and the `insert_at` echoes of those writes are
//!   discarded before anything else sees them. Back to `Idle` afterwards, with
//!   one `google-map-poly-path-built` event.
//! - `Idle → Editing` on any other `insert_at`. The cached point list is
//!   dropped, since the buffer now has vertices no point declares, and the
//!   next map click is armed to end the edit.
//! - `Editing → Idle` on that click, with one `google-map-poly-path-updated`
//!   event. The click subscription is one-shot.
//!
//! Moving the poly to another map, or switching it between polyline and
//! polygon, while editing drops the armed click and returns to `Idle`.
//!
//! Every slotted point must have a finite position. A point that does not
//! fails the rebuild with [`Error::TypeViolation`] before the buffer is
//! touched.
//!
//! `set_at` on the buffer (a vertex dragged) is written straight back into
//! the matching cached point. While editing there is no cache and the write
//! is skipped.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::document::Cx;
use crate::element::{AcceptsMap, Element, EventDetail};
use crate::engine::{EventPayload, MapEngine};
use crate::error::Error;
use crate::geo::GeoPoint;
use crate::handle::{ListenerId, MapHandle, PathHandle, PolyHandle, Target};
use crate::listeners::{EventGroup, ListenerTable, RouteKind, Subscriptions, Surface};
use crate::options::{IconSequence, PolyOption, PolyOptions, PolyShape, StrokePosition};
use crate::props::{Changed, assign, attr_bool, attr_int, attr_number, props};
use crate::trace::{HandleKind, PathPhaseEvent};
use crate::tree::{ElementId, SlotName};

use super::Component;

/// Who is writing to a poly's path buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PathPhase {
    /// Nobody; the buffer matches the cached points.
    #[default]
    Idle,
    /// The poly is refilling the buffer from its points.
    Building,
    /// The user is editing vertices in the engine.
    Editing,
}

props! {
    enum PolyProp {
        Map,
        Clickable,
        ClickEvents,
        Closed,
        DragEvents,
        Editable,
        FillColor,
        FillOpacity,
        Geodesic,
        Icons,
        MouseEvents,
        StrokeColor,
        StrokeOpacity,
        StrokePosition,
        StrokeWeight,
        ZIndex,
        Draggable,
    }
}

/// Polyline or polygon state.
#[derive(Clone, Debug)]
pub struct PolyElement {
    map: Option<MapHandle>,
    clickable: bool,
    click_events: bool,
    closed: bool,
    draggable: bool,
    drag_events: bool,
    editable: bool,
    fill_color: String,
    fill_opacity: f64,
    geodesic: bool,
    icons: Option<Vec<IconSequence>>,
    mouse_events: bool,
    stroke_color: String,
    stroke_opacity: f64,
    stroke_position: StrokePosition,
    stroke_weight: f64,
    z_index: i32,
    hidden: bool,

    poly: Option<PolyHandle>,
    path: Option<PathHandle>,
    phase: PathPhase,
    /// Points the buffer was last built from, in buffer order.
    points: Option<Vec<ElementId>>,
    /// The one-shot map click that ends an edit.
    end_editing: Option<ListenerId>,
    listeners: ListenerTable,

    changed: Changed<PolyProp>,
}

impl Default for PolyElement {
    fn default() -> Self {
        Self {
            map: None,
            clickable: false,
            click_events: false,
            closed: false,
            draggable: false,
            drag_events: false,
            editable: false,
            fill_color: String::new(),
            fill_opacity: 0.0,
            geodesic: false,
            icons: None,
            mouse_events: false,
            stroke_color: "black".to_string(),
            stroke_opacity: 1.0,
            stroke_position: StrokePosition::Center,
            stroke_weight: 3.0,
            z_index: 0,
            hidden: false,
            poly: None,
            path: None,
            phase: PathPhase::Idle,
            points: None,
            end_editing: None,
            listeners: ListenerTable::default(),
            changed: Changed::default(),
        }
    }
}

macro_rules! setter {
    ($(#[$meta:meta])* $name:ident, $field:ident: $ty:ty, $prop:ident) => {
        $(#[$meta])*
        pub fn $name(&mut self, value: $ty) {
            assign(&mut self.$field, value, &mut self.changed, PolyProp::$prop);
        }
    };
}

impl PolyElement {
    /// Creates an open polyline with default styling.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The engine shape, once created.
    #[must_use]
    pub fn handle(&self) -> Option<PolyHandle> {
        self.poly
    }

    /// The path buffer, once created. It outlives shape recreation.
    #[must_use]
    pub fn path(&self) -> Option<PathHandle> {
        self.path
    }

    /// Current path phase.
    #[must_use]
    pub fn phase(&self) -> PathPhase {
        self.phase
    }

    /// Whether the user is editing the path.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.phase == PathPhase::Editing
    }

    /// Whether this is a polygon.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    setter!(
        /// Makes the shape receive mouse events.
        set_clickable, clickable: bool, Clickable
    );
    setter!(
        /// Forwards `click`, `dblclick` and `rightclick`.
        set_click_events, click_events: bool, ClickEvents
    );
    setter!(
        /// Switches between polyline and polygon. Recreates the shape.
        set_closed, closed: bool, Closed
    );
    setter!(
        /// Lets the user drag the whole shape.
        set_draggable, draggable: bool, Draggable
    );
    setter!(
        /// Forwards `drag`, `dragend` and `dragstart`.
        set_drag_events, drag_events: bool, DragEvents
    );
    setter!(
        /// Lets the user edit vertices.
        set_editable, editable: bool, Editable
    );
    setter!(
        /// Polygon fill color.
        set_fill_color, fill_color: String, FillColor
    );
    setter!(
        /// Polygon fill opacity.
        set_fill_opacity, fill_opacity: f64, FillOpacity
    );
    setter!(
        /// Draws edges as geodesics.
        set_geodesic, geodesic: bool, Geodesic
    );
    setter!(
        /// Symbols along a polyline.
        set_icons, icons: Option<Vec<IconSequence>>, Icons
    );
    setter!(
        /// Forwards the five mouse button and hover events.
        set_mouse_events, mouse_events: bool, MouseEvents
    );
    setter!(
        /// Stroke color.
        set_stroke_color, stroke_color: String, StrokeColor
    );
    setter!(
        /// Stroke opacity.
        set_stroke_opacity, stroke_opacity: f64, StrokeOpacity
    );
    setter!(
        /// Stroke placement.
        set_stroke_position, stroke_position: StrokePosition, StrokePosition
    );
    setter!(
        /// Stroke width in pixels.
        set_stroke_weight, stroke_weight: f64, StrokeWeight
    );
    setter!(
        /// Stacking order.
        set_z_index, z_index: i32, ZIndex
    );

    /// Hides the shape. Only read when the shape is created.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub(crate) fn set_attribute(&mut self, name: &str, value: Option<&str>) -> Result<(), Error> {
        match name {
            "clickable" => self.set_clickable(attr_bool(value)),
            "click-events" => self.set_click_events(attr_bool(value)),
            "closed" => self.set_closed(attr_bool(value)),
            "draggable" => self.set_draggable(attr_bool(value)),
            "drag-events" => self.set_drag_events(attr_bool(value)),
            "editable" => self.set_editable(attr_bool(value)),
            "fill-color" => self.set_fill_color(value.unwrap_or_default().to_string()),
            "fill-opacity" => self.set_fill_opacity(attr_number(value)),
            "geodesic" => self.set_geodesic(attr_bool(value)),
            "mouse-events" => self.set_mouse_events(attr_bool(value)),
            "stroke-color" => self.set_stroke_color(value.unwrap_or_default().to_string()),
            "stroke-opacity" => self.set_stroke_opacity(attr_number(value)),
            "stroke-position" => {
                let position = match value {
                    None => StrokePosition::Center,
                    Some(v) => StrokePosition::parse(v).ok_or_else(|| Error::InvalidAttribute {
                        name: name.to_string(),
                        value: v.to_string(),
                    })?,
                };
                self.set_stroke_position(position);
            }
            "stroke-weight" => self.set_stroke_weight(attr_number(value)),
            "z-index" => self.set_z_index(attr_int(value)),
            "hidden" => self.set_hidden(attr_bool(value)),
            _ => {}
        }
        Ok(())
    }

    fn shape(&self) -> PolyShape {
        if self.closed {
            PolyShape::Polygon {
                fill_color: self.fill_color.clone(),
                fill_opacity: self.fill_opacity,
            }
        } else {
            PolyShape::Polyline {
                icons: self.icons.clone(),
            }
        }
    }

    fn group_enabled(&self, group: EventGroup) -> bool {
        match group {
            EventGroup::Click => self.click_events,
            EventGroup::Drag => self.drag_events,
            EventGroup::Mouse => self.mouse_events,
        }
    }
}

impl PolyElement {
    fn set_phase<E: MapEngine>(&mut self, cx: &mut Cx<'_, '_, E>, to: PathPhase) {
        if self.phase == to {
            return;
        }
        cx.tracer.path_phase(&PathPhaseEvent {
            element: cx.id(),
            from: self.phase,
            to,
        });
        self.phase = to;
    }

    /// Detaches and forgets the current shape. The path buffer is kept.
    fn teardown<E: MapEngine>(&mut self, cx: &mut Cx<'_, '_, E>) {
        self.cancel_editing(cx);
        let Some(poly) = self.poly.take() else {
            return;
        };
        cx.engine.set_poly(poly, PolyOption::Map(None));
        cx.clear_instance(Target::Poly(poly));
        cx.released(HandleKind::Poly);
        self.listeners.forget();
    }

    /// Creates the shape on `map`, and the path buffer on first use.
    ///
    /// The shape is created even if the first build fails; the error is
    /// returned afterwards and the buffer stays empty.
    fn create_poly<E: MapEngine>(
        &mut self,
        cx: &mut Cx<'_, '_, E>,
        map: MapHandle,
    ) -> Result<(), Error> {
        let mut built = Ok(());
        let path = match self.path {
            Some(path) => path,
            None => {
                let path = cx.engine.create_path();
                cx.created(HandleKind::Path);
                cx.subscribe(Target::Path(path), "insert_at", RouteKind::PathInsert);
                cx.subscribe(Target::Path(path), "set_at", RouteKind::PathSet);
                self.path = Some(path);
                built = self.build_path(cx);
                path
            }
        };

        let poly = cx.engine.create_poly(&PolyOptions {
            shape: self.shape(),
            map: Some(map),
            path,
            clickable: self.clickable || self.draggable,
            draggable: self.draggable,
            editable: self.editable,
            geodesic: self.geodesic,
            stroke_color: self.stroke_color.clone(),
            stroke_opacity: self.stroke_opacity,
            stroke_position: self.stroke_position,
            stroke_weight: self.stroke_weight,
            visible: !self.hidden,
            z_index: self.z_index,
        });
        cx.created(HandleKind::Poly);
        self.poly = Some(poly);
        self.listeners.forget();
        for group in [EventGroup::Click, EventGroup::Mouse, EventGroup::Drag] {
            self.apply_group(cx, group);
        }
        built
    }

    /// Refills the path buffer from the slotted points, in slot order.
    ///
    /// Children that are not points are ignored. A point without a valid
    /// position fails the build and leaves the buffer and the cached point
    /// list as they were.
    fn build_path<E: MapEngine>(&mut self, cx: &mut Cx<'_, '_, E>) -> Result<(), Error> {
        let mut points: Vec<(ElementId, GeoPoint)> = Vec::new();
        for &child in cx.tree.assignment(cx.id(), SlotName::Default) {
            if let Some(Element::Point(point)) = cx.tree.get(child) {
                points.push((child, point.position()?));
            }
        }
        self.points = Some(points.iter().map(|&(id, _)| id).collect());

        let Some(path) = self.path else {
            return Ok(());
        };
        // Earlier deliveries are real edits and must not be discarded below.
        cx.pump();
        let previous = self.phase;
        self.set_phase(cx, PathPhase::Building);
        cx.engine.path_clear(path);
        for &(_, position) in &points {
            cx.engine.path_push(path, position);
        }
        cx.pump_discarding(RouteKind::PathInsert);
        self.set_phase(cx, previous);
        let built = cx.engine.path_points(path);
        cx.emit("google-map-poly-path-built", EventDetail::Path(built));
        Ok(())
    }

    fn apply_group<E: MapEngine>(&mut self, cx: &mut Cx<'_, '_, E>, group: EventGroup) {
        let Some(poly) = self.poly else {
            return;
        };
        let enabled = self.group_enabled(group);
        self.listeners
            .set_group(cx, Target::Poly(poly), group, Surface::Overlay, enabled);
    }

    fn start_editing<E: MapEngine>(&mut self, cx: &mut Cx<'_, '_, E>) {
        if self.phase != PathPhase::Idle {
            return;
        }
        let Some(map) = self.map else {
            return;
        };
        self.set_phase(cx, PathPhase::Editing);
        self.points = None;
        self.end_editing = Some(cx.listen_once(Target::Map(map), "click", RouteKind::EndEditing));
    }

    /// Leaves an edit without reporting it. The edited vertices stay.
    fn cancel_editing<E: MapEngine>(&mut self, cx: &mut Cx<'_, '_, E>) {
        if let Some(listener) = self.end_editing.take() {
            cx.unsubscribe(listener);
        }
        if self.phase == PathPhase::Editing {
            self.set_phase(cx, PathPhase::Idle);
        }
    }

    fn update_point<E: MapEngine>(&self, cx: &mut Cx<'_, '_, E>, index: usize, at: GeoPoint) {
        let Some(&point) = self.points.as_ref().and_then(|points| points.get(index)) else {
            return;
        };
        if let Some(Element::Point(p)) = cx.tree.get_mut(point) {
            p.set_latitude(Some(at.lat()));
            p.set_longitude(Some(at.lng()));
            cx.tree.mark_properties(point);
        }
    }
}

impl AcceptsMap for PolyElement {
    fn map(&self) -> Option<MapHandle> {
        self.map
    }

    fn set_map(&mut self, map: Option<MapHandle>) {
        assign(&mut self.map, map, &mut self.changed, PolyProp::Map);
    }
}

impl<E: MapEngine> Component<E> for PolyElement {
    fn has_changes(&self) -> bool {
        !self.changed.is_empty()
    }

    fn connected(&mut self, cx: &mut Cx<'_, '_, E>) -> Result<(), Error> {
        if let Some(poly) = self.poly {
            cx.engine.set_poly(poly, PolyOption::Map(self.map));
            for group in EventGroup::ALL {
                self.apply_group(cx, group);
            }
        }
        Ok(())
    }

    fn disconnected(&mut self, cx: &mut Cx<'_, '_, E>) {
        if let Some(poly) = self.poly {
            cx.engine.set_poly(poly, PolyOption::Map(None));
            self.listeners.clear_all(cx);
        }
    }

    fn slot_changed(&mut self, cx: &mut Cx<'_, '_, E>, _slot: SlotName) -> Result<(), Error> {
        self.build_path(cx)
    }

    fn reconcile(&mut self, cx: &mut Cx<'_, '_, E>) -> Result<(), Error> {
        use PolyProp as P;

        let changed = self.changed.take();
        if changed.any(&[P::Map, P::Closed]) {
            self.teardown(cx);
            return match self.map {
                Some(map) => self.create_poly(cx, map),
                None => Ok(()),
            };
        }
        let Some(poly) = self.poly else {
            return Ok(());
        };

        let set = |cx: &mut Cx<'_, '_, E>, prop: P, option: PolyOption| {
            if changed.has(prop) {
                cx.engine.set_poly(poly, option);
            }
        };
        set(cx, P::Clickable, PolyOption::Clickable(self.clickable));
        if changed.has(P::ClickEvents) {
            self.apply_group(cx, EventGroup::Click);
        }
        if changed.has(P::DragEvents) {
            self.apply_group(cx, EventGroup::Drag);
        }
        set(cx, P::Editable, PolyOption::Editable(self.editable));
        set(cx, P::FillColor, PolyOption::FillColor(self.fill_color.clone()));
        set(cx, P::FillOpacity, PolyOption::FillOpacity(self.fill_opacity));
        set(cx, P::Geodesic, PolyOption::Geodesic(self.geodesic));
        set(cx, P::Icons, PolyOption::Icons(self.icons.clone()));
        if changed.has(P::MouseEvents) {
            self.apply_group(cx, EventGroup::Mouse);
        }
        set(cx, P::StrokeColor, PolyOption::StrokeColor(self.stroke_color.clone()));
        set(cx, P::StrokeOpacity, PolyOption::StrokeOpacity(self.stroke_opacity));
        set(cx, P::StrokePosition, PolyOption::StrokePosition(self.stroke_position));
        set(cx, P::StrokeWeight, PolyOption::StrokeWeight(self.stroke_weight));
        set(cx, P::ZIndex, PolyOption::ZIndex(self.z_index));
        set(cx, P::Draggable, PolyOption::Draggable(self.draggable));
        Ok(())
    }

    fn route(
        &mut self,
        cx: &mut Cx<'_, '_, E>,
        kind: RouteKind,
        payload: EventPayload,
    ) -> Result<(), Error> {
        match kind {
            RouteKind::PathInsert => self.start_editing(cx),
            RouteKind::PathSet => {
                if let EventPayload::Vertex { index, position } = payload {
                    self.update_point(cx, index, position);
                }
            }
            RouteKind::EndEditing => {
                self.end_editing = None;
                self.set_phase(cx, PathPhase::Idle);
                let points = self
                    .path
                    .map(|path| cx.engine.path_points(path))
                    .unwrap_or_default();
                cx.emit("google-map-poly-path-updated", EventDetail::Path(points));
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_follows_closed() {
        let mut poly = PolyElement::new();
        poly.set_icons(Some(Vec::new()));
        assert_eq!(
            poly.shape(),
            PolyShape::Polyline {
                icons: Some(Vec::new())
            }
        );
        poly.set_closed(true);
        poly.set_fill_color("red".to_string());
        poly.set_fill_opacity(0.5);
        assert!(poly.shape().is_closed());
    }

    #[test]
    fn defaults_match_the_element_attributes() {
        let poly = PolyElement::new();
        assert_eq!(poly.stroke_color, "black");
        assert_eq!(poly.stroke_opacity, 1.0);
        assert_eq!(poly.stroke_weight, 3.0);
        assert_eq!(poly.phase(), PathPhase::Idle);
        assert!(poly.changed.is_empty());
    }

    #[test]
    fn stroke_position_is_case_insensitive() {
        let mut poly = PolyElement::new();
        poly.set_attribute("stroke-position", Some("INSIDE"))
            .unwrap();
        assert_eq!(poly.stroke_position, StrokePosition::Inside);
        assert!(
            poly.set_attribute("stroke-position", Some("nowhere"))
                .is_err()
        );
    }
}
