// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element payloads, kinds and component events.

use alloc::string::String;
use alloc::vec::Vec;

use crate::component::{
    Component, DirectionsElement, MapElement, MarkerElement, PointElement, PolyElement,
    SearchElement,
};
use crate::engine::{EventPayload, MapEngine};
use crate::error::Error;
use crate::geo::GeoPoint;
use crate::handle::MapHandle;
use crate::service::{DirectionsResult, PlaceResult, SearchResult};
use crate::tree::{ElementId, SlotName};

/// The kind of an element, identified by its tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// `<google-map>`.
    Map,
    /// `<google-map-marker>`.
    Marker,
    /// `<google-map-poly>`.
    Poly,
    /// `<google-map-point>`.
    Point,
    /// `<google-map-directions>`.
    Directions,
    /// `<google-map-search>`.
    Search,
    /// Any other host element (info-window content, containers).
    Host,
}

impl ElementKind {
    /// Returns the element's tag name, which also prefixes its events.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Map => "google-map",
            Self::Marker => "google-map-marker",
            Self::Poly => "google-map-poly",
            Self::Point => "google-map-point",
            Self::Directions => "google-map-directions",
            Self::Search => "google-map-search",
            Self::Host => "host",
        }
    }

    /// Returns the slots this kind projects its children into.
    #[must_use]
    pub const fn slots(self) -> &'static [SlotName] {
        match self {
            Self::Map => &[SlotName::Named("markers"), SlotName::Default],
            Self::Marker | Self::Poly => &[SlotName::Default],
            Self::Point | Self::Directions | Self::Search | Self::Host => &[],
        }
    }
}

/// An element's payload: component state, or a plain host node.
#[derive(Debug)]
pub enum Element<N> {
    /// A map.
    Map(MapElement<N>),
    /// A marker.
    Marker(MarkerElement),
    /// A polyline or polygon.
    Poly(PolyElement),
    /// A path vertex.
    Point(PointElement),
    /// A directions renderer.
    Directions(DirectionsElement),
    /// A places search.
    Search(SearchElement),
    /// A host node with no component behavior.
    Host(N),
}

impl<N> Element<N> {
    /// Returns the element's kind.
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        match self {
            Self::Map(_) => ElementKind::Map,
            Self::Marker(_) => ElementKind::Marker,
            Self::Poly(_) => ElementKind::Poly,
            Self::Point(_) => ElementKind::Point,
            Self::Directions(_) => ElementKind::Directions,
            Self::Search(_) => ElementKind::Search,
            Self::Host(_) => ElementKind::Host,
        }
    }

    /// Returns the element as a map-handle receiver, if its kind is one.
    pub fn accepts_map_mut(&mut self) -> Option<&mut dyn AcceptsMap> {
        match self {
            Self::Marker(m) => Some(m),
            Self::Poly(p) => Some(p),
            Self::Directions(d) => Some(d),
            Self::Search(s) => Some(s),
            Self::Map(_) | Self::Point(_) | Self::Host(_) => None,
        }
    }

    /// Returns the element's reconciliation hooks. Host nodes have none.
    pub(crate) fn component<E: MapEngine<Node = N>>(&mut self) -> Option<&mut dyn Component<E>> {
        Some(match self {
            Self::Map(m) => m as &mut dyn Component<E>,
            Self::Marker(m) => m,
            Self::Poly(p) => p,
            Self::Point(p) => p,
            Self::Directions(d) => d,
            Self::Search(s) => s,
            Self::Host(_) => return None,
        })
    }

    /// Elements this one owns outside the tree, such as relocated
    /// info-window content.
    pub(crate) fn relocated(&self) -> &[ElementId] {
        match self {
            Self::Marker(m) => m.relocated(),
            _ => &[],
        }
    }

    /// Applies a string attribute with the host runtime's conversions.
    ///
    /// Unknown attributes, and attributes of host nodes, are ignored.
    pub fn set_attribute(&mut self, name: &str, value: Option<&str>) -> Result<(), Error> {
        match self {
            Self::Map(m) => m.set_attribute(name, value),
            Self::Marker(m) => m.set_attribute(name, value),
            Self::Poly(p) => p.set_attribute(name, value),
            Self::Point(p) => p.set_attribute(name, value),
            Self::Directions(d) => d.set_attribute(name, value),
            Self::Search(s) => s.set_attribute(name, value),
            Self::Host(_) => Ok(()),
        }
    }
}

/// Something a parent can push its map handle onto.
///
/// A map assigns its handle to every child in its slots that accepts one and
/// never calls the engine on a child's behalf.
pub trait AcceptsMap {
    /// Returns the map handle currently held.
    fn map(&self) -> Option<MapHandle>;

    /// Replaces the held map handle. Takes effect at the next reconciliation.
    fn set_map(&mut self, map: Option<MapHandle>);
}

/// Detail carried by a component event.
#[derive(Clone, Debug, PartialEq)]
pub enum EventDetail {
    /// No detail.
    None,
    /// A forwarded engine event, verbatim.
    Engine(EventPayload),
    /// A snapshot of a poly's path buffer.
    Path(Vec<GeoPoint>),
    /// A routing response.
    Directions(DirectionsResult),
    /// Search results with flattened coordinates.
    Results(Vec<SearchResult>),
    /// A place-detail lookup result.
    Place(PlaceResult),
}

/// An event dispatched by a component.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementEvent {
    /// The emitting element.
    pub target: ElementId,
    /// Event name, `<tag>-<event>`.
    pub name: String,
    /// Event detail.
    pub detail: EventDetail,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_follow_component_layout() {
        assert_eq!(
            ElementKind::Map.slots(),
            &[SlotName::Named("markers"), SlotName::Default]
        );
        assert_eq!(ElementKind::Poly.slots(), &[SlotName::Default]);
        assert!(ElementKind::Point.slots().is_empty());
    }

    #[test]
    fn only_overlay_kinds_accept_a_map() {
        let mut marker = Element::<()>::Marker(MarkerElement::default());
        marker
            .accepts_map_mut()
            .expect("markers accept a map")
            .set_map(Some(MapHandle(3)));
        let Element::Marker(m) = &marker else {
            unreachable!()
        };
        assert_eq!(AcceptsMap::map(m), Some(MapHandle(3)));

        let mut point = Element::<()>::Point(PointElement::default());
        assert!(point.accepts_map_mut().is_none());
        let mut host = Element::Host(());
        assert!(host.accepts_map_mut().is_none());
    }
}
