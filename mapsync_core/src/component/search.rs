// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `<google-map-search>`: places text search and place details.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::document::Cx;
use crate::element::{AcceptsMap, EventDetail};
use crate::engine::{Delivery, MapEngine};
use crate::error::Error;
use crate::geo::{GeoPoint, check_finite};
use crate::handle::{MapHandle, RequestId};
use crate::pending::{Pending, Resolver, pending};
use crate::props::{Changed, assign, attr_bool, attr_opt_number, attr_string, props};
use crate::service::{PlaceResult, PlacesStatus, SearchResult, SearchScope, TextSearchRequest};
use crate::trace::RequestKind;

use super::Component;

props! {
    enum SearchProp {
        Latitude,
        Longitude,
        Query,
        Map,
        Radius,
        Types,
        GlobalSearch,
    }
}

/// Outcome of a place-detail lookup: the place, or the non-OK status.
pub type DetailsResult = Result<PlaceResult, PlacesStatus>;

/// Text search state.
///
/// A search runs whenever the query, map, location, radius, types or scope
/// flag change and both a query and a map are present. The scope is picked
/// in priority order: a radius searches around the location (or the map
/// center), otherwise the current viewport bounds unless `global-search` is
/// set.
#[derive(Debug, Default)]
pub struct SearchElement {
    map: Option<MapHandle>,
    query: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    radius: Option<f64>,
    global_search: bool,
    types: Option<String>,
    results: Vec<SearchResult>,

    location: Option<GeoPoint>,
    details: Vec<(RequestId, Resolver<DetailsResult>)>,

    changed: Changed<SearchProp>,
}

impl SearchElement {
    /// Creates an idle search.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Results of the last successful search.
    #[must_use]
    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    /// Search center, once set from `latitude`/`longitude` with a map present.
    #[must_use]
    pub fn location(&self) -> Option<GeoPoint> {
        self.location
    }

    /// Sets the query text.
    pub fn set_query(&mut self, query: Option<String>) {
        assign(&mut self.query, query, &mut self.changed, SearchProp::Query);
    }

    /// Sets the search center latitude.
    ///
    /// # Errors
    ///
    /// [`Error::TypeViolation`] if a map is set and `latitude` is unset or
    /// not finite. Nothing is stored in that case.
    pub fn set_latitude(&mut self, latitude: Option<f64>) -> Result<(), Error> {
        if self.map.is_some() {
            check_finite("latitude", latitude.unwrap_or(f64::NAN))?;
        }
        assign(
            &mut self.latitude,
            latitude,
            &mut self.changed,
            SearchProp::Latitude,
        );
        Ok(())
    }

    /// Sets the search center longitude.
    ///
    /// # Errors
    ///
    /// [`Error::TypeViolation`] if a map is set and `longitude` is unset or
    /// not finite. Nothing is stored in that case.
    pub fn set_longitude(&mut self, longitude: Option<f64>) -> Result<(), Error> {
        if self.map.is_some() {
            check_finite("longitude", longitude.unwrap_or(f64::NAN))?;
        }
        assign(
            &mut self.longitude,
            longitude,
            &mut self.changed,
            SearchProp::Longitude,
        );
        Ok(())
    }

    /// Sets the search radius in meters. Zero or NaN means no radius.
    pub fn set_radius(&mut self, radius: Option<f64>) {
        assign(
            &mut self.radius,
            radius,
            &mut self.changed,
            SearchProp::Radius,
        );
    }

    /// Drops the viewport restriction when no radius is set.
    pub fn set_global_search(&mut self, global: bool) {
        assign(
            &mut self.global_search,
            global,
            &mut self.changed,
            SearchProp::GlobalSearch,
        );
    }

    /// Space-separated place types; only the first is sent.
    pub fn set_types(&mut self, types: Option<String>) {
        assign(&mut self.types, types, &mut self.changed, SearchProp::Types);
    }

    pub(crate) fn set_attribute(&mut self, name: &str, value: Option<&str>) -> Result<(), Error> {
        match name {
            "query" => self.set_query(attr_string(value)),
            "latitude" => self.set_latitude(attr_opt_number(value))?,
            "longitude" => self.set_longitude(attr_opt_number(value))?,
            "radius" => self.set_radius(attr_opt_number(value)),
            "global-search" => self.set_global_search(attr_bool(value)),
            "types" => self.set_types(attr_string(value)),
            _ => {}
        }
        Ok(())
    }

    /// Copies `latitude`/`longitude` into the search center.
    ///
    /// Returns whether the center moved.
    fn update_location(&mut self) -> Result<bool, Error> {
        let lat = check_finite("latitude", self.latitude.unwrap_or(f64::NAN))?;
        let lng = check_finite("longitude", self.longitude.unwrap_or(f64::NAN))?;
        let location = Some(GeoPoint::new(lat, lng)?);
        let moved = self.location != location;
        self.location = location;
        Ok(moved)
    }

    fn effective_radius(&self) -> Option<f64> {
        self.radius.filter(|r| *r != 0.0 && !r.is_nan())
    }

    fn scope<E: MapEngine>(&self, cx: &Cx<'_, '_, E>, map: MapHandle) -> SearchScope {
        if let Some(radius) = self.effective_radius() {
            SearchScope::Radius {
                location: self.location.or_else(|| cx.engine.map_center(map)),
                radius,
            }
        } else if self.global_search {
            SearchScope::Global
        } else {
            SearchScope::Bounds(cx.engine.map_bounds(map))
        }
    }

    /// Issues a text search if a query and a map are present.
    fn search<E: MapEngine>(&self, cx: &mut Cx<'_, '_, E>) {
        let (Some(query), Some(map)) = (self.query.as_deref(), self.map) else {
            return;
        };
        if query.is_empty() {
            return;
        }
        let request = TextSearchRequest {
            query: query.to_string(),
            place_type: self
                .types
                .as_deref()
                .and_then(|t| t.split(' ').next())
                .filter(|t| !t.is_empty())
                .map(ToString::to_string),
            scope: self.scope(cx, map),
        };
        let id = cx.engine.text_search(map, &request);
        cx.track_request(id, RequestKind::TextSearch);
    }

    /// Looks up one place.
    ///
    /// The returned value resolves with the place, or with the status when
    /// the lookup does not succeed. A successful lookup also emits
    /// `google-map-search-place-detail`.
    pub(crate) fn get_details<E: MapEngine>(
        &mut self,
        cx: &mut Cx<'_, '_, E>,
        place_id: &str,
    ) -> Result<Pending<DetailsResult>, Error> {
        let map = self.map.ok_or(Error::Unready(cx.id()))?;
        let id = cx.engine.place_details(map, place_id);
        cx.track_request(id, RequestKind::PlaceDetails);
        let (value, resolver) = pending();
        self.details.push((id, resolver));
        Ok(value)
    }
}

impl AcceptsMap for SearchElement {
    fn map(&self) -> Option<MapHandle> {
        self.map
    }

    fn set_map(&mut self, map: Option<MapHandle>) {
        assign(&mut self.map, map, &mut self.changed, SearchProp::Map);
    }
}

impl<E: MapEngine> Component<E> for SearchElement {
    fn has_changes(&self) -> bool {
        !self.changed.is_empty()
    }

    fn reconcile(&mut self, cx: &mut Cx<'_, '_, E>) -> Result<(), Error> {
        use SearchProp as P;

        let changed = self.changed.take();
        let mut result = Ok(());
        let mut moved = false;
        if self.map.is_some() {
            if changed.any(&[P::Latitude, P::Longitude]) {
                match self.update_location() {
                    Ok(m) => moved = m,
                    Err(e) => result = Err(e),
                }
            } else if changed.has(P::Map) && self.location.is_none() {
                // Coordinates set before the map arrived; unset ones are fine.
                moved = self.update_location().unwrap_or(false);
            }
        }
        if moved
            || changed.any(&[P::Query, P::Map, P::Radius, P::Types, P::GlobalSearch])
        {
            self.search(cx);
        }
        result
    }

    fn completed(&mut self, cx: &mut Cx<'_, '_, E>, delivery: Delivery) {
        match delivery {
            Delivery::Search {
                status: PlacesStatus::Ok,
                results,
                ..
            } => {
                self.results = results.into_iter().map(SearchResult::from).collect();
                cx.emit(
                    "google-map-search-results",
                    EventDetail::Results(self.results.clone()),
                );
            }
            Delivery::Details {
                request,
                status,
                place,
            } => {
                let Some(at) = self.details.iter().position(|(id, _)| *id == request) else {
                    return;
                };
                let (_, resolver) = self.details.swap_remove(at);
                match (status, place) {
                    (PlacesStatus::Ok, Some(place)) => {
                        resolver.resolve(Ok(place.clone()));
                        cx.emit("google-map-search-place-detail", EventDetail::Place(place));
                    }
                    (status, _) => resolver.resolve(Err(status)),
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_validate_only_with_a_map() {
        let mut search = SearchElement::new();
        assert_eq!(search.set_latitude(Some(f64::NAN)), Ok(()));
        search.set_map(Some(MapHandle(1)));
        assert_eq!(
            search.set_latitude(None),
            Err(Error::TypeViolation { field: "latitude" })
        );
        assert_eq!(
            search.set_attribute("longitude", Some("west")),
            Err(Error::TypeViolation { field: "longitude" })
        );
        assert_eq!(search.set_longitude(Some(-3.5)), Ok(()));
    }

    #[test]
    fn zero_or_nan_radius_is_no_radius() {
        let mut search = SearchElement::new();
        search.set_radius(Some(0.0));
        assert_eq!(search.effective_radius(), None);
        search.set_radius(Some(f64::NAN));
        assert_eq!(search.effective_radius(), None);
        search.set_radius(Some(500.0));
        assert_eq!(search.effective_radius(), Some(500.0));
    }

    #[test]
    fn partial_location_is_a_type_violation() {
        let mut search = SearchElement::new();
        search.set_latitude(Some(1.0)).unwrap();
        assert_eq!(
            search.update_location(),
            Err(Error::TypeViolation { field: "longitude" })
        );
        assert_eq!(search.location(), None);
    }
}
