// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Request and result records for the engine's network-bound services:
//! routing, text search and place details.
//!
//! Results are immutable snapshots. Components replace the previous snapshot
//! wholesale when a new OK result arrives and never patch one in place.

use alloc::string::String;
use alloc::vec::Vec;

use crate::geo::{GeoBounds, GeoPoint};

// ---------------------------------------------------------------------------
// Directions
// ---------------------------------------------------------------------------

/// How a route is travelled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TravelMode {
    /// By car.
    #[default]
    Driving,
    /// On foot.
    Walking,
    /// By bicycle.
    Bicycling,
    /// By public transit.
    Transit,
}

impl TravelMode {
    /// Returns the attribute spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Driving => "DRIVING",
            Self::Walking => "WALKING",
            Self::Bicycling => "BICYCLING",
            Self::Transit => "TRANSIT",
        }
    }

    /// Parses the attribute spelling.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DRIVING" => Some(Self::Driving),
            "WALKING" => Some(Self::Walking),
            "BICYCLING" => Some(Self::Bicycling),
            "TRANSIT" => Some(Self::Transit),
            _ => None,
        }
    }
}

/// An intermediate stop on a route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Waypoint {
    /// Address or place name.
    pub location: String,
    /// Whether the route actually stops here (vs. merely passing through).
    pub stopover: bool,
}

/// A routing request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectionsRequest {
    /// Start address.
    pub origin: String,
    /// End address.
    pub destination: String,
    /// Travel mode.
    pub travel_mode: TravelMode,
    /// Intermediate stops in order.
    pub waypoints: Vec<Waypoint>,
}

/// Completion status of a routing request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirectionsStatus {
    /// A route was found.
    Ok,
    /// An origin, destination or waypoint could not be geocoded.
    NotFound,
    /// No route exists between the locations.
    ZeroResults,
    /// Too many waypoints.
    MaxWaypointsExceeded,
    /// The request was malformed.
    InvalidRequest,
    /// Rate limited.
    OverQueryLimit,
    /// The service refused the request.
    RequestDenied,
    /// Server-side failure.
    UnknownError,
}

/// One leg of a route (between two consecutive stops).
#[derive(Clone, Debug, PartialEq)]
pub struct RouteLeg {
    /// Formatted start address.
    pub start_address: String,
    /// Formatted end address.
    pub end_address: String,
    /// Distance in meters, if reported.
    pub distance_meters: Option<f64>,
    /// Duration in seconds, if reported.
    pub duration_seconds: Option<f64>,
}

/// One route alternative.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionsRoute {
    /// Short textual description.
    pub summary: String,
    /// Legs in travel order.
    pub legs: Vec<RouteLeg>,
    /// Simplified route geometry.
    pub overview_path: Vec<GeoPoint>,
}

/// A successful routing response.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DirectionsResult {
    /// Route alternatives, best first.
    pub routes: Vec<DirectionsRoute>,
}

// ---------------------------------------------------------------------------
// Places
// ---------------------------------------------------------------------------

/// Completion status of a places request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlacesStatus {
    /// Results were found.
    Ok,
    /// No results.
    ZeroResults,
    /// The place id was not found.
    NotFound,
    /// The request was malformed.
    InvalidRequest,
    /// Rate limited.
    OverQueryLimit,
    /// The service refused the request.
    RequestDenied,
    /// Server-side failure.
    UnknownError,
}

/// Where a text search looks. The three shapes are mutually exclusive.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchScope {
    /// Bias towards a circle. `location` is `None` when neither an explicit
    /// location nor a map center is known.
    Radius {
        /// Circle center.
        location: Option<GeoPoint>,
        /// Circle radius in meters.
        radius: f64,
    },
    /// Restrict to a viewport. `None` when the map has no bounds yet.
    Bounds(Option<GeoBounds>),
    /// No geographic restriction.
    Global,
}

/// A text search request.
#[derive(Clone, Debug, PartialEq)]
pub struct TextSearchRequest {
    /// Free-text query.
    pub query: String,
    /// Place type filter (first entry of the component's `types`).
    pub place_type: Option<String>,
    /// Geographic scope.
    pub scope: SearchScope,
}

/// Geometry of a place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaceGeometry {
    /// Point location.
    pub location: Option<GeoPoint>,
    /// Recommended viewport.
    pub viewport: Option<GeoBounds>,
}

/// A place record as returned by the engine.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaceResult {
    /// Stable place identifier.
    pub place_id: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Formatted address.
    pub formatted_address: Option<String>,
    /// Geometry, if known.
    pub geometry: Option<PlaceGeometry>,
    /// Place types.
    pub types: Vec<String>,
    /// Average rating.
    pub rating: Option<f64>,
}

/// A place record reshaped with flattened coordinate fields.
///
/// The nested [`PlaceResult::geometry`] is kept intact alongside the derived
/// `latitude`/`longitude`.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    /// The original record.
    pub place: PlaceResult,
    /// Latitude of `place.geometry.location`.
    pub latitude: Option<f64>,
    /// Longitude of `place.geometry.location`.
    pub longitude: Option<f64>,
}

impl From<PlaceResult> for SearchResult {
    fn from(place: PlaceResult) -> Self {
        let location = place.geometry.as_ref().and_then(|g| g.location);
        Self {
            latitude: location.map(GeoPoint::lat),
            longitude: location.map(GeoPoint::lng),
            place,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn search_result_flattens_location() {
        let place = PlaceResult {
            name: Some("Ferry Building".to_string()),
            geometry: Some(PlaceGeometry {
                location: Some(GeoPoint::new(37.7955, -122.3937).unwrap()),
                viewport: None,
            }),
            ..PlaceResult::default()
        };
        let result = SearchResult::from(place.clone());
        assert_eq!(result.latitude, Some(37.7955));
        assert_eq!(result.longitude, Some(-122.3937));
        assert_eq!(result.place, place, "nested fields are preserved");
    }

    #[test]
    fn search_result_without_geometry_has_no_coordinates() {
        let result = SearchResult::from(PlaceResult::default());
        assert_eq!(result.latitude, None);
        assert_eq!(result.longitude, None);
    }

    #[test]
    fn travel_mode_parses_attribute_spelling() {
        assert_eq!(TravelMode::parse("WALKING"), Some(TravelMode::Walking));
        assert_eq!(TravelMode::parse("walking"), None);
        assert_eq!(TravelMode::Transit.as_str(), "TRANSIT");
    }
}
