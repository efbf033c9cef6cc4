// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geographic value types.
//!
//! [`GeoPoint`] is the validated `(latitude, longitude)` pair every component
//! hands to the engine. [`GeoBounds`] is the axis-aligned region used by
//! fit-to-markers; it is backed by a [`kurbo::Rect`] with longitude on the
//! x axis and latitude on the y axis.
//!
//! No geodesic math happens here. Bounds do not wrap the antimeridian.

use kurbo::{Point, Rect};

use crate::error::Error;

/// A validated geographic position.
///
/// Both components are always finite. Construct with [`GeoPoint::new`] (which
/// validates) or [`GeoPoint::from_parts`] when either half may be unset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

impl GeoPoint {
    /// Creates a position, failing fast if either component is not finite.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeViolation`] naming the offending field.
    pub fn new(lat: f64, lng: f64) -> Result<Self, Error> {
        let lat = check_finite("latitude", lat)?;
        let lng = check_finite("longitude", lng)?;
        Ok(Self { lat, lng })
    }

    /// Creates a position from two optional halves.
    ///
    /// Returns `Ok(None)` when both halves are unset. A partially set pair is
    /// a type violation on the missing half.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeViolation`] if exactly one half is unset or if a
    /// set half is not finite.
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Result<Option<Self>, Error> {
        match (lat, lng) {
            (None, None) => Ok(None),
            (Some(lat), Some(lng)) => Self::new(lat, lng).map(Some),
            (None, Some(_)) => Err(Error::TypeViolation { field: "latitude" }),
            (Some(_), None) => Err(Error::TypeViolation { field: "longitude" }),
        }
    }

    /// Returns the latitude in degrees.
    #[inline]
    #[must_use]
    pub const fn lat(self) -> f64 {
        self.lat
    }

    /// Returns the longitude in degrees.
    #[inline]
    #[must_use]
    pub const fn lng(self) -> f64 {
        self.lng
    }

    fn to_kurbo(self) -> Point {
        Point::new(self.lng, self.lat)
    }

    fn from_kurbo(p: Point) -> Self {
        Self { lat: p.y, lng: p.x }
    }
}

/// Checks that a coordinate is a finite number.
///
/// # Errors
///
/// Returns [`Error::TypeViolation`] for NaN and infinities.
pub fn check_finite(field: &'static str, value: f64) -> Result<f64, Error> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::TypeViolation { field })
    }
}

/// An axis-aligned latitude/longitude region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds {
    rect: Rect,
}

impl GeoBounds {
    /// Creates degenerate bounds covering a single point.
    #[must_use]
    pub fn from_point(p: GeoPoint) -> Self {
        let pt = p.to_kurbo();
        Self {
            rect: Rect::from_points(pt, pt),
        }
    }

    /// Creates bounds from two opposite corners.
    #[must_use]
    pub fn from_corners(south_west: GeoPoint, north_east: GeoPoint) -> Self {
        Self {
            rect: Rect::from_points(south_west.to_kurbo(), north_east.to_kurbo()),
        }
    }

    /// Returns the smallest bounds covering every point, or `None` when the
    /// iterator is empty.
    pub fn covering(points: impl IntoIterator<Item = GeoPoint>) -> Option<Self> {
        let mut iter = points.into_iter();
        let mut bounds = Self::from_point(iter.next()?);
        for p in iter {
            bounds.extend(p);
        }
        Some(bounds)
    }

    /// Grows the bounds to include `p`.
    pub fn extend(&mut self, p: GeoPoint) {
        self.rect = self.rect.union_pt(p.to_kurbo());
    }

    /// Returns the south-west corner.
    #[must_use]
    pub fn south_west(&self) -> GeoPoint {
        GeoPoint::from_kurbo(Point::new(self.rect.x0, self.rect.y0))
    }

    /// Returns the north-east corner.
    #[must_use]
    pub fn north_east(&self) -> GeoPoint {
        GeoPoint::from_kurbo(Point::new(self.rect.x1, self.rect.y1))
    }

    /// Returns the midpoint of the region.
    #[must_use]
    pub fn center(&self) -> GeoPoint {
        GeoPoint::from_kurbo(self.rect.center())
    }

    /// Returns whether `p` lies inside or on the edge of the region.
    #[must_use]
    pub fn contains(&self, p: GeoPoint) -> bool {
        let pt = p.to_kurbo();
        pt.x >= self.rect.x0 && pt.x <= self.rect.x1 && pt.y >= self.rect.y0 && pt.y <= self.rect.y1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_round_trips_exactly() {
        let p = GeoPoint::new(37.77493, -122.41942).unwrap();
        assert_eq!(p.lat(), 37.77493);
        assert_eq!(p.lng(), -122.41942);
    }

    #[test]
    fn nan_latitude_is_a_type_violation() {
        assert_eq!(
            GeoPoint::new(f64::NAN, 0.0),
            Err(Error::TypeViolation { field: "latitude" })
        );
        assert_eq!(
            GeoPoint::new(0.0, f64::INFINITY),
            Err(Error::TypeViolation { field: "longitude" })
        );
    }

    #[test]
    fn partial_parts_are_rejected() {
        assert_eq!(GeoPoint::from_parts(None, None), Ok(None));
        assert_eq!(
            GeoPoint::from_parts(Some(1.0), None),
            Err(Error::TypeViolation { field: "longitude" })
        );
        assert_eq!(
            GeoPoint::from_parts(Some(1.0), Some(2.0)).unwrap(),
            Some(GeoPoint::new(1.0, 2.0).unwrap())
        );
    }

    #[test]
    fn covering_empty_is_none() {
        assert!(GeoBounds::covering(core::iter::empty()).is_none());
    }

    #[test]
    fn covering_computes_corners_and_center() {
        let a = GeoPoint::new(10.0, 20.0).unwrap();
        let b = GeoPoint::new(-10.0, 40.0).unwrap();
        let c = GeoPoint::new(0.0, 30.0).unwrap();
        let bounds = GeoBounds::covering([a, b, c]).unwrap();
        assert_eq!(bounds.south_west(), GeoPoint::new(-10.0, 20.0).unwrap());
        assert_eq!(bounds.north_east(), GeoPoint::new(10.0, 40.0).unwrap());
        assert_eq!(bounds.center(), GeoPoint::new(0.0, 30.0).unwrap());
        assert!(bounds.contains(c));
        assert!(!bounds.contains(GeoPoint::new(11.0, 30.0).unwrap()));
    }
}
