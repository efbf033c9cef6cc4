// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `<google-map-point>`: one path vertex declared as a child of a poly.

use crate::document::Cx;
use crate::engine::MapEngine;
use crate::error::Error;
use crate::geo::GeoPoint;
use crate::props::{Changed, assign, attr_opt_number, props};

use super::Component;

props! {
    enum PointProp {
        Latitude,
        Longitude,
    }
}

/// A `(latitude, longitude)` pair read by the parent poly when it builds its
/// path.
///
/// Changing a point does not rebuild the path by itself. The path is rebuilt
/// when the poly's point list changes, and engine-side vertex drags are
/// written back into the points.
#[derive(Clone, Debug, Default)]
pub struct PointElement {
    latitude: Option<f64>,
    longitude: Option<f64>,
    changed: Changed<PointProp>,
}

impl PointElement {
    /// Creates a point with both coordinates unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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

    /// Sets the latitude.
    pub fn set_latitude(&mut self, latitude: Option<f64>) {
        assign(
            &mut self.latitude,
            latitude,
            &mut self.changed,
            PointProp::Latitude,
        );
    }

    /// Sets the longitude.
    pub fn set_longitude(&mut self, longitude: Option<f64>) {
        assign(
            &mut self.longitude,
            longitude,
            &mut self.changed,
            PointProp::Longitude,
        );
    }

    /// Returns the position.
    ///
    /// # Errors
    ///
    /// [`Error::TypeViolation`] if either coordinate is unset or not finite.
    pub fn position(&self) -> Result<GeoPoint, Error> {
        GeoPoint::new(
            self.latitude
                .ok_or(Error::TypeViolation { field: "latitude" })?,
            self.longitude
                .ok_or(Error::TypeViolation { field: "longitude" })?,
        )
    }

    pub(crate) fn set_attribute(&mut self, name: &str, value: Option<&str>) -> Result<(), Error> {
        match name {
            "latitude" => self.set_latitude(attr_opt_number(value)),
            "longitude" => self.set_longitude(attr_opt_number(value)),
            _ => {}
        }
        Ok(())
    }
}

impl<E: MapEngine> Component<E> for PointElement {
    fn has_changes(&self) -> bool {
        !self.changed.is_empty()
    }

    fn reconcile(&mut self, _cx: &mut Cx<'_, '_, E>) -> Result<(), Error> {
        self.changed.take();
        Ok(())
    }
}
