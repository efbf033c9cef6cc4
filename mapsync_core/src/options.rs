// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction options and option patches passed to the engine.
//!
//! Each engine object kind has an `*Options` struct used once at creation and
//! an `*Option` enum used for single-facet updates afterwards. Components build
//! both from their declared properties.

use alloc::string::String;
use alloc::vec::Vec;

use crate::geo::GeoPoint;
use crate::handle::{MapHandle, PathHandle};

// ---------------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------------

/// Base map imagery.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MapType {
    /// Default road map.
    #[default]
    Roadmap,
    /// Satellite imagery.
    Satellite,
    /// Satellite imagery with road overlay.
    Hybrid,
    /// Physical relief.
    Terrain,
}

impl MapType {
    /// Returns the attribute spelling of this map type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Roadmap => "roadmap",
            Self::Satellite => "satellite",
            Self::Hybrid => "hybrid",
            Self::Terrain => "terrain",
        }
    }

    /// Parses the attribute spelling of a map type.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "roadmap" => Some(Self::Roadmap),
            "satellite" => Some(Self::Satellite),
            "hybrid" => Some(Self::Hybrid),
            "terrain" => Some(Self::Terrain),
            _ => None,
        }
    }
}

/// One entry of a styled-map style list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapTypeStyle {
    /// Feature selector, e.g. `"road.highway"`.
    pub feature_type: Option<String>,
    /// Element selector, e.g. `"labels"`.
    pub element_type: Option<String>,
    /// Style rules as `(rule, value)` pairs, e.g. `("visibility", "off")`.
    pub stylers: Vec<(String, String)>,
}

/// A free-form option value merged into the map options verbatim.
#[derive(Clone, Debug, PartialEq)]
pub enum OptionValue {
    /// Boolean option.
    Bool(bool),
    /// Numeric option.
    Number(f64),
    /// String option.
    Text(String),
}

/// Options used to construct a map canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct MapOptions {
    /// Initial zoom level.
    pub zoom: f64,
    /// Initial tilt in degrees (0 or 45).
    pub tilt: f64,
    /// Initial map type.
    pub map_type: MapType,
    /// Hide every default UI control.
    pub disable_default_ui: bool,
    /// Show the map-type control.
    pub map_type_control: bool,
    /// Show the street-view pegman.
    pub street_view_control: bool,
    /// Disable zoom on double click.
    pub disable_double_click_zoom: bool,
    /// Enable scroll-wheel zoom.
    pub scrollwheel: bool,
    /// Styled-map rules.
    pub styles: Vec<MapTypeStyle>,
    /// Upper zoom bound.
    pub max_zoom: Option<f64>,
    /// Lower zoom bound.
    pub min_zoom: Option<f64>,
    /// Whether the map can be panned by dragging.
    pub draggable: bool,
    /// Extra options applied last, overriding any of the above by name.
    pub additional: Vec<(String, OptionValue)>,
}

/// A single map option update.
#[derive(Clone, Debug, PartialEq)]
pub enum MapOption {
    /// `disableDefaultUI`.
    DisableDefaultUi(bool),
    /// `mapTypeControl`.
    MapTypeControl(bool),
    /// `streetViewControl`.
    StreetViewControl(bool),
    /// `disableDoubleClickZoom`.
    DisableDoubleClickZoom(bool),
    /// `scrollwheel`.
    Scrollwheel(bool),
    /// `maxZoom`.
    MaxZoom(f64),
    /// `minZoom`.
    MinZoom(f64),
    /// `draggable`.
    Draggable(bool),
    /// `styles`.
    Styles(Vec<MapTypeStyle>),
}

// ---------------------------------------------------------------------------
// Marker
// ---------------------------------------------------------------------------

/// Marker animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Animation {
    /// Falls from the top of the map when placed.
    Drop,
    /// Bounces in place until stopped.
    Bounce,
}

impl Animation {
    /// Parses the attribute spelling (`DROP` / `BOUNCE`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DROP" => Some(Self::Drop),
            "BOUNCE" => Some(Self::Bounce),
            _ => None,
        }
    }
}

/// Marker or path icon.
#[derive(Clone, Debug, PartialEq)]
pub enum Icon {
    /// An image URL.
    Url(String),
    /// A vector symbol.
    Symbol {
        /// SVG path or a predefined symbol name.
        path: String,
        /// Scale factor.
        scale: f64,
        /// Fill color.
        fill_color: Option<String>,
    },
}

/// Options used to construct a marker.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerOptions {
    /// Map to display on.
    pub map: Option<MapHandle>,
    /// Initial position; `None` leaves the marker unplaced.
    pub position: Option<GeoPoint>,
    /// Tooltip text.
    pub title: String,
    /// Initial animation.
    pub animation: Option<Animation>,
    /// Whether the user can drag the marker.
    pub draggable: bool,
    /// Whether the marker is shown.
    pub visible: bool,
    /// Custom icon.
    pub icon: Option<Icon>,
    /// Label text.
    pub label: Option<String>,
    /// Stacking order.
    pub z_index: i32,
}

/// A single marker update.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkerOption {
    /// Attach to a map, or detach with `None`.
    Map(Option<MapHandle>),
    /// Move the marker.
    Position(GeoPoint),
    /// Replace the icon.
    Icon(Option<Icon>),
    /// Replace the label.
    Label(Option<String>),
    /// Change stacking order.
    ZIndex(i32),
    /// Start an animation.
    Animation(Animation),
    /// Toggle user dragging.
    Draggable(bool),
    /// Replace the tooltip.
    Title(String),
}

// ---------------------------------------------------------------------------
// Poly
// ---------------------------------------------------------------------------

/// Where a polygon stroke is drawn relative to its edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StrokePosition {
    /// Centered on the edge.
    #[default]
    Center,
    /// Inside the polygon.
    Inside,
    /// Outside the polygon.
    Outside,
}

impl StrokePosition {
    /// Parses the attribute spelling, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("center") {
            Some(Self::Center)
        } else if s.eq_ignore_ascii_case("inside") {
            Some(Self::Inside)
        } else if s.eq_ignore_ascii_case("outside") {
            Some(Self::Outside)
        } else {
            None
        }
    }
}

/// A symbol repeated along a polyline.
#[derive(Clone, Debug, PartialEq)]
pub struct IconSequence {
    /// The symbol to draw.
    pub icon: Icon,
    /// Distance from the start of the line, e.g. `"100%"`.
    pub offset: Option<String>,
    /// Repeat interval, e.g. `"20px"`.
    pub repeat: Option<String>,
}

/// The engine object kind backing a poly, with its kind-specific options.
#[derive(Clone, Debug, PartialEq)]
pub enum PolyShape {
    /// Open path.
    Polyline {
        /// Symbols drawn along the line.
        icons: Option<Vec<IconSequence>>,
    },
    /// Closed, filled shape.
    Polygon {
        /// Fill color.
        fill_color: String,
        /// Fill opacity in `0.0..=1.0`.
        fill_opacity: f64,
    },
}

impl PolyShape {
    /// Returns whether this shape is a closed polygon.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Polygon { .. })
    }
}

/// Options used to construct a polyline or polygon.
#[derive(Clone, Debug, PartialEq)]
pub struct PolyOptions {
    /// Kind and kind-specific options.
    pub shape: PolyShape,
    /// Map to display on.
    pub map: Option<MapHandle>,
    /// The live path buffer the shape draws.
    pub path: PathHandle,
    /// Whether the shape receives mouse events.
    pub clickable: bool,
    /// Whether the user can drag the shape.
    pub draggable: bool,
    /// Whether the user can edit vertices.
    pub editable: bool,
    /// Draw edges as geodesics.
    pub geodesic: bool,
    /// Stroke color.
    pub stroke_color: String,
    /// Stroke opacity in `0.0..=1.0`.
    pub stroke_opacity: f64,
    /// Stroke placement (polygons only).
    pub stroke_position: StrokePosition,
    /// Stroke width in pixels.
    pub stroke_weight: f64,
    /// Whether the shape is shown.
    pub visible: bool,
    /// Stacking order.
    pub z_index: i32,
}

/// A single poly update.
#[derive(Clone, Debug, PartialEq)]
pub enum PolyOption {
    /// Attach to a map, or detach with `None`.
    Map(Option<MapHandle>),
    /// `clickable`.
    Clickable(bool),
    /// `draggable`.
    Draggable(bool),
    /// `editable`.
    Editable(bool),
    /// `fillColor`.
    FillColor(String),
    /// `fillOpacity`.
    FillOpacity(f64),
    /// `geodesic`.
    Geodesic(bool),
    /// `icons`.
    Icons(Option<Vec<IconSequence>>),
    /// `strokeColor`.
    StrokeColor(String),
    /// `strokeOpacity`.
    StrokeOpacity(f64),
    /// `strokePosition`.
    StrokePosition(StrokePosition),
    /// `strokeWeight`.
    StrokeWeight(f64),
    /// `zIndex`.
    ZIndex(i32),
}

// ---------------------------------------------------------------------------
// Directions renderer
// ---------------------------------------------------------------------------

/// Options used to construct a directions renderer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RendererOptions {
    /// Let the user drag the rendered route to change it.
    pub draggable: bool,
    /// Do not zoom/pan the map to the route when directions are set.
    pub preserve_viewport: bool,
    /// Do not draw start/end/waypoint markers.
    pub suppress_markers: bool,
    /// Do not draw the route polyline.
    pub suppress_polylines: bool,
    /// Do not open info windows on marker clicks.
    pub suppress_info_windows: bool,
}
