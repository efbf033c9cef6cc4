// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine contract for map backends.
//!
//! The map engine is the external, stateful rendering/geocoding/places
//! backend. Components never talk to anything but this trait. Two
//! implementations exist in the workspace:
//!
//! - the wasm backend, which binds the `google.maps` namespace, and
//! - the in-memory double in the harness crate, which records every call.
//!
//! # Delivery model
//!
//! The engine never calls back into components. Event firings and
//! asynchronous completions are buffered as [`Delivery`] values and drained
//! by the [`Document`](crate::document::Document) through
//! [`take_deliveries`](MapEngine::take_deliveries). A component is therefore
//! never re-entered while it is in the middle of an engine call, and a
//! component that needs to tell its own writes apart from engine-originated
//! ones (the poly path builder) can drain immediately after writing.
//!
//! Listener ids are globally unique for the engine's lifetime and are never
//! reused, so a delivery for a removed listener can be recognized and dropped.

use alloc::vec::Vec;

use crate::geo::{GeoBounds, GeoPoint};
use crate::handle::{
    InfoWindowHandle, KmlHandle, ListenerId, MapHandle, MarkerHandle, PathHandle, PolyHandle,
    RendererHandle, RequestId, Target,
};
use crate::options::{
    MapOption, MapOptions, MapType, MarkerOption, MarkerOptions, PolyOption, PolyOptions,
    RendererOptions,
};
use crate::service::{
    DirectionsRequest, DirectionsResult, DirectionsStatus, PlaceResult, PlacesStatus,
    TextSearchRequest,
};

/// Pointer-event details attached to map, marker and poly events.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MouseEvent {
    /// Geographic position under the pointer.
    pub lat_lng: Option<GeoPoint>,
    /// Vertex index under the pointer (poly events only).
    pub vertex: Option<usize>,
    /// Edge index under the pointer (poly events only).
    pub edge: Option<usize>,
}

/// Payload of an engine event.
///
/// Forwarded events carry this verbatim as their detail.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum EventPayload {
    /// No payload (e.g. `idle`, `center_changed`, `closeclick`).
    #[default]
    None,
    /// Pointer event.
    Mouse(MouseEvent),
    /// A path vertex was inserted or replaced (`insert_at` / `set_at`).
    Vertex {
        /// Vertex index.
        index: usize,
        /// The vertex value after the change.
        position: GeoPoint,
    },
}

/// One buffered engine-to-component notification.
#[derive(Clone, Debug, PartialEq)]
pub enum Delivery {
    /// A subscribed event fired.
    Event {
        /// The subscription that matched.
        listener: ListenerId,
        /// Event details.
        payload: EventPayload,
    },
    /// A routing request completed.
    Route {
        /// The request.
        request: RequestId,
        /// Completion status.
        status: DirectionsStatus,
        /// The response; present only for [`DirectionsStatus::Ok`].
        result: Option<DirectionsResult>,
    },
    /// A text search completed.
    Search {
        /// The request.
        request: RequestId,
        /// Completion status.
        status: PlacesStatus,
        /// Matching places; empty for non-OK statuses.
        results: Vec<PlaceResult>,
    },
    /// A place-detail lookup completed.
    Details {
        /// The request.
        request: RequestId,
        /// Completion status.
        status: PlacesStatus,
        /// The place; present only for [`PlacesStatus::Ok`].
        place: Option<PlaceResult>,
    },
}

/// The imperative map-engine surface consumed by components.
///
/// `Node` is the host's element type. It is used for map containers and for
/// info-window content, which is relocated into the overlay rather than
/// copied.
pub trait MapEngine {
    /// Host element type.
    type Node: Clone + core::fmt::Debug;

    /// Returns whether the engine's code is present and usable.
    fn is_loaded(&self) -> bool;

    // -- Map ---------------------------------------------------------------

    /// Creates a map canvas inside `container`.
    fn create_map(&mut self, container: &Self::Node, options: &MapOptions) -> MapHandle;

    /// Returns the current center, if one has been set.
    fn map_center(&self, map: MapHandle) -> Option<GeoPoint>;

    /// Returns the current zoom level.
    fn map_zoom(&self, map: MapHandle) -> f64;

    /// Returns the current map type.
    fn map_type(&self, map: MapHandle) -> MapType;

    /// Returns the visible region, if the map has been laid out.
    fn map_bounds(&self, map: MapHandle) -> Option<GeoBounds>;

    /// Moves the center without animation.
    fn set_center(&mut self, map: MapHandle, center: GeoPoint);

    /// Moves the center, animating if the distance is small.
    fn pan_to(&mut self, map: MapHandle, center: GeoPoint);

    /// Changes the zoom level.
    fn set_zoom(&mut self, map: MapHandle, zoom: f64);

    /// Changes the map type.
    fn set_map_type(&mut self, map: MapHandle, map_type: MapType);

    /// Applies option updates.
    fn set_map_options(&mut self, map: MapHandle, options: &[MapOption]);

    /// Changes the viewport to contain `bounds`.
    fn fit_bounds(&mut self, map: MapHandle, bounds: GeoBounds);

    /// Adds a KML overlay fetched from `url`.
    fn add_kml_layer(&mut self, map: MapHandle, url: &str) -> KmlHandle;

    /// Removes a KML overlay.
    fn remove_kml_layer(&mut self, layer: KmlHandle);

    // -- Markers and info windows -------------------------------------------

    /// Creates a marker.
    fn create_marker(&mut self, options: &MarkerOptions) -> MarkerHandle;

    /// Applies a marker update.
    fn set_marker(&mut self, marker: MarkerHandle, option: MarkerOption);

    /// Creates an info-window overlay.
    fn create_info_window(&mut self) -> InfoWindowHandle;

    /// Replaces the overlay's content with a fresh container holding `nodes`.
    ///
    /// The nodes are moved, not cloned.
    fn set_info_content(&mut self, info: InfoWindowHandle, nodes: &[Self::Node]);

    /// Shows the overlay anchored to `anchor`.
    fn open_info_window(&mut self, info: InfoWindowHandle, map: MapHandle, anchor: MarkerHandle);

    /// Hides the overlay.
    fn close_info_window(&mut self, info: InfoWindowHandle);

    // -- Paths and polys ------------------------------------------------------

    /// Creates an empty live path buffer.
    fn create_path(&mut self) -> PathHandle;

    /// Removes every vertex.
    fn path_clear(&mut self, path: PathHandle);

    /// Appends a vertex.
    fn path_push(&mut self, path: PathHandle, vertex: GeoPoint);

    /// Returns a snapshot of the vertices.
    fn path_points(&self, path: PathHandle) -> Vec<GeoPoint>;

    /// Creates a polyline or polygon drawing `options.path`.
    fn create_poly(&mut self, options: &PolyOptions) -> PolyHandle;

    /// Applies a poly update.
    fn set_poly(&mut self, poly: PolyHandle, option: PolyOption);

    // -- Directions -------------------------------------------------------------

    /// Creates a directions renderer.
    fn create_renderer(&mut self, options: &RendererOptions) -> RendererHandle;

    /// Attaches the renderer to a map, or detaches it with `None`.
    fn set_renderer_map(&mut self, renderer: RendererHandle, map: Option<MapHandle>);

    /// Draws a routing response.
    fn set_renderer_directions(&mut self, renderer: RendererHandle, result: &DirectionsResult);

    /// Issues a routing request. Completion arrives as [`Delivery::Route`].
    fn route(&mut self, request: &DirectionsRequest) -> RequestId;

    // -- Places ---------------------------------------------------------------

    /// Issues a text search. Completion arrives as [`Delivery::Search`].
    fn text_search(&mut self, map: MapHandle, request: &TextSearchRequest) -> RequestId;

    /// Issues a place-detail lookup. Completion arrives as
    /// [`Delivery::Details`].
    fn place_details(&mut self, map: MapHandle, place_id: &str) -> RequestId;

    // -- Events -----------------------------------------------------------------

    /// Subscribes to `name` on `target`.
    fn add_listener(&mut self, target: Target, name: &str) -> ListenerId;

    /// Subscribes to the next firing of `name` on `target` only. The engine
    /// drops the subscription after delivering it once.
    fn add_listener_once(&mut self, target: Target, name: &str) -> ListenerId;

    /// Removes one subscription. Unknown ids are ignored.
    fn remove_listener(&mut self, listener: ListenerId);

    /// Removes every subscription on `target`.
    fn clear_instance_listeners(&mut self, target: Target);

    /// Fires `name` on `target` as if the engine had raised it.
    fn trigger(&mut self, target: Target, name: &str);

    /// Moves every buffered delivery into `out`, oldest first.
    fn take_deliveries(&mut self, out: &mut Vec<Delivery>);
}
