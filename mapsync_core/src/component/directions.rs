// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `<google-map-directions>`: routes between two addresses and renders the
//! result on the parent map.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::document::Cx;
use crate::element::{AcceptsMap, EventDetail};
use crate::engine::{Delivery, MapEngine};
use crate::error::Error;
use crate::handle::{MapHandle, RendererHandle};
use crate::loader::{LoadOutcome, LoaderConfig};
use crate::options::RendererOptions;
use crate::props::{Changed, assign, attr_string, props};
use crate::service::{DirectionsRequest, DirectionsResult, DirectionsStatus, TravelMode, Waypoint};
use crate::trace::{HandleKind, RequestKind};

use super::Component;

props! {
    enum DirectionsProp {
        Response,
        Map,
        Start,
        End,
        Mode,
        Waypoints,
        ApiLoaded,
    }
}

/// Directions request and renderer state.
///
/// A route request goes out once per batch that changes the start, end,
/// travel mode or waypoints, provided both addresses are present and the
/// engine is loaded. Only an OK completion replaces `response`; anything
/// else leaves the rendered route as it was.
#[derive(Clone, Debug, Default)]
pub struct DirectionsElement {
    api_key: String,
    maps_url: String,
    language: String,
    map: Option<MapHandle>,
    start_address: Option<String>,
    end_address: Option<String>,
    travel_mode: TravelMode,
    waypoints: Vec<Waypoint>,
    renderer_options: RendererOptions,
    response: Option<DirectionsResult>,

    renderer: Option<RendererHandle>,
    api_loaded: bool,

    changed: Changed<DirectionsProp>,
}

impl DirectionsElement {
    /// Creates an element with no addresses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The last successful routing response.
    #[must_use]
    pub fn response(&self) -> Option<&DirectionsResult> {
        self.response.as_ref()
    }

    /// The renderer, while a map is set.
    #[must_use]
    pub fn renderer(&self) -> Option<RendererHandle> {
        self.renderer
    }

    /// Sets the origin address.
    pub fn set_start_address(&mut self, start: Option<String>) {
        assign(
            &mut self.start_address,
            start,
            &mut self.changed,
            DirectionsProp::Start,
        );
    }

    /// Sets the destination address.
    pub fn set_end_address(&mut self, end: Option<String>) {
        assign(
            &mut self.end_address,
            end,
            &mut self.changed,
            DirectionsProp::End,
        );
    }

    /// Sets the travel mode.
    pub fn set_travel_mode(&mut self, mode: TravelMode) {
        assign(
            &mut self.travel_mode,
            mode,
            &mut self.changed,
            DirectionsProp::Mode,
        );
    }

    /// Sets the intermediate stops.
    pub fn set_waypoints(&mut self, waypoints: Vec<Waypoint>) {
        assign(
            &mut self.waypoints,
            waypoints,
            &mut self.changed,
            DirectionsProp::Waypoints,
        );
    }

    /// Replaces the rendered response directly.
    pub fn set_response(&mut self, response: Option<DirectionsResult>) {
        assign(
            &mut self.response,
            response,
            &mut self.changed,
            DirectionsProp::Response,
        );
    }

    /// Options for the renderer. Read when the renderer is created.
    pub fn set_renderer_options(&mut self, options: RendererOptions) {
        self.renderer_options = options;
    }

    /// Sets the API key requested from the loader.
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.api_key = api_key.into();
    }

    /// Sets the script location.
    pub fn set_maps_url(&mut self, maps_url: impl Into<String>) {
        self.maps_url = maps_url.into();
    }

    /// Sets the language requested from the loader.
    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    pub(crate) fn set_attribute(&mut self, name: &str, value: Option<&str>) -> Result<(), Error> {
        match name {
            "api-key" => self.set_api_key(value.unwrap_or_default()),
            "maps-url" => self.set_maps_url(value.unwrap_or_default()),
            "language" => self.set_language(value.unwrap_or_default()),
            "start-address" => self.set_start_address(attr_string(value)),
            "end-address" => self.set_end_address(attr_string(value)),
            "travel-mode" => {
                let mode = match value {
                    None => TravelMode::default(),
                    Some(v) => TravelMode::parse(v).ok_or_else(|| Error::InvalidAttribute {
                        name: name.to_string(),
                        value: v.to_string(),
                    })?,
                };
                self.set_travel_mode(mode);
            }
            _ => {}
        }
        Ok(())
    }

    /// Loader parameters. Only the key and language are sent.
    fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            maps_url: self.maps_url.clone(),
            api_key: self.api_key.clone(),
            language: self.language.clone(),
            ..LoaderConfig::default()
        }
    }

    fn request(&self) -> Option<DirectionsRequest> {
        let origin = self.start_address.as_deref().filter(|s| !s.is_empty())?;
        let destination = self.end_address.as_deref().filter(|s| !s.is_empty())?;
        Some(DirectionsRequest {
            origin: origin.to_string(),
            destination: destination.to_string(),
            travel_mode: self.travel_mode,
            waypoints: self.waypoints.clone(),
        })
    }

    fn render_response<E: MapEngine>(&self, cx: &mut Cx<'_, '_, E>) {
        if let (Some(renderer), Some(response)) = (self.renderer, &self.response) {
            cx.engine.set_renderer_directions(renderer, response);
        }
    }
}

impl AcceptsMap for DirectionsElement {
    fn map(&self) -> Option<MapHandle> {
        self.map
    }

    fn set_map(&mut self, map: Option<MapHandle>) {
        assign(&mut self.map, map, &mut self.changed, DirectionsProp::Map);
    }
}

impl<E: MapEngine> Component<E> for DirectionsElement {
    fn has_changes(&self) -> bool {
        !self.changed.is_empty()
    }

    fn connected(&mut self, cx: &mut Cx<'_, '_, E>) -> Result<(), Error> {
        if cx.load(&self.loader_config()) == LoadOutcome::Ready {
            self.api_loaded = true;
            self.changed.insert(DirectionsProp::ApiLoaded);
        }
        Ok(())
    }

    fn api_loaded(&mut self, _cx: &mut Cx<'_, '_, E>) -> Result<(), Error> {
        self.api_loaded = true;
        self.changed.insert(DirectionsProp::ApiLoaded);
        Ok(())
    }

    fn reconcile(&mut self, cx: &mut Cx<'_, '_, E>) -> Result<(), Error> {
        use DirectionsProp as P;

        let changed = self.changed.take();
        if changed.has(P::Response) {
            self.render_response(cx);
        }
        if changed.has(P::Map) {
            match self.map {
                Some(map) => {
                    let renderer = match self.renderer {
                        Some(renderer) => renderer,
                        None => {
                            let renderer = cx.engine.create_renderer(&self.renderer_options);
                            cx.created(HandleKind::Renderer);
                            self.renderer = Some(renderer);
                            renderer
                        }
                    };
                    cx.engine.set_renderer_map(renderer, Some(map));
                    self.render_response(cx);
                }
                None => {
                    if let Some(renderer) = self.renderer.take() {
                        cx.engine.set_renderer_map(renderer, None);
                        cx.released(HandleKind::Renderer);
                    }
                }
            }
        }
        if changed.any(&[P::Start, P::End, P::Mode, P::Waypoints, P::ApiLoaded])
            && self.api_loaded
            && let Some(request) = self.request()
        {
            let id = cx.engine.route(&request);
            cx.track_request(id, RequestKind::Route);
        }
        Ok(())
    }

    fn completed(&mut self, cx: &mut Cx<'_, '_, E>, delivery: Delivery) {
        if let Delivery::Route {
            status: DirectionsStatus::Ok,
            result: Some(response),
            ..
        } = delivery
        {
            self.set_response(Some(response.clone()));
            cx.emit("google-map-response", EventDetail::Directions(response));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_needs_both_addresses() {
        let mut directions = DirectionsElement::new();
        directions.set_start_address(Some("Oakland".into()));
        assert_eq!(directions.request(), None);
        directions.set_end_address(Some(String::new()));
        assert_eq!(directions.request(), None);
        directions.set_end_address(Some("San Jose".into()));
        directions.set_travel_mode(TravelMode::Bicycling);
        let request = directions.request().unwrap();
        assert_eq!(request.origin, "Oakland");
        assert_eq!(request.travel_mode, TravelMode::Bicycling);
    }

    #[test]
    fn loader_sends_key_and_language_only() {
        let mut directions = DirectionsElement::new();
        directions.set_attribute("api-key", Some("abc")).unwrap();
        directions.set_attribute("language", Some("fr")).unwrap();
        let config = directions.loader_config();
        assert_eq!(
            config.resource_url(),
            "https://maps.googleapis.com/maps/api/js?key=abc&language=fr"
        );
    }

    #[test]
    fn unknown_travel_mode_is_rejected() {
        let mut directions = DirectionsElement::new();
        assert!(
            directions
                .set_attribute("travel-mode", Some("FLYING"))
                .is_err()
        );
        directions
            .set_attribute("travel-mode", Some("TRANSIT"))
            .unwrap();
        assert_eq!(directions.travel_mode, TravelMode::Transit);
    }
}
