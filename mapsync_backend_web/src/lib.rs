// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for mapsync.
//!
//! This crate binds the core engine contract to the browser:
//!
//! - [`GoogleMapsEngine`]: [`MapEngine`] over the `google.maps` namespace
//! - [`ScriptTags`]: [`ScriptHost`] that loads the API with a `<script>` tag
//! - [`FrameLoop`]: `requestAnimationFrame` driver for [`Document::tick`]
//!
//! The Maps JavaScript API has no typed bindings; objects are driven through
//! `js_sys::Reflect`, and a missing method or property reads as absent
//! rather than failing.
//!
//! [`Document::tick`]: mapsync_core::document::Document::tick

#![no_std]

extern crate alloc;

mod convert;
mod engine;
mod frame;
mod js;
mod script;

pub use engine::GoogleMapsEngine;
pub use frame::FrameLoop;
pub use mapsync_core::engine::MapEngine;
pub use mapsync_core::loader::ScriptHost;
pub use script::ScriptTags;

/// A document driving the Google Maps API from the page.
pub type WebDocument = mapsync_core::document::Document<GoogleMapsEngine, ScriptTags>;

/// Creates a [`WebDocument`] with a fresh engine and script host.
#[must_use]
pub fn document() -> WebDocument {
    WebDocument::new(GoogleMapsEngine::new(), ScriptTags::new())
}
