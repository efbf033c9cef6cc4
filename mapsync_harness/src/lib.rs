// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory doubles for driving a mapsync
//! [`Document`](mapsync_core::document::Document) without a browser.
//!
//! - [`FakeEngine`]: a [`MapEngine`](mapsync_core::engine::MapEngine) that
//!   records every imperative call, keeps engine-side state for inspection,
//!   fires the events its writes would fire, and lets tests simulate user
//!   interaction and complete service requests.
//! - [`FakeScripts`]: a [`ScriptHost`](mapsync_core::loader::ScriptHost)
//!   whose loads complete on demand.
//!
//! The integration tests of this crate exercise the components end to end
//! through these doubles.

#![no_std]

extern crate alloc;

mod engine;
mod scripts;

pub use engine::{Call, FakeEngine, FakeInfoWindow, FakeMap, FakeMarker, Node};
pub use scripts::FakeScripts;

/// A document over the fakes.
pub type FakeDocument = mapsync_core::document::Document<FakeEngine, FakeScripts>;

/// Creates a document whose engine is already loaded.
#[must_use]
pub fn loaded_document() -> FakeDocument {
    FakeDocument::new(FakeEngine::loaded(), FakeScripts::new())
}
