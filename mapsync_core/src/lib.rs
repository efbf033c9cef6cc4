// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative-to-imperative synchronization for map components.
//!
//! `mapsync_core` keeps a tree of declarative map elements (`<google-map>`,
//! markers, polylines and polygons with their points, directions, places
//! search) consistent with the stateful objects of a map engine. It decides,
//! for every property or child-list change, which imperative engine calls to
//! make and in what order, keeps event subscriptions free of duplicates and
//! stale handles, and turns engine events back into element state and
//! component events. It is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   host: properties, attributes, children
//!       │
//!       ▼
//!   ElementTree ──► Document::flush() ──► Component::reconcile()
//!                        ▲                        │
//!                        │                        ▼
//!                   Delivery  ◄──── MapEngine (create / set / listen)
//!                        │
//!                        ▼
//!                   ElementEvent (take_events)
//! ```
//!
//! **[`tree`]**: Struct-of-arrays element tree with generational handles,
//! slot assignment and connected-state tracking.
//!
//! **[`dirty`]**: Two dirty channels via `understory_dirty`: PROPERTIES for
//! elements with pending property changes, SLOTS for hosts whose children
//! need reassignment.
//!
//! **[`component`]**: The six components and their reactions.
//!
//! **[`document`]**: The [`Document`](document::Document) driver that runs
//! reconciliation passes and routes engine deliveries back to elements.
//!
//! **[`engine`]**: The [`MapEngine`](engine::MapEngine) trait backends
//! implement, with the option, handle and service types it consumes.
//!
//! **[`loader`]**: Memoized, token-keyed engine script loading.
//!
//! **[`listeners`]**: Per-component listener tables and event groups.
//!
//! **[`geo`]**: Positions and bounds.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types,
//! with a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod component;
pub mod dirty;
pub mod document;
pub mod element;
pub mod engine;
pub mod error;
pub mod geo;
pub mod handle;
pub mod listeners;
pub mod loader;
pub mod options;
pub mod pending;
pub mod service;
pub mod trace;
pub mod tree;

mod props;
