// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The element tree uses multi-channel dirty tracking (via
//! [`understory_dirty`]) to find the elements a reconciliation pass has to
//! visit. Both channels are local-only: marking an element never marks its
//! descendants, since component properties are not inherited. Parent-to-child
//! flow (the map handle) is explicit property propagation, which marks each
//! receiving child in turn.
//!
//! # Consumption
//!
//! [`Document::flush`](crate::document::Document::flush) drains [`SLOTS`]
//! before [`PROPERTIES`] on every pass, so a component sees its new children
//! before it reacts to property changes made in the same batch.

use understory_dirty::Channel;

/// Component properties may have changed; the element must be reconciled.
pub const PROPERTIES: Channel = Channel::new(0);

/// Child list or a child's `slot` attribute changed; slot assignments must
/// be recomputed.
pub const SLOTS: Channel = Channel::new(1);
