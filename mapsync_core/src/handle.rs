// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Opaque engine handle types.
//!
//! Every imperative object the engine creates is referred to by a small copy
//! newtype. Handles are allocated by the [`MapEngine`](crate::engine::MapEngine)
//! implementation and are meaningless to anything but that engine.

use core::fmt;

macro_rules! engine_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u32);

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

engine_handle!(
    /// A map canvas object.
    MapHandle
);
engine_handle!(
    /// A marker object.
    MarkerHandle
);
engine_handle!(
    /// An info-window overlay.
    InfoWindowHandle
);
engine_handle!(
    /// A polyline or polygon object.
    PolyHandle
);
engine_handle!(
    /// A live, observable vertex array backing a poly.
    PathHandle
);
engine_handle!(
    /// A directions renderer.
    RendererHandle
);
engine_handle!(
    /// A KML overlay layer.
    KmlHandle
);
engine_handle!(
    /// One event subscription.
    ListenerId
);
engine_handle!(
    /// One in-flight asynchronous service request (routing, search, detail).
    RequestId
);

/// An object an event subscription can be attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// A map canvas.
    Map(MapHandle),
    /// A marker.
    Marker(MarkerHandle),
    /// An info window.
    InfoWindow(InfoWindowHandle),
    /// A polyline or polygon.
    Poly(PolyHandle),
    /// A path buffer.
    Path(PathHandle),
}
