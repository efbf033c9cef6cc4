// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for property validation and element access.
//!
//! Only *input* problems are errors. Engine operations that complete with a
//! non-OK status are never raised; they are simply not reflected into
//! component state.

use alloc::string::String;
use core::fmt;

use crate::element::ElementKind;
use crate::tree::ElementId;

/// Errors raised synchronously to the caller of a setter, attribute change or
/// [`Document::flush`](crate::document::Document::flush).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A geographic coordinate was NaN, infinite, or missing where a number
    /// is required.
    TypeViolation {
        /// The offending property (`"latitude"` or `"longitude"`).
        field: &'static str,
    },
    /// An attribute value could not be converted to the property's type.
    InvalidAttribute {
        /// Attribute name.
        name: String,
        /// The rejected value.
        value: String,
    },
    /// The element handle refers to a destroyed element.
    StaleElement(ElementId),
    /// The element exists but is not of the requested kind.
    WrongKind {
        /// The element that was addressed.
        id: ElementId,
        /// The kind the operation requires.
        expected: ElementKind,
    },
    /// The element cannot perform the operation before it has a map.
    Unready(ElementId),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeViolation { field } => write!(f, "{field} must be a number"),
            Self::InvalidAttribute { name, value } => {
                write!(f, "invalid value {value:?} for attribute `{name}`")
            }
            Self::StaleElement(id) => write!(f, "stale element handle {id:?}"),
            Self::WrongKind { id, expected } => {
                write!(f, "element {id:?} is not a <{}>", expected.tag())
            }
            Self::Unready(id) => write!(f, "element {id:?} has no map yet"),
        }
    }
}

impl core::error::Error for Error {}
