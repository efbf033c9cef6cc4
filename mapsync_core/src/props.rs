// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property change sets and attribute conversions.
//!
//! Every component keeps a [`Changed`] set of the properties written since its
//! last reconciliation. Setters compare by value and only record real changes;
//! reconciliation takes the whole set at once and reacts in a fixed order.
//!
//! The attribute helpers mirror the host runtime's conversions: a boolean
//! attribute is true when present, a number attribute is parsed as a float
//! (NaN when it does not parse, 0 when removed).

use alloc::string::{String, ToString};
use core::fmt;
use core::marker::PhantomData;

/// A property identifier usable in a [`Changed`] set.
pub(crate) trait PropKey: Copy + fmt::Debug {
    /// Bit position, `0..64`.
    fn bit(self) -> u32;
}

/// A set of changed properties of one component.
pub(crate) struct Changed<P> {
    bits: u64,
    _marker: PhantomData<P>,
}

impl<P> Clone for Changed<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Changed<P> {}

impl<P> Default for Changed<P> {
    fn default() -> Self {
        Self {
            bits: 0,
            _marker: PhantomData,
        }
    }
}

impl<P: PropKey> Changed<P> {
    /// Records a change of `prop`.
    pub(crate) fn insert(&mut self, prop: P) {
        self.bits |= 1 << prop.bit();
    }

    /// Returns whether `prop` changed.
    #[must_use]
    pub(crate) fn has(&self, prop: P) -> bool {
        self.bits & (1 << prop.bit()) != 0
    }

    /// Returns whether any of `props` changed.
    #[must_use]
    pub(crate) fn any(&self, props: &[P]) -> bool {
        props.iter().any(|&p| self.has(p))
    }

    /// Returns whether nothing changed.
    #[must_use]
    pub(crate) fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Moves the set out, leaving it empty.
    pub(crate) fn take(&mut self) -> Self {
        core::mem::take(self)
    }
}

impl<P> fmt::Debug for Changed<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Changed({:#b})", self.bits)
    }
}

/// Declares a component's property enum and its [`PropKey`] impl.
macro_rules! props {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        #[repr(u8)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::props::PropKey for $name {
            fn bit(self) -> u32 {
                self as u32
            }
        }
    };
}

pub(crate) use props;

/// Writes `value` into `field` and records `prop` if it differs.
///
/// Returns whether the value changed.
pub(crate) fn assign<T: PartialEq, P: PropKey>(
    field: &mut T,
    value: T,
    changed: &mut Changed<P>,
    prop: P,
) -> bool {
    if *field == value {
        return false;
    }
    *field = value;
    changed.insert(prop);
    true
}

/// Converts a boolean attribute: present means true.
#[must_use]
pub(crate) fn attr_bool(value: Option<&str>) -> bool {
    value.is_some()
}

/// Converts a number attribute.
///
/// A removed attribute converts to `0`, an empty one to `0`, and anything that
/// does not parse to NaN.
#[must_use]
pub(crate) fn attr_number(value: Option<&str>) -> f64 {
    match value.map(str::trim) {
        None | Some("") => 0.0,
        Some(s) => s.parse().unwrap_or(f64::NAN),
    }
}

/// Converts an optional number attribute: removal clears the property.
#[must_use]
pub(crate) fn attr_opt_number(value: Option<&str>) -> Option<f64> {
    value.map(|v| attr_number(Some(v)))
}

/// Converts an optional string attribute.
#[must_use]
pub(crate) fn attr_string(value: Option<&str>) -> Option<String> {
    value.map(ToString::to_string)
}

/// Converts an integer attribute, truncating toward zero.
///
/// Values that do not parse, or that do not fit, fall back to `0`.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "z-order values are small; saturation is acceptable"
)]
pub(crate) fn attr_int(value: Option<&str>) -> i32 {
    let n = attr_number(value);
    if n.is_finite() { n as i32 } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    props! {
        enum Sample {
            A,
            B,
            C,
        }
    }

    #[test]
    fn assign_records_only_real_changes() {
        let mut changed = Changed::<Sample>::default();
        let mut zoom = 10.0;
        assert!(!assign(&mut zoom, 10.0, &mut changed, Sample::A));
        assert!(changed.is_empty());
        assert!(assign(&mut zoom, 12.0, &mut changed, Sample::B));
        assert!(changed.has(Sample::B));
        assert!(!changed.has(Sample::A));
        assert!(changed.any(&[Sample::A, Sample::B]));
    }

    #[test]
    fn take_empties_the_set() {
        let mut changed = Changed::<Sample>::default();
        changed.insert(Sample::C);
        let taken = changed.take();
        assert!(taken.has(Sample::C));
        assert!(changed.is_empty());
    }

    #[test]
    fn number_attributes_follow_host_conversion() {
        assert_eq!(attr_number(Some("12.5")), 12.5);
        assert_eq!(attr_number(Some(" 3 ")), 3.0);
        assert_eq!(attr_number(Some("")), 0.0);
        assert_eq!(attr_number(None), 0.0);
        assert!(attr_number(Some("north")).is_nan());
        assert_eq!(attr_opt_number(None), None);
        assert_eq!(attr_int(Some("4.9")), 4);
        assert_eq!(attr_int(Some("abc")), 0);
    }

    #[test]
    fn boolean_attributes_are_presence() {
        assert!(attr_bool(Some("")));
        assert!(attr_bool(Some("false")));
        assert!(!attr_bool(None));
    }
}
