// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Untyped access to the `google.maps` namespace.
//!
//! The Maps JavaScript API ships without `wasm-bindgen` bindings, so objects
//! are driven through [`Reflect`]. Every helper here swallows JavaScript
//! exceptions and returns `undefined` instead, matching how the engine trait
//! treats writes as fire-and-forget.

use alloc::string::String;
use alloc::vec::Vec;

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::{JsCast as _, JsValue};

/// Reads `target[key]`, or `undefined` if `target` is not an object.
pub(crate) fn get(target: &JsValue, key: &str) -> JsValue {
    if !target.is_object() && !target.is_function() {
        return JsValue::UNDEFINED;
    }
    Reflect::get(target, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

/// Writes `target[key] = value`.
pub(crate) fn set(target: &JsValue, key: &str, value: impl Into<JsValue>) {
    let _ = Reflect::set(target, &JsValue::from_str(key), &value.into());
}

/// Writes `target[key] = value` when `value` is present.
pub(crate) fn set_opt<T: Into<JsValue>>(target: &JsValue, key: &str, value: Option<T>) {
    if let Some(value) = value {
        set(target, key, value);
    }
}

/// Calls `target[method](...args)`.
pub(crate) fn call(target: &JsValue, method: &str, args: &[JsValue]) -> JsValue {
    let Ok(function) = get(target, method).dyn_into::<Function>() else {
        return JsValue::UNDEFINED;
    };
    let args: Array = args.iter().collect();
    function.apply(target, &args).unwrap_or(JsValue::UNDEFINED)
}

/// Creates an empty object literal.
pub(crate) fn object() -> JsValue {
    Object::new().into()
}

/// Collects values into a JavaScript array.
pub(crate) fn array(values: impl IntoIterator<Item = JsValue>) -> JsValue {
    values.into_iter().collect::<Array>().into()
}

/// Iterates over an array value. Anything else yields nothing.
pub(crate) fn elements(value: &JsValue) -> Vec<JsValue> {
    value
        .dyn_ref::<Array>()
        .map(|a| a.iter().collect())
        .unwrap_or_default()
}

/// Reads a string property.
pub(crate) fn string(target: &JsValue, key: &str) -> Option<String> {
    get(target, key).as_string()
}

/// Reads a number property, calling it first if it is a method.
pub(crate) fn number(target: &JsValue, key: &str) -> Option<f64> {
    let value = get(target, key);
    if value.is_function() {
        call(target, key, &[]).as_f64()
    } else {
        value.as_f64()
    }
}

/// Converts a non-negative integral number to an index.
pub(crate) fn index(value: &JsValue) -> Option<usize> {
    let n = value.as_f64().filter(|n| *n >= 0.0 && n.fract() == 0.0)?;
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "checked non-negative and integral; indices are small"
    )]
    let index = n as usize;
    Some(index)
}

/// Returns `google.maps`, or `undefined` before the script has run.
pub(crate) fn maps() -> JsValue {
    get(&get(&js_sys::global(), "google"), "maps")
}

/// Looks up `google.maps.<path>`.
pub(crate) fn maps_member(path: &[&str]) -> JsValue {
    path.iter().fold(maps(), |at, segment| get(&at, segment))
}

/// Runs `new google.maps.<path>(...args)`.
pub(crate) fn construct(path: &[&str], args: &[JsValue]) -> JsValue {
    let Ok(class) = maps_member(path).dyn_into::<Function>() else {
        return JsValue::UNDEFINED;
    };
    let args: Array = args.iter().collect();
    Reflect::construct(&class, &args).unwrap_or(JsValue::UNDEFINED)
}
