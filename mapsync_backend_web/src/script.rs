// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `<script>`-tag script host.
//!
//! Each request appends an `async` script element to `<head>` and installs a
//! global function named after the request's token. The API script invokes
//! that function once it has initialized; the function records the token and
//! deletes itself from the global object, so a token can complete at most
//! once.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use js_sys::Reflect;
use mapsync_core::loader::{ScriptHost, ScriptRequest};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::HtmlScriptElement;

use crate::js::set;

/// A [`ScriptHost`] that loads scripts with `<script>` tags.
#[derive(Default)]
pub struct ScriptTags {
    completed: Rc<RefCell<Vec<String>>>,
    /// Installed completion functions, kept alive until they fire.
    callbacks: Vec<(String, Closure<dyn FnMut()>)>,
}

impl core::fmt::Debug for ScriptTags {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScriptTags")
            .field("completed", &self.completed.borrow().len())
            .field("outstanding", &self.callbacks.len())
            .finish()
    }
}

impl ScriptTags {
    /// Creates a host with no loads in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of loads whose completion function has not fired yet.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.callbacks.len()
    }
}

impl ScriptHost for ScriptTags {
    fn request(&mut self, request: &ScriptRequest) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(head) = document.head() else {
            return;
        };
        let Ok(script) = document
            .create_element("script")
            .map(|e| e.unchecked_into::<HtmlScriptElement>())
        else {
            return;
        };

        let completed = Rc::clone(&self.completed);
        let token = request.token.clone();
        let callback = Closure::wrap(Box::new(move || {
            let _ = Reflect::delete_property(&js_sys::global(), &JsValue::from_str(&token));
            completed.borrow_mut().push(token.clone());
        }) as Box<dyn FnMut()>);
        set(
            &js_sys::global(),
            &request.token,
            callback.as_ref().clone(),
        );

        script.set_src(&request.url);
        script.set_async(true);
        let _ = head.append_child(&script);
        self.callbacks.push((request.token.clone(), callback));
    }

    fn take_completed(&mut self, out: &mut Vec<String>) {
        let done = core::mem::take(&mut *self.completed.borrow_mut());
        // The functions have removed themselves from the global object.
        self.callbacks.retain(|(token, _)| !done.contains(token));
        out.extend(done);
    }
}
