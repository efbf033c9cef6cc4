// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` driver.
//!
//! Engine events and service callbacks arrive between frames and only queue
//! deliveries; nothing reaches the elements until the document is flushed.
//! [`FrameLoop`] calls a closure once per animation frame, which is where a
//! page runs [`Document::tick`] to drain those deliveries and run deferred
//! work such as the debounced center update.
//!
//! [`Document::tick`]: mapsync_core::document::Document::tick

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

/// Calls a closure on every animation frame.
///
/// Create with [`FrameLoop::new`], then call [`start`](Self::start). The loop
/// re-registers itself each frame until [`stop`](Self::stop) is called or
/// the `FrameLoop` is dropped.
///
/// ```ignore
/// let doc = Rc::new(RefCell::new(WebDocument::new(
///     GoogleMapsEngine::new(),
///     ScriptTags::new(),
/// )));
/// let frames = FrameLoop::new({
///     let doc = Rc::clone(&doc);
///     move |_| {
///         let _ = doc.borrow_mut().tick();
///     }
/// });
/// frames.start();
/// ```
pub struct FrameLoop {
    inner: Rc<FrameInner>,
}

type FrameClosure = Closure<dyn FnMut(f64)>;

struct FrameInner {
    /// The closure registered with `requestAnimationFrame`.
    ///
    /// Kept in its own `RefCell` so it can reference itself from inside
    /// without conflicting with `callback`.
    closure: RefCell<Option<FrameClosure>>,

    /// Receives the frame timestamp in milliseconds.
    callback: RefCell<Box<dyn FnMut(f64)>>,

    frames: Cell<u64>,
    running: Cell<bool>,

    /// Id of the most recent `requestAnimationFrame` call.
    raf_id: Cell<i32>,
}

impl FrameLoop {
    /// Creates a loop that is **not yet running**.
    pub fn new(callback: impl FnMut(f64) + 'static) -> Self {
        Self {
            inner: Rc::new(FrameInner {
                closure: RefCell::new(None),
                callback: RefCell::new(Box::new(callback)),
                frames: Cell::new(0),
                running: Cell::new(false),
                raf_id: Cell::new(0),
            }),
        }
    }

    /// Starts the loop. A running loop is left alone.
    pub fn start(&self) {
        if self.inner.running.get() {
            return;
        }
        self.inner.running.set(true);

        let inner = Rc::clone(&self.inner);
        let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            if !inner.running.get() {
                return;
            }
            inner.frames.set(inner.frames.get() + 1);

            // Scoped so it doesn't overlap with the `closure` borrow.
            inner.callback.borrow_mut()(timestamp_ms);

            if inner.running.get()
                && let Some(ref closure) = *inner.closure.borrow()
            {
                let id = request_animation_frame(closure.as_ref().unchecked_ref());
                inner.raf_id.set(id);
            }
        }) as Box<dyn FnMut(f64)>);

        let id = request_animation_frame(closure.as_ref().unchecked_ref());
        self.inner.raf_id.set(id);
        *self.inner.closure.borrow_mut() = Some(closure);
    }

    /// Stops the loop and cancels the pending frame. It can be restarted.
    pub fn stop(&self) {
        if !self.inner.running.get() {
            return;
        }
        self.inner.running.set(false);
        cancel_animation_frame(self.inner.raf_id.get());
    }

    /// Returns `true` while the loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
        // Release the JS closure so it doesn't leak.
        self.inner.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for FrameLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameLoop")
            .field("running", &self.inner.running.get())
            .field("frames", &self.inner.frames.get())
            .finish_non_exhaustive()
    }
}
