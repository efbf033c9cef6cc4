// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-threaded one-shot values resolved by a later reconciliation pass.
//!
//! A [`Pending`] is handed to the caller of an operation whose result arrives
//! as an engine completion (place details). It can be awaited as a
//! [`Future`], or polled without an executor with [`Pending::try_take`].

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, Waker};

struct Shared<T> {
    value: Option<T>,
    waker: Option<Waker>,
}

/// A value that a later [`flush`](crate::document::Document::flush) provides.
pub struct Pending<T> {
    shared: Rc<RefCell<Shared<T>>>,
}

/// The resolving side of a [`Pending`].
pub(crate) struct Resolver<T> {
    shared: Rc<RefCell<Shared<T>>>,
}

/// Creates a connected pending value and resolver.
pub(crate) fn pending<T>() -> (Pending<T>, Resolver<T>) {
    let shared = Rc::new(RefCell::new(Shared {
        value: None,
        waker: None,
    }));
    (
        Pending {
            shared: shared.clone(),
        },
        Resolver { shared },
    )
}

impl<T> Pending<T> {
    /// Takes the value if it has arrived.
    pub fn try_take(&mut self) -> Option<T> {
        self.shared.borrow_mut().value.take()
    }

    /// Returns whether the value has arrived and not been taken.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.shared.borrow().value.is_some()
    }
}

impl<T> Future for Pending<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let mut shared = self.shared.borrow_mut();
        match shared.value.take() {
            Some(value) => Poll::Ready(value),
            None => {
                shared.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

impl<T> Resolver<T> {
    /// Provides the value and wakes the awaiting task, if any.
    pub(crate) fn resolve(self, value: T) {
        let waker = {
            let mut shared = self.shared.borrow_mut();
            shared.value = Some(value);
            shared.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl<T> fmt::Debug for Pending<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending")
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl<T> fmt::Debug for Resolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_once() {
        let (mut value, resolver) = pending::<u32>();
        assert!(!value.is_ready());
        assert_eq!(value.try_take(), None);
        resolver.resolve(7);
        assert!(value.is_ready());
        assert_eq!(value.try_take(), Some(7));
        assert_eq!(value.try_take(), None);
    }

    #[test]
    fn poll_reports_resolution() {
        let (mut value, resolver) = pending::<&str>();
        let mut cx = Context::from_waker(Waker::noop());
        assert_eq!(Pin::new(&mut value).poll(&mut cx), Poll::Pending);
        resolver.resolve("done");
        assert_eq!(Pin::new(&mut value).poll(&mut cx), Poll::Ready("done"));
    }
}
