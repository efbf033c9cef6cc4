// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared, memoized acquisition of the engine's script.
//!
//! The engine is delivered as one script resource. Loading it is requested
//! from a [`ScriptHost`] with a completion token; the host signals completion
//! by reporting the token back (on the web, by invoking a global callback of
//! that name, which then removes itself).
//!
//! The [`Loader`] keeps one state per distinct resource URL (the URL without
//! its callback parameter). Every element that needs the engine attaches to
//! the pending load for its URL instead of issuing a new one, and every load
//! gets a fresh token from a monotonic counter so concurrent loads never
//! collide in the host's global namespace.
//!
//! If the host never reports completion, waiters simply stay waiting. There
//! is no timeout.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;

use crate::trace::{ScriptLoadedEvent, ScriptRequestEvent, Tracer};
use crate::tree::ElementId;

/// Default script location.
pub const DEFAULT_MAPS_URL: &str = "https://maps.googleapis.com/maps/api/js";

/// Prefix of generated completion tokens.
pub const TOKEN_PREFIX: &str = "__mapsync_loaded_";

/// Script acquisition parameters.
///
/// Empty strings are treated as unset, like absent attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Script location; [`DEFAULT_MAPS_URL`] when empty.
    pub maps_url: String,
    /// `key` parameter.
    pub api_key: String,
    /// `client` parameter.
    pub client_id: String,
    /// `language` parameter.
    pub language: String,
    /// `v` parameter.
    pub version: String,
}

impl LoaderConfig {
    /// Returns the resource URL without the callback parameter.
    ///
    /// Parameters appear in the order `key`, `client`, `language`, `v`, and
    /// are percent-encoded. This string identifies the resource for
    /// memoization.
    #[must_use]
    pub fn resource_url(&self) -> String {
        let mut url = String::from(if self.maps_url.is_empty() {
            DEFAULT_MAPS_URL
        } else {
            self.maps_url.as_str()
        });
        let mut sep = '?';
        for (name, value) in [
            ("key", &self.api_key),
            ("client", &self.client_id),
            ("language", &self.language),
            ("v", &self.version),
        ] {
            if value.is_empty() {
                continue;
            }
            url.push(sep);
            url.push_str(name);
            url.push('=');
            push_encoded(&mut url, value);
            sep = '&';
        }
        url
    }

    /// Returns the full request URL for a completion token.
    #[must_use]
    pub fn request_url(&self, token: &str) -> String {
        let mut url = self.resource_url();
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str("callback=");
        push_encoded(&mut url, token);
        url
    }
}

/// Appends `value` to `out`, percent-encoding everything outside the
/// unreserved set.
fn push_encoded(out: &mut String, value: &str) {
    for b in value.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            out.push(char::from(b));
        } else {
            // Writing to a String cannot fail.
            let _ = write!(out, "%{b:02X}");
        }
    }
}

/// One script load handed to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptRequest {
    /// Full URL, including the callback parameter.
    pub url: String,
    /// Completion token (also the callback name).
    pub token: String,
}

/// The host side of script acquisition.
pub trait ScriptHost {
    /// Starts loading a script. Completion is reported through
    /// [`take_completed`](Self::take_completed).
    fn request(&mut self, request: &ScriptRequest);

    /// Moves the tokens of every load completed since the last call into
    /// `out`.
    fn take_completed(&mut self, out: &mut Vec<String>);
}

/// Result of asking the loader for the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The engine is usable now.
    Ready,
    /// The waiter will be reported by [`Loader::complete`].
    Waiting,
}

#[derive(Clone, Debug)]
enum LoadState {
    Pending {
        token: String,
        waiters: Vec<ElementId>,
    },
    Loaded,
}

/// Memoized script loads, one per resource URL.
#[derive(Clone, Debug, Default)]
pub struct Loader {
    states: BTreeMap<String, LoadState>,
    next_token: u64,
}

impl Loader {
    /// Creates an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves readiness for `waiter`.
    ///
    /// Returns [`LoadOutcome::Ready`] synchronously when `engine_loaded` is
    /// true or the resource already finished loading. Otherwise attaches
    /// `waiter` to the pending load for the resource, issuing the load first
    /// if there is none.
    pub fn load(
        &mut self,
        config: &LoaderConfig,
        waiter: ElementId,
        engine_loaded: bool,
        scripts: &mut dyn ScriptHost,
        tracer: &mut Tracer<'_>,
    ) -> LoadOutcome {
        if engine_loaded {
            return LoadOutcome::Ready;
        }
        let key = config.resource_url();
        match self.states.get_mut(&key) {
            Some(LoadState::Loaded) => LoadOutcome::Ready,
            Some(LoadState::Pending { waiters, .. }) => {
                if !waiters.contains(&waiter) {
                    waiters.push(waiter);
                }
                LoadOutcome::Waiting
            }
            None => {
                let token = format!("{TOKEN_PREFIX}{}", self.next_token);
                self.next_token += 1;
                let request = ScriptRequest {
                    url: config.request_url(&token),
                    token,
                };
                tracer.script_request(&ScriptRequestEvent {
                    url: &request.url,
                    token: &request.token,
                });
                scripts.request(&request);
                self.states.insert(
                    key,
                    LoadState::Pending {
                        token: request.token,
                        waiters: Vec::from([waiter]),
                    },
                );
                LoadOutcome::Waiting
            }
        }
    }

    /// Marks the load identified by `token` finished and returns its waiters.
    ///
    /// Unknown or already completed tokens return nothing, so each waiter is
    /// reported at most once.
    pub fn complete(&mut self, token: &str, tracer: &mut Tracer<'_>) -> Vec<ElementId> {
        let Some(state) = self
            .states
            .values_mut()
            .find(|s| matches!(s, LoadState::Pending { token: t, .. } if t == token))
        else {
            return Vec::new();
        };
        let LoadState::Pending { waiters, .. } = core::mem::replace(state, LoadState::Loaded)
        else {
            return Vec::new();
        };
        tracer.script_loaded(&ScriptLoadedEvent {
            token,
            waiters: waiters.len(),
        });
        waiters
    }

    /// Returns whether any load is still pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.states
            .values()
            .any(|s| matches!(s, LoadState::Pending { .. }))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;
    use crate::tree::ElementTree;

    #[derive(Default)]
    struct Scripts {
        requests: Vec<ScriptRequest>,
    }

    impl ScriptHost for Scripts {
        fn request(&mut self, request: &ScriptRequest) {
            self.requests.push(request.clone());
        }

        fn take_completed(&mut self, _out: &mut Vec<String>) {}
    }

    fn config() -> LoaderConfig {
        LoaderConfig {
            api_key: "abc".to_string(),
            version: "3.exp".to_string(),
            ..LoaderConfig::default()
        }
    }

    #[test]
    fn url_parameters_are_ordered_and_encoded() {
        let config = LoaderConfig {
            maps_url: "https://example.test/js".to_string(),
            api_key: "k y".to_string(),
            client_id: "gme-x".to_string(),
            language: "pt-BR".to_string(),
            version: "3.exp".to_string(),
        };
        assert_eq!(
            config.request_url("__mapsync_loaded_0"),
            "https://example.test/js?key=k%20y&client=gme-x&language=pt-BR&v=3.exp\
             &callback=__mapsync_loaded_0"
        );
    }

    #[test]
    fn bare_config_uses_default_url() {
        let config = LoaderConfig::default();
        assert_eq!(config.resource_url(), DEFAULT_MAPS_URL);
        assert_eq!(
            config.request_url("t"),
            "https://maps.googleapis.com/maps/api/js?callback=t"
        );
    }

    #[test]
    fn loaded_engine_resolves_synchronously() {
        let mut tree = ElementTree::new();
        let a = tree.create(());
        let mut scripts = Scripts::default();
        let mut loader = Loader::new();
        let outcome = loader.load(&config(), a, true, &mut scripts, &mut Tracer::none());
        assert_eq!(outcome, LoadOutcome::Ready);
        assert!(scripts.requests.is_empty());
    }

    #[test]
    fn concurrent_waiters_share_one_load() {
        let mut tree = ElementTree::new();
        let a = tree.create(());
        let b = tree.create(());
        let mut scripts = Scripts::default();
        let mut loader = Loader::new();
        let mut tracer = Tracer::none();

        assert_eq!(
            loader.load(&config(), a, false, &mut scripts, &mut tracer),
            LoadOutcome::Waiting
        );
        assert_eq!(
            loader.load(&config(), b, false, &mut scripts, &mut tracer),
            LoadOutcome::Waiting
        );
        assert_eq!(scripts.requests.len(), 1, "one fetch per resource");

        let token = scripts.requests[0].token.clone();
        assert_eq!(loader.complete(&token, &mut tracer), vec![a, b]);
        assert!(loader.complete(&token, &mut tracer).is_empty(), "resolves once");
        assert!(!loader.is_pending());

        let c = tree.create(());
        assert_eq!(
            loader.load(&config(), c, false, &mut scripts, &mut tracer),
            LoadOutcome::Ready
        );
    }

    #[test]
    fn distinct_resources_get_distinct_tokens() {
        let mut tree = ElementTree::new();
        let a = tree.create(());
        let b = tree.create(());
        let mut scripts = Scripts::default();
        let mut loader = Loader::new();
        let other = LoaderConfig {
            language: "fr".to_string(),
            ..config()
        };
        loader.load(&config(), a, false, &mut scripts, &mut Tracer::none());
        loader.load(&other, b, false, &mut scripts, &mut Tracer::none());
        assert_eq!(scripts.requests.len(), 2);
        assert_ne!(scripts.requests[0].token, scripts.requests[1].token);
        assert!(scripts.requests[1].url.contains("language=fr"));
    }

    #[test]
    fn unknown_token_leaves_loads_pending() {
        let mut tree = ElementTree::new();
        let a = tree.create(());
        let mut scripts = Scripts::default();
        let mut loader = Loader::new();
        let mut tracer = Tracer::none();
        loader.load(&config(), a, false, &mut scripts, &mut tracer);

        assert!(loader.complete("__mapsync_loaded_99", &mut tracer).is_empty());
        assert!(loader.is_pending());
        let token = scripts.requests[0].token.clone();
        assert_eq!(loader.complete(&token, &mut tracer), vec![a]);
    }
}
