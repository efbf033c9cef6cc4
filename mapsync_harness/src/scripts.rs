// Copyright 2026 the Mapsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`ScriptHost`] that loads nothing until told to.

use alloc::string::String;
use alloc::vec::Vec;

use mapsync_core::loader::{ScriptHost, ScriptRequest};

/// A [`ScriptHost`] double.
///
/// Requests are recorded; a load completes only when the test calls
/// [`complete`](Self::complete) or [`complete_all`](Self::complete_all).
#[derive(Debug, Default)]
pub struct FakeScripts {
    requests: Vec<ScriptRequest>,
    outstanding: Vec<String>,
    completed: Vec<String>,
}

impl FakeScripts {
    /// Creates a host with no requests.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every script requested so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> &[ScriptRequest] {
        &self.requests
    }

    /// Tokens of loads that have not completed.
    #[must_use]
    pub fn outstanding(&self) -> &[String] {
        &self.outstanding
    }

    /// Completes the load for `token`. Unknown or finished tokens are
    /// ignored, like a second invocation of a self-removed callback.
    pub fn complete(&mut self, token: &str) {
        if let Some(at) = self.outstanding.iter().position(|t| t == token) {
            self.completed.push(self.outstanding.remove(at));
        }
    }

    /// Completes every outstanding load.
    pub fn complete_all(&mut self) {
        self.completed.append(&mut self.outstanding);
    }
}

impl ScriptHost for FakeScripts {
    fn request(&mut self, request: &ScriptRequest) {
        self.requests.push(request.clone());
        self.outstanding.push(request.token.clone());
    }

    fn take_completed(&mut self, out: &mut Vec<String>) {
        out.append(&mut self.completed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn request(token: &str) -> ScriptRequest {
        ScriptRequest {
            url: "https://example.test/js".to_string(),
            token: token.to_string(),
        }
    }

    #[test]
    fn completion_fires_once_per_token() {
        let mut host = FakeScripts::new();
        host.request(&request("a"));
        host.request(&request("b"));
        host.complete("b");
        host.complete("b");

        let mut done = Vec::new();
        host.take_completed(&mut done);
        assert_eq!(done, ["b"]);
        assert_eq!(host.outstanding(), ["a"]);

        host.complete_all();
        done.clear();
        host.take_completed(&mut done);
        assert_eq!(done, ["a"]);
        assert_eq!(host.requests().len(), 2);
    }
}
