//! Test doubles shared by unit tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use color_eyre::eyre::{Result, eyre};

use crate::status::Outcome;
use crate::transport::Transport;

/// A request as seen by [`FakeTransport`]
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Request {
    pub method: &'static str,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl Request {
    pub fn get(path: &str, query: &[(&str, &str)]) -> Self {
        Self {
            method: "GET",
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            body: None,
        }
    }

    pub fn post(path: &str, body: serde_json::Value) -> Self {
        Self {
            method: "POST",
            path: path.to_string(),
            query: Vec::new(),
            body: Some(body),
        }
    }
}

/// Scripted controller: answers per path and records every request.
///
/// Paths without a scripted answer fail like an unreachable host.
#[derive(Debug, Default)]
pub(crate) struct FakeTransport {
    responses: HashMap<String, Outcome>,
    requests: Mutex<Vec<Request>>,
}

impl FakeTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every request to `path` with `status` and `body`
    #[must_use]
    pub fn respond(mut self, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .insert(path.to_string(), Outcome::new(status, body));
        self
    }

    /// Requests sent to `path`, oldest first
    pub fn requests_to(&self, path: &str) -> Vec<Request> {
        self.requests
            .lock()
            .expect("request log poisoned")
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    fn answer(&self, request: Request) -> Result<Outcome> {
        let outcome = self.responses.get(&request.path).cloned();
        let path = request.path.clone();
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(request);
        outcome.ok_or_else(|| eyre!("connection refused: {path}"))
    }
}

impl Transport for FakeTransport {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Outcome> {
        self.answer(Request {
            method: "GET",
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
            body: None,
        })
    }

    async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<Outcome> {
        self.answer(Request {
            method: "POST",
            path: path.to_string(),
            query: Vec::new(),
            body: Some(body.clone()),
        })
    }
}
