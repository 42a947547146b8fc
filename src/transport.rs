//! HTTP access to the controller
//!
//! [`Transport`] is the single seam between the sync logic and the network.
//! Each call is one request with no retry and no timeout beyond the client
//! default.

use color_eyre::eyre::{Context, Result};
use reqwest::Url;
use std::future::Future;
use tracing::debug;

use crate::status::Outcome;

/// Controller endpoints
pub mod paths {
    pub const COLOR_GET: &str = "/color/get";
    /// The controller matches this one exactly, trailing slash included
    pub const COLOR_SET: &str = "/color/set/";
    pub const CONFIG: &str = "/config";
    pub const RESTART: &str = "/restart";
}

/// One request/response round trip to the controller.
///
/// An `Err` means no HTTP response arrived at all.
pub trait Transport: Send + Sync + 'static {
    /// `GET path?query`
    fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> impl Future<Output = Result<Outcome>> + Send;

    /// `POST path` with a JSON body
    fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> impl Future<Output = Result<Outcome>> + Send;
}

/// [`Transport`] over plain HTTP with `reqwest`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base: Url,
}

impl HttpTransport {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base: Url) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("sezanlight/", env!("CARGO_PKG_VERSION")))
            .build()
            .wrap_err("Failed to build HTTP client")?;
        Ok(Self { client, base })
    }

    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .wrap_err_with(|| format!("Invalid controller path: {path}"))
    }

    async fn finish(response: reqwest::Response) -> Result<Outcome> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .wrap_err("Failed to read controller response")?;
        debug!("<- {} ({} bytes)", status, body.len());
        Ok(Outcome { status, body })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Outcome> {
        let url = self.url(path)?;
        debug!("-> GET {} {:?}", url, query);
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .wrap_err_with(|| format!("GET {path} failed"))?;
        Self::finish(response).await
    }

    async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<Outcome> {
        let url = self.url(path)?;
        debug!("-> POST {} {}", url, body);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .wrap_err_with(|| format!("POST {path} failed"))?;
        Self::finish(response).await
    }
}
