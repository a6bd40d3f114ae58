//
//  stash-client
//  api/transport.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Transport
//!
//! The seam between request construction and the network. [`HttpTransport`]
//! is the production implementation on top of a blocking `reqwest` client;
//! tests substitute their own [`Transport`] to script responses.
//!
//! Transport settings are passed in explicitly through [`TransportConfig`],
//! so two clients with different timeouts or TLS policies can coexist.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::common::StashError;
use super::request::ApiRequest;

/// Default overall timeout for one attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A status code and body as received from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Full response body.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Creates a response from a status and anything byte-like.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Executes one request and returns the raw response.
///
/// Implementations perform exactly one network round trip per call and never
/// retry on their own. A failure to obtain any response at all is reported as
/// [`StashError::Transport`].
pub trait Transport: Send + Sync {
    /// Sends `request` and reads the whole response body.
    fn execute(&self, request: &ApiRequest) -> Result<RawResponse, StashError>;
}

/// Settings for the underlying HTTP client.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use stash_client::api::TransportConfig;
///
/// let config = TransportConfig {
///     timeout: Duration::from_secs(30),
///     accept_invalid_certs: true,
///     ..Default::default()
/// };
/// assert!(config.user_agent.starts_with("stash-client/"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Overall timeout for one attempt, connect through body read.
    #[serde(default = "default_timeout", with = "crate::api::retry::duration_secs")]
    pub timeout: Duration,

    /// Skip TLS certificate verification (self-signed internal servers).
    #[serde(default)]
    pub accept_invalid_certs: bool,

    /// Value of the `User-Agent` header.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_user_agent() -> String {
    format!("stash-client/{}", crate::VERSION)
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            accept_invalid_certs: false,
            user_agent: default_user_agent(),
        }
    }
}

/// [`Transport`] over a blocking `reqwest` client.
///
/// Connection reuse is whatever `reqwest` provides; the client is cheap to
/// share between threads.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    /// Builds the HTTP client from `config`.
    ///
    /// # Errors
    ///
    /// Fails with [`StashError::Client`] if the TLS backend cannot be
    /// initialized or the user agent is not a valid header value.
    pub fn new(config: &TransportConfig) -> Result<Self, StashError> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(StashError::Client)?;

        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &ApiRequest) -> Result<RawResponse, StashError> {
        tracing::debug!("{} {}", request.method, request.url);

        let transport_error = |e: reqwest::Error| StashError::Transport {
            method: request.method.to_string(),
            url: request.url.to_string(),
            source: Box::new(e),
        };

        let mut builder = self
            .http
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(transport_error)?;

        tracing::debug!("{} {} -> {}", request.method, request.url, status);

        Ok(RawResponse::new(status, body.to_vec()))
    }
}
