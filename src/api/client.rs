//
//  stash-client
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Stash Client
//!
//! [`StashClient`] is the long-lived handle every resource operation hangs
//! off. It owns the base URL, the credentials, the transport, the retry policy
//! and the page size; all of them are read-only after construction, so one
//! client can be shared between threads without extra locking.
//!
//! ## Request Lifecycle
//!
//! ```text
//! operation -> RequestBuilder -> RetryPolicy::run( Transport::execute -> classify )
//!           -> decode body (never retried)
//! ```

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use super::common::{
    classify, collect_keyed, collect_vec, ReasonTable, ServerPaginatedResponse, StashError,
    DEFAULT_PAGE_LIMIT,
};
use super::request::{ApiRequest, RequestBuilder};
use super::retry::RetryPolicy;
use super::transport::{HttpTransport, Transport, TransportConfig};
use crate::auth::Credentials;
use crate::config::ClientConfig;

/// Blocking client for the Stash REST API.
///
/// # Creating a Client
///
/// ```rust,no_run
/// use stash_client::api::{StashClient, TransportConfig};
/// use stash_client::auth::Credentials;
///
/// let client = StashClient::new("https://stash.example.com", &TransportConfig::default())?
///     .with_credentials(Credentials::basic("admin", "secret"));
///
/// let repositories = client.get_repositories()?;
/// println!("{} repositories", repositories.len());
/// # Ok::<(), stash_client::StashError>(())
/// ```
///
/// # Substituting the Transport
///
/// ```rust
/// use std::sync::Arc;
/// use stash_client::api::{ApiRequest, RawResponse, StashClient, Transport};
/// use stash_client::StashError;
///
/// struct Canned;
///
/// impl Transport for Canned {
///     fn execute(&self, _: &ApiRequest) -> Result<RawResponse, StashError> {
///         Ok(RawResponse::new(200, r#"{"isLastPage":true,"values":[]}"#))
///     }
/// }
///
/// let client = StashClient::with_transport("http://stash.local", Arc::new(Canned))?;
/// assert!(client.get_repositories()?.is_empty());
/// # Ok::<(), StashError>(())
/// ```
#[derive(Clone)]
pub struct StashClient {
    base_url: Url,
    credentials: Credentials,
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
    page_limit: u32,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StashClient>();
};

impl std::fmt::Debug for StashClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StashClient")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials)
            .field("retry", &self.retry)
            .field("page_limit", &self.page_limit)
            .finish_non_exhaustive()
    }
}

impl StashClient {
    /// Creates an anonymous client over HTTP with the given transport settings.
    ///
    /// # Errors
    ///
    /// Fails if `base_url` does not parse or the HTTP client cannot be built.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, StashError> {
        Self::with_transport(base_url, Arc::new(HttpTransport::new(transport)?))
    }

    /// Creates an anonymous client over an arbitrary [`Transport`].
    ///
    /// # Errors
    ///
    /// Fails if `base_url` does not parse.
    pub fn with_transport(base_url: &str, transport: Arc<dyn Transport>) -> Result<Self, StashError> {
        let base_url = Url::parse(base_url).map_err(|source| StashError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;

        Ok(Self {
            base_url,
            credentials: Credentials::anonymous(),
            transport,
            retry: RetryPolicy::default(),
            page_limit: DEFAULT_PAGE_LIMIT,
        })
    }

    /// Creates a client from a loaded [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Fails if the configured base URL does not parse or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, StashError> {
        Ok(Self::new(&config.base_url, &config.transport)?
            .with_credentials(config.credentials())
            .with_retry(config.retry)
            .with_page_limit(config.page_limit))
    }

    /// Sets the credentials sent with every request.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Sets the retry policy applied to every request.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the page size requested from collection endpoints (minimum 1).
    pub fn with_page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = page_limit.max(1);
        self
    }

    /// The base URL all paths are appended to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The credentials in use.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The retry policy in use.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// The page size requested from collection endpoints.
    pub fn page_limit(&self) -> u32 {
        self.page_limit
    }

    /// Starts a request against `path` relative to the base URL.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        ApiRequest::builder(method, &self.base_url, path)
    }

    /// Runs one request through the retry policy, classifying each attempt.
    ///
    /// Returns the body of the first response whose status equals `success`.
    pub(crate) fn execute(
        &self,
        builder: RequestBuilder,
        success: u16,
        reasons: ReasonTable,
    ) -> Result<Vec<u8>, StashError> {
        let request = builder.build(&self.credentials)?;
        self.retry.run(|| {
            let response = self.transport.execute(&request)?;
            classify(response.status, success, reasons, &response.body)?;
            Ok(response.body)
        })
    }

    /// Executes a request and decodes its body as `T`.
    pub(crate) fn execute_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        success: u16,
        reasons: ReasonTable,
        what: &'static str,
    ) -> Result<T, StashError> {
        let body = self.execute(builder, success, reasons)?;
        decode(&body, what)
    }

    /// GETs a single resource (success 200).
    pub(crate) fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        reasons: ReasonTable,
        what: &'static str,
    ) -> Result<T, StashError> {
        self.execute_json(self.request(Method::GET, path), 200, reasons, what)
    }

    /// POSTs a JSON body and decodes the response.
    pub(crate) fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        success: u16,
        reasons: ReasonTable,
        what: &'static str,
    ) -> Result<T, StashError> {
        self.execute_json(self.request(Method::POST, path).json(body), success, reasons, what)
    }

    /// Fetches one page of a collection at `start`.
    fn fetch_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        reasons: ReasonTable,
        what: &'static str,
        start: u32,
    ) -> Result<ServerPaginatedResponse<T>, StashError> {
        let mut builder = self.request(Method::GET, path);
        for (key, value) in query {
            builder = builder.query(key, value);
        }
        let builder = builder.query("start", start).query("limit", self.page_limit);
        self.execute_json(builder, 200, reasons, what)
    }

    /// Walks every page of `path`, returning items keyed by `key`.
    pub(crate) fn get_all_keyed<T, K, KF>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        reasons: ReasonTable,
        what: &'static str,
        key: KF,
    ) -> Result<HashMap<K, T>, StashError>
    where
        T: DeserializeOwned,
        K: Eq + Hash,
        KF: Fn(&T) -> K,
    {
        collect_keyed(
            |start| self.fetch_page(path, query, reasons, what, start),
            key,
        )
    }

    /// Walks every page of `path`, returning items in server order.
    pub(crate) fn get_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        reasons: ReasonTable,
        what: &'static str,
    ) -> Result<Vec<T>, StashError> {
        collect_vec(|start| self.fetch_page(path, query, reasons, what, start))
    }
}

/// Decodes a successful body; failures are reported, never retried.
pub(crate) fn decode<T: DeserializeOwned>(body: &[u8], what: &'static str) -> Result<T, StashError> {
    serde_json::from_slice(body).map_err(|source| StashError::Decode { what, source })
}
