//
//  stash-client
//  api/request.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Request Builder
//!
//! Builds a fully described outbound request without performing any I/O.
//! A built [`ApiRequest`] can be handed to any [`Transport`](super::Transport)
//! as many times as the retry policy allows.
//!
//! Headers applied:
//!
//! | Header | When |
//! |--------|------|
//! | `Accept: application/json` | Always, unless [`RequestBuilder::raw`] was called |
//! | `Content-Type: application/json` | A JSON body was attached |
//! | `Authorization: Basic ...` | Credentials are not anonymous |
//!
//! Resource paths are split on `/` and each piece is percent-encoded as a
//! single path segment, so a `#` or `?` inside a file name or slug stays part
//! of the path.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use url::Url;

use super::common::StashError;
use crate::auth::Credentials;

const APPLICATION_JSON: &str = "application/json";

/// A request ready to be executed.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Fully qualified URL including query parameters.
    pub url: Url,
    /// Headers to send.
    pub headers: HeaderMap,
    /// Serialized JSON body, if any.
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Starts building a request for `base_url` + `path`.
    ///
    /// `path` is `/`-separated; empty segments are dropped.
    pub fn builder(method: Method, base_url: &Url, path: &str) -> RequestBuilder {
        RequestBuilder {
            method,
            base_url: base_url.clone(),
            path: path.to_string(),
            query: Vec::new(),
            flags: Vec::new(),
            body: None,
            raw: false,
        }
    }

    /// Returns a header value as a string, for logging and tests.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Builder for [`ApiRequest`].
#[derive(Debug)]
pub struct RequestBuilder {
    method: Method,
    base_url: Url,
    path: String,
    query: Vec<(String, String)>,
    flags: Vec<String>,
    body: Option<Result<Vec<u8>, serde_json::Error>>,
    raw: bool,
}

impl RequestBuilder {
    /// Appends a `key=value` query parameter.
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Appends a value-less query parameter such as `raw`.
    pub fn flag(mut self, key: &str) -> Self {
        self.flags.push(key.to_string());
        self
    }

    /// Attaches a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        self.body = Some(serde_json::to_vec(body));
        self
    }

    /// Marks the request as a raw byte-stream fetch (no `Accept` header).
    pub fn raw(mut self) -> Self {
        self.raw = true;
        self
    }

    /// Finalizes the request, applying headers for `credentials`.
    ///
    /// # Errors
    ///
    /// Fails if the base URL cannot carry a path, the body cannot be
    /// serialized, or a header value is not representable.
    pub fn build(self, credentials: &Credentials) -> Result<ApiRequest, StashError> {
        let mut url = self.base_url;
        if url.cannot_be_a_base() {
            return Err(StashError::InvalidUrl {
                url: url.to_string(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            });
        }
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(self.path.split('/').filter(|segment| !segment.is_empty()));
        }

        if !self.query.is_empty() || !self.flags.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
            for key in &self.flags {
                pairs.append_key_only(key);
            }
        }

        let body = self.body.transpose().map_err(StashError::Encode)?;

        let mut headers = HeaderMap::new();
        if !self.raw {
            headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        }
        if body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        }
        if let Some(auth) = credentials.authorization_header() {
            let mut value = HeaderValue::from_str(&auth)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(ApiRequest {
            method: self.method,
            url,
            headers,
            body,
        })
    }
}
