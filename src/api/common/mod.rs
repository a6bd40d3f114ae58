//
//  stash-client
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the Stash REST API
//!
//! This module provides the error taxonomy and the response classifier shared
//! by every resource operation, plus the pagination types re-exported from the
//! [`pagination`] submodule.
//!
//! # Overview
//!
//! - [`StashError`] - Unified error type for all API operations
//! - [`ClassifiedError`] - An HTTP status that did not match an operation's success code
//! - [`DomainHint`] - Coarse category attached to a classified error
//! - [`classify`] - Maps a received status onto `Ok(())` or a [`ClassifiedError`]
//! - [`is_conflict`] / [`is_not_found`] - Predicates usable on any error value
//!
//! # Example
//!
//! ```rust
//! use stash_client::api::common::{classify, is_conflict, ReasonTable};
//!
//! const CREATE: ReasonTable = &[(409, "A repository with same name already exists.")];
//!
//! let err = classify(409, 201, CREATE, b"").unwrap_err();
//! assert!(is_conflict(Some(&err)));
//! assert!(!is_conflict(None));
//! ```

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

mod pagination;

pub use pagination::*;

/// Reason used when a status code is missing from an operation's table.
pub const UNHANDLED_REASON: &str = "unhandled reason";

/// Per-operation table mapping specific status codes to human-readable reasons.
pub type ReasonTable = &'static [(u16, &'static str)];

/// Reasons shared by the plain read endpoints.
pub const READ_REASONS: ReasonTable = &[(404, "Not found"), (401, "Unauthorized")];

/// Reasons shared by the collection endpoints that only document a bad request.
pub const LIST_REASONS: ReasonTable = &[(400, "Bad request.")];

/// Coarse category attached to a [`ClassifiedError`].
///
/// | Hint | Status |
/// |------|--------|
/// | `BadRequest` | 400 |
/// | `Unauthorized` | 401 |
/// | `NotFound` | 404 |
/// | `Conflict` | 409 |
/// | `Unknown` | anything else, or a code absent from the reason table |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainHint {
    /// The resource does not exist.
    NotFound,
    /// The resource already exists.
    Conflict,
    /// Credentials are missing or lack permission.
    Unauthorized,
    /// The request failed validation.
    BadRequest,
    /// Not covered by the operation's reason table.
    Unknown,
}

impl DomainHint {
    fn for_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            404 => Self::NotFound,
            409 => Self::Conflict,
            _ => Self::Unknown,
        }
    }
}

/// A response whose status did not equal the operation's success code.
///
/// Created once per failed attempt and never mutated afterwards. The `reason`
/// comes from the operation's [`ReasonTable`]; `detail` carries the server's
/// own message when the body had one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    /// The HTTP status code actually received.
    pub status: u16,
    /// Human-readable reason from the operation's table.
    pub reason: String,
    /// Coarse category for predicate-based branching.
    pub hint: DomainHint,
    /// Message extracted from the error body, if any.
    pub detail: Option<String>,
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.reason, self.status)?;
        if let Some(detail) = &self.detail {
            write!(f, ": {}", detail)?;
        }
        Ok(())
    }
}

impl StdError for ClassifiedError {}

impl ClassifiedError {
    /// Returns `true` for a 409 Conflict.
    pub fn is_conflict(&self) -> bool {
        self.status == 409
    }

    /// Returns `true` for a 404 Not Found.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Unified error type for all Stash API operations.
///
/// # Variants
///
/// | Variant | Description | Retried |
/// |---------|-------------|---------|
/// | `Transport` | Connection refused, timeout, TLS failure | Yes |
/// | `Http` | Status did not match the success code | Yes |
/// | `Decode` | Successful status with a malformed body | No |
/// | `Encode` | Request body could not be serialized | No |
/// | `InvalidUrl` | Base URL did not parse or cannot carry a path | No |
/// | `InvalidHeader` | A header value contained illegal bytes | No |
/// | `Client` | The HTTP client could not be built | No |
/// | `StalledCursor` | A non-last page did not advance the cursor | No |
#[derive(Error, Debug)]
pub enum StashError {
    /// The request never produced a response.
    #[error("{method} {url} failed: {source}")]
    Transport {
        /// HTTP method of the failed request.
        method: String,
        /// Fully qualified request URL.
        url: String,
        /// Underlying transport failure.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The server answered with a status other than the expected one.
    #[error(transparent)]
    Http(#[from] ClassifiedError),

    /// The body of a successful response could not be decoded.
    #[error("failed to decode {what}: {source}")]
    Decode {
        /// What was being decoded (e.g. "repository page").
        what: &'static str,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The base URL and resource path did not form a valid URL.
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        /// The string that failed to parse.
        url: String,
        /// Underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// A header value could not be represented.
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// A page claimed more results without moving the cursor forward.
    #[error("pagination stalled at start={start}: next page start {next:?} does not advance")]
    StalledCursor {
        /// The `start` of the offending page.
        start: u32,
        /// The `nextPageStart` it reported.
        next: Option<u32>,
    },
}

impl StashError {
    /// Returns the classified status code, if this is an HTTP-level failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => Some(e.status),
            _ => None,
        }
    }

    /// Returns the domain hint, if this is an HTTP-level failure.
    pub fn hint(&self) -> Option<DomainHint> {
        match self {
            Self::Http(e) => Some(e.hint),
            _ => None,
        }
    }

    /// Returns `true` when the server answered 409 Conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_conflict())
    }

    /// Returns `true` when the server answered 404 Not Found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_not_found())
    }

    /// Returns `true` when another attempt may be made.
    ///
    /// Every transport and HTTP-level failure is retryable, including 404 and
    /// 401. Local failures (decode, encode, URL, header, cursor) are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Http(_))
    }
}

/// Classifies a received status against an operation's declared success code.
///
/// Returns `Ok(())` when `status == success`. Otherwise builds a
/// [`ClassifiedError`] whose reason comes from `reasons`; a code missing from
/// the table yields [`UNHANDLED_REASON`] with [`DomainHint::Unknown`].
pub fn classify(
    status: u16,
    success: u16,
    reasons: ReasonTable,
    body: &[u8],
) -> Result<(), ClassifiedError> {
    if status == success {
        return Ok(());
    }

    let (reason, hint) = match reasons.iter().find(|(code, _)| *code == status) {
        Some((_, reason)) => (reason.to_string(), DomainHint::for_status(status)),
        None => (UNHANDLED_REASON.to_string(), DomainHint::Unknown),
    };

    tracing::debug!("Classified status {} as {:?}: {}", status, hint, reason);

    Err(ClassifiedError {
        status,
        reason,
        hint,
        detail: server_message(body),
    })
}

/// Extracts a message from a Stash error body.
///
/// Stash returns errors in the format:
/// ```json
/// {"errors": [{"message": "Human readable message"}]}
/// ```
/// Some endpoints answer with a bare `{"message": "..."}` instead.
fn server_message(body: &[u8]) -> Option<String> {
    let json = serde_json::from_slice::<serde_json::Value>(body).ok()?;

    if let Some(message) = json
        .get("errors")
        .and_then(|e| e.as_array())
        .and_then(|arr| arr.first())
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
    {
        return Some(message.to_string());
    }

    json.get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

/// Returns the classified error carried directly by `err`.
///
/// Only a [`ClassifiedError`] or a [`StashError::Http`] qualifies. Source
/// chains are not followed, so a foreign error wrapping a 404 is not a 404.
fn classified<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a ClassifiedError> {
    if let Some(classified) = err.downcast_ref::<ClassifiedError>() {
        return Some(classified);
    }
    match err.downcast_ref::<StashError>() {
        Some(StashError::Http(classified)) => Some(classified),
        _ => None,
    }
}

/// Returns `true` if `err` is a classified 409 Conflict.
///
/// `None` and any other error value yield `false`, so callers can treat
/// "repository already exists" as ordinary control flow. Wrapping errors are
/// not unwrapped; callers holding an `anyhow::Error` should pass the
/// [`StashError`] they downcast out of it.
pub fn is_conflict(err: Option<&(dyn StdError + 'static)>) -> bool {
    err.and_then(classified).is_some_and(ClassifiedError::is_conflict)
}

/// Returns `true` if `err` is a classified 404 Not Found.
///
/// Same rules as [`is_conflict`].
pub fn is_not_found(err: Option<&(dyn StdError + 'static)>) -> bool {
    err.and_then(classified).is_some_and(ClassifiedError::is_not_found)
}
