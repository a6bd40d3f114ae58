//
//  stash-client
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination Types and Page Walking for Stash Collection Endpoints
//!
//! Stash uses offset-based pagination with `start` and `limit` query
//! parameters. Every collection response carries its own cursor:
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `start` | Offset of the first item in this page |
//! | `limit` | Page size that was applied |
//! | `isLastPage` | No further pages exist |
//! | `nextPageStart` | `start` value for the next request |
//!
//! # Walking a Collection
//!
//! [`collect_keyed`] and [`collect_vec`] drive a page-fetching closure from
//! `start=0` until a page reports `isLastPage`, merging every page's items
//! into one result. The closure performs exactly one page request (including
//! its retries); the walker owns only the cursor logic:
//!
//! ```rust
//! use stash_client::api::common::{collect_keyed, ServerPaginatedResponse};
//!
//! let pages = vec![
//!     r#"{"values":[1,2],"start":0,"limit":2,"isLastPage":false,"nextPageStart":2}"#,
//!     r#"{"values":[3],"start":2,"limit":2,"isLastPage":true}"#,
//! ];
//!
//! let all = collect_keyed(
//!     |start| {
//!         let idx = if start == 0 { 0 } else { 1 };
//!         Ok(serde_json::from_str::<ServerPaginatedResponse<u32>>(pages[idx]).unwrap())
//!     },
//!     |n| *n,
//! )
//! .unwrap();
//!
//! assert_eq!(all.len(), 3);
//! ```
//!
//! # Notes
//!
//! - The aggregated result is only returned once the last page arrives. A
//!   failure on any page discards everything fetched so far.
//! - Keys are assumed unique across the whole collection; the server
//!   guarantees it. A later page's item replaces an earlier one with the same
//!   key without complaint.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::StashError;

/// Default number of items requested per page.
pub const DEFAULT_PAGE_LIMIT: u32 = 25;

/// One page of a Stash collection response (the Collection Envelope).
///
/// # Example
///
/// ```rust
/// use stash_client::api::common::ServerPaginatedResponse;
///
/// let json = r#"{
///     "values": ["develop"],
///     "size": 1,
///     "limit": 25,
///     "isLastPage": false,
///     "nextPageStart": 25,
///     "start": 0
/// }"#;
///
/// let page: ServerPaginatedResponse<String> = serde_json::from_str(json).unwrap();
/// assert!(page.has_next());
/// assert_eq!(page.next_start(), Some(25));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerPaginatedResponse<T> {
    /// Items in the current page, in server order.
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,

    /// Number of items in the current page.
    #[serde(default)]
    pub size: u32,

    /// Page size that was applied.
    #[serde(default)]
    pub limit: u32,

    /// Whether this is the final page.
    #[serde(default, rename = "isLastPage")]
    pub is_last_page: bool,

    /// `start` value for the next request. Absent on the last page.
    #[serde(default, rename = "nextPageStart")]
    pub next_page_start: Option<u32>,

    /// Offset of the first item in this page.
    #[serde(default)]
    pub start: u32,
}

impl<T> ServerPaginatedResponse<T> {
    /// Returns `true` if more pages are available.
    pub fn has_next(&self) -> bool {
        !self.is_last_page
    }

    /// Returns the `start` value for the next request.
    pub fn next_start(&self) -> Option<u32> {
        self.next_page_start
    }
}

/// Walks every page of a collection, handing each item to `sink`.
///
/// `fetch_page` receives the `start` offset to request and returns the
/// decoded page. The walk begins at `start=0` and follows `nextPageStart`
/// until a page reports `isLastPage`. A page that is not last but whose
/// `nextPageStart` is missing or does not move past the current `start`
/// fails with [`StashError::StalledCursor`], so the same offset is never
/// requested twice.
pub fn walk_pages<T, F, S>(mut fetch_page: F, mut sink: S) -> Result<(), StashError>
where
    F: FnMut(u32) -> Result<ServerPaginatedResponse<T>, StashError>,
    S: FnMut(T),
{
    let mut start = 0;
    loop {
        let page = fetch_page(start)?;
        tracing::debug!(
            "Fetched page start={} with {} item(s), last={}",
            start,
            page.values.len(),
            page.is_last_page
        );

        let has_next = page.has_next();
        let next = page.next_start();
        page.values.into_iter().for_each(&mut sink);

        if !has_next {
            return Ok(());
        }

        start = match next {
            Some(n) if n > start => n,
            _ => return Err(StashError::StalledCursor { start, next }),
        };
    }
}

/// Collects every page into a map keyed by `key`.
///
/// Nothing is returned unless every page succeeds.
pub fn collect_keyed<T, K, F, KF>(fetch_page: F, key: KF) -> Result<HashMap<K, T>, StashError>
where
    K: Eq + Hash,
    F: FnMut(u32) -> Result<ServerPaginatedResponse<T>, StashError>,
    KF: Fn(&T) -> K,
{
    let mut all = HashMap::new();
    walk_pages(fetch_page, |item| {
        all.insert(key(&item), item);
    })?;
    Ok(all)
}

/// Collects every page into a vector, preserving server order.
pub fn collect_vec<T, F>(fetch_page: F) -> Result<Vec<T>, StashError>
where
    F: FnMut(u32) -> Result<ServerPaginatedResponse<T>, StashError>,
{
    let mut all = Vec::new();
    walk_pages(fetch_page, |item| all.push(item))?;
    Ok(all)
}
