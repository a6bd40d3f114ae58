//
//  stash-client
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides a blocking client for the Atlassian Stash (Bitbucket
//! Server) REST API.
//!
//! ## Architecture
//!
//! The API layer is organized as follows:
//!
//! - [`request`]: Builds outbound requests (headers, auth, query, body)
//! - [`transport`]: Executes one request; HTTP in production, fakes in tests
//! - [`retry`]: Bounded fixed-interval retry around one request
//! - [`common`]: Error taxonomy, response classification and pagination
//! - [`client`]: [`StashClient`], which composes the above
//! - [`server`]: Resource types and operations (repositories, branches, ...)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stash_client::api::{StashClient, TransportConfig};
//! use stash_client::auth::Credentials;
//! use stash_client::is_conflict;
//!
//! let client = StashClient::new("https://stash.example.com", &TransportConfig::default())?
//!     .with_credentials(Credentials::basic("admin", "secret"));
//!
//! match client.create_repository("PROJ", "app") {
//!     Ok(repo) => println!("created {}", repo.slug),
//!     Err(e) if is_conflict(Some(&e)) => println!("already exists"),
//!     Err(e) => return Err(e),
//! }
//! # Ok::<(), stash_client::StashError>(())
//! ```
//!
//! ## Error Handling
//!
//! API errors are returned as [`StashError`] variants:
//!
//! - `Transport`: no response at all (refused, timed out, TLS failure)
//! - `Http`: a status other than the operation's success code
//! - `Decode`: a successful status whose body did not parse
//!
//! Only `Transport` and `Http` are retried.

pub mod client;
pub mod common;
pub mod request;
pub mod retry;
pub mod server;
pub mod transport;

pub use client::StashClient;
pub use common::{ClassifiedError, DomainHint, StashError};
pub use request::{ApiRequest, RequestBuilder};
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, RawResponse, Transport, TransportConfig};
