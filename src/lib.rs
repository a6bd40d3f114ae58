//
//  stash-client
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Stash Client Library
//!
//! A blocking client for the Atlassian Stash (Bitbucket Server) REST API,
//! plus the `stash` command-line tool built on it.
//!
//! ## Overview
//!
//! Every operation follows the same path: build a request with Basic auth,
//! send it through a bounded fixed-interval retry, classify the status
//! against the operation's success code, then decode the body. Collection
//! endpoints are walked page by page and merged into a single result that is
//! only returned if every page succeeded.
//!
//! ## Features
//!
//! - **Repositories**: list, fetch, create, look up by clone URL
//! - **Branches and Tags**: list, delete branches
//! - **Branch Restrictions**: list, create, delete, effective permissions
//! - **Pull Requests**: list by state, open with reviewers
//! - **Raw Files**: fetch file contents at a branch
//!
//! ## Module Structure
//!
//! - [`api`]: Request building, transport, retry, classification, resources
//! - [`auth`]: Basic auth credentials
//! - [`config`]: Configuration file management
//! - [`cli`]: Command-line interface definitions using clap
//! - [`output`]: JSON and raw output for the binary
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use stash_client::{is_not_found, Credentials, StashClient};
//! use stash_client::api::TransportConfig;
//!
//! let client = StashClient::new("https://stash.example.com", &TransportConfig::default())?
//!     .with_credentials(Credentials::basic("admin", "secret"));
//!
//! match client.get_repository("PROJ", "app") {
//!     Ok(repo) => println!("{} ({:?})", repo.name, repo.ssh_url()),
//!     Err(e) if is_not_found(Some(&e)) => println!("no such repository"),
//!     Err(e) => return Err(e),
//! }
//! # Ok::<(), stash_client::StashError>(())
//! ```

/// Stash REST API client.
///
/// The client handles authentication, retries, response classification,
/// pagination and decoding.
pub mod api;

/// Basic auth credentials.
pub mod auth;

/// Command-line interface definitions.
pub mod cli;

/// Configuration file management.
///
/// Stored in platform-specific locations:
/// - Linux: `~/.config/stash/config.toml`
/// - macOS: `~/Library/Application Support/stash/config.toml`
/// - Windows: `%APPDATA%\stash\config\config.toml`
pub mod config;

/// Output formatting for the binary.
pub mod output;

pub use api::common::{is_conflict, is_not_found};
pub use api::{StashClient, StashError};
pub use auth::Credentials;
pub use cli::Cli;
pub use config::ClientConfig;

/// Application name, used for the binary and the config directory.
pub const APP_NAME: &str = "stash";

/// Library version, from Cargo.toml.
///
/// ```rust
/// use stash_client::VERSION;
///
/// println!("stash version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the `stash` binary.
///
/// # Exit Code Ranges
///
/// - `0`: Success
/// - `1-3`: General errors and usage issues
/// - `4-7`: Authentication-related issues
/// - `8-15`: Resource-related issues
///
/// # Example
///
/// ```rust,no_run
/// use stash_client::exit_codes;
/// use std::process;
///
/// process::exit(exit_codes::NOT_FOUND);
/// ```
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error. Check stderr for details.
    pub const ERROR: i32 = 1;

    /// Invalid usage or arguments.
    ///
    /// # Value
    ///
    /// `2`
    pub const USAGE: i32 = 2;

    /// The server rejected the credentials (401) or the caller lacks
    /// permission (403).
    ///
    /// # Value
    ///
    /// `4`
    pub const AUTH_ERROR: i32 = 4;

    /// The project, repository, branch or restriction does not exist.
    ///
    /// # Value
    ///
    /// `8`
    pub const NOT_FOUND: i32 = 8;

    /// The resource already exists, e.g. a repository with the same name.
    ///
    /// # Value
    ///
    /// `9`
    pub const CONFLICT: i32 = 9;
}
