//
//  stash-client
//  api/server/repositories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Repository API
//!
//! Repositories are the core unit of code storage in Stash and always belong
//! to exactly one project, identified by its key. Within a project a
//! repository is addressed by its slug.
//!
//! ## API Endpoints
//!
//! ```text
//! GET  /rest/api/1.0/repos?start&limit
//! GET  /rest/api/1.0/projects/{projectKey}/repos/{repoSlug}
//! POST /rest/api/1.0/projects/{projectKey}/repos
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use stash_client::api::{StashClient, TransportConfig};
//! use stash_client::api::server::has_repository;
//! use stash_client::auth::Credentials;
//!
//! let client = StashClient::new("https://stash.example.com", &TransportConfig::default())?
//!     .with_credentials(Credentials::basic("admin", "secret"));
//!
//! let repositories = client.get_repositories()?;
//! if let Some(repo) = has_repository(&repositories, "ssh://git@stash.example.com:7999/proj/app.git") {
//!     println!("already mirrored as {}/{}", repo.project.key, repo.slug);
//! }
//! # Ok::<(), stash_client::StashError>(())
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{repo_path, API_ROOT};
use crate::api::common::{ReasonTable, StashError, LIST_REASONS, READ_REASONS};
use crate::api::StashClient;

/// Reasons reported by `POST /projects/{projectKey}/repos`.
const CREATE_REASONS: ReasonTable = &[
    (400, "The repository was not created due to a validation error."),
    (
        401,
        "The currently authenticated user has insufficient permissions to create a repository.",
    ),
    (404, "The resource was not found.  Does the project key exist?"),
    (409, "A repository with same name already exists."),
];

/// A repository as returned by the Stash REST API.
///
/// # Example
///
/// ```rust
/// use stash_client::api::server::Repository;
///
/// let repo: Repository = serde_json::from_str(r#"{
///     "id": 300,
///     "name": "apa",
///     "slug": "apa",
///     "scmId": "git",
///     "project": {"key": "TEAMP"},
///     "links": {"clone": [{"href": "ssh://git@example.com:9999/teamp/apa.git", "name": "ssh"}]}
/// }"#).unwrap();
///
/// assert_eq!(repo.ssh_url(), Some("ssh://git@example.com:9999/teamp/apa.git"));
/// assert_eq!(repo.http_url(), None);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    /// Unique numeric identifier assigned by Stash.
    pub id: u64,

    /// Human-readable display name.
    pub name: String,

    /// URL-safe identifier used in API paths and clone URLs.
    pub slug: String,

    /// The project that contains this repository.
    pub project: ProjectRef,

    /// Source control type (always "git" on current servers).
    #[serde(rename = "scmId", default)]
    pub scm_id: String,

    /// Current state, e.g. "AVAILABLE" or "INITIALISING".
    #[serde(default)]
    pub state: Option<String>,

    /// Additional context about the state.
    #[serde(rename = "statusMessage", default)]
    pub status_message: Option<String>,

    /// Whether the repository allows forking.
    #[serde(default)]
    pub forkable: bool,

    /// Whether the repository is publicly readable.
    #[serde(rename = "public", default)]
    pub is_public: bool,

    /// Clone and web links.
    #[serde(default)]
    pub links: RepositoryLinks,
}

impl Repository {
    /// Clone URL for the link named `name`, if present.
    pub fn clone_url(&self, name: &str) -> Option<&str> {
        self.links
            .clone
            .iter()
            .find(|link| link.name == name)
            .map(|link| link.href.as_str())
    }

    /// SSH clone URL, if the server advertises one.
    pub fn ssh_url(&self) -> Option<&str> {
        self.clone_url("ssh")
    }

    /// HTTP(S) clone URL, if the server advertises one.
    pub fn http_url(&self) -> Option<&str> {
        self.clone_url("http")
    }
}

/// Project fields embedded in a repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectRef {
    /// Short uppercase key used in URLs, e.g. "PROJ".
    pub key: String,

    #[serde(default)]
    pub id: Option<u64>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "public", default)]
    pub is_public: bool,
}

/// Links associated with a repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryLinks {
    /// Clone URLs, typically one "ssh" and one "http" entry.
    #[serde(default)]
    pub clone: Vec<CloneLink>,

    /// Web UI links.
    #[serde(default, rename = "self")]
    pub self_link: Vec<SelfLink>,
}

/// A clone URL for one protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloneLink {
    /// Full clone URL, e.g. "ssh://git@stash.example.com:7999/proj/repo.git".
    pub href: String,

    /// Protocol identifier: "ssh" or "http".
    pub name: String,
}

/// A web UI link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfLink {
    pub href: String,
}

/// Request body for creating a repository.
#[derive(Debug, Clone, Serialize)]
struct CreateRepositoryRequest<'a> {
    name: &'a str,

    #[serde(rename = "scmId")]
    scm_id: &'a str,
}

/// Looks up a repository by any of its clone URLs.
///
/// Returns the first repository that advertises `clone_url` under any
/// protocol, or `None`.
pub fn has_repository<'a>(
    repositories: &'a HashMap<u64, Repository>,
    clone_url: &str,
) -> Option<&'a Repository> {
    repositories
        .values()
        .find(|repo| repo.links.clone.iter().any(|link| link.href == clone_url))
}

impl StashClient {
    /// Lists every repository visible to the caller, keyed by id.
    ///
    /// Pages are requested until the server reports the last one. If any page
    /// fails the whole call fails and no partial result is returned.
    ///
    /// # Errors
    ///
    /// A 400 is reported as "Bad request."; other non-200 statuses as
    /// "unhandled reason".
    pub fn get_repositories(&self) -> Result<HashMap<u64, Repository>, StashError> {
        let path = format!("{}/repos", API_ROOT);
        tracing::debug!("Listing repositories at {}", path);
        self.get_all_keyed(&path, &[], LIST_REASONS, "repositories", |repo: &Repository| {
            repo.id
        })
    }

    /// Fetches one repository.
    ///
    /// # Errors
    ///
    /// Classified 404 when the project or repository does not exist, 401 when
    /// the caller may not read it.
    pub fn get_repository(&self, project: &str, slug: &str) -> Result<Repository, StashError> {
        let path = repo_path(API_ROOT, project, slug);
        tracing::debug!("Fetching repository {}/{}", project, slug);
        self.get_json(&path, READ_REASONS, "repository")
    }

    /// Creates a git repository named `name` in `project`.
    ///
    /// # Errors
    ///
    /// Classified 400 (validation), 401 (permissions), 404 (no such project)
    /// or 409 (name taken). Use [`is_conflict`](crate::is_conflict) to treat
    /// an existing repository as success.
    pub fn create_repository(&self, project: &str, name: &str) -> Result<Repository, StashError> {
        let path = format!("{}/projects/{}/repos", API_ROOT, project);
        tracing::debug!("Creating repository {} in {}", name, project);
        let body = CreateRepositoryRequest { name, scm_id: "git" };
        self.post_json(&path, &body, 201, CREATE_REASONS, "repository")
    }
}
