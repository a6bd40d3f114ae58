//
//  stash-client
//  api/server/restrictions.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Branch Restrictions
//!
//! Branch restrictions limit who may push to a branch. They are managed by the
//! branch permissions plugin, which lives under its own REST root.
//!
//! ## API Endpoints
//!
//! ```text
//! GET    /rest/branch-permissions/1.0/projects/{projectKey}/repos/{repoSlug}/restricted
//! POST   /rest/branch-permissions/1.0/projects/{projectKey}/repos/{repoSlug}/restricted
//! DELETE /rest/branch-permissions/1.0/projects/{projectKey}/repos/{repoSlug}/restricted/{id}
//! GET    /rest/branch-permissions/1.0/projects/{projectKey}/repos/{repoSlug}/permitted
//! ```
//!
//! ## Success Codes
//!
//! | Operation | Status |
//! |-----------|--------|
//! | list | 200 |
//! | create | 200 |
//! | delete | 204 |
//! | permitted | 200 |
//!
//! The plugin answers a successful create with 200, not 201.
//!
//! ## Example
//!
//! ```rust,no_run
//! use stash_client::api::{StashClient, TransportConfig};
//! use stash_client::auth::Credentials;
//!
//! let client = StashClient::new("https://stash.example.com", &TransportConfig::default())?
//!     .with_credentials(Credentials::basic("admin", "secret"));
//!
//! let restriction = client.create_branch_restriction("PROJ", "app", "develop", "release-bot")?;
//! println!("restriction {} on {}", restriction.id, restriction.value);
//!
//! client.delete_branch_restriction("PROJ", "app", restriction.id)?;
//! # Ok::<(), stash_client::StashError>(())
//! ```

use serde::{Deserialize, Serialize};

use super::{branch_ref, repo_path, Branch, BRANCH_PERMISSIONS_ROOT};
use crate::api::common::{ServerPaginatedResponse, StashError, READ_REASONS};
use crate::api::StashClient;

/// One branch restriction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchRestriction {
    /// Restriction id, used to delete it.
    pub id: u64,

    /// Matcher type, e.g. "BRANCH" or "PATTERN".
    #[serde(rename = "type", default)]
    pub restriction_type: String,

    /// Matched value, e.g. "refs/heads/develop".
    #[serde(default)]
    pub value: String,

    /// The restricted branch, when the matcher names one.
    #[serde(default)]
    pub branch: Option<Branch>,
}

/// The restrictions of a repository as a single envelope.
///
/// The plugin returns the envelope fields, but the list is fetched with a
/// single request and not paged.
pub type BranchRestrictions = ServerPaginatedResponse<BranchRestriction>;

/// Effective branch permission for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchPermission {
    #[serde(rename = "type", default)]
    pub permission_type: String,

    #[serde(rename = "matcherType", default)]
    pub matcher_type: String,

    #[serde(rename = "matcherId", default)]
    pub matcher_id: String,

    #[serde(default)]
    pub effective: bool,
}

#[derive(Debug, Serialize)]
struct CreateRestrictionRequest<'a> {
    #[serde(rename = "type")]
    restriction_type: &'a str,

    value: String,

    users: Vec<&'a str>,
}

impl StashClient {
    /// Fetches the branch restrictions of a repository.
    pub fn get_branch_restrictions(&self, project: &str, slug: &str) -> Result<BranchRestrictions, StashError> {
        let path = format!("{}/restricted", repo_path(BRANCH_PERMISSIONS_ROOT, project, slug));
        tracing::debug!("Fetching branch restrictions of {}/{}", project, slug);
        self.get_json(&path, READ_REASONS, "branch restrictions")
    }

    /// Restricts pushes to `branch` so that only `user` may write to it.
    ///
    /// # Errors
    ///
    /// Classified 404 when the repository does not exist, 401 when the
    /// caller may not administer it.
    pub fn create_branch_restriction(
        &self,
        project: &str,
        slug: &str,
        branch: &str,
        user: &str,
    ) -> Result<BranchRestriction, StashError> {
        let path = format!("{}/restricted", repo_path(BRANCH_PERMISSIONS_ROOT, project, slug));
        tracing::debug!("Restricting {} of {}/{} to {}", branch, project, slug, user);
        let body = CreateRestrictionRequest {
            restriction_type: "BRANCH",
            value: branch_ref(branch),
            users: vec![user],
        };
        self.post_json(&path, &body, 200, READ_REASONS, "branch restriction")
    }

    /// Removes the restriction with the given id.
    pub fn delete_branch_restriction(&self, project: &str, slug: &str, id: u64) -> Result<(), StashError> {
        let path = format!(
            "{}/restricted/{}",
            repo_path(BRANCH_PERMISSIONS_ROOT, project, slug),
            id
        );
        tracing::debug!("Deleting branch restriction {} of {}/{}", id, project, slug);
        self.execute(self.request(reqwest::Method::DELETE, &path), 204, READ_REASONS)
            .map(|_| ())
    }

    /// Fetches the effective branch permission of the caller.
    pub fn get_branch_permissions(&self, project: &str, slug: &str) -> Result<BranchPermission, StashError> {
        let path = format!("{}/permitted", repo_path(BRANCH_PERMISSIONS_ROOT, project, slug));
        self.get_json(&path, READ_REASONS, "branch permissions")
    }
}
