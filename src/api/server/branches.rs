//
//  stash-client
//  api/server/branches.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Branch API
//!
//! ```text
//! GET    /rest/api/1.0/projects/{projectKey}/repos/{repoSlug}/branches?start&limit
//! DELETE /rest/branch-utils/1.0/projects/{projectKey}/repos/{repoSlug}/branches
//! ```
//!
//! Branches are returned keyed by their display id ("develop",
//! "feature/PRJ-447"), not by the fully qualified ref.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{branch_ref, repo_path, API_ROOT, BRANCH_UTILS_ROOT};
use crate::api::common::{StashError, READ_REASONS};
use crate::api::StashClient;

/// A branch in a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Fully qualified ref, e.g. "refs/heads/develop".
    pub id: String,

    /// Short name, e.g. "develop".
    #[serde(rename = "displayId")]
    pub display_id: String,

    /// Hash of the commit at the tip of the branch.
    #[serde(rename = "latestChangeset", default)]
    pub latest_changeset: Option<String>,

    /// Whether this is the repository's default branch.
    #[serde(rename = "isDefault", default)]
    pub is_default: bool,
}

#[derive(Debug, Serialize)]
struct DeleteBranchRequest {
    name: String,

    #[serde(rename = "dryRun")]
    dry_run: bool,
}

impl StashClient {
    /// Lists every branch of a repository, keyed by display id.
    ///
    /// # Errors
    ///
    /// Classified 404 when the repository does not exist, 401 when the
    /// caller may not read it. A failure on any page fails the whole call.
    pub fn get_branches(&self, project: &str, slug: &str) -> Result<HashMap<String, Branch>, StashError> {
        let path = format!("{}/branches", repo_path(API_ROOT, project, slug));
        tracing::debug!("Listing branches of {}/{}", project, slug);
        self.get_all_keyed(&path, &[], READ_REASONS, "branches", |branch: &Branch| {
            branch.display_id.clone()
        })
    }

    /// Deletes `branch` (short name or full ref) from a repository.
    ///
    /// # Errors
    ///
    /// Any status other than 204 is returned as a classified error.
    pub fn delete_branch(&self, project: &str, slug: &str, branch: &str) -> Result<(), StashError> {
        let path = format!("{}/branches", repo_path(BRANCH_UTILS_ROOT, project, slug));
        tracing::debug!("Deleting branch {} of {}/{}", branch, project, slug);
        let body = DeleteBranchRequest {
            name: branch_ref(branch),
            dry_run: false,
        };
        let request = self.request(reqwest::Method::DELETE, &path).json(&body);
        self.execute(request, 204, READ_REASONS).map(|_| ())
    }
}
