//
//  stash-client
//  api/server/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Stash REST API Resources
//!
//! Resource types and the [`StashClient`](super::StashClient) operations that
//! fetch or mutate them. Every operation here only selects a path, a method,
//! an optional body and a success code with its reason table; building,
//! retrying, classifying and paging is shared plumbing in the parent module.
//!
//! ## Module Organization
//!
//! - [`repositories`] - List, fetch and create repositories
//! - [`branches`] - List and delete branches
//! - [`tags`] - List tags
//! - [`restrictions`] - Branch restrictions and effective branch permissions
//! - [`pullrequests`] - List and open pull requests
//! - [`files`] - Raw file contents at a branch
//!
//! ## Endpoint Roots
//!
//! | Root | Used by |
//! |------|---------|
//! | `/rest/api/1.0` | repositories, branches, tags, pull requests |
//! | `/rest/branch-permissions/1.0` | restrictions, permissions |
//! | `/rest/branch-utils/1.0` | branch deletion |
//! | `/projects/...` (web UI) | raw file contents |
//!
//! ## Notes
//!
//! - All types implement `Debug`, `Clone`, `Serialize`, and `Deserialize`
//! - Optional fields use `Option<T>` and default to `None` during deserialization
//! - Boolean fields default to `false` when not present in the API response

pub mod branches;
pub mod files;
pub mod pullrequests;
pub mod repositories;
pub mod restrictions;
pub mod tags;

pub use branches::Branch;
pub use pullrequests::{PrParticipant, PrRef, PullRequest, User};
pub use repositories::{has_repository, CloneLink, ProjectRef, Repository, RepositoryLinks};
pub use restrictions::{BranchPermission, BranchRestriction, BranchRestrictions};
pub use tags::Tag;

/// Core REST API root.
pub(crate) const API_ROOT: &str = "/rest/api/1.0";

/// Branch permissions plugin root.
pub(crate) const BRANCH_PERMISSIONS_ROOT: &str = "/rest/branch-permissions/1.0";

/// Branch utilities plugin root.
pub(crate) const BRANCH_UTILS_ROOT: &str = "/rest/branch-utils/1.0";

/// Builds `{root}/projects/{project}/repos/{slug}`.
pub(crate) fn repo_path(root: &str, project: &str, slug: &str) -> String {
    format!("{}/projects/{}/repos/{}", root, project, slug)
}

/// Expands a short branch name to its fully qualified ref.
///
/// Names already starting with `refs/` are returned unchanged.
pub(crate) fn branch_ref(branch: &str) -> String {
    if branch.starts_with("refs/") {
        branch.to_string()
    } else {
        format!("refs/heads/{}", branch)
    }
}
