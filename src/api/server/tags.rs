//
//  stash-client
//  api/server/tags.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Tag listing: `GET /rest/api/1.0/projects/{projectKey}/repos/{repoSlug}/tags`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{repo_path, API_ROOT};
use crate::api::common::{StashError, READ_REASONS};
use crate::api::StashClient;

/// A tag in a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Fully qualified ref, e.g. "refs/tags/acme-release-99.8".
    pub id: String,

    /// Short name, e.g. "acme-release-99.8".
    #[serde(rename = "displayId")]
    pub display_id: String,

    /// Hash of the tag object (annotated tags only).
    #[serde(default)]
    pub hash: Option<String>,

    /// Hash of the tagged commit.
    #[serde(rename = "latestChangeset", default)]
    pub latest_changeset: Option<String>,
}

impl StashClient {
    /// Lists every tag of a repository, keyed by display id.
    pub fn get_tags(&self, project: &str, slug: &str) -> Result<HashMap<String, Tag>, StashError> {
        let path = format!("{}/tags", repo_path(API_ROOT, project, slug));
        tracing::debug!("Listing tags of {}/{}", project, slug);
        self.get_all_keyed(&path, &[], READ_REASONS, "tags", |tag: &Tag| tag.display_id.clone())
    }
}
