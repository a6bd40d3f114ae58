//
//  stash-client
//  api/server/pullrequests.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Pull Request API
//!
//! Pull requests propose merging changes from a source branch into a target
//! branch of the same repository.
//!
//! ## API Endpoints
//!
//! ```text
//! GET  /rest/api/1.0/projects/{projectKey}/repos/{repoSlug}/pull-requests?state&start&limit
//! POST /rest/api/1.0/projects/{projectKey}/repos/{repoSlug}/pull-requests
//! ```
//!
//! ## Pull Request States
//!
//! | State | Description |
//! |-------|-------------|
//! | `OPEN` | Active and awaiting review/merge |
//! | `MERGED` | Merged into the target branch |
//! | `DECLINED` | Closed without merging |
//! | `ALL` | Filter value matching every state |
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
//! let pr = client.create_pull_request(
//!     "PROJ",
//!     "app",
//!     "Add retry support",
//!     "Retries transient failures.",
//!     "feature/retry",
//!     "develop",
//!     &["bob", "bill"],
//! )?;
//! println!("opened #{}", pr.id);
//!
//! for pr in client.get_pull_requests("PROJ", "app", "OPEN")? {
//!     println!("#{} {} ({} -> {})", pr.id, pr.title, pr.from_ref.display_id, pr.to_ref.display_id);
//! }
//! # Ok::<(), stash_client::StashError>(())
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{repo_path, Repository, API_ROOT};
use crate::api::common::{ReasonTable, StashError, LIST_REASONS};
use crate::api::StashClient;

/// Reasons reported by `POST .../pull-requests`.
const CREATE_REASONS: ReasonTable = &[
    (400, "The pull request was not created due to a validation error."),
    (401, "The currently authenticated user has insufficient permissions to create a pull request."),
    (404, "The repository or one of the branches was not found."),
    (409, "A pull request between these branches already exists."),
];

/// A pull request as returned by the Stash REST API.
///
/// Timestamps are Unix milliseconds; use [`created_at`](Self::created_at) and
/// [`updated_at`](Self::updated_at) for `chrono` values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// Pull request number, unique within the repository.
    pub id: u64,

    /// Optimistic-locking version, bumped on every update.
    #[serde(default)]
    pub version: u64,

    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    /// "OPEN", "MERGED" or "DECLINED".
    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub open: bool,

    #[serde(default)]
    pub closed: bool,

    #[serde(rename = "createdDate", default)]
    pub created_date: i64,

    #[serde(rename = "updatedDate", default)]
    pub updated_date: i64,

    /// Source branch.
    #[serde(rename = "fromRef")]
    pub from_ref: PrRef,

    /// Target branch.
    #[serde(rename = "toRef")]
    pub to_ref: PrRef,

    #[serde(default)]
    pub author: Option<PrParticipant>,

    #[serde(default)]
    pub reviewers: Vec<PrParticipant>,

    #[serde(default)]
    pub participants: Vec<PrParticipant>,
}

impl PullRequest {
    /// Creation time, if the server sent a valid timestamp.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created_date)
    }

    /// Last update time, if the server sent a valid timestamp.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.updated_date)
    }
}

/// A branch reference on either side of a pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrRef {
    /// Fully qualified ref, e.g. "refs/heads/develop".
    #[serde(default)]
    pub id: String,

    /// Short name, e.g. "develop".
    #[serde(rename = "displayId")]
    pub display_id: String,

    #[serde(rename = "latestChangeset", default)]
    pub latest_changeset: Option<String>,

    #[serde(default)]
    pub repository: Option<Repository>,
}

/// An author, reviewer or participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrParticipant {
    pub user: User,

    /// "AUTHOR", "REVIEWER" or "PARTICIPANT".
    #[serde(default)]
    pub role: String,

    #[serde(default)]
    pub approved: bool,
}

/// A Stash user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Login name.
    pub name: String,

    #[serde(default)]
    pub id: Option<u64>,

    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,

    #[serde(rename = "emailAddress", default)]
    pub email_address: Option<String>,

    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub active: bool,
}

/// Request body for opening a pull request.
///
/// Field order matches the JSON the server documents:
///
/// ```json
/// {
///   "title": "...",
///   "description": "...",
///   "fromRef": {"id": "feature/x", "repository": {"slug": "app", "project": {"key": "PROJ"}}},
///   "toRef": {"id": "develop", "repository": {"slug": "app", "project": {"key": "PROJ"}}},
///   "reviewers": [{"user": {"name": "bob"}}]
/// }
/// ```
#[derive(Debug, Serialize)]
struct CreatePullRequestRequest<'a> {
    title: &'a str,
    description: &'a str,
    #[serde(rename = "fromRef")]
    from_ref: RefSpec<'a>,
    #[serde(rename = "toRef")]
    to_ref: RefSpec<'a>,
    reviewers: Vec<ReviewerSpec<'a>>,
}

#[derive(Debug, Serialize)]
struct RefSpec<'a> {
    id: &'a str,
    repository: RepositorySpec<'a>,
}

#[derive(Debug, Serialize)]
struct RepositorySpec<'a> {
    slug: &'a str,
    project: ProjectSpec<'a>,
}

#[derive(Debug, Serialize)]
struct ProjectSpec<'a> {
    key: &'a str,
}

#[derive(Debug, Serialize)]
struct ReviewerSpec<'a> {
    user: UserName<'a>,
}

#[derive(Debug, Serialize)]
struct UserName<'a> {
    name: &'a str,
}

impl<'a> RefSpec<'a> {
    fn new(branch: &'a str, project: &'a str, slug: &'a str) -> Self {
        Self {
            id: branch,
            repository: RepositorySpec {
                slug,
                project: ProjectSpec { key: project },
            },
        }
    }
}

impl StashClient {
    /// Lists the pull requests of a repository in `state`, in server order.
    ///
    /// # Errors
    ///
    /// A 400 (for example an unknown state) is reported as "Bad request.".
    pub fn get_pull_requests(&self, project: &str, slug: &str, state: &str) -> Result<Vec<PullRequest>, StashError> {
        let path = format!("{}/pull-requests", repo_path(API_ROOT, project, slug));
        tracing::debug!("Listing {} pull requests of {}/{}", state, project, slug);
        self.get_all(&path, &[("state", state)], LIST_REASONS, "pull requests")
    }

    /// Opens a pull request from `from_branch` into `to_branch`.
    ///
    /// Branch names are sent as given; the server resolves short names.
    #[allow(clippy::too_many_arguments)]
    pub fn create_pull_request(
        &self,
        project: &str,
        slug: &str,
        title: &str,
        description: &str,
        from_branch: &str,
        to_branch: &str,
        reviewers: &[&str],
    ) -> Result<PullRequest, StashError> {
        let path = format!("{}/pull-requests", repo_path(API_ROOT, project, slug));
        tracing::debug!(
            "Opening pull request {} -> {} on {}/{}",
            from_branch,
            to_branch,
            project,
            slug
        );

        let body = CreatePullRequestRequest {
            title,
            description,
            from_ref: RefSpec::new(from_branch, project, slug),
            to_ref: RefSpec::new(to_branch, project, slug),
            reviewers: reviewers
                .iter()
                .map(|&name| ReviewerSpec {
                    user: UserName { name },
                })
                .collect(),
        };

        self.post_json(&path, &body, 201, CREATE_REASONS, "pull request")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::testing::{client, ScriptedTransport};

    const CREATED: &str = r#"{
        "id": 2,
        "version": 0,
        "title": "a title",
        "description": "a description",
        "state": "OPEN",
        "open": true,
        "closed": false,
        "createdDate": 1435759062673,
        "updatedDate": 1435759062673,
        "fromRef": {"id": "refs/heads/feature/file1", "displayId": "feature/file1"},
        "toRef": {
            "id": "refs/heads/develop",
            "displayId": "develop",
            "repository": {"id": 1419, "slug": "test-repo", "name": "test-repo", "project": {"key": "PLAT"}}
        },
        "author": {"user": {"name": "mike", "id": 877, "displayName": "Mike"}, "role": "AUTHOR"},
        "reviewers": [
            {"user": {"name": "bob"}, "role": "REVIEWER"},
            {"user": {"name": "bill"}, "role": "REVIEWER"}
        ],
        "participants": []
    }"#;

    #[test]
    fn test_create_pull_request_body() {
        let transport = ScriptedTransport::new();
        transport.respond(201, CREATED);

        let pr = client(&transport)
            .create_pull_request(
                "proj",
                "bar",
                "a title",
                "a description",
                "feature/file1",
                "develop",
                &["bob", "bill"],
            )
            .unwrap();

        assert_eq!(pr.id, 2);
        assert!(pr.open);
        assert_eq!(pr.from_ref.display_id, "feature/file1");
        assert_eq!(pr.to_ref.repository.unwrap().project.key, "PLAT");
        assert_eq!(pr.reviewers.len(), 2);

        let request = &transport.requests()[0];
        assert_eq!(request.url.path(), "/rest/api/1.0/projects/proj/repos/bar/pull-requests");
        assert_eq!(
            String::from_utf8(request.body.clone().unwrap()).unwrap(),
            r#"{"title":"a title","description":"a description","fromRef":{"id":"feature/file1","repository":{"slug":"bar","project":{"key":"proj"}}},"toRef":{"id":"develop","repository":{"slug":"bar","project":{"key":"proj"}}},"reviewers":[{"user":{"name":"bob"}},{"user":{"name":"bill"}}]}"#
        );
    }

    #[test]
    fn test_timestamps() {
        let pr: PullRequest = serde_json::from_str(CREATED).unwrap();
        let created = pr.created_at().unwrap();
        assert_eq!(created.timestamp_millis(), 1435759062673);
        assert_eq!(created.format("%Y-%m-%d").to_string(), "2015-07-01");
        assert_eq!(pr.updated_at(), Some(created));
    }

    #[test]
    fn test_get_pull_requests_preserves_order() {
        let transport = ScriptedTransport::new();
        transport
            .respond(
                200,
                r#"{"isLastPage":false,"nextPageStart":2,"values":[
                    {"id":9,"title":"nine","fromRef":{"displayId":"a"},"toRef":{"displayId":"b"}},
                    {"id":3,"title":"three","fromRef":{"displayId":"a"},"toRef":{"displayId":"b"}}
                ]}"#,
            )
            .respond(
                200,
                r#"{"isLastPage":true,"values":[
                    {"id":5,"title":"five","fromRef":{"displayId":"a"},"toRef":{"displayId":"b"}}
                ]}"#,
            );

        let prs = client(&transport).get_pull_requests("PROJ", "slug", "OPEN").unwrap();

        assert_eq!(prs.iter().map(|pr| pr.id).collect::<Vec<_>>(), vec![9, 3, 5]);
        let requests = transport.requests();
        assert_eq!(requests[0].url.query(), Some("state=OPEN&start=0&limit=25"));
        assert_eq!(requests[1].url.query(), Some("state=OPEN&start=2&limit=25"));
    }

    #[test]
    fn test_get_pull_requests_bad_request() {
        let transport = ScriptedTransport::new();
        transport.respond(400, "").respond(400, "").respond(400, "");

        let err = client(&transport)
            .get_pull_requests("PROJ", "slug", "BOGUS")
            .unwrap_err();
        assert_eq!(err.to_string(), "Bad request. (400)");
    }
}
