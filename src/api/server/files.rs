//
//  stash-client
//  api/server/files.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Raw file contents.
//!
//! Served by the web UI rather than the REST API:
//!
//! ```text
//! GET /projects/{projectkey}/repos/{reposlug}/browse/{path}?at={branch}&raw
//! ```
//!
//! The project key and slug are lowercased and no `Accept` header is sent,
//! since the body is the file itself. Each component of `path` is
//! percent-encoded, so `#` and `?` in file names reach the server intact.

use super::repo_path;
use crate::api::common::{StashError, READ_REASONS};
use crate::api::StashClient;

impl StashClient {
    /// Fetches the bytes of `path` at `branch`.
    ///
    /// The body is returned as-is; it is never decoded.
    ///
    /// # Errors
    ///
    /// Classified 404 when the file, branch or repository does not exist,
    /// 401 when the caller may not read it.
    pub fn get_raw_file(&self, project: &str, slug: &str, path: &str, branch: &str) -> Result<Vec<u8>, StashError> {
        let path = format!(
            "{}/browse/{}",
            repo_path("", &project.to_lowercase(), &slug.to_lowercase()),
            path.trim_start_matches('/')
        );
        tracing::debug!("Fetching raw file {} at {}", path, branch);
        let request = self
            .request(reqwest::Method::GET, &path)
            .query("at", branch)
            .flag("raw")
            .raw();
        self.execute(request, 200, READ_REASONS)
    }
}
