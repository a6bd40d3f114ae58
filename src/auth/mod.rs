//
//  stash-client
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Stash accepts HTTP Basic authentication on every REST endpoint. A client
//! holds one [`Credentials`] pair for its whole lifetime and stamps the
//! resulting `Authorization` header onto every request.
//!
//! ## Anonymous Access
//!
//! When both the username and the password are empty no header is sent at
//! all, which lets public repositories be read without an account.
//!
//! ## Example
//!
//! ```rust
//! use stash_client::auth::Credentials;
//!
//! let credentials = Credentials::basic("u", "p");
//! assert_eq!(credentials.authorization_header().as_deref(), Some("Basic dTpw"));
//!
//! assert_eq!(Credentials::anonymous().authorization_header(), None);
//! ```

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};

/// Username/password pair used for HTTP Basic authentication.
///
/// The password is never printed by the `Debug` implementation.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates Basic credentials.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Credentials that send no `Authorization` header.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// The configured username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns `true` when both username and password are empty.
    pub fn is_anonymous(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }

    /// Computes the `Authorization` header value.
    ///
    /// Returns `Basic base64(username:password)`, or `None` for anonymous
    /// credentials. A username with an empty password (or the reverse) still
    /// produces a header.
    pub fn authorization_header(&self) -> Option<String> {
        if self.is_anonymous() {
            return None;
        }
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        Some(format!("Basic {}", token))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
