//
//  stash-client
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Loads client settings from a TOML file stored in the platform-specific
//! configuration directory. Every key is optional; missing keys take the
//! library defaults.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/stash/config.toml`
//! - **macOS**: `~/Library/Application Support/stash/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\stash\config\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! base_url = "https://stash.example.com"
//! username = "admin"
//! password = "secret"
//! page_limit = 25
//!
//! [transport]
//! timeout = 10
//! accept_invalid_certs = false
//!
//! [retry]
//! max_attempts = 3
//! interval = 3
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stash_client::config::ClientConfig;
//! use stash_client::StashClient;
//!
//! let config = ClientConfig::load()?;
//! let client = StashClient::from_config(&config)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::common::DEFAULT_PAGE_LIMIT;
use crate::api::{RetryPolicy, TransportConfig};
use crate::auth::Credentials;
use crate::APP_NAME;

/// Settings for one Stash server.
///
/// # Example
///
/// ```rust
/// use stash_client::config::ClientConfig;
///
/// let config: ClientConfig = toml::from_str(r#"base_url = "https://stash.example.com""#)?;
/// assert_eq!(config.page_limit, 25);
/// assert_eq!(config.retry.max_attempts, 3);
/// assert!(config.credentials().is_anonymous());
/// # Ok::<(), toml::de::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server root, including any context path.
    #[serde(default)]
    pub base_url: String,

    /// Basic auth username. Empty together with `password` means anonymous.
    #[serde(default)]
    pub username: String,

    /// Basic auth password.
    #[serde(default)]
    pub password: String,

    /// Items requested per page from collection endpoints.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// HTTP client settings.
    #[serde(default)]
    pub transport: TransportConfig,

    /// Retry settings applied to every request.
    #[serde(default)]
    pub retry: RetryPolicy,
}

fn default_page_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            username: String::new(),
            password: String::new(),
            page_limit: DEFAULT_PAGE_LIMIT,
            transport: TransportConfig::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Loads the configuration from the default location.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Loads the configuration from `path`. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Writes the configuration to `path`, creating parent directories.
    ///
    /// The file holds the password in plain text, so on Unix it is only
    /// readable by its owner (`0o600`).
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(path)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;

        // mode() only applies on creation
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = file.metadata()?.permissions();
            perms.set_mode(0o600);
            file.set_permissions(perms)?;
        }

        file.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Path of the default configuration file.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// The configured credentials.
    pub fn credentials(&self) -> Credentials {
        Credentials::basic(self.username.clone(), self.password.clone())
    }
}
