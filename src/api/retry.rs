//
//  stash-client
//  api/retry.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Retry Executor
//!
//! Re-runs one unit of work a bounded number of times with a constant pause
//! between attempts. The pause blocks the calling thread.
//!
//! Any transport failure or classified HTTP error is retried, a 404 as eagerly
//! as a refused connection. Local failures (a body that will not decode, a URL
//! that will not parse) are returned immediately since another attempt cannot
//! change them.
//!
//! ```rust
//! use std::time::Duration;
//! use stash_client::api::RetryPolicy;
//!
//! let policy = RetryPolicy::new(3, Duration::ZERO);
//! let mut calls = 0;
//! let value = policy
//!     .run(|| {
//!         calls += 1;
//!         Ok::<_, stash_client::StashError>(calls)
//!     })
//!     .unwrap();
//! assert_eq!(value, 1);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::common::StashError;

/// Default maximum number of attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default pause between attempts.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(3);

/// Fixed-interval, bounded retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Values below 1 behave as 1.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Constant pause between attempts.
    #[serde(default = "default_interval", with = "duration_secs")]
    pub interval: Duration,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_interval() -> Duration {
    DEFAULT_RETRY_INTERVAL
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_RETRY_INTERVAL,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given attempt cap and interval.
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Runs `work` until it succeeds or the attempt cap is reached.
    ///
    /// Returns the first success immediately. When every attempt fails the
    /// last error is returned unchanged.
    pub fn run<T, F>(&self, mut work: F) -> Result<T, StashError>
    where
        F: FnMut() -> Result<T, StashError>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match work() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < attempts => {
                    tracing::warn!(
                        "Attempt {}/{} failed: {}; retrying in {:?}",
                        attempt,
                        attempts,
                        e,
                        self.interval
                    );
                    if !self.interval.is_zero() {
                        std::thread::sleep(self.interval);
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

pub(crate) mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
