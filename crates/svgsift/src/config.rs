//! Configuration types for the svgsift pipeline.
//!
//! All types implement [`serde::Deserialize`] so a host can load them from
//! any format; every section and field falls back to its default when
//! omitted.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration root.
//! - [`FetchConfig`] - Controls how external image references are fetched.
//!
//! # Example
//!
//! ```
//! # use svgsift::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.fetch().enforce_cors());
//! assert!(config.fetch().timeout().is_none());
//! ```

use std::time::Duration;

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Fetch configuration section.
    #[serde(default)]
    fetch: FetchConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified fetch configuration.
    pub fn new(fetch: FetchConfig) -> Self {
        Self { fetch }
    }

    /// Returns the fetch configuration.
    pub fn fetch(&self) -> &FetchConfig {
        &self.fetch
    }
}

/// Settings for resolving external image references.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Whether cross-origin responses must opt in via
    /// `Access-Control-Allow-Origin`.
    enforce_cors: bool,

    /// Client-level request timeout. No timeout when unset.
    timeout_secs: Option<u64>,

    /// Overrides the `User-Agent` header sent with each request.
    user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            enforce_cors: true,
            timeout_secs: None,
            user_agent: None,
        }
    }
}

impl FetchConfig {
    /// Creates a new [`FetchConfig`].
    ///
    /// # Arguments
    ///
    /// * `enforce_cors` - Reject cross-origin responses that do not allow the batch origin.
    /// * `timeout_secs` - Optional request timeout in seconds.
    pub fn new(enforce_cors: bool, timeout_secs: Option<u64>) -> Self {
        Self {
            enforce_cors,
            timeout_secs,
            user_agent: None,
        }
    }

    /// Sets the `User-Agent` header value.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn enforce_cors(&self) -> bool {
        self.enforce_cors
    }

    /// Returns the request timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }
}
