//! Configuration management for GitLab client

use std::{fmt, path::PathBuf, str::FromStr};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Main configuration for GitLab client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// GitLab API base URL, e.g. `https://gitlab.com/api/v4`
    pub base_url: CompactString,
    /// Private access token
    pub private_token: CompactString,
    /// Debug configuration
    pub debug: DebugConfig,
}

/// Debug and logging configuration
#[derive(Debug, Clone)]
pub struct DebugConfig {
    /// Enable debug logging of HTTP responses
    pub log_responses: bool,
    /// Directory for storing debug logs
    pub log_directory: Option<PathBuf>,
}

/// Endpoint used to look up the merge requests of a milestone
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeRequestScope {
    /// `groups/:group_id/milestones/:milestone_id/merge_requests`
    #[default]
    Group,
    /// `merge_requests?state=all&milestone=:title`
    Global,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_responses: false,
            log_directory: Some(PathBuf::from("gitlab-tools-responses")),
        }
    }
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(
        base_url: impl Into<CompactString>,
        private_token: impl Into<CompactString>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            private_token: private_token.into(),
            debug: DebugConfig::default(),
        }
    }

    /// Set debug configuration
    pub fn with_debug(mut self, debug: DebugConfig) -> Self {
        self.debug = debug;
        self
    }

    /// Enable debug logging
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug.log_responses = enabled;
        self
    }
}

impl FromStr for MergeRequestScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "group" => Ok(Self::Group),
            "global" => Ok(Self::Global),
            other => Err(format!("unknown merge request scope '{other}', expected 'group' or 'global'")),
        }
    }
}

impl fmt::Display for MergeRequestScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group => f.write_str("group"),
            Self::Global => f.write_str("global"),
        }
    }
}
