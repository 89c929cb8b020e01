use std::path::{Path, PathBuf};

use compact_str::CompactString;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::{
    client::{ClientConfig, MergeRequestScope},
    result::{Result, ToolsError},
};

/// Environment variable holding the private token
pub const TOKEN_ENV: &str = "GITLAB_TOOLS_TOKEN";
/// Environment variable holding the API base URL
pub const BASE_URL_ENV: &str = "GITLAB_TOOLS_BASE_URL";

/// Contents of the optional configuration file
#[derive(Default, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ToolsConfig {
    /// The URL of the GitLab API, e.g. https://gitlab.com/api/v4
    pub gitlab_url: Option<String>,
    /// The Personal Access Token to authenticate with GitLab
    pub gitlab_token: Option<String>,
    /// Group used when none is passed on the command line
    pub group: Option<String>,
    pub merge_request_scope: Option<MergeRequestScope>,
    pub log_level: Option<String>,
}

/// Values given on the command line or through the environment
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub token: Option<String>,
    pub base_url: Option<String>,
    pub group: Option<String>,
    pub merge_request_scope: Option<MergeRequestScope>,
}

/// Fully resolved parameters for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub token: CompactString,
    pub base_url: CompactString,
    pub group: CompactString,
    pub merge_request_scope: MergeRequestScope,
}

pub fn default_config_path() -> PathBuf {
    if let Some(dirs) = BaseDirs::new() {
        dirs.config_dir().join("gitlab-tools.toml")
    } else {
        PathBuf::from("gitlab-tools.toml")
    }
}

/// Read the configuration file, falling back to defaults when it does not exist.
pub fn load_config(config_file: &Path) -> Result<ToolsConfig> {
    if !config_file.exists() {
        return Ok(ToolsConfig::default());
    }

    confy::load_path(config_file).map_err(ToolsError::ConfigError)
}

impl Settings {
    /// Merge command line values over the configuration file. Blank values
    /// count as missing.
    pub fn resolve(overrides: Overrides, file: &ToolsConfig) -> Result<Self> {
        let token = pick("token", overrides.token, &file.gitlab_token)?;
        let base_url = pick("baseURL", overrides.base_url, &file.gitlab_url)?;
        let group = pick("group", overrides.group, &file.group)?;

        let merge_request_scope = overrides
            .merge_request_scope
            .or(file.merge_request_scope)
            .unwrap_or_default();

        Ok(Self { token, base_url, group, merge_request_scope })
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url.clone(), self.token.clone())
    }
}

fn pick(
    name: &'static str,
    preferred: Option<String>,
    fallback: &Option<String>,
) -> Result<CompactString> {
    preferred
        .as_deref()
        .into_iter()
        .chain(fallback.as_deref())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(CompactString::from)
        .ok_or(ToolsError::MissingParameter(name))
}
