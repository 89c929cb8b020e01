//! Core HTTP client for GitLab API

use chrono::Local;
use compact_str::{format_compact, CompactString};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::{
    config::{ClientConfig, MergeRequestScope},
    error::{ClientError, Result},
};
use crate::{
    domain::{MergeRequest, Milestone},
    id::GroupId,
};

const PRIVATE_TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Pure HTTP client for GitLab API
#[derive(Debug, Clone)]
pub struct GitlabApi {
    client: Client,
    config: ClientConfig,
}

/// GitLab API error response formats
#[derive(Debug, Deserialize)]
struct GitlabApiError {
    error: CompactString,
    error_description: Option<CompactString>,
}

#[derive(Debug, Deserialize)]
struct GitlabApiError2 {
    message: serde_json::Value,
}

impl GitlabApi {
    /// Create a new GitLab API client. The base URL and token are only
    /// checked once a request is made.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder().build().map_err(ClientError::Http)?;

        Ok(Self { client, config })
    }

    /// Get the active milestones of a group, by group id or full path
    #[instrument(skip(self))]
    pub async fn list_milestones(&self, group: &str) -> Result<Vec<Milestone>> {
        let url = self.active_milestones_url(group)?;
        let milestones: Vec<Milestone> = self.get_json(url).await?;

        debug!(milestone_count = milestones.len(), "Successfully fetched milestones");
        Ok(milestones)
    }

    /// Create a milestone in the given group from a draft's title and dates
    #[instrument(skip(self, milestone), fields(title = %milestone.title))]
    pub async fn create_milestone(&self, group_id: GroupId, milestone: &Milestone) -> Result<Milestone> {
        let url = self.group_milestones_url(group_id)?;

        let mut form = vec![("title", milestone.title.as_str())];
        if let Some(due_date) = &milestone.due_date {
            form.push(("due_date", due_date.as_str()));
        }
        if let Some(start_date) = &milestone.start_date {
            form.push(("start_date", start_date.as_str()));
        }

        let response = self
            .authenticated_request(Method::POST, url)
            .form(&form)
            .send()
            .await?;

        let created: Milestone = self
            .handle_response(response, &[StatusCode::OK, StatusCode::CREATED])
            .await?;

        debug!(milestone_id = %created.id, "Milestone created");
        Ok(created)
    }

    /// Get the merge requests attached to a milestone, scoped to its group
    #[instrument(skip(self, milestone), fields(group_id = %milestone.group_id, milestone_id = %milestone.id))]
    pub async fn list_merge_requests(&self, milestone: &Milestone) -> Result<Vec<MergeRequest>> {
        if !milestone.is_persisted() {
            return Err(ClientError::not_found(format!("milestone '{}'", milestone.title)));
        }

        let url = self.group_merge_requests_url(milestone)?;
        self.get_json(url).await
    }

    /// Get merge requests in any state whose milestone has the given title
    #[instrument(skip(self))]
    pub async fn list_merge_requests_by_title(&self, title: &str) -> Result<Vec<MergeRequest>> {
        let url = self.global_merge_requests_url(title)?;
        self.get_json(url).await
    }

    /// Get the merge requests of a milestone using the selected endpoint
    pub async fn merge_requests(
        &self,
        milestone: &Milestone,
        scope: MergeRequestScope,
    ) -> Result<Vec<MergeRequest>> {
        match scope {
            MergeRequestScope::Group => self.list_merge_requests(milestone).await,
            MergeRequestScope::Global => self.list_merge_requests_by_title(&milestone.title).await,
        }
    }

    /// Get current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // Private helper methods

    /// Perform authenticated GET request and deserialize JSON response
    async fn get_json<T>(&self, url: Url) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self.authenticated_request(Method::GET, url).send().await?;
        self.handle_response(response, &[StatusCode::OK]).await
    }

    /// Create authenticated request builder
    fn authenticated_request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(PRIVATE_TOKEN_HEADER, self.config.private_token.as_str())
    }

    /// Handle HTTP response and deserialize JSON
    async fn handle_response<T>(&self, response: Response, accepted: &[StatusCode]) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url_path = response.url().path().to_string();
        let status = response.status();
        let body = response.text().await?;

        debug!(status = status.as_u16(), path = %url_path, "Received response");

        if self.config.debug.log_responses {
            self.log_response_to_file(&url_path, &body);
        }

        if accepted.contains(&status) {
            serde_json::from_str(&body).map_err(|e| ClientError::json_parse(url_path, e))
        } else {
            Err(Self::error_from_response(status, &body))
        }
    }

    /// Turn a non-accepted response into an application error
    fn error_from_response(status: StatusCode, body: &str) -> ClientError {
        let message = if let Ok(api_error2) = serde_json::from_str::<GitlabApiError2>(body) {
            match api_error2.message {
                serde_json::Value::String(message) => CompactString::from(message),
                other => CompactString::from(other.to_string()),
            }
        } else if let Ok(api_error) = serde_json::from_str::<GitlabApiError>(body) {
            match api_error.error_description {
                Some(description) => format_compact!("{}: {}", api_error.error, description),
                None => api_error.error,
            }
        } else if body.trim().is_empty() {
            CompactString::from(status.canonical_reason().unwrap_or("unknown error"))
        } else {
            CompactString::from(body.trim())
        };

        ClientError::gitlab_api(status.as_u16(), message)
    }

    /// Join path segments onto the base URL, each segment percent-encoded
    fn endpoint_url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url> {
        let invalid = || ClientError::invalid_url(self.config.base_url.as_str());

        let mut url = Url::parse(&self.config.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }

    /// Build URL for listing the active milestones of a group
    fn active_milestones_url(&self, group: &str) -> Result<Url> {
        self.endpoint_url(&["groups", group, "milestones"], &[("state", "active")])
    }

    /// Build URL for creating a milestone in a group
    fn group_milestones_url(&self, group_id: GroupId) -> Result<Url> {
        self.endpoint_url(&["groups", &group_id.to_string(), "milestones"], &[])
    }

    /// Build URL for the group-scoped merge requests of a milestone
    fn group_merge_requests_url(&self, milestone: &Milestone) -> Result<Url> {
        let group_id = milestone.group_id.to_string();
        let milestone_id = milestone.id.to_string();

        self.endpoint_url(
            &["groups", &group_id, "milestones", &milestone_id, "merge_requests"],
            &[],
        )
    }

    /// Build URL for the title-filtered merge requests endpoint
    fn global_merge_requests_url(&self, title: &str) -> Result<Url> {
        self.endpoint_url(&["merge_requests"], &[("state", "all"), ("milestone", title)])
    }

    /// Log HTTP response to file for debugging
    fn log_response_to_file(&self, path: &str, body: &str) {
        if let Some(log_dir) = &self.config.debug.log_directory {
            if !log_dir.exists() {
                if let Err(e) = std::fs::create_dir_all(log_dir) {
                    warn!("Failed to create log directory: {}", e);
                    return;
                }
            }

            let filename = format!(
                "{}_{}.json",
                Local::now().format("%Y-%m-%d_%H-%M-%S%.3f"),
                path.replace('/', "_")
            );

            let log_path = log_dir.join(filename);

            if let Err(e) = std::fs::write(&log_path, body) {
                warn!("Failed to write response log to {:?}: {}", log_path, e);
            } else {
                debug!("Response logged to {:?}", log_path);
            }
        }
    }
}
