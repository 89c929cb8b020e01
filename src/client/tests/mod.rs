//! Test utilities and common test fixtures for client modules

use serde_json::json;

use crate::client::config::ClientConfig;


/// JSON representation of an active group milestone
pub fn milestone_json(id: u64, title: &str, due_date: &str) -> serde_json::Value {
    json!({
        "id": id,
        "iid": id % 100,
        "group_id": 5,
        "title": title,
        "description": format!("Milestone {title}"),
        "due_date": due_date,
        "start_date": "2023-12-01",
        "state": "active",
        "web_url": format!("https://gitlab.example.com/groups/acme/-/milestones/{}", id % 100)
    })
}

/// JSON list of two active milestones, `v1` and `v0`
pub fn milestones_json_response() -> serde_json::Value {
    json!([
        milestone_json(11, "v1", "2024-01-01"),
        milestone_json(10, "v0", "2023-12-01"),
    ])
}

/// JSON list of merge requests; the second one has no description
pub fn merge_requests_json_response() -> serde_json::Value {
    json!([
        {
            "id": 301,
            "iid": 12,
            "state": "opened",
            "title": "Add milestone report",
            "description": "Lists milestones per group",
            "web_url": "https://gitlab.example.com/acme/tools/-/merge_requests/12"
        },
        {
            "id": 302,
            "iid": 13,
            "state": "merged",
            "title": "Fix pagination"
        }
    ])
}

/// Create GitLab API error response
pub fn gitlab_error_response(message: &str) -> serde_json::Value {
    json!({
        "message": message
    })
}

/// Mock HTTP server for testing
pub struct MockServer {
    pub server: wiremock::MockServer,
}

impl MockServer {
    /// Start a new mock server
    pub async fn start() -> Self {
        let server = wiremock::MockServer::start().await;
        Self { server }
    }

    /// Get the base URL of the mock server
    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    /// Create a test config pointing to this mock server
    pub fn test_config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url(), "test-token")
    }
}

#[allow(clippy::module_inception)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures() {
        let milestones = milestones_json_response();
        assert_eq!(milestones[0]["title"], "v1");
        assert_eq!(milestones[0]["due_date"], "2024-01-01");

        let error = gitlab_error_response("Not Found");
        assert_eq!(error["message"], "Not Found");
    }
}
