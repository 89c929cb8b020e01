// GitLab API Documentation: https://docs.gitlab.com/ee/api/group_milestones.html
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::id::{GroupId, MergeRequestId, MilestoneId};

/// A group milestone as returned by the GitLab API.
///
/// A record whose `id` is zero was never assigned by the server; it is how
/// a draft (or an absent milestone) is represented, and lookups treat it as
/// not found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Milestone {
    pub id: MilestoneId,
    pub iid: u64,
    pub group_id: GroupId,
    pub title: CompactString,
    pub description: Option<CompactString>,
    pub due_date: Option<CompactString>,
    pub start_date: Option<CompactString>,
    pub state: CompactString,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeRequest {
    pub id: MergeRequestId,
    pub iid: u64,
    pub state: CompactString,
    pub title: CompactString,
    pub description: Option<CompactString>,
    pub web_url: Option<CompactString>,
}

impl Milestone {
    /// Create an unsaved milestone carrying only the fields accepted on creation
    pub fn draft(
        title: impl Into<CompactString>,
        start_date: Option<CompactString>,
        due_date: Option<CompactString>,
    ) -> Self {
        Self {
            title: title.into(),
            start_date,
            due_date,
            ..Default::default()
        }
    }

    /// True once the server has assigned an identifier
    pub fn is_persisted(&self) -> bool {
        !self.id.is_unset()
    }

    pub fn is_active(&self) -> bool {
        self.state == "active"
    }
}

/// Find a server-assigned milestone by its title.
pub fn find_by_title<'a>(milestones: &'a [Milestone], title: &str) -> Option<&'a Milestone> {
    milestones
        .iter()
        .filter(|m| m.is_persisted())
        .find(|m| m.title == title)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_milestone_deserializes_gitlab_payload() {
        let milestone: Milestone = serde_json::from_value(json!({
            "id": 12,
            "iid": 3,
            "group_id": 5,
            "title": "v1",
            "description": null,
            "due_date": "2024-01-01",
            "start_date": "2023-12-01",
            "state": "active",
            "web_url": "https://gitlab.example.com/groups/acme/-/milestones/3"
        }))
        .unwrap();

        assert_eq!(milestone.id, MilestoneId::new(12));
        assert_eq!(milestone.group_id, GroupId::new(5));
        assert_eq!(milestone.description, None);
        assert_eq!(milestone.due_date.as_deref(), Some("2024-01-01"));
        assert!(milestone.is_active());
        assert!(milestone.is_persisted());
    }

    #[test]
    fn test_milestone_survives_serialization() {
        let milestone = Milestone {
            id: MilestoneId::new(1),
            iid: 1,
            group_id: GroupId::new(9),
            title: "Sprint 4".into(),
            description: Some("cleanup".into()),
            due_date: Some("2024-03-01".into()),
            start_date: None,
            state: "closed".into(),
        };

        let text = serde_json::to_string(&milestone).unwrap();
        let decoded: Milestone = serde_json::from_str(&text).unwrap();
        assert_eq!(decoded, milestone);
    }

    #[test]
    fn test_merge_request_without_description() {
        let mr: MergeRequest =
            serde_json::from_value(json!({"id": 100, "iid": 7, "state": "merged", "title": "Fix"}))
                .unwrap();

        assert_eq!(mr.id, MergeRequestId::new(100));
        assert_eq!(mr.description, None);
        assert_eq!(mr.state, "merged");
    }

    #[test]
    fn test_find_by_title_skips_unsaved_records() {
        let milestones = vec![
            Milestone::draft("v2", None, None),
            Milestone { id: MilestoneId::new(3), title: "v1".into(), ..Default::default() },
        ];

        assert!(find_by_title(&milestones, "v2").is_none());
        assert_eq!(find_by_title(&milestones, "v1").map(|m| m.id), Some(MilestoneId::new(3)));
        assert!(find_by_title(&milestones, "v3").is_none());
    }
}
