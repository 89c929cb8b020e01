//! High-level GitLab service operations

use compact_str::CompactString;
use itertools::Itertools;
use tracing::{debug, info, instrument, warn};

use super::{
    api::GitlabApi,
    config::{ClientConfig, MergeRequestScope},
    error::{self, ClientError},
};
use crate::{
    domain::{find_by_title, MergeRequest, Milestone},
    result::{Result, ToolsError},
};

/// High-level service for GitLab operations
///
/// Chains the API calls behind the listing and move-milestone workflows.
/// Calls are issued one after another; nothing runs concurrently.
#[derive(Debug, Clone)]
pub struct MilestoneService {
    api: GitlabApi,
    scope: MergeRequestScope,
}

/// An active milestone together with the outcome of its merge request lookup
#[derive(Debug)]
pub struct MilestoneReport {
    pub milestone: Milestone,
    pub merge_requests: error::Result<Vec<MergeRequest>>,
}

/// Parameters of the move-milestone workflow
#[derive(Debug, Clone)]
pub struct MovePlan {
    /// Title of the milestone merge requests are moved from
    pub from: CompactString,
    /// Title of the milestone merge requests are moved to
    pub to: CompactString,
    /// Due date given to the target milestone if it has to be created
    pub due_date: CompactString,
}

#[derive(Debug)]
pub struct MoveOutcome {
    pub from: Milestone,
    pub to: Milestone,
    /// Whether `to` was created by this run
    pub created: bool,
    /// Merge requests still attached to `from`
    pub merge_requests: error::Result<Vec<MergeRequest>>,
}

impl MilestoneService {
    /// Create a new milestone service
    pub fn new(config: ClientConfig, scope: MergeRequestScope) -> Result<Self> {
        let api = GitlabApi::new(config)?;
        Ok(Self::from_api(api, scope))
    }

    /// Create service from existing API client
    pub fn from_api(api: GitlabApi, scope: MergeRequestScope) -> Self {
        Self { api, scope }
    }

    /// Fetch the active milestones of a group and the merge requests of each.
    ///
    /// Failing to list the milestones aborts; a failed merge request lookup
    /// is recorded on its report and the remaining milestones are still
    /// processed.
    #[instrument(skip(self), fields(scope = %self.scope))]
    pub async fn milestone_report(&self, group: &str) -> Result<Vec<MilestoneReport>> {
        let milestones = self.api.list_milestones(group).await?;
        debug!(titles = %milestones.iter().map(|m| m.title.as_str()).join(", "), "Active milestones");

        let mut reports = Vec::with_capacity(milestones.len());
        for milestone in milestones {
            let merge_requests = self.api.merge_requests(&milestone, self.scope).await;
            if let Err(e) = &merge_requests {
                warn!(milestone = %milestone.title, error = %e, "Failed to fetch merge requests");
            }

            reports.push(MilestoneReport { milestone, merge_requests });
        }

        Ok(reports)
    }

    /// Find an active milestone of the group by title
    #[instrument(skip(self))]
    pub async fn find_active_milestone(&self, group: &str, title: &str) -> Result<Milestone> {
        let milestones = self.api.list_milestones(group).await?;

        find_by_title(&milestones, title)
            .cloned()
            .ok_or_else(|| ToolsError::MilestoneNotFound(title.into()))
    }

    /// Merge requests of a single active milestone
    pub async fn milestone_merge_requests(&self, group: &str, title: &str) -> Result<Vec<MergeRequest>> {
        let milestone = self.find_active_milestone(group, title).await?;
        Ok(self.api.merge_requests(&milestone, self.scope).await?)
    }

    /// Prepare moving merge requests from one milestone to another.
    ///
    /// The source milestone must exist. A missing target is created in the
    /// source's group, starting when the source is due and ending on the
    /// planned due date.
    #[instrument(skip(self), fields(from = %plan.from, to = %plan.to))]
    pub async fn move_milestone(&self, group: &str, plan: &MovePlan) -> Result<MoveOutcome> {
        let milestones = self.api.list_milestones(group).await?;

        let from = find_by_title(&milestones, &plan.from)
            .cloned()
            .ok_or_else(|| ToolsError::MilestoneNotFound(plan.from.clone()))?;

        let (to, created) = match find_by_title(&milestones, &plan.to) {
            Some(existing) => (existing.clone(), false),
            None => {
                info!(title = %plan.to, "Milestone not found, creating it");
                let draft = Milestone::draft(
                    plan.to.clone(),
                    from.due_date.clone(),
                    Some(plan.due_date.clone()),
                );
                (self.create_in_group_of(&from, &draft).await?, true)
            },
        };

        let merge_requests = self.api.merge_requests(&from, self.scope).await;

        Ok(MoveOutcome { from, to, created, merge_requests })
    }

    async fn create_in_group_of(&self, sibling: &Milestone, draft: &Milestone) -> Result<Milestone> {
        if sibling.group_id.is_unset() {
            return Err(ClientError::not_found(format!("group of milestone '{}'", sibling.title)).into());
        }

        Ok(self.api.create_milestone(sibling.group_id, draft).await?)
    }
}
