//! Client library for GitLab group milestones and the merge requests
//! attached to them.

pub mod client;
pub mod config;
pub mod domain;
pub mod id;
pub mod logging;
pub mod result;

pub use client::{ClientConfig, ClientError, GitlabApi, MergeRequestScope, MilestoneService};
pub use domain::{MergeRequest, Milestone};
