//! GitLab client modules
//!
//! `api` issues the HTTP requests and decodes responses, `service` chains
//! those calls into the milestone workflows.

pub mod api;
pub mod config;
pub mod error;
pub mod service;

#[cfg(test)]
mod tests;

pub use api::GitlabApi;
pub use config::{ClientConfig, DebugConfig, MergeRequestScope};
pub use error::ClientError;
pub use service::{MilestoneReport, MilestoneService, MoveOutcome, MovePlan};

pub type Result<T> = std::result::Result<T, ClientError>;
