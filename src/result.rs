use compact_str::CompactString;
use confy::ConfyError;
use thiserror::Error;

use crate::client::ClientError;

pub type Result<T> = std::result::Result<T, ToolsError>;

#[derive(Debug, Error)]
pub enum ToolsError {
    #[error("Required parameter missing: '{0}'")]
    MissingParameter(&'static str),
    #[error("milestone '{0}' not found")]
    MilestoneNotFound(CompactString),
    #[error("Failure reading configuration file.")]
    ConfigError(#[source] ConfyError),
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("{0}")]
    GeneralError(CompactString),
}
