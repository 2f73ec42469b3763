use thiserror::Error;

use crate::model::{
    LevelError, ParseIdError, ProgressParseError, StudyWindowError, TopicError, VariantParseError,
    WorkflowError,
};

/// Any validation failure raised by the domain model.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error(transparent)]
    Topic(#[from] TopicError),
    #[error(transparent)]
    StudyWindow(#[from] StudyWindowError),
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Variant(#[from] VariantParseError),
    #[error(transparent)]
    Id(#[from] ParseIdError),
    #[error(transparent)]
    Progress(#[from] ProgressParseError),
}
