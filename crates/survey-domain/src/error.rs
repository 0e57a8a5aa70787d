use thiserror::Error;

use crate::survey::SurveyStatus;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DomainError {
    #[error("invalid status transition {from:?} -> {to:?}")]
    InvalidTransition { from: SurveyStatus, to: SurveyStatus },
}
