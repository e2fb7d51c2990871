//! Error types for the diagnosis pipeline

use crate::flow::Step;
use thiserror::Error;

/// Failures of the page controller itself (preconditions, state machine, input)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Please upload an image")]
    NoImage,

    #[error("A diagnosis request is already in progress")]
    SubmissionInFlight,

    #[error("Submission ticket is no longer current")]
    StaleSubmission,

    #[error("Cannot move from {from:?} to {to:?}")]
    InvalidTransition { from: Step, to: Step },

    #[error("Invalid value for {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error("Invalid outbreak report: {0}")]
    InvalidOutbreak(String),
}

/// Failures of a single diagnosis round trip
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmissionError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Network error: {status} - {detail}")]
    Status { status: u16, detail: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Request cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_image_message_is_user_facing() {
        assert_eq!(CoreError::NoImage.to_string(), "Please upload an image");
    }

    #[test]
    fn test_status_error_carries_body_text() {
        let err = SubmissionError::Status {
            status: 500,
            detail: "Internal Error".to_string(),
        };
        assert_eq!(err.to_string(), "Network error: 500 - Internal Error");
    }
}
