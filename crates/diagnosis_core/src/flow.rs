//! Step gating for the diagnosis page
//!
//! Upload → Environment → Result, with back navigation from Environment and
//! a reset from Result. Input mode (the first two steps) and result mode are
//! mutually exclusive.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Presentation state of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Step {
    /// Step 1: pick or drop an image
    #[default]
    Upload,
    /// Step 2: optional environment details, then submit
    Environment,
    /// Result mode
    Result,
}

impl Step {
    /// 1-based position shown in the progress header
    pub fn number(&self) -> u8 {
        match self {
            Step::Upload => 1,
            Step::Environment => 2,
            Step::Result => 3,
        }
    }

    pub fn is_input(&self) -> bool {
        !matches!(self, Step::Result)
    }
}

/// Facts the gate needs to decide a transition
#[derive(Debug, Clone, Copy)]
pub struct GateInput {
    pub has_image: bool,
    pub submission_completed: bool,
}

/// Validate a transition and return the new step
pub fn transition(from: Step, to: Step, input: GateInput) -> Result<Step> {
    let allowed = match (from, to) {
        (Step::Upload, Step::Environment) => input.has_image,
        (Step::Environment, Step::Upload) => true,
        (Step::Environment, Step::Result) => input.submission_completed,
        (Step::Result, Step::Upload) => true,
        _ => false,
    };

    if allowed {
        tracing::debug!(?from, ?to, "step transition");
        Ok(to)
    } else if from == Step::Upload && to == Step::Environment {
        Err(CoreError::NoImage)
    } else {
        Err(CoreError::InvalidTransition { from, to })
    }
}
