//! Step model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::StepId;

/// One stage within a case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    /// Identifier unique within the case; used for every lookup and request
    pub step_id: StepId,

    /// Display label only
    #[serde(default)]
    pub step_name: String,

    /// Whether the case is currently awaiting action on this step
    #[serde(default)]
    pub is_current_step: bool,

    /// Opaque business payload written by a successful process call.
    /// `None` means the step is still pending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_data: Option<Value>,

    /// When the step data was last persisted (UTC)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<Timestamp>,
}

impl Step {
    /// Creates a pending, non-current step.
    pub fn new(step_id: impl Into<StepId>, step_name: impl Into<String>) -> Self {
        Self {
            step_id: step_id.into(),
            step_name: step_name.into(),
            is_current_step: false,
            step_data: None,
            processed_at: None,
        }
    }

    /// Marks the step as current.
    pub fn current(mut self) -> Self {
        self.is_current_step = true;
        self
    }

    /// Attaches a data payload to the step.
    pub fn with_data(mut self, data: Value) -> Self {
        self.step_data = Some(data);
        self
    }

    /// A step is pending until data has been processed for it.
    pub fn is_pending(&self) -> bool {
        self.step_data.is_none()
    }
}
