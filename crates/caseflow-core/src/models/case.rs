//! Case model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{CaseId, CaseStatus, Step};

/// A single instance of a multi-step business process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Case {
    /// Identifier assigned by the store at creation
    pub case_id: CaseId,

    /// Kind of business process (e.g. `new_lease`, `driver_payee`)
    #[serde(default)]
    pub case_type: String,

    /// Lifecycle status
    #[serde(default)]
    pub case_status: CaseStatus,

    /// Steps in process order
    #[serde(default)]
    pub steps: Vec<Step>,

    /// Timestamp when the case was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the case was last modified (UTC)
    pub updated_at: Timestamp,
}

impl Case {
    pub fn is_closed(&self) -> bool {
        self.case_status.is_closed()
    }

    /// Number of steps that already hold processed data.
    pub fn processed_steps(&self) -> usize {
        self.steps.iter().filter(|step| !step.is_pending()).count()
    }
}
