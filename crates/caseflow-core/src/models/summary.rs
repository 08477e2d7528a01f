//! Case summary types used for listings.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Case, CaseId, CaseStatus};
use crate::descriptor::current_step;

/// Summary information about a case with step statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseSummary {
    pub case_id: CaseId,
    pub case_type: String,
    pub case_status: CaseStatus,
    /// Display name of the current step, if any
    pub current_step: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Total number of steps
    pub total_steps: u32,
    /// Number of steps holding processed data
    pub processed_steps: u32,
}

impl From<&Case> for CaseSummary {
    fn from(case: &Case) -> Self {
        let current_step = if case.is_closed() {
            None
        } else {
            current_step(&case.steps).map(|step| step.step_name.clone())
        };

        Self {
            case_id: case.case_id.clone(),
            case_type: case.case_type.clone(),
            case_status: case.case_status.clone(),
            current_step,
            created_at: case.created_at,
            updated_at: case.updated_at,
            total_steps: case.steps.len() as u32,
            processed_steps: case.processed_steps() as u32,
        }
    }
}
