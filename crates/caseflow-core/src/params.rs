//! Parameter structures for caseflow operations.
//!
//! These are interface-agnostic: the CLI converts its clap argument structs
//! into them via `From` impls, keeping clap out of the core crate.

use serde::{Deserialize, Serialize};

use crate::{
    error::{CaseflowError, Result},
    models::StepId,
};

/// One step to create when a case is instantiated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub step_id: StepId,
    pub step_name: String,
}

impl StepDefinition {
    pub fn new(step_id: impl Into<StepId>, step_name: impl Into<String>) -> Self {
        Self {
            step_id: step_id.into(),
            step_name: step_name.into(),
        }
    }
}

/// Parameters for creating a case with all of its steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCase {
    /// Kind of business process
    pub case_type: String,
    /// Steps in process order; the first becomes current
    pub steps: Vec<StepDefinition>,
}

impl CreateCase {
    /// Validate the request before touching the database.
    ///
    /// # Errors
    ///
    /// Returns `CaseflowError::InvalidInput` for a blank case type, an empty
    /// step list, blank step ids, or duplicate step ids.
    pub fn validate(&self) -> Result<()> {
        if self.case_type.trim().is_empty() {
            return Err(CaseflowError::invalid_input("case_type").with_reason("must not be empty"));
        }
        if self.steps.is_empty() {
            return Err(
                CaseflowError::invalid_input("steps").with_reason("a case needs at least one step")
            );
        }

        let mut seen = std::collections::HashSet::new();
        for step in &self.steps {
            if step.step_id.as_str().trim().is_empty() {
                return Err(
                    CaseflowError::invalid_input("step_id").with_reason("must not be empty")
                );
            }
            if !seen.insert(step.step_id.as_str()) {
                return Err(CaseflowError::invalid_input("step_id")
                    .with_reason(format!("duplicate step id '{}'", step.step_id)));
            }
        }
        Ok(())
    }
}

/// Parameters for listing cases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListCases {
    /// Include closed cases in the listing
    pub include_closed: bool,
}
