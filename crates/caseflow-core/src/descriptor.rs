//! Client-side case descriptor and current-step resolution.
//!
//! A [`CaseDescriptor`] is the in-memory view of a case derived from a store
//! response. It is shared, read-mostly state: it is replaced wholesale after
//! every successful move and never patched locally.

use jiff::Timestamp;
use log::warn;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{CaseflowError, Result},
    models::{Case, CaseId, CaseStatus, Step, StepId},
};

/// Returns the step flagged as current, or `None`.
///
/// Safe on empty or malformed step lists. If more than one step carries the
/// flag, the first one in process order wins so the result is never more than
/// one step.
pub fn current_step(steps: &[Step]) -> Option<&Step> {
    let mut flagged = steps.iter().filter(|step| step.is_current_step);
    let first = flagged.next()?;
    if flagged.next().is_some() {
        warn!(
            "Multiple steps flagged current; using '{}' (first in process order)",
            first.step_id
        );
    }
    Some(first)
}

/// In-memory representation of a case and its ordered steps.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseDescriptor {
    case: Case,
}

impl CaseDescriptor {
    pub fn new(case: Case) -> Self {
        Self { case }
    }

    /// Decode a descriptor from a raw store payload.
    ///
    /// Only `case_id` is required. A missing or non-array `steps` entry yields
    /// an empty step list, and step records that fail to decode are skipped.
    ///
    /// # Errors
    ///
    /// Returns `CaseflowError::InvalidInput` when `case_id` is absent or is
    /// neither a string nor an integer.
    pub fn from_value(payload: &Value) -> Result<Self> {
        let case_id = payload
            .get("case_id")
            .and_then(|raw| CaseId::deserialize(raw).ok())
            .ok_or_else(|| {
                CaseflowError::invalid_input("case_id").with_reason("missing from case payload")
            })?;

        let case_status = payload
            .get("case_status")
            .and_then(Value::as_str)
            .map(|raw| raw.parse::<CaseStatus>().unwrap_or_default())
            .unwrap_or_default();

        let case_type = payload
            .get("case_type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let steps = match payload.get("steps") {
            Some(Value::Array(raw_steps)) => raw_steps
                .iter()
                .enumerate()
                .filter_map(|(index, raw)| match serde_json::from_value::<Step>(raw.clone()) {
                    Ok(step) => Some(step),
                    Err(e) => {
                        warn!("Skipping malformed step #{index} in case {case_id}: {e}");
                        None
                    }
                })
                .collect(),
            Some(other) => {
                warn!("Ignoring non-array steps in case {case_id}: {other}");
                Vec::new()
            }
            None => Vec::new(),
        };

        let timestamp = |key: &str| {
            payload
                .get(key)
                .and_then(Value::as_str)
                .and_then(|raw| raw.parse::<Timestamp>().ok())
                .unwrap_or_else(Timestamp::now)
        };

        Ok(Self::new(Case {
            case_id,
            case_type,
            case_status,
            steps,
            created_at: timestamp("created_at"),
            updated_at: timestamp("updated_at"),
        }))
    }

    pub fn case(&self) -> &Case {
        &self.case
    }

    pub fn case_id(&self) -> &CaseId {
        &self.case.case_id
    }

    pub fn case_status(&self) -> &CaseStatus {
        &self.case.case_status
    }

    pub fn is_closed(&self) -> bool {
        self.case.is_closed()
    }

    pub fn steps(&self) -> &[Step] {
        &self.case.steps
    }

    /// The step awaiting action, or `None` when the case is closed or no
    /// step is flagged.
    pub fn current_step(&self) -> Option<&Step> {
        if self.is_closed() {
            return None;
        }
        current_step(&self.case.steps)
    }

    pub fn current_step_id(&self) -> Option<&StepId> {
        self.current_step().map(|step| &step.step_id)
    }

    /// Look up a step by id.
    pub fn step(&self, step_id: &StepId) -> Option<&Step> {
        self.case.steps.iter().find(|step| &step.step_id == step_id)
    }

    /// Zero-based position of a step in process order.
    pub fn position(&self, step_id: &StepId) -> Option<usize> {
        self.case
            .steps
            .iter()
            .position(|step| &step.step_id == step_id)
    }

    /// The step following `step_id` in process order.
    pub fn next_step_after(&self, step_id: &StepId) -> Option<&Step> {
        self.position(step_id)
            .and_then(|index| self.case.steps.get(index + 1))
    }
}

impl From<Case> for CaseDescriptor {
    fn from(case: Case) -> Self {
        Self::new(case)
    }
}
