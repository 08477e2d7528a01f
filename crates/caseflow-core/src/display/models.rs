//! Display implementations for domain models and controller results.
//!
//! Kept apart from the type definitions so the models stay free of
//! presentation concerns. All output is markdown.

use std::fmt;

use serde_json::Value;

use super::datetime::LocalDateTime;
use crate::{
    controller::{ControllerState, Failure, FailureKind, Hold, Ignored, StepOutcome},
    models::{Case, CaseStatus, CaseSummary, Step},
};

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {} ({})", self.case_id, self.case_type)?;
        writeln!(f)?;

        writeln!(f, "- Status: {}", self.case_status)?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if self.steps.is_empty() {
            writeln!(f, "\nNo steps in this case.")?;
            return Ok(());
        }

        writeln!(f, "\n## Steps")?;
        writeln!(f)?;
        for step in &self.steps {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.is_current_step { " (current)" } else { "" };
        let name = if self.step_name.is_empty() {
            self.step_id.as_str()
        } else {
            self.step_name.as_str()
        };
        writeln!(f, "### {name} `{}`{marker}", self.step_id)?;
        writeln!(f)?;

        if let Some(processed_at) = &self.processed_at {
            writeln!(f, "- Processed: {}", LocalDateTime(processed_at))?;
        }

        match &self.step_data {
            Some(Value::Object(map)) if !map.is_empty() => {
                for (key, value) in map {
                    writeln!(f, "- **{key}**: {}", inline_value(value))?;
                }
            }
            Some(Value::Null) | None => writeln!(f, "No data yet.")?,
            Some(other) => writeln!(f, "- {}", inline_value(other))?,
        }
        writeln!(f)
    }
}

/// Compact rendering of a step data value on a single line.
fn inline_value(value: &Value) -> String {
    match value {
        Value::String(s) if s.is_empty() => "_empty_".to_string(),
        Value::String(s) => s.clone(),
        Value::Null => "_empty_".to_string(),
        other => format!("`{other}`"),
    }
}

impl fmt::Display for CaseSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "## {} ({}) ({}/{})",
            self.case_id, self.case_type, self.processed_steps, self.total_steps
        )?;
        writeln!(f)?;
        writeln!(f, "- **Status**: {}", self.case_status)?;
        if let Some(step) = &self.current_step {
            writeln!(f, "- **Current step**: {step}")?;
        }
        writeln!(f, "- **Updated**: {}", LocalDateTime(&self.updated_at))?;
        writeln!(f)
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerState::Error(failure) => write!(f, "error ({failure})"),
            other => write!(f, "{}", other.name()),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let call = match self.kind {
            FailureKind::Process => "process",
            FailureKind::Move => "move",
        };
        write!(f, "{call} failed: {}", self.message)
    }
}

impl fmt::Display for Hold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hold::NoAccess => write!(f, "no access to advance this case"),
            Hold::CaseClosed => write!(f, "the case is closed"),
            Hold::StaleStep { current: Some(current) } => {
                write!(f, "the case has moved on to step '{current}'")
            }
            Hold::StaleStep { current: None } => write!(f, "the case has no current step"),
            Hold::Declined => write!(f, "this step does not advance on its own"),
        }
    }
}

impl fmt::Display for Ignored {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Ignored::Unauthorized => "no access to this step",
            Ignored::InFlight => "a request is already in progress",
            Ignored::NotReady => "nothing to do in the current state",
            Ignored::Stale => "the response belonged to an earlier request",
            Ignored::Discarded => "the step is no longer active",
        };
        f.write_str(reason)
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Ignored(reason) => writeln!(f, "Nothing sent: {reason}."),
            StepOutcome::Invalid(errors) => {
                writeln!(f, "Validation failed:")?;
                writeln!(f)?;
                for (field, message) in &errors.0 {
                    writeln!(f, "- **{field}**: {message}")?;
                }
                Ok(())
            }
            StepOutcome::Processed { hold } => {
                writeln!(f, "Step saved; the case did not advance: {hold}.")
            }
            StepOutcome::Advanced => writeln!(f, "Step saved and the case advanced."),
            StepOutcome::ReloadFailed { message } => writeln!(
                f,
                "Step saved and the case advanced, but reloading it failed: {message}"
            ),
            StepOutcome::Failed(failure) => match failure.kind {
                FailureKind::Process => {
                    writeln!(f, "Step was not saved ({failure}). Submit again to retry.")
                }
                FailureKind::Move => writeln!(
                    f,
                    "Step saved but the case did not advance ({failure}). Retry the advance."
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use serde_json::json;

    use super::*;
    use crate::{error::ValidationErrors, models::StepId};

    #[test]
    fn test_case_display_lists_steps() {
        let case = Case {
            case_id: "CASE-000007".into(),
            case_type: "driver_payee".to_string(),
            case_status: CaseStatus::Open,
            steps: vec![
                Step::new("select_driver", "Select Driver").with_data(json!({ "driver": "D-12" })),
                Step::new("payee_details", "Payee Details").current(),
            ],
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        };

        let output = case.to_string();
        assert!(output.starts_with("# CASE-000007 (driver_payee)"));
        assert!(output.contains("- Status: Open"));
        assert!(output.contains("- **driver**: D-12"));
        assert!(output.contains("### Payee Details `payee_details` (current)"));
        assert!(output.contains("No data yet."));
    }

    #[test]
    fn test_outcome_display() {
        let held = StepOutcome::Processed {
            hold: Hold::StaleStep {
                current: Some(StepId::new("vehicle")),
            },
        };
        assert!(held.to_string().contains("moved on to step 'vehicle'"));

        let invalid = StepOutcome::Invalid(ValidationErrors::new().with("vin", "is required"));
        assert!(invalid.to_string().contains("- **vin**: is required"));

        let failed = StepOutcome::Failed(Failure::advance("timeout"));
        assert!(failed.to_string().contains("move failed: timeout"));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(ControllerState::Advancing.to_string(), "advancing");
        assert_eq!(
            ControllerState::Error(Failure::process("502")).to_string(),
            "error (process failed: 502)"
        );
    }
}
