//! Per-step customization points for the generic controller.
//!
//! A concrete step implements [`StepStrategy`] once instead of re-implementing
//! the process/move protocol: it names its step id, describes its fields,
//! validates, builds the process payload and may veto advancement.

use serde_json::Value;

use crate::{
    binding::StepBinding,
    changes::values_equivalent,
    error::ValidationErrors,
    models::{populate_fields, FieldSpec, FormValues, StepId},
};

/// Which user actions the access capability gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessScope {
    /// Both submitting and advancing require access
    #[default]
    SubmitAndAdvance,
    /// Anyone may save the step; only advancing requires access
    AdvanceOnly,
}

/// Context handed to the move-eligibility predicate.
#[derive(Debug, Clone, Copy)]
pub struct AdvanceContext<'a> {
    pub binding: &'a StepBinding,
    /// Values that were just processed
    pub values: &'a FormValues,
}

/// Strategy for one concrete step.
pub trait StepStrategy {
    /// Step this strategy is bound to.
    fn step_id(&self) -> &StepId;

    /// Fields populated from the step payload. An empty slice copies the
    /// payload object as-is.
    fn fields(&self) -> &[FieldSpec] {
        &[]
    }

    fn access_scope(&self) -> AccessScope {
        AccessScope::default()
    }

    /// Build local form values from server-confirmed step data.
    fn populate(&self, step_data: Option<&Value>) -> FormValues {
        let fields = self.fields();
        if fields.is_empty() {
            step_data.map(FormValues::from_value).unwrap_or_default()
        } else {
            populate_fields(fields, step_data)
        }
    }

    /// Local, pre-submission validation.
    fn validate(&self, _values: &FormValues) -> Result<(), ValidationErrors> {
        Ok(())
    }

    /// Payload sent with the process call.
    fn build_payload(&self, values: &FormValues) -> Value {
        values.clone().into_value()
    }

    /// Move-eligibility predicate, checked after the built-in gates.
    fn may_advance(&self, _ctx: &AdvanceContext<'_>) -> bool {
        true
    }
}

/// Data-driven strategy: a field list plus required fields.
#[derive(Debug, Clone)]
pub struct FormStep {
    step_id: StepId,
    fields: Vec<FieldSpec>,
    required: Vec<String>,
    access_scope: AccessScope,
    auto_advance: bool,
}

impl FormStep {
    pub fn new(step_id: impl Into<StepId>) -> Self {
        Self {
            step_id: step_id.into(),
            fields: Vec::new(),
            required: Vec::new(),
            access_scope: AccessScope::default(),
            auto_advance: true,
        }
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Mark a field as required; empty values fail validation.
    pub fn require(mut self, field: impl Into<String>) -> Self {
        self.required.push(field.into());
        self
    }

    pub fn with_access_scope(mut self, scope: AccessScope) -> Self {
        self.access_scope = scope;
        self
    }

    /// Save-only steps never advance the case on their own.
    pub fn save_only(mut self) -> Self {
        self.auto_advance = false;
        self
    }
}

impl StepStrategy for FormStep {
    fn step_id(&self) -> &StepId {
        &self.step_id
    }

    fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    fn access_scope(&self) -> AccessScope {
        self.access_scope
    }

    fn validate(&self, values: &FormValues) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for field in &self.required {
            let missing = match values.get(field) {
                None => true,
                Some(Value::Array(items)) => items.is_empty(),
                Some(value) => values_equivalent(value, &Value::Null),
            };
            if missing {
                errors.add(field.clone(), "is required");
            }
        }
        errors.into_result()
    }

    fn may_advance(&self, _ctx: &AdvanceContext<'_>) -> bool {
        self.auto_advance
    }
}
