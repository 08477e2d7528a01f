//! Association between a step-bound component and its case.

use serde_json::Value;

use crate::{
    descriptor::CaseDescriptor,
    models::{CaseId, Step, StepId},
};

/// Everything a step-bound component sees of its case: the bound step id,
/// the parent descriptor and the externally resolved access capability.
#[derive(Debug, Clone)]
pub struct StepBinding {
    step_id: StepId,
    descriptor: CaseDescriptor,
    has_access: bool,
}

impl StepBinding {
    pub fn new(step_id: impl Into<StepId>, descriptor: CaseDescriptor, has_access: bool) -> Self {
        Self {
            step_id: step_id.into(),
            descriptor,
            has_access,
        }
    }

    pub fn step_id(&self) -> &StepId {
        &self.step_id
    }

    pub fn case_id(&self) -> &CaseId {
        self.descriptor.case_id()
    }

    pub fn descriptor(&self) -> &CaseDescriptor {
        &self.descriptor
    }

    pub fn has_access(&self) -> bool {
        self.has_access
    }

    /// Update the access capability, e.g. after the resolver re-evaluates.
    pub fn set_access(&mut self, has_access: bool) {
        self.has_access = has_access;
    }

    pub fn current_step_id(&self) -> Option<&StepId> {
        self.descriptor.current_step_id()
    }

    /// Data of the case's current step.
    pub fn current_step_data(&self) -> Option<&Value> {
        self.descriptor
            .current_step()
            .and_then(|step| step.step_data.as_ref())
    }

    /// The step record this binding is attached to.
    pub fn bound_step(&self) -> Option<&Step> {
        self.descriptor.step(&self.step_id)
    }

    /// Data of the bound step, used for pre-population.
    pub fn bound_step_data(&self) -> Option<&Value> {
        self.bound_step().and_then(|step| step.step_data.as_ref())
    }

    /// Whether the bound step is the case's current step.
    pub fn is_current(&self) -> bool {
        self.current_step_id() == Some(&self.step_id)
    }

    /// Swap in a freshly fetched descriptor, returning the previous one.
    pub fn replace_descriptor(&mut self, descriptor: CaseDescriptor) -> CaseDescriptor {
        std::mem::replace(&mut self.descriptor, descriptor)
    }
}
