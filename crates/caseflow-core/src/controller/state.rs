//! Controller states, failures and the outcomes reported to callers.

use serde_json::Value;

use crate::{
    error::ValidationErrors,
    models::{CaseId, StepId},
};

/// Which network call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The step payload was not persisted; the user must re-submit.
    Process,
    /// The payload is durable but the case did not advance; only the move
    /// needs retrying.
    Move,
}

/// A recoverable network or server failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn process(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Process,
            message: message.into(),
        }
    }

    pub fn advance(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Move,
            message: message.into(),
        }
    }
}

/// Lifecycle of a step controller.
///
/// ```text
/// Idle → Editing → Submitting → Processed → Advancing → Advanced
///                      │                        │
///                      └──────▶ Error ◀─────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ControllerState {
    /// Not yet populated from the server
    #[default]
    Idle,
    /// Local values are live and may differ from the server
    Editing,
    /// A process call is in flight
    Submitting,
    /// The step payload is durable; the case has not moved (yet)
    Processed,
    /// A move call is in flight
    Advancing,
    /// The case moved past this step
    Advanced,
    /// The last process or move call failed; awaiting a user retry
    Error(Failure),
}

impl ControllerState {
    pub fn name(&self) -> &'static str {
        match self {
            ControllerState::Idle => "idle",
            ControllerState::Editing => "editing",
            ControllerState::Submitting => "submitting",
            ControllerState::Processed => "processed",
            ControllerState::Advancing => "advancing",
            ControllerState::Advanced => "advanced",
            ControllerState::Error(_) => "error",
        }
    }

    /// A network call is outstanding.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, ControllerState::Submitting | ControllerState::Advancing)
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            ControllerState::Error(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Why a user action caused no transition and no network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignored {
    /// The access capability is false
    Unauthorized,
    /// A call for this controller is already in flight
    InFlight,
    /// The action does not apply in the current state
    NotReady,
    /// A response arrived for a superseded or discarded interaction
    Stale,
    /// The controller was discarded
    Discarded,
}

/// Why a processed step did not advance. None of these are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hold {
    /// Access was false at gating time
    NoAccess,
    /// The case is closed
    CaseClosed,
    /// The case's current step is no longer the bound step
    StaleStep { current: Option<StepId> },
    /// The step's own eligibility predicate declined
    Declined,
}

/// Result of driving a user action through the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Nothing happened
    Ignored(Ignored),
    /// Local validation failed; nothing was sent
    Invalid(ValidationErrors),
    /// The payload was persisted and the case stayed on this step
    Processed { hold: Hold },
    /// The case moved forward
    Advanced,
    /// The case moved forward but re-fetching it failed
    ReloadFailed { message: String },
    /// A process or move call failed
    Failed(Failure),
}

impl StepOutcome {
    /// Whether the step payload is known to be durable after this outcome.
    pub fn is_persisted(&self) -> bool {
        match self {
            StepOutcome::Processed { .. }
            | StepOutcome::Advanced
            | StepOutcome::ReloadFailed { .. } => true,
            StepOutcome::Failed(failure) => failure.kind == FailureKind::Move,
            StepOutcome::Ignored(_) | StepOutcome::Invalid(_) => false,
        }
    }
}

/// Identifies one in-flight call so late responses can be matched or
/// discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub(crate) interaction: u64,
    pub(crate) kind: FailureKind,
}

/// A process call the caller must issue.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRequest {
    pub ticket: Ticket,
    pub case_id: CaseId,
    pub step_id: StepId,
    pub payload: Value,
}

/// A move call the caller must issue.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveRequest {
    pub ticket: Ticket,
    pub case_id: CaseId,
}

/// What the caller has to do next after a phase transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Issue `process_step` and report back via `finish_submit`
    Process(ProcessRequest),
    /// Issue `move_case` and report back via `finish_advance`
    Move(MoveRequest),
    /// No call to issue
    Done(StepOutcome),
}
