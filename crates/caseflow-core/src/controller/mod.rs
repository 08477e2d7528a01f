//! Per-step state machine driving the process/move protocol.
//!
//! A [`StepController`] is bound to exactly one step of a case. It populates
//! local form state from the step's data, submits the step payload through
//! `process_step`, and, when every gate passes, advances the case through
//! `move_case` and reloads the case descriptor.
//!
//! # Gates
//!
//! Advancement after a successful process requires all of:
//!
//! 1. the access capability is true,
//! 2. the case is not closed,
//! 3. the case's current step is still the bound step,
//! 4. the strategy's [`StepStrategy::may_advance`] predicate agrees.
//!
//! A failed gate leaves the controller in [`ControllerState::Processed`] and
//! reports a [`Hold`]; no move call is issued.
//!
//! # Driving surfaces
//!
//! Event-driven callers use the phase API ([`StepController::begin_submit`],
//! [`StepController::finish_submit`], [`StepController::begin_advance`],
//! [`StepController::finish_advance`], [`StepController::refresh`]) and issue
//! the network calls themselves. Everyone else calls
//! [`StepController::submit`], [`StepController::advance`] or
//! [`StepController::retry`] with a [`StepStore`].
//!
//! Each `begin_*` hands out a [`Ticket`]. A `finish_*` carrying a ticket from
//! a superseded interaction, or arriving after [`StepController::discard`],
//! is ignored.
//!
//! # Example
//!
//! ```rust,no_run
//! use caseflow_core::{
//!     controller::{FormStep, StepController, StepOutcome},
//!     models::{CaseId, FieldSpec},
//!     CaseStoreBuilder, StepStore,
//! };
//! use serde_json::json;
//!
//! # async fn example() -> caseflow_core::Result<()> {
//! let store = CaseStoreBuilder::new().build().await?;
//! let case = store.fetch_case(&CaseId::new("CASE-000001")).await?;
//!
//! let step = FormStep::new("payee_details")
//!     .field(FieldSpec::text("bank_name"))
//!     .require("bank_name");
//! let mut controller = StepController::new(step, case.into(), true);
//! controller.load();
//! controller.edit("bank_name", json!("Chase"));
//!
//! if let StepOutcome::Advanced = controller.submit(&store).await {
//!     println!("now on {:?}", controller.binding().current_step_id());
//! }
//! # Ok(())
//! # }
//! ```

use log::{debug, info, warn};
use serde_json::Value;

use crate::{
    binding::StepBinding,
    descriptor::CaseDescriptor,
    error::Result,
    models::FormValues,
    store::StepStore,
};

pub mod form_state;
pub mod state;
pub mod strategy;


pub use form_state::LocalFormState;
pub use state::{
    ControllerState, Dispatch, Failure, FailureKind, Hold, Ignored, MoveRequest, ProcessRequest,
    StepOutcome, Ticket,
};
pub use strategy::{AccessScope, AdvanceContext, FormStep, StepStrategy};

/// Generic step controller, parameterised by a [`StepStrategy`].
#[derive(Debug)]
pub struct StepController<T> {
    strategy: T,
    binding: StepBinding,
    form: LocalFormState,
    state: ControllerState,
    suppress_repopulation: bool,
    interaction: u64,
    discarded: bool,
}

impl<T: StepStrategy> StepController<T> {
    /// Bind a strategy to a case. The controller starts `Idle`; call
    /// [`StepController::load`] to populate it.
    pub fn new(strategy: T, descriptor: CaseDescriptor, has_access: bool) -> Self {
        let binding = StepBinding::new(strategy.step_id().clone(), descriptor, has_access);
        Self {
            strategy,
            binding,
            form: LocalFormState::default(),
            state: ControllerState::Idle,
            suppress_repopulation: false,
            interaction: 0,
            discarded: false,
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn binding(&self) -> &StepBinding {
        &self.binding
    }

    pub fn strategy(&self) -> &T {
        &self.strategy
    }

    pub fn form(&self) -> &LocalFormState {
        &self.form
    }

    pub fn values(&self) -> &FormValues {
        self.form.values()
    }

    /// Whether the live values differ from the server baseline. Gates commit
    /// buttons only; it never blocks process or move.
    pub fn has_manual_changes(&self) -> bool {
        self.form.has_manual_changes()
    }

    pub fn set_access(&mut self, has_access: bool) {
        self.binding.set_access(has_access);
    }

    /// While set, [`StepController::refresh`] keeps local values and the
    /// baseline untouched (e.g. during an upload on this step).
    pub fn set_suppress_repopulation(&mut self, suppress: bool) {
        self.suppress_repopulation = suppress;
    }

    pub fn suppresses_repopulation(&self) -> bool {
        self.suppress_repopulation
    }

    /// Populate local form state from the bound step's data.
    /// `Idle → Editing`; later calls repopulate in place.
    pub fn load(&mut self) {
        self.repopulate();
        if self.state == ControllerState::Idle {
            self.transition(ControllerState::Editing);
        }
    }

    /// Resume a step whose payload the store already holds, e.g. in a new
    /// session after a move failure, so it can be advanced without being
    /// processed again. Returns `false` if the bound step carries no data.
    pub fn resume_processed(&mut self) -> bool {
        if self.discarded
            || self.state.is_in_flight()
            || self.binding.bound_step_data().is_none()
        {
            return false;
        }
        self.repopulate();
        self.transition(ControllerState::Processed);
        true
    }

    /// Apply a user edit. Outside an in-flight call the controller returns to
    /// `Editing`, except after a failed move: the stored payload is durable
    /// and the move stays retryable.
    pub fn edit(&mut self, field: impl Into<String>, value: Value) {
        self.form.set(field, value);
        let move_pending = self.state.failure().map(|f| f.kind) == Some(FailureKind::Move);
        if !self.state.is_in_flight() && self.state != ControllerState::Editing && !move_pending {
            self.transition(ControllerState::Editing);
        }
    }

    /// Replace the case descriptor with a freshly fetched one and repopulate
    /// unless repopulation is suppressed.
    pub fn refresh(&mut self, descriptor: CaseDescriptor) {
        self.binding.replace_descriptor(descriptor);
        if self.suppress_repopulation {
            debug!(
                "Repopulation suppressed for step '{}'; keeping local values",
                self.binding.step_id()
            );
        } else {
            self.repopulate();
        }
    }

    /// Stop accepting responses. Any `finish_*` after this is ignored.
    pub fn discard(&mut self) {
        self.discarded = true;
        self.interaction += 1;
    }

    pub fn is_discarded(&self) -> bool {
        self.discarded
    }

    /// Start a submission. Returns the process call to issue, or the reason
    /// nothing happens.
    pub fn begin_submit(&mut self) -> Dispatch {
        if let Some(ignored) = self.precheck(true) {
            return Dispatch::Done(StepOutcome::Ignored(ignored));
        }
        if self.state == ControllerState::Idle {
            return Dispatch::Done(StepOutcome::Ignored(Ignored::NotReady));
        }

        if let Err(errors) = self.strategy.validate(self.form.values()) {
            debug!(
                "Validation failed for step '{}': {errors}",
                self.binding.step_id()
            );
            return Dispatch::Done(StepOutcome::Invalid(errors));
        }

        let payload = self.strategy.build_payload(self.form.values());
        let ticket = self.next_ticket(FailureKind::Process);
        self.transition(ControllerState::Submitting);

        Dispatch::Process(ProcessRequest {
            ticket,
            case_id: self.binding.case_id().clone(),
            step_id: self.binding.step_id().clone(),
            payload,
        })
    }

    /// Report the result of a process call. On success the advance gates are
    /// evaluated immediately and a move call may be returned.
    pub fn finish_submit(&mut self, ticket: Ticket, result: Result<()>) -> Dispatch {
        if !self.accepts(ticket, FailureKind::Process) {
            debug!(
                "Ignoring stale process response for step '{}'",
                self.binding.step_id()
            );
            return Dispatch::Done(StepOutcome::Ignored(Ignored::Stale));
        }

        match result {
            Ok(()) => {
                info!(
                    "Processed step '{}' of case {}",
                    self.binding.step_id(),
                    self.binding.case_id()
                );
                self.transition(ControllerState::Processed);
                self.gate_advance()
            }
            Err(e) => {
                warn!(
                    "Process failed for step '{}' of case {}: {e}",
                    self.binding.step_id(),
                    self.binding.case_id()
                );
                let failure = Failure::process(e.to_string());
                self.transition(ControllerState::Error(failure.clone()));
                Dispatch::Done(StepOutcome::Failed(failure))
            }
        }
    }

    /// Start (or retry) advancement of an already processed step.
    pub fn begin_advance(&mut self) -> Dispatch {
        if let Some(ignored) = self.precheck(false) {
            return Dispatch::Done(StepOutcome::Ignored(ignored));
        }

        let ready = match &self.state {
            ControllerState::Processed => true,
            ControllerState::Error(failure) => failure.kind == FailureKind::Move,
            _ => false,
        };
        if !ready {
            return Dispatch::Done(StepOutcome::Ignored(Ignored::NotReady));
        }

        self.transition(ControllerState::Processed);
        self.gate_advance()
    }

    /// Report the result of a move call. After success the caller reloads the
    /// case and passes it to [`StepController::refresh`].
    pub fn finish_advance(&mut self, ticket: Ticket, result: Result<()>) -> StepOutcome {
        if !self.accepts(ticket, FailureKind::Move) {
            debug!(
                "Ignoring stale move response for step '{}'",
                self.binding.step_id()
            );
            return StepOutcome::Ignored(Ignored::Stale);
        }

        match result {
            Ok(()) => {
                info!(
                    "Case {} advanced past step '{}'",
                    self.binding.case_id(),
                    self.binding.step_id()
                );
                self.transition(ControllerState::Advanced);
                StepOutcome::Advanced
            }
            Err(e) => {
                warn!(
                    "Move failed for case {} after processing step '{}': {e}",
                    self.binding.case_id(),
                    self.binding.step_id()
                );
                let failure = Failure::advance(e.to_string());
                self.transition(ControllerState::Error(failure.clone()));
                StepOutcome::Failed(failure)
            }
        }
    }

    /// Submit the step and, if allowed, advance and reload the case.
    pub async fn submit<S: StepStore + ?Sized>(&mut self, store: &S) -> StepOutcome {
        let dispatch = self.begin_submit();
        self.drive(store, dispatch).await
    }

    /// Advance an already processed step, e.g. after a move failure.
    pub async fn advance<S: StepStore + ?Sized>(&mut self, store: &S) -> StepOutcome {
        let dispatch = self.begin_advance();
        self.drive(store, dispatch).await
    }

    /// Re-issue whichever call failed last. Only the failed call is repeated:
    /// a move failure never re-processes the step.
    pub async fn retry<S: StepStore + ?Sized>(&mut self, store: &S) -> StepOutcome {
        match self.state.failure().map(|failure| failure.kind) {
            Some(FailureKind::Process) => self.submit(store).await,
            Some(FailureKind::Move) => self.advance(store).await,
            None => StepOutcome::Ignored(Ignored::NotReady),
        }
    }

    /// Re-fetch the case and refresh the binding.
    pub async fn reload<S: StepStore + ?Sized>(&mut self, store: &S) -> Result<()> {
        let case = store.fetch_case(self.binding.case_id()).await?;
        if self.discarded {
            return Ok(());
        }
        self.refresh(CaseDescriptor::new(case));
        Ok(())
    }

    async fn drive<S: StepStore + ?Sized>(
        &mut self,
        store: &S,
        mut dispatch: Dispatch,
    ) -> StepOutcome {
        loop {
            dispatch = match dispatch {
                Dispatch::Done(outcome) => return outcome,
                Dispatch::Process(request) => {
                    let result = store
                        .process_step(&request.case_id, &request.step_id, &request.payload)
                        .await;
                    self.finish_submit(request.ticket, result)
                }
                Dispatch::Move(request) => {
                    let result = store.move_case(&request.case_id).await;
                    let outcome = self.finish_advance(request.ticket, result);
                    if outcome != StepOutcome::Advanced {
                        return outcome;
                    }
                    return match self.reload(store).await {
                        Ok(()) => StepOutcome::Advanced,
                        Err(e) => {
                            warn!(
                                "Reload after advancing case {} failed: {e}",
                                self.binding.case_id()
                            );
                            StepOutcome::ReloadFailed {
                                message: e.to_string(),
                            }
                        }
                    };
                }
            };
        }
    }

    /// Checks shared by every user action. `submitting` selects which access
    /// scope applies.
    fn precheck(&self, submitting: bool) -> Option<Ignored> {
        if self.discarded {
            return Some(Ignored::Discarded);
        }
        let gated = !submitting || self.strategy.access_scope() == AccessScope::SubmitAndAdvance;
        if gated && !self.binding.has_access() {
            debug!(
                "Access denied for step '{}'; action suppressed",
                self.binding.step_id()
            );
            return Some(Ignored::Unauthorized);
        }
        if self.state.is_in_flight() {
            return Some(Ignored::InFlight);
        }
        None
    }

    /// Evaluate the advance gates from `Processed`.
    fn gate_advance(&mut self) -> Dispatch {
        if let Some(hold) = self.hold_reason() {
            debug!(
                "Step '{}' processed without advancing: {hold:?}",
                self.binding.step_id()
            );
            return Dispatch::Done(StepOutcome::Processed { hold });
        }

        let ticket = self.next_ticket(FailureKind::Move);
        self.transition(ControllerState::Advancing);
        Dispatch::Move(MoveRequest {
            ticket,
            case_id: self.binding.case_id().clone(),
        })
    }

    fn hold_reason(&self) -> Option<Hold> {
        if !self.binding.has_access() {
            return Some(Hold::NoAccess);
        }
        if self.binding.descriptor().is_closed() {
            return Some(Hold::CaseClosed);
        }
        if !self.binding.is_current() {
            return Some(Hold::StaleStep {
                current: self.binding.current_step_id().cloned(),
            });
        }
        let ctx = AdvanceContext {
            binding: &self.binding,
            values: self.form.values(),
        };
        if !self.strategy.may_advance(&ctx) {
            return Some(Hold::Declined);
        }
        None
    }

    fn repopulate(&mut self) {
        let values = self.strategy.populate(self.binding.bound_step_data());
        self.form.populate(values);
    }

    fn next_ticket(&mut self, kind: FailureKind) -> Ticket {
        self.interaction += 1;
        Ticket {
            interaction: self.interaction,
            kind,
        }
    }

    /// A response is accepted only for the latest interaction of the
    /// matching kind while its call is still outstanding.
    fn accepts(&self, ticket: Ticket, kind: FailureKind) -> bool {
        let expected = match kind {
            FailureKind::Process => ControllerState::Submitting,
            FailureKind::Move => ControllerState::Advancing,
        };
        !self.discarded
            && ticket.kind == kind
            && ticket.interaction == self.interaction
            && self.state == expected
    }

    fn transition(&mut self, next: ControllerState) {
        debug!(
            "Step '{}': {} -> {}",
            self.binding.step_id(),
            self.state.name(),
            next.name()
        );
        self.state = next;
    }
}
