//! Command definitions and their handlers.
//!
//! Argument structs carry the clap derives and convert into the core's
//! interface-agnostic parameter types through `From` impls:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → CaseStore / StepController
//! ```
//!
//! Step commands are one-shot sessions: each invocation fetches the case,
//! binds a [`StepController`] to the requested step, applies the given data
//! and drives the process/move protocol against the local store.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use caseflow_core::{
    controller::{AccessScope, FormStep, StepController, StepOutcome},
    display::{Cases, OperationStatus},
    has_manual_changes,
    params::{CreateCase, ListCases, StepDefinition},
    CaseDescriptor, CaseId, CaseStore, CaseStoreBuilder, CaseflowError, ControllerState,
    FormValues, StepId, StepStore,
};
use clap::{Args, Subcommand, ValueEnum};
use log::{debug, info};
use serde_json::Value;

use crate::renderer::TerminalRenderer;

/// Create a case with its ordered steps
#[derive(Args)]
pub struct CreateCaseArgs {
    /// Kind of business process, e.g. new_lease
    pub case_type: String,
    /// Step as ID or ID:NAME, in process order; the first one starts current
    #[arg(
        short,
        long = "step",
        required = true,
        value_parser = parse_step_definition
    )]
    pub steps: Vec<StepDefinition>,
}

impl From<CreateCaseArgs> for CreateCase {
    fn from(val: CreateCaseArgs) -> Self {
        CreateCase {
            case_type: val.case_type,
            steps: val.steps,
        }
    }
}

/// Parse `ID` or `ID:NAME` into a step definition.
fn parse_step_definition(raw: &str) -> std::result::Result<StepDefinition, String> {
    let (id, name) = match raw.split_once(':') {
        Some((id, name)) => (id.trim(), name.trim()),
        None => (raw.trim(), raw.trim()),
    };
    if id.is_empty() {
        return Err(format!("missing step id in '{raw}'"));
    }
    let name = if name.is_empty() { id } else { name };
    Ok(StepDefinition::new(id, name))
}

/// List cases
#[derive(Args)]
pub struct ListCasesArgs {
    /// Include closed cases
    #[arg(long)]
    pub closed: bool,
}

impl From<ListCasesArgs> for ListCases {
    fn from(val: ListCasesArgs) -> Self {
        ListCases {
            include_closed: val.closed,
        }
    }
}

#[derive(Args)]
pub struct CaseIdArgs {
    /// Case identifier, e.g. CASE-000001
    pub case_id: String,
}

#[derive(Subcommand)]
pub enum CaseCommands {
    /// Create a case
    #[command(alias = "c")]
    Create(CreateCaseArgs),
    /// List cases
    #[command(aliases = ["l", "ls"])]
    List(ListCasesArgs),
    /// Show a case with all of its steps
    #[command(alias = "s")]
    Show(CaseIdArgs),
    /// Close a case regardless of its current step
    Close(CaseIdArgs),
}

#[derive(Args)]
pub struct StepRefArgs {
    /// Case identifier
    pub case_id: String,
    /// Step identifier within the case
    pub step_id: String,
}

/// Which actions `--no-access` blocks
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum AccessScopeArg {
    /// Without access nothing is submitted
    SubmitAndAdvance,
    /// Without access the step is saved but the case stays put
    AdvanceOnly,
}

impl From<AccessScopeArg> for AccessScope {
    fn from(val: AccessScopeArg) -> Self {
        match val {
            AccessScopeArg::SubmitAndAdvance => AccessScope::SubmitAndAdvance,
            AccessScopeArg::AdvanceOnly => AccessScope::AdvanceOnly,
        }
    }
}

/// Submit step data and advance the case when allowed
#[derive(Args)]
pub struct SubmitStepArgs {
    #[command(flatten)]
    pub step: StepRefArgs,
    /// Step data as a JSON object, or @FILE to read it from a file
    #[arg(short, long)]
    pub data: String,
    /// Fields that must be non-empty, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub require: Vec<String>,
    /// Save the step without advancing the case
    #[arg(long)]
    pub save_only: bool,
    /// Actions gated by access
    #[arg(long, value_enum, default_value_t = AccessScopeArg::SubmitAndAdvance)]
    pub access_scope: AccessScopeArg,
    /// Act without access to this case
    #[arg(long)]
    pub no_access: bool,
}

impl SubmitStepArgs {
    fn strategy(&self) -> FormStep {
        let mut step = FormStep::new(self.step.step_id.as_str())
            .with_access_scope(self.access_scope.into());
        for field in &self.require {
            step = step.require(field.as_str());
        }
        if self.save_only {
            step = step.save_only();
        }
        step
    }
}

/// Advance the case past an already processed step
#[derive(Args)]
pub struct AdvanceStepArgs {
    #[command(flatten)]
    pub step: StepRefArgs,
    /// Act without access to this case
    #[arg(long)]
    pub no_access: bool,
}

#[derive(Subcommand)]
pub enum StepCommands {
    /// Show one step of a case
    #[command(alias = "s")]
    Show(StepRefArgs),
    /// Submit step data
    #[command(alias = "p")]
    Submit(SubmitStepArgs),
    /// Retry advancing a processed step
    #[command(alias = "m")]
    Advance(AdvanceStepArgs),
}

/// Compare two JSON form snapshots
#[derive(Args)]
pub struct ChangesArgs {
    /// Current form values
    pub current: PathBuf,
    /// Server baseline
    pub baseline: PathBuf,
}

/// Report whether `current` differs from `baseline`.
pub fn compare_snapshots(args: &ChangesArgs, renderer: &TerminalRenderer) -> Result<()> {
    let current = FormValues::from_value(&read_json_file(&args.current)?);
    let baseline = FormValues::from_value(&read_json_file(&args.baseline)?);

    if has_manual_changes(&current, &baseline) {
        renderer.render("Manual changes detected.\n");
    } else {
        renderer.render("No manual changes.\n");
    }
    Ok(())
}

fn read_json_file(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Parse `--data`: inline JSON or `@FILE`.
fn read_payload(data: &str) -> Result<serde_json::Map<String, Value>> {
    let value = match data.strip_prefix('@') {
        Some(path) => read_json_file(Path::new(path))?,
        None => serde_json::from_str(data).context("Step data is not valid JSON")?,
    };
    match value {
        Value::Object(fields) => Ok(fields),
        _ => bail!("Step data must be a JSON object"),
    }
}

/// Handler for store-backed commands.
pub struct Cli {
    store: CaseStore,
    renderer: TerminalRenderer,
}

impl Cli {
    pub async fn open(database_file: Option<PathBuf>, renderer: TerminalRenderer) -> Result<Self> {
        let store = CaseStoreBuilder::new()
            .with_database_path(database_file)
            .build()
            .await
            .context("Failed to initialize case store")?;

        info!("caseflow started");
        Ok(Self { store, renderer })
    }

    pub async fn handle_case_command(&self, command: CaseCommands) -> Result<()> {
        match command {
            CaseCommands::Create(args) => self.create_case(&args.into()).await,
            CaseCommands::List(args) => self.list_cases(&args.into()).await,
            CaseCommands::Show(args) => self.show_case(&CaseId::new(args.case_id)).await,
            CaseCommands::Close(args) => self.close_case(&CaseId::new(args.case_id)).await,
        }
    }

    pub async fn handle_step_command(&self, command: StepCommands) -> Result<()> {
        match command {
            StepCommands::Show(args) => self.show_step(&args).await,
            StepCommands::Submit(args) => self.submit_step(&args).await,
            StepCommands::Advance(args) => self.advance_step(&args).await,
        }
    }

    pub async fn list_cases(&self, params: &ListCases) -> Result<()> {
        let cases = self.store.list_cases(params).await?;
        self.renderer.show(&Cases::from(cases));
        Ok(())
    }

    async fn create_case(&self, params: &CreateCase) -> Result<()> {
        let case = self.store.create_case(params).await?;
        self.renderer.show(&case);
        Ok(())
    }

    async fn show_case(&self, case_id: &CaseId) -> Result<()> {
        let case = self.store.fetch_case(case_id).await?;
        self.renderer.show(&case);
        Ok(())
    }

    async fn close_case(&self, case_id: &CaseId) -> Result<()> {
        self.store.close_case(case_id).await?;
        self.renderer
            .show(&OperationStatus::success(format!("Closed case {case_id}")));
        Ok(())
    }

    async fn show_step(&self, args: &StepRefArgs) -> Result<()> {
        let descriptor = self.fetch_descriptor(args).await?;
        let step_id = StepId::new(args.step_id.as_str());
        let step = descriptor
            .step(&step_id)
            .ok_or_else(|| CaseflowError::StepNotFound {
                case_id: descriptor.case_id().clone(),
                step_id: step_id.clone(),
            })?;
        self.renderer.show(step);
        Ok(())
    }

    async fn submit_step(&self, args: &SubmitStepArgs) -> Result<()> {
        let fields = read_payload(&args.data)?;
        let mut controller = self
            .bind(&args.step, args.strategy(), !args.no_access)
            .await?;
        controller.load();
        for (field, value) in fields {
            controller.edit(field, value);
        }

        let outcome = controller.submit(&self.store).await;
        self.report(&outcome, controller.state())
    }

    async fn advance_step(&self, args: &AdvanceStepArgs) -> Result<()> {
        let strategy = FormStep::new(args.step.step_id.as_str());
        let mut controller = self.bind(&args.step, strategy, !args.no_access).await?;
        if !controller.resume_processed() {
            bail!(
                "Step '{}' has not been processed yet; submit it first",
                args.step.step_id
            );
        }

        let outcome = controller.advance(&self.store).await;
        self.report(&outcome, controller.state())
    }

    async fn fetch_descriptor(&self, args: &StepRefArgs) -> Result<CaseDescriptor> {
        let case = self
            .store
            .fetch_case(&CaseId::new(args.case_id.as_str()))
            .await?;
        Ok(CaseDescriptor::new(case))
    }

    /// Fetch the case and bind a controller to an existing step of it.
    async fn bind(
        &self,
        args: &StepRefArgs,
        strategy: FormStep,
        has_access: bool,
    ) -> Result<StepController<FormStep>> {
        let descriptor = self.fetch_descriptor(args).await?;
        let step_id = StepId::new(args.step_id.as_str());
        if descriptor.step(&step_id).is_none() {
            return Err(CaseflowError::StepNotFound {
                case_id: descriptor.case_id().clone(),
                step_id,
            }
            .into());
        }

        debug!(
            "Binding step '{step_id}' of case {} (access: {has_access})",
            descriptor.case_id()
        );
        Ok(StepController::new(strategy, descriptor, has_access))
    }

    /// Render the outcome; failed or invalid submissions exit non-zero.
    fn report(&self, outcome: &StepOutcome, state: &ControllerState) -> Result<()> {
        self.renderer.render(&format!("{outcome}\n- State: {state}\n"));
        match outcome {
            StepOutcome::Failed(failure) => bail!("{failure}"),
            StepOutcome::Invalid(errors) => bail!("{errors}"),
            _ => Ok(()),
        }
    }
}
