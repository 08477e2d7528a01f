//! Core library for caseflow, a case step-progression engine.
//!
//! A *case* is a multi-step business process (a new lease, a driver payee
//! update, an address change) whose ordered steps live in a server-held
//! store. Each step-bound component drives one step through the same
//! protocol: populate a form from the step's data, `process` the payload,
//! then `move` the case to its next step when every gate passes, and reload.
//!
//! The crate is organized as:
//!
//! - [`models`]: cases, steps, ids and form values
//! - [`descriptor`]: tolerant parsing and lookups over a case payload
//! - [`binding`]: what a step-bound component sees of its case
//! - [`controller`]: the generic per-step state machine
//! - [`changes`]: manual-change detection between form values and a baseline
//! - [`store`]: the [`StepStore`] seam and its SQLite implementation
//! - [`display`]: markdown formatting for terminal output
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use caseflow_core::{
//!     controller::{FormStep, StepController},
//!     params::{CreateCase, StepDefinition},
//!     CaseStoreBuilder,
//! };
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = CaseStoreBuilder::new()
//!     .with_database_path(Some("cases.db"))
//!     .build()
//!     .await?;
//!
//! let case = store
//!     .create_case(&CreateCase {
//!         case_type: "address_update".to_string(),
//!         steps: vec![
//!             StepDefinition::new("address", "New Address"),
//!             StepDefinition::new("document", "Generate Document"),
//!         ],
//!     })
//!     .await?;
//!
//! let mut controller = StepController::new(FormStep::new("address"), case.into(), true);
//! controller.load();
//! controller.edit("city", json!("Astoria"));
//!
//! let outcome = controller.submit(&store).await;
//! println!("{outcome}");
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod changes;
pub mod controller;
pub mod db;
pub mod descriptor;
pub mod display;
pub mod error;
pub mod models;
pub mod params;
pub mod store;

pub use binding::StepBinding;
pub use changes::has_manual_changes;
pub use controller::{
    AccessScope, ControllerState, FormStep, Hold, StepController, StepOutcome, StepStrategy,
};
pub use db::Database;
pub use descriptor::{current_step, CaseDescriptor};
pub use display::{Cases, LocalDateTime, OperationStatus};
pub use error::{CaseflowError, Result, ValidationErrors};
pub use models::{Case, CaseId, CaseStatus, CaseSummary, FormValues, Step, StepId};
pub use params::{CreateCase, ListCases, StepDefinition};
pub use store::{CaseStore, CaseStoreBuilder, StepStore};
