//! Step data store: the trait the engine talks to and a SQLite-backed
//! implementation.
//!
//! The engine only ever needs three calls from the store: fetch a case,
//! process (persist) one step's payload, and move the case to its next step.
//! [`StepStore`] captures exactly that surface. [`CaseStore`] implements it on
//! top of [`crate::db::Database`] and adds the case lifecycle operations the
//! CLI needs (create, list, close).
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │ StepController  │    │   StepStore     │    │    Database     │
//! │ (process, move, │───▶│ (CaseStore or a │───▶│   (via db/)     │
//! │  reload)        │    │  remote client) │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use caseflow_core::{
//!     params::{CreateCase, StepDefinition},
//!     CaseStoreBuilder, StepStore,
//! };
//!
//! # async fn example() -> caseflow_core::Result<()> {
//! let store = CaseStoreBuilder::new()
//!     .with_database_path(Some("cases.db"))
//!     .build()
//!     .await?;
//!
//! let case = store
//!     .create_case(&CreateCase {
//!         case_type: "driver_payee".to_string(),
//!         steps: vec![
//!             StepDefinition::new("select_driver", "Select Driver"),
//!             StepDefinition::new("payee_details", "Payee Details"),
//!         ],
//!     })
//!     .await?;
//!
//! let fetched = store.fetch_case(&case.case_id).await?;
//! assert_eq!(fetched.steps.len(), 2);
//! # Ok(())
//! # }
//! ```

use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::Result,
    models::{Case, CaseId, StepId},
};

pub mod builder;
pub mod case_ops;


pub use builder::CaseStoreBuilder;

/// Operations the engine consumes from the server-held source of truth.
///
/// Results carry success or failure only; the engine never interprets the
/// payload a store returns for `process_step` or `move_case`.
#[async_trait]
pub trait StepStore: Send + Sync {
    /// Full case with its steps, used for the initial load and every reload.
    async fn fetch_case(&self, case_id: &CaseId) -> Result<Case>;

    /// Persist one step's business payload without changing the current
    /// step. Not idempotent: every call may have server-side side effects.
    async fn process_step(&self, case_id: &CaseId, step_id: &StepId, data: &Value) -> Result<()>;

    /// Advance the case's current step to the next one.
    async fn move_case(&self, case_id: &CaseId) -> Result<()>;
}

#[async_trait]
impl<T: StepStore + ?Sized> StepStore for Arc<T> {
    async fn fetch_case(&self, case_id: &CaseId) -> Result<Case> {
        (**self).fetch_case(case_id).await
    }

    async fn process_step(&self, case_id: &CaseId, step_id: &StepId, data: &Value) -> Result<()> {
        (**self).process_step(case_id, step_id, data).await
    }

    async fn move_case(&self, case_id: &CaseId) -> Result<()> {
        (**self).move_case(case_id).await
    }
}

/// SQLite-backed step data store.
pub struct CaseStore {
    pub(crate) db_path: PathBuf,
}

impl CaseStore {
    /// Creates a store over the specified database path.
    pub(crate) fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Path of the backing database file.
    pub fn database_path(&self) -> &std::path::Path {
        &self.db_path
    }
}
