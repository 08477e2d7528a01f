//! Case operations for the CaseStore.

use async_trait::async_trait;
use log::info;
use serde_json::Value;
use tokio::task;

use super::{CaseStore, StepStore};
use crate::{
    db::Database,
    error::{CaseflowError, JoinResultExt, Result},
    models::{Case, CaseId, StepId},
    params::{CreateCase, ListCases},
};

impl CaseStore {
    /// Creates a case with every step up front; the first step is current.
    pub async fn create_case(&self, params: &CreateCase) -> Result<Case> {
        params.validate()?;

        let db_path = self.db_path.clone();
        let case_type = params.case_type.clone();
        let steps = params.steps.clone();

        let case = task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.create_case(&case_type, &steps)
        })
        .await
        .join_context()?;

        info!("Created case {} ({})", case.case_id, case.case_type);
        Ok(case)
    }

    /// Retrieves a case by id, `None` if it does not exist.
    pub async fn get_case(&self, case_id: &CaseId) -> Result<Option<Case>> {
        let db_path = self.db_path.clone();
        let case_id = case_id.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_case(&case_id)
        })
        .await
        .join_context()
    }

    /// Lists cases, open ones only unless `include_closed` is set.
    pub async fn list_cases(&self, params: &ListCases) -> Result<Vec<Case>> {
        let db_path = self.db_path.clone();
        let include_closed = params.include_closed;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.list_cases(include_closed)
        })
        .await
        .join_context()
    }

    /// Closes a case regardless of its current step.
    pub async fn close_case(&self, case_id: &CaseId) -> Result<()> {
        let db_path = self.db_path.clone();
        let case_id = case_id.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.close_case(&case_id)
        })
        .await
        .join_context()
    }

    /// Advances a case and reports the new current step (`None` once the
    /// case has closed).
    pub async fn advance_case(&self, case_id: &CaseId) -> Result<Option<StepId>> {
        let db_path = self.db_path.clone();
        let case_id = case_id.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.move_case(&case_id)
        })
        .await
        .join_context()
    }
}

#[async_trait]
impl StepStore for CaseStore {
    async fn fetch_case(&self, case_id: &CaseId) -> Result<Case> {
        self.get_case(case_id)
            .await?
            .ok_or_else(|| CaseflowError::CaseNotFound { id: case_id.clone() })
    }

    async fn process_step(&self, case_id: &CaseId, step_id: &StepId, data: &Value) -> Result<()> {
        let db_path = self.db_path.clone();
        let case_id = case_id.clone();
        let step_id = step_id.clone();
        let data = data.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.process_step(&case_id, &step_id, &data)
        })
        .await
        .join_context()
    }

    async fn move_case(&self, case_id: &CaseId) -> Result<()> {
        self.advance_case(case_id).await.map(|_| ())
    }
}
