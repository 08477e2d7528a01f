//! Step queries: loading, processing and moving the current step.

use jiff::Timestamp;
use log::debug;
use rusqlite::{params, types::Type, OptionalExtension};
use serde_json::Value;

use crate::{
    error::{CaseflowError, DatabaseResultExt, Result},
    models::{CaseId, Step, StepId},
};

const SELECT_STEPS_SQL: &str = "SELECT step_id, step_name, is_current, step_data, processed_at FROM steps WHERE case_row = ?1 ORDER BY step_order";
const UPDATE_STEP_DATA_SQL: &str = "UPDATE steps SET step_data = ?1, processed_at = ?2 WHERE case_row = ?3 AND step_id = ?4";
const SELECT_CURRENT_STEP_SQL: &str =
    "SELECT step_order FROM steps WHERE case_row = ?1 AND is_current = 1 ORDER BY step_order LIMIT 1";
const SELECT_NEXT_STEP_SQL: &str = "SELECT id, step_id FROM steps WHERE case_row = ?1 AND step_order > ?2 ORDER BY step_order LIMIT 1";
const CLEAR_CURRENT_SQL: &str = "UPDATE steps SET is_current = 0 WHERE case_row = ?1";
const SET_CURRENT_SQL: &str = "UPDATE steps SET is_current = 1 WHERE id = ?1";
const TOUCH_CASE_SQL: &str = "UPDATE cases SET updated_at = ?1 WHERE id = ?2";
const CLOSE_CASE_SQL: &str =
    "UPDATE cases SET case_status = 'Closed', updated_at = ?1 WHERE id = ?2";

impl super::Database {
    /// Helper function to construct a Step from a database row
    fn build_step_from_row(row: &rusqlite::Row) -> rusqlite::Result<Step> {
        let step_data = row
            .get::<_, Option<String>>(3)?
            .map(|raw| serde_json::from_str::<Value>(&raw))
            .transpose()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

        let processed_at = row
            .get::<_, Option<String>>(4)?
            .map(|raw| raw.parse::<Timestamp>())
            .transpose()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

        Ok(Step {
            step_id: StepId::new(row.get::<_, String>(0)?),
            step_name: row.get(1)?,
            is_current_step: row.get(2)?,
            step_data,
            processed_at,
        })
    }

    /// Retrieves the steps of a case in process order.
    pub(super) fn get_steps(&self, case_row: i64) -> Result<Vec<Step>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_STEPS_SQL)
            .db_context("Failed to prepare step query")?;
        let steps = stmt
            .query_map(params![case_row], Self::build_step_from_row)
            .db_context("Failed to query steps")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read step rows")?;
        Ok(steps)
    }

    /// Persists a step's payload. The current step is left untouched.
    pub fn process_step(&mut self, case_id: &CaseId, step_id: &StepId, data: &Value) -> Result<()> {
        let (row_id, status) = self.case_row(case_id)?;
        if status.is_closed() {
            return Err(CaseflowError::CaseClosed { id: case_id.clone() });
        }

        let now = Timestamp::now().to_string();
        let payload = serde_json::to_string(data)?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to start transaction")?;
        let updated = tx
            .execute(
                UPDATE_STEP_DATA_SQL,
                params![payload, now, row_id, step_id.as_str()],
            )
            .db_context("Failed to update step data")?;
        if updated == 0 {
            return Err(CaseflowError::StepNotFound {
                case_id: case_id.clone(),
                step_id: step_id.clone(),
            });
        }
        tx.execute(TOUCH_CASE_SQL, params![now, row_id])
            .db_context("Failed to update case timestamp")?;
        tx.commit().db_context("Failed to commit step data")?;

        debug!("Processed step '{step_id}' of case {case_id}");
        Ok(())
    }

    /// Moves the current flag to the next step in order. Moving past the last
    /// step closes the case. Returns the new current step id, if any.
    pub fn move_case(&mut self, case_id: &CaseId) -> Result<Option<StepId>> {
        let (row_id, status) = self.case_row(case_id)?;
        if status.is_closed() {
            return Err(CaseflowError::CaseClosed { id: case_id.clone() });
        }

        let now = Timestamp::now().to_string();
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to start transaction")?;

        let current_order: i64 = tx
            .query_row(SELECT_CURRENT_STEP_SQL, params![row_id], |row| row.get(0))
            .optional()
            .db_context("Failed to find current step")?
            .ok_or_else(|| CaseflowError::NoCurrentStep { id: case_id.clone() })?;

        let next: Option<(i64, String)> = tx
            .query_row(SELECT_NEXT_STEP_SQL, params![row_id, current_order], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .optional()
            .db_context("Failed to find next step")?;

        tx.execute(CLEAR_CURRENT_SQL, params![row_id])
            .db_context("Failed to clear current step")?;

        let new_current = match next {
            Some((next_row, next_step_id)) => {
                tx.execute(SET_CURRENT_SQL, params![next_row])
                    .db_context("Failed to set current step")?;
                tx.execute(TOUCH_CASE_SQL, params![now, row_id])
                    .db_context("Failed to update case timestamp")?;
                Some(StepId::new(next_step_id))
            }
            None => {
                tx.execute(CLOSE_CASE_SQL, params![now, row_id])
                    .db_context("Failed to close case")?;
                None
            }
        };

        tx.commit().db_context("Failed to commit case move")?;

        match &new_current {
            Some(step_id) => debug!("Moved case {case_id} to step '{step_id}'"),
            None => debug!("Moved case {case_id} past its last step; case closed"),
        }
        Ok(new_current)
    }
}
