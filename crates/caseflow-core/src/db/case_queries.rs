//! Case CRUD operations and queries.

use jiff::Timestamp;
use log::debug;
use rusqlite::{params, types::Type, OptionalExtension};

use crate::{
    error::{CaseflowError, DatabaseResultExt, Result},
    models::{Case, CaseId, CaseStatus},
    params::StepDefinition,
};

const INSERT_CASE_SQL: &str =
    "INSERT INTO cases (case_type, case_status, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)";
const ASSIGN_CASE_ID_SQL: &str = "UPDATE cases SET case_id = ?1 WHERE id = ?2";
const INSERT_STEP_SQL: &str = "INSERT INTO steps (case_row, step_id, step_name, step_order, is_current) VALUES (?1, ?2, ?3, ?4, ?5)";
const SELECT_CASE_SQL: &str =
    "SELECT id, case_id, case_type, case_status, created_at, updated_at FROM cases WHERE case_id = ?1";
const SELECT_OPEN_CASES_SQL: &str = "SELECT id, case_id, case_type, case_status, created_at, updated_at FROM cases WHERE case_status != 'Closed' ORDER BY id";
const SELECT_ALL_CASES_SQL: &str =
    "SELECT id, case_id, case_type, case_status, created_at, updated_at FROM cases ORDER BY id";
const SELECT_CASE_ROW_SQL: &str = "SELECT id, case_status FROM cases WHERE case_id = ?1";
const CLOSE_CASE_SQL: &str =
    "UPDATE cases SET case_status = 'Closed', updated_at = ?1 WHERE id = ?2";
const CLEAR_CURRENT_SQL: &str = "UPDATE steps SET is_current = 0 WHERE case_row = ?1";

/// Case row without its steps.
struct CaseRow {
    row_id: i64,
    case: Case,
}

impl super::Database {
    /// Helper function to construct a case (without steps) from a row
    fn build_case_from_row(row: &rusqlite::Row) -> rusqlite::Result<CaseRow> {
        let parse_timestamp = |index: usize| -> rusqlite::Result<Timestamp> {
            row.get::<_, String>(index)?
                .parse::<Timestamp>()
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
        };

        Ok(CaseRow {
            row_id: row.get(0)?,
            case: Case {
                case_id: CaseId::new(row.get::<_, String>(1)?),
                case_type: row.get(2)?,
                case_status: row
                    .get::<_, String>(3)?
                    .parse::<CaseStatus>()
                    .unwrap_or_default(),
                steps: Vec::new(),
                created_at: parse_timestamp(4)?,
                updated_at: parse_timestamp(5)?,
            },
        })
    }

    /// Creates a case with all of its steps. The first step starts current.
    pub fn create_case(&mut self, case_type: &str, steps: &[StepDefinition]) -> Result<Case> {
        let now = Timestamp::now().to_string();
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to start transaction")?;

        tx.execute(
            INSERT_CASE_SQL,
            params![case_type, CaseStatus::Open.as_str(), now],
        )
        .db_context("Failed to insert case")?;
        let row_id = tx.last_insert_rowid();
        let case_id = CaseId::from_row_id(row_id);

        tx.execute(ASSIGN_CASE_ID_SQL, params![case_id.as_str(), row_id])
            .db_context("Failed to assign case id")?;

        for (order, step) in steps.iter().enumerate() {
            tx.execute(
                INSERT_STEP_SQL,
                params![
                    row_id,
                    step.step_id.as_str(),
                    step.step_name,
                    order as i64,
                    order == 0
                ],
            )
            .db_context("Failed to insert step")?;
        }

        tx.commit().db_context("Failed to commit case creation")?;
        debug!("Created case {case_id} with {} steps", steps.len());

        self.get_case(&case_id)?
            .ok_or(CaseflowError::CaseNotFound { id: case_id })
    }

    /// Retrieves a case and its steps by case id.
    pub fn get_case(&self, case_id: &CaseId) -> Result<Option<Case>> {
        let row = self
            .connection
            .query_row(SELECT_CASE_SQL, params![case_id.as_str()], Self::build_case_from_row)
            .optional()
            .db_context("Failed to get case")?;

        match row {
            Some(CaseRow { row_id, mut case }) => {
                case.steps = self.get_steps(row_id)?;
                Ok(Some(case))
            }
            None => Ok(None),
        }
    }

    /// Lists cases in creation order, optionally including closed ones.
    pub fn list_cases(&self, include_closed: bool) -> Result<Vec<Case>> {
        let sql = if include_closed {
            SELECT_ALL_CASES_SQL
        } else {
            SELECT_OPEN_CASES_SQL
        };

        let mut stmt = self
            .connection
            .prepare(sql)
            .db_context("Failed to prepare case listing")?;
        let rows = stmt
            .query_map([], Self::build_case_from_row)
            .db_context("Failed to list cases")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read case rows")?;

        rows.into_iter()
            .map(|CaseRow { row_id, mut case }| {
                case.steps = self.get_steps(row_id)?;
                Ok(case)
            })
            .collect()
    }

    /// Closes a case; no step remains current afterwards.
    pub fn close_case(&mut self, case_id: &CaseId) -> Result<()> {
        let (row_id, status) = self.case_row(case_id)?;
        if status.is_closed() {
            return Err(CaseflowError::CaseClosed { id: case_id.clone() });
        }

        let now = Timestamp::now().to_string();
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to start transaction")?;
        tx.execute(CLEAR_CURRENT_SQL, params![row_id])
            .db_context("Failed to clear current step")?;
        tx.execute(CLOSE_CASE_SQL, params![now, row_id])
            .db_context("Failed to close case")?;
        tx.commit().db_context("Failed to commit case close")?;

        debug!("Closed case {case_id}");
        Ok(())
    }

    /// Internal row id and status for a case.
    pub(super) fn case_row(&self, case_id: &CaseId) -> Result<(i64, CaseStatus)> {
        self.connection
            .query_row(SELECT_CASE_ROW_SQL, params![case_id.as_str()], |row| {
                let status: String = row.get(1)?;
                Ok((row.get(0)?, status.parse::<CaseStatus>().unwrap_or_default()))
            })
            .optional()
            .db_context("Failed to look up case")?
            .ok_or_else(|| CaseflowError::CaseNotFound { id: case_id.clone() })
    }
}
