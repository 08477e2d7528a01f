//! Database operations and SQLite management for cases and steps.
//!
//! This module provides the low-level persistence behind
//! [`crate::store::CaseStore`]. It handles SQLite connections, schema
//! management, and the case and step queries.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod case_queries;
pub mod migrations;
pub mod step_queries;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
