//! Builder for creating and configuring CaseStore instances.

use std::path::{Path, PathBuf};

use log::debug;
use tokio::task;

use super::CaseStore;
use crate::{
    db::Database,
    error::{CaseflowError, JoinResultExt, Result},
};

/// Builder for creating and configuring CaseStore instances.
#[derive(Debug, Clone, Default)]
pub struct CaseStoreBuilder {
    database_path: Option<PathBuf>,
}

impl CaseStoreBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/caseflow/caseflow.db` or
    /// `~/.local/share/caseflow/caseflow.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Builds the configured store, creating and migrating the database.
    ///
    /// # Errors
    ///
    /// Returns `CaseflowError::FileSystem` if the database directory cannot
    /// be created and `CaseflowError::Database` if initialization fails.
    pub async fn build(self) -> Result<CaseStore> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CaseflowError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        debug!("Initializing case database at {}", db_path.display());
        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || Database::new(&db_path_clone).map(|_| ()))
            .await
            .join_context()?;

        Ok(CaseStore::new(db_path))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("caseflow")
            .place_data_file("caseflow.db")
            .map_err(|e| CaseflowError::XdgDirectory(e.to_string()))
    }
}
