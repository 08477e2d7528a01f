use caseflow_core::{
    params::{CreateCase, StepDefinition},
    Case, CaseStore, CaseStoreBuilder,
};
use tempfile::TempDir;

/// Helper function to create a store over a temporary database
pub async fn create_test_store() -> (TempDir, CaseStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let store = CaseStoreBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create store");
    (temp_dir, store)
}

/// Creates a case whose steps are named after their ids.
pub async fn create_case(store: &CaseStore, case_type: &str, step_ids: &[&str]) -> Case {
    store
        .create_case(&CreateCase {
            case_type: case_type.to_string(),
            steps: step_ids
                .iter()
                .map(|id| StepDefinition::new(*id, id.replace('_', " ")))
                .collect(),
        })
        .await
        .expect("Failed to create case")
}
