use caseflow_core::{
    params::StepDefinition, CaseId, CaseStatus, CaseflowError, Database, StepId,
};
use serde_json::json;
use tempfile::NamedTempFile;

/// Helper function to create a temporary database for testing
fn create_test_db() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let db = Database::new(temp_file.path()).expect("Failed to create test database");
    (temp_file, db)
}

fn steps(ids: &[&str]) -> Vec<StepDefinition> {
    ids.iter().map(|id| StepDefinition::new(*id, *id)).collect()
}

#[test]
fn test_database_initialization() {
    let (temp_file, _db) = create_test_db();
    assert!(temp_file.path().exists());
}

#[test]
fn test_reopening_keeps_data() {
    let (temp_file, mut db) = create_test_db();
    let case = db
        .create_case("new_lease", &steps(&["details"]))
        .expect("Failed to create case");
    drop(db);

    let db = Database::new(temp_file.path()).expect("Failed to reopen database");
    let fetched = db
        .get_case(&case.case_id)
        .expect("Failed to get case")
        .expect("Case should exist");
    assert_eq!(fetched.case_type, "new_lease");
}

#[test]
fn test_case_ids_follow_row_order() {
    let (_temp_file, mut db) = create_test_db();

    let first = db
        .create_case("new_lease", &steps(&["a"]))
        .expect("Failed to create case");
    let second = db
        .create_case("new_lease", &steps(&["a"]))
        .expect("Failed to create case");

    assert_eq!(first.case_id, "CASE-000001");
    assert_eq!(second.case_id, "CASE-000002");
}

#[test]
fn test_steps_keep_creation_order() {
    let (_temp_file, mut db) = create_test_db();

    let case = db
        .create_case("driver_payee", &steps(&["select_driver", "payee_details", "review"]))
        .expect("Failed to create case");

    let ids: Vec<&str> = case.steps.iter().map(|step| step.step_id.as_str()).collect();
    assert_eq!(ids, ["select_driver", "payee_details", "review"]);
    assert_eq!(case.steps.iter().filter(|step| step.is_current_step).count(), 1);
}

#[test]
fn test_process_then_move() {
    let (_temp_file, mut db) = create_test_db();
    let case = db
        .create_case("address_update", &steps(&["address", "document"]))
        .expect("Failed to create case");

    db.process_step(&case.case_id, &StepId::new("address"), &json!({ "city": "Bronx" }))
        .expect("Failed to process step");
    let next = db.move_case(&case.case_id).expect("Failed to move case");
    assert_eq!(next, Some(StepId::new("document")));

    let fetched = db
        .get_case(&case.case_id)
        .expect("Failed to get case")
        .expect("Case should exist");
    assert_eq!(fetched.steps[0].step_data, Some(json!({ "city": "Bronx" })));
    assert!(!fetched.steps[0].is_current_step);
    assert!(fetched.steps[1].is_current_step);
    assert_eq!(fetched.case_status, CaseStatus::Open);
}

#[test]
fn test_reprocessing_overwrites_payload() {
    let (_temp_file, mut db) = create_test_db();
    let case = db
        .create_case("address_update", &steps(&["address"]))
        .expect("Failed to create case");
    let step = StepId::new("address");

    db.process_step(&case.case_id, &step, &json!({ "city": "Bronx" }))
        .expect("Failed to process step");
    db.process_step(&case.case_id, &step, &json!({ "city": "Queens" }))
        .expect("Failed to process step");

    let fetched = db
        .get_case(&case.case_id)
        .expect("Failed to get case")
        .expect("Case should exist");
    assert_eq!(fetched.steps[0].step_data, Some(json!({ "city": "Queens" })));
}

#[test]
fn test_missing_case_errors() {
    let (_temp_file, mut db) = create_test_db();
    let missing = CaseId::new("CASE-000042");

    assert!(db.get_case(&missing).expect("Query failed").is_none());
    assert!(matches!(
        db.move_case(&missing),
        Err(CaseflowError::CaseNotFound { .. })
    ));
    assert!(matches!(
        db.close_case(&missing),
        Err(CaseflowError::CaseNotFound { .. })
    ));
}

#[test]
fn test_list_cases_includes_steps() {
    let (_temp_file, mut db) = create_test_db();
    db.create_case("new_lease", &steps(&["a", "b"]))
        .expect("Failed to create case");
    let closed = db
        .create_case("new_lease", &steps(&["a"]))
        .expect("Failed to create case");
    db.close_case(&closed.case_id).expect("Failed to close case");

    let open = db.list_cases(false).expect("Failed to list cases");
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].steps.len(), 2);

    let all = db.list_cases(true).expect("Failed to list cases");
    assert_eq!(all.len(), 2);
    assert!(all[1].is_closed());
}
