//! Local form state: live values plus the server-confirmed baseline.

use serde_json::Value;

use crate::{changes::has_manual_changes, models::FormValues};

/// Values being edited alongside the snapshot taken at the last server read.
///
/// The baseline is only ever replaced wholesale by [`LocalFormState::populate`];
/// user edits touch `values` alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalFormState {
    values: FormValues,
    baseline: FormValues,
}

impl LocalFormState {
    /// Replace values and baseline after a fresh server read.
    pub fn populate(&mut self, values: FormValues) {
        self.baseline = values.clone();
        self.values = values;
    }

    /// Record a user edit.
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.values.insert(field.into(), value);
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn baseline(&self) -> &FormValues {
        &self.baseline
    }

    pub fn has_manual_changes(&self) -> bool {
        has_manual_changes(&self.values, &self.baseline)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_edits_do_not_touch_baseline() {
        let mut form = LocalFormState::default();
        form.populate(FormValues::new().with("city", json!("Queens")));

        form.set("city", json!("Brooklyn"));

        assert_eq!(form.values().get("city"), Some(&json!("Brooklyn")));
        assert_eq!(form.baseline().get("city"), Some(&json!("Queens")));
        assert!(form.has_manual_changes());
    }

    #[test]
    fn test_populate_retakes_baseline() {
        let mut form = LocalFormState::default();
        form.populate(FormValues::new().with("city", json!("Queens")));
        form.set("city", json!("Brooklyn"));

        form.populate(FormValues::new().with("city", json!("Brooklyn")));

        assert!(!form.has_manual_changes());
        assert_eq!(form.baseline(), form.values());
    }
}
