//! Collection wrapper types for displaying groups of cases.

use std::{fmt, ops::Index};

use crate::models::{Case, CaseSummary};

/// Newtype wrapper for displaying a listing of case summaries.
///
/// # Examples
///
/// ```rust
/// use caseflow_core::{
///     display::Cases,
///     models::{Case, CaseStatus, Step},
/// };
/// use jiff::Timestamp;
///
/// let case = Case {
///     case_id: "CASE-000001".into(),
///     case_type: "new_lease".to_string(),
///     case_status: CaseStatus::Open,
///     steps: vec![Step::new("lease_details", "Lease Details").current()],
///     created_at: Timestamp::now(),
///     updated_at: Timestamp::now(),
/// };
///
/// let cases = Cases::from(vec![case]);
/// let output = cases.to_string();
/// assert!(output.contains("CASE-000001"));
/// assert!(output.contains("Lease Details"));
/// ```
pub struct Cases(pub Vec<CaseSummary>);

impl Cases {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CaseSummary> {
        self.0.iter()
    }
}

impl From<Vec<Case>> for Cases {
    fn from(cases: Vec<Case>) -> Self {
        Self(cases.iter().map(CaseSummary::from).collect())
    }
}

impl Index<usize> for Cases {
    type Output = CaseSummary;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Cases {
    type Item = &'a CaseSummary;
    type IntoIter = std::slice::Iter<'a, CaseSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Cases {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No cases found.");
        }
        for case in &self.0 {
            write!(f, "{case}")?;
        }
        Ok(())
    }
}
