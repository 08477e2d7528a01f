//! Data models for cases, steps and form values.
//!
//! These are the plain data types shared by the store, the case descriptor
//! and the step controller. Display implementations live in
//! [`crate::display::models`].
//!
//! # Examples
//!
//! ```rust
//! use caseflow_core::models::{CaseStatus, Step};
//! use serde_json::json;
//!
//! let step = Step::new("vehicle", "Vehicle Details")
//!     .current()
//!     .with_data(json!({ "vin": "1FMCU9J98FUA12345" }));
//!
//! assert!(step.is_current_step);
//! assert!(!step.is_pending());
//! assert!("Closed".parse::<CaseStatus>().unwrap().is_closed());
//! ```

pub mod case;
pub mod form;
pub mod ids;
pub mod status;
pub mod step;
pub mod summary;


pub use case::Case;
pub use form::{populate_fields, FieldKind, FieldSpec, FormValues};
pub use ids::{CaseId, StepId};
pub use status::CaseStatus;
pub use step::Step;
pub use summary::CaseSummary;
