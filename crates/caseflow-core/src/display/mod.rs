//! Markdown formatting for cases, steps and controller outcomes.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! collections and operation feedback get small wrapper types so the same
//! data can be formatted per context. Everything renders to markdown, which
//! the CLI's terminal renderer turns into styled output.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │    Wrappers     │    │    Markdown     │
//! │  (Case, Step)   │───▶│ (Cases, status) │───▶│     Output      │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! - [`collections`]: [`Cases`], a listing of case summaries
//! - [`status`]: [`OperationStatus`] success/failure messages
//! - [`datetime`]: [`LocalDateTime`] timestamps in the system time zone
//! - [`models`]: Display impls for models and controller types
//!
//! ```rust
//! use caseflow_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Case CASE-000001 closed");
//! assert!(status.to_string().starts_with("Success:"));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod status;

pub use collections::Cases;
pub use datetime::LocalDateTime;
pub use status::OperationStatus;
