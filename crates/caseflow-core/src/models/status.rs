//! Case status enumeration.

use std::{convert::Infallible, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lifecycle status of a case.
///
/// Transitions are owned by the step data store; the engine only reads the
/// value. Statuses other than `Open` and `Closed` are carried through
/// verbatim so newer server states do not break decoding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CaseStatus {
    /// Case is awaiting action on its current step
    #[default]
    Open,

    /// Case is finished; no step requires action
    Closed,

    /// Any other status reported by the store
    Other(String),
}

impl CaseStatus {
    /// Convert to the database string representation
    pub fn as_str(&self) -> &str {
        match self {
            CaseStatus::Open => "Open",
            CaseStatus::Closed => "Closed",
            CaseStatus::Other(other) => other,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, CaseStatus::Closed)
    }
}

impl FromStr for CaseStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "open" => CaseStatus::Open,
            "closed" => CaseStatus::Closed,
            _ => CaseStatus::Other(s.trim().to_string()),
        })
    }
}

impl Serialize for CaseStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CaseStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_default())
    }
}
