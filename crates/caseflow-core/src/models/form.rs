//! Form values and field descriptions used to populate local form state.

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Mapping of field id to its current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(Map<String, Value>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build form values from a JSON object. Non-object values yield an empty
    /// mapping.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self(map.clone()),
            _ => Self::default(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: Value) -> Self {
        self.0.insert(field.into(), value);
        self
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl Deref for FormValues {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for FormValues {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Map<String, Value>> for FormValues {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Input type of a form field; decides the neutral value used when the
/// server has nothing for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Boolean,
    Date,
    Select,
    MultiSelect,
}

impl FieldKind {
    /// Empty value for this kind. Never absent, so controlled inputs always
    /// have a defined value.
    pub fn neutral(self) -> Value {
        match self {
            FieldKind::Text | FieldKind::Date => Value::String(String::new()),
            FieldKind::Number | FieldKind::Select => Value::Null,
            FieldKind::Boolean => Value::Bool(false),
            FieldKind::MultiSelect => Value::Array(Vec::new()),
        }
    }
}

/// Describes one form field bound to a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field id in local form values
    pub id: String,
    pub kind: FieldKind,
    /// Key in the step payload when it differs from `id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl FieldSpec {
    pub fn new(id: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            kind,
            source: None,
        }
    }

    pub fn text(id: impl Into<String>) -> Self {
        Self::new(id, FieldKind::Text)
    }

    pub fn select(id: impl Into<String>) -> Self {
        Self::new(id, FieldKind::Select)
    }

    /// Read the value from a differently named payload key.
    pub fn from_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Payload key this field is read from.
    pub fn source_key(&self) -> &str {
        self.source.as_deref().unwrap_or(&self.id)
    }

    /// Resolve this field's value from a step payload, falling back to the
    /// kind's neutral value for absent or null entries.
    pub fn resolve(&self, step_data: Option<&Value>) -> Value {
        match step_data.and_then(|data| data.get(self.source_key())) {
            Some(Value::Null) | None => self.kind.neutral(),
            Some(value) => value.clone(),
        }
    }
}

/// Populate form values field by field from a step payload.
pub fn populate_fields(fields: &[FieldSpec], step_data: Option<&Value>) -> FormValues {
    fields
        .iter()
        .map(|field| (field.id.clone(), field.resolve(step_data)))
        .collect()
}
