use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Errors that can occur while reading records
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Invalid JSON format: {0}")]
    InvalidJson(String),
    #[error("Record is missing a numeric id")]
    MissingId,
    #[error("Stored record does not match its model: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A persisted row: surrogate id plus its column values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: i64, fields: Map<String, Value>) -> Self {
        let mut fields = fields;
        fields.remove("id");
        Self { id, fields }
    }

    /// Build from a `row_to_json` object (or any JSON object carrying `id`)
    pub fn from_row(row: Value) -> Result<Self, RecordError> {
        match row {
            Value::Object(mut map) => {
                let id = map
                    .remove("id")
                    .and_then(|v| v.as_i64())
                    .ok_or(RecordError::MissingId)?;
                Ok(Self { id, fields: map })
            }
            other => Err(RecordError::InvalidJson(format!("expected object row, got {}", other))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        if key == "id" {
            return None;
        }
        self.fields.get(key).filter(|v| !v.is_null())
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Deserialize the stored columns into a typed model
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, RecordError> {
        Ok(serde_json::from_value(Value::Object(self.fields.clone()))?)
    }

    /// JSON shape returned to API clients: `id` first, then columns
    pub fn to_api_output(&self) -> Value {
        let mut out = Map::with_capacity(self.fields.len() + 1);
        out.insert("id".to_string(), Value::from(self.id));
        for (key, value) in &self.fields {
            out.insert(key.clone(), value.clone());
        }
        Value::Object(out)
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Record(id: {}, fields: {})", self.id, self.fields.len())
    }
}
