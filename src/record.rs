//! Record types flowing through the pipeline.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One structured position reading from the upstream source.
///
/// The upstream payload is an open-ended mapping of field name to value.
/// Only `latitude` and `longitude` are interpreted; every other field is
/// opaque and passes through unmodified.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionRecord(Map<String, Value>);

impl PositionRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Latitude in floating-point degrees, if present and numeric
    pub fn latitude(&self) -> Option<f64> {
        self.0.get("latitude").and_then(Value::as_f64)
    }

    /// Longitude in floating-point degrees, if present and numeric
    pub fn longitude(&self) -> Option<f64> {
        self.0.get("longitude").and_then(Value::as_f64)
    }

    /// Look up an arbitrary field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Set a field, replacing any previous value
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    /// Number of fields in the record
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for PositionRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// A [`PositionRecord`] augmented with first-order rates of change.
///
/// The delta fields are `None` when no prior record existed to compare
/// against - explicitly distinguishable from a true zero-rate reading, and
/// serialized as JSON `null`. Values are degrees per second of elapsed
/// wall-clock time between arrivals. A degenerate zero-elapsed pair of
/// records yields a non-finite quotient, carried unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaRecord {
    /// The underlying position record, flattened into the serialized object
    #[serde(flatten)]
    pub record: PositionRecord,
    /// Rate of change of latitude versus the previous record
    pub latitude_delta: Option<f64>,
    /// Rate of change of longitude versus the previous record
    pub longitude_delta: Option<f64>,
}
