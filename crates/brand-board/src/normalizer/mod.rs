//! Reconciles brand and leaderboard records from every historical data shape
//! into one display record.

pub mod display;
pub mod shape;

pub use display::{DisplayBrand, ScoreCard, ScoreDimension};
pub use shape::SourceShape;

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

pub fn normalize(record: &Value) -> Result<DisplayBrand, NormalizeError> {
    let object = record
        .as_object()
        .ok_or_else(|| NormalizeError::NotAnObject(kind_of(record)))?;
    Ok(SourceShape::detect(object).adapt(object))
}

/// Normalize an array of records, or a single record, from an export file.
pub fn normalize_document(document: &Value) -> Result<Vec<DisplayBrand>, NormalizeError> {
    match document {
        Value::Array(records) => records.iter().map(normalize).collect(),
        other => normalize(other).map(|card| vec![card]),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
