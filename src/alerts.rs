use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::{Document, StoreHandle};
use crate::error::DashboardError;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Recommendation {
    #[serde(deserialize_with = "lenient")]
    pub action: String,
    #[serde(deserialize_with = "lenient_priority")]
    pub priority: i64,
}

/// Typed view of an alert document. A field that is missing, `null` or of
/// the wrong JSON type takes its default, so any object renders; the raw
/// JSON is kept alongside wherever the full record must be shown.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Alert {
    #[serde(rename = "_id", deserialize_with = "lenient")]
    pub id: String,
    #[serde(deserialize_with = "lenient")]
    pub alert_id: String,
    #[serde(deserialize_with = "lenient")]
    pub severity: String,
    #[serde(deserialize_with = "lenient")]
    pub category: String,
    #[serde(deserialize_with = "lenient")]
    pub confidence: f64,
    #[serde(deserialize_with = "lenient")]
    pub summary: String,
    #[serde(deserialize_with = "lenient")]
    pub is_true_positive: bool,
    #[serde(deserialize_with = "lenient")]
    pub ml_prediction: String,
    #[serde(deserialize_with = "lenient")]
    pub ml_confidence: f64,
    #[serde(deserialize_with = "lenient_strings")]
    pub mitre_techniques: Vec<String>,
    #[serde(deserialize_with = "lenient_recommendations")]
    pub recommendations: Vec<Recommendation>,
}

impl Alert {
    /// Fails only when `value` is not a JSON object.
    pub fn from_json(value: &Value) -> Result<Self, DashboardError> {
        if !value.is_object() {
            return Err(DashboardError::Error(format!(
                "alert record is not a JSON object: {}",
                value
            )));
        }
        Ok(Alert::deserialize(value)?)
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Whole-number floats such as `1.0` count as integers.
fn lenient_priority<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let priority = match value.as_i64() {
        Some(n) => n,
        None => value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
            .unwrap_or_default(),
    };
    Ok(priority)
}

/// Non-string entries are dropped; the rest keep their order.
fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect())
}

/// Entries that are not objects are dropped; object entries are read leniently.
fn lenient_recommendations<'de, D>(deserializer: D) -> Result<Vec<Recommendation>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| Recommendation::deserialize(item).ok())
        .collect())
}

pub struct Alerts;

impl Alerts {
    /// Reads the whole alerts collection, newest first, as the JSON the
    /// endpoint returns: each document with its `_id` stringified.
    pub fn list_newest_first(store: &StoreHandle) -> Result<Vec<Value>, DashboardError> {
        let documents = store.alerts().find_all_newest_first()?;
        Ok(documents.into_iter().map(Document::into_json).collect())
    }
}
