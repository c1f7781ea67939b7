use std::fs;
use std::path::Path;

use log::{info, Level};
use logging_timer::timer;
use serde_json::{Map, Value};

use crate::db::{ReplaceCounts, StoreHandle};
use crate::error::DashboardError;

/// The demo alert set loaded by `soc-dashboard seed`.
const FIXTURE: &str = include_str!("../assets/seed_alerts.json");

pub fn fixture_documents() -> Result<Vec<Map<String, Value>>, DashboardError> {
    parse_fixture(FIXTURE)
}

pub fn load_fixture(path: &Path) -> Result<Vec<Map<String, Value>>, DashboardError> {
    let text = fs::read_to_string(path)?;
    parse_fixture(&text)
}

/// A fixture is a JSON array whose every element is an object.
pub fn parse_fixture(text: &str) -> Result<Vec<Map<String, Value>>, DashboardError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(items) = value else {
        return Err(DashboardError::Error(
            "fixture must be a JSON array of alert documents".to_string(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(DashboardError::Error(format!(
                "fixture entry {} is not an object: {}",
                i, other
            ))),
        })
        .collect()
}

/// Empties the alerts collection and inserts `documents` in their given
/// order. Both steps commit together.
pub fn seed_alerts(
    store: &StoreHandle,
    documents: &[Map<String, Value>],
) -> Result<ReplaceCounts, DashboardError> {
    let _tmr = timer!(Level::Trace; "seed_alerts", "{} documents", documents.len());

    let alerts = store.alerts();
    let counts = alerts.replace_all(documents)?;
    info!(
        "Seeded {}.{}: removed {} existing alerts, inserted {}",
        store.name(),
        alerts.name(),
        counts.deleted,
        counts.inserted
    );
    Ok(counts)
}
