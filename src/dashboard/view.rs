use log::{info, warn};
use serde_json::Value;

use crate::alerts::{Alert, Alerts};
use crate::db::StoreAccessor;
use crate::error::DashboardError;

use super::severity::{sort_by_severity, SeverityRank};

/// Where the dashboard gets its alert records from.
pub trait AlertSource {
    fn fetch_alerts(&self) -> Result<Vec<Value>, DashboardError>;
}

/// Reads through the same store pipeline as the alerts endpoint.
pub struct StoreAlertSource<'a> {
    store: &'a StoreAccessor,
}

impl<'a> StoreAlertSource<'a> {
    pub fn new(store: &'a StoreAccessor) -> Self {
        Self { store }
    }
}

impl AlertSource for StoreAlertSource<'_> {
    fn fetch_alerts(&self) -> Result<Vec<Value>, DashboardError> {
        let handle = self.store.get_handle()?;
        Alerts::list_newest_first(&handle)
    }
}

/// An alert as the dashboard holds it: the typed fields used for layout and
/// the record exactly as it arrived, for the raw dump.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEntry {
    pub alert: Alert,
    pub raw: Value,
}

impl AlertEntry {
    pub fn rank(&self) -> SeverityRank {
        SeverityRank::of(&self.alert.severity)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ViewState {
    List,
    /// Index into the sorted entries
    Detail(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub total: usize,
    /// One count per ranked severity, highest first
    pub by_rank: Vec<(SeverityRank, usize)>,
}

/// The list/detail dashboard. Records are fetched once when the view is
/// loaded; selecting and going back only move between them.
#[derive(Debug, Clone)]
pub struct DashboardView {
    entries: Vec<AlertEntry>,
    state: ViewState,
}

impl DashboardView {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            state: ViewState::List,
        }
    }

    /// One fetch. A failed fetch leaves the list empty; the failure is only
    /// logged.
    pub fn load(source: &dyn AlertSource) -> Self {
        match source.fetch_alerts() {
            Ok(records) => Self::from_records(records),
            Err(e) => {
                warn!("Dashboard could not load alerts, showing empty list: {}", e);
                Self::empty()
            }
        }
    }

    /// Builds the view from records in arrival order, then orders them by
    /// severity rank. Fields that are missing, `null` or mistyped show with
    /// default presentation; only records that are not JSON objects are
    /// skipped.
    pub fn from_records(records: Vec<Value>) -> Self {
        let mut entries: Vec<AlertEntry> = records
            .into_iter()
            .filter_map(|raw| match Alert::from_json(&raw) {
                Ok(alert) => Some(AlertEntry { alert, raw }),
                Err(e) => {
                    warn!("Skipping malformed alert record: {}", e);
                    None
                }
            })
            .collect();

        sort_by_severity(&mut entries, |entry| entry.alert.severity.as_str());
        info!("Dashboard loaded {} alerts", entries.len());

        Self {
            entries,
            state: ViewState::List,
        }
    }

    pub fn entries(&self) -> &[AlertEntry] {
        &self.entries
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Row activation. Only rows shown in the list can be activated, so this
    /// is a no-op outside the list state or for an index past the end.
    pub fn select(&mut self, index: usize) -> bool {
        if self.state == ViewState::List && index < self.entries.len() {
            self.state = ViewState::Detail(index);
            true
        } else {
            false
        }
    }

    pub fn selected(&self) -> Option<&AlertEntry> {
        match self.state {
            ViewState::List => None,
            ViewState::Detail(index) => self.entries.get(index),
        }
    }

    pub fn severity_counts(&self) -> SeverityCounts {
        let by_rank = SeverityRank::ranked()
            .map(|rank| {
                let count = self.entries.iter().filter(|e| e.rank() == rank).count();
                (rank, count)
            })
            .collect();

        SeverityCounts {
            total: self.entries.len(),
            by_rank,
        }
    }
}

// Page transitions back to the list happen in the browser script; these
// mirror them so the state machine can be exercised here.
#[cfg(test)]
impl DashboardView {
    pub fn back(&mut self) {
        self.state = ViewState::List;
    }

    /// The brand control always returns to the list.
    pub fn activate_brand(&mut self) {
        self.back();
    }
}
