use axum::{
    extract::{Query, State},
    response::Html,
};
use log::{debug, error};
use serde::Deserialize;

use crate::dashboard::{render_page, DashboardView, StoreAlertSource};

use super::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Position in the severity-ordered list to open in detail. Anything
    /// that is not a valid position leaves the page on the list.
    pub alert: Option<String>,
}

/// GET /
/// The dashboard page, in list state unless `?alert=N` names a row. A store
/// failure renders the page with an empty list.
pub async fn dashboard_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    let store = state.store.clone();

    let mut view = tokio::task::spawn_blocking(move || DashboardView::load(&StoreAlertSource::new(&store)))
        .await
        .unwrap_or_else(|e| {
            error!("Dashboard load task failed: {}", e);
            DashboardView::empty()
        });

    if let Some(requested) = query.alert {
        let selected = requested
            .trim()
            .parse::<usize>()
            .map(|index| view.select(index))
            .unwrap_or(false);
        if !selected {
            debug!(
                "Ignoring selection of alert '{}' (list has {})",
                requested,
                view.entries().len()
            );
        }
    }

    Html(render_page(&view, &state.catalog))
}
