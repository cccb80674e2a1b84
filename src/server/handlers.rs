//! Request handlers.

use axum::extract::{Path, RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::AppState;
use crate::browser::DossierView;

/// Relay the municipalities infobox unchanged.
pub async fn municipalities(State(state): State<AppState>) -> Response {
    match state.client.relay().await {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            tracing::error!("Relay to upstream failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error fetching municipalities",
            )
                .into_response()
        }
    }
}

/// Result view model for the request's query string.
///
/// Each request runs in its own session, so concurrent clients never supersede
/// one another.
pub async fn search(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let query = query.unwrap_or_default();
    match state.browser.session().navigate(&query).await {
        Some(view) => Json(view).into_response(),
        None => (StatusCode::CONFLICT, "Superseded by a newer search").into_response(),
    }
}

/// Dossier detail view model.
pub async fn dossier(State(state): State<AppState>, Path(pid): Path<String>) -> Response {
    let view = state.browser.dossier(&pid).await;
    let status = match view {
        DossierView::Found(_) => StatusCode::OK,
        DossierView::NotFound { .. } => StatusCode::NOT_FOUND,
        DossierView::Unavailable { .. } => StatusCode::BAD_GATEWAY,
    };
    (status, Json(view)).into_response()
}
