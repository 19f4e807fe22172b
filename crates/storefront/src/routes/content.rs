//! Site content route handler.

use axum::{Json, extract::State};
use tracing::instrument;
use zoco_core::SiteContent;

use crate::state::AppState;

/// Home page hero and category cards.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<SiteContent> {
    Json(state.api().settings().get_content().await)
}
