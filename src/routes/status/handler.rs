use axum::{
    extract::{Json, State},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    AppState,
    error::AppResult,
    models::ActiveProfile,
    store::{EntityKey, EntityKind},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: &'static str,
    pub profiles: usize,
    pub cards: usize,
    pub active_profile_id: Option<String>,
    pub upstream: String,
    pub timestamp: DateTime<Utc>,
}

#[axum::debug_handler]
pub async fn status(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let profiles = state.store.list(EntityKind::Profile).await?.len();
    let cards = state.store.list(EntityKind::Card).await?.len();
    let active: Option<ActiveProfile> = state.store.read(&EntityKey::ActiveProfile).await?;

    Ok(Json(StatusResponse {
        status: "ok",
        profiles,
        cards,
        active_profile_id: active.map(|active| active.profile_id),
        upstream: state.config.upstream_base_url.clone(),
        timestamp: Utc::now(),
    }))
}
