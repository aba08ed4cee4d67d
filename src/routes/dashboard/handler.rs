use std::collections::HashMap;

use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
};
use futures_util::future::try_join_all;

use super::model::compose;
use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{Card, Profile},
    routes::profile::load_active_pointer,
    store::{EntityKey, FileStore},
    upstream::SourceKind,
};

async fn load_cards(store: &FileStore, profile: &Profile) -> AppResult<HashMap<String, Card>> {
    let reads = profile.card_ids().into_iter().map(|id| async move {
        let card: Option<Card> = store.read(&EntityKey::Card(id.to_string())).await?;
        Ok::<_, AppError>((id.to_string(), card))
    });

    Ok(try_join_all(reads)
        .await?
        .into_iter()
        .filter_map(|(id, card)| card.map(|card| (id, card)))
        .collect())
}

/// 当前激活配置，卡片已填充上游数据
#[axum::debug_handler]
pub async fn get_active_profile_view(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let active = load_active_pointer(&state.store).await?;
    let profile: Profile = state
        .store
        .read(&EntityKey::Profile(active.profile_id.clone()))
        .await?
        .ok_or_else(|| AppError::NotFound("Active profile not found".into()))?;

    let (sources, cards) = tokio::join!(
        state.upstream.get_all(),
        load_cards(&state.store, &profile)
    );
    let cards = cards?;

    let composed = compose(profile, &cards, &sources)
        .map_err(|e| AppError::Internal(format!("failed to compose profile: {}", e)))?;
    Ok(Json(composed))
}

#[axum::debug_handler]
pub async fn get_source(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> AppResult<impl IntoResponse> {
    let kind: SourceKind = kind
        .parse()
        .map_err(|e: crate::upstream::source::UnknownSource| AppError::NotFound(e.to_string()))?;
    Ok(Json(state.upstream.get(kind).await))
}

#[axum::debug_handler]
pub async fn invalidate_cache(State(state): State<AppState>) -> impl IntoResponse {
    state.upstream.invalidate().await;
    Json(serde_json::json!({
        "success": true
    }))
}
