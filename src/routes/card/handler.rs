use axum::{
    extract::{Json, Path, State, rejection::JsonRejection},
    response::IntoResponse,
};
use serde_json::Value;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::Card,
    store::{EntityKey, EntityKind},
};

/// 获取所有卡片
#[axum::debug_handler]
pub async fn list_cards(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let mut cards: Vec<Card> = Vec::new();
    for id in state.store.list(EntityKind::Card).await? {
        if let Some(card) = state.store.read(&EntityKey::Card(id)).await? {
            cards.push(card);
        }
    }
    Ok(Json(cards))
}

/// 获取单个卡片
#[axum::debug_handler]
pub async fn get_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let card: Card = state
        .store
        .read(&EntityKey::Card(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Card not found".into()))?;
    Ok(Json(card))
}

/// 创建或更新卡片
#[axum::debug_handler]
pub async fn put_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(body) = body?;
    let card = Card::from_request(&id, body)?;

    state.store.write(&EntityKey::Card(id.clone()), &card).await?;
    tracing::info!("saved card {} ({})", id, card.kind);
    Ok(Json(card))
}

/// 删除卡片
#[axum::debug_handler]
pub async fn delete_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let key = EntityKey::Card(id.clone());
    if !state.store.exists(&key).await? {
        return Err(AppError::NotFound("Card not found".into()));
    }

    state.store.delete(&key).await?;
    tracing::info!("deleted card {}", id);
    Ok(Json(serde_json::json!({
        "success": true,
        "id": id
    })))
}
