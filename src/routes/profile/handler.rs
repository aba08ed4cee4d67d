use axum::{
    extract::{Json, Path, State, rejection::JsonRejection},
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::Value;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{ActiveProfile, Profile, SetActiveProfileRequest},
    store::{EntityKey, EntityKind, FileStore},
};

pub(crate) async fn load_active_pointer(store: &FileStore) -> AppResult<ActiveProfile> {
    store
        .read(&EntityKey::ActiveProfile)
        .await?
        .ok_or_else(|| AppError::NotFound("No active profile set".into()))
}

/// 获取所有配置
#[axum::debug_handler]
pub async fn list_profiles(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let mut profiles: Vec<Profile> = Vec::new();
    for id in state.store.list(EntityKind::Profile).await? {
        // 列举和读取之间可能被删除，忽略即可
        if let Some(profile) = state.store.read(&EntityKey::Profile(id)).await? {
            profiles.push(profile);
        }
    }
    Ok(Json(profiles))
}

/// 获取单个配置
#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let profile: Profile = state
        .store
        .read(&EntityKey::Profile(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".into()))?;
    Ok(Json(profile))
}

/// 创建或更新配置
#[axum::debug_handler]
pub async fn put_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(body) = body?;
    let profile = Profile::from_request(&id, body)?;

    state
        .store
        .write(&EntityKey::Profile(id.clone()), &profile)
        .await?;
    tracing::info!("saved profile {}", id);
    Ok(Json(profile))
}

/// 删除配置，激活中的配置不可删除
#[axum::debug_handler]
pub async fn delete_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let key = EntityKey::Profile(id.clone());
    if !state.store.exists(&key).await? {
        return Err(AppError::NotFound("Profile not found".into()));
    }

    let active: Option<ActiveProfile> = state.store.read(&EntityKey::ActiveProfile).await?;
    if active.is_some_and(|active| active.profile_id == id) {
        return Err(AppError::Conflict("Cannot delete the active profile".into()));
    }

    state.store.delete(&key).await?;
    tracing::info!("deleted profile {}", id);
    Ok(Json(serde_json::json!({
        "success": true,
        "id": id
    })))
}

/// 获取当前激活配置指针
#[axum::debug_handler]
pub async fn get_active_profile(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(load_active_pointer(&state.store).await?))
}

/// 设置当前激活配置
#[axum::debug_handler]
pub async fn put_active_profile(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(body) = body?;
    let request = SetActiveProfileRequest::from_request(body)?;

    if !state
        .store
        .exists(&EntityKey::Profile(request.profile_id.clone()))
        .await?
    {
        return Err(AppError::NotFound("Profile not found".into()));
    }

    let active = ActiveProfile {
        profile_id: request.profile_id,
        updated_at: Utc::now(),
    };
    state.store.write(&EntityKey::ActiveProfile, &active).await?;
    tracing::info!("active profile set to {}", active.profile_id);
    Ok(Json(active))
}
