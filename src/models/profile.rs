use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::body_with_id;
use crate::error::AppError;
use crate::store::keys::is_valid_id;

/// 看板布局：若干区域，每个区域按显示顺序列出卡片 ID
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zones: Option<Vec<Zone>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 当前激活配置指针
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveProfile {
    pub profile_id: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveProfileRequest {
    pub profile_id: String,
}

impl Profile {
    /// 校验请求体，返回以 `id` 存储的配置
    pub fn from_request(id: &str, body: Value) -> Result<Self, AppError> {
        let body = body_with_id(id, body)?;
        let profile: Profile = serde_json::from_value(body)
            .map_err(|e| AppError::Validation(format!("Invalid profile: {}", e)))?;

        if profile.name.trim().is_empty() {
            return Err(AppError::Validation("Profile name must not be empty".into()));
        }
        for zone in profile.zones() {
            if zone.name.trim().is_empty() {
                return Err(AppError::Validation("Zone name must not be empty".into()));
            }
            if let Some(card_id) = zone.cards().iter().find(|card_id| !is_valid_id(card_id)) {
                return Err(AppError::Validation(format!(
                    "Zone {:?} references invalid card id {:?}",
                    zone.name, card_id
                )));
            }
        }
        Ok(profile)
    }

    pub fn zones(&self) -> &[Zone] {
        self.zones.as_deref().unwrap_or_default()
    }

    /// 所有区域的卡片 ID，按首次出现顺序去重
    pub fn card_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for id in self.zones().iter().flat_map(|zone| zone.cards().iter()) {
            if !ids.contains(&id.as_str()) {
                ids.push(id);
            }
        }
        ids
    }
}

impl Zone {
    pub fn cards(&self) -> &[String] {
        self.cards.as_deref().unwrap_or_default()
    }
}

impl SetActiveProfileRequest {
    pub fn from_request(body: Value) -> Result<Self, AppError> {
        let request: SetActiveProfileRequest = serde_json::from_value(body)
            .map_err(|e| AppError::Validation(format!("Invalid active profile: {}", e)))?;
        if !is_valid_id(&request.profile_id) {
            return Err(AppError::Validation(format!(
                "Invalid profile id {:?}",
                request.profile_id
            )));
        }
        Ok(request)
    }
}
