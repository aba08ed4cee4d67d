use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::body_with_id;
use crate::error::AppError;

/// 看板卡片。`type` 决定组合配置时是否填充上游数据，
/// 其余字段（包括 title）原样保存在 `extra` 中
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Card {
    pub fn from_request(id: &str, body: Value) -> Result<Self, AppError> {
        let body = body_with_id(id, body)?;
        let card: Card = serde_json::from_value(body)
            .map_err(|e| AppError::Validation(format!("Invalid card: {}", e)))?;

        if card.kind.trim().is_empty() {
            return Err(AppError::Validation("Card type must not be empty".into()));
        }
        Ok(card)
    }
}
