use serde_json::Value;

use crate::error::AppError;

pub mod card;
pub mod profile;

pub use card::Card;
pub use profile::{ActiveProfile, Profile, SetActiveProfileRequest, Zone};

/// 校验请求体为对象且 `id`（如有）与路径一致，然后写入路径中的 id
pub(crate) fn body_with_id(id: &str, body: Value) -> Result<Value, AppError> {
    let Value::Object(mut fields) = body else {
        return Err(AppError::Validation("Request body must be a JSON object".into()));
    };

    match fields.get("id") {
        None => {}
        Some(Value::String(body_id)) if body_id == id => {}
        Some(other) => {
            return Err(AppError::Validation(format!(
                "Body id {} does not match path id {:?}",
                other, id
            )));
        }
    }

    fields.insert("id".to_string(), Value::String(id.to_string()));
    Ok(Value::Object(fields))
}
