// 上游字段查找链
// 上游字段名不统一，每个显示字段由一组有序的候选键和默认值描述，取第一个可用的值

use serde_json::Value;

/// 数据中条目列表所在的位置
#[derive(Debug, Clone, Copy)]
pub struct Collection {
    pub keys: &'static [&'static str],
}

impl Collection {
    /// 返回条目数组，不存在时返回空切片
    /// 数据本身是数组时直接作为条目列表
    pub fn resolve<'a>(&self, payload: &'a Value) -> &'a [Value] {
        if let Value::Array(items) = payload {
            return items;
        }
        self.keys
            .iter()
            .find_map(|key| payload.get(key).and_then(Value::as_array))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// 显示用字符串。数字和布尔值转为文本，空字符串视为缺失
#[derive(Debug, Clone, Copy)]
pub struct TextField {
    pub keys: &'static [&'static str],
    pub default: &'static str,
}

impl TextField {
    pub fn resolve(&self, item: &Value) -> String {
        self.keys
            .iter()
            .find_map(|key| match item.get(key)? {
                Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| self.default.to_string())
    }
}

/// 整数，接受数字字符串
#[derive(Debug, Clone, Copy)]
pub struct IntField {
    pub keys: &'static [&'static str],
    pub default: i64,
}

impl IntField {
    pub fn resolve(&self, item: &Value) -> i64 {
        self.keys
            .iter()
            .find_map(|key| match item.get(key)? {
                Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
            .unwrap_or(self.default)
    }
}

/// 小数，接受数字字符串
#[derive(Debug, Clone, Copy)]
pub struct NumberField {
    pub keys: &'static [&'static str],
    pub default: f64,
}

impl NumberField {
    pub fn resolve(&self, item: &Value) -> f64 {
        self.keys
            .iter()
            .find_map(|key| match item.get(key)? {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
            .unwrap_or(self.default)
    }
}

/// 布尔值，接受 `"true"`/`"false"` 字符串和 0/1
#[derive(Debug, Clone, Copy)]
pub struct FlagField {
    pub keys: &'static [&'static str],
    pub default: bool,
}

impl FlagField {
    pub fn resolve(&self, item: &Value) -> bool {
        self.keys
            .iter()
            .find_map(|key| match item.get(key)? {
                Value::Bool(b) => Some(*b),
                Value::Number(n) => n.as_f64().map(|f| f != 0.0),
                Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" => Some(true),
                    "false" => Some(false),
                    _ => None,
                },
                _ => None,
            })
            .unwrap_or(self.default)
    }
}
