use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    models::{Card, Profile},
    upstream::{AllSourceData, SourceKind},
};

/// 数据卡片中由上游数据覆盖的字段
const DISPLAY_FIELDS: [&str; 5] = ["title", "subtitle", "items", "lastUpdated", "content"];

/// 组合后的配置：各区域的卡片 ID 已替换为完整卡片
#[derive(Debug, Serialize)]
pub struct ComposedProfile {
    pub id: String,
    pub name: String,
    pub zones: Vec<ComposedZone>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct ComposedZone {
    pub name: String,
    pub cards: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 序列化卡片；类型对应数据源时用标准化数据覆盖显示字段
pub fn decorate_card(card: &Card, sources: &AllSourceData) -> Result<Value, serde_json::Error> {
    let mut value = serde_json::to_value(card)?;
    let Ok(kind) = card.kind.parse::<SourceKind>() else {
        return Ok(value);
    };

    if let (Value::Object(fields), Value::Object(data)) =
        (&mut value, serde_json::to_value(sources.for_kind(kind))?)
    {
        for field in DISPLAY_FIELDS {
            fields.remove(field);
        }
        fields.extend(data);
    }
    Ok(value)
}

/// 按顺序遍历区域，找不到的卡片跳过
pub fn compose(
    profile: Profile,
    cards: &HashMap<String, Card>,
    sources: &AllSourceData,
) -> Result<ComposedProfile, serde_json::Error> {
    let profile_zones = profile.zones.unwrap_or_default();
    let mut zones = Vec::with_capacity(profile_zones.len());
    for zone in profile_zones {
        let zone_cards = zone.cards.unwrap_or_default();
        let mut composed = Vec::with_capacity(zone_cards.len());
        for card_id in &zone_cards {
            match cards.get(card_id) {
                Some(card) => composed.push(decorate_card(card, sources)?),
                None => tracing::warn!(
                    "profile {} zone {} references missing card {}",
                    profile.id,
                    zone.name,
                    card_id
                ),
            }
        }
        zones.push(ComposedZone {
            name: zone.name,
            cards: composed,
            extra: zone.extra,
        });
    }

    Ok(ComposedProfile {
        id: profile.id,
        name: profile.name,
        zones,
        extra: profile.extra,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::transform::{normalize, placeholder};
    use chrono::Utc;
    use serde_json::json;

    fn sources() -> AllSourceData {
        let now = Utc::now();
        AllSourceData {
            transit: normalize(
                SourceKind::Transit,
                Some(&json!([{"route": "Red Line", "destination": "Howard", "arrival_time": "2:15 PM", "minutes_away": 5}])),
                now,
            ),
            events: placeholder(SourceKind::Events),
            tasks: normalize(SourceKind::Tasks, Some(&json!({"tasks": []})), now),
        }
    }

    fn card(id: &str, kind: &str, extra: Value) -> Card {
        let mut body = extra;
        body["type"] = json!(kind);
        Card::from_request(id, body).unwrap()
    }

    #[test]
    fn data_cards_get_normalized_fields() {
        let bus = card("bus", "transit", json!({"title": "My bus", "subtitle": "old", "stop": 42}));

        let value = decorate_card(&bus, &sources()).unwrap();

        assert_eq!(value["id"], json!("bus"));
        assert_eq!(value["type"], json!("transit"));
        assert_eq!(value["stop"], json!(42));
        assert_eq!(value["title"], json!("Transit Arrivals"));
        assert_eq!(value["subtitle"], json!("1 upcoming arrivals"));
        assert_eq!(value["items"][0]["arrivalTime"], json!("2:15 PM"));
        assert!(value.get("lastUpdated").is_some());
    }

    #[test]
    fn unavailable_sources_clear_stale_display_fields() {
        let cal = card("cal", "events", json!({"subtitle": "left over"}));

        let value = decorate_card(&cal, &sources()).unwrap();

        assert!(value.get("subtitle").is_none());
        assert!(value.get("lastUpdated").is_none());
        assert_eq!(value["content"], json!("Events data unavailable"));
        assert_eq!(value["items"], json!([]));
    }

    #[test]
    fn other_card_types_are_untouched() {
        let clock = card("clock", "clock", json!({"title": "Clock", "format": "24h"}));

        let value = decorate_card(&clock, &sources()).unwrap();

        assert_eq!(value, json!({"id": "clock", "type": "clock", "title": "Clock", "format": "24h"}));
    }

    #[test]
    fn compose_keeps_zone_order_and_skips_missing_cards() {
        let profile = Profile::from_request(
            "home",
            json!({"name": "Home", "zones": [
                {"name": "left", "cards": ["todo", "ghost", "bus"]},
                {"name": "right", "cards": []}
            ]}),
        )
        .unwrap();
        let cards = HashMap::from([
            ("bus".to_string(), card("bus", "transit", json!({}))),
            ("todo".to_string(), card("todo", "tasks", json!({}))),
        ]);

        let composed = compose(profile, &cards, &sources()).unwrap();

        assert_eq!(composed.zones.len(), 2);
        let left: Vec<&Value> = composed.zones[0].cards.iter().map(|c| &c["id"]).collect();
        assert_eq!(left, [&json!("todo"), &json!("bus")]);
        assert_eq!(composed.zones[0].cards[0]["subtitle"], json!("0/0 completed"));
        assert!(composed.zones[1].cards.is_empty());
    }

    #[test]
    fn profiles_without_zones_compose_to_an_empty_layout() {
        let profile = Profile::from_request(
            "spare",
            json!({"name": "Spare", "zones": [{"name": "bare"}]}),
        )
        .unwrap();

        let composed = compose(profile, &HashMap::new(), &sources()).unwrap();
        assert_eq!(composed.zones.len(), 1);
        assert!(composed.zones[0].cards.is_empty());

        let profile = Profile::from_request("spare", json!({"name": "Spare"})).unwrap();
        let composed = compose(profile, &HashMap::new(), &sources()).unwrap();
        assert!(composed.zones.is_empty());
    }
}
