// 将上游原始数据标准化为卡片显示结构

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::fields::{Collection, FlagField, IntField, NumberField, TextField};
use super::source::SourceKind;

/// 每张卡片最多显示的条目数
pub const MAX_ITEMS: usize = 5;

/// 卡片统一的显示结构，与上游格式无关
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedCardData {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub items: Vec<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Item {
    Transit(TransitItem),
    Event(EventItem),
    Task(TaskItem),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitItem {
    pub route: String,
    pub destination: String,
    pub arrival_time: String,
    pub minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventItem {
    pub title: String,
    pub time: String,
    pub description: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskItem {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub priority: f64,
    pub completed: bool,
    pub difficulty: String,
}

const ARRIVALS: Collection = Collection {
    keys: &["arrivals", "data"],
};
const ROUTE: TextField = TextField {
    keys: &["route", "route_name", "routeName", "line"],
    default: "Unknown Route",
};
const DESTINATION: TextField = TextField {
    keys: &["destination", "headsign"],
    default: "Unknown Destination",
};
const ARRIVAL_TIME: TextField = TextField {
    keys: &["arrival_time", "arrivalTime", "time"],
    default: "TBD",
};
const MINUTES: IntField = IntField {
    keys: &["minutes_away", "minutesAway", "minutes"],
    default: 0,
};

const EVENTS: Collection = Collection {
    keys: &["events", "data"],
};
const EVENT_TITLE: TextField = TextField {
    keys: &["title", "summary", "name"],
    default: "Untitled Event",
};
const EVENT_TIME: TextField = TextField {
    keys: &["start_time", "startTime", "time", "start"],
    default: "TBD",
};
const EVENT_DESCRIPTION: TextField = TextField {
    keys: &["description", "details"],
    default: "",
};
const EVENT_LOCATION: TextField = TextField {
    keys: &["location", "place"],
    default: "",
};

const TASKS: Collection = Collection {
    keys: &["tasks", "data"],
};
const TASK_TITLE: TextField = TextField {
    keys: &["text", "title", "name"],
    default: "Untitled Task",
};
const TASK_TYPE: TextField = TextField {
    keys: &["type"],
    default: "todo",
};
const TASK_PRIORITY: NumberField = NumberField {
    keys: &["priority"],
    default: 1.0,
};
const TASK_COMPLETED: FlagField = FlagField {
    keys: &["completed", "done", "isCompleted"],
    default: false,
};
const TASK_DIFFICULTY: TextField = TextField {
    keys: &["difficulty"],
    default: "easy",
};

/// 标准化 `kind` 的数据，没有数据时返回占位结构
pub fn normalize(kind: SourceKind, payload: Option<&Value>, now: DateTime<Utc>) -> NormalizedCardData {
    match payload {
        None => placeholder(kind),
        Some(payload) => match kind {
            SourceKind::Transit => normalize_transit(payload, now),
            SourceKind::Events => normalize_events(payload, now),
            SourceKind::Tasks => normalize_tasks(payload, now),
        },
    }
}

fn title(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Transit => "Transit Arrivals",
        SourceKind::Events => "Upcoming Events",
        SourceKind::Tasks => "Tasks",
    }
}

/// 数据源从未成功拉取时显示的占位结构
pub fn placeholder(kind: SourceKind) -> NormalizedCardData {
    NormalizedCardData {
        title: title(kind).to_string(),
        subtitle: None,
        items: Vec::new(),
        last_updated: None,
        content: Some(format!("{} data unavailable", kind.label())),
    }
}

pub fn normalize_transit(payload: &Value, now: DateTime<Utc>) -> NormalizedCardData {
    let arrivals = ARRIVALS.resolve(payload);
    let items = arrivals
        .iter()
        .take(MAX_ITEMS)
        .map(|arrival| {
            Item::Transit(TransitItem {
                route: ROUTE.resolve(arrival),
                destination: DESTINATION.resolve(arrival),
                arrival_time: ARRIVAL_TIME.resolve(arrival),
                minutes: MINUTES.resolve(arrival),
            })
        })
        .collect();

    NormalizedCardData {
        title: title(SourceKind::Transit).to_string(),
        subtitle: Some(format!("{} upcoming arrivals", arrivals.len())),
        items,
        last_updated: Some(now),
        content: None,
    }
}

pub fn normalize_events(payload: &Value, now: DateTime<Utc>) -> NormalizedCardData {
    let events = EVENTS.resolve(payload);
    let items = events
        .iter()
        .take(MAX_ITEMS)
        .map(|event| {
            Item::Event(EventItem {
                title: EVENT_TITLE.resolve(event),
                time: EVENT_TIME.resolve(event),
                description: EVENT_DESCRIPTION.resolve(event),
                location: EVENT_LOCATION.resolve(event),
            })
        })
        .collect();

    NormalizedCardData {
        title: title(SourceKind::Events).to_string(),
        subtitle: Some(format!("{} upcoming events", events.len())),
        items,
        last_updated: Some(now),
        content: None,
    }
}

pub fn normalize_tasks(payload: &Value, now: DateTime<Utc>) -> NormalizedCardData {
    let tasks = TASKS.resolve(payload);
    let completed = tasks.iter().filter(|task| TASK_COMPLETED.resolve(task)).count();
    let items = tasks
        .iter()
        .take(MAX_ITEMS)
        .map(|task| {
            Item::Task(TaskItem {
                title: TASK_TITLE.resolve(task),
                kind: TASK_TYPE.resolve(task),
                priority: TASK_PRIORITY.resolve(task),
                completed: TASK_COMPLETED.resolve(task),
                difficulty: TASK_DIFFICULTY.resolve(task),
            })
        })
        .collect();

    NormalizedCardData {
        title: title(SourceKind::Tasks).to_string(),
        subtitle: Some(format!("{}/{} completed", completed, tasks.len())),
        items,
        last_updated: Some(now),
        content: None,
    }
}
