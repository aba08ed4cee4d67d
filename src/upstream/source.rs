use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 看板聚合的上游数据源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Transit,
    Events,
    Tasks,
}

#[derive(Debug, Error)]
#[error("unknown source kind: {0}")]
pub struct UnknownSource(pub String);

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Transit, SourceKind::Events, SourceKind::Tasks];

    /// 上游接口路径
    pub fn path(self) -> &'static str {
        match self {
            SourceKind::Transit => "/api/data",
            SourceKind::Events => "/api/events",
            SourceKind::Tasks => "/api/habitica",
        }
    }

    /// 对应的卡片 `type`
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Transit => "transit",
            SourceKind::Events => "events",
            SourceKind::Tasks => "tasks",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Transit => "Transit",
            SourceKind::Events => "Events",
            SourceKind::Tasks => "Tasks",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownSource(s.to_string()))
    }
}
