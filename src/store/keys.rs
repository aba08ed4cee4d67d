/// 配置文件前缀
const PROFILE_PREFIX: &str = "profile-";

/// 卡片文件前缀
const CARD_PREFIX: &str = "card-";

/// 当前激活配置指针文件
const ACTIVE_PROFILE_FILE: &str = "activeProfile";

const EXTENSION: &str = ".json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Profile,
    Card,
}

impl EntityKind {
    fn prefix(self) -> &'static str {
        match self {
            EntityKind::Profile => PROFILE_PREFIX,
            EntityKind::Card => CARD_PREFIX,
        }
    }
}

/// 持久化记录的标识
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKey {
    Profile(String),
    Card(String),
    ActiveProfile,
}

impl EntityKey {
    pub fn file_name(&self) -> String {
        match self {
            EntityKey::Profile(id) => format!("{}{}{}", PROFILE_PREFIX, id, EXTENSION),
            EntityKey::Card(id) => format!("{}{}{}", CARD_PREFIX, id, EXTENSION),
            EntityKey::ActiveProfile => format!("{}{}", ACTIVE_PROFILE_FILE, EXTENSION),
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            EntityKey::Profile(id) | EntityKey::Card(id) => Some(id.as_str()),
            EntityKey::ActiveProfile => None,
        }
    }
}

/// id 只能包含 ASCII 字母、数字、`-` 和 `_`
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 128
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// 从文件名中解析出实体 id
pub fn id_from_file_name(kind: EntityKind, file_name: &str) -> Option<String> {
    file_name
        .strip_prefix(kind.prefix())?
        .strip_suffix(EXTENSION)
        .filter(|id| is_valid_id(id))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_follow_the_layout() {
        assert_eq!(EntityKey::Profile("home".into()).file_name(), "profile-home.json");
        assert_eq!(EntityKey::Card("bus".into()).file_name(), "card-bus.json");
        assert_eq!(EntityKey::ActiveProfile.file_name(), "activeProfile.json");
    }

    #[test]
    fn ids_round_trip_through_file_names() {
        assert_eq!(
            id_from_file_name(EntityKind::Profile, "profile-home_2.json"),
            Some("home_2".to_string())
        );
        assert_eq!(id_from_file_name(EntityKind::Card, "profile-home.json"), None);
        assert_eq!(id_from_file_name(EntityKind::Profile, "activeProfile.json"), None);
        assert_eq!(id_from_file_name(EntityKind::Card, ".card-x.json.tmp"), None);
    }

    #[test]
    fn ids_cannot_escape_the_data_directory() {
        assert!(is_valid_id("kitchen-display_1"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("../etc"));
        assert!(!is_valid_id("a/b"));
        assert!(!is_valid_id("a.json"));
    }
}
