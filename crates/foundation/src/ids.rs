use serde::{Deserialize, Serialize};

/// Stable, host-assigned identifier of a map item.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        ItemId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::ItemId;

    #[test]
    fn serializes_as_plain_string() {
        let id = ItemId::new("task-7");
        assert_eq!(serde_json::to_string(&id).expect("json"), "\"task-7\"");
        let back: ItemId = serde_json::from_str("\"task-7\"").expect("parse");
        assert_eq!(back, id);
        assert_eq!(back.to_string(), "task-7");
    }
}
