use crate::catalog::model::BreachTag;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Sentinel dropdown value meaning "no tag constraint".
pub const ALL_TAGS: &str = "all";

/// Lowercase, then drop every whitespace character anywhere in the string.
pub fn normalize_tag(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Normalized tag/alias text -> canonical tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasIndex {
    entries: HashMap<String, String>,
}

impl AliasIndex {
    /// Registers each tag under its own text and every alias, in file order.
    /// Collisions are last-write-wins: when two breach entries normalize to
    /// the same key, the one later in `tags` owns it.
    pub fn build(tags: &[BreachTag]) -> Self {
        let mut entries = HashMap::new();
        for breach in tags {
            entries.insert(normalize_tag(&breach.tag), breach.tag.clone());
            for alias in &breach.aliases {
                entries.insert(normalize_tag(alias), breach.tag.clone());
            }
        }
        tracing::debug!(
            tags = tags.len(),
            keys = entries.len(),
            "built breach alias index"
        );
        Self { entries }
    }

    pub fn resolve(&self, raw: &str) -> Option<&str> {
        self.entries.get(&normalize_tag(raw)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagOption {
    pub value: String,
    pub label: String,
}

impl TagOption {
    pub fn all() -> Self {
        Self {
            value: ALL_TAGS.to_string(),
            label: "All breaches".to_string(),
        }
    }

    pub fn is_all(&self) -> bool {
        self.value == ALL_TAGS
    }
}

/// Dropdown entries: the "all" sentinel, then each canonical tag once,
/// ordered by ordinal comparison of the raw tag text.
pub fn tag_options(tags: &[BreachTag]) -> Vec<TagOption> {
    let unique: BTreeSet<&str> = tags.iter().map(|b| b.tag.as_str()).collect();
    std::iter::once(TagOption::all())
        .chain(unique.into_iter().map(|tag| TagOption {
            value: tag.to_string(),
            label: tag.to_string(),
        }))
        .collect()
}
