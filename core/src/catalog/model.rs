use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::OnceLock;
use url::Url;

pub const FIELD_ID: &str = "id";
pub const FIELD_CASE_NAME: &str = "case_name";
pub const FIELD_CITATION: &str = "citation";
pub const FIELD_COURT: &str = "court";
pub const FIELD_JURISDICTION: &str = "jurisdiction";
pub const FIELD_YEAR: &str = "year";
pub const FIELD_SUMMARY: &str = "summary";
pub const FIELD_LEGAL_PRINCIPLE: &str = "legal_principle";
pub const FIELD_HOLDING: &str = "holding";
pub const FIELD_AUTHORITY_BASIS: &str = "authority_basis";
pub const FIELD_COMPLIANCE_FLAGS: &str = "compliance_flags";
pub const FIELD_KEY_POINTS: &str = "key_points";
pub const FIELD_TAGS: &str = "tags";
pub const FIELD_SOURCES: &str = "sources";
pub const FIELD_PRINTABLE: &str = "printable";
pub const FIELD_FULL_CASE_TEXT: &str = "full_case_text";
pub const FIELD_CASE_LINK: &str = "case_link";

/// Sequence-valued fields whose shape is coerced on import.
pub const LIST_FIELDS: [&str; 3] = [FIELD_COMPLIANCE_FLAGS, FIELD_KEY_POINTS, FIELD_TAGS];

/// A citation entry as it appears in `citations.json`.
///
/// Records are open objects: fields this crate does not know about are kept
/// verbatim, and field order survives a load/save cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CitationRecord(Map<String, Value>);

impl CitationRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    /// Builder-style `set`, handy for assembling records in code.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value.into());
        self
    }

    /// The record id, if it is a non-empty string or a non-zero number.
    /// `0` counts as missing, like `""`.
    pub fn id(&self) -> Option<String> {
        match self.0.get(FIELD_ID)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Free-text view of a field; absent or null renders as empty.
    pub fn text(&self, field: &str) -> Cow<'_, str> {
        match self.0.get(field) {
            Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
            Some(Value::Number(n)) => Cow::Owned(n.to_string()),
            Some(Value::Bool(b)) => Cow::Owned(b.to_string()),
            _ => Cow::Borrowed(""),
        }
    }

    /// True when the field is missing, null, or a whitespace-only string.
    pub fn is_blank(&self, field: &str) -> bool {
        match self.0.get(field) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        }
    }

    /// String elements of a sequence field. A bare string counts as a
    /// one-element sequence so records that skipped coercion still read sanely.
    pub fn string_list(&self, field: &str) -> Vec<String> {
        match self.0.get(field) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect(),
            Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
            _ => Vec::new(),
        }
    }

    pub fn compliance_flags(&self) -> Vec<String> {
        self.string_list(FIELD_COMPLIANCE_FLAGS)
    }

    pub fn tags(&self) -> Vec<String> {
        self.string_list(FIELD_TAGS)
    }

    pub fn key_points(&self) -> Vec<String> {
        self.string_list(FIELD_KEY_POINTS)
    }

    pub fn year(&self) -> Option<i64> {
        match self.0.get(FIELD_YEAR)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn printable(&self) -> bool {
        match self.0.get(FIELD_PRINTABLE) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Explicit `sources` when the record carries them, otherwise the URLs
    /// found in `authority_basis`.
    pub fn sources(&self) -> Vec<String> {
        if let Some(Value::Array(_)) = self.0.get(FIELD_SOURCES) {
            return self.string_list(FIELD_SOURCES);
        }
        derive_sources(&self.text(FIELD_AUTHORITY_BASIS))
    }

    /// Coerce a sequence field in place: scalars become one-element
    /// sequences, absent/null/empty-string becomes an empty sequence.
    pub fn coerce_list_field(&mut self, field: &str) {
        let Some(slot) = self.0.get_mut(field) else {
            self.0.insert(field.to_string(), Value::Array(Vec::new()));
            return;
        };
        // Rewrite in place so the key keeps its position.
        *slot = match slot.take() {
            Value::Array(items) => Value::Array(items),
            Value::Null => Value::Array(Vec::new()),
            Value::String(s) if s.is_empty() => Value::Array(Vec::new()),
            other => Value::Array(vec![other]),
        };
    }

    /// Shallow overlay: every field present on `other` replaces ours.
    pub fn overlay(&mut self, other: &CitationRecord) {
        for (field, value) in &other.0 {
            self.0.insert(field.clone(), value.clone());
        }
    }
}

impl From<Map<String, Value>> for CitationRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Entry of `breaches.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreachTag {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl BreachTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            aliases: Vec::new(),
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| match Regex::new(r#"https?://[^\s<>"'()\[\]]+"#) {
        Ok(re) => re,
        Err(e) => unreachable!("static url pattern failed to compile: {e}"),
    })
}

/// URL-shaped substrings of `text`, deduplicated, first occurrence first.
pub fn derive_sources(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for m in url_pattern().find_iter(text) {
        let candidate = m.as_str().trim_end_matches(['.', ',', ';', ':']);
        if Url::parse(candidate).is_err() {
            continue;
        }
        if seen.insert(candidate.to_string()) {
            out.push(candidate.to_string());
        }
    }
    out
}
