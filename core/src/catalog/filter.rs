use crate::catalog::alias::{AliasIndex, ALL_TAGS};
use crate::catalog::model::{
    CitationRecord, FIELD_AUTHORITY_BASIS, FIELD_CASE_NAME, FIELD_CITATION, FIELD_HOLDING,
    FIELD_LEGAL_PRINCIPLE, FIELD_SUMMARY,
};
use serde::{Deserialize, Serialize};

/// Fields searched by the keyword box, in concatenation order. Tags are
/// appended after these.
pub const SEARCH_FIELDS: [&str; 6] = [
    FIELD_CASE_NAME,
    FIELD_CITATION,
    FIELD_SUMMARY,
    FIELD_LEGAL_PRINCIPLE,
    FIELD_HOLDING,
    FIELD_AUTHORITY_BASIS,
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagSelection {
    #[default]
    All,
    Tag(String),
}

impl TagSelection {
    /// Absent, empty, and the "all" sentinel all mean no constraint.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some(ALL_TAGS) => TagSelection::All,
            Some(tag) => TagSelection::Tag(tag.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    pub tag: TagSelection,
    pub keyword: String,
}

impl CatalogQuery {
    pub fn new(tag: Option<&str>, keyword: Option<&str>) -> Self {
        Self {
            tag: TagSelection::parse(tag),
            keyword: keyword.unwrap_or_default().to_string(),
        }
    }
}

enum TagConstraint {
    Any,
    Canonical(String),
    Unresolved,
}

fn tag_constraint(selection: &TagSelection, aliases: Option<&AliasIndex>) -> TagConstraint {
    match (selection, aliases) {
        (TagSelection::All, _) => TagConstraint::Any,
        (TagSelection::Tag(raw), Some(index)) => match index.resolve(raw) {
            Some(canonical) => TagConstraint::Canonical(canonical.to_string()),
            None => TagConstraint::Unresolved,
        },
        // No breach data: compare the selected text as-is.
        (TagSelection::Tag(raw), None) => TagConstraint::Canonical(raw.clone()),
    }
}

/// Case-insensitive exact membership in `compliance_flags`.
pub fn has_compliance_flag(record: &CitationRecord, tag: &str) -> bool {
    let wanted = tag.to_lowercase();
    record
        .compliance_flags()
        .iter()
        .any(|flag| flag.to_lowercase() == wanted)
}

/// Lowercased, space-joined text the keyword box searches.
pub fn searchable_text(record: &CitationRecord) -> String {
    let mut parts: Vec<String> = SEARCH_FIELDS
        .iter()
        .map(|field| record.text(field).into_owned())
        .collect();
    parts.push(record.tags().join(" "));
    parts.join(" ").to_lowercase()
}

/// Records matching both the tag selection and the keyword, in input order.
///
/// With an alias index, the selection is resolved to its canonical tag first
/// and an unknown selection matches nothing. Without one (breach data failed
/// to load) the selected text is compared directly.
pub fn filter_records<'a>(
    records: &'a [CitationRecord],
    query: &CatalogQuery,
    aliases: Option<&AliasIndex>,
) -> Vec<&'a CitationRecord> {
    let constraint = tag_constraint(&query.tag, aliases);
    if let TagConstraint::Unresolved = constraint {
        tracing::debug!(tag = ?query.tag, "selected tag has no canonical form");
        return Vec::new();
    }
    let keyword = query.keyword.to_lowercase();

    let matches: Vec<&CitationRecord> = records
        .iter()
        .filter(|record| match &constraint {
            TagConstraint::Canonical(tag) => has_compliance_flag(record, tag),
            _ => true,
        })
        .filter(|record| keyword.is_empty() || searchable_text(record).contains(&keyword))
        .collect();

    tracing::debug!(
        total = records.len(),
        matched = matches.len(),
        "filtered citation catalog"
    );
    matches
}
