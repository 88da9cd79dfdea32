use crate::catalog::model::{
    CitationRecord, FIELD_CASE_NAME, FIELD_CITATION, FIELD_COURT, FIELD_JURISDICTION,
    FIELD_SUMMARY, FIELD_YEAR, LIST_FIELDS,
};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

pub const REQUIRED_FIELDS: [&str; 6] = [
    FIELD_CASE_NAME,
    FIELD_CITATION,
    FIELD_YEAR,
    FIELD_COURT,
    FIELD_JURISDICTION,
    FIELD_SUMMARY,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationProblem {
    /// `row` is the zero-based position in the incoming set.
    MissingId { row: usize },
    DuplicateId { id: String },
    AlreadyExists { id: String },
    MissingField { id: String, field: String },
}

impl fmt::Display for ValidationProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationProblem::MissingId { row } => write!(f, "row {}: missing id", row + 1),
            ValidationProblem::DuplicateId { id } => {
                write!(f, "{}: duplicate id in incoming data", id)
            }
            ValidationProblem::AlreadyExists { id } => write!(
                f,
                "{}: already exists in current data (updates are disabled)",
                id
            ),
            ValidationProblem::MissingField { id, field } => {
                write!(f, "{}: missing {}", id, field)
            }
        }
    }
}

/// Checks staged records against the current dataset.
///
/// Every problem is collected; nothing short-circuits across records. As a
/// side effect each incoming record gets its sequence fields coerced to
/// arrays, whether or not it passes.
pub fn validate_incoming(
    current: &[CitationRecord],
    incoming: &mut [CitationRecord],
    allow_updates: bool,
) -> Vec<ValidationProblem> {
    let existing: HashSet<String> = current.iter().filter_map(CitationRecord::id).collect();
    let mut seen: HashSet<String> = HashSet::new();
    let mut problems = Vec::new();

    for (row, record) in incoming.iter_mut().enumerate() {
        for field in LIST_FIELDS {
            record.coerce_list_field(field);
        }

        let Some(id) = record.id() else {
            problems.push(ValidationProblem::MissingId { row });
            continue;
        };

        if !seen.insert(id.clone()) {
            problems.push(ValidationProblem::DuplicateId { id: id.clone() });
        }
        if !allow_updates && existing.contains(&id) {
            problems.push(ValidationProblem::AlreadyExists { id: id.clone() });
        }
        for field in REQUIRED_FIELDS {
            if record.is_blank(field) {
                problems.push(ValidationProblem::MissingField {
                    id: id.clone(),
                    field: field.to_string(),
                });
            }
        }
    }

    tracing::debug!(
        incoming = incoming.len(),
        problems = problems.len(),
        allow_updates,
        "validated staged citations"
    );
    problems
}

/// Human-readable problem lines for display.
pub fn describe_problems(problems: &[ValidationProblem]) -> Vec<String> {
    problems.iter().map(ToString::to_string).collect()
}
