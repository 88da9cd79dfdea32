use crate::catalog::model::CitationRecord;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeOutcome {
    pub records: Vec<CitationRecord>,
    pub added: usize,
    pub updated: usize,
    pub ignored: usize,
}

/// Merges staged records into the current dataset.
///
/// Records are keyed by id, seeded from `current`. A new id is appended. A
/// known id is overlaid field by field when `allow_updates` is set and left
/// alone otherwise; merge never rejects anything itself, that is
/// `validate_incoming`'s job. Current records keep their positions and new
/// ones follow in the order first seen.
///
/// A repeated id inside `current` keeps its first position and its last
/// content. Records with no id are not keyed: current ones stay where they
/// are, incoming ones are appended.
pub fn merge_records(
    current: &[CitationRecord],
    incoming: &[CitationRecord],
    allow_updates: bool,
) -> MergeOutcome {
    let mut records: Vec<CitationRecord> = Vec::with_capacity(current.len() + incoming.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for record in current {
        match record.id() {
            Some(id) => match positions.get(&id) {
                Some(&pos) => records[pos] = record.clone(),
                None => {
                    positions.insert(id, records.len());
                    records.push(record.clone());
                }
            },
            None => records.push(record.clone()),
        }
    }

    let (mut added, mut updated, mut ignored) = (0, 0, 0);
    for record in incoming {
        let Some(id) = record.id() else {
            records.push(record.clone());
            added += 1;
            continue;
        };
        match positions.get(&id) {
            Some(&pos) if allow_updates => {
                records[pos].overlay(record);
                updated += 1;
            }
            Some(_) => ignored += 1,
            None => {
                positions.insert(id, records.len());
                records.push(record.clone());
                added += 1;
            }
        }
    }

    tracing::debug!(
        current = current.len(),
        incoming = incoming.len(),
        added,
        updated,
        ignored,
        "merged staged citations"
    );
    MergeOutcome {
        records,
        added,
        updated,
        ignored,
    }
}
