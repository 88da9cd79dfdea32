use casebook_core::catalog::model::CitationRecord;
use casebook_core::reconcile::import::parse_delimited_records;
use casebook_core::reconcile::merge::merge_records;
use casebook_core::reconcile::validate::{validate_incoming, ValidationProblem};
use casebook_core::session::BulkEditSession;
use serde_json::{json, Value};

fn records(value: Value) -> Vec<CitationRecord> {
    serde_json::from_value(value).unwrap()
}

fn current() -> Vec<CitationRecord> {
    records(json!([
        {
            "id": "1", "case_name": "X", "citation": "1 U.S. 1", "year": 1990,
            "court": "SCOTUS", "jurisdiction": "US", "summary": "first",
            "compliance_flags": ["Equifax"], "printable": true
        },
        {
            "id": "2", "case_name": "Case B", "citation": "2 F.3d 2", "year": 2001,
            "court": "2d Cir.", "jurisdiction": "US", "summary": "second"
        }
    ]))
}

#[test]
fn merging_a_subset_without_updates_is_idempotent() {
    let current = current();
    let mut changed = current[1].clone();
    changed.set("summary", json!("should be ignored"));
    let subset = vec![current[0].clone(), changed];
    let out = merge_records(&current, &subset, false);
    assert_eq!(out.records, current);
    assert_eq!(out.ignored, 2);
}

#[test]
fn update_overlays_only_present_fields() {
    let current = current();
    let incoming = records(json!([{"id": "1", "case_name": "Y"}]));
    let out = merge_records(&current, &incoming, true);

    let mut expected = current.clone();
    expected[0].set("case_name", json!("Y"));
    assert_eq!(out.records, expected);
    assert_eq!(out.records[0].text("court"), "SCOTUS");
    assert_eq!(out.records[0].compliance_flags(), vec!["Equifax".to_string()]);
}

#[test]
fn duplicate_incoming_id_reported_once_on_second_occurrence() {
    let mut incoming = records(json!([
        {"id": "A", "case_name": "a", "citation": "c", "year": 2000, "court": "c", "jurisdiction": "j", "summary": "s"},
        {"id": "A", "case_name": "a", "citation": "c", "year": 2000, "court": "c", "jurisdiction": "j", "summary": "s"}
    ]));
    let problems = validate_incoming(&current(), &mut incoming, false);
    assert_eq!(
        problems,
        vec![ValidationProblem::DuplicateId { id: "A".to_string() }]
    );
}

#[test]
fn empty_id_flags_missing_id_exactly_once() {
    let mut incoming = records(json!([
        {"id": "", "case_name": null, "year": "not a year"},
        {"case_name": "no id field at all"}
    ]));
    let problems = validate_incoming(&current(), &mut incoming, false);
    let missing: Vec<&ValidationProblem> = problems
        .iter()
        .filter(|p| matches!(p, ValidationProblem::MissingId { .. }))
        .collect();
    assert_eq!(missing.len(), 2);
    assert_eq!(problems[0], ValidationProblem::MissingId { row: 0 });
    for record in &incoming {
        assert_eq!(record.get("tags"), Some(&json!([])));
    }
}

#[test]
fn validation_accumulates_across_records() {
    let mut incoming = records(json!([
        {"id": "1", "case_name": "dup of current"},
        {"id": "new", "case_name": "n", "citation": "c", "year": 2020, "court": "c", "jurisdiction": "j"}
    ]));
    let problems: Vec<String> = validate_incoming(&current(), &mut incoming, false)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert!(problems.contains(&"1: already exists in current data (updates are disabled)".to_string()));
    assert!(problems.contains(&"1: missing citation".to_string()));
    assert!(problems.contains(&"new: missing summary".to_string()));
    assert_eq!(problems.len(), 7);
}

#[test]
fn csv_row_parses_sequences_and_booleans() {
    let text = "id,case_name,citation,year,court,jurisdiction,summary,key_points,tags,printable\n\
                2,Case B,123 F.3d 1,2001,SCOTUS,US,summary,,a|b,true\n";
    let parsed = parse_delimited_records(text).unwrap();
    assert_eq!(parsed.len(), 1);
    let row = &parsed[0];
    assert_eq!(row.get("tags"), Some(&json!(["a", "b"])));
    assert_eq!(row.get("printable"), Some(&json!(true)));
    assert_eq!(row.get("year"), Some(&json!(2001)));
    assert_eq!(row.get("key_points"), Some(&json!([])));
    assert_eq!(row.id(), Some("2".to_string()));
}

#[test]
fn csv_batch_updates_through_the_session() {
    let mut session = BulkEditSession::new(current());
    session.set_allow_updates(true);
    let staged = session
        .stage_delimited(
            "id,case_name,citation,year,court,jurisdiction,summary,tags\n\
             2,Case B,2 F.3d 2,2001,2d Cir.,US,revised,privacy\n\
             3,Case C,3 F.4th 3,2022,9th Cir.,US,third,standing|class action\n",
        )
        .unwrap();
    assert_eq!(staged, 2);
    assert!(session.validate().is_empty());

    let out = session.merge();
    let ids: Vec<String> = out.records.iter().filter_map(|r| r.id()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(out.records[1].text("summary"), "revised");
    assert_eq!(out.records[1].tags(), vec!["privacy".to_string()]);
    assert_eq!(out.records[2].tags(), vec!["standing".to_string(), "class action".to_string()]);
    assert_eq!((out.added, out.updated, out.ignored), (1, 1, 0));
}

#[test]
fn validated_records_keep_their_key_order_through_merge() {
    let mut incoming = records(json!([{
        "id": "7", "tags": "x", "case_name": "Case G", "citation": "7 F.4th 7",
        "year": 2023, "court": "D.C. Cir.", "jurisdiction": "US", "summary": "seventh"
    }]));
    assert!(validate_incoming(&current(), &mut incoming, false).is_empty());

    let out = merge_records(&current(), &incoming, false);
    let keys: Vec<&str> = out.records[2].as_map().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "id", "tags", "case_name", "citation", "year", "court", "jurisdiction",
            "summary", "compliance_flags", "key_points"
        ]
    );
    assert_eq!(out.records[2].get("tags"), Some(&json!(["x"])));
}

#[test]
fn numeric_zero_id_counts_as_missing() {
    let mut incoming = records(json!([{"id": 0}]));
    let problems = validate_incoming(&current(), &mut incoming, false);
    assert_eq!(problems, vec![ValidationProblem::MissingId { row: 0 }]);
}
