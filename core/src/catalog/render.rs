use crate::catalog::model::{
    CitationRecord, FIELD_AUTHORITY_BASIS, FIELD_CASE_LINK, FIELD_CASE_NAME, FIELD_CITATION,
    FIELD_COURT, FIELD_FULL_CASE_TEXT, FIELD_HOLDING, FIELD_JURISDICTION, FIELD_LEGAL_PRINCIPLE,
    FIELD_SUMMARY,
};
use serde::Serialize;

/// Presentation-neutral projection of a citation card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CitationView {
    pub id: String,
    pub case_name: String,
    pub citation: String,
    pub court: String,
    pub jurisdiction: String,
    pub year: Option<i64>,
    pub summary: String,
    pub legal_principle: String,
    pub holding: String,
    pub authority_basis: String,
    pub compliance_flags: Vec<String>,
    pub key_points: Vec<String>,
    pub tags: Vec<String>,
    pub sources: Vec<String>,
    pub printable: bool,
    pub case_link: String,
    pub has_full_text: bool,
}

impl CitationView {
    pub fn from_record(record: &CitationRecord) -> Self {
        Self {
            id: record.id().unwrap_or_default(),
            case_name: record.text(FIELD_CASE_NAME).into_owned(),
            citation: record.text(FIELD_CITATION).into_owned(),
            court: record.text(FIELD_COURT).into_owned(),
            jurisdiction: record.text(FIELD_JURISDICTION).into_owned(),
            year: record.year(),
            summary: record.text(FIELD_SUMMARY).into_owned(),
            legal_principle: record.text(FIELD_LEGAL_PRINCIPLE).into_owned(),
            holding: record.text(FIELD_HOLDING).into_owned(),
            authority_basis: record.text(FIELD_AUTHORITY_BASIS).into_owned(),
            compliance_flags: record.compliance_flags(),
            key_points: record.key_points(),
            tags: record.tags(),
            sources: record.sources(),
            printable: record.printable(),
            case_link: record.text(FIELD_CASE_LINK).into_owned(),
            has_full_text: !record.is_blank(FIELD_FULL_CASE_TEXT),
        }
    }
}

pub fn render<'a, I>(records: I) -> Vec<CitationView>
where
    I: IntoIterator<Item = &'a CitationRecord>,
{
    records.into_iter().map(CitationView::from_record).collect()
}

/// What the catalog area should show right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CatalogView {
    Loading,
    Failed { message: String },
    NoResults,
    Results { cards: Vec<CitationView> },
}

impl CatalogView {
    pub fn from_cards(cards: Vec<CitationView>) -> Self {
        if cards.is_empty() {
            CatalogView::NoResults
        } else {
            CatalogView::Results { cards }
        }
    }
}

/// Plain-text cards for terminal output.
pub fn render_catalog_text(view: &CatalogView) -> String {
    match view {
        CatalogView::Loading => "Loading citations...\n".to_string(),
        CatalogView::Failed { message } => format!("Could not load citations: {}\n", message),
        CatalogView::NoResults => "No citations match the current filters.\n".to_string(),
        CatalogView::Results { cards } => {
            let mut out = String::new();
            for card in cards {
                render_card(&mut out, card);
                out.push('\n');
            }
            out.push_str(&format!("{} citation(s)\n", cards.len()));
            out
        }
    }
}

fn render_card(out: &mut String, card: &CitationView) {
    let heading = if card.case_name.is_empty() {
        "(untitled)"
    } else {
        card.case_name.as_str()
    };
    out.push_str(&format!("## {}\n", heading));

    let mut meta: Vec<String> = Vec::new();
    for part in [&card.citation, &card.court, &card.jurisdiction] {
        if !part.is_empty() {
            meta.push(part.clone());
        }
    }
    if let Some(year) = card.year {
        meta.push(year.to_string());
    }
    if !meta.is_empty() {
        out.push_str(&format!("{}\n", meta.join(" | ")));
    }

    for (label, text) in [
        ("Summary", &card.summary),
        ("Principle", &card.legal_principle),
        ("Holding", &card.holding),
    ] {
        if !text.is_empty() {
            out.push_str(&format!("{}: {}\n", label, text));
        }
    }
    for point in &card.key_points {
        out.push_str(&format!("  - {}\n", point));
    }
    if !card.compliance_flags.is_empty() {
        out.push_str(&format!("Breaches: {}\n", card.compliance_flags.join(", ")));
    }
    if !card.tags.is_empty() {
        out.push_str(&format!("Tags: {}\n", card.tags.join(", ")));
    }
    for source in &card.sources {
        out.push_str(&format!("Source: {}\n", source));
    }
    if !card.case_link.is_empty() {
        out.push_str(&format!("Case: {}\n", card.case_link));
    }
}
