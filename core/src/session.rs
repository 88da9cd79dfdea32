use crate::catalog::alias::{tag_options, AliasIndex, TagOption};
use crate::catalog::filter::{filter_records, CatalogQuery, TagSelection};
use crate::catalog::model::CitationRecord;
use crate::catalog::render::{render, CatalogView};
use crate::error::CoreResult;
use crate::loader::CatalogLoad;
use crate::reconcile::import::{parse_delimited_records, parse_json_records};
use crate::reconcile::merge::{merge_records, MergeOutcome};
use crate::reconcile::validate::{validate_incoming, ValidationProblem};

#[derive(Debug, Clone, PartialEq)]
pub enum CitationState {
    Loading,
    Failed(String),
    Ready(Vec<CitationRecord>),
}

/// State behind the catalog page for one session.
#[derive(Debug, Clone)]
pub struct CatalogSession {
    citations: CitationState,
    aliases: Option<AliasIndex>,
    options: Vec<TagOption>,
    query: CatalogQuery,
}

impl Default for CatalogSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogSession {
    pub fn new() -> Self {
        Self {
            citations: CitationState::Loading,
            aliases: None,
            options: vec![TagOption::all()],
            query: CatalogQuery::default(),
        }
    }

    /// Breach data is auxiliary: if it fails, the dropdown only offers "all"
    /// and tag filtering falls back to raw text comparison.
    pub fn apply_load(&mut self, load: CatalogLoad) {
        match load.breaches {
            Ok(tags) => {
                self.aliases = Some(AliasIndex::build(&tags));
                self.options = tag_options(&tags);
            }
            Err(e) => {
                tracing::warn!(error = %e, "breach tags unavailable, tag filter limited to all");
                self.aliases = None;
                self.options = vec![TagOption::all()];
            }
        }
        self.citations = match load.citations {
            Ok(records) => CitationState::Ready(records),
            Err(e) => {
                tracing::error!(error = %e, "citations failed to load");
                CitationState::Failed(e.to_string())
            }
        };
    }

    pub fn set_tag(&mut self, raw: Option<&str>) {
        self.query.tag = TagSelection::parse(raw);
    }

    pub fn set_keyword(&mut self, keyword: &str) {
        self.query.keyword = keyword.to_string();
    }

    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }

    pub fn tag_options(&self) -> &[TagOption] {
        &self.options
    }

    pub fn aliases(&self) -> Option<&AliasIndex> {
        self.aliases.as_ref()
    }

    pub fn citations(&self) -> &CitationState {
        &self.citations
    }

    pub fn filtered(&self) -> Vec<&CitationRecord> {
        match &self.citations {
            CitationState::Ready(records) => {
                filter_records(records, &self.query, self.aliases.as_ref())
            }
            _ => Vec::new(),
        }
    }

    pub fn view(&self) -> CatalogView {
        match &self.citations {
            CitationState::Loading => CatalogView::Loading,
            CitationState::Failed(message) => CatalogView::Failed {
                message: message.clone(),
            },
            CitationState::Ready(_) => CatalogView::from_cards(render(self.filtered())),
        }
    }
}

/// State behind the bulk-edit page: the authoritative records plus a staged
/// batch waiting to be validated and merged.
#[derive(Debug, Clone, Default)]
pub struct BulkEditSession {
    current: Vec<CitationRecord>,
    incoming: Vec<CitationRecord>,
    allow_updates: bool,
}

impl BulkEditSession {
    pub fn new(current: Vec<CitationRecord>) -> Self {
        Self {
            current,
            incoming: Vec::new(),
            allow_updates: false,
        }
    }

    pub fn current(&self) -> &[CitationRecord] {
        &self.current
    }

    pub fn incoming(&self) -> &[CitationRecord] {
        &self.incoming
    }

    pub fn allow_updates(&self) -> bool {
        self.allow_updates
    }

    pub fn set_allow_updates(&mut self, allow: bool) {
        self.allow_updates = allow;
    }

    pub fn stage(&mut self, records: Vec<CitationRecord>) -> usize {
        self.incoming = records;
        self.incoming.len()
    }

    /// Stages pasted JSON. On a parse failure the previous batch is kept.
    pub fn stage_json(&mut self, text: &str) -> CoreResult<usize> {
        let records = parse_json_records(text)?;
        Ok(self.stage(records))
    }

    /// Stages delimited text. On a parse failure the previous batch is kept.
    pub fn stage_delimited(&mut self, text: &str) -> CoreResult<usize> {
        let records = parse_delimited_records(text)?;
        Ok(self.stage(records))
    }

    pub fn validate(&mut self) -> Vec<ValidationProblem> {
        validate_incoming(&self.current, &mut self.incoming, self.allow_updates)
    }

    pub fn merge(&self) -> MergeOutcome {
        merge_records(&self.current, &self.incoming, self.allow_updates)
    }

    /// Merges, adopts the result as the new current set and clears the batch.
    pub fn commit(&mut self) -> MergeOutcome {
        let outcome = self.merge();
        self.current = outcome.records.clone();
        self.incoming.clear();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::BreachTag;
    use crate::error::CoreError;
    use serde_json::json;

    fn citations() -> Vec<CitationRecord> {
        serde_json::from_value(json!([
            {"id": "1", "case_name": "A", "compliance_flags": ["Equifax"]},
            {"id": "2", "case_name": "B", "compliance_flags": ["Target"]}
        ]))
        .unwrap()
    }

    #[test]
    fn session_starts_loading() {
        assert_eq!(CatalogSession::new().view(), CatalogView::Loading);
    }

    #[test]
    fn failed_breaches_degrade_to_all_only() {
        let mut session = CatalogSession::new();
        session.apply_load(CatalogLoad {
            citations: Ok(citations()),
            breaches: Err(CoreError::ParseFailure("bad".to_string())),
        });
        assert_eq!(session.tag_options(), &[TagOption::all()]);
        assert!(session.aliases().is_none());
        assert_eq!(session.filtered().len(), 2);
    }

    #[test]
    fn failed_citations_surface_the_message() {
        let mut session = CatalogSession::new();
        session.apply_load(CatalogLoad {
            citations: Err(CoreError::ParseFailure("citations.json: eof".to_string())),
            breaches: Ok(vec![BreachTag::new("Equifax")]),
        });
        match session.view() {
            CatalogView::Failed { message } => assert!(message.contains("eof")),
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn alias_selection_filters_the_view() {
        let mut session = CatalogSession::new();
        session.apply_load(CatalogLoad {
            citations: Ok(citations()),
            breaches: Ok(vec![BreachTag::new("Target").with_aliases(["Target Corp"])]),
        });
        session.set_tag(Some("target corp"));
        match session.view() {
            CatalogView::Results { cards } => {
                assert_eq!(cards.len(), 1);
                assert_eq!(cards[0].id, "2");
            }
            other => panic!("unexpected view {:?}", other),
        }
        session.set_keyword("nothing like this");
        assert_eq!(session.view(), CatalogView::NoResults);
    }

    #[test]
    fn bad_paste_keeps_previous_batch() {
        let mut session = BulkEditSession::new(citations());
        assert_eq!(session.stage_json(r#"[{"id": "3"}]"#).unwrap(), 1);
        assert!(session.stage_json("not json").is_err());
        assert!(session.stage_delimited("").is_err());
        assert_eq!(session.incoming().len(), 1);
        assert_eq!(session.current().len(), 2);
    }

    #[test]
    fn commit_adopts_merged_records() {
        let mut session = BulkEditSession::new(citations());
        session.set_allow_updates(true);
        session.stage_json(r#"[{"id": "2", "case_name": "B2"}, {"id": "9"}]"#).unwrap();
        let outcome = session.commit();
        assert_eq!((outcome.added, outcome.updated), (1, 1));
        assert_eq!(session.current().len(), 3);
        assert_eq!(session.current()[1].text("case_name"), "B2");
        assert!(session.incoming().is_empty());
    }
}
