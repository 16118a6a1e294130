//! Turns raw provider rows into a canonical, deterministically ordered
//! quiz definition.

use std::collections::BTreeMap;
use std::sync::Arc;

use grrow_core::model::{
    Circle, MAX_QUESTIONS_PER_SKILLSET, Question, QuestionId, QuizDefinition, RecordId,
    SkillsetBlock, Strength,
};

use crate::error::LoaderError;
use crate::provider::{AirtableSource, ProviderRecord, QuestionSource};

/// A freshly assembled definition plus load diagnostics.
#[derive(Debug, Clone)]
pub struct LoadedQuiz {
    pub definition: QuizDefinition,
    /// Rows dropped during validation. Non-zero is not a failure; it means
    /// part of the authored table was unusable.
    pub skipped_rows: usize,
}

/// Fetches, validates, groups and orders quiz content for one circle.
#[derive(Clone)]
pub struct QuizLoader {
    source: Arc<dyn QuestionSource>,
}

impl QuizLoader {
    #[must_use]
    pub fn new(source: Arc<dyn QuestionSource>) -> Self {
        Self { source }
    }

    /// Builds a loader backed by Airtable, configured from the environment.
    ///
    /// # Errors
    ///
    /// Returns `LoaderError::NotConfigured` when credentials are absent.
    pub fn airtable_from_env() -> Result<Self, LoaderError> {
        Ok(Self::new(Arc::new(AirtableSource::from_env()?)))
    }

    /// Loads the definition for `circle` at `version`.
    ///
    /// Zero matching rows is success: the definition is simply empty.
    ///
    /// # Errors
    ///
    /// Any provider failure aborts the whole load; no partial definition is
    /// returned.
    pub async fn load_quiz_definition(
        &self,
        circle: Circle,
        version: &str,
    ) -> Result<QuizDefinition, LoaderError> {
        self.load(circle, version).await.map(|loaded| loaded.definition)
    }

    /// Loads the definition along with skip diagnostics.
    ///
    /// # Errors
    ///
    /// See [`QuizLoader::load_quiz_definition`].
    pub async fn load(&self, circle: Circle, version: &str) -> Result<LoadedQuiz, LoaderError> {
        // Grouping and ordering need the complete row set, so every page is
        // accumulated before any processing starts.
        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        let mut pages = 0usize;
        loop {
            let page = self
                .source
                .fetch_page(circle, version, offset.as_deref())
                .await?;
            pages += 1;
            records.extend(page.records);
            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }
        tracing::debug!(circle = %circle, version, pages, rows = records.len(), "fetched question rows");

        let mut skipped = 0usize;
        let mut groups: BTreeMap<(String, String), RowGroup> = BTreeMap::new();
        for record in records {
            let Some(row) = ValidRow::from_record(record) else {
                skipped += 1;
                continue;
            };
            let key = (row.strength.name().to_string(), row.skillset.clone());
            groups.entry(key).or_default().push(row);
        }
        if skipped > 0 {
            tracing::warn!(skipped, circle = %circle, "dropped rows missing required fields");
        }

        let mut blocks = Vec::with_capacity(groups.len());
        for ((_, skillset), group) in groups {
            match group.into_block(&skillset, &mut skipped) {
                Some(block) => blocks.push(block),
                None => tracing::warn!(skillset, "skillset produced no usable questions"),
            }
        }

        Ok(LoadedQuiz {
            definition: QuizDefinition::new(circle, version, blocks),
            skipped_rows: skipped,
        })
    }
}

/// A provider row that passed field validation.
#[derive(Debug)]
struct ValidRow {
    record_id: RecordId,
    question_id: QuestionId,
    strength: Strength,
    strength_order: Option<u32>,
    skillset: String,
    objective: Option<String>,
    text: String,
    declared_order: u8,
}

impl ValidRow {
    /// Validates one raw row; `None` means the row is dropped (counted, not
    /// fatal).
    fn from_record(record: ProviderRecord) -> Option<Self> {
        let fields = record.fields;
        let text = non_blank(fields.question)?;
        let _circle_label = non_blank(fields.circle)?;
        let strength_label = non_blank(fields.strength)?;
        let skillset = non_blank(fields.skillset)?;
        let declared_order = fields.question_order?;
        if record.id.trim().is_empty() {
            return None;
        }

        let question_id = fields
            .question_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| record.id.clone());

        Some(Self {
            record_id: RecordId::new(record.id),
            question_id: QuestionId::new(question_id),
            strength: Strength::parse(&strength_label),
            strength_order: fields.strength_order,
            skillset,
            objective: fields.objective.filter(|o| !o.trim().is_empty()),
            text,
            declared_order,
        })
    }
}

/// Rows accumulated for one `(strength, skillset)` pair.
#[derive(Debug, Default)]
struct RowGroup {
    rows: Vec<ValidRow>,
}

impl RowGroup {
    fn push(&mut self, row: ValidRow) {
        self.rows.push(row);
    }

    /// Orders the group's questions and builds the block.
    ///
    /// Rows sort by declared order with the record id breaking ties, then
    /// positions are renumbered 1..n so the block's strictly-ascending
    /// invariant holds even when source data declared duplicate orders.
    fn into_block(mut self, skillset: &str, skipped: &mut usize) -> Option<SkillsetBlock> {
        self.rows
            .sort_by(|a, b| {
                a.declared_order
                    .cmp(&b.declared_order)
                    .then_with(|| a.record_id.cmp(&b.record_id))
            });
        if self.rows.len() > MAX_QUESTIONS_PER_SKILLSET {
            *skipped += self.rows.len() - MAX_QUESTIONS_PER_SKILLSET;
            tracing::warn!(
                skillset,
                surplus = self.rows.len() - MAX_QUESTIONS_PER_SKILLSET,
                "skillset has more questions than fit; keeping the first three"
            );
            self.rows.truncate(MAX_QUESTIONS_PER_SKILLSET);
        }

        let strength = self.rows.first()?.strength.clone();
        let strength_order = self
            .rows
            .iter()
            .find_map(|row| row.strength_order)
            .unwrap_or_else(|| strength.rank());
        let objective = self
            .rows
            .iter()
            .find_map(|row| row.objective.clone())
            .unwrap_or_default();

        let mut questions = Vec::with_capacity(self.rows.len());
        for (index, row) in self.rows.into_iter().enumerate() {
            let position = u8::try_from(index + 1).ok()?;
            match Question::new(row.question_id, row.text, position) {
                Ok(question) => questions.push(question),
                Err(_) => *skipped += 1,
            }
        }

        SkillsetBlock::new(strength, strength_order, skillset, objective, questions).ok()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{RecordFields, RecordPage};
    use async_trait::async_trait;

    /// Serves a fixed page sequence; fails the load at `fail_at` if set.
    struct FakeSource {
        pages: Vec<RecordPage>,
        fail_at: Option<usize>,
    }

    impl FakeSource {
        fn new(pages: Vec<RecordPage>) -> Self {
            Self { pages, fail_at: None }
        }
    }

    #[async_trait]
    impl QuestionSource for FakeSource {
        async fn fetch_page(
            &self,
            _circle: Circle,
            _version: &str,
            offset: Option<&str>,
        ) -> Result<RecordPage, LoaderError> {
            let index = offset.map_or(0, |o| o.parse::<usize>().unwrap());
            if self.fail_at == Some(index) {
                return Err(LoaderError::Provider {
                    status: reqwest::StatusCode::BAD_GATEWAY,
                    body: "upstream unavailable".to_string(),
                });
            }
            Ok(self.pages[index].clone())
        }
    }

    fn record(id: &str, strength: &str, skillset: &str, order: u8, text: &str) -> ProviderRecord {
        ProviderRecord {
            id: id.to_string(),
            fields: RecordFields {
                question: Some(text.to_string()),
                circle: Some("Essentials".to_string()),
                strength: Some(strength.to_string()),
                strength_order: None,
                skillset: Some(skillset.to_string()),
                objective: Some(format!("{skillset} objective")),
                question_order: Some(order),
                question_id: Some(format!("{id}-qid")),
            },
        }
    }

    fn loader_for(pages: Vec<RecordPage>) -> QuizLoader {
        QuizLoader::new(Arc::new(FakeSource::new(pages)))
    }

    fn paged(records: Vec<Vec<ProviderRecord>>) -> Vec<RecordPage> {
        let last = records.len() - 1;
        records
            .into_iter()
            .enumerate()
            .map(|(i, records)| RecordPage {
                records,
                offset: (i < last).then(|| (i + 1).to_string()),
            })
            .collect()
    }

    #[tokio::test]
    async fn aggregates_every_page_before_grouping() {
        // 100 + 100 + 37 rows, one question per row, three per skillset.
        let mut pages = Vec::new();
        let mut row = 0usize;
        for size in [100usize, 100, 37] {
            let mut records = Vec::new();
            for _ in 0..size {
                records.push(record(
                    &format!("rec{row:03}"),
                    "Creativity",
                    &format!("Skillset {:03}", row / 3),
                    u8::try_from(row % 3).unwrap() + 1,
                    "How often do you do this?",
                ));
                row += 1;
            }
            records.sort_by(|a, b| a.id.cmp(&b.id));
            pages.push(records);
        }

        let loaded = loader_for(paged(pages))
            .load(Circle::Essentials, "v1.0")
            .await
            .unwrap();

        assert_eq!(loaded.skipped_rows, 0);
        assert_eq!(loaded.definition.total_questions(), 237);
        assert_eq!(loaded.definition.strengths().len(), 79);
    }

    #[tokio::test]
    async fn provider_failure_mid_paging_aborts_the_load() {
        let mut source = FakeSource::new(paged(vec![
            vec![record("rec1", "Creativity", "Innovate", 1, "Q1")],
            vec![record("rec2", "Creativity", "Innovate", 2, "Q2")],
        ]));
        source.fail_at = Some(1);
        let loader = QuizLoader::new(Arc::new(source));

        let err = loader.load(Circle::Essentials, "v1.0").await.unwrap_err();
        match err {
            LoaderError::Provider { status, body } => {
                assert_eq!(status, reqwest::StatusCode::BAD_GATEWAY);
                assert_eq!(body, "upstream unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_rows_are_counted_not_fatal() {
        let mut missing_text = record("rec2", "Creativity", "Innovate", 2, "x");
        missing_text.fields.question = None;
        let mut missing_order = record("rec3", "Creativity", "Innovate", 3, "Q3");
        missing_order.fields.question_order = None;

        let loaded = loader_for(paged(vec![vec![
            record("rec1", "Creativity", "Innovate", 1, "Q1"),
            missing_text,
            missing_order,
        ]]))
        .load(Circle::Essentials, "v1.0")
        .await
        .unwrap();

        assert_eq!(loaded.skipped_rows, 2);
        assert_eq!(loaded.definition.total_questions(), 1);
    }

    #[tokio::test]
    async fn duplicate_orders_break_ties_by_record_id_and_renumber() {
        let loaded = loader_for(paged(vec![vec![
            record("recB", "Creativity", "Innovate", 2, "second by id"),
            record("recA", "Creativity", "Innovate", 2, "first by id"),
            record("recC", "Creativity", "Innovate", 1, "declared first"),
        ]]))
        .load(Circle::Essentials, "v1.0")
        .await
        .unwrap();

        let block = &loaded.definition.strengths()[0];
        let texts: Vec<_> = block.questions().iter().map(|q| q.text()).collect();
        assert_eq!(texts, vec!["declared first", "first by id", "second by id"]);

        let orders: Vec<_> = block.questions().iter().map(|q| q.order()).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn unrecognized_strengths_sort_after_canonical_ones() {
        let loaded = loader_for(paged(vec![vec![
            record("rec1", "grit and HUSTLE", "Persist", 1, "Q1"),
            record("rec2", "Communication", "Present", 1, "Q2"),
        ]]))
        .load(Circle::Essentials, "v1.0")
        .await
        .unwrap();

        let blocks = loaded.definition.strengths();
        assert_eq!(blocks[0].strength().name(), "Communication");
        assert_eq!(blocks[1].strength().name(), "Grit And Hustle");
        assert!(blocks[1].strength_order() > blocks[0].strength_order());
    }

    #[tokio::test]
    async fn declared_strength_order_wins_over_canonical_rank() {
        let mut flipped = record("rec1", "Communication", "Present", 1, "Q1");
        flipped.fields.strength_order = Some(1);
        let loaded = loader_for(paged(vec![vec![
            flipped,
            record("rec2", "Critical Thinking", "Clarify", 1, "Q2"),
        ]]))
        .load(Circle::Essentials, "v1.0")
        .await
        .unwrap();

        // Both declare rank 1; the skillset name decides.
        let names: Vec<_> = loaded
            .definition
            .strengths()
            .iter()
            .map(SkillsetBlock::skillset)
            .collect();
        assert_eq!(names, vec!["Clarify", "Present"]);
    }

    #[tokio::test]
    async fn zero_matching_rows_is_an_empty_definition_not_an_error() {
        let loaded = loader_for(vec![RecordPage::default()])
            .load(Circle::Leading, "v1.0")
            .await
            .unwrap();

        assert!(loaded.definition.is_empty());
        assert_eq!(loaded.skipped_rows, 0);
        assert_eq!(loaded.definition.circle(), Circle::Leading);
    }

    #[tokio::test]
    async fn loading_the_same_rows_twice_is_deterministic() {
        let rows = vec![
            record("rec3", "Collaboration", "Listen", 2, "Q3"),
            record("rec1", "Creativity", "Innovate", 1, "Q1"),
            record("rec2", "Creativity", "Simplify", 1, "Q2"),
        ];
        let loader = loader_for(paged(vec![rows]));

        let first = loader.load(Circle::Essentials, "v1.0").await.unwrap();
        let second = loader.load(Circle::Essentials, "v1.0").await.unwrap();
        assert_eq!(first.definition, second.definition);
    }
}
