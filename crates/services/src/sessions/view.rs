use grrow_core::model::{Bucket, Circle, QuestionId};

use super::engine::{Pointer, QuizSession};
use super::progress::SessionProgress;

/// Read-only snapshot of whatever a session currently points at.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings
/// - no styling or localization assumptions
///
/// The presentation layer renders one of the three cards from it.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionView {
    Intro(IntroView),
    Question(QuestionView),
    Summary(SummaryView),
}

/// Skillset intro card: name and objective, shown once per block.
#[derive(Debug, Clone, PartialEq)]
pub struct IntroView {
    pub circle: Circle,
    pub strength: String,
    pub skillset: String,
    pub objective: String,
    /// 1-based block position, for "skillset 2 of 8" breadcrumbs.
    pub block_number: usize,
    pub block_total: usize,
}

/// Question card: prompt text plus any previously recorded value.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionView {
    pub circle: Circle,
    pub strength: String,
    pub skillset: String,
    pub question_id: QuestionId,
    pub text: String,
    pub recorded: Option<f64>,
    /// 1-based position within the block ("question 2 of 3").
    pub slot: usize,
    pub slot_total: usize,
    pub progress: SessionProgress,
}

/// One row of the circle summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillsetScore {
    pub strength: String,
    pub skillset: String,
    pub average: f64,
    pub bucket: Bucket,
}

/// Circle summary: per-skillset averages plus the overall snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView {
    pub circle: Circle,
    pub skillsets: Vec<SkillsetScore>,
    pub overall: f64,
    pub overall_bucket: Bucket,
}

impl SessionView {
    /// Builds the snapshot for the session's current pointer.
    #[must_use]
    pub fn of(session: &QuizSession) -> Self {
        let definition = session.definition();
        match session.pointer() {
            Pointer::Intro(index) => {
                let Some(block) = definition.strengths().get(index) else {
                    return Self::summary(session);
                };
                SessionView::Intro(IntroView {
                    circle: definition.circle(),
                    strength: block.strength().name().to_string(),
                    skillset: block.skillset().to_string(),
                    objective: block.objective().to_string(),
                    block_number: index + 1,
                    block_total: definition.strengths().len(),
                })
            }
            Pointer::Question { strength, slot } => {
                let question = definition
                    .strengths()
                    .get(strength)
                    .and_then(|block| block.questions().get(slot - 1));
                let (Some(block), Some(question)) =
                    (definition.strengths().get(strength), question)
                else {
                    return Self::summary(session);
                };
                SessionView::Question(QuestionView {
                    circle: definition.circle(),
                    strength: block.strength().name().to_string(),
                    skillset: block.skillset().to_string(),
                    question_id: question.id().clone(),
                    text: question.text().to_string(),
                    recorded: session.answer(question.id()),
                    slot,
                    slot_total: block.question_count(),
                    progress: session.progress(),
                })
            }
            Pointer::Summary => Self::summary(session),
        }
    }

    fn summary(session: &QuizSession) -> Self {
        let definition = session.definition();
        let skillsets = definition
            .strengths()
            .iter()
            .enumerate()
            .map(|(index, block)| {
                let average = session.skillset_average(index);
                SkillsetScore {
                    strength: block.strength().name().to_string(),
                    skillset: block.skillset().to_string(),
                    average,
                    bucket: Bucket::for_score(average),
                }
            })
            .collect();
        let overall = session.overall_average();

        SessionView::Summary(SummaryView {
            circle: definition.circle(),
            skillsets,
            overall,
            overall_bucket: Bucket::for_score(overall),
        })
    }
}
