use thiserror::Error;

use crate::model::{Circle, Question, Strength};

/// Most questions a single skillset block may hold.
pub const MAX_QUESTIONS_PER_SKILLSET: usize = 3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("skillset name cannot be empty")]
    EmptySkillsetName,

    #[error("a skillset block needs at least one question")]
    NoQuestions,

    #[error("too many questions for one skillset: {len}")]
    TooManyQuestions { len: usize },

    #[error("duplicate question order {order} within a skillset")]
    DuplicateQuestionOrder { order: u8 },

    #[error("question orders must be strictly ascending")]
    UnorderedQuestions,
}

/// A named sub-skill: one objective blurb plus up to three ordered questions.
///
/// The question sequence is an invariant of the type: strictly ascending,
/// unique orders, never more than [`MAX_QUESTIONS_PER_SKILLSET`].
#[derive(Debug, Clone, PartialEq)]
pub struct SkillsetBlock {
    strength: Strength,
    strength_order: u32,
    skillset: String,
    objective: String,
    questions: Vec<Question>,
}

impl SkillsetBlock {
    /// Builds a validated block.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` when the skillset name is blank, the question list
    /// is empty or oversized, or question orders are not strictly ascending.
    pub fn new(
        strength: Strength,
        strength_order: u32,
        skillset: impl Into<String>,
        objective: impl Into<String>,
        questions: Vec<Question>,
    ) -> Result<Self, QuizError> {
        let skillset = skillset.into();
        if skillset.trim().is_empty() {
            return Err(QuizError::EmptySkillsetName);
        }
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        if questions.len() > MAX_QUESTIONS_PER_SKILLSET {
            return Err(QuizError::TooManyQuestions {
                len: questions.len(),
            });
        }
        for pair in questions.windows(2) {
            if pair[1].order() == pair[0].order() {
                return Err(QuizError::DuplicateQuestionOrder {
                    order: pair[0].order(),
                });
            }
            if pair[1].order() < pair[0].order() {
                return Err(QuizError::UnorderedQuestions);
            }
        }

        Ok(Self {
            strength,
            strength_order,
            skillset,
            objective: objective.into(),
            questions,
        })
    }

    #[must_use]
    pub fn strength(&self) -> &Strength {
        &self.strength
    }

    /// Display rank used to order blocks within a definition.
    #[must_use]
    pub fn strength_order(&self) -> u32 {
        self.strength_order
    }

    #[must_use]
    pub fn skillset(&self) -> &str {
        &self.skillset
    }

    /// Objective blurb shown once before the block's questions.
    #[must_use]
    pub fn objective(&self) -> &str {
        &self.objective
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

/// Immutable snapshot of one circle's quiz content.
///
/// Rebuilt wholesale on every load, never mutated in place. Blocks are held
/// ascending by `(strength_order, skillset)`, so two definitions assembled
/// from the same blocks are identically ordered.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizDefinition {
    circle: Circle,
    version: String,
    strengths: Vec<SkillsetBlock>,
}

impl QuizDefinition {
    /// Assembles a definition, sorting blocks into canonical order.
    ///
    /// An empty block list is valid: it models a circle with no authored
    /// content yet.
    #[must_use]
    pub fn new(circle: Circle, version: impl Into<String>, mut strengths: Vec<SkillsetBlock>) -> Self {
        strengths.sort_by(|a, b| {
            a.strength_order()
                .cmp(&b.strength_order())
                .then_with(|| a.skillset().cmp(b.skillset()))
        });

        Self {
            circle,
            version: version.into(),
            strengths,
        }
    }

    #[must_use]
    pub fn circle(&self) -> Circle {
        self.circle
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn strengths(&self) -> &[SkillsetBlock] {
        &self.strengths
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strengths.is_empty()
    }

    /// Total question count across all blocks.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.strengths.iter().map(SkillsetBlock::question_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionId;

    fn question(id: &str, order: u8) -> Question {
        Question::new(QuestionId::new(id), format!("Question {id}"), order).unwrap()
    }

    fn block(strength: Strength, order: u32, skillset: &str) -> SkillsetBlock {
        SkillsetBlock::new(
            strength,
            order,
            skillset,
            "Objective",
            vec![question(&format!("{skillset}-1"), 1)],
        )
        .unwrap()
    }

    #[test]
    fn rejects_duplicate_question_orders() {
        let err = SkillsetBlock::new(
            Strength::Creativity,
            2,
            "Innovate",
            "Objective",
            vec![question("a", 2), question("b", 2)],
        )
        .unwrap_err();
        assert_eq!(err, QuizError::DuplicateQuestionOrder { order: 2 });
    }

    #[test]
    fn rejects_descending_question_orders() {
        let err = SkillsetBlock::new(
            Strength::Creativity,
            2,
            "Innovate",
            "Objective",
            vec![question("a", 3), question("b", 1)],
        )
        .unwrap_err();
        assert_eq!(err, QuizError::UnorderedQuestions);
    }

    #[test]
    fn rejects_oversized_blocks() {
        let questions = vec![
            question("a", 1),
            question("b", 2),
            question("c", 3),
            Question::new(QuestionId::new("d"), "extra", 3).unwrap(),
        ];
        let err = SkillsetBlock::new(Strength::Creativity, 2, "Innovate", "", questions)
            .unwrap_err();
        assert_eq!(err, QuizError::TooManyQuestions { len: 4 });
    }

    #[test]
    fn definition_orders_blocks_by_rank_then_name() {
        let definition = QuizDefinition::new(
            Circle::Essentials,
            "v1.0",
            vec![
                block(Strength::Communication, 4, "Present"),
                block(Strength::CriticalThinking, 1, "Clarify"),
                block(Strength::CriticalThinking, 1, "Analyze"),
            ],
        );

        let names: Vec<_> = definition
            .strengths()
            .iter()
            .map(SkillsetBlock::skillset)
            .collect();
        assert_eq!(names, vec!["Analyze", "Clarify", "Present"]);
    }

    #[test]
    fn empty_definition_is_valid() {
        let definition = QuizDefinition::new(Circle::Leading, "v1.0", Vec::new());
        assert!(definition.is_empty());
        assert_eq!(definition.total_questions(), 0);
    }
}
