use thiserror::Error;

use crate::model::QuestionId;

/// Lowest question position within a skillset block.
pub const QUESTION_ORDER_MIN: u8 = 1;
/// Highest question position within a skillset block.
pub const QUESTION_ORDER_MAX: u8 = 3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question order {order} is outside 1..=3")]
    OrderOutOfRange { order: u8 },
}

/// An atomic self-assessment prompt, validated and immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    order: u8,
}

impl Question {
    /// Builds a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` if the text is blank and
    /// `QuestionError::OrderOutOfRange` if `order` is not in 1..=3.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        order: u8,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if !(QUESTION_ORDER_MIN..=QUESTION_ORDER_MAX).contains(&order) {
            return Err(QuestionError::OrderOutOfRange { order });
        }

        Ok(Self { id, text, order })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Position within the skillset block (1..=3).
    #[must_use]
    pub fn order(&self) -> u8 {
        self.order
    }
}
