use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;

use grrow_core::model::{Circle, QuestionId, QuizDefinition, score_in_domain};

use crate::error::SessionError;
use super::progress::SessionProgress;
use super::view::SessionView;

//
// ─── POINTER ───────────────────────────────────────────────────────────────────
//

/// Position of a session within its circle's nested structure.
///
/// `slot` is 1-based, matching the "question 2 of 3" counters shown to the
/// user. `Summary` is terminal for the circle; only an explicit circle switch
/// leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointer {
    Intro(usize),
    Question { strength: usize, slot: usize },
    Summary,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One user's traversal state and recorded answers for a single circle.
///
/// Owns its definition and answer map exclusively; every mutation goes
/// through `advance`/`retreat`/`record_answer`. Nothing here is shared
/// process-wide, so multiple sessions can coexist.
pub struct QuizSession {
    definition: QuizDefinition,
    pointer: Pointer,
    answers: HashMap<QuestionId, f64>,
    started_at: DateTime<Utc>,
}

impl QuizSession {
    /// Binds a fresh session to a definition: pointer at the first intro,
    /// answers empty.
    ///
    /// A session over an empty definition starts (and stays) at `Summary`;
    /// there is no intro to point at.
    #[must_use]
    pub fn new(definition: QuizDefinition, started_at: DateTime<Utc>) -> Self {
        let pointer = if definition.is_empty() {
            Pointer::Summary
        } else {
            Pointer::Intro(0)
        };

        Self {
            definition,
            pointer,
            answers: HashMap::new(),
            started_at,
        }
    }

    #[must_use]
    pub fn definition(&self) -> &QuizDefinition {
        &self.definition
    }

    #[must_use]
    pub fn circle(&self) -> Circle {
        self.definition.circle()
    }

    #[must_use]
    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// True once the pointer has reached the circle summary.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.pointer == Pointer::Summary
    }

    /// Steps forward through intro → questions → next intro → … → summary.
    ///
    /// Returns `false` (and leaves the state untouched) when already at
    /// `Summary` — a structural no-op, not an error.
    pub fn advance(&mut self) -> bool {
        let next = match self.pointer {
            Pointer::Intro(strength) => Pointer::Question { strength, slot: 1 },
            Pointer::Question { strength, slot } => {
                if slot < self.block_len(strength) {
                    Pointer::Question {
                        strength,
                        slot: slot + 1,
                    }
                } else if strength + 1 < self.definition.strengths().len() {
                    Pointer::Intro(strength + 1)
                } else {
                    Pointer::Summary
                }
            }
            Pointer::Summary => return false,
        };

        self.pointer = next;
        true
    }

    /// Exact structural inverse of [`QuizSession::advance`], including
    /// crossing back over a block boundary onto the previous block's last
    /// question.
    ///
    /// Returns `false` at the very first intro (or on an empty definition).
    pub fn retreat(&mut self) -> bool {
        let previous = match self.pointer {
            Pointer::Intro(0) => return false,
            Pointer::Intro(strength) => Pointer::Question {
                strength: strength - 1,
                slot: self.block_len(strength - 1),
            },
            Pointer::Question { strength, slot: 1 } => Pointer::Intro(strength),
            Pointer::Question { strength, slot } => Pointer::Question {
                strength,
                slot: slot - 1,
            },
            Pointer::Summary => {
                let Some(last) = self.definition.strengths().len().checked_sub(1) else {
                    return false;
                };
                Pointer::Question {
                    strength: last,
                    slot: self.block_len(last),
                }
            }
        };

        self.pointer = previous;
        true
    }

    /// Records (or overwrites) an answer, addressed by question id rather
    /// than pointer position so earlier answers can be corrected at any time.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AnswerOutOfDomain` when `value` is outside
    /// 0..=100; the previously stored value, if any, is left untouched.
    pub fn record_answer(&mut self, id: &QuestionId, value: f64) -> Result<(), SessionError> {
        if !score_in_domain(value) {
            return Err(SessionError::AnswerOutOfDomain { value });
        }
        self.answers.insert(id.clone(), value);
        Ok(())
    }

    /// The stored answer for a question, if any.
    #[must_use]
    pub fn answer(&self, id: &QuestionId) -> Option<f64> {
        self.answers.get(id).copied()
    }

    /// Mean over the answered questions of one skillset block.
    ///
    /// Unanswered questions are excluded from numerator and denominator
    /// alike; a block with one of three questions answered reports that
    /// answer's value undiluted. Returns `0.0` when nothing in the block is
    /// answered (or the index is out of range).
    #[must_use]
    pub fn skillset_average(&self, strength_index: usize) -> f64 {
        let Some(block) = self.definition.strengths().get(strength_index) else {
            return 0.0;
        };
        mean(block.questions().iter().filter_map(|q| self.answer(q.id())))
    }

    /// Mean over every answered question in the circle, with the same
    /// exclusion rule as [`QuizSession::skillset_average`].
    #[must_use]
    pub fn overall_average(&self) -> f64 {
        mean(
            self.definition
                .strengths()
                .iter()
                .flat_map(|block| block.questions())
                .filter_map(|q| self.answer(q.id())),
        )
    }

    /// Counters for the circle as a whole.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.definition.total_questions();
        let answered = self
            .definition
            .strengths()
            .iter()
            .flat_map(|block| block.questions())
            .filter(|q| self.answers.contains_key(q.id()))
            .count();

        SessionProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            is_complete: self.is_complete(),
        }
    }

    /// Read-only snapshot of whatever the pointer currently references.
    #[must_use]
    pub fn current_view(&self) -> SessionView {
        SessionView::of(self)
    }

    fn block_len(&self, strength_index: usize) -> usize {
        self.definition
            .strengths()
            .get(strength_index)
            .map_or(0, |block| block.question_count())
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    if count == 0 { 0.0 } else { sum / count as f64 }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("circle", &self.definition.circle())
            .field("blocks", &self.definition.strengths().len())
            .field("pointer", &self.pointer)
            .field("answers_len", &self.answers.len())
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
