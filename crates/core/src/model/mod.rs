mod circle;
mod ids;
mod question;
mod quiz;
mod score;
mod strength;

pub use circle::Circle;
pub use ids::{QuestionId, RecordId};
pub use question::{QUESTION_ORDER_MAX, QUESTION_ORDER_MIN, Question, QuestionError};
pub use quiz::{MAX_QUESTIONS_PER_SKILLSET, QuizDefinition, QuizError, SkillsetBlock};
pub use score::{Bucket, SCALE_ANCHORS, SCORE_MAX, SCORE_MIN, score_in_domain};
pub use strength::{Strength, UNRANKED};
