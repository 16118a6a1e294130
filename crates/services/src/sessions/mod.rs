mod engine;
mod progress;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use engine::{Pointer, QuizSession};
pub use progress::SessionProgress;
pub use view::{IntroView, QuestionView, SessionView, SkillsetScore, SummaryView};
pub use workflow::QuizFlowService;
