#![forbid(unsafe_code)]

pub mod error;
pub mod loader;
pub mod provider;
pub mod sessions;

pub use grrow_core::Clock;

pub use error::{LoaderError, SessionError};
pub use loader::{LoadedQuiz, QuizLoader};
pub use provider::{
    AirtableConfig, AirtableSource, ProviderRecord, QuestionSource, RecordFields, RecordPage,
};
pub use sessions::{
    Pointer, QuizFlowService, QuizSession, SessionProgress, SessionView, SkillsetScore,
};
