//! Question answering over Bhagavad Gita verses.
//!
//! [`AnswerEngine::answer`] runs one question through a fixed sequence:
//! retrieve the closest verses from a [`verse_store::VerseIndex`], assemble a
//! context block ([`assemble`]), ask the model for an answer ([`prompt`],
//! [`generation`]), ask again for follow-up questions and parse them
//! ([`related`]). Any failure is turned into a [`ClassifiedError`]
//! ([`classify`]).

pub mod assemble;
pub mod cfg;
pub mod classify;
pub mod generation;
pub mod pipeline;
pub mod prompt;
pub mod related;

mod api_types;
mod error;

pub use api_types::{DEFAULT_NUM_VERSES, DisplayVerse, QueryRequest, QueryResponse};
pub use cfg::EngineConfig;
pub use classify::{ClassifiedError, ErrorType};
pub use error::EngineError;
pub use generation::TextGenerator;
pub use pipeline::{AnswerEngine, EngineDeps, Stage};
