//! Persistence boundary for questions and choices.

mod memory;

pub use memory::InMemoryPollStore;

use crate::model::{Choice, ChoiceId, NewChoice, NewQuestion, Question, QuestionId};

/// Storage abstraction so resources can be exercised against any backend.
///
/// Reads hand back questions with their choices already attached. Every method
/// is a single atomic step against the store.
pub trait PollRepository: Send + Sync {
    fn insert_question(&self, draft: NewQuestion) -> Result<Question, RepositoryError>;
    fn question(&self, id: QuestionId) -> Result<Option<Question>, RepositoryError>;
    fn questions(&self) -> Result<Vec<Question>, RepositoryError>;
    fn rename_question(
        &self,
        id: QuestionId,
        question_text: String,
    ) -> Result<Option<Question>, RepositoryError>;
    /// Removes the question and every choice it owns. `false` when nothing matched.
    fn delete_question(&self, id: QuestionId) -> Result<bool, RepositoryError>;

    /// `Ok(None)` when the referenced question does not exist; nothing is stored then.
    fn insert_choice(&self, draft: NewChoice) -> Result<Option<Choice>, RepositoryError>;
    fn choice(&self, id: ChoiceId) -> Result<Option<Choice>, RepositoryError>;
    fn choices(&self) -> Result<Vec<Choice>, RepositoryError>;
    /// Read-modify-write on one choice without interleaving other writers.
    fn update_choice<T, F>(&self, id: ChoiceId, edit: F) -> Result<Option<T>, RepositoryError>
    where
        F: FnOnce(&mut Choice) -> T;
    fn delete_choice(&self, id: ChoiceId) -> Result<bool, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
