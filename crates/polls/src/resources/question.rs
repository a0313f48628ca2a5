use std::sync::Arc;

use super::crud::Resource;
use super::request::ResourceRequest;
use super::response::ResourceError;
use crate::model::domain::contains_ignore_case;
use crate::model::{Clock, NewQuestion, Question, QuestionId, QuestionView};
use crate::store::{PollRepository, RepositoryError};

/// Questions as seen by the public API: only published ones can be listed or fetched,
/// and the listing is capped to the most recent few.
pub struct QuestionResource<R> {
    store: Arc<R>,
    clock: Arc<dyn Clock>,
    latest_limit: usize,
}

impl<R> QuestionResource<R> {
    pub fn new(store: Arc<R>, clock: Arc<dyn Clock>, latest_limit: usize) -> Self {
        Self {
            store,
            clock,
            latest_limit,
        }
    }
}

impl<R: PollRepository> Resource for QuestionResource<R> {
    type Id = QuestionId;
    type Entity = Question;
    type View = QuestionView;

    const LABEL: &'static str = "Question";
    const TEXT_FIELD: &'static str = "question_text";
    const TEXT_LABEL: &'static str = "Question text";
    const ID_LABEL: &'static str = "Question ID";
    const FILTER_FIELD: &'static str = "question_text__icontains";

    fn lookup(&self, id: QuestionId) -> Result<Option<Question>, RepositoryError> {
        let now = self.clock.now();
        Ok(self
            .store
            .question(id)?
            .filter(|question| question.is_published(now)))
    }

    fn search(&self, needle: Option<&str>) -> Result<Vec<Question>, RepositoryError> {
        let now = self.clock.now();
        let mut questions: Vec<Question> = self
            .store
            .questions()?
            .into_iter()
            .filter(|question| question.is_published(now))
            .filter(|question| {
                needle.map_or(true, |needle| {
                    contains_ignore_case(&question.question_text, needle)
                })
            })
            .collect();

        questions.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        questions.truncate(self.latest_limit);
        Ok(questions)
    }

    fn insert(&self, text: String, request: &ResourceRequest) -> Result<Question, ResourceError> {
        let pub_date = request
            .timestamp("pub_date")?
            .unwrap_or_else(|| self.clock.now());
        let question = self.store.insert_question(NewQuestion {
            question_text: text,
            pub_date,
        })?;
        Ok(question)
    }

    fn rename(&self, id: QuestionId, text: String) -> Result<Option<Question>, RepositoryError> {
        self.store.rename_question(id, text)
    }

    fn remove(&self, id: QuestionId) -> Result<bool, RepositoryError> {
        self.store.delete_question(id)
    }

    fn serialize(&self, question: &Question) -> QuestionView {
        QuestionView::from(question)
    }
}
