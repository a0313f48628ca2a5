use std::sync::Arc;

use super::crud::Resource;
use super::request::ResourceRequest;
use super::response::ResourceError;
use crate::model::domain::contains_ignore_case;
use crate::model::{Choice, ChoiceId, ChoiceView, NewChoice, QuestionId};
use crate::store::{PollRepository, RepositoryError};

pub struct ChoiceResource<R> {
    store: Arc<R>,
}

impl<R> ChoiceResource<R> {
    pub fn new(store: Arc<R>) -> Self {
        Self { store }
    }
}

impl<R: PollRepository> Resource for ChoiceResource<R> {
    type Id = ChoiceId;
    type Entity = Choice;
    type View = ChoiceView;

    const LABEL: &'static str = "Choice";
    const TEXT_FIELD: &'static str = "choice_text";
    const TEXT_LABEL: &'static str = "Choice text";
    const ID_LABEL: &'static str = "Choice ID";
    const FILTER_FIELD: &'static str = "choice_text__icontains";

    fn lookup(&self, id: ChoiceId) -> Result<Option<Choice>, RepositoryError> {
        self.store.choice(id)
    }

    fn search(&self, needle: Option<&str>) -> Result<Vec<Choice>, RepositoryError> {
        let mut choices = self.store.choices()?;
        if let Some(needle) = needle {
            choices.retain(|choice| contains_ignore_case(&choice.choice_text, needle));
        }
        Ok(choices)
    }

    /// The owning question comes from the path when routed under a question, otherwise
    /// from the `question_id` body field. An absent id is reported like an unknown one.
    fn insert(&self, text: String, request: &ResourceRequest) -> Result<Choice, ResourceError> {
        let question_id = request
            .parent()
            .or_else(|| request.id_field("question_id"))
            .map(QuestionId)
            .ok_or(ResourceError::UnknownReference("Question"))?;

        self.store
            .insert_choice(NewChoice {
                question_id,
                choice_text: text,
            })?
            .ok_or(ResourceError::UnknownReference("Question"))
    }

    fn rename(&self, id: ChoiceId, text: String) -> Result<Option<Choice>, RepositoryError> {
        self.store.update_choice(id, |choice| {
            choice.choice_text = text;
            choice.clone()
        })
    }

    fn remove(&self, id: ChoiceId) -> Result<bool, RepositoryError> {
        self.store.delete_choice(id)
    }

    fn serialize(&self, choice: &Choice) -> ChoiceView {
        ChoiceView::from(choice)
    }
}
