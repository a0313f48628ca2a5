use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::{PollRepository, RepositoryError};
use crate::model::{Choice, ChoiceId, NewChoice, NewQuestion, Question, QuestionId};

#[derive(Debug, Clone)]
struct QuestionRow {
    question_text: String,
    pub_date: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct PollTables {
    questions: BTreeMap<QuestionId, QuestionRow>,
    choices: BTreeMap<ChoiceId, Choice>,
    last_question_id: u64,
    last_choice_id: u64,
}

impl PollTables {
    fn hydrate(&self, id: QuestionId, row: &QuestionRow) -> Question {
        Question {
            id,
            question_text: row.question_text.clone(),
            pub_date: row.pub_date,
            choices: self
                .choices
                .values()
                .filter(|choice| choice.question_id == id)
                .cloned()
                .collect(),
        }
    }
}

/// Process-local store. One mutex covers both tables, so every trait call is atomic.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPollStore {
    tables: Arc<Mutex<PollTables>>,
}

impl InMemoryPollStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, PollTables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("poll store mutex poisoned".to_string()))
    }
}

impl PollRepository for InMemoryPollStore {
    fn insert_question(&self, draft: NewQuestion) -> Result<Question, RepositoryError> {
        let mut tables = self.lock()?;
        tables.last_question_id += 1;
        let id = QuestionId(tables.last_question_id);
        tables.questions.insert(
            id,
            QuestionRow {
                question_text: draft.question_text.clone(),
                pub_date: draft.pub_date,
            },
        );

        Ok(Question {
            id,
            question_text: draft.question_text,
            pub_date: draft.pub_date,
            choices: Vec::new(),
        })
    }

    fn question(&self, id: QuestionId) -> Result<Option<Question>, RepositoryError> {
        let tables = self.lock()?;
        Ok(tables.questions.get(&id).map(|row| tables.hydrate(id, row)))
    }

    fn questions(&self) -> Result<Vec<Question>, RepositoryError> {
        let tables = self.lock()?;
        Ok(tables
            .questions
            .iter()
            .map(|(id, row)| tables.hydrate(*id, row))
            .collect())
    }

    fn rename_question(
        &self,
        id: QuestionId,
        question_text: String,
    ) -> Result<Option<Question>, RepositoryError> {
        let mut tables = self.lock()?;
        let Some(row) = tables.questions.get_mut(&id) else {
            return Ok(None);
        };
        row.question_text = question_text;
        let row = row.clone();
        Ok(Some(tables.hydrate(id, &row)))
    }

    fn delete_question(&self, id: QuestionId) -> Result<bool, RepositoryError> {
        let mut tables = self.lock()?;
        if tables.questions.remove(&id).is_none() {
            return Ok(false);
        }
        tables.choices.retain(|_, choice| choice.question_id != id);
        Ok(true)
    }

    fn insert_choice(&self, draft: NewChoice) -> Result<Option<Choice>, RepositoryError> {
        let mut tables = self.lock()?;
        if !tables.questions.contains_key(&draft.question_id) {
            return Ok(None);
        }

        tables.last_choice_id += 1;
        let choice = Choice {
            id: ChoiceId(tables.last_choice_id),
            question_id: draft.question_id,
            choice_text: draft.choice_text,
            votes: 0,
        };
        tables.choices.insert(choice.id, choice.clone());
        Ok(Some(choice))
    }

    fn choice(&self, id: ChoiceId) -> Result<Option<Choice>, RepositoryError> {
        Ok(self.lock()?.choices.get(&id).cloned())
    }

    fn choices(&self) -> Result<Vec<Choice>, RepositoryError> {
        Ok(self.lock()?.choices.values().cloned().collect())
    }

    fn update_choice<T, F>(&self, id: ChoiceId, edit: F) -> Result<Option<T>, RepositoryError>
    where
        F: FnOnce(&mut Choice) -> T,
    {
        let mut tables = self.lock()?;
        Ok(tables.choices.get_mut(&id).map(edit))
    }

    fn delete_choice(&self, id: ChoiceId) -> Result<bool, RepositoryError> {
        Ok(self.lock()?.choices.remove(&id).is_some())
    }
}
