use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::config::PollsConfig;
use crate::model::{
    Choice, ChoiceId, FixedClock, NewChoice, NewQuestion, Question, QuestionId,
};
use crate::resources::{poll_router, PollService};
use crate::store::{InMemoryPollStore, PollRepository, RepositoryError};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap()
}

pub(super) fn build_service() -> (PollService<InMemoryPollStore>, Arc<InMemoryPollStore>) {
    let store = Arc::new(InMemoryPollStore::new());
    let service = PollService::with_clock(
        store.clone(),
        &PollsConfig::default(),
        Arc::new(FixedClock(now())),
    );
    (service, store)
}

pub(super) fn body(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected JSON object, got {other}"),
    }
}

/// Store a question published `minutes` away from [`now`] (negative is the past).
pub(super) fn question_at(store: &InMemoryPollStore, text: &str, minutes: i64) -> Question {
    store
        .insert_question(NewQuestion {
            question_text: text.to_string(),
            pub_date: now() + Duration::minutes(minutes),
        })
        .expect("store available")
}

pub(super) fn add_choice(store: &InMemoryPollStore, question_id: QuestionId, text: &str) -> Choice {
    store
        .insert_choice(NewChoice {
            question_id,
            choice_text: text.to_string(),
        })
        .expect("store available")
        .expect("question exists")
}

pub(super) fn set_votes(store: &InMemoryPollStore, choice_id: ChoiceId, votes: u32) {
    store
        .update_choice(choice_id, |choice| choice.votes = votes)
        .expect("store available")
        .expect("choice exists");
}

pub(super) fn router_with_service(service: PollService<InMemoryPollStore>) -> axum::Router {
    poll_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Backend that is always down.
pub(super) struct UnavailableStore;

fn down() -> RepositoryError {
    RepositoryError::Unavailable("maintenance window".to_string())
}

impl PollRepository for UnavailableStore {
    fn insert_question(&self, _draft: NewQuestion) -> Result<Question, RepositoryError> {
        Err(down())
    }

    fn question(&self, _id: QuestionId) -> Result<Option<Question>, RepositoryError> {
        Err(down())
    }

    fn questions(&self) -> Result<Vec<Question>, RepositoryError> {
        Err(down())
    }

    fn rename_question(
        &self,
        _id: QuestionId,
        _question_text: String,
    ) -> Result<Option<Question>, RepositoryError> {
        Err(down())
    }

    fn delete_question(&self, _id: QuestionId) -> Result<bool, RepositoryError> {
        Err(down())
    }

    fn insert_choice(&self, _draft: NewChoice) -> Result<Option<Choice>, RepositoryError> {
        Err(down())
    }

    fn choice(&self, _id: ChoiceId) -> Result<Option<Choice>, RepositoryError> {
        Err(down())
    }

    fn choices(&self) -> Result<Vec<Choice>, RepositoryError> {
        Err(down())
    }

    fn update_choice<T, F>(&self, _id: ChoiceId, _edit: F) -> Result<Option<T>, RepositoryError>
    where
        F: FnOnce(&mut Choice) -> T,
    {
        Err(down())
    }

    fn delete_choice(&self, _id: ChoiceId) -> Result<bool, RepositoryError> {
        Err(down())
    }
}
