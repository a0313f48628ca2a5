use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequestParts, Path, Query, State},
    http::request::Parts,
    routing::{delete, get, post, put, MethodRouter},
    Router,
};

use super::crud;
use super::request::ResourceRequest;
use super::response::{ResourceError, ResourceResponse, VoteResponse};
use super::service::PollService;
use crate::model::{ChoiceId, ChoiceView, QuestionId, QuestionView, VoteReceipt, VoteTally};
use crate::store::PollRepository;

type Service<R> = State<Arc<PollService<R>>>;
type Outcome<T> = Result<ResourceResponse<T>, ResourceError>;

/// Router builder exposing the question, choice and voting endpoints.
///
/// Unknown paths and unsupported methods answer with the same JSON error envelope as
/// the handlers.
pub fn poll_router<R>(service: Arc<PollService<R>>) -> Router
where
    R: PollRepository + 'static,
{
    Router::new()
        .route("/questions/", json_errors(get(list_questions::<R>)))
        .route("/questions/create/", json_errors(post(create_question::<R>)))
        .route("/questions/:question_id/", json_errors(get(question_detail::<R>)))
        .route(
            "/questions/:question_id/results/",
            json_errors(get(question_detail::<R>)),
        )
        .route("/questions/:question_id/vote/", json_errors(post(vote::<R>)))
        .route(
            "/questions/:question_id/edit/",
            json_errors(put(edit_question::<R>)),
        )
        .route(
            "/questions/:question_id/delete/",
            json_errors(delete(delete_question::<R>)),
        )
        .route(
            "/questions/:question_id/add_choice/",
            json_errors(post(add_choice::<R>)),
        )
        .route("/choice/", json_errors(get(list_choices::<R>)))
        .route("/choice/:choice_id/", json_errors(get(choice_detail::<R>)))
        .route("/choice/:choice_id/edit/", json_errors(put(edit_choice::<R>)))
        .route(
            "/choice/:choice_id/delete/",
            json_errors(delete(delete_choice::<R>)),
        )
        .route(
            "/choice/:choice_id/minus_vote/",
            json_errors(post(minus_vote::<R>)),
        )
        .route("/vote/", json_errors(post(vote_for_choice::<R>)))
        .fallback(unknown_route)
        .with_state(service)
}

fn json_errors<S>(route: MethodRouter<S>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.fallback(method_not_allowed)
}

async fn unknown_route() -> ResourceError {
    ResourceError::UnknownRoute
}

async fn method_not_allowed() -> ResourceError {
    ResourceError::MethodNotAllowed
}

/// Entity id taken from the URL path.
pub(crate) trait PathEntity: From<u64> {
    const LABEL: &'static str;
}

impl PathEntity for QuestionId {
    const LABEL: &'static str = "Question";
}

impl PathEntity for ChoiceId {
    const LABEL: &'static str = "Choice";
}

/// Path id extractor. Anything that is not an unsigned integer names no entity, so it
/// is rejected as not found in the JSON envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IdPath<I>(pub(crate) I);

#[async_trait]
impl<S, I> FromRequestParts<S> for IdPath<I>
where
    S: Send + Sync,
    I: PathEntity + Send,
{
    type Rejection = ResourceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ResourceError::NotFound(I::LABEL))?;
        raw.parse::<u64>()
            .map(|id| Self(I::from(id)))
            .map_err(|_| ResourceError::NotFound(I::LABEL))
    }
}

pub(crate) async fn list_questions<R: PollRepository + 'static>(
    State(service): Service<R>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Outcome<Vec<QuestionView>> {
    let request = ResourceRequest::new().with_query(query);
    crud::filter(service.questions(), &request)
}

pub(crate) async fn question_detail<R: PollRepository + 'static>(
    State(service): Service<R>,
    IdPath(question_id): IdPath<QuestionId>,
) -> Outcome<QuestionView> {
    let request = ResourceRequest::new().with_pk(question_id.0);
    crud::get_pk(service.questions(), &request)
}

pub(crate) async fn create_question<R: PollRepository + 'static>(
    State(service): Service<R>,
    body: Bytes,
) -> Outcome<QuestionView> {
    let request = ResourceRequest::new().with_body(&body)?;
    crud::create(service.questions(), &request)
}

pub(crate) async fn edit_question<R: PollRepository + 'static>(
    State(service): Service<R>,
    IdPath(question_id): IdPath<QuestionId>,
    body: Bytes,
) -> Outcome<QuestionView> {
    let request = ResourceRequest::new().with_pk(question_id.0).with_body(&body)?;
    crud::update(service.questions(), &request)
}

pub(crate) async fn delete_question<R: PollRepository + 'static>(
    State(service): Service<R>,
    IdPath(question_id): IdPath<QuestionId>,
) -> Outcome<()> {
    let request = ResourceRequest::new().with_pk(question_id.0);
    crud::delete(service.questions(), &request)
}

pub(crate) async fn add_choice<R: PollRepository + 'static>(
    State(service): Service<R>,
    IdPath(question_id): IdPath<QuestionId>,
    body: Bytes,
) -> Outcome<ChoiceView> {
    let request = ResourceRequest::new()
        .with_parent(question_id.0)
        .with_body(&body)?;
    crud::create(service.choices(), &request)
}

pub(crate) async fn vote<R: PollRepository + 'static>(
    State(service): Service<R>,
    IdPath(question_id): IdPath<QuestionId>,
    body: Bytes,
) -> Result<VoteResponse<VoteReceipt>, ResourceError> {
    let request = ResourceRequest::new().with_body(&body)?;
    let choice_id = request.id_field("choice").map(ChoiceId);
    let receipt = service.vote(question_id, choice_id)?;
    Ok(VoteResponse::ok("Vote successfully recorded.", receipt))
}

pub(crate) async fn list_choices<R: PollRepository + 'static>(
    State(service): Service<R>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Outcome<Vec<ChoiceView>> {
    let request = ResourceRequest::new().with_query(query);
    crud::filter(service.choices(), &request)
}

pub(crate) async fn choice_detail<R: PollRepository + 'static>(
    State(service): Service<R>,
    IdPath(choice_id): IdPath<ChoiceId>,
) -> Outcome<ChoiceView> {
    let request = ResourceRequest::new().with_pk(choice_id.0);
    crud::get_pk(service.choices(), &request)
}

pub(crate) async fn edit_choice<R: PollRepository + 'static>(
    State(service): Service<R>,
    IdPath(choice_id): IdPath<ChoiceId>,
    body: Bytes,
) -> Outcome<ChoiceView> {
    let request = ResourceRequest::new().with_pk(choice_id.0).with_body(&body)?;
    crud::update(service.choices(), &request)
}

pub(crate) async fn delete_choice<R: PollRepository + 'static>(
    State(service): Service<R>,
    IdPath(choice_id): IdPath<ChoiceId>,
) -> Outcome<()> {
    let request = ResourceRequest::new().with_pk(choice_id.0);
    crud::delete(service.choices(), &request)
}

pub(crate) async fn minus_vote<R: PollRepository + 'static>(
    State(service): Service<R>,
    IdPath(choice_id): IdPath<ChoiceId>,
) -> Result<VoteResponse<VoteTally>, ResourceError> {
    let tally = service.minus_vote(choice_id)?;
    Ok(VoteResponse::ok("Vote decremented successfully!", tally))
}

pub(crate) async fn vote_for_choice<R: PollRepository + 'static>(
    State(service): Service<R>,
    body: Bytes,
) -> Outcome<ChoiceView> {
    let request = ResourceRequest::new().with_body(&body)?;
    let choice = service.vote_for_choice(request.id_field("choice_id").map(ChoiceId))?;
    Ok(ResourceResponse::ok(choice).with_message("Vote successfully recorded."))
}
