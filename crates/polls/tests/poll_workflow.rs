//! End-to-end poll scenarios driven through the public router, the way a client would.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::{Duration, Utc};
use polls::config::PollsConfig;
use polls::resources::{poll_router, PollService};
use polls::store::{InMemoryPollStore, PollRepository};
use serde_json::{json, Value};
use tower::ServiceExt;

struct Harness {
    router: axum::Router,
    store: Arc<InMemoryPollStore>,
}

impl Harness {
    fn new() -> Self {
        let store = Arc::new(InMemoryPollStore::new());
        let service = Arc::new(PollService::new(store.clone(), &PollsConfig::default()));
        Self {
            router: poll_router(service),
            store,
        }
    }

    async fn send(&self, method: Method, uri: &str, payload: Option<Value>) -> (StatusCode, Value) {
        let body = match payload {
            Some(payload) => Body::from(serde_json::to_vec(&payload).expect("payload encodes")),
            None => Body::empty(),
        };
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .expect("request builds");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("route executes");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&bytes).expect("json payload"))
    }
}

#[tokio::test]
async fn favorite_color_scenario() {
    let harness = Harness::new();

    let (status, created) = harness
        .send(
            Method::POST,
            "/questions/create/",
            Some(json!({ "question_text": "Favorite color?" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["id"], json!(1));

    let (status, choice) = harness
        .send(
            Method::POST,
            "/questions/1/add_choice/",
            Some(json!({ "choice_text": "Red" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(choice["data"], json!({ "id": 1, "choice_text": "Red", "votes": 0 }));

    for expected in [1, 2] {
        let (status, vote) = harness
            .send(Method::POST, "/questions/1/vote/", Some(json!({ "choice": 1 })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(vote["votes"], json!(expected));
    }

    let (status, tally) = harness
        .send(Method::POST, "/choice/1/minus_vote/", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tally["votes"], json!(1));

    let (_, results) = harness
        .send(Method::GET, "/questions/1/results/", None)
        .await;
    assert_eq!(results["data"]["choices"][0]["votes"], json!(1));
}

#[tokio::test]
async fn minus_vote_at_zero_reports_failure() {
    let harness = Harness::new();
    harness
        .send(
            Method::POST,
            "/questions/create/",
            Some(json!({ "question_text": "Favorite color?" })),
        )
        .await;
    harness
        .send(
            Method::POST,
            "/questions/1/add_choice/",
            Some(json!({ "choice_text": "Red" })),
        )
        .await;

    let (status, payload) = harness
        .send(Method::POST, "/choice/1/minus_vote/", None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["message"], json!("Votes cannot be negative."));
    let stored = harness.store.choices().expect("store available");
    assert_eq!(stored[0].votes, 0);
}

#[tokio::test]
async fn scheduled_questions_stay_out_of_public_views() {
    let harness = Harness::new();
    let tomorrow = (Utc::now() + Duration::days(1)).to_rfc3339();

    let (status, _) = harness
        .send(
            Method::POST,
            "/questions/create/",
            Some(json!({ "question_text": "Coming soon?", "pub_date": tomorrow })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    harness
        .send(
            Method::POST,
            "/questions/create/",
            Some(json!({ "question_text": "Out now?" })),
        )
        .await;

    let (_, listing) = harness.send(Method::GET, "/questions/", None).await;
    let texts: Vec<_> = listing["data"]
        .as_array()
        .expect("list payload")
        .iter()
        .filter_map(|question| question["question_text"].as_str())
        .collect();
    assert_eq!(texts, ["Out now?"]);

    let (status, _) = harness.send(Method::GET, "/questions/1/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn orphan_choices_are_never_created() {
    let harness = Harness::new();

    let (status, payload) = harness
        .send(
            Method::POST,
            "/questions/12/add_choice/",
            Some(json!({ "choice_text": "Red" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["error"], json!("Question not found."));
    assert!(harness.store.choices().expect("store available").is_empty());
}

#[tokio::test]
async fn deleting_a_question_removes_its_choices() {
    let harness = Harness::new();
    harness
        .send(
            Method::POST,
            "/questions/create/",
            Some(json!({ "question_text": "Favorite color?" })),
        )
        .await;
    for text in ["Red", "Blue"] {
        harness
            .send(
                Method::POST,
                "/questions/1/add_choice/",
                Some(json!({ "choice_text": text })),
            )
            .await;
    }

    let (status, payload) = harness
        .send(Method::DELETE, "/questions/1/delete/", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["message"], json!("Question deleted successfully!"));

    let (_, choices) = harness.send(Method::GET, "/choice/", None).await;
    assert_eq!(choices["data"], json!([]));
}
