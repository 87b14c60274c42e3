//! The HTTP surface end to end, against the in-memory store.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use placement_api::{AppStateInner, router};
use placement_store::{MemoryStore, SyncStore};
use placement_types::Collection;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> (MemoryStore, Router) {
    let remote = MemoryStore::new();
    let store = SyncStore::new(Arc::new(remote.clone()));
    store.refresh_all().await;
    (remote, router(AppStateInner::new(store)))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: &Router, uri: &str) -> Value {
    let (status, body) = send(app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK, "GET {} -> {}", uri, body);
    body
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

// -- Jobs --

#[tokio::test]
async fn job_without_optional_fields() {
    let (remote, app) = app().await;

    let (status, job) = post(
        &app,
        "/job-openings",
        json!({
            "da_name": "Priya",
            "company_name": "Acme",
            "phone_number": "",
            "job_link": "https://acme.example/job/1"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(job["phone_number"].is_null());
    assert!(job["file_name"].is_null());
    assert_eq!(remote.row_count(Collection::Jobs), 1);

    let current = get(&app, "/current-jobs?search=priya").await;
    assert_eq!(current["shown"], 1);
    assert_eq!(current["total"], 1);
    assert_eq!(current["jobs"][0]["da_name"], "Priya");
    assert_eq!(current["most_recent"], job["created_at"]);

    let openings = get(&app, "/job-openings").await;
    let link = &openings["recent"][0]["link"];
    assert_eq!(link["href"], "https://acme.example/job/1");
    assert_eq!(link["target"], "_blank");
    assert_eq!(link["rel"], "noopener noreferrer");
}

#[tokio::test]
async fn current_jobs_search_filters_and_counts() {
    let (_remote, app) = app().await;
    for (da, link) in [
        ("Priya", "https://acme.example/1"),
        ("Ravi", "https://globex.example/2"),
        ("Anu", "https://acme.example/3"),
    ] {
        let (status, _) = post(
            &app,
            "/job-openings",
            json!({ "da_name": da, "company_name": "X", "job_link": link }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let current = get(&app, "/current-jobs?search=ACME").await;
    assert_eq!(current["shown"], 2);
    assert_eq!(current["total"], 3);
    assert_eq!(current["jobs"][0]["da_name"], "Anu");
    assert_eq!(current["jobs"][1]["da_name"], "Priya");

    let all = get(&app, "/current-jobs").await;
    assert_eq!(all["shown"], 3);
}

#[tokio::test]
async fn job_openings_lists_ten_most_recent() {
    let (_remote, app) = app().await;
    for i in 0..12 {
        post(
            &app,
            "/job-openings",
            json!({
                "da_name": format!("DA {}", i),
                "company_name": "Acme",
                "job_link": format!("https://acme.example/{}", i)
            }),
        )
        .await;
    }

    let openings = get(&app, "/job-openings").await;
    let recent = openings["recent"].as_array().unwrap();
    assert_eq!(recent.len(), 10);
    assert_eq!(recent[0]["da_name"], "DA 11");
}

#[tokio::test]
async fn blank_required_field_is_rejected() {
    let (remote, app) = app().await;

    let (status, body) = post(
        &app,
        "/job-openings",
        json!({ "da_name": "Priya", "company_name": "Acme", "job_link": "   " }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "job_link is required");
    assert_eq!(remote.row_count(Collection::Jobs), 0);
}

#[tokio::test]
async fn failed_insert_is_a_bad_gateway() {
    let (remote, app) = app().await;
    remote.fail_insert(Collection::Jobs, true);

    let request = json!({
        "da_name": "Priya", "company_name": "Acme", "job_link": "https://acme.example/1"
    });
    let (status, body) = post(&app, "/job-openings", request.clone()).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Failed to add job opening. Please try again.");
    assert_eq!(get(&app, "/current-jobs").await["total"], 0);

    // The same request succeeds once the store recovers.
    remote.fail_insert(Collection::Jobs, false);
    let (status, _) = post(&app, "/job-openings", request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(get(&app, "/current-jobs").await["total"], 1);
}

// -- Questions --

#[tokio::test]
async fn three_questions_and_a_blank_one() {
    let (_remote, app) = app().await;

    let (status, created) = post(
        &app,
        "/ask-questions",
        json!({
            "topic": "SQL",
            "asked_by": "Ravi",
            "texts": ["What is a CTE?", "Explain joins", "Index vs key?", "   "]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let texts: Vec<&str> = created["questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["What is a CTE?", "Explain joins", "Index vs key?"]);

    let recent = get(&app, "/recent-questions").await;
    let groups = recent["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["topic"], "SQL");
    assert_eq!(groups[0]["count"], 3);
    // Newest first.
    assert_eq!(groups[0]["items"][0]["text"], "Index vs key?");
    for item in groups[0]["items"].as_array().unwrap() {
        assert_eq!(item["asked_by"], "Ravi");
        assert_eq!(item["status"], "Pending");
        assert_eq!(item["answer_count"], 0);
    }
}

#[tokio::test]
async fn ask_requires_one_non_blank_text() {
    let (_remote, app) = app().await;
    let (status, body) = post(
        &app,
        "/ask-questions",
        json!({ "topic": "SQL", "asked_by": "Ravi", "texts": ["", " "] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "at least one question is required");

    let (status, _) = post(
        &app,
        "/ask-questions",
        json!({ "topic": "", "asked_by": "Ravi", "texts": ["Why?"] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn answering_flips_status_and_feeds_expert_view() {
    let (_remote, app) = app().await;
    let (_, created) = post(
        &app,
        "/ask-questions",
        json!({ "topic": "Python", "asked_by": "Anu", "texts": ["What is a generator?"] }),
    )
    .await;
    let id = created["questions"][0]["id"].as_str().unwrap().to_string();

    let expert = get(&app, "/expert-answers").await;
    assert!(expert["groups"].as_array().unwrap().is_empty());

    let (status, answer) = post(
        &app,
        &format!("/recent-questions/{}/answers", id),
        json!({ "answer_text": "  A lazy iterator  ", "answered_by": "Sathish" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(answer["answer_text"], "A lazy iterator");

    let recent = get(&app, "/recent-questions").await;
    assert_eq!(recent["groups"][0]["items"][0]["status"], "Answered");
    assert_eq!(recent["groups"][0]["items"][0]["answer_count"], 1);

    let expert = get(&app, "/expert-answers?search=GENERATOR").await;
    assert_eq!(expert["groups"][0]["topic"], "Python");
    let question = &expert["groups"][0]["items"][0];
    assert_eq!(question["text"], "What is a generator?");
    assert_eq!(question["answers"][0]["answered_by"], "Sathish");
    assert_eq!(expert["topics"][0], "All");

    let filtered = get(&app, "/expert-answers?topic=SQL").await;
    assert!(filtered["groups"].as_array().unwrap().is_empty());
    let all = get(&app, "/expert-answers?topic=All").await;
    assert_eq!(all["groups"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn answer_to_unknown_question_is_not_found() {
    let (remote, app) = app().await;
    let (status, _) = post(
        &app,
        "/recent-questions/missing/answers",
        json!({ "answer_text": "Yes", "answered_by": "Sathish" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(remote.row_count(Collection::Answers), 0);
}

// -- HR database --

#[tokio::test]
async fn hr_entry_with_interview_questions() {
    let (_remote, app) = app().await;
    let (status, created) = post(
        &app,
        "/hr-database",
        json!({
            "da_name": "Anu",
            "company_name": "Globex",
            "hr_name": "Meera",
            "hr_contact": "9000000001",
            "questions": ["Tell me about yourself", ""]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["questions"].as_array().unwrap().len(), 1);
    assert_eq!(created["questions"][0]["topic"], "Globex");
    assert_eq!(created["questions"][0]["asked_by"], "Anu");

    let view = get(&app, "/hr-database?search=meera").await;
    assert_eq!(view["shown"], 1);
    assert_eq!(view["entries"][0]["company_name"], "Globex");
    assert_eq!(view["questions"].as_array().unwrap().len(), 1);

    let miss = get(&app, "/hr-database?search=initech").await;
    assert_eq!(miss["shown"], 0);
    assert_eq!(miss["total"], 1);
}

// -- Dashboard, notices and the rest --

#[tokio::test]
async fn dashboard_cards_and_series() {
    let (_remote, app) = app().await;
    let (_, created) = post(
        &app,
        "/ask-questions",
        json!({ "topic": "SQL", "asked_by": "Ravi", "texts": ["Joins?", "Joins?", "CTE?"] }),
    )
    .await;
    let id = created["questions"][0]["id"].as_str().unwrap().to_string();
    post(
        &app,
        &format!("/recent-questions/{}/answers", id),
        json!({ "answer_text": "Inner and outer", "answered_by": "Sathish" }),
    )
    .await;
    post(
        &app,
        "/job-openings",
        json!({ "da_name": "Priya", "company_name": "Acme", "job_link": "https://acme.example" }),
    )
    .await;

    let dash = get(&app, "/").await;
    assert_eq!(dash["loading"], false);
    assert_eq!(dash["cards"]["questions"], 3);
    assert_eq!(dash["cards"]["answers"], 1);
    assert_eq!(dash["cards"]["unanswered"], 2);
    assert_eq!(dash["cards"]["hr_entries"], 0);
    assert_eq!(dash["most_asked"][0], json!({ "text": "Joins?", "count": 2 }));
    assert_eq!(dash["recent_by_topic"][0], json!({ "text": "SQL", "count": 3 }));
    assert_eq!(dash["recent_by_day"][0]["count"], 3);
    assert_eq!(dash["cards"]["jobs"], 1);
    assert_eq!(dash["jobs_by_da"], json!([{ "text": "Priya", "count": 1 }]));
}

#[tokio::test]
async fn load_failure_notice_and_dismissal() {
    let (remote, app) = app().await;
    remote.fail_fetch(Collection::Jobs, true);

    let (status, report) = send(&app, Method::POST, "/refresh", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["failed"][0]["collection"], "jobs");

    let dash = get(&app, "/").await;
    assert_eq!(dash["notices"].as_array().unwrap().len(), 1);
    let jobs = get(&app, "/current-jobs").await;
    assert_eq!(jobs["notices"][0]["collection"], "jobs");

    let (status, _) = send(&app, Method::DELETE, "/notices/jobs", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, "/notices/jobs", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, "/notices/widgets", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(get(&app, "/").await["notices"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn nav_and_health() {
    let (_remote, app) = app().await;

    let nav = get(&app, "/nav?path=/recent-questions").await;
    let items = nav.as_array().unwrap();
    assert_eq!(items.len(), 7);
    let active: Vec<&str> = items
        .iter()
        .filter(|i| i["active"] == true)
        .map(|i| i["label"].as_str().unwrap())
        .collect();
    assert_eq!(active, vec!["Recent Questions"]);

    let root = get(&app, "/nav").await;
    assert_eq!(root[0]["active"], true);

    let health = get(&app, "/health").await;
    assert_eq!(health["status"], "ok");

    let ask = get(&app, "/ask-questions").await;
    assert_eq!(ask["topics"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn pages_show_loading_before_first_refresh() {
    let state = AppStateInner::new(SyncStore::new(Arc::new(MemoryStore::new())));
    let app = router(state.clone());

    assert_eq!(get(&app, "/").await["loading"], true);
    assert_eq!(get(&app, "/health").await["loading"], true);

    state.store.refresh_all().await;
    assert_eq!(get(&app, "/").await["loading"], false);
}
