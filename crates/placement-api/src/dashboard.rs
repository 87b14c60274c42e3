use axum::{Json, extract::State, response::IntoResponse};
use chrono::{DateTime, Utc};

use placement_store::Snapshot;
use placement_types::api::{DashboardCards, DashboardView};

use crate::derive;
use crate::state::{AppState, page};

pub fn dashboard_view(snapshot: &Snapshot, now: DateTime<Utc>) -> DashboardView {
    let questions = &snapshot.questions.items;
    let answers = &snapshot.answers.items;
    let jobs = &snapshot.jobs.items;

    DashboardView {
        cards: DashboardCards {
            hr_entries: snapshot.hr_entries.items.len(),
            questions: questions.len(),
            answers: answers.len(),
            unanswered: derive::unanswered_count(questions, answers),
            jobs: jobs.len(),
        },
        most_asked: derive::most_asked(questions),
        recent_by_day: derive::recent_by_day(questions, now),
        recent_by_topic: derive::recent_by_topic(questions, now),
        jobs_by_da: derive::jobs_by_da(jobs),
    }
}

pub async fn get_dashboard(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.store.snapshot().await;
    let view = dashboard_view(&snapshot, Utc::now());
    Json(page(&snapshot, view))
}
