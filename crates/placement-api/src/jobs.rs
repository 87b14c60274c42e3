use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use placement_store::Snapshot;
use placement_types::api::{
    CreateJobRequest, CurrentJobsView, JobCard, JobOpeningsView, OutboundLink,
};
use placement_types::models::normalize_optional;
use placement_types::{Job, NewJob};

use crate::derive;
use crate::error::ApiError;
use crate::forms::{SearchQuery, required};
use crate::state::{AppState, page};

fn card(job: Job) -> JobCard {
    JobCard {
        link: OutboundLink::to(&job.job_link),
        job,
    }
}

// -- Job openings --

pub fn job_openings_view(snapshot: &Snapshot) -> JobOpeningsView {
    let recent = derive::newest_first(&snapshot.jobs.items)
        .into_iter()
        .take(derive::JOB_OPENINGS_LIMIT)
        .map(card)
        .collect();
    JobOpeningsView { recent }
}

pub async fn get_job_openings(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.store.snapshot().await;
    let view = job_openings_view(&snapshot);
    Json(page(&snapshot, view))
}

/// Only the attachment's name is recorded.
pub async fn create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = NewJob {
        da_name: required("da_name", &req.da_name)?,
        company_name: required("company_name", &req.company_name)?,
        phone_number: normalize_optional(req.phone_number.as_deref()),
        job_link: required("job_link", &req.job_link)?,
        file_name: normalize_optional(req.file_name.as_deref()),
    };

    let job = state
        .store
        .insert_job(draft)
        .await
        .map_err(ApiError::insert("Failed to add job opening. Please try again."))?;

    info!("Job at {} posted by {}", job.company_name, job.da_name);
    Ok((StatusCode::CREATED, Json(job)))
}

// -- Current jobs --

pub fn current_jobs_view(snapshot: &Snapshot, search: &str) -> CurrentJobsView {
    let all = &snapshot.jobs.items;
    let jobs: Vec<JobCard> = derive::newest_first(all)
        .into_iter()
        .filter(|j| derive::job_matches(j, search))
        .map(card)
        .collect();

    CurrentJobsView {
        search: search.to_string(),
        shown: jobs.len(),
        total: all.len(),
        most_recent: all.iter().map(|j| j.created_at).max(),
        jobs,
    }
}

pub async fn get_current_jobs(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let snapshot = state.store.snapshot().await;
    let view = current_jobs_view(&snapshot, &query.search);
    Json(page(&snapshot, view))
}
