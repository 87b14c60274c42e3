use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use placement_store::Snapshot;
use placement_types::api::{CreateHrEntryRequest, CreatedHrEntry, HrDatabaseView};
use placement_types::{NewHrEntry, NewQuestion};

use crate::derive;
use crate::error::ApiError;
use crate::forms::{SearchQuery, non_blank, required};
use crate::state::{AppState, page};

const INSERT_FAILED: &str = "Failed to add HR entry or questions. Please try again.";

pub fn hr_database_view(snapshot: &Snapshot, search: &str) -> HrDatabaseView {
    let all = &snapshot.hr_entries.items;
    let entries: Vec<_> = all
        .iter()
        .filter(|e| derive::hr_entry_matches(e, search))
        .cloned()
        .collect();

    HrDatabaseView {
        search: search.to_string(),
        shown: entries.len(),
        total: all.len(),
        entries,
        questions: snapshot.questions.items.clone(),
    }
}

pub async fn get_hr_database(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let snapshot = state.store.snapshot().await;
    let view = hr_database_view(&snapshot, &query.search);
    Json(page(&snapshot, view))
}

/// Insert the HR entry, then each interview question under the company's
/// name. A failure part-way leaves the rows already inserted in place.
pub async fn create_hr_entry(
    State(state): State<AppState>,
    Json(req): Json<CreateHrEntryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = NewHrEntry {
        da_name: required("da_name", &req.da_name)?,
        company_name: required("company_name", &req.company_name)?,
        hr_name: required("hr_name", &req.hr_name)?,
        hr_contact: required("hr_contact", &req.hr_contact)?,
    };
    let texts = non_blank(&req.questions);

    let entry = state
        .store
        .insert_hr_entry(draft)
        .await
        .map_err(ApiError::insert(INSERT_FAILED))?;

    let mut questions = Vec::with_capacity(texts.len());
    for text in texts {
        let question = state
            .store
            .insert_question(NewQuestion {
                text,
                topic: entry.company_name.clone(),
                asked_by: entry.da_name.clone(),
            })
            .await
            .map_err(ApiError::insert(INSERT_FAILED))?;
        questions.push(question);
    }

    info!(
        "HR entry added for {} with {} questions",
        entry.company_name,
        questions.len()
    );
    Ok((StatusCode::CREATED, Json(CreatedHrEntry { entry, questions })))
}
