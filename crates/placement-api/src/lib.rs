pub mod dashboard;
pub mod derive;
pub mod error;
pub mod forms;
pub mod hr;
pub mod jobs;
pub mod nav;
pub mod questions;
pub mod state;
pub mod sync;

use axum::{
    Router,
    routing::{delete, get, post},
};

pub use error::ApiError;
pub use state::{AppState, AppStateInner};

/// All view, form and maintenance routes. Layers are added by the binary.
pub fn router(state: AppState) -> Router {
    let views = Router::new()
        .route("/", get(dashboard::get_dashboard))
        .route("/hr-database", get(hr::get_hr_database).post(hr::create_hr_entry))
        .route(
            "/ask-questions",
            get(questions::get_ask_questions).post(questions::ask_questions),
        )
        .route("/recent-questions", get(questions::get_recent_questions))
        .route(
            "/recent-questions/{question_id}/answers",
            post(questions::submit_answer),
        )
        .route("/expert-answers", get(questions::get_expert_answers))
        .route("/job-openings", get(jobs::get_job_openings).post(jobs::create_job))
        .route("/current-jobs", get(jobs::get_current_jobs));

    let maintenance = Router::new()
        .route("/nav", get(nav::get_nav))
        .route("/refresh", post(sync::refresh))
        .route("/notices/{collection}", delete(sync::dismiss_notice))
        .route("/health", get(sync::health));

    Router::new()
        .merge(views)
        .merge(maintenance)
        .with_state(state)
}
