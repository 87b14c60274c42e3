use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::info;

use placement_store::Snapshot;
use placement_types::api::{
    AnsweredQuestion, AskQuestionsRequest, AskQuestionsView, CreatedQuestions,
    ExpertAnswersView, QuestionCard, RecentQuestionsView, SubmitAnswerRequest,
};
use placement_types::models::SUGGESTED_TOPICS;
use placement_types::{NewAnswer, NewQuestion};

use crate::derive;
use crate::error::ApiError;
use crate::forms::{non_blank, required};
use crate::state::{AppState, page};

/// Label of the expert-answers filter entry that shows every topic.
pub const ALL_TOPICS: &str = "All";

// -- Ask questions --

pub async fn get_ask_questions(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.store.snapshot().await;
    let view = AskQuestionsView {
        topics: SUGGESTED_TOPICS.to_vec(),
    };
    Json(page(&snapshot, view))
}

/// One question per non-blank text, inserted in the order given.
pub async fn ask_questions(
    State(state): State<AppState>,
    Json(req): Json<AskQuestionsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let topic = required("topic", &req.topic)?;
    let asked_by = required("asked_by", &req.asked_by)?;
    let texts = non_blank(&req.texts);
    if texts.is_empty() {
        return Err(ApiError::Invalid("at least one question is required".into()));
    }

    let mut questions = Vec::with_capacity(texts.len());
    for text in texts {
        let question = state
            .store
            .insert_question(NewQuestion {
                text,
                topic: topic.clone(),
                asked_by: asked_by.clone(),
            })
            .await
            .map_err(ApiError::insert("Failed to submit questions. Please try again."))?;
        questions.push(question);
    }

    info!("{} asked {} {} questions", asked_by, questions.len(), topic);
    Ok((StatusCode::CREATED, Json(CreatedQuestions { questions })))
}

// -- Recent questions --

pub fn recent_questions_view(snapshot: &Snapshot) -> RecentQuestionsView {
    let answers = &snapshot.answers.items;
    let cards: Vec<QuestionCard> = snapshot
        .questions
        .items
        .iter()
        .map(|q| QuestionCard {
            status: derive::status(&q.id, answers),
            answer_count: derive::answer_count(&q.id, answers),
            question: q.clone(),
        })
        .collect();

    RecentQuestionsView {
        groups: derive::group_by_topic(cards, |c| c.question.topic.as_str()),
    }
}

pub async fn get_recent_questions(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.store.snapshot().await;
    let view = recent_questions_view(&snapshot);
    Json(page(&snapshot, view))
}

/// Answer a question present in the local mirror.
pub async fn submit_answer(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let answer_text = required("answer_text", &req.answer_text)?;
    let answered_by = required("answered_by", &req.answered_by)?;

    if !state.store.has_question(&question_id).await {
        return Err(ApiError::NotFound(format!("no question with id {}", question_id)));
    }

    let answer = state
        .store
        .insert_answer(NewAnswer {
            question_id,
            answer_text,
            answered_by,
        })
        .await
        .map_err(ApiError::insert("Failed to submit answer. Please try again."))?;

    info!("{} answered question {}", answer.answered_by, answer.question_id);
    Ok((StatusCode::CREATED, Json(answer)))
}

// -- Expert answers --

#[derive(Debug, Default, Deserialize)]
pub struct ExpertQuery {
    #[serde(default)]
    pub search: String,
    pub topic: Option<String>,
}

/// Answered questions matching the search and topic filter, grouped by
/// topic, each with its answers.
pub fn expert_answers_view(snapshot: &Snapshot, query: &ExpertQuery) -> ExpertAnswersView {
    let answers = &snapshot.answers.items;
    let topic = query.topic.as_deref();

    let answered: Vec<AnsweredQuestion> = snapshot
        .questions
        .items
        .iter()
        .filter(|q| derive::is_answered(&q.id, answers))
        .filter(|q| derive::question_matches(q, &query.search))
        .filter(|q| derive::topic_matches(q, topic))
        .map(|q| AnsweredQuestion {
            answers: derive::answers_for(&q.id, answers).cloned().collect(),
            question: q.clone(),
        })
        .collect();

    let mut topics = Vec::with_capacity(SUGGESTED_TOPICS.len() + 1);
    topics.push(ALL_TOPICS);
    topics.extend_from_slice(SUGGESTED_TOPICS);

    ExpertAnswersView {
        search: query.search.clone(),
        topic: query.topic.clone(),
        topics,
        groups: derive::group_by_topic(answered, |a| a.question.topic.as_str()),
    }
}

pub async fn get_expert_answers(
    State(state): State<AppState>,
    Query(query): Query<ExpertQuery>,
) -> impl IntoResponse {
    let snapshot = state.store.snapshot().await;
    let view = expert_answers_view(&snapshot, &query);
    Json(page(&snapshot, view))
}
