use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Answer, HrEntry, Job, LoadNotice, Question};

// -- Envelope --

/// Every view answers with the shared sync state next to its own payload.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub loading: bool,
    pub notices: Vec<LoadNotice>,
    #[serde(flatten)]
    pub view: T,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// -- Navigation --

#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub path: &'static str,
    pub label: &'static str,
    pub active: bool,
}

// -- Dashboard --

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardCards {
    pub hr_entries: usize,
    pub questions: usize,
    pub answers: usize,
    pub unanswered: usize,
    pub jobs: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextCount {
    pub text: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub cards: DashboardCards,
    pub most_asked: Vec<TextCount>,
    pub recent_by_day: Vec<DayCount>,
    pub recent_by_topic: Vec<TextCount>,
    pub jobs_by_da: Vec<TextCount>,
}

// -- HR database --

#[derive(Debug, Serialize)]
pub struct HrDatabaseView {
    pub search: String,
    pub shown: usize,
    pub total: usize,
    pub entries: Vec<HrEntry>,
    pub questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateHrEntryRequest {
    pub da_name: String,
    pub company_name: String,
    pub hr_name: String,
    pub hr_contact: String,
    /// Interview questions the DA was asked at this company.
    #[serde(default)]
    pub questions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedHrEntry {
    pub entry: HrEntry,
    pub questions: Vec<Question>,
}

// -- Questions --

#[derive(Debug, Serialize)]
pub struct AskQuestionsView {
    pub topics: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AskQuestionsRequest {
    pub topic: String,
    pub asked_by: String,
    pub texts: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedQuestions {
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionStatus {
    Answered,
    Pending,
}

/// Questions sharing one topic, in the order of the source list.
#[derive(Debug, Serialize)]
pub struct TopicGroup<T> {
    pub topic: String,
    pub count: usize,
    pub items: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct QuestionCard {
    #[serde(flatten)]
    pub question: Question,
    pub status: QuestionStatus,
    pub answer_count: usize,
}

#[derive(Debug, Serialize)]
pub struct RecentQuestionsView {
    pub groups: Vec<TopicGroup<QuestionCard>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitAnswerRequest {
    pub answer_text: String,
    pub answered_by: String,
}

#[derive(Debug, Serialize)]
pub struct AnsweredQuestion {
    #[serde(flatten)]
    pub question: Question,
    pub answers: Vec<Answer>,
}

#[derive(Debug, Serialize)]
pub struct ExpertAnswersView {
    pub search: String,
    pub topic: Option<String>,
    pub topics: Vec<&'static str>,
    pub groups: Vec<TopicGroup<AnsweredQuestion>>,
}

// -- Jobs --

/// A link that opens outside the app, to the literal stored URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundLink {
    pub href: String,
    pub target: &'static str,
    pub rel: &'static str,
}

impl OutboundLink {
    pub fn to(href: &str) -> Self {
        Self {
            href: href.to_string(),
            target: "_blank",
            rel: "noopener noreferrer",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobCard {
    #[serde(flatten)]
    pub job: Job,
    pub link: OutboundLink,
}

#[derive(Debug, Serialize)]
pub struct JobOpeningsView {
    pub recent: Vec<JobCard>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateJobRequest {
    pub da_name: String,
    pub company_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub job_link: String,
    /// Name of the attached file. The file itself is not stored.
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CurrentJobsView {
    pub search: String,
    pub shown: usize,
    pub total: usize,
    pub most_recent: Option<DateTime<Utc>>,
    pub jobs: Vec<JobCard>,
}
