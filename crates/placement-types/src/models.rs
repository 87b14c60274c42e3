use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Topics offered by the ask-questions form. A question may carry any topic
/// string; these are suggestions only.
pub const SUGGESTED_TOPICS: &[&str] = &[
    "Advanced Excel",
    "SQL",
    "Power BI",
    "Tableau",
    "Python",
    "AI",
    "ML",
];

/// The four tables mirrored from the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    HrEntries,
    Questions,
    Answers,
    Jobs,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::HrEntries,
        Collection::Questions,
        Collection::Answers,
        Collection::Jobs,
    ];

    /// Table name on the remote store.
    pub fn table(self) -> &'static str {
        match self {
            Self::HrEntries => "hr_entries",
            Self::Questions => "questions",
            Self::Answers => "answers",
            Self::Jobs => "jobs",
        }
    }

    /// Human readable name used in notices and log lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::HrEntries => "HR entries",
            Self::Questions => "questions",
            Self::Answers => "answers",
            Self::Jobs => "jobs",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

/// A row type stored in one of the four collections.
///
/// `Draft` is what the client assembles before insertion: every field except
/// the store-assigned `id` and `created_at`.
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    type Draft: Serialize + Send + Sync;

    const COLLECTION: Collection;

    fn id(&self) -> &str;
}

// -- HR entries --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HrEntry {
    pub id: String,
    pub da_name: String,
    pub company_name: String,
    pub hr_name: String,
    pub hr_contact: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHrEntry {
    pub da_name: String,
    pub company_name: String,
    pub hr_name: String,
    pub hr_contact: String,
}

impl Record for HrEntry {
    type Draft = NewHrEntry;
    const COLLECTION: Collection = Collection::HrEntries;

    fn id(&self) -> &str {
        &self.id
    }
}

// -- Questions --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    /// Older rows may have been written without a topic or asker.
    #[serde(default, deserialize_with = "null_as_default")]
    pub topic: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub asked_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub text: String,
    pub topic: String,
    pub asked_by: String,
}

impl Record for Question {
    type Draft = NewQuestion;
    const COLLECTION: Collection = Collection::Questions;

    fn id(&self) -> &str {
        &self.id
    }
}

// -- Answers --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub id: String,
    pub question_id: String,
    pub answer_text: String,
    pub answered_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAnswer {
    pub question_id: String,
    pub answer_text: String,
    pub answered_by: String,
}

impl Record for Answer {
    type Draft = NewAnswer;
    const COLLECTION: Collection = Collection::Answers;

    fn id(&self) -> &str {
        &self.id
    }
}

// -- Jobs --

/// A job posting. `phone_number` and `file_name` are `None` when not
/// provided and travel as JSON `null`, never as an empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub da_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub job_link: String,
    #[serde(default)]
    pub file_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJob {
    pub da_name: String,
    pub company_name: String,
    pub phone_number: Option<String>,
    pub job_link: String,
    pub file_name: Option<String>,
}

impl Record for Job {
    type Draft = NewJob;
    const COLLECTION: Collection = Collection::Jobs;

    fn id(&self) -> &str {
        &self.id
    }
}

// -- Sync state --

/// A collection whose last fetch failed. Shown as a dismissible banner
/// until the next successful fetch or an explicit dismissal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadNotice {
    pub collection: Collection,
    pub message: String,
}

/// Outcome of one refresh of all four collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefreshReport {
    pub failed: Vec<LoadNotice>,
}

impl RefreshReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Form input for an optional field: blank means "not provided".
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
