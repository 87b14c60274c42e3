use std::sync::Arc;

use placement_types::models::normalize_optional;
use placement_types::{
    Answer, Collection, HrEntry, Job, LoadNotice, NewAnswer, NewHrEntry, NewJob, NewQuestion,
    Question, Record, RefreshReport,
};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info};

use crate::error::StoreError;
use crate::remote::RemoteStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Unloaded,
    Loading,
    Loaded,
}

/// Local mirror of one remote collection, newest first.
#[derive(Debug, Clone)]
pub struct CollectionState<T> {
    pub status: LoadStatus,
    pub items: Vec<T>,
    /// Set when the last fetch failed; `items` then holds the previous contents.
    pub issue: Option<LoadNotice>,
}

impl<T> Default for CollectionState<T> {
    fn default() -> Self {
        Self {
            status: LoadStatus::Unloaded,
            items: Vec::new(),
            issue: None,
        }
    }
}

/// Point-in-time copy of everything the views read.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub hr_entries: CollectionState<HrEntry>,
    pub questions: CollectionState<Question>,
    pub answers: CollectionState<Answer>,
    pub jobs: CollectionState<Job>,
    pub loading: bool,
}

impl Snapshot {
    /// Outstanding load failures, in table order.
    pub fn notices(&self) -> Vec<LoadNotice> {
        [
            &self.hr_entries.issue,
            &self.questions.issue,
            &self.answers.issue,
            &self.jobs.issue,
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect()
    }

    pub fn status(&self, collection: Collection) -> LoadStatus {
        match collection {
            Collection::HrEntries => self.hr_entries.status,
            Collection::Questions => self.questions.status,
            Collection::Answers => self.answers.status,
            Collection::Jobs => self.jobs.status,
        }
    }

    fn set_status(&mut self, status: LoadStatus) {
        self.hr_entries.status = status;
        self.questions.status = status;
        self.answers.status = status;
        self.jobs.status = status;
    }

    fn issue_mut(&mut self, collection: Collection) -> &mut Option<LoadNotice> {
        match collection {
            Collection::HrEntries => &mut self.hr_entries.issue,
            Collection::Questions => &mut self.questions.issue,
            Collection::Answers => &mut self.answers.issue,
            Collection::Jobs => &mut self.jobs.issue,
        }
    }
}

/// Ties a record type to its slot in the snapshot.
trait Mirrored: Record {
    fn slot(snapshot: &mut Snapshot) -> &mut CollectionState<Self>;
}

impl Mirrored for HrEntry {
    fn slot(snapshot: &mut Snapshot) -> &mut CollectionState<Self> {
        &mut snapshot.hr_entries
    }
}

impl Mirrored for Question {
    fn slot(snapshot: &mut Snapshot) -> &mut CollectionState<Self> {
        &mut snapshot.questions
    }
}

impl Mirrored for Answer {
    fn slot(snapshot: &mut Snapshot) -> &mut CollectionState<Self> {
        &mut snapshot.answers
    }
}

impl Mirrored for Job {
    fn slot(snapshot: &mut Snapshot) -> &mut CollectionState<Self> {
        &mut snapshot.jobs
    }
}

/// Owner of the four mirrored collections and the only mutation path.
pub struct SyncStore {
    shared: Arc<Shared>,
    /// Held for the duration of a refresh by the task running it. Also keeps
    /// the last report so that callers coalesced onto an in-flight refresh
    /// can share it.
    refresh_gate: Arc<Mutex<RefreshReport>>,
}

/// The part of the store a detached refresh task needs.
struct Shared {
    remote: Arc<dyn RemoteStore>,
    state: RwLock<Snapshot>,
}

impl SyncStore {
    /// A new store reports `loading` until its first refresh completes.
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        let snapshot = Snapshot {
            loading: true,
            ..Snapshot::default()
        };
        Self {
            shared: Arc::new(Shared {
                remote,
                state: RwLock::new(snapshot),
            }),
            refresh_gate: Arc::new(Mutex::new(RefreshReport::default())),
        }
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.shared.state.read().await.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.shared.state.read().await.loading
    }

    pub async fn has_question(&self, question_id: &str) -> bool {
        self.shared
            .state
            .read()
            .await
            .questions
            .items
            .iter()
            .any(|q| q.id == question_id)
    }

    /// Reload all four collections concurrently.
    ///
    /// Never fails: a collection whose fetch fails keeps its previous items
    /// and gets a notice. The fetches run on a spawned task that owns the
    /// gate, so dropping the caller does not abort the refresh. A call made
    /// while another refresh is running waits for that refresh and returns
    /// its report instead of fetching again.
    pub async fn refresh_all(&self) -> RefreshReport {
        let Ok(mut last) = self.refresh_gate.clone().try_lock_owned() else {
            debug!("Refresh already in flight, waiting for it");
            return self.refresh_gate.lock().await.clone();
        };

        let shared = self.shared.clone();
        let task = tokio::spawn(async move {
            let report = shared.run_refresh().await;
            *last = report.clone();
            report
        });

        match task.await {
            Ok(report) => report,
            Err(e) => {
                error!("Refresh task failed: {}", e);
                self.shared.settle().await;
                self.refresh_gate.lock().await.clone()
            }
        }
    }

    async fn insert<T: Mirrored>(&self, draft: &T::Draft) -> Result<T, StoreError> {
        let collection = T::COLLECTION;
        let row = serde_json::to_value(draft)
            .map_err(|source| StoreError::Decode { collection, source })?;

        let stored = self.shared.remote.insert(collection, row).await.map_err(|e| {
            error!("Error adding to {}: {}", collection, e);
            e
        })?;
        let record: T = serde_json::from_value(stored).map_err(|source| {
            error!("Store returned a malformed {} row: {}", collection, source);
            StoreError::Decode { collection, source }
        })?;

        let mut state = self.shared.state.write().await;
        T::slot(&mut state).items.insert(0, record.clone());
        debug!("Added {} to {}", record.id(), collection);
        Ok(record)
    }

    pub async fn insert_hr_entry(&self, draft: NewHrEntry) -> Result<HrEntry, StoreError> {
        self.insert::<HrEntry>(&draft).await
    }

    pub async fn insert_question(&self, draft: NewQuestion) -> Result<Question, StoreError> {
        self.insert::<Question>(&draft).await
    }

    pub async fn insert_answer(&self, draft: NewAnswer) -> Result<Answer, StoreError> {
        self.insert::<Answer>(&draft).await
    }

    /// Blank optional fields are sent as `null`, never as empty strings.
    pub async fn insert_job(&self, draft: NewJob) -> Result<Job, StoreError> {
        let draft = NewJob {
            phone_number: normalize_optional(draft.phone_number.as_deref()),
            file_name: normalize_optional(draft.file_name.as_deref()),
            ..draft
        };
        self.insert::<Job>(&draft).await
    }

    /// Clear the load notice for a collection. Returns whether one was set.
    pub async fn dismiss_issue(&self, collection: Collection) -> bool {
        self.shared
            .state
            .write()
            .await
            .issue_mut(collection)
            .take()
            .is_some()
    }
}

impl Shared {
    async fn run_refresh(&self) -> RefreshReport {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.set_status(LoadStatus::Loading);
        }

        let (hr_entries, questions, answers, jobs) = tokio::join!(
            self.fetch::<HrEntry>(),
            self.fetch::<Question>(),
            self.fetch::<Answer>(),
            self.fetch::<Job>(),
        );

        let mut report = RefreshReport::default();
        let mut state = self.state.write().await;
        apply(&mut state, hr_entries, &mut report);
        apply(&mut state, questions, &mut report);
        apply(&mut state, answers, &mut report);
        apply(&mut state, jobs, &mut report);
        state.loading = false;

        info!(
            "Refreshed: {} HR entries, {} questions, {} answers, {} jobs ({} failed)",
            state.hr_entries.items.len(),
            state.questions.items.len(),
            state.answers.items.len(),
            state.jobs.items.len(),
            report.failed.len()
        );
        report
    }

    /// Leave the loading state after a refresh task died without applying.
    async fn settle(&self) {
        let mut state = self.state.write().await;
        state.loading = false;
        state.set_status(LoadStatus::Loaded);
    }

    async fn fetch<T: Record>(&self) -> Result<Vec<T>, StoreError> {
        let collection = T::COLLECTION;
        self.remote
            .select_all(collection)
            .await?
            .into_iter()
            .map(|row| {
                serde_json::from_value(row)
                    .map_err(|source| StoreError::Decode { collection, source })
            })
            .collect()
    }
}

fn apply<T: Mirrored>(
    state: &mut Snapshot,
    result: Result<Vec<T>, StoreError>,
    report: &mut RefreshReport,
) {
    let collection = T::COLLECTION;
    let slot = T::slot(state);
    match result {
        Ok(items) => {
            slot.items = items;
            slot.issue = None;
        }
        Err(e) => {
            error!("Error fetching {}: {}", collection.label(), e);
            let notice = LoadNotice {
                collection,
                message: format!(
                    "Could not load {}. Showing the last loaded data.",
                    collection.label()
                ),
            };
            slot.issue = Some(notice.clone());
            report.failed.push(notice);
        }
    }
    slot.status = LoadStatus::Loaded;
}
