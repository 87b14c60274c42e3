use std::sync::Arc;

use placement_store::{Snapshot, SyncStore};
use placement_types::api::Page;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: SyncStore,
}

impl AppStateInner {
    pub fn new(store: SyncStore) -> AppState {
        Arc::new(Self { store })
    }
}

/// Wrap a view with the sync state every page shows.
pub fn page<T>(snapshot: &Snapshot, view: T) -> Page<T> {
    Page {
        loading: snapshot.loading,
        notices: snapshot.notices(),
        view,
    }
}
