use crate::draft::Draft;
use crate::models::{Collection, ViewMode};
use crate::storage::StoreClient;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Everything the page renders from.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub records: Collection,
    pub draft: Draft,
    pub view: ViewMode,
}

impl Dashboard {
    pub fn new(records: Collection) -> Self {
        let draft = Draft::seeded(records.len(), now_millis());
        Self {
            records,
            draft,
            view: ViewMode::default(),
        }
    }

    /// Swaps in a freshly loaded or confirmed collection and reseeds the draft
    /// against it. The view mode is left alone.
    pub fn replace_records(&mut self, records: Collection) {
        self.draft = Draft::seeded(records.len(), now_millis());
        self.records = records;
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: StoreClient,
    pub dashboard: Arc<Mutex<Dashboard>>,
}

impl AppState {
    pub fn new(store: StoreClient, records: Collection) -> Self {
        Self {
            store,
            dashboard: Arc::new(Mutex::new(Dashboard::new(records))),
        }
    }
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
