use async_trait::async_trait;
use chrono::NaiveDateTime;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use std::collections::HashSet;
use tokio::sync::RwLock;

use crate::metrics::{track_store_operation, RECORDS_APPENDED_TOTAL};
use crate::models::{AttemptRecord, NewAttemptRecord, RecordFilter};
use crate::utils::time::now_seconds;

const RECORDS_COLLECTION: &str = "records";
const COUNTERS_COLLECTION: &str = "counters";
const RECORD_COUNTER_ID: &str = "records";

#[derive(Debug, thiserror::Error)]
pub enum RecordStoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("record store returned corrupt data: {0}")]
    Corrupt(String),
}

impl From<mongodb::error::Error> for RecordStoreError {
    fn from(err: mongodb::error::Error) -> Self {
        match *err.kind {
            mongodb::error::ErrorKind::BsonDeserialization(ref e) => {
                RecordStoreError::Corrupt(e.to_string())
            }
            _ => RecordStoreError::Unavailable(err.to_string()),
        }
    }
}

/// Append-only log of attempt records.
///
/// Implementations issue ids and timestamps themselves; two concurrent
/// `add_record` calls never receive the same id.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Records matching `filter`, most recent first.
    async fn get_records(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<AttemptRecord>, RecordStoreError>;

    /// Appends `draft` and returns the id assigned to it.
    async fn add_record(&self, draft: NewAttemptRecord) -> Result<i64, RecordStoreError>;

    /// Inserts records that already carry an id and timestamp (sample data,
    /// migrations). Later `add_record` ids continue after the highest import.
    async fn import_records(
        &self,
        records: Vec<AttemptRecord>,
    ) -> Result<usize, RecordStoreError>;

    async fn count(&self) -> Result<usize, RecordStoreError>;

    async fn ping(&self) -> Result<(), RecordStoreError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str;
}

/// Most recent first; records sharing a timestamp keep insertion order.
pub fn sort_most_recent_first(records: &mut [AttemptRecord]) {
    records.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Process-local record log. The write lock is the single writer: id issue and
/// append happen under it.
pub struct InMemoryRecordStore {
    records: RwLock<Vec<AttemptRecord>>,
    clock: fn() -> NaiveDateTime,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Store pre-populated with already-issued records (imports, tests).
    pub fn with_records(records: Vec<AttemptRecord>) -> Self {
        Self {
            records: RwLock::new(records),
            clock: now_seconds,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get_records(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<AttemptRecord>, RecordStoreError> {
        track_store_operation("find", async {
            let records = self.records.read().await;
            let mut matching: Vec<AttemptRecord> = records
                .iter()
                .filter(|record| filter.matches(record))
                .cloned()
                .collect();
            drop(records);

            sort_most_recent_first(&mut matching);
            Ok::<_, RecordStoreError>(matching)
        })
        .await
    }

    async fn add_record(&self, draft: NewAttemptRecord) -> Result<i64, RecordStoreError> {
        track_store_operation("insert", async {
            let mut records = self.records.write().await;
            let id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
            let success = draft.success;
            records.push(draft.into_record(id, (self.clock)()));
            drop(records);

            RECORDS_APPENDED_TOTAL
                .with_label_values(&[if success { "true" } else { "false" }])
                .inc();
            tracing::debug!(id, "Attempt record appended (memory)");
            Ok::<_, RecordStoreError>(id)
        })
        .await
    }

    async fn import_records(
        &self,
        imported: Vec<AttemptRecord>,
    ) -> Result<usize, RecordStoreError> {
        track_store_operation("import", async {
            let mut records = self.records.write().await;
            let mut seen: HashSet<i64> = records.iter().map(|r| r.id).collect();
            if let Some(record) = imported.iter().find(|new| !seen.insert(new.id)) {
                return Err(RecordStoreError::Corrupt(format!(
                    "record id {} already exists",
                    record.id
                )));
            }
            let count = imported.len();
            records.extend(imported);
            Ok(count)
        })
        .await
    }

    async fn count(&self) -> Result<usize, RecordStoreError> {
        track_store_operation("count", async {
            Ok::<_, RecordStoreError>(self.records.read().await.len())
        })
        .await
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// MongoDB-backed record log. Ids come from an atomically incremented counter
/// document, so they stay unique across processes.
pub struct MongoRecordStore {
    db: Database,
    records: Collection<AttemptRecord>,
    counters: Collection<Document>,
}

impl MongoRecordStore {
    pub fn new(db: Database) -> Self {
        Self {
            records: db.collection(RECORDS_COLLECTION),
            counters: db.collection(COUNTERS_COLLECTION),
            db,
        }
    }

    /// Creates indexes and aligns the id counter with records written before
    /// the counter existed.
    pub async fn initialize(&self) -> Result<(), RecordStoreError> {
        self.records
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "id": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
            )
            .await?;
        self.records
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "timestamp": -1, "id": 1 })
                    .build(),
            )
            .await?;
        self.records
            .create_index(IndexModel::builder().keys(doc! { "tags": 1 }).build())
            .await?;

        let highest = self.sync_counter().await?;
        tracing::info!(highest_id = highest, "Mongo record store initialized");
        Ok(())
    }

    /// Raises the id counter to the highest stored id.
    async fn sync_counter(&self) -> Result<i64, RecordStoreError> {
        let highest = self
            .records
            .find_one(doc! {})
            .sort(doc! { "id": -1 })
            .await?
            .map(|record| record.id)
            .unwrap_or(0);

        self.counters
            .update_one(
                doc! { "_id": RECORD_COUNTER_ID },
                doc! { "$max": { "seq": highest } },
            )
            .upsert(true)
            .await?;
        Ok(highest)
    }

    async fn next_id(&self) -> Result<i64, RecordStoreError> {
        let counter = self
            .counters
            .find_one_and_update(
                doc! { "_id": RECORD_COUNTER_ID },
                doc! { "$inc": { "seq": 1_i64 } },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| RecordStoreError::Corrupt("record counter missing".to_string()))?;

        counter
            .get_i64("seq")
            .or_else(|_| counter.get_i32("seq").map(i64::from))
            .map_err(|e| RecordStoreError::Corrupt(format!("record counter: {}", e)))
    }

    fn filter_document(filter: &RecordFilter) -> Document {
        let mut query = Document::new();
        if let Some(tag) = &filter.tag {
            query.insert("tags", tag.as_str());
        }
        if let Some(difficulty) = filter.difficulty {
            query.insert("difficulty", difficulty.localized());
        }
        query
    }
}

#[async_trait]
impl RecordStore for MongoRecordStore {
    async fn get_records(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<AttemptRecord>, RecordStoreError> {
        track_store_operation("find", async {
            let cursor = self
                .records
                .find(Self::filter_document(filter))
                .sort(doc! { "timestamp": -1, "id": 1 })
                .await?;
            let records: Vec<AttemptRecord> = cursor.try_collect().await?;
            Ok::<_, RecordStoreError>(records)
        })
        .await
    }

    async fn add_record(&self, draft: NewAttemptRecord) -> Result<i64, RecordStoreError> {
        track_store_operation("insert", async {
            let id = self.next_id().await?;
            let success = draft.success;
            let record = draft.into_record(id, now_seconds());
            self.records.insert_one(&record).await?;

            RECORDS_APPENDED_TOTAL
                .with_label_values(&[if success { "true" } else { "false" }])
                .inc();
            tracing::debug!(id, "Attempt record appended (mongo)");
            Ok::<_, RecordStoreError>(id)
        })
        .await
    }

    async fn import_records(
        &self,
        records: Vec<AttemptRecord>,
    ) -> Result<usize, RecordStoreError> {
        if records.is_empty() {
            return Ok(0);
        }
        track_store_operation("import", async {
            let inserted = self.records.insert_many(&records).await?;
            self.sync_counter().await?;
            Ok::<_, RecordStoreError>(inserted.inserted_ids.len())
        })
        .await
    }

    async fn count(&self) -> Result<usize, RecordStoreError> {
        track_store_operation("count", async {
            let count = self.records.count_documents(doc! {}).await?;
            Ok::<_, RecordStoreError>(count as usize)
        })
        .await
    }

    async fn ping(&self) -> Result<(), RecordStoreError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "mongo"
    }
}
