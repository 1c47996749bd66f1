//! In-memory map from user to conversation record.

use std::sync::Arc;

use dashmap::DashMap;
use log::debug;
use tokio::sync::Mutex;

use crate::types::{ModelId, ModelSelection, UserId};

use super::record::ConversationRecord;

/// Shared handle to one user's record.
///
/// Holding the lock serializes turns for that user only.
pub type RecordHandle = Arc<Mutex<ConversationRecord>>;

/// Owner of every conversation record, keyed by user.
#[derive(Debug, Default)]
pub struct ConversationStore {
    records: DashMap<UserId, RecordHandle>,
}

impl ConversationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the user's record, inserting a fresh one on first contact.
    pub fn get_or_create(&self, user: UserId) -> RecordHandle {
        let entry = self.records.entry(user).or_insert_with(|| {
            debug!("Creating conversation record for user {user}");
            Arc::new(Mutex::new(ConversationRecord::new(user)))
        });
        Arc::clone(entry.value())
    }

    fn get(&self, user: UserId) -> Option<RecordHandle> {
        self.records.get(&user).map(|entry| Arc::clone(entry.value()))
    }

    /// Resets the user's transcript. Unknown users are ignored.
    pub async fn clear(&self, user: UserId) {
        let Some(handle) = self.get(user) else {
            debug!("Clear requested for unknown user {user}, nothing to do");
            return;
        };

        let mut record = handle.lock().await;
        record.transcript.reset();
        debug!("Cleared transcript for user {user}");
    }

    pub async fn set_model(&self, user: UserId, model: ModelId) {
        let handle = self.get_or_create(user);
        let mut record = handle.lock().await;
        record.model = ModelSelection::Selected(model);
        debug!("User {user} selected model {model}");
    }

    /// `None` when the user has never been seen.
    pub async fn get_model(&self, user: UserId) -> Option<ModelSelection> {
        let handle = self.get(user)?;
        let record = handle.lock().await;
        Some(record.model)
    }

    #[must_use]
    pub fn contains(&self, user: UserId) -> bool {
        self.records.contains_key(&user)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
