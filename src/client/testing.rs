use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;

use crate::client::{ApiError, EntityRepository};
use crate::model::{Entity, Identity, Key, QueryOptions};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Create,
    Update(Option<Key>),
    PartialUpdate(Option<Key>),
    Find(Key),
    List(QueryOptions),
    Delete(Key),
}

/// In-memory repository that records every call it receives.
pub(crate) struct RecordingRepository<E> {
    rows: Mutex<Vec<E>>,
    listed: Mutex<Option<Vec<E>>>,
    calls: Mutex<Vec<Call>>,
    failing: Mutex<bool>,
    gate: Mutex<Option<Arc<Notify>>>,
    next_key: Mutex<Key>,
}

impl<E: Entity> RecordingRepository<E> {
    pub(crate) fn new() -> Self {
        Self::with_rows(Vec::new())
    }

    pub(crate) fn with_rows(rows: Vec<E>) -> Self {
        Self {
            rows: Mutex::new(rows),
            listed: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(false),
            gate: Mutex::new(None),
            next_key: Mutex::new(1000),
        }
    }

    /// `list` answers with exactly these rows, whatever the query.
    pub(crate) fn listing(self, rows: Vec<E>) -> Self {
        *self.listed.lock() = Some(rows);
        self
    }

    /// Writes and deletes fail with a 500 until cleared.
    pub(crate) fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    /// Writes wait on the returned handle before answering.
    pub(crate) fn hold_writes(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock() = Some(gate.clone());
        gate
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    async fn before_write(&self) -> Result<(), ApiError> {
        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if *self.failing.lock() {
            return Err(ApiError::Server {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(())
    }

    fn upsert(&self, entity: &E) {
        let mut rows = self.rows.lock();
        rows.retain(|row| row.key() != entity.key());
        rows.push(entity.clone());
    }
}

#[async_trait::async_trait]
impl<E: Entity> EntityRepository<E> for RecordingRepository<E> {
    async fn create(&self, draft: &E) -> Result<E, ApiError> {
        self.record(Call::Create);
        self.before_write().await?;
        let mut created = draft.clone();
        let key = {
            let mut next_key = self.next_key.lock();
            *next_key += 1;
            *next_key
        };
        created.set_identity(Identity::Saved(key));
        self.upsert(&created);
        Ok(created)
    }

    async fn update(&self, entity: &E) -> Result<E, ApiError> {
        self.record(Call::Update(entity.key()));
        self.before_write().await?;
        self.upsert(entity);
        Ok(entity.clone())
    }

    async fn partial_update(&self, patch: &E) -> Result<E, ApiError> {
        self.record(Call::PartialUpdate(patch.key()));
        self.before_write().await?;
        let mut rows = self.rows.lock();
        let row = rows
            .iter_mut()
            .find(|row| row.key().is_some() && row.key() == patch.key())
            .ok_or(ApiError::NotFound {
                entity: E::ENTITY_NAME,
                id: patch.key().unwrap_or_default(),
            })?;
        row.merge_patch(patch.clone());
        Ok(row.clone())
    }

    async fn find(&self, key: Key) -> Result<Option<E>, ApiError> {
        self.record(Call::Find(key));
        Ok(self
            .rows
            .lock()
            .iter()
            .find(|row| row.key() == Some(key))
            .cloned())
    }

    async fn list(&self, options: &QueryOptions) -> Result<Vec<E>, ApiError> {
        self.record(Call::List(options.clone()));
        if let Some(listed) = self.listed.lock().clone() {
            return Ok(listed);
        }
        Ok(self.rows.lock().clone())
    }

    async fn delete(&self, key: Key) -> Result<(), ApiError> {
        self.record(Call::Delete(key));
        self.before_write().await?;
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|row| row.key() != Some(key));
        if rows.len() == before {
            return Err(ApiError::NotFound {
                entity: E::ENTITY_NAME,
                id: key,
            });
        }
        Ok(())
    }
}
