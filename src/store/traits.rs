use anyhow::Result;

use crate::model::{Entity, Inventory, Key, Medication};

/// Rule violations a store refuses to commit, like database constraints.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("medicamento {0} does not exist")]
    UnknownMedication(Key),
    #[error("medicamento {0} is already linked to another inventario")]
    AlreadyLinked(Key),
    #[error("medicamento {0} is still referenced by an inventario")]
    StillReferenced(Key),
}

impl StoreError {
    pub fn error_key(&self) -> &'static str {
        match self {
            StoreError::UnknownMedication(_) => "medicamentonotfound",
            StoreError::AlreadyLinked(_) => "medicamentoalreadylinked",
            StoreError::StillReferenced(_) => "medicamentolinked",
        }
    }
}

/// Row storage for one entity type.
#[async_trait::async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    /// Stores a new row under the next key of the sequence and returns it.
    async fn insert(&self, entity: E) -> Result<E>;
    async fn get(&self, id: Key) -> Result<Option<E>>;
    /// All rows ordered by key; `filter` names a backend-side filter.
    async fn list(&self, filter: Option<&str>) -> Result<Vec<E>>;
    async fn exists(&self, id: Key) -> Result<bool>;
    /// Replaces an existing row.
    async fn replace(&self, entity: E) -> Result<E>;
    /// `false` when there was nothing to delete.
    async fn delete(&self, id: Key) -> Result<bool>;
}

pub trait Store: EntityStore<Medication> + EntityStore<Inventory> + Send + Sync {}

impl<T: EntityStore<Medication> + EntityStore<Inventory>> Store for T {}
