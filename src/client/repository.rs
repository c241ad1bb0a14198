use std::borrow::Cow;

use crate::client::ApiError;
use crate::logic::merge;
use crate::model::{Entity, Key, QueryOptions};

/// CRUD access to one REST resource.
#[async_trait::async_trait]
pub trait EntityRepository<E: Entity>: Send + Sync {
    /// Persists a draft that has no key yet; the backend assigns one.
    async fn create(&self, draft: &E) -> Result<E, ApiError>;
    /// Full replace of a saved entity, addressed by its own key.
    async fn update(&self, entity: &E) -> Result<E, ApiError>;
    /// Sends only the fields present in `patch`, plus its key.
    async fn partial_update(&self, patch: &E) -> Result<E, ApiError>;
    /// `Ok(None)` when the backend has nothing under `key`.
    async fn find(&self, key: Key) -> Result<Option<E>, ApiError>;
    async fn list(&self, options: &QueryOptions) -> Result<Vec<E>, ApiError>;
    async fn delete(&self, key: Key) -> Result<(), ApiError>;

    fn identity_of(&self, entity: &E) -> Option<Key> {
        entity.key()
    }

    fn same_identity(&self, a: Option<&E>, b: Option<&E>) -> bool {
        merge::same_identity(a, b)
    }

    fn merge_missing<'a>(&self, existing: &'a [E], candidates: &[Option<&E>]) -> Cow<'a, [E]> {
        merge::merge_missing(existing, candidates.iter().copied())
    }
}
