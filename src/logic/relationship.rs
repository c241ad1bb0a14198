use std::borrow::Cow;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::client::{ApiError, EntityRepository};
use crate::model::{Entity, Linked, QueryOptions};

/// Supplies the option set of a form's relationship picker.
#[async_trait::async_trait]
pub trait RelationSource<E: Entity>: Send + Sync {
    type Target: Entity;

    async fn options_for(&self, draft: &E) -> Result<Vec<Self::Target>, ApiError>;
}

/// For forms without a relationship picker.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRelation;

#[async_trait::async_trait]
impl<E: Entity> RelationSource<E> for NoRelation {
    type Target = E;

    async fn options_for(&self, _draft: &E) -> Result<Vec<E>, ApiError> {
        Ok(Vec::new())
    }
}

/// Lists candidate `T`s and makes sure the current selection is among them.
pub struct RelationshipLoader<T, R> {
    repository: Arc<R>,
    query: QueryOptions,
    _target: PhantomData<fn() -> T>,
}

impl<T, R> RelationshipLoader<T, R>
where
    T: Entity,
    R: EntityRepository<T>,
{
    pub fn new(repository: Arc<R>, query: QueryOptions) -> Self {
        Self {
            repository,
            query,
            _target: PhantomData,
        }
    }

    /// Loader for the owning side `E`, listing only `T`s that nobody links to.
    pub fn unlinked<E: Linked<T>>(repository: Arc<R>) -> Self {
        Self::new(repository, E::unlinked_query())
    }

    /// Candidates from the filtered list, with `selected` merged in front
    /// when the filter left it out.
    pub async fn load(&self, selected: Option<&T>) -> Result<Vec<T>, ApiError> {
        let candidates = self.repository.list(&self.query).await?;
        if let Cow::Owned(merged) = self.repository.merge_missing(&candidates, &[selected]) {
            return Ok(merged);
        }
        Ok(candidates)
    }
}

#[async_trait::async_trait]
impl<E, T, R> RelationSource<E> for RelationshipLoader<T, R>
where
    E: Linked<T>,
    T: Entity,
    R: EntityRepository<T>,
{
    type Target = T;

    async fn options_for(&self, draft: &E) -> Result<Vec<T>, ApiError> {
        let selected = draft.linked_key().map(T::from_key);
        self.load(selected.as_ref()).await
    }
}
