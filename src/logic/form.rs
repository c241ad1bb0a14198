use parking_lot::Mutex;
use std::sync::Arc;

use crate::client::{ApiError, EntityRepository};
use crate::logic::{merge, Navigator, NoRelation, RelationSource};
use crate::model::{Entity, Identity};

/// Editable copy of an entity. The key is fixed at hydration and cannot be
/// changed through `edit`.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft<E> {
    identity: Identity,
    value: E,
}

impl<E: Entity> Draft<E> {
    /// Empty draft for a create flow.
    pub fn new() -> Self {
        Self {
            identity: Identity::Unsaved,
            value: E::default(),
        }
    }

    pub fn hydrate(entity: &E) -> Self {
        Self {
            identity: entity.identity(),
            value: entity.clone(),
        }
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    pub fn value(&self) -> &E {
        &self.value
    }

    pub fn edit<F: FnOnce(&mut E)>(&mut self, f: F) {
        f(&mut self.value);
        self.value.set_identity(self.identity);
    }

    /// Wire names of required fields still missing.
    pub fn validation_errors(&self) -> Vec<&'static str> {
        self.value.missing_required()
    }

    pub fn is_valid(&self) -> bool {
        self.validation_errors().is_empty()
    }

    /// The entity to submit.
    pub fn to_entity(&self) -> E {
        let mut entity = self.value.clone();
        entity.set_identity(self.identity);
        entity
    }
}

impl<E: Entity> Default for Draft<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle { with_entity: bool },
    Saving,
    SaveFailed,
    SaveSucceeded,
}

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("a save is already in progress")]
    SaveInProgress,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Reactions to the end of a save.
pub trait SaveHooks<E>: Send + Sync {
    fn on_save_success(&self, saved: &E);

    fn on_save_error(&self, _error: &ApiError) {}
}

/// Default hooks: go back to the previous view after a successful save.
pub struct PreviousState<N: ?Sized> {
    navigator: Arc<N>,
}

impl<N: Navigator + ?Sized> PreviousState<N> {
    pub fn new(navigator: Arc<N>) -> Self {
        Self { navigator }
    }
}

impl<E, N: Navigator + ?Sized> SaveHooks<E> for PreviousState<N> {
    fn on_save_success(&self, _saved: &E) {
        self.navigator.back();
    }
}

struct FormInner<E, T> {
    entity: Option<E>,
    draft: Draft<E>,
    state: FormState,
    saving: bool,
    options: Vec<T>,
}

/// Clears the saving flag when a save attempt ends, however it ends.
/// A save dropped before the backend answered counts as failed.
struct SaveFinalizer<'a, E, T> {
    inner: &'a Mutex<FormInner<E, T>>,
}

impl<E, T> Drop for SaveFinalizer<'_, E, T> {
    fn drop(&mut self) {
        let mut inner = self.inner.lock();
        inner.saving = false;
        if inner.state == FormState::Saving {
            inner.state = FormState::SaveFailed;
        }
    }
}

/// Create/update form for one entity, with an optional relationship picker.
pub struct EditFormController<E, R, L = NoRelation>
where
    E: Entity,
    L: RelationSource<E>,
{
    repository: Arc<R>,
    relations: L,
    hooks: Box<dyn SaveHooks<E>>,
    inner: Mutex<FormInner<E, L::Target>>,
}

impl<E, R, L> EditFormController<E, R, L>
where
    E: Entity,
    R: EntityRepository<E>,
    L: RelationSource<E>,
{
    pub fn new(repository: Arc<R>, relations: L, hooks: Box<dyn SaveHooks<E>>) -> Self {
        Self {
            repository,
            relations,
            hooks,
            inner: Mutex::new(FormInner {
                entity: None,
                draft: Draft::new(),
                state: FormState::Idle { with_entity: false },
                saving: false,
                options: Vec::new(),
            }),
        }
    }

    /// Entry point with the resolved route data. Hydrates the draft when an
    /// entity is given, then loads the relationship options.
    pub async fn on_route_data(&self, entity: Option<E>) -> Result<(), ApiError> {
        let draft = {
            let mut inner = self.inner.lock();
            inner.state = FormState::Idle {
                with_entity: entity.is_some(),
            };
            inner.draft = entity.as_ref().map(Draft::hydrate).unwrap_or_default();
            inner.entity = entity;
            inner.draft.to_entity()
        };

        let options = match self.relations.options_for(&draft).await {
            Ok(options) => options,
            Err(error) => {
                log::warn!("loading options for {} failed: {}", E::ENTITY_NAME, error);
                return Err(error);
            }
        };
        self.inner.lock().options = options;
        Ok(())
    }

    pub fn entity(&self) -> Option<E> {
        self.inner.lock().entity.clone()
    }

    pub fn draft(&self) -> Draft<E> {
        self.inner.lock().draft.clone()
    }

    pub fn edit_draft<F: FnOnce(&mut E)>(&self, f: F) {
        self.inner.lock().draft.edit(f);
    }

    pub fn relation_options(&self) -> Vec<L::Target> {
        self.inner.lock().options.clone()
    }

    /// Picker comparison for the related entity.
    pub fn compare_relation(&self, a: Option<&L::Target>, b: Option<&L::Target>) -> bool {
        merge::same_identity(a, b)
    }

    pub fn state(&self) -> FormState {
        self.inner.lock().state
    }

    pub fn is_saving(&self) -> bool {
        self.inner.lock().saving
    }

    pub fn can_save(&self) -> bool {
        let inner = self.inner.lock();
        !inner.saving && inner.draft.is_valid()
    }

    /// Submits the draft: `update` when it carries a key, `create` otherwise.
    ///
    /// A second call while one is in flight is rejected without a backend call.
    pub async fn save(&self) -> Result<E, FormError> {
        let entity = {
            let mut inner = self.inner.lock();
            if inner.saving {
                return Err(FormError::SaveInProgress);
            }
            inner.saving = true;
            inner.state = FormState::Saving;
            inner.draft.to_entity()
        };
        let _finalize = SaveFinalizer { inner: &self.inner };

        let result = match entity.identity() {
            Identity::Saved(_) => self.repository.update(&entity).await,
            Identity::Unsaved => self.repository.create(&entity).await,
        };

        match result {
            Ok(saved) => {
                self.inner.lock().state = FormState::SaveSucceeded;
                log::debug!("{} {} saved", E::ENTITY_NAME, saved.identity());
                self.hooks.on_save_success(&saved);
                Ok(saved)
            }
            Err(error) => {
                self.inner.lock().state = FormState::SaveFailed;
                log::warn!("saving {} failed: {}", E::ENTITY_NAME, error);
                self.hooks.on_save_error(&error);
                Err(error.into())
            }
        }
    }
}
