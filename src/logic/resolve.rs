use std::marker::PhantomData;
use std::sync::Arc;

use crate::client::{ApiError, EntityRepository};
use crate::logic::Navigator;
use crate::model::{Entity, Key, Route, RouteParams};

/// Outcome of resolving the entity a navigation points at.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<E> {
    Found(E),
    /// No identifier in the route: a create flow.
    NoSelection,
    /// The identifier names nothing; the caller should navigate away.
    Redirect(Route),
}

impl<E> Resolution<E> {
    /// The route data handed to the view: the entity, or nothing.
    pub fn into_selection(self) -> Option<E> {
        match self {
            Resolution::Found(entity) => Some(entity),
            Resolution::NoSelection | Resolution::Redirect(_) => None,
        }
    }
}

/// Fetches the entity named by the `id` route parameter before navigation.
pub struct RouteResolver<E, R> {
    repository: Arc<R>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, R> RouteResolver<E, R>
where
    E: Entity,
    R: EntityRepository<E>,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            _entity: PhantomData,
        }
    }

    /// Resolves one navigation attempt. Issues exactly one `find` when an
    /// identifier is supplied and none otherwise.
    pub async fn resolve(&self, params: &RouteParams) -> Result<Resolution<E>, ApiError> {
        let raw = match params.get("id") {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(Resolution::NoSelection),
        };

        let key = match raw.parse::<Key>() {
            Ok(key) if key > 0 => key,
            _ => {
                log::info!("{} route id {:?} is not a key", E::ENTITY_NAME, raw);
                return Ok(Resolution::Redirect(Route::NotFound));
            }
        };

        match self.repository.find(key).await? {
            Some(entity) => Ok(Resolution::Found(entity)),
            None => {
                log::info!("{} {} not found, redirecting", E::ENTITY_NAME, key);
                Ok(Resolution::Redirect(Route::NotFound))
            }
        }
    }

    /// Resolves and performs any redirect through `navigator`.
    pub async fn resolve_with<N>(
        &self,
        params: &RouteParams,
        navigator: &N,
    ) -> Result<Option<E>, ApiError>
    where
        N: Navigator + ?Sized,
    {
        match self.resolve(params).await? {
            Resolution::Redirect(route) => {
                navigator.navigate(route);
                Ok(None)
            }
            resolution => Ok(resolution.into_selection()),
        }
    }
}
