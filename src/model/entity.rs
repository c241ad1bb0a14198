use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

use crate::model::{Identity, Key, QueryOptions};

/// A record exposed as a REST resource under `/api/<RESOURCE>`.
pub trait Entity:
    Clone + Debug + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Collection segment of the resource path, e.g. `medicamentos`.
    const RESOURCE: &'static str;
    /// Singular name used in error messages and log lines.
    const ENTITY_NAME: &'static str;

    fn identity(&self) -> Identity;

    fn set_identity(&mut self, identity: Identity);

    fn key(&self) -> Option<Key> {
        self.identity().key()
    }

    /// A stub carrying nothing but the key, as relationship links arrive.
    fn from_key(key: Key) -> Self {
        let mut entity = Self::default();
        entity.set_identity(Identity::Saved(key));
        entity
    }

    /// Wire names of required fields that are null, absent or blank.
    /// The key is never part of this check.
    fn missing_required(&self) -> Vec<&'static str>;

    /// Applies a partial update: absent fields keep their value, nulls clear.
    fn merge_patch(&mut self, patch: Self);
}

/// Owning side of a one-to-one link towards `T`.
pub trait Linked<T: Entity>: Entity {
    /// Query that lists only the `T`s nobody links to yet.
    fn unlinked_query() -> QueryOptions;

    fn linked_key(&self) -> Option<Key>;

    fn set_link(&mut self, key: Option<Key>);
}
