use std::sync::Arc;

use crate::client::{ApiError, EntityRepository};
use crate::model::{Entity, Key};

/// How a delete-confirmation dialog was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogEvent {
    /// The entity is gone; the list behind the dialog should reload.
    Deleted,
    Dismissed,
}

/// Delete confirmation for one entity.
pub struct DeleteDialog<E, R> {
    repository: Arc<R>,
    entity: E,
}

impl<E, R> DeleteDialog<E, R>
where
    E: Entity,
    R: EntityRepository<E>,
{
    pub fn open(repository: Arc<R>, entity: E) -> Self {
        Self { repository, entity }
    }

    pub fn entity(&self) -> &E {
        &self.entity
    }

    pub fn cancel(&self) -> DialogEvent {
        DialogEvent::Dismissed
    }

    /// On failure the error is handed back and the dialog stays open.
    pub async fn confirm_delete(&self, key: Key) -> Result<DialogEvent, ApiError> {
        self.repository.delete(key).await?;
        log::debug!("{} {} deleted", E::ENTITY_NAME, key);
        Ok(DialogEvent::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::{Call, RecordingRepository};
    use crate::model::Medication;

    #[tokio::test]
    async fn test_confirm_delete_closes_with_deleted_event() {
        let repository = Arc::new(RecordingRepository::with_rows(vec![Medication::from_key(8)]));
        let dialog = DeleteDialog::open(repository.clone(), Medication::from_key(8));

        assert_eq!(dialog.confirm_delete(8).await.unwrap(), DialogEvent::Deleted);
        assert_eq!(repository.calls(), vec![Call::Delete(8)]);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_dialog_open() {
        let repository = Arc::new(RecordingRepository::with_rows(vec![Medication::from_key(8)]));
        repository.set_failing(true);
        let dialog = DeleteDialog::open(repository.clone(), Medication::from_key(8));

        assert!(dialog.confirm_delete(8).await.is_err());
        assert_eq!(dialog.entity().key(), Some(8));

        repository.set_failing(false);
        assert!(dialog.confirm_delete(42).await.unwrap_err().is_not_found());
        assert_eq!(dialog.cancel(), DialogEvent::Dismissed);
    }
}
