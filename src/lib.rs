pub mod api;
pub mod client;
pub mod config;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

// Export client types
pub use client::{ApiError, EntityRepository, RestRepository};

// Export logic types
pub use logic::{
    merge_missing, same_identity, DeleteDialog, DialogEvent, Draft, EditFormController,
    FormError, FormState, History, Navigator, NoRelation, PreviousState, RelationSource,
    RelationshipLoader, Resolution, RouteResolver, SaveHooks,
};

// Export all model types
pub use model::*;

// Export seed module
pub use seed::*;

// Export store types
pub use store::{EntityStore, MemoryStore, Store, StoreError};

/// Serves the REST API on `listener` until the task is dropped.
pub async fn serve<S: Store + 'static>(
    listener: tokio::net::TcpListener,
    store: std::sync::Arc<S>,
) -> anyhow::Result<()> {
    let app = crate::api::routes::create_router().with_state(store);
    if let Ok(address) = listener.local_addr() {
        log::info!("pharmacy admin API listening on http://{}", address);
    }
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::model::{Entity, Field, Identity, Inventory, Medication};
    use serde_json::json;

    #[test]
    fn test_inventory_body_from_backend() {
        let json = r#"{"id": 16239, "cantidadStock": 13821, "medicamento": {"id": 816}}"#;
        let inventory: Inventory = serde_json::from_str(json).unwrap();

        assert_eq!(inventory.identity(), Identity::Saved(16239));
        assert_eq!(inventory.stock_quantity, Field::Value(13821));
        assert_eq!(inventory.medication.value().map(|link| link.id), Some(816));
    }

    #[test]
    fn test_new_entity_body_carries_null_id() {
        let body = serde_json::to_value(Inventory::new(25492)).unwrap();
        assert_eq!(body, json!({"id": null, "cantidadStock": 25492}));
    }

    #[test]
    fn test_unlinked_medication_reads_as_null_link() {
        let json = r#"{"id": 15319, "nombre": "as", "precio": 10112.38, "inventario": null}"#;
        let medication: Medication = serde_json::from_str(json).unwrap();

        assert!(medication.inventory.is_null());
        assert!(medication.description.is_absent());
        assert!(medication.missing_required().is_empty());
    }
}
