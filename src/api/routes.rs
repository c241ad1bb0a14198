use axum::{routing::get, Router};
use std::sync::Arc;

use crate::api::handlers;
use crate::model::{Entity, Inventory, Medication};
use crate::store::traits::{EntityStore, Store};

pub fn create_router<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .merge(entity_routes::<S, Medication>())
        .merge(entity_routes::<S, Inventory>())
}

/// CRUD routes for `/api/<resource>` and `/api/<resource>/:id`.
fn entity_routes<S, E>() -> Router<Arc<S>>
where
    S: EntityStore<E> + 'static,
    E: Entity,
{
    let collection = format!("/api/{}", E::RESOURCE);
    let item = format!("{}/:id", collection);

    Router::new()
        .route(
            &collection,
            get(handlers::list_entities::<S, E>).post(handlers::create_entity::<S, E>),
        )
        .route(
            &item,
            get(handlers::get_entity::<S, E>)
                .put(handlers::update_entity::<S, E>)
                .patch(handlers::partial_update_entity::<S, E>)
                .delete(handlers::delete_entity::<S, E>),
        )
}
