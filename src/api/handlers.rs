use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Json,
    Json as RequestJson,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::model::{Entity, Identity, Key};
use crate::store::traits::{EntityStore, StoreError};

pub type AppState<S> = Arc<S>;

type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
            key: None,
        }
    }

    pub fn with_key(message: &str, key: &str) -> Self {
        Self {
            error: message.to_string(),
            key: Some(key.to_string()),
        }
    }
}

fn bad_request(message: &str, key: &str) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::with_key(message, key)),
    )
}

fn not_found<E: Entity>() -> HandlerError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::with_key(
            &format!("{} not found", E::ENTITY_NAME),
            "idnotfound",
        )),
    )
}

// Rule violations reported by the store become 400s, anything else is a 500.
fn store_failure(error: anyhow::Error) -> HandlerError {
    match error.downcast_ref::<StoreError>() {
        Some(violation) => bad_request(&violation.to_string(), violation.error_key()),
        None => {
            log::error!("store failure: {:#}", error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&error.to_string())),
            )
        }
    }
}

fn validate_required<E: Entity>(entity: &E) -> Result<(), HandlerError> {
    let missing = entity.missing_required();
    if missing.is_empty() {
        return Ok(());
    }
    Err(bad_request(
        &format!("{} is missing required fields: {}", E::ENTITY_NAME, missing.join(", ")),
        "required",
    ))
}

// Body id must be present and agree with the path id.
fn check_identity(path_id: Key, identity: Identity) -> Result<(), HandlerError> {
    match identity {
        Identity::Unsaved => Err(bad_request("Invalid id", "idnull")),
        Identity::Saved(id) if id != path_id => Err(bad_request("Invalid ID", "idinvalid")),
        Identity::Saved(_) => Ok(()),
    }
}

pub async fn create_entity<S, E>(
    State(store): State<AppState<S>>,
    RequestJson(entity): RequestJson<E>,
) -> Result<(StatusCode, HeaderMap, Json<E>), HandlerError>
where
    S: EntityStore<E>,
    E: Entity,
{
    log::debug!("REST request to save {} : {:?}", E::ENTITY_NAME, entity);
    if entity.identity().is_saved() {
        return Err(bad_request(
            &format!("A new {} cannot already have an ID", E::ENTITY_NAME),
            "idexists",
        ));
    }
    validate_required(&entity)?;

    let created = store.insert(entity).await.map_err(store_failure)?;

    let mut headers = HeaderMap::new();
    if let Ok(location) =
        HeaderValue::from_str(&format!("/api/{}/{}", E::RESOURCE, created.identity()))
    {
        headers.insert(header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(created)))
}

pub async fn update_entity<S, E>(
    State(store): State<AppState<S>>,
    Path(id): Path<Key>,
    RequestJson(entity): RequestJson<E>,
) -> Result<Json<E>, HandlerError>
where
    S: EntityStore<E>,
    E: Entity,
{
    log::debug!("REST request to update {} : {}, {:?}", E::ENTITY_NAME, id, entity);
    check_identity(id, entity.identity())?;
    if !store.exists(id).await.map_err(store_failure)? {
        return Err(not_found::<E>());
    }
    validate_required(&entity)?;

    let updated = store.replace(entity).await.map_err(store_failure)?;
    Ok(Json(updated))
}

pub async fn partial_update_entity<S, E>(
    State(store): State<AppState<S>>,
    Path(id): Path<Key>,
    RequestJson(patch): RequestJson<E>,
) -> Result<Json<E>, HandlerError>
where
    S: EntityStore<E>,
    E: Entity,
{
    log::debug!(
        "REST request to partial update {} : {}, {:?}",
        E::ENTITY_NAME,
        id,
        patch
    );
    check_identity(id, patch.identity())?;
    // An explicit null clears the stored value instead of being skipped.
    let mut existing = match store.get(id).await.map_err(store_failure)? {
        Some(existing) => existing,
        None => return Err(not_found::<E>()),
    };
    existing.merge_patch(patch);
    validate_required(&existing)?;

    let updated = store.replace(existing).await.map_err(store_failure)?;
    Ok(Json(updated))
}

pub async fn list_entities<S, E>(
    State(store): State<AppState<S>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<E>>, HandlerError>
where
    S: EntityStore<E>,
    E: Entity,
{
    match query.filter.as_deref() {
        Some(filter) => log::debug!(
            "REST request to get all {}s where {}",
            E::ENTITY_NAME,
            filter
        ),
        None => log::debug!("REST request to get all {}s", E::ENTITY_NAME),
    }
    let entities = store
        .list(query.filter.as_deref())
        .await
        .map_err(store_failure)?;
    Ok(Json(entities))
}

pub async fn get_entity<S, E>(
    State(store): State<AppState<S>>,
    Path(id): Path<Key>,
) -> Result<Json<E>, HandlerError>
where
    S: EntityStore<E>,
    E: Entity,
{
    log::debug!("REST request to get {} : {}", E::ENTITY_NAME, id);
    match store.get(id).await.map_err(store_failure)? {
        Some(entity) => Ok(Json(entity)),
        None => Err(not_found::<E>()),
    }
}

pub async fn delete_entity<S, E>(
    State(store): State<AppState<S>>,
    Path(id): Path<Key>,
) -> Result<StatusCode, HandlerError>
where
    S: EntityStore<E>,
    E: Entity,
{
    log::debug!("REST request to delete {} : {}", E::ENTITY_NAME, id);
    if store.delete(id).await.map_err(store_failure)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found::<E>())
    }
}
